use alien_assault::collision::{self, boxes_overlap, CHAIN_STAGGER};
use alien_assault::entities::{Alien, AlienKind, Bullet, FireMode, GameStatus, Level, PowerUpItem};
use alien_assault::events::GameEvent;
use alien_assault::pool::Handle;
use alien_assault::powerups::PowerUpKind;
use alien_assault::sim::{Simulation, ALIEN_H, ALIEN_W};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// A playing simulation with an empty field — tests place entities by hand.
fn make_sim() -> Simulation {
    let mut sim = Simulation::new(Level::Easy, 80.0, 40.0, 0);
    sim.aliens.release_all();
    sim.events.clear();
    sim
}

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn put_alien(sim: &mut Simulation, x: f32, y: f32, row: u32, kind: AlienKind) -> Handle {
    sim.aliens.acquire(Alien {
        x,
        y,
        w: ALIEN_W,
        h: ALIEN_H,
        kind,
        row,
        armor: kind.armor(),
        anim: 0.0,
    })
}

fn put_shot(sim: &mut Simulation, x: f32, y: f32, mode: FireMode) -> Handle {
    sim.player_bullets.acquire(Bullet {
        x,
        y,
        w: 1.0,
        h: 1.0,
        vx: 0.0,
        vy: 0.0,
        mode,
    })
}

fn put_hostile_shot(sim: &mut Simulation, x: f32, y: f32) -> Handle {
    sim.alien_bullets.acquire(Bullet {
        x,
        y,
        w: 1.0,
        h: 1.0,
        vx: 0.0,
        vy: 0.0,
        mode: FireMode::Normal,
    })
}

// ── Overlap predicate ────────────────────────────────────────────────────────

#[test]
fn overlap_is_symmetric() {
    let a = (1.0, 1.0, 3.0, 2.0);
    let b = (2.5, 2.0, 3.0, 2.0);
    let c = (9.0, 9.0, 1.0, 1.0);
    assert_eq!(
        boxes_overlap(a.0, a.1, a.2, a.3, b.0, b.1, b.2, b.3),
        boxes_overlap(b.0, b.1, b.2, b.3, a.0, a.1, a.2, a.3)
    );
    assert_eq!(
        boxes_overlap(a.0, a.1, a.2, a.3, c.0, c.1, c.2, c.3),
        boxes_overlap(c.0, c.1, c.2, c.3, a.0, a.1, a.2, a.3)
    );
}

#[test]
fn zero_area_box_never_overlaps() {
    assert!(!boxes_overlap(5.0, 5.0, 0.0, 0.0, 4.0, 4.0, 3.0, 3.0));
    assert!(!boxes_overlap(4.0, 4.0, 3.0, 3.0, 5.0, 5.0, 0.0, 0.0));
}

#[test]
fn fully_contained_box_overlaps() {
    assert!(boxes_overlap(2.0, 2.0, 1.0, 1.0, 0.0, 0.0, 10.0, 10.0));
    assert!(boxes_overlap(0.0, 0.0, 10.0, 10.0, 2.0, 2.0, 1.0, 1.0));
}

#[test]
fn edge_touching_boxes_do_not_overlap() {
    assert!(!boxes_overlap(0.0, 0.0, 2.0, 2.0, 2.0, 0.0, 2.0, 2.0));
}

// ── Friendly projectiles vs targets ──────────────────────────────────────────

#[test]
fn single_kill_awards_row_base_value() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    put_alien(&mut sim, 10.0, 10.0, 0, AlienKind::Drone);
    put_shot(&mut sim, 11.0, 10.5, FireMode::Normal);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 0);
    assert_eq!(sim.score, 10);
    assert_eq!(sim.player_bullets.len(), 0);
    assert!(sim
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::TargetDestroyed { points: 10, .. })));
}

#[test]
fn row_and_type_scale_the_award() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    // Row 2 Raider: base 30 × type 2 = 60
    put_alien(&mut sim, 10.0, 10.0, 2, AlienKind::Raider);
    put_shot(&mut sim, 11.0, 10.5, FireMode::Normal);

    collision::resolve(&mut sim, &mut rng);
    assert_eq!(sim.score, 60);
}

#[test]
fn active_multiplier_doubles_the_award() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    sim.powerups.collect(PowerUpKind::DoubleScore, sim.now);
    put_alien(&mut sim, 10.0, 10.0, 0, AlienKind::Drone);
    put_shot(&mut sim, 11.0, 10.5, FireMode::Normal);

    collision::resolve(&mut sim, &mut rng);
    assert_eq!(sim.score, 20);
}

#[test]
fn non_piercing_shot_destroys_at_most_one_target() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    // Two aliens stacked so both overlap the shot
    put_alien(&mut sim, 10.0, 10.0, 0, AlienKind::Drone);
    put_alien(&mut sim, 10.5, 10.5, 0, AlienKind::Drone);
    put_shot(&mut sim, 11.0, 11.0, FireMode::Normal);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 1);
    assert_eq!(sim.score, 10);
}

#[test]
fn piercing_shot_survives_and_keeps_testing() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    put_alien(&mut sim, 10.0, 10.0, 0, AlienKind::Drone);
    put_alien(&mut sim, 10.5, 10.5, 0, AlienKind::Drone);
    put_shot(&mut sim, 11.0, 11.0, FireMode::Pierce);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 0);
    assert_eq!(sim.score, 20);
    // The projectile is never released by a hit
    assert_eq!(sim.player_bullets.len(), 1);
}

#[test]
fn armor_soaks_a_hit_and_the_target_survives() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    let a = put_alien(&mut sim, 10.0, 10.0, 4, AlienKind::Overlord); // armor 2
    put_shot(&mut sim, 11.0, 10.5, FireMode::Normal);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 1);
    assert_eq!(sim.aliens.get(a).unwrap().armor, 1);
    assert_eq!(sim.score, 0);
    assert_eq!(sim.player_bullets.len(), 0); // shot consumed by the soak
    assert!(sim
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::ArmorDinged { .. })));
}

#[test]
fn second_hit_destroys_the_armored_target() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    put_alien(&mut sim, 10.0, 10.0, 4, AlienKind::Overlord);
    put_shot(&mut sim, 11.0, 10.5, FireMode::Normal);
    collision::resolve(&mut sim, &mut rng);

    put_shot(&mut sim, 11.0, 10.5, FireMode::Normal);
    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 0);
    // Row 4 Overlord: base 50 × type 3 = 150
    assert_eq!(sim.score, 150);
}

#[test]
fn splitting_shot_spawns_a_fan_of_three() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    put_alien(&mut sim, 10.0, 10.0, 0, AlienKind::Drone);
    put_shot(&mut sim, 11.0, 10.5, FireMode::Split);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 0);
    // Original released, three plain children spawned at the impact
    assert_eq!(sim.player_bullets.len(), 3);
    assert!(sim
        .player_bullets
        .iter()
        .all(|(_, b)| b.mode == FireMode::Normal));
}

#[test]
fn chaining_strikes_nearest_targets_with_a_stagger() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();

    // Impact target plus three within chain radius, one far outside it
    put_alien(&mut sim, 40.0, 10.0, 0, AlienKind::Drone);
    put_alien(&mut sim, 44.0, 10.0, 0, AlienKind::Drone);
    put_alien(&mut sim, 48.0, 10.0, 0, AlienKind::Drone);
    put_alien(&mut sim, 34.0, 10.0, 0, AlienKind::Drone);
    put_alien(&mut sim, 70.0, 30.0, 0, AlienKind::Drone);
    put_shot(&mut sim, 41.0, 10.5, FireMode::Chain);

    collision::resolve(&mut sim, &mut rng);

    // Impact target destroyed immediately; strikes are pending, not landed
    assert_eq!(sim.aliens.len(), 4);
    assert_eq!(sim.score, 10);
    assert_eq!(sim.arcs.len(), 3);

    // Let the staggered strikes come due one by one
    for _ in 0..4 {
        sim.now += CHAIN_STAGGER;
        collision::resolve(&mut sim, &mut rng);
    }

    // Impact + 3 chained destroyed, each awarding score independently;
    // the out-of-radius alien survives
    assert_eq!(sim.aliens.len(), 1);
    assert_eq!(sim.score, 40);
    assert_eq!(
        sim.events
            .iter()
            .filter(|e| matches!(e, GameEvent::ChainStrike { .. }))
            .count(),
        3
    );
}

// ── Hostile projectiles vs the player ────────────────────────────────────────

#[test]
fn shield_absorbs_one_hit_with_no_life_loss() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    sim.powerups.collect(PowerUpKind::Shield, sim.now);
    let (px, py) = (sim.player.x, sim.player.y);
    put_hostile_shot(&mut sim, px + 1.0, py + 0.5);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.player.lives, 3);
    assert!(!sim.powerups.is_active(PowerUpKind::Shield, sim.now));
    assert_eq!(sim.alien_bullets.len(), 0);
    assert!(sim.events.iter().any(|e| matches!(e, GameEvent::ShieldBroken)));
    assert_eq!(sim.status, GameStatus::Playing);
}

#[test]
fn unshielded_hit_costs_a_life() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    let (px, py) = (sim.player.x, sim.player.y);
    put_hostile_shot(&mut sim, px + 1.0, py + 0.5);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.player.lives, 2);
    assert_eq!(sim.alien_bullets.len(), 0);
    assert_eq!(sim.status, GameStatus::Playing);
}

#[test]
fn last_life_lost_transitions_to_game_over() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    sim.player.lives = 1;
    let (px, py) = (sim.player.x, sim.player.y);
    put_hostile_shot(&mut sim, px + 1.0, py + 0.5);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.player.lives, 0);
    assert_eq!(sim.status, GameStatus::GameOver);
    assert!(sim
        .events
        .iter()
        .any(|e| matches!(e, GameEvent::GameOver { .. })));
}

// ── Collectibles ─────────────────────────────────────────────────────────────

#[test]
fn pickup_invokes_the_collection_transition() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    sim.items.acquire(PowerUpItem {
        x: sim.player.x + 1.0,
        y: sim.player.y + 0.5,
        w: 1.0,
        h: 1.0,
        vy: 0.0,
        kind: Some(PowerUpKind::RapidFire),
        pulse: 0.0,
    });

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.items.len(), 0);
    assert!(sim.powerups.is_active(PowerUpKind::RapidFire, sim.now));
    assert!(sim.events.iter().any(|e| matches!(
        e,
        GameEvent::PowerUpCollected {
            kind: PowerUpKind::RapidFire
        }
    )));
}

#[test]
fn missed_shot_hits_nothing() {
    let mut sim = make_sim();
    let mut rng = seeded_rng();
    put_alien(&mut sim, 10.0, 10.0, 0, AlienKind::Drone);
    put_shot(&mut sim, 20.0, 10.5, FireMode::Normal);

    collision::resolve(&mut sim, &mut rng);

    assert_eq!(sim.aliens.len(), 1);
    assert_eq!(sim.player_bullets.len(), 1);
    assert_eq!(sim.score, 0);
}
