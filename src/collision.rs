/// Collision resolution and scoring.
///
/// Runs once per step, after motion and the power-up sweep.  The spatial
/// grid is rebuilt from the current active sets, then three passes run in a
/// fixed order: friendly projectiles vs targets, hostile projectiles vs the
/// player, collectibles vs the player.  Pending chain strikes fire first so
/// a strike scheduled N frames ago lands before this frame's new impacts.

use rand::Rng;

use crate::entities::{Bullet, ChainArc, FireMode, GameStatus};
use crate::events::GameEvent;
use crate::pool::Handle;
use crate::powerups::PowerUpKind;
use crate::sim::{Simulation, BULLET_H, BULLET_W};

/// Child projectiles spawned by a splitting impact, fanned at even angles.
const SPLIT_COUNT: u32 = 3;
const SPLIT_SPEED: f32 = 18.0;

/// Chain reach and cap: up to this many nearest remaining targets within
/// the radius, struck in ascending-distance order.
pub const CHAIN_LIMIT: usize = 3;
pub const CHAIN_RADIUS: f32 = 12.0;
/// Delay between consecutive strikes of one chain, seconds.
pub const CHAIN_STAGGER: f64 = 0.08;
/// How long a fired arc stays visible.
const ARC_LINGER: f32 = 0.15;

/// Probability that a destroyed alien drops a collectible.
const ITEM_DROP_CHANCE: f64 = 0.12;

/// Non-owning reference stored in the spatial grid for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GridRef {
    PlayerShot(Handle),
    Alien(Handle),
    Item(Handle),
}

/// Axis-aligned box overlap.  Strict inequalities: zero-area boxes and
/// edge-touching boxes do not overlap.  Symmetric in its arguments.
#[allow(clippy::too_many_arguments)]
pub fn boxes_overlap(
    ax: f32,
    ay: f32,
    aw: f32,
    ah: f32,
    bx: f32,
    by: f32,
    bw: f32,
    bh: f32,
) -> bool {
    ax < bx + bw && ax + aw > bx && ay < by + bh && ay + ah > by
}

/// Base score value by formation row (row 0 = bottom).
pub fn base_value(row: u32) -> u32 {
    10 * (row + 1)
}

/// Destroy one alien: release its slot, award
/// `base-by-row × type multiplier × score multiplier`, emit the event, and
/// spawn the debris burst / possible item drop.  No-op (0 points) if the
/// handle was already released by another destruction path this frame.
pub(crate) fn destroy_alien(w: &mut Simulation, handle: Handle, rng: &mut impl Rng) -> u32 {
    let (cx, cy, row, kind) = match w.aliens.get(handle) {
        Some(a) => (a.x + a.w / 2.0, a.y + a.h / 2.0, a.row, a.kind),
        None => return 0,
    };
    w.aliens.release(handle);

    let points = base_value(row) * kind.type_multiplier() * w.powerups.score_multiplier(w.now);
    w.add_score(points);
    w.events.push(GameEvent::TargetDestroyed { x: cx, y: cy, points });

    w.spawn_burst(cx, cy, rng);
    if rng.gen_bool(ITEM_DROP_CHANCE) {
        w.spawn_item(cx, cy, rng);
    }
    points
}

/// One full resolution pass.  Mutates pools, score/lives, power-up records
/// and may transition the simulation to game over.
pub fn resolve(w: &mut Simulation, rng: &mut impl Rng) {
    fire_due_chains(w, rng);

    // Rebuild the per-frame index from all active projectiles, targets and
    // collectibles.  Everything is keyed by its own top-left corner.
    w.grid.clear();
    for (h, b) in w.player_bullets.iter() {
        w.grid.insert(GridRef::PlayerShot(h), b.x, b.y);
    }
    for (h, a) in w.aliens.iter() {
        w.grid.insert(GridRef::Alien(h), a.x, a.y);
    }
    for (h, it) in w.items.iter() {
        w.grid.insert(GridRef::Item(h), it.x, it.y);
    }

    resolve_player_shots(w, rng);
    resolve_hostile_shots(w, rng);
    resolve_pickups(w);
}

// ── Friendly projectiles vs targets ──────────────────────────────────────────

fn resolve_player_shots(w: &mut Simulation, rng: &mut impl Rng) {
    let mut buf = std::mem::take(&mut w.query_buf);

    for sh in w.player_bullets.handles() {
        let (sx, sy, sw, shh, mode) = match w.player_bullets.get(sh) {
            Some(b) => (b.x, b.y, b.w, b.h, b.mode),
            None => continue,
        };

        w.grid.query_into(sx, sy, &mut buf);
        for &gref in buf.iter() {
            let ah = match gref {
                GridRef::Alien(a) => a,
                _ => continue,
            };
            let (acx, acy, armor) = match w.aliens.get(ah) {
                Some(a) => {
                    if !boxes_overlap(sx, sy, sw, shh, a.x, a.y, a.w, a.h) {
                        continue;
                    }
                    (a.x + a.w / 2.0, a.y + a.h / 2.0, a.armor)
                }
                // Released earlier this frame (pierce sweep, bomb, chain).
                None => continue,
            };

            if armor > 1 {
                // Armor soaks the hit; the target survives.
                if let Some(a) = w.aliens.get_mut(ah) {
                    a.armor -= 1;
                }
                w.events.push(GameEvent::ArmorDinged { x: acx, y: acy });
                if mode != FireMode::Pierce {
                    w.player_bullets.release(sh);
                }
                break;
            }

            destroy_alien(w, ah, rng);

            match mode {
                // Keeps flying and keeps testing this frame's candidates.
                FireMode::Pierce => continue,
                FireMode::Normal => {
                    w.player_bullets.release(sh);
                    break;
                }
                FireMode::Split => {
                    w.player_bullets.release(sh);
                    spawn_split(w, acx, acy);
                    break;
                }
                FireMode::Chain => {
                    w.player_bullets.release(sh);
                    schedule_chain(w, acx, acy);
                    break;
                }
            }
        }
    }

    w.query_buf = buf;
}

fn spawn_split(w: &mut Simulation, x: f32, y: f32) {
    use std::f32::consts::{FRAC_PI_2, TAU};
    for i in 0..SPLIT_COUNT {
        let ang = -FRAC_PI_2 + TAU * i as f32 / SPLIT_COUNT as f32;
        w.player_bullets.acquire(Bullet {
            x: x - BULLET_W / 2.0,
            y: y - BULLET_H / 2.0,
            w: BULLET_W,
            h: BULLET_H,
            vx: ang.cos() * SPLIT_SPEED,
            vy: ang.sin() * SPLIT_SPEED,
            mode: FireMode::Normal,
        });
    }
}

/// Schedule staggered strikes on the nearest remaining targets around the
/// impact point, ascending by distance.
fn schedule_chain(w: &mut Simulation, x: f32, y: f32) {
    let mut cands: Vec<(f32, Handle, f32, f32)> = w
        .aliens
        .iter()
        .filter_map(|(h, a)| {
            let cx = a.x + a.w / 2.0;
            let cy = a.y + a.h / 2.0;
            let d2 = (cx - x) * (cx - x) + (cy - y) * (cy - y);
            if d2 <= CHAIN_RADIUS * CHAIN_RADIUS {
                Some((d2, h, cx, cy))
            } else {
                None
            }
        })
        .collect();
    cands.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

    for (i, (_, th, tx, ty)) in cands.into_iter().take(CHAIN_LIMIT).enumerate() {
        w.arcs.acquire(ChainArc {
            x1: x,
            y1: y,
            x2: tx,
            y2: ty,
            fire_at: w.now + (i as f64 + 1.0) * CHAIN_STAGGER,
            target: Some(th),
            linger: 0.0,
        });
    }
}

/// Fire every pending chain strike whose delay has elapsed.  A strike whose
/// target is already gone just degrades into the lingering visual.
fn fire_due_chains(w: &mut Simulation, rng: &mut impl Rng) {
    for ah in w.arcs.handles() {
        let arc = match w.arcs.get(ah) {
            Some(a) => *a,
            None => continue,
        };
        let target = match arc.target {
            Some(t) if w.now >= arc.fire_at => t,
            _ => continue,
        };

        let mut end = (arc.x2, arc.y2);
        if let Some(a) = w.aliens.get(target) {
            end = (a.x + a.w / 2.0, a.y + a.h / 2.0);
            let points = destroy_alien(w, target, rng);
            w.events.push(GameEvent::ChainStrike {
                x: end.0,
                y: end.1,
                points,
            });
        }
        if let Some(a) = w.arcs.get_mut(ah) {
            a.target = None;
            a.x2 = end.0;
            a.y2 = end.1;
            a.linger = ARC_LINGER;
        }
    }
}

// ── Hostile projectiles vs the player ────────────────────────────────────────

fn resolve_hostile_shots(w: &mut Simulation, rng: &mut impl Rng) {
    let (px, py, pw, ph) = (w.player.x, w.player.y, w.player.w, w.player.h);

    for hb in w.alien_bullets.handles() {
        let hit = match w.alien_bullets.get(hb) {
            Some(b) => boxes_overlap(b.x, b.y, b.w, b.h, px, py, pw, ph),
            None => false,
        };
        if !hit {
            continue;
        }
        w.alien_bullets.release(hb);

        if w.powerups.is_active(PowerUpKind::Shield, w.now) {
            // The shield absorbs exactly one hit; no life is lost.
            w.powerups.break_shield();
            w.events.push(GameEvent::ShieldBroken);
            continue;
        }

        w.player.lives = w.player.lives.saturating_sub(1);
        w.events.push(GameEvent::PlayerHit {
            lives_left: w.player.lives,
        });
        w.spawn_burst(px + pw / 2.0, py + ph / 2.0, rng);

        if w.player.lives == 0 {
            w.status = GameStatus::GameOver;
            w.events.push(GameEvent::GameOver { score: w.score });
        }
    }
}

// ── Collectibles vs the player ───────────────────────────────────────────────

fn resolve_pickups(w: &mut Simulation) {
    let (px, py, pw, ph) = (w.player.x, w.player.y, w.player.w, w.player.h);

    for ih in w.items.handles() {
        let (hit, kind) = match w.items.get(ih) {
            Some(it) => (
                boxes_overlap(it.x, it.y, it.w, it.h, px, py, pw, ph),
                it.kind,
            ),
            None => (false, None),
        };
        if !hit {
            continue;
        }
        w.items.release(ih);
        if let Some(kind) = kind {
            w.powerups.collect(kind, w.now);
            w.events.push(GameEvent::PowerUpCollected { kind });
        }
    }
}
