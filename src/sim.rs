/// Simulation context and per-frame step.
///
/// `Simulation` owns every pool, the spatial grid, the power-up records and
/// the formation state — no ambient globals.  The step runs at a fixed
/// quantum; within one frame the phase order is strict and reproducible:
/// input intents → entity motion → power-up timer sweep → collision
/// resolution → end-of-wave / game-over checks.
///
/// The step never reads a wall clock.  Simulation time advances by exactly
/// one quantum per executed step, so every timer comparison in a frame uses
/// the same frozen value, and pausing freezes all timers for free.  The
/// host's monotonic reading is used only by `advance` to skip callbacks that
/// arrive early.

use rand::Rng;

use crate::collision::{self, GridRef};
use crate::entities::{
    Alien, AlienKind, Bullet, FireMode, GameStatus, Level, Particle, Player, PowerUpItem,
};
use crate::events::GameEvent;
use crate::grid::SpatialGrid;
use crate::pool::Pool;
use crate::powerups::{PowerUpKind, PowerUps};

/// Fixed step quantum, seconds (≈30 steps per second).
pub const TICK: f64 = 1.0 / 30.0;

// ── Entity dimensions (world cells) ──────────────────────────────────────────

pub const PLAYER_W: f32 = 3.0;
pub const PLAYER_H: f32 = 2.0;
pub const ALIEN_W: f32 = 3.0;
pub const ALIEN_H: f32 = 2.0;
pub const BULLET_W: f32 = 1.0;
pub const BULLET_H: f32 = 1.0;
pub const ITEM_W: f32 = 1.0;
pub const ITEM_H: f32 = 1.0;

/// Grid cell close to the largest entity box, so the 3×3 neighborhood
/// covers every possible overlap.
pub const GRID_CELL: f32 = 4.0;

// ── Movement & firing ────────────────────────────────────────────────────────

pub const PLAYER_SPEED: f32 = 18.0;
pub const SPEED_BOOST_FACTOR: f32 = 1.6;
pub const SHOT_SPEED: f32 = 24.0;
pub const HOSTILE_SHOT_SPEED: f32 = 10.0;
pub const ITEM_FALL_SPEED: f32 = 5.0;
/// Horizontal velocity of the outer projectiles of a triple shot.
pub const TRIPLE_SPREAD_VX: f32 = 6.0;

pub const FIRE_COOLDOWN: f32 = 0.4;
pub const RAPID_FIRE_COOLDOWN: f32 = 0.14;

pub const INITIAL_LIVES: u32 = 3;

// ── Formation ────────────────────────────────────────────────────────────────

const BASE_ROWS: u32 = 3;
const MAX_ROWS: u32 = 6;
const BASE_COLS: u32 = 6;
const MAX_COLS: u32 = 10;
const COL_PITCH: f32 = ALIEN_W + 2.0;
const ROW_PITCH: f32 = ALIEN_H + 1.0;
const FORMATION_TOP: f32 = 3.0;
pub const FORMATION_DROP: f32 = 1.0;
/// Added to the formation speed each wave.
const SPEED_PER_WAVE: f32 = 0.6;

const PARTICLE_BURST: u32 = 6;

/// Per-frame read-only view of the held input intents.  Built by the host;
/// the core never mutates it.
#[derive(Clone, Copy, Debug, Default)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    /// Edge-triggered by the host: true for exactly one frame per press.
    pub bomb: bool,
}

/// Shared state of the alien formation: one direction and speed for every
/// member.  Reverses and drops when any member reaches a boundary.
#[derive(Clone, Debug)]
pub struct Formation {
    pub dir: f32,
    pub speed: f32,
}

pub struct Simulation {
    pub player: Player,
    pub aliens: Pool<Alien>,
    pub player_bullets: Pool<Bullet>,
    pub alien_bullets: Pool<Bullet>,
    pub particles: Pool<Particle>,
    pub items: Pool<PowerUpItem>,
    pub arcs: Pool<crate::entities::ChainArc>,
    pub grid: SpatialGrid<GridRef>,
    pub powerups: PowerUps,
    pub formation: Formation,

    pub score: u32,
    pub high_score: u32,
    pub wave: u32,
    pub level: Level,
    pub status: GameStatus,

    pub width: f32,
    pub height: f32,
    /// Simulation clock, frozen for the duration of each step.
    pub now: f64,
    pub frame: u64,
    /// Host timestamp of the last executed step (cadence governance).
    last_step: Option<f64>,

    pub events: Vec<GameEvent>,
    /// Reused 3×3 query buffer — no per-frame allocation.
    pub query_buf: Vec<GridRef>,
}

impl Simulation {
    pub fn new(level: Level, width: f32, height: f32, high_score: u32) -> Self {
        let mut sim = Self {
            player: Player {
                x: width / 2.0 - PLAYER_W / 2.0,
                y: height - 4.0,
                w: PLAYER_W,
                h: PLAYER_H,
                lives: INITIAL_LIVES,
                fire_cooldown: 0.0,
            },
            aliens: Pool::with_capacity(64),
            player_bullets: Pool::with_capacity(32),
            alien_bullets: Pool::with_capacity(32),
            particles: Pool::with_capacity(128),
            items: Pool::with_capacity(8),
            arcs: Pool::with_capacity(8),
            grid: SpatialGrid::new(GRID_CELL, width, height),
            powerups: PowerUps::new(),
            formation: Formation {
                dir: 1.0,
                speed: 0.0,
            },
            score: 0,
            high_score,
            wave: 1,
            level,
            status: GameStatus::Playing,
            width,
            height,
            now: 0.0,
            frame: 0,
            last_step: None,
            events: Vec::new(),
            query_buf: Vec::new(),
        };
        sim.formation.speed = sim.formation_speed();
        sim.spawn_formation();
        sim
    }

    /// New game.  Countable resources (bomb charges) persist; everything
    /// else returns to its initial state.
    pub fn reset(&mut self) {
        self.aliens.release_all();
        self.player_bullets.release_all();
        self.alien_bullets.release_all();
        self.particles.release_all();
        self.items.release_all();
        self.arcs.release_all();
        self.powerups.reset();
        self.events.clear();

        self.player = Player {
            x: self.width / 2.0 - PLAYER_W / 2.0,
            y: self.height - 4.0,
            w: PLAYER_W,
            h: PLAYER_H,
            lives: INITIAL_LIVES,
            fire_cooldown: 0.0,
        };
        self.score = 0;
        self.wave = 1;
        self.status = GameStatus::Playing;
        self.formation = Formation {
            dir: 1.0,
            speed: self.formation_speed(),
        };
        self.spawn_formation();
    }

    /// Host-driven entry point.  Executes one step unless the interval since
    /// the last executed step is below the quantum, in which case the whole
    /// callback is skipped (no partial update).  Returns whether a step ran.
    pub fn advance(&mut self, input: &InputSnapshot, host_now: f64, rng: &mut impl Rng) -> bool {
        if let Some(last) = self.last_step {
            if host_now - last < TICK {
                return false;
            }
        }
        self.last_step = Some(host_now);
        self.step(input, rng);
        true
    }

    /// One fixed-quantum step.  No-op unless the simulation is `Playing`.
    pub fn step(&mut self, input: &InputSnapshot, rng: &mut impl Rng) {
        if self.status != GameStatus::Playing {
            return;
        }
        self.frame += 1;
        self.now += TICK;

        // 1. Input intents
        self.apply_input(input, rng);

        // 2. Entity motion
        self.update_motion();
        self.update_formation();
        self.hostile_fire(rng);

        // 3. Power-up timer sweep — one frozen clock value for the frame
        let now = self.now;
        for kind in self.powerups.sweep(now) {
            self.events.push(GameEvent::PowerUpExpired { kind });
        }

        // 4. Collision resolution
        collision::resolve(self, rng);

        // 5. Wave-completion / game-over checks
        self.end_of_frame_checks();
    }

    pub fn toggle_pause(&mut self) {
        if self.status == GameStatus::Playing {
            self.status = GameStatus::Paused;
        } else if self.status == GameStatus::Paused {
            self.status = GameStatus::Playing;
        }
    }

    /// Hand the frame's events to the host (audio, UI notifications).
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn add_score(&mut self, points: u32) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
        }
    }

    // ── Phase 1: input ───────────────────────────────────────────────────────

    fn apply_input(&mut self, input: &InputSnapshot, rng: &mut impl Rng) {
        let t = TICK as f32;
        let mut speed = PLAYER_SPEED;
        if self.powerups.is_active(PowerUpKind::SpeedBoost, self.now) {
            speed *= SPEED_BOOST_FACTOR;
        }
        if input.left {
            self.player.x -= speed * t;
        }
        if input.right {
            self.player.x += speed * t;
        }
        self.player.x = self.player.x.clamp(1.0, self.width - 1.0 - self.player.w);

        self.player.fire_cooldown = (self.player.fire_cooldown - t).max(0.0);
        if input.fire && self.player.fire_cooldown <= 0.0 {
            self.fire_shot();
        }
        if input.bomb {
            self.detonate_bomb(rng);
        }
    }

    fn fire_shot(&mut self) {
        let mode = self.powerups.fire_mode(self.now);
        let cx = self.player.x + self.player.w / 2.0;
        let top = self.player.y - BULLET_H;
        let spreads: &[f32] = if self.powerups.is_active(PowerUpKind::TripleShot, self.now) {
            &[-TRIPLE_SPREAD_VX, 0.0, TRIPLE_SPREAD_VX]
        } else {
            &[0.0]
        };
        for &vx in spreads {
            self.player_bullets.acquire(Bullet {
                x: cx - BULLET_W / 2.0,
                y: top,
                w: BULLET_W,
                h: BULLET_H,
                vx,
                vy: -SHOT_SPEED,
                mode,
            });
        }
        self.player.fire_cooldown = if self.powerups.is_active(PowerUpKind::RapidFire, self.now) {
            RAPID_FIRE_COOLDOWN
        } else {
            FIRE_COOLDOWN
        };
        self.events.push(GameEvent::ShotFired);
    }

    fn detonate_bomb(&mut self, rng: &mut impl Rng) {
        if !self.powerups.spend_bomb() {
            return;
        }
        let mut destroyed = 0;
        for h in self.aliens.handles() {
            if collision::destroy_alien(self, h, rng) > 0 {
                destroyed += 1;
            }
        }
        self.events.push(GameEvent::BombDetonated { destroyed });
    }

    // ── Phase 2: motion ──────────────────────────────────────────────────────

    fn update_motion(&mut self) {
        let t = TICK as f32;

        for h in self.player_bullets.handles() {
            let mut gone = false;
            if let Some(b) = self.player_bullets.get_mut(h) {
                b.x += b.vx * t;
                b.y += b.vy * t;
                gone = b.y + b.h < 1.0
                    || b.y > self.height
                    || b.x + b.w < 0.0
                    || b.x > self.width;
            }
            if gone {
                self.player_bullets.release(h);
            }
        }

        for h in self.alien_bullets.handles() {
            let mut gone = false;
            if let Some(b) = self.alien_bullets.get_mut(h) {
                b.y += b.vy * t;
                gone = b.y > self.height - 1.0;
            }
            if gone {
                self.alien_bullets.release(h);
            }
        }

        for h in self.items.handles() {
            let mut gone = false;
            if let Some(it) = self.items.get_mut(h) {
                it.y += it.vy * t;
                it.pulse += t;
                gone = it.y > self.height - 1.0;
            }
            if gone {
                self.items.release(h);
            }
        }

        for h in self.particles.handles() {
            let mut gone = false;
            if let Some(p) = self.particles.get_mut(h) {
                p.x += p.vx * t;
                p.y += p.vy * t;
                p.life -= t;
                gone = p.life <= 0.0;
            }
            if gone {
                self.particles.release(h);
            }
        }

        // Fired arcs linger briefly as visuals, then free their slot.
        for h in self.arcs.handles() {
            let mut gone = false;
            if let Some(a) = self.arcs.get_mut(h) {
                if a.target.is_none() {
                    a.linger -= t;
                    gone = a.linger <= 0.0;
                }
            }
            if gone {
                self.arcs.release(h);
            }
        }

        for h in self.aliens.handles() {
            if let Some(a) = self.aliens.get_mut(h) {
                a.anim += t;
            }
        }
    }

    fn update_formation(&mut self) {
        if self.aliens.is_empty() {
            return;
        }
        let dx = self.formation.dir * self.formation.speed * TICK as f32;

        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        for (_, a) in self.aliens.iter() {
            min_x = min_x.min(a.x);
            max_x = max_x.max(a.x + a.w);
        }

        if min_x + dx < 1.0 || max_x + dx > self.width - 1.0 {
            // Boundary reached: reverse and drop the whole formation.
            self.formation.dir = -self.formation.dir;
            for h in self.aliens.handles() {
                if let Some(a) = self.aliens.get_mut(h) {
                    a.y += FORMATION_DROP;
                }
            }
        } else {
            for h in self.aliens.handles() {
                if let Some(a) = self.aliens.get_mut(h) {
                    a.x += dx;
                }
            }
        }
    }

    fn hostile_fire(&mut self, rng: &mut impl Rng) {
        let denom = self.hostile_fire_denom();
        let mut spawns: Vec<(f32, f32)> = Vec::new();
        for (_, a) in self.aliens.iter() {
            if rng.gen_ratio(1, denom) {
                spawns.push((a.x + a.w / 2.0, a.y + a.h));
            }
        }
        for (x, y) in spawns {
            self.alien_bullets.acquire(Bullet {
                x: x - BULLET_W / 2.0,
                y,
                w: BULLET_W,
                h: BULLET_H,
                vx: 0.0,
                vy: HOSTILE_SHOT_SPEED,
                mode: FireMode::Normal,
            });
        }
    }

    // ── Phase 5: end-of-frame checks ─────────────────────────────────────────

    fn end_of_frame_checks(&mut self) {
        if self.status != GameStatus::Playing {
            return; // collision resolution already ended the game
        }

        // Invasion: the formation reaching the player row is a loss.
        let invaded = self.aliens.iter().any(|(_, a)| a.y + a.h >= self.player.y);
        if invaded {
            self.status = GameStatus::GameOver;
            self.events.push(GameEvent::GameOver { score: self.score });
            return;
        }

        if self.aliens.is_empty() {
            self.wave += 1;
            self.events.push(GameEvent::WaveCleared { wave: self.wave });
            // Pending chain strikes must never carry into a fresh wave: a
            // recycled slot would otherwise be struck by a stale arc.
            self.arcs.release_all();
            self.formation = Formation {
                dir: 1.0,
                speed: self.formation_speed(),
            };
            self.spawn_formation();
        }
    }

    // ── Wave spawning ────────────────────────────────────────────────────────

    fn formation_speed(&self) -> f32 {
        let base = match self.level {
            Level::Easy => 2.5,
            Level::Medium => 4.0,
            Level::Hard => 6.0,
        };
        base + (self.wave - 1) as f32 * SPEED_PER_WAVE
    }

    /// Per-alien, per-frame 1-in-N fire chance, tightened by level and wave.
    fn hostile_fire_denom(&self) -> u32 {
        let base: u32 = match self.level {
            Level::Easy => 700,
            Level::Medium => 450,
            Level::Hard => 280,
        };
        base.saturating_sub((self.wave - 1) * 25).max(120)
    }

    /// Ordered grid of aliens: subtype and base value fixed by row
    /// (row 0 = bottom), density scaled by wave number.
    fn spawn_formation(&mut self) {
        let rows = (BASE_ROWS + (self.wave - 1) / 2).min(MAX_ROWS);
        let fit = ((self.width - 2.0) / COL_PITCH).floor() as u32;
        let cols = (BASE_COLS + (self.wave - 1) / 3).min(MAX_COLS).min(fit).max(1);

        let left = ((self.width - cols as f32 * COL_PITCH) / 2.0).max(1.0);
        for row in 0..rows {
            let y = FORMATION_TOP + (rows - 1 - row) as f32 * ROW_PITCH;
            let kind = AlienKind::for_row(row);
            for col in 0..cols {
                self.aliens.acquire(Alien {
                    x: left + col as f32 * COL_PITCH,
                    y,
                    w: ALIEN_W,
                    h: ALIEN_H,
                    kind,
                    row,
                    armor: kind.armor(),
                    anim: 0.0,
                });
            }
        }
    }

    // ── Derived spawns (shared with the collision resolver) ──────────────────

    pub(crate) fn spawn_burst(&mut self, x: f32, y: f32, rng: &mut impl Rng) {
        use std::f32::consts::TAU;
        for _ in 0..PARTICLE_BURST {
            let ang = rng.gen_range(0.0..TAU);
            let speed = rng.gen_range(3.0..9.0);
            self.particles.acquire(Particle {
                x,
                y,
                vx: ang.cos() * speed,
                vy: ang.sin() * speed,
                life: rng.gen_range(0.25..0.55),
            });
        }
    }

    pub(crate) fn spawn_item(&mut self, x: f32, y: f32, rng: &mut impl Rng) {
        let kind = PowerUpKind::ALL[rng.gen_range(0..PowerUpKind::ALL.len())];
        self.items.acquire(PowerUpItem {
            x: x - ITEM_W / 2.0,
            y,
            w: ITEM_W,
            h: ITEM_H,
            vy: ITEM_FALL_SPEED,
            kind: Some(kind),
            pulse: 0.0,
        });
    }
}
