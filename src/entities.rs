/// All simulated entity types — pure data, no logic.
///
/// Pooled kinds derive `Default` with neutral values (zero velocity, zero
/// life, cleared behavior flags): releasing a slot resets it to exactly this
/// state, so a recycled entity can never inherit stale fields.

use crate::pool::Handle;
use crate::powerups::PowerUpKind;

#[derive(Clone, Debug, PartialEq)]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GameStatus {
    Playing,
    /// Frozen entirely: no time advances, no timers tick.
    Paused,
    GameOver,
}

/// Alien subtype, decided by formation row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum AlienKind {
    /// Bottom rows — fragile, cheap.
    #[default]
    Drone,
    /// Middle rows.
    Raider,
    /// Top rows — armored, worth the most.
    Overlord,
}

impl AlienKind {
    /// Subtype for a formation row (row 0 = bottom, nearest the player).
    pub fn for_row(row: u32) -> AlienKind {
        match row {
            0 | 1 => AlienKind::Drone,
            2 | 3 => AlienKind::Raider,
            _ => AlienKind::Overlord,
        }
    }

    pub fn type_multiplier(self) -> u32 {
        match self {
            AlienKind::Drone => 1,
            AlienKind::Raider => 2,
            AlienKind::Overlord => 3,
        }
    }

    /// Hits required to destroy.  Armor above 1 soaks hits before the kill.
    pub fn armor(self) -> u32 {
        match self {
            AlienKind::Drone | AlienKind::Raider => 1,
            AlienKind::Overlord => 2,
        }
    }
}

/// Projectile post-hit behavior, stamped on the bullet when fired.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FireMode {
    /// Destroyed on first hit.
    #[default]
    Normal,
    /// Survives hits and keeps testing further targets the same frame.
    Pierce,
    /// Destroyed on hit; spawns a fan of plain projectiles at the impact.
    Split,
    /// Destroyed on hit; arcs to the nearest remaining targets.
    Chain,
}

// ── Singular entities ────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub lives: u32,
    /// Seconds until the next shot is allowed.
    pub fire_cooldown: f32,
}

// ── Pooled entities ──────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct Alien {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub kind: AlienKind,
    /// Formation row (0 = bottom), fixes the base score value.
    pub row: u32,
    /// Remaining hits; at 1 the next hit destroys.
    pub armor: u32,
    /// Animation phase in seconds, for the renderer only.
    pub anim: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Bullet {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vx: f32,
    pub vy: f32,
    pub mode: FireMode,
}

#[derive(Clone, Debug, Default)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Seconds left to live.
    pub life: f32,
}

#[derive(Clone, Debug, Default)]
pub struct PowerUpItem {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub vy: f32,
    pub kind: Option<PowerUpKind>,
    /// Pulse phase for the renderer.
    pub pulse: f32,
}

/// A scheduled chain strike and its lingering visual arc.  While `target`
/// is set the strike is pending; once fired the arc lingers for `linger`
/// seconds and is then released.
#[derive(Clone, Copy, Debug, Default)]
pub struct ChainArc {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub fire_at: f64,
    pub target: Option<Handle>,
    pub linger: f32,
}
