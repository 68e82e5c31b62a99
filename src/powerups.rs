/// Power-up activation/expiration state machine.
///
/// One record per kind: `Inactive → Active(expiry) → Inactive`.  Timed kinds
/// expire on the per-frame sweep; the shield is `Active(Permanent)` and only
/// leaves via `break_shield`; bombs are a countable resource that survives a
/// game reset.  All time comparisons use the single frozen per-frame clock
/// value the simulation passes in, never a wall-clock read of their own.

use crate::entities::FireMode;

/// Seconds a timed power-up stays active after collection.  Collecting the
/// same kind again restarts the window.
pub const POWER_UP_DURATION: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PowerUpKind {
    /// Shortens the fire cooldown.
    RapidFire,
    /// Fires three projectiles per shot.
    TripleShot,
    /// Raises player movement speed.
    SpeedBoost,
    /// Doubles all score awards.
    DoubleScore,
    /// Projectiles pass through targets and keep testing.
    Pierce,
    /// Projectiles split into a fan of three on impact.
    Split,
    /// Projectiles arc to nearby targets on impact.
    Chain,
    /// Absorbs one hostile hit; permanent until broken.
    Shield,
    /// One screen-clearing charge per pickup; charges are kept across resets.
    Bomb,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 9] = [
        PowerUpKind::RapidFire,
        PowerUpKind::TripleShot,
        PowerUpKind::SpeedBoost,
        PowerUpKind::DoubleScore,
        PowerUpKind::Pierce,
        PowerUpKind::Split,
        PowerUpKind::Chain,
        PowerUpKind::Shield,
        PowerUpKind::Bomb,
    ];

    fn idx(self) -> usize {
        match self {
            PowerUpKind::RapidFire => 0,
            PowerUpKind::TripleShot => 1,
            PowerUpKind::SpeedBoost => 2,
            PowerUpKind::DoubleScore => 3,
            PowerUpKind::Pierce => 4,
            PowerUpKind::Split => 5,
            PowerUpKind::Chain => 6,
            PowerUpKind::Shield => 7,
            PowerUpKind::Bomb => 8,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expiry {
    /// Active while `now < timestamp`.
    At(f64),
    /// Active until explicitly deactivated.
    Permanent,
}

pub struct PowerUps {
    /// `None` = inactive.  Indexed by `PowerUpKind::idx`.
    expires: [Option<Expiry>; 9],
    bombs: u32,
}

impl PowerUps {
    pub fn new() -> Self {
        Self {
            expires: [None; 9],
            bombs: 0,
        }
    }

    /// Collection transition: activate (or extend) the kind.  Bombs add a
    /// charge instead of toggling a record.
    pub fn collect(&mut self, kind: PowerUpKind, now: f64) {
        match kind {
            PowerUpKind::Bomb => self.bombs += 1,
            PowerUpKind::Shield => self.expires[kind.idx()] = Some(Expiry::Permanent),
            _ => self.expires[kind.idx()] = Some(Expiry::At(now + POWER_UP_DURATION)),
        }
    }

    /// Active over the half-open window: a kind collected at T with duration
    /// D is active for T ≤ now < T+D.
    pub fn is_active(&self, kind: PowerUpKind, now: f64) -> bool {
        if kind == PowerUpKind::Bomb {
            return self.bombs > 0;
        }
        match self.expires[kind.idx()] {
            Some(Expiry::Permanent) => true,
            Some(Expiry::At(t)) => t > now,
            None => false,
        }
    }

    /// Seconds left on a timed kind, for HUD display.  `None` for inactive
    /// or permanent records.
    pub fn remaining(&self, kind: PowerUpKind, now: f64) -> Option<f64> {
        match self.expires.get(kind.idx())? {
            Some(Expiry::At(t)) if *t > now => Some(t - now),
            _ => None,
        }
    }

    /// Per-frame sweep: deactivate every timed record whose window has
    /// closed, returning the kinds that expired so the caller can emit
    /// their deactivation effects.
    pub fn sweep(&mut self, now: f64) -> Vec<PowerUpKind> {
        let mut expired = Vec::new();
        for kind in PowerUpKind::ALL {
            if let Some(Expiry::At(t)) = self.expires[kind.idx()] {
                if now >= t {
                    self.expires[kind.idx()] = None;
                    expired.push(kind);
                }
            }
        }
        expired
    }

    /// Explicit shield deactivation (one hostile hit absorbed).  Returns
    /// whether a shield was up.
    pub fn break_shield(&mut self) -> bool {
        let idx = PowerUpKind::Shield.idx();
        let up = self.expires[idx].is_some();
        self.expires[idx] = None;
        up
    }

    pub fn bombs(&self) -> u32 {
        self.bombs
    }

    /// Consume one bomb charge, if any.
    pub fn spend_bomb(&mut self) -> bool {
        if self.bombs == 0 {
            return false;
        }
        self.bombs -= 1;
        true
    }

    /// Projectile special behavior for the current shot.  When several
    /// modifier kinds are active at once, the fixed precedence order is
    /// Chain > Split > Pierce.
    pub fn fire_mode(&self, now: f64) -> FireMode {
        if self.is_active(PowerUpKind::Chain, now) {
            FireMode::Chain
        } else if self.is_active(PowerUpKind::Split, now) {
            FireMode::Split
        } else if self.is_active(PowerUpKind::Pierce, now) {
            FireMode::Pierce
        } else {
            FireMode::Normal
        }
    }

    /// Multiplier applied to every score award.
    pub fn score_multiplier(&self, now: f64) -> u32 {
        if self.is_active(PowerUpKind::DoubleScore, now) {
            2
        } else {
            1
        }
    }

    /// New-game transition: everything back to inactive except the countable
    /// bomb charges, which persist across rounds.
    pub fn reset(&mut self) {
        self.expires = [None; 9];
    }
}

impl Default for PowerUps {
    fn default() -> Self {
        Self::new()
    }
}
