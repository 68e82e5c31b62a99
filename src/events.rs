/// Boundary events emitted during a step, drained once per frame by the
/// host.  An audio collaborator turns them into sound using the pitch and
/// duration hints; a host with no audio backend just drops them — the
/// simulation never blocks on, or even notices, what happens to the queue.

use crate::powerups::PowerUpKind;

#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ShotFired,
    TargetDestroyed { x: f32, y: f32, points: u32 },
    /// A hit soaked by target armor — the target survives.
    ArmorDinged { x: f32, y: f32 },
    ChainStrike { x: f32, y: f32, points: u32 },
    PlayerHit { lives_left: u32 },
    ShieldBroken,
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    BombDetonated { destroyed: u32 },
    WaveCleared { wave: u32 },
    GameOver { score: u32 },
}

impl GameEvent {
    /// Suggested pitch in Hz for an audio backend.
    pub fn pitch_hint(&self) -> f32 {
        match self {
            GameEvent::ShotFired => 880.0,
            GameEvent::TargetDestroyed { points, .. } => 220.0 + (*points as f32).min(900.0),
            GameEvent::ArmorDinged { .. } => 160.0,
            GameEvent::ChainStrike { .. } => 1320.0,
            GameEvent::PlayerHit { .. } => 110.0,
            GameEvent::ShieldBroken => 330.0,
            GameEvent::PowerUpCollected { .. } => 990.0,
            GameEvent::PowerUpExpired { .. } => 440.0,
            GameEvent::BombDetonated { .. } => 55.0,
            GameEvent::WaveCleared { .. } => 660.0,
            GameEvent::GameOver { .. } => 82.0,
        }
    }

    /// Suggested note length in seconds.
    pub fn duration_hint(&self) -> f32 {
        match self {
            GameEvent::ShotFired | GameEvent::ChainStrike { .. } => 0.05,
            GameEvent::ArmorDinged { .. } => 0.08,
            GameEvent::TargetDestroyed { .. } => 0.12,
            GameEvent::PowerUpCollected { .. } | GameEvent::PowerUpExpired { .. } => 0.15,
            GameEvent::PlayerHit { .. } | GameEvent::ShieldBroken => 0.25,
            GameEvent::BombDetonated { .. } => 0.5,
            GameEvent::WaveCleared { .. } => 0.4,
            GameEvent::GameOver { .. } => 1.0,
        }
    }
}
