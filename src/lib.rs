//! Fixed-step 2D arcade-shooter simulation core.
//!
//! The library owns the entity lifecycle and interaction engine — pooled
//! entities, a per-frame uniform spatial grid, the power-up state machine,
//! collision resolution with piercing/splitting/chaining projectiles, and
//! the fixed-cadence step that orders them.  Input capture, rendering and
//! audio are external collaborators wired up by the binary.

pub mod collision;
pub mod display;
pub mod entities;
pub mod events;
pub mod grid;
pub mod pool;
pub mod powerups;
pub mod sim;
