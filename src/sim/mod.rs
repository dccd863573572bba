//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay deterministic:
//! - Time only from the caller-supplied monotonic timestamp
//! - Randomness only from the caller-supplied RNG
//! - Stable iteration order (Red before Blue)
//! - No rendering or platform dependencies

pub mod collision;
pub mod state;
pub mod tick;

pub use collision::{Aabb, Clash, resolve_clash};
pub use state::{Ball, GameEvent, GameState, Particle, PowerUp, PowerUpKind, Side};
pub use tick::{spawn_burst, tick};
