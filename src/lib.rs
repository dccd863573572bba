//! Blade Balls - a two-ball duel in a walled arena
//!
//! Core modules:
//! - `sim`: Deterministic simulation (motion, collisions, power-ups, particles)
//! - `renderer`: Draws a game state onto any `Surface`
//! - `platform`: Clock, input and drawing-surface abstractions
//! - `runner`: The fixed-rate frame loop tying it all together
//! - `settings`: Run/presentation options

pub mod platform;
pub mod renderer;
pub mod runner;
pub mod settings;
pub mod sim;

pub use runner::{RunOutcome, RunSummary, Runner};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    use std::time::Duration;

    /// Arena dimensions (logical units)
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// Target frame rate of the loop
    pub const TARGET_FPS: u32 = 60;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 30.0;
    /// Per-axis speed in units per frame
    pub const BALL_SPEED: f32 = 4.0;
    pub const STARTING_HEALTH: i32 = 3;
    pub const RED_START: (f32, f32) = (100.0, 100.0);
    pub const BLUE_START: (f32, f32) = (700.0, 500.0);

    /// Blade stays armed this long unless consumed by a hit
    pub const BLADE_DURATION: Duration = Duration::from_secs(5);

    /// Power-up box edge length
    pub const POWERUP_SIZE: f32 = 30.0;
    /// At most one spawn roll per interval
    pub const POWERUP_SPAWN_INTERVAL: Duration = Duration::from_secs(1);
    pub const POWERUP_SPAWN_CHANCE: f64 = 0.32;

    /// Death burst
    pub const PARTICLE_BURST_COUNT: usize = 40;
    pub const PARTICLE_LIFE: u32 = 60;
    pub const PARTICLE_MIN_SPEED: f32 = 3.0;
    pub const PARTICLE_MAX_SPEED: f32 = 7.0;
    pub const PARTICLE_MIN_RADIUS: u32 = 2;
    pub const PARTICLE_MAX_RADIUS: u32 = 5;

    /// How long the winner banner stays up before exit
    pub const WIN_MESSAGE_HOLD: Duration = Duration::from_secs(3);

    /// Blade rings drawn around an armed ball
    pub const BLADE_RING_COUNT: u32 = 3;
    pub const BLADE_RING_OFFSET: f32 = 3.0;
    pub const BLADE_RING_WIDTH: f32 = 2.0;
}

/// RGB colour used by the drawing surface
pub type Color = [u8; 3];

/// Palette
pub mod colors {
    use super::Color;

    pub const WHITE: Color = [255, 255, 255];
    pub const BLACK: Color = [0, 0, 0];
    pub const RED: Color = [255, 0, 0];
    pub const BLUE: Color = [0, 0, 255];
    pub const GREEN: Color = [0, 255, 0];
    pub const YELLOW: Color = [255, 255, 0];
    pub const ORANGE: Color = [255, 165, 0];
}
