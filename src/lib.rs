//! Gemini Flappy - A Flappy Bird clone with AI game-over commentary
//!
//! Core modules:
//! - `sim`: Deterministic simulation (bird physics, pipes, collisions, scoring)
//! - `game`: Lifecycle controller (start / playing / game over)
//! - `commentary`: Game-over commentary requests and session guarding
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Driver preferences

pub mod commentary;
pub mod game;
pub mod highscores;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use highscores::BestScore;
pub use settings::Settings;

/// Game configuration constants
///
/// Physics values are expressed per simulation tick, not per second.
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the cadence the physics was tuned at)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Length of one simulation tick on the in-game clock
    pub const TICK_MS: f64 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Playfield dimensions (y grows downward)
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;
    pub const GROUND_HEIGHT: f32 = 100.0;

    /// Bird defaults
    pub const BIRD_SIZE: f32 = 34.0;
    /// Fixed horizontal position of the bird's left edge
    pub const BIRD_X: f32 = 50.0;
    pub const BIRD_START_Y: f32 = 250.0;
    /// Hitbox shrink on every side, forgives near misses
    pub const HITBOX_INSET: f32 = 5.0;

    /// Downward acceleration added to velocity every tick
    pub const GRAVITY: f32 = 0.6;
    /// Velocity set by a flap (negative = up)
    pub const JUMP_VELOCITY: f32 = -8.0;

    /// Tilt (degrees) per unit of velocity, and its limits
    pub const TILT_PER_VELOCITY: f32 = 4.0;
    pub const MIN_TILT: f32 = -20.0;
    pub const MAX_TILT: f32 = 90.0;

    /// Pipe defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const GAP_SIZE: f32 = 160.0;
    pub const OBSTACLE_SPEED: f32 = 3.5;
    pub const SPAWN_INTERVAL_MS: f64 = 1500.0;

    /// Range of the gap's top edge for new pipes
    pub const MIN_GAP_TOP: f32 = 50.0;
    pub const MAX_GAP_TOP: f32 = PLAYFIELD_HEIGHT - GROUND_HEIGHT - GAP_SIZE - MIN_GAP_TOP;
}

/// Y coordinate of the ground's top edge
#[inline]
pub fn ground_y() -> f32 {
    consts::PLAYFIELD_HEIGHT - consts::GROUND_HEIGHT
}

/// Bird tilt in degrees for a given vertical velocity
#[inline]
pub fn tilt_for_velocity(velocity: f32) -> f32 {
    (velocity * consts::TILT_PER_VELOCITY).clamp(consts::MIN_TILT, consts::MAX_TILT)
}
