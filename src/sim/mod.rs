//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (per-tick constants)
//! - Caller-supplied clock and seeded RNG only
//! - Pipes kept in spawn order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Aabb, bird_hitbox, hits_obstacle, out_of_bounds};
pub use spawn::{roll_gap_top, spawn_due, spawn_obstacle};
pub use state::{Bird, CrashCause, GameEvent, GamePhase, GameState, Obstacle};
pub use tick::{TickOutcome, tick};
