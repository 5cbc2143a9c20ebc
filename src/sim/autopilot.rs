//! Idle/demo mode - the game flaps for itself
//!
//! Aims the bird's center a little below the middle of the next gap and flaps
//! whenever it sinks past that line while falling.

use super::state::{GamePhase, GameState, Obstacle};
use crate::consts::*;

/// How far below the gap center the bird may sink before flapping
const FLAP_MARGIN: f32 = 18.0;

/// The first pipe the bird has not fully cleared yet
pub fn next_obstacle(state: &GameState) -> Option<&Obstacle> {
    state
        .obstacles
        .iter()
        .find(|o| o.trailing_edge() > BIRD_X + HITBOX_INSET)
}

/// Vertical line the autopilot steers the bird's center toward
pub fn target_y(state: &GameState) -> f32 {
    match next_obstacle(state) {
        Some(o) => o.gap_top + GAP_SIZE / 2.0,
        None => BIRD_START_Y + BIRD_SIZE / 2.0,
    }
}

/// Decide whether to issue an activate action this tick
pub fn should_flap(state: &GameState) -> bool {
    if state.phase != GamePhase::Playing {
        return false;
    }
    let bird = &state.bird;
    let center = bird.y + BIRD_SIZE / 2.0;
    // Never flap into the ceiling
    if bird.y < -JUMP_VELOCITY * 2.0 {
        return false;
    }
    bird.vel >= 0.0 && center > target_y(state) + FLAP_MARGIN
}
