//! Game state and core simulation types
//!
//! Everything one tick reads or writes lives in [`GameState`].

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::tilt_for_velocity;

/// Current phase of the game lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, waiting for the first activation
    #[default]
    Start,
    /// Physics running
    Playing,
    /// Run ended, waiting for a restart
    GameOver,
}

/// The player's bird
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bird {
    /// Top edge of the bird (pixels from the top of the playfield)
    pub y: f32,
    /// Vertical velocity in pixels per tick (positive = falling)
    pub vel: f32,
    /// Rotation in degrees, derived from velocity
    pub tilt: f32,
}

impl Default for Bird {
    fn default() -> Self {
        Self {
            y: BIRD_START_Y,
            vel: 0.0,
            tilt: 0.0,
        }
    }
}

impl Bird {
    /// Advance one tick.
    ///
    /// Position moves by the velocity from *before* gravity is applied, so a
    /// flap shows up one tick after it lands in `vel`.
    pub fn integrate(&mut self) {
        let next_vel = self.vel + GRAVITY;
        self.y += self.vel;
        self.vel = next_vel;
        self.tilt = tilt_for_velocity(next_vel);
    }

    /// Upward impulse. Replaces the current velocity.
    pub fn flap(&mut self) {
        self.vel = JUMP_VELOCITY;
    }

    /// Bottom edge of the bird
    pub fn bottom(&self) -> f32 {
        self.y + BIRD_SIZE
    }
}

/// A pipe pair with a gap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge of the pipe column
    pub x: f32,
    /// Height of the top pipe, i.e. where the gap begins
    pub gap_top: f32,
    /// Set once the bird has cleared this pipe
    pub passed: bool,
}

impl Obstacle {
    pub fn new(id: u32, x: f32, gap_top: f32) -> Self {
        Self {
            id,
            x,
            gap_top,
            passed: false,
        }
    }

    /// Bottom of the gap (top edge of the lower pipe)
    pub fn gap_bottom(&self) -> f32 {
        self.gap_top + GAP_SIZE
    }

    /// Right edge of the pipe column
    pub fn trailing_edge(&self) -> f32 {
        self.x + OBSTACLE_WIDTH
    }

    /// Fully scrolled past the left side of the playfield
    pub fn is_off_screen(&self) -> bool {
        self.x < -OBSTACLE_WIDTH
    }

    /// Mark as passed if the bird's reference point is beyond the trailing
    /// edge. Returns true only on the tick the flag flips.
    pub fn try_pass(&mut self) -> bool {
        if !self.passed && self.trailing_edge() < BIRD_X {
            self.passed = true;
            return true;
        }
        false
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    /// Hit the ground or flew off the top
    OutOfBounds,
    /// Hit a pipe
    Obstacle { id: u32 },
}

/// Things that happened during a tick, for HUD/audio/log consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A pipe was cleared; `score` is the new total
    Passed { id: u32, score: u32 },
    /// A new pipe entered on the right edge
    Spawned { id: u32 },
    /// The run is over
    Crashed(CrashCause),
}

/// Complete per-session world state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    pub bird: Bird,
    /// Active pipes in spawn order (oldest first)
    pub obstacles: Vec<Obstacle>,
    /// Pipes cleared this run
    pub score: u32,
    /// In-game clock reading of the last spawn (ms)
    pub last_spawn_ms: f64,
    /// Simulation tick counter for this run
    pub time_ticks: u64,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self {
            phase: GamePhase::Start,
            bird: Bird::default(),
            obstacles: Vec::new(),
            score: 0,
            last_spawn_ms: 0.0,
            time_ticks: 0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    ///
    /// IDs keep increasing across runs so render keys never repeat. After
    /// `u32::MAX` they wrap around; by then the early pipes are long gone.
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Reset the world for a fresh run starting at `now_ms`
    pub fn reset(&mut self, now_ms: f64) {
        self.phase = GamePhase::Playing;
        self.bird = Bird::default();
        self.obstacles.clear();
        self.score = 0;
        self.last_spawn_ms = now_ms;
        self.time_ticks = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_integrate_uses_pre_gravity_velocity() {
        let mut bird = Bird::default();
        bird.integrate();
        assert_eq!(bird.y, 250.0);
        assert_eq!(bird.vel, 0.6);

        bird.integrate();
        assert!((bird.y - 250.6).abs() < 1e-4);
        assert!((bird.vel - 1.2).abs() < 1e-4);
    }

    #[test]
    fn test_flap_applies_next_tick() {
        let mut bird = Bird::default();
        bird.flap();
        assert_eq!(bird.y, 250.0);
        assert_eq!(bird.vel, JUMP_VELOCITY);

        bird.integrate();
        assert_eq!(bird.y, 242.0);
        assert!((bird.vel - -7.4).abs() < 1e-4);
        assert_eq!(bird.tilt, -20.0);
    }

    #[test]
    fn test_tilt_extremes() {
        let mut bird = Bird {
            y: 250.0,
            vel: 1000.0,
            tilt: 0.0,
        };
        bird.integrate();
        assert_eq!(bird.tilt, 90.0);

        bird.vel = -1000.0;
        bird.integrate();
        assert_eq!(bird.tilt, -20.0);
    }

    #[test]
    fn test_pass_flips_once() {
        let mut pipe = Obstacle::new(1, BIRD_X - OBSTACLE_WIDTH, 100.0);
        // Trailing edge exactly at the bird: not yet passed
        assert!(!pipe.try_pass());

        pipe.x -= 0.5;
        assert!(pipe.try_pass());
        assert!(pipe.passed);

        pipe.x -= 10.0;
        assert!(!pipe.try_pass());
    }

    #[test]
    fn test_off_screen_is_strict() {
        let mut pipe = Obstacle::new(1, -OBSTACLE_WIDTH, 100.0);
        assert!(!pipe.is_off_screen());
        pipe.x -= 0.01;
        assert!(pipe.is_off_screen());
    }

    #[test]
    fn test_reset_keeps_ids_monotonic() {
        let mut state = GameState::new();
        let first = state.next_entity_id();
        state.reset(1000.0);
        let second = state.next_entity_id();
        assert!(second > first);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.last_spawn_ms, 1000.0);
    }

    #[test]
    fn test_entity_ids_wrap_instead_of_overflowing() {
        let mut state = GameState::new();
        state.next_id = u32::MAX;
        assert_eq!(state.next_entity_id(), u32::MAX);
        assert_eq!(state.next_entity_id(), 0);
    }

    proptest! {
        #[test]
        fn tilt_stays_clamped(vel in -1.0e6f32..1.0e6f32) {
            let mut bird = Bird { y: 250.0, vel, tilt: 0.0 };
            bird.integrate();
            prop_assert!(bird.tilt >= MIN_TILT && bird.tilt <= MAX_TILT);
        }
    }
}
