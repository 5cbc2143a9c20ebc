//! Per-tick world update
//!
//! Advances bird, pipes, score and spawns by one fixed step. Does not change
//! the lifecycle phase itself; a crash is reported back to the caller.

use rand::Rng;

use super::collision::{bird_hitbox, hits_obstacle, out_of_bounds};
use super::spawn::{spawn_due, spawn_obstacle};
use super::state::{CrashCause, GameEvent, GamePhase, GameState};
use crate::consts::*;

/// What a single tick produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOutcome {
    pub events: Vec<GameEvent>,
    /// Set when the run must end after this tick
    pub crash: Option<CrashCause>,
}

impl TickOutcome {
    pub fn crashed(&self) -> bool {
        self.crash.is_some()
    }
}

/// Advance the world by one tick at in-game clock reading `now_ms`
///
/// Only runs while playing. On a crash the advanced state is kept so the
/// final frame can still be drawn.
pub fn tick<R: Rng>(state: &mut GameState, now_ms: f64, rng: &mut R) -> TickOutcome {
    let mut outcome = TickOutcome::default();
    if state.phase != GamePhase::Playing {
        return outcome;
    }

    state.time_ticks += 1;

    // Bird
    state.bird.integrate();
    if out_of_bounds(state.bird.y) {
        outcome.crash = Some(CrashCause::OutOfBounds);
    }

    // Scroll pipes and drop the ones that left the screen
    for obstacle in &mut state.obstacles {
        obstacle.x -= OBSTACLE_SPEED;
    }
    state.obstacles.retain(|o| !o.is_off_screen());

    // Scoring
    for obstacle in &mut state.obstacles {
        if obstacle.try_pass() {
            state.score += 1;
            outcome.events.push(GameEvent::Passed {
                id: obstacle.id,
                score: state.score,
            });
        }
    }

    if spawn_due(now_ms, state.last_spawn_ms) {
        let id = spawn_obstacle(state, now_ms, rng);
        outcome.events.push(GameEvent::Spawned { id });
    }

    // Pipe collisions use the bird position from this tick
    if outcome.crash.is_none() {
        let hitbox = bird_hitbox(state.bird.y);
        if let Some(hit) = state.obstacles.iter().find(|o| hits_obstacle(&hitbox, o)) {
            outcome.crash = Some(CrashCause::Obstacle { id: hit.id });
        }
    }

    if let Some(cause) = outcome.crash {
        outcome.events.push(GameEvent::Crashed(cause));
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing_state() -> GameState {
        let mut state = GameState::new();
        state.reset(0.0);
        state
    }

    #[test]
    fn test_tick_ignored_outside_playing() {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(1);
        let outcome = tick(&mut state, 10_000.0, &mut rng);

        assert_eq!(outcome, TickOutcome::default());
        assert_eq!(state.time_ticks, 0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.bird.y, BIRD_START_Y);
    }

    #[test]
    fn test_first_tick_from_rest() {
        let mut state = playing_state();
        let mut rng = Pcg32::seed_from_u64(1);
        let outcome = tick(&mut state, TICK_MS, &mut rng);

        assert!(!outcome.crashed());
        assert_eq!(state.bird.y, 250.0);
        assert_eq!(state.bird.vel, 0.6);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_score_increments_on_crossing_tick() {
        let mut state = playing_state();
        let mut rng = Pcg32::seed_from_u64(1);
        // Gap wide around the bird so only scoring matters
        let id = state.next_entity_id();
        // After one step the trailing edge lands at 50.0, after two at 46.5
        state
            .obstacles
            .push(Obstacle::new(id, BIRD_X - OBSTACLE_WIDTH + OBSTACLE_SPEED, 150.0));

        let outcome = tick(&mut state, TICK_MS, &mut rng);
        assert_eq!(state.score, 0);
        assert!(outcome.events.is_empty());

        state.bird.vel = 0.0;
        let outcome = tick(&mut state, TICK_MS * 2.0, &mut rng);
        assert_eq!(state.score, 1);
        assert_eq!(outcome.events, vec![GameEvent::Passed { id, score: 1 }]);

        state.bird.vel = 0.0;
        tick(&mut state, TICK_MS * 3.0, &mut rng);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_pipe_removed_once_past_left_edge() {
        let mut state = playing_state();
        let mut rng = Pcg32::seed_from_u64(1);
        let id = state.next_entity_id();
        // One step lands exactly on -OBSTACLE_WIDTH: kept
        state
            .obstacles
            .push(Obstacle::new(id, -OBSTACLE_WIDTH + OBSTACLE_SPEED, 150.0));

        tick(&mut state, TICK_MS, &mut rng);
        assert_eq!(state.obstacles.len(), 1);
        assert_eq!(state.obstacles[0].x, -OBSTACLE_WIDTH);

        tick(&mut state, TICK_MS * 2.0, &mut rng);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_spawn_cadence() {
        let mut state = playing_state();
        let mut rng = Pcg32::seed_from_u64(99);
        let mut spawn_times = Vec::new();

        // 100 ms clock steps; keep the bird hovering so it never crashes
        for step in 1..=40 {
            state.bird.y = 250.0;
            state.bird.vel = 0.0;
            let now = step as f64 * 100.0;
            let outcome = tick(&mut state, now, &mut rng);
            if outcome
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::Spawned { .. }))
            {
                spawn_times.push(now);
            }
        }

        // First step strictly past each 1500 ms interval
        assert_eq!(spawn_times, vec![1600.0, 3200.0]);
        for obstacle in &state.obstacles {
            assert!((MIN_GAP_TOP..=MAX_GAP_TOP).contains(&obstacle.gap_top));
        }
    }

    #[test]
    fn test_crash_into_ground_still_advances() {
        let mut state = playing_state();
        let mut rng = Pcg32::seed_from_u64(1);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, 300.0, 150.0));
        state.bird.y = crate::ground_y() - BIRD_SIZE - 1.0;
        state.bird.vel = 2.0;

        let outcome = tick(&mut state, TICK_MS, &mut rng);
        assert_eq!(outcome.crash, Some(CrashCause::OutOfBounds));
        assert_eq!(
            outcome.events.last(),
            Some(&GameEvent::Crashed(CrashCause::OutOfBounds))
        );
        assert_eq!(state.obstacles[0].x, 300.0 - OBSTACLE_SPEED);
        // Lifecycle is the controller's job
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_crash_into_pipe_uses_updated_position() {
        let mut state = playing_state();
        let mut rng = Pcg32::seed_from_u64(1);
        let id = state.next_entity_id();
        // Hitbox top sits on the gap top before the tick
        state.obstacles.push(Obstacle::new(id, BIRD_X + OBSTACLE_SPEED, 200.0));
        state.bird.y = 200.0 - HITBOX_INSET;
        state.bird.vel = -1.0;

        let outcome = tick(&mut state, TICK_MS, &mut rng);
        assert_eq!(outcome.crash, Some(CrashCause::Obstacle { id }));
    }

    #[test]
    fn test_determinism() {
        let mut state1 = playing_state();
        let mut state2 = playing_state();
        let mut rng1 = Pcg32::seed_from_u64(12345);
        let mut rng2 = Pcg32::seed_from_u64(12345);

        for step in 1..=200 {
            let now = step as f64 * TICK_MS;
            if step % 12 == 0 {
                state1.bird.flap();
                state2.bird.flap();
            }
            let a = tick(&mut state1, now, &mut rng1);
            let b = tick(&mut state2, now, &mut rng2);
            assert_eq!(a, b);
        }

        assert_eq!(state1.obstacles, state2.obstacles);
        assert_eq!(state1.bird, state2.bird);
    }
}
