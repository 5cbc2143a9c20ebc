//! Pipe spawn policy

use rand::Rng;

use super::state::{GameState, Obstacle};
use crate::consts::*;

/// Spawn once strictly more than one interval has elapsed since the last one
pub fn spawn_due(now_ms: f64, last_spawn_ms: f64) -> bool {
    now_ms - last_spawn_ms > SPAWN_INTERVAL_MS
}

/// Pick the top edge of a new gap, uniform over `[MIN_GAP_TOP, MAX_GAP_TOP]`
pub fn roll_gap_top<R: Rng>(rng: &mut R) -> f32 {
    rng.random_range(MIN_GAP_TOP..=MAX_GAP_TOP)
}

/// Append a pipe at the right edge and restart the spawn timer.
/// Returns the new pipe's ID.
pub fn spawn_obstacle<R: Rng>(state: &mut GameState, now_ms: f64, rng: &mut R) -> u32 {
    let id = state.next_entity_id();
    let gap_top = roll_gap_top(rng);
    state
        .obstacles
        .push(Obstacle::new(id, PLAYFIELD_WIDTH, gap_top));
    state.last_spawn_ms = now_ms;
    log::trace!("Spawned pipe {} with gap at {:.1}", id, gap_top);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_spawn_due_is_strict() {
        assert!(!spawn_due(1500.0, 0.0));
        assert!(spawn_due(1500.5, 0.0));
        assert!(!spawn_due(2000.0, 1000.0));
    }

    #[test]
    fn test_gap_fits_above_ground() {
        assert_eq!(MAX_GAP_TOP, 290.0);
        assert!(MAX_GAP_TOP + GAP_SIZE < crate::ground_y());
    }

    #[test]
    fn test_spawn_obstacle() {
        let mut state = GameState::new();
        let mut rng = Pcg32::seed_from_u64(7);

        let a = spawn_obstacle(&mut state, 1600.0, &mut rng);
        let b = spawn_obstacle(&mut state, 3200.0, &mut rng);

        assert!(b > a);
        assert_eq!(state.obstacles.len(), 2);
        assert_eq!(state.obstacles[0].x, PLAYFIELD_WIDTH);
        assert!(!state.obstacles[0].passed);
        assert_eq!(state.last_spawn_ms, 3200.0);
    }

    #[test]
    fn test_same_seed_same_gaps() {
        let mut rng1 = Pcg32::seed_from_u64(42);
        let mut rng2 = Pcg32::seed_from_u64(42);
        for _ in 0..10 {
            assert_eq!(roll_gap_top(&mut rng1), roll_gap_top(&mut rng2));
        }
    }

    proptest! {
        #[test]
        fn gap_top_in_range(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            for _ in 0..32 {
                let top = roll_gap_top(&mut rng);
                prop_assert!((MIN_GAP_TOP..=MAX_GAP_TOP).contains(&top));
            }
        }
    }
}
