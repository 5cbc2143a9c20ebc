//! Collision detection for the bird against pipes and playfield bounds
//!
//! Everything is axis-aligned: the bird is a shrunk square hitbox, each pipe
//! pair is a column with a passable gap.

use glam::Vec2;

use super::state::Obstacle;
use crate::consts::*;
use crate::ground_y;

/// Axis-aligned bounding box (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Strict overlap with the horizontal span `[x, x + width]`
    pub fn overlaps_column(&self, x: f32, width: f32) -> bool {
        self.max.x > x && self.min.x < x + width
    }
}

/// The bird's forgiving hitbox at vertical position `y`
pub fn bird_hitbox(y: f32) -> Aabb {
    Aabb::new(
        Vec2::new(BIRD_X + HITBOX_INSET, y + HITBOX_INSET),
        Vec2::new(BIRD_X + BIRD_SIZE - HITBOX_INSET, y + BIRD_SIZE - HITBOX_INSET),
    )
}

/// Check whether the hitbox touches either pipe of a pair
///
/// Touching the gap edge exactly is not a hit.
pub fn hits_obstacle(hitbox: &Aabb, obstacle: &Obstacle) -> bool {
    if !hitbox.overlaps_column(obstacle.x, OBSTACLE_WIDTH) {
        return false;
    }
    let in_top_pipe = hitbox.min.y < obstacle.gap_top;
    let in_bottom_pipe = hitbox.max.y > obstacle.gap_bottom();
    in_top_pipe || in_bottom_pipe
}

/// Check if the bird (unshrunk) touched the ground or left through the top
pub fn out_of_bounds(y: f32) -> bool {
    y + BIRD_SIZE >= ground_y() || y <= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A pipe whose column sits right over the bird
    fn pipe_over_bird(gap_top: f32) -> Obstacle {
        Obstacle::new(1, BIRD_X, gap_top)
    }

    #[test]
    fn test_hitbox_is_inset() {
        let hitbox = bird_hitbox(100.0);
        assert_eq!(hitbox.min, Vec2::new(55.0, 105.0));
        assert_eq!(hitbox.max, Vec2::new(79.0, 129.0));
    }

    #[test]
    fn test_top_edge_boundary() {
        let pipe = pipe_over_bird(200.0);

        // Hitbox top exactly on the gap top: clear
        let y = 200.0 - HITBOX_INSET;
        assert!(!hits_obstacle(&bird_hitbox(y), &pipe));

        // One unit into the top pipe
        assert!(hits_obstacle(&bird_hitbox(y - 1.0), &pipe));
    }

    #[test]
    fn test_bottom_edge_boundary() {
        let pipe = pipe_over_bird(200.0);

        // Hitbox bottom exactly on the gap bottom: clear
        let y = pipe.gap_bottom() - BIRD_SIZE + HITBOX_INSET;
        assert!(!hits_obstacle(&bird_hitbox(y), &pipe));

        // One unit into the bottom pipe
        assert!(hits_obstacle(&bird_hitbox(y + 1.0), &pipe));
    }

    #[test]
    fn test_no_hit_without_horizontal_overlap() {
        let hitbox = bird_hitbox(0.0);
        // Hitbox spans x 55..79. Pipe starting exactly at its right edge misses
        let pipe = Obstacle::new(1, 79.0, 300.0);
        assert!(!hits_obstacle(&hitbox, &pipe));

        // Pipe ending exactly at its left edge misses
        let pipe = Obstacle::new(1, 55.0 - OBSTACLE_WIDTH, 300.0);
        assert!(!hits_obstacle(&hitbox, &pipe));

        // Nudge into the column and it hits
        let pipe = Obstacle::new(1, 78.0, 300.0);
        assert!(hits_obstacle(&hitbox, &pipe));
    }

    #[test]
    fn test_out_of_bounds() {
        let floor = ground_y() - BIRD_SIZE;
        assert!(!out_of_bounds(floor - 0.1));
        assert!(out_of_bounds(floor));
        assert!(!out_of_bounds(0.1));
        assert!(out_of_bounds(0.0));
        assert!(out_of_bounds(-5.0));
    }
}
