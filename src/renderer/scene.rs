//! Scene assembly: turns a read-only view of the game into triangles

use glam::Vec2;

use super::shapes::{circle, rect, rotated_rect};
use super::vertex::{Vertex, colors};
use crate::consts::*;
use crate::game::Game;
use crate::ground_y;
use crate::sim::{Bird, GamePhase, Obstacle};

/// Cap overhang on each side of a pipe
const CAP_OVERHANG: f32 = 4.0;
const CAP_HEIGHT: f32 = 24.0;
const GRASS_HEIGHT: f32 = 16.0;

/// Build the full frame for the current game state
pub fn build(game: &Game) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity(512);

    clouds(&mut vertices);
    for obstacle in game.obstacles() {
        pipe_pair(&mut vertices, obstacle);
    }
    ground(&mut vertices);
    bird(&mut vertices, game.bird());

    if game.phase() != GamePhase::Playing {
        vertices.extend(rect(
            Vec2::ZERO,
            Vec2::new(PLAYFIELD_WIDTH, PLAYFIELD_HEIGHT),
            colors::OVERLAY,
        ));
    }

    vertices
}

fn clouds(out: &mut Vec<Vertex>) {
    for (x, y, r) in [(90.0, 380.0, 26.0), (120.0, 372.0, 20.0), (290.0, 410.0, 22.0)] {
        out.extend(circle(Vec2::new(x, y), r, colors::CLOUD, 16));
    }
}

/// Top and bottom pipe with caps at the gap
pub fn pipe_pair(out: &mut Vec<Vertex>, obstacle: &Obstacle) {
    let x = obstacle.x;
    let top = obstacle.gap_top;
    let bottom = obstacle.gap_bottom();

    out.extend(rect(
        Vec2::new(x, 0.0),
        Vec2::new(OBSTACLE_WIDTH, top),
        colors::PIPE,
    ));
    out.extend(rect(
        Vec2::new(x - CAP_OVERHANG, top - CAP_HEIGHT),
        Vec2::new(OBSTACLE_WIDTH + 2.0 * CAP_OVERHANG, CAP_HEIGHT),
        colors::PIPE_CAP,
    ));

    out.extend(rect(
        Vec2::new(x, bottom),
        Vec2::new(OBSTACLE_WIDTH, ground_y() - bottom),
        colors::PIPE,
    ));
    out.extend(rect(
        Vec2::new(x - CAP_OVERHANG, bottom),
        Vec2::new(OBSTACLE_WIDTH + 2.0 * CAP_OVERHANG, CAP_HEIGHT),
        colors::PIPE_CAP,
    ));
}

fn ground(out: &mut Vec<Vertex>) {
    let top = ground_y();
    out.extend(rect(
        Vec2::new(0.0, top),
        Vec2::new(PLAYFIELD_WIDTH, GROUND_HEIGHT),
        colors::GROUND,
    ));
    out.extend(rect(
        Vec2::new(0.0, top),
        Vec2::new(PLAYFIELD_WIDTH, GRASS_HEIGHT),
        colors::GRASS,
    ));
}

/// Bird body with wing, eye and beak, all tilted around its center
pub fn bird(out: &mut Vec<Vertex>, bird: &Bird) {
    let half = BIRD_SIZE / 2.0;
    let center = Vec2::new(BIRD_X + half, bird.y + half);
    let tilt = bird.tilt;

    let mut part = |offset: Vec2, size: Vec2, color| {
        out.extend(rotated_rect(center, offset, size, tilt, color));
    };
    part(Vec2::splat(-half), Vec2::splat(BIRD_SIZE), colors::BIRD);
    part(Vec2::new(-half + 3.0, 1.0), Vec2::new(14.0, 9.0), colors::BIRD_WING);
    part(Vec2::new(3.0, -half + 5.0), Vec2::new(10.0, 10.0), colors::BIRD_EYE);
    part(Vec2::new(8.0, -half + 8.0), Vec2::new(4.0, 4.0), colors::BIRD_PUPIL);
    part(Vec2::new(half - 2.0, -2.0), Vec2::new(10.0, 8.0), colors::BIRD_BEAK);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipe_pair_spans_to_ground() {
        let mut out = Vec::new();
        pipe_pair(&mut out, &Obstacle::new(1, 100.0, 120.0));
        assert_eq!(out.len(), 24);

        let lowest = out
            .iter()
            .map(|v| v.position[1])
            .fold(f32::MIN, f32::max);
        assert_eq!(lowest, ground_y());
    }

    #[test]
    fn test_overlay_only_when_not_playing() {
        let mut game = Game::new(1);
        let idle = build(&game);

        game.activate(0.0);
        let playing = build(&game);

        // Same scene minus the six overlay vertices
        assert_eq!(idle.len(), playing.len() + 6);
        assert_eq!(idle.last().map(|v| v.color), Some(colors::OVERLAY));
    }

    #[test]
    fn test_level_bird_is_axis_aligned() {
        let mut out = Vec::new();
        bird(&mut out, &Bird::default());
        assert_eq!(out[0].position, [BIRD_X, BIRD_START_Y]);
    }
}
