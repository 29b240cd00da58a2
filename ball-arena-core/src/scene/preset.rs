//! Ready-made arenas.

use std::f32::consts::PI;

use cgmath::{vec2, Angle, Rad};
use rand::Rng;

use crate::scene::{Ball, Scene, Wall};
use crate::Vec2;

const ARENA_SIZE: f32 = 100.0;
const RANDOM_WALL_LENGTH: f32 = 40.0;

fn arena() -> Scene {
    let mut scene = Scene::new();
    scene.create_box(vec2(0.0, 0.0), vec2(ARENA_SIZE, ARENA_SIZE));
    scene
}

/// A 50x50 box with a slow ball in the middle.
pub fn test_scene() -> Scene {
    let mut scene = Scene::new();
    scene.create_box(vec2(0.0, 0.0), vec2(50.0, 50.0));
    scene.insert_ball(Ball::new(vec2(25.0, 25.0), 5.0, vec2(2.0, 1.5)));
    scene
}

/// A 100x100 box with a resting ball of radius 3 at its center.
pub fn console_scene() -> Scene {
    bouncing_scene(vec2(0.0, 0.0))
}

/// An empty 100x100 box.
pub fn arena_scene() -> Scene {
    arena()
}

/// A 100x100 box with one extra 40-unit wall. The wall starts somewhere in `[25, 75]` on both
/// axes and points in a uniformly random direction.
pub fn random_wall_scene(rng: &mut impl Rng) -> Scene {
    let mut scene = arena();
    let start = vec2(rng.gen_range(25.0..75.0), rng.gen_range(25.0..75.0));
    let angle = Rad(rng.gen_range(0.0..2.0 * PI));
    let end = start + vec2(angle.cos(), angle.sin()) * RANDOM_WALL_LENGTH;
    scene.add_wall(Wall::new(start, end));
    scene
}

/// A 100x100 box with a ball of radius 3 at its center moving at `velocity`.
pub fn bouncing_scene(velocity: Vec2) -> Scene {
    let mut scene = arena();
    scene.insert_ball(Ball::new(vec2(50.0, 50.0), 3.0, velocity));
    scene
}
