use std::fmt;

use log::warn;

use crate::error::Result;
use crate::shape::Rect;
use crate::Vec2;

mod ball;
pub mod preset;
mod wall;

pub use ball::Ball;
pub use wall::Wall;

/// Identifies a ball or wall within a `Scene`. Allocated by the scene when the object is added;
/// zero is never handed out.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub trait SceneObject {
    fn id(&self) -> ObjectId;

    fn position(&self) -> Vec2;

    /// Advances the object by `dt` seconds when the scene is driven on its own.
    fn update(&mut self, _dt: f32) {}
}

#[derive(Clone, Copy, Debug)]
pub enum ObjectRef<'a> {
    Wall(&'a Wall),
    Ball(&'a Ball),
}

impl<'a> ObjectRef<'a> {
    pub fn as_object(&self) -> &'a dyn SceneObject {
        match *self {
            ObjectRef::Wall(wall) => wall,
            ObjectRef::Ball(ball) => ball,
        }
    }
}

/// The walls and balls of an arena, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    walls: Vec<Wall>,
    balls: Vec<Ball>,
    last_id: u64,
}

impl Scene {
    pub fn new() -> Scene {
        Scene::default()
    }

    fn allocate_id(&mut self) -> ObjectId {
        self.last_id += 1;
        ObjectId(self.last_id)
    }

    pub fn add_wall(&mut self, mut wall: Wall) -> ObjectId {
        let id = self.allocate_id();
        wall.id = id;
        self.walls.push(wall);
        id
    }

    /// Validates `ball` and takes ownership of it.
    pub fn add_ball(&mut self, ball: Ball) -> Result<ObjectId> {
        if let Err(e) = ball.validate() {
            warn!("rejecting {}: {}", ball, e);
            return Err(e);
        }
        Ok(self.insert_ball(ball))
    }

    pub(crate) fn insert_ball(&mut self, mut ball: Ball) -> ObjectId {
        let id = self.allocate_id();
        ball.id = id;
        self.balls.push(ball);
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> bool {
        if let Some(index) = self.walls.iter().position(|wall| wall.id == id) {
            self.walls.remove(index);
            true
        } else if let Some(index) = self.balls.iter().position(|ball| ball.id == id) {
            self.balls.remove(index);
            true
        } else {
            false
        }
    }

    pub fn find(&self, id: ObjectId) -> Option<ObjectRef> {
        self.wall(id)
            .map(ObjectRef::Wall)
            .or_else(|| self.ball(id).map(ObjectRef::Ball))
    }

    pub fn ball(&self, id: ObjectId) -> Option<&Ball> {
        self.balls.iter().find(|ball| ball.id == id)
    }

    pub fn ball_mut(&mut self, id: ObjectId) -> Option<&mut Ball> {
        self.balls.iter_mut().find(|ball| ball.id == id)
    }

    pub fn wall(&self, id: ObjectId) -> Option<&Wall> {
        self.walls.iter().find(|wall| wall.id == id)
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn balls(&self) -> &[Ball] {
        &self.balls
    }

    pub fn first_ball(&self) -> Option<&Ball> {
        self.balls.first()
    }

    pub fn object_count(&self) -> usize {
        self.walls.len() + self.balls.len()
    }

    /// Copies a ball's authoritative state from the simulation into its scene mirror. Returns
    /// false if the ball is no longer in the scene.
    pub fn mirror_ball(&mut self, id: ObjectId, position: Vec2, velocity: Option<Vec2>) -> bool {
        match self.ball_mut(id) {
            Some(ball) => {
                ball.position = position;
                if let Some(velocity) = velocity {
                    ball.velocity = velocity;
                }
                true
            }
            None => false,
        }
    }

    pub fn update(&mut self, dt: f32) {
        for wall in &mut self.walls {
            wall.update(dt);
        }
        for ball in &mut self.balls {
            ball.update(dt);
        }
    }

    pub fn clear(&mut self) {
        self.walls.clear();
        self.balls.clear();
    }

    pub fn clear_balls(&mut self) {
        self.balls.clear();
    }

    /// Adds four walls along the edges of the box spanned by `min` and `max`, wound so that their
    /// normals face inward.
    pub fn create_box(&mut self, min: Vec2, max: Vec2) -> [ObjectId; 4] {
        let [bottom, right, top, left] = Rect::new(min, max).edges();
        [
            self.add_wall(Wall::from_segment(bottom)),
            self.add_wall(Wall::from_segment(right)),
            self.add_wall(Wall::from_segment(top)),
            self.add_wall(Wall::from_segment(left)),
        ]
    }

    pub fn create_ball(&mut self, position: Vec2, radius: f32, velocity: Vec2) -> Result<ObjectId> {
        self.add_ball(Ball::new(position, radius, velocity))
    }
}

impl fmt::Display for Scene {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Scene (objects: {}, walls: {}, balls: {})",
            self.object_count(),
            self.walls.len(),
            self.balls.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use cgmath::vec2;

    use super::*;
    use crate::error::Error;

    #[test]
    fn ids_are_unique_and_nonzero() {
        let mut scene = Scene::new();
        let walls = scene.create_box(vec2(0.0, 0.0), vec2(10.0, 10.0));
        let ball = scene.create_ball(vec2(5.0, 5.0), 1.0, vec2(0.0, 0.0)).unwrap();
        let mut ids = walls.to_vec();
        ids.push(ball);
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 5);
        assert!(ids.iter().all(|id| id.0 != 0));
    }

    #[test]
    fn add_ball_validates() {
        let mut scene = Scene::new();
        assert!(matches!(
            scene.create_ball(vec2(5.0, 5.0), 0.0, vec2(0.0, 0.0)),
            Err(Error::InvalidRadius(_))
        ));
        assert!(matches!(
            scene.add_ball(Ball::new(vec2(5.0, 5.0), 1.0, vec2(0.0, 0.0)).with_mass(-2.0)),
            Err(Error::InvalidMass(_))
        ));
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn find_and_remove() {
        let mut scene = Scene::new();
        let wall = scene.add_wall(Wall::new(vec2(0.0, 0.0), vec2(1.0, 0.0)));
        let ball = scene.create_ball(vec2(5.0, 5.0), 1.0, vec2(1.0, 0.0)).unwrap();
        assert!(matches!(scene.find(wall), Some(ObjectRef::Wall(_))));
        assert!(matches!(scene.find(ball), Some(ObjectRef::Ball(_))));
        assert_eq!(scene.find(ball).unwrap().as_object().position(), vec2(5.0, 5.0));

        assert!(scene.remove(wall));
        assert!(!scene.remove(wall));
        assert!(scene.find(wall).is_none());
        assert_eq!(scene.object_count(), 1);
    }

    #[test]
    fn clear_balls_keeps_walls() {
        let mut scene = Scene::new();
        scene.create_box(vec2(0.0, 0.0), vec2(10.0, 10.0));
        scene.create_ball(vec2(5.0, 5.0), 1.0, vec2(0.0, 0.0)).unwrap();
        scene.clear_balls();
        assert_eq!(scene.walls().len(), 4);
        assert!(scene.first_ball().is_none());
        scene.clear();
        assert_eq!(scene.object_count(), 0);
    }

    #[test]
    fn update_moves_balls() {
        let mut scene = Scene::new();
        let id = scene.create_ball(vec2(5.0, 5.0), 1.0, vec2(2.0, -4.0)).unwrap();
        scene.update(0.5);
        assert_eq!(scene.ball(id).unwrap().position, vec2(6.0, 3.0));
    }

    #[test]
    fn display() {
        let mut scene = Scene::new();
        scene.create_box(vec2(0.0, 0.0), vec2(10.0, 10.0));
        scene.create_ball(vec2(5.0, 5.0), 1.0, vec2(0.0, 0.0)).unwrap();
        assert_eq!(scene.to_string(), "Scene (objects: 5, walls: 4, balls: 1)");
    }
}
