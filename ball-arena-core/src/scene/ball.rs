use std::fmt;

use cgmath::num_traits::zero;

use crate::collision::circle_overlaps_circle;
use crate::component::Mass;
use crate::error::{Error, Result};
use crate::math::Vec2Ext;
use crate::scene::{ObjectId, SceneObject};
use crate::shape::Circle;
use crate::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct Ball {
    pub(super) id: ObjectId,
    pub position: Vec2,
    pub radius: f32,
    pub velocity: Vec2,
    pub mass: f32,
}

impl Ball {
    /// A ball of unit mass. It receives its id when added to a `Scene`.
    pub fn new(position: Vec2, radius: f32, velocity: Vec2) -> Ball {
        Ball {
            id: ObjectId::default(),
            position,
            radius,
            velocity,
            mass: 1.0,
        }
    }

    pub fn with_mass(self, mass: f32) -> Ball {
        Ball { mass, ..self }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.radius.is_finite() && self.radius > 0.0) {
            return Err(Error::InvalidRadius(self.radius));
        }
        Mass::new(self.mass).map(|_| ())
    }

    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }

    pub fn intersects(&self, other: &Ball) -> bool {
        circle_overlaps_circle(&self.circle(), &other.circle())
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.circle().contains_point(point)
    }

    /// Mirrors the velocity about `normal`, whichever way it points.
    pub fn reflect(&mut self, normal: Vec2) {
        self.velocity = self.velocity.reflect(normal.normalize_or_zero());
    }

    pub fn stop(&mut self) {
        self.velocity = zero();
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.velocity = velocity;
    }

    pub fn add_velocity(&mut self, delta: Vec2) {
        self.velocity += delta;
    }
}

impl SceneObject for Ball {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn update(&mut self, dt: f32) {
        self.position += self.velocity * dt;
    }
}

impl fmt::Display for Ball {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Ball {} at ({:.2}, {:.2}) radius {:.2} velocity ({:.2}, {:.2})",
            self.id, self.position.x, self.position.y, self.radius, self.velocity.x, self.velocity.y
        )
    }
}
