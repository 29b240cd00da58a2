use crate::scene::ObjectId;
use crate::shape::Segment;
use crate::Vec2;

mod mass;

pub use mass::Mass;

/// Center of a body in arena coordinates.
#[derive(Clone, Debug)]
pub struct Position(pub Vec2);

#[derive(Clone, Debug)]
pub struct Velocity(pub Vec2);

/// Marks a moving ball. Entities with this component are resolved against walls and the arena
/// boundary by the collide system.
#[derive(Clone, Debug)]
pub struct CircleCollider {
    pub radius: f32,
    pub mass: Mass,
}

/// A static wall. `wall_id` is the identifier reported in collision events.
#[derive(Clone, Debug)]
pub struct SegmentCollider {
    pub segment: Segment,
    pub wall_id: u32,
}

/// Back-reference from an entity to the scene object that mirrors it. Systems only ever write
/// through it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SceneLink(pub ObjectId);
