use std::fmt;

use legion::Entity;

use crate::scene::ObjectId;
use crate::shape::Segment;
use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArenaEdge {
    Left,
    Right,
    Bottom,
    Top,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollisionTarget {
    Wall(u32),
    Boundary(ArenaEdge),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ContactKind {
    /// Found by the continuous test at fraction `time` of the sub-step.
    Swept { time: f32 },
    /// Found by the discrete fallback with the ball penetrating by `depth`.
    Overlap { depth: f32 },
    /// The ball left the arena and was clamped back in.
    Boundary,
}

/// A ball's state immediately before a collision was resolved.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallSnapshot {
    pub entity: Entity,
    pub object: Option<ObjectId>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CollisionEvent {
    pub target: CollisionTarget,
    pub ball: BallSnapshot,
    /// The wall's segment, absent for boundary clamps.
    pub wall: Option<Segment>,
    pub point: Vec2,
    pub normal: Vec2,
    pub kind: ContactKind,
    /// Zero-based sub-step during which the collision was resolved.
    pub substep: u32,
}

impl fmt::Display for CollisionEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.target {
            CollisionTarget::Wall(id) => write!(f, "wall {}", id)?,
            CollisionTarget::Boundary(edge) => write!(f, "{:?} boundary", edge)?,
        }
        write!(
            f,
            " at ({:.2}, {:.2}) normal ({:.2}, {:.2})",
            self.point.x, self.point.y, self.normal.x, self.normal.y
        )
    }
}

/// Receives the collisions resolved during a step, after the step has finished.
pub trait CollisionSink {
    fn on_collision(&mut self, event: &CollisionEvent);
}

impl CollisionSink for () {
    fn on_collision(&mut self, _: &CollisionEvent) {}
}

impl CollisionSink for Vec<CollisionEvent> {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.push(event.clone());
    }
}

impl<S: CollisionSink + ?Sized> CollisionSink for &mut S {
    fn on_collision(&mut self, event: &CollisionEvent) {
        (**self).on_collision(event);
    }
}

impl<S: CollisionSink + ?Sized> CollisionSink for Box<S> {
    fn on_collision(&mut self, event: &CollisionEvent) {
        (**self).on_collision(event);
    }
}

/// Running totals for a collision counter display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollisionCounter {
    pub total: usize,
    pub walls: usize,
    pub boundaries: usize,
}

impl CollisionSink for CollisionCounter {
    fn on_collision(&mut self, event: &CollisionEvent) {
        self.total += 1;
        match event.target {
            CollisionTarget::Wall(_) => self.walls += 1,
            CollisionTarget::Boundary(_) => self.boundaries += 1,
        }
    }
}

/// Forwards every event to each registered observer in registration order.
#[derive(Default)]
pub struct CollisionObservers<'a> {
    observers: Vec<Box<dyn CollisionSink + 'a>>,
}

impl<'a> CollisionObservers<'a> {
    pub fn new() -> Self {
        CollisionObservers {
            observers: Vec::new(),
        }
    }

    pub fn add(&mut self, observer: impl CollisionSink + 'a) {
        self.observers.push(Box::new(observer));
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl<'a> CollisionSink for CollisionObservers<'a> {
    fn on_collision(&mut self, event: &CollisionEvent) {
        for observer in &mut self.observers {
            observer.on_collision(event);
        }
    }
}
