use std::vec::Drain;

use crate::event::CollisionEvent;

#[derive(Clone, Debug)]
pub struct Time {
    pub elapsed_seconds: f32,
}

/// Work done by the collide system during the most recent step.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollideCounters {
    pub balls: usize,
    pub walls: usize,
    pub substeps: usize,
    pub sweep_hits: usize,
    pub overlap_hits: usize,
    pub boundary_clamps: usize,
    pub resting_contacts: usize,
}

impl CollideCounters {
    pub fn collisions(&self) -> usize {
        self.sweep_hits + self.overlap_hits + self.boundary_clamps
    }
}

/// Collisions resolved during the current step, in resolution order.
#[derive(Clone, Debug, Default)]
pub struct CollisionEvents {
    events: Vec<CollisionEvent>,
}

impl CollisionEvents {
    pub fn push(&mut self, event: CollisionEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollisionEvent> {
        self.events.iter()
    }

    pub fn drain(&mut self) -> Drain<'_, CollisionEvent> {
        self.events.drain(..)
    }
}
