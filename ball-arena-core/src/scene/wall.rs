use std::fmt;

use crate::math::Vec2Ext;
use crate::scene::{ObjectId, SceneObject};
use crate::shape::Segment;
use crate::Vec2;

#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    pub(super) id: ObjectId,
    segment: Segment,
}

impl Wall {
    pub fn new(start: Vec2, end: Vec2) -> Wall {
        Wall::from_segment(Segment::new(start, end))
    }

    pub fn from_segment(segment: Segment) -> Wall {
        Wall {
            id: ObjectId::default(),
            segment,
        }
    }

    pub fn segment(&self) -> Segment {
        self.segment
    }

    pub fn start(&self) -> Vec2 {
        self.segment.start
    }

    pub fn end(&self) -> Vec2 {
        self.segment.end
    }

    pub fn set_endpoints(&mut self, start: Vec2, end: Vec2) {
        self.segment = Segment::new(start, end);
    }

    pub fn normal(&self) -> Vec2 {
        self.segment.normal()
    }

    pub fn length(&self) -> f32 {
        self.segment.length()
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        self.segment.closest_point(point)
    }

    /// Whether `point` lies within `thickness` of the wall.
    pub fn contains_point(&self, point: Vec2, thickness: f32) -> bool {
        point.distance_to(self.closest_point(point)) <= thickness
    }
}

impl SceneObject for Wall {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> Vec2 {
        self.segment.midpoint()
    }
}

impl fmt::Display for Wall {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Wall {} from ({:.2}, {:.2}) to ({:.2}, {:.2}) length {:.2}",
            self.id,
            self.start().x,
            self.start().y,
            self.end().x,
            self.end().y,
            self.length()
        )
    }
}
