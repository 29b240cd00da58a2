use cgmath::{vec2, InnerSpace};
use serde::{Deserialize, Serialize};

use crate::math::{Vec2Ext, EPSILON};
use crate::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Circle {
        Circle { center, radius }
    }

    pub fn contains_point(&self, point: Vec2) -> bool {
        self.center.distance_to(point) <= self.radius
    }
}

/// A line segment obstacle. Degenerate when its endpoints coincide, in which case it behaves as a
/// single point at `start`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment {
    pub fn new(start: Vec2, end: Vec2) -> Segment {
        Segment { start, end }
    }

    pub fn direction(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f32 {
        self.direction().magnitude()
    }

    pub fn is_degenerate(&self) -> bool {
        self.direction().magnitude2() < EPSILON
    }

    pub fn midpoint(&self) -> Vec2 {
        (self.start + self.end) * 0.5
    }

    /// Unit perpendicular `(-d.y, d.x)` of the segment direction. Which side it faces depends on
    /// the winding of the endpoints. Zero for a degenerate segment.
    pub fn normal(&self) -> Vec2 {
        self.direction().normalize_or_zero().perp()
    }

    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        crate::collision::closest_point_on_segment(point, self.start, self.end)
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        point.distance_to(self.closest_point(point))
    }
}

/// Axis-aligned rectangle given by its minimum and maximum corners.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Rect {
        Rect { min, max }
    }

    /// The four edges in winding order bottom, right, top, left.
    pub fn edges(&self) -> [Segment; 4] {
        let Rect { min, max } = *self;
        [
            Segment::new(vec2(min.x, min.y), vec2(max.x, min.y)),
            Segment::new(vec2(max.x, min.y), vec2(max.x, max.y)),
            Segment::new(vec2(max.x, max.y), vec2(min.x, max.y)),
            Segment::new(vec2(min.x, max.y), vec2(min.x, min.y)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_normal_follows_winding() {
        let segment = Segment::new(vec2(0.0, 0.0), vec2(10.0, 0.0));
        assert!(segment.normal().approx_eq(vec2(0.0, 1.0)));
        let reversed = Segment::new(vec2(10.0, 0.0), vec2(0.0, 0.0));
        assert!(reversed.normal().approx_eq(vec2(0.0, -1.0)));
    }

    #[test]
    fn degenerate_segment_has_zero_normal() {
        let point = Segment::new(vec2(4.0, 4.0), vec2(4.0, 4.0));
        assert!(point.is_degenerate());
        assert_eq!(point.normal(), vec2(0.0, 0.0));
        assert_eq!(point.length(), 0.0);
    }

    #[test]
    fn box_edges_have_inward_normals() {
        let rect = Rect::new(vec2(0.0, 0.0), vec2(100.0, 100.0));
        let center = vec2(50.0, 50.0);
        for edge in rect.edges().iter() {
            let to_center = center - edge.midpoint();
            assert!(edge.normal().dot(to_center) > 0.0);
        }
    }
}
