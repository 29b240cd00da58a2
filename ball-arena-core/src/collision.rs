//! Geometric queries between moving circles and segment walls. Everything here is stateless.

use cgmath::{vec2, InnerSpace};

use crate::config::SweepStrategy;
use crate::math::{Vec2Ext, EPSILON};
use crate::shape::{Circle, Rect, Segment};
use crate::Vec2;

/// A discrete overlap between a circle and a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Contact {
    /// Closest point on the segment to the circle's center.
    pub point: Vec2,
    /// Unit vector from `point` toward the circle's center.
    pub normal: Vec2,
    /// How far the circle reaches past the segment, `radius - distance`.
    pub depth: f32,
}

/// The first contact of a circle swept along a displacement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    pub point: Vec2,
    pub normal: Vec2,
    /// Fraction of the displacement in `[0, 1]` at which the contact happens.
    pub time: f32,
}

pub fn closest_point_on_segment(point: Vec2, start: Vec2, end: Vec2) -> Vec2 {
    let d = end - start;
    let length_squared = d.magnitude2();
    if length_squared < EPSILON {
        return start;
    }
    let t = ((point - start).dot(d) / length_squared).max(0.0).min(1.0);
    start + d * t
}

pub fn discrete_overlap(circle: &Circle, velocity: Vec2, segment: &Segment) -> Option<Contact> {
    let point = segment.closest_point(circle.center);
    let delta = circle.center - point;
    let distance = delta.magnitude();
    if distance > circle.radius {
        return None;
    }

    let normal = if delta.magnitude2() > EPSILON {
        delta / distance
    } else {
        coincident_normal(segment, velocity)
    };
    Some(Contact {
        point,
        normal,
        depth: circle.radius - distance,
    })
}

/// Normal for a center lying on the segment itself, where the center-to-contact direction is
/// undefined.
fn coincident_normal(segment: &Segment, velocity: Vec2) -> Vec2 {
    let heading = if velocity.magnitude2() > EPSILON {
        Some(velocity.normalize())
    } else {
        None
    };
    if segment.is_degenerate() {
        heading.unwrap_or_else(|| vec2(0.0, 1.0))
    } else {
        // Ties go to the clockwise perpendicular.
        let perp = segment.normal();
        if heading.map_or(true, |heading| perp.dot(heading) > (-perp).dot(heading)) {
            perp
        } else {
            -perp
        }
    }
}

/// Sweeps `circle` from its center to `next_center` and reports the first contact with
/// `segment`.
///
/// A circle already touching the segment reports `time == 0`. A circle whose distance to the
/// segment does not shrink over the step reports nothing.
pub fn sweep(
    circle: &Circle,
    segment: &Segment,
    next_center: Vec2,
    strategy: SweepStrategy,
) -> Option<Impact> {
    let start = circle.center;
    let displacement = next_center - start;
    if displacement.magnitude() < EPSILON {
        return None;
    }

    let start_point = segment.closest_point(start);
    let start_distance = start.distance_to(start_point);
    if start_distance <= circle.radius {
        let normal = (start - start_point)
            .normalize_or_zero()
            .or_else(|| segment.normal())
            .or_else(|| -displacement.normalize_or_zero());
        return Some(Impact {
            point: start_point,
            normal,
            time: 0.0,
        });
    }

    if segment.distance_to(next_center) >= start_distance {
        return None;
    }

    let time = if segment.is_degenerate() {
        point_time_of_impact(start, displacement, segment.start, circle.radius)?
    } else {
        match strategy {
            SweepStrategy::Sampled { samples } => {
                sampled_time_of_impact(circle, segment, displacement, samples)?
            }
            SweepStrategy::Exact => {
                exact_time_of_impact(circle, segment, displacement, next_center)?
            }
        }
    };

    let center = start + displacement * time;
    let point = segment.closest_point(center);
    let normal = (center - point)
        .normalize_or_zero()
        .or_else(|| (start - point).normalize_or_zero())
        .or_else(|| facing_normal(segment, start))
        .or_else(|| -displacement.normalize_or_zero());
    Some(Impact {
        point,
        normal,
        time,
    })
}

/// Earliest `t` in `[0, 1]` at which a circle of `radius` moving from `start` by `displacement`
/// touches `point`. Only reported while the circle approaches the point.
pub fn point_time_of_impact(
    start: Vec2,
    displacement: Vec2,
    point: Vec2,
    radius: f32,
) -> Option<f32> {
    let offset = start - point;
    let a = displacement.magnitude2();
    let b = 2.0 * offset.dot(displacement);
    let c = offset.magnitude2() - radius * radius;
    if a < EPSILON * EPSILON || b >= 0.0 {
        return None;
    }
    if c <= 0.0 {
        return Some(0.0);
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    if (0.0..=1.0).contains(&t) {
        Some(t)
    } else {
        None
    }
}

fn sampled_time_of_impact(
    circle: &Circle,
    segment: &Segment,
    displacement: Vec2,
    samples: usize,
) -> Option<f32> {
    let last = samples.max(2) - 1;
    let mut min_distance = f32::INFINITY;
    let mut min_time = 0.0;
    for i in 0..=last {
        let t = i as f32 / last as f32;
        let distance = segment.distance_to(circle.center + displacement * t);
        if distance < min_distance {
            min_distance = distance;
            min_time = t;
        }
    }
    if min_distance <= circle.radius {
        Some(min_time)
    } else {
        None
    }
}

/// Time of impact against the capsule of `circle.radius` around a non-degenerate segment: the
/// flat faces on either side plus a disc at each endpoint.
fn exact_time_of_impact(
    circle: &Circle,
    segment: &Segment,
    displacement: Vec2,
    next_center: Vec2,
) -> Option<f32> {
    let radius = circle.radius;
    let start = circle.center;
    let direction = segment.direction();
    let normal = segment.normal();

    let mut earliest: Option<f32> = None;
    let mut consider = |t: f32| {
        earliest = Some(earliest.map_or(t, |e: f32| e.min(t)));
    };

    let offset = (start - segment.start).dot(normal);
    let approach = displacement.dot(normal);
    if offset.abs() > radius && offset * approach < 0.0 {
        let t = (offset.abs() - radius) / approach.abs();
        if t <= 1.0 {
            let center = start + displacement * t;
            let u = (center - segment.start).dot(direction) / direction.magnitude2();
            if (0.0..=1.0).contains(&u) {
                consider(t);
            }
        }
    }
    for &endpoint in &[segment.start, segment.end] {
        if let Some(t) = point_time_of_impact(start, displacement, endpoint, radius) {
            consider(t);
        }
    }

    if earliest.is_none() && segment.distance_to(next_center) <= radius {
        // Rounding can put the end of the step inside the capsule without a root in [0, 1].
        earliest = Some(1.0);
    }
    earliest
}

/// Unit normal of `segment` on the side where `point` lies.
fn facing_normal(segment: &Segment, point: Vec2) -> Vec2 {
    let normal = segment.normal();
    if normal.dot(point - segment.start) < 0.0 {
        -normal
    } else {
        normal
    }
}

pub fn circle_overlaps_circle(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    (a.center - b.center).magnitude2() <= reach * reach
}

pub fn circle_overlaps_rect(circle: &Circle, rect: &Rect) -> bool {
    let closest = vec2(
        circle.center.x.max(rect.min.x).min(rect.max.x),
        circle.center.y.max(rect.min.y).min(rect.max.y),
    );
    (circle.center - closest).magnitude2() <= circle.radius * circle.radius
}

pub fn point_in_rect(point: Vec2, rect: &Rect) -> bool {
    point.x >= rect.min.x && point.x <= rect.max.x && point.y >= rect.min.y && point.y <= rect.max.y
}

/// Falls back to another vector when `self` is zero.
trait OrElse {
    fn or_else(self, f: impl FnOnce() -> Self) -> Self;
}

impl OrElse for Vec2 {
    fn or_else(self, f: impl FnOnce() -> Vec2) -> Vec2 {
        if self == vec2(0.0, 0.0) {
            f()
        } else {
            self
        }
    }
}
