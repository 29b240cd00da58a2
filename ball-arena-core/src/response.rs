//! Velocity and position responses to contacts, plus the small kinematic helpers around them.
//!
//! Every function here is total. A normal shorter than `EPSILON` carries no direction, and the
//! normal-based functions hand back their input unchanged in that case.

use cgmath::num_traits::zero;
use cgmath::InnerSpace;

use crate::component::Mass;
use crate::math::{clamp_magnitude, Vec2Ext, EPSILON};
use crate::Vec2;

/// A moving mass, as seen by `elastic_collision`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub velocity: Vec2,
    pub mass: Mass,
}

fn unit_normal(normal: Vec2) -> Option<Vec2> {
    let n = normal.normalize_or_zero();
    if n == zero() {
        None
    } else {
        Some(n)
    }
}

/// Reflects `velocity` about `normal` when it points into the surface; a separating velocity is
/// returned as is. `_depth` is unused.
pub fn reflect(velocity: Vec2, normal: Vec2, _depth: f32) -> Vec2 {
    match unit_normal(normal) {
        Some(n) if velocity.dot(n) < 0.0 => velocity.reflect(n),
        _ => velocity,
    }
}

pub fn correct_position(position: Vec2, normal: Vec2, depth: f32) -> Vec2 {
    position + normal * depth
}

/// Reflects the normal component of `velocity` and scales the tangential component by
/// `1 - friction`.
pub fn reflect_with_friction(velocity: Vec2, normal: Vec2, friction: f32) -> Vec2 {
    let n = match unit_normal(normal) {
        Some(n) => n,
        None => return velocity,
    };
    let normal_part = n * velocity.dot(n);
    let tangent_part = velocity - normal_part;
    tangent_part * (1.0 - friction) - normal_part
}

/// Impulse exchange between two bodies along `normal`, which points from `a` to `b`. Bodies that
/// are already separating keep their velocities.
pub fn elastic_collision(a: Body, b: Body, normal: Vec2, restitution: f32) -> (Vec2, Vec2) {
    let n = match unit_normal(normal) {
        Some(n) => n,
        None => return (a.velocity, b.velocity),
    };
    let closing = (b.velocity - a.velocity).dot(n);
    if closing > 0.0 {
        return (a.velocity, b.velocity);
    }
    let impulse = -(1.0 + restitution) * closing / (a.mass.inv_mass() + b.mass.inv_mass());
    (
        a.velocity - n * (impulse * a.mass.inv_mass()),
        b.velocity + n * (impulse * b.mass.inv_mass()),
    )
}

pub fn gravity(velocity: Vec2, gravity: Vec2, dt: f32) -> Vec2 {
    velocity + gravity * dt
}

/// Exponential-ish decay, `velocity * max(0, 1 - factor * dt)`.
pub fn damping(velocity: Vec2, factor: f32, dt: f32) -> Vec2 {
    velocity * (1.0 - factor * dt).max(0.0)
}

pub fn clamp_speed(velocity: Vec2, max_speed: f32) -> Vec2 {
    clamp_magnitude(velocity, 0.0, max_speed)
}

/// Slows the component of `velocity` running along the surface with normal `normal`.
pub fn surface_friction(velocity: Vec2, normal: Vec2, coefficient: f32, dt: f32) -> Vec2 {
    if velocity.magnitude2() < EPSILON {
        return zero();
    }
    let n = match unit_normal(normal) {
        Some(n) => n,
        None => return velocity,
    };
    let tangent = n.perp();
    let along_surface = velocity.dot(tangent);
    if along_surface.abs() < EPSILON {
        return velocity;
    }
    velocity - tangent * (along_surface * coefficient * dt)
}

/// Heading in radians of `incident` after reflecting off `normal`.
pub fn reflection_angle(incident: Vec2, normal: Vec2) -> f32 {
    let reflected = match unit_normal(normal) {
        Some(n) => incident.reflect(n),
        None => incident,
    };
    reflected.y.atan2(reflected.x)
}

pub fn is_moving_towards(position: Vec2, velocity: Vec2, target: Vec2) -> bool {
    velocity
        .normalize_or_zero()
        .dot((target - position).normalize_or_zero())
        > 0.0
}

/// Earliest non-negative time at which two moving circles with the given summed radius touch.
pub fn time_to_collision(
    position_a: Vec2,
    velocity_a: Vec2,
    position_b: Vec2,
    velocity_b: Vec2,
    combined_radius: f32,
) -> Option<f32> {
    let relative_position = position_b - position_a;
    let relative_velocity = velocity_b - velocity_a;
    let a = relative_velocity.magnitude2();
    if a < EPSILON {
        return None;
    }
    let b = 2.0 * relative_position.dot(relative_velocity);
    let c = relative_position.magnitude2() - combined_radius * combined_radius;
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);
    if t1 >= 0.0 {
        Some(t1)
    } else if t2 >= 0.0 {
        Some(t2)
    } else {
        None
    }
}
