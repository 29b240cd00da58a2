use cgmath::num_traits::zero;
use cgmath::{vec2, BaseFloat, InnerSpace, VectorSpace};
use rand::Rng;
use rand_distr::Distribution;

use crate::Vec2;

/// Tolerance shared by the geometry queries: squared lengths below it count as degenerate and
/// vector components closer than it compare equal.
pub const EPSILON: f32 = 1.0e-4;

/// Vector helpers that `cgmath` does not provide for `Vector2<f32>`.
pub trait Vec2Ext: Sized {
    /// Unit vector in the same direction, or zero when the magnitude is at most `EPSILON`.
    fn normalize_or_zero(self) -> Self;

    /// The vector rotated a quarter turn counter-clockwise, `(-y, x)`.
    fn perp(self) -> Self;

    /// Mirror image about the line orthogonal to `normal`: `v - 2(v·n)n`. The normal is expected
    /// to be unit length.
    fn reflect(self, normal: Self) -> Self;

    fn distance_to(self, other: Self) -> f32;

    /// Component-wise comparison with `EPSILON` tolerance.
    fn approx_eq(self, other: Self) -> bool;

    fn is_finite(self) -> bool;
}

impl Vec2Ext for Vec2 {
    fn normalize_or_zero(self) -> Vec2 {
        let magnitude = self.magnitude();
        if magnitude > EPSILON {
            self / magnitude
        } else {
            zero()
        }
    }

    fn perp(self) -> Vec2 {
        vec2(-self.y, self.x)
    }

    fn reflect(self, normal: Vec2) -> Vec2 {
        self - normal * (2.0 * self.dot(normal))
    }

    fn distance_to(self, other: Vec2) -> f32 {
        (self - other).magnitude()
    }

    fn approx_eq(self, other: Vec2) -> bool {
        (self.x - other.x).abs() < EPSILON && (self.y - other.y).abs() < EPSILON
    }

    fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

pub fn clamp_magnitude<V: InnerSpace>(
    v: V,
    a: <V as VectorSpace>::Scalar,
    b: <V as VectorSpace>::Scalar,
) -> V
where
    <V as VectorSpace>::Scalar: BaseFloat,
{
    let r = v.magnitude();
    if r < a {
        v.normalize_to(a)
    } else if r <= b {
        v
    } else {
        v.normalize_to(b)
    }
}

/// Uniformly distributed unit vectors, for launching balls in a random direction.
pub struct UnitCircle;

impl Distribution<Vec2> for UnitCircle {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec2 {
        let [x, y]: [f32; 2] = rand_distr::UnitCircle.sample(rng);
        vec2(x, y)
    }
}
