use cgmath::num_traits::zero;
use cgmath::InnerSpace;

use crate::component::{CircleCollider, Position, SceneLink, Velocity};
use crate::config::SimConfig;
use crate::resource::Time;
use crate::scene::Scene;

pub mod collide;

pub use collide::collide_system;

/// Euler integration for everything with a velocity. Balls are left to the collide system unless
/// `SimConfig::integrate_colliders` is set.
#[legion::system(for_each)]
pub fn movement(
    #[resource] time: &Time,
    #[resource] config: &SimConfig,
    #[resource] scene: &mut Scene,
    Position(pos): &mut Position,
    Velocity(vel): &mut Velocity,
    collider: Option<&CircleCollider>,
    link: Option<&SceneLink>,
) {
    if collider.is_none() || config.integrate_colliders {
        *pos += *vel * time.elapsed_seconds;
    }
    if vel.magnitude2() < config.rest_speed_squared {
        *vel = zero();
    }
    if let Some(&SceneLink(id)) = link {
        scene.mirror_ball(id, *pos, Some(*vel));
    }
}
