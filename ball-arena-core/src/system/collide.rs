//! Per-frame resolution of balls against walls and the arena boundary.
//!
//! Each ball's displacement for the frame is split into sub-steps no longer than its radius.
//! Every sub-step is tested against every wall; the first resolved contact ends the ball's frame.

use cgmath::{vec2, InnerSpace};
use legion::world::SubWorld;
use legion::IntoQuery;
use log::{debug, trace};

use crate::collision::{discrete_overlap, sweep, Contact, Impact};
use crate::component::{CircleCollider, Position, SceneLink, SegmentCollider, Velocity};
use crate::config::{ContactOrder, SimConfig};
use crate::event::{ArenaEdge, BallSnapshot, CollisionEvent, CollisionTarget, ContactKind};
use crate::math::Vec2Ext;
use crate::resource::{CollideCounters, CollisionEvents, Time};
use crate::response::{correct_position, reflect};
use crate::scene::Scene;
use crate::shape::{Circle, Segment};
use crate::Vec2;

/// Penetration tolerated for a ball that is already moving away from a wall.
pub const CONTACT_SLOP: f32 = 1.0e-3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BallMotion {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
}

/// One collision resolved for a ball.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedContact {
    pub target: CollisionTarget,
    pub wall: Option<Segment>,
    pub point: Vec2,
    pub normal: Vec2,
    pub kind: ContactKind,
    pub substep: u32,
    /// The ball at the start of the sub-step in which the contact was resolved.
    pub before: BallMotion,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    pub motion: BallMotion,
    pub substeps: u32,
    pub contacts: Vec<ResolvedContact>,
    pub resting_contacts: usize,
}

#[derive(Clone, Copy, Debug)]
enum WallContact {
    Swept(Impact),
    Overlap(Contact),
}

/// Number of sub-steps needed so that no sub-step moves a ball farther than its radius.
pub fn substep_count(speed: f32, radius: f32, dt: f32, max_substeps: u32) -> u32 {
    let distance = speed * dt;
    if distance > radius {
        ((distance / radius).ceil() as u32).min(max_substeps).max(1)
    } else {
        1
    }
}

/// Advances one ball through a frame of `dt` seconds against `walls`, in order.
pub fn resolve_ball(
    ball: BallMotion,
    walls: &[SegmentCollider],
    dt: f32,
    config: &SimConfig,
) -> Resolution {
    let BallMotion {
        mut position,
        mut velocity,
        radius,
    } = ball;
    let substeps = substep_count(velocity.magnitude(), radius, dt, config.max_substeps);
    let substep_dt = dt / substeps as f32;

    let mut resolution = Resolution {
        motion: ball,
        substeps: 0,
        contacts: Vec::new(),
        resting_contacts: 0,
    };

    for substep in 0..substeps {
        resolution.substeps += 1;
        let before = BallMotion {
            position,
            velocity,
            radius,
        };
        let next = position + velocity * substep_dt;
        let circle = Circle::new(position, radius);

        let found = find_contact(
            &circle,
            velocity,
            next,
            walls,
            config,
            &mut resolution.resting_contacts,
        );
        if let Some((wall, contact)) = found {
            let (point, normal, kind) = match contact {
                WallContact::Swept(impact) => {
                    let at_impact = position + velocity * (impact.time * substep_dt);
                    let penetration = (radius - at_impact.distance_to(impact.point)).max(0.0);
                    position = correct_position(at_impact, impact.normal, penetration);
                    velocity = reflect(velocity, impact.normal, penetration);
                    (
                        impact.point,
                        impact.normal,
                        ContactKind::Swept { time: impact.time },
                    )
                }
                WallContact::Overlap(contact) => {
                    position = correct_position(position, contact.normal, contact.depth);
                    velocity = reflect(velocity, contact.normal, contact.depth);
                    (
                        contact.point,
                        contact.normal,
                        ContactKind::Overlap {
                            depth: contact.depth,
                        },
                    )
                }
            };
            resolution.contacts.push(ResolvedContact {
                target: CollisionTarget::Wall(wall.wall_id),
                wall: Some(wall.segment),
                point,
                normal,
                kind,
                substep,
                before,
            });
            break;
        }

        position = next;
        let clamped = clamp_to_arena(&mut position, &mut velocity, radius, config.arena_size);
        if !clamped.is_empty() {
            for (edge, point, normal) in clamped {
                resolution.contacts.push(ResolvedContact {
                    target: CollisionTarget::Boundary(edge),
                    wall: None,
                    point,
                    normal,
                    kind: ContactKind::Boundary,
                    substep,
                    before,
                });
            }
            break;
        }
    }

    resolution.motion = BallMotion {
        position,
        velocity,
        radius,
    };
    resolution
}

fn find_contact<'a>(
    circle: &Circle,
    velocity: Vec2,
    next: Vec2,
    walls: &'a [SegmentCollider],
    config: &SimConfig,
    resting_contacts: &mut usize,
) -> Option<(&'a SegmentCollider, WallContact)> {
    let mut unless_resting = |wall: &SegmentCollider, normal: Vec2, depth: f32| {
        let resting = velocity.dot(normal) >= 0.0 && depth <= CONTACT_SLOP;
        if resting {
            trace!("resting contact with wall {}", wall.wall_id);
            *resting_contacts += 1;
        }
        !resting
    };
    let swept = |wall: &SegmentCollider| sweep(circle, &wall.segment, next, config.sweep);
    let penetration = |impact: &Impact| {
        let at_impact = circle.center + (next - circle.center) * impact.time;
        (circle.radius - at_impact.distance_to(impact.point)).max(0.0)
    };

    match config.contact_order {
        ContactOrder::FirstHit => {
            for wall in walls {
                if let Some(impact) = swept(wall) {
                    if unless_resting(wall, impact.normal, penetration(&impact)) {
                        return Some((wall, WallContact::Swept(impact)));
                    }
                }
                if let Some(contact) = discrete_overlap(circle, velocity, &wall.segment) {
                    if unless_resting(wall, contact.normal, contact.depth) {
                        return Some((wall, WallContact::Overlap(contact)));
                    }
                }
            }
            None
        }
        ContactOrder::Earliest => {
            let mut earliest: Option<(&SegmentCollider, Impact)> = None;
            for wall in walls {
                if let Some(impact) = swept(wall) {
                    let earlier = earliest.map_or(true, |(_, best)| impact.time < best.time);
                    if earlier && unless_resting(wall, impact.normal, penetration(&impact)) {
                        earliest = Some((wall, impact));
                    }
                }
            }
            if let Some((wall, impact)) = earliest {
                return Some((wall, WallContact::Swept(impact)));
            }
            for wall in walls {
                if let Some(contact) = discrete_overlap(circle, velocity, &wall.segment) {
                    if unless_resting(wall, contact.normal, contact.depth) {
                        return Some((wall, WallContact::Overlap(contact)));
                    }
                }
            }
            None
        }
    }
}

/// Keeps the ball inside `[radius, arena_size - radius]` on each axis, turning the velocity on a
/// clamped axis back inward. Returns the clamped edges with the touching point and inward normal.
fn clamp_to_arena(
    position: &mut Vec2,
    velocity: &mut Vec2,
    radius: f32,
    arena_size: Vec2,
) -> Vec<(ArenaEdge, Vec2, Vec2)> {
    let mut clamped = Vec::new();
    if position.x < radius {
        position.x = radius;
        velocity.x = velocity.x.abs();
        clamped.push((ArenaEdge::Left, vec2(0.0, position.y), vec2(1.0, 0.0)));
    } else if position.x > arena_size.x - radius {
        position.x = arena_size.x - radius;
        velocity.x = -velocity.x.abs();
        clamped.push((ArenaEdge::Right, vec2(arena_size.x, position.y), vec2(-1.0, 0.0)));
    }
    if position.y < radius {
        position.y = radius;
        velocity.y = velocity.y.abs();
        clamped.push((ArenaEdge::Bottom, vec2(position.x, 0.0), vec2(0.0, 1.0)));
    } else if position.y > arena_size.y - radius {
        position.y = arena_size.y - radius;
        velocity.y = -velocity.y.abs();
        clamped.push((ArenaEdge::Top, vec2(position.x, arena_size.y), vec2(0.0, -1.0)));
    }
    clamped
}

#[legion::system]
#[read_component(SegmentCollider)]
#[read_component(CircleCollider)]
#[read_component(SceneLink)]
#[write_component(Position)]
#[write_component(Velocity)]
pub fn collide(
    world: &mut SubWorld,
    #[resource] time: &Time,
    #[resource] config: &SimConfig,
    #[resource] scene: &mut Scene,
    #[resource] counters: &mut CollideCounters,
    #[resource] events: &mut CollisionEvents,
) {
    *counters = CollideCounters::default();

    let walls: Vec<SegmentCollider> = <&SegmentCollider>::query()
        .iter_mut(world)
        .cloned()
        .collect();
    counters.walls = walls.len();

    for (entity, (Position(pos), Velocity(vel), collider, link)) in
        <(&mut Position, &mut Velocity, &CircleCollider, Option<&SceneLink>)>::query()
            .iter_chunks_mut(world)
            .flat_map(|chunk| chunk.into_iter_entities())
    {
        counters.balls += 1;
        let object = link.map(|&SceneLink(id)| id);
        let resolution = resolve_ball(
            BallMotion {
                position: *pos,
                velocity: *vel,
                radius: collider.radius,
            },
            &walls,
            time.elapsed_seconds,
            config,
        );

        counters.substeps += resolution.substeps as usize;
        counters.resting_contacts += resolution.resting_contacts;
        for contact in &resolution.contacts {
            match contact.kind {
                ContactKind::Swept { .. } => counters.sweep_hits += 1,
                ContactKind::Overlap { .. } => counters.overlap_hits += 1,
                ContactKind::Boundary => counters.boundary_clamps += 1,
            }
            debug!(
                "ball {:?} hit {:?} ({:?}) in sub-step {}: position ({:.3}, {:.3}), velocity \
                 ({:.3}, {:.3}), contact ({:.3}, {:.3}), normal ({:.3}, {:.3})",
                object,
                contact.target,
                contact.kind,
                contact.substep,
                resolution.motion.position.x,
                resolution.motion.position.y,
                resolution.motion.velocity.x,
                resolution.motion.velocity.y,
                contact.point.x,
                contact.point.y,
                contact.normal.x,
                contact.normal.y,
            );
            events.push(CollisionEvent {
                target: contact.target,
                ball: BallSnapshot {
                    entity,
                    object,
                    position: contact.before.position,
                    velocity: contact.before.velocity,
                    radius: contact.before.radius,
                },
                wall: contact.wall,
                point: contact.point,
                normal: contact.normal,
                kind: contact.kind,
                substep: contact.substep,
            });
        }

        *pos = resolution.motion.position;
        *vel = resolution.motion.velocity;
        if let Some(id) = object {
            scene.mirror_ball(id, *pos, Some(*vel));
        }
    }

    trace!("collide counters: {:?}", counters);
}
