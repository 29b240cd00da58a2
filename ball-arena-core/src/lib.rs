use std::collections::HashMap;
use std::mem;

use cgmath::InnerSpace;
use legion::{Entity, EntityStore, Resources, Schedule, World};
use log::{info, warn};
use rand::{Rng, SeedableRng};
use rand_distr::Distribution;
use rand_pcg::Pcg32;

pub mod collision;
pub mod component;
pub mod config;
pub mod error;
pub mod event;
pub mod math;
pub mod resource;
pub mod response;
pub mod scene;
pub mod shape;
pub mod system;

use component::{CircleCollider, Mass, Position, SceneLink, SegmentCollider, Velocity};
use event::CollisionSink;
use math::UnitCircle;
use resource::{CollideCounters, CollisionEvents, Time};
use scene::{Ball, ObjectId, Scene, SceneObject, Wall};
use system::{collide_system, movement_system};

pub use config::{ContactOrder, SimConfig, SweepStrategy};
pub use error::{Error, Result};

pub type Vec2 = cgmath::Vector2<f32>;

/// Speed multiplier applied by `Simulation::boost_ball` to a ball that is not already moving.
const BOOST_LAUNCH_FACTOR: f32 = 10.0;

/// A scene of balls and walls, mirrored into a `legion` world and advanced one fixed step at a
/// time.
pub struct Simulation {
    rng: Pcg32,
    config: SimConfig,
    world: World,
    scene: Scene,
    entities: HashMap<ObjectId, Entity>,
    next_wall_id: u32,
    is_paused: bool,
    frame: u64,

    step_resources: Resources,
    step_schedule: Schedule,
}

impl Simulation {
    /// Creates an empty simulation seeded from the operating system's entropy source.
    pub fn new(config: SimConfig) -> Result<Simulation> {
        config.validate()?;
        Ok(Simulation::build(config, entropy_rng()))
    }

    pub fn with_seed(config: SimConfig, seed: u64) -> Result<Simulation> {
        config.validate()?;
        Ok(Simulation::build(config, Pcg32::seed_from_u64(seed)))
    }

    fn build(config: SimConfig, rng: Pcg32) -> Simulation {
        let mut step_resources = Resources::default();
        step_resources.insert(config.clone());
        step_resources.insert(CollideCounters::default());
        step_resources.insert(CollisionEvents::default());

        Simulation {
            rng,
            config,
            world: World::default(),
            scene: Scene::default(),
            entities: HashMap::new(),
            next_wall_id: 0,
            is_paused: false,
            frame: 0,

            step_resources,
            step_schedule: Schedule::builder()
                .add_system(movement_system())
                .add_system(collide_system())
                .build(),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn rng_mut(&mut self) -> &mut impl Rng {
        &mut self.rng
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn ball(&self, id: ObjectId) -> Option<&Ball> {
        self.scene.ball(id)
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn set_is_paused(&mut self, is_paused: bool) {
        self.is_paused = is_paused;
    }

    /// Number of steps executed since creation or the last reset.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Collide system counters for the most recent step.
    pub fn counters(&self) -> CollideCounters {
        self.step_resources
            .get::<CollideCounters>()
            .map(|counters| (*counters).clone())
            .unwrap_or_default()
    }

    pub fn world_info(&self) -> String {
        format!("Entities: {}", self.world.len())
    }

    /// Replaces the current scene. Walls are numbered from zero in scene order.
    pub fn load_scene(&mut self, scene: Scene) -> Result<()> {
        for ball in scene.balls() {
            if let Err(e) = ball.validate() {
                warn!("rejecting scene: {}: {}", ball, e);
                return Err(e);
            }
        }

        self.world.clear();
        self.entities.clear();
        self.next_wall_id = 0;
        self.scene = scene;

        let walls: Vec<(ObjectId, Wall)> = self
            .scene
            .walls()
            .iter()
            .map(|wall| (wall.id(), wall.clone()))
            .collect();
        for (id, wall) in walls {
            self.spawn_wall(id, &wall);
        }
        let balls: Vec<Ball> = self.scene.balls().to_vec();
        for ball in balls {
            self.spawn_ball(&ball)?;
        }

        info!("loaded {}", self.scene);
        Ok(())
    }

    pub fn add_wall(&mut self, wall: Wall) -> ObjectId {
        let id = self.scene.add_wall(wall.clone());
        self.spawn_wall(id, &wall);
        id
    }

    pub fn add_ball(&mut self, ball: Ball) -> Result<ObjectId> {
        let id = self.scene.add_ball(ball)?;
        if let Some(ball) = self.scene.ball(id).cloned() {
            self.spawn_ball(&ball)?;
        }
        Ok(id)
    }

    fn spawn_wall(&mut self, id: ObjectId, wall: &Wall) {
        let wall_id = self.next_wall_id;
        self.next_wall_id += 1;
        let entity = self.world.push((
            Position(wall.position()),
            SegmentCollider {
                segment: wall.segment(),
                wall_id,
            },
            SceneLink(id),
        ));
        self.entities.insert(id, entity);
    }

    fn spawn_ball(&mut self, ball: &Ball) -> Result<()> {
        let mass = Mass::new(ball.mass)?;
        let entity = self.world.push((
            Position(ball.position),
            Velocity(ball.velocity),
            CircleCollider {
                radius: ball.radius,
                mass,
            },
            SceneLink(ball.id()),
        ));
        self.entities.insert(ball.id(), entity);
        Ok(())
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Result<()> {
        if !self.scene.remove(id) {
            return Err(Error::UnknownObject(id));
        }
        if let Some(entity) = self.entities.remove(&id) {
            self.world.remove(entity);
        }
        Ok(())
    }

    pub fn clear_balls(&mut self) {
        let ids: Vec<ObjectId> = self.scene.balls().iter().map(|ball| ball.id()).collect();
        for id in ids {
            if let Some(entity) = self.entities.remove(&id) {
                self.world.remove(entity);
            }
        }
        self.scene.clear_balls();
    }

    fn ball_entity(&self, id: ObjectId) -> Result<Entity> {
        match (self.scene.ball(id), self.entities.get(&id)) {
            (Some(_), Some(&entity)) => Ok(entity),
            _ => Err(Error::UnknownObject(id)),
        }
    }

    /// The velocity the simulation will use for the ball on the next step.
    pub fn ball_velocity(&self, id: ObjectId) -> Result<Vec2> {
        let entity = self.ball_entity(id)?;
        let entry = self
            .world
            .entry_ref(entity)
            .map_err(|_| Error::UnknownObject(id))?;
        let &Velocity(velocity) = entry
            .get_component::<Velocity>()
            .map_err(|_| Error::UnknownObject(id))?;
        Ok(velocity)
    }

    pub fn set_ball_velocity(&mut self, id: ObjectId, velocity: Vec2) -> Result<()> {
        let entity = self.ball_entity(id)?;
        let mut entry = self.world.entry(entity).ok_or(Error::UnknownObject(id))?;
        let Velocity(vel) = entry
            .get_component_mut::<Velocity>()
            .map_err(|_| Error::UnknownObject(id))?;
        *vel = velocity;
        if let Some(ball) = self.scene.ball_mut(id) {
            ball.set_velocity(velocity);
        }
        Ok(())
    }

    /// Sends the ball off at `speed` in a random direction and returns its new velocity.
    pub fn launch_ball(&mut self, id: ObjectId, speed: f32) -> Result<Vec2> {
        self.ball_entity(id)?;
        let direction: Vec2 = UnitCircle.sample(&mut self.rng);
        let velocity = direction * speed;
        self.set_ball_velocity(id, velocity)?;
        Ok(velocity)
    }

    /// Doubles the velocity of a moving ball. A ball at rest is launched at ten times `speed`
    /// instead.
    pub fn boost_ball(&mut self, id: ObjectId, speed: f32) -> Result<Vec2> {
        let velocity = self.ball_velocity(id)?;
        if velocity.magnitude2() > self.config.rest_speed_squared {
            let boosted = velocity * 2.0;
            self.set_ball_velocity(id, boosted)?;
            Ok(boosted)
        } else {
            self.launch_ball(id, speed * BOOST_LAUNCH_FACTOR)
        }
    }

    /// Removes every object and unpauses.
    pub fn reset(&mut self) {
        self.is_paused = false;
        self.world.clear();
        self.scene.clear();
        self.entities.clear();
        self.next_wall_id = 0;
        self.frame = 0;
        self.step_resources.insert(CollideCounters::default());
        self.step_resources.insert(CollisionEvents::default());
        info!("simulation reset");
    }

    /// Advances one fixed time step and reports its collisions to `sink`. Does nothing while
    /// paused.
    pub fn step(&mut self, sink: &mut dyn CollisionSink) {
        if self.is_paused {
            return;
        }

        self.step_resources.insert(Time {
            elapsed_seconds: self.config.time_step,
        });
        self.step_resources.insert(mem::take(&mut self.scene));

        self.step_schedule
            .execute(&mut self.world, &mut self.step_resources);

        self.scene = self.step_resources.remove::<Scene>().unwrap_or_default();
        self.frame += 1;

        if let Some(mut events) = self.step_resources.get_mut::<CollisionEvents>() {
            for event in events.drain() {
                sink.on_collision(&event);
            }
        }
    }

    pub fn run(&mut self, frames: u32, sink: &mut dyn CollisionSink) {
        for _ in 0..frames {
            self.step(sink);
        }
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation::build(SimConfig::default(), entropy_rng())
    }
}

fn entropy_rng() -> Pcg32 {
    let mut seed = <Pcg32 as SeedableRng>::Seed::default();
    getrandom::getrandom(&mut seed[..]).unwrap_or_else(|_| {
        warn!("getrandom() failed; proceeding with default random seed");
    });
    Pcg32::from_seed(seed)
}
