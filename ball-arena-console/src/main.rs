use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use ball_arena_core::event::{CollisionCounter, CollisionEvent, CollisionObservers, CollisionSink};
use ball_arena_core::scene::{preset, ObjectId, Scene, SceneObject};
use ball_arena_core::{SimConfig, Simulation};
use cgmath::vec2;
use log::info;
use structopt::StructOpt;
use thiserror::Error;

#[derive(Clone, Copy, Debug)]
enum Scenario {
    Console,
    Test,
    Arena,
    RandomWall,
    Bouncing,
}

#[derive(Debug, Error)]
#[error("unknown scenario {0:?}; expected console, test, arena, random-wall or bouncing")]
struct UnknownScenario(String);

impl FromStr for Scenario {
    type Err = UnknownScenario;

    fn from_str(s: &str) -> Result<Scenario, UnknownScenario> {
        match s {
            "console" => Ok(Scenario::Console),
            "test" => Ok(Scenario::Test),
            "arena" => Ok(Scenario::Arena),
            "random-wall" => Ok(Scenario::RandomWall),
            "bouncing" => Ok(Scenario::Bouncing),
            _ => Err(UnknownScenario(s.to_string())),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "ball-arena-console")]
struct Opt {
    /// Arena to simulate: console, test, arena, random-wall or bouncing.
    #[structopt(long, default_value = "console")]
    scenario: Scenario,

    #[structopt(long, default_value = "500")]
    frames: u32,

    /// Print the ball state every this many frames.
    #[structopt(long, default_value = "10")]
    report_every: u32,

    /// Seed for launch directions and random walls.
    #[structopt(long)]
    seed: Option<u64>,

    /// JSON file with simulation settings. Missing fields keep their defaults.
    #[structopt(long, parse(from_os_str))]
    config: Option<PathBuf>,

    /// Use the desktop pipeline settings: sampled sweep, first-hit contact order and double
    /// integration.
    #[structopt(long, conflicts_with = "config")]
    reference: bool,

    /// Launch the first ball in a random direction at this speed before running.
    #[structopt(long)]
    launch_speed: Option<f32>,

    /// Sleep for one time step after every frame.
    #[structopt(long)]
    realtime: bool,
}

/// Prints each collision as it is reported.
struct CollisionPrinter {
    frame: u64,
}

impl CollisionSink for CollisionPrinter {
    fn on_collision(&mut self, event: &CollisionEvent) {
        println!("Frame {:4}: collision with {}", self.frame, event);
    }
}

fn load_config(opt: &Opt) -> Result<SimConfig> {
    if opt.reference {
        return Ok(SimConfig::reference());
    }
    match &opt.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            SimConfig::from_json(&json)
                .with_context(|| format!("parsing config file {}", path.display()))
        }
        None => Ok(SimConfig::default()),
    }
}

fn build_scene(scenario: Scenario, sim: &mut Simulation) -> Result<Scene> {
    let mut scene = match scenario {
        Scenario::Console => preset::console_scene(),
        Scenario::Test => preset::test_scene(),
        Scenario::Arena => preset::arena_scene(),
        Scenario::RandomWall => preset::random_wall_scene(sim.rng_mut()),
        Scenario::Bouncing => preset::bouncing_scene(vec2(60.0, 45.0)),
    };
    if scene.balls().is_empty() {
        scene.create_ball(vec2(50.0, 50.0), 3.0, vec2(0.0, 0.0))?;
    }
    Ok(scene)
}

fn print_ball(sim: &Simulation, id: ObjectId) {
    if let Some(ball) = sim.ball(id) {
        println!(
            "Frame {:4}: position ({:.2}, {:.2}), velocity ({:.2}, {:.2})",
            sim.frame(),
            ball.position.x,
            ball.position.y,
            ball.velocity.x,
            ball.velocity.y
        );
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let config = load_config(&opt)?;
    let mut sim = match opt.seed {
        Some(seed) => Simulation::with_seed(config, seed)?,
        None => Simulation::new(config)?,
    };

    let scene = build_scene(opt.scenario, &mut sim)?;
    sim.load_scene(scene)
        .context("loading scenario into the simulation")?;
    println!("{}", sim.scene());
    for wall in sim.scene().walls() {
        println!("  {}", wall);
    }
    println!("{}", sim.world_info());

    let ball_id = sim.scene().first_ball().map(|ball| ball.id());
    if let (Some(id), Some(speed)) = (ball_id, opt.launch_speed) {
        let velocity = sim.launch_ball(id, speed)?;
        info!("launched ball {} at ({:.2}, {:.2})", id, velocity.x, velocity.y);
    }

    let step = Duration::from_secs_f32(sim.config().time_step);
    let report_every = u64::from(opt.report_every.max(1));
    let mut counter = CollisionCounter::default();
    if let Some(id) = ball_id {
        print_ball(&sim, id);
    }
    for _ in 0..opt.frames {
        let mut printer = CollisionPrinter {
            frame: sim.frame() + 1,
        };
        {
            let mut observers = CollisionObservers::new();
            observers.add(&mut counter);
            observers.add(&mut printer);
            sim.step(&mut observers);
        }

        if let Some(id) = ball_id {
            if sim.frame() % report_every == 0 {
                print_ball(&sim, id);
            }
        }
        if opt.realtime {
            thread::sleep(step);
        }
    }

    println!(
        "Collisions: {} ({} walls, {} boundary)",
        counter.total, counter.walls, counter.boundaries
    );
    Ok(())
}
