use ball_arena_core::component::{Position, SceneLink, Velocity};
use ball_arena_core::event::{
    CollisionCounter, CollisionEvent, CollisionObservers, CollisionTarget, ContactKind,
};
use ball_arena_core::math::Vec2Ext;
use ball_arena_core::scene::{preset, Ball, ObjectId, Scene, SceneObject, Wall};
use ball_arena_core::{ContactOrder, Error, SimConfig, Simulation, Vec2};
use cgmath::{vec2, InnerSpace};
use legion::IntoQuery;

const TOLERANCE: f32 = 1.0e-3;

fn simulation(config: SimConfig, scene: Scene) -> Simulation {
    let mut sim = Simulation::with_seed(config, 42).unwrap();
    sim.load_scene(scene).unwrap();
    sim
}

fn only_ball(sim: &Simulation) -> ObjectId {
    sim.scene().first_ball().unwrap().id()
}

fn assert_inside(position: Vec2, radius: f32, size: f32) {
    assert!(
        position.x >= radius - TOLERANCE
            && position.x <= size - radius + TOLERANCE
            && position.y >= radius - TOLERANCE
            && position.y <= size - radius + TOLERANCE,
        "ball escaped to ({}, {})",
        position.x,
        position.y
    );
}

#[test]
fn slow_ball_drifts_inside_the_box() {
    let mut sim = simulation(SimConfig::default(), preset::bouncing_scene(vec2(2.0, 1.5)));
    let id = only_ball(&sim);
    let mut events: Vec<CollisionEvent> = Vec::new();
    for _ in 0..500 {
        sim.step(&mut events);
        assert_inside(sim.ball(id).unwrap().position, 3.0, 100.0);
    }
    assert!(events.is_empty());
    let expected = vec2(50.0, 50.0) + vec2(2.0, 1.5) * (500.0 / 60.0);
    assert!((sim.ball(id).unwrap().position - expected).magnitude() < 0.01);
    assert_eq!(sim.frame(), 500);
}

#[test]
fn fast_ball_bounces_inside_the_box() {
    let mut sim = simulation(SimConfig::default(), preset::bouncing_scene(vec2(60.0, 45.0)));
    let id = only_ball(&sim);
    let mut events: Vec<CollisionEvent> = Vec::new();
    for _ in 0..500 {
        sim.step(&mut events);
        assert_inside(sim.ball(id).unwrap().position, 3.0, 100.0);
    }
    assert!(!events.is_empty());
    for event in &events {
        assert!((event.normal.magnitude() - 1.0).abs() < TOLERANCE);
    }
    assert!((sim.ball(id).unwrap().velocity.magnitude() - 75.0).abs() < 0.01);
}

#[test]
fn ball_does_not_tunnel_through_thin_wall() {
    let mut scene = preset::arena_scene();
    scene.add_wall(Wall::new(vec2(50.0, 0.0), vec2(50.0, 100.0)));
    let id = scene
        .add_ball(Ball::new(vec2(40.0, 50.0), 3.0, vec2(900.0, 0.0)))
        .unwrap();
    let mut sim = simulation(SimConfig::default(), scene);

    let mut events: Vec<CollisionEvent> = Vec::new();
    sim.step(&mut events);

    let ball = sim.ball(id).unwrap();
    assert!(ball.position.x < 53.0);
    assert!((ball.position.x - 47.0).abs() < TOLERANCE);
    assert!(ball.velocity.approx_eq(vec2(-900.0, 0.0)));

    assert_eq!(events.len(), 1);
    let event = &events[0];
    assert_eq!(event.target, CollisionTarget::Wall(4));
    assert_eq!(event.ball.object, Some(id));
    assert_eq!(event.wall, Some(sim.scene().walls()[4].segment()));
    assert!(event.normal.approx_eq(vec2(-1.0, 0.0)));
    match event.kind {
        ContactKind::Swept { time } => assert!((time - 1.0 / 3.0).abs() < TOLERANCE),
        kind => panic!("unexpected contact kind {:?}", kind),
    }
}

#[test]
fn reference_pipeline_integrates_balls_twice() {
    let scene = preset::bouncing_scene(vec2(60.0, 0.0));
    let mut default = simulation(SimConfig::default(), scene.clone());
    let mut reference = simulation(SimConfig::reference(), scene);
    default.step(&mut ());
    reference.step(&mut ());

    let id = only_ball(&default);
    assert!((default.ball(id).unwrap().position.x - 51.0).abs() < TOLERANCE);
    assert!((reference.ball(id).unwrap().position.x - 52.0).abs() < TOLERANCE);
}

#[test]
fn resting_ball_is_unchanged() {
    let mut sim = simulation(SimConfig::default(), preset::console_scene());
    let id = only_ball(&sim);
    let mut events: Vec<CollisionEvent> = Vec::new();
    sim.run(10, &mut events);

    let ball = sim.ball(id).unwrap();
    assert_eq!(ball.position, vec2(50.0, 50.0));
    assert_eq!(ball.velocity, vec2(0.0, 0.0));
    assert!(events.is_empty());
    assert_eq!(sim.counters().collisions(), 0);
}

fn two_wall_scene() -> (Scene, ObjectId) {
    let mut scene = Scene::new();
    scene.add_wall(Wall::new(vec2(75.0, 0.0), vec2(75.0, 100.0)));
    scene.add_wall(Wall::new(vec2(60.0, 0.0), vec2(60.0, 100.0)));
    let id = scene
        .add_ball(Ball::new(vec2(50.0, 50.0), 1.0, vec2(1800.0, 0.0)))
        .unwrap();
    (scene, id)
}

#[test]
fn earliest_contact_wins_by_default() {
    let (scene, id) = two_wall_scene();
    let config = SimConfig {
        max_substeps: 1,
        ..SimConfig::default()
    };
    let mut sim = simulation(config, scene);
    let mut events: Vec<CollisionEvent> = Vec::new();
    sim.step(&mut events);

    assert_eq!(events[0].target, CollisionTarget::Wall(1));
    assert!((sim.ball(id).unwrap().position.x - 59.0).abs() < TOLERANCE);
}

#[test]
fn first_hit_order_follows_wall_order() {
    let (scene, id) = two_wall_scene();
    let config = SimConfig {
        max_substeps: 1,
        contact_order: ContactOrder::FirstHit,
        ..SimConfig::default()
    };
    let mut sim = simulation(config, scene);
    let mut events: Vec<CollisionEvent> = Vec::new();
    sim.step(&mut events);

    assert_eq!(events[0].target, CollisionTarget::Wall(0));
    assert!((sim.ball(id).unwrap().position.x - 74.0).abs() < TOLERANCE);
}

#[test]
fn degenerate_wall_acts_as_point() {
    let mut scene = Scene::new();
    scene.add_wall(Wall::new(vec2(60.0, 50.0), vec2(60.0, 50.0)));
    let id = scene
        .add_ball(Ball::new(vec2(50.0, 50.0), 3.0, vec2(600.0, 0.0)))
        .unwrap();
    let mut sim = simulation(SimConfig::default(), scene);
    let mut events: Vec<CollisionEvent> = Vec::new();
    sim.step(&mut events);

    let ball = sim.ball(id).unwrap();
    assert!((ball.position.x - 57.0).abs() < TOLERANCE);
    assert!(ball.velocity.approx_eq(vec2(-600.0, 0.0)));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].point, vec2(60.0, 50.0));
    assert_eq!(events[0].substep, 2);
}

#[test]
fn observers_receive_every_event() {
    let mut sim = simulation(SimConfig::default(), preset::bouncing_scene(vec2(90.0, 35.0)));
    let mut counter = CollisionCounter::default();
    let mut events: Vec<CollisionEvent> = Vec::new();
    {
        let mut observers = CollisionObservers::new();
        observers.add(&mut counter);
        observers.add(&mut events);
        assert_eq!(observers.len(), 2);
        sim.run(240, &mut observers);
    }
    assert!(counter.total > 0);
    assert_eq!(counter.total, events.len());
    assert_eq!(counter.walls + counter.boundaries, counter.total);
}

#[test]
fn counters_describe_the_last_step() {
    let mut sim = simulation(SimConfig::default(), preset::bouncing_scene(vec2(900.0, 0.0)));
    sim.step(&mut ());
    let counters = sim.counters();
    assert_eq!(counters.balls, 1);
    assert_eq!(counters.walls, 4);
    assert_eq!(counters.substeps, 5);
    assert_eq!(counters.collisions(), 0);
}

#[test]
fn paused_simulation_does_not_step() {
    let mut sim = simulation(SimConfig::default(), preset::bouncing_scene(vec2(30.0, 0.0)));
    let id = only_ball(&sim);
    sim.set_is_paused(true);
    sim.run(5, &mut ());
    assert_eq!(sim.frame(), 0);
    assert_eq!(sim.ball(id).unwrap().position, vec2(50.0, 50.0));

    sim.set_is_paused(false);
    sim.step(&mut ());
    assert_eq!(sim.frame(), 1);
    assert!((sim.ball(id).unwrap().position.x - 50.5).abs() < TOLERANCE);
}

#[test]
fn scene_mirrors_entity_state() {
    let mut sim = simulation(SimConfig::default(), preset::bouncing_scene(vec2(70.0, -40.0)));
    sim.run(90, &mut ());
    let mut mirrored = 0;
    for (&Position(pos), &Velocity(vel), &SceneLink(id)) in
        <(&Position, &Velocity, &SceneLink)>::query().iter(sim.world())
    {
        let ball = sim.scene().ball(id).unwrap();
        assert_eq!(ball.position, pos);
        assert_eq!(ball.velocity, vel);
        mirrored += 1;
    }
    assert_eq!(mirrored, 1);
}

#[test]
fn launch_and_boost() {
    let mut sim = simulation(SimConfig::default(), preset::console_scene());
    let id = only_ball(&sim);

    let launched = sim.launch_ball(id, 30.0).unwrap();
    assert!((launched.magnitude() - 30.0).abs() < TOLERANCE);
    assert_eq!(sim.ball_velocity(id).unwrap(), launched);
    assert_eq!(sim.ball(id).unwrap().velocity, launched);

    let boosted = sim.boost_ball(id, 30.0).unwrap();
    assert!(boosted.approx_eq(launched * 2.0));

    sim.set_ball_velocity(id, vec2(0.0, 0.0)).unwrap();
    let relaunched = sim.boost_ball(id, 30.0).unwrap();
    assert!((relaunched.magnitude() - 300.0).abs() < 0.01);
}

#[test]
fn seeded_launches_are_reproducible() {
    let mut a = simulation(SimConfig::default(), preset::console_scene());
    let mut b = simulation(SimConfig::default(), preset::console_scene());
    let id = only_ball(&a);
    assert_eq!(a.launch_ball(id, 10.0).unwrap(), b.launch_ball(id, 10.0).unwrap());
}

#[test]
fn object_bookkeeping() {
    let mut sim = simulation(SimConfig::default(), preset::console_scene());
    let id = only_ball(&sim);
    assert_eq!(sim.world_info(), "Entities: 5");

    let extra = sim
        .add_ball(Ball::new(vec2(20.0, 20.0), 2.0, vec2(0.0, 0.0)))
        .unwrap();
    assert_eq!(sim.world_info(), "Entities: 6");
    assert!(matches!(
        sim.add_ball(Ball::new(vec2(20.0, 20.0), -2.0, vec2(0.0, 0.0))),
        Err(Error::InvalidRadius(_))
    ));

    sim.remove_object(extra).unwrap();
    assert_eq!(sim.world_info(), "Entities: 5");
    assert!(matches!(
        sim.remove_object(extra),
        Err(Error::UnknownObject(missing)) if missing == extra
    ));
    assert!(matches!(
        sim.launch_ball(extra, 1.0),
        Err(Error::UnknownObject(_))
    ));

    sim.clear_balls();
    assert_eq!(sim.world_info(), "Entities: 4");
    assert!(sim.ball(id).is_none());
    assert_eq!(sim.scene().walls().len(), 4);

    let wall = sim.add_wall(Wall::new(vec2(10.0, 10.0), vec2(20.0, 20.0)));
    assert_eq!(sim.world_info(), "Entities: 5");
    sim.remove_object(wall).unwrap();

    sim.step(&mut ());
    sim.reset();
    assert_eq!(sim.world_info(), "Entities: 0");
    assert_eq!(sim.scene().object_count(), 0);
    assert_eq!(sim.frame(), 0);
    assert!(!sim.is_paused());
}

#[test]
fn load_scene_rejects_invalid_balls() {
    let mut scene = preset::console_scene();
    let id = scene.first_ball().unwrap().id();
    scene.ball_mut(id).unwrap().radius = 0.0;

    let mut sim = Simulation::with_seed(SimConfig::default(), 1).unwrap();
    assert!(matches!(sim.load_scene(scene), Err(Error::InvalidRadius(_))));
    assert_eq!(sim.world_info(), "Entities: 0");
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimConfig {
        time_step: -1.0,
        ..SimConfig::default()
    };
    assert!(matches!(
        Simulation::new(config),
        Err(Error::InvalidTimeStep(_))
    ));
}
