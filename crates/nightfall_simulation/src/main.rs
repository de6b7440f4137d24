//! Headless симуляция Nightfall
//!
//! Запускает Bevy App без рендера: два агента на маршруте, цель с фонариком
//! и стена между ними. Конфиг можно передать JSON-файлом первым аргументом.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use nightfall_simulation::{
    create_stepped_app, logger, spawn_agent, spawn_obstacle, spawn_target, AIState, AgentKind, AgentSpawn,
    DefeatedAgents, Health, PatrolMode, PatrolRoute, SimulationConfig, TargetHealth,
};

fn load_config() -> SimulationConfig {
    let Some(path) = std::env::args().nth(1) else {
        return SimulationConfig::default();
    };

    let loaded = std::fs::read_to_string(&path)
        .map_err(|error| error.to_string())
        .and_then(|source| SimulationConfig::from_json(&source).map_err(|error| error.to_string()));

    match loaded {
        Ok(config) => config,
        Err(error) => {
            logger::log_error(&format!("❌ Config {path}: {error}, using defaults"));
            SimulationConfig::default()
        }
    }
}

fn main() {
    logger::init_logger();
    logger::set_log_level(logger::LogLevel::Info);

    let config = load_config();
    logger::log_info(&format!(
        "Starting Nightfall headless simulation (seed: {}, {} Hz)",
        config.seed, config.fixed_hz
    ));

    let agent_settings = config.agent.clone();
    let beam_settings = config.beam.clone();
    let mut app = create_stepped_app(config);

    // Ручное время: 30 секунд симуляции = 30 × fixed_hz update
    let fixed_hz = app
        .world()
        .get_resource::<SimulationConfig>()
        .map_or(SimulationConfig::default().fixed_hz, |config| config.fixed_hz);
    let ticks = (fixed_hz * 30.0).round() as u32;

    let route = PatrolRoute::new(
        vec![
            Vec3::new(-8.0, 0.0, -8.0),
            Vec3::new(8.0, 0.0, -8.0),
            Vec3::new(8.0, 0.0, 8.0),
            Vec3::new(-8.0, 0.0, 8.0),
        ],
        PatrolMode::InOrder,
        agent_settings.waypoint_wait_time,
    );

    {
        let mut commands = app.world_mut().commands();
        let spawns = [
            AgentSpawn::new(Vec3::new(-8.0, 0.0, -8.0), AgentKind::BeamVulnerable, route.clone())
                .with_settings(agent_settings.clone())
                .with_persistent_id("crypt_eye_01"),
            AgentSpawn::new(Vec3::new(8.0, 0.0, 8.0), AgentKind::BeamImmune, route)
                .with_settings(agent_settings)
                .with_persistent_id("crypt_ear_01"),
        ];
        for spawn in &spawns {
            spawn_agent(&mut commands, spawn);
        }

        // Цель в центре, фонарик смотрит на -Z
        spawn_target(&mut commands, Transform::from_xyz(0.0, 0.0, 0.0), 100.0, &beam_settings);
        spawn_obstacle(&mut commands, Transform::from_xyz(0.0, 0.0, 4.0), Collider::cuboid(3.0, 2.0, 0.25));
    }
    app.world_mut().flush();

    for tick in 0..ticks {
        app.update();

        if tick % 60 == 0 {
            let world = app.world_mut();
            let mut agents = world.query::<(Entity, &AIState, &Health)>();
            for (entity, state, health) in agents.iter(world) {
                logger::log_info(&format!(
                    "Tick {tick}: {entity:?} {state:?} HP {:.1}/{:.1}",
                    health.current, health.max
                ));
            }
            let mut targets = world.query::<&TargetHealth>();
            for target in targets.iter(world) {
                logger::log_info(&format!("Tick {tick}: target HP {:.1}/{:.1}", target.current, target.max));
            }
        }
    }

    let defeated = app.world().resource::<DefeatedAgents>();
    match serde_json::to_string(defeated) {
        Ok(json) => logger::log_info(&format!("Simulation complete! Defeated: {json}")),
        Err(error) => logger::log_error(&format!("❌ Failed to serialize defeated agents: {error}")),
    }
}
