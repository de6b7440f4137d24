//! Общие helpers для integration тестов: ручное время, спавн без Commands

#![allow(dead_code)]

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use nightfall_simulation::*;

/// Длина одного fixed тика в тестах (точно представима в f32)
pub const TICK_SECS: f32 = 0.25;

pub fn test_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        fixed_hz: 1.0 / TICK_SECS as f64,
        seed,
        ..SimulationConfig::default()
    }
}

/// Headless App, в котором один `app.update()` = ровно один fixed тик
pub fn stepped_app(config: SimulationConfig) -> App {
    create_stepped_app(config)
}

pub fn run_ticks(app: &mut App, ticks: usize) {
    for _ in 0..ticks {
        app.update();
    }
}

pub fn spawn_agent_now(app: &mut App, spawn: &AgentSpawn) -> Entity {
    let mut entity = app.world_mut().spawn(spawn.bundle());
    if spawn.locomotion_bound {
        entity.insert(LocomotionStatus::default());
    }
    if let Some(id) = &spawn.persistent_id {
        entity.insert(PersistentId(id.clone()));
    }
    entity.id()
}

/// Цель без фонарика
pub fn spawn_plain_target(app: &mut App, position: Vec3) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position),
            Target,
            TargetHealth::new(100.0),
            Collider::capsule_y(0.5, 0.4),
        ))
        .id()
}

/// Цель с фонариком, смотрящим на `look_at`
pub fn spawn_beam_target(app: &mut App, position: Vec3, look_at: Vec3, beam: &BeamSettings) -> Entity {
    app.world_mut()
        .spawn((
            Transform::from_translation(position).looking_at(look_at, Vec3::Y),
            Target,
            TargetHealth::new(100.0),
            BeamEmitter::from_settings(beam),
            IlluminatedSet::default(),
            Collider::capsule_y(0.5, 0.4),
        ))
        .id()
}

pub fn line_route(points: &[Vec3]) -> PatrolRoute {
    PatrolRoute::new(points.to_vec(), PatrolMode::InOrder, 1.0)
}

pub fn state_of(app: &App, entity: Entity) -> Option<AIState> {
    app.world().get::<AIState>(entity).copied()
}

pub fn health_of(app: &App, entity: Entity) -> Option<f32> {
    app.world().get::<Health>(entity).map(|health| health.current)
}
