//! Nightfall Simulation Core
//!
//! ECS-симуляция враждебных агентов на Bevy 0.16 (headless, FixedUpdate):
//! - perception (sight range + occlusion через Rapier коллайдеры)
//! - патруль по waypoints, FSM patrol → chase → search → attack → dead
//! - health + damage modifiers + DOT с замедлением
//! - beam emitter (фонарик цели), который запускает DOT на освещённых агентах
//!
//! Рендер, звук, сохранения и pathfinding - внешние коллабораторы:
//! симуляция публикует для них компоненты и события.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod beam;
pub mod combat;
pub mod combat_audio;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;
pub mod patrol;
pub mod perception;
pub mod persistence;
pub mod spawn;

// Re-export базовых компонентов для удобства
pub use ai::{AIConfig, AIPlugin, AIState, AgentAttacked, CombatPresence, LastKnownTarget, PresentationState};
pub use beam::{BeamEmitter, BeamPlugin, IlluminatedSet};
pub use combat::{
    AgentDamaged, AgentDied, Attacker, CombatPlugin, DamageKind, DamageModifiers, DamageRequest, DotDuration,
    DotRequest, DotState,
};
pub use combat_audio::{CombatAudioPlugin, CombatTrackBroker, CombatTrackChanged};
pub use components::*;
pub use config::{AgentSettings, BeamSettings, ConfigError, SimulationConfig};
pub use logger::{init_logger, log, log_error, log_info, log_warning};
pub use movement::HeadlessLocomotionPlugin;
pub use patrol::{PatrolMode, PatrolProgress, PatrolRoute};
pub use persistence::{DefeatedAgents, PersistencePlugin, PersistentId};
pub use spawn::{spawn_agent, spawn_obstacle, spawn_target, AgentBundle, AgentSpawn};

/// Фазы тика симуляции (FixedUpdate, строго по порядку)
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Тики активных DOT
    DamageOverTime,
    /// Сканирование лучей → DotRequest
    Beam,
    /// Старт DOT + применение урона (death protocol)
    Damage,
    /// FSM, атака, locomotion intent
    Decision,
    /// Presentation, persistence, audio broker, регенерация цели
    Report,
    /// Исполнитель locomotion (headless)
    Locomotion,
}

/// Главный plugin симуляции (объединяет все подсистемы)
#[derive(Default)]
pub struct SimulationPlugin {
    pub config: SimulationConfig,
}

impl SimulationPlugin {
    pub fn with_config(config: SimulationConfig) -> Self {
        Self { config }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        let config = match self.config.validate() {
            Ok(()) => self.config.clone(),
            Err(error) => {
                logger::log_error(&format!("❌ {error}, falling back to defaults"));
                SimulationConfig::default()
            }
        };

        app.configure_sets(
            FixedUpdate,
            (
                SimulationSet::DamageOverTime,
                SimulationSet::Beam,
                SimulationSet::Damage,
                SimulationSet::Decision,
                SimulationSet::Report,
                SimulationSet::Locomotion,
            )
                .chain(),
        );

        // Детерминистичный RNG: seed из конфига, если хост не поставил свой
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(config.seed));
        }

        app.insert_resource(Time::<Fixed>::from_hz(config.fixed_hz))
            .insert_resource(DamageModifiers::with_overrides(&config.damage_modifiers))
            .insert_resource(config)
            // Подсистемы
            .add_plugins((CombatPlugin, BeamPlugin, AIPlugin, PersistencePlugin, CombatAudioPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// MinimalPlugins + SimulationPlugin + HeadlessLocomotionPlugin.
pub fn create_headless_app(config: SimulationConfig) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(config.seed))
        .add_plugins((SimulationPlugin::with_config(config), HeadlessLocomotionPlugin));

    app
}

/// Headless App с ручным временем: один `app.update()` = ровно один fixed тик
///
/// Wall-clock время здесь не используется, поэтому прогон N тиков занимает
/// столько update, сколько тиков, независимо от скорости машины.
pub fn create_stepped_app(config: SimulationConfig) -> App {
    let mut app = create_headless_app(config);

    // Шаг берём из Time<Fixed>: SimulationPlugin уже заменил невалидный конфиг дефолтным
    let step = app
        .world()
        .get_resource::<Time<Fixed>>()
        .map(|time| time.timestep())
        .unwrap_or(Duration::from_secs_f64(1.0 / SimulationConfig::default().fixed_hz));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(step));

    // Первый update только запускает часы (delta = 0, fixed тика нет)
    app.update();
    app
}
