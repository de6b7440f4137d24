//! Spawn helpers: агент, цель с лучом, препятствия
//!
//! Каждый helper создаёт entity с полным набором компонентов:
//! - Transform (позиция)
//! - доменные компоненты (Agent/Health/AIState/... или Target/TargetHealth)
//! - Rapier: Collider (+ RigidBody::KinematicPositionBased для акторов)

use bevy::prelude::*;
use bevy_rapier3d::prelude::{Collider, RigidBody};

use crate::ai::{AIConfig, AIState, LastKnownTarget, PresentationState};
use crate::beam::{BeamEmitter, IlluminatedSet};
use crate::combat::{Attacker, DotState};
use crate::components::{Agent, AgentKind, Health, LocomotionIntent, LocomotionStatus, MovementSpeeds, Target, TargetHealth};
use crate::config::{AgentSettings, BeamSettings};
use crate::patrol::{PatrolProgress, PatrolRoute};
use crate::persistence::PersistentId;

/// Описание агента для спавна
#[derive(Debug, Clone)]
pub struct AgentSpawn {
    pub position: Vec3,
    pub kind: AgentKind,
    pub route: PatrolRoute,
    pub settings: AgentSettings,
    pub persistent_id: Option<String>,
    /// Хост (save system) пометил агента как уже убитого - не спавним
    pub already_defeated: bool,
    /// Агент привязан к locomotion service (есть LocomotionStatus)
    pub locomotion_bound: bool,
}

impl AgentSpawn {
    pub fn new(position: Vec3, kind: AgentKind, route: PatrolRoute) -> Self {
        Self {
            position,
            kind,
            route,
            settings: AgentSettings::default(),
            persistent_id: None,
            already_defeated: false,
            locomotion_bound: true,
        }
    }

    pub fn with_settings(mut self, settings: AgentSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_persistent_id(mut self, id: impl Into<String>) -> Self {
        self.persistent_id = Some(id.into());
        self
    }

    /// Стартовое состояние: без маршрута или без locomotion → Idle
    pub fn initial_state(&self) -> AIState {
        if self.route.is_empty() || !self.locomotion_bound {
            AIState::Idle
        } else {
            AIState::Patrolling
        }
    }

    pub fn bundle(&self) -> AgentBundle {
        let settings = &self.settings;
        AgentBundle {
            agent: Agent::new(self.kind),
            health: Health::new(settings.max_health),
            speeds: MovementSpeeds::new(settings.walk_speed, settings.chase_speed),
            state: self.initial_state(),
            config: AIConfig::from_settings(settings),
            attacker: Attacker::new(settings.attack_damage, settings.attack_cooldown, settings.attack_range),
            last_known: LastKnownTarget::default(),
            route: self.route.clone(),
            progress: PatrolProgress::default(),
            dot: DotState::new(settings.dot_speed_factor),
            intent: LocomotionIntent::Hold,
            presentation: PresentationState::default(),
            transform: Transform::from_translation(self.position),
            collider: Collider::capsule_y(0.5, 0.4), // Высота 1.0m (0.5 + 0.5), радиус 0.4m
            rigid_body: RigidBody::KinematicPositionBased,
        }
    }
}

/// Полный набор компонентов агента (без LocomotionStatus и PersistentId)
#[derive(Bundle)]
pub struct AgentBundle {
    pub agent: Agent,
    pub health: Health,
    pub speeds: MovementSpeeds,
    pub state: AIState,
    pub config: AIConfig,
    pub attacker: Attacker,
    pub last_known: LastKnownTarget,
    pub route: PatrolRoute,
    pub progress: PatrolProgress,
    pub dot: DotState,
    pub intent: LocomotionIntent,
    pub presentation: PresentationState,
    pub transform: Transform,
    pub collider: Collider,
    pub rigid_body: RigidBody,
}

/// Спавн агента. Returns `None`, если агент уже убит в прошлой сессии.
pub fn spawn_agent(commands: &mut Commands, spawn: &AgentSpawn) -> Option<Entity> {
    if spawn.already_defeated {
        crate::log(&format!(
            "💾 Skipping defeated agent {:?}",
            spawn.persistent_id.as_deref().unwrap_or("<unnamed>")
        ));
        return None;
    }

    if spawn.route.is_empty() {
        crate::logger::log_warning(&format!("⚠️ Agent at {:?} has no waypoints → Idle", spawn.position));
    }
    if !spawn.locomotion_bound {
        crate::logger::log_warning(&format!("⚠️ Agent at {:?} has no locomotion binding → Idle", spawn.position));
    }

    let mut entity = commands.spawn(spawn.bundle());
    if spawn.locomotion_bound {
        entity.insert(LocomotionStatus::default());
    }
    if let Some(id) = &spawn.persistent_id {
        entity.insert(PersistentId(id.clone()));
    }

    let id = entity.id();
    crate::log(&format!("👁️ Spawned {:?} agent {:?} at {:?}", spawn.kind, id, spawn.position));
    Some(id)
}

/// Спавн цели (игрока) с лучом. Луч смотрит вдоль `transform.forward()`.
pub fn spawn_target(commands: &mut Commands, transform: Transform, max_health: f32, beam: &BeamSettings) -> Entity {
    commands
        .spawn((
            transform,
            Target,
            TargetHealth::new(max_health),
            BeamEmitter::from_settings(beam),
            IlluminatedSet::default(),
            Collider::capsule_y(0.5, 0.4),
            RigidBody::KinematicPositionBased,
        ))
        .id()
}

/// Спавн статичного препятствия (occluder для perception и луча)
pub fn spawn_obstacle(commands: &mut Commands, transform: Transform, collider: Collider) -> Entity {
    commands.spawn((transform, collider, RigidBody::Fixed)).id()
}
