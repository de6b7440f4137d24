//! FSM AI components (state machine, config, last known target position).

use bevy::prelude::*;

use crate::config::AgentSettings;

/// AI FSM состояния
///
/// Dead - поглощающее: из него нет переходов.
/// Idle - только для агентов без маршрута или без locomotion service.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Component)]
pub enum AIState {
    #[default]
    Patrolling,
    /// Преследование цели на chase скорости
    Chasing,
    /// Цель потеряна - идём к последней известной позиции
    SearchingLastKnown,
    /// Цель в радиусе атаки
    Attacking,
    Idle,
    Dead,
}

impl AIState {
    /// Боевые состояния (агент держит combat track)
    pub fn in_combat(&self) -> bool {
        matches!(self, AIState::Chasing | AIState::SearchingLastKnown | AIState::Attacking)
    }
}

/// Последняя известная позиция цели
///
/// Обновляется при видимости цели и при провокации уроном.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct LastKnownTarget {
    pub position: Option<Vec3>,
}

/// Параметры восприятия и навигации агента
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct AIConfig {
    /// Радиус зрения (sphere test)
    pub sight_range: f32,
    /// Смещение "глаз" от позиции агента (начало луча occlusion)
    pub eye_offset: Vec3,
    /// Остаток пути, при котором waypoint считается достигнутым
    pub arrival_tolerance: f32,
    /// Остаток пути, при котором last known позиция считается достигнутой
    pub stopping_tolerance: f32,
}

impl Default for AIConfig {
    fn default() -> Self {
        Self::from_settings(&AgentSettings::default())
    }
}

impl AIConfig {
    pub fn from_settings(settings: &AgentSettings) -> Self {
        Self {
            sight_range: settings.sight_range,
            eye_offset: Vec3::new(0.0, settings.eye_height, 0.0),
            arrival_tolerance: settings.arrival_tolerance,
            stopping_tolerance: settings.stopping_tolerance,
        }
    }
}

/// Реакция на полученный урон (агент выжил)
///
/// Патрулирующий или ищущий агент переходит в Chasing; преследующий/атакующий
/// только обновляет last known позицию. Idle и Dead не реагируют.
/// Returns `true`, если агент только что вошёл в Chasing.
pub fn provoke_by_damage(state: &mut AIState, last_known: &mut LastKnownTarget, source: Option<Vec3>) -> bool {
    match *state {
        AIState::Idle | AIState::Dead => false,
        AIState::Chasing | AIState::Attacking => {
            if source.is_some() {
                last_known.position = source;
            }
            false
        }
        AIState::Patrolling | AIState::SearchingLastKnown => {
            if source.is_some() {
                last_known.position = source;
            }
            *state = AIState::Chasing;
            true
        }
    }
}
