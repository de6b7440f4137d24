//! Movement компоненты: скорости агента, locomotion intent/status
//!
//! Архитектура:
//! - ECS система пишет LocomotionIntent (high-level intent)
//! - Внешний locomotion service (NavMesh/pathfinding) читает intent и двигает тело
//! - Service между тиками заполняет LocomotionStatus; FSM его только опрашивает

use bevy::prelude::*;

/// Скорости агента (метры/сек)
///
/// Инвариант: без активного DOT `walk == base_walk` и `chase == base_chase`.
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct MovementSpeeds {
    pub base_walk: f32,
    pub base_chase: f32,
    pub walk: f32,
    pub chase: f32,
}

impl Default for MovementSpeeds {
    fn default() -> Self {
        Self::new(3.0, 6.0)
    }
}

impl MovementSpeeds {
    pub fn new(walk: f32, chase: f32) -> Self {
        Self {
            base_walk: walk,
            base_chase: chase,
            walk,
            chase,
        }
    }

    /// Замедление от DOT: всегда от базовых значений (повторный вызов не накапливается)
    pub fn apply_penalty(&mut self, factor: f32) {
        self.walk = self.base_walk * factor;
        self.chase = self.base_chase * factor;
    }

    /// Безусловный reset к базовым значениям
    pub fn restore(&mut self) {
        self.walk = self.base_walk;
        self.chase = self.base_chase;
    }
}

/// Команда для locomotion service (fire-and-forget)
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub enum LocomotionIntent {
    /// Стоять на месте (нулевая скорость)
    #[default]
    Hold,
    /// Двигаться к позиции с указанной скоростью
    MoveTo { position: Vec3, speed: f32 },
}

/// Отчёт locomotion service (polled, не awaited)
///
/// Наличие компонента = агент привязан к locomotion service.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default, Reflect)]
#[reflect(Component)]
pub struct LocomotionStatus {
    /// Текущая цель, которую исполняет service (None после stop)
    pub destination: Option<Vec3>,
    pub remaining_distance: f32,
    pub path_pending: bool,
    pub velocity: Vec3,
}

impl LocomotionStatus {
    /// Service дошёл до `point` (та же цель, путь посчитан, остаток ≤ tolerance)
    pub fn has_arrived_at(&self, point: Vec3, tolerance: f32) -> bool {
        const SAME_DESTINATION_EPSILON: f32 = 0.01;

        let Some(destination) = self.destination else {
            return false;
        };
        destination.distance(point) <= SAME_DESTINATION_EPSILON
            && !self.path_pending
            && self.remaining_distance <= tolerance
    }
}
