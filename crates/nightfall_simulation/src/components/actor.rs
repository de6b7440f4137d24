//! Базовые компоненты: Agent (враждебный NPC), Health, Target (игрок)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Вариант агента - определяет, какие типы урона на него действуют
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum AgentKind {
    /// Получает урон от луча (eye-type)
    #[default]
    BeamVulnerable,
    /// Иммунен к лучу (ear-type)
    BeamImmune,
}

/// Враждебный агент (один на entity)
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Agent {
    pub kind: AgentKind,
}

impl Agent {
    pub fn new(kind: AgentKind) -> Self {
        Self { kind }
    }
}

/// Здоровье агента
///
/// Инвариант: 0.0 ≤ current ≤ max
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// Доля оставшегося здоровья (0..1), для save/world-state коллабораторов
    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Вычитает урон с clamp в [0, max]. Возвращает новое значение.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.current
    }
}

/// Маркер единственной отслеживаемой цели (игрок)
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
pub struct Target;

/// Здоровье цели с регенерацией после паузы без урона
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct TargetHealth {
    pub current: f32,
    pub max: f32,
    /// Пауза без урона до начала регенерации (секунды)
    pub regen_delay: f32,
    /// Скорость регенерации (hp/sec), 0 = выключена
    pub regen_rate: f32,
    pub since_last_damage: f32,
}

impl Default for TargetHealth {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl TargetHealth {
    pub fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            regen_delay: 5.0,
            regen_rate: 10.0,
            since_last_damage: 0.0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn percentage(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }

    /// Урон по цели. Мёртвая цель урон не принимает.
    pub fn take_damage(&mut self, amount: f32) {
        if !self.is_alive() {
            return;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
        self.since_last_damage = 0.0;
    }

    pub fn regenerate(&mut self, delta: f32) {
        if !self.is_alive() || self.regen_rate <= 0.0 || self.current >= self.max {
            return;
        }
        self.since_last_damage += delta;
        if self.since_last_damage >= self.regen_delay {
            self.current = (self.current + self.regen_rate * delta).min(self.max);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_damage_clamped() {
        let mut health = Health::new(100.0);
        assert_eq!(health.take_damage(30.0), 70.0);
        assert!(health.is_alive());

        assert_eq!(health.take_damage(500.0), 0.0);
        assert!(!health.is_alive());
        assert_eq!(health.percentage(), 0.0);
    }

    #[test]
    fn test_health_negative_amount_never_exceeds_max() {
        let mut health = Health::new(50.0);
        health.take_damage(-20.0);
        assert_eq!(health.current, 50.0);
    }

    #[test]
    fn test_target_regen_after_delay() {
        let mut target = TargetHealth::new(100.0);
        target.take_damage(40.0);
        assert_eq!(target.current, 60.0);

        // 4 секунды без урона - регенерации ещё нет
        target.regenerate(4.0);
        assert_eq!(target.current, 60.0);

        // ещё 1 сек → порог 5 сек достигнут, +10 hp/sec × 1
        target.regenerate(1.0);
        assert_eq!(target.current, 70.0);

        target.regenerate(10.0); // Clamp to max
        assert_eq!(target.current, 100.0);
    }

    #[test]
    fn test_dead_target_ignores_damage_and_regen() {
        let mut target = TargetHealth::new(10.0);
        target.take_damage(25.0);
        assert!(!target.is_alive());

        target.take_damage(5.0);
        target.regenerate(100.0);
        assert_eq!(target.current, 0.0);
    }
}
