//! Attacker component - атака агента по цели (игроку)
//!
//! Cooldown хранится как момент времени (`cooldown_until`), а не как таймер:
//! атака разрешена, когда `now ≥ cooldown_until`.

use bevy::prelude::*;

#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Attacker {
    /// Урон одного удара по цели
    pub damage: f32,

    /// Cooldown между атаками (секунды)
    pub cooldown: f32,

    /// Дистанция атаки (Chasing → Attacking)
    pub range: f32,

    /// Момент (fixed time, секунды), после которого можно снова атаковать
    pub cooldown_until: f32,
}

impl Default for Attacker {
    fn default() -> Self {
        Self {
            damage: 25.0,
            cooldown: 2.0,
            range: 2.0,
            cooldown_until: 0.0,
        }
    }
}

impl Attacker {
    pub fn new(damage: f32, cooldown: f32, range: f32) -> Self {
        Self {
            damage,
            cooldown,
            range,
            cooldown_until: 0.0,
        }
    }

    pub fn can_attack(&self, now: f32) -> bool {
        now >= self.cooldown_until
    }

    pub fn start_attack(&mut self, now: f32) {
        self.cooldown_until = now + self.cooldown;
    }

    pub fn in_range(&self, distance: f32) -> bool {
        distance <= self.range
    }
}
