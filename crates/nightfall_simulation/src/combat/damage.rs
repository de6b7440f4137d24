//! Damage resolution: таблица модификаторов (damage kind × agent kind) + health ledger
//!
//! Формула: `final = modifier(kind, agent_kind) × amount`.
//! `final ≤ 0` - no-op (ни изменения health, ни сигнала damaged).

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::AIState;
use crate::components::{AgentKind, Health};
use crate::config::ModifierOverride;

/// Тип урона
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum DamageKind {
    #[default]
    Generic,
    /// Луч (фонарик) - источник DOT
    Beam,
    Melee,
}

/// Запрос урона агенту (единственный путь изменения Health агента)
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageRequest {
    pub agent: Entity,
    pub amount: f32,
    pub kind: DamageKind,
    /// Позиция источника урона (если известна) → lastKnownTargetPosition
    pub source: Option<Vec3>,
}

/// Событие: агент получил урон и выжил (presentation trigger `damaged`)
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentDamaged {
    pub agent: Entity,
    pub amount: f32,
    pub health: f32,
    pub kind: DamageKind,
}

/// Событие: агент умер (ровно один раз на агента)
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentDied {
    pub agent: Entity,
}

/// Таблица модификаторов урона
///
/// Отсутствующая пара = 1.0. По умолчанию `(Beam, BeamImmune) → 0.0`.
#[derive(Resource, Debug, Clone)]
pub struct DamageModifiers {
    table: HashMap<(DamageKind, AgentKind), f32>,
}

impl Default for DamageModifiers {
    fn default() -> Self {
        let mut table = HashMap::new();
        table.insert((DamageKind::Beam, AgentKind::BeamImmune), 0.0);
        Self { table }
    }
}

impl DamageModifiers {
    pub fn with_overrides(overrides: &[ModifierOverride]) -> Self {
        let mut modifiers = Self::default();
        for entry in overrides {
            modifiers.set(entry.damage, entry.agent, entry.multiplier);
        }
        modifiers
    }

    pub fn set(&mut self, damage: DamageKind, agent: AgentKind, multiplier: f32) {
        self.table.insert((damage, agent), multiplier);
    }

    pub fn multiplier(&self, damage: DamageKind, agent: AgentKind) -> f32 {
        self.table.get(&(damage, agent)).copied().unwrap_or(1.0)
    }

    /// Агент этого вида вообще получает урон этого типа
    pub fn accepts(&self, damage: DamageKind, agent: AgentKind) -> bool {
        self.multiplier(damage, agent) > 0.0
    }
}

/// Результат применения урона
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DamageOutcome {
    /// Урон не прошёл (агент мёртв, иммунитет, amount ≤ 0)
    Ignored,
    Damaged { amount: f32, health: f32 },
    /// Летальный урон - вызывающий обязан провести death protocol
    Killed { amount: f32 },
}

/// Применяет урон к health агента (без побочных эффектов на FSM)
pub fn resolve_damage(
    health: &mut Health,
    state: AIState,
    agent_kind: AgentKind,
    modifiers: &DamageModifiers,
    amount: f32,
    kind: DamageKind,
) -> DamageOutcome {
    if state == AIState::Dead {
        return DamageOutcome::Ignored;
    }

    let final_damage = modifiers.multiplier(kind, agent_kind) * amount;
    // NaN тоже отсекается этим сравнением
    if !(final_damage > 0.0) {
        return DamageOutcome::Ignored;
    }

    let new_health = health.take_damage(final_damage);
    if new_health <= 0.0 {
        DamageOutcome::Killed { amount: final_damage }
    } else {
        DamageOutcome::Damaged { amount: final_damage, health: new_health }
    }
}
