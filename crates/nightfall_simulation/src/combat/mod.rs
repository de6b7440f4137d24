//! Combat module: health ledger агентов, damage-over-time, атака по цели
//!
//! ECS ответственность:
//! - Health агента меняется только через `DamageRequest` (apply_damage_requests)
//! - DOT (луч) → периодические `DamageRequest` + замедление агента
//! - TargetHealth (игрок) - урон от атак агентов + регенерация
//!
//! Events: DamageRequest, DotRequest → AgentDamaged, AgentDied

use bevy::prelude::*;

pub mod attacker;
pub mod damage;
pub mod dot;
pub mod systems;

// Re-export основных типов
pub use attacker::Attacker;
pub use damage::{
    resolve_damage, AgentDamaged, AgentDied, DamageKind, DamageModifiers, DamageOutcome, DamageRequest,
};
pub use dot::{DotDuration, DotEffect, DotRequest, DotState, DotStep};
pub use systems::{apply_damage_requests, apply_dot_requests, regenerate_target_health, tick_dot_effects};

use crate::SimulationSet;

/// Combat Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. tick_dot_effects - тики активных DOT (до старта новых, чтобы свежий эффект не продвигался дважды)
/// 2. apply_dot_requests - старт DOT по запросам луча
/// 3. apply_damage_requests - единственная точка изменения Health агента + death protocol
/// 4. regenerate_target_health - регенерация цели (после атак агентов)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<DamageRequest>()
            .add_event::<DotRequest>()
            .add_event::<AgentDamaged>()
            .add_event::<AgentDied>();

        if !app.world().contains_resource::<DamageModifiers>() {
            app.insert_resource(DamageModifiers::default());
        }

        app.add_systems(FixedUpdate, tick_dot_effects.in_set(SimulationSet::DamageOverTime))
            .add_systems(
                FixedUpdate,
                (apply_dot_requests, apply_damage_requests)
                    .chain()
                    .in_set(SimulationSet::Damage),
            )
            .add_systems(FixedUpdate, regenerate_target_health.in_set(SimulationSet::Report));
    }
}
