//! AI decision-making module
//!
//! FSM враждебного агента: patrol → chase → search → attack → dead.
//! Perception и патруль - pure функции (perception, patrol), FSM их оркеструет
//! и владеет locomotion intent.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::*;
pub use systems::*;

use crate::SimulationSet;

/// AI Plugin
///
/// Регистрирует AI системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. ai_fsm_transitions - perception + обновление FSM state
/// 2. ai_attack_execution - удар по цели в Attacking (cooldown)
/// 3. ai_locomotion_from_state - конвертация state → LocomotionIntent
/// 4. update_presentation_state - state + normalized speed для анимации
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatPresence>().add_event::<AgentAttacked>();

        app.add_systems(
            FixedUpdate,
            (ai_fsm_transitions, ai_attack_execution, ai_locomotion_from_state)
                .chain() // Последовательное выполнение для детерминизма
                .in_set(SimulationSet::Decision),
        )
        .add_systems(FixedUpdate, update_presentation_state.in_set(SimulationSet::Report));
    }
}
