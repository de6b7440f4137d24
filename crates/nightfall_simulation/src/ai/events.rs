//! AI Events - сигналы FSM для коллабораторов (audio broker, presentation)

use bevy::prelude::*;

/// Вход/выход агента из боя
///
/// Entered: переход в Chasing (из патруля, поиска или от урона).
/// Exited: возврат к патрулю после поиска, деградация в Idle, смерть.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatPresence {
    Entered { agent: Entity },
    Exited { agent: Entity },
}

impl CombatPresence {
    pub fn agent(&self) -> Entity {
        match self {
            CombatPresence::Entered { agent } | CombatPresence::Exited { agent } => *agent,
        }
    }
}

/// Агент нанёс удар по цели (presentation trigger `attack`)
#[derive(Event, Debug, Clone, Copy)]
pub struct AgentAttacked {
    pub agent: Entity,
    pub target: Entity,
    pub damage: f32,
}
