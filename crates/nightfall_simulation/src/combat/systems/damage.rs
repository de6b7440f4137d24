//! Damage application и death protocol.

use bevy::prelude::*;

use crate::ai::{provoke_by_damage, AIState, CombatPresence, LastKnownTarget};
use crate::combat::{resolve_damage, AgentDamaged, AgentDied, DamageModifiers, DamageOutcome, DamageRequest, DotState};
use crate::components::{Agent, Health, LocomotionIntent, MovementSpeeds};

/// Система: применение `DamageRequest` к агентам
///
/// Выживший агент (не Idle) провоцируется: Chasing + lastKnown = источник урона.
/// Летальный урон → death protocol (ровно один раз, Dead поглощающее):
/// DOT снят, скорости восстановлены, locomotion Hold, `AgentDied` + `CombatPresence::Exited`.
pub fn apply_damage_requests(
    mut requests: EventReader<DamageRequest>,
    mut agents: Query<(
        &Agent,
        &mut Health,
        &mut AIState,
        &mut DotState,
        &mut MovementSpeeds,
        &mut LastKnownTarget,
        &mut LocomotionIntent,
    )>,
    modifiers: Res<DamageModifiers>,
    mut damaged_events: EventWriter<AgentDamaged>,
    mut died_events: EventWriter<AgentDied>,
    mut presence_events: EventWriter<CombatPresence>,
) {
    for request in requests.read() {
        let Ok((agent, mut health, mut state, mut dot, mut speeds, mut last_known, mut intent)) =
            agents.get_mut(request.agent)
        else {
            continue;
        };

        let outcome = resolve_damage(&mut health, *state, agent.kind, &modifiers, request.amount, request.kind);

        match outcome {
            DamageOutcome::Ignored => {}
            DamageOutcome::Damaged { amount, health: remaining } => {
                crate::log(&format!(
                    "💥 {:?} took {:.1} {:?} damage ({:.1}/{:.1} HP)",
                    request.agent, amount, request.kind, remaining, health.max
                ));
                damaged_events.write(AgentDamaged {
                    agent: request.agent,
                    amount,
                    health: remaining,
                    kind: request.kind,
                });

                if provoke_by_damage(&mut state, &mut last_known, request.source) {
                    crate::log(&format!("⚔️ {:?} provoked by damage → Chasing", request.agent));
                    presence_events.write(CombatPresence::Entered { agent: request.agent });
                }
            }
            DamageOutcome::Killed { amount } => {
                *state = AIState::Dead;
                dot.clear(&mut speeds);
                *intent = LocomotionIntent::Hold;

                crate::log(&format!(
                    "💀 {:?} died ({:.1} {:?} damage)",
                    request.agent, amount, request.kind
                ));
                died_events.write(AgentDied { agent: request.agent });
                presence_events.write(CombatPresence::Exited { agent: request.agent });
            }
        }
    }
}
