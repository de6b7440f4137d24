//! FSM AI systems (state transitions).

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;
use rand::Rng;

use crate::ai::{AIConfig, AIState, CombatPresence, LastKnownTarget};
use crate::combat::Attacker;
use crate::components::{LocomotionStatus, Target};
use crate::patrol::{PatrolProgress, PatrolRoute};
use crate::perception::can_see_target;
use crate::DeterministicRng;

/// Результат perception за тик (вычисляется до перехода)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TargetSighting {
    pub visible: bool,
    pub position: Option<Vec3>,
    pub distance: Option<f32>,
}

/// Входные данные одного шага FSM
#[derive(Debug, Clone, Copy)]
pub struct FsmInput<'a> {
    pub agent: Entity,
    pub position: Vec3,
    pub sighting: TargetSighting,
    /// None = агент не привязан к locomotion service
    pub status: Option<&'a LocomotionStatus>,
    pub config: &'a AIConfig,
    pub attacker: &'a Attacker,
    pub delta: f32,
}

/// Изменяемое состояние агента, которым владеет FSM
pub struct FsmAgent<'a> {
    pub state: &'a mut AIState,
    pub progress: &'a mut PatrolProgress,
    pub last_known: &'a mut LastKnownTarget,
    pub route: &'a PatrolRoute,
}

/// Один шаг FSM в порядке приоритетов переходов.
///
/// Returns сигнал входа/выхода из боя, если он произошёл на этом шаге.
/// Dead и Idle не имеют исходящих переходов (смерть приходит только из damage).
pub fn step_fsm(agent: FsmAgent<'_>, input: &FsmInput<'_>, rng: &mut impl Rng) -> Option<CombatPresence> {
    let FsmAgent { state, progress, last_known, route } = agent;

    if matches!(*state, AIState::Dead | AIState::Idle) {
        return None;
    }

    // ConfigurationError: нет locomotion binding → Idle/Hold
    if input.status.is_none() {
        let was_in_combat = state.in_combat();
        *state = AIState::Idle;
        crate::logger::log_warning(&format!(
            "⚠️ {:?} has no locomotion binding → Idle",
            input.agent
        ));
        return was_in_combat.then_some(CombatPresence::Exited { agent: input.agent });
    }

    let sighting = input.sighting;
    let in_attack_range = sighting.distance.is_some_and(|distance| input.attacker.in_range(distance));

    match *state {
        AIState::Patrolling => {
            if sighting.visible {
                last_known.position = sighting.position;
                *state = AIState::Chasing;
                crate::log(&format!("⚔️ {:?} Patrolling → Chasing (target spotted)", input.agent));
                return Some(CombatPresence::Entered { agent: input.agent });
            }

            if route.is_empty() {
                *state = AIState::Idle;
                crate::logger::log_warning(&format!("⚠️ {:?} has no waypoints → Idle", input.agent));
                return None;
            }

            progress.advance(route, input.status, input.config.arrival_tolerance, input.delta, rng);
            None
        }

        AIState::Chasing => {
            if sighting.visible {
                last_known.position = sighting.position;
                if in_attack_range {
                    *state = AIState::Attacking;
                    crate::log(&format!("🗡️ {:?} Chasing → Attacking", input.agent));
                }
            } else {
                // last_known остаётся позицией последнего тика видимости
                *state = AIState::SearchingLastKnown;
                crate::log(&format!(
                    "🔍 {:?} Chasing → SearchingLastKnown ({:?})",
                    input.agent, last_known.position
                ));
            }
            None
        }

        AIState::SearchingLastKnown => {
            if sighting.visible {
                last_known.position = sighting.position;
                *state = AIState::Chasing;
                crate::log(&format!("⚔️ {:?} SearchingLastKnown → Chasing (target regained)", input.agent));
                return Some(CombatPresence::Entered { agent: input.agent });
            }

            let arrived = match last_known.position {
                Some(point) => input
                    .status
                    .is_some_and(|status| status.has_arrived_at(point, input.config.stopping_tolerance)),
                None => true,
            };
            if !arrived {
                return None;
            }

            if route.is_empty() {
                *state = AIState::Idle;
                crate::logger::log_warning(&format!(
                    "⚠️ {:?} search finished, no waypoints → Idle",
                    input.agent
                ));
            } else {
                progress.resume_at_nearest(route, input.position);
                *state = AIState::Patrolling;
                crate::log(&format!(
                    "🚶 {:?} SearchingLastKnown → Patrolling (waypoint {})",
                    input.agent, progress.index
                ));
            }
            Some(CombatPresence::Exited { agent: input.agent })
        }

        AIState::Attacking => {
            if !in_attack_range {
                *state = AIState::Chasing;
                crate::log(&format!("🏃 {:?} Attacking → Chasing (target out of range)", input.agent));
            } else if sighting.visible {
                last_known.position = sighting.position;
            }
            None
        }

        AIState::Idle | AIState::Dead => None,
    }
}

/// Система: AI FSM transitions
///
/// Perception (sphere + occlusion) считается здесь же, до перехода.
/// Коллайдеры мира читаются как есть (Collider + Transform), physics step не нужен.
pub fn ai_fsm_transitions(
    mut agents: Query<(
        Entity,
        &Transform,
        &AIConfig,
        &Attacker,
        &PatrolRoute,
        &mut AIState,
        &mut PatrolProgress,
        &mut LastKnownTarget,
        Option<&LocomotionStatus>,
    )>,
    targets: Query<(Entity, &Transform), With<Target>>,
    colliders: Query<(Entity, &Collider, &Transform)>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
    mut presence_events: EventWriter<CombatPresence>,
) {
    let delta = time.delta_secs();
    let target = targets.single().ok().map(|(entity, transform)| (entity, transform.translation));

    for (entity, transform, config, attacker, route, mut state, mut progress, mut last_known, status) in
        agents.iter_mut()
    {
        if matches!(*state, AIState::Dead | AIState::Idle) {
            continue;
        }

        let position = transform.translation;
        let sighting = match target {
            Some((target_entity, target_position)) => TargetSighting {
                visible: can_see_target(
                    entity,
                    position,
                    position + config.eye_offset,
                    target_entity,
                    target_position,
                    config.sight_range,
                    colliders.iter(),
                ),
                position: Some(target_position),
                distance: Some(position.distance(target_position)),
            },
            None => TargetSighting::default(),
        };

        let input = FsmInput {
            agent: entity,
            position,
            sighting,
            status,
            config,
            attacker,
            delta,
        };
        let agent = FsmAgent {
            state: &mut *state,
            progress: &mut *progress,
            last_known: &mut *last_known,
            route,
        };

        if let Some(presence) = step_fsm(agent, &input, &mut rng.rng) {
            presence_events.write(presence);
        }
    }
}
