//! AI movement + attack systems.

use bevy::prelude::*;

use crate::ai::{AIState, AgentAttacked, LastKnownTarget};
use crate::combat::Attacker;
use crate::components::{LocomotionIntent, MovementSpeeds, Target, TargetHealth};
use crate::patrol::{PatrolProgress, PatrolRoute};

/// Locomotion intent для текущего состояния
///
/// Patrolling/Searching - walk скорость, Chasing - chase скорость,
/// Attacking/Idle/Dead - Hold. Ожидание на waypoint тоже Hold.
pub fn intent_for_state(
    state: AIState,
    speeds: &MovementSpeeds,
    route: &PatrolRoute,
    progress: &PatrolProgress,
    last_known: &LastKnownTarget,
) -> LocomotionIntent {
    let destination = match state {
        AIState::Patrolling if !progress.waiting => route.point(progress.index).map(|p| (p, speeds.walk)),
        AIState::SearchingLastKnown => last_known.position.map(|p| (p, speeds.walk)),
        AIState::Chasing => last_known.position.map(|p| (p, speeds.chase)),
        _ => None,
    };

    match destination {
        Some((position, speed)) => LocomotionIntent::MoveTo { position, speed },
        None => LocomotionIntent::Hold,
    }
}

/// Система: AI locomotion from state
///
/// Конвертирует AIState → LocomotionIntent для locomotion service.
pub fn ai_locomotion_from_state(
    mut ai_query: Query<(
        &AIState,
        &MovementSpeeds,
        &PatrolRoute,
        &PatrolProgress,
        &LastKnownTarget,
        &mut LocomotionIntent,
    )>,
) {
    for (state, speeds, route, progress, last_known, mut intent) in ai_query.iter_mut() {
        let next = intent_for_state(*state, speeds, route, progress, last_known);

        // Проверяем что intent изменился - иначе Changed<LocomotionIntent> спамит
        if *intent != next {
            *intent = next;
        }
    }
}

/// Система: AI attack execution
///
/// В Attacking при готовом cooldown наносит урон цели и ставит `cooldown_until = now + cooldown`.
/// Дистанцию уже проверил ai_fsm_transitions на этом тике.
pub fn ai_attack_execution(
    mut ai_query: Query<(Entity, &AIState, &mut Attacker)>,
    mut targets: Query<(Entity, &mut TargetHealth), With<Target>>,
    time: Res<Time<Fixed>>,
    mut attacked_events: EventWriter<AgentAttacked>,
) {
    let now = time.elapsed_secs();

    let Ok((target, mut target_health)) = targets.single_mut() else {
        return;
    };

    for (entity, state, mut attacker) in ai_query.iter_mut() {
        if *state != AIState::Attacking || !attacker.can_attack(now) {
            continue;
        }

        target_health.take_damage(attacker.damage);
        attacker.start_attack(now);

        crate::log(&format!(
            "🗡️ {:?} attacks target {:?} for {:.1} ({:.1}/{:.1} HP)",
            entity, target, attacker.damage, target_health.current, target_health.max
        ));
        attacked_events.write(AgentAttacked {
            agent: entity,
            target,
            damage: attacker.damage,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patrol::PatrolMode;

    fn route() -> PatrolRoute {
        PatrolRoute::new(vec![Vec3::new(5.0, 0.0, 0.0), Vec3::new(-5.0, 0.0, 0.0)], PatrolMode::InOrder, 2.0)
    }

    fn seen_at(position: Vec3) -> LastKnownTarget {
        LastKnownTarget { position: Some(position) }
    }

    #[test]
    fn test_speed_per_state() {
        let speeds = MovementSpeeds::new(3.0, 6.0);
        let route = route();
        let progress = PatrolProgress::default();
        let last_known = seen_at(Vec3::new(0.0, 0.0, 7.0));

        assert_eq!(
            intent_for_state(AIState::Patrolling, &speeds, &route, &progress, &last_known),
            LocomotionIntent::MoveTo { position: Vec3::new(5.0, 0.0, 0.0), speed: 3.0 }
        );
        assert_eq!(
            intent_for_state(AIState::SearchingLastKnown, &speeds, &route, &progress, &last_known),
            LocomotionIntent::MoveTo { position: Vec3::new(0.0, 0.0, 7.0), speed: 3.0 }
        );
        assert_eq!(
            intent_for_state(AIState::Chasing, &speeds, &route, &progress, &last_known),
            LocomotionIntent::MoveTo { position: Vec3::new(0.0, 0.0, 7.0), speed: 6.0 }
        );

        for state in [AIState::Attacking, AIState::Idle, AIState::Dead] {
            assert_eq!(
                intent_for_state(state, &speeds, &route, &progress, &last_known),
                LocomotionIntent::Hold,
                "state = {:?}",
                state
            );
        }
    }

    #[test]
    fn test_waiting_at_waypoint_holds() {
        let speeds = MovementSpeeds::new(3.0, 6.0);
        let progress = PatrolProgress {
            index: 1,
            waiting: true,
            wait_elapsed: 0.5,
        };

        let intent = intent_for_state(AIState::Patrolling, &speeds, &route(), &progress, &LastKnownTarget::default());
        assert_eq!(intent, LocomotionIntent::Hold);
    }

    #[test]
    fn test_intent_uses_current_speeds_under_dot() {
        let mut speeds = MovementSpeeds::new(3.0, 6.0);
        speeds.apply_penalty(0.5);
        let last_known = seen_at(Vec3::X);

        assert_eq!(
            intent_for_state(AIState::Chasing, &speeds, &route(), &PatrolProgress::default(), &last_known),
            LocomotionIntent::MoveTo { position: Vec3::X, speed: 3.0 }
        );
        assert_eq!(
            intent_for_state(AIState::Patrolling, &speeds, &route(), &PatrolProgress::default(), &last_known),
            LocomotionIntent::MoveTo { position: Vec3::new(5.0, 0.0, 0.0), speed: 1.5 }
        );
    }

    #[test]
    fn test_search_without_last_known_holds() {
        let speeds = MovementSpeeds::new(3.0, 6.0);
        let intent = intent_for_state(
            AIState::SearchingLastKnown,
            &speeds,
            &route(),
            &PatrolProgress::default(),
            &LastKnownTarget::default(),
        );
        assert_eq!(intent, LocomotionIntent::Hold);
    }
}
