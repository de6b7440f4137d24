//! Presentation state - то, что рендер/анимация читают у агента.
//!
//! Симуляция не вызывает анимацию или звук напрямую: она выставляет
//! `PresentationState` и события (AgentDamaged, AgentAttacked, AgentDied).

use bevy::prelude::*;

use crate::ai::AIState;
use crate::components::{LocomotionIntent, LocomotionStatus, MovementSpeeds};

#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PresentationState {
    pub state: AIState,
    /// |velocity| / активная максимальная скорость, 0 при Hold
    pub normalized_speed: f32,
}

/// Нормализованная скорость для blend-tree анимации
pub fn normalized_speed(
    state: AIState,
    intent: &LocomotionIntent,
    speeds: &MovementSpeeds,
    velocity: Vec3,
) -> f32 {
    if matches!(intent, LocomotionIntent::Hold) {
        return 0.0;
    }

    let max_speed = match state {
        AIState::Chasing => speeds.chase,
        AIState::Patrolling | AIState::SearchingLastKnown => speeds.walk,
        _ => 0.0,
    };
    if max_speed <= 0.0 {
        return 0.0;
    }

    (velocity.length() / max_speed).clamp(0.0, 1.0)
}

/// Система: обновление PresentationState
pub fn update_presentation_state(
    mut agents: Query<(
        &AIState,
        &LocomotionIntent,
        &MovementSpeeds,
        Option<&LocomotionStatus>,
        &mut PresentationState,
    )>,
) {
    for (state, intent, speeds, status, mut presentation) in agents.iter_mut() {
        let velocity = status.map(|status| status.velocity).unwrap_or(Vec3::ZERO);
        let next = PresentationState {
            state: *state,
            normalized_speed: normalized_speed(*state, intent, speeds, velocity),
        };

        if *presentation != next {
            *presentation = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hold_is_zero_speed() {
        let speeds = MovementSpeeds::new(3.0, 6.0);
        let speed = normalized_speed(AIState::Chasing, &LocomotionIntent::Hold, &speeds, Vec3::X * 5.0);
        assert_eq!(speed, 0.0);
    }

    #[test]
    fn test_chase_uses_current_chase_speed() {
        let mut speeds = MovementSpeeds::new(3.0, 6.0);
        let intent = LocomotionIntent::MoveTo { position: Vec3::X, speed: 6.0 };
        assert_eq!(normalized_speed(AIState::Chasing, &intent, &speeds, Vec3::X * 3.0), 0.5);

        // Под DOT максимум тоже падает
        speeds.apply_penalty(0.5);
        assert_eq!(normalized_speed(AIState::Chasing, &intent, &speeds, Vec3::X * 3.0), 1.0);
    }

    #[test]
    fn test_patrol_uses_walk_speed() {
        let speeds = MovementSpeeds::new(4.0, 8.0);
        let intent = LocomotionIntent::MoveTo { position: Vec3::X, speed: 4.0 };
        assert_eq!(normalized_speed(AIState::Patrolling, &intent, &speeds, Vec3::Z * 2.0), 0.5);
    }
}
