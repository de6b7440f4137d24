//! Tests for FSM AI components.

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::fsm::{provoke_by_damage, AIConfig, AIState, LastKnownTarget};

    #[test]
    fn test_ai_state_default() {
        let state = AIState::default();
        assert!(matches!(state, AIState::Patrolling));
        assert!(!state.in_combat());
        assert!(AIState::SearchingLastKnown.in_combat());
    }

    #[test]
    fn test_ai_config_default() {
        let config = AIConfig::default();
        assert_eq!(config.sight_range, 10.0);
        assert_eq!(config.eye_offset, Vec3::new(0.0, 0.8, 0.0));
        assert_eq!(config.arrival_tolerance, 0.5);
        assert_eq!(config.stopping_tolerance, 0.1);
    }

    #[test]
    fn test_provoke_from_patrol() {
        let mut state = AIState::Patrolling;
        let mut last_known = LastKnownTarget::default();
        let source = Vec3::new(1.0, 0.0, 2.0);

        assert!(provoke_by_damage(&mut state, &mut last_known, Some(source)));
        assert_eq!(state, AIState::Chasing);
        assert_eq!(last_known.position, Some(source));
    }

    #[test]
    fn test_provoke_keeps_attacking() {
        let mut state = AIState::Attacking;
        let mut last_known = LastKnownTarget { position: Some(Vec3::ZERO) };

        assert!(!provoke_by_damage(&mut state, &mut last_known, Some(Vec3::X)));
        assert_eq!(state, AIState::Attacking);
        assert_eq!(last_known.position, Some(Vec3::X));
    }

    #[test]
    fn test_idle_and_dead_ignore_provocation() {
        for initial in [AIState::Idle, AIState::Dead] {
            let mut state = initial;
            let mut last_known = LastKnownTarget::default();

            assert!(!provoke_by_damage(&mut state, &mut last_known, Some(Vec3::X)));
            assert_eq!(state, initial);
            assert_eq!(last_known.position, None);
        }
    }
}
