//! ECS Components для игровых entity
//!
//! Организация по доменам:
//! - actor: агент, здоровье, цель (Agent, AgentKind, Health, Target, TargetHealth)
//! - movement: скорости и связь с locomotion service (MovementSpeeds, LocomotionIntent, LocomotionStatus)
//!
//! AI, патруль, DOT и луч живут в своих модулях (ai, patrol, combat, beam).

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
