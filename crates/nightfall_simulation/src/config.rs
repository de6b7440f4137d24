//! Конфигурация симуляции (JSON → serde)
//!
//! `SimulationConfig` задаёт tick rate, seed, дефолты агентов и луча,
//! а также overrides таблицы damage модификаторов.

use bevy::prelude::Resource;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::DamageKind;
use crate::components::AgentKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse simulation config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid simulation config: {field} {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Дефолтные параметры агента
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    pub max_health: f32,
    pub walk_speed: f32,
    pub chase_speed: f32,
    pub sight_range: f32,
    pub attack_range: f32,
    pub attack_damage: f32,
    pub attack_cooldown: f32,
    /// Множитель скорости под DOT (0.5 = в два раза медленнее)
    pub dot_speed_factor: f32,
    /// Высота "глаз" над позицией агента (начало луча occlusion)
    pub eye_height: f32,
    pub arrival_tolerance: f32,
    pub stopping_tolerance: f32,
    pub waypoint_wait_time: f32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            walk_speed: 3.0,
            chase_speed: 6.0,
            sight_range: 10.0,
            attack_range: 2.0,
            attack_damage: 25.0,
            attack_cooldown: 2.0,
            dot_speed_factor: 0.5,
            eye_height: 0.8,
            arrival_tolerance: 0.5,
            stopping_tolerance: 0.1,
            waypoint_wait_time: 2.0,
        }
    }
}

/// Дефолтные параметры луча (фонарик игрока)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeamSettings {
    pub damage_per_tick: f32,
    pub tick_interval: f32,
    pub linger_duration: f32,
    pub range: f32,
    /// Полный угол конуса (градусы)
    pub cone_angle_degrees: f32,
}

impl Default for BeamSettings {
    fn default() -> Self {
        Self {
            damage_per_tick: 5.0,
            tick_interval: 0.5,
            linger_duration: 2.0,
            range: 10.0,
            cone_angle_degrees: 30.0,
        }
    }
}

/// Override одной ячейки таблицы модификаторов
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifierOverride {
    pub damage: DamageKind,
    pub agent: AgentKind,
    pub multiplier: f32,
}

#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub fixed_hz: f64,
    pub seed: u64,
    pub agent: AgentSettings,
    pub beam: BeamSettings,
    pub damage_modifiers: Vec<ModifierOverride>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            seed: 42,
            agent: AgentSettings::default(),
            beam: BeamSettings::default(),
            damage_modifiers: Vec::new(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json(source: &str) -> Result<Self, ConfigError> {
        let config: SimulationConfig = serde_json::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        fn positive(value: f32, field: &'static str) -> Result<(), ConfigError> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(ConfigError::Invalid { field, reason: "must be a positive number" })
            }
        }

        if !(self.fixed_hz > 0.0 && self.fixed_hz.is_finite()) {
            return Err(ConfigError::Invalid { field: "fixed_hz", reason: "must be a positive number" });
        }

        let agent = &self.agent;
        positive(agent.max_health, "agent.max_health")?;
        positive(agent.walk_speed, "agent.walk_speed")?;
        positive(agent.chase_speed, "agent.chase_speed")?;
        positive(agent.sight_range, "agent.sight_range")?;
        positive(agent.attack_range, "agent.attack_range")?;
        if !(agent.dot_speed_factor > 0.0 && agent.dot_speed_factor < 1.0) {
            return Err(ConfigError::Invalid {
                field: "agent.dot_speed_factor",
                reason: "must be in (0, 1)",
            });
        }
        if agent.attack_cooldown < 0.0 || agent.waypoint_wait_time < 0.0 {
            return Err(ConfigError::Invalid {
                field: "agent.attack_cooldown/waypoint_wait_time",
                reason: "must not be negative",
            });
        }

        let beam = &self.beam;
        positive(beam.tick_interval, "beam.tick_interval")?;
        positive(beam.range, "beam.range")?;
        positive(beam.cone_angle_degrees, "beam.cone_angle_degrees")?;
        if beam.linger_duration < 0.0 {
            return Err(ConfigError::Invalid { field: "beam.linger_duration", reason: "must not be negative" });
        }

        if self.damage_modifiers.iter().any(|entry| entry.multiplier < 0.0) {
            return Err(ConfigError::Invalid { field: "damage_modifiers", reason: "multiplier must not be negative" });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{ "seed": 7, "agent": { "sight_range": 15.0 } }"#)
            .expect("valid config");

        assert_eq!(config.seed, 7);
        assert_eq!(config.agent.sight_range, 15.0);
        assert_eq!(config.agent.chase_speed, 6.0);
        assert_eq!(config.beam, BeamSettings::default());
    }

    #[test]
    fn test_modifier_overrides_parse() {
        let config = SimulationConfig::from_json(
            r#"{ "damage_modifiers": [ { "damage": "Melee", "agent": "BeamImmune", "multiplier": 0.5 } ] }"#,
        )
        .expect("valid config");

        assert_eq!(config.damage_modifiers.len(), 1);
        assert_eq!(config.damage_modifiers[0].damage, DamageKind::Melee);
        assert_eq!(config.damage_modifiers[0].agent, AgentKind::BeamImmune);
    }

    #[test]
    fn test_speed_factor_out_of_range_rejected() {
        let result = SimulationConfig::from_json(r#"{ "agent": { "dot_speed_factor": 1.5 } }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "agent.dot_speed_factor", .. })
        ));
    }

    #[test]
    fn test_speed_factor_must_actually_slow() {
        // factor = 1.0 означает DOT без замедления
        let result = SimulationConfig::from_json(r#"{ "agent": { "dot_speed_factor": 1.0 } }"#);
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { field: "agent.dot_speed_factor", .. })
        ));

        let result = SimulationConfig::from_json(r#"{ "agent": { "dot_speed_factor": 0.99 } }"#);
        assert!(result.is_ok());
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result = SimulationConfig::from_json("{ not json");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
