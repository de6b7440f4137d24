//! Beam emitter (фонарик): конус + occlusion, diff освещённых агентов каждый тик
//!
//! Вместо таймера на каждую цель эмиттер хранит явную карту `agent → запись`
//! и каждый тик сравнивает её с текущим набором освещённых:
//! - новый в луче → DOT(infinite)
//! - вышел из луча (жив) → DOT(linger, finite) и удаление из карты
//! - умер / исчез → удаление из карты без linger

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

use crate::ai::AIState;
use crate::combat::{DamageKind, DamageModifiers, DotDuration, DotRequest};
use crate::components::Agent;
use crate::config::BeamSettings;
use crate::perception::{has_line_of_sight, within_cone};
use crate::SimulationSet;

/// Эмиттер луча. Направление = forward (-Z) transform'а эмиттера.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct BeamEmitter {
    /// Выключенный луч никого не освещает (все отслеживаемые уходят в linger)
    pub enabled: bool,
    pub range: f32,
    /// Полный угол конуса (радианы)
    pub cone_angle: f32,
    pub damage_per_tick: f32,
    pub tick_interval: f32,
    pub linger_duration: f32,
}

impl Default for BeamEmitter {
    fn default() -> Self {
        Self::from_settings(&BeamSettings::default())
    }
}

impl BeamEmitter {
    pub fn from_settings(settings: &BeamSettings) -> Self {
        Self {
            enabled: true,
            range: settings.range,
            cone_angle: settings.cone_angle_degrees.to_radians(),
            damage_per_tick: settings.damage_per_tick,
            tick_interval: settings.tick_interval,
            linger_duration: settings.linger_duration,
        }
    }
}

/// Запись об освещённом агенте
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IlluminationRecord {
    /// Fixed time, когда агент вошёл в луч
    pub since: f32,
}

/// Агенты, освещённые эмиттером на прошлом тике
#[derive(Component, Debug, Clone, Default)]
pub struct IlluminatedSet {
    pub tracked: HashMap<Entity, IlluminationRecord>,
}

/// Итог diff'а освещения за тик
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IlluminationDiff {
    /// Вошли в луч → DOT(infinite)
    pub entered: Vec<Entity>,
    /// Вышли из луча живыми → DOT(linger)
    pub exited: Vec<Entity>,
    /// Умерли/исчезли → просто забыть
    pub dropped: Vec<Entity>,
}

impl IlluminatedSet {
    pub fn contains(&self, agent: Entity) -> bool {
        self.tracked.contains_key(&agent)
    }

    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    /// Сравнивает текущий набор освещённых с отслеживаемым и обновляет карту.
    ///
    /// `is_alive` решает судьбу вышедших: живые получают linger, остальные выбрасываются.
    /// Результат отсортирован по Entity для детерминизма.
    pub fn apply_scan(
        &mut self,
        current: &HashSet<Entity>,
        now: f32,
        is_alive: impl Fn(Entity) -> bool,
    ) -> IlluminationDiff {
        let mut diff = IlluminationDiff::default();

        for &agent in current {
            if !self.tracked.contains_key(&agent) {
                self.tracked.insert(agent, IlluminationRecord { since: now });
                diff.entered.push(agent);
            }
        }

        let lost: Vec<Entity> = self
            .tracked
            .keys()
            .copied()
            .filter(|agent| !current.contains(agent))
            .collect();

        for agent in lost {
            self.tracked.remove(&agent);
            if is_alive(agent) {
                diff.exited.push(agent);
            } else {
                diff.dropped.push(agent);
            }
        }

        diff.entered.sort();
        diff.exited.sort();
        diff.dropped.sort();
        diff
    }
}

/// Система: сканирование лучей и старт/linger DOT
///
/// Кандидаты - живые агенты, чей вид получает урон от луча.
/// Членство: дистанция ≤ range, угол ≤ cone/2, первый коллайдер на луче - сам агент.
pub fn scan_beam_emitters(
    mut emitters: Query<(Entity, &Transform, &BeamEmitter, &mut IlluminatedSet)>,
    agents: Query<(Entity, &Agent, &Transform, &AIState)>,
    colliders: Query<(Entity, &Collider, &Transform)>,
    modifiers: Res<DamageModifiers>,
    time: Res<Time<Fixed>>,
    mut dot_requests: EventWriter<DotRequest>,
) {
    let now = time.elapsed_secs();

    for (emitter_entity, emitter_transform, beam, mut illuminated) in emitters.iter_mut() {
        let origin = emitter_transform.translation;
        let forward = emitter_transform.forward().as_vec3();

        let mut current = HashSet::new();
        if beam.enabled {
            for (agent_entity, agent, agent_transform, state) in agents.iter() {
                if *state == AIState::Dead || !modifiers.accepts(DamageKind::Beam, agent.kind) {
                    continue;
                }

                let agent_pos = agent_transform.translation;
                if origin.distance(agent_pos) > beam.range || !within_cone(origin, forward, agent_pos, beam.cone_angle) {
                    continue;
                }

                if has_line_of_sight(
                    Some(emitter_entity),
                    origin,
                    agent_entity,
                    agent_pos,
                    beam.range,
                    colliders.iter(),
                ) {
                    current.insert(agent_entity);
                }
            }
        }

        let diff = illuminated.apply_scan(&current, now, |agent| {
            agents
                .get(agent)
                .map(|(_, _, _, state)| *state != AIState::Dead)
                .unwrap_or(false)
        });

        for agent in diff.entered {
            crate::log(&format!("🔦 {:?} entered beam of {:?}", agent, emitter_entity));
            dot_requests.write(DotRequest {
                agent,
                damage_per_tick: beam.damage_per_tick,
                duration: DotDuration::Infinite,
                interval: beam.tick_interval,
                source: Some(origin),
            });
        }

        for agent in diff.exited {
            crate::log(&format!(
                "🌘 {:?} left beam of {:?} → lingering DOT {:.1}s",
                agent, emitter_entity, beam.linger_duration
            ));
            dot_requests.write(DotRequest {
                agent,
                damage_per_tick: beam.damage_per_tick,
                duration: DotDuration::Finite(beam.linger_duration),
                interval: beam.tick_interval,
                source: Some(origin),
            });
        }

        for agent in diff.dropped {
            crate::log(&format!("🔦 {:?} dropped from beam of {:?} (dead)", agent, emitter_entity));
        }
    }
}

/// Beam Plugin
///
/// scan_beam_emitters работает после тика DOT и до применения DOT-запросов,
/// так что свежий DOT стартует в том же тике, в котором агент вошёл в луч.
pub struct BeamPlugin;

impl Plugin for BeamPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, scan_beam_emitters.in_set(SimulationSet::Beam));
    }
}
