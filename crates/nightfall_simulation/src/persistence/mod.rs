//! Persistence collaborator: какие агенты уже убиты
//!
//! Симуляция только записывает `PersistentId` умерших агентов в `DefeatedAgents`;
//! сохранение на диск делает хост (resource сериализуется через serde).

use std::collections::BTreeSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::AgentDied;
use crate::SimulationSet;

/// Стабильный id агента между сессиями (задаётся при спавне)
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct PersistentId(pub String);

/// Множество id убитых агентов (BTreeSet → стабильный порядок при сериализации)
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefeatedAgents {
    ids: BTreeSet<String>,
}

impl DefeatedAgents {
    pub fn is_defeated(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Returns `true`, если id записан впервые
    pub fn record(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Система: запись убитых агентов
pub fn record_defeated_agents(
    mut died_events: EventReader<AgentDied>,
    ids: Query<&PersistentId>,
    mut defeated: ResMut<DefeatedAgents>,
) {
    for event in died_events.read() {
        let Ok(id) = ids.get(event.agent) else {
            crate::logger::log_warning(&format!(
                "⚠️ {:?} died without PersistentId, kill not recorded",
                event.agent
            ));
            continue;
        };

        if defeated.record(id.0.clone()) {
            crate::log(&format!("💾 Recorded defeated agent '{}'", id.0));
        }
    }
}

pub struct PersistencePlugin;

impl Plugin for PersistencePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<DefeatedAgents>()
            .add_systems(FixedUpdate, record_defeated_agents.in_set(SimulationSet::Report));
    }
}
