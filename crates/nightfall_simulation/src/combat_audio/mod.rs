//! Combat audio broker: кто владеет боевым треком
//!
//! Один токен-владелец вместо общего static: первый вошедший в бой агент
//! забирает трек, освободить его может только владелец. Воспроизведения здесь
//! нет, хост слушает `CombatTrackChanged`.

use bevy::prelude::*;

use crate::ai::CombatPresence;
use crate::SimulationSet;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatTrackBroker {
    owner: Option<Entity>,
}

/// Владелец боевого трека сменился (None = трек остановлен)
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombatTrackChanged {
    pub owner: Option<Entity>,
}

impl CombatTrackBroker {
    pub fn owner(&self) -> Option<Entity> {
        self.owner
    }

    /// Returns `true`, если агент только что стал владельцем
    pub fn claim(&mut self, agent: Entity) -> bool {
        if self.owner.is_some() {
            return false;
        }
        self.owner = Some(agent);
        true
    }

    /// Returns `true`, если агент был владельцем и трек освобождён
    pub fn release(&mut self, agent: Entity) -> bool {
        if self.owner != Some(agent) {
            return false;
        }
        self.owner = None;
        true
    }
}

/// Система: арбитраж боевого трека по `CombatPresence`
pub fn arbitrate_combat_track(
    mut presence_events: EventReader<CombatPresence>,
    mut broker: ResMut<CombatTrackBroker>,
    mut changed_events: EventWriter<CombatTrackChanged>,
) {
    for event in presence_events.read() {
        let agent = event.agent();
        let changed = match event {
            CombatPresence::Entered { .. } => broker.claim(agent),
            CombatPresence::Exited { .. } => broker.release(agent),
        };

        if changed {
            crate::log(&format!("🎵 Combat track owner → {:?}", broker.owner()));
            changed_events.write(CombatTrackChanged { owner: broker.owner() });
        }
    }
}

pub struct CombatAudioPlugin;

impl Plugin for CombatAudioPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<CombatTrackBroker>()
            .add_event::<CombatTrackChanged>()
            .add_systems(FixedUpdate, arbitrate_combat_track.in_set(SimulationSet::Report));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_owner_token() {
        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);
        let mut broker = CombatTrackBroker::default();

        assert!(broker.claim(first));
        assert!(!broker.claim(second));
        assert_eq!(broker.owner(), Some(first));

        // Не владелец не может остановить трек
        assert!(!broker.release(second));
        assert_eq!(broker.owner(), Some(first));

        assert!(broker.release(first));
        assert_eq!(broker.owner(), None);
        assert!(broker.claim(second));
    }

    #[test]
    fn test_arbitration_reports_owner_changes_only() {
        let mut app = App::new();
        app.add_event::<CombatPresence>()
            .add_event::<CombatTrackChanged>()
            .init_resource::<CombatTrackBroker>()
            .add_systems(Update, arbitrate_combat_track);

        let first = Entity::from_raw(1);
        let second = Entity::from_raw(2);
        app.world_mut().send_event(CombatPresence::Entered { agent: first });
        app.world_mut().send_event(CombatPresence::Entered { agent: second });
        app.world_mut().send_event(CombatPresence::Exited { agent: second });
        app.update();

        assert_eq!(app.world().resource::<CombatTrackBroker>().owner(), Some(first));
        let events = app.world().resource::<Events<CombatTrackChanged>>();
        let mut cursor = events.get_cursor();
        let changes: Vec<CombatTrackChanged> = cursor.read(events).copied().collect();
        assert_eq!(changes, vec![CombatTrackChanged { owner: Some(first) }]);
    }
}
