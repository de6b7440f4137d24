//! DOT systems: старт по запросу и тик активных эффектов.
//!
//! Тики DOT не меняют Health напрямую - каждый тик превращается в `DamageRequest`
//! (DamageKind::Beam), который применяет `apply_damage_requests`.

use bevy::prelude::*;

use crate::ai::AIState;
use crate::combat::{DamageKind, DamageModifiers, DamageRequest, DotEffect, DotRequest, DotState};
use crate::components::{Agent, MovementSpeeds};

/// Система: обработка `DotRequest` (cancel-and-restart)
///
/// Запрос игнорируется, если агент мёртв или иммунен к лучу.
/// Первый тик срабатывает сразу в момент старта.
pub fn apply_dot_requests(
    mut requests: EventReader<DotRequest>,
    mut agents: Query<(&Agent, &AIState, &mut DotState, &mut MovementSpeeds)>,
    modifiers: Res<DamageModifiers>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    for request in requests.read() {
        let Ok((agent, state, mut dot, mut speeds)) = agents.get_mut(request.agent) else {
            continue;
        };

        if *state == AIState::Dead || !modifiers.accepts(DamageKind::Beam, agent.kind) {
            continue;
        }

        if request.interval <= 0.0 {
            crate::logger::log_warning(&format!(
                "⚠️ DOT request for {:?} rejected: interval {} must be positive",
                request.agent, request.interval
            ));
            continue;
        }

        let effect = DotEffect::new(request.damage_per_tick, request.duration, request.interval, request.source);
        let step = dot.start(effect, &mut speeds);

        crate::log(&format!(
            "🔦 DOT started on {:?}: {:.1}/tick every {:.2}s, {:?}",
            request.agent, request.damage_per_tick, request.interval, request.duration
        ));

        for _ in 0..step.ticks {
            damage_requests.write(DamageRequest {
                agent: request.agent,
                amount: request.damage_per_tick,
                kind: DamageKind::Beam,
                source: request.source,
            });
        }
    }
}

/// Система: тик активных DOT эффектов
///
/// Истёкший эффект снимается и возвращает базовые скорости.
/// У мёртвых агентов эффект снимается без тиков.
pub fn tick_dot_effects(
    mut agents: Query<(Entity, &AIState, &mut DotState, &mut MovementSpeeds)>,
    time: Res<Time<Fixed>>,
    mut damage_requests: EventWriter<DamageRequest>,
) {
    let delta = time.delta_secs();

    for (entity, state, mut dot, mut speeds) in agents.iter_mut() {
        if !dot.is_active() {
            continue;
        }

        if *state == AIState::Dead {
            dot.clear(&mut speeds);
            continue;
        }

        let Some(effect) = dot.active.as_mut() else {
            continue;
        };
        let step = effect.advance(delta);
        let (amount, source) = (effect.damage_per_tick, effect.source);

        for _ in 0..step.ticks {
            damage_requests.write(DamageRequest {
                agent: entity,
                amount,
                kind: DamageKind::Beam,
                source,
            });
        }

        if step.expired {
            dot.clear(&mut speeds);
            crate::log(&format!("✨ DOT expired on {:?}, speeds restored", entity));
        }
    }
}
