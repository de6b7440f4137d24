//! Damage-over-time: accumulator вместо корутины
//!
//! Тайминг тиков: первый тик в момент старта (t = 0), далее каждые `interval`,
//! пока `t < duration`. DOT 2 сек / 1 сек = ровно 2 тика.
//! Пока DOT активен, скорости агента = base × speed_factor.

use bevy::prelude::*;

use crate::components::MovementSpeeds;

/// Длительность DOT
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum DotDuration {
    /// Пока цель в луче (снимается только рестартом или смертью)
    Infinite,
    /// Lingering хвост после выхода из луча (секунды)
    Finite(f32),
}

/// Запрос на старт DOT (cancel-and-restart, не стакается)
#[derive(Event, Debug, Clone, Copy)]
pub struct DotRequest {
    pub agent: Entity,
    pub damage_per_tick: f32,
    pub duration: DotDuration,
    pub interval: f32,
    /// Позиция источника (эмиттера) на момент старта
    pub source: Option<Vec3>,
}

/// Активный DOT
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct DotEffect {
    pub damage_per_tick: f32,
    pub interval: f32,
    pub duration: DotDuration,
    pub source: Option<Vec3>,
    /// Время с момента старта
    pub elapsed: f32,
    pub ticks_fired: u32,
}

/// Итог одного шага DOT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DotStep {
    pub ticks: u32,
    pub expired: bool,
}

impl DotEffect {
    pub fn new(damage_per_tick: f32, duration: DotDuration, interval: f32, source: Option<Vec3>) -> Self {
        Self {
            damage_per_tick,
            interval,
            duration,
            source,
            elapsed: 0.0,
            ticks_fired: 0,
        }
    }

    /// Продвигает таймер на `delta` и считает сработавшие тики
    pub fn advance(&mut self, delta: f32) -> DotStep {
        let mut step = DotStep::default();
        if self.interval <= 0.0 {
            step.expired = true;
            return step;
        }

        self.elapsed += delta.max(0.0);

        loop {
            let next_tick_at = self.ticks_fired as f32 * self.interval;
            if next_tick_at > self.elapsed {
                break;
            }
            if let DotDuration::Finite(duration) = self.duration {
                if next_tick_at >= duration {
                    step.expired = true;
                    break;
                }
            }
            self.ticks_fired += 1;
            step.ticks += 1;
        }

        step
    }
}

/// DOT-слот агента (≤ 1 активный эффект)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct DotState {
    pub active: Option<DotEffect>,
    /// Множитель скорости под DOT (0.5 = в два раза медленнее)
    pub speed_factor: f32,
}

impl Default for DotState {
    fn default() -> Self {
        Self {
            active: None,
            speed_factor: 0.5,
        }
    }
}

impl DotState {
    pub fn new(speed_factor: f32) -> Self {
        Self {
            active: None,
            speed_factor,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Cancel-and-restart: заменяет текущий эффект, сразу замедляет агента.
    ///
    /// Returns тики, сработавшие в момент старта (обычно 1).
    pub fn start(&mut self, effect: DotEffect, speeds: &mut MovementSpeeds) -> DotStep {
        let mut effect = effect;
        let step = effect.advance(0.0);
        if step.expired {
            self.clear(speeds);
        } else {
            self.active = Some(effect);
            speeds.apply_penalty(self.speed_factor);
        }
        step
    }

    /// Снимает эффект и безусловно возвращает базовые скорости
    pub fn clear(&mut self, speeds: &mut MovementSpeeds) {
        self.active = None;
        speeds.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_dot_tick_count() {
        let mut effect = DotEffect::new(5.0, DotDuration::Finite(2.0), 1.0, None);

        assert_eq!(effect.advance(0.0), DotStep { ticks: 1, expired: false });
        assert_eq!(effect.advance(1.0), DotStep { ticks: 1, expired: false });
        assert_eq!(effect.advance(1.0), DotStep { ticks: 0, expired: true });
        assert_eq!(effect.ticks_fired, 2);
    }

    #[test]
    fn test_half_second_interval_over_two_seconds() {
        let mut effect = DotEffect::new(5.0, DotDuration::Finite(2.0), 0.5, None);
        let mut ticks = effect.advance(0.0).ticks;
        let mut expired = false;

        for _ in 0..16 {
            let step = effect.advance(0.25);
            ticks += step.ticks;
            if step.expired {
                expired = true;
                break;
            }
        }

        // t = 0, 0.5, 1.0, 1.5
        assert_eq!(ticks, 4);
        assert!(expired);
    }

    #[test]
    fn test_infinite_dot_never_expires() {
        let mut effect = DotEffect::new(5.0, DotDuration::Infinite, 1.0, None);
        effect.advance(0.0);
        let step = effect.advance(1000.0);
        assert_eq!(step.ticks, 1000);
        assert!(!step.expired);
    }

    #[test]
    fn test_large_delta_fires_all_missed_ticks() {
        let mut effect = DotEffect::new(5.0, DotDuration::Finite(3.0), 1.0, None);
        let step = effect.advance(10.0);
        assert_eq!(step, DotStep { ticks: 3, expired: true });
    }

    #[test]
    fn test_start_slows_and_clear_restores() {
        let mut speeds = MovementSpeeds::new(3.0, 6.0);
        let mut dot = DotState::new(0.5);

        let step = dot.start(DotEffect::new(5.0, DotDuration::Infinite, 0.5, None), &mut speeds);
        assert_eq!(step.ticks, 1);
        assert!(dot.is_active());
        assert_eq!(speeds.walk, 1.5);
        assert_eq!(speeds.chase, 3.0);

        // Кто-то перезаписал текущие скорости посреди эффекта - restore всё равно к base
        speeds.walk = 42.0;
        dot.clear(&mut speeds);
        assert!(!dot.is_active());
        assert_eq!(speeds, MovementSpeeds::new(3.0, 6.0));
    }

    #[test]
    fn test_restart_is_clean_reset() {
        let mut speeds = MovementSpeeds::new(3.0, 6.0);
        let mut dot = DotState::new(0.5);

        dot.start(DotEffect::new(5.0, DotDuration::Finite(2.0), 1.0, None), &mut speeds);
        if let Some(effect) = dot.active.as_mut() {
            effect.advance(1.5);
        }

        dot.start(DotEffect::new(5.0, DotDuration::Finite(2.0), 1.0, None), &mut speeds);
        let effect = dot.active.expect("restarted");
        assert_eq!(effect.elapsed, 0.0);
        assert_eq!(effect.ticks_fired, 1);
    }

    #[test]
    fn test_zero_duration_expires_without_ticks() {
        let mut speeds = MovementSpeeds::new(3.0, 6.0);
        let mut dot = DotState::new(0.5);

        let step = dot.start(DotEffect::new(5.0, DotDuration::Finite(0.0), 1.0, None), &mut speeds);
        assert_eq!(step, DotStep { ticks: 0, expired: true });
        assert!(!dot.is_active());
        assert_eq!(speeds, MovementSpeeds::new(3.0, 6.0));
    }
}
