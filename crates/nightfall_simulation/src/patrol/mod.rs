//! Waypoint patrol - выбор следующей точки и детект прибытия
//!
//! Маршрут (`PatrolRoute`) read-only после спавна; индекс и wait-таймер
//! (`PatrolProgress`) меняются только здесь и только в состоянии Patrolling.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::components::LocomotionStatus;

/// Порядок обхода точек маршрута
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect, Serialize, Deserialize)]
pub enum PatrolMode {
    #[default]
    InOrder,
    /// Случайная точка, отличная от текущей (если точек > 1)
    Random,
}

/// Маршрут патруля агента
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct PatrolRoute {
    pub points: Vec<Vec3>,
    pub mode: PatrolMode,
    /// Ожидание на каждой точке (секунды)
    pub wait_time: f32,
}

impl PatrolRoute {
    pub fn new(points: Vec<Vec3>, mode: PatrolMode, wait_time: f32) -> Self {
        Self { points, mode, wait_time }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<Vec3> {
        self.points.get(index).copied()
    }

    /// Следующий индекс после `current`
    ///
    /// InOrder: `(current + 1) % count`. Random: равномерно, но не `current` при count > 1.
    /// Пустой маршрут возвращает `current` без изменений.
    pub fn next_index(&self, current: usize, rng: &mut impl Rng) -> usize {
        let count = self.points.len();
        if count == 0 {
            return current;
        }

        match self.mode {
            PatrolMode::InOrder => (current + 1) % count,
            PatrolMode::Random => {
                if count == 1 {
                    return current;
                }
                loop {
                    let candidate = rng.gen_range(0..count);
                    if candidate != current {
                        return candidate;
                    }
                }
            }
        }
    }

    /// Ближайшая к `from` точка (при равенстве - меньший индекс)
    pub fn nearest_index(&self, from: Vec3) -> Option<usize> {
        let mut nearest: Option<(usize, f32)> = None;

        for (index, point) in self.points.iter().enumerate() {
            let distance = from.distance(*point);
            match nearest {
                Some((_, best)) if best <= distance => {}
                _ => nearest = Some((index, distance)),
            }
        }

        nearest.map(|(index, _)| index)
    }
}

/// Прогресс патруля: текущая точка + wait-таймер
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct PatrolProgress {
    pub index: usize,
    pub waiting: bool,
    pub wait_elapsed: f32,
}

impl PatrolProgress {
    /// Один тик патруля. Возвращает точку, к которой надо идти (None для пустого маршрута).
    ///
    /// Прибытие (status дошёл до текущей точки) → ожидание `wait_time`,
    /// по истечении ожидания выбирается следующая точка.
    pub fn advance(
        &mut self,
        route: &PatrolRoute,
        status: Option<&LocomotionStatus>,
        arrival_tolerance: f32,
        delta: f32,
        rng: &mut impl Rng,
    ) -> Option<Vec3> {
        let current = route.point(self.index)?;

        if self.waiting {
            self.wait_elapsed += delta;
            if self.wait_elapsed >= route.wait_time {
                self.waiting = false;
                self.wait_elapsed = 0.0;
                self.index = route.next_index(self.index, rng);
            }
        } else if status.is_some_and(|status| status.has_arrived_at(current, arrival_tolerance)) {
            self.waiting = true;
            self.wait_elapsed = 0.0;
        }

        route.point(self.index)
    }

    /// Возврат к патрулю после поиска: ближайшая точка, wait-состояние сброшено
    pub fn resume_at_nearest(&mut self, route: &PatrolRoute, position: Vec3) {
        self.waiting = false;
        self.wait_elapsed = 0.0;
        if let Some(index) = route.nearest_index(position) {
            self.index = index;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn square_route(mode: PatrolMode) -> PatrolRoute {
        PatrolRoute::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 0.0),
                Vec3::new(10.0, 0.0, 10.0),
                Vec3::new(0.0, 0.0, 10.0),
            ],
            mode,
            2.0,
        )
    }

    #[test]
    fn test_in_order_cycles_back_to_start() {
        let route = square_route(PatrolMode::InOrder);
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let start = 2;
        let mut index = start;
        for _ in 0..route.points.len() {
            index = route.next_index(index, &mut rng);
        }
        assert_eq!(index, start);
    }

    #[test]
    fn test_random_never_repeats_current() {
        let route = square_route(PatrolMode::Random);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let mut index = 0;
        for _ in 0..200 {
            let next = route.next_index(index, &mut rng);
            assert_ne!(next, index);
            assert!(next < route.points.len());
            index = next;
        }
    }

    #[test]
    fn test_random_single_point_unchanged() {
        let route = PatrolRoute::new(vec![Vec3::X], PatrolMode::Random, 1.0);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(route.next_index(0, &mut rng), 0);
    }

    #[test]
    fn test_nearest_index_ties_pick_lowest() {
        let route = PatrolRoute::new(
            vec![Vec3::new(-5.0, 0.0, 0.0), Vec3::new(5.0, 0.0, 0.0), Vec3::new(20.0, 0.0, 0.0)],
            PatrolMode::InOrder,
            0.0,
        );
        assert_eq!(route.nearest_index(Vec3::ZERO), Some(0));
        assert_eq!(route.nearest_index(Vec3::new(18.0, 0.0, 0.0)), Some(2));
        assert_eq!(PatrolRoute::default().nearest_index(Vec3::ZERO), None);
    }

    #[test]
    fn test_wait_then_advance() {
        let route = square_route(PatrolMode::InOrder);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut progress = PatrolProgress::default();

        let arrived = LocomotionStatus {
            destination: Some(Vec3::ZERO),
            remaining_distance: 0.2,
            path_pending: false,
            velocity: Vec3::ZERO,
        };

        // Прибыли → начинаем ждать
        assert_eq!(progress.advance(&route, Some(&arrived), 0.5, 0.5, &mut rng), Some(Vec3::ZERO));
        assert!(progress.waiting);

        // 1.5 сек ожидания - ещё на месте
        progress.advance(&route, Some(&arrived), 0.5, 1.5, &mut rng);
        assert!(progress.waiting);
        assert_eq!(progress.index, 0);

        // Ещё 0.5 сек → 2.0 сек ожидания → следующая точка
        let next = progress.advance(&route, Some(&arrived), 0.5, 0.5, &mut rng);
        assert!(!progress.waiting);
        assert_eq!(progress.index, 1);
        assert_eq!(next, Some(Vec3::new(10.0, 0.0, 0.0)));
    }

    #[test]
    fn test_empty_route_never_selects() {
        let route = PatrolRoute::default();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut progress = PatrolProgress::default();

        assert_eq!(progress.advance(&route, None, 0.5, 1.0, &mut rng), None);
        assert_eq!(progress, PatrolProgress::default());
    }

    #[test]
    fn test_resume_resets_wait_state() {
        let route = square_route(PatrolMode::InOrder);
        let mut progress = PatrolProgress { index: 0, waiting: true, wait_elapsed: 1.2 };

        progress.resume_at_nearest(&route, Vec3::new(9.0, 0.0, 9.0));
        assert_eq!(progress, PatrolProgress { index: 2, waiting: false, wait_elapsed: 0.0 });
    }
}
