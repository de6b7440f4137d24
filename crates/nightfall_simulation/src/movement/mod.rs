//! Headless locomotion service
//!
//! Минимальный исполнитель `LocomotionIntent` для headless симуляции и тестов:
//! прямолинейное движение к цели без pathfinding, путь всегда "посчитан".
//! Хост с настоящим NavMesh заменяет этот plugin своим, который пишет тот же
//! `LocomotionStatus`.

use bevy::prelude::*;

use crate::components::{LocomotionIntent, LocomotionStatus};
use crate::SimulationSet;

/// Один шаг к цели: `step = min(speed × dt, distance)`.
///
/// Returns (новая позиция, velocity за шаг).
pub fn step_toward(position: Vec3, destination: Vec3, speed: f32, delta: f32) -> (Vec3, Vec3) {
    let offset = destination - position;
    let distance = offset.length();
    if distance <= f32::EPSILON || speed <= 0.0 || delta <= 0.0 {
        return (position, Vec3::ZERO);
    }

    let step = (speed * delta).min(distance);
    let direction = offset / distance;
    (position + direction * step, direction * (step / delta))
}

/// Система: исполнение intent → Transform + LocomotionStatus
pub fn drive_headless_locomotion(
    mut query: Query<(&LocomotionIntent, &mut LocomotionStatus, &mut Transform)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (intent, mut status, mut transform) in query.iter_mut() {
        let next = match *intent {
            LocomotionIntent::Hold => LocomotionStatus {
                destination: None,
                remaining_distance: 0.0,
                path_pending: false,
                velocity: Vec3::ZERO,
            },
            LocomotionIntent::MoveTo { position, speed } => {
                let (new_position, velocity) = step_toward(transform.translation, position, speed, delta);
                transform.translation = new_position;
                LocomotionStatus {
                    destination: Some(position),
                    remaining_distance: new_position.distance(position),
                    path_pending: false,
                    velocity,
                }
            }
        };

        if *status != next {
            *status = next;
        }
    }
}

/// Plugin headless locomotion (после решений AI в том же тике)
pub struct HeadlessLocomotionPlugin;

impl Plugin for HeadlessLocomotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, drive_headless_locomotion.in_set(SimulationSet::Locomotion));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_step_limited_by_speed() {
        let (position, velocity) = step_toward(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 4.0, 0.5);
        assert_relative_eq!(position.x, 2.0);
        assert_relative_eq!(velocity.x, 4.0);
    }

    #[test]
    fn test_step_never_overshoots() {
        let (position, velocity) = step_toward(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 4.0, 0.5);
        assert_relative_eq!(position.x, 1.0);
        assert_relative_eq!(velocity.x, 2.0);
    }

    #[test]
    fn test_already_there() {
        let (position, velocity) = step_toward(Vec3::ONE, Vec3::ONE, 4.0, 0.5);
        assert_eq!(position, Vec3::ONE);
        assert_eq!(velocity, Vec3::ZERO);
    }
}
