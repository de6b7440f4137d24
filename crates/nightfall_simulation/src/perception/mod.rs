//! Perception - геометрические проверки видимости (pure queries, без состояния)
//!
//! Двухфазный тест `can_see_target`:
//! 1. Sphere test: цель в радиусе `sight_range` от позиции агента
//! 2. Occlusion test: луч от "глаз" агента к цели, первый коллайдер на пути - сама цель
//!
//! Геометрия мира = Rapier `Collider` + `Transform`. Луч кастуется по каждому
//! коллайдеру в его локальном пространстве (`cast_local_ray`), поэтому physics
//! pipeline для headless симуляции не нужен.

use bevy::prelude::*;
use bevy_rapier3d::prelude::Collider;

/// Первое пересечение луча с коллайдерами.
///
/// Returns `(entity, distance)` ближайшего попадания в пределах `max_distance`.
/// `ignore` исключает коллайдер наблюдателя (луч стартует внутри него).
pub fn first_hit<'a>(
    origin: Vec3,
    toward: Vec3,
    max_distance: f32,
    ignore: Option<Entity>,
    colliders: impl IntoIterator<Item = (Entity, &'a Collider, &'a Transform)>,
) -> Option<(Entity, f32)> {
    let direction = (toward - origin).normalize_or_zero();
    if direction == Vec3::ZERO || max_distance <= 0.0 {
        return None;
    }

    let mut nearest: Option<(Entity, f32)> = None;

    for (entity, collider, transform) in colliders {
        if Some(entity) == ignore {
            continue;
        }

        // Переводим луч в локальное пространство коллайдера
        let inverse_rotation = transform.rotation.inverse();
        let local_origin = inverse_rotation * (origin - transform.translation);
        let local_direction = inverse_rotation * direction;

        let Some(distance) = collider.cast_local_ray(local_origin, local_direction, max_distance, true) else {
            continue;
        };

        match nearest {
            Some((_, best)) if best <= distance => {}
            _ => nearest = Some((entity, distance)),
        }
    }

    nearest
}

/// Луч от `origin` к `target_pos` первым упирается в `target`
pub fn has_line_of_sight<'a>(
    observer: Option<Entity>,
    origin: Vec3,
    target: Entity,
    target_pos: Vec3,
    max_distance: f32,
    colliders: impl IntoIterator<Item = (Entity, &'a Collider, &'a Transform)>,
) -> bool {
    matches!(
        first_hit(origin, target_pos, max_distance, observer, colliders),
        Some((hit, _)) if hit == target
    )
}

/// Видит ли агент цель (sphere test + occlusion test)
///
/// `facing_pos` - точка начала луча (глаза / orientation агента).
pub fn can_see_target<'a>(
    observer: Entity,
    agent_pos: Vec3,
    facing_pos: Vec3,
    target: Entity,
    target_pos: Vec3,
    sight_range: f32,
    colliders: impl IntoIterator<Item = (Entity, &'a Collider, &'a Transform)>,
) -> bool {
    if agent_pos.distance(target_pos) > sight_range {
        return false;
    }

    has_line_of_sight(Some(observer), facing_pos, target, target_pos, sight_range, colliders)
}

/// Точка внутри конуса `cone_angle` (полный угол, радианы) вокруг `forward`
pub fn within_cone(origin: Vec3, forward: Vec3, point: Vec3, cone_angle: f32) -> bool {
    let to_point = point - origin;
    if to_point.length_squared() <= f32::EPSILON || forward.length_squared() <= f32::EPSILON {
        return false;
    }

    forward.angle_between(to_point) <= cone_angle * 0.5
}
