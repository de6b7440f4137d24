//! Регенерация здоровья цели

use bevy::prelude::*;

use crate::components::TargetHealth;

/// Система: регенерация `TargetHealth` после паузы без урона
pub fn regenerate_target_health(mut targets: Query<&mut TargetHealth>, time: Res<Time<Fixed>>) {
    let delta = time.delta_secs();

    for mut health in targets.iter_mut() {
        if health.current < health.max {
            health.regenerate(delta);
        }
    }
}
