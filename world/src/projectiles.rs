//! Homing projectiles fired by towers.

use pathforge_core::{EnemyId, ProjectileId, ProjectileSnapshot, WorldPoint};

use crate::enemies::EnemyState;

const PROJECTILE_SPEED: f32 = 10.0;
/// Distance at which a projectile strikes its target.
const IMPACT_RADIUS: f32 = 0.12;

#[derive(Clone, Debug)]
pub(crate) struct ProjectileState {
    pub(crate) id: ProjectileId,
    pub(crate) position: WorldPoint,
    pub(crate) target: EnemyId,
    pub(crate) damage: i32,
    pub(crate) speed: f32,
}

impl ProjectileState {
    pub(crate) fn launch(
        id: ProjectileId,
        origin: WorldPoint,
        target: EnemyId,
        damage: i32,
    ) -> Self {
        Self {
            id,
            position: origin,
            target,
            damage,
            speed: PROJECTILE_SPEED,
        }
    }

    pub(crate) fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            target: self.target,
            damage: self.damage,
            speed: self.speed,
        }
    }
}

/// Flies every projectile toward its target for `dt` seconds.
///
/// Projectiles whose target is gone or already dead are dropped. A projectile
/// within the impact radius applies its damage and is consumed.
pub(crate) fn advance_projectiles(
    projectiles: &mut Vec<ProjectileState>,
    enemies: &mut [EnemyState],
    dt: f32,
) {
    projectiles.retain_mut(|projectile| {
        let Some(target) = enemies
            .iter_mut()
            .find(|enemy| enemy.id == projectile.target && enemy.is_alive())
        else {
            return false;
        };

        let distance = projectile.position.distance_to(target.position);
        if distance < IMPACT_RADIUS {
            target.health -= projectile.damage;
            return false;
        }

        projectile.position =
            projectile
                .position
                .step_toward(target.position, distance, projectile.speed * dt);
        true
    });
}
