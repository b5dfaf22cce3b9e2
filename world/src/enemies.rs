//! Enemy spawning and waypoint following.

use pathforge_core::{EnemyId, EnemyKind, EnemySnapshot, WaveConfig, WorldPoint};

/// Gold awarded for every destroyed enemy.
const ENEMY_BOUNTY: u32 = 5;
/// Distance at which an enemy counts as having reached its waypoint.
const WAYPOINT_ARRIVAL_RADIUS: f32 = 0.08;

#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) kind: EnemyKind,
    pub(crate) position: WorldPoint,
    pub(crate) health: i32,
    pub(crate) speed: f32,
    pub(crate) bounty: u32,
    pub(crate) waypoint_index: usize,
    pub(crate) reached_end: bool,
}

impl EnemyState {
    /// Creates the `spawn_index`-th enemy of a wave standing on the path start.
    pub(crate) fn spawn(
        id: EnemyId,
        spawn_index: u32,
        config: &WaveConfig,
        waypoints: &[WorldPoint],
    ) -> Self {
        Self {
            id,
            kind: EnemyKind::for_spawn_index(spawn_index),
            position: waypoints.first().copied().unwrap_or_default(),
            health: config.enemy_health(),
            speed: config.enemy_speed(),
            bounty: ENEMY_BOUNTY,
            waypoint_index: 1,
            reached_end: false,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Alive and still walking the path.
    pub(crate) fn is_targetable(&self) -> bool {
        self.is_alive() && !self.reached_end
    }

    /// Walks the enemy along the path for `dt` seconds.
    ///
    /// Returns `true` on the tick the enemy steps past the final waypoint.
    /// Reaching a waypoint consumes the tick without moving.
    pub(crate) fn advance(&mut self, waypoints: &[WorldPoint], dt: f32) -> bool {
        if !self.is_targetable() {
            return false;
        }

        let Some(target) = waypoints.get(self.waypoint_index).copied() else {
            self.reached_end = true;
            return true;
        };

        let distance = self.position.distance_to(target);
        if distance < WAYPOINT_ARRIVAL_RADIUS {
            self.waypoint_index += 1;
        } else {
            self.position = self
                .position
                .step_toward(target, distance, self.speed * dt);
        }
        false
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            speed: self.speed,
            bounty: self.bounty,
            waypoint_index: self.waypoint_index,
            reached_end: self.reached_end,
        }
    }
}
