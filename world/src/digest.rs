//! Canonical SHA-256 fingerprint of the simulation state.

use std::fmt;

use sha2::{Digest, Sha256};

use crate::World;

/// Fingerprint of every piece of state that influences future ticks.
///
/// Two worlds fed the same actions and tick durations always produce equal
/// digests, which makes the value suitable for replay comparisons.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateDigest([u8; 32]);

impl StateDigest {
    /// Raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for StateDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

pub(crate) fn compute(world: &World) -> StateDigest {
    let mut hasher = Sha256::new();

    hasher.update([
        world.mode as u8,
        world.difficulty as u8,
        world.selected_kind as u8,
        u8::from(world.sandbox_session),
        u8::from(world.wave.active),
    ]);
    hasher.update(world.gold.to_le_bytes());
    hasher.update(world.base_health.to_le_bytes());
    hasher.update(world.current_wave_index.to_le_bytes());
    hasher.update(world.endless_wave_number.to_le_bytes());
    hasher.update(world.progress.menu_coins.to_le_bytes());
    hasher.update(world.progress.cards.to_le_bytes());
    hasher.update(world.next_entity_id.to_le_bytes());
    hasher.update(
        world
            .selected_tower
            .map_or(0, |tower| tower.get())
            .to_le_bytes(),
    );

    hasher.update(world.wave.delay.to_le_bytes());
    hasher.update(world.wave.spawn_timer.to_le_bytes());
    hasher.update(world.wave.spawned.to_le_bytes());
    if let Some(config) = world.wave.config {
        hasher.update(config.enemy_count().to_le_bytes());
        hasher.update(config.spawn_interval().to_le_bytes());
        hasher.update(config.health_multiplier_pct().to_le_bytes());
    }

    for (_, kind) in world.map.iter() {
        hasher.update([kind as u8]);
    }

    for tower in &world.towers {
        hasher.update(tower.id.get().to_le_bytes());
        hasher.update([tower.kind as u8]);
        hasher.update(tower.cell.column().to_le_bytes());
        hasher.update(tower.cell.row().to_le_bytes());
        hasher.update(tower.level.to_le_bytes());
        hasher.update(tower.cooldown.to_le_bytes());
    }

    for enemy in &world.enemies {
        hasher.update(enemy.id.get().to_le_bytes());
        hasher.update([enemy.kind as u8, u8::from(enemy.reached_end)]);
        hasher.update(enemy.position.x.to_le_bytes());
        hasher.update(enemy.position.y.to_le_bytes());
        hasher.update(enemy.health.to_le_bytes());
        hasher.update((enemy.waypoint_index as u64).to_le_bytes());
    }

    for projectile in &world.projectiles {
        hasher.update(projectile.id.get().to_le_bytes());
        hasher.update(projectile.target.get().to_le_bytes());
        hasher.update(projectile.position.x.to_le_bytes());
        hasher.update(projectile.position.y.to_le_bytes());
        hasher.update(projectile.damage.to_le_bytes());
    }

    StateDigest(hasher.finalize().into())
}
