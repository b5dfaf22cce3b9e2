#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic wave configuration generator.
//!
//! Scripted difficulties draw from a short authored table whose health
//! scaling is adjusted per difficulty. Endless play derives every wave from a
//! closed-form curve so that enemy count and toughness grow without bound.

use pathforge_core::{Difficulty, WaveConfig};

const SCRIPTED_WAVES: [WaveConfig; 4] = [
    WaveConfig::new(8, 0.9, 100),
    WaveConfig::new(12, 0.8, 115),
    WaveConfig::new(16, 0.7, 130),
    WaveConfig::new(20, 0.65, 150),
];

const ENDLESS_BASE_COUNT: u32 = 8;
const ENDLESS_COUNT_PER_WAVE: u32 = 2;
const ENDLESS_BASE_INTERVAL: f32 = 0.95;
const ENDLESS_INTERVAL_PER_WAVE: f32 = 0.015;
const ENDLESS_MIN_INTERVAL: f32 = 0.35;
const ENDLESS_HEALTH_PER_WAVE: u32 = 12;

/// Number of authored waves a scripted difficulty must clear for victory.
#[must_use]
pub const fn scripted_wave_count() -> usize {
    SCRIPTED_WAVES.len()
}

/// Computes the configuration of wave `index` at `difficulty`.
///
/// Scripted difficulties clamp `index` into the authored table. The function
/// is pure; repeated calls with the same arguments return the same value.
#[must_use]
pub fn wave_config(index: u32, difficulty: Difficulty) -> WaveConfig {
    match difficulty {
        Difficulty::Endless => endless_config(index),
        scripted => scripted_config(index, scripted),
    }
}

fn scripted_config(index: u32, difficulty: Difficulty) -> WaveConfig {
    let last = SCRIPTED_WAVES.len() - 1;
    let slot = usize::try_from(index).map_or(last, |index| index.min(last));
    let base = SCRIPTED_WAVES[slot];
    let scaled = base.health_multiplier_pct() * difficulty_multiplier_pct(difficulty) / 100;
    WaveConfig::new(base.enemy_count(), base.spawn_interval(), scaled)
}

fn endless_config(index: u32) -> WaveConfig {
    let n = index.saturating_add(1).max(1);
    let enemy_count = ENDLESS_BASE_COUNT.saturating_add(n.saturating_mul(ENDLESS_COUNT_PER_WAVE));
    let spawn_interval =
        (ENDLESS_BASE_INTERVAL - n as f32 * ENDLESS_INTERVAL_PER_WAVE).max(ENDLESS_MIN_INTERVAL);
    let health = 100u32.saturating_add(n.saturating_mul(ENDLESS_HEALTH_PER_WAVE));
    WaveConfig::new(enemy_count, spawn_interval, health)
}

const fn difficulty_multiplier_pct(difficulty: Difficulty) -> u32 {
    match difficulty {
        Difficulty::Easy => 80,
        Difficulty::Medium | Difficulty::Endless => 100,
        Difficulty::Hard => 135,
    }
}
