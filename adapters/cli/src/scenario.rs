//! TOML scenario files describing an opening build.

use std::{fs, path::Path};

use anyhow::{bail, Context, Result};
use pathforge_core::{Difficulty, TowerKind, MAX_TOWER_LEVEL};
use serde::Deserialize;

/// Opening layout and limits applied before a headless session runs.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct Scenario {
    #[serde(default)]
    pub(crate) difficulty: Option<Difficulty>,
    #[serde(default)]
    pub(crate) max_ticks: Option<u64>,
    #[serde(default)]
    pub(crate) towers: Vec<ScenarioTower>,
}

/// Tower placed when the session starts.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ScenarioTower {
    pub(crate) column: i32,
    pub(crate) row: i32,
    pub(crate) kind: TowerKind,
    /// Upgrades bought right after placement.
    #[serde(default)]
    pub(crate) upgrades: u32,
}

impl Scenario {
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("invalid scenario at {}", path.display()))
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        let scenario: Self =
            toml::from_str(contents).context("failed to parse scenario toml contents")?;
        for tower in &scenario.towers {
            if tower.upgrades >= MAX_TOWER_LEVEL {
                bail!(
                    "tower at ({}, {}) requests {} upgrades; at most {} are possible",
                    tower.column,
                    tower.row,
                    tower.upgrades,
                    MAX_TOWER_LEVEL - 1
                );
            }
        }
        Ok(scenario)
    }
}
