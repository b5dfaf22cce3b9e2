#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Pathforge simulation.
//!
//! This crate defines the message surface that connects hosts, the
//! authoritative world, and the pure systems. Hosts submit [`Action`] values
//! describing desired mutations, the world executes them through its
//! `dispatch` entry point, advances time through `update`, and reports what
//! happened as [`Event`] values. Hosts read state back exclusively through
//! immutable snapshots.

use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};

/// Highest level a tower can be upgraded to.
pub const MAX_TOWER_LEVEL: u32 = 5;

/// Schema version written into every persisted [`ProgressData`].
pub const PROGRESS_SCHEMA_VERSION: u32 = 2;

/// Fixed simulation step hosts are expected to advance the world by.
pub const FIXED_TICK: Duration = Duration::from_nanos(16_666_667);

/// Top-level game phase. Exactly one mode is active at any time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Account screen shown before the session is bootstrapped.
    Login,
    /// Main menu.
    Menu,
    /// Difficulty picker reached from the main menu.
    DifficultySelect,
    /// Meta-progression screen.
    CharacterMenu,
    /// Free-build mode with unlimited economy.
    Sandbox,
    /// A wave is running.
    Playing,
    /// Simulation frozen by the player.
    Paused,
    /// Between waves, waiting for the next one to begin.
    WaveComplete,
    /// Base destroyed. Terminal until the session is reset.
    GameOver,
    /// Every scripted wave cleared. Terminal until the session is reset.
    Victory,
}

/// Session difficulty selected when a game starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// Generous economy, softened waves.
    Easy,
    /// Baseline tuning.
    Medium,
    /// Tight economy, hardened waves.
    Hard,
    /// Generated waves that grow without bound.
    Endless,
}

impl Difficulty {
    /// Every difficulty in menu order.
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Endless];

    /// Gold granted when a session starts.
    #[must_use]
    pub const fn starting_gold(self) -> u32 {
        match self {
            Self::Easy => 75,
            Self::Medium | Self::Endless => 50,
            Self::Hard => 35,
        }
    }

    /// Base health granted when a session starts.
    #[must_use]
    pub const fn starting_base_health(self) -> i32 {
        match self {
            Self::Easy => 25,
            Self::Medium => 20,
            Self::Hard | Self::Endless => 15,
        }
    }

    /// Menu coins awarded for clearing the final scripted wave.
    #[must_use]
    pub const fn victory_coin_bonus(self) -> u32 {
        match self {
            Self::Easy => 50,
            Self::Medium => 100,
            Self::Hard => 250,
            Self::Endless => 0,
        }
    }
}

/// Inputs accepted by the mode state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TransitionEvent {
    /// Return to the main menu from anywhere.
    OpenMenu,
    /// Open the difficulty picker; only honoured from the main menu.
    OpenDifficulty,
    /// Begin a freshly reset session.
    StartPlay,
    /// Freeze a running wave.
    Pause,
    /// Unfreeze a paused wave.
    Resume,
    /// The base ran out of health.
    GameOver,
    /// The final scripted wave was cleared.
    Victory,
    /// Switch into sandbox mode.
    EnterSandbox,
    /// Leave sandbox mode for the main menu.
    ExitSandbox,
}

/// Classification of a single map cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CellKind {
    /// Open ground where towers may be built.
    Grass,
    /// Part of the enemy route.
    Path,
    /// Scenery that accepts neither towers nor enemies.
    Blocked,
    /// Ground already occupied by a tower.
    Tower,
}

/// Location of a single grid cell expressed as column and row.
///
/// Coordinates are signed so that hosts can forward raw hit-test results;
/// anything outside the map is treated as [`CellKind::Blocked`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: i32,
    row: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: i32, row: i32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> i32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> i32 {
        self.row
    }

    /// Continuous position of the cell's center.
    #[must_use]
    pub fn center(self) -> WorldPoint {
        WorldPoint::new(self.column as f32 + 0.5, self.row as f32 + 0.5)
    }
}

/// Continuous position measured in world units, one unit per cell edge.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct WorldPoint {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl WorldPoint {
    /// Creates a point from its components.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(self, other: WorldPoint) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Moves `step` units along the straight line toward `target`.
    ///
    /// `distance` must be the current distance to `target` and non-zero.
    #[must_use]
    pub fn step_toward(self, target: WorldPoint, distance: f32, step: f32) -> WorldPoint {
        WorldPoint::new(
            self.x + (target.x - self.x) / distance * step,
            self.y + (target.y - self.y) / distance * step,
        )
    }
}

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u64);

        impl $name {
            /// Creates a new identifier with the provided numeric value.
            #[must_use]
            pub const fn new(value: u64) -> Self {
                Self(value)
            }

            /// Retrieves the numeric representation of the identifier.
            #[must_use]
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier assigned to a tower.
    TowerId
);
entity_id!(
    /// Unique identifier assigned to an enemy.
    EnemyId
);
entity_id!(
    /// Unique identifier assigned to a projectile.
    ProjectileId
);

/// Types of towers that can be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TowerKind {
    /// Cheap, fast-firing tower.
    Archer,
    /// Long-range, hard-hitting tower.
    Sheriff,
    /// Balanced, expensive tower.
    Mage,
}

impl TowerKind {
    /// Every tower kind in build-menu order.
    pub const ALL: [TowerKind; 3] = [Self::Archer, Self::Sheriff, Self::Mage];

    /// Gold required to place a tower of this kind.
    #[must_use]
    pub const fn cost(self) -> u32 {
        match self {
            Self::Archer => 25,
            Self::Sheriff => 45,
            Self::Mage => 60,
        }
    }

    /// Combat statistics of this kind at the provided level.
    ///
    /// Each stat grows linearly with `level - 1` from the kind's base value.
    /// Levels below one are treated as level one.
    #[must_use]
    pub fn stats_at(self, level: u32) -> TowerStats {
        let (base, growth) = match self {
            Self::Archer => (
                TowerStats::new(12, 4.0, 0.7),
                TowerStats::new(5, 0.3, 0.2),
            ),
            Self::Sheriff => (
                TowerStats::new(22, 5.5, 1.1),
                TowerStats::new(8, 0.25, 0.15),
            ),
            Self::Mage => (
                TowerStats::new(18, 4.5, 0.9),
                TowerStats::new(6, 0.3, 0.18),
            ),
        };
        let steps = level.saturating_sub(1);
        TowerStats::new(
            base.damage + growth.damage * steps as i32,
            base.range + growth.range * steps as f32,
            base.fire_rate + growth.fire_rate * steps as f32,
        )
    }
}

/// Combat statistics derived from a tower's kind and level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Hit points removed by each projectile.
    pub damage: i32,
    /// Targeting radius measured from the tower's cell center.
    pub range: f32,
    /// Seconds the tower waits between shots.
    pub fire_rate: f32,
}

impl TowerStats {
    /// Creates a stat block from its components.
    #[must_use]
    pub const fn new(damage: i32, range: f32, fire_rate: f32) -> Self {
        Self {
            damage,
            range,
            fire_rate,
        }
    }
}

/// Gold required to upgrade a tower from `level` to `level + 1`.
///
/// Returns zero for levels that cannot be upgraded.
#[must_use]
pub const fn upgrade_cost(level: u32) -> u32 {
    match level {
        1 => 30,
        2 => 50,
        3 => 100,
        4 => 200,
        _ => 0,
    }
}

/// Enemy archetypes. Purely cosmetic inside the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EnemyKind {
    /// Default enemy.
    Slime,
    /// Appears on every fifth spawn.
    Goblin,
    /// Appears on every seventh spawn.
    Bat,
    /// Appears on every eleventh spawn.
    Boss,
}

impl EnemyKind {
    /// Selects the archetype for the `spawn_index`-th enemy of a wave.
    #[must_use]
    pub const fn for_spawn_index(spawn_index: u32) -> Self {
        if spawn_index > 0 && spawn_index % 11 == 0 {
            Self::Boss
        } else if spawn_index % 5 == 0 {
            Self::Goblin
        } else if spawn_index % 7 == 0 {
            Self::Bat
        } else {
            Self::Slime
        }
    }
}

/// Shape of a single wave: how many enemies, how fast, how tough.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WaveConfig {
    enemy_count: u32,
    spawn_interval: f32,
    health_multiplier_pct: u32,
}

impl WaveConfig {
    /// Creates a wave configuration.
    #[must_use]
    pub const fn new(enemy_count: u32, spawn_interval: f32, health_multiplier_pct: u32) -> Self {
        Self {
            enemy_count,
            spawn_interval,
            health_multiplier_pct,
        }
    }

    /// Number of enemies spawned over the wave.
    #[must_use]
    pub const fn enemy_count(&self) -> u32 {
        self.enemy_count
    }

    /// Seconds between consecutive spawns.
    #[must_use]
    pub const fn spawn_interval(&self) -> f32 {
        self.spawn_interval
    }

    /// Enemy health scaling expressed as a percentage of the baseline.
    #[must_use]
    pub const fn health_multiplier_pct(&self) -> u32 {
        self.health_multiplier_pct
    }

    /// Hit points of every enemy spawned in this wave.
    #[must_use]
    pub const fn enemy_health(&self) -> i32 {
        (100 * self.health_multiplier_pct / 100) as i32
    }

    /// Movement speed of every enemy spawned in this wave.
    #[must_use]
    pub fn enemy_speed(&self) -> f32 {
        1.0 + (self.health_multiplier_pct as f32 - 100.0) * 0.002
    }
}

/// Every mutation a host may request from the world.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Action {
    /// Return to the main menu, dropping any tower selection.
    OpenMenu,
    /// Open the difficulty picker from the main menu.
    OpenDifficultySelect,
    /// Reset the session and start it at the given difficulty.
    StartGame {
        /// Difficulty of the new session.
        difficulty: Difficulty,
    },
    /// Pause a running wave, or resume a paused one.
    PauseToggle,
    /// Resume a paused wave.
    Resume,
    /// Build a tower, or select the tower already standing on the cell.
    PlaceTower {
        /// Cell the tower should occupy.
        cell: CellCoord,
        /// Kind of tower to build.
        kind: TowerKind,
    },
    /// Choose the tower kind used for future placements.
    SelectTowerType {
        /// Kind to remember.
        kind: TowerKind,
    },
    /// Select the tower standing on a cell, clearing the selection otherwise.
    SelectTowerAt {
        /// Cell to inspect.
        cell: CellCoord,
    },
    /// Drop the current tower selection.
    CloseUpgradeMenu,
    /// Upgrade the selected tower by one level.
    UpgradeSelectedTower,
    /// Start the next wave immediately.
    NextWave,
    /// Enter sandbox mode.
    EnterSandbox,
    /// Leave sandbox mode.
    ExitSandbox,
    /// Restart the session at the current difficulty.
    Restart,
    /// Adjust the meta-currency balance.
    AddMenuCoins {
        /// Signed amount to add; the balance never drops below zero.
        amount: i32,
    },
    /// Override the active mode. Intended for tests and debugging.
    ForceState {
        /// Mode to activate.
        mode: Mode,
    },
}

/// Events reported by the world after processing actions and ticks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// The active mode changed.
    ModeChanged {
        /// Mode before the change.
        from: Mode,
        /// Mode after the change.
        to: Mode,
    },
    /// A tower was built.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Kind of tower built.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: CellCoord,
    },
    /// The tower selection changed.
    TowerSelected {
        /// Newly selected tower, if any.
        tower: Option<TowerId>,
    },
    /// A tower gained a level.
    TowerUpgraded {
        /// Identifier of the upgraded tower.
        tower: TowerId,
        /// Level reached by the upgrade.
        level: u32,
    },
    /// A wave began spawning.
    WaveStarted {
        /// One-based wave number shown to players.
        wave: u32,
        /// Configuration the wave spawns with.
        config: WaveConfig,
    },
    /// An enemy entered the map.
    EnemySpawned {
        /// Identifier assigned to the enemy.
        enemy: EnemyId,
        /// Archetype of the enemy.
        kind: EnemyKind,
    },
    /// A tower fired at an enemy.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy being targeted.
        target: EnemyId,
    },
    /// An enemy was destroyed by tower fire.
    EnemyKilled {
        /// Identifier of the destroyed enemy.
        enemy: EnemyId,
        /// Gold awarded for the kill.
        bounty: u32,
    },
    /// An enemy walked off the end of the path and damaged the base.
    EnemyReachedEnd {
        /// Identifier of the enemy.
        enemy: EnemyId,
    },
    /// Every enemy of the wave has been spawned and removed.
    WaveCleared {
        /// One-based wave number that was cleared.
        wave: u32,
    },
    /// Meta-currency was awarded for a victory.
    MenuCoinsAwarded {
        /// Number of coins added.
        amount: u32,
    },
    /// Progress was handed to the persistence port.
    ProgressSaved,
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Kind of tower that was constructed.
    pub kind: TowerKind,
    /// Cell occupied by the tower.
    pub cell: CellCoord,
    /// Current level, between one and [`MAX_TOWER_LEVEL`].
    pub level: u32,
    /// Seconds until the tower may fire again.
    pub cooldown: f32,
    /// Current combat statistics.
    pub stats: TowerStats,
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Identifier allocated to the enemy by the world.
    pub id: EnemyId,
    /// Archetype of the enemy.
    pub kind: EnemyKind,
    /// Current position.
    pub position: WorldPoint,
    /// Remaining hit points.
    pub health: i32,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Gold awarded when the enemy is destroyed.
    pub bounty: u32,
    /// Index of the waypoint the enemy is walking toward.
    pub waypoint_index: usize,
    /// Indicates whether the enemy walked off the end of the path.
    pub reached_end: bool,
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile by the world.
    pub id: ProjectileId,
    /// Current position.
    pub position: WorldPoint,
    /// Enemy the projectile is homing on.
    pub target: EnemyId,
    /// Hit points removed on impact.
    pub damage: i32,
    /// Flight speed in world units per second.
    pub speed: f32,
}

macro_rules! snapshot_view {
    ($(#[$meta:meta])* $name:ident, $snapshot:ty) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default)]
        pub struct $name {
            snapshots: Vec<$snapshot>,
        }

        impl $name {
            /// Creates a new view from the provided snapshots.
            #[must_use]
            pub fn from_snapshots(mut snapshots: Vec<$snapshot>) -> Self {
                snapshots.sort_by_key(|snapshot| snapshot.id);
                Self { snapshots }
            }

            /// Iterator over the captured snapshots in deterministic order.
            pub fn iter(&self) -> impl Iterator<Item = &$snapshot> {
                self.snapshots.iter()
            }

            /// Number of captured snapshots.
            #[must_use]
            pub fn len(&self) -> usize {
                self.snapshots.len()
            }

            /// Reports whether the view captured nothing.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.snapshots.is_empty()
            }

            /// Consumes the view, yielding the underlying snapshots.
            #[must_use]
            pub fn into_vec(self) -> Vec<$snapshot> {
                self.snapshots
            }
        }
    };
}

snapshot_view!(
    /// Read-only snapshot describing every placed tower.
    TowerView,
    TowerSnapshot
);
snapshot_view!(
    /// Read-only snapshot describing every live enemy.
    EnemyView,
    EnemySnapshot
);
snapshot_view!(
    /// Read-only snapshot describing every projectile in flight.
    ProjectileView,
    ProjectileSnapshot
);

/// Meta-progression persisted between sessions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProgressData {
    /// Layout version of the aggregate.
    pub schema_version: u32,
    /// Menu currency earned from victories.
    pub menu_coins: u32,
    /// Collected upgrade cards.
    pub cards: u32,
    /// Meta level of the archer card.
    pub archer_level: u32,
    /// Meta level of the sheriff card.
    pub sheriff_level: u32,
    /// Meta level of the ally card.
    pub ally_level: u32,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            schema_version: PROGRESS_SCHEMA_VERSION,
            menu_coins: 0,
            cards: 0,
            archer_level: 1,
            sheriff_level: 1,
            ally_level: 1,
        }
    }
}

/// Port through which the world loads and saves meta-progression.
///
/// Implementations own their failure handling: the simulation treats both
/// operations as infallible side effects.
pub trait ProgressStore: fmt::Debug {
    /// Loads the last saved progress, or defaults when nothing was saved.
    fn load(&self) -> ProgressData;

    /// Persists the provided progress.
    fn save(&mut self, progress: &ProgressData);
}
