//! Headless session loop mirroring an interactive battle screen.

use std::time::Duration;

use pathforge_core::{Action, CellCoord, Difficulty, Event, Mode, FIXED_TICK};
use pathforge_world::{self as world, query, StateDigest, World};
use tracing::{debug, info};

use crate::{autobuild::AutoBuilder, clock::FixedStepClock, scenario::ScenarioTower};

#[derive(Debug)]
pub(crate) struct SessionConfig {
    pub(crate) difficulty: Difficulty,
    pub(crate) sandbox: bool,
    pub(crate) towers: Vec<ScenarioTower>,
    pub(crate) max_ticks: u64,
    pub(crate) frame: Duration,
    pub(crate) auto_build: Option<AutoBuilder>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct SessionSummary {
    pub(crate) outcome: Option<Mode>,
    pub(crate) ticks: u64,
    pub(crate) waves_cleared: u32,
    pub(crate) kills: u32,
    pub(crate) leaks: u32,
    pub(crate) towers: usize,
    pub(crate) gold: u32,
    pub(crate) base_health: i32,
    pub(crate) menu_coins: u32,
    pub(crate) digest: Option<StateDigest>,
}

impl SessionSummary {
    fn record(&mut self, events: &[Event]) {
        for event in events {
            match event {
                Event::WaveCleared { .. } => self.waves_cleared += 1,
                Event::EnemyKilled { .. } => self.kills += 1,
                Event::EnemyReachedEnd { .. } => self.leaks += 1,
                _ => {}
            }
        }
    }
}

/// Drives `world` from bootstrap until a terminal mode or the tick budget.
///
/// Waves are started as soon as the world is waiting between them or idling
/// in sandbox mode, and
/// progress is flushed through the world's store when the loop ends.
pub(crate) fn run(world: &mut World, mut config: SessionConfig) -> SessionSummary {
    let mut summary = SessionSummary::default();
    let mut events = Vec::new();

    world::bootstrap(world, &mut events);
    let opening = if config.sandbox {
        Action::EnterSandbox
    } else {
        Action::StartGame {
            difficulty: config.difficulty,
        }
    };
    world::dispatch(world, opening, &mut events);
    for tower in &config.towers {
        build_scenario_tower(world, tower, &mut events);
    }
    summary.record(&events);
    events.clear();

    let mut clock = FixedStepClock::new(FIXED_TICK);
    while summary.ticks < config.max_ticks && !is_terminal(query::mode(world)) {
        if let Some(builder) = config.auto_build.as_mut() {
            if let Some(action) = builder.next_action(world) {
                debug!(?action, "auto-build");
                world::dispatch(world, action, &mut events);
            }
        }
        if matches!(query::mode(world), Mode::WaveComplete | Mode::Sandbox) {
            world::dispatch(world, Action::NextWave, &mut events);
        }

        for _ in 0..clock.advance(config.frame) {
            world::update(world, FIXED_TICK, &mut events);
            summary.ticks += 1;
            if summary.ticks >= config.max_ticks || is_terminal(query::mode(world)) {
                break;
            }
        }
        summary.record(&events);
        events.clear();
    }

    world::save_progress(world, &mut events);

    summary.outcome = Some(query::mode(world));
    summary.towers = query::tower_view(world).len();
    summary.gold = query::gold(world);
    summary.base_health = query::base_health(world);
    summary.menu_coins = query::menu_coins(world);
    summary.digest = Some(query::state_digest(world));
    info!(
        outcome = ?summary.outcome,
        ticks = summary.ticks,
        waves = summary.waves_cleared,
        "session finished"
    );
    summary
}

fn build_scenario_tower(world: &mut World, tower: &ScenarioTower, events: &mut Vec<Event>) {
    let cell = CellCoord::new(tower.column, tower.row);
    world::dispatch(
        world,
        Action::PlaceTower {
            cell,
            kind: tower.kind,
        },
        events,
    );
    if tower.upgrades == 0 {
        return;
    }
    world::dispatch(world, Action::SelectTowerAt { cell }, events);
    for _ in 0..tower.upgrades {
        world::dispatch(world, Action::UpgradeSelectedTower, events);
    }
    world::dispatch(world, Action::CloseUpgradeMenu, events);
}

fn is_terminal(mode: Mode) -> bool {
    matches!(mode, Mode::GameOver | Mode::Victory)
}
