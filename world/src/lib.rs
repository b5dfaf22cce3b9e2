#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Pathforge.
//!
//! The world owns every mutable piece of a session: the map, the economy,
//! the wave clock and the live towers, enemies and projectiles. Hosts mutate
//! it exclusively through [`dispatch`] and [`update`], and read it back
//! through the [`query`] module.

mod digest;
mod enemies;
mod map;
mod projectiles;
mod towers;

use std::time::Duration;

use pathforge_core::{
    upgrade_cost, Action, CellCoord, Difficulty, EnemyId, Event, Mode, ProgressData,
    ProgressStore, ProjectileId, TowerId, TowerKind, TransitionEvent, WaveConfig,
    PROGRESS_SCHEMA_VERSION,
};
use pathforge_system_state_machine::transition;
use pathforge_system_wave_generation::{scripted_wave_count, wave_config};
use tracing::{debug, info};

pub use digest::StateDigest;
pub use map::{GameMap, MAP_COLUMNS, MAP_ROWS};

use enemies::EnemyState;
use projectiles::ProjectileState;
use towers::TowerState;

/// Delay before the first wave of a fresh session.
const START_WAVE_DELAY: f32 = 3.0;
/// Delay between scripted waves.
const SCRIPTED_WAVE_DELAY: f32 = 3.0;
/// Delay between endless and sandbox waves.
const ENDLESS_WAVE_DELAY: f32 = 2.0;

const SANDBOX_GOLD: u32 = 9999;
const SANDBOX_BASE_HEALTH: i32 = 999;

/// Timers and counters driving the current or upcoming wave.
#[derive(Clone, Debug)]
struct WaveClock {
    /// Seconds left before the next wave starts on its own.
    delay: f32,
    /// Seconds left before the next spawn.
    spawn_timer: f32,
    /// Enemies spawned so far in the current wave.
    spawned: u32,
    /// Configuration captured when the current wave began.
    config: Option<WaveConfig>,
    active: bool,
}

impl WaveClock {
    fn waiting(delay: f32) -> Self {
        Self {
            delay,
            spawn_timer: 0.0,
            spawned: 0,
            config: None,
            active: false,
        }
    }

    fn total(&self) -> u32 {
        self.config.map_or(0, |config| config.enemy_count())
    }
}

/// Represents the authoritative Pathforge world state.
#[derive(Debug)]
pub struct World {
    map: GameMap,
    mode: Mode,
    difficulty: Difficulty,
    selected_kind: TowerKind,
    selected_tower: Option<TowerId>,
    gold: u32,
    base_health: i32,
    current_wave_index: u32,
    endless_wave_number: u32,
    progress: ProgressData,
    sandbox_session: bool,
    wave: WaveClock,
    towers: Vec<TowerState>,
    enemies: Vec<EnemyState>,
    projectiles: Vec<ProjectileState>,
    /// Shared by towers, enemies and projectiles; never reset.
    next_entity_id: u64,
    store: Option<Box<dyn ProgressStore>>,
}

impl World {
    /// Creates a world without a persistence port.
    ///
    /// Progress starts from defaults and saves are dropped.
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: GameMap::new(),
            mode: Mode::Login,
            difficulty: Difficulty::Medium,
            selected_kind: TowerKind::Archer,
            selected_tower: None,
            gold: Difficulty::Medium.starting_gold(),
            base_health: Difficulty::Medium.starting_base_health(),
            current_wave_index: 0,
            endless_wave_number: 1,
            progress: ProgressData::default(),
            sandbox_session: false,
            wave: WaveClock::waiting(START_WAVE_DELAY),
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            next_entity_id: 1,
            store: None,
        }
    }

    /// Creates a world that loads and saves progress through `store`.
    #[must_use]
    pub fn with_store(store: Box<dyn ProgressStore>) -> Self {
        Self {
            store: Some(store),
            ..Self::new()
        }
    }

    fn sandbox_active(&self) -> bool {
        self.sandbox_session || self.mode == Mode::Sandbox
    }

    /// Waves are drawn from the endless curve instead of the scripted table.
    fn endless_waves(&self) -> bool {
        self.difficulty == Difficulty::Endless || self.sandbox_active()
    }

    /// One-based number of the current or upcoming wave.
    fn wave_number(&self) -> u32 {
        if self.endless_waves() {
            self.endless_wave_number
        } else {
            self.current_wave_index.saturating_add(1)
        }
    }

    fn set_mode(&mut self, mode: Mode, out_events: &mut Vec<Event>) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "mode changed");
            out_events.push(Event::ModeChanged {
                from: self.mode,
                to: mode,
            });
            self.mode = mode;
        }
    }

    fn fire_transition(&mut self, event: TransitionEvent, out_events: &mut Vec<Event>) {
        self.set_mode(transition(self.mode, event), out_events);
    }

    fn select(&mut self, tower: Option<TowerId>, out_events: &mut Vec<Event>) {
        if self.selected_tower != tower {
            self.selected_tower = tower;
            out_events.push(Event::TowerSelected { tower });
        }
    }

    fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.towers
            .iter()
            .find(|tower| tower.cell == cell)
            .map(|tower| tower.id)
    }

    fn selected_tower_state(&self) -> Option<&TowerState> {
        let id = self.selected_tower?;
        self.towers.iter().find(|tower| tower.id == id)
    }

    fn clear_battlefield(&mut self) {
        self.towers.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.map.reset();
    }

    fn start_game(&mut self, difficulty: Difficulty, out_events: &mut Vec<Event>) {
        self.difficulty = difficulty;
        self.sandbox_session = false;
        self.selected_kind = TowerKind::Archer;
        self.select(None, out_events);
        self.gold = difficulty.starting_gold();
        self.base_health = difficulty.starting_base_health();
        self.current_wave_index = 0;
        self.endless_wave_number = 1;
        self.wave = WaveClock::waiting(START_WAVE_DELAY);
        self.clear_battlefield();
        info!(?difficulty, gold = self.gold, base_health = self.base_health, "session started");
        self.fire_transition(TransitionEvent::StartPlay, out_events);
    }

    fn enter_sandbox(&mut self, out_events: &mut Vec<Event>) {
        self.sandbox_session = true;
        self.select(None, out_events);
        self.gold = SANDBOX_GOLD;
        self.base_health = SANDBOX_BASE_HEALTH;
        self.endless_wave_number = 1;
        self.wave = WaveClock::waiting(START_WAVE_DELAY);
        self.clear_battlefield();
        info!("sandbox session started");
        self.fire_transition(TransitionEvent::EnterSandbox, out_events);
    }

    fn begin_next_wave(&mut self, out_events: &mut Vec<Event>) {
        let index = if self.endless_waves() {
            self.endless_wave_number.saturating_sub(1)
        } else {
            self.current_wave_index
        };
        let difficulty = if self.endless_waves() {
            Difficulty::Endless
        } else {
            self.difficulty
        };
        let config = wave_config(index, difficulty);
        let wave = self.wave_number();

        self.wave = WaveClock {
            delay: 0.0,
            spawn_timer: 0.0,
            spawned: 0,
            config: Some(config),
            active: true,
        };
        self.set_mode(Mode::Playing, out_events);

        info!(
            wave,
            enemies = config.enemy_count(),
            health_pct = config.health_multiplier_pct(),
            "wave started"
        );
        out_events.push(Event::WaveStarted { wave, config });
    }

    fn place_tower(&mut self, cell: CellCoord, kind: TowerKind, out_events: &mut Vec<Event>) {
        if !matches!(self.mode, Mode::Playing | Mode::Sandbox | Mode::WaveComplete) {
            return;
        }
        if !self.map.contains(cell) {
            return;
        }
        if let Some(existing) = self.tower_at(cell) {
            self.select(Some(existing), out_events);
            return;
        }
        if !self.map.can_place(cell) {
            return;
        }

        let cost = kind.cost();
        let free = self.sandbox_active();
        if !free && self.gold < cost {
            debug!(?kind, cost, gold = self.gold, "tower placement unaffordable");
            return;
        }

        let tower = TowerId::new(take_id(&mut self.next_entity_id));
        self.towers.push(TowerState::new(tower, kind, cell));
        self.map.place(cell);
        self.select(None, out_events);
        if !free {
            self.gold -= cost;
        }
        debug!(%tower, ?kind, column = cell.column(), row = cell.row(), "tower placed");
        out_events.push(Event::TowerPlaced { tower, kind, cell });
    }

    fn upgrade_selected_tower(&mut self, out_events: &mut Vec<Event>) {
        let Some(tower) = self.selected_tower_state() else {
            return;
        };
        if !tower.can_upgrade() {
            return;
        }

        let cost = upgrade_cost(tower.level);
        let free = self.sandbox_active();
        if !free && self.gold < cost {
            return;
        }

        let upgraded = tower.upgraded();
        let (id, level) = (upgraded.id, upgraded.level);
        if let Some(slot) = self.towers.iter_mut().find(|tower| tower.id == id) {
            *slot = upgraded;
        }
        if !free {
            self.gold -= cost;
        }
        debug!(tower = %id, level, "tower upgraded");
        out_events.push(Event::TowerUpgraded { tower: id, level });
    }

    fn spawn_enemies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let Some(config) = self.wave.config else {
            return;
        };
        if self.wave.spawned >= config.enemy_count() {
            return;
        }

        self.wave.spawn_timer -= dt;
        if self.wave.spawn_timer <= 0.0 {
            let enemy = EnemyId::new(take_id(&mut self.next_entity_id));
            let state = EnemyState::spawn(enemy, self.wave.spawned, &config, self.map.waypoints());
            out_events.push(Event::EnemySpawned {
                enemy,
                kind: state.kind,
            });
            self.enemies.push(state);
            self.wave.spawned += 1;
            self.wave.spawn_timer = config.spawn_interval();
        }
    }

    fn fire_towers(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        for tower in &mut self.towers {
            tower.cooldown = (tower.cooldown - dt).max(0.0);
            if tower.cooldown > 0.0 {
                continue;
            }

            let Some(target) = self
                .enemies
                .iter()
                .find(|enemy| enemy.is_targetable() && tower.in_range(enemy.position))
            else {
                continue;
            };

            let projectile = ProjectileId::new(take_id(&mut self.next_entity_id));
            self.projectiles.push(ProjectileState::launch(
                projectile,
                tower.center(),
                target.id,
                tower.stats.damage,
            ));
            tower.cooldown = tower.stats.fire_rate;
            out_events.push(Event::ProjectileFired {
                projectile,
                tower: tower.id,
                target: target.id,
            });
        }
    }

    fn advance_enemies(&mut self, dt: f32, out_events: &mut Vec<Event>) {
        let waypoints = self.map.waypoints();
        for enemy in &mut self.enemies {
            if enemy.advance(waypoints, dt) {
                self.base_health -= 1;
                debug!(enemy = %enemy.id, base_health = self.base_health, "enemy reached the base");
                out_events.push(Event::EnemyReachedEnd { enemy: enemy.id });
            }
        }
    }

    /// Pays out bounties, then drops dead and escaped enemies along with
    /// every projectile whose target is gone.
    fn remove_defeated(&mut self, out_events: &mut Vec<Event>) {
        for enemy in &self.enemies {
            if !enemy.is_alive() && !enemy.reached_end {
                self.gold = self.gold.saturating_add(enemy.bounty);
                out_events.push(Event::EnemyKilled {
                    enemy: enemy.id,
                    bounty: enemy.bounty,
                });
            }
        }

        self.enemies.retain(EnemyState::is_targetable);
        let enemies = &self.enemies;
        self.projectiles
            .retain(|projectile| enemies.iter().any(|enemy| enemy.id == projectile.target));
    }

    fn finish_wave(&mut self, out_events: &mut Vec<Event>) {
        let wave = self.wave_number();
        self.wave.active = false;
        info!(wave, gold = self.gold, base_health = self.base_health, "wave cleared");
        out_events.push(Event::WaveCleared { wave });

        if self.endless_waves() {
            self.endless_wave_number = self.endless_wave_number.saturating_add(1);
            self.wave.delay = ENDLESS_WAVE_DELAY;
            self.set_mode(Mode::WaveComplete, out_events);
            return;
        }

        self.current_wave_index += 1;
        if self.current_wave_index as usize >= scripted_wave_count() {
            let amount = self.difficulty.victory_coin_bonus();
            self.progress.menu_coins = self.progress.menu_coins.saturating_add(amount);
            info!(amount, menu_coins = self.progress.menu_coins, "victory");
            out_events.push(Event::MenuCoinsAwarded { amount });
            self.persist(out_events);
            self.fire_transition(TransitionEvent::Victory, out_events);
        } else {
            self.wave.delay = SCRIPTED_WAVE_DELAY;
            self.set_mode(Mode::WaveComplete, out_events);
        }
    }

    fn persist(&mut self, out_events: &mut Vec<Event>) {
        self.progress.schema_version = PROGRESS_SCHEMA_VERSION;
        if let Some(store) = self.store.as_mut() {
            store.save(&self.progress);
            debug!(menu_coins = self.progress.menu_coins, "progress saved");
            out_events.push(Event::ProgressSaved);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn take_id(counter: &mut u64) -> u64 {
    let id = *counter;
    *counter += 1;
    id
}

/// Loads persisted progress and opens the main menu.
///
/// Worlds without a persistence port start from default progress.
pub fn bootstrap(world: &mut World, out_events: &mut Vec<Event>) {
    world.progress = world
        .store
        .as_ref()
        .map(|store| store.load())
        .unwrap_or_default();
    info!(
        menu_coins = world.progress.menu_coins,
        cards = world.progress.cards,
        "progress loaded"
    );
    world.set_mode(Mode::Menu, out_events);
}

/// Hands the current meta-progression to the persistence port.
pub fn save_progress(world: &mut World, out_events: &mut Vec<Event>) {
    world.persist(out_events);
}

/// Applies the provided action to the world, mutating state deterministically.
///
/// Actions that are not valid in the current mode, or that the player cannot
/// afford, are ignored.
pub fn dispatch(world: &mut World, action: Action, out_events: &mut Vec<Event>) {
    match action {
        Action::OpenMenu => {
            world.sandbox_session = false;
            world.select(None, out_events);
            world.fire_transition(TransitionEvent::OpenMenu, out_events);
        }
        Action::OpenDifficultySelect => {
            world.fire_transition(TransitionEvent::OpenDifficulty, out_events);
        }
        Action::StartGame { difficulty } => world.start_game(difficulty, out_events),
        Action::Restart => world.start_game(world.difficulty, out_events),
        Action::PauseToggle => {
            let event = if world.mode == Mode::Paused {
                TransitionEvent::Resume
            } else {
                TransitionEvent::Pause
            };
            world.fire_transition(event, out_events);
        }
        Action::Resume => world.fire_transition(TransitionEvent::Resume, out_events),
        Action::PlaceTower { cell, kind } => world.place_tower(cell, kind, out_events),
        Action::SelectTowerType { kind } => world.selected_kind = kind,
        Action::SelectTowerAt { cell } => {
            let tower = world.tower_at(cell);
            world.select(tower, out_events);
        }
        Action::CloseUpgradeMenu => world.select(None, out_events),
        Action::UpgradeSelectedTower => world.upgrade_selected_tower(out_events),
        Action::NextWave => {
            if matches!(world.mode, Mode::WaveComplete | Mode::Sandbox) {
                world.begin_next_wave(out_events);
            }
        }
        Action::EnterSandbox => world.enter_sandbox(out_events),
        Action::ExitSandbox => {
            world.sandbox_session = false;
            world.select(None, out_events);
            world.fire_transition(TransitionEvent::ExitSandbox, out_events);
        }
        Action::AddMenuCoins { amount } => {
            world.progress.menu_coins = world.progress.menu_coins.saturating_add_signed(amount);
        }
        Action::ForceState { mode } => world.set_mode(mode, out_events),
    }
}

/// Advances the simulation by `dt`.
///
/// Outside `Playing`, `Sandbox` and `WaveComplete` the call is a no-op. While
/// waiting between waves only the inter-wave timer runs.
pub fn update(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    let dt = dt.as_secs_f32();

    match world.mode {
        Mode::Login
        | Mode::Menu
        | Mode::DifficultySelect
        | Mode::CharacterMenu
        | Mode::Paused
        | Mode::GameOver
        | Mode::Victory => return,
        Mode::WaveComplete => {
            world.wave.delay -= dt;
            if world.wave.delay <= 0.0 {
                world.begin_next_wave(out_events);
            }
            return;
        }
        Mode::Playing | Mode::Sandbox => {}
    }

    if world.wave.active {
        world.spawn_enemies(dt, out_events);
    }
    world.fire_towers(dt, out_events);
    projectiles::advance_projectiles(&mut world.projectiles, &mut world.enemies, dt);
    world.advance_enemies(dt, out_events);
    world.remove_defeated(out_events);

    if world.base_health <= 0 {
        world.base_health = 0;
        info!(wave = world.wave_number(), "base destroyed");
        world.fire_transition(TransitionEvent::GameOver, out_events);
        return;
    }

    if world.wave.active && world.wave.spawned >= world.wave.total() && world.enemies.is_empty() {
        world.finish_wave(out_events);
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{digest, GameMap, StateDigest, World};
    use pathforge_core::{
        upgrade_cost, Difficulty, EnemyView, Mode, ProgressData, ProjectileView, TowerKind,
        TowerSnapshot, TowerView,
    };

    /// Active game mode.
    #[must_use]
    pub fn mode(world: &World) -> Mode {
        world.mode
    }

    /// Difficulty of the current session.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// In-session currency.
    #[must_use]
    pub fn gold(world: &World) -> u32 {
        world.gold
    }

    /// Remaining base health. Never negative.
    #[must_use]
    pub fn base_health(world: &World) -> i32 {
        world.base_health
    }

    /// Zero-based index of the next scripted wave.
    #[must_use]
    pub fn current_wave_index(world: &World) -> u32 {
        world.current_wave_index
    }

    /// One-based number of the current endless or sandbox wave.
    #[must_use]
    pub fn endless_wave_number(world: &World) -> u32 {
        world.endless_wave_number
    }

    /// Meta-currency balance.
    #[must_use]
    pub fn menu_coins(world: &World) -> u32 {
        world.progress.menu_coins
    }

    /// Collected upgrade cards.
    #[must_use]
    pub fn cards(world: &World) -> u32 {
        world.progress.cards
    }

    /// Meta-progression as it would be persisted.
    #[must_use]
    pub fn progress(world: &World) -> ProgressData {
        world.progress
    }

    /// Tower kind remembered for future placements.
    #[must_use]
    pub fn selected_tower_kind(world: &World) -> TowerKind {
        world.selected_kind
    }

    /// Snapshot of the selected tower, if the selection still resolves.
    #[must_use]
    pub fn selected_tower(world: &World) -> Option<TowerSnapshot> {
        world.selected_tower_state().map(|tower| tower.snapshot())
    }

    /// Gold needed to upgrade the selected tower; zero without a selection
    /// or at the maximum level.
    #[must_use]
    pub fn selected_tower_upgrade_cost(world: &World) -> u32 {
        world
            .selected_tower_state()
            .map_or(0, |tower| upgrade_cost(tower.level))
    }

    /// Reports whether the selected tower can be upgraded right now.
    #[must_use]
    pub fn can_upgrade_selected_tower(world: &World) -> bool {
        world.selected_tower_state().is_some_and(|tower| {
            tower.can_upgrade()
                && (world.sandbox_active() || world.gold >= upgrade_cost(tower.level))
        })
    }

    /// Enemies spawned so far and the total for the current wave.
    #[must_use]
    pub fn wave_progress(world: &World) -> (u32, u32) {
        (world.wave.spawned, world.wave.total())
    }

    /// Reports whether a wave is currently spawning or being fought.
    #[must_use]
    pub fn is_wave_active(world: &World) -> bool {
        world.wave.active
    }

    /// Seconds until the next wave starts on its own while waiting.
    #[must_use]
    pub fn next_wave_delay(world: &World) -> f32 {
        world.wave.delay.max(0.0)
    }

    /// Provides read-only access to the battlefield layout.
    #[must_use]
    pub fn map(world: &World) -> &GameMap {
        &world.map
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Captures a read-only view of every live enemy.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of every projectile in flight.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|projectile| projectile.snapshot())
                .collect(),
        )
    }

    /// Fingerprint of the full simulation state.
    #[must_use]
    pub fn state_digest(world: &World) -> StateDigest {
        digest::compute(world)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathforge_core::{CellKind, FIXED_TICK};
    use pathforge_persistence::MemoryProgressStore;

    #[test]
    fn fresh_world_matches_session_defaults() {
        let world = World::new();
        assert_eq!(query::mode(&world), Mode::Login);
        assert_eq!(query::difficulty(&world), Difficulty::Medium);
        assert_eq!(query::gold(&world), 50);
        assert_eq!(query::base_health(&world), 20);
        assert_eq!(query::endless_wave_number(&world), 1);
        assert_eq!(query::selected_tower_kind(&world), TowerKind::Archer);
        assert_eq!(world.next_entity_id, 1);
    }

    #[test]
    fn bootstrap_loads_progress_and_opens_menu() {
        let store = MemoryProgressStore::with_progress(ProgressData {
            menu_coins: 40,
            cards: 3,
            ..ProgressData::default()
        });
        let mut world = World::with_store(Box::new(store));
        let mut events = Vec::new();

        bootstrap(&mut world, &mut events);

        assert_eq!(query::mode(&world), Mode::Menu);
        assert_eq!(query::menu_coins(&world), 40);
        assert_eq!(query::cards(&world), 3);
        assert_eq!(
            events,
            vec![Event::ModeChanged {
                from: Mode::Login,
                to: Mode::Menu
            }]
        );
    }

    #[test]
    fn clearing_final_scripted_wave_awards_coins_and_saves() {
        let store = MemoryProgressStore::default();
        let mut world = World::with_store(Box::new(store.clone()));
        let mut events = Vec::new();
        bootstrap(&mut world, &mut events);
        dispatch(
            &mut world,
            Action::StartGame {
                difficulty: Difficulty::Hard,
            },
            &mut events,
        );

        world.current_wave_index = 3;
        dispatch(&mut world, Action::NextWave, &mut events);
        world.wave.spawned = world.wave.total();
        events.clear();

        update(&mut world, FIXED_TICK, &mut events);

        assert_eq!(query::mode(&world), Mode::Victory);
        assert_eq!(query::current_wave_index(&world), 4);
        assert_eq!(query::menu_coins(&world), 250);
        assert_eq!(store.snapshot().menu_coins, 250);
        assert_eq!(store.save_count(), 1);
        assert!(events.contains(&Event::WaveCleared { wave: 4 }));
        assert!(events.contains(&Event::MenuCoinsAwarded { amount: 250 }));
        assert!(events.contains(&Event::ProgressSaved));
    }

    #[test]
    fn endless_victory_is_unreachable() {
        let mut world = World::new();
        let mut events = Vec::new();
        dispatch(
            &mut world,
            Action::StartGame {
                difficulty: Difficulty::Endless,
            },
            &mut events,
        );
        dispatch(&mut world, Action::NextWave, &mut events);
        world.endless_wave_number = 40;
        world.wave.spawned = world.wave.total();

        update(&mut world, FIXED_TICK, &mut events);

        assert_eq!(query::mode(&world), Mode::WaveComplete);
        assert_eq!(query::endless_wave_number(&world), 41);
        assert_eq!(query::current_wave_index(&world), 0);
        assert!((query::next_wave_delay(&world) - ENDLESS_WAVE_DELAY).abs() < 1e-6);
    }

    #[test]
    fn entity_ids_are_shared_and_never_reset() {
        let mut world = World::new();
        let mut events = Vec::new();
        start(&mut world, Difficulty::Medium, &mut events);
        place(&mut world, 2, 2, TowerKind::Archer, &mut events);
        start(&mut world, Difficulty::Medium, &mut events);
        place(&mut world, 2, 2, TowerKind::Archer, &mut events);

        let towers = query::tower_view(&world).into_vec();
        assert_eq!(towers.len(), 1);
        assert_eq!(towers[0].id, TowerId::new(2));
    }

    #[test]
    fn restart_clears_tower_cells() {
        let mut world = World::new();
        let mut events = Vec::new();
        start(&mut world, Difficulty::Medium, &mut events);
        place(&mut world, 2, 2, TowerKind::Archer, &mut events);
        assert_eq!(query::map(&world).cell_at(CellCoord::new(2, 2)), CellKind::Tower);

        dispatch(&mut world, Action::Restart, &mut events);

        assert_eq!(query::map(&world).cell_at(CellCoord::new(2, 2)), CellKind::Grass);
        assert!(query::tower_view(&world).is_empty());
    }

    #[test]
    fn game_over_ends_the_tick() {
        let mut world = World::new();
        let mut events = Vec::new();
        start(&mut world, Difficulty::Medium, &mut events);
        dispatch(&mut world, Action::NextWave, &mut events);
        world.base_health = 1;
        world.wave.spawned = world.wave.total();
        let mut enemy = EnemyState::spawn(
            EnemyId::new(99),
            0,
            &WaveConfig::new(1, 1.0, 100),
            world.map.waypoints(),
        );
        enemy.waypoint_index = world.map.waypoints().len();
        world.enemies.push(enemy);

        update(&mut world, FIXED_TICK, &mut events);

        assert_eq!(query::mode(&world), Mode::GameOver);
        assert_eq!(query::base_health(&world), 0);
        assert!(query::is_wave_active(&world));
        assert!(!events
            .iter()
            .any(|event| matches!(event, Event::WaveCleared { .. })));
    }

    fn start(world: &mut World, difficulty: Difficulty, events: &mut Vec<Event>) {
        dispatch(world, Action::StartGame { difficulty }, events);
    }

    fn place(world: &mut World, column: i32, row: i32, kind: TowerKind, events: &mut Vec<Event>) {
        dispatch(
            world,
            Action::PlaceTower {
                cell: CellCoord::new(column, row),
                kind,
            },
            events,
        );
    }
}
