use pathforge_core::{
    Action, CellCoord, CellKind, Difficulty, Event, Mode, TowerKind, FIXED_TICK,
};
use pathforge_system_wave_generation::wave_config;
use pathforge_world::{self as world, query, World};

#[test]
fn start_game_resets_session() {
    let (world, _) = started(Difficulty::Hard);

    assert_eq!(query::mode(&world), Mode::WaveComplete);
    assert_eq!(query::gold(&world), 35);
    assert_eq!(query::base_health(&world), 15);
    assert_eq!(query::current_wave_index(&world), 0);
    assert!(query::tower_view(&world).is_empty());
    assert!(!query::is_wave_active(&world));
}

#[test]
fn placing_archer_spends_gold_and_marks_cell() {
    let (mut world, mut events) = started(Difficulty::Medium);

    place(&mut world, &mut events, 2, 2, TowerKind::Archer);

    assert_eq!(query::gold(&world), 25);
    assert_eq!(query::tower_view(&world).len(), 1);
    assert_eq!(
        query::map(&world).cell_at(CellCoord::new(2, 2)),
        CellKind::Tower
    );
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::TowerPlaced { kind: TowerKind::Archer, .. })));
}

#[test]
fn unaffordable_or_invalid_placements_are_ignored() {
    let (mut world, mut events) = started(Difficulty::Hard);

    place(&mut world, &mut events, 2, 2, TowerKind::Mage);
    place(&mut world, &mut events, 5, 15, TowerKind::Archer);
    place(&mut world, &mut events, 0, 0, TowerKind::Archer);
    place(&mut world, &mut events, -1, 4, TowerKind::Archer);
    place(&mut world, &mut events, 10, 4, TowerKind::Archer);

    assert_eq!(query::gold(&world), 35);
    assert!(query::tower_view(&world).is_empty());
}

#[test]
fn placing_on_existing_tower_selects_it() {
    let (mut world, mut events) = started(Difficulty::Easy);
    place(&mut world, &mut events, 2, 2, TowerKind::Archer);
    let tower = query::tower_view(&world).into_vec()[0].id;

    place(&mut world, &mut events, 2, 2, TowerKind::Mage);

    assert_eq!(query::gold(&world), 50);
    assert_eq!(query::tower_view(&world).len(), 1);
    assert_eq!(query::selected_tower(&world).map(|tower| tower.id), Some(tower));
    assert!(events.contains(&Event::TowerSelected { tower: Some(tower) }));
}

#[test]
fn placement_outside_building_modes_is_ignored() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::bootstrap(&mut world, &mut events);

    place(&mut world, &mut events, 2, 2, TowerKind::Archer);

    assert!(query::tower_view(&world).is_empty());
    assert_eq!(query::gold(&world), 50);
}

#[test]
fn upgrade_costs_gold_and_raises_level() {
    let (mut world, mut events) = started(Difficulty::Easy);
    place(&mut world, &mut events, 2, 2, TowerKind::Archer);
    select(&mut world, &mut events, 2, 2);
    assert_eq!(query::selected_tower_upgrade_cost(&world), 30);
    assert!(query::can_upgrade_selected_tower(&world));

    world::dispatch(&mut world, Action::UpgradeSelectedTower, &mut events);

    let tower = query::selected_tower(&world).expect("tower stays selected");
    assert_eq!(tower.level, 2);
    assert_eq!(tower.stats, TowerKind::Archer.stats_at(2));
    assert_eq!(query::gold(&world), 20);
    assert!(!query::can_upgrade_selected_tower(&world));
}

#[test]
fn upgrade_without_funds_or_selection_is_ignored() {
    let (mut world, mut events) = started(Difficulty::Hard);
    world::dispatch(&mut world, Action::UpgradeSelectedTower, &mut events);
    place(&mut world, &mut events, 2, 2, TowerKind::Archer);
    select(&mut world, &mut events, 2, 2);

    world::dispatch(&mut world, Action::UpgradeSelectedTower, &mut events);

    assert_eq!(query::selected_tower(&world).map(|tower| tower.level), Some(1));
    assert_eq!(query::gold(&world), 10);
}

#[test]
fn selecting_empty_cell_clears_selection() {
    let (mut world, mut events) = started(Difficulty::Medium);
    place(&mut world, &mut events, 2, 2, TowerKind::Archer);
    select(&mut world, &mut events, 2, 2);
    assert!(query::selected_tower(&world).is_some());

    select(&mut world, &mut events, 3, 3);

    assert!(query::selected_tower(&world).is_none());
    assert_eq!(query::selected_tower_upgrade_cost(&world), 0);
}

#[test]
fn sandbox_building_is_free() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::bootstrap(&mut world, &mut events);
    world::dispatch(&mut world, Action::EnterSandbox, &mut events);
    let gold = query::gold(&world);

    place(&mut world, &mut events, 2, 2, TowerKind::Mage);
    select(&mut world, &mut events, 2, 2);
    for _ in 0..10 {
        world::dispatch(&mut world, Action::UpgradeSelectedTower, &mut events);
    }

    assert_eq!(query::mode(&world), Mode::Sandbox);
    assert_eq!(query::gold(&world), gold);
    assert_eq!(query::selected_tower(&world).map(|tower| tower.level), Some(5));
}

#[test]
fn sandbox_waves_follow_endless_curve_and_stay_free() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::bootstrap(&mut world, &mut events);
    world::dispatch(&mut world, Action::EnterSandbox, &mut events);
    let gold = query::gold(&world);

    world::dispatch(&mut world, Action::NextWave, &mut events);
    place(&mut world, &mut events, 2, 2, TowerKind::Mage);

    assert_eq!(query::mode(&world), Mode::Playing);
    assert!(events.contains(&Event::WaveStarted {
        wave: 1,
        config: wave_config(0, Difficulty::Endless),
    }));
    assert_eq!(query::gold(&world), gold);
    assert_eq!(query::tower_view(&world).len(), 1);
}

#[test]
fn next_wave_only_from_wave_complete_or_sandbox() {
    let mut world = World::new();
    let mut events = Vec::new();
    world::bootstrap(&mut world, &mut events);

    world::dispatch(&mut world, Action::NextWave, &mut events);
    assert_eq!(query::mode(&world), Mode::Menu);

    world::dispatch(
        &mut world,
        Action::StartGame {
            difficulty: Difficulty::Medium,
        },
        &mut events,
    );
    world::dispatch(&mut world, Action::NextWave, &mut events);
    assert_eq!(query::mode(&world), Mode::Playing);
    assert_eq!(query::wave_progress(&world), (0, 8));

    events.clear();
    world::dispatch(&mut world, Action::NextWave, &mut events);
    assert!(events.is_empty());
}

#[test]
fn first_wave_starts_on_its_own() {
    let (mut world, mut events) = started(Difficulty::Medium);

    tick(&mut world, &mut events, 170);
    assert_eq!(query::mode(&world), Mode::WaveComplete);

    tick(&mut world, &mut events, 20);
    assert_eq!(query::mode(&world), Mode::Playing);
    assert!(query::is_wave_active(&world));
}

#[test]
fn enemies_spawn_on_interval() {
    let (mut world, mut events) = started(Difficulty::Medium);
    world::dispatch(&mut world, Action::NextWave, &mut events);

    tick(&mut world, &mut events, 1);
    assert_eq!(query::enemy_view(&world).len(), 1);
    assert_eq!(query::wave_progress(&world), (1, 8));

    tick(&mut world, &mut events, 60);
    assert_eq!(query::enemy_view(&world).len(), 2);

    let first = query::enemy_view(&world).into_vec()[0];
    assert_eq!(first.health, 100);
    assert_eq!(first.bounty, 5);
}

#[test]
fn undefended_wave_damages_base() {
    let (mut world, mut events) = started(Difficulty::Medium);
    world::dispatch(&mut world, Action::NextWave, &mut events);

    tick(&mut world, &mut events, 2_400);

    assert!(query::base_health(&world) < 20);
    assert!(events
        .iter()
        .any(|event| matches!(event, Event::EnemyReachedEnd { .. })));
}

#[test]
fn leaking_every_enemy_ends_in_game_over() {
    let (mut world, mut events) = started(Difficulty::Hard);

    for _ in 0..15_000 {
        match query::mode(&world) {
            Mode::GameOver => break,
            Mode::WaveComplete => world::dispatch(&mut world, Action::NextWave, &mut events),
            _ => {}
        }
        world::update(&mut world, FIXED_TICK, &mut events);
    }

    assert_eq!(query::mode(&world), Mode::GameOver);
    assert_eq!(query::base_health(&world), 0);

    let digest = query::state_digest(&world);
    tick(&mut world, &mut events, 120);
    assert_eq!(query::state_digest(&world), digest);
}

#[test]
fn kills_award_gold() {
    let (mut world, mut events) = started(Difficulty::Medium);
    place(&mut world, &mut events, 2, 9, TowerKind::Sheriff);
    let gold = query::gold(&world);
    world::dispatch(&mut world, Action::NextWave, &mut events);

    tick(&mut world, &mut events, 1_200);

    let kills = events
        .iter()
        .filter(|event| matches!(event, Event::EnemyKilled { .. }))
        .count() as u32;
    assert!(kills > 0);
    assert_eq!(query::gold(&world), gold + kills * 5);
}

#[test]
fn projectiles_never_outlive_their_targets() {
    let (mut world, mut events) = started(Difficulty::Medium);
    place(&mut world, &mut events, 2, 9, TowerKind::Sheriff);
    world::dispatch(&mut world, Action::NextWave, &mut events);

    for _ in 0..600 {
        world::update(&mut world, FIXED_TICK, &mut events);
        let enemies = query::enemy_view(&world);
        for projectile in query::projectile_view(&world).iter() {
            assert!(
                enemies.iter().any(|enemy| enemy.id == projectile.target),
                "projectile {} targets a missing enemy",
                projectile.id
            );
        }
    }
}

#[test]
fn restart_mid_wave_resets_battlefield() {
    let (mut world, mut events) = started(Difficulty::Medium);
    place(&mut world, &mut events, 2, 2, TowerKind::Archer);
    world::dispatch(&mut world, Action::NextWave, &mut events);
    tick(&mut world, &mut events, 300);
    assert!(!query::enemy_view(&world).is_empty());

    world::dispatch(&mut world, Action::Restart, &mut events);

    assert_eq!(query::mode(&world), Mode::WaveComplete);
    assert_eq!(query::difficulty(&world), Difficulty::Medium);
    assert_eq!(query::current_wave_index(&world), 0);
    assert_eq!(query::gold(&world), 50);
    assert!(query::tower_view(&world).is_empty());
    assert!(query::enemy_view(&world).is_empty());
    assert!(query::projectile_view(&world).is_empty());
    assert_eq!(
        query::map(&world).cell_at(CellCoord::new(2, 2)),
        CellKind::Grass
    );
}

#[test]
fn pause_freezes_simulation() {
    let (mut world, mut events) = started(Difficulty::Medium);
    world::dispatch(&mut world, Action::NextWave, &mut events);
    tick(&mut world, &mut events, 30);

    world::dispatch(&mut world, Action::PauseToggle, &mut events);
    assert_eq!(query::mode(&world), Mode::Paused);
    let digest = query::state_digest(&world);
    tick(&mut world, &mut events, 120);
    assert_eq!(query::state_digest(&world), digest);

    world::dispatch(&mut world, Action::PauseToggle, &mut events);
    assert_eq!(query::mode(&world), Mode::Playing);
}

#[test]
fn menu_coins_never_go_negative() {
    let mut world = World::new();
    let mut events = Vec::new();

    world::dispatch(&mut world, Action::AddMenuCoins { amount: 30 }, &mut events);
    world::dispatch(&mut world, Action::AddMenuCoins { amount: -100 }, &mut events);

    assert_eq!(query::menu_coins(&world), 0);
}

#[test]
fn open_menu_drops_selection() {
    let (mut world, mut events) = started(Difficulty::Medium);
    place(&mut world, &mut events, 2, 2, TowerKind::Archer);
    select(&mut world, &mut events, 2, 2);

    world::dispatch(&mut world, Action::OpenMenu, &mut events);

    assert_eq!(query::mode(&world), Mode::Menu);
    assert!(query::selected_tower(&world).is_none());
}

fn started(difficulty: Difficulty) -> (World, Vec<Event>) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::bootstrap(&mut world, &mut events);
    world::dispatch(&mut world, Action::StartGame { difficulty }, &mut events);
    (world, events)
}

fn place(world: &mut World, events: &mut Vec<Event>, column: i32, row: i32, kind: TowerKind) {
    world::dispatch(
        world,
        Action::PlaceTower {
            cell: CellCoord::new(column, row),
            kind,
        },
        events,
    );
}

fn select(world: &mut World, events: &mut Vec<Event>, column: i32, row: i32) {
    world::dispatch(
        world,
        Action::SelectTowerAt {
            cell: CellCoord::new(column, row),
        },
        events,
    );
}

fn tick(world: &mut World, events: &mut Vec<Event>, ticks: usize) {
    for _ in 0..ticks {
        world::update(world, FIXED_TICK, events);
    }
}
