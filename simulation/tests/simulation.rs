use std::{collections::HashMap, time::Duration};

use glam::Vec2;
use medieval_protect_core::{Coins, EnemyId, EnemyKind, Event, Health, HitPoints, Rules};
use medieval_protect_simulation::{Simulation, SimulationInput};
use medieval_protect_system_game_flow::{FlowInput, GameOverOption, GameState};
use medieval_protect_world::query;

const TENTH: Duration = Duration::from_millis(100);

fn sixtieth() -> Duration {
    Duration::from_secs_f64(1.0 / 60.0)
}

fn enter() -> SimulationInput {
    SimulationInput::keys(FlowInput {
        confirm: true,
        ..FlowInput::default()
    })
}

fn escape() -> SimulationInput {
    SimulationInput::keys(FlowInput {
        escape: true,
        ..FlowInput::default()
    })
}

fn started(rules: Rules) -> Simulation {
    let mut simulation = Simulation::with_rules(rules);
    simulation.advance(TENTH, enter());
    assert_eq!(simulation.flow().state(), GameState::Playing);
    simulation
}

fn run_until<F>(simulation: &mut Simulation, dt: Duration, limit: usize, mut done: F) -> bool
where
    F: FnMut(&Simulation) -> bool,
{
    for _ in 0..limit {
        simulation.advance(dt, SimulationInput::idle());
        if done(simulation) {
            return true;
        }
    }
    false
}

#[test]
fn starting_a_session_does_not_step_that_frame() {
    let simulation = started(Rules::default());

    assert_eq!(simulation.last_events(), &[Event::SessionReset]);
    assert_eq!(query::tick_index(simulation.world()), 0);
    assert_eq!(query::coins(simulation.world()), Coins::new(200));
    assert_eq!(query::hit_points(simulation.world()), HitPoints::new(200));
}

#[test]
fn menu_frames_leave_the_world_untouched() {
    let mut simulation = Simulation::new();

    for _ in 0..50 {
        simulation.advance(TENTH, SimulationInput::click(Vec2::new(20.0, 20.0)));
    }

    assert_eq!(query::tick_index(simulation.world()), 0);
    assert!(query::enemy_view(simulation.world()).is_empty());
    assert!(query::tower_view(simulation.world()).is_empty());
}

#[test]
fn basic_enemy_spawns_after_two_and_a_half_seconds_and_walks_the_path() {
    let mut simulation = started(Rules::default());
    let start = query::path(simulation.world()).points()[0];
    let second = query::path(simulation.world()).points()[1];

    for _ in 0..24 {
        simulation.advance(TENTH, SimulationInput::idle());
    }
    assert!(query::enemy_view(simulation.world()).is_empty());

    simulation.advance(TENTH, SimulationInput::idle());
    let spawned: Vec<_> = simulation
        .last_events()
        .iter()
        .filter_map(|event| match event {
            Event::EnemySpawned {
                enemy,
                kind,
                position,
            } => Some((*enemy, *kind, *position)),
            _ => None,
        })
        .collect();
    assert_eq!(spawned.len(), 1);
    let (enemy, kind, position) = spawned[0];
    assert_eq!(kind, EnemyKind::Basic);
    assert_eq!(position, start);

    let snapshot = query::enemy(simulation.world(), enemy).expect("enemy alive");
    assert_eq!(snapshot.health, Health::new(3));
    assert_eq!(snapshot.speed, 60.0);
    assert_eq!(simulation.spawn_timer(EnemyKind::Basic), Duration::ZERO);

    let arrived = run_until(&mut simulation, TENTH, 200, |simulation| {
        query::enemy(simulation.world(), enemy).is_some_and(|snapshot| snapshot.path_index >= 2)
    });
    assert!(arrived, "enemy should move past the second waypoint");
    let snapshot = query::enemy(simulation.world(), enemy).expect("enemy alive");
    assert!(snapshot.position.distance(second) < 2.0);
}

#[test]
fn path_index_never_decreases() {
    let mut simulation = started(Rules::default());
    let mut seen: HashMap<EnemyId, usize> = HashMap::new();

    for _ in 0..2400 {
        simulation.advance(sixtieth(), SimulationInput::idle());
        for enemy in query::enemy_view(simulation.world()).iter() {
            let previous = seen.insert(enemy.id, enemy.path_index).unwrap_or(1);
            assert!(
                enemy.path_index >= previous,
                "path index of {:?} decreased",
                enemy.id
            );
        }
    }
    assert!(!seen.is_empty());
}

#[test]
fn purchase_succeeds_only_on_affordable_buildable_tiles() {
    let mut simulation = started(Rules::default());

    simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(300.0, 60.0)));
    assert!(query::tower_view(simulation.world()).is_empty());
    assert_eq!(query::coins(simulation.world()), Coins::new(200));

    simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(300.0, 300.0)));
    let towers = query::tower_view(simulation.world()).into_vec();
    assert_eq!(towers.len(), 1);
    assert_eq!(towers[0].position, Vec2::new(300.0, 300.0));
    assert_eq!(query::coins(simulation.world()), Coins::new(150));

    simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(310.0, 290.0)));
    assert_eq!(query::tower_view(simulation.world()).len(), 1);
    assert_eq!(query::coins(simulation.world()), Coins::new(150));

    for x in [20.0, 60.0, 100.0] {
        simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(x, 300.0)));
    }
    assert_eq!(query::coins(simulation.world()), Coins::new(0));
    assert_eq!(query::tower_view(simulation.world()).len(), 4);

    simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(140.0, 300.0)));
    assert_eq!(query::tower_view(simulation.world()).len(), 4);
    assert_eq!(query::coins(simulation.world()), Coins::new(0));
}

#[test]
fn placement_preview_reports_tile_state() {
    let mut simulation = started(Rules::default());

    let road = simulation
        .placement_preview(Vec2::new(45.0, 45.0))
        .expect("tile on map");
    assert!(!road.placeable);
    assert!(road.affordable);

    simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(20.0, 20.0)));
    let occupied = simulation
        .placement_preview(Vec2::new(20.0, 20.0))
        .expect("tile on map");
    assert!(!occupied.accepts());
    assert!(simulation.placement_preview(Vec2::new(-5.0, 20.0)).is_none());
}

#[test]
fn towers_kill_enemies_and_earn_exactly_the_reward() {
    let mut simulation = started(Rules::default());
    for x in [100.0, 180.0, 260.0, 340.0] {
        simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(x, 140.0)));
    }
    assert_eq!(query::coins(simulation.world()), Coins::new(0));

    let mut defeated = false;
    for _ in 0..1200 {
        let before = query::coins(simulation.world());
        simulation.advance(sixtieth(), SimulationInput::idle());
        let kills = simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::EnemyDefeated { .. }))
            .count();
        if kills > 0 {
            let expected = (0..kills).fold(before, |coins, _| coins.earn(Coins::new(20)));
            assert_eq!(query::coins(simulation.world()), expected);
            defeated = true;
            break;
        }
    }
    assert!(defeated, "towers along the first road should destroy an enemy");
}

#[test]
fn towers_fire_at_most_once_per_interval() {
    let mut simulation = started(Rules::default());
    simulation.advance(TENTH, SimulationInput::click(Vec2::new(100.0, 140.0)));

    let mut shots = 0;
    for _ in 0..40 {
        simulation.advance(TENTH, SimulationInput::idle());
        shots += simulation
            .last_events()
            .iter()
            .filter(|event| matches!(event, Event::ProjectileFired { .. }))
            .count();
    }

    assert!(shots >= 1, "tower should fire once an enemy comes into range");
    assert!(shots <= 4, "tower fired {shots} times in four seconds");
}

#[test]
fn paused_session_freezes_time_and_purchases() {
    let mut simulation = started(Rules::default());
    for _ in 0..30 {
        simulation.advance(TENTH, SimulationInput::idle());
    }
    let enemies_before = query::enemy_view(simulation.world()).into_vec();

    simulation.advance(TENTH, escape());
    assert!(simulation.flow().is_paused());
    for _ in 0..30 {
        simulation.advance(TENTH, SimulationInput::click(Vec2::new(20.0, 20.0)));
    }

    assert_eq!(query::enemy_view(simulation.world()).into_vec(), enemies_before);
    assert!(query::tower_view(simulation.world()).is_empty());
    assert_eq!(query::coins(simulation.world()), Coins::new(200));

    simulation.advance(TENTH, escape());
    assert!(!simulation.flow().is_paused());
    assert_ne!(query::enemy_view(simulation.world()).into_vec(), enemies_before);
}

#[test]
fn leak_that_depletes_hit_points_ends_the_session() {
    let mut rules = Rules::default();
    rules.economy.starting_hit_points = 20;
    let mut simulation = started(rules);

    let lost = run_until(&mut simulation, sixtieth(), 60 * 60, |simulation| {
        simulation.flow().state() == GameState::GameOver
    });

    assert!(lost, "a single leak should end the session");
    assert!(simulation
        .last_events()
        .iter()
        .any(|event| matches!(event, Event::EnemyLeaked { .. })));
    assert_eq!(query::hit_points(simulation.world()), HitPoints::new(0));
    assert_eq!(
        simulation.flow().game_over_selection(),
        GameOverOption::PlayAgain
    );
}

#[test]
fn play_again_resets_everything() {
    let mut rules = Rules::default();
    rules.economy.starting_hit_points = 20;
    let mut simulation = started(rules);
    simulation.advance(sixtieth(), SimulationInput::click(Vec2::new(500.0, 300.0)));
    let lost = run_until(&mut simulation, sixtieth(), 60 * 60, |simulation| {
        simulation.flow().state() == GameState::GameOver
    });
    assert!(lost);

    simulation.advance(sixtieth(), enter());

    let world = simulation.world();
    assert_eq!(simulation.flow().state(), GameState::Playing);
    assert!(!simulation.flow().is_paused());
    assert_eq!(query::coins(world), Coins::new(200));
    assert_eq!(query::hit_points(world), HitPoints::new(20));
    assert!(query::enemy_view(world).is_empty());
    assert!(query::tower_view(world).is_empty());
    assert!(query::projectiles(world).is_empty());
    assert_eq!(simulation.spawn_timer(EnemyKind::Basic), Duration::ZERO);
    assert_eq!(simulation.spawn_timer(EnemyKind::Shooter), Duration::ZERO);
}
