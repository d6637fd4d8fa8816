#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Medieval Protect.

mod map;
mod towers;

use std::time::Duration;

use glam::Vec2;
use medieval_protect_core::{
    direction_towards, move_towards, Coins, Command, EnemyId, EnemyKind, EnemySnapshot, Event,
    Health, HitPoints, PlacementError, ProjectileId, ProjectileSnapshot, Rules, TowerId,
};
use tracing::debug;

pub use map::{Terrain, TileMap, WaypointPath, MAP_COLUMNS, MAP_ROWS, TILE_LENGTH};
pub use towers::validate_placement;

use towers::{TowerRegistry, TowerState};

/// Represents the authoritative state of a single play session.
#[derive(Debug)]
pub struct World {
    rules: Rules,
    tile_map: TileMap,
    path: WaypointPath,
    enemies: Vec<Enemy>,
    towers: TowerRegistry,
    projectiles: Vec<Projectile>,
    coins: Coins,
    hit_points: HitPoints,
    next_enemy_id: EnemyId,
    next_projectile_id: ProjectileId,
    tick_index: u64,
}

impl World {
    /// Creates a new world running the stock rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a new world that runs the provided rules.
    ///
    /// Callers are expected to have validated `rules` beforehand.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let tile_map = TileMap::standard();
        let path = WaypointPath::standard(&tile_map);
        let coins = rules.economy.starting_coins();
        let hit_points = rules.economy.starting_hit_points();
        Self {
            rules,
            tile_map,
            path,
            enemies: Vec::new(),
            towers: TowerRegistry::new(),
            projectiles: Vec::new(),
            coins,
            hit_points,
            next_enemy_id: EnemyId::new(0),
            next_projectile_id: ProjectileId::new(0),
            tick_index: 0,
        }
    }

    fn reset_session(&mut self) {
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.coins = self.rules.economy.starting_coins();
        self.hit_points = self.rules.economy.starting_hit_points();
        self.next_enemy_id = EnemyId::new(0);
        self.next_projectile_id = ProjectileId::new(0);
        self.tick_index = 0;
    }

    fn allocate_enemy_id(&mut self) -> EnemyId {
        let id = self.next_enemy_id;
        self.next_enemy_id = EnemyId::new(id.get().saturating_add(1));
        id
    }

    fn allocate_projectile_id(&mut self) -> ProjectileId {
        let id = self.next_projectile_id;
        self.next_projectile_id = ProjectileId::new(id.get().saturating_add(1));
        id
    }

    fn enemy(&self, enemy_id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id == enemy_id)
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let tolerance = self.rules.waypoint_tolerance;
        for enemy in &mut self.enemies {
            let Some(target) = self.path.get(enemy.path_index) else {
                continue;
            };

            enemy.position = move_towards(enemy.position, target, enemy.speed * seconds);
            if enemy.position.distance(target) < tolerance {
                out_events.push(Event::EnemyReachedWaypoint {
                    enemy: enemy.id,
                    waypoint: enemy.path_index,
                });
                enemy.path_index += 1;
            }
        }
    }

    fn place_tower(&mut self, position: Vec2, out_events: &mut Vec<Event>) {
        let cost = self.rules.economy.tower_cost();
        let placement = self
            .coins
            .checked_spend(cost)
            .ok_or(PlacementError::InsufficientCoins)
            .and_then(|remaining| {
                validate_placement(position, &self.tile_map, self.towers.occupied_tiles())
                    .map(|tile| (tile, remaining))
            });

        match placement {
            Ok((tile, remaining)) => {
                let id = self.towers.allocate();
                self.towers.insert(TowerState {
                    id,
                    tile,
                    position: self.tile_map.tile_center(tile),
                    range: self.rules.tower.range,
                    ready_in: Duration::ZERO,
                    fire_interval: self.rules.tower.fire_interval(),
                    health: self.rules.tower.health(),
                });
                self.coins = remaining;
                debug!(
                    tower = id.get(),
                    column = tile.column(),
                    row = tile.row(),
                    coins = remaining.get(),
                    "tower placed"
                );
                out_events.push(Event::TowerPlaced {
                    tower: id,
                    tile,
                    cost,
                });
            }
            Err(reason) => {
                debug!(x = position.x, y = position.y, %reason, "tower placement rejected");
                out_events.push(Event::TowerPlacementRejected { position, reason });
            }
        }
    }

    fn fire_projectile(&mut self, tower: TowerId, target: EnemyId, out_events: &mut Vec<Event>) {
        let Some(enemy_position) = self
            .enemy(target)
            .filter(|enemy| !enemy.health.is_depleted())
            .map(|enemy| enemy.position)
        else {
            return;
        };
        let Some(state) = self.towers.get_mut(tower) else {
            return;
        };
        if !state.ready_in.is_zero() {
            return;
        }

        state.ready_in = state.fire_interval;
        let origin = state.position;
        let id = self.allocate_projectile_id();
        self.projectiles.push(Projectile {
            id,
            position: origin,
            velocity: direction_towards(origin, enemy_position),
            speed: self.rules.projectile.speed,
        });
        out_events.push(Event::ProjectileFired {
            projectile: id,
            tower,
            target,
        });
    }

    fn advance_projectiles(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let seconds = dt.as_secs_f32();
        let hit_radius = self.rules.projectile.hit_radius;
        let reward = self.rules.economy.kill_reward();
        let Self {
            projectiles,
            enemies,
            coins,
            tile_map,
            ..
        } = self;

        projectiles.retain_mut(|projectile| {
            projectile.position += projectile.velocity * projectile.speed * seconds;

            let struck = enemies.iter_mut().find(|enemy| {
                !enemy.health.is_depleted()
                    && enemy.position.distance(projectile.position) < hit_radius
            });
            if let Some(enemy) = struck {
                enemy.health = enemy.health.damaged(1);
                out_events.push(Event::EnemyDamaged {
                    enemy: enemy.id,
                    projectile: projectile.id,
                    health: enemy.health,
                });
                if enemy.health.is_depleted() {
                    *coins = coins.earn(reward);
                    debug!(enemy = enemy.id.get(), coins = coins.get(), "enemy defeated");
                    out_events.push(Event::EnemyDefeated {
                        enemy: enemy.id,
                        reward,
                    });
                }
                return false;
            }

            if !tile_map.contains(projectile.position) {
                out_events.push(Event::ProjectileExpired {
                    projectile: projectile.id,
                });
                return false;
            }

            true
        });

        enemies.retain(|enemy| !enemy.health.is_depleted());
    }

    fn resolve_leaks(&mut self, out_events: &mut Vec<Event>) {
        let penalty = self.rules.economy.leak_penalty;
        let path_len = self.path.len();
        let Self {
            enemies,
            hit_points,
            ..
        } = self;

        enemies.retain(|enemy| {
            if enemy.path_index < path_len {
                return true;
            }
            *hit_points = hit_points.lose(penalty);
            debug!(
                enemy = enemy.id.get(),
                hit_points = hit_points.get(),
                "enemy leaked"
            );
            out_events.push(Event::EnemyLeaked {
                enemy: enemy.id,
                penalty,
            });
            false
        });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ResetSession => {
            world.reset_session();
            debug!(
                coins = world.coins.get(),
                hit_points = world.hit_points.get(),
                "session reset"
            );
            out_events.push(Event::SessionReset);
        }
        Command::Tick { dt } => {
            world.tick_index = world.tick_index.saturating_add(1);
            out_events.push(Event::TimeAdvanced { dt });

            world.advance_enemies(dt, out_events);
            for tower in world.towers.iter_mut() {
                tower.ready_in = tower.ready_in.saturating_sub(dt);
            }
        }
        Command::SpawnEnemy { kind } => {
            let Some(start) = world.path.get(0) else {
                return;
            };
            let stats = world.rules.enemy(kind);
            let (speed, health) = (stats.speed, stats.health());
            let id = world.allocate_enemy_id();
            world.enemies.push(Enemy {
                id,
                kind,
                position: start,
                speed,
                health,
                path_index: 1,
                shoot_cooldown: Duration::ZERO,
            });
            debug!(enemy = id.get(), ?kind, tick = world.tick_index, "enemy spawned");
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position: start,
            });
        }
        Command::PlaceTower { position } => world.place_tower(position, out_events),
        Command::FireProjectile { tower, target } => {
            world.fire_projectile(tower, target, out_events);
        }
        Command::AdvanceProjectiles { dt } => world.advance_projectiles(dt, out_events),
        Command::ResolveLeaks => world.resolve_leaks(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use glam::Vec2;
    use medieval_protect_core::{
        Coins, EnemyId, EnemySnapshot, EnemyView, HitPoints, PlacementError, ProjectileSnapshot,
        Rules, TileCoord, TowerView,
    };

    use super::{validate_placement, TileMap, WaypointPath, World};

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Provides read-only access to the tile map.
    #[must_use]
    pub fn tile_map(world: &World) -> &TileMap {
        &world.tile_map
    }

    /// Provides read-only access to the waypoint path.
    #[must_use]
    pub fn path(world: &World) -> &WaypointPath {
        &world.path
    }

    /// Current coin balance.
    #[must_use]
    pub fn coins(world: &World) -> Coins {
        world.coins
    }

    /// Current player hit points.
    #[must_use]
    pub fn hit_points(world: &World) -> HitPoints {
        world.hit_points
    }

    /// Captures a read-only view of the enemies on the path.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(world.enemies.iter().map(|enemy| enemy.snapshot()).collect())
    }

    /// Captures a read-only view of every placed tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.iter().map(|tower| tower.snapshot()).collect())
    }

    /// Snapshots of the projectiles in flight, in firing order.
    #[must_use]
    pub fn projectiles(world: &World) -> Vec<ProjectileSnapshot> {
        world
            .projectiles
            .iter()
            .map(|projectile| projectile.snapshot())
            .collect()
    }

    /// Tile a tower would occupy at `position`, ignoring the coin balance.
    pub fn placement_at(world: &World, position: Vec2) -> Result<TileCoord, PlacementError> {
        validate_placement(position, &world.tile_map, world.towers.occupied_tiles())
    }

    /// Reports whether a tower could be built at `position`, ignoring coins.
    #[must_use]
    pub fn can_build_at(world: &World, position: Vec2) -> bool {
        placement_at(world, position).is_ok()
    }

    /// Snapshot of the enemy with the provided identifier.
    #[must_use]
    pub fn enemy(world: &World, enemy: EnemyId) -> Option<EnemySnapshot> {
        world.enemy(enemy).map(|enemy| enemy.snapshot())
    }

    /// Number of ticks applied since the session started.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }
}

#[derive(Clone, Debug)]
struct Enemy {
    id: EnemyId,
    kind: EnemyKind,
    position: Vec2,
    speed: f32,
    health: Health,
    path_index: usize,
    shoot_cooldown: Duration,
}

impl Enemy {
    fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            kind: self.kind,
            position: self.position,
            speed: self.speed,
            health: self.health,
            path_index: self.path_index,
            shoot_cooldown: self.shoot_cooldown,
        }
    }
}

#[derive(Clone, Debug)]
struct Projectile {
    id: ProjectileId,
    position: Vec2,
    velocity: Vec2,
    speed: f32,
}

impl Projectile {
    fn snapshot(&self) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id: self.id,
            position: self.position,
            velocity: self.velocity,
            speed: self.speed,
        }
    }
}
