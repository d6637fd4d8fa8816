#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Medieval Protect engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! describing what changed. Systems read immutable snapshots and respond
//! exclusively with new command batches.

mod rules;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use rules::{EconomyRules, EnemyRules, ProjectileRules, Rules, RulesError, TowerRules};

/// Title shown by the window that hosts the game.
pub const WINDOW_TITLE: &str = "Tower Defense";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Clears every entity and restores the starting economy.
    ResetSession,
    /// Advances enemies along the path and cools towers down by `dt`.
    Tick {
        /// Duration of simulated time that elapsed since the previous frame.
        dt: Duration,
    },
    /// Requests that a new enemy enter the path at its first waypoint.
    SpawnEnemy {
        /// Variant of enemy to create.
        kind: EnemyKind,
    },
    /// Requests the purchase of a tower on the tile containing `position`.
    PlaceTower {
        /// Screen position, in world units, that the player clicked.
        position: Vec2,
    },
    /// Requests that a tower launch a projectile at the provided enemy.
    FireProjectile {
        /// Tower firing the projectile.
        tower: TowerId,
        /// Enemy the projectile is aimed at.
        target: EnemyId,
    },
    /// Moves projectiles by `dt` and resolves their collisions.
    AdvanceProjectiles {
        /// Duration of simulated time the projectiles travel for.
        dt: Duration,
    },
    /// Removes enemies that walked past the final waypoint and charges the player.
    ResolveLeaks,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that the session returned to its starting state.
    SessionReset,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that an enemy entered the path.
    EnemySpawned {
        /// Identifier assigned to the new enemy.
        enemy: EnemyId,
        /// Variant of the new enemy.
        kind: EnemyKind,
        /// Position the enemy occupies after spawning.
        position: Vec2,
    },
    /// Reports that an enemy arrived at a waypoint and now heads for the next one.
    EnemyReachedWaypoint {
        /// Enemy that arrived.
        enemy: EnemyId,
        /// Index of the waypoint that was reached.
        waypoint: usize,
    },
    /// Confirms that a tower was purchased and placed.
    TowerPlaced {
        /// Identifier assigned to the tower.
        tower: TowerId,
        /// Tile the tower occupies.
        tile: TileCoord,
        /// Price deducted from the player's coins.
        cost: Coins,
    },
    /// Reports that a tower purchase was refused.
    TowerPlacementRejected {
        /// Position provided in the purchase request.
        position: Vec2,
        /// Specific reason the purchase failed.
        reason: PlacementError,
    },
    /// Confirms that a tower launched a projectile.
    ProjectileFired {
        /// Identifier assigned to the projectile.
        projectile: ProjectileId,
        /// Tower that fired.
        tower: TowerId,
        /// Enemy the projectile was aimed at.
        target: EnemyId,
    },
    /// Reports that a projectile struck an enemy.
    EnemyDamaged {
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Projectile consumed by the hit.
        projectile: ProjectileId,
        /// Health the enemy has left after the hit.
        health: Health,
    },
    /// Reports that an enemy was destroyed and the reward credited.
    EnemyDefeated {
        /// Enemy that was destroyed.
        enemy: EnemyId,
        /// Coins credited to the player.
        reward: Coins,
    },
    /// Reports that a projectile left the screen without hitting anything.
    ProjectileExpired {
        /// Projectile that was discarded.
        projectile: ProjectileId,
    },
    /// Reports that an enemy reached the end of the path.
    EnemyLeaked {
        /// Enemy that escaped.
        enemy: EnemyId,
        /// Hit points subtracted from the player.
        penalty: i32,
    },
}

/// Variants of enemy that walk the path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast, fragile enemy released on the short spawn timer.
    Basic,
    /// Slower, sturdier enemy released on the long spawn timer.
    Shooter,
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TowerId(u32);

impl TowerId {
    /// Creates a new tower identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the tower identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProjectileId(u32);

impl ProjectileId {
    /// Creates a new projectile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the projectile identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single map tile expressed as column and row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    column: u32,
    row: u32,
}

impl TileCoord {
    /// Creates a new tile coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the tile.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the tile.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Remaining health of an enemy or tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Health(u32);

impl Health {
    /// Creates a new health value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric health value.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Returns the health left after absorbing `amount` damage, stopping at zero.
    #[must_use]
    pub const fn damaged(self, amount: u32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 == 0
    }
}

/// Currency the player spends on towers and earns from kills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Coins(u32);

impl Coins {
    /// Creates a new coin amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric coin amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Subtracts `price`, returning `None` when the balance cannot cover it.
    #[must_use]
    pub const fn checked_spend(self, price: Coins) -> Option<Self> {
        match self.0.checked_sub(price.0) {
            Some(remaining) => Some(Self(remaining)),
            None => None,
        }
    }

    /// Adds `reward` to the balance, saturating at the numeric limit.
    #[must_use]
    pub const fn earn(self, reward: Coins) -> Self {
        Self(self.0.saturating_add(reward.0))
    }
}

/// Hit points protecting the player. May drop below zero after a leak.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitPoints(i32);

impl HitPoints {
    /// Creates a new hit point value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric hit point value.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }

    /// Returns the hit points left after losing `amount`.
    #[must_use]
    pub const fn lose(self, amount: i32) -> Self {
        Self(self.0.saturating_sub(amount))
    }

    /// Reports whether the player has been defeated.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.0 <= 0
    }
}

/// Reasons a tower purchase may be refused by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The clicked position lies outside the tile map.
    #[error("position lies outside the map")]
    OutOfBounds,
    /// The clicked tile is road or other non-buildable terrain.
    #[error("tile is not buildable terrain")]
    Unbuildable,
    /// Another tower already stands on the clicked tile.
    #[error("tile already holds a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("not enough coins to buy a tower")]
    InsufficientCoins,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Variant of the enemy.
    pub kind: EnemyKind,
    /// Current position in world units.
    pub position: Vec2,
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Remaining health.
    pub health: Health,
    /// Index of the waypoint the enemy is walking toward.
    pub path_index: usize,
    /// Reserved shooter cooldown; no current logic reads it.
    pub shoot_cooldown: Duration,
}

/// Read-only snapshot describing all enemies on the path.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    ///
    /// Snapshots are ordered by identifier, which matches spawn order.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single tower's state used for queries.
#[derive(Clone, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Identifier allocated to the tower by the world.
    pub id: TowerId,
    /// Tile the tower occupies.
    pub tile: TileCoord,
    /// Centre of the tower's tile in world units.
    pub position: Vec2,
    /// Targeting radius in world units.
    pub range: f32,
    /// Time left before the tower may fire again.
    pub ready_in: Duration,
    /// Cooldown applied after each shot.
    pub fire_interval: Duration,
    /// Cosmetic tower health; never decremented.
    pub health: Health,
}

/// Read-only snapshot describing all placed towers.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured tower snapshots in placement order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Number of towers captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no towers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<TowerSnapshot> {
        self.snapshots
    }
}

/// Immutable representation of a single projectile in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Identifier allocated to the projectile.
    pub id: ProjectileId,
    /// Current position in world units.
    pub position: Vec2,
    /// Unit direction of travel.
    pub velocity: Vec2,
    /// Travel speed in world units per second.
    pub speed: f32,
}

/// Steps `current` toward `target` by at most `max_distance`.
///
/// Snaps onto `target` when it lies within reach so that callers never
/// overshoot and oscillate around a waypoint.
#[must_use]
pub fn move_towards(current: Vec2, target: Vec2, max_distance: f32) -> Vec2 {
    let delta = target - current;
    let distance = delta.length();
    if distance <= max_distance || distance == 0.0 {
        return target;
    }

    current + delta / distance * max_distance
}

/// Unit vector pointing from `from` to `to`, or zero when the points coincide.
#[must_use]
pub fn direction_towards(from: Vec2, to: Vec2) -> Vec2 {
    (to - from).normalize_or_zero()
}
