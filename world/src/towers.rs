//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use medieval_protect_core::{
    Health, PlacementError, TileCoord, TowerId, TowerSnapshot,
};

use crate::map::TileMap;

/// State of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Identifier allocated by the world for the tower.
    pub(crate) id: TowerId,
    /// Tile occupied by the tower.
    pub(crate) tile: TileCoord,
    /// Centre of the occupied tile.
    pub(crate) position: Vec2,
    /// Targeting radius in world units.
    pub(crate) range: f32,
    /// Time left before the tower may fire again.
    pub(crate) ready_in: Duration,
    /// Cooldown applied after each shot.
    pub(crate) fire_interval: Duration,
    /// Cosmetic health.
    pub(crate) health: Health,
}

impl TowerState {
    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            tile: self.tile,
            position: self.position,
            range: self.range,
            ready_in: self.ready_in,
            fire_interval: self.fire_interval,
            health: self.health,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, TowerState>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Removes every tower and restarts identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.next_tower_id = TowerId::new(0);
    }

    /// Allocates the identifier the next inserted tower will receive.
    pub(crate) fn allocate(&mut self) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        id
    }

    pub(crate) fn insert(&mut self, state: TowerState) {
        let _ = self.entries.insert(state.id, state);
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(&id)
    }

    /// Towers in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &TowerState> {
        self.entries.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut TowerState> {
        self.entries.values_mut()
    }

    pub(crate) fn occupied_tiles(&self) -> impl Iterator<Item = TileCoord> + '_ {
        self.entries.values().map(|tower| tower.tile)
    }
}

/// Decides whether a tower may be built at `position`.
///
/// The position is converted to a tile, which must exist on `map`, carry
/// buildable terrain and not appear in `occupied`. Coins are not considered.
pub fn validate_placement(
    position: Vec2,
    map: &TileMap,
    occupied: impl IntoIterator<Item = TileCoord>,
) -> Result<TileCoord, PlacementError> {
    let tile = map.tile_at(position).ok_or(PlacementError::OutOfBounds)?;
    let terrain = map.terrain(tile).ok_or(PlacementError::OutOfBounds)?;
    if !terrain.is_buildable() {
        return Err(PlacementError::Unbuildable);
    }
    if occupied.into_iter().any(|existing| existing == tile) {
        return Err(PlacementError::Occupied);
    }
    Ok(tile)
}
