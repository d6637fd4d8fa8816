//! Compiled-in tile map and waypoint path.

use glam::Vec2;
use medieval_protect_core::TileCoord;

/// Side length of a single square tile expressed in world units.
pub const TILE_LENGTH: f32 = 40.0;

/// Number of tile columns in the stock map.
pub const MAP_COLUMNS: u32 = 20;

/// Number of tile rows in the stock map.
pub const MAP_ROWS: u32 = 15;

/// Tile codes of the stock map: `0` is buildable grass, `1` is road.
const MAP_LAYOUT: [[u8; MAP_COLUMNS as usize]; MAP_ROWS as usize] = [
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0],
    [0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
];

/// Tiles whose centres form the waypoint path, in walking order.
const PATH_TILES: [(u32, u32); 5] = [(1, 1), (18, 1), (18, 13), (1, 13), (1, 14)];

/// Terrain occupying a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Terrain {
    /// Open ground where towers may be built.
    Buildable,
    /// Road or other terrain that rejects towers.
    Road,
}

impl Terrain {
    const fn from_code(code: u8) -> Self {
        if code == 0 {
            Self::Buildable
        } else {
            Self::Road
        }
    }

    /// Reports whether a tower may stand on this terrain.
    #[must_use]
    pub const fn is_buildable(self) -> bool {
        matches!(self, Self::Buildable)
    }
}

/// Immutable grid of terrain tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    tile_length: f32,
    tiles: Vec<Terrain>,
}

impl TileMap {
    /// Builds the stock map shipped with the game.
    #[must_use]
    pub fn standard() -> Self {
        let tiles = MAP_LAYOUT
            .iter()
            .flat_map(|row| row.iter().copied().map(Terrain::from_code))
            .collect();
        Self {
            columns: MAP_COLUMNS,
            rows: MAP_ROWS,
            tile_length: TILE_LENGTH,
            tiles,
        }
    }

    /// Number of columns contained in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Side length of a single square tile expressed in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Total width of the map measured in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the map measured in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Terrain stored at `tile`, or `None` outside the map.
    #[must_use]
    pub fn terrain(&self, tile: TileCoord) -> Option<Terrain> {
        self.index(tile)
            .and_then(|index| self.tiles.get(index).copied())
    }

    /// Converts a world position into the tile that contains it.
    ///
    /// Positions left of or above the map are rejected rather than truncated
    /// onto the first row or column.
    #[must_use]
    pub fn tile_at(&self, position: Vec2) -> Option<TileCoord> {
        if self.tile_length <= 0.0 {
            return None;
        }

        let column = (position.x / self.tile_length).floor();
        let row = (position.y / self.tile_length).floor();
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        if column >= self.columns as f32 || row >= self.rows as f32 {
            return None;
        }

        Some(TileCoord::new(column as u32, row as u32))
    }

    /// Centre of `tile` in world units.
    #[must_use]
    pub fn tile_center(&self, tile: TileCoord) -> Vec2 {
        let half = self.tile_length / 2.0;
        Vec2::new(
            tile.column() as f32 * self.tile_length + half,
            tile.row() as f32 * self.tile_length + half,
        )
    }

    /// Reports whether `position` lies on screen, edges included.
    #[must_use]
    pub fn contains(&self, position: Vec2) -> bool {
        position.x >= 0.0
            && position.x <= self.width()
            && position.y >= 0.0
            && position.y <= self.height()
    }

    /// Iterator over every tile and its terrain in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCoord, Terrain)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, terrain)| {
            let index = index as u32;
            (TileCoord::new(index % columns, index / columns), *terrain)
        })
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if tile.column() < self.columns && tile.row() < self.rows {
            let row = usize::try_from(tile.row()).ok()?;
            let column = usize::try_from(tile.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Ordered polyline every enemy walks along.
#[derive(Clone, Debug, PartialEq)]
pub struct WaypointPath {
    points: Vec<Vec2>,
}

impl WaypointPath {
    /// Builds the stock path through the centres of the road tiles.
    #[must_use]
    pub fn standard(map: &TileMap) -> Self {
        let points = PATH_TILES
            .iter()
            .map(|&(column, row)| map.tile_center(TileCoord::new(column, row)))
            .collect();
        Self { points }
    }

    /// Waypoints in walking order.
    #[must_use]
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Waypoint at `index`, if any.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Vec2> {
        self.points.get(index).copied()
    }

    /// Number of waypoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Reports whether the path has no waypoints.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_map_spans_eight_hundred_by_six_hundred() {
        let map = TileMap::standard();

        assert_eq!(map.columns(), 20);
        assert_eq!(map.rows(), 15);
        assert_eq!(map.width(), 800.0);
        assert_eq!(map.height(), 600.0);
        assert_eq!(map.iter().count(), 300);
    }

    #[test]
    fn terrain_follows_layout_codes() {
        let map = TileMap::standard();

        assert_eq!(map.terrain(TileCoord::new(0, 0)), Some(Terrain::Buildable));
        assert_eq!(map.terrain(TileCoord::new(0, 1)), Some(Terrain::Road));
        assert_eq!(map.terrain(TileCoord::new(19, 1)), Some(Terrain::Buildable));
        assert_eq!(map.terrain(TileCoord::new(2, 14)), Some(Terrain::Road));
        assert_eq!(map.terrain(TileCoord::new(20, 0)), None);
        assert_eq!(map.terrain(TileCoord::new(0, 15)), None);
    }

    #[test]
    fn tile_at_uses_floor_division() {
        let map = TileMap::standard();

        assert_eq!(map.tile_at(Vec2::new(0.0, 0.0)), Some(TileCoord::new(0, 0)));
        assert_eq!(map.tile_at(Vec2::new(39.9, 40.0)), Some(TileCoord::new(0, 1)));
        assert_eq!(
            map.tile_at(Vec2::new(799.0, 599.0)),
            Some(TileCoord::new(19, 14))
        );
        assert_eq!(map.tile_at(Vec2::new(800.0, 10.0)), None);
        assert_eq!(map.tile_at(Vec2::new(-5.0, 10.0)), None);
        assert_eq!(map.tile_at(Vec2::new(f32::NAN, 10.0)), None);
    }

    #[test]
    fn standard_path_walks_through_tile_centres() {
        let map = TileMap::standard();
        let path = WaypointPath::standard(&map);

        assert_eq!(
            path.points(),
            &[
                Vec2::new(60.0, 60.0),
                Vec2::new(740.0, 60.0),
                Vec2::new(740.0, 540.0),
                Vec2::new(60.0, 540.0),
                Vec2::new(60.0, 580.0),
            ]
        );
        for point in path.points() {
            let tile = map.tile_at(*point).expect("waypoint lies on the map");
            assert_eq!(map.terrain(tile), Some(Terrain::Road));
        }
    }

    #[test]
    fn contains_includes_screen_edges() {
        let map = TileMap::standard();

        assert!(map.contains(Vec2::new(0.0, 0.0)));
        assert!(map.contains(Vec2::new(800.0, 600.0)));
        assert!(!map.contains(Vec2::new(800.1, 300.0)));
        assert!(!map.contains(Vec2::new(300.0, -0.1)));
    }
}
