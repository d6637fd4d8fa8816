#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Medieval Protect adapters.

use anyhow::Result as AnyResult;
use glam::Vec2;
use medieval_protect_core::EnemyKind;
use std::time::Duration;
use thiserror::Error;

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

    /// Returns the same color with the provided alpha channel.
    #[must_use]
    pub const fn with_alpha(self, alpha: f32) -> Self {
        Self { alpha, ..self }
    }
}

/// Input snapshot gathered by adapters before updating the scene.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct FrameInput {
    /// Up arrow pressed on this frame.
    pub navigate_up: bool,
    /// Down arrow pressed on this frame.
    pub navigate_down: bool,
    /// Enter pressed on this frame.
    pub confirm: bool,
    /// Escape pressed on this frame.
    pub escape: bool,
    /// World position of a left click reported on this frame.
    pub click: Option<Vec2>,
    /// Cursor position in world units while it hovers the play area.
    pub cursor_world_space: Option<Vec2>,
}

/// Terrain drawn for a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerrainPresentation {
    /// Buildable grass.
    Grass,
    /// Road enemies walk along.
    Road,
}

/// Describes the tile layout of the play area.
#[derive(Clone, Debug, PartialEq)]
pub struct TileMapPresentation {
    /// Number of tile columns.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
    /// Side length of a tile in world units.
    pub tile_length: f32,
    tiles: Vec<TerrainPresentation>,
}

impl TileMapPresentation {
    /// Creates a tile map descriptor from row-major terrain.
    pub fn new(
        columns: u32,
        rows: u32,
        tile_length: f32,
        tiles: Vec<TerrainPresentation>,
    ) -> Result<Self, RenderingError> {
        if !(tile_length.is_finite() && tile_length > 0.0) {
            return Err(RenderingError::InvalidTileLength { tile_length });
        }

        let expected = u64::from(columns) * u64::from(rows);
        if tiles.len() as u64 != expected {
            return Err(RenderingError::TileCountMismatch {
                expected,
                received: tiles.len(),
            });
        }

        Ok(Self {
            columns,
            rows,
            tile_length,
            tiles,
        })
    }

    /// Total width of the map in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.columns as f32 * self.tile_length
    }

    /// Total height of the map in world units.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.rows as f32 * self.tile_length
    }

    /// Iterator over `(column, row, terrain)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, u32, TerrainPresentation)> + '_ {
        let columns = self.columns.max(1);
        self.tiles.iter().enumerate().map(move |(index, terrain)| {
            let index = index as u32;
            (index % columns, index / columns, *terrain)
        })
    }

    /// Top-left corner of the provided tile in world units.
    #[must_use]
    pub fn tile_origin(&self, column: u32, row: u32) -> Vec2 {
        Vec2::new(column as f32, row as f32) * self.tile_length
    }
}

/// Tower drawn within the play area.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneTower {
    /// Centre of the tower in world units.
    pub position: Vec2,
    /// Targeting radius drawn around the tower.
    pub range: f32,
    /// Health label shown above the tower.
    pub health: u32,
}

impl SceneTower {
    /// Creates a new tower descriptor.
    #[must_use]
    pub const fn new(position: Vec2, range: f32, health: u32) -> Self {
        Self {
            position,
            range,
            health,
        }
    }
}

/// Enemy drawn along the path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneEnemy {
    /// Centre of the enemy in world units.
    pub position: Vec2,
    /// Variant, which selects the body color.
    pub kind: EnemyKind,
    /// Health label shown above the enemy.
    pub health: u32,
}

impl SceneEnemy {
    /// Creates a new enemy descriptor.
    #[must_use]
    pub const fn new(position: Vec2, kind: EnemyKind, health: u32) -> Self {
        Self {
            position,
            kind,
            health,
        }
    }
}

/// Projectile drawn in flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneProjectile {
    /// Centre of the projectile in world units.
    pub position: Vec2,
}

/// Tile highlighted beneath the cursor while playing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementHighlight {
    /// Column of the hovered tile.
    pub column: u32,
    /// Row of the hovered tile.
    pub row: u32,
    /// Whether a click would buy a tower here.
    pub accepted: bool,
}

/// Balances shown in the corner of the play area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HudPresentation {
    /// Coins available to spend.
    pub coins: u32,
    /// Remaining player hit points; may be negative.
    pub hit_points: i32,
}

/// Vertical menu state; the backend owns the entry labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MenuPresentation {
    /// Index of the highlighted entry in display order.
    pub selected: usize,
}

impl MenuPresentation {
    /// Creates a new menu descriptor.
    #[must_use]
    pub const fn new(selected: usize) -> Self {
        Self { selected }
    }

    /// Reports whether the entry at `index` is highlighted.
    #[must_use]
    pub const fn is_selected(&self, index: usize) -> bool {
        self.selected == index
    }
}

/// Screen currently shown by the game.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScreenPresentation {
    /// Title screen with its menu.
    Menu(MenuPresentation),
    /// Placeholder options screen.
    Options,
    /// Play area, optionally overlaid with the pause banner.
    Playing {
        /// Whether the pause banner is shown.
        paused: bool,
    },
    /// Game-over screen with its menu.
    GameOver(MenuPresentation),
}

/// Scene description combining the map, its inhabitants and the active screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Tile map that composes the play area.
    pub tile_map: TileMapPresentation,
    /// Waypoints of the enemy path in walking order.
    pub path: Vec<Vec2>,
    /// Towers placed by the player.
    pub towers: Vec<SceneTower>,
    /// Enemies walking the path.
    pub enemies: Vec<SceneEnemy>,
    /// Projectiles in flight.
    pub projectiles: Vec<SceneProjectile>,
    /// Coin and hit point balances.
    pub hud: HudPresentation,
    /// Tile under the cursor, when the play area is hovered.
    pub placement_highlight: Option<PlacementHighlight>,
    /// Screen that should be drawn.
    pub screen: ScreenPresentation,
}

impl Scene {
    /// Creates a scene without inhabitants showing `screen`.
    #[must_use]
    pub fn new(tile_map: TileMapPresentation, path: Vec<Vec2>, screen: ScreenPresentation) -> Self {
        Self {
            tile_map,
            path,
            towers: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            hud: HudPresentation::default(),
            placement_highlight: None,
            screen,
        }
    }

    /// Removes every tower, enemy and projectile from the scene.
    pub fn clear_inhabitants(&mut self) {
        self.towers.clear();
        self.enemies.clear();
        self.projectiles.clear();
        self.placement_highlight = None;
    }
}

/// Whether the backend should keep presenting frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Present the updated scene and continue.
    Continue,
    /// Stop the run loop after this frame.
    Exit,
}

/// Presentation descriptor consumed by rendering backends.
#[derive(Clone, Debug, PartialEq)]
pub struct Presentation {
    /// Title used by the created window.
    pub window_title: String,
    /// Solid color used to clear each frame.
    pub clear_color: Color,
    /// Scene content that should be displayed.
    pub scene: Scene,
}

impl Presentation {
    /// Constructs a new presentation descriptor.
    #[must_use]
    pub fn new<T>(window_title: T, clear_color: Color, scene: Scene) -> Self
    where
        T: Into<String>,
    {
        Self {
            window_title: window_title.into(),
            clear_color,
            scene,
        }
    }
}

/// Rendering backend capable of presenting Medieval Protect scenes.
pub trait RenderingBackend {
    /// Runs the rendering backend until it is requested to exit.
    ///
    /// The provided `update_scene` closure receives the frame delta and the
    /// per-frame input captured by the adapter, mutates the scene before it is
    /// rendered, and reports whether the loop should continue.
    fn run<F>(self, presentation: Presentation, update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static;
}

/// Errors that can occur when constructing rendering descriptors.
#[derive(Debug, PartialEq, Error)]
pub enum RenderingError {
    /// Tiles must have a positive, finite size.
    #[error("tile_length must be a positive number (received {tile_length})")]
    InvalidTileLength {
        /// Provided tile length that failed validation.
        tile_length: f32,
    },
    /// The terrain list does not cover the grid exactly.
    #[error("expected {expected} tiles but received {received}")]
    TileCountMismatch {
        /// Number of tiles implied by the grid dimensions.
        expected: u64,
        /// Number of tiles supplied.
        received: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grass_map(columns: u32, rows: u32) -> TileMapPresentation {
        TileMapPresentation::new(
            columns,
            rows,
            40.0,
            vec![TerrainPresentation::Grass; (columns * rows) as usize],
        )
        .expect("valid map")
    }

    #[test]
    fn tile_map_rejects_mismatched_tile_count() {
        let error = TileMapPresentation::new(2, 2, 40.0, vec![TerrainPresentation::Road; 3])
            .expect_err("three tiles cannot cover a two by two grid");

        assert_eq!(
            error,
            RenderingError::TileCountMismatch {
                expected: 4,
                received: 3,
            }
        );
    }

    #[test]
    fn tile_map_rejects_zero_tile_length() {
        let error = TileMapPresentation::new(1, 1, 0.0, vec![TerrainPresentation::Grass])
            .expect_err("zero tile length must be rejected");

        assert!(matches!(error, RenderingError::InvalidTileLength { .. }));
    }

    #[test]
    fn tile_map_iterates_in_row_major_order() {
        let map = TileMapPresentation::new(
            2,
            2,
            40.0,
            vec![
                TerrainPresentation::Grass,
                TerrainPresentation::Road,
                TerrainPresentation::Road,
                TerrainPresentation::Grass,
            ],
        )
        .expect("valid map");

        let tiles: Vec<_> = map.iter().collect();
        assert_eq!(tiles[1], (1, 0, TerrainPresentation::Road));
        assert_eq!(tiles[2], (0, 1, TerrainPresentation::Road));
        assert_eq!(map.tile_origin(1, 1), Vec2::new(40.0, 40.0));
    }

    #[test]
    fn map_extent_follows_tile_count() {
        let map = grass_map(20, 15);

        assert_eq!(map.width(), 800.0);
        assert_eq!(map.height(), 600.0);
        assert_eq!(map.tile_origin(19, 14), Vec2::new(760.0, 560.0));
    }

    #[test]
    fn menu_highlights_only_the_selected_entry() {
        let menu = MenuPresentation::new(1);

        assert!(!menu.is_selected(0));
        assert!(menu.is_selected(1));
        assert!(!menu.is_selected(2));
    }

    #[test]
    fn clearing_inhabitants_keeps_map_and_screen() {
        let mut scene = Scene::new(
            grass_map(1, 1),
            vec![Vec2::ZERO],
            ScreenPresentation::Playing { paused: false },
        );
        scene.towers.push(SceneTower::new(Vec2::ZERO, 100.0, 10));
        scene
            .enemies
            .push(SceneEnemy::new(Vec2::ZERO, EnemyKind::Basic, 3));
        scene.projectiles.push(SceneProjectile {
            position: Vec2::ZERO,
        });

        scene.clear_inhabitants();

        assert!(scene.towers.is_empty());
        assert!(scene.enemies.is_empty());
        assert!(scene.projectiles.is_empty());
        assert_eq!(scene.path, vec![Vec2::ZERO]);
        assert_eq!(scene.screen, ScreenPresentation::Playing { paused: false });
    }

    #[test]
    fn with_alpha_preserves_channels() {
        let color = Color::from_rgb_u8(255, 0, 0).with_alpha(0.5);

        assert_eq!(color, Color::new(1.0, 0.0, 0.0, 0.5));
    }
}
