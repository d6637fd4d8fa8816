#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure purchase system responsible for emitting tower placement commands.

use glam::Vec2;
use medieval_protect_core::{Coins, Command, TileCoord};

/// Declarative placement preview describing a potential tower purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlacementPreview {
    /// Tile hovered by the cursor.
    pub tile: TileCoord,
    /// Indicates whether the tile accepts a tower.
    pub placeable: bool,
    /// Indicates whether the player can pay for a tower.
    pub affordable: bool,
}

impl PlacementPreview {
    /// Creates a new placement preview descriptor.
    #[must_use]
    pub const fn new(tile: TileCoord, placeable: bool, affordable: bool) -> Self {
        Self {
            tile,
            placeable,
            affordable,
        }
    }

    /// Builds a preview for `tile` by comparing the balance against the price.
    #[must_use]
    pub const fn evaluate(tile: TileCoord, placeable: bool, coins: Coins, price: Coins) -> Self {
        Self::new(tile, placeable, coins.checked_spend(price).is_some())
    }

    /// Reports whether confirming this preview would buy a tower.
    #[must_use]
    pub const fn accepts(&self) -> bool {
        self.placeable && self.affordable
    }
}

/// Input snapshot distilled from adapter-provided frame input data.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BuilderInput {
    /// Indicates whether the player clicked on this frame.
    pub confirm_action: bool,
    /// Cursor position in world units when a click was reported.
    pub cursor_position: Option<Vec2>,
}

impl BuilderInput {
    /// Creates a new input descriptor with explicit field values.
    #[must_use]
    pub const fn new(confirm_action: bool, cursor_position: Option<Vec2>) -> Self {
        Self {
            confirm_action,
            cursor_position,
        }
    }
}

/// System that translates a confirmed click and its preview into a purchase.
#[derive(Debug, Clone, Copy, Default)]
pub struct Builder;

impl Builder {
    /// Creates a new builder system instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Emits a placement command when the click lands on an accepting preview.
    pub fn handle(
        &mut self,
        input: BuilderInput,
        preview: Option<PlacementPreview>,
        out: &mut Vec<Command>,
    ) {
        if !input.confirm_action {
            return;
        }

        let Some(position) = input.cursor_position else {
            return;
        };

        if preview.is_some_and(|preview| preview.accepts()) {
            out.push(Command::PlaceTower { position });
        }
    }
}
