//! Text screens and overlays drawn on top of the playfield.
//!
//! Every call to macroquad's text API lives here so layout rules for menus and
//! the HUD stay in one place. Positions follow the top-left convention used by
//! the rest of the renderer; [`draw_label`] converts them to macroquad's
//! baseline-anchored text.

use macroquad::{
    color::{Color, DARKGRAY, DARKGREEN, GOLD, GRAY, RED, YELLOW},
    text::{draw_text, measure_text},
};
use medieval_protect_rendering::{HudPresentation, MenuPresentation};

const TITLE_MENU_LABELS: [&str; 3] = ["Play", "Options", "Exit"];
const GAME_OVER_MENU_LABELS: [&str; 2] = ["Play again", "Back to menu"];

const TITLE_FONT_SIZE: u16 = 40;
const GAME_OVER_FONT_SIZE: u16 = 50;
const MENU_ENTRY_FONT_SIZE: u16 = 30;
const BODY_FONT_SIZE: u16 = 20;
const BANNER_FONT_SIZE: u16 = 40;

const MENU_TITLE_Y: f32 = 80.0;
const MENU_FIRST_ENTRY_Y: f32 = 200.0;
const GAME_OVER_TITLE_Y: f32 = 100.0;
const GAME_OVER_FIRST_ENTRY_Y: f32 = 250.0;
const MENU_ENTRY_SPACING: f32 = 50.0;

/// Colours used for the entries of a vertical menu.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct MenuPalette {
    pub(crate) selected: Color,
    pub(crate) idle: Color,
}

impl MenuPalette {
    /// Palette of the title menu.
    pub(crate) const fn title() -> Self {
        Self {
            selected: RED,
            idle: DARKGRAY,
        }
    }

    /// Palette of the game-over menu.
    pub(crate) const fn game_over() -> Self {
        Self {
            selected: YELLOW,
            idle: GRAY,
        }
    }

    pub(crate) fn pick(self, selected: bool) -> Color {
        if selected {
            self.selected
        } else {
            self.idle
        }
    }
}

/// Pairs each label with whether it is highlighted by `menu`.
pub(crate) fn menu_entries<'a>(
    labels: &'a [&'a str],
    menu: &'a MenuPresentation,
) -> impl Iterator<Item = (&'a str, bool)> + 'a {
    labels
        .iter()
        .enumerate()
        .map(move |(index, label)| (*label, menu.is_selected(index)))
}

/// Vertical position of the `index`-th menu entry.
pub(crate) fn menu_entry_y(first_entry_y: f32, index: usize) -> f32 {
    first_entry_y + index as f32 * MENU_ENTRY_SPACING
}

/// Left edge that centres a label of `label_width` on a screen of `screen_width`.
pub(crate) fn centered_x(screen_width: f32, label_width: f32) -> f32 {
    (screen_width - label_width) * 0.5
}

pub(crate) fn draw_title_menu(menu: &MenuPresentation, screen_width: f32) {
    draw_centered_label("Tower Defense", MENU_TITLE_Y, TITLE_FONT_SIZE, DARKGREEN, screen_width);
    draw_menu_entries(
        &TITLE_MENU_LABELS,
        menu,
        MENU_FIRST_ENTRY_Y,
        MenuPalette::title(),
        screen_width,
    );
}

pub(crate) fn draw_options_screen(screen_width: f32) {
    draw_centered_label("Options", MENU_TITLE_Y, TITLE_FONT_SIZE, DARKGREEN, screen_width);
    draw_label(
        "Options can be added here.",
        50.0,
        200.0,
        BODY_FONT_SIZE,
        DARKGRAY,
    );
    draw_label("Press ESC to go back.", 50.0, 230.0, BODY_FONT_SIZE, DARKGRAY);
}

pub(crate) fn draw_game_over_menu(menu: &MenuPresentation, screen_width: f32) {
    draw_centered_label(
        "GAME OVER",
        GAME_OVER_TITLE_Y,
        GAME_OVER_FONT_SIZE,
        RED,
        screen_width,
    );
    draw_menu_entries(
        &GAME_OVER_MENU_LABELS,
        menu,
        GAME_OVER_FIRST_ENTRY_Y,
        MenuPalette::game_over(),
        screen_width,
    );
}

/// Coin balance and hit points in the top-left corner.
pub(crate) fn draw_hud(hud: HudPresentation) {
    draw_label(
        &format!("Coins: {}", hud.coins),
        10.0,
        10.0,
        BODY_FONT_SIZE,
        GOLD,
    );
    draw_label(
        &format!("HP: {}", hud.hit_points),
        10.0,
        40.0,
        BODY_FONT_SIZE,
        RED,
    );
}

pub(crate) fn draw_pause_banner(screen_width: f32, screen_height: f32) {
    draw_centered_label(
        "PAUSED",
        screen_height * 0.5,
        BANNER_FONT_SIZE,
        DARKGRAY,
        screen_width,
    );
}

/// Draws `text` with its top-left corner at (`x`, `y`).
pub(crate) fn draw_label(text: &str, x: f32, y: f32, font_size: u16, color: Color) {
    let dimensions = measure_text(text, None, font_size, 1.0);
    draw_text(text, x, y + dimensions.offset_y, f32::from(font_size), color);
}

fn draw_centered_label(text: &str, y: f32, font_size: u16, color: Color, screen_width: f32) {
    let dimensions = measure_text(text, None, font_size, 1.0);
    draw_label(
        text,
        centered_x(screen_width, dimensions.width),
        y,
        font_size,
        color,
    );
}

fn draw_menu_entries(
    labels: &[&str],
    menu: &MenuPresentation,
    first_entry_y: f32,
    palette: MenuPalette,
    screen_width: f32,
) {
    for (index, (label, selected)) in menu_entries(labels, menu).enumerate() {
        draw_centered_label(
            label,
            menu_entry_y(first_entry_y, index),
            MENU_ENTRY_FONT_SIZE,
            palette.pick(selected),
            screen_width,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_entries_are_spaced_evenly() {
        assert_eq!(menu_entry_y(MENU_FIRST_ENTRY_Y, 0), 200.0);
        assert_eq!(menu_entry_y(MENU_FIRST_ENTRY_Y, 2), 300.0);
        assert_eq!(menu_entry_y(GAME_OVER_FIRST_ENTRY_Y, 1), 300.0);
    }

    #[test]
    fn title_menu_highlights_the_selected_label() {
        let menu = MenuPresentation::new(1);

        let entries: Vec<_> = menu_entries(&TITLE_MENU_LABELS, &menu).collect();

        assert_eq!(
            entries,
            vec![("Play", false), ("Options", true), ("Exit", false)]
        );
    }

    #[test]
    fn game_over_menu_lists_restart_before_menu() {
        let menu = MenuPresentation::new(0);

        let entries: Vec<_> = menu_entries(&GAME_OVER_MENU_LABELS, &menu).collect();

        assert_eq!(entries, vec![("Play again", true), ("Back to menu", false)]);
    }

    #[test]
    fn labels_are_centred_horizontally() {
        assert_eq!(centered_x(800.0, 200.0), 300.0);
        assert_eq!(centered_x(800.0, 800.0), 0.0);
    }

    #[test]
    fn palettes_highlight_the_selected_entry() {
        assert_eq!(MenuPalette::title().pick(true), RED);
        assert_eq!(MenuPalette::title().pick(false), DARKGRAY);
        assert_eq!(MenuPalette::game_over().pick(true), YELLOW);
        assert_eq!(MenuPalette::game_over().pick(false), GRAY);
    }
}
