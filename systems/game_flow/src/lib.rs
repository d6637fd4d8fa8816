#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Menu and session state machine that decides when the simulation runs.
//!
//! The flow consumes discrete key presses once per frame and answers with a
//! [`FramePlan`] describing whether the simulation may step. Starting a new
//! session is expressed as [`Command::ResetSession`] so the world remains the
//! only owner of gameplay state.

use medieval_protect_core::{Command, HitPoints};
use tracing::info;

/// Screens and lifecycle phases of the game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// Main menu listing [`MenuOption`] entries.
    Menu,
    /// Placeholder options screen.
    Options,
    /// Active session.
    Playing,
    /// Session lost; lists [`GameOverOption`] entries.
    GameOver,
    /// Terminal state that stops the run loop.
    Exit,
}

/// Entries of the main menu in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MenuOption {
    /// Starts a fresh session.
    Play,
    /// Opens the options screen.
    Options,
    /// Leaves the game.
    Exit,
}

impl MenuOption {
    /// Every option in display order.
    pub const ALL: [Self; 3] = [Self::Play, Self::Options, Self::Exit];
}

/// Entries of the game-over screen in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameOverOption {
    /// Starts a fresh session immediately.
    PlayAgain,
    /// Returns to the main menu.
    BackToMenu,
}

impl GameOverOption {
    /// Every option in display order.
    pub const ALL: [Self; 2] = [Self::PlayAgain, Self::BackToMenu];
}

/// Key presses relevant to the state machine during one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowInput {
    /// Up arrow pressed.
    pub navigate_up: bool,
    /// Down arrow pressed.
    pub navigate_down: bool,
    /// Enter pressed.
    pub confirm: bool,
    /// Escape pressed.
    pub escape: bool,
}

/// Whether the simulation may step during the current frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FramePlan {
    /// The session is running and unpaused.
    Simulate,
    /// The simulation stays frozen this frame.
    Hold,
}

/// State machine tracking the active screen, selections and pause flag.
#[derive(Clone, Debug)]
pub struct GameFlow {
    state: GameState,
    menu_selection: usize,
    game_over_selection: usize,
    paused: bool,
}

impl Default for GameFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl GameFlow {
    /// Creates a state machine that starts on the main menu.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: GameState::Menu,
            menu_selection: 0,
            game_over_selection: 0,
            paused: false,
        }
    }

    /// Active state.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.state
    }

    /// Highlighted main-menu option.
    #[must_use]
    pub fn menu_selection(&self) -> MenuOption {
        MenuOption::ALL
            .get(self.menu_selection)
            .copied()
            .unwrap_or(MenuOption::Play)
    }

    /// Highlighted game-over option.
    #[must_use]
    pub fn game_over_selection(&self) -> GameOverOption {
        GameOverOption::ALL
            .get(self.game_over_selection)
            .copied()
            .unwrap_or(GameOverOption::PlayAgain)
    }

    /// Reports whether the session is paused.
    #[must_use]
    pub const fn is_paused(&self) -> bool {
        self.paused
    }

    /// Reports whether the run loop should stop.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        matches!(self.state, GameState::Exit)
    }

    /// Dispatches one frame of input to the active state.
    ///
    /// Navigation keys are handled in the order down, up, confirm. Starting a
    /// session pushes [`Command::ResetSession`] onto `out`. The simulation only
    /// steps when the frame began in [`GameState::Playing`] and the session is
    /// unpaused after the escape toggle.
    pub fn handle(&mut self, input: FlowInput, out: &mut Vec<Command>) -> FramePlan {
        match self.state {
            GameState::Menu => {
                self.menu_selection = navigate(
                    self.menu_selection,
                    MenuOption::ALL.len(),
                    input.navigate_down,
                    input.navigate_up,
                );
                if input.confirm {
                    match self.menu_selection() {
                        MenuOption::Play => self.start_session(out),
                        MenuOption::Options => self.transition(GameState::Options),
                        MenuOption::Exit => self.transition(GameState::Exit),
                    }
                }
                FramePlan::Hold
            }
            GameState::Options => {
                if input.escape {
                    self.transition(GameState::Menu);
                }
                FramePlan::Hold
            }
            GameState::Playing => {
                if input.escape {
                    self.paused = !self.paused;
                    info!(paused = self.paused, "pause toggled");
                }
                if self.paused {
                    FramePlan::Hold
                } else {
                    FramePlan::Simulate
                }
            }
            GameState::GameOver => {
                self.game_over_selection = navigate(
                    self.game_over_selection,
                    GameOverOption::ALL.len(),
                    input.navigate_down,
                    input.navigate_up,
                );
                if input.confirm {
                    match self.game_over_selection() {
                        GameOverOption::PlayAgain => self.start_session(out),
                        GameOverOption::BackToMenu => self.transition(GameState::Menu),
                    }
                }
                FramePlan::Hold
            }
            GameState::Exit => FramePlan::Hold,
        }
    }

    /// Ends a frame by checking whether the session has been lost.
    pub fn conclude_frame(&mut self, hit_points: HitPoints) {
        if self.state == GameState::Playing && hit_points.is_depleted() {
            self.game_over_selection = 0;
            info!(hit_points = hit_points.get(), "session lost");
            self.transition(GameState::GameOver);
        }
    }

    fn start_session(&mut self, out: &mut Vec<Command>) {
        self.paused = false;
        out.push(Command::ResetSession);
        self.transition(GameState::Playing);
    }

    fn transition(&mut self, next: GameState) {
        info!(from = ?self.state, to = ?next, "game state changed");
        self.state = next;
    }
}

fn navigate(selection: usize, count: usize, down: bool, up: bool) -> usize {
    if count == 0 {
        return 0;
    }

    let mut selection = selection % count;
    if down {
        selection = (selection + 1) % count;
    }
    if up {
        selection = (selection + count - 1) % count;
    }
    selection
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_wraps_in_both_directions() {
        assert_eq!(navigate(2, 3, true, false), 0);
        assert_eq!(navigate(0, 3, false, true), 2);
        assert_eq!(navigate(1, 2, true, true), 1);
    }

    #[test]
    fn options_follow_display_order() {
        assert_eq!(
            MenuOption::ALL,
            [MenuOption::Play, MenuOption::Options, MenuOption::Exit]
        );
        assert_eq!(
            GameOverOption::ALL,
            [GameOverOption::PlayAgain, GameOverOption::BackToMenu]
        );
    }
}
