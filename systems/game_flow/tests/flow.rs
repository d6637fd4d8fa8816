use medieval_protect_core::{Command, HitPoints};
use medieval_protect_system_game_flow::{
    FlowInput, FramePlan, GameFlow, GameOverOption, GameState, MenuOption,
};

const DOWN: FlowInput = FlowInput {
    navigate_up: false,
    navigate_down: true,
    confirm: false,
    escape: false,
};
const UP: FlowInput = FlowInput {
    navigate_up: true,
    navigate_down: false,
    confirm: false,
    escape: false,
};
const ENTER: FlowInput = FlowInput {
    navigate_up: false,
    navigate_down: false,
    confirm: true,
    escape: false,
};
const ESCAPE: FlowInput = FlowInput {
    navigate_up: false,
    navigate_down: false,
    confirm: false,
    escape: true,
};

fn press(flow: &mut GameFlow, input: FlowInput) -> (FramePlan, Vec<Command>) {
    let mut commands = Vec::new();
    let plan = flow.handle(input, &mut commands);
    (plan, commands)
}

fn playing() -> GameFlow {
    let mut flow = GameFlow::new();
    let _ = press(&mut flow, ENTER);
    assert_eq!(flow.state(), GameState::Playing);
    flow
}

#[test]
fn starts_on_menu_with_play_highlighted() {
    let flow = GameFlow::new();

    assert_eq!(flow.state(), GameState::Menu);
    assert_eq!(flow.menu_selection(), MenuOption::Play);
    assert!(!flow.is_paused());
    assert!(!flow.is_finished());
}

#[test]
fn menu_selection_wraps_upward_to_exit() {
    let mut flow = GameFlow::new();

    let _ = press(&mut flow, UP);
    assert_eq!(flow.menu_selection(), MenuOption::Exit);

    let _ = press(&mut flow, DOWN);
    assert_eq!(flow.menu_selection(), MenuOption::Play);
}

#[test]
fn choosing_play_resets_session_without_stepping() {
    let mut flow = GameFlow::new();

    let (plan, commands) = press(&mut flow, ENTER);

    assert_eq!(plan, FramePlan::Hold);
    assert_eq!(commands, vec![Command::ResetSession]);
    assert_eq!(flow.state(), GameState::Playing);

    let (plan, commands) = press(&mut flow, FlowInput::default());
    assert_eq!(plan, FramePlan::Simulate);
    assert!(commands.is_empty());
}

#[test]
fn down_is_processed_before_confirm_in_the_same_frame() {
    let mut flow = GameFlow::new();

    let (_, commands) = press(
        &mut flow,
        FlowInput {
            navigate_down: true,
            confirm: true,
            ..FlowInput::default()
        },
    );

    assert!(commands.is_empty());
    assert_eq!(flow.state(), GameState::Options);
}

#[test]
fn options_screen_returns_to_menu_on_escape() {
    let mut flow = GameFlow::new();
    let _ = press(&mut flow, DOWN);
    let _ = press(&mut flow, ENTER);
    assert_eq!(flow.state(), GameState::Options);

    let _ = press(&mut flow, ENTER);
    assert_eq!(flow.state(), GameState::Options);

    let _ = press(&mut flow, ESCAPE);
    assert_eq!(flow.state(), GameState::Menu);
    assert_eq!(flow.menu_selection(), MenuOption::Options);
}

#[test]
fn exit_option_finishes_the_run() {
    let mut flow = GameFlow::new();
    let _ = press(&mut flow, UP);

    let (plan, _) = press(&mut flow, ENTER);

    assert_eq!(plan, FramePlan::Hold);
    assert!(flow.is_finished());
}

#[test]
fn escape_toggles_pause_while_playing() {
    let mut flow = playing();

    let (plan, _) = press(&mut flow, ESCAPE);
    assert_eq!(plan, FramePlan::Hold);
    assert!(flow.is_paused());

    let (plan, _) = press(&mut flow, FlowInput::default());
    assert_eq!(plan, FramePlan::Hold);

    let (plan, _) = press(&mut flow, ESCAPE);
    assert_eq!(plan, FramePlan::Simulate);
    assert!(!flow.is_paused());
}

#[test]
fn depleted_hit_points_end_the_session() {
    let mut flow = playing();

    flow.conclude_frame(HitPoints::new(1));
    assert_eq!(flow.state(), GameState::Playing);

    flow.conclude_frame(HitPoints::new(0));
    assert_eq!(flow.state(), GameState::GameOver);
    assert_eq!(flow.game_over_selection(), GameOverOption::PlayAgain);
}

#[test]
fn hit_points_are_ignored_outside_a_session() {
    let mut flow = GameFlow::new();

    flow.conclude_frame(HitPoints::new(-40));

    assert_eq!(flow.state(), GameState::Menu);
}

#[test]
fn game_over_selection_resets_on_each_loss() {
    let mut flow = playing();
    flow.conclude_frame(HitPoints::new(-20));
    let _ = press(&mut flow, DOWN);
    assert_eq!(flow.game_over_selection(), GameOverOption::BackToMenu);

    let _ = press(&mut flow, ENTER);
    assert_eq!(flow.state(), GameState::Menu);

    let _ = press(&mut flow, ENTER);
    flow.conclude_frame(HitPoints::new(0));
    assert_eq!(flow.game_over_selection(), GameOverOption::PlayAgain);
}

#[test]
fn play_again_unpauses_and_resets() {
    let mut flow = playing();
    let _ = press(&mut flow, ESCAPE);
    flow.conclude_frame(HitPoints::new(0));
    assert_eq!(flow.state(), GameState::GameOver);

    let (plan, commands) = press(&mut flow, ENTER);

    assert_eq!(plan, FramePlan::Hold);
    assert_eq!(commands, vec![Command::ResetSession]);
    assert_eq!(flow.state(), GameState::Playing);
    assert!(!flow.is_paused());
}
