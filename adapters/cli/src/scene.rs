//! Translation between the simulation and the rendering contracts.

use std::time::Duration;

use glam::Vec2;
use medieval_protect_rendering::{
    FrameInput, FrameOutcome, HudPresentation, MenuPresentation, PlacementHighlight, RenderingError,
    Scene, SceneEnemy, SceneProjectile, SceneTower, ScreenPresentation, TerrainPresentation,
    TileMapPresentation,
};
use medieval_protect_simulation::{Simulation, SimulationInput};
use medieval_protect_system_game_flow::{
    FlowInput, GameFlow, GameOverOption, GameState, MenuOption,
};
use medieval_protect_world::{query, Terrain};

/// Builds the scene shown before the first frame.
pub(crate) fn initial_scene(simulation: &Simulation) -> Result<Scene, RenderingError> {
    let world = simulation.world();
    let tile_map = query::tile_map(world);
    let tiles = tile_map
        .iter()
        .map(|(_, terrain)| match terrain {
            Terrain::Buildable => TerrainPresentation::Grass,
            Terrain::Road => TerrainPresentation::Road,
        })
        .collect();
    let presentation = TileMapPresentation::new(
        tile_map.columns(),
        tile_map.rows(),
        tile_map.tile_length(),
        tiles,
    )?;

    let mut scene = Scene::new(
        presentation,
        query::path(world).points().to_vec(),
        screen_presentation(simulation.flow()),
    );
    populate_scene(simulation, None, &mut scene);
    Ok(scene)
}

/// Advances the simulation by one rendered frame and refreshes `scene`.
pub(crate) fn advance_frame(
    simulation: &mut Simulation,
    dt: Duration,
    input: FrameInput,
    scene: &mut Scene,
) -> FrameOutcome {
    simulation.advance(dt, simulation_input(&input));
    if simulation.flow().is_finished() {
        return FrameOutcome::Exit;
    }

    populate_scene(simulation, input.cursor_world_space, scene);
    FrameOutcome::Continue
}

fn simulation_input(input: &FrameInput) -> SimulationInput {
    SimulationInput {
        keys: FlowInput {
            navigate_up: input.navigate_up,
            navigate_down: input.navigate_down,
            confirm: input.confirm,
            escape: input.escape,
        },
        click: input.click,
    }
}

fn populate_scene(simulation: &Simulation, cursor: Option<Vec2>, scene: &mut Scene) {
    let world = simulation.world();
    scene.clear_inhabitants();
    scene.screen = screen_presentation(simulation.flow());
    scene.hud = HudPresentation {
        coins: query::coins(world).get(),
        hit_points: query::hit_points(world).get(),
    };

    scene.towers.extend(
        query::tower_view(world)
            .iter()
            .map(|tower| SceneTower::new(tower.position, tower.range, tower.health.get())),
    );
    scene.enemies.extend(
        query::enemy_view(world)
            .iter()
            .map(|enemy| SceneEnemy::new(enemy.position, enemy.kind, enemy.health.get())),
    );
    scene.projectiles.extend(
        query::projectiles(world)
            .into_iter()
            .map(|projectile| SceneProjectile {
                position: projectile.position,
            }),
    );

    if simulation.flow().state() == GameState::Playing && !simulation.flow().is_paused() {
        scene.placement_highlight = cursor
            .and_then(|position| simulation.placement_preview(position))
            .map(|preview| PlacementHighlight {
                column: preview.tile.column(),
                row: preview.tile.row(),
                accepted: preview.accepts(),
            });
    }
}

fn screen_presentation(flow: &GameFlow) -> ScreenPresentation {
    match flow.state() {
        GameState::Options => ScreenPresentation::Options,
        GameState::Playing => ScreenPresentation::Playing {
            paused: flow.is_paused(),
        },
        GameState::GameOver => ScreenPresentation::GameOver(menu_presentation(
            &GameOverOption::ALL,
            flow.game_over_selection(),
        )),
        GameState::Menu | GameState::Exit => ScreenPresentation::Menu(menu_presentation(
            &MenuOption::ALL,
            flow.menu_selection(),
        )),
    }
}

fn menu_presentation<T: PartialEq>(options: &[T], selected: T) -> MenuPresentation {
    let index = options
        .iter()
        .position(|option| *option == selected)
        .unwrap_or(0);
    MenuPresentation::new(index)
}
