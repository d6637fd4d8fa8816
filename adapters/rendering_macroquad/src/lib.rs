#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Macroquad-backed rendering adapter for Medieval Protect. The game is
//! silent, so macroquad is built without its audio feature.
//!
//! Menus, the HUD and other text overlays live in the local `ui` module; this
//! module owns the window, input polling and the playfield.

mod ui;

use anyhow::Result;
use glam::Vec2;
use macroquad::{
    color::{BLACK, BLUE, BROWN, DARKGREEN, GREEN, RED},
    input::{is_key_pressed, is_mouse_button_pressed, mouse_position, KeyCode, MouseButton},
    shapes::{draw_circle, draw_circle_lines, draw_line, draw_rectangle, draw_rectangle_lines},
};
use medieval_protect_core::EnemyKind;
use medieval_protect_rendering::{
    Color, FrameInput, FrameOutcome, PlacementHighlight, Presentation, RenderingBackend, Scene,
    SceneEnemy, SceneProjectile, SceneTower, ScreenPresentation, TerrainPresentation,
};
use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};
use tracing::info;

const PROJECTILE_RADIUS: f32 = 5.0;
const HEALTH_LABEL_FONT_SIZE: u16 = 12;

/// Snapshot of edge-triggered keys observed during a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct KeyboardShortcuts {
    up: bool,
    down: bool,
    /// `Enter` or the keypad's enter key.
    confirm: bool,
    /// `Escape` backs out of screens and toggles pause; it never quits.
    escape: bool,
}

impl KeyboardShortcuts {
    fn poll() -> Self {
        Self {
            up: is_key_pressed(KeyCode::Up),
            down: is_key_pressed(KeyCode::Down),
            confirm: is_key_pressed(KeyCode::Enter) || is_key_pressed(KeyCode::KpEnter),
            escape: is_key_pressed(KeyCode::Escape),
        }
    }
}

/// Rendering backend implemented on top of macroquad.
#[derive(Debug, Default)]
pub struct MacroquadBackend {
    swap_interval: Option<i32>,
    show_fps: bool,
}

impl MacroquadBackend {
    /// Returns a backend that requests the platform's default swap interval.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the backend to request a specific swap interval from the platform.
    #[must_use]
    pub fn with_swap_interval(mut self, swap_interval: Option<i32>) -> Self {
        self.swap_interval = swap_interval;
        self
    }

    /// Configures the backend to either synchronise presentation with the display refresh rate
    /// or render as fast as possible.
    #[must_use]
    pub fn with_vsync(self, enabled: bool) -> Self {
        let swap_interval = if enabled { Some(1) } else { Some(0) };
        self.with_swap_interval(swap_interval)
    }

    /// Configures whether the backend logs frame timing metrics once per second.
    #[must_use]
    pub fn with_show_fps(mut self, show: bool) -> Self {
        self.show_fps = show;
        self
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct FrameBreakdown {
    frame: Duration,
    update: Duration,
    render: Duration,
}

/// Tracks the average frames-per-second produced by the render loop.
#[derive(Debug, Default)]
struct FpsCounter {
    elapsed: Duration,
    frames: u32,
    frame_times: VecDeque<Duration>,
    window_duration: Duration,
    update_accum: Duration,
    render_accum: Duration,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct FpsMetrics {
    per_second: f32,
    trailing_ten_seconds: f32,
    avg_update: Duration,
    avg_render: Duration,
}

impl FpsCounter {
    /// Records a rendered frame and returns the per-second and trailing ten-second averages once
    /// one second has elapsed.
    fn record_frame(&mut self, breakdown: FrameBreakdown) -> Option<FpsMetrics> {
        self.elapsed += breakdown.frame;
        self.frames = self.frames.saturating_add(1);
        self.update_accum += breakdown.update;
        self.render_accum += breakdown.render;

        self.frame_times.push_back(breakdown.frame);
        self.window_duration += breakdown.frame;

        let trailing_window = Duration::from_secs(10);
        while self.window_duration > trailing_window {
            if let Some(removed) = self.frame_times.pop_front() {
                self.window_duration = self.window_duration.saturating_sub(removed);
            } else {
                break;
            }
        }

        if self.elapsed < Duration::from_secs(1) {
            return None;
        }

        let seconds = self.elapsed.as_secs_f32();
        let frames = self.frames.max(1);
        let per_second = self.frames as f32 / seconds;
        let window_seconds = self.window_duration.as_secs_f32();
        let trailing_ten_seconds = if window_seconds <= f32::EPSILON {
            per_second
        } else {
            self.frame_times.len() as f32 / window_seconds
        };
        let metrics = FpsMetrics {
            per_second,
            trailing_ten_seconds,
            avg_update: self.update_accum / frames,
            avg_render: self.render_accum / frames,
        };

        self.elapsed = Duration::ZERO;
        self.frames = 0;
        self.update_accum = Duration::ZERO;
        self.render_accum = Duration::ZERO;
        Some(metrics)
    }
}

impl RenderingBackend for MacroquadBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> Result<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene) -> FrameOutcome + 'static,
    {
        let Self {
            swap_interval,
            show_fps,
        } = self;

        let Presentation {
            window_title,
            clear_color,
            scene,
        } = presentation;

        let mut config = macroquad::window::Conf {
            window_title,
            window_width: scene.tile_map.width().round() as i32,
            window_height: scene.tile_map.height().round() as i32,
            ..macroquad::window::Conf::default()
        };
        if let Some(swap_interval) = swap_interval {
            config.platform.swap_interval = Some(swap_interval);
        }

        info!(
            width = config.window_width,
            height = config.window_height,
            "opening window"
        );

        macroquad::Window::from_config(config, async move {
            let mut scene = scene;
            let mut fps_counter = FpsCounter::default();

            loop {
                let keyboard = KeyboardShortcuts::poll();
                let screen_width = macroquad::window::screen_width();
                let screen_height = macroquad::window::screen_height();

                let dt_seconds = macroquad::time::get_frame_time();
                let frame_dt = Duration::from_secs_f32(dt_seconds.max(0.0));
                let metrics_before = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                let frame_input = gather_frame_input(&metrics_before, keyboard);

                let update_start = Instant::now();
                let outcome = update_scene(frame_dt, frame_input, &mut scene);
                let update_duration = update_start.elapsed();
                if outcome == FrameOutcome::Exit {
                    info!("render loop finished");
                    break;
                }

                let render_start = Instant::now();
                let background = background_color(&scene.screen, clear_color);
                macroquad::window::clear_background(to_macroquad_color(background));
                let metrics = SceneMetrics::from_scene(&scene, screen_width, screen_height);
                draw_screen(&scene, &metrics, screen_width, screen_height);
                let render_duration = render_start.elapsed();

                let fps_metrics = fps_counter.record_frame(FrameBreakdown {
                    frame: frame_dt,
                    update: update_duration,
                    render: render_duration,
                });
                if show_fps {
                    if let Some(FpsMetrics {
                        per_second,
                        trailing_ten_seconds,
                        avg_update,
                        avg_render,
                    }) = fps_metrics
                    {
                        info!(
                            fps = per_second,
                            fps_trailing_10s = trailing_ten_seconds,
                            update_ms = avg_update.as_secs_f64() * 1_000.0,
                            render_ms = avg_render.as_secs_f64() * 1_000.0,
                            "frame timing"
                        );
                    }
                }

                macroquad::window::next_frame().await;
            }
        });

        Ok(())
    }
}

/// Maps world coordinates onto the window, letterboxing the map when the
/// window's aspect ratio differs from the map's.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SceneMetrics {
    scale: f32,
    offset_x: f32,
    offset_y: f32,
    map_width_scaled: f32,
    map_height_scaled: f32,
}

impl SceneMetrics {
    fn from_scene(scene: &Scene, screen_width: f32, screen_height: f32) -> Self {
        let world_width = scene.tile_map.width();
        let world_height = scene.tile_map.height();
        let scale = if world_width <= f32::EPSILON || world_height <= f32::EPSILON {
            1.0
        } else {
            (screen_width / world_width).min(screen_height / world_height)
        };

        let map_width_scaled = world_width * scale;
        let map_height_scaled = world_height * scale;
        Self {
            scale,
            offset_x: ((screen_width - map_width_scaled) * 0.5).max(0.0),
            offset_y: ((screen_height - map_height_scaled) * 0.5).max(0.0),
            map_width_scaled,
            map_height_scaled,
        }
    }

    fn to_screen(&self, position: Vec2) -> Vec2 {
        Vec2::new(
            self.offset_x + position.x * self.scale,
            self.offset_y + position.y * self.scale,
        )
    }

    fn to_world(&self, cursor: Vec2) -> Vec2 {
        Vec2::new(
            (cursor.x - self.offset_x) / self.scale,
            (cursor.y - self.offset_y) / self.scale,
        )
    }

    fn contains_cursor(&self, cursor: Vec2) -> bool {
        cursor.x >= self.offset_x
            && cursor.x < self.offset_x + self.map_width_scaled
            && cursor.y >= self.offset_y
            && cursor.y < self.offset_y + self.map_height_scaled
    }
}

fn gather_frame_input(metrics: &SceneMetrics, keyboard: KeyboardShortcuts) -> FrameInput {
    let (cursor_x, cursor_y) = mouse_position();
    let left_click = is_mouse_button_pressed(MouseButton::Left);
    gather_frame_input_from_observations(
        metrics,
        Vec2::new(cursor_x, cursor_y),
        keyboard,
        left_click,
    )
}

fn gather_frame_input_from_observations(
    metrics: &SceneMetrics,
    cursor_position: Vec2,
    keyboard: KeyboardShortcuts,
    left_click: bool,
) -> FrameInput {
    let mut input = FrameInput {
        navigate_up: keyboard.up,
        navigate_down: keyboard.down,
        confirm: keyboard.confirm,
        escape: keyboard.escape,
        ..FrameInput::default()
    };

    if metrics.scale <= f32::EPSILON || !metrics.contains_cursor(cursor_position) {
        return input;
    }

    let world_position = metrics.to_world(cursor_position);
    input.cursor_world_space = Some(world_position);
    if left_click {
        input.click = Some(world_position);
    }

    input
}

fn background_color(screen: &ScreenPresentation, clear_color: Color) -> Color {
    match screen {
        ScreenPresentation::GameOver(_) => Color::from_rgb_u8(0, 117, 44),
        _ => clear_color,
    }
}

fn draw_screen(scene: &Scene, metrics: &SceneMetrics, screen_width: f32, screen_height: f32) {
    match &scene.screen {
        ScreenPresentation::Menu(menu) => ui::draw_title_menu(menu, screen_width),
        ScreenPresentation::Options => ui::draw_options_screen(screen_width),
        ScreenPresentation::Playing { paused } => {
            draw_tiles(scene, metrics);
            draw_path(&scene.path, metrics);
            if let Some(highlight) = scene.placement_highlight {
                draw_placement_highlight(scene, highlight, metrics);
            }
            let tile_length = scene.tile_map.tile_length;
            draw_towers(&scene.towers, tile_length, metrics);
            draw_enemies(&scene.enemies, tile_length, metrics);
            draw_projectiles(&scene.projectiles, metrics);
            ui::draw_hud(scene.hud);
            if *paused {
                ui::draw_pause_banner(screen_width, screen_height);
            }
        }
        ScreenPresentation::GameOver(menu) => ui::draw_game_over_menu(menu, screen_width),
    }
}

fn draw_tiles(scene: &Scene, metrics: &SceneMetrics) {
    let tile_step = scene.tile_map.tile_length * metrics.scale;
    for (column, row, terrain) in scene.tile_map.iter() {
        let origin = metrics.to_screen(scene.tile_map.tile_origin(column, row));
        let color = match terrain {
            TerrainPresentation::Grass => GREEN,
            TerrainPresentation::Road => BROWN,
        };
        draw_rectangle(origin.x, origin.y, tile_step, tile_step, color);
    }
}

fn draw_path(path: &[Vec2], metrics: &SceneMetrics) {
    for segment in path.windows(2) {
        let start = metrics.to_screen(segment[0]);
        let end = metrics.to_screen(segment[1]);
        draw_line(start.x, start.y, end.x, end.y, 1.0, BLUE);
    }
}

fn draw_placement_highlight(scene: &Scene, highlight: PlacementHighlight, metrics: &SceneMetrics) {
    let tile_step = scene.tile_map.tile_length * metrics.scale;
    let origin = metrics.to_screen(
        scene
            .tile_map
            .tile_origin(highlight.column, highlight.row),
    );
    let color = to_macroquad_color(highlight_color(highlight.accepted));
    draw_rectangle(origin.x, origin.y, tile_step, tile_step, color);
    draw_rectangle_lines(
        origin.x,
        origin.y,
        tile_step,
        tile_step,
        2.0,
        macroquad::color::Color { a: 1.0, ..color },
    );
}

fn draw_towers(towers: &[SceneTower], tile_length: f32, metrics: &SceneMetrics) {
    let body_radius = tower_body_radius(tile_length) * metrics.scale;
    for tower in towers {
        let center = metrics.to_screen(tower.position);
        draw_circle(center.x, center.y, body_radius, DARKGREEN);
        draw_circle_lines(
            center.x,
            center.y,
            tower.range * metrics.scale,
            1.0,
            GREEN,
        );
        ui::draw_label(
            &tower.health.to_string(),
            center.x - 10.0,
            center.y - 30.0,
            HEALTH_LABEL_FONT_SIZE,
            BLACK,
        );
    }
}

fn draw_enemies(enemies: &[SceneEnemy], tile_length: f32, metrics: &SceneMetrics) {
    let radius = enemy_radius(tile_length) * metrics.scale;
    for enemy in enemies {
        let center = metrics.to_screen(enemy.position);
        draw_circle(center.x, center.y, radius, enemy_color(enemy.kind));
        ui::draw_label(
            &enemy.health.to_string(),
            center.x - 10.0,
            center.y - 20.0,
            HEALTH_LABEL_FONT_SIZE,
            BLACK,
        );
    }
}

fn draw_projectiles(projectiles: &[SceneProjectile], metrics: &SceneMetrics) {
    for projectile in projectiles {
        let center = metrics.to_screen(projectile.position);
        draw_circle(
            center.x,
            center.y,
            PROJECTILE_RADIUS * metrics.scale,
            BLACK,
        );
    }
}

/// Half a tile minus a four-unit margin.
fn tower_body_radius(tile_length: f32) -> f32 {
    (tile_length / 2.0 - 4.0).max(1.0)
}

fn enemy_radius(tile_length: f32) -> f32 {
    tile_length / 3.0
}

fn enemy_color(kind: EnemyKind) -> macroquad::color::Color {
    match kind {
        EnemyKind::Basic => RED,
        EnemyKind::Shooter => DARKGREEN,
    }
}

fn highlight_color(accepted: bool) -> Color {
    if accepted {
        Color::from_rgb_u8(255, 255, 255).with_alpha(0.35)
    } else {
        Color::from_rgb_u8(230, 41, 55).with_alpha(0.35)
    }
}

fn to_macroquad_color(color: Color) -> macroquad::color::Color {
    macroquad::color::Color::new(color.red, color.green, color.blue, color.alpha)
}
