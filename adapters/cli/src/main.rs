#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Medieval Protect experience.

mod config;
mod scene;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use medieval_protect_core::{Event, Rules, WINDOW_TITLE};
use medieval_protect_rendering::{Color, Presentation, RenderingBackend};
use medieval_protect_rendering_macroquad::MacroquadBackend;
use medieval_protect_simulation::{Simulation, SimulationInput};
use medieval_protect_system_game_flow::FlowInput;
use medieval_protect_world::query;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "medieval-protect")]
#[command(about = "Single-screen tower defense")]
struct Args {
    /// TOML file overriding the stock gameplay rules
    #[arg(long)]
    config: Option<PathBuf>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,

    /// Log frame-rate metrics once per second
    #[arg(long)]
    show_fps: bool,

    /// Run this many 1/60 s frames without a window, then exit
    #[arg(long)]
    headless_frames: Option<u32>,
}

/// Entry point for the Medieval Protect command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let rules = match &args.config {
        Some(path) => config::load_rules(path)
            .with_context(|| format!("failed to load rules from {}", path.display()))?,
        None => Rules::default(),
    };
    let simulation = Simulation::with_rules(rules);

    match args.headless_frames {
        Some(frames) => {
            run_headless(simulation, frames);
            Ok(())
        }
        None => run_windowed(simulation, &args),
    }
}

fn run_windowed(mut simulation: Simulation, args: &Args) -> Result<()> {
    let scene = scene::initial_scene(&simulation).context("failed to build the initial scene")?;
    let presentation = Presentation::new(
        WINDOW_TITLE,
        Color::from_rgb_u8(245, 245, 245),
        scene,
    );
    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps);

    info!(vsync = args.vsync, "starting game");
    backend
        .run(presentation, move |dt, input, scene| {
            scene::advance_frame(&mut simulation, dt, input, scene)
        })
        .context("rendering backend failed")?;
    info!("game closed");
    Ok(())
}

/// Starts a session from the menu and steps it with fixed frames and no input.
fn run_headless(mut simulation: Simulation, frames: u32) {
    let frame = Duration::from_secs_f64(1.0 / 60.0);
    let start = FlowInput {
        confirm: true,
        ..FlowInput::default()
    };
    simulation.advance(frame, SimulationInput::keys(start));

    let mut defeated = 0_u32;
    let mut leaked = 0_u32;
    for _ in 0..frames {
        simulation.advance(frame, SimulationInput::idle());
        for event in simulation.last_events() {
            match event {
                Event::EnemyDefeated { .. } => defeated += 1,
                Event::EnemyLeaked { .. } => leaked += 1,
                _ => {}
            }
        }
    }

    let world = simulation.world();
    info!(
        frames,
        state = ?simulation.flow().state(),
        coins = query::coins(world).get(),
        hit_points = query::hit_points(world).get(),
        enemies = query::enemy_view(world).len(),
        defeated,
        leaked,
        "headless run finished"
    );
}
