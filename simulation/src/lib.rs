#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame orchestration that wires the world, the pure systems and the menu
//! state machine together.
//!
//! Adapters call [`Simulation::advance`] once per rendered frame with the
//! elapsed time and the frame's input. The simulation forwards key presses to
//! the [`GameFlow`], and when the flow allows it runs the ordered phases of a
//! play step: purchase, spawn, enemy advance and cooldowns, targeting and
//! firing, projectile flight, leak resolution.

use std::time::Duration;

use glam::Vec2;
use medieval_protect_core::{Command, EnemyKind, Event, Rules};
use medieval_protect_system_builder::{Builder, BuilderInput, PlacementPreview};
use medieval_protect_system_game_flow::{FlowInput, FramePlan, GameFlow};
use medieval_protect_system_spawning::{Config as SpawningConfig, Spawning};
use medieval_protect_system_tower_targeting::TowerTargeting;
use medieval_protect_world::{self as world, query, World};
use tracing::trace;

/// Input gathered by an adapter for a single frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SimulationInput {
    /// Key presses forwarded to the menu state machine.
    pub keys: FlowInput,
    /// World position of a left click reported this frame.
    pub click: Option<Vec2>,
}

impl SimulationInput {
    /// Input describing a frame without any key press or click.
    #[must_use]
    pub fn idle() -> Self {
        Self::default()
    }

    /// Input describing a single left click at `position`.
    #[must_use]
    pub fn click(position: Vec2) -> Self {
        Self {
            keys: FlowInput::default(),
            click: Some(position),
        }
    }

    /// Input describing the provided key presses without a click.
    #[must_use]
    pub fn keys(keys: FlowInput) -> Self {
        Self { keys, click: None }
    }
}

/// Owns the world alongside every system that drives it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    flow: GameFlow,
    builder: Builder,
    spawning: Spawning,
    targeting: TowerTargeting,
    commands: Vec<Command>,
    events: Vec<Event>,
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

impl Simulation {
    /// Creates a simulation running the stock rules, starting on the menu.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates a simulation running the provided rules, starting on the menu.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let spawning = Spawning::new(SpawningConfig::from_rules(&rules));
        Self {
            world: World::with_rules(rules),
            flow: GameFlow::new(),
            builder: Builder::new(),
            spawning,
            targeting: TowerTargeting::new(),
            commands: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Advances the game by one frame.
    ///
    /// Events produced during the frame remain available through
    /// [`Simulation::last_events`] until the next call.
    pub fn advance(&mut self, dt: Duration, input: SimulationInput) {
        self.events.clear();

        let plan = self.flow.handle(input.keys, &mut self.commands);
        self.flush_commands();
        if self.events.contains(&Event::SessionReset) {
            self.spawning.reset();
        }

        if plan == FramePlan::Simulate {
            self.step(dt, input.click);
        }

        self.flow.conclude_frame(query::hit_points(&self.world));
    }

    /// Read-only access to the authoritative world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Read-only access to the menu state machine.
    #[must_use]
    pub fn flow(&self) -> &GameFlow {
        &self.flow
    }

    /// Events the world emitted during the most recent frame.
    #[must_use]
    pub fn last_events(&self) -> &[Event] {
        &self.events
    }

    /// Time accumulated toward the next spawn of `kind`.
    #[must_use]
    pub fn spawn_timer(&self, kind: EnemyKind) -> Duration {
        self.spawning.elapsed(kind)
    }

    /// Describes what a click at `position` would do, or `None` off the map.
    #[must_use]
    pub fn placement_preview(&self, position: Vec2) -> Option<PlacementPreview> {
        let tile = query::tile_map(&self.world).tile_at(position)?;
        Some(PlacementPreview::evaluate(
            tile,
            query::can_build_at(&self.world, position),
            query::coins(&self.world),
            query::rules(&self.world).economy.tower_cost(),
        ))
    }

    fn step(&mut self, dt: Duration, click: Option<Vec2>) {
        let preview = click.and_then(|position| self.placement_preview(position));
        self.builder.handle(
            BuilderInput::new(click.is_some(), click),
            preview,
            &mut self.commands,
        );
        self.flush_commands();

        self.spawning.handle(dt, &mut self.commands);
        self.flush_commands();

        self.commands.push(Command::Tick { dt });
        self.flush_commands();

        let towers = query::tower_view(&self.world);
        let enemies = query::enemy_view(&self.world);
        self.targeting.handle(&towers, &enemies, &mut self.commands);
        self.flush_commands();

        self.commands.push(Command::AdvanceProjectiles { dt });
        self.commands.push(Command::ResolveLeaks);
        self.flush_commands();

        trace!(
            enemies = enemies.len(),
            towers = towers.len(),
            events = self.events.len(),
            "simulation stepped"
        );
    }

    fn flush_commands(&mut self) {
        for command in self.commands.drain(..) {
            world::apply(&mut self.world, command, &mut self.events);
        }
    }
}
