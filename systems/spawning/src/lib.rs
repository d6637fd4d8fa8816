#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timer-driven spawning system responsible for emitting enemy spawn commands.
//!
//! Each enemy variant owns an independent timer. When a timer reaches its
//! interval it resets to zero rather than carrying the surplus over, so at
//! most one enemy of each variant appears per frame.

use std::time::Duration;

use medieval_protect_core::{Command, EnemyKind, Rules};

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    basic_interval: Duration,
    shooter_interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided spawn cadences.
    #[must_use]
    pub const fn new(basic_interval: Duration, shooter_interval: Duration) -> Self {
        Self {
            basic_interval,
            shooter_interval,
        }
    }

    /// Derives the spawn cadences from a rule set.
    #[must_use]
    pub fn from_rules(rules: &Rules) -> Self {
        Self::new(
            rules.enemy(EnemyKind::Basic).spawn_interval(),
            rules.enemy(EnemyKind::Shooter).spawn_interval(),
        )
    }
}

/// Pure system that emits spawn commands once per elapsed interval.
#[derive(Debug)]
pub struct Spawning {
    basic: SpawnTimer,
    shooter: SpawnTimer,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            basic: SpawnTimer::new(EnemyKind::Basic, config.basic_interval),
            shooter: SpawnTimer::new(EnemyKind::Shooter, config.shooter_interval),
        }
    }

    /// Advances both timers by `dt` and emits the spawns that became due.
    ///
    /// Basic enemies are always emitted before shooters.
    pub fn handle(&mut self, dt: Duration, out: &mut Vec<Command>) {
        for timer in [&mut self.basic, &mut self.shooter] {
            if timer.advance(dt) {
                out.push(Command::SpawnEnemy { kind: timer.kind });
            }
        }
    }

    /// Restarts both timers from zero.
    pub fn reset(&mut self) {
        self.basic.elapsed = Duration::ZERO;
        self.shooter.elapsed = Duration::ZERO;
    }

    /// Time accumulated toward the next spawn of `kind`.
    #[must_use]
    pub fn elapsed(&self, kind: EnemyKind) -> Duration {
        match kind {
            EnemyKind::Basic => self.basic.elapsed,
            EnemyKind::Shooter => self.shooter.elapsed,
        }
    }
}

#[derive(Debug)]
struct SpawnTimer {
    kind: EnemyKind,
    interval: Duration,
    elapsed: Duration,
}

impl SpawnTimer {
    const fn new(kind: EnemyKind, interval: Duration) -> Self {
        Self {
            kind,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    fn advance(&mut self, dt: Duration) -> bool {
        if self.interval.is_zero() {
            return false;
        }

        self.elapsed = self.elapsed.saturating_add(dt);
        if self.elapsed >= self.interval {
            self.elapsed = Duration::ZERO;
            return true;
        }
        false
    }
}
