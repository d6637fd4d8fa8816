//! Tunable gameplay rules.
//!
//! Every constant that shapes a session lives here so the binary can load
//! overrides from a configuration file. [`Rules::default`] reproduces the
//! stock game.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Coins, EnemyKind, Health, HitPoints};

/// Complete rule set consumed by the world and the systems.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Rules {
    /// Starting balances, prices and rewards.
    pub economy: EconomyRules,
    /// Statistics applied to every purchased tower.
    pub tower: TowerRules,
    /// Statistics applied to every projectile.
    pub projectile: ProjectileRules,
    /// Statistics of the basic enemy variant.
    pub basic_enemy: EnemyRules,
    /// Statistics of the shooter enemy variant.
    pub shooter_enemy: EnemyRules,
    /// Distance below which an enemy counts as having reached a waypoint.
    pub waypoint_tolerance: f32,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            economy: EconomyRules::default(),
            tower: TowerRules::default(),
            projectile: ProjectileRules::default(),
            basic_enemy: EnemyRules::basic(),
            shooter_enemy: EnemyRules::shooter(),
            waypoint_tolerance: 2.0,
        }
    }
}

impl Rules {
    /// Statistics for the requested enemy variant.
    #[must_use]
    pub const fn enemy(&self, kind: EnemyKind) -> &EnemyRules {
        match kind {
            EnemyKind::Basic => &self.basic_enemy,
            EnemyKind::Shooter => &self.shooter_enemy,
        }
    }

    /// Checks that every quantity is usable by the simulation.
    pub fn validate(&self) -> Result<(), RulesError> {
        non_negative("tower.range", self.tower.range)?;
        positive_interval("tower.fire_interval_secs", self.tower.fire_interval_secs)?;
        non_negative("projectile.speed", self.projectile.speed)?;
        non_negative("projectile.hit_radius", self.projectile.hit_radius)?;
        non_negative("waypoint_tolerance", self.waypoint_tolerance)?;
        if self.economy.leak_penalty < 0 {
            return Err(RulesError::NegativePenalty {
                value: self.economy.leak_penalty,
            });
        }

        self.basic_enemy.validate(EnemyFields {
            variant: "basic_enemy",
            spawn_interval: "basic_enemy.spawn_interval_secs",
            speed: "basic_enemy.speed",
        })?;
        self.shooter_enemy.validate(EnemyFields {
            variant: "shooter_enemy",
            spawn_interval: "shooter_enemy.spawn_interval_secs",
            speed: "shooter_enemy.speed",
        })
    }
}

/// Starting balances, prices and rewards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EconomyRules {
    /// Coins available when a session starts.
    pub starting_coins: u32,
    /// Player hit points when a session starts.
    pub starting_hit_points: i32,
    /// Price of a single tower.
    pub tower_cost: u32,
    /// Coins credited for each destroyed enemy.
    pub kill_reward: u32,
    /// Hit points lost for each enemy that reaches the end of the path.
    pub leak_penalty: i32,
}

impl Default for EconomyRules {
    fn default() -> Self {
        Self {
            starting_coins: 200,
            starting_hit_points: 200,
            tower_cost: 50,
            kill_reward: 20,
            leak_penalty: 20,
        }
    }
}

impl EconomyRules {
    /// Starting coin balance.
    #[must_use]
    pub const fn starting_coins(&self) -> Coins {
        Coins::new(self.starting_coins)
    }

    /// Starting player hit points.
    #[must_use]
    pub const fn starting_hit_points(&self) -> HitPoints {
        HitPoints::new(self.starting_hit_points)
    }

    /// Price of a single tower.
    #[must_use]
    pub const fn tower_cost(&self) -> Coins {
        Coins::new(self.tower_cost)
    }

    /// Reward credited for each destroyed enemy.
    #[must_use]
    pub const fn kill_reward(&self) -> Coins {
        Coins::new(self.kill_reward)
    }
}

/// Statistics applied to every purchased tower.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TowerRules {
    /// Targeting radius in world units.
    pub range: f32,
    /// Seconds a tower waits between shots.
    pub fire_interval_secs: f32,
    /// Cosmetic health displayed above each tower.
    pub health: u32,
}

impl Default for TowerRules {
    fn default() -> Self {
        Self {
            range: 100.0,
            fire_interval_secs: 1.0,
            health: 10,
        }
    }
}

impl TowerRules {
    /// Cooldown applied after each shot.
    #[must_use]
    pub fn fire_interval(&self) -> Duration {
        seconds(self.fire_interval_secs)
    }

    /// Cosmetic tower health.
    #[must_use]
    pub const fn health(&self) -> Health {
        Health::new(self.health)
    }
}

/// Statistics applied to every projectile.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectileRules {
    /// Travel speed in world units per second.
    pub speed: f32,
    /// Distance from an enemy's centre that counts as a hit.
    pub hit_radius: f32,
}

impl Default for ProjectileRules {
    fn default() -> Self {
        Self {
            speed: 400.0,
            hit_radius: 15.0,
        }
    }
}

/// Statistics of a single enemy variant.
///
/// Enemy tables carry no per-field defaults because the two variants differ;
/// a table present in a configuration file must list every field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnemyRules {
    /// Seconds between two spawns of this variant.
    pub spawn_interval_secs: f32,
    /// Walking speed in world units per second.
    pub speed: f32,
    /// Health on spawn.
    pub health: u32,
}

impl EnemyRules {
    /// Stock statistics of the basic enemy.
    #[must_use]
    pub const fn basic() -> Self {
        Self {
            spawn_interval_secs: 2.5,
            speed: 60.0,
            health: 3,
        }
    }

    /// Stock statistics of the shooter enemy.
    #[must_use]
    pub const fn shooter() -> Self {
        Self {
            spawn_interval_secs: 3.0,
            speed: 50.0,
            health: 5,
        }
    }

    /// Time between two spawns of this variant.
    #[must_use]
    pub fn spawn_interval(&self) -> Duration {
        seconds(self.spawn_interval_secs)
    }

    /// Health on spawn.
    #[must_use]
    pub const fn health(&self) -> Health {
        Health::new(self.health)
    }

    fn validate(&self, fields: EnemyFields) -> Result<(), RulesError> {
        positive_interval(fields.spawn_interval, self.spawn_interval_secs)?;
        non_negative(fields.speed, self.speed)?;
        if self.health == 0 {
            return Err(RulesError::ZeroHealth {
                variant: fields.variant,
            });
        }
        Ok(())
    }
}

/// Field paths reported when an enemy table fails validation.
struct EnemyFields {
    variant: &'static str,
    spawn_interval: &'static str,
    speed: &'static str,
}

/// Reasons a rule set may be rejected.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum RulesError {
    /// A distance, speed or radius was negative or not a finite number.
    #[error("{field} must be a finite, non-negative number (received {value})")]
    InvalidQuantity {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// A timer interval was zero, negative or not a finite number.
    #[error("{field} must be a finite number of seconds greater than zero (received {value})")]
    InvalidInterval {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Value that failed validation.
        value: f32,
    },
    /// An enemy variant would spawn already destroyed.
    #[error("{variant}.health must be greater than zero")]
    ZeroHealth {
        /// Table naming the enemy variant.
        variant: &'static str,
    },
    /// Leaks would heal the player instead of hurting them.
    #[error("economy.leak_penalty must not be negative (received {value})")]
    NegativePenalty {
        /// Value that failed validation.
        value: i32,
    },
}

fn non_negative(field: &'static str, value: f32) -> Result<(), RulesError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(RulesError::InvalidQuantity { field, value })
    }
}

fn positive_interval(field: &'static str, value: f32) -> Result<(), RulesError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RulesError::InvalidInterval { field, value })
    }
}

fn seconds(value: f32) -> Duration {
    Duration::try_from_secs_f32(value).unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rules_match_stock_game() {
        let rules = Rules::default();

        assert_eq!(rules.economy.starting_coins(), Coins::new(200));
        assert_eq!(rules.economy.starting_hit_points(), HitPoints::new(200));
        assert_eq!(rules.economy.tower_cost(), Coins::new(50));
        assert_eq!(rules.economy.kill_reward(), Coins::new(20));
        assert_eq!(rules.economy.leak_penalty, 20);
        assert_eq!(rules.tower.fire_interval(), Duration::from_secs(1));
        assert_eq!(
            rules.enemy(EnemyKind::Basic).spawn_interval(),
            Duration::from_millis(2500)
        );
        assert_eq!(
            rules.enemy(EnemyKind::Shooter).spawn_interval(),
            Duration::from_secs(3)
        );
        assert_eq!(rules.enemy(EnemyKind::Basic).health(), Health::new(3));
        assert_eq!(rules.enemy(EnemyKind::Shooter).health(), Health::new(5));
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn zero_spawn_interval_is_rejected() {
        let mut rules = Rules::default();
        rules.shooter_enemy.spawn_interval_secs = 0.0;

        assert_eq!(
            rules.validate(),
            Err(RulesError::InvalidInterval {
                field: "shooter_enemy.spawn_interval_secs",
                value: 0.0,
            })
        );
    }

    #[test]
    fn non_finite_quantities_are_rejected() {
        let mut rules = Rules::default();
        rules.projectile.speed = f32::NAN;

        assert!(matches!(
            rules.validate(),
            Err(RulesError::InvalidQuantity {
                field: "projectile.speed",
                ..
            })
        ));
    }

    #[test]
    fn zero_enemy_health_is_rejected() {
        let mut rules = Rules::default();
        rules.basic_enemy.health = 0;

        assert_eq!(
            rules.validate(),
            Err(RulesError::ZeroHealth {
                variant: "basic_enemy"
            })
        );
    }

    #[test]
    fn negative_interval_converts_to_zero_duration() {
        let rules = TowerRules {
            fire_interval_secs: -1.0,
            ..TowerRules::default()
        };
        assert_eq!(rules.fire_interval(), Duration::ZERO);
    }

    #[test]
    fn rules_survive_bincode_serialization() {
        let mut rules = Rules::default();
        rules.economy.tower_cost = 75;
        rules.shooter_enemy.speed = 42.5;

        let bytes = bincode::serialize(&rules).expect("serialize");
        let restored: Rules = bincode::deserialize(&bytes).expect("deserialize");

        assert_eq!(restored, rules);
    }
}
