#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that aims ready towers at the nearest enemy and fires.

use glam::Vec2;
use medieval_protect_core::{Command, EnemyId, EnemyView, TowerView};

/// Tower targeting system that reuses a scratch buffer to avoid repeated allocations.
#[derive(Debug, Default)]
pub struct TowerTargeting {
    enemy_workspace: Vec<EnemyCandidate>,
}

impl TowerTargeting {
    /// Creates a new tower targeting system with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `Command::FireProjectile` for every ready tower with an enemy in range.
    ///
    /// Towers still cooling down are skipped before any scan. A ready tower
    /// picks the nearest enemy whose distance does not exceed its range; when
    /// several share the minimum distance the one that spawned first wins.
    /// Ready towers without a target stay ready for the next frame.
    pub fn handle(&mut self, towers: &TowerView, enemies: &EnemyView, out: &mut Vec<Command>) {
        if towers.is_empty() || enemies.is_empty() {
            return;
        }

        self.prepare_enemy_workspace(enemies);

        for tower in towers.iter().filter(|tower| tower.ready_in.is_zero()) {
            if let Some(enemy) = self.nearest_within(tower.position, tower.range) {
                out.push(Command::FireProjectile {
                    tower: tower.id,
                    target: enemy,
                });
            }
        }
    }

    fn nearest_within(&self, origin: Vec2, range: f32) -> Option<EnemyId> {
        let mut best: Option<(f32, EnemyId)> = None;
        for candidate in &self.enemy_workspace {
            let distance = origin.distance(candidate.position);
            if distance > range {
                continue;
            }
            // Strict comparison keeps the earliest enemy on ties.
            if best.map_or(true, |(closest, _)| distance < closest) {
                best = Some((distance, candidate.id));
            }
        }
        best.map(|(_, enemy)| enemy)
    }

    fn prepare_enemy_workspace(&mut self, enemies: &EnemyView) {
        self.enemy_workspace.clear();
        self.enemy_workspace.reserve(enemies.len());

        for snapshot in enemies.iter() {
            if snapshot.health.is_depleted() {
                continue;
            }

            self.enemy_workspace.push(EnemyCandidate {
                id: snapshot.id,
                position: snapshot.position,
            });
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct EnemyCandidate {
    id: EnemyId,
    position: Vec2,
}
