//! Target pool: always at least five interactable targets near the player.

use glam::Vec3;
use rand::Rng;

use crate::constants::*;
use crate::scene::{Scene, SceneId, SceneKind, SceneObject};
use crate::world::streaming::ChunkCoord;

#[derive(Debug, Clone, Copy)]
pub struct Target {
    pub id: SceneId,
    pub position: Vec3,
}

#[derive(Default)]
pub struct TargetPool {
    targets: Vec<Target>,
}

impl TargetPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn ids(&self) -> Vec<SceneId> {
        self.targets.iter().map(|t| t.id).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// Spawn one target at a random position in the chunk-sized box above
    /// the player's chunk. Scene rejection is logged and skipped, the pool
    /// tops itself back up on a later tick.
    pub fn spawn_one(&mut self, scene: &mut dyn Scene, rng: &mut impl Rng, chunk: ChunkCoord) {
        let center = chunk.center();
        let position = Vec3::new(
            center.x + rng.random_range(-CHUNK_SIZE / 2.0..CHUNK_SIZE / 2.0),
            rng.random_range(TARGET_MIN_ALTITUDE..TARGET_MAX_ALTITUDE),
            center.z + rng.random_range(-CHUNK_SIZE / 2.0..CHUNK_SIZE / 2.0),
        );
        match scene.add(
            SceneObject::new(SceneKind::Sphere { radius: TARGET_RADIUS }, position)
                .with_color(COLOR_TARGET),
        ) {
            Ok(id) => self.targets.push(Target { id, position }),
            Err(err) => tracing::warn!(%err, "target spawn rejected"),
        }
    }

    /// Top the pool up to the minimum size.
    pub fn replenish(&mut self, scene: &mut dyn Scene, rng: &mut impl Rng, chunk: ChunkCoord) {
        while self.targets.len() < TARGET_POOL_SIZE {
            let before = self.targets.len();
            self.spawn_one(scene, rng, chunk);
            if self.targets.len() == before {
                break; // scene is rejecting adds, try again next tick
            }
        }
    }

    /// Remove a hit target from the scene and the pool together.
    pub fn remove(&mut self, scene: &mut dyn Scene, id: SceneId) -> Option<Target> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        let target = self.targets.swap_remove(index);
        scene.remove(target.id);
        Some(target)
    }

    /// Remove everything, for a world reset.
    pub fn clear(&mut self, scene: &mut dyn Scene) {
        for target in self.targets.drain(..) {
            scene.remove(target.id);
        }
    }
}
