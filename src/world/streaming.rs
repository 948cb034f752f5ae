//! Chunk lifecycle: generation, retention and eviction around the player.

use glam::Vec3;
use rustc_hash::FxHashSet;

use crate::constants::*;
use crate::scene::{Scene, SceneError, SceneId, SceneKind, SceneObject};
use crate::world::generator::{ChunkGenerator, ChunkPlan};

/// Integer chunk coordinate. One coordinate covers a CHUNK_SIZE x
/// CHUNK_SIZE world tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    pub fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    pub fn from_world(position: Vec3) -> Self {
        Self {
            cx: (position.x / CHUNK_SIZE).floor() as i32,
            cz: (position.z / CHUNK_SIZE).floor() as i32,
        }
    }

    /// World-space origin (minimum corner) of this chunk.
    pub fn origin(&self) -> Vec3 {
        Vec3::new(self.cx as f32 * CHUNK_SIZE, 0.0, self.cz as f32 * CHUNK_SIZE)
    }

    /// World-space center of this chunk.
    pub fn center(&self) -> Vec3 {
        self.origin() + Vec3::new(CHUNK_SIZE / 2.0, 0.0, CHUNK_SIZE / 2.0)
    }
}

/// Live building, tracked for eviction and collision.
#[derive(Debug, Clone, Copy)]
pub struct Building {
    pub id: SceneId,
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
}

impl Building {
    /// Whether a world-space point lies inside the building's box.
    pub fn contains(&self, point: Vec3) -> bool {
        (point.x - self.position.x).abs() <= self.width / 2.0
            && (point.y - self.position.y).abs() <= self.height / 2.0
            && (point.z - self.position.z).abs() <= self.depth / 2.0
    }
}

/// Live floor plane, tracked for eviction.
#[derive(Debug, Clone, Copy)]
pub struct Floor {
    pub id: SceneId,
    pub position: Vec3,
}

/// Mutable world-streaming state, owned by the session and passed by
/// reference. The generated set only grows; the live lists shrink on
/// eviction.
#[derive(Default)]
pub struct WorldState {
    pub generated: FxHashSet<ChunkCoord>,
    pub buildings: Vec<Building>,
    pub floors: Vec<Floor>,
}

impl WorldState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every live object from the scene and forget all chunks.
    pub fn clear(&mut self, scene: &mut dyn Scene) {
        for building in self.buildings.drain(..) {
            scene.remove(building.id);
        }
        for floor in self.floors.drain(..) {
            scene.remove(floor.id);
        }
        self.generated.clear();
    }
}

/// Streams city chunks around the player.
pub struct WorldStreamer {
    generator: ChunkGenerator,
}

impl WorldStreamer {
    pub fn new(generator: ChunkGenerator) -> Self {
        Self { generator }
    }

    /// One streaming step: realize missing chunks in the 3x3 neighborhood
    /// of the player's chunk, then evict geometry beyond VIEW_DISTANCE.
    pub fn update(&mut self, state: &mut WorldState, scene: &mut dyn Scene, player: Vec3) {
        let center = ChunkCoord::from_world(player);

        for cx in (center.cx - 1)..=(center.cx + 1) {
            for cz in (center.cz - 1)..=(center.cz + 1) {
                let coord = ChunkCoord::new(cx, cz);
                if state.generated.contains(&coord) {
                    continue;
                }
                match self.realize_chunk(state, scene, coord) {
                    Ok(buildings) => {
                        // Mark only on success so a rejected chunk is
                        // retried next tick.
                        state.generated.insert(coord);
                        tracing::debug!(?coord, buildings, "generated city chunk");
                    }
                    Err(err) => {
                        tracing::warn!(?coord, %err, "chunk realization rejected, will retry");
                    }
                }
            }
        }

        self.evict(state, scene, player);
    }

    /// Generate a chunk plan and add it to the scene transactionally:
    /// either every object lands and gets tracked, or everything added so
    /// far is rolled back and nothing is registered.
    fn realize_chunk(
        &mut self,
        state: &mut WorldState,
        scene: &mut dyn Scene,
        coord: ChunkCoord,
    ) -> Result<usize, SceneError> {
        let plan = self.generator.generate_chunk(coord);
        let mut added: Vec<SceneId> = Vec::new();

        let result = Self::add_plan(scene, &plan, &mut added);
        match result {
            Ok((floor, buildings)) => {
                state.floors.push(floor);
                let count = buildings.len();
                state.buildings.extend(buildings);
                Ok(count)
            }
            Err(err) => {
                // Children first, so parents are still present.
                for id in added.into_iter().rev() {
                    scene.remove(id);
                }
                Err(err)
            }
        }
    }

    fn add_plan(
        scene: &mut dyn Scene,
        plan: &ChunkPlan,
        added: &mut Vec<SceneId>,
    ) -> Result<(Floor, Vec<Building>), SceneError> {
        let floor_id = scene.add(SceneObject::new(
            SceneKind::Floor {
                size: plan.floor.size,
                texture: plan.floor.texture.clone(),
            },
            plan.floor.center,
        ))?;
        added.push(floor_id);

        let mut buildings = Vec::with_capacity(plan.buildings.len());
        for building in &plan.buildings {
            let body_id = scene.add(
                SceneObject::new(
                    SceneKind::Building {
                        width: building.width,
                        depth: building.depth,
                        height: building.height,
                    },
                    building.position,
                )
                .with_color(COLOR_BUILDING),
            )?;
            added.push(body_id);

            for window in &building.facade.windows {
                let id = scene.add(
                    SceneObject::new(
                        SceneKind::Quad {
                            width: window.width,
                            height: window.height,
                        },
                        window.offset,
                    )
                    .with_yaw(window.yaw)
                    .with_color(COLOR_WINDOW)
                    .with_parent(body_id),
                )?;
                added.push(id);
            }

            let door = &building.facade.door;
            let id = scene.add(
                SceneObject::new(
                    SceneKind::Quad {
                        width: door.width,
                        height: door.height,
                    },
                    door.offset,
                )
                .with_yaw(door.yaw)
                .with_color(COLOR_DOOR)
                .with_parent(body_id),
            )?;
            added.push(id);

            buildings.push(Building {
                id: body_id,
                position: building.position,
                width: building.width,
                depth: building.depth,
                height: building.height,
            });
        }

        Ok((
            Floor {
                id: floor_id,
                position: plan.floor.center,
            },
            buildings,
        ))
    }

    /// Scene removal and tracking removal happen together, here and
    /// nowhere else.
    fn evict(&mut self, state: &mut WorldState, scene: &mut dyn Scene, player: Vec3) {
        state.buildings.retain(|building| {
            if building.position.distance(player) > VIEW_DISTANCE {
                scene.remove(building.id);
                false
            } else {
                true
            }
        });

        state.floors.retain(|floor| {
            if floor.position.distance(player) > VIEW_DISTANCE {
                scene.remove(floor.id);
                false
            } else {
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeadlessScene;

    fn streamer() -> WorldStreamer {
        WorldStreamer::new(ChunkGenerator::with_rng_seed(2147, 1))
    }

    #[test]
    fn test_first_update_generates_3x3_neighborhood() {
        let mut streamer = streamer();
        let mut state = WorldState::new();
        let mut scene = HeadlessScene::new();

        streamer.update(&mut state, &mut scene, Vec3::new(0.0, EYE_HEIGHT, 0.0));

        assert_eq!(state.generated.len(), 9);
        for cx in -1..=1 {
            for cz in -1..=1 {
                assert!(state.generated.contains(&ChunkCoord::new(cx, cz)));
            }
        }
        assert_eq!(state.floors.len(), 9);
    }

    #[test]
    fn test_lingering_does_not_regenerate() {
        let mut streamer = streamer();
        let mut state = WorldState::new();
        let mut scene = HeadlessScene::new();
        let player = Vec3::new(10.0, EYE_HEIGHT, 10.0);

        streamer.update(&mut state, &mut scene, player);
        let generated = state.generated.clone();
        let floors = state.floors.len();
        let buildings = state.buildings.len();
        let objects = scene.len();

        for _ in 0..10 {
            streamer.update(&mut state, &mut scene, player);
        }

        assert_eq!(state.generated, generated);
        assert_eq!(state.floors.len(), floors);
        assert_eq!(state.buildings.len(), buildings);
        assert_eq!(scene.len(), objects);
    }

    #[test]
    fn test_far_geometry_evicted_within_one_update() {
        let mut streamer = streamer();
        let mut state = WorldState::new();
        let mut scene = HeadlessScene::new();

        streamer.update(&mut state, &mut scene, Vec3::ZERO);
        let origin_floor = state.floors[0].id;

        // Jump far enough that everything around the origin is out of range.
        let far = Vec3::new(2000.0, EYE_HEIGHT, 2000.0);
        streamer.update(&mut state, &mut scene, far);

        assert!(!scene.contains(origin_floor));
        for building in &state.buildings {
            assert!(building.position.distance(far) <= VIEW_DISTANCE);
            assert!(scene.contains(building.id));
        }
        for floor in &state.floors {
            assert!(floor.position.distance(far) <= VIEW_DISTANCE);
        }
        // The generated set is monotonic even though the geometry is gone.
        assert!(state.generated.contains(&ChunkCoord::new(0, 0)));
        assert_eq!(state.generated.len(), 18);
    }

    #[test]
    fn test_walking_across_the_city() {
        let mut streamer = streamer();
        let mut state = WorldState::new();
        let mut scene = HeadlessScene::new();

        let mut player = Vec3::new(0.0, EYE_HEIGHT, 0.0);
        streamer.update(&mut state, &mut scene, player);

        // Walk to chunk (5,5) in small steps.
        while player.x < 550.0 {
            player.x += 10.0;
            player.z += 10.0;
            streamer.update(&mut state, &mut scene, player);
        }

        for cx in 4..=6 {
            for cz in 4..=6 {
                assert!(state.generated.contains(&ChunkCoord::new(cx, cz)));
            }
        }
        // The origin neighborhood is more than VIEW_DISTANCE behind us.
        for building in &state.buildings {
            assert!(building.position.distance(player) <= VIEW_DISTANCE);
        }
        for floor in &state.floors {
            assert!(floor.position.distance(player) <= VIEW_DISTANCE);
        }
    }

    #[test]
    fn test_rejected_chunk_rolls_back_and_retries() {
        let mut streamer = streamer();
        let mut state = WorldState::new();
        // Too small for even one chunk's floor plus facades.
        let mut scene = HeadlessScene::with_capacity_limit(3);
        let player = Vec3::new(0.0, EYE_HEIGHT, 0.0);

        streamer.update(&mut state, &mut scene, player);

        // Rejected chunks stay unmarked, and no partial placements remain:
        // every live scene object is a tracked floor.
        assert!(state.generated.len() < 9);
        assert_eq!(state.buildings.len(), 0);
        assert_eq!(
            scene.len(),
            state.floors.len(),
            "rollback left orphan objects in the scene"
        );

        // Lift the limit: the next tick retries and completes the grid.
        scene.set_capacity_limit(None);
        streamer.update(&mut state, &mut scene, player);
        assert_eq!(state.generated.len(), 9);
        assert_eq!(state.floors.len(), 9);
    }

    #[test]
    fn test_chunk_coord_from_world() {
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(0.0, 0.0, 0.0)),
            ChunkCoord::new(0, 0)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(-0.1, 0.0, 99.9)),
            ChunkCoord::new(-1, 0)
        );
        assert_eq!(
            ChunkCoord::from_world(Vec3::new(550.0, 0.0, -250.0)),
            ChunkCoord::new(5, -3)
        );
        assert_eq!(ChunkCoord::new(5, -3).origin(), Vec3::new(500.0, 0.0, -300.0));
    }
}
