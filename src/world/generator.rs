//! City chunk generation.
//!
//! A chunk plan is pure data: one floor descriptor plus zero or more
//! building placements. Realizing a plan against a scene is the streaming
//! controller's job, so generation itself cannot fail.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::*;
use crate::scene::FloorTexture;
use crate::world::layout::{self, Facade};
use crate::world::noise::NoiseField;
use crate::world::streaming::ChunkCoord;

/// Fixed table of building size classes.
#[derive(Debug, Clone, Copy)]
struct BuildingType {
    width: f32,
    depth: f32,
    min_height: f32,
    max_height: f32,
}

const BUILDING_TYPES: [BuildingType; 3] = [
    BuildingType { width: 8.0, depth: 8.0, min_height: 15.0, max_height: 40.0 },
    BuildingType { width: 12.0, depth: 12.0, min_height: 25.0, max_height: 60.0 },
    BuildingType { width: 16.0, depth: 16.0, min_height: 35.0, max_height: 80.0 },
];

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingPlan {
    /// World position of the building center (y = height / 2).
    pub position: Vec3,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    pub facade: Facade,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloorPlan {
    pub center: Vec3,
    pub size: f32,
    pub texture: FloorTexture,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChunkPlan {
    pub coord: ChunkCoord,
    pub floor: FloorPlan,
    pub buildings: Vec<BuildingPlan>,
}

/// Generates city chunk plans.
///
/// Building eligibility comes from the seeded noise mask and is stable per
/// seed. The type and height draws come from `rng`, which is OS-seeded by
/// default, so regenerating a coordinate gives a different building mix —
/// the streaming controller must never regenerate a realized chunk.
pub struct ChunkGenerator {
    noise: NoiseField,
    rng: StdRng,
    pub seed: u32,
}

impl ChunkGenerator {
    pub fn new(seed: u32) -> Self {
        ChunkGenerator {
            noise: NoiseField::new(seed),
            rng: StdRng::from_os_rng(),
            seed,
        }
    }

    /// Seed the type/height draws as well, for reproducible generation.
    pub fn with_rng_seed(seed: u32, rng_seed: u64) -> Self {
        ChunkGenerator {
            noise: NoiseField::new(seed),
            rng: StdRng::seed_from_u64(rng_seed),
            seed,
        }
    }

    pub fn noise(&self) -> &NoiseField {
        &self.noise
    }

    pub fn generate_chunk(&mut self, coord: ChunkCoord) -> ChunkPlan {
        let origin = coord.origin();

        let floor = FloorPlan {
            center: Vec3::new(
                origin.x + CHUNK_SIZE / 2.0,
                0.0,
                origin.z + CHUNK_SIZE / 2.0,
            ),
            size: CHUNK_SIZE,
            texture: self.paint_floor_texture(),
        };

        // Candidate cells on a fixed grid, x-major so that the RNG draw
        // order is stable for a given coordinate.
        let mut buildings = Vec::new();
        let cells = (CHUNK_SIZE / BUILDING_GRID_STEP) as i32;
        for ix in 0..cells {
            let x = origin.x + ix as f32 * BUILDING_GRID_STEP;
            for iz in 0..cells {
                let z = origin.z + iz as f32 * BUILDING_GRID_STEP;
                if !self.noise.is_building_site(x, z) {
                    continue;
                }
                let ty = BUILDING_TYPES[self.rng.random_range(0..BUILDING_TYPES.len())];
                let height = self.rng.random_range(ty.min_height..ty.max_height);
                buildings.push(BuildingPlan {
                    position: Vec3::new(x, height / 2.0, z),
                    width: ty.width,
                    depth: ty.depth,
                    height,
                    facade: layout::build_facade(ty.width, ty.depth, height),
                });
            }
        }

        ChunkPlan {
            coord,
            floor,
            buildings,
        }
    }

    /// 64x64 checkerboard-noise pixel grid, each pixel independently gray
    /// 100 or 120, tiled 10x10 across the floor plane.
    fn paint_floor_texture(&mut self) -> FloorTexture {
        let mut pixels = vec![0u8; FLOOR_TEXTURE_SIZE * FLOOR_TEXTURE_SIZE];
        for pixel in &mut pixels {
            *pixel = if self.rng.random_bool(0.5) { 100 } else { 120 };
        }
        FloorTexture {
            size: FLOOR_TEXTURE_SIZE,
            pixels,
            repeat: FLOOR_TEXTURE_REPEAT,
        }
    }
}
