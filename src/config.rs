use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::EYE_HEIGHT;

/// Gameplay tunables that are not world constants.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GameConfig {
    pub player: PlayerConfig,
    #[serde(default)]
    pub world: WorldConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            world: WorldConfig::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PlayerConfig {
    pub mouse_sensitivity: f32,
    pub walk_step: f32,
    pub run_step: f32,
    pub spawn: Vec3,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            mouse_sensitivity: 0.002,
            walk_step: 0.5,
            run_step: 1.0,
            spawn: Vec3::new(0.0, EYE_HEIGHT, 0.0),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WorldConfig {
    pub seed: u32,
    /// Seed for the building type/height draws. `None` keeps the original
    /// behavior of a fresh OS-seeded generator per session.
    pub rng_seed: Option<u64>,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 2147,
            rng_seed: None,
        }
    }
}
