// World constants
pub const CHUNK_SIZE: f32 = 100.0;
pub const VIEW_DISTANCE: f32 = 300.0;
pub const BUILDING_GRID_STEP: f32 = 20.0;
pub const BUILDING_NOISE_FREQUENCY: f32 = 0.01;
pub const BUILDING_NOISE_THRESHOLD: f32 = 0.3;
pub const FLOOR_TEXTURE_SIZE: usize = 64;
pub const FLOOR_TEXTURE_REPEAT: u32 = 10;

// Facade layout constants
pub const WINDOW_WIDTH: f32 = 1.0;
pub const WINDOW_HEIGHT: f32 = 1.5;
pub const WINDOW_PITCH: f32 = 3.0;
pub const DOOR_WIDTH: f32 = 2.0;
pub const DOOR_HEIGHT: f32 = 3.0;
pub const FACADE_OFFSET: f32 = 0.1;

// Simulation constants
pub const TICKS_PER_SECOND: u64 = 60;
pub const TICK_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
pub const GRAVITY: f32 = -9.8;
pub const JUMP_FORCE: f32 = 5.0;
pub const EYE_HEIGHT: f32 = 1.7;

// Target constants
pub const TARGET_POOL_SIZE: usize = 5;
pub const TARGET_RADIUS: f32 = 0.5;
pub const TARGET_MIN_ALTITUDE: f32 = 5.0;
pub const TARGET_MAX_ALTITUDE: f32 = 15.0;
pub const TARGET_RESPAWN_TICKS: u64 = 10 * TICKS_PER_SECOND;
pub const TARGET_SCORE: u32 = 100;

// Cloud constants
pub const CLOUD_COUNT: usize = 20;
pub const CLOUD_DRIFT_PER_TICK: f32 = 0.05;
pub const CLOUD_MIN_ALTITUDE: f32 = 50.0;
pub const CLOUD_MAX_ALTITUDE: f32 = 100.0;

// Shooting constants
pub const SHOT_RANGE: f32 = 1000.0;
pub const LASER_VISIBLE_TICKS: u64 = 6; // 100 ms
pub const RECOIL_TICKS: u64 = 3; // 50 ms
pub const HIT_EFFECT_TICKS: u64 = 60; // 1 s
pub const RECOIL_DISTANCE: f32 = 0.05;
pub const HIT_EFFECT_PARTICLES: u32 = 20;

// Colors (0xRRGGBB)
pub const COLOR_BUILDING: u32 = 0xCCCCCC;
pub const COLOR_WINDOW: u32 = 0x87CEFA;
pub const COLOR_DOOR: u32 = 0x8B4513;
pub const COLOR_TARGET: u32 = 0xFF0000;
pub const COLOR_CLOUD: u32 = 0xFFFFFF;
pub const COLOR_LASER: u32 = 0xFF0000;
pub const COLOR_REMOTE_LASER: u32 = 0x00FF00;
pub const COLOR_AVATAR: u32 = 0x00FF00;
