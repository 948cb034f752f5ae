pub mod generator;
pub mod layout;
pub mod noise;
pub mod sky;
pub mod streaming;

pub use generator::{BuildingPlan, ChunkGenerator, ChunkPlan, FloorPlan};
pub use layout::{Facade, FacadeQuad, build_facade};
pub use noise::NoiseField;
pub use sky::CloudBank;
pub use streaming::{Building, ChunkCoord, Floor, WorldState, WorldStreamer};
