// Scene seam shared by the world and game modules
pub mod scene;

// World module with noise, generation and streaming
pub mod world;

// Game module with the player, targets and the simulation loop
pub mod game;

// Network module with room sync and the peer wire codec
pub mod net;

// Other modules
pub mod config;
pub mod constants;

// Re-exports
pub use config::{GameConfig, PlayerConfig, WorldConfig};
pub use constants::*;
pub use game::{InputEvent, MoveDirection, Player, Session, Target, TargetPool, Task, TaskId, TaskQueue};
pub use net::{
    MemoryRoomStore, NullOutbound, Outbound, Packet, PeerId, ProtocolError, RemoteEvent,
    RemotePlayers, RoomClient, RoomDoc, RoomError, RoomStore, RoomWatcher, ShootRecord,
};
pub use scene::{
    FloorTexture, HeadlessScene, Ray, RayHit, Scene, SceneError, SceneId, SceneKind, SceneObject,
};
pub use world::{
    Building, BuildingPlan, ChunkCoord, ChunkGenerator, ChunkPlan, CloudBank, Facade, FacadeQuad,
    Floor, FloorPlan, NoiseField, WorldState, WorldStreamer, build_facade,
};
