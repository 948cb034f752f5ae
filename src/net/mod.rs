pub mod protocol;
pub mod room;
pub mod sync;

pub use protocol::{Packet, PeerId, ProtocolError};
pub use room::{MemoryRoomStore, RoomClient, RoomDoc, RoomError, RoomStore, RoomWatcher, ShootRecord};
pub use sync::{
    NullOutbound, Outbound, PacketReceiver, PacketSender, RemoteEvent, RemotePlayers,
    loopback_pair,
};
