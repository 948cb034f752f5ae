//! Shared-document room sync.
//!
//! A room is one document in a remote store: who is in it, where everyone
//! is, and the latest shot per player. Each player writes only its own
//! keyed entries; everyone reads the whole document and diffs it against
//! locally cached state. Local game state stays authoritative, a failed
//! remote write only means peers briefly see stale data.

use std::sync::Arc;

use chrono::Utc;
use glam::Vec3;
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::net::protocol::PeerId;
use crate::net::sync::RemoteEvent;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShootRecord {
    pub start: Vec3,
    pub end: Vec3,
    /// Milliseconds since the epoch; doubles as the replay-dedup key.
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomDoc {
    pub host: PeerId,
    pub players: Vec<PeerId>,
    pub player_positions: FxHashMap<PeerId, Vec3>,
    pub shoots: FxHashMap<PeerId, ShootRecord>,
    pub created: String,
}

impl RoomDoc {
    pub fn new(host: PeerId) -> Self {
        RoomDoc {
            players: vec![host.clone()],
            host,
            player_positions: FxHashMap::default(),
            shoots: FxHashMap::default(),
            created: Utc::now().to_rfc3339(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room {0} not found")]
    NotFound(String),
    #[error("room {0} already exists")]
    AlreadyExists(String),
}

/// Remote document store seam. A real backend would put I/O behind this.
pub trait RoomStore {
    fn create(&self, room_id: &PeerId, doc: RoomDoc) -> Result<(), RoomError>;
    fn read(&self, room_id: &PeerId) -> Result<RoomDoc, RoomError>;
    fn update(
        &self,
        room_id: &PeerId,
        apply: &mut dyn FnMut(&mut RoomDoc),
    ) -> Result<(), RoomError>;
}

/// In-memory store used by tests and the demo binary. Cloning shares the
/// underlying documents, like handles to one backend.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    rooms: Arc<Mutex<FxHashMap<PeerId, RoomDoc>>>,
}

impl MemoryRoomStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomStore for MemoryRoomStore {
    fn create(&self, room_id: &PeerId, doc: RoomDoc) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock();
        if rooms.contains_key(room_id) {
            return Err(RoomError::AlreadyExists(room_id.to_string()));
        }
        rooms.insert(room_id.clone(), doc);
        Ok(())
    }

    fn read(&self, room_id: &PeerId) -> Result<RoomDoc, RoomError> {
        self.rooms
            .lock()
            .get(room_id)
            .cloned()
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))
    }

    fn update(
        &self,
        room_id: &PeerId,
        apply: &mut dyn FnMut(&mut RoomDoc),
    ) -> Result<(), RoomError> {
        let mut rooms = self.rooms.lock();
        let doc = rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.to_string()))?;
        apply(doc);
        Ok(())
    }
}

/// This player's membership in a room: create/join/leave plus the two
/// own-keyed writes (position and latest shot).
pub struct RoomClient<S: RoomStore> {
    store: S,
    pub player_id: PeerId,
    pub room_id: Option<PeerId>,
}

impl<S: RoomStore> RoomClient<S> {
    pub fn new(store: S, player_id: PeerId) -> Self {
        RoomClient {
            store,
            player_id,
            room_id: None,
        }
    }

    pub fn create_room(&mut self, room_id: PeerId) -> Result<(), RoomError> {
        self.store
            .create(&room_id, RoomDoc::new(self.player_id.clone()))?;
        tracing::info!(room = %room_id, "room created");
        self.room_id = Some(room_id);
        Ok(())
    }

    pub fn join_room(&mut self, room_id: PeerId) -> Result<(), RoomError> {
        let player_id = self.player_id.clone();
        self.store.update(&room_id, &mut |doc| {
            if !doc.players.contains(&player_id) {
                doc.players.push(player_id.clone());
            }
        })?;
        tracing::info!(room = %room_id, "joined room");
        self.room_id = Some(room_id);
        Ok(())
    }

    /// Remove this player's id and keyed entries from the room.
    pub fn leave_room(&mut self) {
        let Some(room_id) = self.room_id.take() else {
            return;
        };
        let player_id = self.player_id.clone();
        let result = self.store.update(&room_id, &mut |doc| {
            doc.players.retain(|p| *p != player_id);
            doc.player_positions.remove(&player_id);
            doc.shoots.remove(&player_id);
        });
        if let Err(err) = result {
            tracing::warn!(%err, "error leaving room");
        }
    }

    pub fn write_position(&self, position: Vec3) -> Result<(), RoomError> {
        let Some(room_id) = &self.room_id else {
            return Ok(()); // not in a room: silently skip
        };
        let player_id = self.player_id.clone();
        self.store.update(room_id, &mut |doc| {
            doc.player_positions.insert(player_id.clone(), position);
        })
    }

    pub fn write_shoot(&self, start: Vec3, end: Vec3) -> Result<(), RoomError> {
        let Some(room_id) = &self.room_id else {
            return Ok(());
        };
        let player_id = self.player_id.clone();
        let record = ShootRecord {
            start,
            end,
            timestamp: Utc::now().timestamp_millis(),
        };
        self.store.update(room_id, &mut |doc| {
            doc.shoots.insert(player_id.clone(), record.clone());
        })
    }

    /// Read the current room document.
    pub fn snapshot(&self) -> Result<Option<RoomDoc>, RoomError> {
        match &self.room_id {
            Some(room_id) => self.store.read(room_id).map(Some),
            None => Ok(None),
        }
    }
}

/// Diffs room snapshots into remote events.
///
/// Joins/leaves come from diffing the `players` array against the cached
/// id set; shots are replayed in every snapshot, so they are deduplicated
/// by per-shooter timestamp. The watcher's own entries are ignored.
pub struct RoomWatcher {
    own_id: PeerId,
    known_players: FxHashSet<PeerId>,
    seen_shoots: FxHashMap<PeerId, i64>,
}

impl RoomWatcher {
    pub fn new(own_id: PeerId) -> Self {
        RoomWatcher {
            own_id,
            known_players: FxHashSet::default(),
            seen_shoots: FxHashMap::default(),
        }
    }

    pub fn poll(&mut self, doc: &RoomDoc) -> Vec<RemoteEvent> {
        let mut events = Vec::new();

        for player in &doc.players {
            if *player != self.own_id && self.known_players.insert(player.clone()) {
                events.push(RemoteEvent::Joined {
                    peer: player.clone(),
                });
            }
        }
        self.known_players.retain(|player| {
            if doc.players.contains(player) {
                true
            } else {
                events.push(RemoteEvent::Left {
                    peer: player.clone(),
                });
                false
            }
        });

        for (player, position) in &doc.player_positions {
            if *player != self.own_id && doc.players.contains(player) {
                events.push(RemoteEvent::Position {
                    peer: player.clone(),
                    position: *position,
                });
            }
        }

        for (player, shoot) in &doc.shoots {
            if *player == self.own_id {
                continue;
            }
            let seen = self.seen_shoots.get(player).copied();
            if seen != Some(shoot.timestamp) {
                self.seen_shoots.insert(player.clone(), shoot.timestamp);
                events.push(RemoteEvent::Shoot {
                    peer: player.clone(),
                    start: shoot.start,
                    end: shoot.end,
                });
            }
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids() -> (PeerId, PeerId) {
        (PeerId::from("hostplayr1"), PeerId::from("guestplyr2"))
    }

    #[test]
    fn test_create_join_leave() {
        let store = MemoryRoomStore::new();
        let (host, guest) = ids();
        let room = PeerId::from("room000001");

        let mut host_client = RoomClient::new(store.clone(), host.clone());
        host_client.create_room(room.clone()).unwrap();

        let mut guest_client = RoomClient::new(store.clone(), guest.clone());
        guest_client.join_room(room.clone()).unwrap();

        let doc = store.read(&room).unwrap();
        assert_eq!(doc.host, host);
        assert_eq!(doc.players, vec![host.clone(), guest.clone()]);

        guest_client.write_position(Vec3::new(1.0, 1.7, 2.0)).unwrap();
        guest_client.leave_room();

        let doc = store.read(&room).unwrap();
        assert_eq!(doc.players, vec![host]);
        assert!(doc.player_positions.is_empty());
    }

    #[test]
    fn test_create_duplicate_room_fails() {
        let store = MemoryRoomStore::new();
        let (host, guest) = ids();
        let room = PeerId::from("room000001");

        let mut a = RoomClient::new(store.clone(), host);
        a.create_room(room.clone()).unwrap();
        let mut b = RoomClient::new(store, guest);
        assert!(matches!(
            b.create_room(room),
            Err(RoomError::AlreadyExists(_))
        ));
    }

    #[test]
    fn test_join_missing_room_fails() {
        let store = MemoryRoomStore::new();
        let (_, guest) = ids();
        let mut client = RoomClient::new(store, guest);
        assert!(matches!(
            client.join_room(PeerId::from("nosuchroom")),
            Err(RoomError::NotFound(_))
        ));
    }

    #[test]
    fn test_watcher_detects_joins_and_leaves() {
        let (host, guest) = ids();
        let mut watcher = RoomWatcher::new(host.clone());

        let mut doc = RoomDoc::new(host.clone());
        assert!(watcher.poll(&doc).is_empty(), "own id must not join");

        doc.players.push(guest.clone());
        let events = watcher.poll(&doc);
        assert_eq!(events, vec![RemoteEvent::Joined { peer: guest.clone() }]);
        assert!(watcher.poll(&doc).is_empty(), "join reported once");

        doc.players.retain(|p| *p != guest);
        let events = watcher.poll(&doc);
        assert_eq!(events, vec![RemoteEvent::Left { peer: guest }]);
    }

    #[test]
    fn test_watcher_dedups_shoots_by_timestamp() {
        let (host, guest) = ids();
        let mut watcher = RoomWatcher::new(host.clone());
        let mut doc = RoomDoc::new(host);
        doc.players.push(guest.clone());
        let _ = watcher.poll(&doc);

        doc.shoots.insert(
            guest.clone(),
            ShootRecord {
                start: Vec3::ZERO,
                end: Vec3::ONE,
                timestamp: 100,
            },
        );
        let events = watcher.poll(&doc);
        assert_eq!(events.len(), 1);
        assert!(watcher.poll(&doc).is_empty(), "same shot must replay once");

        // A new timestamp is a new shot.
        doc.shoots.get_mut(&guest).unwrap().timestamp = 200;
        assert_eq!(watcher.poll(&doc).len(), 1);
    }

    #[test]
    fn test_watcher_ignores_own_entries() {
        let (host, _) = ids();
        let mut watcher = RoomWatcher::new(host.clone());
        let mut doc = RoomDoc::new(host.clone());
        doc.player_positions.insert(host.clone(), Vec3::ONE);
        doc.shoots.insert(
            host,
            ShootRecord {
                start: Vec3::ZERO,
                end: Vec3::ONE,
                timestamp: 1,
            },
        );
        assert!(watcher.poll(&doc).is_empty());
    }
}
