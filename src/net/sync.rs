//! Tick-boundary bridge between the transport and the simulation.
//!
//! Outbound sends are fire-and-forget. Inbound events cross threads only
//! through a channel the session drains at the start of a tick, keeping
//! the single-writer invariant on the shared lists.

use crossbeam_channel::{Receiver, Sender, unbounded};
use glam::Vec3;
use rustc_hash::FxHashMap;

use crate::constants::COLOR_AVATAR;
use crate::net::protocol::{Packet, PeerId};
use crate::net::room::{RoomClient, RoomStore};
use crate::scene::{Scene, SceneId, SceneKind, SceneObject};

/// Remote events applied at the next tick boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteEvent {
    Position { peer: PeerId, position: Vec3 },
    Shoot { peer: PeerId, start: Vec3, end: Vec3 },
    Joined { peer: PeerId },
    Left { peer: PeerId },
}

/// Outbound side of the network collaborator. Best-effort: without an
/// active connection sends are skipped silently, transport errors are
/// logged and dropped.
pub trait Outbound {
    fn send_position(&mut self, position: Vec3);
    fn send_shoot(&mut self, start: Vec3, end: Vec3);
}

/// No connection at all.
pub struct NullOutbound;

impl Outbound for NullOutbound {
    fn send_position(&mut self, _position: Vec3) {}
    fn send_shoot(&mut self, _start: Vec3, _end: Vec3) {}
}

impl<S: RoomStore> Outbound for RoomClient<S> {
    fn send_position(&mut self, position: Vec3) {
        if let Err(err) = self.write_position(position) {
            tracing::warn!(%err, "position write failed, peers will see stale state");
        }
    }

    fn send_shoot(&mut self, start: Vec3, end: Vec3) {
        if let Err(err) = self.write_shoot(start, end) {
            tracing::warn!(%err, "shoot write failed, peers will see stale state");
        }
    }
}

/// Sending half of a peer wire link. Encodes packets with the byte codec.
pub struct PacketSender {
    tx: Sender<Vec<u8>>,
}

impl Outbound for PacketSender {
    fn send_position(&mut self, position: Vec3) {
        let bytes = Packet::Position { position }.to_bytes();
        if self.tx.send(bytes).is_err() {
            tracing::warn!("peer link closed, dropping position update");
        }
    }

    fn send_shoot(&mut self, start: Vec3, end: Vec3) {
        let bytes = Packet::Shoot { start, end }.to_bytes();
        if self.tx.send(bytes).is_err() {
            tracing::warn!("peer link closed, dropping shoot event");
        }
    }
}

/// Receiving half of a peer wire link: decodes pending packets and
/// forwards them as remote events tagged with the sending peer's id.
pub struct PacketReceiver {
    peer: PeerId,
    rx: Receiver<Vec<u8>>,
    out: Sender<RemoteEvent>,
}

impl PacketReceiver {
    /// Drain and decode everything the peer has sent so far.
    pub fn pump(&self) {
        while let Ok(bytes) = self.rx.try_recv() {
            match Packet::from_bytes(&bytes) {
                Ok(Packet::Position { position }) => {
                    let _ = self.out.send(RemoteEvent::Position {
                        peer: self.peer.clone(),
                        position,
                    });
                }
                Ok(Packet::Shoot { start, end }) => {
                    let _ = self.out.send(RemoteEvent::Shoot {
                        peer: self.peer.clone(),
                        start,
                        end,
                    });
                }
                Err(err) => {
                    tracing::warn!(peer = %self.peer, %err, "dropping malformed packet");
                }
            }
        }
    }
}

/// Wire link between two in-process peers, for tests and the demo. Each
/// side gets a sender plus a receiver that decodes the other side's
/// packets into `events`.
pub fn loopback_pair(
    a: PeerId,
    b: PeerId,
    a_events: Sender<RemoteEvent>,
    b_events: Sender<RemoteEvent>,
) -> ((PacketSender, PacketReceiver), (PacketSender, PacketReceiver)) {
    let (a_to_b_tx, a_to_b_rx) = unbounded();
    let (b_to_a_tx, b_to_a_rx) = unbounded();

    let a_side = (
        PacketSender { tx: a_to_b_tx },
        PacketReceiver {
            peer: b,
            rx: b_to_a_rx,
            out: a_events,
        },
    );
    let b_side = (
        PacketSender { tx: b_to_a_tx },
        PacketReceiver {
            peer: a,
            rx: a_to_b_rx,
            out: b_events,
        },
    );
    (a_side, b_side)
}

/// Remote player avatars: one scene sphere per peer, created on the first
/// position update and removed when the peer leaves.
#[derive(Default)]
pub struct RemotePlayers {
    avatars: FxHashMap<PeerId, SceneId>,
}

impl RemotePlayers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.avatars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.avatars.is_empty()
    }

    pub fn avatar(&self, peer: &PeerId) -> Option<SceneId> {
        self.avatars.get(peer).copied()
    }

    pub fn apply_position(&mut self, scene: &mut dyn Scene, peer: &PeerId, position: Vec3) {
        if let Some(id) = self.avatars.get(peer) {
            scene.set_position(*id, position);
            return;
        }
        match scene.add(
            SceneObject::new(SceneKind::Sphere { radius: 0.5 }, position)
                .with_color(COLOR_AVATAR),
        ) {
            Ok(id) => {
                tracing::info!(%peer, "peer avatar created");
                self.avatars.insert(peer.clone(), id);
            }
            Err(err) => tracing::warn!(%peer, %err, "avatar add rejected"),
        }
    }

    pub fn remove(&mut self, scene: &mut dyn Scene, peer: &PeerId) {
        if let Some(id) = self.avatars.remove(peer) {
            scene.remove(id);
            tracing::info!(%peer, "peer left, avatar removed");
        }
    }

    pub fn clear(&mut self, scene: &mut dyn Scene) {
        for (_, id) in self.avatars.drain() {
            scene.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeadlessScene;

    #[test]
    fn test_loopback_roundtrip() {
        let (a_tx, a_rx) = unbounded();
        let (b_tx, b_rx) = unbounded();
        let ((mut a_out, a_in), (mut b_out, b_in)) = loopback_pair(
            PeerId::from("aaaaaaaaa"),
            PeerId::from("bbbbbbbbb"),
            a_tx,
            b_tx,
        );

        a_out.send_position(Vec3::new(1.0, 2.0, 3.0));
        b_out.send_shoot(Vec3::ZERO, Vec3::ONE);
        a_in.pump();
        b_in.pump();

        assert_eq!(
            a_rx.try_recv().unwrap(),
            RemoteEvent::Shoot {
                peer: PeerId::from("bbbbbbbbb"),
                start: Vec3::ZERO,
                end: Vec3::ONE,
            }
        );
        assert_eq!(
            b_rx.try_recv().unwrap(),
            RemoteEvent::Position {
                peer: PeerId::from("aaaaaaaaa"),
                position: Vec3::new(1.0, 2.0, 3.0),
            }
        );
        assert!(a_rx.try_recv().is_err());
    }

    #[test]
    fn test_sends_survive_closed_link() {
        let (a_tx, _) = unbounded();
        let (b_tx, _) = unbounded();
        let ((mut a_out, _), (b_side_out, b_side_in)) = loopback_pair(
            PeerId::from("aaaaaaaaa"),
            PeerId::from("bbbbbbbbb"),
            a_tx,
            b_tx,
        );
        drop(b_side_out);
        drop(b_side_in);

        // The far side is gone; sends are logged and dropped, not panics.
        a_out.send_position(Vec3::ZERO);
        a_out.send_shoot(Vec3::ZERO, Vec3::ONE);
    }

    #[test]
    fn test_avatar_lifecycle() {
        let mut scene = HeadlessScene::new();
        let mut remote = RemotePlayers::new();
        let peer = PeerId::from("bbbbbbbbb");

        remote.apply_position(&mut scene, &peer, Vec3::new(5.0, 1.7, 5.0));
        let id = remote.avatar(&peer).unwrap();
        assert_eq!(scene.get(id).unwrap().position, Vec3::new(5.0, 1.7, 5.0));

        // Second update moves the same avatar.
        remote.apply_position(&mut scene, &peer, Vec3::new(6.0, 1.7, 5.0));
        assert_eq!(remote.len(), 1);
        assert_eq!(scene.get(id).unwrap().position.x, 6.0);

        remote.remove(&mut scene, &peer);
        assert!(remote.is_empty());
        assert!(!scene.contains(id));
    }
}
