//! End-to-end: two sessions in one room, synchronized through the
//! shared-document store.

use crossbeam_channel::unbounded;
use glam::Vec3;

use cityshot::{
    GameConfig, HeadlessScene, InputEvent, MemoryRoomStore, MoveDirection, PeerId, RoomClient,
    RoomStore, RoomWatcher, Session, TARGET_POOL_SIZE,
};

fn config() -> GameConfig {
    let mut config = GameConfig::default();
    config.world.rng_seed = Some(11);
    config
}

#[test]
fn test_two_sessions_share_a_room() {
    let store = MemoryRoomStore::new();
    let host_id = PeerId::from("hostplayr1");
    let guest_id = PeerId::from("guestplyr2");
    let room_id = PeerId::from("room000001");

    let mut host_client = RoomClient::new(store.clone(), host_id.clone());
    host_client.create_room(room_id.clone()).unwrap();
    let mut guest_client = RoomClient::new(store.clone(), guest_id.clone());
    guest_client.join_room(room_id.clone()).unwrap();

    let (host_tx, host_rx) = unbounded();
    let (guest_tx, guest_rx) = unbounded();
    let mut host_watcher = RoomWatcher::new(host_id.clone());
    let mut guest_watcher = RoomWatcher::new(guest_id.clone());

    let mut host = Session::new(
        HeadlessScene::new(),
        config(),
        Box::new(host_client),
        host_rx,
    )
    .unwrap();
    let mut guest = Session::new(
        HeadlessScene::new(),
        config(),
        Box::new(guest_client),
        guest_rx,
    )
    .unwrap();

    // A few synchronized ticks: both move, the guest shoots once.
    for tick in 0..10 {
        host.handle_input(InputEvent::Move(MoveDirection::Forward));
        guest.handle_input(InputEvent::Move(MoveDirection::Right));
        if tick == 5 {
            guest.player.pitch = -std::f32::consts::FRAC_PI_2;
            guest.handle_input(InputEvent::Shoot);
        }

        host.tick();
        guest.tick();

        let doc = store.read(&room_id).unwrap();
        for event in host_watcher.poll(&doc) {
            host_tx.send(event).unwrap();
        }
        for event in guest_watcher.poll(&doc) {
            guest_tx.send(event).unwrap();
        }
    }
    // One more tick to apply the last events.
    host.tick();
    guest.tick();

    // Both ended up with the other's avatar at its last written position.
    let guest_avatar = host.remote.avatar(&guest_id).expect("guest avatar on host");
    let host_avatar = guest.remote.avatar(&host_id).expect("host avatar on guest");
    let guest_pos = host.scene.get(guest_avatar).unwrap().position;
    let host_pos = guest.scene.get(host_avatar).unwrap().position;
    assert!((guest_pos - guest.player.position).length() < 1.0);
    assert!((host_pos - host.player.position).length() < 1.0);

    // Both worlds streamed independently and kept their target pools.
    assert_eq!(host.world.generated.len(), 9);
    assert_eq!(guest.world.generated.len(), 9);
    assert!(host.targets.len() >= TARGET_POOL_SIZE);
    assert!(guest.targets.len() >= TARGET_POOL_SIZE);

    // The guest leaves: the host drops the avatar on its next tick.
    let doc_before = store.read(&room_id).unwrap();
    assert!(doc_before.shoots.contains_key(&guest_id));
    store
        .update(&room_id, &mut |doc| {
            doc.players.retain(|p| *p != guest_id);
            doc.player_positions.remove(&guest_id);
            doc.shoots.remove(&guest_id);
        })
        .unwrap();
    let doc = store.read(&room_id).unwrap();
    for event in host_watcher.poll(&doc) {
        host_tx.send(event).unwrap();
    }
    host.tick();
    assert!(host.remote.avatar(&guest_id).is_none());
    assert!(!host.scene.contains(guest_avatar));
}

#[test]
fn test_positions_round_trip_through_the_document() {
    let store = MemoryRoomStore::new();
    let host_id = PeerId::from("hostplayr1");
    let room_id = PeerId::from("room000001");

    let mut client = RoomClient::new(store.clone(), host_id.clone());
    client.create_room(room_id.clone()).unwrap();
    client.write_position(Vec3::new(3.0, 1.7, -9.0)).unwrap();

    let doc = store.read(&room_id).unwrap();
    assert_eq!(
        doc.player_positions.get(&host_id),
        Some(&Vec3::new(3.0, 1.7, -9.0))
    );
    assert_eq!(doc.players, vec![host_id]);
}
