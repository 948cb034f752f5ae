//! City shooter demo.
//!
//! Runs two headless sessions in one process, synchronized through an
//! in-memory room store: the host creates a room, the guest joins, both
//! walk and shoot for a while, and the guest leaves near the end.

use clap::Parser;
use crossbeam_channel::unbounded;
use rand::SeedableRng;
use rand::rngs::StdRng;

use cityshot::game::session::aim_at;
use cityshot::{
    GameConfig, HeadlessScene, InputEvent, MemoryRoomStore, MoveDirection, PeerId, RoomClient,
    RoomStore, RoomWatcher, Session,
};

/// Procedural city shooter, headless demo
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Noise seed for the building placement mask
    #[arg(long, default_value_t = 2147)]
    seed: u32,

    /// Seed the building type/height draws for a reproducible city
    #[arg(long)]
    rng_seed: Option<u64>,

    /// Number of simulation ticks to run (60 per second)
    #[arg(long, default_value_t = 1200)]
    ticks: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    tracing::info!(seed = args.seed, ticks = args.ticks, "starting city shooter demo");

    let mut config = GameConfig::default();
    config.world.seed = args.seed;
    config.world.rng_seed = args.rng_seed;

    let store = MemoryRoomStore::new();
    let mut id_rng = match args.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let host_id = PeerId::generate(&mut id_rng);
    let guest_id = PeerId::generate(&mut id_rng);
    let room_id = PeerId::generate(&mut id_rng);

    let mut host_client = RoomClient::new(store.clone(), host_id.clone());
    if let Err(err) = host_client.create_room(room_id.clone()) {
        tracing::error!(%err, "could not create room");
        return;
    }
    let mut guest_client = RoomClient::new(store.clone(), guest_id.clone());
    if let Err(err) = guest_client.join_room(room_id.clone()) {
        tracing::error!(%err, "could not join room");
        return;
    }

    let (host_tx, host_rx) = unbounded();
    let (guest_tx, guest_rx) = unbounded();
    let mut host_watcher = RoomWatcher::new(host_id.clone());
    let mut guest_watcher = RoomWatcher::new(guest_id.clone());

    let mut host = Session::new(
        HeadlessScene::new(),
        config.clone(),
        Box::new(host_client),
        host_rx,
    )
    .expect("host session");
    let mut guest = Session::new(HeadlessScene::new(), config, Box::new(guest_client), guest_rx)
        .expect("guest session");

    let guest_leaves_at = args.ticks.saturating_sub(60);
    for tick in 0..args.ticks {
        host.handle_input(InputEvent::Move(MoveDirection::Forward));
        guest.handle_input(InputEvent::Move(MoveDirection::Right));

        if tick % 180 == 0 {
            let first_target = host.targets.iter().next().copied();
            if let Some(target) = first_target {
                aim_at(&mut host.player, target.position);
                host.handle_input(InputEvent::Shoot);
            }
        }
        if tick % 240 == 120 {
            guest.handle_input(InputEvent::Shoot);
        }
        if tick == guest_leaves_at {
            // The guest drops out; the host sees the leave on its next poll.
            let result = store.update(&room_id, &mut |doc| {
                doc.players.retain(|p| *p != guest_id);
                doc.player_positions.remove(&guest_id);
                doc.shoots.remove(&guest_id);
            });
            if let Err(err) = result {
                tracing::warn!(%err, "guest leave failed");
            }
        }

        host.tick();
        guest.tick();

        // Poll the shared document and hand the diffs to each session.
        if let Ok(doc) = store.read(&room_id) {
            for event in host_watcher.poll(&doc) {
                let _ = host_tx.send(event);
            }
            for event in guest_watcher.poll(&doc) {
                let _ = guest_tx.send(event);
            }
        }
    }

    tracing::info!(
        host_score = host.score(),
        guest_score = guest.score(),
        host_chunks = host.world.generated.len(),
        host_buildings = host.world.buildings.len(),
        remote_avatars = host.remote.len(),
        "demo finished"
    );
}
