//! The simulation loop.
//!
//! One `Session` owns the player, the streaming state and the scheduled
//! tasks, and advances them all once per tick. All mutation happens here,
//! synchronously; remote events cross in through a channel drained at the
//! start of a tick.

use crossbeam_channel::Receiver;
use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::constants::*;
use crate::game::input::InputEvent;
use crate::game::player::Player;
use crate::game::targets::TargetPool;
use crate::game::tasks::{Task, TaskQueue};
use crate::net::sync::{Outbound, RemoteEvent, RemotePlayers};
use crate::scene::{Ray, Scene, SceneError, SceneKind, SceneObject};
use crate::world::generator::ChunkGenerator;
use crate::world::sky::CloudBank;
use crate::world::streaming::{ChunkCoord, WorldState, WorldStreamer};

pub struct Session<S: Scene> {
    pub scene: S,
    pub config: GameConfig,
    pub player: Player,
    pub world: WorldState,
    streamer: WorldStreamer,
    pub targets: TargetPool,
    pub tasks: TaskQueue,
    clouds: CloudBank,
    pub remote: RemotePlayers,
    outbound: Box<dyn Outbound>,
    inbound: Receiver<RemoteEvent>,
    rng: StdRng,
    score: u32,
    tick: u64,
    gun_recoil: f32,
}

impl<S: Scene> Session<S> {
    pub fn new(
        mut scene: S,
        config: GameConfig,
        outbound: Box<dyn Outbound>,
        inbound: Receiver<RemoteEvent>,
    ) -> Result<Self, SceneError> {
        let generator = match config.world.rng_seed {
            Some(rng_seed) => ChunkGenerator::with_rng_seed(config.world.seed, rng_seed),
            None => ChunkGenerator::new(config.world.seed),
        };
        let mut rng = match config.world.rng_seed {
            Some(rng_seed) => StdRng::seed_from_u64(rng_seed.wrapping_add(1)),
            None => StdRng::from_os_rng(),
        };
        let clouds = CloudBank::spawn(&mut scene, &mut rng)?;
        let player = Player::new(config.player.spawn);

        tracing::info!(seed = config.world.seed, "session initialized");
        Ok(Session {
            scene,
            player,
            world: WorldState::new(),
            streamer: WorldStreamer::new(generator),
            targets: TargetPool::new(),
            tasks: TaskQueue::new(),
            clouds,
            remote: RemotePlayers::new(),
            outbound,
            inbound,
            rng,
            score: 0,
            tick: 0,
            gun_recoil: 0.0,
            config,
        })
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Gun position relative to the camera, including recoil.
    pub fn gun_offset(&self) -> Vec3 {
        Vec3::new(0.2, -0.2, -0.5 + self.gun_recoil)
    }

    /// Apply one input command. Movement and look take effect immediately;
    /// they only touch session-owned state.
    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::Move(direction) => {
                self.player
                    .step(direction, &self.config.player, &self.world.buildings);
            }
            InputEvent::Look { dx, dy } => {
                self.player.look(dx, dy, self.config.player.mouse_sensitivity);
            }
            InputEvent::Jump => self.player.jump(),
            InputEvent::SetRunning(running) => self.player.running = running,
            InputEvent::Shoot => self.shoot(),
        }
    }

    /// Advance the simulation by one tick.
    pub fn tick(&mut self) {
        self.apply_remote_events();

        self.player.integrate(TICK_DT);
        self.clouds.drift(&mut self.scene);
        self.streamer
            .update(&mut self.world, &mut self.scene, self.player.position);

        for task in self.tasks.drain_due(self.tick) {
            self.run_task(task);
        }

        let chunk = ChunkCoord::from_world(self.player.position);
        self.targets.replenish(&mut self.scene, &mut self.rng, chunk);

        self.outbound.send_position(self.player.position);
        self.tick += 1;
    }

    fn run_task(&mut self, task: Task) {
        match task {
            Task::RespawnTarget => {
                let chunk = ChunkCoord::from_world(self.player.position);
                self.targets.spawn_one(&mut self.scene, &mut self.rng, chunk);
            }
            Task::HideLaser(id) | Task::RemoveEffect(id) => self.scene.remove(id),
            Task::EndRecoil => self.gun_recoil = 0.0,
        }
    }

    fn shoot(&mut self) {
        let start = self.player.position;
        let direction = self.player.look_direction();
        let end = start + direction * SHOT_RANGE;

        self.add_laser(start, end, COLOR_LASER);

        self.gun_recoil = RECOIL_DISTANCE;
        self.tasks.schedule(self.tick + RECOIL_TICKS, Task::EndRecoil);

        let candidates = self.targets.ids();
        if let Some(hit) = self.scene.intersect(Ray::new(start, direction), &candidates) {
            if let Some(target) = self.targets.remove(&mut self.scene, hit.id) {
                self.score += TARGET_SCORE;
                self.spawn_hit_effect(target.position);
                self.tasks
                    .schedule(self.tick + TARGET_RESPAWN_TICKS, Task::RespawnTarget);
                tracing::info!(
                    score = self.score,
                    remaining = self.targets.len(),
                    "target hit"
                );
            }
        }

        self.outbound.send_shoot(start, end);
    }

    fn add_laser(&mut self, start: Vec3, end: Vec3, color: u32) {
        match self.scene.add(
            SceneObject::new(SceneKind::Line { start, end }, start).with_color(color),
        ) {
            Ok(id) => {
                self.tasks
                    .schedule(self.tick + LASER_VISIBLE_TICKS, Task::HideLaser(id));
            }
            Err(err) => tracing::warn!(%err, "laser add rejected"),
        }
    }

    fn spawn_hit_effect(&mut self, position: Vec3) {
        match self.scene.add(
            SceneObject::new(
                SceneKind::Burst {
                    particles: HIT_EFFECT_PARTICLES,
                },
                position,
            )
            .with_color(COLOR_TARGET),
        ) {
            Ok(id) => {
                self.tasks
                    .schedule(self.tick + HIT_EFFECT_TICKS, Task::RemoveEffect(id));
            }
            Err(err) => tracing::warn!(%err, "hit effect add rejected"),
        }
    }

    /// Drain the inbound channel. Events that arrived mid-frame on the
    /// transport thread are applied here, at the tick boundary.
    fn apply_remote_events(&mut self) {
        while let Ok(event) = self.inbound.try_recv() {
            match event {
                RemoteEvent::Position { peer, position } => {
                    self.remote.apply_position(&mut self.scene, &peer, position);
                }
                RemoteEvent::Shoot { peer, start, end } => {
                    tracing::debug!(%peer, "remote shot");
                    self.add_laser(start, end, COLOR_REMOTE_LASER);
                }
                RemoteEvent::Joined { peer } => {
                    tracing::info!(%peer, "player joined the room");
                }
                RemoteEvent::Left { peer } => {
                    self.remote.remove(&mut self.scene, &peer);
                }
            }
        }
    }

    /// Tear the world down: every streamed object, target and avatar is
    /// removed and all pending tasks are cancelled, so no stale respawn
    /// or expiry fires into the fresh world. Streaming rebuilds around
    /// the player on the next tick.
    pub fn reset_world(&mut self) {
        self.world.clear(&mut self.scene);
        self.targets.clear(&mut self.scene);
        self.remote.clear(&mut self.scene);
        self.tasks.clear();
        self.gun_recoil = 0.0;
        tracing::info!("world reset");
    }
}

/// Aim the player at a world position (used by tests and the demo).
pub fn aim_at(player: &mut Player, point: Vec3) {
    let dir = (point - player.position).normalize();
    player.pitch = dir.y.asin();
    player.yaw = (-dir.x).atan2(-dir.z);
}
