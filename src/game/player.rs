//! Player state and movement.

use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

use crate::config::PlayerConfig;
use crate::constants::*;
use crate::game::input::MoveDirection;
use crate::world::streaming::Building;

pub struct Player {
    pub position: Vec3,
    /// Body yaw, radians. Zero faces -Z.
    pub yaw: f32,
    /// Camera pitch, radians, clamped to +/- pi/2.
    pub pitch: f32,
    pub running: bool,
    pub is_jumping: bool,
    pub jump_velocity: f32,
}

impl Player {
    pub fn new(spawn: Vec3) -> Self {
        Player {
            position: spawn,
            yaw: 0.0,
            pitch: 0.0,
            running: false,
            is_jumping: false,
            jump_velocity: 0.0,
        }
    }

    pub fn look(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw -= dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-FRAC_PI_2, FRAC_PI_2);
    }

    /// Camera look direction from yaw and pitch.
    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(
            -self.pitch.cos() * self.yaw.sin(),
            self.pitch.sin(),
            -self.pitch.cos() * self.yaw.cos(),
        )
        .normalize()
    }

    /// One movement step along the body-yaw axes. The step is rejected if
    /// the new position would be inside a building.
    pub fn step(&mut self, direction: MoveDirection, config: &PlayerConfig, buildings: &[Building]) {
        let distance = if self.running {
            config.run_step
        } else {
            config.walk_step
        };
        let (sin, cos) = self.yaw.sin_cos();
        let delta = match direction {
            MoveDirection::Forward => Vec3::new(-sin, 0.0, -cos),
            MoveDirection::Backward => Vec3::new(sin, 0.0, cos),
            MoveDirection::Left => Vec3::new(-cos, 0.0, sin),
            MoveDirection::Right => Vec3::new(cos, 0.0, -sin),
        } * distance;

        let candidate = self.position + delta;
        if !buildings.iter().any(|b| b.contains(candidate)) {
            self.position = candidate;
        }
    }

    pub fn jump(&mut self) {
        if !self.is_jumping {
            self.is_jumping = true;
            self.jump_velocity = JUMP_FORCE;
        }
    }

    /// Per-tick vertical integration while airborne.
    pub fn integrate(&mut self, dt: f32) {
        if !self.is_jumping {
            return;
        }
        self.position.y += self.jump_velocity * dt;
        self.jump_velocity += GRAVITY * dt;
        if self.position.y <= EYE_HEIGHT {
            self.position.y = EYE_HEIGHT;
            self.is_jumping = false;
            self.jump_velocity = 0.0;
        }
    }
}
