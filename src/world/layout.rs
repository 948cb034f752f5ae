//! Facade layout: window and door placement on building faces.
//!
//! Pure geometry. Offsets are local to the building center; the chunk
//! realization step emits them as scene children of the building object.

use glam::Vec3;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::constants::*;

/// A flat quad on a building face, positioned relative to the building
/// center and rotated to face outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FacadeQuad {
    pub offset: Vec3,
    pub yaw: f32,
    pub width: f32,
    pub height: f32,
}

/// Windows on all four faces plus one door on the +Z face.
#[derive(Debug, Clone, PartialEq)]
pub struct Facade {
    pub windows: Vec<FacadeQuad>,
    pub door: FacadeQuad,
}

/// The four vertical faces, in placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Face {
    South, // +Z
    East,  // +X
    North, // -Z
    West,  // -X
}

const FACES: [Face; 4] = [Face::South, Face::East, Face::North, Face::West];

impl Face {
    fn yaw(self) -> f32 {
        match self {
            Face::South => 0.0,
            Face::East => FRAC_PI_2,
            Face::North => PI,
            Face::West => -FRAC_PI_2,
        }
    }

    /// Horizontal extent of this face.
    fn width(self, building_width: f32, building_depth: f32) -> f32 {
        match self {
            Face::South | Face::North => building_width,
            Face::East | Face::West => building_depth,
        }
    }
}

/// Lay out windows and the door for a building footprint.
///
/// Windows sit on a 3-unit pitch both vertically and horizontally, never
/// extend beyond the face bounds, and never overlap the door on the +Z
/// face.
pub fn build_facade(width: f32, depth: f32, height: f32) -> Facade {
    let door = FacadeQuad {
        offset: Vec3::new(0.0, -height / 2.0 + DOOR_HEIGHT / 2.0, depth / 2.0 + FACADE_OFFSET),
        yaw: 0.0,
        width: DOOR_WIDTH,
        height: DOOR_HEIGHT,
    };

    let bands = (height / WINDOW_PITCH).floor() as i32;
    let mut windows = Vec::new();

    for face in FACES {
        let face_width = face.width(width, depth);
        let slots = (face_width / WINDOW_PITCH).floor() as i32;

        for band in 1..bands {
            let y = band as f32 * WINDOW_PITCH - height / 2.0;
            for slot in 0..slots {
                let along = slot as f32 * WINDOW_PITCH - face_width / 2.0 + WINDOW_PITCH / 2.0;
                let offset = match face {
                    Face::South => Vec3::new(along, y, depth / 2.0 + FACADE_OFFSET),
                    Face::East => Vec3::new(width / 2.0 + FACADE_OFFSET, y, along),
                    Face::North => Vec3::new(along, y, -depth / 2.0 - FACADE_OFFSET),
                    Face::West => Vec3::new(-width / 2.0 - FACADE_OFFSET, y, along),
                };
                let window = FacadeQuad {
                    offset,
                    yaw: face.yaw(),
                    width: WINDOW_WIDTH,
                    height: WINDOW_HEIGHT,
                };
                if face == Face::South && overlaps_door(&window, &door) {
                    continue;
                }
                windows.push(window);
            }
        }
    }

    Facade { windows, door }
}

fn overlaps_door(window: &FacadeQuad, door: &FacadeQuad) -> bool {
    let dx = (window.offset.x - door.offset.x).abs();
    let dy = (window.offset.y - door.offset.y).abs();
    dx < (window.width + door.width) / 2.0 && dy < (window.height + door.height) / 2.0
}
