//! Seam between the simulation core and the rendering engine.
//!
//! The core never owns renderable resources. It describes objects with
//! [`SceneObject`], hands them to a [`Scene`] and keeps only the returned
//! [`SceneId`] for distance checks and removal requests. A headless
//! in-memory implementation is provided so the simulation runs and is
//! testable without a GPU.

use glam::Vec3;
use rustc_hash::FxHashMap;
use thiserror::Error;

/// Handle to an object owned by the rendering collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SceneId(u64);

impl SceneId {
    /// Scene implementations mint their own handles.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Procedurally painted grayscale pixel grid for floor planes.
#[derive(Debug, Clone, PartialEq)]
pub struct FloorTexture {
    pub size: usize,
    pub pixels: Vec<u8>,
    pub repeat: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneKind {
    Building { width: f32, depth: f32, height: f32 },
    /// Flat quad, used for windows and doors on building facades.
    Quad { width: f32, height: f32 },
    Floor { size: f32, texture: FloorTexture },
    Sphere { radius: f32 },
    Line { start: Vec3, end: Vec3 },
    /// Transient particle burst.
    Burst { particles: u32 },
}

/// Object descriptor handed to the rendering collaborator.
///
/// Positions of parented objects are relative to their parent; removing a
/// parent removes its children.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub kind: SceneKind,
    pub position: Vec3,
    pub yaw: f32,
    pub color: u32,
    pub parent: Option<SceneId>,
}

impl SceneObject {
    pub fn new(kind: SceneKind, position: Vec3) -> Self {
        Self {
            kind,
            position,
            yaw: 0.0,
            color: 0xFFFFFF,
            parent: None,
        }
    }

    pub fn with_color(mut self, color: u32) -> Self {
        self.color = color;
        self
    }

    pub fn with_yaw(mut self, yaw: f32) -> Self {
        self.yaw = yaw;
        self
    }

    pub fn with_parent(mut self, parent: SceneId) -> Self {
        self.parent = Some(parent);
        self
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene is at capacity ({0} objects)")]
    AtCapacity(usize),
    #[error("unknown parent handle {0:?}")]
    UnknownParent(SceneId),
}

/// Camera ray for hit queries.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: SceneId,
    pub distance: f32,
    pub point: Vec3,
}

/// Rendering collaborator interface.
pub trait Scene {
    fn add(&mut self, object: SceneObject) -> Result<SceneId, SceneError>;
    fn remove(&mut self, id: SceneId);
    fn set_position(&mut self, id: SceneId, position: Vec3);
    /// Nearest intersection of `ray` with the candidate objects, if any.
    fn intersect(&self, ray: Ray, candidates: &[SceneId]) -> Option<RayHit>;
}

/// In-memory scene for tests, the demo binary and headless simulation.
pub struct HeadlessScene {
    objects: FxHashMap<SceneId, SceneObject>,
    children: FxHashMap<SceneId, Vec<SceneId>>,
    next_id: u64,
    capacity: Option<usize>,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            objects: FxHashMap::default(),
            children: FxHashMap::default(),
            next_id: 0,
            capacity: None,
        }
    }

    /// Reject adds beyond `limit` live objects. Used to exercise the
    /// rejection/rollback path of chunk realization.
    pub fn with_capacity_limit(limit: usize) -> Self {
        let mut scene = Self::new();
        scene.capacity = Some(limit);
        scene
    }

    pub fn set_capacity_limit(&mut self, limit: Option<usize>) {
        self.capacity = limit;
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: SceneId) -> bool {
        self.objects.contains_key(&id)
    }

    pub fn get(&self, id: SceneId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    pub fn children_of(&self, id: SceneId) -> &[SceneId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    fn remove_recursive(&mut self, id: SceneId) {
        if let Some(children) = self.children.remove(&id) {
            for child in children {
                self.remove_recursive(child);
            }
        }
        if let Some(object) = self.objects.remove(&id) {
            if let Some(parent) = object.parent {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|c| *c != id);
                }
            }
        }
    }
}

impl Default for HeadlessScene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene for HeadlessScene {
    fn add(&mut self, object: SceneObject) -> Result<SceneId, SceneError> {
        if let Some(limit) = self.capacity {
            if self.objects.len() >= limit {
                return Err(SceneError::AtCapacity(limit));
            }
        }
        if let Some(parent) = object.parent {
            if !self.objects.contains_key(&parent) {
                return Err(SceneError::UnknownParent(parent));
            }
        }

        let id = SceneId(self.next_id);
        self.next_id += 1;
        if let Some(parent) = object.parent {
            self.children.entry(parent).or_default().push(id);
        }
        self.objects.insert(id, object);
        Ok(id)
    }

    fn remove(&mut self, id: SceneId) {
        self.remove_recursive(id);
    }

    fn set_position(&mut self, id: SceneId, position: Vec3) {
        if let Some(object) = self.objects.get_mut(&id) {
            object.position = position;
        }
    }

    fn intersect(&self, ray: Ray, candidates: &[SceneId]) -> Option<RayHit> {
        let mut nearest: Option<RayHit> = None;

        for id in candidates {
            let Some(object) = self.objects.get(id) else {
                continue;
            };
            let t = match object.kind {
                SceneKind::Sphere { radius } => {
                    ray_sphere(ray, object.position, radius)
                }
                SceneKind::Building {
                    width,
                    depth,
                    height,
                } => {
                    let half = Vec3::new(width / 2.0, height / 2.0, depth / 2.0);
                    ray_aabb(ray, object.position - half, object.position + half)
                }
                _ => None,
            };

            if let Some(t) = t {
                if nearest.map(|hit| t < hit.distance).unwrap_or(true) {
                    nearest = Some(RayHit {
                        id: *id,
                        distance: t,
                        point: ray.origin + ray.direction * t,
                    });
                }
            }
        }

        nearest
    }
}

fn ray_sphere(ray: Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let t = -b - discriminant.sqrt();
    (t > 0.0).then_some(t)
}

fn ray_aabb(ray: Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let dir = ray.direction[axis];
        let origin = ray.origin[axis];
        if dir.abs() < 1e-8 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let t1 = (min[axis] - origin) / dir;
        let t2 = (max[axis] - origin) / dir;
        t_near = t_near.max(t1.min(t2));
        t_far = t_far.min(t1.max(t2));
    }

    if t_near > t_far || t_far < 0.0 {
        return None;
    }
    Some(if t_near > 0.0 { t_near } else { t_far })
}
