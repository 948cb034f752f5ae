//! Drifting cloud bank. Cosmetic, never evicted.

use glam::Vec3;
use rand::Rng;

use crate::constants::*;
use crate::scene::{Scene, SceneError, SceneId, SceneKind, SceneObject};

struct Cloud {
    id: SceneId,
    position: Vec3,
}

pub struct CloudBank {
    clouds: Vec<Cloud>,
}

impl CloudBank {
    /// Spawn the fixed set of clouds at random positions in a 500-unit
    /// square around the origin.
    pub fn spawn(scene: &mut dyn Scene, rng: &mut impl Rng) -> Result<Self, SceneError> {
        let mut clouds = Vec::with_capacity(CLOUD_COUNT);
        for _ in 0..CLOUD_COUNT {
            let position = Vec3::new(
                rng.random_range(-250.0..250.0),
                rng.random_range(CLOUD_MIN_ALTITUDE..CLOUD_MAX_ALTITUDE),
                rng.random_range(-250.0..250.0),
            );
            let scale = rng.random_range(0.5..1.5);
            let id = scene.add(
                SceneObject::new(SceneKind::Sphere { radius: 5.0 * scale }, position)
                    .with_color(COLOR_CLOUD),
            )?;
            clouds.push(Cloud { id, position });
        }
        Ok(CloudBank { clouds })
    }

    /// Drift eastward, wrapping at the chunk half-width.
    pub fn drift(&mut self, scene: &mut dyn Scene) {
        for cloud in &mut self.clouds {
            cloud.position.x += CLOUD_DRIFT_PER_TICK;
            if cloud.position.x > CHUNK_SIZE / 2.0 {
                cloud.position.x = -CHUNK_SIZE / 2.0;
            }
            scene.set_position(cloud.id, cloud.position);
        }
    }

    pub fn len(&self) -> usize {
        self.clouds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clouds.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::HeadlessScene;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_spawn_count_and_bounds() {
        let mut scene = HeadlessScene::new();
        let mut rng = StdRng::seed_from_u64(3);
        let bank = CloudBank::spawn(&mut scene, &mut rng).unwrap();

        assert_eq!(bank.len(), CLOUD_COUNT);
        assert_eq!(scene.len(), CLOUD_COUNT);
        for cloud in &bank.clouds {
            assert!(cloud.position.y >= CLOUD_MIN_ALTITUDE);
            assert!(cloud.position.y < CLOUD_MAX_ALTITUDE);
            assert!(cloud.position.x.abs() <= 250.0);
            assert!(cloud.position.z.abs() <= 250.0);
        }
    }

    #[test]
    fn test_drift_wraps() {
        let mut scene = HeadlessScene::new();
        let mut rng = StdRng::seed_from_u64(3);
        let mut bank = CloudBank::spawn(&mut scene, &mut rng).unwrap();
        bank.clouds[0].position.x = CHUNK_SIZE / 2.0;

        bank.drift(&mut scene);
        assert_eq!(bank.clouds[0].position.x, -CHUNK_SIZE / 2.0);
        let id = bank.clouds[0].id;
        assert_eq!(scene.get(id).unwrap().position.x, -CHUNK_SIZE / 2.0);
    }
}
