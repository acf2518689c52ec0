//! Top-down ceiling light: an occluded 360° ring of rays.

use serde::{Deserialize, Serialize};

use crate::geom::{Collider, LayerMask, Ray, Vec2, cast_nearest};
use crate::light::ExposureMap;
use crate::light::motion::Patrol;

/// Ceiling-mounted circular light sampled as a full ring of rays, so
/// nearby blocks cast shadows within the disc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopLight {
    pub radius: f32,
    /// Ring sampling resolution; `resolution + 1` rays are cast.
    pub resolution: u32,
    pub patrol: Patrol,
}

impl Default for TopLight {
    fn default() -> Self {
        Self {
            radius: 4.0,
            resolution: 48,
            patrol: Patrol::default(),
        }
    }
}

impl TopLight {
    pub fn new(radius: f32, resolution: u32) -> Self {
        Self {
            radius,
            resolution,
            ..Self::default()
        }
    }

    pub(crate) fn cast(
        &self,
        origin: Vec2,
        mask: LayerMask,
        scene: &[Collider],
    ) -> ExposureMap {
        let mut exposures = ExposureMap::new();
        let steps = self.resolution.max(3);
        for i in 0..=steps {
            let angle = i as f32 * core::f32::consts::TAU / steps as f32;
            let dir = Vec2::new(angle.cos(), angle.sin());
            let Some(ray) = Ray::new(origin, dir, self.radius) else {
                continue;
            };
            if let Some(hit) = cast_nearest(&ray, scene, mask, &[]) {
                exposures.note(hit.target, hit.distance);
            }
        }
        exposures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;
    use crate::geom::Shape;
    use crate::world::TargetId;

    fn wall(id: u32, center: Vec2) -> Collider {
        Collider {
            id: TargetId::Block(BlockId(id)),
            shape: Shape::Box {
                center,
                half: Vec2::new(0.5, 0.5),
            },
            layer: LayerMask::BLOCKS,
        }
    }

    #[test]
    fn ring_hits_in_every_direction() {
        let light = TopLight::new(6.0, 64);
        let scene = [wall(1, Vec2::new(3.0, 0.0)), wall(2, Vec2::new(-3.0, 0.0))];
        let exposures = light.cast(Vec2::ZERO, LayerMask::all(), &scene);
        assert!(exposures.contains(TargetId::Block(BlockId(1))));
        assert!(exposures.contains(TargetId::Block(BlockId(2))));
    }

    #[test]
    fn ring_is_occluded_unlike_point_light() {
        let light = TopLight::new(10.0, 128);
        // Far block sits exactly behind the near one.
        let scene = [wall(1, Vec2::new(3.0, 0.0)), wall(2, Vec2::new(6.0, 0.0))];
        let exposures = light.cast(Vec2::ZERO, LayerMask::all(), &scene);
        assert!(exposures.contains(TargetId::Block(BlockId(1))));
        assert!(!exposures.contains(TargetId::Block(BlockId(2))));
    }
}
