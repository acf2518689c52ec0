//! Circular point light: radius overlap, no occlusion.

use serde::{Deserialize, Serialize};

use crate::geom::{Collider, LayerMask, Vec2};
use crate::light::ExposureMap;
use crate::light::motion::Patrol;
use crate::world::TargetId;

/// Omnidirectional light that exposes everything overlapping its radius.
///
/// Unlike the ray-based variants this one is not occluded: a block cannot
/// shadow another block from it. `kill_player` preserves the unconditional
/// kill-on-overlap behavior as a distinct mode from the gradual-damage
/// ring light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointLight {
    pub radius: f32,
    /// Instantly kill the player anywhere inside the radius.
    pub kill_player: bool,
    pub patrol: Patrol,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            radius: 5.0,
            kill_player: true,
            patrol: Patrol::default(),
        }
    }
}

impl PointLight {
    pub fn new(radius: f32) -> Self {
        Self {
            radius,
            ..Self::default()
        }
    }

    /// Collect every overlapping target with its center distance.
    pub(crate) fn cast(
        &self,
        origin: Vec2,
        mask: LayerMask,
        scene: &[Collider],
    ) -> ExposureMap {
        let mut exposures = ExposureMap::new();
        for collider in scene {
            if !mask.intersects(collider.layer) {
                continue;
            }
            if collider.id == TargetId::Player && !self.kill_player {
                continue;
            }
            if collider.shape.overlaps_circle(origin, self.radius) {
                exposures.note(collider.id, origin.distance(collider.shape.center()));
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

    fn scene() -> Vec<Collider> {
        vec![
            Collider {
                id: TargetId::Block(BlockId(1)),
                shape: Shape::Box {
                    center: Vec2::new(3.0, 0.0),
                    half: Vec2::new(0.5, 0.5),
                },
                layer: LayerMask::BLOCKS,
            },
            Collider {
                id: TargetId::Player,
                shape: Shape::Circle {
                    center: Vec2::new(0.0, 4.0),
                    radius: 0.4,
                },
                layer: LayerMask::PLAYER,
            },
        ]
    }

    #[test]
    fn overlap_ignores_occlusion() {
        let light = PointLight::new(6.0);
        let exposures = light.cast(Vec2::ZERO, LayerMask::all(), &scene());
        assert!(exposures.contains(TargetId::Block(BlockId(1))));
        assert!(exposures.contains(TargetId::Player));
        assert_eq!(exposures.distance(TargetId::Block(BlockId(1))), Some(3.0));
    }

    #[test]
    fn out_of_radius_is_untouched() {
        let light = PointLight::new(2.0);
        let exposures = light.cast(Vec2::ZERO, LayerMask::all(), &scene());
        assert!(exposures.is_empty());
    }

    #[test]
    fn kill_player_off_spares_the_player() {
        let mut light = PointLight::new(6.0);
        light.kill_player = false;
        let exposures = light.cast(Vec2::ZERO, LayerMask::all(), &scene());
        assert!(!exposures.contains(TargetId::Player));
        assert!(exposures.contains(TargetId::Block(BlockId(1))));
    }
}
