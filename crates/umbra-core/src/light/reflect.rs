//! Reflected beam cast for lit mirror blocks.

use crate::block::BlockId;
use crate::consts::MAX_BOUNCE_DEPTH;
use crate::geom::{Collider, Hit, LayerMask, Ray, Vec2, cast_nearest};
use crate::world::TargetId;

/// Cast a mirror's single reflected ray.
///
/// `depth` is the number of bounces already taken to reach this emitter;
/// a cast at or beyond [`MAX_BOUNCE_DEPTH`] is refused outright rather
/// than recursing. The parent mirror is excluded so the beam can never
/// bind back to its own emitter, whatever the geometry.
pub fn cast_reflection(
    parent: BlockId,
    origin: Vec2,
    dir: Vec2,
    range: f32,
    depth: u8,
    scene: &[Collider],
) -> Option<Hit> {
    if depth >= MAX_BOUNCE_DEPTH {
        tracing::warn!(?parent, depth, "reflection depth cap reached, refusing to cast");
        return None;
    }

    let ray = Ray::new(origin, dir, range)?;
    cast_nearest(&ray, scene, LayerMask::all(), &[TargetId::Block(parent)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Shape;

    fn block(id: u32, center: Vec2) -> Collider {
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
    fn beam_skips_its_own_mirror() {
        // Ray starts inside the parent mirror; the parent must be invisible.
        let scene = [block(1, Vec2::ZERO), block(2, Vec2::new(3.0, 0.0))];
        let hit =
            cast_reflection(BlockId(1), Vec2::ZERO, Vec2::RIGHT, 6.0, 0, &scene).unwrap();
        assert_eq!(hit.target, TargetId::Block(BlockId(2)));
        assert!((hit.distance - 2.5).abs() < 1e-5);
    }

    #[test]
    fn depth_cap_refuses_to_cast() {
        let scene = [block(2, Vec2::new(3.0, 0.0))];
        assert!(
            cast_reflection(BlockId(1), Vec2::ZERO, Vec2::RIGHT, 6.0, MAX_BOUNCE_DEPTH, &scene)
                .is_none()
        );
    }

    #[test]
    fn degenerate_direction_is_a_noop() {
        let scene = [block(2, Vec2::new(3.0, 0.0))];
        assert!(cast_reflection(BlockId(1), Vec2::ZERO, Vec2::ZERO, 6.0, 0, &scene).is_none());
    }
}
