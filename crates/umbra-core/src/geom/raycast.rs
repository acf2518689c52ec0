//! Shared raycasting primitive.
//!
//! All light variants funnel through [`cast_nearest`]: given a ray, an
//! occlusion mask and an exclusion list, find the closest eligible target.
//! Excluded targets are skipped even when geometrically closer, which is
//! what keeps reflected beams from re-binding to their own mirror.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use super::{Shape, Vec2};
use crate::world::TargetId;

bitflags! {
    /// Occlusion layers a cast is allowed to hit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LayerMask: u8 {
        const BLOCKS = 0x01;
        const PLAYER = 0x02;
        const RECEPTORS = 0x04;
        const FLAME = 0x08;
    }
}

// Manual serde impl, mask is stored as raw bits.
impl Serialize for LayerMask {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.bits().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for LayerMask {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let bits = u8::deserialize(deserializer)?;
        Ok(LayerMask::from_bits_truncate(bits))
    }
}

/// A bounded ray with a unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec2,
    pub dir: Vec2,
    pub max_range: f32,
}

impl Ray {
    /// Build a ray, normalizing `dir`. Degenerate directions yield `None`
    /// (the caller treats that as "no light cast this tick").
    pub fn new(origin: Vec2, dir: Vec2, max_range: f32) -> Option<Ray> {
        let dir = dir.normalized()?;
        if max_range <= 0.0 {
            return None;
        }
        Some(Ray {
            origin,
            dir,
            max_range,
        })
    }

    /// Endpoint when nothing is hit.
    pub fn endpoint(&self) -> Vec2 {
        self.origin + self.dir * self.max_range
    }
}

/// One entry in the per-tick cast scene.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub id: TargetId,
    pub shape: Shape,
    pub layer: LayerMask,
}

/// Result of a successful cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub target: TargetId,
    pub point: Vec2,
    pub distance: f32,
    pub normal: Vec2,
}

/// Find the nearest qualifying hit along `ray`.
///
/// Targets outside `mask` or listed in `excludes` are invisible to the ray
/// even when closer than the eventual hit.
pub fn cast_nearest(
    ray: &Ray,
    scene: &[Collider],
    mask: LayerMask,
    excludes: &[TargetId],
) -> Option<Hit> {
    let mut best: Option<Hit> = None;

    for collider in scene {
        if !mask.intersects(collider.layer) {
            continue;
        }
        if excludes.contains(&collider.id) {
            continue;
        }

        let intersection = match collider.shape {
            Shape::Box { center, half } => ray_box(ray, center, half),
            Shape::Circle { center, radius } => ray_circle(ray, center, radius),
        };

        if let Some((distance, normal)) = intersection {
            if distance > ray.max_range {
                continue;
            }
            let closer = best.map_or(true, |b| distance < b.distance);
            if closer {
                best = Some(Hit {
                    target: collider.id,
                    point: ray.origin + ray.dir * distance,
                    distance,
                    normal,
                });
            }
        }
    }

    best
}

/// Slab test against an axis-aligned box. Returns entry distance and
/// surface normal. A ray starting inside reports distance 0.
fn ray_box(ray: &Ray, center: Vec2, half: Vec2) -> Option<(f32, Vec2)> {
    let min = center - half;
    let max = center + half;

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut normal = Vec2::ZERO;

    for axis in 0..2 {
        let (origin, dir, lo, hi) = if axis == 0 {
            (ray.origin.x, ray.dir.x, min.x, max.x)
        } else {
            (ray.origin.y, ray.dir.y, min.y, max.y)
        };

        if dir.abs() < 1e-9 {
            if origin < lo || origin > hi {
                return None;
            }
            continue;
        }

        let inv = 1.0 / dir;
        let (mut t0, mut t1) = ((lo - origin) * inv, (hi - origin) * inv);
        let mut axis_normal = if axis == 0 {
            Vec2::new(-dir.signum(), 0.0)
        } else {
            Vec2::new(0.0, -dir.signum())
        };
        if t0 > t1 {
            core::mem::swap(&mut t0, &mut t1);
            axis_normal = -axis_normal;
        }
        if t0 > t_enter {
            t_enter = t0;
            normal = axis_normal;
        }
        t_exit = t_exit.min(t1);
    }

    if t_enter > t_exit || t_exit < 0.0 {
        return None;
    }
    if t_enter < 0.0 {
        // Origin inside the box.
        return Some((0.0, -ray.dir));
    }
    Some((t_enter, normal))
}

/// Quadratic test against a circle.
fn ray_circle(ray: &Ray, center: Vec2, radius: f32) -> Option<(f32, Vec2)> {
    let oc = ray.origin - center;
    if oc.length_sq() < radius * radius {
        return Some((0.0, -ray.dir));
    }

    let b = oc.dot(ray.dir);
    let c = oc.length_sq() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }

    let t = -b - disc.sqrt();
    if t < 0.0 {
        return None;
    }
    let point = ray.origin + ray.dir * t;
    let normal = (point - center).normalized().unwrap_or(-ray.dir);
    Some((t, normal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockId;

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
    fn nearest_hit_wins() {
        let scene = [
            block(1, Vec2::new(4.0, 0.0)),
            block(2, Vec2::new(2.0, 0.0)),
        ];
        let ray = Ray::new(Vec2::ZERO, Vec2::RIGHT, 10.0).unwrap();
        let hit = cast_nearest(&ray, &scene, LayerMask::all(), &[]).unwrap();
        assert_eq!(hit.target, TargetId::Block(BlockId(2)));
        assert!((hit.distance - 1.5).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::LEFT);
    }

    #[test]
    fn excluded_target_is_invisible() {
        let scene = [
            block(1, Vec2::new(4.0, 0.0)),
            block(2, Vec2::new(2.0, 0.0)),
        ];
        let ray = Ray::new(Vec2::ZERO, Vec2::RIGHT, 10.0).unwrap();
        let hit =
            cast_nearest(&ray, &scene, LayerMask::all(), &[TargetId::Block(BlockId(2))]).unwrap();
        assert_eq!(hit.target, TargetId::Block(BlockId(1)));
    }

    #[test]
    fn mask_filters_layers() {
        let scene = [Collider {
            id: TargetId::Player,
            shape: Shape::Circle {
                center: Vec2::new(3.0, 0.0),
                radius: 0.4,
            },
            layer: LayerMask::PLAYER,
        }];
        let ray = Ray::new(Vec2::ZERO, Vec2::RIGHT, 10.0).unwrap();
        assert!(cast_nearest(&ray, &scene, LayerMask::BLOCKS, &[]).is_none());
        assert!(cast_nearest(&ray, &scene, LayerMask::PLAYER, &[]).is_some());
    }

    #[test]
    fn zero_direction_is_rejected() {
        assert!(Ray::new(Vec2::ZERO, Vec2::ZERO, 5.0).is_none());
    }

    #[test]
    fn out_of_range_misses() {
        let scene = [block(1, Vec2::new(8.0, 0.0))];
        let ray = Ray::new(Vec2::ZERO, Vec2::RIGHT, 5.0).unwrap();
        assert!(cast_nearest(&ray, &scene, LayerMask::all(), &[]).is_none());
    }

    #[test]
    fn circle_hit_distance_and_normal() {
        let scene = [Collider {
            id: TargetId::Flame,
            shape: Shape::Circle {
                center: Vec2::new(5.0, 0.0),
                radius: 1.0,
            },
            layer: LayerMask::FLAME,
        }];
        let ray = Ray::new(Vec2::ZERO, Vec2::RIGHT, 10.0).unwrap();
        let hit = cast_nearest(&ray, &scene, LayerMask::all(), &[]).unwrap();
        assert!((hit.distance - 4.0).abs() < 1e-5);
        assert_eq!(hit.normal, Vec2::LEFT);
    }
}
