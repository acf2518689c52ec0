//! 2D geometry primitives shared by the light and placement systems.

mod raycast;

pub use raycast::{Collider, Hit, LayerMask, Ray, cast_nearest};

use serde::{Deserialize, Serialize};

/// A 2D vector / world position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };
    pub const UP: Vec2 = Vec2 { x: 0.0, y: 1.0 };
    pub const DOWN: Vec2 = Vec2 { x: 0.0, y: -1.0 };
    pub const LEFT: Vec2 = Vec2 { x: -1.0, y: 0.0 };
    pub const RIGHT: Vec2 = Vec2 { x: 1.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length_sq(self) -> f32 {
        self.dot(self)
    }

    pub fn length(self) -> f32 {
        self.length_sq().sqrt()
    }

    pub fn distance(self, other: Vec2) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for degenerate input.
    pub fn normalized(self) -> Option<Vec2> {
        let len = self.length();
        if len < crate::MIN_DIRECTION_LENGTH {
            None
        } else {
            Some(Vec2::new(self.x / len, self.y / len))
        }
    }

    /// Rotate counter-clockwise by `radians`.
    pub fn rotated(self, radians: f32) -> Vec2 {
        let (sin, cos) = radians.sin_cos();
        Vec2::new(
            self.x * cos - self.y * sin,
            self.x * sin + self.y * cos,
        )
    }

    /// Step from `self` towards `target` by at most `max_step`.
    pub fn move_towards(self, target: Vec2, max_step: f32) -> Vec2 {
        let delta = target - self;
        let dist = delta.length();
        if dist <= max_step || dist == 0.0 {
            target
        } else {
            self + delta * (max_step / dist)
        }
    }
}

impl core::ops::Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl core::ops::Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl core::ops::Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl core::ops::Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Collision shape of a cast target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box.
    Box { center: Vec2, half: Vec2 },
    /// Circle.
    Circle { center: Vec2, radius: f32 },
}

impl Shape {
    pub fn center(&self) -> Vec2 {
        match *self {
            Shape::Box { center, .. } | Shape::Circle { center, .. } => center,
        }
    }

    /// Distance from `point` to the shape surface; negative inside.
    pub fn signed_distance(&self, point: Vec2) -> f32 {
        match *self {
            Shape::Circle { center, radius } => point.distance(center) - radius,
            Shape::Box { center, half } => {
                let d = Vec2::new(
                    (point.x - center.x).abs() - half.x,
                    (point.y - center.y).abs() - half.y,
                );
                let outside = Vec2::new(d.x.max(0.0), d.y.max(0.0)).length();
                let inside = d.x.max(d.y).min(0.0);
                outside + inside
            }
        }
    }

    /// Whether the shape intersects a circle of `radius` around `center`.
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        self.signed_distance(center) <= radius
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_rejects_zero() {
        assert!(Vec2::ZERO.normalized().is_none());
        let unit = Vec2::new(3.0, 4.0).normalized().unwrap();
        assert!((unit.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotated_quarter_turn() {
        let v = Vec2::RIGHT.rotated(core::f32::consts::FRAC_PI_2);
        assert!((v.x - 0.0).abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn move_towards_clamps_at_target() {
        let p = Vec2::ZERO.move_towards(Vec2::new(1.0, 0.0), 5.0);
        assert_eq!(p, Vec2::new(1.0, 0.0));
        let q = Vec2::ZERO.move_towards(Vec2::new(10.0, 0.0), 1.0);
        assert_eq!(q, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn box_signed_distance() {
        let b = Shape::Box {
            center: Vec2::ZERO,
            half: Vec2::new(1.0, 1.0),
        };
        assert!(b.signed_distance(Vec2::new(2.0, 0.0)) - 1.0 < 1e-6);
        assert!(b.signed_distance(Vec2::ZERO) < 0.0);
        assert!(b.overlaps_circle(Vec2::new(2.5, 0.0), 2.0));
        assert!(!b.overlaps_circle(Vec2::new(4.0, 0.0), 2.0));
    }
}
