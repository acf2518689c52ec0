//! Cone spotlight: an angular fan of rays.

use serde::{Deserialize, Serialize};

use crate::geom::{Collider, LayerMask, Ray, Vec2, cast_nearest};
use crate::light::ExposureMap;

/// Angular fan of rays around a facing direction.
///
/// Constant rotation and oscillation are orthogonal continuous transforms
/// of `dir`; the flicker gate on the owning source suppresses casting but
/// never resets their phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spotlight {
    /// Facing direction. Kept unit length by the motion step.
    pub dir: Vec2,
    /// Full cone aperture in degrees.
    pub cone_angle_deg: f32,
    /// Angular sampling resolution; `ray_count + 1` rays are cast.
    pub ray_count: u32,
    /// Spin continuously at `rotate_speed_deg` per second.
    pub rotate: bool,
    pub rotate_speed_deg: f32,
    /// Swing around the up axis instead of spinning.
    pub oscillate: bool,
    pub osc_range_deg: f32,
    osc_phase_deg: f32,
}

impl Default for Spotlight {
    fn default() -> Self {
        Self {
            dir: Vec2::UP,
            cone_angle_deg: 90.0,
            ray_count: 30,
            rotate: false,
            rotate_speed_deg: 45.0,
            oscillate: false,
            osc_range_deg: 45.0,
            osc_phase_deg: 0.0,
        }
    }
}

impl Spotlight {
    pub fn new(dir: Vec2, cone_angle_deg: f32, ray_count: u32) -> Self {
        Self {
            dir: dir.normalized().unwrap_or(Vec2::UP),
            cone_angle_deg,
            ray_count,
            ..Self::default()
        }
    }

    /// Point the beam somewhere new; degenerate directions are ignored.
    pub fn set_dir(&mut self, dir: Vec2) {
        if let Some(unit) = dir.normalized() {
            self.dir = unit;
        }
    }

    pub(crate) fn advance_motion(&mut self, dt: f32) {
        // Oscillation and constant rotation are independent transforms;
        // oscillation wins when both are on.
        if self.oscillate {
            self.osc_phase_deg += dt * self.rotate_speed_deg;
            let swing = self.osc_phase_deg.to_radians().sin() * self.osc_range_deg;
            self.dir = Vec2::UP.rotated(swing.to_radians());
        } else if self.rotate {
            self.dir = self.dir.rotated((self.rotate_speed_deg * dt).to_radians());
        }
    }

    /// Cast the fan and collect per-target minimum hit distances.
    pub(crate) fn cast(
        &self,
        origin: Vec2,
        range: f32,
        mask: LayerMask,
        scene: &[Collider],
    ) -> ExposureMap {
        let mut exposures = ExposureMap::new();
        let Some(base) = self.dir.normalized() else {
            return exposures;
        };

        let start = -self.cone_angle_deg * 0.5;
        for i in 0..=self.ray_count {
            let t = i as f32 / self.ray_count.max(1) as f32;
            let angle = start + t * self.cone_angle_deg;
            let dir = base.rotated(angle.to_radians());

            let Some(ray) = Ray::new(origin, dir, range) else {
                continue;
            };
            if let Some(hit) = cast_nearest(&ray, scene, mask, &[]) {
                exposures.note(hit.target, hit.distance);
            }
        }
        exposures
    }
}
