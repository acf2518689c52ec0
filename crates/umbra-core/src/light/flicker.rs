//! On/off flicker gate for light sources.

use serde::{Deserialize, Serialize};

use crate::rng::SimRng;

/// Randomized blackout cycling.
///
/// While the gate is off the source casts nothing and deals no damage, but
/// rotation/oscillation phase keeps advancing independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flicker {
    pub enabled: bool,
    /// Min/max seconds the light stays on.
    pub on_secs: (f32, f32),
    /// Min/max seconds the light stays off.
    pub off_secs: (f32, f32),
    timer: f32,
    lit: bool,
}

impl Default for Flicker {
    fn default() -> Self {
        Self {
            enabled: false,
            on_secs: (2.0, 4.0),
            off_secs: (0.3, 1.2),
            timer: 0.0,
            lit: true,
        }
    }
}

impl Flicker {
    pub fn new(on_secs: (f32, f32), off_secs: (f32, f32)) -> Self {
        Self {
            enabled: true,
            on_secs,
            off_secs,
            ..Self::default()
        }
    }

    /// Whether the gate currently lets light through.
    pub fn is_on(&self) -> bool {
        !self.enabled || self.lit
    }

    pub fn advance(&mut self, dt: f32, rng: &mut SimRng) {
        if !self.enabled {
            self.lit = true;
            return;
        }

        self.timer -= dt;
        if self.timer <= 0.0 {
            self.lit = !self.lit;
            let (lo, hi) = if self.lit { self.on_secs } else { self.off_secs };
            self.timer = rng.range_f32(lo, hi);
        }
    }
}
