//! Intensity falloff curves.

use serde::{Deserialize, Serialize};

/// Maps normalized proximity (1 at the source, 0 at max range) to a damage
/// multiplier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum IntensityCurve {
    /// Multiplier equals proximity: full at the source, zero at the edge.
    Linear,
    /// Smoothstep ramp, soft near both ends.
    #[default]
    EaseInOut,
    /// Flat multiplier regardless of distance.
    Constant(f32),
    /// Piecewise-linear over `(proximity, multiplier)` keys sorted by
    /// proximity.
    Custom(Vec<(f32, f32)>),
}

impl IntensityCurve {
    /// Evaluate at normalized proximity `t`, clamped to `[0, 1]`.
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            IntensityCurve::Linear => t,
            IntensityCurve::EaseInOut => t * t * (3.0 - 2.0 * t),
            IntensityCurve::Constant(v) => *v,
            IntensityCurve::Custom(keys) => piecewise(keys, t),
        }
    }
}

fn piecewise(keys: &[(f32, f32)], t: f32) -> f32 {
    match keys {
        [] => 1.0,
        [(_, v)] => *v,
        _ => {
            if t <= keys[0].0 {
                return keys[0].1;
            }
            for pair in keys.windows(2) {
                let (t0, v0) = pair[0];
                let (t1, v1) = pair[1];
                if t <= t1 {
                    if t1 - t0 <= f32::EPSILON {
                        return v1;
                    }
                    let frac = (t - t0) / (t1 - t0);
                    return v0 + (v1 - v0) * frac;
                }
            }
            keys[keys.len() - 1].1
        }
    }
}
