//! Light sources and exposure bookkeeping.
//!
//! Every variant follows the same per-tick contract: advance motion and the
//! flicker gate, cast against the frozen scene snapshot, record per-target
//! minimum distances, then let the owning simulation apply damage once per
//! target and reconcile the hit set against the previous tick.

mod color;
mod curve;
mod exposure;
mod flicker;
pub mod motion;
mod point;
pub mod reflect;
mod spotlight;
mod toplight;

pub use color::LightColor;
pub use curve::IntensityCurve;
pub use exposure::{ExposureMap, ExposureTracker};
pub use flicker::Flicker;
pub use point::PointLight;
pub use spotlight::Spotlight;
pub use toplight::TopLight;

use serde::{Deserialize, Serialize};

use crate::geom::{Collider, LayerMask, Vec2};
use crate::rng::SimRng;

/// Stable identifier of a light source.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct LightId(pub u32);

impl LightId {
    pub const fn next(self) -> LightId {
        LightId(self.0 + 1)
    }
}

/// Variant payload of a light source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LightKind {
    Spotlight(Spotlight),
    Point(PointLight),
    TopDown(TopLight),
}

/// A placed light source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightSource {
    pub id: LightId,
    pub pos: Vec2,
    pub color: LightColor,
    /// Damage-per-second scalar before the falloff multiplier.
    pub base_damage: f32,
    /// Max reach of the beam. For circular variants the radius wins.
    pub range: f32,
    pub curve: IntensityCurve,
    pub enabled: bool,
    /// Track the player's position instead of staying put.
    pub follow_player: bool,
    pub mask: LayerMask,
    pub flicker: Flicker,
    pub kind: LightKind,
    #[serde(default)]
    pub(crate) tracker: ExposureTracker,
}

impl LightSource {
    pub fn new(id: LightId, pos: Vec2, color: LightColor, kind: LightKind) -> Self {
        Self {
            id,
            pos,
            color,
            base_damage: 1.0,
            range: 8.0,
            curve: IntensityCurve::default(),
            enabled: true,
            follow_player: false,
            mask: LayerMask::all(),
            flicker: Flicker::default(),
            kind,
            tracker: ExposureTracker::default(),
        }
    }

    /// Whether the source emits anything this tick.
    pub fn is_lit(&self) -> bool {
        self.enabled && self.flicker.is_on()
    }

    /// Effective reach for damage normalization.
    pub fn effective_range(&self) -> f32 {
        match &self.kind {
            LightKind::Spotlight(_) => self.range,
            LightKind::Point(p) => p.radius,
            LightKind::TopDown(t) => t.radius,
        }
    }

    /// Does a ray contact from this source kill the player?
    pub fn kills_player(&self) -> bool {
        match &self.kind {
            LightKind::Point(p) => p.kill_player,
            _ => true,
        }
    }

    /// Motion and flicker phase. Runs even while the gate is off so the
    /// rotation/oscillation phase is never reset by a blackout.
    pub(crate) fn advance(&mut self, dt: f32, rng: &mut SimRng, player_pos: Option<Vec2>) {
        if self.follow_player {
            if let Some(p) = player_pos {
                self.pos = p;
            }
        }

        match &mut self.kind {
            LightKind::Spotlight(s) => s.advance_motion(dt),
            LightKind::Point(p) => self.pos = p.patrol.advance(self.pos, dt),
            LightKind::TopDown(t) => self.pos = t.patrol.advance(self.pos, dt),
        }

        self.flicker.advance(dt, rng);
    }

    /// Cast against a scene snapshot. An unlit source yields nothing.
    pub fn cast(&self, scene: &[Collider]) -> ExposureMap {
        if !self.is_lit() {
            return ExposureMap::new();
        }
        match &self.kind {
            LightKind::Spotlight(s) => s.cast(self.pos, self.range, self.mask, scene),
            LightKind::Point(p) => p.cast(self.pos, self.mask, scene),
            LightKind::TopDown(t) => t.cast(self.pos, self.mask, scene),
        }
    }

    /// Damage one exposure is worth this tick.
    pub fn damage_at(&self, distance: f32, dt: f32) -> f32 {
        let range = self.effective_range();
        if range <= 0.0 {
            return 0.0;
        }
        let proximity = 1.0 - distance / range;
        self.base_damage * self.curve.evaluate(proximity) * dt
    }

    /// Apply a reconfiguration command (receptor/switch driven).
    pub fn apply(&mut self, action: &LightAction) {
        match *action {
            LightAction::SetEnabled(on) => self.enabled = on,
            LightAction::ToggleColor => self.color = self.color.toggled(),
            LightAction::SetFlicker(on) => self.flicker.enabled = on,
            LightAction::SetRange(range) => self.range = range,
            LightAction::SetRotation(on) => {
                if let LightKind::Spotlight(s) = &mut self.kind {
                    s.rotate = on;
                }
            }
            LightAction::SetOscillation { on, range_deg } => {
                if let LightKind::Spotlight(s) = &mut self.kind {
                    s.oscillate = on;
                    if on {
                        s.osc_range_deg = range_deg;
                    }
                }
            }
        }
    }
}

/// One reconfiguration applied to a referenced light when a receptor
/// changes state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightCommand {
    pub light: LightId,
    pub action: LightAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum LightAction {
    SetEnabled(bool),
    ToggleColor,
    SetFlicker(bool),
    SetRotation(bool),
    SetOscillation { on: bool, range_deg: f32 },
    SetRange(f32),
}
