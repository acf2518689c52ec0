//! Light receptors: sensors that reconfigure lights when lit.

use serde::{Deserialize, Serialize};

use crate::consts::RECEPTOR_UNLIT_SHUTOFF;
use crate::geom::Vec2;
use crate::light::{LightColor, LightCommand};
use crate::world::LightSink;

/// Stable identifier of a receptor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ReceptorId(pub u32);

impl ReceptorId {
    pub const fn next(self) -> ReceptorId {
        ReceptorId(self.0 + 1)
    }
}

/// A sensor pad. Any light contact activates it; it stays on through
/// brief exposure gaps, then drops off after the shutoff grace and fires
/// its deactivation commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receptor {
    pub id: ReceptorId,
    pub pos: Vec2,
    pub radius: f32,
    pub on_activate: Vec<LightCommand>,
    pub on_deactivate: Vec<LightCommand>,
    activated: bool,
    unlit_time: f32,
    lit_color: Option<LightColor>,
}

impl Receptor {
    pub fn new(id: ReceptorId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: 0.4,
            on_activate: Vec::new(),
            on_deactivate: Vec::new(),
            activated: false,
            unlit_time: 0.0,
            lit_color: None,
        }
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Color of the light currently holding the receptor on.
    pub fn lit_color(&self) -> Option<LightColor> {
        self.lit_color
    }

    /// One tick without any exposure.
    pub(crate) fn tick_unlit(&mut self, dt: f32) {
        self.unlit_time += dt;
        if self.activated && self.unlit_time >= RECEPTOR_UNLIT_SHUTOFF {
            self.activated = false;
            self.lit_color = None;
        }
    }
}

impl LightSink for Receptor {
    fn receive_light(&mut self, _damage: f32, color: LightColor) {
        self.activated = true;
        self.unlit_time = 0.0;
        self.lit_color = Some(color);
    }

    fn on_light_exit(&mut self) {
        // Deactivation runs on the grace timer, not on exit.
        tracing::trace!(receptor = ?self.id, "light exited");
    }
}
