//! Shadow blocks: destructible occluders, optionally reflective.

use serde::{Deserialize, Serialize};

use crate::consts::{BLOCK_UNLIT_GRACE, MIRROR_UNLIT_SHUTOFF};
use crate::geom::Vec2;
use crate::grid::CellCoord;
use crate::light::{IntensityCurve, LightColor};
use crate::world::LightSink;

/// Stable identifier of a placed block.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct BlockId(pub u32);

impl BlockId {
    pub const fn next(self) -> BlockId {
        BlockId(self.0 + 1)
    }
}

/// Hit-point lifecycle of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockState {
    #[default]
    Healthy,
    Damaged,
    Destroyed,
}

/// A destructible obstacle bound to one grid cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub pos: Vec2,
    /// Half extents of the collision box.
    pub half: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub cell: CellCoord,
    /// Simulation time at placement, for the creation-grace window.
    pub spawned_at: f32,
    pub mirror: Option<Mirror>,
    under_light: bool,
    unlit_time: f32,
    state: BlockState,
}

impl Block {
    pub fn new(
        id: BlockId,
        pos: Vec2,
        half: Vec2,
        max_hp: f32,
        cell: CellCoord,
        spawned_at: f32,
    ) -> Self {
        Self {
            id,
            pos,
            half,
            hp: max_hp,
            max_hp,
            cell,
            spawned_at,
            mirror: None,
            under_light: false,
            unlit_time: 0.0,
            state: BlockState::Healthy,
        }
    }

    pub fn with_mirror(mut self, mirror: Mirror) -> Self {
        self.mirror = Some(mirror);
        self
    }

    pub fn state(&self) -> BlockState {
        self.state
    }

    pub fn is_destroyed(&self) -> bool {
        self.state == BlockState::Destroyed
    }

    pub fn is_reflective(&self) -> bool {
        self.mirror.is_some()
    }

    pub fn is_under_light(&self) -> bool {
        self.under_light
    }

    /// Remaining health as a fraction of maximum.
    pub fn health_fraction(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            self.hp / self.max_hp
        }
    }

    /// Per-tick grace bookkeeping. `exposed` is whether any source
    /// reported hitting the block this tick. The mirror's own grace is
    /// driven separately: only primary light keeps a beam alive.
    pub(crate) fn tick_light_state(&mut self, dt: f32, exposed: bool) {
        if exposed {
            self.unlit_time = 0.0;
            self.under_light = true;
        } else {
            self.unlit_time += dt;
            if self.unlit_time >= BLOCK_UNLIT_GRACE {
                self.under_light = false;
            }
        }
    }

    fn refresh_state(&mut self) {
        self.state = if self.hp <= 0.0 {
            BlockState::Destroyed
        } else if self.hp < self.max_hp {
            BlockState::Damaged
        } else {
            BlockState::Healthy
        };
    }
}

impl LightSink for Block {
    fn receive_light(&mut self, damage: f32, color: LightColor) {
        // Already-destroyed blocks ignore further exposure.
        if self.is_destroyed() {
            return;
        }

        self.under_light = true;
        self.unlit_time = 0.0;

        if color.is_lethal() {
            self.hp = 0.0;
        } else {
            self.hp = (self.hp - damage).max(0.0);
        }
        self.refresh_state();
    }

    fn on_light_exit(&mut self) {
        // Un-lighting is driven by the grace timer in tick_light_state;
        // the exit notification itself is for external listeners.
        tracing::trace!(block = ?self.id, "light exited");
    }
}

/// Reflective extension of a block.
///
/// While energized by a primary, non-lethal source the mirror re-emits a
/// single beam along `beam_dir`; the beam survives brief gaps in exposure
/// up to the shutoff grace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mirror {
    /// Unit direction of the re-emitted beam. Rotatable in 90° steps.
    pub beam_dir: Vec2,
    pub beam_range: f32,
    pub beam_damage: f32,
    pub beam_curve: IntensityCurve,
    /// Color of the light currently being re-emitted.
    pub color: LightColor,
    active: bool,
    unlit_time: f32,
}

impl Mirror {
    pub fn new(beam_dir: Vec2) -> Self {
        Self {
            beam_dir: beam_dir.normalized().unwrap_or(Vec2::RIGHT),
            beam_range: 6.0,
            beam_damage: 1.0,
            beam_curve: IntensityCurve::default(),
            color: LightColor::Yellow,
            active: false,
            unlit_time: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rotate the beam a quarter turn clockwise.
    pub fn rotate(&mut self) -> Vec2 {
        self.beam_dir = Vec2::new(self.beam_dir.y, -self.beam_dir.x);
        self.beam_dir
    }

    /// Point the beam somewhere new; degenerate directions are ignored.
    pub fn set_beam_dir(&mut self, dir: Vec2) {
        if let Some(unit) = dir.normalized() {
            self.beam_dir = unit;
        }
    }

    /// Called when the parent receives qualifying (non-lethal) light.
    pub(crate) fn energize(&mut self, color: LightColor) {
        self.active = true;
        self.unlit_time = 0.0;
        self.color = color;
    }

    /// One tick without qualifying light.
    pub(crate) fn tick_unlit(&mut self, dt: f32) {
        self.unlit_time += dt;
        if self.active && self.unlit_time >= MIRROR_UNLIT_SHUTOFF {
            self.active = false;
        }
    }
}
