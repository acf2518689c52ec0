//! The abyss flame: a short-lived projectile that corrupts the cell it
//! dies on.

use serde::{Deserialize, Serialize};

use crate::consts::FLAME_LIFETIME;
use crate::geom::Vec2;
use crate::light::LightColor;
use crate::world::LightSink;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flame {
    pub pos: Vec2,
    pub radius: f32,
    /// World-units-per-second drift, set by the thrower.
    pub velocity: Vec2,
    age: f32,
    snuffed: bool,
}

impl Flame {
    pub fn new(pos: Vec2, velocity: Vec2) -> Self {
        Self {
            pos,
            radius: 0.25,
            velocity,
            age: 0.0,
            snuffed: false,
        }
    }

    pub fn age(&self) -> f32 {
        self.age
    }

    /// True once the flame should be removed and its cell corrupted.
    pub fn is_out(&self) -> bool {
        self.snuffed || self.age >= FLAME_LIFETIME
    }

    /// Forcibly put the flame out (manual detonation).
    pub fn snuff(&mut self) {
        self.snuffed = true;
    }

    pub(crate) fn advance(&mut self, dt: f32) {
        self.pos = self.pos + self.velocity * dt;
        self.age += dt;
    }
}

impl LightSink for Flame {
    fn receive_light(&mut self, _damage: f32, color: LightColor) {
        // Only red light snuffs a flame.
        if color.is_lethal() {
            self.snuffed = true;
        }
    }

    fn on_light_exit(&mut self) {}
}
