//! Light color classification.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Color kind of a light source.
///
/// Yellow light deals gradual, distance-scaled damage to occluders. Red
/// light destroys occluders outright on any contact and never activates a
/// mirror. The player dies on any ray contact, whatever the color.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum LightColor {
    #[default]
    Yellow,
    Red,
}

impl LightColor {
    /// Whether occluder contact is an instant destroy.
    pub const fn is_lethal(&self) -> bool {
        matches!(self, LightColor::Red)
    }

    pub const fn toggled(&self) -> LightColor {
        match self {
            LightColor::Yellow => LightColor::Red,
            LightColor::Red => LightColor::Yellow,
        }
    }
}
