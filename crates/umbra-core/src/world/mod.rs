//! Shared world model: target identity, the stage registry, events, errors.

pub mod errors;
pub mod events;
mod stage;

pub use errors::{AbilityError, ProgressError, WorldError};
pub use events::{Event, EventQueue};
pub use stage::{Stage, TargetId};

use crate::light::LightColor;

/// Anything a light ray can deposit damage into.
///
/// Implementors get exactly one `receive_light` per exposing source per
/// tick, at the minimum distance any of that source's rays reached them,
/// and one `on_light_exit` on the first tick a previously exposing source
/// no longer reaches them.
pub trait LightSink {
    fn receive_light(&mut self, damage: f32, color: LightColor);
    fn on_light_exit(&mut self);
}
