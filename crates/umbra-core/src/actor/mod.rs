//! Non-block inhabitants of the stage: the player, receptors, the flame.

mod flame;
mod player;
mod receptor;

pub use flame::Flame;
pub use player::Player;
pub use receptor::{Receptor, ReceptorId};
