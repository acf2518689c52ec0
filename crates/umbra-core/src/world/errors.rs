//! Error types for the public simulation API.

use thiserror::Error;

use crate::grid::PlacementOutcome;
use crate::light::LightId;

/// Why an ability use was rejected.
#[derive(Debug, Error, PartialEq)]
pub enum AbilityError {
    #[error("ability is not unlocked")]
    Locked,
    #[error("not enough charges: need {needed}, have {available}")]
    NoCharges { needed: u32, available: u32 },
    #[error("cannot place block: {0}")]
    Placement(PlacementOutcome),
    #[error("a flame is already burning")]
    FlameAlreadyActive,
    #[error("player is dead")]
    PlayerDead,
}

/// Errors from loading or saving persistent progress.
#[derive(Debug, Error)]
pub enum ProgressError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed progress file: {0}")]
    Format(#[from] serde_json::Error),
    #[error("no home directory to store progress in")]
    NoHome,
}

/// Errors from direct world manipulation.
#[derive(Debug, Error, PartialEq)]
pub enum WorldError {
    #[error("no such light: {0:?}")]
    UnknownLight(LightId),
    #[error("no such block: {0:?}")]
    UnknownBlock(crate::block::BlockId),
    #[error("block is not reflective: {0:?}")]
    NotReflective(crate::block::BlockId),
}
