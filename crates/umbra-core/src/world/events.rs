//! Simulation event feed.
//!
//! Events accumulate during a tick and are drained by the embedding layer
//! (renderer, audio, level script). Nothing inside the core reacts to them.

use serde::{Deserialize, Serialize};

use crate::ability::AbilityKind;
use crate::actor::ReceptorId;
use crate::block::BlockId;
use crate::grid::CellCoord;
use crate::light::LightId;
use crate::world::TargetId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    BlockPlaced {
        block: BlockId,
        cell: CellCoord,
        reflective: bool,
    },
    BlockDestroyed {
        block: BlockId,
        cell: CellCoord,
        /// False when the block died inside its creation grace and the
        /// cell stays marked occupied.
        cell_released: bool,
    },
    MirrorRotated {
        block: BlockId,
        beam_dir: crate::geom::Vec2,
    },
    LightExited {
        light: LightId,
        target: TargetId,
    },
    ReceptorActivated(ReceptorId),
    ReceptorDeactivated(ReceptorId),
    PlayerKilled {
        by: Option<LightId>,
        deaths: u32,
    },
    PlayerRespawned,
    PlayerTeleported {
        to: crate::geom::Vec2,
    },
    FlameSpawned,
    FlameExtinguished {
        corrupted: Option<CellCoord>,
    },
    CellsCorrupted(Vec<CellCoord>),
    AbilityUsed(AbilityKind),
    AbilityUnlocked(AbilityKind),
    LevelCompleted {
        stars: u8,
    },
}

/// FIFO buffer of events raised since the last drain.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct EventQueue {
    events: Vec<Event>,
}

impl EventQueue {
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        core::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_empties_the_queue() {
        let mut q = EventQueue::default();
        q.push(Event::PlayerRespawned);
        q.push(Event::FlameSpawned);
        assert_eq!(q.len(), 2);

        let drained = q.drain();
        assert_eq!(drained.len(), 2);
        assert!(q.is_empty());
    }
}
