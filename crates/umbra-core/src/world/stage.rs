//! The stage: every collidable entity in one registry, plus the grid.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use crate::actor::{Flame, Player, Receptor, ReceptorId};
use crate::block::{Block, BlockId};
use crate::geom::{Collider, LayerMask, Shape, Vec2};
use crate::grid::GridMap;

/// Identity of anything a ray can hit. Used as the exposure-ledger key, so
/// it must stay cheap to copy and hash.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum TargetId {
    Player,
    Block(BlockId),
    Receptor(ReceptorId),
    Flame,
}

/// The mutable world state a simulation ticks over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stage {
    pub grid: GridMap,
    pub player: Player,
    blocks: HashMap<BlockId, Block>,
    receptors: HashMap<ReceptorId, Receptor>,
    pub flame: Option<Flame>,
    next_block: BlockId,
    next_receptor: ReceptorId,
}

impl Stage {
    pub fn new(grid: GridMap, player: Player) -> Self {
        Self {
            grid,
            player,
            blocks: HashMap::new(),
            receptors: HashMap::new(),
            flame: None,
            next_block: BlockId(1),
            next_receptor: ReceptorId(1),
        }
    }

    pub fn alloc_block_id(&mut self) -> BlockId {
        let id = self.next_block;
        self.next_block = id.next();
        id
    }

    pub fn insert_block(&mut self, block: Block) {
        self.blocks.insert(block.id, block);
    }

    pub fn remove_block(&mut self, id: BlockId) -> Option<Block> {
        self.blocks.remove(&id)
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.get(&id)
    }

    pub fn block_mut(&mut self, id: BlockId) -> Option<&mut Block> {
        self.blocks.get_mut(&id)
    }

    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Block ids in ascending order, for deterministic iteration.
    pub fn block_ids(&self) -> Vec<BlockId> {
        let mut ids: Vec<_> = self.blocks.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn add_receptor(&mut self, mut make: impl FnMut(ReceptorId) -> Receptor) -> ReceptorId {
        let id = self.next_receptor;
        self.next_receptor = id.next();
        self.receptors.insert(id, make(id));
        id
    }

    pub fn receptor(&self, id: ReceptorId) -> Option<&Receptor> {
        self.receptors.get(&id)
    }

    pub fn receptor_mut(&mut self, id: ReceptorId) -> Option<&mut Receptor> {
        self.receptors.get_mut(&id)
    }

    pub fn receptors(&self) -> impl Iterator<Item = &Receptor> {
        self.receptors.values()
    }

    /// Receptor ids in ascending order, for deterministic iteration.
    pub fn receptor_ids(&self) -> Vec<ReceptorId> {
        let mut ids: Vec<_> = self.receptors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Freeze the current occupancy into a collider list. Every source in
    /// a tick casts against the same snapshot, so mid-tick destruction
    /// never changes what later sources see.
    pub fn build_scene(&self) -> Vec<Collider> {
        let mut scene = Vec::with_capacity(self.blocks.len() + self.receptors.len() + 2);

        for id in self.block_ids() {
            let block = &self.blocks[&id];
            if block.is_destroyed() {
                continue;
            }
            scene.push(Collider {
                id: TargetId::Block(id),
                shape: Shape::Box {
                    center: block.pos,
                    half: block.half,
                },
                layer: LayerMask::BLOCKS,
            });
        }

        for id in self.receptor_ids() {
            let receptor = &self.receptors[&id];
            scene.push(Collider {
                id: TargetId::Receptor(id),
                shape: Shape::Circle {
                    center: receptor.pos,
                    radius: receptor.radius,
                },
                layer: LayerMask::RECEPTORS,
            });
        }

        if self.player.is_alive() {
            scene.push(Collider {
                id: TargetId::Player,
                shape: Shape::Circle {
                    center: self.player.pos,
                    radius: self.player.radius,
                },
                layer: LayerMask::PLAYER,
            });
        }

        if let Some(flame) = &self.flame {
            scene.push(Collider {
                id: TargetId::Flame,
                shape: Shape::Circle {
                    center: flame.pos,
                    radius: flame.radius,
                },
                layer: LayerMask::FLAME,
            });
        }

        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellCoord;
    use crate::light::LightColor;
    use crate::world::LightSink;

    fn stage() -> Stage {
        let mut grid = GridMap::new(1.0, CellCoord::new(0, 0));
        grid.insert_floor([CellCoord::new(0, 0), CellCoord::new(1, 0)]);
        Stage::new(grid, Player::new(Vec2::new(0.5, 0.5)))
    }

    #[test]
    fn scene_excludes_destroyed_blocks() {
        let mut s = stage();
        let id = s.alloc_block_id();
        s.insert_block(Block::new(
            id,
            Vec2::new(1.5, 0.5),
            Vec2::new(0.5, 0.5),
            5.0,
            CellCoord::new(1, 0),
            0.0,
        ));
        assert!(
            s.build_scene()
                .iter()
                .any(|c| c.id == TargetId::Block(id))
        );

        s.block_mut(id).unwrap().receive_light(0.0, LightColor::Red);
        assert!(
            !s.build_scene()
                .iter()
                .any(|c| c.id == TargetId::Block(id))
        );
    }

    #[test]
    fn scene_excludes_dead_player() {
        let mut s = stage();
        assert!(s.build_scene().iter().any(|c| c.id == TargetId::Player));
        s.player.kill();
        assert!(!s.build_scene().iter().any(|c| c.id == TargetId::Player));
    }

    #[test]
    fn block_ids_are_sorted() {
        let mut s = stage();
        let a = s.alloc_block_id();
        let b = s.alloc_block_id();
        s.insert_block(Block::new(
            b,
            Vec2::ZERO,
            Vec2::new(0.5, 0.5),
            5.0,
            CellCoord::new(0, 0),
            0.0,
        ));
        s.insert_block(Block::new(
            a,
            Vec2::ZERO,
            Vec2::new(0.5, 0.5),
            5.0,
            CellCoord::new(1, 0),
            0.0,
        ));
        assert_eq!(s.block_ids(), vec![a, b]);
    }
}
