//! The player avatar: position, spawn anchor, life state.
//!
//! Movement itself belongs to the embedding layer; the core only needs the
//! current position for light queries and the spawn anchor for respawns.

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub spawn_pos: Vec2,
    /// Collision radius used for light queries.
    pub radius: f32,
    alive: bool,
}

impl Player {
    pub fn new(spawn_pos: Vec2) -> Self {
        Self {
            pos: spawn_pos,
            spawn_pos,
            radius: 0.4,
            alive: true,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn kill(&mut self) {
        self.alive = false;
    }

    pub(crate) fn respawn(&mut self) {
        self.pos = self.spawn_pos;
        self.alive = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn respawn_returns_to_spawn_alive() {
        let mut p = Player::new(Vec2::new(1.0, 2.0));
        p.pos = Vec2::new(7.0, 7.0);
        p.kill();
        assert!(!p.is_alive());

        p.respawn();
        assert!(p.is_alive());
        assert_eq!(p.pos, p.spawn_pos);
    }
}
