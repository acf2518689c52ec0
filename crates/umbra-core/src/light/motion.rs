//! Waypoint patrol movement for mobile lights.

use serde::{Deserialize, Serialize};

use crate::consts::PATROL_ARRIVAL_EPSILON;
use crate::geom::Vec2;

/// Moves a light between fixed waypoints at constant speed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Patrol {
    pub waypoints: Vec<Vec2>,
    /// World units per second.
    pub speed: f32,
    /// Reverse at the ends instead of wrapping to the first waypoint.
    pub ping_pong: bool,
    index: usize,
    backwards: bool,
}

impl Patrol {
    pub fn new(waypoints: Vec<Vec2>, speed: f32, ping_pong: bool) -> Self {
        Self {
            waypoints,
            speed,
            ping_pong,
            index: 0,
            backwards: false,
        }
    }

    /// Advance `pos` for one tick, returning the new position.
    pub fn advance(&mut self, pos: Vec2, dt: f32) -> Vec2 {
        if self.waypoints.len() < 2 {
            return pos;
        }

        let target = self.waypoints[self.index];
        let next = pos.move_towards(target, self.speed * dt);

        if next.distance(target) < PATROL_ARRIVAL_EPSILON {
            if self.ping_pong {
                self.step_ping_pong();
            } else {
                self.index = (self.index + 1) % self.waypoints.len();
            }
        }
        next
    }

    fn step_ping_pong(&mut self) {
        let last = self.waypoints.len() - 1;
        if self.backwards {
            if self.index > 0 {
                self.index -= 1;
            } else {
                self.backwards = false;
                self.index += 1;
            }
        } else if self.index < last {
            self.index += 1;
        } else {
            self.backwards = true;
            self.index -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_waypoint_is_stationary() {
        let mut p = Patrol::new(vec![Vec2::ZERO], 2.0, false);
        assert_eq!(p.advance(Vec2::new(1.0, 1.0), 0.5), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn ping_pong_reverses_at_ends() {
        let mut p = Patrol::new(vec![Vec2::ZERO, Vec2::new(1.0, 0.0)], 10.0, true);
        let mut pos = Vec2::ZERO;
        // Long enough to bounce off both ends several times.
        let mut xs = Vec::new();
        for _ in 0..40 {
            pos = p.advance(pos, 0.05);
            xs.push(pos.x);
        }
        assert!(xs.iter().all(|x| (-0.01..=1.01).contains(x)));
        assert!(xs.iter().any(|x| *x > 0.9));
        assert!(xs.iter().any(|x| *x < 0.1));
    }

    #[test]
    fn cyclic_patrol_wraps() {
        let mut p = Patrol::new(
            vec![Vec2::ZERO, Vec2::new(1.0, 0.0), Vec2::new(1.0, 1.0)],
            100.0,
            false,
        );
        let mut pos = Vec2::new(0.0, 1.0);
        for _ in 0..6 {
            pos = p.advance(pos, 1.0);
        }
        // With huge speed we land exactly on successive waypoints.
        assert!(p.waypoints.contains(&pos));
    }
}
