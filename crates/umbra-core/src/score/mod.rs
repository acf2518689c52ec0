//! Level scoring: per-run stats and the star rating.

pub mod progress;

pub use progress::{LevelResult, Progress, ProgressStore};

use serde::{Deserialize, Serialize};

/// What a single run of a level accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelStats {
    pub deaths: u32,
    pub elapsed: f32,
    pub ability_uses: u32,
}

/// Tier boundaries for each scored dimension. A value at or under the
/// first boundary earns 3 points, the second 2, the third 1, else 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreThresholds {
    pub deaths: [u32; 3],
    pub time_secs: [f32; 3],
    pub ability_uses: [u32; 3],
}

impl Default for ScoreThresholds {
    fn default() -> Self {
        Self {
            deaths: [1, 2, 3],
            time_secs: [60.0, 120.0, 300.0],
            ability_uses: [2, 4, 6],
        }
    }
}

fn tier_u32(value: u32, bounds: [u32; 3]) -> u8 {
    if value <= bounds[0] {
        3
    } else if value <= bounds[1] {
        2
    } else if value <= bounds[2] {
        1
    } else {
        0
    }
}

fn tier_f32(value: f32, bounds: [f32; 3]) -> u8 {
    if value <= bounds[0] {
        3
    } else if value <= bounds[1] {
        2
    } else if value <= bounds[2] {
        1
    } else {
        0
    }
}

impl ScoreThresholds {
    pub fn death_tier(&self, deaths: u32) -> u8 {
        tier_u32(deaths, self.deaths)
    }

    pub fn time_tier(&self, elapsed: f32) -> u8 {
        tier_f32(elapsed, self.time_secs)
    }

    pub fn ability_tier(&self, uses: u32) -> u8 {
        tier_u32(uses, self.ability_uses)
    }

    /// Star rating: the three tier scores averaged and rounded.
    pub fn stars(&self, stats: &LevelStats) -> u8 {
        let total = self.death_tier(stats.deaths)
            + self.time_tier(stats.elapsed)
            + self.ability_tier(stats.ability_uses);
        ((total as f32 / 3.0) + 0.5) as u8
    }
}
