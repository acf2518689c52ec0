//! Persistent player progress: best results per level, unlocked abilities.

use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::ability::AbilityKind;
use crate::world::ProgressError;

fn epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Best recorded result for one level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub stars: u8,
    pub best_time: f32,
    pub deaths: u32,
    pub ability_uses: u32,
    /// Epoch seconds of the run that set this record.
    pub completed_at: u64,
}

/// Everything that survives across sessions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Progress {
    levels: HashMap<String, LevelResult>,
    abilities: HashSet<AbilityKind>,
}

impl Progress {
    pub fn level(&self, name: &str) -> Option<&LevelResult> {
        self.levels.get(name)
    }

    pub fn levels_completed(&self) -> usize {
        self.levels.len()
    }

    pub fn total_stars(&self) -> u32 {
        self.levels.values().map(|r| u32::from(r.stars)).sum()
    }

    pub fn has_ability(&self, kind: AbilityKind) -> bool {
        self.abilities.contains(&kind)
    }

    pub fn grant_ability(&mut self, kind: AbilityKind) {
        self.abilities.insert(kind);
    }

    /// Merge a finished run in, keeping the better stars and the better
    /// time independently. Returns whether anything improved.
    pub fn record(&mut self, level: &str, stars: u8, stats: &crate::score::LevelStats) -> bool {
        let candidate = LevelResult {
            stars,
            best_time: stats.elapsed,
            deaths: stats.deaths,
            ability_uses: stats.ability_uses,
            completed_at: epoch_secs(),
        };
        match self.levels.get_mut(level) {
            None => {
                self.levels.insert(level.to_owned(), candidate);
                true
            }
            Some(best) => {
                let mut improved = false;
                if candidate.stars > best.stars {
                    best.stars = candidate.stars;
                    best.deaths = candidate.deaths;
                    best.ability_uses = candidate.ability_uses;
                    improved = true;
                }
                if candidate.best_time < best.best_time {
                    best.best_time = candidate.best_time;
                    improved = true;
                }
                if improved {
                    best.completed_at = candidate.completed_at;
                }
                improved
            }
        }
    }
}

/// JSON-on-disk persistence for [`Progress`].
#[derive(Debug, Clone)]
pub struct ProgressStore {
    path: PathBuf,
}

impl ProgressStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Platform data dir, e.g. `~/.local/share/umbra/progress.json`.
    pub fn default_path() -> Result<Self, ProgressError> {
        let dir = dirs::data_dir().ok_or(ProgressError::NoHome)?;
        Ok(Self::new(dir.join("umbra").join("progress.json")))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// A missing file is an empty progress, not an error.
    pub fn load(&self) -> Result<Progress, ProgressError> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Progress::default()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self, progress: &Progress) -> Result<(), ProgressError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(progress)?;
        fs::write(&self.path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::LevelStats;

    fn stats(elapsed: f32, deaths: u32) -> LevelStats {
        LevelStats {
            deaths,
            elapsed,
            ability_uses: 3,
        }
    }

    #[test]
    fn record_keeps_best_of_each() {
        let mut p = Progress::default();
        assert!(p.record("l1", 2, &stats(100.0, 2)));

        // Better stars, worse time: stars improve, time stays.
        assert!(p.record("l1", 3, &stats(150.0, 0)));
        let best = p.level("l1").unwrap();
        assert_eq!(best.stars, 3);
        assert!((best.best_time - 100.0).abs() < 1e-6);

        // Worse on both axes: nothing changes.
        assert!(!p.record("l1", 1, &stats(200.0, 5)));
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("progress.json"));
        let p = store.load().unwrap();
        assert_eq!(p.levels_completed(), 0);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ProgressStore::new(dir.path().join("nested").join("progress.json"));

        let mut p = Progress::default();
        p.record("l1", 3, &stats(42.0, 0));
        p.grant_ability(AbilityKind::MirrorBlock);
        store.save(&p).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.level("l1").unwrap().stars, 3);
        assert!(loaded.has_ability(AbilityKind::MirrorBlock));
        assert_eq!(loaded.total_stars(), 3);
    }
}
