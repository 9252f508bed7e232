use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Persisted game state.
///
/// Serialized as `{"current_level": <int>, "scores": {"<index>": <moves>}}`.
/// Score keys are decimal strings of zero-based level indices; an absent key
/// means no recorded score for that level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveData {
    #[serde(default)]
    pub current_level: usize,
    #[serde(default)]
    pub scores: HashMap<String, u32>,
}

/// Where game state is persisted. Injected into [`Progress`] so tests and
/// no-save sessions can run against an in-memory store.
pub trait ScoreStore {
    /// Load the stored state, falling back to defaults when nothing usable
    /// is stored.
    fn load(&mut self) -> SaveData;

    /// Persist the given state.
    fn save(&mut self, data: &SaveData) -> io::Result<()>;
}

/// File-backed store using the JSON save format.
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }
}

impl ScoreStore for FileStore {
    fn load(&mut self) -> SaveData {
        // A missing or corrupt save file starts a fresh game.
        match fs::read_to_string(&self.path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(_) => SaveData::default(),
        }
    }

    fn save(&mut self, data: &SaveData) -> io::Result<()> {
        let contents = serde_json::to_string(data)?;
        fs::write(&self.path, contents)
    }
}

/// In-memory store. Used by tests and by `--no-save` sessions; nothing
/// survives the process.
#[derive(Debug, Default)]
pub struct MemStore {
    data: Option<SaveData>,
    pub save_count: usize,
}

impl ScoreStore for MemStore {
    fn load(&mut self) -> SaveData {
        self.data.clone().unwrap_or_default()
    }

    fn save(&mut self, data: &SaveData) -> io::Result<()> {
        self.data = Some(data.clone());
        self.save_count += 1;
        Ok(())
    }
}

/// Best scores and the progress cursor, persisted through a [`ScoreStore`].
///
/// Every state change saves immediately. A save failure is reported on
/// stderr and never interrupts gameplay.
pub struct Progress<S> {
    store: S,
    data: SaveData,
}

impl<S: ScoreStore> Progress<S> {
    pub fn new(mut store: S) -> Self {
        let data = store.load();
        Progress { store, data }
    }

    pub fn current_level(&self) -> usize {
        self.data.current_level
    }

    /// Best (minimum) recorded move count for a level, if any.
    pub fn best_score(&self, level: usize) -> Option<u32> {
        self.data.scores.get(&level.to_string()).copied()
    }

    /// Record a completion. The stored best only ever improves: the score is
    /// kept (and persisted) only when strictly lower than the current best,
    /// or when no best exists yet. Returns true if the record changed.
    pub fn record_score(&mut self, level: usize, moves: u32) -> bool {
        let key = level.to_string();
        let improved = match self.data.scores.get(&key) {
            Some(&best) => moves < best,
            None => true,
        };
        if improved {
            self.data.scores.insert(key, moves);
            self.persist();
        }
        improved
    }

    /// Advance the progress cursor to the next level.
    pub fn advance_level(&mut self) {
        self.data.current_level += 1;
        self.persist();
    }

    /// Jump the progress cursor to a specific level.
    pub fn set_level(&mut self, level: usize) {
        self.data.current_level = level;
        self.persist();
    }

    /// Explicit save request.
    pub fn save(&mut self) {
        self.persist();
    }

    /// Highest level index with a recorded score, if any.
    pub fn highest_recorded(&self) -> Option<usize> {
        self.data.scores.keys().filter_map(|k| k.parse().ok()).max()
    }

    /// Level-select gating: a level is playable if it has been completed or
    /// is the first level past the furthest completed one.
    pub fn is_unlocked(&self, level: usize) -> bool {
        match self.highest_recorded() {
            Some(highest) => level <= highest + 1,
            None => level == 0,
        }
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.data) {
            eprintln!("Error saving game: {}", err);
        }
    }
}
