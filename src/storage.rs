//! Durable key-value storage for tracker state.
//!
//! Each top-level collection lives under its own key so that a corrupt value
//! only costs that one collection. `FileStore` keeps one JSON file per key in
//! the data directory; `MemoryStore` backs tests.

#[cfg(test)]
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;
use crate::fields::Theme;
use crate::habit::Habit;
use crate::task::Task;

pub const KEY_TASKS: &str = "tasks";
pub const KEY_HABITS: &str = "habits";
pub const KEY_FAVORITES: &str = "favorites";
pub const KEY_THEME: &str = "theme";
pub const KEY_WEEK_START: &str = "weekStartDate";

pub const ALL_KEYS: [&str; 5] = [KEY_TASKS, KEY_HABITS, KEY_FAVORITES, KEY_THEME, KEY_WEEK_START];

/// String-valued durable storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> io::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// One `<key>.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: &Path) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(FileStore { dir: dir.to_path_buf() })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        // Atomic-ish write via temp + rename.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e),
            _ => Ok(()),
        }
    }
}

/// In-memory store. Can be told to fail writes, or to fail removals after a
/// number of successful ones, to exercise error paths.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    pub entries: BTreeMap<String, String>,
    pub fail_writes: bool,
    pub removes_before_failure: Option<usize>,
}

#[cfg(test)]
impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "storage is full"));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(io::ErrorKind::Other, "storage is full"));
        }
        if let Some(left) = self.removes_before_failure {
            if left == 0 {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "key is locked"));
            }
            self.removes_before_failure = Some(left - 1);
        }
        self.entries.remove(key);
        Ok(())
    }
}

/// Everything the store persists, minus the week marker.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DomainState {
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    /// Resource ids, insertion ordered, no duplicates.
    pub favorites: Vec<u64>,
    pub theme: Theme,
}

/// Serializes `DomainState` to and from a `KeyValueStore`.
#[derive(Debug)]
pub struct Gateway<S: KeyValueStore> {
    backend: S,
}

impl<S: KeyValueStore> Gateway<S> {
    pub fn new(backend: S) -> Self {
        Gateway { backend }
    }

    #[cfg(test)]
    pub(crate) fn backend(&self) -> &S {
        &self.backend
    }

    #[cfg(test)]
    pub(crate) fn backend_mut(&mut self) -> &mut S {
        &mut self.backend
    }

    /// Read every key independently. Absent, unreadable or malformed keys
    /// fall back to their default without affecting the others.
    pub fn load(&self) -> DomainState {
        let mut favorites: Vec<u64> = self.read_json(KEY_FAVORITES).unwrap_or_default();
        let mut seen = std::collections::HashSet::new();
        favorites.retain(|id| seen.insert(*id));

        DomainState {
            tasks: self.read_json(KEY_TASKS).unwrap_or_default(),
            habits: self.read_json(KEY_HABITS).unwrap_or_default(),
            favorites,
            theme: self.read_theme(),
        }
    }

    /// Write each collection under its own key. Sets the week marker to `now`
    /// the first time, and leaves it alone afterwards.
    pub fn save(&mut self, state: &DomainState, now: DateTime<Utc>) -> Result<()> {
        self.write_json(KEY_TASKS, &state.tasks)?;
        self.write_json(KEY_HABITS, &state.habits)?;
        self.write_json(KEY_FAVORITES, &state.favorites)?;
        self.backend.set(KEY_THEME, state.theme.as_str())?;
        if self.week_start().is_none() {
            self.set_week_start(now)?;
        }
        debug!("event=state_saved tasks={} habits={}", state.tasks.len(), state.habits.len());
        Ok(())
    }

    /// The persisted start of the current habit week, if any and parseable.
    pub fn week_start(&self) -> Option<DateTime<Utc>> {
        let raw = self.read_raw(KEY_WEEK_START)?;
        match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(err) => {
                warn!("event=storage_key_malformed key={KEY_WEEK_START} error={err}");
                None
            }
        }
    }

    pub fn set_week_start(&mut self, ts: DateTime<Utc>) -> Result<()> {
        self.backend.set(KEY_WEEK_START, &ts.to_rfc3339())?;
        Ok(())
    }

    /// Remove every key, week marker included.
    pub fn clear_all(&mut self) -> Result<()> {
        for key in ALL_KEYS {
            self.backend.remove(key)?;
        }
        Ok(())
    }

    fn read_raw(&self, key: &str) -> Option<String> {
        match self.backend.get(key) {
            Ok(v) => v,
            Err(err) => {
                warn!("event=storage_read_failed key={key} error={err}");
                None
            }
        }
    }

    fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.read_raw(key)?;
        match serde_json::from_str(&raw) {
            Ok(v) => Some(v),
            Err(err) => {
                warn!("event=storage_key_malformed key={key} error={err}");
                None
            }
        }
    }

    fn read_theme(&self) -> Theme {
        let Some(raw) = self.read_raw(KEY_THEME) else {
            return Theme::default();
        };
        // Accept both the bare string and a JSON-quoted one.
        let unquoted = raw.trim().trim_matches('"');
        Theme::parse(unquoted).unwrap_or_else(|| {
            warn!("event=storage_key_malformed key={KEY_THEME}");
            Theme::default()
        })
    }

    fn write_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let data = serde_json::to_string(value)?;
        self.backend.set(key, &data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskDraft;
    use chrono::{NaiveDate, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 4, 1, 8, 30, 0).unwrap()
    }

    fn sample_state() -> DomainState {
        let due = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
        DomainState {
            tasks: vec![Task::from_draft(1, TaskDraft::quick("Buy milk", due))],
            habits: vec![Habit::new(2, "Read".into(), 3)],
            favorites: vec![4, 9],
            theme: Theme::Dark,
        }
    }

    #[test]
    fn empty_store_loads_defaults() {
        let gw = Gateway::new(MemoryStore::new());
        let state = gw.load();
        assert_eq!(state, DomainState::default());
        assert_eq!(state.theme, Theme::Light);
        assert!(gw.week_start().is_none());
    }

    #[test]
    fn save_writes_each_key_separately() {
        let mut gw = Gateway::new(MemoryStore::new());
        gw.save(&sample_state(), now()).unwrap();
        let entries = &gw.backend().entries;
        for key in ALL_KEYS {
            assert!(entries.contains_key(key), "missing {key}");
        }
        assert_eq!(entries[KEY_THEME], "dark");
        assert_eq!(entries[KEY_FAVORITES], "[4,9]");
        assert_eq!(gw.load(), sample_state());
    }

    #[test]
    fn malformed_tasks_only_reset_tasks() {
        let mut gw = Gateway::new(MemoryStore::new());
        gw.save(&sample_state(), now()).unwrap();
        gw.backend_mut()
            .entries
            .insert(KEY_TASKS.into(), "{not json".into());
        let state = gw.load();
        assert!(state.tasks.is_empty());
        assert_eq!(state.habits, sample_state().habits);
        assert_eq!(state.favorites, vec![4, 9]);
        assert_eq!(state.theme, Theme::Dark);
    }

    #[test]
    fn unknown_theme_falls_back_to_light() {
        let mut store = MemoryStore::new();
        store.entries.insert(KEY_THEME.into(), "sepia".into());
        assert_eq!(Gateway::new(store).load().theme, Theme::Light);
    }

    #[test]
    fn duplicate_favorites_are_collapsed() {
        let mut store = MemoryStore::new();
        store.entries.insert(KEY_FAVORITES.into(), "[3,1,3]".into());
        assert_eq!(Gateway::new(store).load().favorites, vec![3, 1]);
    }

    #[test]
    fn week_start_is_written_once() {
        let mut gw = Gateway::new(MemoryStore::new());
        gw.save(&sample_state(), now()).unwrap();
        gw.save(&sample_state(), now() + chrono::Duration::days(3)).unwrap();
        assert_eq!(gw.week_start(), Some(now()));
    }

    #[test]
    fn clear_all_removes_every_key() {
        let mut gw = Gateway::new(MemoryStore::new());
        gw.save(&sample_state(), now()).unwrap();
        gw.clear_all().unwrap();
        assert!(gw.backend().entries.is_empty());
    }

    #[test]
    fn file_store_round_trips_and_ignores_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
        store.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
        assert!(dir.path().join("tasks.json").exists());
        assert!(!dir.path().join("tasks.json.tmp").exists());
        store.remove("tasks").unwrap();
        store.remove("tasks").unwrap();
        assert_eq!(store.get("tasks").unwrap(), None);
    }

    #[test]
    fn file_backed_gateway_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let mut gw = Gateway::new(FileStore::open(dir.path()).unwrap());
        gw.save(&sample_state(), now()).unwrap();
        let reopened = Gateway::new(FileStore::open(dir.path()).unwrap());
        assert_eq!(reopened.load(), sample_state());
        assert_eq!(reopened.week_start(), Some(now()));
    }
}
