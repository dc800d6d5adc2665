//! Preference and cooldown store.
//!
//! A flat key-value store of numeric preferences. An entry may be
//! time-based, in which case its value is "seconds remaining as of
//! `saved_at`" and reads return the linearly decayed remainder, clamped
//! at zero. Reads never mutate stored state, so repeated reads keep
//! decaying relative to the original write.
//!
//! The whole store snapshots to JSON. Restoring re-bases every
//! time-based entry to the restore instant with its already-decayed
//! remainder as the new nominal value, so an offline gap between save
//! and load is charged exactly once.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::BanterResult;

/// One stored preference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefEntry {
    /// Stored value; for time-based entries, seconds remaining as of
    /// `saved_at`.
    pub value: f64,
    /// Whether the value decays with wall-clock time.
    #[serde(default)]
    pub time_based: bool,
    /// Epoch seconds at write time; `None` for plain entries.
    #[serde(default)]
    pub saved_at: Option<f64>,
}

/// Serializable snapshot of a whole store.
pub type Snapshot = HashMap<String, PrefEntry>;

/// In-memory preference store with JSON persistence.
///
/// Single logical key namespace, last-write-wins. All time-sensitive
/// operations have `*_at` variants taking an explicit `now`; the plain
/// forms use [`Utc::now`].
#[derive(Debug, Clone, Default)]
pub struct PrefStore {
    entries: HashMap<String, PrefEntry>,
}

fn epoch_seconds(now: DateTime<Utc>) -> f64 {
    now.timestamp_millis() as f64 / 1000.0
}

impl PrefStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a plain (non-decaying) value, overwriting any existing entry.
    pub fn set(&mut self, key: impl Into<String>, value: f64) {
        self.entries.insert(
            key.into(),
            PrefEntry {
                value,
                time_based: false,
                saved_at: None,
            },
        );
    }

    /// Set a time-based value that decays toward zero from now on.
    pub fn set_time_based(&mut self, key: impl Into<String>, value: f64) {
        self.set_time_based_at(key, value, Utc::now());
    }

    /// Set a time-based value, decaying from the given instant.
    pub fn set_time_based_at(
        &mut self,
        key: impl Into<String>,
        value: f64,
        now: DateTime<Utc>,
    ) {
        self.entries.insert(
            key.into(),
            PrefEntry {
                value,
                time_based: true,
                saved_at: Some(epoch_seconds(now)),
            },
        );
    }

    /// Read a value; missing keys return the caller-supplied default.
    pub fn get(&self, key: &str, default: f64) -> f64 {
        self.get_at(key, default, Utc::now())
    }

    /// Read a value, computing decay as of the given instant.
    pub fn get_at(&self, key: &str, default: f64, now: DateTime<Utc>) -> f64 {
        let Some(entry) = self.entries.get(key) else {
            return default;
        };
        if entry.time_based {
            let saved_at = entry.saved_at.unwrap_or_else(|| epoch_seconds(now));
            let elapsed = epoch_seconds(now) - saved_at;
            (entry.value - elapsed).max(0.0)
        } else {
            entry.value
        }
    }

    /// Whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Remove a key; removing a missing key does nothing.
    pub fn delete(&mut self, key: &str) {
        self.entries.remove(key);
    }

    /// All stored keys.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Serializable copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        self.entries.clone()
    }

    /// Replace the store contents from a snapshot taken earlier.
    pub fn restore(&mut self, snapshot: Snapshot) {
        self.restore_at(snapshot, Utc::now());
    }

    /// Replace the store contents, re-basing time-based entries to `now`.
    ///
    /// Each time-based entry's remaining value is computed once, stored
    /// as the new nominal value with `saved_at = now`; restoring the
    /// same snapshot again later does not decay it twice from the
    /// original write. Plain entries pass through unchanged.
    pub fn restore_at(&mut self, snapshot: Snapshot, now: DateTime<Utc>) {
        let now_secs = epoch_seconds(now);
        self.entries.clear();
        for (key, entry) in snapshot {
            if entry.time_based {
                let saved_at = entry.saved_at.unwrap_or(now_secs);
                let remaining = (entry.value - (now_secs - saved_at)).max(0.0);
                self.entries.insert(
                    key,
                    PrefEntry {
                        value: remaining,
                        time_based: true,
                        saved_at: Some(now_secs),
                    },
                );
            } else {
                self.entries.insert(key, entry);
            }
        }
        debug!(entries = self.entries.len(), "restored preference snapshot");
    }

    /// Save the store to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> BanterResult<()> {
        let path = path.as_ref();
        serde_json::to_writer_pretty(File::create(path)?, &self.entries)?;
        info!(path = %path.display(), "saved preferences");
        Ok(())
    }

    /// Load a store from a JSON file, re-basing time-based entries.
    ///
    /// A missing file is not an error; it yields an empty store.
    pub fn load(path: impl AsRef<Path>) -> BanterResult<Self> {
        Self::load_at(path, Utc::now())
    }

    /// Load a store from a JSON file as of the given instant.
    pub fn load_at(path: impl AsRef<Path>, now: DateTime<Utc>) -> BanterResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "no preference file, starting fresh");
            return Ok(Self::new());
        }
        let raw: Snapshot = serde_json::from_reader(File::open(path)?)?;
        let mut store = Self::new();
        store.restore_at(raw, now);
        info!(path = %path.display(), "loaded preferences");
        Ok(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 7, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_plain_values_do_not_decay() {
        let mut store = PrefStore::new();
        store.set("balance", 42.0);
        assert_eq!(store.get_at("balance", 0.0, t0() + Duration::days(30)), 42.0);
    }

    #[test]
    fn test_missing_key_returns_default() {
        let store = PrefStore::new();
        assert_eq!(store.get("nope", 7.5), 7.5);
        assert!(!store.has("nope"));
    }

    #[test]
    fn test_time_based_decay_and_clamp() {
        let mut store = PrefStore::new();
        store.set_time_based_at("cd", 100.0, t0());

        assert_eq!(store.get_at("cd", 0.0, t0()), 100.0);
        assert_eq!(store.get_at("cd", 0.0, t0() + Duration::seconds(40)), 60.0);
        assert_eq!(store.get_at("cd", 0.0, t0() + Duration::seconds(150)), 0.0);
    }

    #[test]
    fn test_reads_do_not_mutate() {
        let mut store = PrefStore::new();
        store.set_time_based_at("cd", 100.0, t0());

        // Decay stays relative to the original write, not the last read.
        let _ = store.get_at("cd", 0.0, t0() + Duration::seconds(10));
        let _ = store.get_at("cd", 0.0, t0() + Duration::seconds(20));
        assert_eq!(store.get_at("cd", 0.0, t0() + Duration::seconds(30)), 70.0);
    }

    #[test]
    fn test_overwrite_is_last_write_wins() {
        let mut store = PrefStore::new();
        store.set_time_based_at("k", 100.0, t0());
        store.set("k", 5.0);
        assert_eq!(store.get_at("k", 0.0, t0() + Duration::seconds(500)), 5.0);
    }

    #[test]
    fn test_delete_is_noop_on_missing() {
        let mut store = PrefStore::new();
        store.set("k", 1.0);
        store.delete("k");
        store.delete("k");
        assert!(!store.has("k"));
    }

    #[test]
    fn test_restore_rebases_once() {
        let mut store = PrefStore::new();
        store.set_time_based_at("cd", 100.0, t0());
        store.set("balance", 12.0);
        let snap = store.snapshot();

        // Restore 40s later: 60s remain, charged exactly once.
        let mut restored = PrefStore::new();
        restored.restore_at(snap, t0() + Duration::seconds(40));
        assert_eq!(
            restored.get_at("cd", 0.0, t0() + Duration::seconds(40)),
            60.0
        );
        assert_eq!(restored.get_at("balance", 0.0, t0()), 12.0);

        // A second restore one second on decays only that one second.
        let snap2 = restored.snapshot();
        let mut again = PrefStore::new();
        again.restore_at(snap2, t0() + Duration::seconds(41));
        assert_eq!(
            again.get_at("cd", 0.0, t0() + Duration::seconds(41)),
            59.0
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = PrefStore::new();
        store.set_time_based_at("cd", 100.0, t0());
        store.set("balance", 3.0);
        store.save(&path).unwrap();

        let loaded = PrefStore::load_at(&path, t0() + Duration::seconds(40)).unwrap();
        assert_eq!(
            loaded.get_at("cd", 0.0, t0() + Duration::seconds(40)),
            60.0
        );
        assert_eq!(loaded.get_at("balance", 0.0, t0()), 3.0);
    }

    #[test]
    fn test_load_missing_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        let store = PrefStore::load(dir.path().join("absent.json")).unwrap();
        assert!(store.keys().is_empty());
    }
}
