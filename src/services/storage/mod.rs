//! Key-value persistence for events and settings.
//!
//! The core only needs a get/set-by-key store of JSON text. A file-per-key
//! store backs the desktop shell; an in-memory store backs tests. Loads are
//! lenient (corrupt data degrades to defaults or an empty collection),
//! saves are strict.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;

use crate::models::event::Event;
use crate::models::settings::Settings;
use crate::services::import_export::coerce_event_entries;

/// Latest persisted event collection.
pub const KEY_EVENTS_V3: &str = "mySchedule_events_v3";
/// Legacy event collection. Read-only migrated on load, never written back.
pub const KEY_EVENTS_V2: &str = "mySchedule_v2";
/// Persisted display settings, schema v1.
pub const KEY_SETTINGS: &str = "mySchedule_settings_v1";

/// Minimal get/set-by-key store of JSON text, the shape the core needs
/// from its backing storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Volatile store for tests and ephemeral sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a data directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create data dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    /// Default per-user data directory.
    pub fn default_dir() -> Result<PathBuf> {
        let base = directories::BaseDirs::new().context("failed to resolve base directories")?;
        Ok(base.data_dir().join("week-planner"))
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        Ok(Some(data))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        write_atomically(&path, value)
    }
}

// Write via a sibling temp file so a crash mid-write can't leave a torn
// value under the live key.
fn write_atomically(path: &Path, value: &str) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, value).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

/// Load the event collection, preferring the v3 key and falling back to a
/// best-effort read of the legacy v2 key. Both go through the normalizer's
/// record coercion, so a partially damaged collection still loads. Never
/// writes the v2 key back.
pub fn load_events(store: &dyn KeyValueStore) -> Vec<Event> {
    for key in [KEY_EVENTS_V3, KEY_EVENTS_V2] {
        let raw = match store.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => continue,
            Err(err) => {
                log::warn!("failed to read {key}: {err:#}");
                continue;
            }
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(entries)) => {
                let events = coerce_event_entries(&entries);
                let dropped = entries.len() - events.len();
                if dropped > 0 {
                    log::warn!("dropped {dropped} unusable event records from {key}");
                }
                if key == KEY_EVENTS_V2 {
                    log::info!("migrated {} events from legacy key {key}", events.len());
                }
                return events;
            }
            Ok(_) => log::warn!("{key} does not hold an array, ignoring"),
            Err(err) => log::warn!("failed to parse {key}: {err}"),
        }
    }

    Vec::new()
}

/// Persist the event collection under the v3 key.
pub fn save_events(store: &mut dyn KeyValueStore, events: &[Event]) -> Result<()> {
    let data = serde_json::to_string(events).context("failed to serialize events")?;
    store.set(KEY_EVENTS_V3, &data)
}

/// Load settings, falling back to defaults when the key is absent or the
/// snapshot is corrupt. Settings and events degrade independently.
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    match store.get(KEY_SETTINGS) {
        Ok(Some(raw)) => match serde_json::from_str::<Settings>(&raw) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("corrupt settings snapshot, using defaults: {err}");
                Settings::default()
            }
        },
        Ok(None) => Settings::default(),
        Err(err) => {
            log::warn!("failed to read settings, using defaults: {err:#}");
            Settings::default()
        }
    }
}

/// Persist the settings snapshot.
pub fn save_settings(store: &mut dyn KeyValueStore, settings: &Settings) -> Result<()> {
    let data = serde_json::to_string_pretty(settings).context("failed to serialize settings")?;
    store.set(KEY_SETTINGS, &data)
}
