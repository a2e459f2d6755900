//! # Snapshot Store
//!
//! Local key-value persistence for form snapshots, keyed by form identifier.
//! Persistence is best-effort: nothing here can make a calculation fail.
//!
//! - **Stores**: [`MemoryStore`] for tests and embedding, [`FileStore`] for one
//!   JSON file per key with atomic writes
//! - **Debouncing**: [`FormPersistence`] coalesces rapid edits so that at most
//!   one write happens per debounce window
//! - **Tolerant loading**: a missing or malformed record loads as the default
//!   form state and is logged
//!
//! ## Example
//!
//! ```rust
//! use std::time::{Duration, Instant};
//! use calc_core::form_state::FormState;
//! use calc_core::store::{FormPersistence, MemoryStore};
//!
//! let mut persistence: FormPersistence<MemoryStore, FormState> =
//!     FormPersistence::new(MemoryStore::default(), "chantier", Duration::from_millis(500)).unwrap();
//!
//! let mut state = persistence.load();
//! state.masonry.joint_thickness_m = 0.01;
//!
//! let t0 = Instant::now();
//! persistence.record_change(&state, t0);
//! assert!(!persistence.poll(t0 + Duration::from_millis(100)));
//! assert!(persistence.poll(t0 + Duration::from_millis(600)));
//! ```

use std::collections::HashMap;
use std::marker::PhantomData;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{CalcError, CalcResult};

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileStore;

/// Envelope written to the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredSnapshot<T> {
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// The form state itself
    pub data: T,
}

/// Minimal key-value store interface
pub trait KeyValueStore {
    /// Read the value for `key`, `None` if absent
    fn get(&self, key: &str) -> CalcResult<Option<String>>;

    /// Overwrite the value for `key`
    fn set(&mut self, key: &str, value: &str) -> CalcResult<()>;

    /// Delete the value for `key`; absent keys are not an error
    fn remove(&mut self, key: &str) -> CalcResult<()>;
}

/// Check that a form identifier is usable as a key (and as a file name).
pub fn validate_key(key: &str) -> CalcResult<()> {
    if key.is_empty() {
        return Err(CalcError::invalid_input("form_id", key, "Form identifier cannot be empty"));
    }
    if !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
        return Err(CalcError::invalid_input(
            "form_id",
            key,
            "Only letters, digits, '-' and '_' are allowed",
        ));
    }
    Ok(())
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    /// Number of `set` calls so far
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CalcResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CalcResult<()> {
        validate_key(key)?;
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CalcResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use std::fs::{self, File, OpenOptions};
    use std::io::{ErrorKind, Write};
    use std::path::{Path, PathBuf};

    use fs2::FileExt;

    use super::{validate_key, KeyValueStore};
    use crate::errors::{CalcError, CalcResult};

    /// Directory-backed store: `<dir>/<key>.json`.
    ///
    /// Writes go to a `.tmp` file that is synced and renamed over the target,
    /// under an exclusive OS lock on `<key>.json.lock`.
    #[derive(Debug, Clone)]
    pub struct FileStore {
        dir: PathBuf,
    }

    /// Holds the OS lock until dropped.
    ///
    /// The lock file itself stays on disk so every writer locks the same inode.
    struct StoreLock {
        _file: File,
    }

    impl StoreLock {
        fn acquire(path: &Path) -> CalcResult<Self> {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(false)
                .open(path)
                .map_err(|e| CalcError::store_error("create lock", path.display().to_string(), e.to_string()))?;
            file.try_lock_exclusive().map_err(|_| CalcError::StoreLocked {
                path: path.display().to_string(),
            })?;
            Ok(StoreLock { _file: file })
        }
    }

    /// Write `value` to `tmp_path`, sync it, and rename it over `path`.
    fn write_atomic(tmp_path: &Path, path: &Path, key: &str, value: &str) -> CalcResult<()> {
        let mut tmp_file =
            File::create(tmp_path).map_err(|e| CalcError::store_error("create temp file", key, e.to_string()))?;
        tmp_file
            .write_all(value.as_bytes())
            .map_err(|e| CalcError::store_error("write temp file", key, e.to_string()))?;
        tmp_file
            .sync_all()
            .map_err(|e| CalcError::store_error("sync temp file", key, e.to_string()))?;
        drop(tmp_file);
        fs::rename(tmp_path, path).map_err(|e| CalcError::store_error("rename to final", key, e.to_string()))
    }

    impl FileStore {
        /// Open (and create if needed) a store directory
        pub fn open(dir: impl AsRef<Path>) -> CalcResult<Self> {
            let dir = dir.as_ref().to_path_buf();
            fs::create_dir_all(&dir)
                .map_err(|e| CalcError::store_error("create dir", dir.display().to_string(), e.to_string()))?;
            Ok(FileStore { dir })
        }

        pub fn dir(&self) -> &Path {
            &self.dir
        }

        /// Path of the JSON file for `key`
        pub fn path_for(&self, key: &str) -> CalcResult<PathBuf> {
            validate_key(key)?;
            Ok(self.dir.join(format!("{}.json", key)))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> CalcResult<Option<String>> {
            let path = self.path_for(key)?;
            match fs::read_to_string(&path) {
                Ok(contents) => Ok(Some(contents)),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
                Err(e) => Err(CalcError::store_error("read", key, e.to_string())),
            }
        }

        fn set(&mut self, key: &str, value: &str) -> CalcResult<()> {
            let path = self.path_for(key)?;
            let _lock = StoreLock::acquire(&path.with_extension("json.lock"))?;
            let tmp_path = path.with_extension("json.tmp");

            let written = write_atomic(&tmp_path, &path, key, value);
            if written.is_err() {
                let _ = fs::remove_file(&tmp_path);
            }
            written
        }

        fn remove(&mut self, key: &str) -> CalcResult<()> {
            let path = self.path_for(key)?;
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
                Err(e) => Err(CalcError::store_error("remove", key, e.to_string())),
            }
        }
    }
}

/// Read a snapshot for `key`.
///
/// Returns `None` when the key is absent, unreadable, or holds something that
/// does not parse as a snapshot of `T`. Failures are logged, never returned.
pub fn load_snapshot<S, T>(store: &S, key: &str) -> Option<StoredSnapshot<T>>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!(key, "no saved form state");
            return None;
        }
        Err(error) => {
            warn!(key, error = %error, "failed to read saved form state");
            return None;
        }
    };

    match serde_json::from_str::<StoredSnapshot<T>>(&raw) {
        Ok(snapshot) => Some(snapshot),
        Err(error) => {
            warn!(key, error = %error, "discarding malformed saved form state");
            None
        }
    }
}

/// Serialize and write a snapshot of `data` immediately.
pub fn save_snapshot<S, T>(store: &mut S, key: &str, data: &T) -> CalcResult<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize,
{
    let snapshot = StoredSnapshot {
        saved_at: Utc::now(),
        data,
    };
    let json = serde_json::to_string(&snapshot)?;
    store.set(key, &json)
}

/// Debounced persistence of one form.
///
/// Single-threaded: the caller passes the current time to
/// [`record_change`](Self::record_change) and [`poll`](Self::poll) from its
/// event loop. Each change replaces the pending snapshot and restarts the
/// window, so a burst of edits ends in a single write.
pub struct FormPersistence<S, T> {
    store: S,
    form_id: String,
    debounce: Duration,
    pending: Option<(serde_json::Value, Instant)>,
    loaded: bool,
    _state: PhantomData<fn() -> T>,
}

impl<S, T> FormPersistence<S, T>
where
    S: KeyValueStore,
    T: Serialize + DeserializeOwned + Default,
{
    /// Create a persistence handle for `form_id`.
    pub fn new(store: S, form_id: impl Into<String>, debounce: Duration) -> CalcResult<Self> {
        let form_id = form_id.into();
        validate_key(&form_id)?;
        Ok(FormPersistence {
            store,
            form_id,
            debounce,
            pending: None,
            loaded: false,
            _state: PhantomData,
        })
    }

    /// Load the saved state, or the default state if there is none.
    ///
    /// Changes recorded before the first load are ignored so the defaults
    /// shown while loading never overwrite the saved snapshot.
    pub fn load(&mut self) -> T {
        let state = match load_snapshot::<S, T>(&self.store, &self.form_id) {
            Some(snapshot) => {
                info!(form_id = %self.form_id, saved_at = %snapshot.saved_at, "restored form state");
                snapshot.data
            }
            None => T::default(),
        };
        self.loaded = true;
        state
    }

    /// Queue a snapshot of `state`; it is written once `debounce` has elapsed
    /// after the last change.
    pub fn record_change(&mut self, state: &T, now: Instant) {
        if !self.loaded {
            debug!(form_id = %self.form_id, "ignoring change before initial load");
            return;
        }
        match serde_json::to_value(state) {
            Ok(value) => self.pending = Some((value, now + self.debounce)),
            Err(error) => {
                warn!(form_id = %self.form_id, error = %error, "failed to serialize form state");
                self.pending = None;
            }
        }
    }

    /// Write the pending snapshot if its window has elapsed.
    ///
    /// Returns `true` when a write happened.
    pub fn poll(&mut self, now: Instant) -> bool {
        match &self.pending {
            Some((_, due)) if *due <= now => self.flush(),
            _ => false,
        }
    }

    /// Write the pending snapshot now, regardless of the window.
    ///
    /// Returns `true` when a write happened. A failed write is logged and the
    /// snapshot dropped; the next change queues a fresh one.
    pub fn flush(&mut self) -> bool {
        let Some((value, _)) = self.pending.take() else {
            return false;
        };
        match save_snapshot(&mut self.store, &self.form_id, &value) {
            Ok(()) => {
                debug!(form_id = %self.form_id, "saved form state");
                true
            }
            Err(error) => {
                warn!(form_id = %self.form_id, error = %error, "failed to save form state");
                false
            }
        }
    }

    /// When the pending snapshot is due, if there is one
    pub fn next_due(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, due)| *due)
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn form_id(&self) -> &str {
        &self.form_id
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Give back the store, dropping any unsaved change
    pub fn into_store(self) -> S {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form_state::{estimate, FormState};

    const WINDOW: Duration = Duration::from_millis(500);

    fn persistence(store: MemoryStore) -> FormPersistence<MemoryStore, FormState> {
        FormPersistence::new(store, "chantier", WINDOW).unwrap()
    }

    #[test]
    fn test_key_validation() {
        assert!(validate_key("chantier-01_b").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(FormPersistence::<MemoryStore, FormState>::new(MemoryStore::default(), "a b", WINDOW).is_err());
    }

    #[test]
    fn test_missing_record_loads_default() {
        let mut p = persistence(MemoryStore::default());
        assert_eq!(p.load(), FormState::default());
    }

    #[test]
    fn test_malformed_record_loads_default() {
        let mut store = MemoryStore::default();
        store.set("chantier", "{ not json").unwrap();
        let mut p = persistence(store);
        assert_eq!(p.load(), FormState::default());

        let mut store = MemoryStore::default();
        store.set("chantier", r#"{"saved_at": "yesterday", "data": 3}"#).unwrap();
        let mut p = persistence(store);
        assert_eq!(p.load(), FormState::default());
    }

    #[test]
    fn test_rapid_edits_coalesce_into_one_write() {
        let mut p = persistence(MemoryStore::default());
        let mut state = p.load();
        let t0 = Instant::now();

        for step in 0..10u32 {
            state.masonry.joint_thickness_m = 0.01 + step as f64 * 0.001;
            p.record_change(&state, t0 + Duration::from_millis(step as u64 * 100));
            assert!(!p.poll(t0 + Duration::from_millis(step as u64 * 100 + 50)));
        }
        assert_eq!(p.store().write_count(), 0);

        // Last change at 900 ms; due at 1400 ms
        assert!(!p.poll(t0 + Duration::from_millis(1399)));
        assert!(p.poll(t0 + Duration::from_millis(1400)));
        assert!(!p.poll(t0 + Duration::from_millis(5000)));
        assert_eq!(p.store().write_count(), 1);

        let mut reloaded = persistence(p.into_store());
        assert_eq!(reloaded.load(), state);
    }

    #[test]
    fn test_incomplete_steel_row_keeps_saved_form() {
        let mut store = MemoryStore::default();
        save_snapshot(&mut store, "chantier", &FormState::sample()).unwrap();

        let raw = store.get("chantier").unwrap().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value["data"]["steel"]["members"][0]["transversal_bars"]
            .as_object_mut()
            .unwrap()
            .remove("spacing_m");
        store.set("chantier", &value.to_string()).unwrap();

        let restored = persistence(store).load();
        let report = estimate(&restored);
        assert_eq!(restored.concrete, FormState::sample().concrete);
        assert_eq!(report.wall_surface.area_m2(), Some(45.0));
        assert!(report.steel.members[0].error().is_some());
        assert!(report.steel.members[1].computed().is_some());
    }

    #[test]
    fn test_changes_before_load_are_ignored() {
        let mut p = persistence(MemoryStore::default());
        p.record_change(&FormState::sample(), Instant::now());
        assert!(!p.has_pending());
        assert!(!p.flush());
    }

    #[test]
    fn test_roundtrip_reproduces_estimate() {
        let mut p = persistence(MemoryStore::default());
        let _ = p.load();
        let state = FormState::sample();
        let t0 = Instant::now();
        p.record_change(&state, t0);
        assert_eq!(p.next_due(), Some(t0 + WINDOW));
        assert!(p.flush());

        let mut reloaded = persistence(p.into_store());
        let restored = reloaded.load();
        assert_eq!(estimate(&restored), estimate(&state));
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();

        assert_eq!(store.get("chantier").unwrap(), None);
        save_snapshot(&mut store, "chantier", &FormState::sample()).unwrap();

        let path = store.path_for("chantier").unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());

        let snapshot: StoredSnapshot<FormState> = load_snapshot(&store, "chantier").unwrap();
        assert_eq!(snapshot.data, FormState::sample());

        store.remove("chantier").unwrap();
        store.remove("chantier").unwrap();
        assert!(load_snapshot::<_, FormState>(&store, "chantier").is_none());
    }

    #[test]
    fn test_failed_write_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let path = store.path_for("chantier").unwrap();
        // A non-empty directory in the way makes the final rename fail
        std::fs::create_dir_all(path.join("occupied")).unwrap();

        let err = store.set("chantier", "{}").unwrap_err();
        assert_eq!(err.error_code(), "STORE_ERROR");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_locked_store_is_recoverable() {
        use fs2::FileExt;

        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let lock_path = store.path_for("chantier").unwrap().with_extension("json.lock");

        let holder = std::fs::File::create(&lock_path).unwrap();
        holder.lock_exclusive().unwrap();
        let err = store.set("chantier", "{}").unwrap_err();
        assert_eq!(err.error_code(), "STORE_LOCKED");
        assert!(err.is_recoverable());

        holder.unlock().unwrap();
        drop(holder);
        store.set("chantier", "{}").unwrap();
        assert!(lock_path.exists());
    }

    #[test]
    fn test_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let err = store.set("../escape", "{}").unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }
}
