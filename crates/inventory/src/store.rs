//! Flat JSON file persistence for the [`Ledger`].
//!
//! The file is a single JSON object mapping item name to a non-negative
//! integer quantity:
//!
//! ```json
//! {
//!     "apple": 7,
//!     "banana": 2
//! }
//! ```
//!
//! Writes are a plain open-write-close; there is no atomic replace.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use stockledger_core::ItemName;

use crate::ledger::Ledger;

/// File used when the caller does not name one.
pub const DEFAULT_DATA_PATH: &str = "inventory.json";

const INDENT: &[u8] = b"    ";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON format in {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn path(&self) -> &Path {
        match self {
            StoreError::Read { path, .. }
            | StoreError::Write { path, .. }
            | StoreError::Malformed { path, .. } => path,
        }
    }
}

/// How a successful load populated the ledger.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The file existed and held this many stocked entries.
    Loaded { entries: usize },
    /// No file yet; the ledger starts empty.
    Bootstrapped,
}

/// JSON file backing a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonStore {
    path: PathBuf,
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_PATH)
    }
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the contents of `ledger` with the file's entries.
    ///
    /// - missing file: warning, empty ledger, `Ok(Bootstrapped)`
    /// - unreadable or malformed file: error, empty ledger, `Err`
    ///
    /// Entries are only applied once the whole file has parsed.
    pub fn load_into(&self, ledger: &mut Ledger) -> Result<LoadOutcome, StoreError> {
        ledger.clear();

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(
                    "File {} not found. Starting with empty inventory.",
                    self.path.display()
                );
                return Ok(LoadOutcome::Bootstrapped);
            }
            Err(source) => {
                error!("Failed to read {}: {}", self.path.display(), source);
                return Err(StoreError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let entries = parse_entries(&raw).map_err(|reason| {
            error!("Invalid JSON format in {}: {}", self.path.display(), reason);
            StoreError::Malformed {
                path: self.path.clone(),
                reason,
            }
        })?;

        let count = entries.len();
        ledger.replace_all(entries);
        info!("Data loaded from {}", self.path.display());
        Ok(LoadOutcome::Loaded { entries: count })
    }

    /// Load into a fresh ledger. Failures are logged and yield an empty ledger.
    pub fn load(&self) -> Ledger {
        let mut ledger = Ledger::new();
        let _ = self.load_into(&mut ledger);
        ledger
    }

    /// Write the ledger as an indented JSON object, overwriting the file.
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let write_err = |source: io::Error| {
            error!("Failed to save data: {}", source);
            StoreError::Write {
                path: self.path.clone(),
                source,
            }
        };

        let bytes = encode(ledger).map_err(|e| write_err(e.into()))?;
        fs::write(&self.path, bytes).map_err(write_err)?;
        info!("Data saved to {}", self.path.display());
        Ok(())
    }
}

fn encode(ledger: &Ledger) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    ledger.entries().serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Parse the whole document before anything is applied.
fn parse_entries(raw: &str) -> Result<BTreeMap<ItemName, i64>, String> {
    let parsed: BTreeMap<ItemName, i64> = serde_json::from_str(raw).map_err(|e| e.to_string())?;

    let mut entries = BTreeMap::new();
    for (item, qty) in parsed {
        match qty {
            q if q < 0 => return Err(format!("negative quantity {q} for {item}")),
            0 => debug!("Skipping {} with zero quantity", item),
            q => {
                entries.insert(item, q);
            }
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> JsonStore {
        JsonStore::new(dir.path().join(DEFAULT_DATA_PATH))
    }

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.add("apple", 7, None).unwrap();
        ledger.add("banana", 2, None).unwrap();
        ledger
    }

    #[test]
    fn default_path_is_inventory_json() {
        assert_eq!(JsonStore::default().path(), Path::new("inventory.json"));
    }

    #[test]
    fn save_writes_four_space_indented_object() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&sample_ledger()).unwrap();

        let written = fs::read_to_string(store.path()).unwrap();
        assert_eq!(written, "{\n    \"apple\": 7,\n    \"banana\": 2\n}\n");
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let original = sample_ledger();
        store.save(&original).unwrap();

        let mut loaded = Ledger::new();
        let outcome = store.load_into(&mut loaded).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { entries: 2 });
        assert_eq!(loaded, original);
    }

    #[test]
    fn empty_ledger_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Ledger::new()).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "{}\n");
        assert!(store.load().is_empty());
    }

    #[test]
    fn missing_file_bootstraps_empty_ledger() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let mut ledger = sample_ledger();

        assert_eq!(store.load_into(&mut ledger).unwrap(), LoadOutcome::Bootstrapped);
        assert!(ledger.is_empty());
    }

    #[test]
    fn malformed_file_leaves_ledger_empty() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "{ \"apple\": 3, ").unwrap();

        let mut ledger = sample_ledger();
        let err = store.load_into(&mut ledger).unwrap_err();
        assert!(matches!(err, StoreError::Malformed { .. }));
        assert_eq!(err.path(), store.path());
        assert!(ledger.is_empty());
    }

    #[test]
    fn wrong_value_kinds_are_malformed_without_partial_apply() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for body in [
            r#"{"apple": 3, "banana": "two"}"#,
            r#"{"apple": 3, "banana": 1.5}"#,
            r#"{"apple": 3, "": 1}"#,
            r#"["apple", 3]"#,
            r#"{"apple": 3, "banana": -1}"#,
        ] {
            fs::write(store.path(), body).unwrap();
            let mut ledger = Ledger::new();
            let err = store.load_into(&mut ledger).unwrap_err();
            assert!(matches!(err, StoreError::Malformed { .. }), "{body}: {err}");
            assert!(ledger.is_empty(), "{body} applied partially");
        }
    }

    #[test]
    fn zero_quantities_are_dropped_on_load() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), r#"{"apple": 0, "banana": 4}"#).unwrap();

        let mut ledger = Ledger::new();
        assert_eq!(store.load_into(&mut ledger).unwrap(), LoadOutcome::Loaded { entries: 1 });
        assert_eq!(ledger.quantity("banana"), 4);
        assert!(!ledger.contains("apple"));
    }

    #[test]
    fn save_into_missing_directory_is_write_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path().join("no-such-dir").join("inventory.json"));

        let err = store.save(&sample_ledger()).unwrap_err();
        assert!(matches!(err, StoreError::Write { .. }));
    }

    #[test]
    fn loading_a_directory_is_read_error() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let mut ledger = sample_ledger();
        let err = store.load_into(&mut ledger).unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
        assert!(ledger.is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 64,
            ..ProptestConfig::default()
        })]

        /// Property: save followed by load reproduces the same entries.
        #[test]
        fn round_trip_preserves_entries(
            entries in prop::collection::btree_map("[a-zA-Z0-9 _-]{1,16}", 1i64..i64::MAX, 0..16),
        ) {
            let dir = TempDir::new().unwrap();
            let store = store_in(&dir);
            let mut ledger = Ledger::new();
            for (item, qty) in &entries {
                ledger.add(item, *qty, None).unwrap();
            }
            store.save(&ledger).unwrap();

            let mut loaded = Ledger::new();
            store.load_into(&mut loaded).unwrap();
            prop_assert_eq!(loaded, ledger);
        }
    }
}
