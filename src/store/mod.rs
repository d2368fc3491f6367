use crate::error::{ApkwatchError, Result};
use jiff::Zoned;
use jiff::civil::Date;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const STATE_FILE: &str = "packages.json";

/// One tracked Android application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedPackage {
    /// Reverse-domain application id, unique within the store.
    pub package_id: String,
    /// Date the package was first tracked. Never changes afterwards.
    pub added_on: Date,
    /// "Updated on" date last observed on the listing, if any check has
    /// succeeded yet.
    pub last_update_seen: Option<Date>,
    /// When the most recent check was attempted, successful or not.
    pub last_checked: Option<Zoned>,
}

impl TrackedPackage {
    pub fn new(package_id: impl Into<String>, added_on: Date) -> Self {
        Self {
            package_id: package_id.into(),
            added_on,
            last_update_seen: None,
            last_checked: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyTracked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
}

/// On-disk layout of the state file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StateFile {
    packages: Vec<TrackedPackage>,
}

/// Insertion-order-preserving collection of tracked packages, backed by a
/// JSON file in an explicitly configured data directory.
#[derive(Debug)]
pub struct TrackerStore {
    path: PathBuf,
    packages: Vec<TrackedPackage>,
}

impl TrackerStore {
    /// Load the store from `data_dir`, creating the directory if needed.
    /// A missing state file yields an empty store; an undecodable one is a
    /// `CorruptState` error and the file is left exactly as found.
    pub fn load(data_dir: &Path) -> Result<Self> {
        fs::create_dir_all(data_dir)?;
        let path = data_dir.join(STATE_FILE);

        if !path.exists() {
            return Ok(Self {
                path,
                packages: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let state: StateFile =
            serde_json::from_str(&content).map_err(|e| ApkwatchError::CorruptState {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            path,
            packages: state.packages,
        })
    }

    /// Write the full collection back. Serializes to a sibling temporary
    /// file first and renames it over the original, so an interrupted write
    /// never leaves a half-written state file behind.
    pub fn save(&self) -> Result<()> {
        let state = StateFile {
            packages: self.packages.clone(),
        };
        let json = serde_json::to_string_pretty(&state)?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }

    /// Start tracking a package. Adding an id that is already tracked is a
    /// no-op, reported as `AlreadyTracked`.
    pub fn add(&mut self, package_id: &str, added_on: Date) -> AddOutcome {
        if self.contains(package_id) {
            return AddOutcome::AlreadyTracked;
        }
        self.packages.push(TrackedPackage::new(package_id, added_on));
        AddOutcome::Added
    }

    /// Stop tracking a package. Removing an absent id is a no-op, reported
    /// as `NotFound`.
    pub fn remove(&mut self, package_id: &str) -> RemoveOutcome {
        let before = self.packages.len();
        self.packages.retain(|p| p.package_id != package_id);
        if self.packages.len() == before {
            RemoveOutcome::NotFound
        } else {
            RemoveOutcome::Removed
        }
    }

    pub fn contains(&self, package_id: &str) -> bool {
        self.packages.iter().any(|p| p.package_id == package_id)
    }

    pub fn get_mut(&mut self, package_id: &str) -> Option<&mut TrackedPackage> {
        self.packages
            .iter_mut()
            .find(|p| p.package_id == package_id)
    }

    pub fn packages(&self) -> &[TrackedPackage] {
        &self.packages
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;
    use std::collections::HashSet;

    fn store_in(dir: &Path) -> TrackerStore {
        TrackerStore::load(dir).unwrap()
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());
        assert!(store.is_empty());
    }

    #[test]
    fn add_is_idempotent_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert_eq!(
            store.add("com.example.app", date(2024, 1, 1)),
            AddOutcome::Added
        );
        assert_eq!(
            store.add("com.example.app", date(2024, 2, 2)),
            AddOutcome::AlreadyTracked
        );
        assert_eq!(store.len(), 1);
        // The original added_on survives the duplicate add.
        assert_eq!(store.packages()[0].added_on, date(2024, 1, 1));
    }

    #[test]
    fn remove_is_safe_on_absent_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        assert_eq!(store.remove("com.example.app"), RemoveOutcome::NotFound);
        store.add("com.example.app", date(2024, 1, 1));
        assert_eq!(store.remove("com.example.app"), RemoveOutcome::Removed);
        assert!(store.is_empty());
    }

    #[test]
    fn replay_matches_reference_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        let mut reference: HashSet<String> = HashSet::new();

        let ops = [
            ("add", "com.a"),
            ("add", "com.b"),
            ("add", "com.a"),
            ("remove", "com.c"),
            ("remove", "com.a"),
            ("add", "com.c"),
            ("add", "com.a"),
            ("remove", "com.b"),
        ];

        for (op, id) in ops {
            match op {
                "add" => {
                    store.add(id, date(2024, 1, 1));
                    reference.insert(id.to_string());
                }
                _ => {
                    store.remove(id);
                    reference.remove(id);
                }
            }
        }

        let stored: HashSet<String> = store
            .packages()
            .iter()
            .map(|p| p.package_id.clone())
            .collect();
        assert_eq!(stored, reference);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        store.add("com.first", date(2023, 11, 5));
        store.add("com.second", date(2024, 3, 15));
        {
            let pkg = store.get_mut("com.second").unwrap();
            pkg.last_update_seen = Some(date(2024, 3, 10));
            pkg.last_checked = Some("2024-03-15T09:30:00-04:00[America/New_York]".parse().unwrap());
        }
        store.save().unwrap();

        let reloaded = store_in(dir.path());
        assert_eq!(reloaded.packages(), store.packages());
    }

    #[test]
    fn insertion_order_is_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());

        for id in ["com.z", "com.a", "com.m"] {
            store.add(id, date(2024, 1, 1));
        }
        store.save().unwrap();

        let reloaded = store_in(dir.path());
        let order: Vec<&str> = reloaded
            .packages()
            .iter()
            .map(|p| p.package_id.as_str())
            .collect();
        assert_eq!(order, vec!["com.z", "com.a", "com.m"]);
    }

    #[test]
    fn corrupt_file_errors_and_is_left_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATE_FILE);
        fs::write(&path, "{\"packages\": [troncated").unwrap();

        let err = TrackerStore::load(dir.path()).unwrap_err();
        assert!(matches!(err, ApkwatchError::CorruptState { .. }));
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "{\"packages\": [troncated"
        );
    }

    #[test]
    fn save_leaves_no_temporary_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = store_in(dir.path());
        store.add("com.example.app", date(2024, 1, 1));
        store.save().unwrap();

        let entries: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries, vec![STATE_FILE.to_string()]);
    }
}
