#![deny(warnings)]

//! Persistence layer: scenario storage behind a small port.
//!
//! The engine only needs a move list to replay; how scenarios are stored is
//! the host's business. [`ScenarioStore`] is the synchronous port with an
//! in-memory and a JSON-directory implementation; [`sqlite`] offers the same
//! operations asynchronously over a SQLite pool.

pub mod sqlite;

pub use sqlite::{delete_scenario, init_db, list_scenarios, load_scenario, save_scenario};

use cap_core::{Scenario, ScenarioSummary};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Returns the default SQLite URL used for local scenario saves.
pub fn default_sqlite_url() -> &'static str {
    "sqlite://./saves/scenarios.db"
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid scenario name: {0:?}")]
    InvalidName(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("serialization error: {0}")]
    Serde(String),
    #[error("database error: {0}")]
    Db(String),
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e.to_string())
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Db(e.to_string())
    }
}

const MAX_NAME_LEN: usize = 64;

/// Scenario names double as file names: 1-64 characters of letters, digits,
/// spaces, `_` or `-`, not blank.
pub fn validate_name(name: &str) -> Result<(), StoreError> {
    let ok = !name.trim().is_empty()
        && name.chars().count() <= MAX_NAME_LEN
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, ' ' | '_' | '-'));
    if ok {
        Ok(())
    } else {
        Err(StoreError::InvalidName(name.to_string()))
    }
}

/// Storage port for saved scenarios. Saving under an existing name replaces it.
pub trait ScenarioStore {
    fn save(&mut self, scenario: &Scenario) -> Result<(), StoreError>;
    /// Summaries sorted by name.
    fn list(&self) -> Result<Vec<ScenarioSummary>, StoreError>;
    fn load(&self, name: &str) -> Result<Option<Scenario>, StoreError>;
    /// Returns whether a scenario was removed.
    fn delete(&mut self, name: &str) -> Result<bool, StoreError>;
}

/// Process-local store, mainly for tests and previews.
#[derive(Debug, Default, Clone)]
pub struct MemoryScenarioStore {
    scenarios: BTreeMap<String, Scenario>,
}

impl MemoryScenarioStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScenarioStore for MemoryScenarioStore {
    fn save(&mut self, scenario: &Scenario) -> Result<(), StoreError> {
        validate_name(&scenario.name)?;
        self.scenarios
            .insert(scenario.name.clone(), scenario.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<ScenarioSummary>, StoreError> {
        Ok(self.scenarios.values().map(ScenarioSummary::from).collect())
    }

    fn load(&self, name: &str) -> Result<Option<Scenario>, StoreError> {
        validate_name(name)?;
        Ok(self.scenarios.get(name).cloned())
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        validate_name(name)?;
        Ok(self.scenarios.remove(name).is_some())
    }
}

/// One pretty-printed `<name>.json` file per scenario under a root directory.
#[derive(Debug, Clone)]
pub struct JsonDirScenarioStore {
    root: PathBuf,
}

impl JsonDirScenarioStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        validate_name(name)?;
        Ok(self.root.join(format!("{name}.json")))
    }
}

impl ScenarioStore for JsonDirScenarioStore {
    fn save(&mut self, scenario: &Scenario) -> Result<(), StoreError> {
        let path = self.path_for(&scenario.name)?;
        fs::create_dir_all(&self.root)?;
        let text = serde_json::to_string_pretty(scenario)?;
        // write-then-rename so a crash never leaves a torn file
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text)?;
        fs::rename(&tmp, &path)?;
        info!(scenario = %scenario.name, path = %path.display(), "scenario saved");
        Ok(())
    }

    fn list(&self) -> Result<Vec<ScenarioSummary>, StoreError> {
        if !self.root.exists() {
            return Ok(vec![]);
        }
        let mut out = Vec::new();
        for ent in fs::read_dir(&self.root)? {
            let path = ent?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let text = fs::read_to_string(&path)?;
            match serde_json::from_str::<Scenario>(&text) {
                Ok(s) => out.push(ScenarioSummary::from(&s)),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable scenario"),
            }
        }
        out.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(out)
    }

    fn load(&self, name: &str) -> Result<Option<Scenario>, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&text)?))
    }

    fn delete(&mut self, name: &str) -> Result<bool, StoreError> {
        let path = self.path_for(name)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!(scenario = name, "scenario deleted");
        Ok(true)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use cap_core::{MoveRecord, PlayerId, ReleaseMove, ScenarioMove};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;

    pub fn scenario(name: &str, moves: usize) -> Scenario {
        let at = Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();
        Scenario {
            name: name.to_string(),
            team: "KC".to_string(),
            saved_at: at,
            roster_edits: vec![],
            moves: (0..moves)
                .map(|i| MoveRecord {
                    at,
                    action: ScenarioMove::Release(ReleaseMove {
                        player_id: PlayerId(format!("p{i}")),
                        penalty: Decimal::new(6_000_000, 0),
                        savings: Decimal::new(2_500_000, 0),
                    }),
                })
                .collect(),
        }
    }

    fn exercise(store: &mut dyn ScenarioStore) {
        store.save(&scenario("b plan", 2)).unwrap();
        store.save(&scenario("a plan", 1)).unwrap();
        store.save(&scenario("b plan", 3)).unwrap();

        let list = store.list().unwrap();
        let names: Vec<&str> = list.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a plan", "b plan"]);
        assert_eq!(list[1].move_count, 3);

        let loaded = store.load("b plan").unwrap().unwrap();
        assert_eq!(loaded, scenario("b plan", 3));
        assert!(store.load("missing").unwrap().is_none());

        assert!(store.delete("a plan").unwrap());
        assert!(!store.delete("a plan").unwrap());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    fn rejects_bad_names(store: &mut dyn ScenarioStore) {
        for bad in ["", "../escape", "a/b"] {
            assert!(matches!(store.load(bad), Err(StoreError::InvalidName(_))), "{bad:?}");
            assert!(matches!(store.delete(bad), Err(StoreError::InvalidName(_))), "{bad:?}");
        }
    }

    #[test]
    fn memory_store_ops() {
        let mut store = MemoryScenarioStore::new();
        exercise(&mut store);
        rejects_bad_names(&mut store);
    }

    #[test]
    fn json_dir_store_ops() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonDirScenarioStore::new(dir.path().join("scenarios"));
        assert!(store.list().unwrap().is_empty());
        exercise(&mut store);
        rejects_bad_names(&mut store);
        assert!(dir.path().join("scenarios/b plan.json").exists());
    }

    #[test]
    fn json_dir_skips_garbage() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("junk.json"), "{not json").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        let mut store = JsonDirScenarioStore::new(dir.path());
        store.save(&scenario("keep", 1)).unwrap();
        let list = store.list().unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "keep");
    }

    #[test]
    fn names_are_checked() {
        assert!(validate_name("Cut veterans - v2").is_ok());
        for bad in ["", "   ", "../escape", "a/b", "x".repeat(65).as_str()] {
            assert!(matches!(validate_name(bad), Err(StoreError::InvalidName(_))), "{bad:?}");
        }
        let mut store = MemoryScenarioStore::new();
        assert!(store.save(&scenario("no/slashes", 0)).is_err());
    }

    #[test]
    fn url_is_sqlite() {
        assert!(default_sqlite_url().starts_with("sqlite://"));
    }
}
