use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::candidate::CandidateStore;
use crate::error::StoreError;
use crate::session::InterviewSession;

const CANDIDATES_KEY: &str = "candidates";
const SESSION_KEY: &str = "session";

/// Key-value snapshot store holding JSON documents in SQLite
#[derive(Debug)]
pub struct SnapshotDb {
    conn: Connection,
}

impl SnapshotDb {
    /// Open the database at the default state location
    pub fn new() -> Result<Self, StoreError> {
        let db_path = AppDirs::db_path().unwrap_or_else(|| PathBuf::from("intervue_state.db"));
        Self::open(&db_path)
    }

    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, StoreError> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS snapshots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
            [],
        )?;
        Ok(SnapshotDb { conn })
    }

    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let json = serde_json::to_string(value)?;
        upsert(&self.conn, key, &json, &Utc::now().to_rfc3339())
    }

    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        let json: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM snapshots WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        match json {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Write the candidate list and session together
    pub fn save_state(
        &mut self,
        store: &CandidateStore,
        session: &InterviewSession,
    ) -> Result<(), StoreError> {
        let candidates = serde_json::to_string(store)?;
        let session = serde_json::to_string(session)?;
        let now = Utc::now().to_rfc3339();

        let tx = self.conn.transaction()?;
        upsert(&tx, CANDIDATES_KEY, &candidates, &now)?;
        upsert(&tx, SESSION_KEY, &session, &now)?;
        tx.commit()?;
        Ok(())
    }

    /// Load the last snapshot. Missing or unreadable entries fall back to empty state.
    pub fn load_state(&self) -> Result<(CandidateStore, InterviewSession), StoreError> {
        let store = self.load_or_else(CANDIDATES_KEY, CandidateStore::default)?;
        let session = self.load_or_else(SESSION_KEY, InterviewSession::new)?;
        Ok((store, session))
    }

    fn load_or_else<T, F>(&self, key: &str, fallback: F) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.load(key) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Ok(fallback()),
            Err(StoreError::Encoding(error)) => {
                tracing::warn!(key, %error, "discarding unreadable snapshot");
                Ok(fallback())
            }
            Err(error) => Err(error),
        }
    }
}

fn upsert(conn: &Connection, key: &str, json: &str, updated_at: &str) -> Result<(), StoreError> {
    conn.execute(
        r#"
        INSERT INTO snapshots (key, value, updated_at)
        VALUES (?1, ?2, ?3)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
        params![key, json, updated_at],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resume::ParsedResume;
    use crate::scoring::ScoringConfig;
    use crate::session::SessionContext;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_value() {
        let db = SnapshotDb::open_in_memory().unwrap();
        let mut value = HashMap::new();
        value.insert("a".to_string(), 1);

        db.save("k", &value).unwrap();
        let loaded: Option<HashMap<String, i32>> = db.load("k").unwrap();
        assert_eq!(loaded, Some(value));
    }

    #[test]
    fn test_save_overwrites() {
        let db = SnapshotDb::open_in_memory().unwrap();
        db.save("k", &1).unwrap();
        db.save("k", &2).unwrap();
        assert_eq!(db.load::<i32>("k").unwrap(), Some(2));
    }

    #[test]
    fn test_missing_key_is_none() {
        let db = SnapshotDb::open_in_memory().unwrap();
        assert_eq!(db.load::<i32>("nope").unwrap(), None);
    }

    #[test]
    fn test_corrupt_snapshot_is_error() {
        let db = SnapshotDb::open_in_memory().unwrap();
        db.save("k", &"text").unwrap();
        assert!(matches!(db.load::<i32>("k"), Err(StoreError::Encoding(_))));
    }

    #[test]
    fn test_empty_db_loads_fresh_state() {
        let db = SnapshotDb::open_in_memory().unwrap();
        let (store, session) = db.load_state().unwrap();
        assert!(store.is_empty());
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_unreadable_session_falls_back_to_fresh() {
        let db = SnapshotDb::open_in_memory().unwrap();
        let mut store = CandidateStore::new();
        store.add(crate::candidate::Candidate::new(
            "Jane Doe",
            "jane@example.com",
            "",
            "",
            Vec::new(),
        ));
        db.save(CANDIDATES_KEY, &store).unwrap();
        db.save(SESSION_KEY, &serde_json::json!({ "phase": "Bogus" }))
            .unwrap();

        let (loaded_store, session) = db.load_state().unwrap();
        assert_eq!(loaded_store, store);
        assert_eq!(session.phase(), crate::session::Phase::Idle);
        assert_eq!(session.candidate_id(), None);
        assert_eq!(session.transcript().len(), 1);
    }

    #[test]
    fn test_unreadable_candidates_fall_back_to_empty() {
        let db = SnapshotDb::open_in_memory().unwrap();
        db.save(CANDIDATES_KEY, &"not a store").unwrap();

        let (store, session) = db.load_state().unwrap();
        assert!(store.is_empty());
        assert_eq!(session.phase(), crate::session::Phase::Idle);
    }

    #[test]
    fn test_save_state_overwrites_previous_snapshot() {
        let mut db = SnapshotDb::open_in_memory().unwrap();
        let session = InterviewSession::new();
        db.save_state(&CandidateStore::new(), &session).unwrap();

        let mut store = CandidateStore::new();
        store.add(crate::candidate::Candidate::new("A B", "a@b.io", "", "", Vec::new()));
        db.save_state(&store, &session).unwrap();

        let (loaded, _) = db.load_state().unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn test_state_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("state.db");

        let mut store = CandidateStore::new();
        let mut session = InterviewSession::new();
        let scoring = ScoringConfig::default();
        let mut rng = StdRng::seed_from_u64(5);
        session.start_intake(
            ParsedResume {
                text: "resume".into(),
                name: Some("Jane Doe".into()),
                email: Some("jane@example.com".into()),
                phone: Some("555-123-4567".into()),
            },
            &mut SessionContext {
                store: &mut store,
                scoring: &scoring,
                rng: &mut rng,
            },
        );

        {
            let mut db = SnapshotDb::open(&path).unwrap();
            db.save_state(&store, &session).unwrap();
        }

        let db = SnapshotDb::open(&path).unwrap();
        let (loaded_store, loaded_session) = db.load_state().unwrap();
        assert_eq!(loaded_store, store);
        assert_eq!(loaded_session, session);
        assert!(loaded_session.is_resumable(&loaded_store));
    }
}
