//! SQLite-backed store: one `kv_store` table, JSON documents as text.

use std::collections::HashMap;
use std::path::Path;

use parking_lot::Mutex;
use rusqlite::Connection;
use serde_json::Value;
use tracing::debug;

use super::{KvStore, StoreError};

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) `storage.db` inside the data directory.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        std::fs::create_dir_all(&data_dir)?;
        let conn = Connection::open(data_dir.as_ref().join("storage.db"))?;
        Self::with_connection(conn)
    }

    /// Private in-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv_store (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at INTEGER DEFAULT (strftime('%s', 'now'))
            );",
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }
}

impl KvStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let conn = self.conn.lock();
        let result: Result<String, rusqlite::Error> = conn.query_row(
            "SELECT value FROM kv_store WHERE key = ?",
            [key],
            |row| row.get(0),
        );
        match result {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(err) => Err(StoreError::from(err)),
        }
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        debug!(key, "storage.set");
        let text = serde_json::to_string(&value)?;
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, strftime('%s', 'now'))
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = strftime('%s', 'now')",
            rusqlite::params![key, text],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        debug!(key, "storage.remove");
        let conn = self.conn.lock();
        conn.execute("DELETE FROM kv_store WHERE key = ?", [key])?;
        Ok(())
    }

    fn get_all(&self) -> Result<HashMap<String, Value>, StoreError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT key, value FROM kv_store")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut out = HashMap::new();
        for row in rows {
            let (key, text) = row?;
            out.insert(key, serde_json::from_str(&text)?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_get_remove_round_trip() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert_eq!(store.get("pop_settings").unwrap(), None);

        store.set("pop_settings", json!({ "a": 1 })).unwrap();
        assert_eq!(store.get("pop_settings").unwrap(), Some(json!({ "a": 1 })));

        store.set("pop_settings", json!({ "a": 2 })).unwrap();
        assert_eq!(store.get("pop_settings").unwrap(), Some(json!({ "a": 2 })));

        store.remove("pop_settings").unwrap();
        assert_eq!(store.get("pop_settings").unwrap(), None);
    }

    #[test]
    fn get_all_returns_every_key() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.set("a", json!(1)).unwrap();
        store.set("b", json!([1, 2])).unwrap();
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["b"], json!([1, 2]));
    }

    #[test]
    fn opens_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = SqliteStore::open(dir.path()).unwrap();
            store.set("k", json!("v")).unwrap();
        }
        let store = SqliteStore::open(dir.path()).unwrap();
        assert_eq!(store.get("k").unwrap(), Some(json!("v")));
    }
}
