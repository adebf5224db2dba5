//! `SQLite` backend for saved identities: schema, pragmas, and bounded queries.

use crate::model::types::{Identity, IdentityId};
use crate::storage::{IdentityStore, StoreError};
use rusqlite::{Connection, ErrorCode, params};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// How many VM instructions run between deadline checks.
const PROGRESS_OPS: i32 = 1_000;

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS identities (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    UNIQUE(name, email)
);
";

/// Identity store backed by a single `SQLite` connection.
///
/// Every call runs under the timeout given at open time: lock waits are
/// bounded by `busy_timeout` and running statements are interrupted by a
/// progress handler once the deadline passes. An interrupted write is rolled
/// back by `SQLite`, so a `Timeout` never leaves a partial row behind.
pub struct SqliteStore {
    conn: Connection,
    path: PathBuf,
    timeout: Duration,
}

impl SqliteStore {
    /// Open or create the store at `path`.
    pub fn open(path: &Path, timeout: Duration) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|source| StoreError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let open_err = |source| StoreError::Open {
            path: path.to_path_buf(),
            source,
        };
        let conn = Connection::open(path).map_err(open_err)?;
        conn.busy_timeout(timeout).map_err(open_err)?;
        // `journal_mode` returns a row, so it goes through query_row.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))
            .map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;

        info!(path = %path.display(), timeout_ms = timeout.as_millis() as u64, "opened identity store");
        Ok(Self {
            conn,
            path: path.to_path_buf(),
            timeout,
        })
    }

    /// Open an in-memory store (tests and dry runs).
    pub fn open_in_memory(timeout: Duration) -> Result<Self, StoreError> {
        let open_err = |source| StoreError::Open {
            path: PathBuf::from(":memory:"),
            source,
        };
        let conn = Connection::open_in_memory().map_err(open_err)?;
        conn.execute_batch(SCHEMA).map_err(open_err)?;
        Ok(Self {
            conn,
            path: PathBuf::from(":memory:"),
            timeout,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored identities.
    pub fn count(&self) -> Result<usize, StoreError> {
        self.bounded("count", |conn| {
            conn.query_row("SELECT COUNT(*) FROM identities", [], |row| {
                row.get::<_, i64>(0)
            })
        })
        .map(|n| n as usize)
    }

    /// Direct access to the connection (tests only need this for lock setup).
    pub fn raw(&self) -> &Connection {
        &self.conn
    }

    fn bounded<T>(
        &self,
        op: &'static str,
        f: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> Result<T, StoreError> {
        let started = Instant::now();
        let deadline = started + self.timeout;
        self.conn
            .progress_handler(PROGRESS_OPS, Some(move || Instant::now() >= deadline));
        let result = f(&self.conn);
        self.conn.progress_handler(PROGRESS_OPS, None::<fn() -> bool>);

        debug!(op, elapsed_ms = started.elapsed().as_millis() as u64, ok = result.is_ok(), "store call");
        result.map_err(|source| classify(op, self.timeout, source))
    }
}

fn classify(op: &'static str, after: Duration, source: rusqlite::Error) -> StoreError {
    match source.sqlite_error_code() {
        Some(ErrorCode::OperationInterrupted)
        | Some(ErrorCode::DatabaseBusy)
        | Some(ErrorCode::DatabaseLocked) => StoreError::Timeout { op, after },
        _ => StoreError::Sqlite { op, source },
    }
}

fn row_to_identity(row: &rusqlite::Row<'_>) -> rusqlite::Result<Identity> {
    Ok(Identity {
        id: IdentityId(row.get(0)?),
        name: row.get(1)?,
        email: row.get(2)?,
    })
}

fn insert_or_ignore(conn: &Connection, name: &str, email: &str) -> rusqlite::Result<Option<IdentityId>> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO identities (name, email) VALUES (?1, ?2)",
        params![name.trim(), email.trim()],
    )?;
    Ok((changed > 0).then(|| IdentityId(conn.last_insert_rowid())))
}

impl IdentityStore for SqliteStore {
    fn list(&self) -> Result<Vec<Identity>, StoreError> {
        self.bounded("list", |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, email FROM identities ORDER BY name COLLATE NOCASE ASC, id ASC",
            )?;
            let rows = stmt.query_map([], row_to_identity)?;
            rows.collect()
        })
    }

    fn insert(&self, name: &str, email: &str) -> Result<Option<IdentityId>, StoreError> {
        let inserted = self.bounded("insert", |conn| insert_or_ignore(conn, name, email))?;
        match inserted {
            Some(id) => info!(%id, name = name.trim(), email = email.trim(), "identity inserted"),
            None => debug!(name = name.trim(), email = email.trim(), "identity already stored"),
        }
        Ok(inserted)
    }

    fn delete(&self, id: IdentityId) -> Result<(), StoreError> {
        let removed = self.bounded("delete", |conn| {
            conn.execute("DELETE FROM identities WHERE id = ?1", [id.0])
        })?;
        info!(%id, removed, "identity deleted");
        Ok(())
    }

    fn replace(
        &self,
        id: IdentityId,
        name: &str,
        email: &str,
    ) -> Result<Option<IdentityId>, StoreError> {
        let inserted = self.bounded("replace", |conn| {
            let tx = conn.unchecked_transaction()?;
            tx.execute("DELETE FROM identities WHERE id = ?1", [id.0])?;
            let inserted = insert_or_ignore(&tx, name, email)?;
            tx.commit()?;
            Ok(inserted)
        })?;
        info!(old = %id, new = ?inserted.map(|i| i.0), "identity replaced");
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const T: Duration = Duration::from_secs(2);

    fn test_store() -> (SqliteStore, TempDir) {
        let dir = TempDir::new().unwrap();
        let store = SqliteStore::open(&dir.path().join("users.sqlite3"), T).unwrap();
        (store, dir)
    }

    #[test]
    fn list_sorts_case_insensitively_by_name() {
        let (store, _dir) = test_store();
        store.insert("bob", "b@x.com").unwrap();
        store.insert("Alice", "a@x.com").unwrap();
        store.insert("Carl", "c@x.com").unwrap();

        let names: Vec<String> = store.list().unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["Alice", "bob", "Carl"]);
    }

    #[test]
    fn insert_trims_and_ignores_duplicates() {
        let (store, _dir) = test_store();
        let first = store.insert("  Alice ", " a@x.com").unwrap();
        assert!(first.is_some());
        let second = store.insert("Alice", "a@x.com").unwrap();
        assert_eq!(second, None);

        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Alice");
        assert_eq!(all[0].email, "a@x.com");
        assert_eq!(Some(all[0].id), first);
    }

    #[test]
    fn pair_equality_is_case_sensitive() {
        let (store, _dir) = test_store();
        store.insert("Alice", "a@x.com").unwrap();
        assert!(store.insert("alice", "a@x.com").unwrap().is_some());
        assert_eq!(store.count().unwrap(), 2);
    }

    #[test]
    fn delete_missing_id_is_noop() {
        let (store, _dir) = test_store();
        store.insert("Alice", "a@x.com").unwrap();
        store.delete(IdentityId(999)).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn replace_issues_new_id() {
        let (store, _dir) = test_store();
        let a = store.insert("Alice", "a@x.com").unwrap().unwrap();
        let b = store.replace(a, "Bob", "b@x.com").unwrap().unwrap();
        assert_ne!(a, b);
        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, b);
    }

    #[test]
    fn replace_into_existing_pair_merges() {
        let (store, _dir) = test_store();
        let a = store.insert("Alice", "a@x.com").unwrap().unwrap();
        let b = store.insert("Bob", "b@x.com").unwrap().unwrap();
        assert_eq!(store.replace(a, "Bob", "b@x.com").unwrap(), None);
        let all = store.list().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, b);
    }

    #[test]
    fn reopen_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/users.sqlite3");
        {
            let store = SqliteStore::open(&path, T).unwrap();
            store.insert("Alice", "a@x.com").unwrap();
        }
        let store = SqliteStore::open(&path, T).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn in_memory_store_works() {
        let store = SqliteStore::open_in_memory(T).unwrap();
        store.insert("Alice", "a@x.com").unwrap();
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn long_running_statement_is_interrupted_at_deadline() {
        let store = SqliteStore::open_in_memory(Duration::from_millis(50)).unwrap();
        let started = Instant::now();
        let err = store
            .bounded("spin", |conn| {
                conn.query_row(
                    "WITH RECURSIVE n(x) AS (SELECT 1 UNION ALL SELECT x + 1 FROM n LIMIT 2000000000)
                     SELECT count(*) FROM n",
                    [],
                    |row| row.get::<_, i64>(0),
                )
            })
            .unwrap_err();
        assert!(matches!(err, StoreError::Timeout { op: "spin", .. }), "{err}");
        assert!(started.elapsed() < Duration::from_secs(5));

        // The handler is removed afterwards, so ordinary calls still work.
        store.insert("Alice", "a@x.com").unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }
}
