pub mod chat;
pub mod comments;
pub mod follows;
pub mod hashtags;
pub mod likes;
pub mod migrations;
pub mod models;
pub mod notifications;
pub mod repair;
pub mod users;
pub mod videos;

use std::path::Path;
use std::sync::Mutex;

/// `?first, ?first+1, ...` placeholder list for batch IN queries.
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|i| format!("?{}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

/// Handle to the embedded database. A single connection guarded by a
/// mutex; WAL mode keeps concurrent readers cheap while writers queue.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self::init(conn)?;
        info!("database opened at {}", path.display());
        Ok(db)
    }

    /// Private in-memory database, used by tests and the demo seeder.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self> {
        // WAL mode for concurrent reads; foreign keys enforce the
        // cascade-delete graph declared in the schema.
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        migrations::run(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {}", e))?;
        f(&conn)
    }

    /// Run `f` inside a transaction: commit on `Ok`, roll back on `Err`.
    ///
    /// Every mutation that pairs a relation row change with a counter
    /// delta goes through here so the two commit together or not at all.
    pub fn with_tx<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| anyhow::anyhow!("db lock poisoned: {}", e))?;
        let tx = conn.transaction()?;
        let out = f(&tx)?;
        tx.commit()?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholders() {
        assert_eq!(placeholders(1, 3), "?1, ?2, ?3");
        assert_eq!(placeholders(2, 1), "?2");
        assert_eq!(placeholders(1, 0), "");
    }

    #[test]
    fn test_tx_rolls_back_on_error() {
        let db = Database::open_in_memory().unwrap();

        let res: Result<()> = db.with_tx(|conn| {
            conn.execute(
                "INSERT INTO hashtags (id, name, videos_count, views_count, is_blocked, created_at, updated_at)
                 VALUES ('h1', 'dance', 0, 0, 0, 0, 0)",
                [],
            )?;
            anyhow::bail!("boom");
        });
        assert!(res.is_err());

        // The insert did not survive the failed transaction.
        let count: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT COUNT(*) FROM hashtags", [], |row| row.get(0))?)
            })
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_tx_commits_on_ok() {
        let db = Database::open_in_memory().unwrap();

        db.with_tx(|conn| {
            conn.execute(
                "INSERT INTO hashtags (id, name, videos_count, views_count, is_blocked, created_at, updated_at)
                 VALUES ('h1', 'dance', 0, 0, 0, 0, 0)",
                [],
            )?;
            Ok(())
        })
        .unwrap();

        let row = db.with_conn(|conn| hashtags::get_by_name(conn, "dance")).unwrap();
        assert!(row.is_some());
    }
}
