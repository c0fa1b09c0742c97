use rusqlite::{Connection, OptionalExtension, Result};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use tracing::info;

use crate::utils::ensure_parent_dir;

pub fn create_database(path: &Path) -> crate::Result<Connection> {
    ensure_parent_dir(path)?;
    let conn = Connection::open(path)?;
    create_database_with_connection(&conn)?;
    info!(path = %path.display(), "opened archive store");
    Ok(conn)
}

pub fn create_database_with_connection(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS archives (
            url TEXT PRIMARY KEY,
            payload BLOB NOT NULL,
            fetched_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;
    Ok(())
}

pub fn save_archive(conn: &Connection, url: &str, payload: &[u8]) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO archives (url, payload, fetched_at)
         VALUES (?1, ?2, CURRENT_TIMESTAMP)",
        (url, payload),
    )?;
    Ok(())
}

pub fn get_archive(conn: &Connection, url: &str) -> Result<Option<Vec<u8>>> {
    let mut stmt = conn.prepare("SELECT payload FROM archives WHERE url = ?1")?;
    let payload = stmt
        .query_row([url], |row| row.get::<_, Vec<u8>>(0))
        .optional()?;
    Ok(payload)
}

pub fn archive_exists(conn: &Connection, url: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT COUNT(*) FROM archives WHERE url = ?1")?;
    let count: i64 = stmt.query_row([url], |row| row.get(0))?;
    Ok(count > 0)
}

/// On-disk cache of raw archive payloads, shared by the fetches of one run.
pub struct ArchiveStore {
    conn: Mutex<Connection>,
}

impl ArchiveStore {
    pub fn open(path: &Path) -> crate::Result<Self> {
        Ok(Self::with_connection(create_database(path)?))
    }

    pub fn open_in_memory() -> crate::Result<Self> {
        let conn = Connection::open_in_memory()?;
        create_database_with_connection(&conn)?;
        Ok(Self::with_connection(conn))
    }

    fn with_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    pub fn get(&self, url: &str) -> Result<Option<Vec<u8>>> {
        get_archive(&self.lock(), url)
    }

    pub fn put(&self, url: &str, payload: &[u8]) -> Result<()> {
        save_archive(&self.lock(), url, payload)
    }

    pub fn contains(&self, url: &str) -> Result<bool> {
        archive_exists(&self.lock(), url)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
