use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use rusqlite::types::Type;
use uuid::Uuid;

use crate::error::{Result, TallyError};

pub const WORKSPACE_DIR: &str = ".tally";
pub const DB_FILE: &str = "tally.db";

#[derive(Debug)]
pub struct Db {
    conn: Connection,
}

impl Db {
    /// Create a fresh `.tally/` workspace in `root` and open its database.
    pub fn init(root: &Path) -> Result<Self> {
        let dir = root.join(WORKSPACE_DIR);
        if dir.exists() {
            return Err(TallyError::AlreadyInitialized);
        }
        std::fs::create_dir_all(&dir)?;
        Self::open(&dir.join(DB_FILE))
    }

    /// Open the database of an existing workspace rooted at `root`.
    pub fn open_workspace(root: &Path) -> Result<Self> {
        let path = root.join(WORKSPACE_DIR).join(DB_FILE);
        if !path.exists() {
            return Err(TallyError::NotInitialized);
        }
        Self::open(&path)
    }

    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        let db = Self { conn };
        db.create_tables()?;
        Ok(db)
    }

    fn create_tables(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'in_progress',
                progress INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS team_members (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                is_complete INTEGER NOT NULL DEFAULT 0,
                project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
                team_member_id TEXT REFERENCES team_members(id) ON DELETE SET NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
            CREATE INDEX IF NOT EXISTS idx_tasks_member ON tasks(team_member_id);",
        )?;
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

/// Walk up from the current directory to find the nearest `.tally` workspace.
pub fn find_workspace_root() -> Result<PathBuf> {
    let mut dir = std::env::current_dir().map_err(TallyError::Io)?;
    loop {
        if dir.join(WORKSPACE_DIR).exists() {
            return Ok(dir);
        }
        if !dir.pop() {
            return Err(TallyError::NotInitialized);
        }
    }
}

/// Decode a TEXT column written with `Uuid::to_string`.
pub(crate) fn id_from_column(index: usize, raw: String) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}

/// Decode a TEXT column written with `DateTime::to_rfc3339`.
pub(crate) fn timestamp_from_column(index: usize, raw: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(e)))
}
