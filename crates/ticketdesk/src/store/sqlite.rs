//! `SQLite`-backed record store.
//!
//! Records go into a `records` table whose autoincrement `seq` column keeps
//! upload order. Devices go into a `devices` table seeded on first open.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::{Device, Record};

use super::schema::SCHEMA_STATEMENTS;
use super::RecordStore;

/// The current schema version.
pub const SCHEMA_VERSION: i32 = 1;

/// Key used to store the schema version in the metadata table.
const VERSION_KEY: &str = "schema_version";

/// Record store backed by a `SQLite` database.
#[derive(Debug)]
pub struct SqliteStore {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// initializes the schema and seeds the device table when it is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn open<S: AsRef<str>>(path: impl AsRef<Path>, seed_devices: &[S]) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        initialize_schema(&conn)?;
        seed_devices_if_empty(&conn, seed_devices)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory<S: AsRef<str>>(seed_devices: &[S]) -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        initialize_schema(&conn)?;
        seed_devices_if_empty(&conn, seed_devices)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Convert a database row to a Record.
    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<Record> {
        let date_str: String = row.get(5)?;
        let date = DateTime::parse_from_rfc3339(&date_str).map_or_else(
            |_| {
                warn!("Unparseable record date {date_str:?}, using epoch");
                DateTime::<Utc>::UNIX_EPOCH
            },
            |dt| dt.with_timezone(&Utc),
        );

        Ok(Record {
            id: row.get(0)?,
            name: row.get(1)?,
            division: row.get(2)?,
            problem: row.get(3)?,
            solving: row.get(4)?,
            date,
            device: row.get(6)?,
        })
    }
}

impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn list_records(&self) -> Result<Vec<Record>> {
        let mut stmt = self.conn.prepare(
            r"
            SELECT id, name, division, problem, solving, date, device
            FROM records ORDER BY seq ASC
            ",
        )?;

        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn replace_records(&mut self, records: &[Record]) -> Result<()> {
        let tx = self.conn.transaction()?;
        let removed = tx.execute("DELETE FROM records", [])?;
        {
            let mut insert = tx.prepare(
                r"
                INSERT INTO records (id, name, division, problem, solving, date, device)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ",
            )?;
            for record in records {
                insert.execute(params![
                    record.id,
                    record.name,
                    record.division,
                    record.problem,
                    record.solving,
                    record.date.to_rfc3339(),
                    record.device,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Replaced {} records with {}", removed, records.len());
        Ok(())
    }

    fn list_devices(&self) -> Result<Vec<Device>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name FROM devices ORDER BY id ASC")?;

        let devices = stmt
            .query_map([], |row| {
                Ok(Device {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(devices)
    }
}

/// Create all tables if needed and stamp the schema version.
///
/// A database stamped with a newer version than this build understands is
/// refused rather than modified.
///
/// # Errors
///
/// Returns an error if schema creation fails or the stored version is
/// unreadable or newer than [`SCHEMA_VERSION`].
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    for statement in SCHEMA_STATEMENTS {
        conn.execute(statement, [])?;
    }

    match get_schema_version(conn)? {
        0 => set_schema_version(conn, SCHEMA_VERSION),
        v if v > SCHEMA_VERSION => Err(Error::DatabaseMigration {
            message: format!(
                "database schema version {v} is newer than supported version {SCHEMA_VERSION}"
            ),
        }),
        _ => Ok(()),
    }
}

/// Get the schema version, or 0 for a fresh database.
fn get_schema_version(conn: &Connection) -> Result<i32> {
    let value: Option<String> = conn
        .query_row(
            "SELECT value FROM metadata WHERE key = ?1",
            [VERSION_KEY],
            |row| row.get(0),
        )
        .optional()?;

    match value {
        Some(value) => value.parse().map_err(|_| Error::DatabaseMigration {
            message: format!("invalid schema version: {value}"),
        }),
        None => Ok(0),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO metadata (key, value) VALUES (?1, ?2)",
        (VERSION_KEY, version.to_string()),
    )?;
    Ok(())
}

fn seed_devices_if_empty<S: AsRef<str>>(conn: &Connection, seed_devices: &[S]) -> Result<()> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM devices", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(());
    }

    for device in Device::numbered(seed_devices) {
        conn.execute(
            "INSERT INTO devices (id, name) VALUES (?1, ?2)",
            params![device.id, device.name],
        )?;
    }
    info!("Seeded {} devices", seed_devices.len());
    Ok(())
}
