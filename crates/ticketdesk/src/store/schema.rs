//! `SQLite` schema definitions for the record store.

/// SQL statement to create the records table.
///
/// `seq` preserves upload order; `id` is whatever the client assigned and is
/// not required to be unique.
pub const CREATE_RECORDS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS records (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id INTEGER NOT NULL,
    name TEXT NOT NULL,
    division TEXT NOT NULL,
    problem TEXT NOT NULL,
    solving TEXT NOT NULL,
    date TEXT NOT NULL,
    device TEXT NOT NULL
)
";

/// SQL statement to create the device lookup table.
pub const CREATE_DEVICES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS devices (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_RECORDS_TABLE,
    CREATE_DEVICES_TABLE,
    CREATE_METADATA_TABLE,
];
