//! Error types for ticketdesk.
//!
//! This module defines all error types used throughout the ticketdesk crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ticketdesk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A JSON data file could not be read or parsed.
    #[error("failed to read data file {path}: {message}")]
    DataFile {
        /// Path to the data file.
        path: PathBuf,
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Record Errors ===
    /// A record is missing a required field.
    #[error("record {index} is missing required field '{field}'")]
    MissingField {
        /// Position of the record in the submitted collection.
        index: usize,
        /// Name of the empty field.
        field: &'static str,
    },

    /// A field name does not exist on a record.
    #[error("unknown record field: {0}")]
    UnknownField(String),

    /// No record carries the given id.
    #[error("record {id} not found")]
    RecordNotFound {
        /// The requested id.
        id: i64,
    },

    /// The operation is not allowed while a record is being edited.
    #[error("record {id} is being edited; save or cancel first")]
    EditInProgress {
        /// Id of the record under edit.
        id: i64,
    },

    /// A save was requested without an open edit.
    #[error("no record is being edited")]
    NotEditing,

    /// Every id above the current maximum is taken.
    #[error("no record id left above {max}")]
    IdSpaceExhausted {
        /// Largest id in the collection.
        max: i64,
    },

    // === HTTP Errors ===
    /// Failed to bind the HTTP listener.
    #[error("failed to bind {address}: {source}")]
    Bind {
        /// Address that couldn't be bound.
        address: String,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// An HTTP request could not be sent or its body decoded.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for ticketdesk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a data file error.
    #[must_use]
    pub fn data_file(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DataFile {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an API error from a status code and response text.
    #[must_use]
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::NotEditing;
        assert_eq!(err.to_string(), "no record is being edited");

        let err = Error::internal("test error");
        assert_eq!(err.to_string(), "internal error: test error");
    }

    #[test]
    fn test_missing_field_display() {
        let err = Error::MissingField {
            index: 3,
            field: "name",
        };
        assert_eq!(err.to_string(), "record 3 is missing required field 'name'");
    }

    #[test]
    fn test_id_space_exhausted_display() {
        let err = Error::IdSpaceExhausted { max: i64::MAX };
        assert_eq!(
            err.to_string(),
            format!("no record id left above {}", i64::MAX)
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::api(500, "Error saving data");
        assert_eq!(err.to_string(), "server returned 500: Error saving data");
    }

    #[test]
    fn test_data_file_error_display() {
        let err = Error::data_file("/tmp/data.json", "expected value at line 1");
        let msg = err.to_string();
        assert!(msg.contains("/tmp/data.json"));
        assert!(msg.contains("expected value"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_rusqlite_error() {
        let result = rusqlite::Connection::open_with_flags(
            "/nonexistent/path/db.sqlite",
            rusqlite::OpenFlags::SQLITE_OPEN_READ_ONLY,
        );
        if let Err(sqlite_err) = result {
            let err: Error = sqlite_err.into();
            assert!(matches!(err, Error::DatabaseQuery(_)));
        }
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_config_validation_error_display() {
        let err = Error::ConfigValidation {
            message: "port must be greater than 0".to_string(),
        };
        assert!(err.to_string().contains("port must be greater than 0"));
    }

    #[test]
    fn test_bind_error_display() {
        let err = Error::Bind {
            address: "127.0.0.1:5000".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::AddrInUse, "in use"),
        };
        let msg = err.to_string();
        assert!(msg.contains("127.0.0.1:5000"));
        assert!(msg.contains("in use"));
    }

    #[test]
    fn test_directory_create_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}
