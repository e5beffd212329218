//! Record storage for ticketdesk.
//!
//! A store holds the ordered record collection and the device lookup list.
//! Writes are always a full replace: the caller sends the complete collection
//! and the store discards whatever it held before.

pub mod json;
pub mod memory;
pub mod schema;
pub mod sqlite;

use tracing::info;

use crate::config::{Backend, StoreConfig};
use crate::error::Result;
use crate::record::{Device, Record};

pub use json::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence backend for records and devices.
pub trait RecordStore: Send {
    /// Short backend name for logging.
    fn backend_name(&self) -> &'static str;

    /// All records in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list_records(&self) -> Result<Vec<Record>>;

    /// Replace every stored record with `records`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written. On error
    /// the previous collection is left in place where the backend allows it.
    fn replace_records(&mut self, records: &[Record]) -> Result<()>;

    /// The device lookup list.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn list_devices(&self) -> Result<Vec<Device>>;
}

impl std::fmt::Debug for dyn RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("backend", &self.backend_name())
            .finish()
    }
}

/// Open the store selected by `config`.
///
/// # Errors
///
/// Returns an error if the backend cannot be opened or seeded.
pub fn open_store(config: &StoreConfig) -> Result<Box<dyn RecordStore>> {
    let store: Box<dyn RecordStore> = match config.backend {
        Backend::Json => Box::new(JsonFileStore::open(
            config.data_path(),
            config.devices_path(),
            &config.seed_devices,
        )?),
        Backend::Memory => Box::new(MemoryStore::new(&config.seed_devices)),
        Backend::Sqlite => Box::new(SqliteStore::open(
            config.database_path(),
            &config.seed_devices,
        )?),
    };
    info!("Using {} record store", store.backend_name());
    Ok(store)
}
