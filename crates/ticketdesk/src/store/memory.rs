//! In-memory record store.

use tracing::debug;

use crate::error::Result;
use crate::record::{Device, Record};

use super::RecordStore;

/// Keeps records in process memory. Nothing survives a restart.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Vec<Record>,
    devices: Vec<Device>,
}

impl MemoryStore {
    /// Create an empty store with the given device vocabulary.
    #[must_use]
    pub fn new<S: AsRef<str>>(seed_devices: &[S]) -> Self {
        Self {
            records: Vec::new(),
            devices: Device::numbered(seed_devices),
        }
    }
}

impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    fn list_records(&self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn replace_records(&mut self, records: &[Record]) -> Result<()> {
        debug!("Replacing {} records with {}", self.records.len(), records.len());
        self.records = records.to_vec();
        Ok(())
    }

    fn list_devices(&self) -> Result<Vec<Device>> {
        Ok(self.devices.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::contract;

    const SEED: &[&str] = &["PC", "Laptop", "Printer"];

    #[test]
    fn test_starts_empty() {
        contract::starts_empty(&MemoryStore::new(SEED));
    }

    #[test]
    fn test_replace_preserves_order() {
        contract::replace_then_list_preserves_order(&mut MemoryStore::new(SEED));
    }

    #[test]
    fn test_replace_discards_previous() {
        contract::replace_discards_previous(&mut MemoryStore::new(SEED));
    }

    #[test]
    fn test_duplicate_ids() {
        contract::tolerates_duplicate_ids(&mut MemoryStore::new(SEED));
    }

    #[test]
    fn test_devices_seeded() {
        contract::devices_seeded_in_order(&MemoryStore::new(SEED), SEED);
    }
}
