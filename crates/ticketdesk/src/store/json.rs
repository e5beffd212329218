//! Flat-file JSON record store.
//!
//! Records live in one JSON array file and devices in another. Every write
//! rewrites the records file in full, pretty-printed with two-space indent,
//! through a temporary file renamed over the target.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::{Device, Record};

use super::RecordStore;

/// Record store backed by two JSON files.
#[derive(Debug)]
pub struct JsonFileStore {
    /// Path to the records file.
    data_path: PathBuf,
    /// Path to the devices file.
    devices_path: PathBuf,
}

impl JsonFileStore {
    /// Open the store, creating missing files.
    ///
    /// A missing records file starts as `[]`; a missing devices file is
    /// written from `seed_devices`. Existing files are left untouched.
    ///
    /// # Errors
    ///
    /// Returns an error if a parent directory or a missing file cannot be
    /// created.
    pub fn open<S: AsRef<str>>(
        data_path: impl Into<PathBuf>,
        devices_path: impl Into<PathBuf>,
        seed_devices: &[S],
    ) -> Result<Self> {
        let data_path = data_path.into();
        let devices_path = devices_path.into();

        ensure_parent(&data_path)?;
        ensure_parent(&devices_path)?;

        if !data_path.exists() {
            info!("Creating empty records file at {}", data_path.display());
            write_pretty(&data_path, &Vec::<Record>::new())?;
        }

        if !devices_path.exists() {
            info!("Seeding devices file at {}", devices_path.display());
            write_pretty(&devices_path, &Device::numbered(seed_devices))?;
        }

        Ok(Self {
            data_path,
            devices_path,
        })
    }

    /// Path to the records file.
    #[must_use]
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    /// Path to the devices file.
    #[must_use]
    pub fn devices_path(&self) -> &Path {
        &self.devices_path
    }
}

impl RecordStore for JsonFileStore {
    fn backend_name(&self) -> &'static str {
        "json"
    }

    fn list_records(&self) -> Result<Vec<Record>> {
        read_json(&self.data_path)
    }

    fn replace_records(&mut self, records: &[Record]) -> Result<()> {
        debug!(
            "Writing {} records to {}",
            records.len(),
            self.data_path.display()
        );
        write_pretty(&self.data_path, records)
    }

    fn list_devices(&self) -> Result<Vec<Device>> {
        read_json(&self.devices_path)
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path).map_err(|e| Error::data_file(path, e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| Error::data_file(path, e.to_string()))
}

/// Write `value` next to `path` and rename it into place, so readers see
/// either the old file or the new one.
fn write_pretty<T: serde::Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(text.as_bytes())?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
