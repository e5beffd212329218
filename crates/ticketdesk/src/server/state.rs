//! Shared application state.
//!
//! The store sits behind a mutex and every call runs on the blocking pool.

use std::sync::{Arc, Mutex};

use crate::error::{Error, Result};
use crate::store::RecordStore;

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    store: Arc<Mutex<Box<dyn RecordStore>>>,
    require_fields: bool,
}

impl AppState {
    /// Wrap a store for sharing between requests.
    #[must_use]
    pub fn new(store: Box<dyn RecordStore>, require_fields: bool) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            require_fields,
        }
    }

    /// Whether uploads are checked for blank required fields.
    #[must_use]
    pub fn require_fields(&self) -> bool {
        self.require_fields
    }

    /// Run `f` against the store on the blocking pool.
    ///
    /// Store calls are serialized; one upload never interleaves with another
    /// read or write.
    ///
    /// # Errors
    ///
    /// Returns whatever `f` returns, or an internal error if the store lock
    /// is poisoned or the blocking task fails.
    pub async fn with_store<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut dyn RecordStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let mut guard = store
                .lock()
                .map_err(|_| Error::internal("record store lock poisoned"))?;
            f(&mut **guard)
        })
        .await
        .map_err(|e| Error::internal(format!("store task failed: {e}")))?
    }
}
