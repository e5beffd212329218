//! `ticketdesk` - a small IT-support incident tracker
//!
//! This library provides the record store backends, the HTTP API that fronts
//! them, and the client-side dashboard state that drives edits, filtering and
//! pagination before uploading the full record collection.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod logging;
pub mod record;
pub mod server;
pub mod store;

pub use client::ApiClient;
pub use config::Config;
pub use dashboard::Dashboard;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{DayZone, Device, Record};
pub use store::{open_store, RecordStore};
