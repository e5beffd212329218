//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};

use crate::config::Backend;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to bind (overrides config)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides config)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Storage backend (overrides config)
    #[arg(short, long, value_enum)]
    pub backend: Option<BackendArg>,
}

/// Storage backend for CLI arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BackendArg {
    /// JSON files
    Json,
    /// Process memory
    Memory,
    /// SQLite database
    Sqlite,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Json => Backend::Json,
            BackendArg::Memory => Backend::Memory,
            BackendArg::Sqlite => Backend::Sqlite,
        }
    }
}

/// Which slice of the table to show.
#[derive(Debug, Args)]
pub struct ViewArgs {
    /// Only show incidents from this day (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<NaiveDate>,

    /// Page to show (1-based)
    #[arg(short, long, default_value = "1")]
    pub page: usize,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Reporter name
    #[arg(long)]
    pub name: String,

    /// Reporter division
    #[arg(long)]
    pub division: String,

    /// Problem description
    #[arg(long)]
    pub problem: String,

    /// How it was solved
    #[arg(long, default_value = "")]
    pub solving: String,

    /// Device name (see `ticketdesk devices`)
    #[arg(long)]
    pub device: String,

    /// When it happened (RFC 3339); defaults to now
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Id of the incident to edit
    pub id: i64,

    /// New reporter name
    #[arg(long)]
    pub name: Option<String>,

    /// New division
    #[arg(long)]
    pub division: Option<String>,

    /// New problem description
    #[arg(long)]
    pub problem: Option<String>,

    /// New solution text
    #[arg(long)]
    pub solving: Option<String>,

    /// New device
    #[arg(long)]
    pub device: Option<String>,

    /// New date (RFC 3339)
    #[arg(long)]
    pub date: Option<DateTime<Utc>>,
}

impl EditCommand {
    /// Text fields given on the command line, by field name.
    #[must_use]
    pub fn field_updates(&self) -> Vec<(&'static str, &str)> {
        [
            ("name", &self.name),
            ("division", &self.division),
            ("problem", &self.problem),
            ("solving", &self.solving),
            ("device", &self.device),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.as_deref().map(|v| (field, v)))
        .collect()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Id of the incident to delete
    pub id: i64,
}

/// Export command arguments.
#[derive(Debug, Args)]
pub struct ExportCommand {
    #[command(flatten)]
    pub view: ViewArgs,

    /// Output file
    #[arg(short, long, default_value = crate::export::DEFAULT_EXPORT_FILE)]
    pub output: PathBuf,
}

/// Configuration management commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate configuration file
    Validate {
        /// Path to config file (defaults to standard location)
        file: Option<PathBuf>,
    },
}
