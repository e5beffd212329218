//! Command-line interface for ticketdesk.
//!
//! This module provides the CLI structure for the `ticketdesk` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, BackendArg, ConfigCommand, DeleteCommand, EditCommand, ExportCommand,
    ListCommand, ServeCommand, ViewArgs,
};

/// ticketdesk - Track IT-support incidents
///
/// Runs the incident API server, or talks to one to list, add, edit,
/// delete and export incidents.
#[derive(Debug, Parser)]
#[command(name = "ticketdesk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server base URL for client commands (overrides config)
    #[arg(short, long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP API server
    Serve(ServeCommand),

    /// Show a page of incidents
    List(ListCommand),

    /// Show the device list
    Devices,

    /// Record a new incident
    Add(AddCommand),

    /// Change an existing incident
    Edit(EditCommand),

    /// Remove an incident
    Delete(DeleteCommand),

    /// Save a page of incidents as an SVG image
    Export(ExportCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
