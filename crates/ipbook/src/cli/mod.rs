//! Command-line interface for ipbook.
//!
//! This module provides the CLI structure for the `ipbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    AddCommand, CheckCommand, ConfigCommand, EditCommand, IpTypeArg, SearchCommand, ServeCommand,
    StatusCommand,
};

/// ipbook - flat-file IP address inventory
///
/// Tracks IP allocations in a single JSON file, served to the browser
/// client over HTTP and editable from the terminal.
#[derive(Debug, Parser)]
#[command(name = "ipbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

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
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Search the inventory by IP or account number
    Search(SearchCommand),

    /// Add a record to the inventory
    Add(AddCommand),

    /// Edit an existing record
    Edit(EditCommand),

    /// Show inventory statistics
    Status(StatusCommand),

    /// Check an inventory file for invariant violations
    Check(CheckCommand),

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
