//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::record::IpType;

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Bind address (overrides the configured one)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// The search term (matches IP or account number)
    pub query: String,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Add command arguments.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// The IP address to track
    #[arg(long)]
    pub ip: String,

    /// Subnet for the address
    #[arg(long)]
    pub subnet: String,

    /// Gateway for the subnet
    #[arg(long)]
    pub gateway: String,

    /// Mark the address as allocated
    #[arg(long)]
    pub used: bool,

    /// Holding account (required with --used)
    #[arg(long)]
    pub account: Option<String>,

    /// Allocation type (required with --used)
    #[arg(long, value_enum)]
    pub kind: Option<IpTypeArg>,

    /// MAC address in any common notation (required with --used)
    #[arg(long)]
    pub mac: Option<String>,

    /// Bind the address to the MAC
    #[arg(long)]
    pub bound: bool,
}

/// Edit command arguments.
///
/// Flags not given keep the record's current values, like the modal's
/// pre-populated fields.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// The IP address to edit
    #[arg(long)]
    pub ip: String,

    /// Mark the address as allocated
    #[arg(long, conflicts_with = "release")]
    pub used: bool,

    /// Release the address back to the pool
    #[arg(long)]
    pub release: bool,

    /// Holding account
    #[arg(long)]
    pub account: Option<String>,

    /// Allocation type
    #[arg(long, value_enum)]
    pub kind: Option<IpTypeArg>,

    /// MAC address in any common notation
    #[arg(long)]
    pub mac: Option<String>,

    /// Bind the address to the MAC
    #[arg(long)]
    pub bound: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Inventory file to check (defaults to the configured one)
    #[arg(short, long)]
    pub file: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Allocation type argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum IpTypeArg {
    /// Reserved for an account; always bound
    Reserved,
    /// Statically assigned
    Static,
}

impl From<IpTypeArg> for IpType {
    fn from(arg: IpTypeArg) -> Self {
        match arg {
            IpTypeArg::Reserved => Self::Reserved,
            IpTypeArg::Static => Self::Static,
        }
    }
}
