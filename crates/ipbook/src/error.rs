//! Error types for ipbook.
//!
//! This module defines all error types used throughout the ipbook crate,
//! providing detailed context for debugging and user-facing messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for ipbook operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Validation Errors ===
    /// A required form field was empty or absent.
    #[error("required field '{field}' is missing")]
    MissingField {
        /// Name of the missing field.
        field: &'static str,
    },

    /// A MAC address did not normalize to twelve hex characters.
    #[error("invalid MAC address '{value}': must be 12 hexadecimal characters")]
    InvalidMac {
        /// The value as submitted.
        value: String,
    },

    /// An add was attempted for an IP that is already tracked.
    #[error("IP address {ip} already exists")]
    DuplicateIp {
        /// The conflicting IP address.
        ip: String,
    },

    /// An edit referenced an IP with no record.
    #[error("no record found for IP address {ip}")]
    UnknownIp {
        /// The IP address that was looked up.
        ip: String,
    },

    // === Store Errors ===
    /// Failed to read the backing data file.
    #[error("failed to read inventory file {path}: {source}")]
    StoreRead {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the backing data file.
    #[error("failed to write inventory file {path}: {source}")]
    StoreWrite {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The backing data file held malformed JSON.
    #[error("malformed inventory file {path}: {source}")]
    StoreParse {
        /// Path to the data file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
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

    // === Access Errors ===
    /// The configured role does not permit the requested action.
    #[error("access denied: {action}")]
    AccessDenied {
        /// The action that was refused.
        action: &'static str,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for ipbook operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a missing-field validation error.
    #[must_use]
    pub fn missing_field(field: &'static str) -> Self {
        Self::MissingField { field }
    }

    /// Create an invalid-MAC validation error.
    #[must_use]
    pub fn invalid_mac(value: impl Into<String>) -> Self {
        Self::InvalidMac {
            value: value.into(),
        }
    }

    /// Create a duplicate-IP validation error.
    #[must_use]
    pub fn duplicate_ip(ip: impl Into<String>) -> Self {
        Self::DuplicateIp { ip: ip.into() }
    }

    /// Create an unknown-IP error.
    #[must_use]
    pub fn unknown_ip(ip: impl Into<String>) -> Self {
        Self::UnknownIp { ip: ip.into() }
    }

    /// Create an access-denied error.
    #[must_use]
    pub fn access_denied(action: &'static str) -> Self {
        Self::AccessDenied { action }
    }

    /// Check if this error was raised by form validation.
    ///
    /// Validation errors are blocked locally and never change state, so
    /// callers can present them as user mistakes rather than faults.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidMac { .. }
                | Self::DuplicateIp { .. }
                | Self::UnknownIp { .. }
        )
    }

    /// Check if this error is an access denial.
    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}
