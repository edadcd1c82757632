//! Core record types for ipbook.
//!
//! This module defines the data structures for one tracked IP allocation
//! and the date-stamp type the store resolves at save time.

use chrono::NaiveDate;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Wire literal a client may send for "stamp this with the server date".
pub const DATE_PLACEHOLDER: &str = "SERVER_DATE_NOW";

/// Allocation type of a used IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IpType {
    /// Reserved for an account; always bound.
    Reserved,
    /// Statically assigned.
    Static,
}

impl std::fmt::Display for IpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reserved => write!(f, "Reserved"),
            Self::Static => write!(f, "Static"),
        }
    }
}

/// A day-resolution date that may still be awaiting a server-side stamp.
///
/// Clients submit the literal placeholder string for "now"; the store
/// resolves it to a concrete date when the collection is saved. Modeled as
/// an explicit enum so stamping is typed field resolution rather than text
/// substitution over raw JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateStamp {
    /// Awaiting the server date at the next save.
    #[default]
    Pending,
    /// A concrete calendar date.
    On(NaiveDate),
}

impl DateStamp {
    /// Resolve a pending stamp to the given date; set dates pass through.
    #[must_use]
    pub fn resolve(self, today: NaiveDate) -> Self {
        match self {
            Self::Pending => Self::On(today),
            Self::On(_) => self,
        }
    }

    /// Check whether this stamp still awaits resolution.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }

    /// The concrete date, if resolved.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Pending => None,
            Self::On(date) => Some(*date),
        }
    }
}

impl std::fmt::Display for DateStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "{DATE_PLACEHOLDER}"),
            Self::On(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

impl Serialize for DateStamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateStamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        if raw == DATE_PLACEHOLDER {
            return Ok(Self::Pending);
        }
        NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map(Self::On)
            .map_err(|_| D::Error::custom(format!("invalid date stamp: {raw}")))
    }
}

/// One tracked IP allocation with its usage metadata.
///
/// The JSON shape matches the flat file the browser client reads and
/// writes; `kind` travels on the wire as `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRecord {
    /// The IP address; unique key across the record set.
    pub ip: String,

    /// Subnet the address belongs to.
    pub subnet: String,

    /// Gateway for the subnet.
    pub gateway: String,

    /// Whether the address is currently allocated to an account.
    pub used: bool,

    /// Date the address was allocated, if used.
    pub date_used: Option<DateStamp>,

    /// Account currently holding the address, if used.
    pub account_number: Option<String>,

    /// Date the address was last released.
    pub release_date: Option<DateStamp>,

    /// Account that held the address before the last release.
    pub last_account: Option<String>,

    /// Allocation type, if used.
    #[serde(rename = "type")]
    pub kind: Option<IpType>,

    /// Normalized MAC address (12 lowercase hex chars), if used.
    pub mac: Option<String>,

    /// Whether the address is bound to the MAC.
    pub bound: bool,

    /// Date of the last add or edit touching this record.
    #[serde(default)]
    pub last_edited: DateStamp,
}

impl IpRecord {
    /// Create an unallocated record for the given addresses.
    ///
    /// All used-only fields start out empty; `last_edited` awaits the
    /// server stamp.
    #[must_use]
    pub fn unused(
        ip: impl Into<String>,
        subnet: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            ip: ip.into(),
            subnet: subnet.into(),
            gateway: gateway.into(),
            used: false,
            date_used: None,
            account_number: None,
            release_date: None,
            last_account: None,
            kind: None,
            mac: None,
            bound: false,
            last_edited: DateStamp::Pending,
        }
    }

    /// Human-readable usage badge for this record.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.used {
            "In Use"
        } else {
            "Available"
        }
    }

    /// Check the used/unused field invariants for this record.
    ///
    /// Returns a description of the first violation found, or `None` when
    /// the record is consistent.
    #[must_use]
    pub fn invariant_violation(&self) -> Option<String> {
        if self.used {
            if self.account_number.is_none() {
                return Some(format!("{}: used but account_number is null", self.ip));
            }
            if self.kind.is_none() {
                return Some(format!("{}: used but type is null", self.ip));
            }
            match &self.mac {
                None => return Some(format!("{}: used but mac is null", self.ip)),
                Some(mac) if !crate::inventory::is_normalized_mac(mac) => {
                    return Some(format!("{}: mac '{mac}' is not 12 lowercase hex chars", self.ip));
                }
                Some(_) => {}
            }
            if self.kind == Some(IpType::Reserved) && !self.bound {
                return Some(format!("{}: Reserved but not bound", self.ip));
            }
        } else {
            if self.account_number.is_some() || self.kind.is_some() || self.mac.is_some() {
                return Some(format!("{}: unused but carries allocation fields", self.ip));
            }
            if self.bound {
                return Some(format!("{}: unused but bound", self.ip));
            }
        }
        None
    }
}
