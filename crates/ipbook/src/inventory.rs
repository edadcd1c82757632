//! Inventory state and the add/edit transition core.
//!
//! This module owns the in-memory record list and every rule that governs
//! how form submissions become record mutations: required-field checks,
//! MAC normalization, and the used/unused state transitions. All
//! operations either fully apply or leave the inventory untouched.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::record::{DateStamp, IpRecord, IpType};

static MAC_PATTERN: OnceLock<Regex> = OnceLock::new();

fn mac_pattern() -> &'static Regex {
    MAC_PATTERN.get_or_init(|| Regex::new(r"^[0-9a-f]{12}$").expect("static MAC pattern"))
}

/// Normalize a submitted MAC address.
///
/// Strips `:` and `-` separators and lowercases the rest; the result must
/// be exactly twelve hexadecimal characters.
///
/// # Errors
///
/// Returns [`Error::InvalidMac`] when the stripped value is not 12 hex
/// characters.
pub fn normalize_mac(raw: &str) -> Result<String> {
    let cleaned: String = raw
        .chars()
        .filter(|c| !matches!(c, ':' | '-'))
        .collect::<String>()
        .to_lowercase();
    if mac_pattern().is_match(&cleaned) {
        Ok(cleaned)
    } else {
        Err(Error::invalid_mac(raw))
    }
}

/// Check whether a value is already in normalized MAC form.
#[must_use]
pub fn is_normalized_mac(mac: &str) -> bool {
    mac_pattern().is_match(mac)
}

/// Raw fields submitted by the add form.
///
/// The used-only fields are optional because the form hides them for
/// unallocated addresses; an empty string counts as absent.
#[derive(Debug, Clone, Default)]
pub struct AddForm {
    /// The IP address to track.
    pub ip: String,
    /// Subnet for the address.
    pub subnet: String,
    /// Gateway for the subnet.
    pub gateway: String,
    /// Whether the address is allocated.
    pub used: bool,
    /// Holding account; required when used.
    pub account_number: Option<String>,
    /// Allocation type; required when used.
    pub kind: Option<IpType>,
    /// MAC address in any common notation; required when used.
    pub mac: Option<String>,
    /// Whether the address is bound to the MAC.
    pub bound: bool,
}

/// Raw fields submitted by the edit modal.
///
/// Every field is present in the modal, so none are optional; the
/// used-only values are ignored when `used` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditForm {
    /// Whether the address is allocated after the edit.
    pub used: bool,
    /// Holding account.
    pub account_number: String,
    /// Allocation type.
    pub kind: IpType,
    /// MAC address in any common notation.
    pub mac: String,
    /// Whether the address is bound to the MAC.
    pub bound: bool,
}

fn require<'a>(value: &'a str, field: &'static str) -> Result<&'a str> {
    if value.is_empty() {
        Err(Error::missing_field(field))
    } else {
        Ok(value)
    }
}

fn require_opt<'a>(value: Option<&'a String>, field: &'static str) -> Result<&'a str> {
    require(value.map_or("", String::as_str), field)
}

/// The in-memory record set.
///
/// An explicit state object passed to and returned from handlers; no
/// ambient globals. The whole list is replaced on every successful load
/// or save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    records: Vec<IpRecord>,
}

impl Inventory {
    /// Create an empty inventory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing record list.
    #[must_use]
    pub fn from_records(records: Vec<IpRecord>) -> Self {
        Self { records }
    }

    /// The records in insertion order.
    #[must_use]
    pub fn records(&self) -> &[IpRecord] {
        &self.records
    }

    /// Consume the inventory, yielding the record list.
    #[must_use]
    pub fn into_records(self) -> Vec<IpRecord> {
        self.records
    }

    /// Number of tracked addresses.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the inventory is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Check whether an IP is already tracked.
    #[must_use]
    pub fn contains(&self, ip: &str) -> bool {
        self.records.iter().any(|r| r.ip == ip)
    }

    /// Look up a record by IP.
    #[must_use]
    pub fn get(&self, ip: &str) -> Option<&IpRecord> {
        self.records.iter().find(|r| r.ip == ip)
    }

    /// Add a new record from raw form fields.
    ///
    /// Validation order: the address fields are required first; for used
    /// addresses the account and type, then the MAC (normalized and
    /// format-checked); finally the IP must not already be tracked. On any
    /// failure the inventory is left unmodified.
    ///
    /// # Errors
    ///
    /// Returns a validation error as described above.
    pub fn add(&mut self, form: &AddForm) -> Result<&IpRecord> {
        require(&form.ip, "ip")?;
        require(&form.subnet, "subnet")?;
        require(&form.gateway, "gateway")?;

        let mut record = IpRecord::unused(&form.ip, &form.subnet, &form.gateway);

        if form.used {
            let account = require_opt(form.account_number.as_ref(), "account_number")?;
            let kind = form.kind.ok_or(Error::missing_field("type"))?;
            let mac_raw = require_opt(form.mac.as_ref(), "mac")?;
            let mac = normalize_mac(mac_raw)?;

            record.used = true;
            record.account_number = Some(account.to_string());
            record.kind = Some(kind);
            record.mac = Some(mac);
            record.bound = kind == IpType::Reserved || form.bound;
            record.date_used = Some(DateStamp::Pending);
        }

        if self.contains(&form.ip) {
            return Err(Error::duplicate_ip(&form.ip));
        }

        let index = self.records.len();
        self.records.push(record);
        Ok(&self.records[index])
    }

    /// Apply an edit to the record with the given IP.
    ///
    /// Re-validates the MAC exactly as the add path does when the record
    /// ends up used, then applies the used/unused transition rules and
    /// stamps `last_edited`. On any failure the record is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownIp`] when no record matches, or a MAC
    /// validation error.
    pub fn edit(&mut self, ip: &str, form: &EditForm) -> Result<&IpRecord> {
        let index = self
            .records
            .iter()
            .position(|r| r.ip == ip)
            .ok_or_else(|| Error::unknown_ip(ip))?;

        // Validate before touching the record.
        let mac = if form.used {
            let raw = require(&form.mac, "mac")?;
            Some(normalize_mac(raw)?)
        } else {
            None
        };

        let record = &mut self.records[index];
        if form.used {
            record.used = true;
            record.account_number = Some(form.account_number.clone());
            record.kind = Some(form.kind);
            record.mac = mac;
            record.bound = form.kind == IpType::Reserved || form.bound;
            // Keep the original allocation date across used->used edits.
            if record.date_used.is_none() {
                record.date_used = Some(DateStamp::Pending);
            }
            record.release_date = None;
        } else {
            if record.used {
                record.last_account = record.account_number.clone();
            }
            record.used = false;
            record.account_number = None;
            record.kind = None;
            record.mac = None;
            record.bound = false;
            record.date_used = None;
            record.release_date = Some(DateStamp::Pending);
        }
        record.last_edited = DateStamp::Pending;

        Ok(&self.records[index])
    }
}

/// An in-progress edit of one record.
///
/// Holds a snapshot of the record as it was when the edit opened, so the
/// draft can be restored ("undo") without touching persisted data.
#[derive(Debug, Clone)]
pub struct EditSession {
    original: IpRecord,
    draft: EditForm,
}

impl EditSession {
    /// Open an edit session pre-populated from the given record.
    #[must_use]
    pub fn open(record: &IpRecord) -> Self {
        Self {
            original: record.clone(),
            draft: Self::draft_from(record),
        }
    }

    fn draft_from(record: &IpRecord) -> EditForm {
        EditForm {
            used: record.used,
            account_number: record.account_number.clone().unwrap_or_default(),
            // The modal's type selector shows Reserved first.
            kind: record.kind.unwrap_or(IpType::Reserved),
            mac: record.mac.clone().unwrap_or_default(),
            bound: record.bound,
        }
    }

    /// The snapshot taken when the session opened.
    #[must_use]
    pub fn original(&self) -> &IpRecord {
        &self.original
    }

    /// The current draft.
    #[must_use]
    pub fn draft(&self) -> &EditForm {
        &self.draft
    }

    /// Mutable access to the draft for accumulating edits.
    pub fn draft_mut(&mut self) -> &mut EditForm {
        &mut self.draft
    }

    /// Discard in-progress edits, restoring the draft from the snapshot.
    pub fn undo(&mut self) {
        self.draft = Self::draft_from(&self.original);
    }
}
