//! `ipbook` - a flat-file IP address inventory
//!
//! This library provides the record model, the add/edit transition core,
//! the search view-model, and the file-backed store behind the `ipbook`
//! binary and its HTTP endpoints.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod inventory;
pub mod logging;
pub mod record;
pub mod store;
pub mod view;

pub use config::Config;
pub use error::{Error, Result};
pub use inventory::{AddForm, EditForm, EditSession, Inventory};
pub use logging::init_logging;
pub use record::{DateStamp, IpRecord, IpType};
pub use store::{FileStore, MemStore, Store};
pub use view::{search_view, SearchView};
