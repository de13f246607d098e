//! Storage layer for Bibliophant
//!
//! A collection lives in a root folder:
//! - `bibliophant.json`: the catalog (records, tag/journal/publisher registries)
//! - `.lock`: exclusive process lock held while the collection is open
//! - `<key>/`: one folder per record with `<key>.json` and its attachments
//!
//! All reads and writes go through a `Transaction`, a private working copy of
//! the catalog that is either committed atomically or dropped.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod error;
pub mod record_io;
pub mod store;
pub mod transaction;

pub use catalog::{Catalog, StoredRecord};
pub use error::{Error, Result};
pub use record_io::{load_record_file, record_dir, record_file, write_record_file};
pub use store::{Store, CATALOG_FILE_NAME, LOCK_FILE_NAME};
pub use transaction::{Listing, Transaction};
