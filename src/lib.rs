//! Bibliophant - a personal bibliography manager driven by chained queries
//!
//! A collection is a folder holding a catalog of records and one folder per
//! record with its JSON form and attachments. Queries chain commands with
//! `" : "`, each command handing its records to the next:
//!
//! ```ignore
//! use bibliophant::{Context, Session};
//!
//! let mut session = Session::open("/home/me/papers", |root| Context::new(root))?;
//! session.execute("get tag review : export bibtex review.bib")?;
//! ```
//!
//! All queries go through the chain [`Engine`]; a query either applies as a
//! whole or not at all. The data model, storage layer and importers are
//! available as modules for programs that work on a collection directly.

// Re-export the public API from bibliophant-executor
pub use bibliophant_executor::*;

/// Records, validation and BibTeX export.
pub use bibliophant_core as model;
/// Metadata import from Crossref and arXiv.
pub use bibliophant_importers as importers;
/// The collection catalog and its transactions.
pub use bibliophant_storage as storage;
