//! Core types for Bibliophant
//!
//! This crate defines the bibliographic data model shared by every other crate:
//! - Record: an article or a book, keyed by its BibTeX key
//! - Author, Tag, Journal, Publisher, Url, Eprint: the entities a record refers to
//! - Field validation rules for all of the above
//! - Text helpers: string normalisation and key generation
//! - BibTeX export
//! - Error: the error type for validation and export

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bibtex;
pub mod error;
pub mod record;
pub mod text;
pub mod types;
pub mod validate;

pub use bibtex::{record_to_bibtex, records_to_bibfile, records_to_bibtex};
pub use error::{Error, Result};
pub use record::{Article, Book, Record, RecordKind};
pub use text::{format_string, generate_key};
pub use types::{Author, Eprint, Journal, Publisher, Tag, Url};
