//! Metadata importers for Bibliophant
//!
//! - Crossref: unixref XML for a DOI
//! - arXiv: Atom feed for an eprint id, completed from Crossref when the
//!   eprint has been published with a DOI
//!
//! Fetching is behind the `MetadataSource` trait so parsing can be tested
//! on canned documents; `HttpSource` is the network implementation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arxiv;
pub mod crossref;
pub mod error;
pub mod http;
pub mod source;
mod xml;

pub use arxiv::{arxiv_to_record, parse_arxiv, ArxivEntry};
pub use crossref::{doi_to_record, parse_unixref};
pub use error::{Error, Result};
pub use http::HttpSource;
pub use source::MetadataSource;
