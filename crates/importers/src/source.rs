//! Where metadata comes from.

use crate::error::Result;

/// A provider of raw metadata documents.
pub trait MetadataSource {
    /// The Crossref unixref XML for a DOI.
    fn crossref_unixref(&self, doi: &str) -> Result<String>;

    /// The arXiv API Atom feed for an eprint id.
    fn arxiv_atom(&self, id: &str) -> Result<String>;

    /// The latest PDF of an eprint.
    fn arxiv_pdf(&self, id: &str) -> Result<Vec<u8>>;
}
