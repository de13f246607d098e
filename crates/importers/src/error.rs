//! Error types for the importers

use thiserror::Error;

/// Result type alias for import operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while fetching or interpreting metadata
#[derive(Debug, Error)]
pub enum Error {
    /// The document is not well-formed XML
    #[error("malformed XML: {0}")]
    Xml(String),

    /// The service found nothing for the identifier
    #[error("{service} returned no records")]
    NoRecords {
        /// Service name
        service: &'static str,
    },

    /// The service returned several candidates
    #[error("{service} returned more than one record")]
    MultipleRecords {
        /// Service name
        service: &'static str,
    },

    /// A mandatory element is absent
    #[error("the record has no '{0}' element")]
    MissingElement(&'static str),

    /// Neither issue nor article carries a year
    #[error("the record does not contain a year")]
    MissingYear,

    /// A year field is not a number
    #[error("'{0}' is not a valid year")]
    InvalidYear(String),

    /// Issue and article disagree on the year
    #[error("journal_article year {article} != journal_issue year {issue}")]
    YearMismatch {
        /// Year of the journal article
        article: i32,
        /// Year of the journal issue
        issue: i32,
    },

    /// The record describes a different DOI than requested
    #[error("Crossref returned the DOI '{returned}' instead of '{requested}'")]
    DoiMismatch {
        /// The DOI asked for
        requested: String,
        /// The DOI in the response
        returned: String,
    },

    /// Transport failure or unexpected HTTP status
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The eprint download did not yield a PDF
    #[error("the download of {0} did not return a PDF")]
    NotPdf(String),
}

impl From<quick_xml::Error> for Error {
    fn from(e: quick_xml::Error) -> Self {
        Error::Xml(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Http(e.to_string())
    }
}
