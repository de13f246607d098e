//! arXiv import
//!
//! The arXiv API answers with an Atom feed holding one `entry` per id. When
//! the eprint has been published (`arxiv:doi`), the journal record from
//! Crossref is taken as the base and only the eprint fields come from arXiv.

use bibliophant_core::{
    format_string, generate_key, Article, Author, Eprint, Journal, Record, RecordKind,
};
use tracing::info;

use crate::crossref::doi_to_record;
use crate::error::{Error, Result};
use crate::source::MetadataSource;
use crate::xml;

const SERVICE: &str = "arXiv";

/// Journal name used for articles that only exist as eprints.
pub const ARXIV_JOURNAL: &str = "arXiv e-print";

/// The parts of an arXiv feed entry the importer uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ArxivEntry {
    /// DOI of the published version, if any
    pub doi: Option<String>,
    /// Eprint reference built from the requested id
    pub eprint: Eprint,
    /// Abstract
    pub abstract_text: Option<String>,
    /// Title
    pub title: Option<String>,
    /// Authors, guessing that the last word of a name is the last name
    pub authors: Vec<Author>,
    /// Year and month of first submission
    pub published: Option<(i32, u8)>,
}

impl ArxivEntry {
    /// A record built from the arXiv data alone.
    pub fn into_record(self) -> Result<Record> {
        let (year, month) = self.published.ok_or(Error::MissingYear)?;
        let key = generate_key(year, self.authors.iter().map(|a| a.last.as_str()));
        let mut record = Record::new(
            &key,
            self.title.as_deref().unwrap_or_default(),
            year,
            self.authors,
            RecordKind::Article(Article {
                journal: Journal::new(ARXIV_JOURNAL),
                volume: None,
                number: None,
                pages: None,
                eprint: Some(self.eprint),
                abstract_text: self.abstract_text,
            }),
        );
        record.month = Some(month);
        record.open_access = Some(true);
        Ok(record)
    }

    /// Add the eprint fields to the record of the published version.
    pub fn complete(self, mut base: Record) -> Record {
        if let RecordKind::Article(article) = &mut base.kind {
            article.eprint = Some(self.eprint);
            if self.abstract_text.is_some() {
                article.abstract_text = self.abstract_text;
            }
        }
        base.open_access = Some(true);
        base
    }
}

/// Fetch the record for an arXiv id, consulting Crossref when the eprint
/// carries a DOI.
pub fn arxiv_to_record(source: &dyn MetadataSource, id: &str) -> Result<Record> {
    info!(target: "bibliophant::import", id, "Fetching arXiv metadata");
    let document = source.arxiv_atom(id)?;
    let entry = parse_arxiv(&document, id)?;
    match entry.doi.clone() {
        Some(doi) => {
            let base = doi_to_record(source, &doi)?;
            Ok(entry.complete(base))
        }
        None => entry.into_record(),
    }
}

/// Interpret an arXiv Atom feed for the eprint `id`.
pub fn parse_arxiv(document: &str, id: &str) -> Result<ArxivEntry> {
    let root = xml::parse(document)?;
    let entries = root.descendants("entry");
    let entry = match entries.as_slice() {
        [] => return Err(Error::NoRecords { service: SERVICE }),
        [entry] => *entry,
        _ => return Err(Error::MultipleRecords { service: SERVICE }),
    };

    let authors = entry
        .descendants("author")
        .into_iter()
        .filter_map(|a| a.text_of("name"))
        .map(|name| author_from_name(&name))
        .collect();

    let published = match entry.text_of("published") {
        Some(date) => Some(parse_date(date.trim())?),
        None => None,
    };

    let eprint = if id.contains('/') {
        // old style id (before April 2007)
        Eprint {
            eprint: id.to_string(),
            archive_prefix: None,
            primary_class: None,
        }
    } else {
        Eprint {
            eprint: id.to_string(),
            archive_prefix: Some("arXiv".to_string()),
            primary_class: entry
                .first("category")
                .and_then(|c| c.attr("term"))
                .map(str::to_string),
        }
    };

    Ok(ArxivEntry {
        doi: entry.text_of("arxiv:doi").map(|d| d.trim().to_string()),
        eprint,
        abstract_text: entry.text_of("summary").map(|s| format_string(&s)),
        title: entry.text_of("title").map(|t| format_string(&t)),
        authors,
        published,
    })
}

fn author_from_name(name: &str) -> Author {
    let name = format_string(name);
    match name.rsplit_once(' ') {
        Some((first, last)) => Author {
            last: last.to_string(),
            first: Some(first.to_string()),
            email: None,
        },
        None => Author {
            last: name,
            first: None,
            email: None,
        },
    }
}

fn parse_date(date: &str) -> Result<(i32, u8)> {
    let year = date
        .get(0..4)
        .and_then(|y| y.parse().ok())
        .ok_or_else(|| Error::InvalidYear(date.to_string()))?;
    let month = date
        .get(5..7)
        .and_then(|m| m.parse().ok())
        .ok_or_else(|| Error::InvalidYear(date.to_string()))?;
    Ok((year, month))
}
