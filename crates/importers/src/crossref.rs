//! Crossref unixref import
//!
//! The unixref document for a journal article looks like
//!
//! ```text
//! journal
//! ├── journal_metadata / full_title
//! ├── journal_issue    / publication_date/year, journal_volume/volume, issue
//! └── journal_article  / titles/title, contributors/person_name,
//!                        publication_date/year, pages, doi_data/doi
//! ```

use bibliophant_core::{format_string, generate_key, Article, Author, Journal, Record, RecordKind};
use tracing::info;

use crate::error::{Error, Result};
use crate::source::MetadataSource;
use crate::xml;

const SERVICE: &str = "Crossref";

/// Fetch and parse the Crossref record for a DOI.
pub fn doi_to_record(source: &dyn MetadataSource, doi: &str) -> Result<Record> {
    info!(target: "bibliophant::import", doi, "Fetching Crossref metadata");
    let document = source.crossref_unixref(doi)?;
    parse_unixref(&document, doi)
}

/// Turn a unixref document into an article record for `doi`.
///
/// The record is not validated: fields the document lacks are left empty
/// for the user to fill in.
pub fn parse_unixref(document: &str, doi: &str) -> Result<Record> {
    let root = xml::parse(document)?;
    let journals = root.descendants("journal");
    let journal = match journals.as_slice() {
        [] => return Err(Error::NoRecords { service: SERVICE }),
        [journal] => *journal,
        _ => return Err(Error::MultipleRecords { service: SERVICE }),
    };

    let metadata = journal.first("journal_metadata");
    let issue = journal.first("journal_issue");
    let article = journal
        .first("journal_article")
        .ok_or(Error::MissingElement("journal_article"))?;

    let authors: Vec<Author> = article
        .descendants("person_name")
        .into_iter()
        .map(|person| Author {
            last: person
                .text_of("surname")
                .map(|s| format_string(&s))
                .unwrap_or_default(),
            first: person.text_of("given_name").map(|s| format_string(&s)),
            email: None,
        })
        .collect();

    let issue_year = issue.and_then(|i| i.text_of("year")).map(parse_year).transpose()?;
    let article_year = article.text_of("year").map(parse_year).transpose()?;
    let year = match (article_year, issue_year) {
        (Some(article), Some(issue)) if article != issue => {
            return Err(Error::YearMismatch { article, issue })
        }
        (Some(year), _) | (None, Some(year)) => year,
        (None, None) => return Err(Error::MissingYear),
    };

    if let Some(returned) = article.text_of("doi") {
        let returned = returned.trim();
        if !returned.eq_ignore_ascii_case(doi) {
            return Err(Error::DoiMismatch {
                requested: doi.to_string(),
                returned: returned.to_string(),
            });
        }
    }

    let journal_name = metadata
        .and_then(|m| m.text_of("full_title"))
        .unwrap_or_default();

    let pages = match (article.text_of("first_page"), article.text_of("last_page")) {
        (Some(first), Some(last)) => Some(format_string(&format!("{}--{}", first, last))),
        (Some(first), None) => Some(format_string(&first)),
        _ => None,
    };

    let key = generate_key(year, authors.iter().map(|a| a.last.as_str()));
    let title = article
        .text_of("title")
        .map(|t| format_string(&t))
        .unwrap_or_default();

    let mut record = Record::new(
        &key,
        &title,
        year,
        authors,
        RecordKind::Article(Article {
            journal: Journal::new(&journal_name),
            volume: issue.and_then(|i| i.text_of("volume")).map(|v| format_string(&v)),
            number: issue.and_then(|i| i.text_of("issue")).map(|n| format_string(&n)),
            pages,
            eprint: None,
            abstract_text: None,
        }),
    );
    record.doi = Some(doi.to_string());
    Ok(record)
}

fn parse_year(text: String) -> Result<i32> {
    text.trim()
        .parse()
        .map_err(|_| Error::InvalidYear(text.trim().to_string()))
}
