//! Bibliographic records
//!
//! A `Record` holds the fields shared by every kind of work; `RecordKind`
//! carries what is specific to articles and books. In JSON the kind is
//! flattened into the record and tagged by `"type"`:
//!
//! ```json
//! {"type": "article", "key": "2012GregoryStone", "title": "...", "journal": {"name": "..."}}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::text::format_string;
use crate::types::{Author, Eprint, Journal, Publisher, Url};
use crate::validate;

/// A bibliographic record, identified by its key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique key, also the BibTeX key and the name of the record folder
    pub key: String,
    /// Title of the work
    pub title: String,
    /// Year of publication
    pub year: i32,
    /// Month of publication (1-12)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<u8>,
    /// Author(s), in order of appearance
    pub authors: Vec<Author>,
    /// Names of the tags attached to the record
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Digital object identifier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Free-form note
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    /// Related hyperlinks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub urls: Vec<Url>,
    /// Whether the work is freely available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_access: Option<bool>,
    /// Article or book specific fields
    #[serde(flatten)]
    pub kind: RecordKind,
}

/// The kind of a record with its specific fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecordKind {
    /// A journal article (or an eprint)
    Article(Article),
    /// A book
    Book(Book),
}

/// Fields specific to articles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Journal the article appeared in
    pub journal: Journal,
    /// Journal volume
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    /// Issue number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Page range, `first--last`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<String>,
    /// Eprint reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eprint: Option<Eprint>,
    /// Abstract
    #[serde(
        rename = "abstract",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub abstract_text: Option<String>,
}

/// Fields specific to books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    /// Publisher of the book
    pub publisher: Publisher,
    /// Volume within a multi-volume work
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    /// Edition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edition: Option<String>,
    /// Series the book belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
}

impl RecordKind {
    /// The BibTeX entry type, `article` or `book`.
    pub fn type_name(&self) -> &'static str {
        match self {
            RecordKind::Article(_) => "article",
            RecordKind::Book(_) => "book",
        }
    }
}

impl Record {
    /// Create a record with only the mandatory fields set.
    pub fn new(key: &str, title: &str, year: i32, authors: Vec<Author>, kind: RecordKind) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            year,
            month: None,
            authors,
            tags: Vec::new(),
            doi: None,
            note: None,
            urls: Vec::new(),
            open_access: None,
            kind,
        }
    }

    /// Parse a record from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON form of the record.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// The BibTeX entry type, `article` or `book`.
    pub fn type_name(&self) -> &'static str {
        self.kind.type_name()
    }

    /// The journal, for articles.
    pub fn journal(&self) -> Option<&Journal> {
        match &self.kind {
            RecordKind::Article(article) => Some(&article.journal),
            RecordKind::Book(_) => None,
        }
    }

    /// The publisher, for books.
    pub fn publisher(&self) -> Option<&Publisher> {
        match &self.kind {
            RecordKind::Book(book) => Some(&book.publisher),
            RecordKind::Article(_) => None,
        }
    }

    /// The eprint reference, for articles that have one.
    pub fn eprint(&self) -> Option<&Eprint> {
        match &self.kind {
            RecordKind::Article(article) => article.eprint.as_ref(),
            RecordKind::Book(_) => None,
        }
    }

    /// File name of the record's PDF inside its record folder: the title
    /// without colons and slashes.
    pub fn pdf_file_name(&self) -> String {
        format!("{}.pdf", self.title.replace([':', '/'], ""))
    }

    /// Whether the record carries the named tag.
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t == name)
    }

    /// Normalise whitespace and unicode forms of the human-readable fields.
    pub fn normalize(&mut self) {
        self.title = format_string(&self.title);
        for author in &mut self.authors {
            author.last = format_string(&author.last);
            author.first = author
                .first
                .as_deref()
                .map(format_string)
                .filter(|f| !f.is_empty());
        }
        match &mut self.kind {
            RecordKind::Article(article) => {
                article.journal.name = format_string(&article.journal.name);
                article.abstract_text = article.abstract_text.as_deref().map(format_string);
            }
            RecordKind::Book(book) => {
                book.publisher.name = format_string(&book.publisher.name);
                book.publisher.address = book.publisher.address.as_deref().map(format_string);
                book.series = book.series.as_deref().map(format_string);
            }
        }
    }

    /// Check every field of the record.
    pub fn validate(&self) -> Result<()> {
        validate::key(&self.key)?;
        validate::title(&self.title)?;
        validate::year(self.year)?;
        validate::month(self.month)?;
        validate::doi(self.doi.as_deref())?;
        validate::note(self.note.as_deref())?;

        if self.authors.is_empty() {
            return Err(Error::invalid("authors", "must not be empty"));
        }
        let mut seen = HashSet::new();
        for author in &self.authors {
            author.validate()?;
            if !seen.insert((&author.last, &author.first)) {
                return Err(Error::invalid(
                    "authors",
                    format!("contains '{}' more than once", author),
                ));
            }
        }

        let mut seen = HashSet::new();
        for url in &self.urls {
            url.validate()?;
            if !seen.insert(&url.url) {
                return Err(Error::invalid(
                    "urls",
                    format!("contains '{}' more than once", url.url),
                ));
            }
        }

        let mut seen = HashSet::new();
        for tag in &self.tags {
            validate::tag_name(tag)?;
            if !seen.insert(tag) {
                return Err(Error::invalid(
                    "tags",
                    format!("contains '{}' more than once", tag),
                ));
            }
        }

        match &self.kind {
            RecordKind::Article(article) => {
                validate::journal_name(&article.journal.name)?;
                validate::short_field("volume", article.volume.as_deref())?;
                validate::short_field("number", article.number.as_deref())?;
                validate::short_field("pages", article.pages.as_deref())?;
                if let Some(eprint) = &article.eprint {
                    eprint.validate()?;
                }
                validate::abstract_text(article.abstract_text.as_deref())
            }
            RecordKind::Book(book) => {
                book.publisher.validate()?;
                validate::short_field("volume", book.volume.as_deref())?;
                validate::short_field("edition", book.edition.as_deref())?;
                validate::series(book.series.as_deref())
            }
        }
    }
}
