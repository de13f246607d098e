//! Entities a record refers to
//!
//! - Author: last name plus optional first name and email address
//! - Tag: a keyword with an optional display color
//! - Journal / Publisher: where an article or a book appeared
//! - Url: a hyperlink with an optional description
//! - Eprint: a reference to an (arXiv) eprint

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::text::format_string;
use crate::validate;

/// An author of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    /// Last name
    pub last: String,
    /// First name(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    /// Email address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Author {
    /// Create an author from raw names; whitespace and unicode forms are normalised.
    pub fn new(last: &str, first: Option<&str>) -> Result<Self> {
        let author = Self {
            last: format_string(last),
            first: first.map(format_string).filter(|f| !f.is_empty()),
            email: None,
        };
        author.validate()?;
        Ok(author)
    }

    /// Check all fields.
    pub fn validate(&self) -> Result<()> {
        validate::last_name(&self.last)?;
        validate::first_name(self.first.as_deref())?;
        validate::email(self.email.as_deref())
    }

    /// "First Last" as used by BibTeX author lists.
    pub fn full_name(&self) -> String {
        match &self.first {
            Some(first) => format!("{} {}", first, self.last),
            None => self.last.clone(),
        }
    }

    /// Whether `name` refers to this author: either the last name alone or
    /// "Last, First" / "First Last", compared case-insensitively.
    pub fn answers_to(&self, name: &str) -> bool {
        let wanted = format_string(name).to_lowercase();
        wanted == self.last.to_lowercase()
            || wanted == self.to_string().to_lowercase()
            || wanted == self.full_name().to_lowercase()
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.first {
            Some(first) => write!(f, "{}, {}", self.last, first),
            None => write!(f, "{}", self.last),
        }
    }
}

/// A tag with an optional color code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, letters and hyphens only
    pub name: String,
    /// Hexadecimal RGB color code, e.g. `D19F93`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Tag {
    /// Create a validated tag.
    pub fn new(name: &str, color: Option<&str>) -> Result<Self> {
        let tag = Self {
            name: name.to_string(),
            color: color.map(str::to_string),
        };
        tag.validate()?;
        Ok(tag)
    }

    /// Check all fields.
    pub fn validate(&self) -> Result<()> {
        validate::tag_name(&self.name)?;
        validate::tag_color(self.color.as_deref())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The journal an article was published in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Journal {
    /// Full journal name
    pub name: String,
}

impl Journal {
    /// Create a journal reference from a raw name.
    pub fn new(name: &str) -> Self {
        Self {
            name: format_string(name),
        }
    }
}

/// The publisher of a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publisher {
    /// Publisher name
    pub name: String,
    /// Publisher address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl Publisher {
    /// Check all fields.
    pub fn validate(&self) -> Result<()> {
        validate::publisher_name(&self.name)?;
        validate::address(self.address.as_deref())
    }
}

/// A hyperlink related to a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Url {
    /// The URL itself
    pub url: String,
    /// What the link points to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Url {
    /// Check all fields.
    pub fn validate(&self) -> Result<()> {
        validate::url(&self.url)?;
        validate::url_description(self.description.as_deref())
    }
}

/// A reference to an eprint, usually on the arXiv.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eprint {
    /// The eprint identifier, e.g. `1707.08567` or `hep-th/9901001`
    pub eprint: String,
    /// Archive prefix for new-style identifiers, e.g. `arXiv`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive_prefix: Option<String>,
    /// Primary category for new-style identifiers, e.g. `hep-th`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_class: Option<String>,
}

impl Eprint {
    /// Whether this is a new-style (post April 2007) identifier.
    pub fn is_new_style(&self) -> bool {
        !self.eprint.contains('/')
    }

    /// Check all fields.
    pub fn validate(&self) -> Result<()> {
        validate::eprint(
            &self.eprint,
            self.archive_prefix.as_deref(),
            self.primary_class.as_deref(),
        )
    }
}
