//! Field validation rules.
//!
//! Each function checks one field and returns `Error::Invalid` naming the
//! field and the rule it violates. Optional fields are checked only when set.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};

static KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{4}[a-zA-Z]{2,}$").unwrap());
static DOI: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^10[.][0-9]{4,}(?:[.][0-9]+)*/[^\s"&'<>]+$"#).unwrap());
static EMAIL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+$").unwrap());
static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(https?|ftp)://\S+$").unwrap());
static TAG_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-A-Za-z]{3,}$").unwrap());
static TAG_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9A-F]{6}$").unwrap());

/// Earliest accepted year of publication.
pub const MIN_YEAR: i32 = 1800;
/// Latest accepted year of publication.
pub const MAX_YEAR: i32 = 2030;

fn min_chars(field: &'static str, value: &str, min: usize) -> Result<()> {
    if value.chars().count() < min {
        let unit = if min == 1 { "character" } else { "characters" };
        return Err(Error::invalid(
            field,
            format!("must have at least {} {}", min, unit),
        ));
    }
    Ok(())
}

fn optional_min_chars(field: &'static str, value: Option<&str>, min: usize) -> Result<()> {
    match value {
        Some(v) => min_chars(field, v, min),
        None => Ok(()),
    }
}

/// The record key doubles as BibTeX key and folder name.
pub fn key(key: &str) -> Result<()> {
    if !KEY.is_match(key) {
        return Err(Error::invalid("key", format!("must match {}", KEY.as_str())));
    }
    Ok(())
}

/// Check a title.
pub fn title(title: &str) -> Result<()> {
    min_chars("title", title, 6)
}

/// Check a year of publication.
pub fn year(year: i32) -> Result<()> {
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return Err(Error::invalid(
            "year",
            format!("must be between {} and {}", MIN_YEAR, MAX_YEAR),
        ));
    }
    Ok(())
}

/// Check a month of publication.
pub fn month(month: Option<u8>) -> Result<()> {
    match month {
        Some(m) if !(1..=12).contains(&m) => {
            Err(Error::invalid("month", "must be between 1 and 12"))
        }
        _ => Ok(()),
    }
}

/// Check a digital object identifier (without URL prefix).
pub fn doi(doi: Option<&str>) -> Result<()> {
    match doi {
        Some(d) if !DOI.is_match(d) => {
            Err(Error::invalid("doi", format!("must match {}", DOI.as_str())))
        }
        _ => Ok(()),
    }
}

/// Check a free-form note.
pub fn note(note: Option<&str>) -> Result<()> {
    optional_min_chars("note", note, 2)
}

/// Check an author's last name.
pub fn last_name(last: &str) -> Result<()> {
    min_chars("last", last, 2)
}

/// Check an author's first name.
pub fn first_name(first: Option<&str>) -> Result<()> {
    optional_min_chars("first", first, 2)
}

/// Check an author's email address.
pub fn email(email: Option<&str>) -> Result<()> {
    match email {
        Some(e) if !EMAIL.is_match(e) => {
            Err(Error::invalid("email", format!("must match {}", EMAIL.as_str())))
        }
        _ => Ok(()),
    }
}

/// Check a hyperlink.
pub fn url(url: &str) -> Result<()> {
    if !URL.is_match(url) {
        return Err(Error::invalid("url", format!("must match {}", URL.as_str())));
    }
    Ok(())
}

/// Check the description of a hyperlink.
pub fn url_description(description: Option<&str>) -> Result<()> {
    optional_min_chars("description", description, 3)
}

/// Check a tag name.
pub fn tag_name(name: &str) -> Result<()> {
    if !TAG_NAME.is_match(name) {
        return Err(Error::invalid(
            "tag name",
            format!("must match {}", TAG_NAME.as_str()),
        ));
    }
    Ok(())
}

/// Check a tag color, a hexadecimal RGB code such as `D19F93`.
pub fn tag_color(color: Option<&str>) -> Result<()> {
    match color {
        Some(c) if !TAG_COLOR.is_match(c) => Err(Error::invalid(
            "tag color",
            format!("must match {}", TAG_COLOR.as_str()),
        )),
        _ => Ok(()),
    }
}

/// Check a journal name.
pub fn journal_name(name: &str) -> Result<()> {
    min_chars("journal", name, 4)
}

/// Check a publisher name.
pub fn publisher_name(name: &str) -> Result<()> {
    min_chars("publisher", name, 4)
}

/// Check a publisher address.
pub fn address(address: Option<&str>) -> Result<()> {
    optional_min_chars("address", address, 4)
}

/// Check an eprint reference.
///
/// Old-style arXiv identifiers (before April 2007) contain a slash and carry
/// neither archive prefix nor primary class; new-style identifiers need both.
pub fn eprint(
    eprint: &str,
    archive_prefix: Option<&str>,
    primary_class: Option<&str>,
) -> Result<()> {
    min_chars("eprint", eprint, 9)?;
    if eprint.contains('/') {
        if archive_prefix.is_some() {
            return Err(Error::invalid(
                "archive_prefix",
                "is not allowed for old-style identifiers",
            ));
        }
        if primary_class.is_some() {
            return Err(Error::invalid(
                "primary_class",
                "is not allowed for old-style identifiers",
            ));
        }
        return Ok(());
    }
    match (archive_prefix, primary_class) {
        (Some(prefix), Some(class)) => {
            min_chars("archive_prefix", prefix, 5)?;
            min_chars("primary_class", class, 5)
        }
        (None, _) => Err(Error::invalid(
            "archive_prefix",
            "is required for new-style identifiers",
        )),
        (_, None) => Err(Error::invalid(
            "primary_class",
            "is required for new-style identifiers",
        )),
    }
}

/// Check one of the short free-form fields (volume, number, pages, edition).
pub fn short_field(field: &'static str, value: Option<&str>) -> Result<()> {
    optional_min_chars(field, value, 1)
}

/// Check a book series.
pub fn series(series: Option<&str>) -> Result<()> {
    optional_min_chars("series", series, 3)
}

/// Check an abstract.
pub fn abstract_text(text: Option<&str>) -> Result<()> {
    optional_min_chars("abstract", text, 10)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_pattern() {
        assert!(key("2012GregoryStone").is_ok());
        assert!(key("12GregoryStone").is_err());
        assert!(key("2012G").is_err());
        assert!(key("2012Gregory Stone").is_err());
    }

    #[test]
    fn test_year_bounds() {
        assert!(year(1800).is_ok());
        assert!(year(2030).is_ok());
        assert!(year(1799).is_err());
        assert!(year(2031).is_err());
    }

    #[test]
    fn test_doi_pattern() {
        assert!(doi(Some("10.1103/PhysRevLett.116.061102")).is_ok());
        assert!(doi(Some("10.1000/xyz")).is_ok());
        assert!(doi(None).is_ok());
        assert!(doi(Some("https://doi.org/10.1000/xyz")).is_err());
        assert!(doi(Some("10.12/short")).is_err());
    }

    #[test]
    fn test_tag_rules() {
        assert!(tag_name("read-me").is_ok());
        assert!(tag_name("ab").is_err());
        assert!(tag_name("to read").is_err());
        assert!(tag_color(Some("D19F93")).is_ok());
        assert!(tag_color(Some("d19f93")).is_err());
    }

    #[test]
    fn test_eprint_styles() {
        assert!(eprint("1707.08567", Some("arXiv"), Some("hep-th")).is_ok());
        assert!(eprint("hep-th/9901001", None, None).is_ok());
        assert!(eprint("hep-th/9901001", Some("arXiv"), None).is_err());
        assert!(eprint("1707.08567", None, Some("hep-th")).is_err());
        assert!(eprint("1707.0856", Some("arXiv"), Some("hep-th")).is_ok());
        assert!(eprint("17.08", Some("arXiv"), Some("hep-th")).is_err());
    }

    #[test]
    fn test_url_pattern() {
        assert!(url("https://arxiv.org/abs/1707.08567").is_ok());
        assert!(url("ftp://example.org/file").is_ok());
        assert!(url("mailto:someone@example.org").is_err());
    }

    #[test]
    fn test_min_chars_message() {
        let err = title("Short").unwrap_err();
        assert_eq!(err.to_string(), "title must have at least 6 characters");
        let err = short_field("pages", Some("")).unwrap_err();
        assert_eq!(err.to_string(), "pages must have at least 1 character");
    }
}
