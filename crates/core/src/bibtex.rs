//! BibTeX export
//!
//! Output is UTF-8; no character replacement for legacy BibTeX tools is done.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::record::{Record, RecordKind};

const MONTH_CODES: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

fn field(out: &mut String, name: &str, value: &str) {
    // field names are padded to the width of "archivePrefix"
    let _ = writeln!(out, "\t{:<13} = {{{}}},", name, value);
}

/// Render one record as a BibTeX entry. The record is assumed to be valid.
pub fn record_to_bibtex(record: &Record) -> String {
    let mut out = format!("@{}{{{},\n", record.type_name(), record.key);
    field(&mut out, "title", &record.title);
    let authors: Vec<String> = record.authors.iter().map(|a| a.full_name()).collect();
    field(&mut out, "author", &authors.join(" and "));
    field(&mut out, "year", &record.year.to_string());
    if let Some(code) = record
        .month
        .and_then(|m| MONTH_CODES.get(usize::from(m).wrapping_sub(1)))
    {
        field(&mut out, "month", code);
    }
    if let Some(doi) = &record.doi {
        field(&mut out, "doi", doi);
    }
    match &record.kind {
        RecordKind::Article(article) => {
            field(&mut out, "journal", &article.journal.name);
            if let Some(volume) = &article.volume {
                field(&mut out, "volume", volume);
            }
            if let Some(number) = &article.number {
                field(&mut out, "number", number);
            }
            if let Some(pages) = &article.pages {
                field(&mut out, "pages", pages);
            }
            if let Some(eprint) = &article.eprint {
                match (&eprint.archive_prefix, &eprint.primary_class) {
                    (Some(prefix), Some(class)) if eprint.is_new_style() => {
                        field(&mut out, "archivePrefix", prefix);
                        field(&mut out, "eprint", &eprint.eprint);
                        field(&mut out, "primaryClass", class);
                    }
                    _ => field(&mut out, "eprint", &eprint.eprint),
                }
            }
        }
        RecordKind::Book(book) => {
            field(&mut out, "publisher", &book.publisher.name);
            if let Some(address) = &book.publisher.address {
                field(&mut out, "address", address);
            }
            if let Some(volume) = &book.volume {
                field(&mut out, "volume", volume);
            }
            if let Some(edition) = &book.edition {
                field(&mut out, "edition", edition);
            }
            if let Some(series) = &book.series {
                field(&mut out, "series", series);
            }
        }
    }
    out.push('}');
    out
}

/// Render several records, separated by blank lines.
pub fn records_to_bibtex<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut out = String::new();
    for record in records {
        out.push_str(&record_to_bibtex(record));
        out.push_str("\n\n");
    }
    out
}

/// Write the BibTeX of all records to `path`.
///
/// The parent directory must exist and the file must end in `.bib`. An
/// existing file is replaced only when `overwrite` is set.
pub fn records_to_bibfile<'a, I>(records: I, path: &Path, overwrite: bool) -> Result<()>
where
    I: IntoIterator<Item = &'a Record>,
{
    let parent = match path.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(Error::MissingDirectory(parent.to_path_buf()));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("bib") {
        return Err(Error::NotBibFile(path.to_path_buf()));
    }
    if path.exists() && !overwrite {
        return Err(Error::FileExists(path.to_path_buf()));
    }
    fs::write(path, records_to_bibtex(records))?;
    Ok(())
}
