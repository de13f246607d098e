//! `show` and `open`.

use std::io::Write;
use std::process;

use bibliophant_core::{Record, RecordKind};
use bibliophant_storage::{record_dir, Catalog, Transaction};
use tracing::info;

use super::{command_line, input_records, options, words};
use crate::command::{complete_word, Command};
use crate::context::Context;
use crate::output::Output;
use crate::{Error, Result};

/// `show [verbose]`
pub(crate) struct Show;

impl Command for Show {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let records = input_records(input, "show")?;
        let [verbose] = options("show", &words(args)?, ["verbose"])?;
        let text = describe(&records, verbose);
        ctx.out().write_all(text.as_bytes())?;
        Ok(None)
    }

    fn complete(&self, partial: &str, _catalog: &Catalog) -> Vec<String> {
        complete_word(partial, ["verbose"])
    }
}

/// The text `show` prints for `records`.
pub(crate) fn describe(records: &[Record], verbose: bool) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.key);
        out.push('\n');
        out.push_str("    ");
        out.push_str(&record.title);
        out.push('\n');
        if verbose {
            describe_details(record, &mut out);
        }
        out.push('\n');
    }

    if records.len() > 1 {
        let books = records
            .iter()
            .filter(|r| matches!(r.kind, RecordKind::Book(_)))
            .count();
        out.push_str(&format!(
            "{} records: {} articles, {} books\n",
            records.len(),
            records.len() - books,
            books
        ));
    } else if records.is_empty() {
        out.push_str("No records.\n");
    }
    out
}

fn describe_details(record: &Record, out: &mut String) {
    let authors = record
        .authors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    out.push_str(&format!("    authors:   {}\n", authors));
    match record.month {
        Some(month) => out.push_str(&format!("    year:      {}/{:02}\n", record.year, month)),
        None => out.push_str(&format!("    year:      {}\n", record.year)),
    }
    if !record.tags.is_empty() {
        out.push_str(&format!("    tags:      {}\n", record.tags.join(", ")));
    }
    match &record.kind {
        RecordKind::Article(article) => {
            out.push_str(&format!("    journal:   {}\n", article.journal.name));
        }
        RecordKind::Book(book) => {
            out.push_str(&format!("    publisher: {}\n", book.publisher.name));
        }
    }
    if let Some(doi) = &record.doi {
        out.push_str(&format!("    doi:       {}\n", doi));
    }
    if let Some(eprint) = record.eprint() {
        out.push_str(&format!("    eprint:    {}\n", eprint.eprint));
    }
}

/// `open [folder]`
pub(crate) struct Open;

impl Command for Open {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let records = input_records(input, "open")?;
        let [folder_only] = options("open", &words(args)?, ["folder"])?;

        for record in &records {
            let dir = record_dir(ctx.root(), &record.key);
            if !dir.is_dir() {
                return Err(Error::aborted(format!(
                    "the record folder {} does not exist",
                    dir.display()
                )));
            }
            let pdf = dir.join(record.pdf_file_name());
            let (target, configured, what) = if !folder_only && pdf.is_file() {
                (pdf, &ctx.settings().open_pdf, "opening PDF files")
            } else {
                (dir, &ctx.settings().open_folder, "opening folders")
            };
            let (program, args) = command_line(configured.as_deref().unwrap_or(""), what)?;
            info!(target: "bibliophant::chain", %program, target = %target.display(), "Opening");
            ctx.spawn_viewer(process::Command::new(&program).args(&args).arg(&target))?;
        }
        Ok(None)
    }

    fn complete(&self, partial: &str, _catalog: &Catalog) -> Vec<String> {
        complete_word(partial, ["folder"])
    }
}
