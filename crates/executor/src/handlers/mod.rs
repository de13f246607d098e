//! The bibliography commands.
//!
//! | Module | Commands | Role |
//! |--------|----------|------|
//! | `session` | `exit`, `help` | closed-closed |
//! | `add` | `add article`, `add book` | closed-producing |
//! | `import` | `import doi`, `import arxiv`, `import bib` | closed-producing |
//! | `get` | `get key` ... `get publisher` | closed-producing |
//! | `tags` | `tag`, `untag` | receiving-producing |
//! | `show` | `show`, `open` | receiving-closed |
//! | `export` | `export bibtex` | receiving-closed |
//! | `delete` | `delete` | receiving-closed |
//!
//! This module also holds the helpers the commands share: argument
//! splitting, the optional limit, and filing a new record together with its
//! record folder.

mod add;
mod delete;
mod export;
mod get;
mod import;
mod session;
mod show;
mod tags;

use std::fs;
use std::path::{Path, PathBuf};

use bibliophant_core::{generate_key, Record};
use bibliophant_storage::{record_dir, write_record_file, Transaction};
use tracing::{debug, info};

use crate::context::{move_file, Context, Effect};
use crate::engine::Engine;
use crate::error::BuildError;
use crate::output::Output;
use crate::role::Role;
use crate::{Error, Result};

pub use session::MANUAL;

/// The engine with every bibliography command registered.
pub fn default_engine() -> std::result::Result<Engine, BuildError> {
    Engine::builder()
        .register("exit", Role::ClosedClosed, session::Exit)
        .register("help", Role::ClosedClosed, session::Help)
        .register("add", Role::ClosedProducing, add::group()?)
        .register("import", Role::ClosedProducing, import::group()?)
        .register("get", Role::ClosedProducing, get::group()?)
        .register("tag", Role::ReceivingProducing, tags::TagRecords)
        .register("untag", Role::ReceivingProducing, tags::UntagRecords)
        .register("show", Role::ReceivingClosed, show::Show)
        .register("open", Role::ReceivingClosed, show::Open)
        .register("export", Role::ReceivingClosed, export::group()?)
        .register("delete", Role::ReceivingClosed, delete::Delete)
        .build()
}

// =============================================================================
// Arguments
// =============================================================================

/// Split arguments into words the way a shell would, so paths may be quoted.
pub(crate) fn words(args: &str) -> Result<Vec<String>> {
    shlex::split(args).ok_or_else(|| Error::aborted(format!("cannot split '{}' into words", args)))
}

/// Take an optional limit off the end of `words`.
///
/// The last word counts as a limit when it is an integer; it must then be
/// positive.
pub(crate) fn take_limit(words: &mut Vec<String>) -> Result<Option<usize>> {
    let Some(last) = words.last() else {
        return Ok(None);
    };
    let Ok(limit) = last.parse::<i64>() else {
        return Ok(None);
    };
    if limit <= 0 {
        return Err(Error::aborted(format!(
            "the limit must be a positive integer, not {}",
            limit
        )));
    }
    words.pop();
    Ok(Some(limit as usize))
}

/// Reject anything but the given options; returns which of them were given.
pub(crate) fn options<const N: usize>(
    command: &str,
    words: &[String],
    allowed: [&str; N],
) -> Result<[bool; N]> {
    let mut given = [false; N];
    for word in words {
        match allowed.iter().position(|a| a == word) {
            Some(i) => given[i] = true,
            None => {
                return Err(Error::aborted(format!(
                    "'{}' is not an option of '{}'",
                    word, command
                )))
            }
        }
    }
    Ok(given)
}

/// The records a receiving command got from its predecessor.
pub(crate) fn input_records(input: Option<Output>, command: &str) -> Result<Vec<Record>> {
    input
        .map(Output::into_records)
        .ok_or_else(|| Error::aborted(format!("'{}' received no records", command)))
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (path.strip_prefix('~'), home) {
        (Some(rest), Some(home)) if rest.is_empty() || rest.starts_with('/') => {
            home.join(rest.trim_start_matches('/'))
        }
        _ => PathBuf::from(path),
    }
}

/// Split a configured command line into program and arguments.
pub(crate) fn command_line(line: &str, what: &str) -> Result<(String, Vec<String>)> {
    let mut parts = shlex::split(line).unwrap_or_default();
    if parts.is_empty() {
        return Err(Error::aborted(format!(
            "the command for {} is not configured",
            what
        )));
    }
    let program = parts.remove(0);
    Ok((program, parts))
}

// =============================================================================
// Filing records
// =============================================================================

/// What goes into a new record folder besides the record file.
#[derive(Debug)]
pub(crate) enum Attachment {
    /// Nothing
    None,
    /// Move this PDF in, renamed after the title
    MovePdf(PathBuf),
    /// Copy every non-JSON file of this folder
    CopyFolder(PathBuf),
}

/// Check a user-given PDF path before anything is filed.
pub(crate) fn pdf_argument(word: &str) -> Result<PathBuf> {
    let path = expand_tilde(word);
    if !path.is_file() {
        return Err(Error::aborted(format!(
            "the file '{}' does not exist",
            path.display()
        )));
    }
    let is_pdf = path
        .extension()
        .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
    if !is_pdf {
        return Err(Error::aborted(format!(
            "'{}' is not a PDF file",
            path.display()
        )));
    }
    Ok(path)
}

/// A key that is not taken yet: `key` itself, or `key` followed by the
/// first free suffix `a`, `b`, ..., `z`, `aa`, `ab`, ...
pub(crate) fn free_key(txn: &Transaction<'_>, key: &str) -> String {
    if !txn.contains(key) {
        return key.to_string();
    }
    let single = ('a'..='z').map(|c| c.to_string());
    let double = ('a'..='z').flat_map(|a| ('a'..='z').map(move |b| format!("{}{}", a, b)));
    single
        .chain(double)
        .map(|suffix| format!("{}{}", key, suffix))
        .find(|k| !txn.contains(k))
        .unwrap_or_else(|| key.to_string())
}

/// Let the user edit `draft`, then insert it and create its record folder.
///
/// An empty key is generated from year and authors. Returns the record as
/// stored.
pub(crate) fn file_record(
    txn: &mut Transaction<'_>,
    ctx: &mut Context,
    mut draft: Record,
    attachment: Attachment,
) -> Result<Record> {
    if !draft.key.is_empty() {
        draft.key = free_key(txn, &draft.key);
    }
    let edited = ctx.edit(&draft.to_json()?)?;
    let mut record = Record::from_json(&edited)?;
    if record.key.trim().is_empty() {
        let key = generate_key(record.year, record.authors.iter().map(|a| a.last.as_str()));
        record.key = free_key(txn, &key);
    }
    record.normalize();
    txn.insert(record.clone())?;

    let dir = write_record_file(ctx.root(), &record, false)?;
    ctx.compensate(Effect::RemoveDir(dir.clone()));
    info!(target: "bibliophant::chain", key = %record.key, dir = %dir.display(), "Filed record");

    match attachment {
        Attachment::None => {}
        Attachment::MovePdf(from) => {
            let to = dir.join(record.pdf_file_name());
            move_file(&from, &to)?;
            ctx.compensate(Effect::MoveFile {
                from: to,
                to: from,
            });
        }
        Attachment::CopyFolder(source) => copy_attachments(&source, &dir)?,
    }
    Ok(record)
}

/// Copy the files of a foreign record folder, leaving out record files.
fn copy_attachments(source: &Path, dir: &Path) -> Result<()> {
    for entry in fs::read_dir(source)? {
        let path = entry?.path();
        let is_json = path.extension().is_some_and(|e| e == "json");
        if !path.is_file() || is_json {
            continue;
        }
        if let Some(name) = path.file_name() {
            debug!(target: "bibliophant::chain", file = %path.display(), "Copying attachment");
            fs::copy(&path, dir.join(name))?;
        }
    }
    Ok(())
}

/// Store downloaded PDF bytes in the folder of a filed record.
pub(crate) fn store_pdf(ctx: &Context, record: &Record, bytes: &[u8]) -> Result<PathBuf> {
    let path = record_dir(ctx.root(), &record.key).join(record.pdf_file_name());
    fs::write(&path, bytes)?;
    Ok(path)
}
