//! The `export` group.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use bibliophant_core::{records_to_bibfile, records_to_bibtex};
use bibliophant_storage::{Catalog, Transaction};
use tracing::info;

use super::{expand_tilde, input_records, words};
use crate::command::{complete_word, Command, CommandGroup};
use crate::context::{Context, Effect};
use crate::error::BuildError;
use crate::output::Output;
use crate::{Error, Result};

pub(crate) fn group() -> std::result::Result<CommandGroup, BuildError> {
    CommandGroup::builder("export").add("bibtex", BibTeX).build()
}

/// `export bibtex [<file.bib> [overwrite]]`
struct BibTeX;

impl Command for BibTeX {
    fn execute(
        &self,
        args: &str,
        _txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let records = input_records(input, "export bibtex")?;
        let words = words(args)?;
        let (file, mut overwrite) = match words.as_slice() {
            [] => {
                let text = records_to_bibtex(&records);
                writeln!(ctx.out(), "{}", text)?;
                return Ok(None);
            }
            [file] => (file, false),
            [file, o] if o == "overwrite" => (file, true),
            _ => {
                return Err(Error::aborted(
                    "'export bibtex' takes a file name and optionally 'overwrite'",
                ))
            }
        };

        let path = expand_tilde(file);
        let existed = path.exists();
        if existed && !overwrite {
            overwrite = ctx.confirm(&format!(
                "The file '{}' already exists. Overwrite it?",
                path.display()
            ));
            if !overwrite {
                return Err(Error::aborted(format!(
                    "not overwriting '{}'",
                    path.display()
                )));
            }
        }

        // The replaced file is kept aside until the query commits
        let backup = if existed {
            let backup = backup_path(&path);
            fs::copy(&path, &backup)?;
            Some(backup)
        } else {
            None
        };
        if let Err(e) = records_to_bibfile(&records, &path, overwrite) {
            if let Some(backup) = &backup {
                let _ = fs::remove_file(backup);
            }
            return Err(e.into());
        }
        match backup {
            Some(backup) => {
                ctx.compensate(Effect::MoveFile {
                    from: backup.clone(),
                    to: path.clone(),
                });
                ctx.defer(Effect::RemoveFile(backup));
            }
            None => ctx.compensate(Effect::RemoveFile(path.clone())),
        }
        info!(target: "bibliophant::chain", file = %path.display(), records = records.len(), "Exported BibTeX");
        writeln!(
            ctx.out(),
            "Exported {} records to {}",
            records.len(),
            path.display()
        )?;
        Ok(None)
    }

    fn complete(&self, partial: &str, _catalog: &Catalog) -> Vec<String> {
        if partial.contains(char::is_whitespace) {
            complete_word(partial, ["overwrite"])
        } else {
            Vec::new()
        }
    }
}

/// Hidden sibling holding the previous contents of `path`.
fn backup_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.bak", name))
}
