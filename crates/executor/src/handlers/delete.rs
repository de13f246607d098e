//! `delete [yes] [dangling]`

use std::collections::BTreeSet;
use std::io::Write;

use bibliophant_core::RecordKind;
use bibliophant_storage::{record_dir, Catalog, Transaction};
use tracing::info;

use super::{command_line, input_records, options, words};
use crate::command::{complete_word, Command};
use crate::context::{Context, Effect};
use crate::output::Output;
use crate::Result;

pub(crate) struct Delete;

/// Registry entries the deleted records referred to.
#[derive(Default)]
struct Referenced {
    tags: BTreeSet<String>,
    journals: BTreeSet<String>,
    publishers: BTreeSet<String>,
}

impl Command for Delete {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let records = input_records(input, "delete")?;
        let [yes, dangling] = options("delete", &words(args)?, ["yes", "dangling"])?;

        let mut referenced = Referenced::default();
        let mut deleted = 0;
        for record in &records {
            let confirmed = yes
                || ctx.confirm(&format!(
                    "Delete the record '{}' ({})?",
                    record.key, record.title
                ));
            if !confirmed {
                continue;
            }
            let record = txn.delete(&record.key)?;
            referenced.tags.extend(record.tags.iter().cloned());
            match &record.kind {
                RecordKind::Article(a) => {
                    referenced.journals.insert(a.journal.name.clone());
                }
                RecordKind::Book(b) => {
                    referenced.publishers.insert(b.publisher.name.clone());
                }
            }

            let dir = record_dir(ctx.root(), &record.key);
            if dir.exists() {
                let effect = match &ctx.settings().delete_folder {
                    Some(line) => {
                        let (program, mut args) = command_line(line, "deleting folders")?;
                        args.push(dir.to_string_lossy().into_owned());
                        Effect::Run { program, args }
                    }
                    None => Effect::RemoveDir(dir),
                };
                ctx.defer(effect);
            }
            deleted += 1;
        }

        remove_dangling(txn, ctx, &referenced, dangling)?;
        info!(target: "bibliophant::chain", deleted, "Deleted records");
        writeln!(ctx.out(), "Deleted {} of {} records", deleted, records.len())?;
        Ok(None)
    }

    fn complete(&self, partial: &str, _catalog: &Catalog) -> Vec<String> {
        complete_word(partial, ["yes", "dangling"])
    }
}

fn remove_dangling(
    txn: &mut Transaction<'_>,
    ctx: &mut Context,
    referenced: &Referenced,
    without_asking: bool,
) -> Result<()> {
    for tag in txn.dangling_tags() {
        if referenced.tags.contains(&tag)
            && (without_asking
                || ctx.confirm(&format!("The tag '{}' is no longer used. Delete it?", tag)))
        {
            txn.delete_tag(&tag)?;
        }
    }
    for journal in txn.dangling_journals() {
        if referenced.journals.contains(&journal)
            && (without_asking
                || ctx.confirm(&format!(
                    "The journal '{}' is no longer used. Delete it?",
                    journal
                )))
        {
            txn.remove_journal(&journal);
        }
    }
    for publisher in txn.dangling_publishers() {
        if referenced.publishers.contains(&publisher)
            && (without_asking
                || ctx.confirm(&format!(
                    "The publisher '{}' is no longer used. Delete it?",
                    publisher
                )))
        {
            txn.remove_publisher(&publisher);
        }
    }
    Ok(())
}
