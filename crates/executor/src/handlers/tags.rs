//! `tag` and `untag`.

use bibliophant_core::{Record, Tag};
use bibliophant_storage::{Catalog, Transaction};
use tracing::debug;

use super::{input_records, options, words};
use crate::command::{complete_word, Command};
use crate::context::Context;
use crate::output::Output;
use crate::{Error, Result};

/// Fresh snapshots of `records` after they were changed in `txn`.
fn refreshed(txn: &Transaction<'_>, records: &[Record]) -> Result<Vec<Record>> {
    records
        .iter()
        .map(|r| Ok(txn.require(&r.key)?.clone()))
        .collect()
}

fn complete_tag(partial: &str, catalog: &Catalog, option: &[&str]) -> Vec<String> {
    if partial.contains(char::is_whitespace) {
        complete_word(partial, option.iter().copied())
    } else {
        complete_word(partial, catalog.tags.keys().map(String::as_str))
    }
}

/// `tag <name> [create [<RRGGBB>]]`
pub(crate) struct TagRecords;

impl Command for TagRecords {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let records = input_records(input, "tag")?;
        let words = words(args)?;
        let (name, create, color) = match words.as_slice() {
            [name] => (name, false, None),
            [name, c] if c == "create" => (name, true, None),
            [name, c, color] if c == "create" => (name, true, Some(color.as_str())),
            [] => return Err(Error::aborted("'tag' requires a tag name")),
            _ => {
                return Err(Error::aborted(
                    "'tag' takes a tag name and optionally 'create' with a color",
                ))
            }
        };

        if txn.tag_info(name).is_none() {
            let confirmed = create
                || ctx.confirm(&format!("The tag '{}' does not exist. Create it?", name));
            if !confirmed {
                return Err(Error::aborted(format!("the tag '{}' does not exist", name)));
            }
            txn.create_tag(Tag::new(name, color)?)?;
        }

        for record in &records {
            if txn.tag(&record.key, name)? {
                debug!(target: "bibliophant::chain", key = %record.key, tag = %name, "Tagged");
            }
        }
        Ok(Some(Output::Records(refreshed(txn, &records)?)))
    }

    fn complete(&self, partial: &str, catalog: &Catalog) -> Vec<String> {
        complete_tag(partial, catalog, &["create"])
    }
}

/// `untag <name> [yes]`
pub(crate) struct UntagRecords;

impl Command for UntagRecords {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let records = input_records(input, "untag")?;
        let words = words(args)?;
        let Some((name, rest)) = words.split_first() else {
            return Err(Error::aborted("'untag' requires a tag name"));
        };
        let [yes] = options("untag", rest, ["yes"])?;
        if txn.tag_info(name).is_none() {
            return Err(bibliophant_storage::Error::TagNotFound(name.clone()).into());
        }

        for record in &records {
            if txn.untag(&record.key, name)? {
                debug!(target: "bibliophant::chain", key = %record.key, tag = %name, "Untagged");
            }
        }

        if txn.tag_usage(name) == 0 {
            let delete = yes
                || ctx.confirm(&format!(
                    "No record carries the tag '{}' anymore. Delete it?",
                    name
                ));
            if delete {
                txn.delete_tag(name)?;
            }
        }
        Ok(Some(Output::Records(refreshed(txn, &records)?)))
    }

    fn complete(&self, partial: &str, catalog: &Catalog) -> Vec<String> {
        complete_tag(partial, catalog, &["yes"])
    }
}
