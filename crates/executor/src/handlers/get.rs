//! The `get` group: look up records and pass them on.

use bibliophant_storage::{Catalog, Listing, Transaction};

use super::{take_limit, words};
use crate::command::{complete_word, Command, CommandGroup};
use crate::context::Context;
use crate::error::BuildError;
use crate::output::Output;
use crate::{Error, Result};

pub(crate) fn group() -> std::result::Result<CommandGroup, BuildError> {
    CommandGroup::builder("get")
        .add("key", GetKey)
        .add("title", GetTitle)
        .add("doi", GetDoi)
        .add("arxiv", GetArxiv)
        .add("all", GetList(ListBy::All))
        .add("tag", GetList(ListBy::Tag))
        .add("author", GetList(ListBy::Author))
        .add("journal", GetList(ListBy::Journal))
        .add("publisher", GetList(ListBy::Publisher))
        .build()
}

fn records(records: Vec<bibliophant_core::Record>) -> Result<Option<Output>> {
    Ok(Some(Output::Records(records)))
}

fn single_word(command: &str, args: &str) -> Result<String> {
    let mut words = words(args)?;
    match words.len() {
        1 => Ok(words.remove(0)),
        _ => Err(Error::aborted(format!(
            "'{}' takes exactly one argument",
            command
        ))),
    }
}

// =============================================================================
// Single records
// =============================================================================

struct GetKey;

impl Command for GetKey {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let key = single_word("get key", args)?;
        records(vec![txn.require(&key)?.clone()])
    }

    fn complete(&self, partial: &str, catalog: &Catalog) -> Vec<String> {
        complete_word(partial, catalog.records.keys().map(String::as_str))
    }
}

struct GetTitle;

impl Command for GetTitle {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let part = args.trim();
        if part.is_empty() {
            return Err(Error::aborted("'get title' requires (a part of) a title"));
        }
        let found = txn.find_by_title(part);
        if found.is_empty() {
            return Err(Error::aborted(format!(
                "there is no record with '{}' in its title",
                part
            )));
        }
        records(found)
    }
}

struct GetDoi;

impl Command for GetDoi {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let doi = single_word("get doi", args)?;
        match txn.find_by_doi(&doi) {
            Some(record) => records(vec![record.clone()]),
            None => Err(Error::aborted(format!(
                "there is no record with the DOI '{}'",
                doi
            ))),
        }
    }
}

struct GetArxiv;

impl Command for GetArxiv {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let id = single_word("get arxiv", args)?;
        match txn.find_by_arxiv(&id) {
            Some(record) => records(vec![record.clone()]),
            None => Err(Error::aborted(format!(
                "there is no article with the arXiv id '{}'",
                id
            ))),
        }
    }
}

// =============================================================================
// Listings
// =============================================================================

#[derive(Clone, Copy)]
enum ListBy {
    All,
    Tag,
    Author,
    Journal,
    Publisher,
}

impl ListBy {
    fn command(self) -> &'static str {
        match self {
            ListBy::All => "get all",
            ListBy::Tag => "get tag",
            ListBy::Author => "get author",
            ListBy::Journal => "get journal",
            ListBy::Publisher => "get publisher",
        }
    }
}

/// `get all|tag|author|journal|publisher [<name>] [<limit>]`
struct GetList(ListBy);

impl Command for GetList {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        _ctx: &mut Context,
        _input: Option<Output>,
    ) -> Result<Option<Output>> {
        let by = self.0;
        let mut words = words(args)?;
        let limit = take_limit(&mut words)?;
        let name = words.join(" ");

        let listing = match by {
            ListBy::All if name.is_empty() => Listing::All,
            ListBy::All => {
                return Err(Error::aborted(
                    "'get all' takes only an optional limit",
                ))
            }
            _ if name.is_empty() => {
                return Err(Error::aborted(format!("'{}' requires a name", by.command())))
            }
            ListBy::Tag => {
                if txn.tag_info(&name).is_none() {
                    return Err(bibliophant_storage::Error::TagNotFound(name).into());
                }
                Listing::Tag(&name)
            }
            ListBy::Author => Listing::Author(&name),
            ListBy::Journal => Listing::Journal(&name),
            ListBy::Publisher => Listing::Publisher(&name),
        };
        records(txn.list(listing, limit))
    }

    fn complete(&self, partial: &str, catalog: &Catalog) -> Vec<String> {
        match self.0 {
            ListBy::Tag if !partial.contains(char::is_whitespace) => {
                complete_word(partial, catalog.tags.keys().map(String::as_str))
            }
            _ => Vec::new(),
        }
    }
}
