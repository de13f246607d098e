//! The command abstraction.
//!
//! A [`Command`] receives the unparsed rest of its chain segment, the query's
//! transaction, the session [`Context`] and the previous command's result.
//! A [`CommandGroup`] is a command that dispatches on the first word of its
//! arguments to one of its sub-commands, so groups nest into trees.

use std::collections::BTreeMap;

use bibliophant_storage::{Catalog, Transaction};

use crate::context::Context;
use crate::error::BuildError;
use crate::output::Output;
use crate::query::split_first_word;
use crate::{Error, Result};

/// A command of the query language.
pub trait Command {
    /// Run the command.
    ///
    /// `input` is the result of the previous command in the chain, `None`
    /// for the first. The return value is handed to the next command.
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>>;

    /// Candidates for the word being typed at the end of `partial`, the
    /// argument text typed so far.
    fn complete(&self, _partial: &str, _catalog: &Catalog) -> Vec<String> {
        Vec::new()
    }
}

/// Whether `name` is something the parser can produce as a token.
pub(crate) fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(char::is_whitespace)
}

/// Candidates from `names` that extend the last word of `partial`.
pub fn complete_word<'a, I>(partial: &str, names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let prefix = last_word(partial);
    names
        .into_iter()
        .filter(|n| n.starts_with(prefix))
        .map(str::to_string)
        .collect()
}

/// The word being typed at the end of `text`.
pub fn last_word(text: &str) -> &str {
    match text.char_indices().rev().find(|(_, c)| c.is_whitespace()) {
        Some((i, c)) => &text[i + c.len_utf8()..],
        None => text,
    }
}

/// A named collection of sub-commands.
pub struct CommandGroup {
    name: String,
    commands: BTreeMap<String, Box<dyn Command>>,
}

impl CommandGroup {
    /// Start building a group.
    pub fn builder(name: &str) -> GroupBuilder {
        GroupBuilder {
            name: name.to_string(),
            entries: Vec::new(),
        }
    }

    /// The group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Names of the sub-commands in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Look up a sub-command.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(|c| c.as_ref())
    }
}

impl Command for CommandGroup {
    fn execute(
        &self,
        args: &str,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
        input: Option<Output>,
    ) -> Result<Option<Output>> {
        let (name, rest) = split_first_word(args);
        if name.is_empty() {
            return Err(Error::MissingSubCommand {
                group: self.name.clone(),
            });
        }
        let command = self.get(name).ok_or_else(|| Error::UnknownSubCommand {
            group: self.name.clone(),
            name: name.to_string(),
        })?;
        command.execute(rest, txn, ctx, input)
    }

    fn complete(&self, partial: &str, catalog: &Catalog) -> Vec<String> {
        let partial = partial.trim_start();
        match partial.find(char::is_whitespace) {
            None => complete_word(partial, self.names()),
            Some(_) => {
                let (name, rest) = split_first_word(partial);
                match self.get(name) {
                    Some(command) => command.complete(rest, catalog),
                    None => Vec::new(),
                }
            }
        }
    }
}

impl std::fmt::Debug for CommandGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandGroup")
            .field("name", &self.name)
            .field("commands", &self.commands.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`CommandGroup`].
pub struct GroupBuilder {
    name: String,
    entries: Vec<(String, Box<dyn Command>)>,
}

impl GroupBuilder {
    /// Add a sub-command.
    pub fn add(mut self, name: &str, command: impl Command + 'static) -> Self {
        self.entries.push((name.to_string(), Box::new(command)));
        self
    }

    /// Finish the group; names must be unique and free of whitespace.
    pub fn build(self) -> std::result::Result<CommandGroup, BuildError> {
        let mut commands = BTreeMap::new();
        for (name, command) in self.entries {
            if !valid_name(&name) {
                return Err(BuildError::InvalidName { name });
            }
            if commands.contains_key(&name) {
                return Err(BuildError::DuplicateCommand {
                    scope: format!("group '{}'", self.name),
                    name,
                });
            }
            commands.insert(name, command);
        }
        Ok(CommandGroup {
            name: self.name,
            commands,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Command for Noop {
        fn execute(
            &self,
            _args: &str,
            _txn: &mut Transaction<'_>,
            _ctx: &mut Context,
            input: Option<Output>,
        ) -> Result<Option<Output>> {
            Ok(input)
        }
    }

    #[test]
    fn test_last_word_after_wide_whitespace() {
        assert_eq!(last_word("get key 2012"), "2012");
        assert_eq!(last_word("get key "), "");
        assert_eq!(last_word("emit foo\u{00A0}"), "");
        assert_eq!(last_word("emit foo\u{3000}ba"), "ba");
        assert_eq!(last_word("single"), "single");
    }

    #[test]
    fn test_group_rejects_duplicates() {
        let err = CommandGroup::builder("get")
            .add("key", Noop)
            .add("key", Noop)
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            BuildError::DuplicateCommand {
                scope: "group 'get'".into(),
                name: "key".into()
            }
        );
    }

    #[test]
    fn test_group_rejects_names_with_spaces() {
        assert!(matches!(
            CommandGroup::builder("get").add("by key", Noop).build(),
            Err(BuildError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_group_completion() {
        let group = CommandGroup::builder("get")
            .add("all", Noop)
            .add("arxiv", Noop)
            .add("key", Noop)
            .build()
            .unwrap();
        let catalog = Catalog::default();
        assert_eq!(group.complete("a", &catalog), vec!["all", "arxiv"]);
        assert_eq!(group.complete("", &catalog).len(), 3);
        assert!(group.complete("key 2012", &catalog).is_empty());
    }

    #[test]
    fn test_last_word() {
        assert_eq!(last_word("journal Phys"), "Phys");
        assert_eq!(last_word("journal "), "");
        assert_eq!(last_word("tag"), "tag");
    }
}
