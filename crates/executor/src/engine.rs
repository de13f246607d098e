//! The chain engine.
//!
//! A query runs through four stages:
//!
//! ```text
//! Parsing ──► Validated ──► Executing ──► Completed
//!    │                          │
//!    └──────────► Aborted ◄─────┘
//! ```
//!
//! [`Engine::parse`] resolves every segment and checks its role before
//! anything runs, so a malformed chain has no effects at all.
//! [`Engine::run`] then executes the plan inside one transaction and either
//! commits it or rolls it back as a whole.

use std::collections::BTreeMap;

use bibliophant_storage::{Catalog, Store, Transaction};
use tracing::{debug, info, warn};

use crate::command::{complete_word, last_word, valid_name, Command};
use crate::context::Context;
use crate::error::BuildError;
use crate::output::Output;
use crate::query::{split_first_word, split_query, SEPARATOR};
use crate::role::Role;
use crate::{Error, Result};

struct Entry {
    role: Role,
    command: Box<dyn Command>,
}

/// How a query ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The chain ran to the end; the last command's result
    Completed(Option<Output>),
    /// The query asked the session to end
    Exit,
}

/// One resolved segment of a chain.
#[derive(Clone)]
pub struct Segment<'e> {
    name: String,
    role: Role,
    command: &'e dyn Command,
    arguments: String,
}

impl<'e> Segment<'e> {
    /// The command name as written.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The command's role.
    pub fn role(&self) -> Role {
        self.role
    }

    /// The unparsed arguments.
    pub fn arguments(&self) -> &str {
        &self.arguments
    }

    /// The resolved command.
    pub fn command(&self) -> &'e dyn Command {
        self.command
    }
}

impl PartialEq for Segment<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(
            self.command as *const dyn Command as *const (),
            other.command as *const dyn Command as *const (),
        ) && self.name == other.name
            && self.role == other.role
            && self.arguments == other.arguments
    }
}

impl std::fmt::Debug for Segment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segment")
            .field("name", &self.name)
            .field("role", &self.role)
            .field("arguments", &self.arguments)
            .finish()
    }
}

/// A validated chain, ready to execute.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan<'e> {
    segments: Vec<Segment<'e>>,
}

impl<'e> Plan<'e> {
    /// The segments in execution order.
    pub fn segments(&self) -> &[Segment<'e>] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the plan has no segments. Parsing never yields one.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Builder for [`Engine`].
#[derive(Default)]
pub struct EngineBuilder {
    entries: Vec<(String, Role, Box<dyn Command>)>,
}

impl EngineBuilder {
    /// An empty command table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command (or group) under a name and role.
    pub fn register(mut self, name: &str, role: Role, command: impl Command + 'static) -> Self {
        self.entries
            .push((name.to_string(), role, Box::new(command)));
        self
    }

    /// Finish the table. Names must be unique across all roles.
    pub fn build(self) -> std::result::Result<Engine, BuildError> {
        let mut commands = BTreeMap::new();
        for (name, role, command) in self.entries {
            if !valid_name(&name) {
                return Err(BuildError::InvalidName { name });
            }
            if commands.contains_key(&name) {
                return Err(BuildError::DuplicateCommand {
                    scope: "the engine".to_string(),
                    name,
                });
            }
            commands.insert(name, Entry { role, command });
        }
        Ok(Engine { commands })
    }
}

/// The command table and the machinery to run queries against it.
pub struct Engine {
    commands: BTreeMap<String, Entry>,
}

impl Engine {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    /// Role of a registered command.
    pub fn role_of(&self, name: &str) -> Option<Role> {
        self.commands.get(name).map(|e| e.role)
    }

    /// Resolve and validate every segment of a query.
    pub fn parse<'e>(&'e self, query: &str) -> Result<Plan<'e>> {
        let pieces = split_query(query);
        let len = pieces.len();
        let mut segments = Vec::with_capacity(len);

        for (index, piece) in pieces.into_iter().enumerate() {
            let (token, rest) = split_first_word(piece);
            let entry = self
                .commands
                .get(token)
                .ok_or_else(|| Error::UnknownCommand {
                    token: token.to_string(),
                })?;
            if !entry.role.is_legal(index, len) {
                return Err(Error::IllegalPosition {
                    token: token.to_string(),
                    role: entry.role,
                });
            }
            segments.push(Segment {
                name: token.to_string(),
                role: entry.role,
                command: entry.command.as_ref(),
                arguments: rest.to_string(),
            });
        }

        Ok(Plan { segments })
    }

    /// Run the segments of a plan in order, threading each result into the
    /// next command. Stops at the first error.
    pub fn execute_plan(
        &self,
        plan: &Plan<'_>,
        txn: &mut Transaction<'_>,
        ctx: &mut Context,
    ) -> Result<Option<Output>> {
        let mut result = None;
        for (index, segment) in plan.segments.iter().enumerate() {
            debug!(
                target: "bibliophant::chain",
                index,
                command = %segment.name,
                role = %segment.role,
                arguments = %segment.arguments,
                "Executing segment"
            );
            result = segment
                .command
                .execute(&segment.arguments, txn, ctx, result)?;
        }
        Ok(result)
    }

    /// Parse and run a query in its own transaction.
    ///
    /// On success the transaction is committed and deferred file effects
    /// are applied. On any error the transaction is rolled back and the
    /// effects already performed are compensated.
    pub fn run(&self, query: &str, store: &Store, ctx: &mut Context) -> Result<Outcome> {
        ctx.take_exit_request();
        ctx.reap_viewers();
        let plan = self.parse(query)?;
        info!(target: "bibliophant::chain", query, segments = plan.len(), "Running query");

        let mut txn = store.begin();
        let result = match self.execute_plan(&plan, &mut txn, ctx) {
            Ok(result) => result,
            Err(e) => {
                drop(txn);
                warn!(target: "bibliophant::chain", query, error = %e, "Query aborted, rolled back");
                ctx.effects_mut().settle_aborted();
                return Err(e);
            }
        };

        if let Err(e) = store.commit(txn) {
            warn!(target: "bibliophant::chain", query, error = %e, "Commit failed");
            ctx.effects_mut().settle_aborted();
            return Err(e.into());
        }
        ctx.effects_mut().settle_committed();

        if ctx.take_exit_request() {
            return Ok(Outcome::Exit);
        }
        Ok(Outcome::Completed(result))
    }

    /// Completion candidates for the word ending at byte `pos` of `line`.
    ///
    /// Returns the byte offset where the candidates start replacing text.
    /// At the start of a segment the candidates are the command names that
    /// may stand there; after the command name the command completes its
    /// own arguments.
    pub fn complete(&self, line: &str, pos: usize, catalog: &Catalog) -> (usize, Vec<String>) {
        let Some(before) = line.get(..pos) else {
            return (pos, Vec::new());
        };
        let (index, segment_start) = match before.rfind(SEPARATOR) {
            Some(i) => (before.matches(SEPARATOR).count(), i + SEPARATOR.len()),
            None => (0, 0),
        };
        let segment = before[segment_start..].trim_start();
        let word = last_word(segment);
        let start = pos - word.len();

        if !segment.contains(char::is_whitespace) {
            let names = self
                .commands
                .iter()
                .filter(|(_, e)| e.role.may_appear_at(index))
                .map(|(n, _)| n.as_str());
            return (start, complete_word(segment, names));
        }

        let (token, rest) = split_first_word(segment);
        match self.commands.get(token) {
            Some(entry) => (start, entry.command.complete(rest, catalog)),
            None => (start, Vec::new()),
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut map = f.debug_map();
        for (name, entry) in &self.commands {
            map.entry(name, &entry.role);
        }
        map.finish()
    }
}
