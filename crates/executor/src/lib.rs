//! # Bibliophant Executor
//!
//! The query language of Bibliophant and the commands that speak it.
//!
//! A query is a chain of commands separated by `" : "`, much like a shell
//! pipeline:
//!
//! ```text
//! get tag read-me 3 : untag read-me : open
//! ```
//!
//! Each command has a [`Role`] that says whether it accepts the result of
//! its predecessor and whether it hands one on. The [`Engine`] parses and
//! validates the whole chain before anything runs, then executes it inside
//! one transaction of the collection [`Store`](bibliophant_storage::Store):
//! either every command succeeds and the transaction is committed, or the
//! first failure rolls everything back.
//!
//! ## Quick Start
//!
//! ```text
//! use bibliophant_executor::{Context, Session};
//!
//! let mut session = Session::open("/home/me/papers", |root| Context::new(root))?;
//! session.execute("get all 5 : show")?;
//! ```
//!
//! ## Roles
//!
//! | Role | Accepts | Produces | Position |
//! |------|---------|----------|----------|
//! | **closed-closed** | no | no | alone |
//! | **closed-producing** | no | yes | first |
//! | **receiving-producing** | yes | yes | after the first |
//! | **receiving-closed** | yes | no | last, after the first |

#![warn(missing_docs)]

mod command;
mod context;
mod engine;
mod error;
mod output;
mod query;
mod role;
mod session;

// Command modules
mod handlers;

// Test modules
#[cfg(test)]
mod tests;

// =============================================================================
// Public API - Everything users need is re-exported here
// =============================================================================

pub use command::{complete_word, last_word, Command, CommandGroup, GroupBuilder};
pub use context::{
    move_file, Console, Context, Effect, EffectLedger, Interaction, Scripted, Settings, Unattended,
};
pub use engine::{Engine, EngineBuilder, Outcome, Plan, Segment};
pub use error::{BuildError, Error};
pub use handlers::{default_engine, expand_tilde, MANUAL};
pub use output::Output;
pub use query::{split_first_word, split_query, SEPARATOR};
pub use role::Role;
pub use session::Session;

/// Result type for query execution
pub type Result<T> = std::result::Result<T, Error>;
