//! A collection opened for queries.
//!
//! The [`Session`] bundles the three things every query needs: the
//! [`Engine`] with its command table, the [`Store`] of the collection and
//! the [`Context`] handed to commands. Each call to [`Session::execute`]
//! runs one query in its own transaction.
//!
//! # Usage
//!
//! ```ignore
//! use bibliophant_executor::{Context, Session};
//!
//! let mut session = Session::open("/home/me/papers", |root| Context::new(root))?;
//! session.execute("get all 5 : show")?;
//! ```

use std::path::Path;

use bibliophant_storage::Store;

use crate::context::Context;
use crate::engine::{Engine, Outcome};
use crate::handlers::default_engine;
use crate::Result;

/// An engine, a store and a context, ready to run queries.
pub struct Session {
    engine: Engine,
    store: Store,
    ctx: Context,
}

impl Session {
    /// Combine the parts of a session.
    pub fn new(engine: Engine, store: Store, ctx: Context) -> Self {
        Self { engine, store, ctx }
    }

    /// Open the collection at `root` with the default commands. The context
    /// is built from the canonical collection root.
    pub fn open<F>(root: impl AsRef<Path>, context: F) -> Result<Self>
    where
        F: FnOnce(&Path) -> Context,
    {
        let engine = default_engine()?;
        let store = Store::open(root)?;
        let ctx = match store.root() {
            Some(root) => context(root),
            None => context(Path::new(".")),
        };
        Ok(Self::new(engine, store, ctx))
    }

    /// Run one query.
    pub fn execute(&mut self, query: &str) -> Result<Outcome> {
        self.engine.run(query, &self.store, &mut self.ctx)
    }

    /// Completion candidates for the word ending at byte `pos` of `line`.
    pub fn complete(&self, line: &str, pos: usize) -> (usize, Vec<String>) {
        let catalog = self.store.snapshot();
        self.engine.complete(line, pos, &catalog)
    }

    /// The command table.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// The collection store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The command context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// The command context, mutably.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("engine", &self.engine)
            .field("root", &self.store.root())
            .field("ctx", &self.ctx)
            .finish()
    }
}
