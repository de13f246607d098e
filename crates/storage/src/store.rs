//! The collection store
//!
//! `Store` owns the committed catalog. Transactions start from a snapshot
//! of it and are committed back as a whole; a commit is rejected when the
//! catalog moved on since the snapshot was taken.

use parking_lot::RwLock;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{Error, Result};
use crate::transaction::Transaction;

/// Catalog file name placed in the collection root.
pub const CATALOG_FILE_NAME: &str = "bibliophant.json";

/// Lock file name placed in the collection root.
pub const LOCK_FILE_NAME: &str = ".lock";

struct Committed {
    generation: u64,
    catalog: Catalog,
}

/// A collection of records, on disk or in memory.
pub struct Store {
    root: Option<PathBuf>,
    state: RwLock<Committed>,
    // held for the lifetime of the store; the OS releases the lock on close
    _lock: Option<File>,
}

impl Store {
    /// Open the collection at `root`, creating the folder and an empty
    /// catalog when they do not exist yet.
    pub fn open(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        fs::create_dir_all(root)?;
        let root = root.canonicalize()?;

        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(root.join(LOCK_FILE_NAME))?;
        fs2::FileExt::try_lock_exclusive(&lock_file).map_err(|_| Error::Locked(root.clone()))?;

        let catalog_path = root.join(CATALOG_FILE_NAME);
        let catalog = if catalog_path.exists() {
            let text = fs::read_to_string(&catalog_path)?;
            serde_json::from_str(&text).map_err(|e| Error::CorruptCatalog {
                path: catalog_path.clone(),
                reason: e.to_string(),
            })?
        } else {
            let catalog = Catalog::default();
            write_catalog(&catalog_path, &catalog)?;
            info!(target: "bibliophant::store", path = ?catalog_path, "Created empty catalog");
            catalog
        };

        info!(
            target: "bibliophant::store",
            path = ?root,
            records = catalog.records.len(),
            "Opened collection"
        );

        Ok(Self {
            root: Some(root),
            state: RwLock::new(Committed {
                generation: 0,
                catalog,
            }),
            _lock: Some(lock_file),
        })
    }

    /// A store that keeps its catalog in memory only.
    pub fn ephemeral() -> Self {
        Self {
            root: None,
            state: RwLock::new(Committed {
                generation: 0,
                catalog: Catalog::default(),
            }),
            _lock: None,
        }
    }

    /// The collection root, `None` for an ephemeral store.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// A copy of the committed catalog.
    pub fn snapshot(&self) -> Catalog {
        self.state.read().catalog.clone()
    }

    /// Start a transaction on a private copy of the committed catalog.
    pub fn begin(&self) -> Transaction<'_> {
        let state = self.state.read();
        debug!(target: "bibliophant::store", generation = state.generation, "Begin transaction");
        Transaction::new(self, state.generation, state.catalog.clone())
    }

    /// Make the transaction's changes durable and visible.
    ///
    /// Fails with `Error::Conflict` when another transaction committed since
    /// this one began. On any error the committed catalog is left untouched.
    pub fn commit(&self, mut txn: Transaction<'_>) -> Result<()> {
        let mut state = self.state.write();
        if state.generation != txn.base_generation() {
            return Err(Error::Conflict);
        }
        let (catalog, dirty) = txn.finish();
        if !dirty {
            debug!(target: "bibliophant::store", "Commit without changes");
            return Ok(());
        }
        if let Some(root) = &self.root {
            write_catalog(&root.join(CATALOG_FILE_NAME), &catalog)?;
        }
        state.catalog = catalog;
        state.generation += 1;
        debug!(target: "bibliophant::store", generation = state.generation, "Committed transaction");
        Ok(())
    }

    /// Run `f` inside a transaction; commit on `Ok`, roll back on `Err`.
    pub fn transaction<F, T, E>(&self, f: F) -> std::result::Result<T, E>
    where
        F: FnOnce(&mut Transaction<'_>) -> std::result::Result<T, E>,
        E: From<Error>,
    {
        let mut txn = self.begin();
        let value = f(&mut txn)?;
        self.commit(txn)?;
        Ok(value)
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("root", &self.root)
            .field("generation", &self.state.read().generation)
            .finish()
    }
}

/// Write the catalog using write-fsync-rename.
fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let bytes = serde_json::to_vec_pretty(catalog)?;

    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(&temp_path)?;
    file.write_all(&bytes)?;
    file.sync_all()?;
    drop(file);

    fs::rename(&temp_path, path)?;

    // Sync parent directory
    if let Some(parent) = path.parent() {
        if parent.exists() {
            File::open(parent)?.sync_all()?;
        }
    }
    Ok(())
}
