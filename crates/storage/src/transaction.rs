//! Transactions over the catalog
//!
//! A `Transaction` works on its own copy of the catalog. Nothing it does is
//! visible to the store until `Store::commit`; dropping it discards every
//! change.

use bibliophant_core::{Record, Tag};
use chrono::Utc;
use tracing::debug;

use crate::catalog::{Catalog, StoredRecord};
use crate::error::{Error, Result};
use crate::store::Store;

/// Which records a listing selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Listing<'q> {
    /// Every record
    All,
    /// Records carrying the tag
    Tag(&'q str),
    /// Records written by the author (last name, "Last, First" or "First Last")
    Author(&'q str),
    /// Articles published in the journal
    Journal(&'q str),
    /// Books published by the publisher
    Publisher(&'q str),
}

impl Listing<'_> {
    fn matches(&self, record: &Record) -> bool {
        match self {
            Listing::All => true,
            Listing::Tag(name) => record.has_tag(name),
            Listing::Author(name) => record.authors.iter().any(|a| a.answers_to(name)),
            Listing::Journal(name) => record
                .journal()
                .is_some_and(|j| j.name.eq_ignore_ascii_case(name)),
            Listing::Publisher(name) => record
                .publisher()
                .is_some_and(|p| p.name.eq_ignore_ascii_case(name)),
        }
    }
}

/// A unit of work on the collection.
pub struct Transaction<'a> {
    store: &'a Store,
    base_generation: u64,
    catalog: Catalog,
    dirty: bool,
    finished: bool,
}

impl<'a> Transaction<'a> {
    pub(crate) fn new(store: &'a Store, base_generation: u64, catalog: Catalog) -> Self {
        Self {
            store,
            base_generation,
            catalog,
            dirty: false,
            finished: false,
        }
    }

    pub(crate) fn base_generation(&self) -> u64 {
        self.base_generation
    }

    pub(crate) fn finish(&mut self) -> (Catalog, bool) {
        self.finished = true;
        (std::mem::take(&mut self.catalog), self.dirty)
    }

    /// The store this transaction belongs to.
    pub fn store(&self) -> &'a Store {
        self.store
    }

    /// Whether the transaction changed anything.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// The working copy of the catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    // ========================================================================
    // Records
    // ========================================================================

    /// Insert a new record. The record is validated, its key must be unused.
    /// Its journal or publisher and any unknown tags are registered.
    pub fn insert(&mut self, record: Record) -> Result<()> {
        record.validate()?;
        if self.catalog.records.contains_key(&record.key) {
            return Err(Error::DuplicateKey(record.key));
        }
        if let Some(journal) = record.journal() {
            self.catalog.journals.insert(journal.name.clone());
        }
        if let Some(publisher) = record.publisher() {
            self.catalog
                .publishers
                .entry(publisher.name.clone())
                .or_insert_with(|| publisher.clone());
        }
        for name in &record.tags {
            self.catalog
                .tags
                .entry(name.clone())
                .or_insert_with(|| Tag {
                    name: name.clone(),
                    color: None,
                });
        }

        let seq = self.catalog.next_seq;
        self.catalog.next_seq += 1;
        debug!(target: "bibliophant::store", key = %record.key, seq, "Insert record");
        self.catalog.records.insert(
            record.key.clone(),
            StoredRecord {
                seq,
                added: Utc::now(),
                record,
            },
        );
        self.dirty = true;
        Ok(())
    }

    /// Look up a record by key.
    pub fn get(&self, key: &str) -> Option<&Record> {
        self.catalog.records.get(key).map(|s| &s.record)
    }

    /// Look up a record by key, failing when it does not exist.
    pub fn require(&self, key: &str) -> Result<&Record> {
        self.get(key)
            .ok_or_else(|| Error::RecordNotFound(key.to_string()))
    }

    /// Whether a record with this key exists.
    pub fn contains(&self, key: &str) -> bool {
        self.catalog.records.contains_key(key)
    }

    /// Records whose title contains `part`, ignoring case, newest first.
    pub fn find_by_title(&self, part: &str) -> Vec<Record> {
        let part = part.to_lowercase();
        self.catalog
            .newest_first()
            .into_iter()
            .filter(|s| s.record.title.to_lowercase().contains(&part))
            .map(|s| s.record.clone())
            .collect()
    }

    /// The record with the given DOI (DOIs compare case-insensitively).
    pub fn find_by_doi(&self, doi: &str) -> Option<&Record> {
        self.catalog
            .records
            .values()
            .map(|s| &s.record)
            .find(|r| r.doi.as_deref().is_some_and(|d| d.eq_ignore_ascii_case(doi)))
    }

    /// The article with the given arXiv identifier.
    pub fn find_by_arxiv(&self, id: &str) -> Option<&Record> {
        let id = id.strip_prefix("arXiv:").unwrap_or(id);
        self.catalog
            .records
            .values()
            .map(|s| &s.record)
            .find(|r| r.eprint().is_some_and(|e| e.eprint == id))
    }

    /// Records selected by `listing`, most recently added first, at most
    /// `limit` of them.
    pub fn list(&self, listing: Listing<'_>, limit: Option<usize>) -> Vec<Record> {
        self.catalog
            .newest_first()
            .into_iter()
            .filter(|s| listing.matches(&s.record))
            .take(limit.unwrap_or(usize::MAX))
            .map(|s| s.record.clone())
            .collect()
    }

    /// All record keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.catalog.records.keys().map(String::as_str)
    }

    /// Remove a record and return it.
    pub fn delete(&mut self, key: &str) -> Result<Record> {
        let stored = self
            .catalog
            .records
            .remove(key)
            .ok_or_else(|| Error::RecordNotFound(key.to_string()))?;
        debug!(target: "bibliophant::store", key, "Delete record");
        self.dirty = true;
        Ok(stored.record)
    }

    // ========================================================================
    // Tags
    // ========================================================================

    /// The registered tag with this name.
    pub fn tag_info(&self, name: &str) -> Option<&Tag> {
        self.catalog.tags.get(name)
    }

    /// All registered tags in ascending order of name.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.catalog.tags.values()
    }

    /// Register a new tag.
    pub fn create_tag(&mut self, tag: Tag) -> Result<()> {
        tag.validate()?;
        if self.catalog.tags.contains_key(&tag.name) {
            return Err(Error::DuplicateTag(tag.name));
        }
        debug!(target: "bibliophant::store", tag = %tag.name, "Create tag");
        self.catalog.tags.insert(tag.name.clone(), tag);
        self.dirty = true;
        Ok(())
    }

    /// Remove a tag from the registry and from every record carrying it.
    pub fn delete_tag(&mut self, name: &str) -> Result<()> {
        if self.catalog.tags.remove(name).is_none() {
            return Err(Error::TagNotFound(name.to_string()));
        }
        for stored in self.catalog.records.values_mut() {
            stored.record.tags.retain(|t| t != name);
        }
        debug!(target: "bibliophant::store", tag = name, "Delete tag");
        self.dirty = true;
        Ok(())
    }

    /// Number of records carrying the tag.
    pub fn tag_usage(&self, name: &str) -> usize {
        self.catalog.tag_usage(name)
    }

    /// Attach a registered tag to a record. Returns `false` when the record
    /// already carried it.
    pub fn tag(&mut self, key: &str, name: &str) -> Result<bool> {
        if !self.catalog.tags.contains_key(name) {
            return Err(Error::TagNotFound(name.to_string()));
        }
        let stored = self
            .catalog
            .records
            .get_mut(key)
            .ok_or_else(|| Error::RecordNotFound(key.to_string()))?;
        if stored.record.has_tag(name) {
            return Ok(false);
        }
        stored.record.tags.push(name.to_string());
        self.dirty = true;
        Ok(true)
    }

    /// Detach a tag from a record. Returns `false` when the record did not
    /// carry it.
    pub fn untag(&mut self, key: &str, name: &str) -> Result<bool> {
        let stored = self
            .catalog
            .records
            .get_mut(key)
            .ok_or_else(|| Error::RecordNotFound(key.to_string()))?;
        let before = stored.record.tags.len();
        stored.record.tags.retain(|t| t != name);
        if stored.record.tags.len() == before {
            return Ok(false);
        }
        self.dirty = true;
        Ok(true)
    }

    // ========================================================================
    // Journals and publishers
    // ========================================================================

    /// Registered journal names.
    pub fn journals(&self) -> impl Iterator<Item = &str> {
        self.catalog.journals.iter().map(String::as_str)
    }

    /// Registered publisher names.
    pub fn publishers(&self) -> impl Iterator<Item = &str> {
        self.catalog.publishers.keys().map(String::as_str)
    }

    /// Journals no article refers to.
    pub fn dangling_journals(&self) -> Vec<String> {
        self.catalog.dangling_journals()
    }

    /// Publishers no book refers to.
    pub fn dangling_publishers(&self) -> Vec<String> {
        self.catalog.dangling_publishers()
    }

    /// Tags no record carries.
    pub fn dangling_tags(&self) -> Vec<String> {
        self.catalog.dangling_tags()
    }

    /// Remove a journal from the registry. Returns whether it was present.
    pub fn remove_journal(&mut self, name: &str) -> bool {
        let removed = self.catalog.journals.remove(name);
        self.dirty |= removed;
        removed
    }

    /// Remove a publisher from the registry. Returns whether it was present.
    pub fn remove_publisher(&mut self, name: &str) -> bool {
        let removed = self.catalog.publishers.remove(name).is_some();
        self.dirty |= removed;
        removed
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            debug!(
                target: "bibliophant::store",
                dirty = self.dirty,
                "Rolled back transaction"
            );
        }
    }
}

impl std::fmt::Debug for Transaction<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transaction")
            .field("base_generation", &self.base_generation)
            .field("records", &self.catalog.records.len())
            .field("dirty", &self.dirty)
            .finish()
    }
}
