//! The catalog: everything the collection knows, in one serialisable value.

use bibliophant_core::{Publisher, Record, Tag};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A record together with its insertion metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Insertion counter; higher means added later
    pub seq: u64,
    /// When the record was added
    pub added: DateTime<Utc>,
    /// The record itself
    pub record: Record,
}

/// Contents of `bibliophant.json`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    /// Next insertion counter
    #[serde(default)]
    pub next_seq: u64,
    /// Records by key
    #[serde(default)]
    pub records: BTreeMap<String, StoredRecord>,
    /// Tag registry by name
    #[serde(default)]
    pub tags: BTreeMap<String, Tag>,
    /// Journal names
    #[serde(default)]
    pub journals: BTreeSet<String>,
    /// Publisher registry by name
    #[serde(default)]
    pub publishers: BTreeMap<String, Publisher>,
}

impl Catalog {
    /// Records ordered most recently added first.
    pub fn newest_first(&self) -> Vec<&StoredRecord> {
        let mut stored: Vec<&StoredRecord> = self.records.values().collect();
        stored.sort_by(|a, b| b.seq.cmp(&a.seq));
        stored
    }

    /// Journal names no article refers to.
    pub fn dangling_journals(&self) -> Vec<String> {
        let used: BTreeSet<&str> = self
            .records
            .values()
            .filter_map(|s| s.record.journal())
            .map(|j| j.name.as_str())
            .collect();
        self.journals
            .iter()
            .filter(|name| !used.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Publisher names no book refers to.
    pub fn dangling_publishers(&self) -> Vec<String> {
        let used: BTreeSet<&str> = self
            .records
            .values()
            .filter_map(|s| s.record.publisher())
            .map(|p| p.name.as_str())
            .collect();
        self.publishers
            .keys()
            .filter(|name| !used.contains(name.as_str()))
            .cloned()
            .collect()
    }

    /// Tag names no record carries.
    pub fn dangling_tags(&self) -> Vec<String> {
        self.tags
            .keys()
            .filter(|name| self.tag_usage(name) == 0)
            .cloned()
            .collect()
    }

    /// Number of records carrying the tag.
    pub fn tag_usage(&self, name: &str) -> usize {
        self.records
            .values()
            .filter(|s| s.record.has_tag(name))
            .count()
    }
}
