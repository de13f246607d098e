//! The value passed between the commands of a chain.

use bibliophant_core::Record;
use serde::{Deserialize, Serialize};

/// Result of a producing command.
///
/// Records are snapshots taken inside the query's transaction; they are not
/// live handles into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Output {
    /// Records selected or created by the command
    Records(Vec<Record>),
}

impl Output {
    /// The records carried by the output.
    pub fn records(&self) -> &[Record] {
        match self {
            Output::Records(records) => records,
        }
    }

    /// Take the records out of the output.
    pub fn into_records(self) -> Vec<Record> {
        match self {
            Output::Records(records) => records,
        }
    }
}

impl From<Vec<Record>> for Output {
    fn from(records: Vec<Record>) -> Self {
        Output::Records(records)
    }
}
