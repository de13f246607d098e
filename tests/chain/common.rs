//! Shared fixtures for the chain tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use bibliophant::model::{Article, Author, Journal, Record, RecordKind};
use bibliophant::storage::write_record_file;
use bibliophant::{Console, Context, Outcome, Output, Scripted, Session, Unattended};
use tempfile::TempDir;

/// A collection folder in a scratch directory.
pub struct Collection {
    pub dir: TempDir,
}

impl Collection {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("papers")
    }

    /// Open a session that prints into a buffer and never asks.
    pub fn open(&self) -> Session {
        Session::open(self.root(), |root| {
            Context::new(root)
                .with_console(Console::Buffer(Vec::new()))
                .with_interaction(Unattended)
        })
        .unwrap()
    }

    /// Open a session answering questions from `answers`.
    pub fn open_scripted(&self, answers: Scripted) -> Session {
        Session::open(self.root(), |root| {
            Context::new(root)
                .with_console(Console::Buffer(Vec::new()))
                .with_interaction(answers)
        })
        .unwrap()
    }
}

pub fn article(key: &str, title: &str, last: &str, journal: &str) -> Record {
    let year = key[..4].parse().unwrap();
    Record::new(
        key,
        title,
        year,
        vec![Author::new(last, Some("Ann")).unwrap()],
        RecordKind::Article(Article {
            journal: Journal::new(journal),
            volume: None,
            number: None,
            pages: None,
            eprint: None,
            abstract_text: None,
        }),
    )
}

/// Write a record folder outside the collection, ready for `import bib`.
pub fn record_folder(parent: &Path, record: &Record) -> PathBuf {
    write_record_file(parent, record, false).unwrap()
}

/// Keys of the records a query produced.
pub fn keys(outcome: &Outcome) -> Vec<String> {
    match outcome {
        Outcome::Completed(Some(output)) => output.records().iter().map(|r| r.key.clone()).collect(),
        _ => Vec::new(),
    }
}

pub fn output_keys(output: &Output) -> Vec<String> {
    output.records().iter().map(|r| r.key.clone()).collect()
}

/// Everything printed so far.
pub fn printed(session: &Session) -> String {
    session.context().console().contents()
}
