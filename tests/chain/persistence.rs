//! Committed queries survive the session; aborted ones leave no trace.

use std::fs;

use bibliophant::storage::{Error as StorageError, Store, CATALOG_FILE_NAME};
use bibliophant::Error;

use crate::common::*;

#[test]
fn test_committed_records_survive_reopen() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let folder = record_folder(
        outside.path(),
        &article("2012GregoryStone", "Some Long Title", "Gregory", "Physical Review D"),
    );

    {
        let mut session = collection.open();
        session
            .execute(&format!("import bib {} : tag review create", folder.display()))
            .unwrap();
    }

    let mut session = collection.open();
    let outcome = session.execute("get tag review").unwrap();
    assert_eq!(keys(&outcome), vec!["2012GregoryStone"]);
    assert!(collection.root().join(CATALOG_FILE_NAME).is_file());
    assert!(collection
        .root()
        .join("2012GregoryStone")
        .join("2012GregoryStone.json")
        .is_file());
}

#[test]
fn test_aborted_query_leaves_catalog_untouched() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let folder = record_folder(
        outside.path(),
        &article("2012GregoryStone", "Some Long Title", "Gregory", "Physical Review D"),
    );

    {
        let mut session = collection.open();
        session.execute("get all").unwrap();
    }
    let before = fs::read_to_string(collection.root().join(CATALOG_FILE_NAME)).unwrap();

    {
        let mut session = collection.open();
        session
            .execute(&format!("import bib {} : untag missing", folder.display()))
            .unwrap_err();
    }
    let after = fs::read_to_string(collection.root().join(CATALOG_FILE_NAME)).unwrap();
    assert_eq!(before, after);
    assert!(collection.open().store().snapshot().records.is_empty());
}

#[test]
fn test_collection_is_locked_while_open() {
    let collection = Collection::new();
    let _session = collection.open();

    let err = Store::open(collection.root()).unwrap_err();
    assert!(matches!(err, StorageError::Locked(_)));

    let err = bibliophant::Session::open(collection.root(), |root| bibliophant::Context::new(root))
        .unwrap_err();
    assert!(matches!(err, Error::Storage(StorageError::Locked(_))));
}

#[test]
fn test_lock_is_released_with_the_session() {
    let collection = Collection::new();
    drop(collection.open());
    assert!(Store::open(collection.root()).is_ok());
}
