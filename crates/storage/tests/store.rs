//! Store lifecycle tests against a scratch collection on disk.

use bibliophant_core::{Author, Book, Publisher, Record, RecordKind, Tag};
use bibliophant_storage::{
    load_record_file, record_file, write_record_file, Error, Listing, Store, CATALOG_FILE_NAME,
};
use tempfile::TempDir;

fn book(key: &str) -> Record {
    Record::new(
        key,
        "Gravitation and Cosmology",
        1972,
        vec![Author::new("Weinberg", Some("Steven")).unwrap()],
        RecordKind::Book(Book {
            publisher: Publisher {
                name: "Wiley".to_string() + " & Sons",
                address: None,
            },
            volume: None,
            edition: None,
            series: None,
        }),
    )
}

#[test]
fn open_creates_catalog() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("papers");
    let _store = Store::open(&root).unwrap();
    assert!(root.join(CATALOG_FILE_NAME).is_file());
}

#[test]
fn committed_records_survive_reopen() {
    let dir = TempDir::new().unwrap();
    {
        let store = Store::open(dir.path()).unwrap();
        let mut txn = store.begin();
        txn.insert(book("1972Weinberg")).unwrap();
        store.commit(txn).unwrap();
    }
    let store = Store::open(dir.path()).unwrap();
    let txn = store.begin();
    assert!(txn.contains("1972Weinberg"));
    assert_eq!(txn.publishers().collect::<Vec<_>>(), vec!["Wiley & Sons"]);
}

#[test]
fn dropped_transaction_leaves_no_trace() {
    let dir = TempDir::new().unwrap();
    let store = Store::open(dir.path()).unwrap();
    {
        let mut txn = store.begin();
        txn.insert(book("1972Weinberg")).unwrap();
    }
    assert!(store.snapshot().records.is_empty());
}

#[test]
fn closure_transaction_rolls_back_on_error() {
    let store = Store::ephemeral();
    let result: Result<(), Error> = store.transaction(|txn| {
        txn.insert(book("1972Weinberg"))?;
        Err(Error::RecordNotFound("1999Nobody".into()))
    });
    assert!(result.is_err());
    assert!(store.snapshot().records.is_empty());

    store
        .transaction(|txn| txn.insert(book("1972Weinberg")))
        .unwrap();
    assert_eq!(store.snapshot().records.len(), 1);
}

#[test]
fn stale_commit_is_a_conflict() {
    let store = Store::ephemeral();
    let mut first = store.begin();
    let mut second = store.begin();
    first.insert(book("1972Weinberg")).unwrap();
    second.create_tag(Tag::new("classic", None).unwrap()).unwrap();
    store.commit(first).unwrap();
    assert!(matches!(store.commit(second), Err(Error::Conflict)));
    assert!(store.snapshot().tags.is_empty());
}

#[test]
fn second_open_is_locked() {
    let dir = TempDir::new().unwrap();
    let _store = Store::open(dir.path()).unwrap();
    assert!(matches!(Store::open(dir.path()), Err(Error::Locked(_))));
}

#[test]
fn corrupt_catalog_is_reported() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(CATALOG_FILE_NAME), "{ not json").unwrap();
    assert!(matches!(
        Store::open(dir.path()),
        Err(Error::CorruptCatalog { .. })
    ));
}

#[test]
fn record_folder_round_trip() {
    let dir = TempDir::new().unwrap();
    let record = book("1972Weinberg");
    let folder = write_record_file(dir.path(), &record, false).unwrap();
    assert!(record_file(dir.path(), &record.key).is_file());

    assert_eq!(load_record_file(&folder).unwrap(), record);
    assert_eq!(
        load_record_file(&record_file(dir.path(), &record.key)).unwrap(),
        record
    );
    assert!(matches!(
        write_record_file(dir.path(), &record, false),
        Err(Error::FolderExists(_))
    ));
    assert!(matches!(
        load_record_file(&dir.path().join("missing")),
        Err(Error::RecordFileNotFound(_))
    ));
}

#[test]
fn listing_by_publisher() {
    let store = Store::ephemeral();
    store
        .transaction(|txn| txn.insert(book("1972Weinberg")))
        .unwrap();
    let txn = store.begin();
    assert_eq!(txn.list(Listing::Publisher("wiley & sons"), None).len(), 1);
}
