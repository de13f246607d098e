//! Typical sessions over the default command set.

use std::fs;

use bibliophant::Scripted;

use crate::common::*;

fn import_two(session: &mut bibliophant::Session, outside: &std::path::Path) {
    for record in [
        article("2012GregoryStone", "Black strings revisited", "Gregory", "Physical Review D"),
        article("2013Hawking", "Black holes and entropy", "Hawking", "Nuclear Physics B"),
    ] {
        let folder = record_folder(outside, &record);
        fs::write(folder.join("notes.txt"), "margin notes").unwrap();
        session
            .execute(&format!("import bib {}", folder.display()))
            .unwrap();
    }
}

#[test]
fn test_import_tag_and_export() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let mut session = collection.open();
    import_two(&mut session, outside.path());

    // Attachments are copied along with the record
    assert!(collection.root().join("2013Hawking").join("notes.txt").is_file());

    session.execute("get author Gregory : tag strings create").unwrap();
    let bib = outside.path().join("strings.bib");
    session
        .execute(&format!("get tag strings : export bibtex {}", bib.display()))
        .unwrap();

    let text = fs::read_to_string(&bib).unwrap();
    assert!(text.contains("@article{2012GregoryStone,"));
    assert!(!text.contains("2013Hawking"));
    assert!(printed(&session).contains("Exported 1 records to"));
}

#[test]
fn test_listing_is_newest_first_with_limit() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let mut session = collection.open();
    import_two(&mut session, outside.path());

    assert_eq!(
        keys(&session.execute("get all").unwrap()),
        vec!["2013Hawking", "2012GregoryStone"]
    );
    assert_eq!(keys(&session.execute("get all 1").unwrap()), vec!["2013Hawking"]);
    assert_eq!(
        session.execute("get all 0").unwrap_err().to_string(),
        "the limit must be a positive integer, not 0"
    );
}

#[test]
fn test_show_summarises_the_selection() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let mut session = collection.open();
    import_two(&mut session, outside.path());

    session.execute("get all : show").unwrap();
    assert_eq!(
        printed(&session),
        "2013Hawking\n    Black holes and entropy\n\n\
         2012GregoryStone\n    Black strings revisited\n\n\
         2 records: 2 articles, 0 books\n"
    );
}

#[test]
fn test_delete_removes_folders_and_dangling_entries() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let mut session = collection.open();
    import_two(&mut session, outside.path());
    session.execute("get key 2013Hawking : tag entropy create").unwrap();

    session.execute("get key 2013Hawking : delete yes dangling").unwrap();

    let catalog = session.store().snapshot();
    assert_eq!(catalog.records.keys().collect::<Vec<_>>(), vec!["2012GregoryStone"]);
    assert!(!catalog.tags.contains_key("entropy"));
    assert!(!catalog.journals.contains("Nuclear Physics B"));
    assert!(catalog.journals.contains("Physical Review D"));
    assert!(!collection.root().join("2013Hawking").exists());
    assert!(collection.root().join("2012GregoryStone").exists());
}

#[test]
fn test_declined_delete_keeps_everything() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    {
        let mut session = collection.open();
        import_two(&mut session, outside.path());
    }

    let answers = Scripted::answers([false, true]);
    let asked = answers.asked();
    let mut session = collection.open_scripted(answers);
    session.execute("get all : delete").unwrap();

    // The third question asks about the journal only the deleted record used
    let asked = asked.borrow();
    assert_eq!(asked.len(), 3);
    assert!(asked[0].starts_with("Delete the record '2013Hawking'"));
    assert!(asked[2].starts_with("The journal 'Physical Review D'"));
    let catalog = session.store().snapshot();
    assert_eq!(catalog.records.keys().collect::<Vec<_>>(), vec!["2013Hawking"]);
    assert!(catalog.journals.contains("Physical Review D"));
    assert!(printed(&session).contains("Deleted 1 of 2 records"));
}
