//! Parse, position and execution guarantees of the default command set.

use bibliophant::{Error, Outcome};

use crate::common::*;

#[test]
fn test_parse_is_idempotent() {
    let engine = bibliophant::default_engine().unwrap();
    for query in [
        "get all : show",
        "get tag review 5 : tag read create : export bibtex refs.bib",
        "import doi 10.1000/xyz",
        "help",
    ] {
        assert_eq!(engine.parse(query).unwrap(), engine.parse(query).unwrap());
    }
}

#[test]
fn test_closed_closed_commands_stand_alone() {
    let collection = Collection::new();
    let mut session = collection.open();

    assert!(session.execute("help").is_ok());
    for query in ["help : show", "get all : help", "get all : exit"] {
        let err = session.execute(query).unwrap_err();
        assert!(err.is_parse_error(), "{} should not parse", query);
    }
    assert_eq!(session.execute("exit").unwrap(), Outcome::Exit);
}

#[test]
fn test_producers_only_lead() {
    let engine = bibliophant::default_engine().unwrap();
    let err = engine.parse("tag foo : get all").unwrap_err();
    assert!(matches!(err, Error::IllegalPosition { ref token, .. } if token == "tag"));

    let err = engine.parse("get all : get all").unwrap_err();
    assert!(matches!(err, Error::IllegalPosition { ref token, .. } if token == "get"));
}

#[test]
fn test_terminal_commands_close_the_chain() {
    let engine = bibliophant::default_engine().unwrap();
    assert!(engine.parse("get all : show : tag x").is_err());
    assert!(engine.parse("get all : show").is_ok());
    assert!(engine.parse("show").is_err());
}

#[test]
fn test_unknown_command_message() {
    let collection = Collection::new();
    let err = collection.open().execute("frobnicate x").unwrap_err();
    assert_eq!(err.to_string(), "'frobnicate' is not a command.");
}

#[test]
fn test_separator_is_literal() {
    let engine = bibliophant::default_engine().unwrap();
    // `"a:b"` and `"a :b"` stay inside the arguments of `get`
    let plan = engine.parse("get title a:b").unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.segments()[0].arguments(), "title a:b");

    let plan = engine.parse("get title a :b").unwrap();
    assert_eq!(plan.len(), 1);
    assert_eq!(plan.segments()[0].arguments(), "title a :b");
}

#[test]
fn test_group_resolution() {
    let engine = bibliophant::default_engine().unwrap();
    let plan = engine.parse("import doi 10.1000/xyz").unwrap();
    assert_eq!(plan.segments()[0].name(), "import");
    assert_eq!(plan.segments()[0].arguments(), "doi 10.1000/xyz");
}

#[test]
fn test_results_thread_through_the_chain() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let folder = record_folder(
        outside.path(),
        &article("2012GregoryStone", "Some Long Title", "Gregory", "Physical Review D"),
    );
    let mut session = collection.open();

    let outcome = session
        .execute(&format!("import bib {} : tag review create", folder.display()))
        .unwrap();
    let Outcome::Completed(Some(output)) = outcome else {
        panic!("tag produces the tagged records");
    };
    assert_eq!(output_keys(&output), vec!["2012GregoryStone"]);
    assert_eq!(output.records()[0].tags, vec!["review"]);
}

#[test]
fn test_failing_segment_rolls_back_earlier_writes() {
    let collection = Collection::new();
    let outside = tempfile::tempdir().unwrap();
    let folder = record_folder(
        outside.path(),
        &article("2012GregoryStone", "Some Long Title", "Gregory", "Physical Review D"),
    );
    let mut session = collection.open();

    // `untag` fails on an unknown tag, after `import` has filed the record
    let err = session
        .execute(&format!("import bib {} : untag missing : show", folder.display()))
        .unwrap_err();
    assert_eq!(err.to_string(), "the tag 'missing' does not exist");
    assert!(printed(&session).is_empty(), "show never ran");
    assert!(session.store().snapshot().records.is_empty());
    assert!(!collection.root().join("2012GregoryStone").exists());
}
