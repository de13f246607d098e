//! Completion of command names and arguments.

use bibliophant_storage::Store;

use super::*;
use crate::default_engine;

fn catalog() -> Catalog {
    let store = Store::ephemeral();
    store
        .transaction(|txn| -> bibliophant_storage::Result<()> {
            txn.insert(article("2012GregoryStone", "Some Long Title", "Gregory", "Physical Review"))?;
            txn.insert(article("2013HawkingPenrose", "Another Long Title", "Hawking", "Physical Review"))?;
            txn.create_tag(bibliophant_core::Tag::new("read-me", None)?)?;
            txn.create_tag(bibliophant_core::Tag::new("review", None)?)?;
            Ok(())
        })
        .unwrap();
    store.snapshot()
}

fn complete(line: &str) -> (usize, Vec<String>) {
    default_engine()
        .unwrap()
        .complete(line, line.len(), &catalog())
}

#[test]
fn test_first_segment_offers_leading_commands() {
    let (start, names) = complete("");
    assert_eq!(start, 0);
    assert_eq!(names, vec!["add", "exit", "get", "help", "import"]);

    let (start, names) = complete("ge");
    assert_eq!(start, 0);
    assert_eq!(names, vec!["get"]);
}

#[test]
fn test_later_segments_offer_follow_up_commands() {
    let line = "get all : ";
    let (start, names) = complete(line);
    assert_eq!(start, line.len());
    assert_eq!(names, vec!["delete", "export", "open", "show", "tag", "untag"]);

    let (_, names) = complete("get all : sh");
    assert_eq!(names, vec!["show"]);
}

#[test]
fn test_group_offers_sub_commands() {
    let (start, names) = complete("get a");
    assert_eq!(start, 4);
    assert_eq!(names, vec!["all", "arxiv", "author"]);
}

#[test]
fn test_arguments_from_catalog() {
    let (start, keys) = complete("get key 2012");
    assert_eq!(start, 8);
    assert_eq!(keys, vec!["2012GregoryStone"]);

    let (_, tags) = complete("get all : tag re");
    assert_eq!(tags, vec!["read-me", "review"]);

    let (_, tags) = complete("get tag rea");
    assert_eq!(tags, vec!["read-me"]);
}

#[test]
fn test_options() {
    assert_eq!(complete("get all : show v").1, vec!["verbose"]);
    assert_eq!(complete("get all : delete ").1, vec!["yes", "dangling"]);
    assert_eq!(complete("get all : untag read-me y").1, vec!["yes"]);
    assert_eq!(complete("get all : export bibtex refs.bib o").1, vec!["overwrite"]);
}

#[test]
fn test_cursor_inside_line() {
    let line = "get key 2012 : show";
    let (start, keys) = default_engine().unwrap().complete(line, 12, &catalog());
    assert_eq!(start, 8);
    assert_eq!(keys, vec!["2012GregoryStone"]);
}

#[test]
fn test_non_ascii_whitespace() {
    let line = "get key 2012\u{00A0}";
    let (start, keys) = complete(line);
    assert_eq!(start, line.len());
    assert_eq!(keys, vec!["2012GregoryStone", "2013HawkingPenrose"]);

    let line = "get all :\u{3000}sh";
    let (start, names) = complete(line);
    assert_eq!(start, line.len() - 2);
    assert!(names.is_empty(), "the separator needs plain spaces");

    let (start, names) = complete("get\u{3000}a");
    assert_eq!(start, "get\u{3000}".len());
    assert_eq!(names, vec!["all", "arxiv", "author"]);
}
