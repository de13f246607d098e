//! Clap command definition for `bib`.
//!
//! The queries themselves are not modelled in clap: everything after the
//! flags is joined back into one query string and handed to the chain
//! engine, which owns the command grammar.

use clap::{Arg, ArgAction, Command};

use bibliophant_executor::SEPARATOR;

/// Build the command line of the `bib` binary.
pub fn build_cli() -> Command {
    Command::new("bib")
        .about("Bibliography manager with chainable commands")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::new("collection")
                .short('c')
                .long("collection")
                .value_name("NAME")
                .help("Collection folder name from the configuration (default: the first)"),
        )
        .arg(
            Arg::new("root")
                .long("root")
                .value_name("DIR")
                .help("Collection folder to use, bypassing the configured list")
                .conflicts_with("collection"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("FILE")
                .help("Configuration file (default: ~/.bibliophant.toml)"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .help("Print the result of a one-shot query as JSON")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Log more (-v info, -vv debug); BIB_LOG overrides")
                .action(ArgAction::Count),
        )
        .arg(
            Arg::new("query")
                .value_name("QUERY")
                .help("Query to run, e.g. `get tag review : show`; starts the shell when absent")
                .num_args(0..)
                .trailing_var_arg(true)
                .allow_hyphen_values(true),
        )
}

/// Join the words of a one-shot query back into a query string.
///
/// The shell has already removed the quotes, so words that contain
/// whitespace are quoted again for the commands that split their arguments.
/// A lone word, or a word holding a command separator, is a whole query
/// (`bib "get all : show"`) and is kept as written.
pub fn join_query<'a>(words: impl IntoIterator<Item = &'a str>) -> String {
    let words: Vec<&str> = words.into_iter().collect();
    if let [query] = words.as_slice() {
        return query.to_string();
    }
    words
        .iter()
        .map(|word| {
            if word.chars().any(char::is_whitespace) && !word.contains(SEPARATOR) {
                shlex::try_quote(word)
                    .map(|quoted| quoted.into_owned())
                    .unwrap_or_else(|_| word.to_string())
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query_of(args: &[&str]) -> Option<String> {
        let matches = build_cli().try_get_matches_from(args).unwrap();
        matches
            .get_many::<String>("query")
            .map(|words| join_query(words.map(String::as_str)))
    }

    #[test]
    fn test_cli_is_well_formed() {
        build_cli().debug_assert();
    }

    #[test]
    fn test_query_words_are_joined() {
        assert_eq!(
            query_of(&["bib", "get", "all", ":", "show", "verbose"]).as_deref(),
            Some("get all : show verbose")
        );
        assert_eq!(query_of(&["bib"]), None);
    }

    #[test]
    fn test_flags_before_query() {
        let matches = build_cli()
            .try_get_matches_from(["bib", "-vv", "--json", "-c", "papers", "get", "key", "2012Gregory"])
            .unwrap();
        assert_eq!(matches.get_count("verbose"), 2);
        assert!(matches.get_flag("json"));
        assert_eq!(matches.get_one::<String>("collection").unwrap(), "papers");
        assert_eq!(matches.get_many::<String>("query").unwrap().count(), 3);
    }

    #[test]
    fn test_words_with_spaces_are_quoted() {
        assert_eq!(
            join_query(["get", "title", "black hole"]),
            "get title 'black hole'"
        );
    }

    #[test]
    fn test_quoted_chain_is_kept_as_written() {
        assert_eq!(join_query(["get all : show"]), "get all : show");
        assert_eq!(join_query(["get all"]), "get all");
        assert_eq!(
            join_query(["get author Gregory : tag", "add", "black hole"]),
            "get author Gregory : tag add 'black hole'"
        );
        assert_eq!(
            query_of(&["bib", "get tag review : export bibtex"]).as_deref(),
            Some("get tag review : export bibtex")
        );
    }

    #[test]
    fn test_root_conflicts_with_collection() {
        assert!(build_cli()
            .try_get_matches_from(["bib", "--root", "/tmp", "-c", "papers"])
            .is_err());
    }
}
