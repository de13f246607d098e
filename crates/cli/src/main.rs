//! Bibliophant CLI: manage a bibliography with chainable queries.
//!
//! Three modes:
//! - **Shell mode**: `bib [flags] QUERY...` runs one query and exits
//! - **REPL mode**: `bib [flags]` gives an interactive prompt (if stdin is a TTY)
//! - **Pipe mode**: `echo "get all : export bibtex" | bib` runs one query per line

mod commands;
mod config;
mod format;
mod interaction;
mod repl;

use std::io::IsTerminal;
use std::path::Path;
use std::process;

use anyhow::{Context as _, Result};
use tracing_subscriber::EnvFilter;

use bibliophant_executor::{expand_tilde, Context, Session, Unattended};
use bibliophant_importers::HttpSource;

use commands::{build_cli, join_query};
use config::{Config, CONFIG_FILE};
use format::{format_error, format_outcome, OutputMode};
use interaction::Terminal;

fn main() {
    let matches = build_cli().get_matches();

    init_logging(matches.get_count("verbose"));

    let output_mode = if matches.get_flag("json") {
        OutputMode::Json
    } else {
        OutputMode::Human
    };
    let query = matches
        .get_many::<String>("query")
        .map(|words| join_query(words.map(String::as_str)));
    let interactive = query.is_none() && std::io::stdin().is_terminal();

    let mut session = match open_session(&matches, interactive) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{:#}", e);
            process::exit(1);
        }
    };

    if let Some(query) = query {
        // Shell mode: execute, format, exit
        let exit_code = match session.execute(&query) {
            Ok(outcome) => {
                let formatted = format_outcome(&outcome, output_mode);
                if !formatted.is_empty() {
                    println!("{}", formatted);
                }
                0
            }
            Err(e) => {
                eprintln!("{}", format_error(&e, output_mode));
                1
            }
        };
        process::exit(exit_code);
    } else if interactive {
        let name = collection_name(session.context().root());
        repl::run_repl(session, &name);
    } else {
        let exit_code = repl::run_pipe(&mut session, output_mode);
        process::exit(exit_code);
    }
}

/// Log to stderr, filtered by `BIB_LOG` or else by the verbosity flag.
fn init_logging(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env("BIB_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_session(matches: &clap::ArgMatches, interactive: bool) -> Result<Session> {
    let config_path = matches
        .get_one::<String>("config")
        .map(|p| expand_tilde(p))
        .unwrap_or_else(|| expand_tilde(CONFIG_FILE));
    let (config, root) = Config::locate(
        &config_path,
        matches.get_one::<String>("root").map(String::as_str),
        matches.get_one::<String>("collection").map(String::as_str),
    )?;
    let source = HttpSource::new(config.timeout()).context("cannot set up the HTTP client")?;

    Session::open(&root, |root| {
        let ctx = Context::new(root)
            .with_settings(config.settings())
            .with_source(source);
        if interactive {
            ctx.with_interaction(Terminal::new(config.editor()))
        } else {
            ctx.with_interaction(Unattended)
        }
    })
    .with_context(|| format!("cannot open the collection '{}'", root.display()))
}

fn collection_name(root: &Path) -> String {
    root.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string())
}
