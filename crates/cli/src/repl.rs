//! REPL loop with rustyline.
//!
//! Interactive mode: prompt, history, TAB completion through the engine.
//! Pipe mode: read queries from stdin, execute each.

use std::cell::RefCell;
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::rc::Rc;

use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{CompletionType, Config, Context, Editor, Helper};
use tracing::warn;

use bibliophant_executor::{expand_tilde, Outcome, Session};

use crate::format::{format_error, format_outcome, OutputMode};

const HISTORY_FILE: &str = "~/.bibliophant_history";

/// What the loop does after a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The query ran; `false` if it failed
    Continue(bool),
    /// `exit` was requested
    Exit,
}

/// Run one query and print its outcome or error.
pub fn execute_query(session: &mut Session, query: &str, mode: OutputMode) -> Step {
    match session.execute(query) {
        Ok(Outcome::Exit) => Step::Exit,
        Ok(outcome) => {
            let formatted = format_outcome(&outcome, mode);
            if !formatted.is_empty() {
                println!("{}", formatted);
            }
            Step::Continue(true)
        }
        Err(e) => {
            eprintln!("{}", format_error(&e, mode));
            Step::Continue(false)
        }
    }
}

/// Run the interactive REPL until `exit` or end of input.
pub fn run_repl(session: Session, name: &str) {
    let config = Config::builder()
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .build();

    let session = Rc::new(RefCell::new(session));
    let mut rl: Editor<BibHelper, _> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("cannot start the shell: {}", e);
            return;
        }
    };
    rl.set_helper(Some(BibHelper {
        session: Rc::clone(&session),
    }));

    let history_path = history_file();
    if let Err(e) = rl.load_history(&history_path) {
        // A first start has no history yet
        if !matches!(e, ReadlineError::Io(ref io) if io.kind() == io::ErrorKind::NotFound) {
            warn!(target: "bibliophant::chain", path = %history_path.display(), error = %e, "Cannot load history");
        }
    }

    let prompt = format!("{}> ", name);
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(trimmed);

                let step = execute_query(&mut session.borrow_mut(), trimmed, OutputMode::Human);
                if step == Step::Exit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl-C discards the line
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                eprintln!("(error) {:?}", err);
                break;
            }
        }
    }

    if let Err(e) = rl.save_history(&history_path) {
        warn!(target: "bibliophant::chain", path = %history_path.display(), error = %e, "Cannot save history");
    }
}

/// Run in pipe mode: one query per line. Returns the exit code.
pub fn run_pipe(session: &mut Session, mode: OutputMode) -> i32 {
    run_lines(session, io::stdin().lock(), mode)
}

/// Execute the queries read from `input`; blank lines and `#` comments are
/// skipped. Returns 1 if any query failed.
pub fn run_lines(session: &mut Session, input: impl BufRead, mode: OutputMode) -> i32 {
    let mut exit_code = 0;

    for line in input.lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        match execute_query(session, trimmed, mode) {
            Step::Exit => break,
            Step::Continue(false) => exit_code = 1,
            Step::Continue(true) => {}
        }
    }

    exit_code
}

fn history_file() -> PathBuf {
    expand_tilde(HISTORY_FILE)
}

// =========================================================================
// TAB Completion
// =========================================================================

struct BibHelper {
    session: Rc<RefCell<Session>>,
}

impl Helper for BibHelper {}
impl Validator for BibHelper {}
impl Highlighter for BibHelper {}
impl Hinter for BibHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &Context<'_>) -> Option<String> {
        None
    }
}

impl Completer for BibHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let Ok(session) = self.session.try_borrow() else {
            return Ok((pos, vec![]));
        };
        let (start, words) = session.complete(line, pos);
        let candidates = words
            .into_iter()
            .map(|word| Pair {
                display: word.clone(),
                replacement: word,
            })
            .collect();
        Ok((start, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bibliophant_executor::{Console, Context as QueryContext, Unattended};

    fn session(dir: &std::path::Path) -> Session {
        Session::open(dir, |root| {
            QueryContext::new(root)
                .with_console(Console::Buffer(Vec::new()))
                .with_interaction(Unattended)
        })
        .unwrap()
    }

    #[test]
    fn test_pipe_skips_comments_and_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let input = "# list everything\n\nget all : show\n";
        assert_eq!(run_lines(&mut session, input.as_bytes(), OutputMode::Human), 0);
        assert_eq!(session.context().console().contents(), "No records.\n");
    }

    #[test]
    fn test_pipe_reports_failures_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let input = "frobnicate x\nhelp\n";
        assert_eq!(run_lines(&mut session, input.as_bytes(), OutputMode::Human), 1);
        assert!(session
            .context()
            .console()
            .contents()
            .starts_with("Bibliophant manual"));
    }

    #[test]
    fn test_pipe_stops_at_exit() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let input = "exit\nfrobnicate x\n";
        assert_eq!(run_lines(&mut session, input.as_bytes(), OutputMode::Human), 0);
    }

    #[test]
    fn test_execute_query_steps() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        assert_eq!(
            execute_query(&mut session, "get all", OutputMode::Json),
            Step::Continue(true)
        );
        assert_eq!(
            execute_query(&mut session, "tag review : get all", OutputMode::Human),
            Step::Continue(false)
        );
        assert_eq!(execute_query(&mut session, "exit", OutputMode::Human), Step::Exit);
    }

    #[test]
    fn test_one_shot_chain_in_a_single_word() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = session(dir.path());
        let query = crate::commands::join_query(["get all : show"]);
        assert_eq!(
            execute_query(&mut session, &query, OutputMode::Human),
            Step::Continue(true)
        );
        assert_eq!(session.context().console().contents(), "No records.\n");
    }
}
