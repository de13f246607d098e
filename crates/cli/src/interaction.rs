//! Questions and record editing on the terminal.

use std::io::{self, BufRead, Write};
use std::process;

use tracing::debug;

use bibliophant_executor::Interaction;

/// Interaction for the interactive shell: y/N questions on stdin and an
/// external editor for record drafts.
#[derive(Debug, Clone)]
pub struct Terminal {
    editor: String,
}

impl Terminal {
    /// Use `editor` (a command line; the file path is appended) for drafts.
    pub fn new(editor: impl Into<String>) -> Self {
        Self {
            editor: editor.into(),
        }
    }
}

/// Whether an answer to a y/N question means yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

impl Interaction for Terminal {
    fn confirm(&mut self, question: &str) -> bool {
        print!("{} [y/N] ", question);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(0) | Err(_) => false,
            Ok(_) => is_yes(&answer),
        }
    }

    fn edit(&mut self, draft: &str) -> io::Result<String> {
        let mut file = tempfile::Builder::new()
            .prefix("bibliophant-")
            .suffix(".json")
            .tempfile()?;
        file.write_all(draft.as_bytes())?;
        file.flush()?;

        let mut words = shlex::split(&self.editor).unwrap_or_default();
        if words.is_empty() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cannot run the editor '{}'", self.editor),
            ));
        }
        let program = words.remove(0);
        debug!(target: "bibliophant::chain", editor = %program, path = %file.path().display(), "Editing draft");
        let status = process::Command::new(&program)
            .args(&words)
            .arg(file.path())
            .status()?;
        if !status.success() {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("the editor '{}' exited with {}", program, status),
            ));
        }
        std::fs::read_to_string(file.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_answers() {
        assert!(is_yes("y\n"));
        assert!(is_yes(" YES "));
        assert!(!is_yes("\n"));
        assert!(!is_yes("no"));
        assert!(!is_yes("yep"));
    }

    #[cfg(unix)]
    #[test]
    fn test_edit_returns_file_contents() {
        // `true` leaves the draft untouched
        let mut terminal = Terminal::new("true");
        assert_eq!(terminal.edit("{\"key\": \"\"}").unwrap(), "{\"key\": \"\"}");
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_editor_is_an_error() {
        let mut terminal = Terminal::new("false");
        assert!(terminal.edit("{}").is_err());
    }

    #[test]
    fn test_empty_editor_is_an_error() {
        assert_eq!(
            Terminal::new("  ").edit("{}").unwrap_err().kind(),
            io::ErrorKind::InvalidInput
        );
    }
}
