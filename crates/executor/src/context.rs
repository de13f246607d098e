//! Everything a command may use besides the transaction.
//!
//! The [`Context`] lives for the whole session and is handed to every
//! command of every query. It carries:
//! - the collection root, where record folders live
//! - [`Settings`] for the external programs used to open and delete files
//! - the [`Console`] commands print to
//! - an [`Interaction`] for confirmations and record editing
//! - a [`MetadataSource`] for the importers
//! - the effect ledger for file-system side effects of the current query

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;
use std::rc::Rc;

use bibliophant_importers::{Error as ImportError, MetadataSource};
use tracing::{debug, warn};

/// External programs, each a command line the target path is appended to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    /// Opens a PDF file, e.g. `xdg-open`
    pub open_pdf: Option<String>,
    /// Opens a folder, e.g. `xdg-open`
    pub open_folder: Option<String>,
    /// Deletes a record folder, e.g. `rm -rf`; unset means delete directly
    pub delete_folder: Option<String>,
}

/// Where command output goes.
#[derive(Debug)]
pub enum Console {
    /// Standard output
    Stdout,
    /// An in-memory buffer
    Buffer(Vec<u8>),
}

impl Console {
    /// Everything written so far, for a buffer console; empty for stdout.
    pub fn contents(&self) -> String {
        match self {
            Console::Stdout => String::new(),
            Console::Buffer(buf) => String::from_utf8_lossy(buf).into_owned(),
        }
    }

    /// Clear a buffer console.
    pub fn clear(&mut self) {
        if let Console::Buffer(buf) = self {
            buf.clear();
        }
    }
}

impl Write for Console {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Console::Stdout => io::stdout().write(buf),
            Console::Buffer(out) => out.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Console::Stdout => io::stdout().flush(),
            Console::Buffer(_) => Ok(()),
        }
    }
}

/// Questions to the user.
pub trait Interaction {
    /// Ask a yes/no question.
    fn confirm(&mut self, question: &str) -> bool;

    /// Let the user edit the JSON draft of a record; returns the edited text.
    fn edit(&mut self, draft: &str) -> io::Result<String>;
}

/// Non-interactive use: nothing is confirmed, drafts are accepted as they are.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unattended;

impl Interaction for Unattended {
    fn confirm(&mut self, question: &str) -> bool {
        debug!(target: "bibliophant::chain", question, "Declined without asking");
        false
    }

    fn edit(&mut self, draft: &str) -> io::Result<String> {
        Ok(draft.to_string())
    }
}

/// Prepared answers, consumed in order. Once the answers run out questions
/// are declined and drafts accepted unchanged. The questions asked are logged.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    answers: VecDeque<bool>,
    edits: VecDeque<String>,
    asked: Rc<RefCell<Vec<String>>>,
}

impl Scripted {
    /// Answers for `confirm`.
    pub fn answers(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: answers.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Shared log of the questions asked, readable after the interaction
    /// has been handed to a `Context`.
    pub fn asked(&self) -> Rc<RefCell<Vec<String>>> {
        Rc::clone(&self.asked)
    }

    /// Add an edited text to return from the next `edit`.
    pub fn with_edit(mut self, text: impl Into<String>) -> Self {
        self.edits.push_back(text.into());
        self
    }
}

impl Interaction for Scripted {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.borrow_mut().push(question.to_string());
        self.answers.pop_front().unwrap_or(false)
    }

    fn edit(&mut self, draft: &str) -> io::Result<String> {
        Ok(self.edits.pop_front().unwrap_or_else(|| draft.to_string()))
    }
}

struct NoSource;

impl NoSource {
    fn unavailable() -> ImportError {
        ImportError::Http("no metadata source is configured".into())
    }
}

impl MetadataSource for NoSource {
    fn crossref_unixref(&self, _doi: &str) -> bibliophant_importers::Result<String> {
        Err(Self::unavailable())
    }

    fn arxiv_atom(&self, _id: &str) -> bibliophant_importers::Result<String> {
        Err(Self::unavailable())
    }

    fn arxiv_pdf(&self, _id: &str) -> bibliophant_importers::Result<Vec<u8>> {
        Err(Self::unavailable())
    }
}

// =============================================================================
// Effect ledger
// =============================================================================

/// A file-system side effect outside the transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Remove a folder and everything in it
    RemoveDir(PathBuf),
    /// Remove a single file
    RemoveFile(PathBuf),
    /// Move a file
    MoveFile {
        /// Current location
        from: PathBuf,
        /// New location
        to: PathBuf,
    },
    /// Run an external program and wait for it
    Run {
        /// Program
        program: String,
        /// Arguments
        args: Vec<String>,
    },
}

impl Effect {
    /// Carry out the effect.
    pub fn apply(&self) -> io::Result<()> {
        match self {
            Effect::RemoveDir(dir) => std::fs::remove_dir_all(dir),
            Effect::RemoveFile(file) => std::fs::remove_file(file),
            Effect::MoveFile { from, to } => move_file(from, to),
            Effect::Run { program, args } => {
                let status = process::Command::new(program).args(args).status()?;
                if status.success() {
                    Ok(())
                } else {
                    Err(io::Error::new(
                        io::ErrorKind::Other,
                        format!("'{}' exited with {}", program, status),
                    ))
                }
            }
        }
    }
}

/// Move a file, falling back to copy-and-remove across file systems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if std::fs::rename(from, to).is_ok() {
        return Ok(());
    }
    std::fs::copy(from, to)?;
    std::fs::remove_file(from)
}

/// Side effects of the current query.
///
/// Compensations undo effects already performed and run, newest first, when
/// the query aborts. Deferred effects are destructive and run, in order,
/// only once the transaction is committed.
#[derive(Debug, Default)]
pub struct EffectLedger {
    compensations: Vec<Effect>,
    deferred: Vec<Effect>,
}

impl EffectLedger {
    /// Pending compensations, oldest first.
    pub fn compensations(&self) -> &[Effect] {
        &self.compensations
    }

    /// Pending deferred effects, in order.
    pub fn deferred(&self) -> &[Effect] {
        &self.deferred
    }

    /// The query committed: run deferred effects, forget compensations.
    pub fn settle_committed(&mut self) {
        self.compensations.clear();
        for effect in self.deferred.drain(..) {
            debug!(target: "bibliophant::chain", ?effect, "Applying deferred effect");
            if let Err(e) = effect.apply() {
                warn!(target: "bibliophant::chain", ?effect, error = %e, "Deferred effect failed");
            }
        }
    }

    /// The query aborted: undo performed effects, drop deferred ones.
    pub fn settle_aborted(&mut self) {
        self.deferred.clear();
        while let Some(effect) = self.compensations.pop() {
            debug!(target: "bibliophant::chain", ?effect, "Compensating");
            if let Err(e) = effect.apply() {
                warn!(target: "bibliophant::chain", ?effect, error = %e, "Compensation failed");
            }
        }
    }
}

// =============================================================================
// Context
// =============================================================================

/// Session-wide state shared by all commands.
pub struct Context {
    root: PathBuf,
    settings: Settings,
    console: Console,
    interaction: Box<dyn Interaction>,
    source: Box<dyn MetadataSource>,
    effects: EffectLedger,
    viewers: Vec<process::Child>,
    exit_requested: bool,
}

impl Context {
    /// A context for the collection at `root` printing to stdout, without
    /// user interaction and without a metadata source.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            settings: Settings::default(),
            console: Console::Stdout,
            interaction: Box::new(Unattended),
            source: Box::new(NoSource),
            effects: EffectLedger::default(),
            viewers: Vec::new(),
            exit_requested: false,
        }
    }

    /// Use these settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Print to this console.
    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    /// Ask the user through this interaction.
    pub fn with_interaction(mut self, interaction: impl Interaction + 'static) -> Self {
        self.interaction = Box::new(interaction);
        self
    }

    /// Fetch metadata from this source.
    pub fn with_source(mut self, source: impl MetadataSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// The collection root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// External program settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The console commands print to.
    pub fn out(&mut self) -> &mut Console {
        &mut self.console
    }

    /// The console, read-only.
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Ask a yes/no question.
    pub fn confirm(&mut self, question: &str) -> bool {
        self.interaction.confirm(question)
    }

    /// Let the user edit a record draft.
    pub fn edit(&mut self, draft: &str) -> io::Result<String> {
        self.interaction.edit(draft)
    }

    /// The metadata source.
    pub fn source(&self) -> &dyn MetadataSource {
        self.source.as_ref()
    }

    /// Register an undo action for an effect that was just performed.
    pub fn compensate(&mut self, effect: Effect) {
        self.effects.compensations.push(effect);
    }

    /// Register a destructive effect to perform after commit.
    pub fn defer(&mut self, effect: Effect) {
        self.effects.deferred.push(effect);
    }

    /// The effect ledger of the current query.
    pub fn effects(&self) -> &EffectLedger {
        &self.effects
    }

    pub(crate) fn effects_mut(&mut self) -> &mut EffectLedger {
        &mut self.effects
    }

    /// Start a viewer program without waiting for it. It is reaped once it
    /// has exited, at a later spawn or query.
    pub fn spawn_viewer(&mut self, command: &mut process::Command) -> io::Result<()> {
        self.reap_viewers();
        let child = command.spawn()?;
        self.viewers.push(child);
        Ok(())
    }

    /// Collect the exit status of viewers that have finished.
    pub fn reap_viewers(&mut self) {
        self.viewers.retain_mut(|child| match child.try_wait() {
            Ok(Some(status)) => {
                debug!(target: "bibliophant::chain", pid = child.id(), %status, "Viewer exited");
                false
            }
            Ok(None) => true,
            Err(e) => {
                warn!(target: "bibliophant::chain", pid = child.id(), error = %e, "Cannot poll viewer");
                false
            }
        });
    }

    /// Number of viewers still running.
    pub fn running_viewers(&self) -> usize {
        self.viewers.len()
    }

    /// Ask the session loop to end after the current query.
    pub fn request_exit(&mut self) {
        self.exit_requested = true;
    }

    pub(crate) fn take_exit_request(&mut self) -> bool {
        std::mem::take(&mut self.exit_requested)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("root", &self.root)
            .field("settings", &self.settings)
            .field("effects", &self.effects)
            .field("viewers", &self.viewers.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compensations_run_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, "pdf").unwrap();

        let mut ctx = Context::new(dir.path());
        // a -> b was performed, then b was copied into a folder
        move_file(&a, &b).unwrap();
        ctx.compensate(Effect::MoveFile {
            from: b.clone(),
            to: a.clone(),
        });
        let folder = dir.path().join("folder");
        std::fs::create_dir(&folder).unwrap();
        ctx.compensate(Effect::RemoveDir(folder.clone()));
        ctx.defer(Effect::RemoveFile(a.clone()));

        ctx.effects_mut().settle_aborted();
        assert!(a.exists());
        assert!(!b.exists());
        assert!(!folder.exists());
        assert!(ctx.effects().deferred().is_empty());
    }

    #[test]
    fn test_deferred_effects_run_after_commit() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("2012GregoryStone");
        std::fs::create_dir(&folder).unwrap();

        let mut ctx = Context::new(dir.path());
        ctx.compensate(Effect::RemoveFile(dir.path().join("never")));
        ctx.defer(Effect::RemoveDir(folder.clone()));
        assert!(folder.exists());

        ctx.effects_mut().settle_committed();
        assert!(!folder.exists());
        assert!(ctx.effects().compensations().is_empty());
    }

    #[test]
    fn test_scripted_interaction() {
        let mut scripted = Scripted::answers([true]).with_edit("{}");
        let asked = scripted.asked();
        assert!(scripted.confirm("first?"));
        assert!(!scripted.confirm("second?"));
        assert_eq!(*asked.borrow(), vec!["first?", "second?"]);
        assert_eq!(scripted.edit("draft").unwrap(), "{}");
        assert_eq!(scripted.edit("draft").unwrap(), "draft");
    }

    #[test]
    fn test_buffer_console() {
        let mut console = Console::Buffer(Vec::new());
        writeln!(console, "hello").unwrap();
        assert_eq!(console.contents(), "hello\n");
        console.clear();
        assert_eq!(console.contents(), "");
    }

    #[cfg(unix)]
    #[test]
    fn test_finished_viewers_are_reaped() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = Context::new(dir.path());
        ctx.spawn_viewer(&mut process::Command::new("true")).unwrap();
        assert_eq!(ctx.running_viewers(), 1);

        let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
        while ctx.running_viewers() > 0 && std::time::Instant::now() < deadline {
            std::thread::sleep(std::time::Duration::from_millis(20));
            ctx.reap_viewers();
        }
        assert_eq!(ctx.running_viewers(), 0);
    }
}
