//! Interactive review of machine translations
//!
//! Each harvested string goes through the same small state machine:
//!
//! ```text
//! Fetching ──ok──▶ Reviewing ──save──▶ Saved
//!    │                │  ▲  ──keep──▶ Skipped
//!    │                │  │  ──quit──▶ Aborted
//!    │                └──┘ edit / regenerate / invalid input
//!    └──fail──▶ keep ▶ Skipped | quit ▶ Aborted
//! ```
//!
//! Accepting a translation writes it into the document at the entry's path
//! and persists the whole document straight away, so an interrupted session
//! loses nothing that was already accepted. Quitting at the review prompt
//! persists as well. Any other end of the run, including quitting after a
//! failed fetch, persists one final time and reports its totals.

use crate::error::{MtError, MtResult};
use crate::translator::Translator;
use honyaku::{JsonDocument, PathEntry, harvest};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Operator decision at the review prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Save,
    Edit,
    Regenerate,
    Keep,
    Quit,
}

impl Command {
    /// Parse a single-letter command, ignoring case and surrounding whitespace
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "s" => Some(Command::Save),
            "e" => Some(Command::Edit),
            "r" => Some(Command::Regenerate),
            "k" => Some(Command::Keep),
            "q" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// Source of operator input
///
/// `None` means the input has ended, which the review loop treats as quit.
pub trait Operator {
    /// Read one line of command input
    fn read_command(&mut self) -> io::Result<Option<String>>;

    /// Ask for a corrected translation, starting from `current`
    ///
    /// Returning `None` or an empty string keeps `current` unchanged.
    fn edit(&mut self, current: &str) -> io::Result<Option<String>>;
}

/// Line-based operator over any buffered reader (stdin, or a script in tests)
#[derive(Debug)]
pub struct LineOperator<R> {
    input: R,
}

impl<R: BufRead> LineOperator<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\r', '\n']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl<R: BufRead> Operator for LineOperator<R> {
    fn read_command(&mut self) -> io::Result<Option<String>> {
        self.read_line()
    }

    fn edit(&mut self, _current: &str) -> io::Result<Option<String>> {
        self.read_line()
    }
}

/// How one entry left the review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    /// Translation written into the document and persisted
    Saved,
    /// Original text left in place
    Skipped,
    /// Operator quit at the review prompt; the document has been persisted
    /// and the run ends immediately
    Aborted,
    /// Operator gave up after a failed fetch; the run ends with the usual
    /// final persist and totals
    Stopped,
}

/// Totals for a review run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewSummary {
    pub total: usize,
    pub translated: usize,
    pub skipped: usize,
    /// The run ended before every entry was reviewed
    pub aborted: bool,
}

/// A document ready for review, or the reason there is nothing to do
#[derive(Debug)]
pub enum ReviewInput {
    Ready {
        document: JsonDocument,
        entries: Vec<PathEntry>,
    },
    /// No string needs translation; the file is left untouched
    NothingToTranslate,
}

/// Load `path` and harvest the strings that still need translation
///
/// A missing file is [`MtError::InputNotFound`]; malformed JSON surfaces as
/// [`MtError::Document`] before anything is written.
pub fn load_review_input(path: &Path) -> MtResult<ReviewInput> {
    if !path.is_file() {
        return Err(MtError::InputNotFound(path.to_path_buf()));
    }
    let document = JsonDocument::open(path)?;
    let entries = harvest(document.root());
    if entries.is_empty() {
        return Ok(ReviewInput::NothingToTranslate);
    }
    Ok(ReviewInput::Ready { document, entries })
}

/// Transient state of the entry under review
#[derive(Debug)]
struct ReviewState {
    candidate: String,
    attempts: u32,
}

/// One review run over a single document
///
/// The session owns the document, the translator and the operator; console
/// output goes to `out`.
pub struct ReviewSession<T, O, W> {
    document: JsonDocument,
    translator: T,
    operator: O,
    out: W,
}

impl<T, O, W> ReviewSession<T, O, W>
where
    T: Translator,
    O: Operator,
    W: Write,
{
    pub fn new(document: JsonDocument, translator: T, operator: O, out: W) -> Self {
        Self {
            document,
            translator,
            operator,
            out,
        }
    }

    pub fn document(&self) -> &JsonDocument {
        &self.document
    }

    pub fn translator(&self) -> &T {
        &self.translator
    }

    /// Review `entries` in order until they run out or the operator quits
    pub async fn run(&mut self, entries: &[PathEntry]) -> MtResult<ReviewSummary> {
        let mut summary = ReviewSummary {
            total: entries.len(),
            ..ReviewSummary::default()
        };

        let mut quit_at_prompt = false;
        for (index, entry) in entries.iter().enumerate() {
            writeln!(self.out, "\n{}", "=".repeat(50))?;
            writeln!(self.out, "[{}/{}]", index + 1, entries.len())?;

            let outcome = self.review_item(entry, &summary).await?;
            tracing::debug!(path = %entry.path, ?outcome, "entry reviewed");
            match outcome {
                ItemOutcome::Saved => summary.translated += 1,
                ItemOutcome::Skipped => summary.skipped += 1,
                ItemOutcome::Aborted => {
                    summary.aborted = true;
                    quit_at_prompt = true;
                    break;
                }
                ItemOutcome::Stopped => {
                    summary.aborted = true;
                    break;
                }
            }
        }

        if quit_at_prompt {
            writeln!(
                self.out,
                "Translated: {}, Skipped: {}",
                summary.translated, summary.skipped
            )?;
            return Ok(summary);
        }

        writeln!(self.out, "\n{}", "=".repeat(50))?;
        writeln!(self.out, "Translation complete!")?;
        writeln!(
            self.out,
            "Translated: {}, Skipped: {}",
            summary.translated, summary.skipped
        )?;
        writeln!(self.out, "{}", "=".repeat(50))?;
        self.persist()?;
        Ok(summary)
    }

    /// Drive a single entry from fetching to a final outcome
    pub async fn review_item(
        &mut self,
        entry: &PathEntry,
        progress: &ReviewSummary,
    ) -> MtResult<ItemOutcome> {
        writeln!(self.out, "\n--- Path: {} ---", entry.path)?;
        writeln!(self.out, "\nOriginal:\n{}\n", entry.value)?;

        // Fetching
        write!(self.out, "Translating... ")?;
        self.out.flush()?;
        let mut state = match self.translator.translate(&entry.value).await {
            Ok(candidate) => ReviewState {
                candidate,
                attempts: 1,
            },
            Err(e) => {
                tracing::warn!(path = %entry.path, error = %e, "translation failed");
                writeln!(self.out, "Failed!")?;
                writeln!(self.out, "Error: {}", e)?;
                writeln!(
                    self.out,
                    "Could not get translation. [k]eep original or [q]uit?"
                )?;
                self.out.flush()?;
                // Anything but quit (or end of input) keeps the original
                let quit = match self.operator.read_command()? {
                    None => true,
                    Some(line) => Command::parse(&line) == Some(Command::Quit),
                };
                if !quit {
                    return Ok(ItemOutcome::Skipped);
                }
                tracing::info!(
                    translated = progress.translated,
                    skipped = progress.skipped,
                    "review stopped after failed fetch"
                );
                return Ok(ItemOutcome::Stopped);
            }
        };
        writeln!(self.out, "Done!\n")?;
        writeln!(self.out, "Translation:\n{}", state.candidate)?;

        // Reviewing
        loop {
            writeln!(
                self.out,
                "\n[s]ave | [e]dit | [r]egenerate | [k]eep original | [q]uit"
            )?;
            write!(self.out, "> ")?;
            self.out.flush()?;

            let command = match self.operator.read_command()? {
                None => Command::Quit,
                Some(line) => match Command::parse(&line) {
                    Some(command) => command,
                    None => {
                        writeln!(
                            self.out,
                            "Unknown option. Please choose [s]ave, [e]dit, [r]egenerate, [k]eep, or [q]uit."
                        )?;
                        continue;
                    }
                },
            };

            match command {
                Command::Save => {
                    self.document.set_string(&entry.path, &state.candidate)?;
                    self.document.persist()?;
                    writeln!(self.out, "Saved!")?;
                    return Ok(ItemOutcome::Saved);
                }
                Command::Edit => {
                    writeln!(
                        self.out,
                        "\nEdit translation (empty input keeps the current text):"
                    )?;
                    writeln!(self.out, "{}", state.candidate)?;
                    write!(self.out, "> ")?;
                    self.out.flush()?;
                    if let Some(edited) = self.operator.edit(&state.candidate)? {
                        if !edited.is_empty() {
                            state.candidate = edited;
                        }
                    }
                    writeln!(self.out, "\nUpdated translation:\n{}", state.candidate)?;
                }
                Command::Regenerate => {
                    write!(self.out, "Regenerating... ")?;
                    self.out.flush()?;
                    match self.translator.translate(&entry.value).await {
                        Ok(candidate) => {
                            state.candidate = candidate;
                            state.attempts += 1;
                            writeln!(self.out, "Done!\n")?;
                            writeln!(self.out, "New translation:\n{}", state.candidate)?;
                        }
                        Err(e) => {
                            tracing::warn!(
                                path = %entry.path,
                                attempts = state.attempts,
                                error = %e,
                                "regeneration failed"
                            );
                            writeln!(self.out, "Failed! Keeping previous translation.")?;
                        }
                    }
                }
                Command::Keep => {
                    writeln!(self.out, "Keeping original.")?;
                    return Ok(ItemOutcome::Skipped);
                }
                Command::Quit => return self.quit(progress),
            }
        }
    }

    fn quit(&mut self, progress: &ReviewSummary) -> MtResult<ItemOutcome> {
        writeln!(self.out, "\nSaving progress and exiting...")?;
        tracing::info!(
            translated = progress.translated,
            skipped = progress.skipped,
            "review aborted by operator"
        );
        self.persist()?;
        Ok(ItemOutcome::Aborted)
    }

    fn persist(&mut self) -> MtResult<()> {
        self.document.persist()?;
        writeln!(self.out, "Saved to: {}", self.document.path().display())?;
        Ok(())
    }
}
