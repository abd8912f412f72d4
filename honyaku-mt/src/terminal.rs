//! Operator backed by an interactive terminal
//!
//! Commands are read as ordinary lines. Editing switches the terminal into raw
//! mode and opens a single-line editor pre-filled with the current candidate,
//! so a typo can be fixed without retyping the whole translation.

use crate::review::{LineOperator, Operator};
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::queue;
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use std::io::{self, BufRead, Write};
use unicode_width::UnicodeWidthStr;

const EDIT_PROMPT: &str = "> ";

/// Editable single line with a cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer {
    chars: Vec<char>,
    /// Index into `chars`; `chars.len()` means end of line
    cursor: usize,
}

/// Result of feeding one key to a [`LineBuffer`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditAction {
    Continue,
    Submit,
    Cancel,
}

impl LineBuffer {
    /// Buffer holding `initial`, cursor at the end
    pub fn new(initial: &str) -> Self {
        let chars: Vec<char> = initial.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn text(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Display columns taken by the text left of the cursor
    pub fn cursor_width(&self) -> usize {
        self.chars[..self.cursor]
            .iter()
            .collect::<String>()
            .width()
    }

    pub fn insert(&mut self, c: char) {
        self.chars.insert(self.cursor, c);
        self.cursor += 1;
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor = (self.cursor + 1).min(self.chars.len());
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.chars.len();
    }

    /// Drop everything left of the cursor
    pub fn kill_to_start(&mut self) {
        self.chars.drain(..self.cursor);
        self.cursor = 0;
    }

    /// Apply one key press; releases are ignored
    pub fn apply(&mut self, key: KeyEvent) -> EditAction {
        if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
            return EditAction::Continue;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Enter => return EditAction::Submit,
            KeyCode::Esc => return EditAction::Cancel,
            KeyCode::Char('c') if ctrl => return EditAction::Cancel,
            KeyCode::Char('d') if ctrl && self.chars.is_empty() => return EditAction::Cancel,
            KeyCode::Char('a') if ctrl => self.move_home(),
            KeyCode::Char('e') if ctrl => self.move_end(),
            KeyCode::Char('u') if ctrl => self.kill_to_start(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.insert(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => self.move_left(),
            KeyCode::Right => self.move_right(),
            KeyCode::Home => self.move_home(),
            KeyCode::End => self.move_end(),
            _ => {}
        }
        EditAction::Continue
    }
}

/// Raw mode for as long as the guard lives
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn render(out: &mut impl Write, line: &LineBuffer) -> io::Result<()> {
    let column = EDIT_PROMPT.width() + line.cursor_width();
    queue!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(EDIT_PROMPT),
        Print(line.text()),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
    )?;
    out.flush()
}

/// Commands from `input`, edits through a raw-mode line editor on stdout
pub struct TerminalOperator<R> {
    commands: LineOperator<R>,
}

impl<R: BufRead> TerminalOperator<R> {
    pub fn new(input: R) -> Self {
        Self {
            commands: LineOperator::new(input),
        }
    }
}

impl<R: BufRead> Operator for TerminalOperator<R> {
    fn read_command(&mut self) -> io::Result<Option<String>> {
        self.commands.read_command()
    }

    fn edit(&mut self, current: &str) -> io::Result<Option<String>> {
        let mut out = io::stdout();
        let mut line = LineBuffer::new(current);

        let _raw = RawMode::enable()?;
        render(&mut out, &line)?;
        loop {
            let Event::Key(key) = event::read()? else {
                continue;
            };
            match line.apply(key) {
                EditAction::Continue => render(&mut out, &line)?,
                EditAction::Submit => {
                    queue!(out, Print("\r\n"))?;
                    out.flush()?;
                    return Ok(Some(line.text()));
                }
                EditAction::Cancel => {
                    queue!(out, Print("\r\n"))?;
                    out.flush()?;
                    return Ok(None);
                }
            }
        }
    }
}
