//! Main TUI application state and logic

use crate::output::Channel;
use crate::session::{Language, Session};
use crate::ExecOutcome;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;
use std::time::Duration;
use tracing::debug;

/// Which pane receives scroll keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Transcript,
    State,
}

impl FocusedPane {
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Transcript => FocusedPane::State,
            FocusedPane::State => FocusedPane::Transcript,
        }
    }
}

/// What produced a transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Echo of a submitted line
    Input,
    Output,
    Debug,
    /// Output of a line that returned `ExecOutcome::Error`
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub language: Language,
    pub text: String,
}

/// The main application state
pub struct App {
    pub session: Session,

    /// Language the input line is sent to
    pub language: Language,

    /// Line being edited and cursor position in chars
    pub input: String,
    pub cursor: usize,

    /// Submitted lines, oldest first
    pub history: Vec<String>,
    history_index: Option<usize>,

    pub transcript: Vec<TranscriptEntry>,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub transcript_scroll: usize,
    pub state_scroll: usize,

    /// Show `debug_output` lines in the transcript
    pub show_debug: bool,

    pub should_quit: bool,

    pub status_message: String,

    pub last_outcome: ExecOutcome,
}

impl App {
    pub fn new(session: Session, language: Language) -> Self {
        App {
            session,
            language,
            input: String::new(),
            cursor: 0,
            history: Vec::new(),
            history_index: None,
            transcript: Vec::new(),
            focused_pane: FocusedPane::Transcript,
            transcript_scroll: 0,
            state_scroll: 0,
            show_debug: false,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_outcome: ExecOutcome::Continue,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes, input line, status bar
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(main_chunks[0]);

        super::panes::render_transcript_pane(
            frame,
            columns[0],
            &self.transcript,
            self.show_debug,
            self.focused_pane == FocusedPane::Transcript,
            &mut self.transcript_scroll,
        );

        super::panes::render_state_pane(
            frame,
            columns[1],
            &self.session,
            self.language,
            self.focused_pane == FocusedPane::State,
            &mut self.state_scroll,
        );

        super::panes::render_input_pane(
            frame,
            main_chunks[1],
            self.language,
            &self.input,
            self.cursor,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[2],
            &self.status_message,
            self.language,
            self.last_outcome,
            self.show_debug,
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('l') if ctrl => {
                self.transcript.clear();
                self.transcript_scroll = 0;
                self.status_message = "Transcript cleared".to_string();
            }
            KeyCode::Char('r') if ctrl => {
                self.session.reset(self.language);
                self.status_message = format!("{} engine reset", self.language);
            }
            KeyCode::Tab => {
                self.language = self.language.toggle();
                self.status_message = format!("Switched to {}", self.language);
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::F(1) => {
                self.show_debug = !self.show_debug;
                self.transcript_scroll = usize::MAX;
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => {
                let at = self.byte_index();
                self.input.insert(at, c);
                self.cursor += 1;
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_index();
                    self.input.remove(at);
                }
            }
            KeyCode::Delete => {
                if self.cursor < self.input.chars().count() {
                    let at = self.byte_index();
                    self.input.remove(at);
                }
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.input.chars().count()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.input.chars().count(),
            KeyCode::Up => self.history_prev(),
            KeyCode::Down => self.history_next(),
            KeyCode::PageUp => match self.focused_pane {
                FocusedPane::Transcript => {
                    self.transcript_scroll = self.transcript_scroll.saturating_sub(5)
                }
                FocusedPane::State => self.state_scroll = self.state_scroll.saturating_sub(5),
            },
            KeyCode::PageDown => match self.focused_pane {
                FocusedPane::Transcript => {
                    self.transcript_scroll = self.transcript_scroll.saturating_add(5)
                }
                FocusedPane::State => self.state_scroll = self.state_scroll.saturating_add(5),
            },
            _ => {}
        }
    }

    /// Send the input line to the active engine and record its output
    pub fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.cursor = 0;
        self.history_index = None;

        self.transcript.push(TranscriptEntry {
            kind: EntryKind::Input,
            language: self.language,
            text: format!("{}{}", self.language.prompt(), line),
        });

        if line.trim().is_empty() {
            return;
        }
        if self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }

        let outcome = self.session.execute(self.language, &line);
        debug!(language = %self.language, ?outcome, "line executed");

        for output in self.session.take_output(self.language) {
            let kind = match (output.channel, outcome) {
                (Channel::Debug, _) => EntryKind::Debug,
                (Channel::Log, ExecOutcome::Error) => EntryKind::Error,
                (Channel::Log, ExecOutcome::Continue) => EntryKind::Output,
            };
            self.transcript.push(TranscriptEntry {
                kind,
                language: self.language,
                text: output.text,
            });
        }

        self.last_outcome = outcome;
        self.status_message = match outcome {
            ExecOutcome::Continue => "ok".to_string(),
            ExecOutcome::Error => "error".to_string(),
        };
        // Auto-scroll transcript to bottom
        self.transcript_scroll = usize::MAX;
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let index = match self.history_index {
            Some(i) => i.saturating_sub(1),
            None => self.history.len() - 1,
        };
        self.history_index = Some(index);
        self.set_input(self.history[index].clone());
    }

    fn history_next(&mut self) {
        match self.history_index {
            Some(i) if i + 1 < self.history.len() => {
                self.history_index = Some(i + 1);
                self.set_input(self.history[i + 1].clone());
            }
            Some(_) => {
                self.history_index = None;
                self.set_input(String::new());
            }
            None => {}
        }
    }

    fn set_input(&mut self, text: String) {
        self.cursor = text.chars().count();
        self.input = text;
    }

    fn byte_index(&self) -> usize {
        self.input
            .char_indices()
            .nth(self.cursor)
            .map_or(self.input.len(), |(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_line(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
        press(app, KeyCode::Enter);
    }

    #[test]
    fn test_submit_records_output() {
        let mut app = App::new(Session::new(), Language::Forth);
        type_line(&mut app, "2 3 + .");

        assert_eq!(app.transcript[0].text, "forth> 2 3 + .");
        assert_eq!(app.transcript[1].text, "5");
        assert_eq!(app.transcript[1].kind, EntryKind::Output);
        assert_eq!(app.last_outcome, ExecOutcome::Continue);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_error_lines_are_marked() {
        let mut app = App::new(Session::new(), Language::Forth);
        type_line(&mut app, "DROP");
        assert_eq!(app.transcript[1].kind, EntryKind::Error);
        assert_eq!(app.transcript[1].text, "Stack underflow in DROP");
    }

    #[test]
    fn test_tab_switches_language() {
        let mut app = App::new(Session::new(), Language::Forth);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.language, Language::Prolog);

        type_line(&mut app, "likes(mary, wine).");
        type_line(&mut app, "?- likes(mary, X).");
        assert_eq!(app.transcript.last().map(|e| e.text.as_str()), Some("X = wine"));
    }

    #[test]
    fn test_history_and_editing() {
        let mut app = App::new(Session::new(), Language::Forth);
        type_line(&mut app, "1 .");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.input, "1 .");

        press(&mut app, KeyCode::Home);
        press(&mut app, KeyCode::Delete);
        press(&mut app, KeyCode::Char('7'));
        assert_eq!(app.input, "7 .");

        press(&mut app, KeyCode::Down);
        assert!(app.input.is_empty());
    }

    #[test]
    fn test_quit_keys() {
        let mut app = App::new(Session::new(), Language::Forth);
        app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
