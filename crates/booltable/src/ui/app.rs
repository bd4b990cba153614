//! Application loop for the TUI.

use std::io;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::{Frame, Terminal};

use crate::app::export::{ExportOptions, Exporter};
use crate::app::session::{SessionSnapshot, SessionStore};
use crate::app::state::TruthTableState;
use crate::domain::model::HistoryUpdate;
use crate::infra::clipboard::{ClipboardSink, SystemClipboard};
use crate::infra::config::Config;
use crate::infra::location::{self, MemoryHistory, Navigator};
use crate::ui::components::options_input::OptionsInput;
use crate::ui::components::summary::{Summary, SummaryData};
use crate::ui::components::table_view::{self, TableView};
use crate::ui::keymap::{Action, Keymap};

const TICK_RATE: Duration = Duration::from_millis(120);
const PAGE: u16 = 10;

/// Interactive truth table editor.
pub struct UiApp<C: ClipboardSink = SystemClipboard> {
    config: Config,
    state: TruthTableState<MemoryHistory>,
    exporter: Exporter,
    export_options: ExportOptions,
    clipboard: C,
    session_store: SessionStore,
    keymap: Keymap,
    rendered: String,
    scroll: u16,
    table_height: u16,
    status: Option<StatusMessage>,
    should_quit: bool,
}

impl UiApp<SystemClipboard> {
    /// Build the app with the system clipboard, starting at `initial_query`.
    pub fn new(config: Config, initial_query: String, session_store: SessionStore) -> Result<Self> {
        Self::with_clipboard(config, initial_query, session_store, SystemClipboard::new())
    }
}

impl<C: ClipboardSink> UiApp<C> {
    pub fn with_clipboard(
        config: Config,
        initial_query: String,
        session_store: SessionStore,
        clipboard: C,
    ) -> Result<Self> {
        let keymap = Keymap::from_config(&config.keybindings).context("invalid keybindings")?;
        let state = TruthTableState::new(
            MemoryHistory::new(initial_query),
            config.defaults.match_mode(),
        )
        .context("failed to restore options from location")?
        .with_option_limit(config.defaults.option_limit);

        let mut app = Self {
            export_options: ExportOptions::from_config(&config),
            exporter: Exporter::new()?,
            config,
            state,
            clipboard,
            session_store,
            keymap,
            rendered: String::new(),
            scroll: 0,
            table_height: 0,
            status: None,
            should_quit: false,
        };
        app.refresh_rendered()?;
        Ok(app)
    }

    /// Launch the terminal UI and enter the event loop.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode().context("failed to enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to initialize terminal")?;

        let event_loop_result = self.event_loop(&mut terminal);

        disable_raw_mode().ok();
        let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
        let _ = terminal.show_cursor();

        let save_result = self.save_session();
        event_loop_result.and(save_result)
    }

    fn event_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            terminal.draw(|frame| self.render(frame))?;
            self.tick();

            if self.should_quit {
                break;
            }

            if event::poll(TICK_RATE)? {
                let ev = event::read()?;
                self.handle_event(ev)?;
            }
        }
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let size = frame.size();
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(1),
            ])
            .split(size);

        let title = Paragraph::new(Line::styled(
            "Heard You Like Booleans",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(title, layout[0]);

        OptionsInput.render(frame, layout[1], self.state.text());

        let main_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(30), Constraint::Length(40)])
            .split(layout[2]);

        self.table_height = main_chunks[0].height;
        self.scroll = self
            .scroll
            .min(table_view::max_scroll(&self.rendered, self.table_height));
        TableView.render(frame, main_chunks[0], &self.rendered, self.scroll);

        let side_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(8), Constraint::Length(5)])
            .split(main_chunks[1]);
        Summary.render(
            frame,
            side_chunks[0],
            self.state.derived(),
            &self.summary_data(),
        );
        frame.render_widget(self.hints(), side_chunks[1]);

        self.render_status(frame, layout[3]);
    }

    fn summary_data(&self) -> SummaryData {
        let navigator = self.state.navigator();
        SummaryData {
            url: self.shareable_url().unwrap_or_else(|err| err.to_string()),
            history_position: navigator.position(),
            history_len: navigator.len(),
            option_limit: self.config.defaults.option_limit,
        }
    }

    fn hints(&self) -> Paragraph<'static> {
        let label = |action: Action| {
            self.keymap
                .binding_for(action)
                .map(|binding| binding.to_string())
                .unwrap_or_else(|| "unbound".to_owned())
        };
        let key = |text: String| Span::styled(text, Style::default().fg(Color::Cyan));
        Paragraph::new(vec![
            Line::from(vec![
                key(label(Action::CopyResult)),
                Span::raw(" copy result · "),
                key(label(Action::CopyUrl)),
                Span::raw(" copy url"),
            ]),
            Line::from(vec![
                key(label(Action::Back)),
                Span::raw(" back · "),
                key(label(Action::Forward)),
                Span::raw(" forward"),
            ]),
            Line::from(vec![
                key("↑/↓".to_owned()),
                Span::raw(" scroll · "),
                key(label(Action::Quit)),
                Span::raw(" quit"),
            ]),
        ])
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Gray))
    }

    fn render_status(&mut self, frame: &mut Frame<'_>, area: Rect) {
        let line = match &self.status {
            Some(status) => {
                let style = match status.level {
                    StatusLevel::Info => Style::default().fg(Color::Gray),
                    StatusLevel::Success => Style::default().fg(Color::Green),
                    StatusLevel::Error => Style::default().fg(Color::Red),
                };
                Line::styled(status.text.clone(), style)
            }
            None => Line::styled(
                "Ready · separate options with commas",
                Style::default().fg(Color::DarkGray),
            ),
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn tick(&mut self) {
        if let Some(status) = &self.status
            && status.is_expired()
        {
            self.status = None;
        }
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        match event {
            Event::Key(key) => self.handle_key_event(key)?,
            Event::Paste(text) => {
                let mut next = self.state.text().to_owned();
                next.extend(text.chars().filter(|ch| !matches!(ch, '\r' | '\n')));
                self.edit_text(next)?;
            }
            Event::Resize(..) | Event::Mouse(_) | Event::FocusGained | Event::FocusLost => {}
        }
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = self.keymap.action_for(&key) {
            return self.perform(action);
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('u') => self.edit_text(String::new())?,
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Char(ch) if !key.modifiers.contains(KeyModifiers::ALT) => {
                let mut next = self.state.text().to_owned();
                next.push(ch);
                self.edit_text(next)?;
            }
            KeyCode::Backspace => {
                let mut next = self.state.text().to_owned();
                if next.pop().is_some() {
                    self.edit_text(next)?;
                }
            }
            KeyCode::Up => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Down => self.scroll_by(1),
            KeyCode::PageUp => self.scroll = self.scroll.saturating_sub(PAGE),
            KeyCode::PageDown => self.scroll_by(PAGE),
            KeyCode::Home => self.scroll = 0,
            _ => {}
        }
        Ok(())
    }

    fn perform(&mut self, action: Action) -> Result<()> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::CopyResult => {
                if self.state.derived().rows.is_empty() {
                    self.set_status(StatusLevel::Info, "Nothing to copy yet");
                } else {
                    let rendered = self.rendered.clone();
                    self.copy(&rendered, "Result copied to clipboard");
                }
            }
            Action::CopyUrl => {
                if self.state.derived().rows.is_empty() {
                    self.set_status(StatusLevel::Info, "Nothing to share yet");
                } else {
                    match self.shareable_url() {
                        Ok(url) => self.copy(&url, "Link copied to clipboard"),
                        Err(err) => self.set_status(StatusLevel::Error, err.to_string()),
                    }
                }
            }
            Action::Back => {
                if self.state.navigator_mut().back() {
                    self.apply_navigation()?;
                } else {
                    self.set_status(StatusLevel::Info, "Already at the oldest entry");
                }
            }
            Action::Forward => {
                if self.state.navigator_mut().forward() {
                    self.apply_navigation()?;
                } else {
                    self.set_status(StatusLevel::Info, "Already at the newest entry");
                }
            }
        }
        Ok(())
    }

    fn apply_navigation(&mut self) -> Result<()> {
        if let Err(err) = self.state.poll_navigation() {
            self.set_status(StatusLevel::Error, err.to_string());
        }
        self.scroll = 0;
        self.refresh_rendered()
    }

    fn edit_text(&mut self, text: String) -> Result<()> {
        match self.state.set_text(text) {
            Ok(HistoryUpdate::Pushed) => tracing::debug!("checkpoint added to history"),
            Ok(HistoryUpdate::Replaced | HistoryUpdate::Skipped) => {}
            Err(err) => self.set_status(StatusLevel::Error, err.to_string()),
        }
        self.refresh_rendered()
    }

    fn refresh_rendered(&mut self) -> Result<()> {
        self.rendered = self
            .exporter
            .render(self.state.derived(), &self.export_options)?;
        Ok(())
    }

    fn scroll_by(&mut self, delta: u16) {
        let max = table_view::max_scroll(&self.rendered, self.table_height);
        self.scroll = self.scroll.saturating_add(delta).min(max);
    }

    fn shareable_url(&self) -> Result<String> {
        let query = self.state.navigator().location().unwrap_or_default();
        location::shareable_url(&self.config.defaults.base_url, &query)
            .context("failed to build shareable link")
    }

    fn copy(&mut self, text: &str, success: &str) {
        match self.clipboard.copy(text) {
            Ok(()) => self.set_status(StatusLevel::Success, success),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard copy failed");
                self.set_status(StatusLevel::Error, format!("Copy failed: {err}"));
            }
        }
    }

    fn save_session(&self) -> Result<()> {
        let snapshot = SessionSnapshot {
            location: self.state.navigator().location().unwrap_or_default(),
        };
        self.session_store.save(&snapshot)
    }

    fn set_status<S: Into<String>>(&mut self, level: StatusLevel, message: S) {
        self.status = Some(StatusMessage::new(level, message.into()));
    }
}

#[derive(Debug)]
struct StatusMessage {
    level: StatusLevel,
    text: String,
    expires_at: Instant,
}

impl StatusMessage {
    fn new(level: StatusLevel, text: String) -> Self {
        Self {
            level,
            text,
            expires_at: Instant::now() + Duration::from_secs(4),
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusLevel {
    Info,
    Success,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::clipboard::MemoryClipboard;
    use crate::infra::location::{options_query, read_options};

    fn app(initial: &str) -> (UiApp<MemoryClipboard>, tempfile::TempDir) {
        let temp = tempfile::tempdir().unwrap();
        let app = UiApp::with_clipboard(
            Config::default(),
            options_query(initial),
            SessionStore::new(temp.path()),
            MemoryClipboard::default(),
        )
        .unwrap();
        (app, temp)
    }

    fn press(app: &mut UiApp<MemoryClipboard>, code: KeyCode, modifiers: KeyModifiers) {
        app.handle_event(Event::Key(KeyEvent::new(code, modifiers)))
            .unwrap();
    }

    fn type_text(app: &mut UiApp<MemoryClipboard>, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    fn history(app: &UiApp<MemoryClipboard>) -> Vec<String> {
        app.state
            .navigator()
            .entries()
            .iter()
            .map(|query| read_options(query))
            .collect()
    }

    #[test]
    fn typing_updates_table_and_history() {
        let (mut app, _temp) = app("");
        type_text(&mut app, "a,b");
        assert_eq!(app.state.text(), "a,b");
        assert_eq!(app.state.derived().combinations(), 4);
        assert_eq!(history(&app), vec!["a", "a,b"]);
        assert!(app.rendered.contains("\"b\": true"));
    }

    #[test]
    fn back_and_forward_keys_navigate() {
        let (mut app, _temp) = app("");
        type_text(&mut app, "a,b");
        press(&mut app, KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(app.state.text(), "a");
        press(&mut app, KeyCode::Right, KeyModifiers::ALT);
        assert_eq!(app.state.text(), "a,b");
        press(&mut app, KeyCode::Right, KeyModifiers::ALT);
        assert!(app.status.is_some());
    }

    #[test]
    fn copy_actions_use_clipboard() {
        let (mut app, _temp) = app("x");
        press(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert_eq!(app.clipboard.contents(), Some(app.rendered.as_str()));

        press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert_eq!(
            app.clipboard.contents(),
            Some("https://booleans.local/?options=x")
        );
    }

    #[test]
    fn copy_actions_require_rows() {
        let (mut app, _temp) = app("");
        press(&mut app, KeyCode::Char('y'), KeyModifiers::CONTROL);
        assert!(app.clipboard.contents().is_none());
        press(&mut app, KeyCode::Char('l'), KeyModifiers::CONTROL);
        assert!(app.clipboard.contents().is_none());
        assert!(app.status.is_some());
    }

    #[test]
    fn strict_mode_restores_invalid_pattern_entries() {
        let temp = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.defaults.match_mode = "strict".into();
        let mut app = UiApp::with_clipboard(
            config,
            options_query("a("),
            SessionStore::new(temp.path()),
            MemoryClipboard::default(),
        )
        .unwrap();
        assert_eq!(app.state.text(), "a(");

        type_text(&mut app, ",b");
        assert_eq!(history(&app), vec!["a(", "a(,"]);
        assert_eq!(app.state.derived().combinations(), 4);

        press(&mut app, KeyCode::Left, KeyModifiers::ALT);
        assert_eq!(app.state.text(), "a(");
        assert_eq!(app.state.derived().combinations(), 2);
        assert!(app.rendered.contains("\"a(\": true"));
        assert!(!app.rendered.contains("\"b\""));
    }

    #[test]
    fn backspace_and_clear_keep_location() {
        let (mut app, _temp) = app("ab");
        press(&mut app, KeyCode::Backspace, KeyModifiers::NONE);
        assert_eq!(app.state.text(), "a");
        press(&mut app, KeyCode::Char('u'), KeyModifiers::CONTROL);
        assert_eq!(app.state.text(), "");
        assert_eq!(app.rendered, "[]");
        assert_eq!(history(&app), vec!["a"]);
    }

    #[test]
    fn paste_is_appended_without_newlines() {
        let (mut app, _temp) = app("a");
        app.handle_event(Event::Paste(",b\n,c".into())).unwrap();
        assert_eq!(app.state.text(), "a,b,c");
        assert_eq!(app.state.derived().options, vec!["a", "b", "c"]);
    }

    #[test]
    fn quit_key_and_session_save() {
        let (mut app, temp) = app("p,q");
        press(&mut app, KeyCode::Esc, KeyModifiers::NONE);
        assert!(app.should_quit);
        app.save_session().unwrap();
        let saved = SessionStore::new(temp.path()).load().unwrap().unwrap();
        assert_eq!(read_options(&saved.location), "p,q");
    }
}
