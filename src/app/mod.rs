pub mod state;
mod events;

use anyhow::Result;
use ratatui::backend::CrosstermBackend;
use ratatui::crossterm::event::{Event, KeyCode, KeyEvent};
use ratatui::crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::crossterm::ExecutableCommand;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::path::Path;
use std::time::Duration;
use uuid::Uuid;

use self::events::{AppEvent, EventHandler};
use self::state::{AppMode, AppState, InputKind};
use crate::config::Config;
use crate::engine::Engine;
use crate::error::PanelError;
use crate::explorer::Explorer;
use crate::inject::MemoryHost;
use crate::storage::StateStore;
use crate::ui::render;
use crate::utils::watcher::DocumentWatcher;
use crate::viewer::Viewer;

/// Conversation used until the host (or the user) names another
const DEFAULT_CONVERSATION: &str = "default";

/// Lines moved by PageUp/PageDown
const PAGE_SIZE: usize = 10;

/// Main application struct
pub struct App {
    /// Terminal backend
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Application state
    state: AppState,
    /// Event handler
    events: EventHandler,
    /// File browser for the text library
    explorer: Explorer,
    /// Document viewer
    viewer: Viewer,
    /// Selection-tracking and prompt-assembly engine
    engine: Engine,
    /// Watcher for external edits to the open document
    watcher: Option<DocumentWatcher>,
    /// Conversation ids available for cycling
    conversations: Vec<String>,
    /// Debounce interval for state persistence
    persist_interval: Duration,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        // Setup terminal
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        stdout.execute(EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        // Create app components
        let state = AppState::default();
        let events = EventHandler::new(Duration::from_millis(config.tick_rate_ms));
        let explorer = Explorer::new(config.absolute_library_dir())?;
        let store = StateStore::open(config.absolute_state_file());
        let engine = Engine::new(store, Box::new(MemoryHost::new()), DEFAULT_CONVERSATION);

        let mut conversations = engine.known_conversations();
        conversations.sort();
        if !conversations.iter().any(|id| id == DEFAULT_CONVERSATION) {
            conversations.insert(0, DEFAULT_CONVERSATION.to_string());
        }

        Ok(Self {
            terminal,
            state,
            events,
            explorer,
            viewer: Viewer::new(),
            engine,
            watcher: None,
            conversations,
            persist_interval: Duration::from_millis(config.persist_interval_ms),
        })
    }

    /// Run the application main loop
    pub fn run(&mut self) -> Result<()> {
        // Main loop
        while !self.state.should_quit {
            // Draw the UI
            self.terminal.draw(|frame| {
                render(frame, &self.state, &self.explorer, &self.viewer, &self.engine);
            })?;

            // Handle events
            if let Ok(event) = self.events.next() {
                match event {
                    AppEvent::Input(Event::Key(key_event)) => self.handle_key_event(key_event),
                    AppEvent::Input(_) => {}
                    AppEvent::Tick => self.handle_tick(),
                }
            }
        }

        // Persist whatever the debounce still holds
        self.engine.flush();

        // Cleanup terminal
        terminal::disable_raw_mode()?;
        self.terminal.backend_mut().execute(LeaveAlternateScreen)?;

        Ok(())
    }

    /// Debounced persistence and document-change detection
    fn handle_tick(&mut self) {
        self.engine.persist_if_due(self.persist_interval);

        let changed = self
            .watcher
            .as_ref()
            .map(|watcher| watcher.document_changed())
            .unwrap_or(false);
        if changed {
            self.reload_document();
        }
    }

    /// Handle key events
    fn handle_key_event(&mut self, event: KeyEvent) {
        // Feedback belongs to the keypress that caused it
        self.state.notice = None;

        if self.state.input.is_some() {
            self.handle_input_key(event);
            return;
        }

        match self.state.mode {
            AppMode::Explorer => self.handle_explorer_key(event),
            AppMode::Viewer => self.handle_viewer_key(event),
        }
    }

    /// Keys for the status-line input (snippet search, protagonist name)
    fn handle_input_key(&mut self, event: KeyEvent) {
        match event.code {
            KeyCode::Esc => {
                self.state.input = None;
                self.state.input_buffer.clear();
            }
            KeyCode::Enter => {
                let Some(kind) = self.state.input.take() else {
                    return;
                };
                let value = std::mem::take(&mut self.state.input_buffer);
                match kind {
                    InputKind::Search => match self.engine.capture_search(&value) {
                        Ok(()) => {
                            if let Some(selection) = self.engine.selection() {
                                self.viewer.jump_to_offset(selection.start);
                            }
                            self.state.notify("Snippet captured");
                        }
                        Err(e) => self.notify_error(e),
                    },
                    InputKind::Protagonist => {
                        self.engine.set_protagonist_name(value);
                        self.state.notify("Protagonist name set");
                    }
                }
            }
            KeyCode::Backspace => {
                self.state.input_buffer.pop();
            }
            KeyCode::Char(c) => {
                self.state.input_buffer.push(c);
            }
            _ => {}
        }
    }

    /// Keys for the file browser
    fn handle_explorer_key(&mut self, event: KeyEvent) {
        match event.code {
            // Quit application
            KeyCode::Char('q') => self.state.should_quit = true,

            // Navigation
            KeyCode::Up | KeyCode::Char('k') => self.explorer.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.explorer.select_next(),
            KeyCode::PageUp => self.explorer.select_page_up(PAGE_SIZE),
            KeyCode::PageDown => self.explorer.select_page_down(PAGE_SIZE),
            KeyCode::Home => self.explorer.select_first(),
            KeyCode::End => self.explorer.select_last(),

            // Open directory or file
            KeyCode::Enter | KeyCode::Char('l') => {
                let target = self
                    .explorer
                    .selected_entry()
                    .filter(|entry| !entry.is_dir)
                    .map(|entry| entry.path.clone());
                match target {
                    Some(path) => self.open_document(&path),
                    None => {
                        if let Err(e) = self.explorer.open_selected() {
                            self.state.notify(format!("Error: {}", e));
                        }
                    }
                }
            }

            // Go back to parent directory
            KeyCode::Char('h') => {
                if let Err(e) = self.explorer.go_to_parent() {
                    self.state.notify(format!("Error: {}", e));
                }
            }
            _ => {}
        }
    }

    /// Keys for the document viewer
    fn handle_viewer_key(&mut self, event: KeyEvent) {
        match event.code {
            KeyCode::Char('q') => self.state.should_quit = true,

            // Leave selection mode first, then the viewer
            KeyCode::Esc | KeyCode::Char('h') => {
                if self.viewer.in_selection_mode() {
                    self.viewer.clear_selection_mode();
                } else {
                    self.state.mode = AppMode::Explorer;
                }
            }

            // Cursor movement
            KeyCode::Up | KeyCode::Char('k') => {
                self.viewer.cursor_up();
                self.viewer.ensure_cursor_visible(self.viewer_height());
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.viewer.cursor_down();
                self.viewer.ensure_cursor_visible(self.viewer_height());
            }
            KeyCode::PageUp => self.viewer.scroll_page_up(PAGE_SIZE),
            KeyCode::PageDown => self.viewer.scroll_page_down(PAGE_SIZE),
            KeyCode::Char('g') => self.viewer.scroll_to_top(),
            KeyCode::Char('G') => self.viewer.scroll_to_bottom(),

            // Span selection and capture
            KeyCode::Char('v') => self.viewer.toggle_selection_mode(),
            KeyCode::Char('c') => self.capture_selection(),
            KeyCode::Char('/') => {
                self.state.input = Some(InputKind::Search);
                self.state.input_buffer.clear();
            }
            KeyCode::Char('p') => {
                self.state.input = Some(InputKind::Protagonist);
                self.state.input_buffer = self.engine.convo_settings().protagonist.clone();
            }

            // Selection history
            KeyCode::Char('u') => match self.engine.undo_selection() {
                Ok(()) => {
                    if let Some(selection) = self.engine.selection() {
                        self.viewer.jump_to_offset(selection.start);
                    }
                    self.state.notify("Restored previous selection");
                }
                Err(e) => self.notify_error(e),
            },
            KeyCode::Char('x') => {
                self.engine.clear_selection();
                self.state.notify("Selection cleared");
            }

            // Jump back to the captured selection
            KeyCode::Char('o') => match self.engine.selection() {
                Some(selection) => {
                    let start = selection.start;
                    self.viewer.jump_to_offset(start);
                }
                None => self.state.notify("No selection to jump to"),
            },

            // Injection settings
            KeyCode::Char('e') => {
                let enabled = !self.engine.convo_settings().enabled;
                self.engine.set_enabled(enabled);
                self.state
                    .notify(if enabled { "Injection enabled" } else { "Injection disabled" });
            }
            KeyCode::Char('s') => {
                let on = !self.engine.convo_settings().separate_protagonist();
                self.engine.set_separate_protagonist(on);
            }
            KeyCode::Char('i') => {
                let on = !self.engine.convo_settings().isekai();
                self.engine.set_isekai(on);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                let depth = self.engine.global().depth + 1;
                self.engine.set_depth(depth);
            }
            KeyCode::Char('-') => {
                let depth = self.engine.global().depth.saturating_sub(1);
                self.engine.set_depth(depth);
            }

            // Conversations
            KeyCode::Char('n') => self.cycle_conversation(),
            KeyCode::Char('N') => self.new_conversation(),

            _ => {}
        }
    }

    /// Capture the viewer's selected span through the engine
    fn capture_selection(&mut self) {
        let Some((start, end)) = self.viewer.selection_byte_range() else {
            self.state.notify("Nothing selected (press v to start a span)");
            return;
        };
        match self.engine.capture_range(start, end) {
            Ok(()) => {
                self.viewer.clear_selection_mode();
                self.state.notify("Selection captured");
            }
            Err(e) => self.notify_error(e),
        }
    }

    /// Load a reference document into the viewer and the engine
    fn open_document(&mut self, path: &Path) {
        if let Err(e) = self.viewer.open_file(path) {
            self.state.notify(format!("Error: {}", e));
            return;
        }
        self.engine.set_document(self.viewer.raw().to_string());

        // Bring the view back to a previously captured selection
        if let Some(selection) = self.engine.selection() {
            let start = selection.start;
            self.viewer.jump_to_offset(start);
        }

        self.watcher = match DocumentWatcher::new(path) {
            Ok(watcher) => Some(watcher),
            Err(e) => {
                self.state.notify(format!("Not watching for edits: {}", e));
                None
            }
        };

        self.state.mode = AppMode::Viewer;
    }

    /// Re-read the document after an external edit and re-anchor the
    /// selection
    fn reload_document(&mut self) {
        if let Err(e) = self.viewer.reload() {
            self.state.notify(format!("Error: {}", e));
            return;
        }
        match self.engine.document_reloaded(self.viewer.raw().to_string()) {
            Ok(()) => self.state.notify("Document reloaded"),
            Err(PanelError::SnippetNotFound) => self
                .state
                .notify("Document changed; selection could not be re-anchored"),
            Err(e) => self.notify_error(e),
        }
    }

    /// Switch to the next known conversation
    fn cycle_conversation(&mut self) {
        if self.conversations.len() < 2 {
            self.state.notify("No other conversations (press N to start one)");
            return;
        }
        let current = self.engine.conversation_id().to_string();
        let position = self
            .conversations
            .iter()
            .position(|id| *id == current)
            .unwrap_or(0);
        let next = self.conversations[(position + 1) % self.conversations.len()].clone();
        self.engine.switch_conversation(&next);
        self.state.notify(format!("Conversation: {}", next));
    }

    /// Start a fresh conversation with a generated id
    fn new_conversation(&mut self) {
        let id = Uuid::new_v4().to_string();
        self.conversations.push(id.clone());
        self.engine.switch_conversation(&id);
        self.state.notify(format!("New conversation: {}", id));
    }

    fn notify_error(&mut self, error: PanelError) {
        self.state.notify(format!("Warning: {}", error));
    }

    /// Lines the viewer pane can show, given the fixed chrome around it
    fn viewer_height(&self) -> usize {
        let rows = self
            .terminal
            .size()
            .map(|size| size.height as usize)
            .unwrap_or(24);
        // Title (3) + preview (8) + status (1) + viewer borders (2)
        rows.saturating_sub(14).max(1)
    }
}
