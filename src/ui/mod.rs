use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::app::state::{AppMode, AppState, InputKind};
use crate::engine::Engine;
use crate::explorer::Explorer;
use crate::utils::tokenizer::{count_tokens, format_token_count};
use crate::utils::truncate_string;
use crate::viewer::Viewer;

/// Render the UI
pub fn render(
    frame: &mut Frame,
    state: &AppState,
    explorer: &Explorer,
    viewer: &Viewer,
    engine: &Engine,
) {
    // Create the layout
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Browser or viewer
            Constraint::Length(8), // Injection preview
            Constraint::Length(1), // Status line
        ])
        .split(frame.area());

    // Render title
    render_title(frame, chunks[0], engine);

    // Render the focused pane
    match state.mode {
        AppMode::Explorer => render_explorer(frame, chunks[1], explorer),
        AppMode::Viewer => render_viewer(frame, chunks[1], viewer, engine),
    }

    // Render injection preview
    render_preview(frame, chunks[2], engine);

    // Render status line
    render_status(frame, chunks[3], state);
}

/// Render the application title
fn render_title(frame: &mut Frame, area: Rect, engine: &Engine) {
    let title = Paragraph::new(format!(
        "Magpie - Reference Panel  [conversation: {}]",
        truncate_string(engine.conversation_id(), 20)
    ))
    .style(Style::default().fg(Color::Cyan))
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(title, area);
}

/// Render the file browser
fn render_explorer(frame: &mut Frame, area: Rect, explorer: &Explorer) {
    let block = Block::default().title("Text Library").borders(Borders::ALL);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // Create list items from directory entries
    let items: Vec<ListItem> = explorer
        .entries()
        .iter()
        .map(|entry| {
            let prefix = if entry.is_dir { "📁 " } else { "📄 " };
            let content = format!("{}{}", prefix, entry.name);

            ListItem::new(Line::from(vec![Span::raw(content)]))
        })
        .collect();

    // Create the list widget
    let list = List::new(items)
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    // Render the list with the current selection
    let mut state = ListState::default();
    state.select(Some(explorer.selected_index()));

    frame.render_stateful_widget(list, inner_area, &mut state);
}

/// Render the document with cursor, live span, and captured selection
fn render_viewer(frame: &mut Frame, area: Rect, viewer: &Viewer, engine: &Engine) {
    let title = viewer
        .file_path()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "(no document)".to_string());
    let block = Block::default().title(title).borders(Borders::ALL);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let captured = engine.selection().map(|s| (s.start, s.end));
    let span_range = viewer.selection_range();
    let cursor = viewer.cursor_position();
    let scroll = viewer.scroll_position();

    let lines: Vec<Line> = viewer
        .visible_content(inner_area.height as usize)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            let index = scroll + i;
            let mut style = Style::default();

            // Captured selection reads as highlighted text
            if let (Some((start, end)), Some((line_start, line_end))) =
                (captured, viewer.line_span(index))
            {
                if line_start < end && line_end > start {
                    style = style.bg(Color::Cyan).fg(Color::Black);
                }
            }

            // An in-progress span takes precedence over the capture
            if let Some((first, last)) = span_range {
                if index >= first && index <= last {
                    style = style.bg(Color::Yellow).fg(Color::Black);
                }
            }

            if index == cursor {
                style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
            }

            Line::from(Span::styled(text.clone(), style))
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner_area);
}

/// Render the block currently installed in the host
fn render_preview(frame: &mut Frame, area: Rect, engine: &Engine) {
    let assembled = engine.assembled();
    let settings = engine.convo_settings();

    let mode = if settings.separate_protagonist() {
        "separate-protagonist"
    } else if settings.isekai() {
        "isekai"
    } else {
        "no mode"
    };
    let title = format!(
        "Injection [{} | depth {} | {} | {}]",
        if settings.enabled { "on" } else { "off" },
        engine.global().depth,
        mode,
        format_token_count(count_tokens(assembled)),
    );

    let body = if assembled.is_empty() {
        Paragraph::new("(nothing installed)").style(Style::default().fg(Color::DarkGray))
    } else {
        Paragraph::new(assembled).wrap(Wrap { trim: false })
    };

    frame.render_widget(
        body.block(Block::default().title(title).borders(Borders::ALL)),
        area,
    );
}

/// Render the status line
fn render_status(frame: &mut Frame, area: Rect, state: &AppState) {
    let status = match state.input {
        Some(InputKind::Search) => Paragraph::new(format!("/{}▌", state.input_buffer))
            .style(Style::default().fg(Color::White)),
        Some(InputKind::Protagonist) => {
            Paragraph::new(format!(" Protagonist: {}▌", state.input_buffer))
                .style(Style::default().fg(Color::White))
        }
        None => {
            if let Some(notice) = &state.notice {
                Paragraph::new(format!(" {}", notice)).style(Style::default().fg(Color::Yellow))
            } else {
                let help = match state.mode {
                    AppMode::Explorer => " q: Quit | ↑/k,↓/j: Navigate | Enter/l: Open | h: Back",
                    AppMode::Viewer => {
                        " v: Span | c: Capture | /: Search | u: Undo | o: Jump | e: On/Off | s/i: Mode | p: Name | +/-: Depth | n/N: Convo | h: Back"
                    }
                };
                Paragraph::new(help).style(Style::default().fg(Color::Gray))
            }
        }
    };

    frame.render_widget(status, area);
}
