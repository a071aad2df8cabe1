use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Document viewer with line-based span selection.
///
/// The loaded reference text is kept in two forms: the raw string the engine
/// captures from (byte offsets) and the split lines the panel renders. The
/// two are indexed together so a line span maps straight to byte offsets.
pub struct Viewer {
    /// Current file path
    file_path: Option<PathBuf>,
    /// Raw document content
    raw: String,
    /// Content split into display lines
    lines: Vec<String>,
    /// Byte offset of the start of each line in `raw`
    line_offsets: Vec<usize>,
    /// Current scroll position (line number)
    scroll_position: usize,
    /// Cursor line for span selection
    cursor: usize,
    /// Anchor line while selection mode is active
    selection_anchor: Option<usize>,
}

impl Default for Viewer {
    fn default() -> Self {
        Self::new()
    }
}

impl Viewer {
    /// Create a new viewer
    pub fn new() -> Self {
        Self {
            file_path: None,
            raw: String::new(),
            lines: Vec::new(),
            line_offsets: Vec::new(),
            scroll_position: 0,
            cursor: 0,
            selection_anchor: None,
        }
    }

    /// Open a file in the viewer
    pub fn open_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref().to_path_buf();

        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;

        self.set_content(raw);
        self.file_path = Some(path);
        self.scroll_position = 0;
        self.cursor = 0;
        self.selection_anchor = None;

        Ok(())
    }

    /// Re-read the current file from disk after an external change,
    /// preserving (clamped) cursor and scroll positions.
    pub fn reload(&mut self) -> Result<()> {
        let Some(path) = self.file_path.clone() else {
            return Ok(());
        };
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Failed to reload file: {}", path.display()))?;

        self.set_content(raw);
        let last = self.lines.len().saturating_sub(1);
        self.cursor = self.cursor.min(last);
        self.scroll_position = self.scroll_position.min(last);
        self.selection_anchor = self.selection_anchor.map(|anchor| anchor.min(last));

        Ok(())
    }

    fn set_content(&mut self, raw: String) {
        self.lines.clear();
        self.line_offsets.clear();

        let mut offset = 0;
        for line in raw.split('\n') {
            self.line_offsets.push(offset);
            self.lines.push(line.to_string());
            offset += line.len() + 1;
        }

        self.raw = raw;
    }

    /// Get the current file path
    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    /// Get the raw document content
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Get the file content as display lines
    pub fn content(&self) -> &[String] {
        &self.lines
    }

    /// Get the current scroll position
    pub fn scroll_position(&self) -> usize {
        self.scroll_position
    }

    /// Get the cursor line
    pub fn cursor_position(&self) -> usize {
        self.cursor
    }

    /// Whether span selection is active
    pub fn in_selection_mode(&self) -> bool {
        self.selection_anchor.is_some()
    }

    /// Enter or leave span-selection mode. Entering anchors the span at the
    /// cursor line.
    pub fn toggle_selection_mode(&mut self) {
        self.selection_anchor = match self.selection_anchor {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    /// Leave span-selection mode without capturing.
    pub fn clear_selection_mode(&mut self) {
        self.selection_anchor = None;
    }

    /// The selected line span (first, last), inclusive, in either direction
    pub fn selection_range(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    /// The selected line span as byte offsets into the raw document
    pub fn selection_byte_range(&self) -> Option<(usize, usize)> {
        let (first, last) = self.selection_range()?;
        let start = self.line_offsets.get(first).copied()?;
        let end = self.line_offsets.get(last).copied()? + self.lines.get(last)?.len();
        Some((start, end.min(self.raw.len())))
    }

    /// The byte span of a single display line
    pub fn line_span(&self, line: usize) -> Option<(usize, usize)> {
        let start = self.line_offsets.get(line).copied()?;
        let end = start + self.lines.get(line)?.len();
        Some((start, end.min(self.raw.len())))
    }

    /// Move the cursor up one line
    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.scroll_position = self.scroll_position.min(self.cursor);
    }

    /// Move the cursor down one line
    pub fn cursor_down(&mut self) {
        if !self.lines.is_empty() {
            self.cursor = (self.cursor + 1).min(self.lines.len() - 1);
        }
    }

    /// Keep the cursor inside the visible window of the given height
    pub fn ensure_cursor_visible(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll_position {
            self.scroll_position = self.cursor;
        } else if self.cursor >= self.scroll_position + height {
            self.scroll_position = self.cursor + 1 - height;
        }
    }

    /// Move the view and cursor to the line containing the given byte offset
    pub fn jump_to_offset(&mut self, offset: usize) {
        if self.lines.is_empty() {
            return;
        }
        let line = self
            .line_offsets
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        self.cursor = line.min(self.lines.len() - 1);
        self.scroll_to_position(self.cursor);
    }

    /// Scroll up one line
    pub fn scroll_up(&mut self) {
        self.scroll_position = self.scroll_position.saturating_sub(1);
    }

    /// Scroll down one line
    pub fn scroll_down(&mut self) {
        if !self.lines.is_empty() {
            self.scroll_position =
                (self.scroll_position + 1).min(self.lines.len().saturating_sub(1));
        }
    }

    /// Scroll up one page
    pub fn scroll_page_up(&mut self, page_size: usize) {
        self.scroll_position = self.scroll_position.saturating_sub(page_size);
        self.cursor = self.cursor.saturating_sub(page_size);
    }

    /// Scroll down one page
    pub fn scroll_page_down(&mut self, page_size: usize) {
        if !self.lines.is_empty() {
            let last = self.lines.len() - 1;
            self.scroll_position = (self.scroll_position + page_size).min(last);
            self.cursor = (self.cursor + page_size).min(last);
        }
    }

    /// Scroll to the top of the file
    pub fn scroll_to_top(&mut self) {
        self.scroll_position = 0;
        self.cursor = 0;
    }

    /// Scroll to the bottom of the file
    pub fn scroll_to_bottom(&mut self) {
        if !self.lines.is_empty() {
            self.scroll_position = self.lines.len() - 1;
            self.cursor = self.lines.len() - 1;
        }
    }

    /// Scroll to a specific position
    pub fn scroll_to_position(&mut self, position: usize) {
        if !self.lines.is_empty() {
            self.scroll_position = position.min(self.lines.len() - 1);
        }
    }

    /// Get the visible content for display
    pub fn visible_content(&self, height: usize) -> Vec<&String> {
        if self.lines.is_empty() {
            return Vec::new();
        }

        let start = self.scroll_position;
        let end = (start + height).min(self.lines.len());

        self.lines[start..end].iter().collect()
    }
}
