use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::PanelError;
use crate::locator;
use crate::utils::floor_char_boundary;

/// Maximum number of superseded selections kept for undo.
pub const HISTORY_CAPACITY: usize = 10;

/// A captured span of the reference document.
///
/// `text == document[start..end]` at capture time; the pair can go stale if
/// the document changes later, until [`SelectionState::relocate`] re-anchors
/// it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    /// The captured text, exactly as it read at capture time
    pub text: String,
    /// Start byte offset into the document
    pub start: usize,
    /// End byte offset into the document
    pub end: usize,
    /// Timestamp when the selection was captured (unix seconds)
    pub captured_at: u64,
}

impl Selection {
    fn new(text: String, start: usize, end: usize) -> Self {
        Self {
            text,
            start,
            end,
            captured_at: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
        }
    }
}

/// The current selection plus its bounded undo history, for one conversation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    current: Option<Selection>,
    history: VecDeque<Selection>,
}

impl SelectionState {
    /// The current selection, if any
    pub fn current(&self) -> Option<&Selection> {
        self.current.as_ref()
    }

    /// Superseded selections, oldest first
    pub fn history(&self) -> &VecDeque<Selection> {
        &self.history
    }

    /// Capture the span `[start, end)` of `document` as the new current
    /// selection.
    ///
    /// A zero-width span is a no-op. Offsets past the end of the document
    /// are clamped, snapping to char boundaries so slicing cannot panic.
    /// The previous selection is pushed onto the undo history only when its
    /// text differs from the new capture.
    pub fn capture(&mut self, document: &str, start: usize, end: usize) {
        let end = floor_char_boundary(document, end.min(document.len()));
        let start = floor_char_boundary(document, start.min(end));
        if start == end {
            return;
        }
        let text = document[start..end].to_string();
        self.replace(Selection::new(text, start, end));
    }

    /// Capture by locating `needle` in `document`, tolerating whitespace and
    /// case drift. Leaves state unchanged when nothing matches.
    pub fn capture_by_locate(&mut self, document: &str, needle: &str) -> Result<(), PanelError> {
        let span = locator::locate(document, needle).ok_or(PanelError::SnippetNotFound)?;
        self.capture(document, span.start, span.end);
        Ok(())
    }

    /// Restore the most recently superseded selection.
    ///
    /// Pure rollback: the replaced current selection is not pushed anywhere,
    /// so undo cannot be redone.
    pub fn undo(&mut self) -> Result<(), PanelError> {
        let prior = self.history.pop_back().ok_or(PanelError::EmptyHistory)?;
        self.current = Some(prior);
        Ok(())
    }

    /// Drop the current selection. The undo history is untouched.
    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Re-anchor the current selection after the document content changed.
    ///
    /// Offsets (and, for tolerant matches, the text) are updated in place;
    /// the selection is the same logical object, so nothing is pushed onto
    /// the undo history. On failure the stale selection is left as it was.
    pub fn relocate(&mut self, document: &str) -> Result<(), PanelError> {
        let Some(selection) = self.current.as_mut() else {
            return Ok(());
        };
        let span =
            locator::locate(document, &selection.text).ok_or(PanelError::SnippetNotFound)?;
        selection.start = span.start;
        selection.end = span.end;
        selection.text = document[span.start..span.end].to_string();
        Ok(())
    }

    fn replace(&mut self, next: Selection) {
        if let Some(prev) = self.current.take() {
            if prev.text != next.text {
                if self.history.len() == HISTORY_CAPACITY {
                    self.history.pop_front();
                }
                self.history.push_back(prev);
            }
        }
        self.current = Some(next);
    }
}
