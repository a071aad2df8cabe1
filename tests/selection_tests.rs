use magpie::error::PanelError;
use magpie::selection::{SelectionState, HISTORY_CAPACITY};

const DOCUMENT: &str = "abcdefghijklmnopqrstuvwxyz";

#[test]
fn test_capture_records_text_and_offsets() {
    let mut state = SelectionState::default();

    state.capture(DOCUMENT, 4, 9);

    let selection = state.current().expect("capture should set a current selection");
    assert_eq!(selection.text, "efghi");
    assert_eq!((selection.start, selection.end), (4, 9));
    assert!(selection.captured_at > 0, "Capture should be timestamped");
}

#[test]
fn test_zero_width_capture_is_noop() {
    let mut state = SelectionState::default();

    state.capture(DOCUMENT, 5, 5);

    assert!(state.current().is_none(), "Zero-width capture should change nothing");
}

#[test]
fn test_out_of_bounds_capture_is_clamped() {
    let mut state = SelectionState::default();

    state.capture(DOCUMENT, 20, 1000);

    let selection = state.current().expect("clamped capture should still succeed");
    assert_eq!(selection.text, "uvwxyz");
    assert_eq!(selection.end, DOCUMENT.len());
}

#[test]
fn test_capture_then_undo_restores_prior_exactly() {
    let mut state = SelectionState::default();
    state.capture(DOCUMENT, 0, 3);
    let first = state.current().cloned().unwrap();

    state.capture(DOCUMENT, 10, 15);
    state.undo().expect("undo should succeed with history present");

    assert_eq!(state.current(), Some(&first), "Undo should restore text and offsets exactly");
}

#[test]
fn test_undo_with_empty_history_fails_and_preserves_current() {
    let mut state = SelectionState::default();
    state.capture(DOCUMENT, 0, 3);
    let current = state.current().cloned();

    let result = state.undo();

    assert_eq!(result, Err(PanelError::EmptyHistory));
    assert_eq!(state.current(), current.as_ref(), "Failed undo should not touch the selection");
}

#[test]
fn test_undo_is_pure_rollback() {
    let mut state = SelectionState::default();
    state.capture(DOCUMENT, 0, 3);
    state.capture(DOCUMENT, 4, 9);

    state.undo().unwrap();

    // The selection replaced by undo was not pushed anywhere, so a second
    // undo has nothing left to restore.
    assert_eq!(state.undo(), Err(PanelError::EmptyHistory), "Undo must not be redoable");
}

#[test]
fn test_clear_drops_selection_but_keeps_history() {
    let mut state = SelectionState::default();
    state.capture(DOCUMENT, 0, 3);
    state.capture(DOCUMENT, 4, 9);

    state.clear();

    assert!(state.current().is_none(), "Clear should drop the current selection");
    assert_eq!(state.history().len(), 1, "Clear should not touch the undo history");
}

#[test]
fn test_history_is_bounded_and_evicts_oldest() {
    let mut state = SelectionState::default();

    // Thirteen captures with distinct text: twelve pushes, capacity ten
    for end in 1..=13 {
        state.capture(DOCUMENT, 0, end);
    }

    assert_eq!(state.history().len(), HISTORY_CAPACITY, "History must stay bounded");
    assert_eq!(
        state.history().front().unwrap().text,
        "abc",
        "Oldest entries should have been evicted first"
    );
    assert_eq!(state.history().back().unwrap().text, "abcdefghijkl");
}

#[test]
fn test_recapturing_identical_text_does_not_push() {
    let mut state = SelectionState::default();

    state.capture(DOCUMENT, 0, 3);
    state.capture(DOCUMENT, 0, 3);

    assert_eq!(state.history().len(), 0, "Identical recapture should not grow history");
}

#[test]
fn test_capture_by_locate_with_whitespace_drift() {
    let document = "Hello   world\nfoo";
    let mut state = SelectionState::default();

    state
        .capture_by_locate(document, "Hello world foo")
        .expect("tolerant locate should succeed");

    assert_eq!(state.current().unwrap().text, "Hello   world\nfoo");
}

#[test]
fn test_capture_by_locate_failure_leaves_state_unchanged() {
    let mut state = SelectionState::default();
    state.capture(DOCUMENT, 0, 3);
    let before = state.clone();

    let result = state.capture_by_locate(DOCUMENT, "totally absent words");

    assert_eq!(result, Err(PanelError::SnippetNotFound));
    assert_eq!(state, before, "Failed locate must be a no-op");
}

#[test]
fn test_relocate_follows_document_edits() {
    let original = "one two three\ntarget words here\nfour five";
    let mut state = SelectionState::default();
    let start = original.find("target").unwrap();
    state.capture(original, start, start + "target words here".len());

    // The document grows a preamble and the captured span's whitespace drifts
    let edited = "INSERTED PREAMBLE\none two three\ntarget  words here\nfour five";
    state.relocate(edited).expect("relocation should succeed");

    let selection = state.current().unwrap();
    assert_eq!(selection.text, "target  words here", "Text should re-read from the new content");
    assert_eq!(selection.start, edited.find("target").unwrap());
}

#[test]
fn test_relocate_failure_keeps_stale_selection() {
    let original = "the original content";
    let mut state = SelectionState::default();
    state.capture(original, 4, 12);
    let before = state.current().cloned();

    let result = state.relocate("nothing in common anymore");

    assert_eq!(result, Err(PanelError::SnippetNotFound));
    assert_eq!(state.current(), before.as_ref(), "Stale selection should be preserved");
}

#[test]
fn test_relocate_without_selection_is_noop() {
    let mut state = SelectionState::default();

    assert!(state.relocate("whatever document").is_ok());
    assert!(state.current().is_none());
}
