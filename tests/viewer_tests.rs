use anyhow::Result;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::tempdir;

use magpie::viewer::Viewer;

fn setup_test_files() -> Result<(tempfile::TempDir, PathBuf, PathBuf)> {
    let temp_dir = tempdir()?;
    let root_path = temp_dir.path().to_path_buf();

    let small_file_path = root_path.join("small_file.txt");
    let mut small_file = File::create(&small_file_path)?;
    writeln!(small_file, "Line 1: This is a small text file.")?;
    writeln!(small_file, "Line 2: It has only a few lines.")?;
    writeln!(small_file, "Line 3: Perfect for basic tests.")?;

    let large_file_path = root_path.join("large_file.txt");
    let mut large_file = File::create(&large_file_path)?;
    for i in 1..=100 {
        writeln!(large_file, "Line {}: This is line {} of the large test file.", i, i)?;
    }

    Ok((temp_dir, small_file_path, large_file_path))
}

#[test]
fn test_viewer_open_file() -> Result<()> {
    let (_temp_dir, small_file_path, _) = setup_test_files()?;

    let mut viewer = Viewer::new();

    viewer.open_file(&small_file_path)?;

    assert_eq!(viewer.file_path(), Some(small_file_path.as_path()));

    // Verify content is loaded (without asserting exact content or line count)
    let content = viewer.content();
    assert!(!content.is_empty(), "Viewer should have loaded content");
    assert!(
        content.iter().any(|line| line.contains("Line 1")),
        "Content should include text from the file"
    );

    Ok(())
}

#[test]
fn test_viewer_scrolling_functionality() -> Result<()> {
    let (_temp_dir, _, large_file_path) = setup_test_files()?;

    let mut viewer = Viewer::new();
    viewer.open_file(&large_file_path)?;

    // Test basic scrolling works in the expected direction
    let initial_position = viewer.scroll_position();
    viewer.scroll_down();
    assert!(viewer.scroll_position() > initial_position, "Scrolling down should increase position");

    viewer.scroll_up();
    assert_eq!(viewer.scroll_position(), initial_position, "Scrolling up should decrease position");

    // Test page scrolling moves multiple lines
    let before_page_down = viewer.scroll_position();
    viewer.scroll_page_down(10);
    assert!(viewer.scroll_position() > before_page_down + 1, "Page down should move multiple lines");

    let before_page_up = viewer.scroll_position();
    viewer.scroll_page_up(10);
    assert!(viewer.scroll_position() < before_page_up, "Page up should move position back");

    // Test scrolling to extremes
    viewer.scroll_to_top();
    assert_eq!(viewer.scroll_position(), 0, "Scroll to top should set position to 0");

    viewer.scroll_to_bottom();
    assert!(viewer.scroll_position() > 0, "Scroll to bottom should move position to end");

    Ok(())
}

#[test]
fn test_viewer_boundary_behaviors() -> Result<()> {
    let (_temp_dir, small_file_path, _) = setup_test_files()?;

    let mut viewer = Viewer::new();
    viewer.open_file(&small_file_path)?;

    // Test scrolling beyond file boundaries
    viewer.scroll_to_top();
    for _ in 0..10 {
        viewer.scroll_up();
    }
    assert_eq!(viewer.scroll_position(), 0, "Should not scroll above file start");

    // Scroll beyond end of the file
    viewer.scroll_to_bottom();
    let max_position = viewer.scroll_position();
    for _ in 0..10 {
        viewer.scroll_down();
    }
    assert_eq!(viewer.scroll_position(), max_position, "Should not scroll beyond file end");

    Ok(())
}

#[test]
fn test_viewer_file_switching() -> Result<()> {
    let (_temp_dir, small_file_path, large_file_path) = setup_test_files()?;

    let mut viewer = Viewer::new();

    // Open first file
    viewer.open_file(&large_file_path)?;
    assert!(viewer.content().len() > 5, "Large file should have multiple lines");

    // Move to a non-zero position
    viewer.scroll_to_position(5);
    assert!(viewer.scroll_position() > 0, "Should have moved to non-zero position");

    // Switch to a different file
    viewer.open_file(&small_file_path)?;

    // Should reset scroll position
    assert_eq!(viewer.scroll_position(), 0, "Scroll position should reset when opening a new file");

    // Content should be updated
    assert!(viewer.content().len() < 10, "Small file should have fewer lines");

    Ok(())
}

#[test]
fn test_selection_span_maps_to_byte_offsets() -> Result<()> {
    let (_temp_dir, small_file_path, _) = setup_test_files()?;

    let mut viewer = Viewer::new();
    viewer.open_file(&small_file_path)?;

    // Anchor at line 1 and extend the span down to line 3
    viewer.toggle_selection_mode();
    viewer.cursor_down();
    viewer.cursor_down();

    assert_eq!(viewer.selection_range(), Some((0, 2)));

    let (start, end) = viewer.selection_byte_range().expect("span should map to offsets");
    let expected = "Line 1: This is a small text file.\nLine 2: It has only a few lines.\nLine 3: Perfect for basic tests.";
    assert_eq!(&viewer.raw()[start..end], expected, "Byte range should cover the selected lines");

    Ok(())
}

#[test]
fn test_selection_mode_toggles_and_clears() -> Result<()> {
    let (_temp_dir, small_file_path, _) = setup_test_files()?;

    let mut viewer = Viewer::new();
    viewer.open_file(&small_file_path)?;

    assert!(!viewer.in_selection_mode());
    assert_eq!(viewer.selection_range(), None);

    viewer.toggle_selection_mode();
    assert!(viewer.in_selection_mode());

    viewer.clear_selection_mode();
    assert!(!viewer.in_selection_mode());
    assert_eq!(viewer.selection_byte_range(), None);

    Ok(())
}

#[test]
fn test_jump_to_offset_moves_cursor_to_containing_line() -> Result<()> {
    let (_temp_dir, _, large_file_path) = setup_test_files()?;

    let mut viewer = Viewer::new();
    viewer.open_file(&large_file_path)?;

    let offset = viewer.raw().find("Line 50:").expect("marker should exist");
    viewer.jump_to_offset(offset);

    assert_eq!(viewer.cursor_position(), 49, "Offset of line 50 should land on index 49");
    assert_eq!(viewer.scroll_position(), 49, "View should follow the jump");

    // An offset in the middle of a line lands on the same line
    viewer.jump_to_offset(offset + 10);
    assert_eq!(viewer.cursor_position(), 49);

    Ok(())
}

#[test]
fn test_reload_preserves_clamped_position() -> Result<()> {
    let (_temp_dir, _, large_file_path) = setup_test_files()?;

    let mut viewer = Viewer::new();
    viewer.open_file(&large_file_path)?;
    viewer.scroll_to_bottom();
    let bottom = viewer.cursor_position();
    assert!(bottom > 50);

    // The file shrinks behind the viewer's back
    let mut file = File::create(&large_file_path)?;
    for i in 1..=5 {
        writeln!(file, "Line {}: rewritten.", i)?;
    }
    drop(file);

    viewer.reload()?;

    assert!(
        viewer.cursor_position() < viewer.content().len(),
        "Cursor must be clamped into the shrunken file"
    );

    Ok(())
}
