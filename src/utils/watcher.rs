use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use anyhow::{Context, Result};
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// File system events that we care about
#[derive(Debug, Clone)]
pub enum FileEvent {
    /// A file was created
    Created(PathBuf),
    /// A file was modified
    Modified(PathBuf),
    /// A file was deleted
    Deleted(PathBuf),
    /// An error occurred
    Error(String),
}

/// Watches the loaded reference document for external changes.
///
/// The document's parent directory is watched (non-recursively) rather than
/// the file itself, so replace-on-save editors are still seen.
pub struct DocumentWatcher {
    /// The underlying watcher
    _watcher: RecommendedWatcher,
    /// Receiver for file system events
    receiver: Receiver<FileEvent>,
    /// The document being watched
    target: PathBuf,
}

impl DocumentWatcher {
    /// Create a watcher for the given document file
    pub fn new<P: AsRef<Path>>(file: P) -> Result<Self> {
        let target = file.as_ref().to_path_buf();
        let watch_dir = target
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        // Create a channel to receive events
        let (tx, rx) = channel();

        // Create the event handler
        let event_handler = EventHandler::new(tx);

        // Create the watcher
        let mut watcher = notify::recommended_watcher(event_handler)
            .context("Failed to create file system watcher")?;

        watcher
            .watch(&watch_dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch path: {}", watch_dir.display()))?;

        Ok(Self {
            _watcher: watcher,
            receiver: rx,
            target,
        })
    }

    /// The document being watched
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Get the next event (non-blocking)
    pub fn try_next_event(&self) -> Option<FileEvent> {
        self.receiver.try_recv().ok()
    }

    /// Drain pending events, reporting whether any of them touched the
    /// watched document.
    pub fn document_changed(&self) -> bool {
        let mut changed = false;
        while let Some(event) = self.try_next_event() {
            match event {
                FileEvent::Created(path) | FileEvent::Modified(path) => {
                    if path == self.target {
                        changed = true;
                    }
                }
                FileEvent::Deleted(_) | FileEvent::Error(_) => {}
            }
        }
        changed
    }
}

/// Handler for file system events
struct EventHandler {
    sender: Sender<FileEvent>,
}

impl EventHandler {
    /// Create a new event handler
    fn new(sender: Sender<FileEvent>) -> Self {
        Self { sender }
    }

    /// Convert notify events to our FileEvent type
    fn process_event(&self, event: Event) {
        match event.kind {
            EventKind::Create(_) => {
                for path in event.paths {
                    let _ = self.sender.send(FileEvent::Created(path));
                }
            }
            EventKind::Modify(_) => {
                for path in event.paths {
                    let _ = self.sender.send(FileEvent::Modified(path));
                }
            }
            EventKind::Remove(_) => {
                for path in event.paths {
                    let _ = self.sender.send(FileEvent::Deleted(path));
                }
            }
            _ => {
                // Ignore other event types
            }
        }
    }
}

impl notify::EventHandler for EventHandler {
    fn handle_event(&mut self, event: notify::Result<Event>) {
        match event {
            Ok(event) => self.process_event(event),
            Err(e) => {
                let _ = self.sender.send(FileEvent::Error(e.to_string()));
            }
        }
    }
}
