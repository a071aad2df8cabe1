use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

use crate::selection::SelectionState;
use crate::settings::{ConvoSettings, GlobalSettings};

/// One conversation's persisted region: its settings plus its selection
/// context (current selection and undo stack).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoRecord {
    pub settings: ConvoSettings,
    pub selection: SelectionState,
}

/// Everything magpie persists: the global region plus one region per
/// conversation id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PanelState {
    pub global: GlobalSettings,
    pub conversations: HashMap<String, ConvoRecord>,
}

/// Flat key-value persistence for panel state, JSON on disk.
///
/// Writes are debounced: mutations mark the store dirty and the panel's tick
/// drives [`StateStore::flush_if_due`]. A failed write is logged and
/// otherwise ignored; loss of durability never affects the in-memory
/// contract for the running session.
pub struct StateStore {
    /// Path to the JSON state file
    path: PathBuf,

    /// In-memory state, the source of truth while running
    state: PanelState,

    /// Whether in-memory state has diverged from disk
    dirty: bool,

    /// When the last flush ran, for debouncing
    last_flush: Instant,
}

impl StateStore {
    /// Open the store, loading existing state when the file is present.
    ///
    /// A missing or unreadable file yields fresh defaults; persistence
    /// problems are never fatal.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "state file is unreadable, starting fresh"
                    );
                    PanelState::default()
                }
            },
            Err(_) => PanelState::default(),
        };

        Self {
            path,
            state,
            dirty: false,
            last_flush: Instant::now(),
        }
    }

    /// The global settings region
    pub fn global(&self) -> &GlobalSettings {
        &self.state.global
    }

    /// Replace the global settings region
    pub fn set_global(&mut self, global: GlobalSettings) {
        if self.state.global != global {
            self.state.global = global;
            self.dirty = true;
        }
    }

    /// The stored region for a conversation, when one has been written
    pub fn conversation(&self, id: &str) -> Option<&ConvoRecord> {
        self.state.conversations.get(id)
    }

    /// Every conversation id with a stored region, unordered
    pub fn conversation_ids(&self) -> Vec<String> {
        self.state.conversations.keys().cloned().collect()
    }

    /// Write a conversation's region.
    ///
    /// Regions materialize lazily on the first write that differs from the
    /// defaults, and are never removed.
    pub fn record_conversation(&mut self, id: &str, record: ConvoRecord) {
        match self.state.conversations.get(id) {
            Some(existing) if *existing == record => return,
            None if record == ConvoRecord::default() => return,
            _ => {}
        }
        self.state.conversations.insert(id.to_string(), record);
        self.dirty = true;
    }

    /// Whether in-memory state has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Flush when dirty and the debounce interval has elapsed.
    pub fn flush_if_due(&mut self, interval: Duration) {
        if self.dirty && self.last_flush.elapsed() >= interval {
            self.flush();
        }
    }

    /// Write state to disk now. Failures are logged and the store stays
    /// dirty so a later flush can retry.
    pub fn flush(&mut self) {
        if !self.dirty {
            return;
        }
        self.last_flush = Instant::now();
        match self.write_to_disk() {
            Ok(()) => self.dirty = false,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to persist panel state");
            }
        }
    }

    /// Path of the backing state file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_to_disk(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context("Failed to create parent directories for state file")?;
            }
        }

        let json = serde_json::to_string_pretty(&self.state)
            .context("Failed to serialize panel state")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write panel state to: {}", self.path.display()))
    }
}
