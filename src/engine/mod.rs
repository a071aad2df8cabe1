use std::time::Duration;

use tracing::debug;

use crate::error::PanelError;
use crate::inject::{self, PromptHost};
use crate::prompt;
use crate::selection::Selection;
use crate::settings::{self, ConvoSettings, GlobalSettings};
use crate::storage::{ConvoRecord, StateStore};

/// The selection-tracking and prompt-assembly engine.
///
/// Owns the reference document, the state store, the active conversation's
/// context, and the host handle. Every mutating operation ends in
/// [`Engine::sync`], which persists the context, reassembles the block, and
/// installs or retracts it in the host. That call is the single
/// synchronization point between internal state and the observable effect.
pub struct Engine {
    /// The loaded reference text, opaque to the engine
    document: Option<String>,

    /// Persistence for the global and per-conversation regions
    store: StateStore,

    /// The host's prompt-construction surface
    host: Box<dyn PromptHost>,

    /// Identity of the active conversation
    conversation_id: String,

    /// The active conversation's live context
    context: ConvoRecord,

    /// The most recently assembled block, cached for the preview
    assembled: String,
}

impl Engine {
    /// Create an engine bound to a host, restoring the conversation's saved
    /// context from the store.
    pub fn new(store: StateStore, host: Box<dyn PromptHost>, conversation_id: &str) -> Self {
        let context = store
            .conversation(conversation_id)
            .cloned()
            .unwrap_or_default();

        let mut engine = Self {
            document: None,
            store,
            host,
            conversation_id: conversation_id.to_string(),
            context,
            assembled: String::new(),
        };
        engine.sync();
        engine
    }

    /// The loaded document, if any
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// The block currently installed in the host (empty when retracted)
    pub fn assembled(&self) -> &str {
        &self.assembled
    }

    /// The active conversation's current selection
    pub fn selection(&self) -> Option<&Selection> {
        self.context.selection.current()
    }

    /// How many superseded selections the undo history holds
    pub fn history_len(&self) -> usize {
        self.context.selection.history().len()
    }

    /// The active conversation's settings
    pub fn convo_settings(&self) -> &ConvoSettings {
        &self.context.settings
    }

    /// The process-wide settings
    pub fn global(&self) -> &GlobalSettings {
        self.store.global()
    }

    /// Identity of the active conversation
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// Every conversation id with persisted state
    pub fn known_conversations(&self) -> Vec<String> {
        self.store.conversation_ids()
    }

    /// Load a reference document. The current selection is left as captured;
    /// use [`Engine::document_reloaded`] when the same document's content
    /// changed externally.
    pub fn set_document(&mut self, text: String) {
        self.document = Some(text);
        self.sync();
    }

    /// Unload the document.
    pub fn clear_document(&mut self) {
        self.document = None;
        self.sync();
    }

    /// Replace the document after an external edit, re-anchoring the current
    /// selection in the new content.
    ///
    /// On a failed re-anchor the stale selection is kept (so the user can
    /// undo or recapture) and `SnippetNotFound` is reported.
    pub fn document_reloaded(&mut self, text: String) -> Result<(), PanelError> {
        let relocated = self.context.selection.relocate(&text);
        self.document = Some(text);
        self.sync();
        relocated
    }

    /// Capture the span `[start, end)` of the loaded document as the new
    /// current selection.
    pub fn capture_range(&mut self, start: usize, end: usize) -> Result<(), PanelError> {
        let document = self.document.as_deref().ok_or(PanelError::MissingDocument)?;
        self.context.selection.capture(document, start, end);
        self.sync();
        Ok(())
    }

    /// Capture by locating pasted text in the loaded document.
    pub fn capture_search(&mut self, needle: &str) -> Result<(), PanelError> {
        let document = self.document.as_deref().ok_or(PanelError::MissingDocument)?;
        self.context.selection.capture_by_locate(document, needle)?;
        self.sync();
        Ok(())
    }

    /// Restore the most recently superseded selection.
    pub fn undo_selection(&mut self) -> Result<(), PanelError> {
        self.context.selection.undo()?;
        self.sync();
        Ok(())
    }

    /// Drop the current selection, retracting the injected block.
    pub fn clear_selection(&mut self) {
        self.context.selection.clear();
        self.sync();
    }

    /// Enable or disable injection for the active conversation.
    pub fn set_enabled(&mut self, on: bool) {
        self.context.settings.enabled = on;
        self.sync();
    }

    /// Toggle separate-protagonist mode (exclusive with isekai).
    pub fn set_separate_protagonist(&mut self, on: bool) {
        self.context.settings.set_separate_protagonist(on);
        self.sync();
    }

    /// Toggle isekai mode (exclusive with separate-protagonist).
    pub fn set_isekai(&mut self, on: bool) {
        self.context.settings.set_isekai(on);
        self.sync();
    }

    /// Set the protagonist name used by the separate-protagonist block.
    pub fn set_protagonist_name(&mut self, name: String) {
        self.context.settings.protagonist = name;
        self.sync();
    }

    /// Set the global pre-text.
    pub fn set_prefix(&mut self, prefix: String) {
        self.update_global(|global| global.prefix = prefix);
    }

    /// Set the global post-text.
    pub fn set_suffix(&mut self, suffix: String) {
        self.update_global(|global| global.suffix = suffix);
    }

    /// Set the global free-form modification text.
    pub fn set_modification(&mut self, modification: String) {
        self.update_global(|global| global.modification = modification);
    }

    /// Set the injection recency depth.
    pub fn set_depth(&mut self, depth: u32) {
        self.update_global(|global| global.depth = depth);
    }

    /// Swap the entire selection, history, and mode context for another
    /// conversation. No state leaks across the switch.
    pub fn switch_conversation(&mut self, id: &str) {
        if id == self.conversation_id {
            return;
        }
        debug!(from = %self.conversation_id, to = %id, "switching conversation");
        self.store
            .record_conversation(&self.conversation_id, self.context.clone());
        self.context = self.store.conversation(id).cloned().unwrap_or_default();
        self.conversation_id = id.to_string();
        self.sync();
    }

    /// Host signal: a message was sent. Re-publishes the block.
    pub fn message_sent(&mut self) {
        self.sync();
    }

    /// Host signal: a message was received. Re-publishes the block.
    pub fn message_received(&mut self) {
        self.sync();
    }

    /// Debounced persistence, driven by the panel's tick event. Never
    /// delays the injection refresh, which already ran synchronously.
    pub fn persist_if_due(&mut self, interval: Duration) {
        self.store.flush_if_due(interval);
    }

    /// Write any unsaved state now. Called on shutdown.
    pub fn flush(&mut self) {
        self.store.flush();
    }

    fn update_global(&mut self, mutate: impl FnOnce(&mut GlobalSettings)) {
        let mut global = self.store.global().clone();
        mutate(&mut global);
        self.store.set_global(global);
        self.sync();
    }

    /// Persist the active context, reassemble, and republish. Runs after
    /// every mutation; mutation therefore always happens-before the refresh
    /// it triggers.
    fn sync(&mut self) {
        self.store
            .record_conversation(&self.conversation_id, self.context.clone());
        let config = settings::resolve(self.store.global(), &self.context.settings);
        self.assembled = prompt::assemble(&config, self.context.selection.current());
        inject::refresh(self.host.as_mut(), &self.assembled, config.depth);
    }
}
