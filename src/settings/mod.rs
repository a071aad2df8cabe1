use serde::{Deserialize, Serialize};

/// Fallback used by the separate-protagonist block when no name is set.
pub const DEFAULT_PROTAGONIST: &str = "the protagonist";

/// Narrative annotation applied to the assembled prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeMode {
    /// The protagonist is a character of their own, present alongside the user
    SeparateProtagonist,
    /// The user replaces the protagonist and drives the story with free will
    Isekai,
}

/// Process-wide settings, shared across every conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalSettings {
    /// Text placed before the captured excerpt
    pub prefix: String,
    /// Text placed after the captured excerpt
    pub suffix: String,
    /// Free-form modification text, injected only when non-empty
    pub modification: String,
    /// How many turns before the most recent turn the block is inserted
    pub depth: u32,
}

impl Default for GlobalSettings {
    fn default() -> Self {
        Self {
            prefix: "[Reference excerpt from the source story:".to_string(),
            suffix: "Treat the excerpt above as canon for the current scene.".to_string(),
            modification: String::new(),
            depth: 1,
        }
    }
}

/// Per-conversation settings.
///
/// The two mode fields stay private so every write goes through the setters,
/// which keep the pair mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvoSettings {
    /// Whether injection is enabled for this conversation
    pub enabled: bool,
    separate_protagonist: bool,
    isekai: bool,
    /// Protagonist name used by the separate-protagonist block
    pub protagonist: String,
}

impl Default for ConvoSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            separate_protagonist: false,
            isekai: false,
            protagonist: String::new(),
        }
    }
}

impl ConvoSettings {
    pub fn separate_protagonist(&self) -> bool {
        self.separate_protagonist
    }

    pub fn isekai(&self) -> bool {
        self.isekai
    }

    /// Enable or disable separate-protagonist mode. Enabling it silently
    /// clears isekai mode as part of the same write.
    pub fn set_separate_protagonist(&mut self, on: bool) {
        self.separate_protagonist = on;
        if on {
            self.isekai = false;
        }
    }

    /// Enable or disable isekai mode. Enabling it silently clears
    /// separate-protagonist mode as part of the same write.
    pub fn set_isekai(&mut self, on: bool) {
        self.isekai = on;
        if on {
            self.separate_protagonist = false;
        }
    }

    /// The active narrative mode derived from the flag pair.
    pub fn mode(&self) -> Option<NarrativeMode> {
        if self.separate_protagonist {
            Some(NarrativeMode::SeparateProtagonist)
        } else if self.isekai {
            Some(NarrativeMode::Isekai)
        } else {
            None
        }
    }
}

/// The merged view of global and per-conversation settings that assembly
/// consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub enabled: bool,
    pub prefix: String,
    pub suffix: String,
    pub modification: String,
    pub depth: u32,
    pub mode: Option<NarrativeMode>,
    pub protagonist: String,
}

/// Merge global settings with one conversation's settings.
pub fn resolve(global: &GlobalSettings, convo: &ConvoSettings) -> EffectiveConfig {
    EffectiveConfig {
        enabled: convo.enabled,
        prefix: global.prefix.clone(),
        suffix: global.suffix.clone(),
        modification: global.modification.clone(),
        depth: global.depth,
        mode: convo.mode(),
        protagonist: if convo.protagonist.is_empty() {
            DEFAULT_PROTAGONIST.to_string()
        } else {
            convo.protagonist.clone()
        },
    }
}
