/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// File browser mode
    Explorer,
    /// Document viewer mode
    Viewer,
}

impl Default for AppMode {
    fn default() -> Self {
        Self::Explorer
    }
}

/// What the status-line input is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// A pasted snippet to locate in the document
    Search,
    /// The protagonist name for the active conversation
    Protagonist,
}

/// Application state
#[derive(Default)]
pub struct AppState {
    /// Flag to indicate if the application should quit
    pub should_quit: bool,
    /// Current application mode
    pub mode: AppMode,
    /// Active input-line collection, if any
    pub input: Option<InputKind>,
    /// The text being typed into the input line
    pub input_buffer: String,
    /// Transient warning or confirmation for the status line
    pub notice: Option<String>,
}

impl AppState {
    /// Show a status-line notice, replacing any previous one
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(message.into());
    }
}
