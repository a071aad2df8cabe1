use thiserror::Error;

/// Recoverable panel conditions.
///
/// None of these are fatal: every variant degrades to "no injection this
/// turn" at worst and is surfaced as a status-line warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PanelError {
    /// The requested snippet was not found in the current document, even
    /// after the whitespace-tolerant and anchored fallback strategies.
    #[error("snippet not found in the current document")]
    SnippetNotFound,

    /// Undo was requested with no prior selections to restore.
    #[error("no earlier selection to restore")]
    EmptyHistory,

    /// A capture or search was requested with no document loaded.
    #[error("no document is loaded")]
    MissingDocument,
}
