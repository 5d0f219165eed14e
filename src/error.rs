use thiserror::Error;

/// Failure reported by the remote board store.
///
/// Every write against the store can fail with one of these; the board
/// always rolls back the optimistic change before surfacing it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    #[error("rejected by board store: {0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("sign-in expired")]
    SessionExpired,

    #[error("'{0}' not found in board store")]
    NotFound(String),

    #[error("invalid {field}: {message}")]
    Validation { field: String, message: String },
}

impl PersistenceError {
    /// Text suitable for a user-facing notification
    pub fn user_message(&self) -> String {
        match self {
            PersistenceError::SessionExpired => "Sign-in expired".to_string(),
            PersistenceError::Network(_) => "Network error, changes were not saved".to_string(),
            other => capitalize(&other.to_string()),
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A modal prompt was dismissed; the operation is abandoned silently.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("prompt cancelled")]
pub struct PromptCancelled;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("task '{0}' has a change still being saved")]
    TaskBusy(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BoardError>;
