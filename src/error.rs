use thiserror::Error;

/// Failures at the host boundary. The game core itself has none.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("invalid settings: {0}")]
    InvalidSettings(String),
    #[error("invalid intent: {0}")]
    InvalidIntent(String),
    #[error("no session is running")]
    NoSession,
    #[error("session lock is poisoned")]
    SessionLocked,
    #[error("failed to serialize snapshot: {0}")]
    Snapshot(String),
}
