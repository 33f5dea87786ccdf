//! Error types shared across the store, the admin session and the backend.

use thiserror::Error;

/// Failure talking to the remote persistence provider.
///
/// Carries strings instead of the transport error so outcomes can be cloned
/// into operator-facing warnings and compared in tests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No API URL configured; the store runs purely on the local cache.
    #[error("remote provider is not configured")]
    Unconfigured,

    #[error("request failed: {0}")]
    Network(String),

    #[error("resource not found")]
    NotFound,

    /// The server rejected the administrative password.
    #[error("password rejected by the server")]
    Unauthorized,

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Decode(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}

/// Failure writing a local cache slot.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cache serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A typed draft edit that could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("{section} has no item at index {index}")]
    NoSuchItem { section: &'static str, index: usize },
}

/// A candidate record failed required-field validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),
}

/// The admin entry gate refused the password.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid admin password")]
    InvalidPassword,
}

/// Why a save request was refused before anything was sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SaveError {
    #[error("password and confirmation do not match")]
    PasswordMismatch,

    #[error("there are no unsaved changes")]
    NothingToSave,

    #[error("a save is already in progress")]
    AlreadySaving,
}

/// Backend storage failure.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A stored row could not be mapped back into the content model.
    #[error("corrupt stored data: {0}")]
    Corrupt(String),
}
