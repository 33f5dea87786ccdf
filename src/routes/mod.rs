/**
 * Routes Module
 * API route handlers
 */
pub mod content;
pub mod health;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::ContentRepository;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn ContentRepository>,
    /// Secret that `POST /api/content` must present.
    pub admin_password: Arc<str>,
}

impl AppState {
    pub fn new(repo: Arc<dyn ContentRepository>, admin_password: &str) -> Self {
        Self {
            repo,
            admin_password: Arc::from(admin_password),
        }
    }
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
