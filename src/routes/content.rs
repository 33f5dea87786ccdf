/**
 * Content Routes
 * Read and replace the site content aggregate and the project list
 */
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{AppState, ErrorResponse};
use crate::content::{Project, SiteContent};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for POST /api/content
#[derive(Debug, Deserialize)]
pub struct SaveContentRequest {
    pub content: SiteContent,
    /// Left untouched when omitted.
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub password: String,
}

/// Response for POST /api/content
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveContentResponse {
    pub success: bool,
    pub message: String,
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse::new(message))).into_response()
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/content
pub async fn get_content(State(state): State<AppState>) -> Response {
    match state.repo.load_content().await {
        Ok(Some(content)) => Json(content).into_response(),
        Ok(None) => error(StatusCode::NOT_FOUND, "No content stored"),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching content");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch content")
        }
    }
}

/// GET /api/projects
pub async fn get_projects(State(state): State<AppState>) -> Response {
    match state.repo.load_projects().await {
        Ok(projects) => Json(projects).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Error fetching projects");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch projects")
        }
    }
}

/// POST /api/content
/// Replaces content (and projects, when sent) if the password matches.
pub async fn save_content(
    State(state): State<AppState>,
    Json(req): Json<SaveContentRequest>,
) -> Response {
    if req.password != *state.admin_password {
        tracing::warn!("Rejected content save with invalid password");
        return error(StatusCode::UNAUTHORIZED, "Invalid password");
    }

    match state.repo.save(&req.content, req.projects.as_deref()).await {
        Ok(()) => {
            tracing::info!(
                site_name = %req.content.site_name,
                projects = req.projects.as_ref().map(Vec::len),
                "Content saved"
            );
            Json(SaveContentResponse {
                success: true,
                message: "Content saved successfully".to_string(),
            })
            .into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Error saving content");
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save content")
        }
    }
}
