/**
 * Persistence Provider client
 * Read/write contract of the remote content API and its HTTP implementation
 */
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Serialize;
use std::{sync::Arc, time::Duration};

use crate::config::ClientConfig;
use crate::content::{Project, SiteContent};
use crate::error::ProviderError;

/// Remote source of truth for site content and projects.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// `GET content`. `ProviderError::NotFound` when nothing was ever stored.
    async fn fetch_content(&self) -> Result<SiteContent, ProviderError>;

    /// `GET projects`, newest first.
    async fn fetch_projects(&self) -> Result<Vec<Project>, ProviderError>;

    /// `POST content`: content and projects written together, authorized by `password`.
    async fn save(
        &self,
        content: &SiteContent,
        projects: &[Project],
        password: &str,
    ) -> Result<(), ProviderError>;
}

/// Request body for `POST /api/content`.
#[derive(Debug, Serialize)]
struct SaveRequest<'a> {
    content: &'a SiteContent,
    projects: &'a [Project],
    password: &'a str,
}

fn status_error(status: StatusCode) -> ProviderError {
    match status {
        StatusCode::NOT_FOUND => ProviderError::NotFound,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ProviderError::Unauthorized,
        other => ProviderError::Status(other.as_u16()),
    }
}

/// Talks to the REST backend over HTTP with a bounded request timeout.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpProvider {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let response = self
            .client
            .get(self.url(path))
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| {
                tracing::debug!(path = %path, error = %e, "content api request failed");
                ProviderError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(path = %path, status = %status, "content api returned error");
            return Err(status_error(status));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ProviderError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ContentProvider for HttpProvider {
    async fn fetch_content(&self) -> Result<SiteContent, ProviderError> {
        self.get_json("api/content").await
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, ProviderError> {
        self.get_json("api/projects").await
    }

    async fn save(
        &self,
        content: &SiteContent,
        projects: &[Project],
        password: &str,
    ) -> Result<(), ProviderError> {
        let response = self
            .client
            .post(self.url("api/content"))
            .json(&SaveRequest {
                content,
                projects,
                password,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            tracing::debug!(status = %status, "content api rejected save");
            Err(status_error(status))
        }
    }
}

/// Provider used when no API URL is configured: every call fails, so loads
/// fall back to the cache and saves stay local.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineProvider;

#[async_trait]
impl ContentProvider for OfflineProvider {
    async fn fetch_content(&self) -> Result<SiteContent, ProviderError> {
        Err(ProviderError::Unconfigured)
    }

    async fn fetch_projects(&self) -> Result<Vec<Project>, ProviderError> {
        Err(ProviderError::Unconfigured)
    }

    async fn save(&self, _: &SiteContent, _: &[Project], _: &str) -> Result<(), ProviderError> {
        Err(ProviderError::Unconfigured)
    }
}

/// Pick the provider for a client configuration.
pub fn from_config(config: &ClientConfig) -> Result<Arc<dyn ContentProvider>, ProviderError> {
    match &config.api_url {
        Some(url) => {
            tracing::info!(api_url = %url, "using remote content api");
            let timeout = Duration::from_secs(config.request_timeout_secs.max(1));
            Ok(Arc::new(HttpProvider::new(url, timeout)?))
        }
        None => {
            tracing::info!("API_URL not set. Content is kept in the local cache only.");
            Ok(Arc::new(OfflineProvider))
        }
    }
}
