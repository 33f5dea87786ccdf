//! Content Aggregate Store
//!
//! Owns the committed [`SiteContent`] and project list. Loads are remote-first
//! with a cache/defaults fallback per resource; persists are optimistic-local:
//! the local state and cache always take the new value, the remote half is
//! best effort and its failure is reported, never swallowed.
//!
//! State lives in `tokio::sync::watch` channels so the renderer and admin
//! sessions can hold receivers and see every commit.

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};
use std::sync::{
    atomic::{AtomicBool, AtomicI64, Ordering},
    Arc,
};
use tokio::sync::watch;

use super::cache::{CacheSlot, LocalCache};
use super::provider::ContentProvider;
use crate::content::{defaults, NewProject, Project, ProjectId, SiteContent};
use crate::error::ProviderError;

pub const RESET_PROMPT: &str =
    "Restore every section and project to the defaults? This cannot be undone.";

/// Where a resource's value came from during [`ContentStore::load`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    Remote,
    Cache,
    Defaults,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub content: LoadSource,
    pub projects: LoadSource,
}

impl LoadReport {
    /// True when at least one resource did not come from the remote provider.
    pub fn is_offline(&self) -> bool {
        self.content != LoadSource::Remote || self.projects != LoadSource::Remote
    }
}

/// Result of [`ContentStore::persist`]. The local commit happened in both cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Remote provider acknowledged the write.
    Synced,
    /// Saved locally; the remote write failed for the given reason.
    LocalOnly(ProviderError),
}

impl PersistOutcome {
    pub fn is_synced(&self) -> bool {
        matches!(self, PersistOutcome::Synced)
    }

    /// Operator-facing warning, present only when the remote half failed.
    pub fn warning(&self) -> Option<String> {
        match self {
            PersistOutcome::Synced => None,
            PersistOutcome::LocalOnly(reason) => Some(format!(
                "Saved locally, not confirmed by the server: {}",
                reason
            )),
        }
    }
}

/// Hands out project ids that are unique and sortable by creation time:
/// `max(now_ms, last + 1)`, seeded with the largest id seen so far.
#[derive(Debug, Default)]
pub struct ProjectIdGenerator {
    last: AtomicI64,
}

impl ProjectIdGenerator {
    pub fn next(&self) -> ProjectId {
        let now = Utc::now().timestamp_millis();
        let prev = self
            .last
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |last| {
                Some(now.max(last.saturating_add(1)))
            })
            .unwrap_or_else(|last| last);
        now.max(prev.saturating_add(1))
    }

    pub fn observe(&self, ids: impl IntoIterator<Item = ProjectId>) {
        if let Some(max) = ids.into_iter().max() {
            self.last.fetch_max(max, Ordering::AcqRel);
        }
    }
}

pub struct ContentStore {
    provider: Arc<dyn ContentProvider>,
    cache: LocalCache,
    content: watch::Sender<SiteContent>,
    projects: watch::Sender<Vec<Project>>,
    loaded: AtomicBool,
    ids: ProjectIdGenerator,
}

impl ContentStore {
    /// A store holding the compiled-in defaults until [`load`](Self::load) runs.
    pub fn new(provider: Arc<dyn ContentProvider>, cache: LocalCache) -> Self {
        let projects = defaults::projects();
        let ids = ProjectIdGenerator::default();
        ids.observe(projects.iter().map(|p| p.id));

        Self {
            provider,
            cache,
            content: watch::channel(defaults::site_content()).0,
            projects: watch::channel(projects).0,
            loaded: AtomicBool::new(false),
            ids,
        }
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    pub fn content(&self) -> SiteContent {
        self.content.borrow().clone()
    }

    pub fn projects(&self) -> Vec<Project> {
        self.projects.borrow().clone()
    }

    pub fn subscribe_content(&self) -> watch::Receiver<SiteContent> {
        self.content.subscribe()
    }

    pub fn subscribe_projects(&self) -> watch::Receiver<Vec<Project>> {
        self.projects.subscribe()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    // ------------------------------------------------------------------------
    // Load / persist
    // ------------------------------------------------------------------------

    /// Fetch content and projects independently. Each one falls back to the
    /// cache, then to the defaults. Never fails.
    pub async fn load(&self) -> LoadReport {
        let (content, projects) = tokio::join!(
            self.provider.fetch_content(),
            self.provider.fetch_projects()
        );

        let report = LoadReport {
            content: self.settle(CacheSlot::Content, content, &self.content, defaults::site_content),
            projects: self.settle(CacheSlot::Projects, projects, &self.projects, defaults::projects),
        };

        self.ids.observe(self.projects.borrow().iter().map(|p| p.id));
        self.loaded.store(true, Ordering::Release);

        if report.is_offline() {
            tracing::warn!(
                content = ?report.content,
                projects = ?report.projects,
                "content loaded without the remote provider"
            );
        } else {
            tracing::info!("content loaded from remote provider");
        }
        report
    }

    fn settle<T>(
        &self,
        slot: CacheSlot,
        fetched: Result<T, ProviderError>,
        target: &watch::Sender<T>,
        fallback: fn() -> T,
    ) -> LoadSource
    where
        T: Serialize + DeserializeOwned,
    {
        match fetched {
            Ok(value) => {
                if let Err(e) = self.cache.write(slot, &value) {
                    tracing::warn!(slot = ?slot, error = %e, "failed to seed cache from remote");
                }
                target.send_replace(value);
                LoadSource::Remote
            }
            Err(e) => {
                tracing::warn!(slot = ?slot, error = %e, "remote load failed, using local fallback");
                match self.cache.read::<T>(slot) {
                    Some(cached) => {
                        target.send_replace(cached);
                        LoadSource::Cache
                    }
                    None => {
                        target.send_replace(fallback());
                        LoadSource::Defaults
                    }
                }
            }
        }
    }

    /// Push content and projects to the remote provider, then commit them
    /// locally whatever the remote answered.
    pub async fn persist(
        &self,
        content: SiteContent,
        projects: Vec<Project>,
        password: &str,
    ) -> PersistOutcome {
        let remote = self.provider.save(&content, &projects, password).await;

        self.ids.observe(projects.iter().map(|p| p.id));
        self.content.send_replace(content);
        self.projects.send_replace(projects);
        self.write_slot(CacheSlot::Content);
        self.write_slot(CacheSlot::Projects);

        Self::outcome(remote)
    }

    /// Push `content` with the current project list, then commit only the
    /// content locally. Projects added or removed while the remote call is
    /// in flight stay as they are.
    pub async fn persist_content(&self, content: SiteContent, password: &str) -> PersistOutcome {
        let projects = self.projects();
        let remote = self.provider.save(&content, &projects, password).await;

        self.content.send_replace(content);
        self.write_slot(CacheSlot::Content);

        Self::outcome(remote)
    }

    fn outcome(remote: Result<(), ProviderError>) -> PersistOutcome {
        match remote {
            Ok(()) => {
                tracing::info!("content saved and synced with remote provider");
                PersistOutcome::Synced
            }
            Err(e) => {
                tracing::warn!(error = %e, "remote save failed, content kept locally");
                PersistOutcome::LocalOnly(e)
            }
        }
    }

    // ------------------------------------------------------------------------
    // Mutations (write-through once loaded)
    // ------------------------------------------------------------------------

    pub fn replace_content(&self, content: SiteContent) {
        self.content.send_replace(content);
        self.mirror(CacheSlot::Content);
    }

    pub fn replace_projects(&self, projects: Vec<Project>) {
        self.ids.observe(projects.iter().map(|p| p.id));
        self.projects.send_replace(projects);
        self.mirror(CacheSlot::Projects);
    }

    /// Assign a fresh id and put the project first in the list.
    pub fn add_project(&self, data: NewProject) -> Project {
        let project = data.with_id(self.fresh_id());
        self.projects
            .send_modify(|list| list.insert(0, project.clone()));
        self.mirror(CacheSlot::Projects);
        tracing::debug!(id = project.id, "project added");
        project
    }

    /// Next generated id, or one below the smallest id in use when the
    /// generator has saturated at `i64::MAX`.
    fn fresh_id(&self) -> ProjectId {
        let id = self.ids.next();
        let list = self.projects.borrow();
        if !list.iter().any(|p| p.id == id) {
            return id;
        }
        list.iter()
            .map(|p| p.id)
            .min()
            .unwrap_or(id)
            .saturating_sub(1)
    }

    /// Replace the project with the same id. Returns false, changing nothing,
    /// when there is no such project.
    pub fn update_project(&self, project: Project) -> bool {
        let id = project.id;
        let updated = self.projects.send_if_modified(|list| {
            match list.iter_mut().find(|p| p.id == id) {
                Some(slot) => {
                    *slot = project;
                    true
                }
                None => false,
            }
        });
        if updated {
            self.mirror(CacheSlot::Projects);
        } else {
            tracing::debug!(id, "update ignored, no such project");
        }
        updated
    }

    /// Remove the project with `id`. Returns false when it was not there.
    pub fn delete_project(&self, id: ProjectId) -> bool {
        let removed = self.projects.send_if_modified(|list| {
            let before = list.len();
            list.retain(|p| p.id != id);
            list.len() != before
        });
        if removed {
            self.mirror(CacheSlot::Projects);
            tracing::debug!(id, "project deleted");
        }
        removed
    }

    /// Replace all content and projects with the defaults, after `confirm`
    /// accepts [`RESET_PROMPT`]. Returns whether the reset happened.
    pub fn reset_to_defaults(&self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(RESET_PROMPT) {
            tracing::debug!("reset to defaults cancelled");
            return false;
        }
        self.content.send_replace(defaults::site_content());
        self.projects.send_replace(defaults::projects());
        self.mirror(CacheSlot::Content);
        self.mirror(CacheSlot::Projects);
        tracing::warn!("site content reset to defaults");
        true
    }

    // ------------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------------

    fn mirror(&self, slot: CacheSlot) {
        if self.is_loaded() {
            self.write_slot(slot);
        }
    }

    fn write_slot(&self, slot: CacheSlot) {
        let result = match slot {
            CacheSlot::Content => {
                let snapshot = self.content.borrow().clone();
                self.cache.write(slot, &snapshot)
            }
            CacheSlot::Projects => {
                let snapshot = self.projects.borrow().clone();
                self.cache.write(slot, &snapshot)
            }
        };
        if let Err(e) = result {
            tracing::warn!(slot = ?slot, error = %e, "failed to write cache slot");
        }
    }
}
