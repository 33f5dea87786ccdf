//! Admin Draft Session
//!
//! Holds a private working copy of the site content, tracks whether it differs
//! from the committed value, checks the password confirmation and drives the
//! `idle -> saving -> saved -> idle` save cycle against the [`ContentStore`].

use std::{
    fmt,
    sync::{
        atomic::{AtomicU8, Ordering},
        Arc,
    },
    time::Duration,
};
use tokio::{sync::watch, time::Instant};

use super::edit::ContentEdit;
use super::editor::{ProjectCommit, ProjectEditor};
use crate::content::{self, Project, ProjectId, SiteContent};
use crate::error::{AuthError, EditError, SaveError, ValidationError};
use crate::sync::{ContentStore, PersistOutcome};

pub const DEFAULT_SAVED_ACK: Duration = Duration::from_millis(1000);

pub const DELETE_PROJECT_PROMPT: &str = "Delete this project permanently?";

// Flight states shared between a session and its pending save.
const FLIGHT_IDLE: u8 = 0;
const FLIGHT_IN_FLIGHT: u8 = 1;
const FLIGHT_LANDED: u8 = 2;

/// What the operator sees for the save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Idle,
    Saving,
    /// Transient acknowledgment; carries whether the remote confirmed.
    Saved(PersistOutcome),
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Saved {
        outcome: PersistOutcome,
        until: Instant,
    },
}

/// Clears the in-flight mark if the pending save goes away without landing.
struct FlightGuard(Arc<AtomicU8>);

impl FlightGuard {
    fn land(&self) {
        self.0.store(FLIGHT_LANDED, Ordering::Release);
    }
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        let _ = self.0.compare_exchange(
            FLIGHT_IN_FLIGHT,
            FLIGHT_IDLE,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

/// A save that passed validation and captured its snapshot. Owns everything
/// it needs, so the session stays editable while it runs, and the commit
/// still lands if the session is dropped first.
pub struct PendingSave {
    store: Arc<ContentStore>,
    content: SiteContent,
    password: String,
    flight: FlightGuard,
}

impl fmt::Debug for PendingSave {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingSave")
            .field("site_name", &self.content.site_name)
            .finish_non_exhaustive()
    }
}

impl PendingSave {
    /// Send the content snapshot. Projects go out as they stand when the
    /// request is made and are never rolled back by the commit.
    pub async fn dispatch(self) -> PersistOutcome {
        let outcome = self
            .store
            .persist_content(self.content, &self.password)
            .await;
        self.flight.land();
        outcome
    }
}

pub struct AdminSession {
    store: Arc<ContentStore>,
    committed: watch::Receiver<SiteContent>,
    draft: SiteContent,
    password_confirmation: String,
    phase: Phase,
    flight: Arc<AtomicU8>,
    last_outcome: Option<PersistOutcome>,
    saved_ack: Duration,
}

impl AdminSession {
    /// Enter the admin workflow. The password must match the committed one.
    pub fn login(store: Arc<ContentStore>, password: &str) -> Result<Self, AuthError> {
        if store.content().admin_password != password {
            tracing::warn!("admin login rejected");
            return Err(AuthError::InvalidPassword);
        }
        tracing::info!("admin session opened");
        Ok(Self::open(store))
    }

    /// Snapshot the store's committed content into a fresh draft.
    pub(crate) fn open(store: Arc<ContentStore>) -> Self {
        let mut committed = store.subscribe_content();
        let draft = committed.borrow_and_update().clone();
        let password_confirmation = draft.admin_password.clone();

        Self {
            store,
            committed,
            draft,
            password_confirmation,
            phase: Phase::Idle,
            flight: Arc::new(AtomicU8::new(FLIGHT_IDLE)),
            last_outcome: None,
            saved_ack: DEFAULT_SAVED_ACK,
        }
    }

    pub fn with_saved_ack(mut self, ack: Duration) -> Self {
        self.saved_ack = ack;
        self
    }

    pub fn draft(&self) -> &SiteContent {
        &self.draft
    }

    pub fn committed(&self) -> SiteContent {
        self.committed.borrow().clone()
    }

    /// Reseed the draft when the committed content changed underneath it
    /// (e.g. the initial load finished). Skipped while a save is in flight.
    pub fn refresh(&mut self) -> bool {
        self.absorb_landed();
        if self.is_saving() || !self.committed.has_changed().unwrap_or(false) {
            return false;
        }
        self.reseed();
        true
    }

    /// Throw away draft edits.
    pub fn discard(&mut self) {
        self.reseed();
    }

    fn reseed(&mut self) {
        self.draft = self.committed.borrow_and_update().clone();
        self.password_confirmation = self.draft.admin_password.clone();
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != *self.committed.borrow()
    }

    pub fn apply(&mut self, edit: ContentEdit) -> Result<(), EditError> {
        edit.apply(&mut self.draft)
    }

    pub fn password_confirmation(&self) -> &str {
        &self.password_confirmation
    }

    pub fn set_password_confirmation(&mut self, value: impl Into<String>) {
        self.password_confirmation = value.into();
    }

    pub fn validate_password_confirmation(&self) -> Result<(), SaveError> {
        if self.draft.admin_password != self.password_confirmation {
            return Err(SaveError::PasswordMismatch);
        }
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Save cycle
    // ------------------------------------------------------------------------

    fn is_saving(&self) -> bool {
        self.flight.load(Ordering::Acquire) == FLIGHT_IN_FLIGHT
    }

    /// A save that landed without `finish_save` still committed our own
    /// snapshot; mark it seen so it never reseeds over later edits.
    fn absorb_landed(&mut self) {
        if self
            .flight
            .compare_exchange(
                FLIGHT_LANDED,
                FLIGHT_IDLE,
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
        {
            self.committed.borrow_and_update();
        }
    }

    pub fn save_state(&self) -> SaveState {
        if self.is_saving() {
            return SaveState::Saving;
        }
        match &self.phase {
            Phase::Idle => SaveState::Idle,
            Phase::Saved { outcome, until } => {
                if Instant::now() >= *until {
                    SaveState::Idle
                } else {
                    SaveState::Saved(outcome.clone())
                }
            }
        }
    }

    /// Outcome of the most recent save, kept after the acknowledgment expires.
    pub fn last_outcome(&self) -> Option<&PersistOutcome> {
        self.last_outcome.as_ref()
    }

    pub fn can_save(&self) -> bool {
        !self.is_saving() && self.is_dirty() && self.validate_password_confirmation().is_ok()
    }

    /// False while a save is in flight.
    pub fn can_leave(&self) -> bool {
        !self.is_saving()
    }

    /// Validate, snapshot the draft, and enter `saving`.
    pub fn begin_save(&mut self) -> Result<PendingSave, SaveError> {
        if self.is_saving() {
            return Err(SaveError::AlreadySaving);
        }
        self.absorb_landed();
        self.validate_password_confirmation()?;
        if !self.is_dirty() {
            return Err(SaveError::NothingToSave);
        }

        self.flight.store(FLIGHT_IN_FLIGHT, Ordering::Release);
        tracing::debug!("admin save dispatched");
        Ok(PendingSave {
            store: self.store.clone(),
            content: self.draft.clone(),
            password: self.draft.admin_password.clone(),
            flight: FlightGuard(self.flight.clone()),
        })
    }

    /// Enter the timed `saved` state with the dispatch outcome.
    pub fn finish_save(&mut self, outcome: PersistOutcome) {
        // The store now holds our snapshot; mark it seen so refresh() does
        // not overwrite edits made while the save was in flight.
        self.flight.store(FLIGHT_IDLE, Ordering::Release);
        self.committed.borrow_and_update();
        if let Some(warning) = outcome.warning() {
            tracing::warn!(warning = %warning, "admin save not confirmed remotely");
        }
        self.last_outcome = Some(outcome.clone());
        self.phase = Phase::Saved {
            outcome,
            until: Instant::now() + self.saved_ack,
        };
    }

    pub async fn save(&mut self) -> Result<PersistOutcome, SaveError> {
        let pending = self.begin_save()?;
        let outcome = pending.dispatch().await;
        self.finish_save(outcome.clone());
        Ok(outcome)
    }

    // ------------------------------------------------------------------------
    // Projects
    // ------------------------------------------------------------------------

    pub fn projects(&self) -> Vec<Project> {
        self.store.projects()
    }

    pub fn search_projects(&self, query: &str) -> Vec<Project> {
        let projects = self.store.projects();
        content::search_projects(&projects, query)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn new_project(&self) -> ProjectEditor {
        ProjectEditor::create()
    }

    pub fn edit_project(&self, id: ProjectId) -> Option<ProjectEditor> {
        self.store
            .projects()
            .iter()
            .find(|p| p.id == id)
            .map(ProjectEditor::edit)
    }

    /// Validate the editor and hand the result to the store. A failed
    /// validation returns the editor so it can stay open.
    pub fn commit_project(
        &self,
        editor: ProjectEditor,
    ) -> Result<Project, (ProjectEditor, ValidationError)> {
        match editor.commit()? {
            ProjectCommit::Create(data) => Ok(self.store.add_project(data)),
            ProjectCommit::Update(project) => {
                self.store.update_project(project.clone());
                Ok(project)
            }
        }
    }

    pub fn delete_project(&self, id: ProjectId, confirm: impl FnOnce(&str) -> bool) -> bool {
        if !confirm(DELETE_PROJECT_PROMPT) {
            return false;
        }
        self.store.delete_project(id)
    }

    /// Reset the store to the defaults (after confirmation) and reseed the draft.
    pub fn reset_to_defaults(&mut self, confirm: impl FnOnce(&str) -> bool) -> bool {
        if self.is_saving() || !self.store.reset_to_defaults(confirm) {
            return false;
        }
        self.reseed();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::edit::{HeroField, PlanChange};
    use crate::admin::editor::join_lines;
    use crate::content::{defaults, ProjectCategory};
    use crate::error::ProviderError;
    use crate::sync::{provider::fake::FakeProvider, CacheSlot, LocalCache};
    use tempfile::TempDir;

    async fn loaded(provider: FakeProvider) -> (Arc<FakeProvider>, Arc<ContentStore>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let provider = Arc::new(provider);
        let store = Arc::new(ContentStore::new(provider.clone(), LocalCache::new(dir.path())));
        store.load().await;
        (provider, store, dir)
    }

    #[tokio::test]
    async fn test_fresh_session_is_clean() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let session = AdminSession::open(store);

        assert!(!session.is_dirty());
        assert!(!session.can_save());
        assert_eq!(session.password_confirmation(), "admin123");
        assert_eq!(session.save_state(), SaveState::Idle);
    }

    #[tokio::test]
    async fn test_draft_is_independent_of_store() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());

        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        assert!(session.is_dirty());
        assert_eq!(session.draft().site_name, "Acme Co");
        assert_eq!(store.content().site_name, "Digital Agency");
    }

    #[tokio::test]
    async fn test_mismatched_confirmation_blocks_save() {
        let (provider, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());

        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();
        session.apply(ContentEdit::AdminPassword("n3w-pass".into())).unwrap();

        assert!(session.is_dirty());
        assert!(!session.can_save());
        assert_eq!(session.save().await, Err(SaveError::PasswordMismatch));
        assert_eq!(store.content().site_name, "Digital Agency");
        assert_eq!(provider.save_count(), 0);
        assert_eq!(session.save_state(), SaveState::Idle);

        session.set_password_confirmation("n3w-pass");
        assert!(session.validate_password_confirmation().is_ok());
        assert!(session.can_save());
    }

    #[tokio::test]
    async fn test_successful_save_commits_and_cleans_draft() {
        let (provider, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let outcome = session.save().await.unwrap();

        assert_eq!(outcome, PersistOutcome::Synced);
        assert!(!session.is_dirty());
        assert_eq!(store.content().site_name, "Acme Co");
        assert_eq!(provider.saves.lock().unwrap()[0].password, "admin123");
        assert_eq!(provider.saves.lock().unwrap()[0].projects, store.projects());
        assert_eq!(session.save_state(), SaveState::Saved(PersistOutcome::Synced));
    }

    #[tokio::test]
    async fn test_remote_failure_commits_locally_with_warning() {
        let (_, store, _dir) = loaded(FakeProvider::unreachable()).await;
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let outcome = session.save().await.unwrap();

        assert!(matches!(outcome, PersistOutcome::LocalOnly(ProviderError::Network(_))));
        assert_eq!(store.content(), *session.draft());
        assert!(!session.is_dirty());
        assert!(session.last_outcome().unwrap().warning().is_some());
    }

    #[tokio::test]
    async fn test_clean_draft_has_nothing_to_save() {
        let (provider, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store);

        assert_eq!(session.save().await, Err(SaveError::NothingToSave));
        assert_eq!(provider.save_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_saved_acknowledgment_returns_to_idle() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session =
            AdminSession::open(store).with_saved_ack(Duration::from_millis(500));
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();
        session.save().await.unwrap();

        assert!(matches!(session.save_state(), SaveState::Saved(_)));
        tokio::time::advance(Duration::from_millis(501)).await;
        assert_eq!(session.save_state(), SaveState::Idle);
        assert_eq!(session.last_outcome(), Some(&PersistOutcome::Synced));
    }

    #[tokio::test]
    async fn test_draft_stays_editable_while_save_is_in_flight() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let pending = session.begin_save().unwrap();
        assert_eq!(session.save_state(), SaveState::Saving);
        assert!(!session.can_leave());
        assert!(matches!(session.begin_save(), Err(SaveError::AlreadySaving)));

        session
            .apply(ContentEdit::Hero(HeroField::Subtitle, "Later".into()))
            .unwrap();
        let outcome = pending.dispatch().await;
        session.finish_save(outcome);

        assert!(session.can_leave());
        assert_eq!(store.content().site_name, "Acme Co");
        assert_ne!(store.content().hero.subtitle, "Later");
        assert!(session.is_dirty());
        assert!(!session.refresh());
        assert_eq!(session.draft().hero.subtitle, "Later");
    }

    #[tokio::test]
    async fn test_dispatched_save_lands_after_session_is_dropped() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let pending = session.begin_save().unwrap();
        drop(session);
        pending.dispatch().await;

        assert_eq!(store.content().site_name, "Acme Co");
    }

    #[tokio::test]
    async fn test_refresh_reseeds_after_load() {
        let dir = tempfile::tempdir().unwrap();
        let provider = FakeProvider::online();
        *provider.content.lock().unwrap() = Ok(SiteContent {
            site_name: "Remote Co".into(),
            admin_password: "remote".into(),
            ..defaults::site_content()
        });
        let store = Arc::new(ContentStore::new(Arc::new(provider), LocalCache::new(dir.path())));
        let mut session = AdminSession::open(store.clone());
        assert_eq!(session.draft().site_name, "Digital Agency");

        store.load().await;
        assert!(session.is_dirty());
        assert!(session.refresh());
        assert_eq!(session.draft().site_name, "Remote Co");
        assert_eq!(session.password_confirmation(), "remote");
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_discard_reverts_draft() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store);
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        session.discard();
        assert!(!session.is_dirty());
        assert_eq!(session.draft().site_name, "Digital Agency");
    }

    #[tokio::test]
    async fn test_feature_text_survives_save_and_reedit() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        session
            .apply(ContentEdit::Plan {
                index: 2,
                change: PlanChange::FeaturesText("A\nB\n\nC".into()),
            })
            .unwrap();
        session.save().await.unwrap();

        let features = &store.content().plans.items[2].features;
        assert_eq!(features, &vec!["A", "B", "", "C"]);
        assert_eq!(join_lines(features), "A\nB\n\nC");
    }

    #[tokio::test]
    async fn test_project_editor_round_trip_through_store() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let session = AdminSession::open(store.clone());
        let before = store.projects().len();

        let mut editor = session.new_project();
        editor.set_title("Brand Refresh");
        editor.set_category(ProjectCategory::Logos);
        let created = session.commit_project(editor).unwrap();
        assert_eq!(store.projects()[0], created);
        assert_eq!(store.projects().len(), before + 1);

        let mut editor = session.edit_project(created.id).unwrap();
        editor.set_tech("Illustrator");
        let updated = session.commit_project(editor).unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(store.projects()[0].tech, "Illustrator");

        let blank = session.new_project();
        let (_, err) = session.commit_project(blank).unwrap_err();
        assert_eq!(err, ValidationError::Required("title"));
        assert_eq!(store.projects().len(), before + 1);

        assert_eq!(session.search_projects("logos").len(), 1);
        assert!(!session.delete_project(created.id, |_| false));
        assert!(session.delete_project(created.id, |_| true));
        assert_eq!(store.projects().len(), before);
    }

    #[tokio::test]
    async fn test_reset_reseeds_draft() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        store.replace_content(SiteContent {
            site_name: "Custom".into(),
            ..defaults::site_content()
        });
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Unsaved".into())).unwrap();

        assert!(!session.reset_to_defaults(|_| false));
        assert_eq!(session.draft().site_name, "Unsaved");

        assert!(session.reset_to_defaults(|_| true));
        assert_eq!(session.draft().site_name, "Digital Agency");
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_login_checks_committed_password() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;

        let rejected = AdminSession::login(store.clone(), "guess").err();
        assert_eq!(rejected, Some(AuthError::InvalidPassword));
        assert!(AdminSession::login(store.clone(), "").is_err());

        let session = AdminSession::login(store, "admin123").unwrap();
        assert!(!session.is_dirty());
        assert_eq!(session.save_state(), SaveState::Idle);
    }

    #[tokio::test]
    async fn test_project_changes_during_save_are_kept() {
        let (provider, store, dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        let doomed = store.projects()[1].id;
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let pending = session.begin_save().unwrap();
        let mut editor = session.new_project();
        editor.set_title("Launch Film");
        editor.set_category(ProjectCategory::Software);
        let added = session.commit_project(editor).unwrap();
        assert!(session.delete_project(doomed, |_| true));

        let outcome = pending.dispatch().await;
        session.finish_save(outcome);

        let projects = store.projects();
        assert!(projects.iter().any(|p| p.id == added.id));
        assert!(projects.iter().all(|p| p.id != doomed));
        assert_eq!(provider.saves.lock().unwrap()[0].projects, projects);

        let cached: Vec<Project> = LocalCache::new(dir.path())
            .read(CacheSlot::Projects)
            .unwrap();
        assert_eq!(cached, projects);
        assert_eq!(store.content().site_name, "Acme Co");
    }

    #[tokio::test]
    async fn test_dropped_save_returns_to_idle() {
        let (provider, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let pending = session.begin_save().unwrap();
        assert_eq!(session.save_state(), SaveState::Saving);
        drop(pending);

        assert_eq!(session.save_state(), SaveState::Idle);
        assert!(session.can_leave());
        assert!(session.can_save());

        // A dispatch future cancelled before it ran behaves the same.
        let cancelled = session.begin_save().unwrap().dispatch();
        drop(cancelled);
        assert!(session.can_leave());
        assert_eq!(provider.save_count(), 0);
        assert_eq!(store.content().site_name, "Digital Agency");

        let outcome = session.save().await.unwrap();
        assert_eq!(outcome, PersistOutcome::Synced);
        assert_eq!(store.content().site_name, "Acme Co");
    }

    #[tokio::test]
    async fn test_landed_save_without_finish_keeps_later_edits() {
        let (_, store, _dir) = loaded(FakeProvider::online()).await;
        let mut session = AdminSession::open(store.clone());
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();

        let pending = session.begin_save().unwrap();
        session
            .apply(ContentEdit::Hero(HeroField::Subtitle, "Later".into()))
            .unwrap();
        pending.dispatch().await;

        assert_eq!(session.save_state(), SaveState::Idle);
        assert!(session.can_leave());
        assert!(!session.refresh());
        assert_eq!(session.draft().hero.subtitle, "Later");
        assert_eq!(store.content().site_name, "Acme Co");
        assert!(session.begin_save().is_ok());
    }
}
