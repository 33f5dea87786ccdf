//! Administrative editing: typed draft edits, the draft session with its
//! save cycle, and the per-project editor.

pub mod edit;
pub mod editor;
pub mod session;

use std::sync::Arc;

pub use edit::{ContentEdit, CtaField, HeaderField, HeroField, ItemField, PlanChange};
pub use editor::{join_lines, split_lines, EditorMode, ProjectCommit, ProjectEditor};
pub use session::{AdminSession, PendingSave, SaveState};

use crate::config::ClientConfig;
use crate::error::AuthError;
use crate::sync::ContentStore;

/// Log in and open a draft session using the configured acknowledgment delay.
pub fn open_session(
    store: Arc<ContentStore>,
    password: &str,
    config: &ClientConfig,
) -> Result<AdminSession, AuthError> {
    Ok(AdminSession::login(store, password)?.with_saved_ack(config.saved_ack()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::{LocalCache, OfflineProvider};
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_open_session_uses_configured_ack() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ContentStore::new(
            Arc::new(OfflineProvider),
            LocalCache::new(dir.path()),
        ));
        store.load().await;
        let config = ClientConfig {
            saved_ack_millis: 3000,
            ..ClientConfig::default()
        };
        assert!(open_session(store.clone(), "wrong", &config).is_err());
        let mut session = open_session(store, "admin123", &config).unwrap();
        session.apply(ContentEdit::SiteName("Acme Co".into())).unwrap();
        session.save().await.unwrap();

        tokio::time::advance(Duration::from_millis(2000)).await;
        assert!(matches!(session.save_state(), SaveState::Saved(_)));
        tokio::time::advance(Duration::from_millis(1001)).await;
        assert_eq!(session.save_state(), SaveState::Idle);
    }
}
