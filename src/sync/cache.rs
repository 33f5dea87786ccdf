//! Local cache: one JSON file per resource kind holding the last known-good value.

use serde::{de::DeserializeOwned, Serialize};
use std::path::PathBuf;

use crate::error::CacheError;

/// The two independently keyed cache slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSlot {
    Content,
    Projects,
}

impl CacheSlot {
    fn file_name(&self) -> &'static str {
        match self {
            CacheSlot::Content => "content.json",
            CacheSlot::Projects => "projects.json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct LocalCache {
    dir: PathBuf,
}

impl LocalCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, slot: CacheSlot) -> PathBuf {
        self.dir.join(slot.file_name())
    }

    /// Read a slot. Absent, unreadable and malformed slots all read as `None`.
    pub fn read<T: DeserializeOwned>(&self, slot: CacheSlot) -> Option<T> {
        let path = self.path(slot);
        let raw = match std::fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read cache slot");
                return None;
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring malformed cache slot");
                None
            }
        }
    }

    /// Overwrite a slot. Written to a sibling temp file first, then renamed,
    /// so a crash never leaves a half-written slot behind.
    pub fn write<T: Serialize>(&self, slot: CacheSlot, value: &T) -> Result<(), CacheError> {
        std::fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_vec(value)?;
        let path = self.path(slot);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(path = %path.display(), "cache slot written");
        Ok(())
    }
}
