//! Project Editor - a scoped sub-session over one candidate project.
//!
//! Opened blank (create) or from an existing project (edit). Commit validates
//! and yields a [`ProjectCommit`]; dropping or cancelling the editor discards
//! the candidate without touching anything else.

use crate::content::{
    media::MediaType, NewProject, Project, ProjectCategory, ProjectId, ProjectMedia,
};
use crate::error::ValidationError;

/// Split multi-line text into one entry per line. Blank lines, including a
/// trailing one, are kept so [`join_lines`] reproduces the text exactly.
pub fn split_lines(text: &str) -> Vec<String> {
    text.split('\n').map(str::to_string).collect()
}

/// Inverse of [`split_lines`].
pub fn join_lines(lines: &[String]) -> String {
    lines.join("\n")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Create,
    Edit(ProjectId),
}

/// What a successful commit asks the store to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectCommit {
    Create(NewProject),
    Update(Project),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectEditor {
    mode: EditorMode,
    pub title: String,
    pub category: ProjectCategory,
    pub media: ProjectMedia,
    pub description: String,
    pub tech: String,
}

impl ProjectEditor {
    /// Blank candidate: category Web, image media.
    pub fn create() -> Self {
        Self {
            mode: EditorMode::Create,
            title: String::new(),
            category: ProjectCategory::Web,
            media: ProjectMedia::Image(String::new()),
            description: String::new(),
            tech: String::new(),
        }
    }

    /// Candidate pre-filled from a copy of `project`.
    pub fn edit(project: &Project) -> Self {
        Self {
            mode: EditorMode::Edit(project.id),
            title: project.title.clone(),
            category: project.category,
            media: project.media.clone(),
            description: project.description.clone(),
            tech: project.tech.clone(),
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_category(&mut self, category: ProjectCategory) {
        self.category = category;
    }

    /// Switch between image and video, keeping the current reference.
    pub fn set_media_type(&mut self, kind: MediaType) {
        let media = std::mem::take(&mut self.media);
        self.media = media.with_kind(kind);
    }

    /// Replace the media reference, keeping the current media type.
    pub fn set_media_value(&mut self, value: impl Into<String>) {
        self.media = ProjectMedia::new(self.media.kind(), value);
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn set_tech(&mut self, tech: impl Into<String>) {
        self.tech = tech.into();
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::Required("title"));
        }
        Ok(())
    }

    /// Validate and turn the candidate into a create or update request.
    /// On failure the editor is handed back unchanged so it stays open.
    pub fn commit(self) -> Result<ProjectCommit, (Self, ValidationError)> {
        if let Err(e) = self.validate() {
            return Err((self, e));
        }
        let data = NewProject {
            title: self.title,
            category: self.category,
            media: self.media,
            description: self.description,
            tech: self.tech,
        };
        Ok(match self.mode {
            EditorMode::Create => ProjectCommit::Create(data),
            EditorMode::Edit(id) => ProjectCommit::Update(data.with_id(id)),
        })
    }

    /// Discard the candidate.
    pub fn cancel(self) {}
}
