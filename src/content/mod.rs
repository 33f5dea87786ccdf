//! Content Aggregate - the structured record describing every editable part
//! of the site, plus the portfolio projects.
//!
//! The wire format is camelCase JSON. Every struct deserializes with field
//! defaults, so a degraded payload still yields a structurally complete value.

pub mod defaults;
pub mod media;

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use media::MediaType;

// ============================================================================
// Site content
// ============================================================================

/// The singleton content aggregate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteContent {
    /// Logo media reference (URL or embedded data), possibly empty.
    pub logo: String,
    pub site_name: String,
    /// Plaintext password compared on admin login.
    pub admin_password: String,
    pub socials: Socials,
    pub hero: HeroBlock,
    pub services: ServicesBlock,
    pub plans: PlansBlock,
    pub about: AboutBlock,
    pub cta: CtaBlock,
}

/// Social network links. Empty string means "not shown".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socials {
    pub facebook: String,
    pub instagram: String,
    pub twitter: String,
    pub linkedin: String,
    pub tiktok: String,
}

/// The supported social networks, used to address a [`Socials`] field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocialNetwork {
    Facebook,
    Instagram,
    Twitter,
    Linkedin,
    Tiktok,
}

impl SocialNetwork {
    pub const ALL: [SocialNetwork; 5] = [
        SocialNetwork::Facebook,
        SocialNetwork::Instagram,
        SocialNetwork::Twitter,
        SocialNetwork::Linkedin,
        SocialNetwork::Tiktok,
    ];
}

impl Socials {
    pub fn get(&self, network: SocialNetwork) -> &str {
        match network {
            SocialNetwork::Facebook => &self.facebook,
            SocialNetwork::Instagram => &self.instagram,
            SocialNetwork::Twitter => &self.twitter,
            SocialNetwork::Linkedin => &self.linkedin,
            SocialNetwork::Tiktok => &self.tiktok,
        }
    }

    pub fn get_mut(&mut self, network: SocialNetwork) -> &mut String {
        match network {
            SocialNetwork::Facebook => &mut self.facebook,
            SocialNetwork::Instagram => &mut self.instagram,
            SocialNetwork::Twitter => &mut self.twitter,
            SocialNetwork::Linkedin => &mut self.linkedin,
            SocialNetwork::Tiktok => &mut self.tiktok,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroBlock {
    pub title_part1: String,
    pub title_accent: String,
    pub subtitle: String,
    pub button_primary: String,
    pub button_secondary: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServicesBlock {
    pub section_title: String,
    pub section_subtitle: String,
    pub items: Vec<ServiceItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlansBlock {
    pub section_title: String,
    pub section_subtitle: String,
    pub items: Vec<PricingPlan>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AboutBlock {
    pub section_title: String,
    pub items: Vec<ReasonItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaBlock {
    pub title: String,
    pub text: String,
    pub button_text: String,
    /// Digits only, used for the WhatsApp deep link.
    pub whatsapp_number: String,
    pub background_image: String,
}

/// A titled entry owned by a section list. Edited in place only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextItem {
    pub id: i64,
    pub title: String,
    pub description: String,
}

pub type ServiceItem = TextItem;
pub type ReasonItem = TextItem;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: i64,
    pub name: String,
    /// Free-form, e.g. "$199".
    pub price: String,
    /// Free-form, e.g. "/mes".
    pub period: String,
    /// Order-significant; blank entries are kept.
    pub features: Vec<String>,
    pub button_text: String,
    pub is_popular: bool,
}

// ============================================================================
// Projects
// ============================================================================

pub type ProjectId = i64;

/// Portfolio grouping, also used by the admin filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectCategory {
    #[default]
    Web,
    Software,
    Redes,
    Logos,
}

impl ProjectCategory {
    pub const ALL: [ProjectCategory; 4] = [
        ProjectCategory::Web,
        ProjectCategory::Software,
        ProjectCategory::Redes,
        ProjectCategory::Logos,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectCategory::Web => "Web",
            ProjectCategory::Software => "Software",
            ProjectCategory::Redes => "Redes",
            ProjectCategory::Logos => "Logos",
        }
    }
}

impl fmt::Display for ProjectCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown project category '{}'", s))
    }
}

/// Media attached to a project. The variant fixes how the URL is rendered,
/// so a video URL can never be paired with an image type or vice versa.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectMedia {
    /// Image URL or embedded image data.
    Image(String),
    /// Video source URL (watch link or embeddable player URL).
    Video(String),
}

impl Default for ProjectMedia {
    fn default() -> Self {
        ProjectMedia::Image(String::new())
    }
}

impl ProjectMedia {
    pub fn new(kind: MediaType, value: impl Into<String>) -> Self {
        match kind {
            MediaType::Image => ProjectMedia::Image(value.into()),
            MediaType::Video => ProjectMedia::Video(value.into()),
        }
    }

    pub fn kind(&self) -> MediaType {
        match self {
            ProjectMedia::Image(_) => MediaType::Image,
            ProjectMedia::Video(_) => MediaType::Video,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            ProjectMedia::Image(v) | ProjectMedia::Video(v) => v,
        }
    }

    /// Same reference, reinterpreted as another media type.
    pub fn with_kind(self, kind: MediaType) -> Self {
        match self {
            ProjectMedia::Image(v) | ProjectMedia::Video(v) => ProjectMedia::new(kind, v),
        }
    }

    /// URL to hand to the renderer: videos are rewritten to their
    /// embeddable player form, images pass through.
    pub fn embed_url(&self) -> String {
        match self {
            ProjectMedia::Image(v) => v.clone(),
            ProjectMedia::Video(v) => media::to_embeddable_video_url(v),
        }
    }
}

/// A portfolio entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProjectRecord", into = "ProjectRecord")]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub category: ProjectCategory,
    pub media: ProjectMedia,
    pub description: String,
    pub tech: String,
}

/// Project fields before an id is assigned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub category: ProjectCategory,
    pub media: ProjectMedia,
    pub description: String,
    pub tech: String,
}

impl NewProject {
    pub fn with_id(self, id: ProjectId) -> Project {
        Project {
            id,
            title: self.title,
            category: self.category,
            media: self.media,
            description: self.description,
            tech: self.tech,
        }
    }
}

/// Flat wire form: the media reference travels as `image` next to `mediaType`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct ProjectRecord {
    id: ProjectId,
    title: String,
    category: ProjectCategory,
    media_type: MediaType,
    image: String,
    description: String,
    tech: String,
}

impl From<ProjectRecord> for Project {
    fn from(r: ProjectRecord) -> Self {
        Project {
            id: r.id,
            title: r.title,
            category: r.category,
            media: ProjectMedia::new(r.media_type, r.image),
            description: r.description,
            tech: r.tech,
        }
    }
}

impl From<Project> for ProjectRecord {
    fn from(p: Project) -> Self {
        let media_type = p.media.kind();
        let image = match p.media {
            ProjectMedia::Image(v) | ProjectMedia::Video(v) => v,
        };
        ProjectRecord {
            id: p.id,
            title: p.title,
            category: p.category,
            media_type,
            image,
            description: p.description,
            tech: p.tech,
        }
    }
}

/// Case-insensitive substring match on title or category. An empty query
/// matches everything.
pub fn search_projects<'a>(projects: &'a [Project], query: &str) -> Vec<&'a Project> {
    let needle = query.to_lowercase();
    projects
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.title.to_lowercase().contains(&needle)
                || p.category.as_str().to_lowercase().contains(&needle)
        })
        .collect()
}

/// Public portfolio filter: `None` shows every category.
pub fn filter_by_category(
    projects: &[Project],
    category: Option<ProjectCategory>,
) -> Vec<&Project> {
    projects
        .iter()
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn project(id: i64, title: &str, category: ProjectCategory) -> Project {
        Project {
            id,
            title: title.to_string(),
            category,
            ..Default::default()
        }
    }

    #[test]
    fn test_site_content_uses_camel_case_keys() {
        let value = serde_json::to_value(defaults::site_content()).unwrap();
        assert_eq!(value["siteName"], "Digital Agency");
        assert!(value["hero"]["titlePart1"].is_string());
        assert!(value["cta"]["whatsappNumber"].is_string());
        assert!(value["plans"]["items"][0]["isPopular"].is_boolean());
        assert!(value["plans"]["items"][0]["buttonText"].is_string());
    }

    #[test]
    fn test_degraded_payload_is_structurally_complete() {
        let content: SiteContent =
            serde_json::from_value(json!({ "siteName": "Acme Co", "hero": {} })).unwrap();
        assert_eq!(content.site_name, "Acme Co");
        assert_eq!(content.hero, HeroBlock::default());
        assert!(content.services.items.is_empty());
        assert_eq!(content.cta, CtaBlock::default());
    }

    #[test]
    fn test_project_wire_format_carries_media_type_and_image() {
        let p = Project {
            id: 7,
            title: "Reel".to_string(),
            category: ProjectCategory::Redes,
            media: ProjectMedia::Video("https://youtu.be/abc123".to_string()),
            description: String::new(),
            tech: String::new(),
        };
        let value = serde_json::to_value(&p).unwrap();
        assert_eq!(value["mediaType"], "video");
        assert_eq!(value["image"], "https://youtu.be/abc123");
        assert_eq!(value["category"], "Redes");

        let back: Project = serde_json::from_value(value).unwrap();
        assert_eq!(back, p);
    }

    #[test]
    fn test_project_without_media_type_is_image() {
        let p: Project = serde_json::from_value(json!({
            "id": 1, "title": "Shop", "category": "Web", "image": "shop.png"
        }))
        .unwrap();
        assert_eq!(p.media, ProjectMedia::Image("shop.png".to_string()));
    }

    #[test]
    fn test_project_with_unknown_category_is_rejected() {
        let result: Result<Project, _> =
            serde_json::from_value(json!({ "id": 1, "category": "Print" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_media_with_kind_keeps_reference() {
        let media = ProjectMedia::Image("https://vimeo.com/42".to_string());
        let video = media.with_kind(MediaType::Video);
        assert_eq!(video, ProjectMedia::Video("https://vimeo.com/42".to_string()));
        assert_eq!(video.embed_url(), "https://player.vimeo.com/video/42");
    }

    #[test]
    fn test_search_matches_title_or_category_case_insensitively() {
        let projects = vec![
            project(3, "Fashion Film", ProjectCategory::Redes),
            project(2, "Shop Deluxe", ProjectCategory::Web),
            project(1, "Brand Mark", ProjectCategory::Logos),
        ];
        let ids = |found: Vec<&Project>| found.iter().map(|p| p.id).collect::<Vec<_>>();

        assert_eq!(ids(search_projects(&projects, "SHOP")), vec![2]);
        assert_eq!(ids(search_projects(&projects, "logo")), vec![1]);
        assert_eq!(ids(search_projects(&projects, "")), vec![3, 2, 1]);
        assert!(search_projects(&projects, "nothing").is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let projects = vec![
            project(2, "A", ProjectCategory::Web),
            project(1, "B", ProjectCategory::Software),
        ];
        assert_eq!(filter_by_category(&projects, None).len(), 2);
        let web = filter_by_category(&projects, Some(ProjectCategory::Web));
        assert_eq!(web.len(), 1);
        assert_eq!(web[0].id, 2);
    }

    #[test]
    fn test_category_parses_from_display_name() {
        assert_eq!("Logos".parse::<ProjectCategory>(), Ok(ProjectCategory::Logos));
        assert!("logos".parse::<ProjectCategory>().is_err());
    }
}
