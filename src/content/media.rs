//! Media Reference Resolver
//! Classifies media strings and rewrites known video links to embeddable form.
//! Pure functions; malformed input degrades to "link", never an error.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Declared media type of a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "image" => Some(MediaType::Image),
            "video" => Some(MediaType::Video),
            _ => None,
        }
    }
}

/// What a media value looks like to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Empty,
    Image,
    Video,
    Link,
}

const EMBEDDED_IMAGE_PREFIX: &str = "data:image/";

lazy_static::lazy_static! {
    /// Raster/vector extension at the end of the path, before any query or fragment.
    static ref IMAGE_EXT_REGEX: Regex =
        Regex::new(r"(?i)\.(png|jpe?g|gif|webp|svg)([?#].*)?$").unwrap();

    /// `youtube.com/watch?v=<id>` or `youtu.be/<id>`
    static ref YOUTUBE_REGEX: Regex =
        Regex::new(r"(?i)(?:youtube\.com/watch\?v=|youtu\.be/)([\w-]+)").unwrap();

    /// `vimeo.com/<numeric id>`
    static ref VIMEO_REGEX: Regex = Regex::new(r"(?i)vimeo\.com/(\d+)").unwrap();
}

/// True when the value is embedded image data or ends in an image extension.
pub fn is_image_reference(value: &str) -> bool {
    let value = value.trim();
    value.starts_with(EMBEDDED_IMAGE_PREFIX) || IMAGE_EXT_REGEX.is_match(value)
}

/// Classify a media value. `context` is the declared type of the slot the value
/// sits in; image slots (logo, hero, CTA background) pass `MediaType::Image`.
pub fn classify_media(value: &str, context: MediaType) -> MediaKind {
    if value.trim().is_empty() {
        return MediaKind::Empty;
    }
    if is_image_reference(value) {
        return MediaKind::Image;
    }
    match context {
        MediaType::Video => MediaKind::Video,
        MediaType::Image => MediaKind::Link,
    }
}

/// Rewrite YouTube and Vimeo links into their player URLs. Anything else is
/// returned unchanged.
pub fn to_embeddable_video_url(value: &str) -> String {
    if let Some(id) = YOUTUBE_REGEX.captures(value).and_then(|c| c.get(1)) {
        return format!("https://www.youtube.com/embed/{}", id.as_str());
    }
    if let Some(id) = VIMEO_REGEX.captures(value).and_then(|c| c.get(1)) {
        return format!("https://player.vimeo.com/video/{}", id.as_str());
    }
    value.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_is_empty() {
        assert_eq!(classify_media("", MediaType::Image), MediaKind::Empty);
        assert_eq!(classify_media("   ", MediaType::Video), MediaKind::Empty);
    }

    #[test]
    fn test_extension_with_query_is_image() {
        assert_eq!(classify_media("photo.PNG?v=2", MediaType::Image), MediaKind::Image);
        assert_eq!(
            classify_media("https://cdn.test/a/b.jpeg#top", MediaType::Image),
            MediaKind::Image
        );
        assert_eq!(classify_media("logo.svg", MediaType::Video), MediaKind::Image);
    }

    #[test]
    fn test_embedded_data_is_image() {
        assert_eq!(
            classify_media("data:image/webp;base64,AAAA", MediaType::Image),
            MediaKind::Image
        );
    }

    #[test]
    fn test_other_values_depend_on_context() {
        let url = "https://images.unsplash.com/photo-1522071820081?auto=format";
        assert_eq!(classify_media(url, MediaType::Image), MediaKind::Link);
        assert_eq!(
            classify_media("https://youtu.be/abc123", MediaType::Video),
            MediaKind::Video
        );
    }

    #[test]
    fn test_youtube_links_become_embed_urls() {
        assert_eq!(
            to_embeddable_video_url("https://youtu.be/abc123"),
            "https://www.youtube.com/embed/abc123"
        );
        assert_eq!(
            to_embeddable_video_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10"),
            "https://www.youtube.com/embed/dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_vimeo_links_become_player_urls() {
        assert_eq!(
            to_embeddable_video_url("https://vimeo.com/76979871"),
            "https://player.vimeo.com/video/76979871"
        );
    }

    #[test]
    fn test_unrecognized_urls_are_unchanged() {
        assert_eq!(
            to_embeddable_video_url("https://example.com/page"),
            "https://example.com/page"
        );
        assert_eq!(
            to_embeddable_video_url("https://www.youtube.com/embed/abc"),
            "https://www.youtube.com/embed/abc"
        );
        assert_eq!(to_embeddable_video_url("not a url"), "not a url");
    }

    #[test]
    fn test_media_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&MediaType::Video).unwrap(), "\"video\"");
        assert_eq!(MediaType::parse("image"), Some(MediaType::Image));
        assert_eq!(MediaType::parse("gif"), None);
    }
}
