//! YouTube video ids
//!
//! The id is display data only: it builds thumbnail and embed URLs.

use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // Pattern is a literal
static YOUTUBE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)(?:youtube\.com/(?:[^/]+/.+/|(?:v|e(?:mbed)?)/|.*[?&]v=)|youtu\.be/)([^"&?/\s]{11})"#,
    )
    .expect("YouTube id pattern is valid")
});

/// Extracts the 11-character id from a YouTube URL
///
/// Recognises `watch?v=ID`, `youtu.be/ID`, `embed/ID` and `v/ID` shapes.
///
/// # Examples
///
/// ```
/// use gathering_site::video::youtube_video_id;
///
/// assert_eq!(
///     youtube_video_id("https://youtu.be/8ZrWV9VETMw?si=ebEPTWWviaHQ4VYV").as_deref(),
///     Some("8ZrWV9VETMw")
/// );
/// assert_eq!(youtube_video_id("https://example.com/video"), None);
/// ```
#[must_use]
pub fn youtube_video_id(url: &str) -> Option<String> {
    YOUTUBE_ID
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_string())
}

/// High-quality thumbnail for a video id
#[must_use]
pub fn thumbnail_url(video_id: &str) -> String {
    format!("https://i.ytimg.com/vi/{video_id}/hqdefault.jpg")
}

/// Embeddable player URL for a video id
#[must_use]
pub fn embed_url(video_id: &str) -> String {
    format!("https://www.youtube.com/embed/{video_id}")
}
