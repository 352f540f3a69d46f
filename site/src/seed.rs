//! Initial content loaded at start-up
//!
//! The seed is regenerated identically on every start; nothing is persisted.

use crate::types::{AppState, ChurchSettings, Event, Series, Sermon};
use chrono::{NaiveDate, NaiveTime};

/// Church name shown before any settings change
pub const CHURCH_NAME: &str = "Miracle Fruits Gathering";

/// Livestream URL the site starts with
pub const LIVESTREAM_URL: &str = "https://www.youtube.com/watch?v=live_stream";

const LOGO: &str = "/assets/logo.png";
const SERIES_THUMBNAIL: &str = "/assets/img_pls_02.jpg";
const EVENT_IMAGE: &str = "/assets/img_pls_03.jpg";
const DEFAULT_VIDEO: &str = "https://youtu.be/8ZrWV9VETMw?si=ebEPTWWviaHQ4VYV";
const SAMPLE_VIDEO: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

const GENERATED_SERMONS: usize = 100;
const GENERATED_SERIES: usize = 10;
const SERMONS_PER_SERIES: usize = 10;
const GENERATED_EVENTS: usize = 10;

/// The full initial state
///
/// 3 authored sermons and series (`w1`..`w3`), 100 generated sermons
/// (`1`..`100`), 10 generated series (`1`..`10`), 10 generated events and a
/// running livestream. No user is signed in.
#[must_use]
pub fn seed_state() -> AppState {
    let mut state = AppState::new(ChurchSettings {
        name: CHURCH_NAME.to_string(),
        logo: LOGO.to_string(),
    });

    state.sermons = authored_sermons();
    state.sermons.extend((0..GENERATED_SERMONS).map(generated_sermon));

    state.series = authored_series();
    state.series.extend((0..GENERATED_SERIES).map(generated_series));

    state.events = (0..GENERATED_EVENTS).map(generated_event).collect();

    state.is_livestreaming = true;
    state.livestream_url = Some(LIVESTREAM_URL.to_string());

    state
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

fn authored_sermons() -> Vec<Sermon> {
    vec![
        Sermon {
            id: "w1".to_string(),
            title: "Established In Righteousness".to_string(),
            description:
                "Your position determines your possession. Understanding our identity in Christ."
                    .to_string(),
            video_url: DEFAULT_VIDEO.to_string(),
            podcast_url: Some("https://example.com/podcast/1".to_string()),
            preacher: "Pastor Julius-Cudjoe".to_string(),
            date: date(2024, 1, 15),
            series: Some("Ephesus 8".to_string()),
            tags: tags(&["righteousness", "identity", "position"]),
        },
        Sermon {
            id: "w2".to_string(),
            title: "How to Train and Protect the Heart".to_string(),
            description: "Understanding the heart of man and training it according to God's word."
                .to_string(),
            video_url: SAMPLE_VIDEO.to_string(),
            podcast_url: Some("https://example.com/podcast/2".to_string()),
            preacher: "Prophet Edem Julius-Cudjoe".to_string(),
            date: date(2024, 1, 22),
            series: Some("Heart Training".to_string()),
            tags: tags(&["heart", "training", "protection"]),
        },
        Sermon {
            id: "w3".to_string(),
            title: "Exercising Our Authority in Christ".to_string(),
            description: "Learning to walk in the authority that Christ has given us through prayer and faith."
                .to_string(),
            video_url: SAMPLE_VIDEO.to_string(),
            podcast_url: None,
            preacher: "Pastor Julius-Cudjoe".to_string(),
            date: date(2024, 1, 29),
            series: Some("Prayer Seminar".to_string()),
            tags: tags(&["authority", "prayer", "faith"]),
        },
    ]
}

#[allow(clippy::cast_possible_truncation)] // i < GENERATED_SERMONS
fn generated_sermon(i: usize) -> Sermon {
    let n = i + 1;
    Sermon {
        id: n.to_string(),
        title: format!("Sermon Title {n}"),
        description: format!("Description for Sermon {n}"),
        video_url: DEFAULT_VIDEO.to_string(),
        podcast_url: Some(format!("https://example.com/podcast/{n}")),
        preacher: format!("Preacher {}", i % 5 + 1),
        date: date(2024, 1, (i % 31) as u32 + 1),
        series: Some(format!("Series {}", i / SERMONS_PER_SERIES + 1)),
        tags: vec![format!("tag{}", i % 3 + 1), format!("tag{}", i % 5 + 1)],
    }
}

fn authored_series() -> Vec<Series> {
    let series = |id: &str, title: &str, description: &str, sermon: &str| Series {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        sermons: vec![sermon.to_string()],
        thumbnail: SERIES_THUMBNAIL.to_string(),
    };

    vec![
        series(
            "w1",
            "Ephesus 8",
            "A deep dive into spiritual establishment and righteousness",
            "1",
        ),
        series(
            "w2",
            "Heart Training",
            "Understanding and protecting the heart according to God's design",
            "2",
        ),
        series(
            "w3",
            "Prayer Seminar",
            "Exercising our authority in Christ through prayer",
            "3",
        ),
    ]
}

fn generated_series(i: usize) -> Series {
    let n = i + 1;
    Series {
        id: n.to_string(),
        title: format!("Series {n}"),
        description: format!("Description for Series {n}"),
        sermons: (0..SERMONS_PER_SERIES)
            .map(|j| (i * SERMONS_PER_SERIES + j + 1).to_string())
            .collect(),
        thumbnail: SERIES_THUMBNAIL.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation)] // i < GENERATED_EVENTS
fn generated_event(i: usize) -> Event {
    let n = i + 1;
    Event {
        id: n.to_string(),
        title: format!("Event {n}"),
        description: format!("Description for Event {n}"),
        date: date(2024, n as u32, 15),
        time: NaiveTime::from_hms_opt((i % 12) as u32 + 8, 0, 0).unwrap_or_default(),
        location: format!("Location {n}"),
        image: EVENT_IMAGE.to_string(),
        registration_link: Some(format!("https://example.com/register/{n}")),
        featured: i % 2 == 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn seed_has_expected_counts() {
        let state = seed_state();
        assert_eq!(state.sermons.len(), 103);
        assert_eq!(state.series.len(), 13);
        assert_eq!(state.events.len(), 10);
        assert!(state.is_livestreaming);
        assert_eq!(state.livestream_url.as_deref(), Some(LIVESTREAM_URL));
        assert_eq!(state.church_settings.name, CHURCH_NAME);
        assert!(state.current_user.is_none());
    }

    #[test]
    fn ids_are_unique_per_collection() {
        let state = seed_state();
        let sermon_ids: HashSet<&str> = state.sermons.iter().map(|s| s.id.as_str()).collect();
        let series_ids: HashSet<&str> = state.series.iter().map(|s| s.id.as_str()).collect();
        let event_ids: HashSet<&str> = state.events.iter().map(|e| e.id.as_str()).collect();

        assert_eq!(sermon_ids.len(), state.sermons.len());
        assert_eq!(series_ids.len(), state.series.len());
        assert_eq!(event_ids.len(), state.events.len());
    }

    #[test]
    fn generated_sermon_fields() {
        let state = seed_state();
        let tenth = state.sermons.iter().find(|s| s.id == "10").unwrap();
        assert_eq!(tenth.title, "Sermon Title 10");
        assert_eq!(tenth.preacher, "Preacher 5");
        assert_eq!(tenth.series.as_deref(), Some("Series 1"));
        assert_eq!(tenth.date, NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(tenth.tags, vec!["tag1".to_string(), "tag5".to_string()]);

        let last = state.sermons.iter().find(|s| s.id == "100").unwrap();
        assert_eq!(last.date, NaiveDate::from_ymd_opt(2024, 1, 7).unwrap());
        assert_eq!(last.series.as_deref(), Some("Series 10"));
    }

    #[test]
    fn generated_series_list_ten_ids() {
        let state = seed_state();
        let second = state.series.iter().find(|s| s.id == "2").unwrap();
        let expected: Vec<String> = (11..=20).map(|n| n.to_string()).collect();
        assert_eq!(second.sermons, expected);
    }

    #[test]
    fn event_dates_are_mid_month() {
        let state = seed_state();
        let october = state.events.iter().find(|e| e.id == "10").unwrap();
        assert_eq!(october.date, NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());
        assert_eq!(october.time, NaiveTime::from_hms_opt(17, 0, 0).unwrap());
        assert!(!october.featured);
        assert!(state.events[0].featured);
    }
}
