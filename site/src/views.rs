//! Page models
//!
//! Each builder reads one state snapshot and returns a serialisable model
//! that borrows from it. Pages never copy the entity lists.
//!
//! Detail builders return `None` when the id is unknown; the page shows its
//! "not found" fallback in that case.

use crate::config::DisplayConfig;
use crate::queries;
use crate::status::EventStatus;
use crate::types::{AppState, Event, Series, Sermon};
use crate::video;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

/// A sermon with its derived video data
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonCard<'a> {
    /// The sermon itself
    #[serde(flatten)]
    pub sermon: &'a Sermon,
    /// YouTube id parsed from the video URL
    pub video_id: Option<String>,
    /// Thumbnail URL, when a video id was found
    pub thumbnail_url: Option<String>,
}

impl<'a> SermonCard<'a> {
    fn new(sermon: &'a Sermon) -> Self {
        let video_id = video::youtube_video_id(&sermon.video_url);
        let thumbnail_url = video_id.as_deref().map(video::thumbnail_url);
        Self {
            sermon,
            video_id,
            thumbnail_url,
        }
    }
}

fn cards<'a>(sermons: impl IntoIterator<Item = &'a Sermon>) -> Vec<SermonCard<'a>> {
    sermons.into_iter().map(SermonCard::new).collect()
}

/// An event with its status at page-build time
#[derive(Debug, Clone, Serialize)]
pub struct EventCard<'a> {
    /// The event itself
    #[serde(flatten)]
    pub event: &'a Event,
    /// Derived status
    pub status: EventStatus,
}

impl<'a> EventCard<'a> {
    fn new(event: &'a Event, now: DateTime<Utc>) -> Self {
        Self {
            event,
            status: event.status(now),
        }
    }
}

fn event_cards<'a>(
    events: impl IntoIterator<Item = &'a Event>,
    now: DateTime<Utc>,
) -> Vec<EventCard<'a>> {
    events
        .into_iter()
        .map(|event| EventCard::new(event, now))
        .collect()
}

/// "We're live" banner
#[derive(Debug, Clone, Serialize)]
pub struct LiveBanner<'a> {
    /// Where to watch
    pub url: Option<&'a str>,
}

fn live_banner(state: &AppState) -> Option<LiveBanner<'_>> {
    state.is_livestreaming.then(|| LiveBanner {
        url: state.livestream_url.as_deref(),
    })
}

/// Home page
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage<'a> {
    /// Church name for the hero section
    pub church_name: &'a str,
    /// Shown only while live
    pub livestream: Option<LiveBanner<'a>>,
    /// Most recent sermons
    pub latest_sermons: Vec<SermonCard<'a>>,
    /// Featured events
    pub featured_events: Vec<EventCard<'a>>,
}

/// Builds the home page
#[must_use]
pub fn home_page<'a>(
    state: &'a AppState,
    now: DateTime<Utc>,
    display: &DisplayConfig,
) -> HomePage<'a> {
    HomePage {
        church_name: &state.church_settings.name,
        livestream: live_banner(state),
        latest_sermons: cards(queries::latest_sermons(&state.sermons, display.latest_limit)),
        featured_events: event_cards(queries::featured_events(&state.events), now),
    }
}

/// Sermon listing with search box and series chips
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonListPage<'a> {
    /// Current search text
    pub search_term: String,
    /// Selected series chip, if any
    pub series_filter: Option<String>,
    /// All chips, in first-appearance order
    pub series_titles: Vec<&'a str>,
    /// Matching sermons
    pub sermons: Vec<SermonCard<'a>>,
    /// Number of matches
    pub total: usize,
}

/// Builds the sermon listing
#[must_use]
pub fn sermon_list_page<'a>(
    state: &'a AppState,
    search_term: &str,
    series_filter: Option<&str>,
) -> SermonListPage<'a> {
    let sermons = cards(queries::filter_sermons(&state.sermons, search_term, series_filter));
    SermonListPage {
        search_term: search_term.to_string(),
        series_filter: series_filter.map(ToString::to_string),
        series_titles: queries::unique_series_titles(&state.sermons),
        total: sermons.len(),
        sermons,
    }
}

/// Sermon detail with player and navigation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SermonDetailPage<'a> {
    /// The sermon with its video data
    pub sermon: SermonCard<'a>,
    /// Player URL
    pub embed_url: Option<String>,
    /// Id of the series the sermon's title links to
    pub series_id: Option<&'a str>,
    /// Previous sermon in the same titled series
    pub previous: Option<&'a Sermon>,
    /// Next sermon in the same titled series
    pub next: Option<&'a Sermon>,
    /// "More sermons" strip
    pub related: Vec<SermonCard<'a>>,
}

/// Builds the sermon detail page, or `None` for an unknown id
#[must_use]
pub fn sermon_detail_page<'a>(
    state: &'a AppState,
    id: &str,
    display: &DisplayConfig,
) -> Option<SermonDetailPage<'a>> {
    let sermon = queries::find_sermon(&state.sermons, id)?;
    let card = SermonCard::new(sermon);
    let (previous, next) = queries::series_neighbors(&state.sermons, sermon);

    Some(SermonDetailPage {
        embed_url: card.video_id.as_deref().map(video::embed_url),
        series_id: sermon
            .series
            .as_deref()
            .and_then(|title| queries::series_by_title(&state.series, title))
            .map(|series| series.id.as_str()),
        previous,
        next,
        related: cards(queries::related_sermons(
            &state.sermons,
            &sermon.id,
            display.related_limit,
        )),
        sermon: card,
    })
}

/// One series tile
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesCard<'a> {
    /// The series itself
    #[serde(flatten)]
    pub series: &'a Series,
    /// Newest sermon from the id list
    pub latest_sermon: Option<SermonCard<'a>>,
}

/// Series listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesListPage<'a> {
    /// Current search text
    pub search_term: String,
    /// Matching series
    pub series: Vec<SeriesCard<'a>>,
}

/// Builds the series listing
#[must_use]
pub fn series_list_page<'a>(state: &'a AppState, search_term: &str) -> SeriesListPage<'a> {
    SeriesListPage {
        search_term: search_term.to_string(),
        series: queries::filter_series(&state.series, search_term)
            .into_iter()
            .map(|series| SeriesCard {
                series,
                latest_sermon: queries::latest_sermon_for_series(&state.sermons, series)
                    .map(SermonCard::new),
            })
            .collect(),
    }
}

/// First and last sermon dates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    /// Oldest sermon date
    pub first: NaiveDate,
    /// Newest sermon date
    pub last: NaiveDate,
}

/// Series detail
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesDetailPage<'a> {
    /// The series itself
    pub series: &'a Series,
    /// Listed sermons, oldest first
    pub sermons: Vec<SermonCard<'a>>,
    /// Span of the listed sermons
    pub date_range: Option<DateRange>,
}

/// Builds the series detail page, or `None` for an unknown id
#[must_use]
pub fn series_detail_page<'a>(state: &'a AppState, id: &str) -> Option<SeriesDetailPage<'a>> {
    let series = queries::find_series(&state.series, id)?;
    Some(SeriesDetailPage {
        series,
        sermons: cards(queries::sermons_in_series(&state.sermons, series)),
        date_range: queries::series_date_range(&state.sermons, series)
            .map(|(first, last)| DateRange { first, last }),
    })
}

/// Event listing
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventListPage<'a> {
    /// Current search text
    pub search_term: String,
    /// Matching events
    pub events: Vec<EventCard<'a>>,
}

/// Builds the event listing
#[must_use]
pub fn event_list_page<'a>(
    state: &'a AppState,
    search_term: &str,
    now: DateTime<Utc>,
) -> EventListPage<'a> {
    EventListPage {
        search_term: search_term.to_string(),
        events: event_cards(queries::filter_events(&state.events, search_term), now),
    }
}

/// Event detail
#[derive(Debug, Clone, Serialize)]
pub struct EventDetailPage<'a> {
    /// The event with its status
    pub event: EventCard<'a>,
    /// "Other events" strip
    pub related: Vec<EventCard<'a>>,
}

/// Builds the event detail page, or `None` for an unknown id
#[must_use]
pub fn event_detail_page<'a>(
    state: &'a AppState,
    id: &str,
    now: DateTime<Utc>,
    display: &DisplayConfig,
) -> Option<EventDetailPage<'a>> {
    let event = queries::find_event(&state.events, id)?;
    Some(EventDetailPage {
        event: EventCard::new(event, now),
        related: event_cards(
            queries::related_events(&state.events, &event.id, display.related_limit),
            now,
        ),
    })
}

/// Series row on the admin console
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSeriesRow<'a> {
    /// The series itself
    pub series: &'a Series,
    /// Sermons whose series title equals this series' title
    pub sermon_count: usize,
}

/// Admin console overview
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard<'a> {
    /// Number of sermons
    pub sermon_count: usize,
    /// Number of series
    pub series_count: usize,
    /// Number of events
    pub event_count: usize,
    /// Whether the stream is on air
    pub is_livestreaming: bool,
    /// Current stream URL
    pub livestream_url: Option<&'a str>,
    /// Most recent sermons
    pub recent_sermons: Vec<&'a Sermon>,
    /// Most recent events
    pub recent_events: Vec<EventCard<'a>>,
    /// Every series with its title-relation sermon count
    pub series: Vec<AdminSeriesRow<'a>>,
}

/// Builds the admin dashboard
#[must_use]
pub fn admin_dashboard<'a>(
    state: &'a AppState,
    now: DateTime<Utc>,
    display: &DisplayConfig,
) -> AdminDashboard<'a> {
    AdminDashboard {
        sermon_count: state.sermons.len(),
        series_count: state.series.len(),
        event_count: state.events.len(),
        is_livestreaming: state.is_livestreaming,
        livestream_url: state.livestream_url.as_deref(),
        recent_sermons: queries::latest_sermons(&state.sermons, display.latest_limit),
        recent_events: event_cards(state.events.iter().take(display.latest_limit), now),
        series: state
            .series
            .iter()
            .map(|series| AdminSeriesRow {
                series,
                sermon_count: queries::sermon_count_for_series_title(&state.sermons, &series.title),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_state;

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-15T01:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn home_shows_banner_latest_and_featured() {
        let state = seed_state();
        let page = home_page(&state, now(), &DisplayConfig::default());

        assert_eq!(page.church_name, "Miracle Fruits Gathering");
        assert!(page.livestream.is_some());
        assert_eq!(page.latest_sermons.len(), 3);
        assert_eq!(page.latest_sermons[0].video_id.as_deref(), Some("8ZrWV9VETMw"));
        assert_eq!(page.featured_events.len(), 5);

        let may = page
            .featured_events
            .iter()
            .find(|card| card.event.id == "5")
            .unwrap();
        assert_eq!(may.status, EventStatus::Ongoing);
        assert_eq!(page.featured_events[0].status, EventStatus::Past);
        assert_eq!(page.featured_events[4].status, EventStatus::Upcoming);
    }

    #[test]
    fn home_hides_banner_when_offline() {
        let mut state = seed_state();
        state.is_livestreaming = false;
        let page = home_page(&state, now(), &DisplayConfig::default());
        assert!(page.livestream.is_none());
    }

    #[test]
    fn sermon_list_counts_matches() {
        let state = seed_state();
        let page = sermon_list_page(&state, "faith", None);
        assert_eq!(page.total, 1);
        assert_eq!(page.sermons[0].sermon.id, "w3");
        assert_eq!(page.series_titles.len(), 13);
    }

    #[test]
    fn sermon_detail_links_series_by_title() {
        let state = seed_state();
        let page = sermon_detail_page(&state, "w1", &DisplayConfig::default()).unwrap();

        assert_eq!(page.series_id, Some("w1"));
        assert_eq!(
            page.embed_url.as_deref(),
            Some("https://www.youtube.com/embed/8ZrWV9VETMw")
        );
        assert!(page.previous.is_none());
        assert!(page.next.is_none());
        let related: Vec<&str> = page.related.iter().map(|c| c.sermon.id.as_str()).collect();
        assert_eq!(related, vec!["w2", "w3", "1"]);
    }

    #[test]
    fn detail_pages_miss_with_none() {
        let state = seed_state();
        let display = DisplayConfig::default();
        assert!(sermon_detail_page(&state, "missing", &display).is_none());
        assert!(series_detail_page(&state, "missing").is_none());
        assert!(event_detail_page(&state, "missing", now(), &display).is_none());
    }

    #[test]
    fn series_detail_follows_id_list() {
        let state = seed_state();
        let page = series_detail_page(&state, "w1").unwrap();

        let ids: Vec<&str> = page.sermons.iter().map(|c| c.sermon.id.as_str()).collect();
        assert_eq!(ids, vec!["1"]);
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(page.date_range, Some(DateRange { first: day, last: day }));
    }

    #[test]
    fn series_list_carries_latest_sermon() {
        let state = seed_state();
        let page = series_list_page(&state, "heart");
        assert_eq!(page.series.len(), 1);
        let latest = page.series[0].latest_sermon.as_ref().unwrap();
        assert_eq!(latest.sermon.id, "2");
    }

    #[test]
    fn event_pages_derive_status() {
        let state = seed_state();
        let display = DisplayConfig::default();

        let list = event_list_page(&state, "", now());
        assert_eq!(list.events.len(), 10);

        let detail = event_detail_page(&state, "6", now(), &display).unwrap();
        assert_eq!(detail.event.status, EventStatus::Upcoming);
        assert_eq!(detail.related.len(), 3);
    }

    #[test]
    fn dashboard_counts_by_title_relation() {
        let state = seed_state();
        let dashboard = admin_dashboard(&state, now(), &DisplayConfig::default());

        assert_eq!(dashboard.sermon_count, 103);
        assert_eq!(dashboard.series_count, 13);
        assert_eq!(dashboard.event_count, 10);
        assert_eq!(dashboard.recent_sermons.len(), 3);
        assert_eq!(dashboard.recent_events.len(), 3);

        let ephesus = dashboard
            .series
            .iter()
            .find(|row| row.series.id == "w1")
            .unwrap();
        assert_eq!(ephesus.sermon_count, 1);
    }

    #[test]
    fn event_card_serializes_flat_with_status() {
        let state = seed_state();
        let card = EventCard::new(&state.events[0], now());
        let json = serde_json::to_value(&card).unwrap();
        assert_eq!(json["title"], "Event 1");
        assert_eq!(json["status"], "past");
        assert_eq!(json["registrationLink"], "https://example.com/register/1");
    }
}
