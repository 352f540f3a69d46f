//! Read-only queries over state snapshots
//!
//! Two relations link sermons and series, and they are kept apart on purpose:
//!
//! - **title relation**: [`Sermon::series`] holds a series *title*. Used for
//!   filter chips, sermon search and prev/next navigation.
//! - **id relation**: [`Series::sermons`] lists sermon *ids*. Used by the
//!   series pages.
//!
//! The reducer maintains neither from the other, so they can disagree.
//! Every query below names the relation it follows.
//!
//! Lookups return `Option`; a miss is an ordinary outcome.

use crate::types::{Event, Series, Sermon};
use chrono::NaiveDate;
use gathering_core::collection;

fn contains_folded(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Sermons matching a search term and, optionally, a series title
///
/// The term matches case-insensitively against title, description, preacher
/// or any tag. A non-empty `series_filter` additionally requires
/// `sermon.series` to equal it exactly (title relation).
#[must_use]
pub fn filter_sermons<'a>(
    sermons: &'a [Sermon],
    search_term: &str,
    series_filter: Option<&str>,
) -> Vec<&'a Sermon> {
    let needle = search_term.to_lowercase();
    let series_filter = series_filter.filter(|title| !title.is_empty());

    sermons
        .iter()
        .filter(|sermon| {
            let matches_search = contains_folded(&sermon.title, &needle)
                || contains_folded(&sermon.description, &needle)
                || contains_folded(&sermon.preacher, &needle)
                || sermon.tags.iter().any(|tag| contains_folded(tag, &needle));

            let matches_series =
                series_filter.is_none_or(|title| sermon.series.as_deref() == Some(title));

            matches_search && matches_series
        })
        .collect()
}

/// Events whose title or description contains the term, case-insensitively
#[must_use]
pub fn filter_events<'a>(events: &'a [Event], search_term: &str) -> Vec<&'a Event> {
    let needle = search_term.to_lowercase();
    events
        .iter()
        .filter(|event| {
            contains_folded(&event.title, &needle) || contains_folded(&event.description, &needle)
        })
        .collect()
}

/// Series whose title or description contains the term, case-insensitively
#[must_use]
pub fn filter_series<'a>(series: &'a [Series], search_term: &str) -> Vec<&'a Series> {
    let needle = search_term.to_lowercase();
    series
        .iter()
        .filter(|entry| {
            contains_folded(&entry.title, &needle) || contains_folded(&entry.description, &needle)
        })
        .collect()
}

/// Sermons listed in `series.sermons`, oldest first (id relation)
///
/// Sorting is stable, so sermons sharing a date keep collection order.
/// Listed ids with no matching sermon are skipped.
#[must_use]
pub fn sermons_in_series<'a>(sermons: &'a [Sermon], series: &Series) -> Vec<&'a Sermon> {
    let mut members: Vec<&Sermon> = sermons
        .iter()
        .filter(|sermon| series.sermons.iter().any(|id| *id == sermon.id))
        .collect();
    members.sort_by_key(|sermon| sermon.date);
    members
}

/// Most recent sermon of [`sermons_in_series`] (id relation)
///
/// On a date tie the sermon that comes first in the collection wins.
#[must_use]
pub fn latest_sermon_for_series<'a>(sermons: &'a [Sermon], series: &Series) -> Option<&'a Sermon> {
    // `max_by_key` keeps the last maximum, so walk the stable sort backwards.
    sermons_in_series(sermons, series)
        .into_iter()
        .rev()
        .max_by_key(|sermon| sermon.date)
}

/// First and last sermon dates of a series (id relation)
#[must_use]
pub fn series_date_range(sermons: &[Sermon], series: &Series) -> Option<(NaiveDate, NaiveDate)> {
    let members = sermons_in_series(sermons, series);
    let first = members.first()?;
    let last = members.last()?;
    Some((first.date, last.date))
}

/// Distinct non-empty `sermon.series` titles, in order of first appearance
#[must_use]
pub fn unique_series_titles(sermons: &[Sermon]) -> Vec<&str> {
    let mut titles: Vec<&str> = Vec::new();
    for title in sermons
        .iter()
        .filter_map(|sermon| sermon.series.as_deref())
        .filter(|title| !title.is_empty())
    {
        if !titles.contains(&title) {
            titles.push(title);
        }
    }
    titles
}

/// Sermons whose `series` equals `title` (title relation), collection order
#[must_use]
pub fn sermons_with_series_title<'a>(sermons: &'a [Sermon], title: &str) -> Vec<&'a Sermon> {
    sermons
        .iter()
        .filter(|sermon| sermon.series.as_deref() == Some(title))
        .collect()
}

/// How many sermons carry `title` as their series (title relation)
#[must_use]
pub fn sermon_count_for_series_title(sermons: &[Sermon], title: &str) -> usize {
    sermons
        .iter()
        .filter(|sermon| sermon.series.as_deref() == Some(title))
        .count()
}

/// The series a sermon's `series` title points at, if one has that title
#[must_use]
pub fn series_by_title<'a>(series: &'a [Series], title: &str) -> Option<&'a Series> {
    series.iter().find(|entry| entry.title == title)
}

/// Previous and next sermon in the same titled series, by collection order
///
/// Both are `None` when the sermon has no series or is not in `sermons`.
#[must_use]
pub fn series_neighbors<'a>(
    sermons: &'a [Sermon],
    sermon: &Sermon,
) -> (Option<&'a Sermon>, Option<&'a Sermon>) {
    let Some(title) = sermon.series.as_deref() else {
        return (None, None);
    };

    let siblings = sermons_with_series_title(sermons, title);
    let Some(position) = siblings.iter().position(|entry| entry.id == sermon.id) else {
        return (None, None);
    };

    let previous = position.checked_sub(1).and_then(|index| siblings.get(index));
    let next = siblings.get(position + 1);
    (previous.copied(), next.copied())
}

/// The first `limit` sermons other than `exclude_id`, in collection order
#[must_use]
pub fn related_sermons<'a>(sermons: &'a [Sermon], exclude_id: &str, limit: usize) -> Vec<&'a Sermon> {
    sermons
        .iter()
        .filter(|sermon| sermon.id != exclude_id)
        .take(limit)
        .collect()
}

/// The first `limit` events other than `exclude_id`, in collection order
#[must_use]
pub fn related_events<'a>(events: &'a [Event], exclude_id: &str, limit: usize) -> Vec<&'a Event> {
    events
        .iter()
        .filter(|event| event.id != exclude_id)
        .take(limit)
        .collect()
}

/// Events flagged for the home page
#[must_use]
pub fn featured_events(events: &[Event]) -> Vec<&Event> {
    events.iter().filter(|event| event.featured).collect()
}

/// The first `limit` sermons in collection order
#[must_use]
pub fn latest_sermons(sermons: &[Sermon], limit: usize) -> Vec<&Sermon> {
    sermons.iter().take(limit).collect()
}

/// Sermon by id
#[must_use]
pub fn find_sermon<'a>(sermons: &'a [Sermon], id: &str) -> Option<&'a Sermon> {
    collection::find(sermons, id)
}

/// Series by id
#[must_use]
pub fn find_series<'a>(series: &'a [Series], id: &str) -> Option<&'a Series> {
    collection::find(series, id)
}

/// Event by id
#[must_use]
pub fn find_event<'a>(events: &'a [Event], id: &str) -> Option<&'a Event> {
    collection::find(events, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_state;

    fn ids<'a>(sermons: &[&'a Sermon]) -> Vec<&'a str> {
        sermons.iter().map(|sermon| sermon.id.as_str()).collect()
    }

    #[test]
    fn series_filter_matches_title_exactly() {
        let state = seed_state();
        let found = filter_sermons(&state.sermons, "", Some("Ephesus 8"));
        assert_eq!(ids(&found), vec!["w1"]);

        assert!(filter_sermons(&state.sermons, "", Some("ephesus 8")).is_empty());
    }

    #[test]
    fn empty_series_filter_is_ignored() {
        let state = seed_state();
        assert_eq!(
            filter_sermons(&state.sermons, "", Some("")).len(),
            state.sermons.len()
        );
    }

    #[test]
    fn search_covers_preacher_and_tags() {
        let state = seed_state();

        let prophet = filter_sermons(&state.sermons, "PROPHET", None);
        assert_eq!(ids(&prophet), vec!["w2"]);

        let tagged = filter_sermons(&state.sermons, "identity", None);
        assert_eq!(ids(&tagged), vec!["w1"]);
    }

    #[test]
    fn search_and_series_are_anded() {
        let state = seed_state();
        let found = filter_sermons(&state.sermons, "Sermon Title 1", Some("Series 2"));
        assert_eq!(ids(&found), vec!["11", "12", "13", "14", "15", "16", "17", "18", "19"]);
    }

    #[test]
    fn event_filter_ignores_location() {
        let state = seed_state();
        assert_eq!(filter_events(&state.events, "event 1").len(), 2);
        assert!(filter_events(&state.events, "Location").is_empty());
    }

    #[test]
    fn series_filter_checks_description() {
        let state = seed_state();
        let found = filter_series(&state.series, "PROTECTING");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "w2");
    }

    #[test]
    fn id_relation_sorts_by_date() {
        let state = seed_state();
        let series = find_series(&state.series, "4").unwrap();

        let members = sermons_in_series(&state.sermons, series);
        assert_eq!(
            ids(&members),
            vec!["32", "33", "34", "35", "36", "37", "38", "39", "40", "31"]
        );

        let latest = latest_sermon_for_series(&state.sermons, series).unwrap();
        assert_eq!(latest.id, "31");

        let (first, last) = series_date_range(&state.sermons, series).unwrap();
        assert_eq!(first, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(last, NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
    }

    #[test]
    fn latest_sermon_tie_goes_to_collection_order() {
        let state = seed_state();
        let mut sermons: Vec<Sermon> = state.sermons[3..5].to_vec();
        let shared = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        for sermon in &mut sermons {
            sermon.date = shared;
        }
        let mut series = find_series(&state.series, "w1").unwrap().clone();

        series.sermons = vec!["1".to_string(), "2".to_string()];
        let latest = latest_sermon_for_series(&sermons, &series).unwrap();
        assert_eq!(latest.id, "1");

        series.sermons = vec!["2".to_string(), "1".to_string()];
        let latest = latest_sermon_for_series(&sermons, &series).unwrap();
        assert_eq!(latest.id, "1");
    }

    #[test]
    fn unknown_ids_in_series_are_skipped() {
        let state = seed_state();
        let mut series = find_series(&state.series, "w1").unwrap().clone();
        series.sermons.push("does-not-exist".to_string());
        assert_eq!(ids(&sermons_in_series(&state.sermons, &series)), vec!["1"]);
    }

    #[test]
    fn unique_titles_keep_first_appearance() {
        let state = seed_state();
        let titles = unique_series_titles(&state.sermons);
        assert_eq!(titles.len(), 13);
        assert_eq!(&titles[..4], &["Ephesus 8", "Heart Training", "Prayer Seminar", "Series 1"]);
    }

    #[test]
    fn neighbors_stay_within_title_series() {
        let state = seed_state();
        let middle = find_sermon(&state.sermons, "15").unwrap();

        let (previous, next) = series_neighbors(&state.sermons, middle);
        assert_eq!(previous.map(|s| s.id.as_str()), Some("14"));
        assert_eq!(next.map(|s| s.id.as_str()), Some("16"));

        let first = find_sermon(&state.sermons, "11").unwrap();
        let (previous, next) = series_neighbors(&state.sermons, first);
        assert!(previous.is_none());
        assert_eq!(next.map(|s| s.id.as_str()), Some("12"));

        let alone = find_sermon(&state.sermons, "w1").unwrap();
        assert_eq!(series_neighbors(&state.sermons, alone), (None, None));
    }

    #[test]
    fn related_skips_excluded_and_limits() {
        let state = seed_state();
        let related = related_sermons(&state.sermons, "w1", 3);
        assert_eq!(ids(&related), vec!["w2", "w3", "1"]);

        let events = related_events(&state.events, "2", 3);
        let event_ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(event_ids, vec!["1", "3", "4"]);
    }

    #[test]
    fn featured_events_are_every_other() {
        let state = seed_state();
        let featured: Vec<&str> = featured_events(&state.events)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(featured, vec!["1", "3", "5", "7", "9"]);
    }

    #[test]
    fn lookups_miss_with_none() {
        let state = seed_state();
        assert!(find_sermon(&state.sermons, "nope").is_none());
        assert!(find_series(&state.series, "nope").is_none());
        assert!(find_event(&state.events, "nope").is_none());
        assert!(series_by_title(&state.series, "Nope").is_none());
        assert_eq!(series_by_title(&state.series, "Ephesus 8").unwrap().id, "w1");
        assert_eq!(sermon_count_for_series_title(&state.sermons, "Series 3"), 10);
    }
}
