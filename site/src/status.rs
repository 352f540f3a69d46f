//! Derived event status
//!
//! Status is never stored. It is computed from the event date and an
//! injected `now`, assuming every event lasts [`EVENT_DURATION_HOURS`].

use crate::error::SiteError;
use crate::types::Event;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// How long every event is assumed to run, in hours
pub const EVENT_DURATION_HOURS: i64 = 2;

/// Where an event sits relative to `now`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    /// Not started yet
    Upcoming,
    /// Started, and no more than [`EVENT_DURATION_HOURS`] ago
    Ongoing,
    /// Finished
    Past,
}

impl EventStatus {
    /// Lowercase label used on event cards
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Ongoing => "ongoing",
            Self::Past => "past",
        }
    }
}

/// Parses an event date into its start instant (UTC)
///
/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM[:SS]` and a bare `YYYY-MM-DD`
/// (midnight).
///
/// # Errors
///
/// Returns [`SiteError::InvalidDate`] when no format matches.
pub fn event_start(date_iso: &str) -> Result<DateTime<Utc>, SiteError> {
    let value = date_iso.trim();

    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(midnight_utc)
        .map_err(|source| SiteError::InvalidDate {
            value: date_iso.to_string(),
            source,
        })
}

/// Status of an event starting at `start`, as seen at `now`
///
/// Both ends of the running window are inclusive.
#[must_use]
pub fn status_at(start: DateTime<Utc>, now: DateTime<Utc>) -> EventStatus {
    if now < start {
        EventStatus::Upcoming
    } else if now <= start + Duration::hours(EVENT_DURATION_HOURS) {
        EventStatus::Ongoing
    } else {
        EventStatus::Past
    }
}

/// Status of an event whose date is given as text
///
/// An unparseable date is reported as [`EventStatus::Past`].
#[must_use]
pub fn compute_event_status(date_iso: &str, now: DateTime<Utc>) -> EventStatus {
    match event_start(date_iso) {
        Ok(start) => status_at(start, now),
        Err(error) => {
            tracing::debug!(%error, "Treating unparseable event date as past");
            EventStatus::Past
        }
    }
}

fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

impl Event {
    /// When the event starts: its date at midnight UTC
    ///
    /// The display `time` field does not move the start.
    #[must_use]
    pub fn starts_at(&self) -> DateTime<Utc> {
        midnight_utc(self.date)
    }

    /// Derived status at `now`
    #[must_use]
    pub fn status(&self, now: DateTime<Utc>) -> EventStatus {
        status_at(self.starts_at(), now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(value: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn boundaries_of_the_running_window() {
        let start = at("2024-03-15T00:00:00Z");

        assert_eq!(status_at(start, start), EventStatus::Ongoing);
        assert_eq!(status_at(start, start + Duration::hours(2)), EventStatus::Ongoing);
        assert_eq!(
            status_at(start, start + Duration::hours(2) + Duration::seconds(1)),
            EventStatus::Past
        );
        assert_eq!(
            status_at(start, start - Duration::seconds(1)),
            EventStatus::Upcoming
        );
    }

    #[test]
    fn bare_date_starts_at_midnight() {
        assert_eq!(event_start("2024-03-15").unwrap(), at("2024-03-15T00:00:00Z"));
        assert_eq!(event_start("2024-1-5").unwrap(), at("2024-01-05T00:00:00Z"));
        assert_eq!(
            compute_event_status("2024-03-15", at("2024-03-15T01:59:59Z")),
            EventStatus::Ongoing
        );
    }

    #[test]
    fn accepts_local_and_offset_timestamps() {
        assert_eq!(
            event_start("2024-03-15T18:30").unwrap(),
            at("2024-03-15T18:30:00Z")
        );
        assert_eq!(
            event_start("2024-03-15T18:30:00+02:00").unwrap(),
            at("2024-03-15T16:30:00Z")
        );
    }

    #[test]
    fn unparseable_date_is_past() {
        assert!(matches!(
            event_start("next sunday"),
            Err(SiteError::InvalidDate { .. })
        ));
        assert_eq!(
            compute_event_status("next sunday", at("2000-01-01T00:00:00Z")),
            EventStatus::Past
        );
    }

    #[test]
    fn event_status_ignores_display_time() {
        let event = Event {
            id: "e1".to_string(),
            title: "Night of Worship".to_string(),
            description: "An evening of praise".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            location: "Main Hall".to_string(),
            image: String::new(),
            registration_link: None,
            featured: false,
        };

        assert_eq!(event.status(at("2024-05-31T23:59:59Z")), EventStatus::Upcoming);
        assert_eq!(event.status(at("2024-06-01T01:00:00Z")), EventStatus::Ongoing);
        assert_eq!(event.status(at("2024-06-01T19:00:00Z")), EventStatus::Past);
    }
}
