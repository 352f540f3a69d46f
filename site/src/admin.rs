//! Admin console operations
//!
//! Forms hold raw field text as typed by the admin. Submitting a form
//! validates every field first; only a fully valid form becomes an entity
//! and is dispatched. Each successful operation returns the [`Notice`] the
//! console shows as a toast.

use crate::SiteStore;
use crate::error::{SiteError, ValidationErrors};
use crate::queries;
use crate::types::{AppAction, ChurchSettings, CurrentUser, Event, Role, Series, Sermon};
use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

#[allow(clippy::expect_used)] // Pattern is a literal
static URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:https?|ftp)://[^\s/?#.]+(?:\.[^\s/?#.]+)+(?::\d+)?(?:[/?#]\S*)?$")
        .expect("URL pattern is valid")
});

/// Minimum length of the church name
pub const MIN_CHURCH_NAME_LEN: usize = 2;

/// Toast shown after a successful admin operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    /// Short headline
    pub title: &'static str,
    /// One sentence of detail
    pub description: &'static str,
}

impl Notice {
    const fn new(title: &'static str, description: &'static str) -> Self {
        Self { title, description }
    }
}

fn require(errors: &mut ValidationErrors, field: &'static str, value: &str, message: &str) {
    if value.trim().is_empty() {
        errors.push(field, message);
    }
}

fn is_url(value: &str) -> bool {
    URL.is_match(value.trim())
}

fn optional_url(errors: &mut ValidationErrors, field: &'static str, value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if !is_url(value) {
        errors.push(field, "Invalid URL");
    }
    Some(value.to_string())
}

fn optional_text(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Splits comma-separated tag input, trimming and dropping empties
#[must_use]
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn parse_date(errors: &mut ValidationErrors, value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        errors.push("date", "Date is required");
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| errors.push("date", "Date must be YYYY-MM-DD"))
        .ok()
}

fn parse_time(errors: &mut ValidationErrors, value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    if value.is_empty() {
        errors.push("time", "Time is required");
        return None;
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| errors.push("time", "Time must be HH:MM"))
        .ok()
}

/// Sermon editor fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SermonForm {
    /// Required
    pub title: String,
    /// Required
    pub description: String,
    /// Required, must be a URL
    pub video_url: String,
    /// Optional URL
    pub podcast_url: String,
    /// Required
    pub preacher: String,
    /// Required, `YYYY-MM-DD`
    pub date: String,
    /// Optional series title
    pub series: String,
    /// Comma-separated
    pub tags: String,
}

impl SermonForm {
    /// Prefills the editor from an existing sermon
    #[must_use]
    pub fn from_sermon(sermon: &Sermon) -> Self {
        Self {
            title: sermon.title.clone(),
            description: sermon.description.clone(),
            video_url: sermon.video_url.clone(),
            podcast_url: sermon.podcast_url.clone().unwrap_or_default(),
            preacher: sermon.preacher.clone(),
            date: sermon.date.format("%Y-%m-%d").to_string(),
            series: sermon.series.clone().unwrap_or_default(),
            tags: sermon.tags.join(", "),
        }
    }

    /// Validates every field and builds the sermon
    ///
    /// `id` is only called once every field is valid.
    ///
    /// # Errors
    ///
    /// Returns all field errors found.
    pub fn to_sermon(&self, id: impl FnOnce() -> String) -> Result<Sermon, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "title", &self.title, "Title is required");
        require(&mut errors, "description", &self.description, "Description is required");
        if self.video_url.trim().is_empty() {
            errors.push("videoUrl", "Video URL is required");
        } else if !is_url(&self.video_url) {
            errors.push("videoUrl", "Invalid URL");
        }
        let podcast_url = optional_url(&mut errors, "podcastUrl", &self.podcast_url);
        require(&mut errors, "preacher", &self.preacher, "Preacher is required");
        let date = parse_date(&mut errors, &self.date);

        match date {
            Some(date) if errors.is_empty() => Ok(Sermon {
                id: id(),
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                video_url: self.video_url.trim().to_string(),
                podcast_url,
                preacher: self.preacher.trim().to_string(),
                date,
                series: optional_text(&self.series),
                tags: parse_tags(&self.tags),
            }),
            _ => Err(errors),
        }
    }
}

/// Series editor fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesForm {
    /// Required
    pub title: String,
    /// Required
    pub description: String,
    /// Required image reference
    pub thumbnail: String,
}

impl SeriesForm {
    /// Prefills the editor from an existing series
    #[must_use]
    pub fn from_series(series: &Series) -> Self {
        Self {
            title: series.title.clone(),
            description: series.description.clone(),
            thumbnail: series.thumbnail.clone(),
        }
    }

    /// Validates every field and builds the series with the given sermon ids
    ///
    /// # Errors
    ///
    /// Returns all field errors found.
    pub fn to_series(
        &self,
        id: impl FnOnce() -> String,
        sermons: Vec<String>,
    ) -> Result<Series, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        require(&mut errors, "title", &self.title, "Title is required");
        require(&mut errors, "description", &self.description, "Description is required");
        require(&mut errors, "thumbnail", &self.thumbnail, "Thumbnail is required");
        errors.into_result()?;

        Ok(Series {
            id: id(),
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            sermons,
            thumbnail: self.thumbnail.clone(),
        })
    }
}

/// Event editor fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EventForm {
    /// Required
    pub title: String,
    /// Required
    pub description: String,
    /// Required, `YYYY-MM-DD`
    pub date: String,
    /// Required, `HH:MM`
    pub time: String,
    /// Required
    pub location: String,
    /// Required image reference
    pub image: String,
    /// Optional URL
    pub registration_link: String,
    /// Show on the home page
    pub featured: bool,
}

impl EventForm {
    /// Prefills the editor from an existing event
    #[must_use]
    pub fn from_event(event: &Event) -> Self {
        Self {
            title: event.title.clone(),
            description: event.description.clone(),
            date: event.date.format("%Y-%m-%d").to_string(),
            time: event.time.format("%H:%M").to_string(),
            location: event.location.clone(),
            image: event.image.clone(),
            registration_link: event.registration_link.clone().unwrap_or_default(),
            featured: event.featured,
        }
    }

    /// Validates every field and builds the event
    ///
    /// # Errors
    ///
    /// Returns all field errors found.
    pub fn to_event(&self, id: impl FnOnce() -> String) -> Result<Event, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        require(&mut errors, "title", &self.title, "Title is required");
        require(&mut errors, "description", &self.description, "Description is required");
        let date = parse_date(&mut errors, &self.date);
        let time = parse_time(&mut errors, &self.time);
        require(&mut errors, "location", &self.location, "Location is required");
        require(&mut errors, "image", &self.image, "Image is required");
        let registration_link = optional_url(&mut errors, "registrationLink", &self.registration_link);

        match (date, time) {
            (Some(date), Some(time)) if errors.is_empty() => Ok(Event {
                id: id(),
                title: self.title.trim().to_string(),
                description: self.description.trim().to_string(),
                date,
                time,
                location: self.location.trim().to_string(),
                image: self.image.clone(),
                registration_link,
                featured: self.featured,
            }),
            _ => Err(errors),
        }
    }
}

/// Site settings fields
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsForm {
    /// Required, at least two characters
    pub name: String,
    /// Required image reference
    pub logo: String,
}

impl SettingsForm {
    /// Prefills the form from the current settings
    #[must_use]
    pub fn from_settings(settings: &ChurchSettings) -> Self {
        Self {
            name: settings.name.clone(),
            logo: settings.logo.clone(),
        }
    }

    /// Validates every field and builds the settings
    ///
    /// # Errors
    ///
    /// Returns all field errors found.
    pub fn to_settings(&self) -> Result<ChurchSettings, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = self.name.trim();
        if name.is_empty() {
            errors.push("name", "Church name is required");
        } else if name.chars().count() < MIN_CHURCH_NAME_LEN {
            errors.push("name", "Name must be at least 2 characters");
        }
        require(&mut errors, "logo", &self.logo, "Church logo is required");
        errors.into_result()?;

        Ok(ChurchSettings {
            name: name.to_string(),
            logo: self.logo.clone(),
        })
    }
}

/// Creates a sermon, or updates the one with id `editing`
///
/// # Errors
///
/// Returns [`SiteError::Validation`] without dispatching when a field is
/// invalid, or [`SiteError::Store`] if the store rejects the dispatch.
pub fn submit_sermon(
    store: &SiteStore,
    form: &SermonForm,
    editing: Option<&str>,
) -> Result<Notice, SiteError> {
    let (sermon, notice) = match editing {
        Some(id) => (
            form.to_sermon(|| id.to_string())?,
            Notice::new("Sermon updated", "The sermon has been successfully updated."),
        ),
        None => (
            form.to_sermon(|| store.environment().next_id())?,
            Notice::new("Sermon created", "The new sermon has been successfully created."),
        ),
    };
    tracing::info!(sermon_id = %sermon.id, update = editing.is_some(), "Saving sermon");

    let action = if editing.is_some() {
        AppAction::UpdateSermon(sermon)
    } else {
        AppAction::AddSermon(sermon)
    };
    store.dispatch(action)?;
    Ok(notice)
}

/// Creates a series, or updates the one with id `editing`
///
/// An edited series keeps its sermon id list; a new one starts empty.
///
/// # Errors
///
/// Returns [`SiteError::Validation`] without dispatching when a field is
/// invalid, or [`SiteError::Store`] if the store rejects the dispatch.
pub fn submit_series(
    store: &SiteStore,
    form: &SeriesForm,
    editing: Option<&str>,
) -> Result<Notice, SiteError> {
    let (series, notice, action): (Series, Notice, fn(Series) -> AppAction) = match editing {
        Some(id) => {
            let sermons = queries::find_series(&store.state().series, id)
                .map(|existing| existing.sermons.clone())
                .unwrap_or_default();
            (
                form.to_series(|| id.to_string(), sermons)?,
                Notice::new("Series updated", "The series has been successfully updated."),
                AppAction::UpdateSeries,
            )
        }
        None => (
            form.to_series(|| store.environment().next_id(), Vec::new())?,
            Notice::new("Series created", "The new series has been successfully created."),
            AppAction::AddSeries,
        ),
    };

    tracing::info!(series_id = %series.id, update = editing.is_some(), "Saving series");
    store.dispatch(action(series))?;
    Ok(notice)
}

/// Creates an event, or updates the one with id `editing`
///
/// # Errors
///
/// Returns [`SiteError::Validation`] without dispatching when a field is
/// invalid, or [`SiteError::Store`] if the store rejects the dispatch.
pub fn submit_event(
    store: &SiteStore,
    form: &EventForm,
    editing: Option<&str>,
) -> Result<Notice, SiteError> {
    let action = match editing {
        Some(id) => AppAction::UpdateEvent(form.to_event(|| id.to_string())?),
        None => AppAction::AddEvent(form.to_event(|| store.environment().next_id())?),
    };
    tracing::info!(update = editing.is_some(), "Saving event");
    store.dispatch(action)?;

    Ok(if editing.is_some() {
        Notice::new("Event Updated", "The event has been successfully updated.")
    } else {
        Notice::new("Event Added", "The new event has been successfully added.")
    })
}

/// Replaces the church settings
///
/// # Errors
///
/// Returns [`SiteError::Validation`] without dispatching when a field is
/// invalid, or [`SiteError::Store`] if the store rejects the dispatch.
pub fn submit_settings(store: &SiteStore, form: &SettingsForm) -> Result<Notice, SiteError> {
    let settings = form.to_settings()?;
    tracing::info!(name = %settings.name, "Updating church settings");
    store.dispatch(AppAction::UpdateChurchSettings(settings))?;
    Ok(Notice::new(
        "Settings Updated",
        "Church settings have been successfully updated.",
    ))
}

/// Starts or stops the livestream
///
/// Going live publishes `url` (when non-empty); going offline clears it.
///
/// # Errors
///
/// Returns [`SiteError::Store`] if the store rejects the dispatch.
pub fn toggle_livestream(store: &SiteStore, is_live: bool, url: &str) -> Result<Notice, SiteError> {
    let url = if is_live { optional_text(url) } else { None };
    tracing::info!(is_live, url = url.as_deref().unwrap_or("-"), "Toggling livestream");
    store.dispatch(AppAction::SetLivestream { is_live, url })?;

    Ok(if is_live {
        Notice::new("Livestream started", "Your church is now live streaming!")
    } else {
        Notice::new("Livestream stopped", "The livestream has been stopped.")
    })
}

/// Changes the stream URL without changing whether the stream is live
///
/// An empty `url` is ignored and yields `None`.
///
/// # Errors
///
/// Returns [`SiteError::Store`] if the store rejects the dispatch.
pub fn update_livestream_url(store: &SiteStore, url: &str) -> Result<Option<Notice>, SiteError> {
    let Some(url) = optional_text(url) else {
        return Ok(None);
    };
    let is_live = store.state().is_livestreaming;
    store.dispatch(AppAction::SetLivestream {
        is_live,
        url: Some(url),
    })?;
    Ok(Some(Notice::new(
        "Stream URL updated",
        "The livestream URL has been successfully updated.",
    )))
}

/// Signs in the mock admin user if nobody is signed in
///
/// Returns whether a user was set.
///
/// # Errors
///
/// Returns [`SiteError::Store`] if the store rejects the dispatch.
pub fn ensure_admin_session(store: &SiteStore) -> Result<bool, SiteError> {
    if store.state().current_user.is_some() {
        return Ok(false);
    }
    store.dispatch(AppAction::SetUser(Some(CurrentUser {
        id: "1".to_string(),
        name: "Admin User".to_string(),
        role: Role::Admin,
    })))?;
    tracing::debug!("Mock admin session started");
    Ok(true)
}

/// Deletes every sermon with `id`
///
/// # Errors
///
/// Returns [`SiteError::Store`] if the store rejects the dispatch.
pub fn delete_sermon(store: &SiteStore, id: &str) -> Result<Notice, SiteError> {
    store.dispatch(AppAction::DeleteSermon(id.to_string()))?;
    Ok(Notice::new("Sermon deleted", "The sermon has been successfully deleted."))
}

/// Deletes every series with `id`
///
/// # Errors
///
/// Returns [`SiteError::Store`] if the store rejects the dispatch.
pub fn delete_series(store: &SiteStore, id: &str) -> Result<Notice, SiteError> {
    store.dispatch(AppAction::DeleteSeries(id.to_string()))?;
    Ok(Notice::new("Series deleted", "The series has been successfully deleted."))
}

/// Deletes every event with `id`
///
/// # Errors
///
/// Returns [`SiteError::Store`] if the store rejects the dispatch.
pub fn delete_event(store: &SiteStore, id: &str) -> Result<Notice, SiteError> {
    store.dispatch(AppAction::DeleteEvent(id.to_string()))?;
    Ok(Notice::new("Event Deleted", "The event has been successfully deleted."))
}
