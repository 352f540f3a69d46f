//! Configuration for the `gathering` binary.
//!
//! Loads configuration from environment variables with sensible defaults.
//! A `.env` file is read first when present.

use crate::error::SiteError;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Default tracing filter
pub const DEFAULT_LOG_FILTER: &str = "info,gathering_site=debug,gathering_runtime=debug";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    /// Tracing filter directive (`GATHERING_LOG`)
    pub log_filter: String,
    /// Fixed "now" for event status (`GATHERING_NOW`, RFC 3339); system clock when absent
    pub fixed_now: Option<DateTime<Utc>>,
    /// List sizes used by page builders
    pub display: DisplayConfig,
    /// JSON-lines file of actions to replay at start-up (`GATHERING_ACTIONS`)
    pub actions_file: Option<PathBuf>,
    /// Page to render (`GATHERING_PAGE`)
    pub page: PageSelection,
    /// Search text for listing pages (`GATHERING_SEARCH`)
    pub search: String,
    /// Series chip for the sermon listing (`GATHERING_SERIES_FILTER`)
    pub series_filter: Option<String>,
}

/// List sizes used by page builders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayConfig {
    /// Length of "related" strips on detail pages (`GATHERING_RELATED_LIMIT`, default 3)
    pub related_limit: usize,
    /// Length of "latest" lists on home and admin (`GATHERING_LATEST_LIMIT`, default 3)
    pub latest_limit: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            related_limit: 3,
            latest_limit: 3,
        }
    }
}

/// Which page model the binary prints
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelection {
    /// `home`
    Home,
    /// `sermons`
    Sermons,
    /// `sermon:<id>`
    Sermon(String),
    /// `series`
    SeriesList,
    /// `series:<id>`
    Series(String),
    /// `events`
    Events,
    /// `event:<id>`
    Event(String),
    /// `admin`
    Admin,
}

impl PageSelection {
    /// Parses `home`, `sermons`, `sermon:<id>`, `series`, `series:<id>`,
    /// `events`, `event:<id>` or `admin`
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] for anything else.
    pub fn parse(value: &str) -> Result<Self, SiteError> {
        let value = value.trim();
        let page = match value.split_once(':') {
            None => match value {
                "home" => Self::Home,
                "sermons" => Self::Sermons,
                "series" => Self::SeriesList,
                "events" => Self::Events,
                "admin" => Self::Admin,
                _ => return Err(unknown_page(value)),
            },
            Some((_, "")) => return Err(unknown_page(value)),
            Some(("sermon", id)) => Self::Sermon(id.to_string()),
            Some(("series", id)) => Self::Series(id.to_string()),
            Some(("event", id)) => Self::Event(id.to_string()),
            Some(_) => return Err(unknown_page(value)),
        };
        Ok(page)
    }
}

fn unknown_page(value: &str) -> SiteError {
    SiteError::Config {
        key: "GATHERING_PAGE",
        message: format!("unknown page '{value}'"),
    }
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            fixed_now: None,
            display: DisplayConfig::default(),
            actions_file: None,
            page: PageSelection::Home,
            search: String::new(),
            series_filter: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from the process environment
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] when a variable is set to an unusable value.
    pub fn from_env() -> Result<Self, SiteError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    ///
    /// Empty values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`SiteError::Config`] when a variable is set to an unusable value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SiteError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let fixed_now = get("GATHERING_NOW")
            .map(|value| {
                DateTime::parse_from_rfc3339(value.trim())
                    .map(|instant| instant.with_timezone(&Utc))
                    .map_err(|error| SiteError::Config {
                        key: "GATHERING_NOW",
                        message: format!("expected an RFC 3339 timestamp: {error}"),
                    })
            })
            .transpose()?;

        let display = DisplayConfig {
            related_limit: parse_limit(
                "GATHERING_RELATED_LIMIT",
                get("GATHERING_RELATED_LIMIT"),
                defaults.display.related_limit,
            )?,
            latest_limit: parse_limit(
                "GATHERING_LATEST_LIMIT",
                get("GATHERING_LATEST_LIMIT"),
                defaults.display.latest_limit,
            )?,
        };

        let page = get("GATHERING_PAGE")
            .map(|value| PageSelection::parse(&value))
            .transpose()?
            .unwrap_or(defaults.page);

        Ok(Self {
            log_filter: get("GATHERING_LOG").unwrap_or(defaults.log_filter),
            fixed_now,
            display,
            actions_file: get("GATHERING_ACTIONS").map(PathBuf::from),
            page,
            search: lookup("GATHERING_SEARCH").unwrap_or_default(),
            series_filter: get("GATHERING_SERIES_FILTER"),
        })
    }
}

fn parse_limit(key: &'static str, value: Option<String>, default: usize) -> Result<usize, SiteError> {
    value.map_or(Ok(default), |value| {
        value.trim().parse().map_err(|error| SiteError::Config {
            key,
            message: format!("expected a non-negative integer: {error}"),
        })
    })
}
