//! Domain types for the church site.
//!
//! One [`AppState`] value owns every entity list. Entities are plain data;
//! they change only through [`AppAction`]s applied by the reducer.

use chrono::{NaiveDate, NaiveTime};
use gathering_core::collection::Identified;
use gathering_macros::Action;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};

/// A recorded sermon
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sermon {
    /// Unique identifier
    pub id: String,
    /// Sermon title
    pub title: String,
    /// Short summary
    pub description: String,
    /// Link to the video recording
    pub video_url: String,
    /// Link to the audio podcast, if published
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub podcast_url: Option<String>,
    /// Who preached it
    pub preacher: String,
    /// Calendar date it was preached
    pub date: NaiveDate,
    /// Title of the series it belongs to (a title, not a series id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub series: Option<String>,
    /// Free-form tags; order kept, duplicates allowed
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Identified for Sermon {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A named collection of sermons
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    /// Unique identifier
    pub id: String,
    /// Series title
    pub title: String,
    /// Short summary
    pub description: String,
    /// Ids of the sermons listed under this series.
    ///
    /// Maintained independently of [`Sermon::series`]; the reducer never
    /// rewrites it when sermons change.
    #[serde(default)]
    pub sermons: Vec<String>,
    /// Opaque image reference (URL or embedded data)
    pub thumbnail: String,
}

impl Identified for Series {
    fn id(&self) -> &str {
        &self.id
    }
}

/// A scheduled church event
///
/// An event's status is derived from its date on demand, see
/// [`Event::status`](crate::status).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique identifier
    pub id: String,
    /// Event title
    pub title: String,
    /// Short summary
    pub description: String,
    /// Calendar date of the event
    pub date: NaiveDate,
    /// Start time shown to visitors
    pub time: NaiveTime,
    /// Where it takes place
    pub location: String,
    /// Opaque image reference (URL or embedded data)
    pub image: String,
    /// Sign-up page, if registration is required
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_link: Option<String>,
    /// Shown on the home page
    #[serde(default)]
    pub featured: bool,
}

impl Identified for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Site-wide branding
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChurchSettings {
    /// Church name
    pub name: String,
    /// Opaque logo reference
    pub logo: String,
}

/// Role of the signed-in user
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// May use the admin console
    Admin,
    /// Visitor account
    User,
}

/// The single mock "current user"
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User id
    pub id: String,
    /// Display name
    pub name: String,
    /// Role
    pub role: Role,
}

impl CurrentUser {
    /// Whether this user may use the admin console
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Aggregate root: everything the site shows
///
/// Exactly one value is live at a time, held by the store. Views receive
/// shared snapshots and never keep their own copies of the lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    /// All sermons, in display order
    pub sermons: Vec<Sermon>,
    /// All series, in display order
    pub series: Vec<Series>,
    /// All events, in display order
    pub events: Vec<Event>,
    /// Whether a livestream is on air
    pub is_livestreaming: bool,
    /// Where the livestream can be watched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub livestream_url: Option<String>,
    /// Signed-in user, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_user: Option<CurrentUser>,
    /// Site branding
    pub church_settings: ChurchSettings,
}

impl AppState {
    /// Creates an empty state with the given branding
    #[must_use]
    pub const fn new(church_settings: ChurchSettings) -> Self {
        Self {
            sermons: Vec::new(),
            series: Vec::new(),
            events: Vec::new(),
            is_livestreaming: false,
            livestream_url: None,
            current_user: None,
            church_settings,
        }
    }

    /// Whether the signed-in user is an admin
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.current_user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}

/// Every state transition the site supports
///
/// Serialized as `{"type": "ADD_SERMON", "payload": {...}}`. A `type` the
/// site does not know deserializes to [`AppAction::Unknown`] whatever its
/// payload, and the reducer ignores it.
#[derive(Action, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppAction {
    /// Append a sermon
    #[touches(sermons)]
    AddSermon(Sermon),

    /// Replace every sermon sharing this sermon's id
    #[touches(sermons)]
    UpdateSermon(Sermon),

    /// Remove every sermon with this id
    #[touches(sermons)]
    DeleteSermon(String),

    /// Append a series
    #[touches(series)]
    AddSeries(Series),

    /// Replace every series sharing this series' id
    #[touches(series)]
    UpdateSeries(Series),

    /// Remove every series with this id
    #[touches(series)]
    DeleteSeries(String),

    /// Append an event
    #[touches(events)]
    AddEvent(Event),

    /// Replace every event sharing this event's id
    #[touches(events)]
    UpdateEvent(Event),

    /// Remove every event with this id
    #[touches(events)]
    DeleteEvent(String),

    /// Turn the livestream on or off and set its URL
    #[touches(livestream)]
    SetLivestream {
        /// Whether the stream is on air
        #[serde(rename = "isLive")]
        is_live: bool,
        /// Stream URL; callers clear it when going offline
        #[serde(default, skip_serializing_if = "Option::is_none")]
        url: Option<String>,
    },

    /// Replace the signed-in user
    #[touches(current_user)]
    SetUser(Option<CurrentUser>),

    /// Replace the church branding wholesale
    #[touches(church_settings)]
    UpdateChurchSettings(ChurchSettings),

    /// Any action type this build does not recognise
    Unknown,
}

/// Wire envelope read before the tag is matched
#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: serde_json::Value,
}

#[derive(Deserialize)]
struct LivestreamPayload {
    #[serde(rename = "isLive")]
    is_live: bool,
    #[serde(default)]
    url: Option<String>,
}

fn payload<T, E>(kind: &str, value: serde_json::Value) -> Result<T, E>
where
    T: DeserializeOwned,
    E: de::Error,
{
    serde_json::from_value(value).map_err(|err| E::custom(format!("invalid {kind} payload: {err}")))
}

impl<'de> Deserialize<'de> for AppAction {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Envelope { kind, payload: value } = Envelope::deserialize(deserializer)?;

        let action = match kind.as_str() {
            "ADD_SERMON" => Self::AddSermon(payload(&kind, value)?),
            "UPDATE_SERMON" => Self::UpdateSermon(payload(&kind, value)?),
            "DELETE_SERMON" => Self::DeleteSermon(payload(&kind, value)?),
            "ADD_SERIES" => Self::AddSeries(payload(&kind, value)?),
            "UPDATE_SERIES" => Self::UpdateSeries(payload(&kind, value)?),
            "DELETE_SERIES" => Self::DeleteSeries(payload(&kind, value)?),
            "ADD_EVENT" => Self::AddEvent(payload(&kind, value)?),
            "UPDATE_EVENT" => Self::UpdateEvent(payload(&kind, value)?),
            "DELETE_EVENT" => Self::DeleteEvent(payload(&kind, value)?),
            "SET_LIVESTREAM" => {
                let LivestreamPayload { is_live, url } = payload(&kind, value)?;
                Self::SetLivestream { is_live, url }
            }
            "SET_USER" => Self::SetUser(payload(&kind, value)?),
            "UPDATE_CHURCH_SETTINGS" => Self::UpdateChurchSettings(payload(&kind, value)?),
            _ => {
                tracing::debug!(kind = %kind, "Unrecognised action type");
                Self::Unknown
            }
        };

        Ok(action)
    }
}
