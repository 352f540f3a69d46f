//! The site reducer
//!
//! Every state change the site makes goes through [`SiteReducer::reduce`].
//! It copies the touched collection, applies the action and hands back a new
//! snapshot. The previous snapshot stays valid for anyone still holding it.

use crate::config::SiteConfig;
use crate::types::{AppAction, AppState};
use chrono::{DateTime, Utc};
use gathering_core::collection::{appended, removed, replaced};
use gathering_core::environment::{Clock, IdGenerator, SystemClock, UuidGenerator};
use gathering_core::reducer::Reducer;
use std::sync::Arc;

/// Injected dependencies for the site
///
/// The reducer never reads them; they exist for page builders (the clock for
/// event status) and admin forms (fresh ids).
#[derive(Clone)]
pub struct SiteEnvironment {
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl SiteEnvironment {
    /// Creates an environment from a clock and an id source
    pub fn new(clock: impl Clock + 'static, ids: impl IdGenerator + 'static) -> Self {
        Self {
            clock: Arc::new(clock),
            ids: Arc::new(ids),
        }
    }

    /// System clock and random UUIDs
    #[must_use]
    pub fn production() -> Self {
        Self::new(SystemClock, UuidGenerator)
    }

    /// Environment described by the configuration
    ///
    /// A configured fixed time replaces the system clock; ids are UUIDs.
    #[must_use]
    pub fn from_config(config: &SiteConfig) -> Self {
        match config.fixed_now {
            Some(now) => Self::new(PinnedClock(now), UuidGenerator),
            None => Self::production(),
        }
    }

    /// Current time according to the injected clock
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// A fresh entity id
    #[must_use]
    pub fn next_id(&self) -> String {
        self.ids.next_id()
    }
}

impl std::fmt::Debug for SiteEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteEnvironment")
            .field("now", &self.now())
            .finish_non_exhaustive()
    }
}

/// Clock stopped at a configured instant
#[derive(Debug, Clone, Copy)]
struct PinnedClock(DateTime<Utc>);

impl Clock for PinnedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Reducer for [`AppState`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteReducer;

impl SiteReducer {
    /// Creates the reducer
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Reducer for SiteReducer {
    type State = AppState;
    type Action = AppAction;
    type Environment = SiteEnvironment;

    fn reduce(
        &self,
        state: &Arc<AppState>,
        action: AppAction,
        _env: &SiteEnvironment,
    ) -> Arc<AppState> {
        let mut next = AppState::clone(state);

        match action {
            AppAction::AddSermon(sermon) => {
                next.sermons = appended(&state.sermons, sermon);
            }
            AppAction::UpdateSermon(sermon) => {
                next.sermons = replaced(&state.sermons, &sermon);
            }
            AppAction::DeleteSermon(id) => {
                next.sermons = removed(&state.sermons, &id);
            }

            AppAction::AddSeries(series) => {
                next.series = appended(&state.series, series);
            }
            AppAction::UpdateSeries(series) => {
                next.series = replaced(&state.series, &series);
            }
            AppAction::DeleteSeries(id) => {
                next.series = removed(&state.series, &id);
            }

            AppAction::AddEvent(event) => {
                next.events = appended(&state.events, event);
            }
            AppAction::UpdateEvent(event) => {
                next.events = replaced(&state.events, &event);
            }
            AppAction::DeleteEvent(id) => {
                next.events = removed(&state.events, &id);
            }

            AppAction::SetLivestream { is_live, url } => {
                next.is_livestreaming = is_live;
                next.livestream_url = url;
            }
            AppAction::SetUser(user) => {
                next.current_user = user;
            }
            AppAction::UpdateChurchSettings(settings) => {
                next.church_settings = settings;
            }

            AppAction::Unknown => return Arc::clone(state),
        }

        Arc::new(next)
    }
}
