//! # Gathering Site
//!
//! Domain store, page models and admin operations for the Miracle Fruits
//! Gathering church website.
//!
//! ## Structure
//!
//! - [`types`]: sermons, series, events, settings and the [`AppAction`] set
//! - [`reducer`]: [`SiteReducer`], the only place state changes
//! - [`status`]: event status derived from the date and an injected `now`
//! - [`queries`]: filters and lookups over a snapshot
//! - [`views`]: serialisable page models
//! - [`admin`]: validated forms that dispatch into the store
//! - [`video`]: YouTube id extraction for thumbnails and embeds
//!
//! ## Example
//!
//! ```
//! use gathering_site::{AppAction, SiteEnvironment, new_store, queries};
//!
//! let store = new_store(SiteEnvironment::production());
//! store.dispatch(AppAction::DeleteSermon("w1".to_string())).unwrap();
//!
//! let state = store.state();
//! assert!(queries::filter_sermons(&state.sermons, "", Some("Ephesus 8")).is_empty());
//! ```

pub mod admin;
pub mod config;
pub mod error;
pub mod queries;
pub mod reducer;
pub mod replay;
pub mod seed;
pub mod status;
pub mod types;
pub mod video;
pub mod views;

pub use config::{DisplayConfig, PageSelection, SiteConfig};
pub use error::{FieldError, SiteError, ValidationErrors};
pub use reducer::{SiteEnvironment, SiteReducer};
pub use status::{EventStatus, compute_event_status};
pub use types::{AppAction, AppState, ChurchSettings, CurrentUser, Event, Role, Series, Sermon};

use gathering_runtime::Store;

/// The site's store: one per running site, passed to every page and handler
pub type SiteStore = Store<AppState, AppAction, SiteEnvironment, SiteReducer>;

/// Creates the store holding the seed content
#[must_use]
pub fn new_store(environment: SiteEnvironment) -> SiteStore {
    let state = seed::seed_state();
    tracing::debug!(
        sermons = state.sermons.len(),
        series = state.series.len(),
        events = state.events.len(),
        "Seeded site store"
    );
    Store::new(state, SiteReducer::new(), environment)
}
