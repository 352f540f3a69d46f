//! `gathering`: builds the site store and prints one page model as JSON.
//!
//! Configuration comes from `GATHERING_*` environment variables (see
//! [`SiteConfig`]). An optional action log is replayed before rendering.

use anyhow::Context;
use gathering_site::{
    PageSelection, SiteConfig, SiteEnvironment, SiteStore, new_store, replay, views,
};
use std::fs::File;
use std::io::{BufReader, Write};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    let config = SiteConfig::from_env().context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Ok(path) = dotenv {
        info!(path = %path.display(), "Loaded .env file");
    }

    gathering_runtime::metrics::register_metrics();

    let store = new_store(SiteEnvironment::from_config(&config));
    store
        .subscribe(|action, state| {
            use gathering_core::action::Action as _;
            tracing::debug!(
                action = action.name(),
                sermons = state.sermons.len(),
                live = state.is_livestreaming,
                "State changed"
            );
        })
        .context("Failed to subscribe state logger")?;

    if let Some(path) = &config.actions_file {
        let file = File::open(path)
            .with_context(|| format!("Failed to open action log {}", path.display()))?;
        let actions = replay::read_actions(BufReader::new(file))?;
        replay::replay(&store, actions)?;
    }

    let json = render(&store, &config)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;

    Ok(())
}

fn render(store: &SiteStore, config: &SiteConfig) -> anyhow::Result<String> {
    let state = store.state();
    let now = store.environment().now();
    let display = &config.display;
    let search = config.search.as_str();
    info!(page = ?config.page, %now, "Rendering page");

    let json = match &config.page {
        PageSelection::Home => serde_json::to_string_pretty(&views::home_page(&state, now, display)),
        PageSelection::Sermons => serde_json::to_string_pretty(&views::sermon_list_page(
            &state,
            search,
            config.series_filter.as_deref(),
        )),
        PageSelection::Sermon(id) => serde_json::to_string_pretty(
            &views::sermon_detail_page(&state, id, display)
                .with_context(|| format!("Sermon '{id}' not found"))?,
        ),
        PageSelection::SeriesList => {
            serde_json::to_string_pretty(&views::series_list_page(&state, search))
        }
        PageSelection::Series(id) => serde_json::to_string_pretty(
            &views::series_detail_page(&state, id)
                .with_context(|| format!("Series '{id}' not found"))?,
        ),
        PageSelection::Events => {
            serde_json::to_string_pretty(&views::event_list_page(&state, search, now))
        }
        PageSelection::Event(id) => serde_json::to_string_pretty(
            &views::event_detail_page(&state, id, now, display)
                .with_context(|| format!("Event '{id}' not found"))?,
        ),
        PageSelection::Admin => {
            gathering_site::admin::ensure_admin_session(store)?;
            let state = store.state();
            serde_json::to_string_pretty(&views::admin_dashboard(&state, now, display))
        }
    }?;

    Ok(json)
}
