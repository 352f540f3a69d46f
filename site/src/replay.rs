//! JSON-lines action logs
//!
//! One action per line in its wire shape (`{"type": ..., "payload": ...}`).
//! Blank lines and lines starting with `#` are skipped.

use crate::SiteStore;
use crate::error::SiteError;
use crate::types::AppAction;
use gathering_core::action::Action;
use std::io::BufRead;

/// Decodes every action in `reader`
///
/// # Errors
///
/// Returns [`SiteError::ActionLog`] for the first line that is not a valid
/// action, or [`SiteError::Io`] if reading fails.
pub fn read_actions(reader: impl BufRead) -> Result<Vec<AppAction>, SiteError> {
    let mut actions = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let action = serde_json::from_str(trimmed).map_err(|source| SiteError::ActionLog {
            line: index + 1,
            source,
        })?;
        actions.push(action);
    }

    Ok(actions)
}

/// Dispatches `actions` in order
///
/// Returns how many were dispatched. Unknown action types are dispatched too
/// and leave the state untouched.
///
/// # Errors
///
/// Stops at the first dispatch the store rejects.
pub fn replay(store: &SiteStore, actions: Vec<AppAction>) -> Result<usize, SiteError> {
    let mut dispatched = 0;
    for action in actions {
        if matches!(action, AppAction::Unknown) {
            tracing::warn!("Replaying unrecognised action type");
        }
        tracing::debug!(action = action.name(), "Replaying action");
        store.dispatch(action)?;
        dispatched += 1;
    }
    tracing::info!(dispatched, "Action log replayed");
    Ok(dispatched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::new_store;
    use crate::reducer::SiteEnvironment;
    use gathering_testing::{SequentialIdGenerator, test_clock};
    use std::io::Cursor;

    const LOG: &str = r#"
# turn the stream off, then drop a sermon
{"type": "SET_LIVESTREAM", "payload": {"isLive": false}}
{"type": "DELETE_SERMON", "payload": "w1"}

{"type": "CLEAR_CACHE"}
"#;

    #[test]
    fn reads_and_replays_log() {
        let actions = read_actions(Cursor::new(LOG)).unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[2], AppAction::Unknown);

        let store = new_store(SiteEnvironment::new(
            test_clock(),
            SequentialIdGenerator::new("replay"),
        ));
        assert_eq!(replay(&store, actions).unwrap(), 3);

        let state = store.state();
        assert!(!state.is_livestreaming);
        assert_eq!(state.livestream_url, None);
        assert_eq!(state.sermons.len(), 102);
    }

    #[test]
    fn unknown_action_with_payload_is_skipped_by_the_reducer() {
        let log = concat!(
            "{\"type\": \"ADD_PRAYER_REQUEST\", \"payload\": {\"id\": \"p1\", \"text\": \"hi\"}}\n",
            "{\"type\": \"DELETE_EVENT\", \"payload\": \"1\"}\n",
        );
        let actions = read_actions(Cursor::new(log)).unwrap();
        assert_eq!(actions[0], AppAction::Unknown);

        let store = new_store(SiteEnvironment::new(
            test_clock(),
            SequentialIdGenerator::new("replay"),
        ));
        let before = store.state();
        assert_eq!(replay(&store, actions).unwrap(), 2);

        let state = store.state();
        assert_eq!(state.sermons, before.sermons);
        assert_eq!(state.events.len(), before.events.len() - 1);
    }

    #[test]
    fn reports_bad_line_number() {
        let log = "{\"type\": \"DELETE_SERMON\", \"payload\": \"w1\"}\nnot json\n";
        let Err(SiteError::ActionLog { line, .. }) = read_actions(Cursor::new(log)) else {
            panic!("expected an action log error");
        };
        assert_eq!(line, 2);
    }
}
