//! Autocomplete suggestions: debounce scheduling and the suggestion cache
//!
//! Typing schedules a lookup through the task manager's debounce. When the
//! quiescence window elapses the store receives `Action::SuggestLookup`,
//! which is served from [`SuggestionCache`] when possible and only falls
//! through to the weather API on a miss.

use std::collections::HashMap;
use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tui_dispatch::TaskManager;

use crate::action::Action;
use crate::state::LocationSummary;

/// Quiet period after the last keystroke before a lookup fires
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Task key for the pending debounce timer
pub const SUGGEST_TASK: &str = "suggest";

/// Task key for the in-flight suggestion request
pub const SUGGEST_FETCH_TASK: &str = "suggest_fetch";

/// What a suggestion list was fetched for
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SuggestionKey {
    /// Unfiltered list (empty input)
    All,
    Search(String),
}

impl SuggestionKey {
    pub fn from_query(query: &str) -> Self {
        let query = query.trim();
        if query.is_empty() {
            SuggestionKey::All
        } else {
            SuggestionKey::Search(query.to_string())
        }
    }
}

/// Append-only memo of suggestion lists, keyed by query
#[derive(Clone, Debug, Default, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct SuggestionCache {
    all: Option<Vec<LocationSummary>>,
    searches: HashMap<String, Vec<LocationSummary>>,
}

impl SuggestionCache {
    pub fn get(&self, key: &SuggestionKey) -> Option<&[LocationSummary]> {
        match key {
            SuggestionKey::All => self.all.as_deref(),
            SuggestionKey::Search(query) => self.searches.get(query).map(Vec::as_slice),
        }
    }

    /// Store a fetched list. Empty search results are not remembered so a
    /// later lookup for the same text goes back to the API.
    pub fn insert(&mut self, key: SuggestionKey, results: Vec<LocationSummary>) {
        match key {
            SuggestionKey::All => self.all = Some(results),
            SuggestionKey::Search(query) => {
                if !results.is_empty() {
                    self.searches.insert(query, results);
                }
            }
        }
    }

    pub fn contains(&self, key: &SuggestionKey) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.searches.len() + usize::from(self.all.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Restart the debounce timer for `query`.
///
/// Any lookup still waiting out the window is cancelled, so a burst of calls
/// yields exactly one `SuggestLookup`, for the last query.
pub fn schedule(tasks: &mut TaskManager<Action>, query: &str) {
    let key = SuggestionKey::from_query(query);
    tasks.debounce(SUGGEST_TASK, DEBOUNCE_WINDOW, async move {
        Action::SuggestLookup(key)
    });
}
