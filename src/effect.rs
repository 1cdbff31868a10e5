//! Effects - side effects declared by the reducer

use std::sync::atomic::{AtomicU64, Ordering};

use tui_dispatch::TaskKey;

use crate::state::WeatherQuery;
use crate::suggest::SuggestionKey;

/// Prefix of the per-request weather task keys
pub const WEATHER_TASK: &str = "weather";

/// Hands out a fresh task key for every weather fetch.
///
/// A new fetch never aborts one still in flight; each completion is
/// dispatched and the last to arrive is what the store shows.
#[derive(Debug, Default)]
pub struct WeatherTaskKeys {
    next: AtomicU64,
}

impl WeatherTaskKeys {
    pub fn next_key(&self) -> TaskKey {
        let seq = self.next.fetch_add(1, Ordering::Relaxed);
        TaskKey::new(format!("{WEATHER_TASK}#{seq}"))
    }
}

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch weather for a city or coordinates
    FetchWeather(WeatherQuery),
    /// Restart the debounce timer for a typed query
    ScheduleSuggestions { query: String },
    /// Cache miss: fetch suggestions from the API
    FetchSuggestions { key: SuggestionKey },
    /// Ask the geolocator for the current position
    Geolocate,
}
