//! Actions - every way the store can change

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{LocationSummary, WeatherResult};
use crate::suggest::SuggestionKey;

/// Application actions with automatic category inference
#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Weather category =====
    /// Intent: fetch weather for a city name
    WeatherFetchCity(String),

    /// Intent: fetch weather for coordinates
    WeatherFetchCoords { lat: f64, lon: f64 },

    /// Intent: re-issue the last query
    WeatherRefresh,

    /// Result: request succeeded; `None` when nothing matched
    WeatherDidLoad(Option<WeatherResult>),

    /// Result: request failed
    WeatherDidError(String),

    // ===== Geolocation category =====
    /// Resolve the current position (startup)
    GeoLocate,

    GeoDidLocate { lat: f64, lon: f64 },

    GeoDidFail(String),

    // ===== Search category =====
    /// Focus the search input
    SearchOpen,

    /// Blur the search input
    SearchClose,

    /// Search query text changed
    SearchQueryChange(String),

    /// Submit the typed query
    SearchQuerySubmit(String),

    /// Select a suggestion in the list (by index)
    SearchSelect(usize),

    /// Pick the selected suggestion
    SearchConfirm,

    // ===== Suggest category =====
    /// Debounce window elapsed: serve from cache or fetch
    SuggestLookup(SuggestionKey),

    SuggestDidLoad {
        key: SuggestionKey,
        results: Vec<LocationSummary>,
    },

    /// Suggestion fetch failed (not shown to the user)
    SuggestDidError(String),

    // ===== UI category =====
    /// Toggle between Celsius and Fahrenheit
    UiToggleUnits,

    /// Force a re-render (for cursor movement, etc.)
    Render,

    // ===== Uncategorized (global) =====
    /// Exit the application
    Quit,
}
