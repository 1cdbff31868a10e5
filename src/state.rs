//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use tui_dispatch::DataResource;

use crate::suggest::{SuggestionCache, SuggestionKey};

/// City fetched when geolocation is unavailable
pub const DEFAULT_CITY: &str = "London";

/// One day of the multi-day forecast
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ForecastDay {
    pub date: String,
    #[serde(rename = "weather_description")]
    pub description: String,
    pub temperature: f32,
    pub humidity: f32,
    pub wind_speed: f32,
}

/// Record ids only tell list rows apart; null or non-numeric ids read as 0
fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    let id = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Number(n) => n.as_u64().unwrap_or_default(),
        serde_json::Value::String(s) => s.trim().parse().unwrap_or_default(),
        _ => 0,
    };
    Ok(id)
}

/// A weather record as returned by the weather API
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct WeatherResult {
    #[serde(deserialize_with = "lenient_id")]
    #[schemars(with = "u64")]
    pub id: u64,
    pub city: String,
    pub country: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "weather_description")]
    pub description: String,
    pub temperature: f32,
    pub humidity: f32,
    pub wind_speed: f32,
    pub forecast: Vec<ForecastDay>,
}

impl WeatherResult {
    /// "City, Country", or just the city when the country is missing
    pub fn display_name(&self) -> String {
        if self.country.is_empty() {
            self.city.clone()
        } else {
            format!("{}, {}", self.city, self.country)
        }
    }
}

/// Lightweight location record used for suggestions
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LocationSummary {
    #[serde(deserialize_with = "lenient_id")]
    #[schemars(with = "u64")]
    pub id: u64,
    pub city: String,
    pub country: String,
}

impl LocationSummary {
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }
}

/// What the last authoritative fetch asked for
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub enum WeatherQuery {
    City(String),
    Coordinates { lat: f64, lon: f64 },
}

/// Request lifecycle of the weather fetch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Loading,
    Succeeded,
    Failed,
}

/// Temperature unit preference
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub enum TempUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn toggle(&self) -> Self {
        match self {
            TempUnit::Celsius => TempUnit::Fahrenheit,
            TempUnit::Fahrenheit => TempUnit::Celsius,
        }
    }

    pub fn format(&self, celsius: f32) -> String {
        match self {
            TempUnit::Celsius => format!("{:.1}°C", celsius),
            TempUnit::Fahrenheit => format!("{:.1}°F", celsius * 9.0 / 5.0 + 32.0),
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    // --- Weather store ---
    /// Fetch lifecycle: Empty → Loading → Loaded(Some/None)/Failed
    #[debug(section = "Weather", label = "Result", debug_fmt)]
    pub weather: DataResource<Option<WeatherResult>>,

    /// Last query sent to the weather API (re-issued on refresh)
    #[debug(section = "Weather", label = "Query", debug_fmt)]
    pub last_query: Option<WeatherQuery>,

    /// Fallback city when geolocation fails
    #[debug(section = "Weather", label = "Default city")]
    pub default_city: String,

    /// Waiting on the geolocator before the first fetch
    #[debug(section = "Weather", label = "Locating")]
    pub locating: bool,

    #[debug(section = "Weather", label = "Unit", debug_fmt)]
    pub unit: TempUnit,

    // --- Search input ---
    /// Whether the search input has focus (overlay open)
    #[debug(section = "Search", label = "Focused")]
    pub search_mode: bool,

    #[debug(section = "Search", label = "Query")]
    pub search_query: String,

    /// Suggestions currently shown under the input
    #[debug(skip)]
    pub suggestions: Vec<LocationSummary>,

    #[debug(skip)]
    pub suggestion_selected: usize,

    /// Key the shown suggestions were looked up for
    #[debug(section = "Search", label = "Listed for", debug_fmt)]
    pub suggestions_for: Option<SuggestionKey>,

    /// Previously fetched suggestion lists
    #[debug(section = "Search", label = "Cache", debug_fmt)]
    pub suggestion_cache: SuggestionCache,
}

impl AppState {
    pub fn new(default_city: impl Into<String>) -> Self {
        Self {
            weather: DataResource::Empty,
            last_query: None,
            default_city: default_city.into(),
            locating: false,
            unit: TempUnit::default(),
            search_mode: false,
            search_query: String::new(),
            suggestions: Vec::new(),
            suggestion_selected: 0,
            suggestions_for: None,
            suggestion_cache: SuggestionCache::default(),
        }
    }

    pub fn status(&self) -> RequestStatus {
        match &self.weather {
            DataResource::Empty => RequestStatus::Idle,
            DataResource::Loading => RequestStatus::Loading,
            DataResource::Loaded(_) => RequestStatus::Succeeded,
            DataResource::Failed(_) => RequestStatus::Failed,
        }
    }

    /// The displayed result, if the last fetch succeeded with one
    pub fn result(&self) -> Option<&WeatherResult> {
        self.weather.data().and_then(Option::as_ref)
    }

    /// Whether the shown suggestions answer the query currently typed
    pub fn suggestions_current(&self) -> bool {
        self.suggestions_for.as_ref() == Some(&SuggestionKey::from_query(&self.search_query))
    }

    /// The highlighted suggestion, only while the list matches the query
    pub fn selected_suggestion(&self) -> Option<&LocationSummary> {
        if !self.suggestions_current() {
            return None;
        }
        self.suggestions.get(self.suggestion_selected)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DEFAULT_CITY)
    }
}
