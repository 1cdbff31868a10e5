//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::api::GENERIC_FAILURE;
use crate::effect::Effect;
use crate::state::{AppState, WeatherQuery};
use crate::suggest::SuggestionKey;

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Weather actions =====
        Action::WeatherFetchCity(city) => {
            let city = city.trim();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            begin_fetch(state, WeatherQuery::City(city.to_string()))
        }

        Action::WeatherFetchCoords { lat, lon } => {
            begin_fetch(state, WeatherQuery::Coordinates { lat, lon })
        }

        Action::WeatherRefresh => match state.last_query.clone() {
            Some(query) => begin_fetch(state, query),
            None => DispatchResult::unchanged(),
        },

        Action::WeatherDidLoad(result) => {
            state.weather = DataResource::Loaded(result);
            DispatchResult::changed()
        }

        Action::WeatherDidError(msg) => {
            let msg = if msg.trim().is_empty() {
                GENERIC_FAILURE.to_string()
            } else {
                msg
            };
            state.weather = DataResource::Failed(msg);
            DispatchResult::changed()
        }

        // ===== Geolocation actions =====
        Action::GeoLocate => {
            state.locating = true;
            DispatchResult::changed_with(Effect::Geolocate)
        }

        Action::GeoDidLocate { lat, lon } => {
            state.locating = false;
            begin_fetch(state, WeatherQuery::Coordinates { lat, lon })
        }

        Action::GeoDidFail(_) => {
            state.locating = false;
            let city = state.default_city.clone();
            begin_fetch(state, WeatherQuery::City(city))
        }

        // ===== Search actions =====
        Action::SearchOpen => {
            state.search_mode = true;
            state.suggestion_selected = 0;
            if state.search_query.trim().is_empty() {
                lookup_suggestions(state, SuggestionKey::All).mark_changed()
            } else {
                DispatchResult::changed()
            }
        }

        Action::SearchClose => {
            state.search_mode = false;
            state.suggestion_selected = 0;
            DispatchResult::changed()
        }

        Action::SearchQueryChange(query) => {
            state.search_query = query;
            state.suggestion_selected = 0;
            DispatchResult::changed_with(Effect::ScheduleSuggestions {
                query: state.search_query.clone(),
            })
        }

        Action::SearchQuerySubmit(query) => {
            let query = query.trim().to_string();
            if query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search_query = query.clone();
            close_search(state);
            begin_fetch(state, WeatherQuery::City(query))
        }

        Action::SearchSelect(index) => {
            if index < state.suggestions.len() && index != state.suggestion_selected {
                state.suggestion_selected = index;
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::SearchConfirm => {
            let Some(picked) = state.selected_suggestion().cloned() else {
                // The list belongs to an earlier query; submit what was typed
                let query = state.search_query.clone();
                return reducer(state, Action::SearchQuerySubmit(query));
            };
            state.search_query = picked.city.clone();
            close_search(state);
            begin_fetch(state, WeatherQuery::City(picked.city))
        }

        // ===== Suggest actions =====
        Action::SuggestLookup(key) => lookup_suggestions(state, key),

        Action::SuggestDidLoad { key, results } => {
            let current = SuggestionKey::from_query(&state.search_query);
            state.suggestion_cache.insert(key.clone(), results.clone());
            if key == current {
                state.suggestions = results;
                state.suggestion_selected = 0;
                state.suggestions_for = Some(key);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // Suggestions keep whatever they showed before
        Action::SuggestDidError(_) => DispatchResult::unchanged(),

        // ===== UI actions =====
        Action::UiToggleUnits => {
            state.unit = state.unit.toggle();
            DispatchResult::changed()
        }

        Action::Render => DispatchResult::changed(),

        // ===== Global actions =====
        Action::Quit => DispatchResult::unchanged(),
    }
}

fn begin_fetch(state: &mut AppState, query: WeatherQuery) -> DispatchResult<Effect> {
    state.weather = DataResource::Loading;
    state.last_query = Some(query.clone());
    DispatchResult::changed_with(Effect::FetchWeather(query))
}

/// Serve suggestions from the cache, or ask for a fetch on a miss
fn lookup_suggestions(state: &mut AppState, key: SuggestionKey) -> DispatchResult<Effect> {
    match state.suggestion_cache.get(&key) {
        Some(cached) => {
            state.suggestions = cached.to_vec();
            state.suggestion_selected = 0;
            state.suggestions_for = Some(key);
            DispatchResult::changed()
        }
        None => DispatchResult::effect(Effect::FetchSuggestions { key }),
    }
}

fn close_search(state: &mut AppState) {
    state.search_mode = false;
    state.suggestions.clear();
    state.suggestion_selected = 0;
    state.suggestions_for = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{LocationSummary, WeatherResult};

    fn london() -> WeatherResult {
        WeatherResult {
            id: 1,
            city: "London".into(),
            country: "United Kingdom".into(),
            description: "Partly cloudy".into(),
            temperature: 15.0,
            humidity: 70.0,
            wind_speed: 5.2,
            ..Default::default()
        }
    }

    fn summaries() -> Vec<LocationSummary> {
        vec![
            LocationSummary {
                id: 1,
                city: "London".into(),
                country: "United Kingdom".into(),
            },
            LocationSummary {
                id: 9,
                city: "Londrina".into(),
                country: "Brazil".into(),
            },
        ]
    }

    #[test]
    fn test_fetch_city_sets_loading() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::WeatherFetchCity("London".into()));

        assert!(result.changed);
        assert!(state.weather.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather(WeatherQuery::City("London".into()))]
        );
    }

    #[test]
    fn test_fetch_blank_city_is_ignored() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::WeatherFetchCity("   ".into()));
        assert!(!result.changed);
        assert!(result.effects.is_empty());
        assert!(state.weather.is_empty());
    }

    #[test]
    fn test_did_load_keeps_first_result() {
        let mut state = AppState {
            weather: DataResource::Loading,
            ..Default::default()
        };

        reducer(&mut state, Action::WeatherDidLoad(Some(london())));

        assert_eq!(state.result(), Some(&london()));
    }

    #[test]
    fn test_empty_error_message_gets_generic_text() {
        let mut state = AppState::default();
        reducer(&mut state, Action::WeatherDidError(String::new()));
        assert_eq!(state.weather.error(), Some(GENERIC_FAILURE));
    }

    #[test]
    fn test_refresh_reissues_last_query() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::WeatherRefresh).changed);

        reducer(&mut state, Action::WeatherFetchCoords { lat: 1.0, lon: 2.0 });
        reducer(&mut state, Action::WeatherDidLoad(None));

        let result = reducer(&mut state, Action::WeatherRefresh);
        assert!(state.weather.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather(WeatherQuery::Coordinates {
                lat: 1.0,
                lon: 2.0
            })]
        );
    }

    #[test]
    fn test_focus_with_empty_query_looks_up_all() {
        let mut state = AppState::default();

        let result = reducer(&mut state, Action::SearchOpen);

        assert!(state.search_mode);
        assert_eq!(
            result.effects,
            vec![Effect::FetchSuggestions {
                key: SuggestionKey::All
            }]
        );
    }

    #[test]
    fn test_focus_with_cached_all_skips_fetch() {
        let mut state = AppState::default();
        state
            .suggestion_cache
            .insert(SuggestionKey::All, summaries());

        let result = reducer(&mut state, Action::SearchOpen);

        assert!(result.effects.is_empty());
        assert_eq!(state.suggestions, summaries());
    }

    #[test]
    fn test_query_change_schedules_debounce() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::SearchQueryChange("Lon".into()));
        assert_eq!(state.search_query, "Lon");
        assert_eq!(
            result.effects,
            vec![Effect::ScheduleSuggestions {
                query: "Lon".into()
            }]
        );
    }

    #[test]
    fn test_lookup_hit_serves_cache_without_effect() {
        let mut state = AppState::default();
        let key = SuggestionKey::Search("Lon".into());
        state.suggestion_cache.insert(key.clone(), summaries());

        let result = reducer(&mut state, Action::SuggestLookup(key));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.suggestions, summaries());
    }

    #[test]
    fn test_lookup_miss_requests_fetch() {
        let mut state = AppState::default();
        let key = SuggestionKey::Search("Lon".into());

        let result = reducer(&mut state, Action::SuggestLookup(key.clone()));

        assert!(!result.changed);
        assert_eq!(result.effects, vec![Effect::FetchSuggestions { key }]);
    }

    #[test]
    fn test_stale_suggestions_cached_but_not_shown() {
        let mut state = AppState {
            search_query: "Par".into(),
            ..Default::default()
        };
        let stale = SuggestionKey::Search("Lon".into());

        let result = reducer(
            &mut state,
            Action::SuggestDidLoad {
                key: stale.clone(),
                results: summaries(),
            },
        );

        assert!(!result.changed);
        assert!(state.suggestions.is_empty());
        assert!(state.suggestion_cache.contains(&stale));
    }

    #[test]
    fn test_confirm_picks_selected_city() {
        let mut state = AppState {
            search_mode: true,
            search_query: "Lon".into(),
            suggestions: summaries(),
            suggestions_for: Some(SuggestionKey::Search("Lon".into())),
            ..Default::default()
        };
        reducer(&mut state, Action::SearchSelect(1));

        let result = reducer(&mut state, Action::SearchConfirm);

        assert!(!state.search_mode);
        assert!(state.suggestions.is_empty());
        assert_eq!(state.search_query, "Londrina");
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather(WeatherQuery::City("Londrina".into()))]
        );
    }

    #[test]
    fn test_confirm_over_earlier_list_submits_typed_query() {
        let mut state = AppState {
            search_mode: true,
            suggestions: summaries(),
            suggestions_for: Some(SuggestionKey::All),
            ..Default::default()
        };
        reducer(&mut state, Action::SearchQueryChange("Tokyo".into()));
        assert!(!state.suggestions_current());

        let result = reducer(&mut state, Action::SearchConfirm);

        assert!(!state.search_mode);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather(WeatherQuery::City("Tokyo".into()))]
        );
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut state = AppState {
            suggestions: summaries(),
            ..Default::default()
        };
        assert!(!reducer(&mut state, Action::SearchSelect(5)).changed);
        assert_eq!(state.suggestion_selected, 0);
    }

    #[test]
    fn test_submit_empty_query_is_ignored() {
        let mut state = AppState {
            search_mode: true,
            ..Default::default()
        };
        let result = reducer(&mut state, Action::SearchQuerySubmit("  ".into()));
        assert!(!result.changed);
        assert!(state.search_mode);
    }

    #[test]
    fn test_geolocation_failure_falls_back_to_default_city() {
        let mut state = AppState::new("Kyiv");
        reducer(&mut state, Action::GeoLocate);
        assert!(state.locating);

        let result = reducer(&mut state, Action::GeoDidFail("denied".into()));

        assert!(!state.locating);
        assert_eq!(
            result.effects,
            vec![Effect::FetchWeather(WeatherQuery::City("Kyiv".into()))]
        );
    }

    #[test]
    fn test_toggle_units() {
        let mut state = AppState::default();
        assert_eq!(state.unit, crate::state::TempUnit::Celsius);

        reducer(&mut state, Action::UiToggleUnits);
        assert_eq!(state.unit, crate::state::TempUnit::Fahrenheit);

        reducer(&mut state, Action::UiToggleUnits);
        assert_eq!(state.unit, crate::state::TempUnit::Celsius);
    }
}
