//! Weather search TUI
//!
//! A search box with debounced, cached autocomplete over a weather API, a
//! geolocation-based startup query, and a card view with current conditions
//! and the multi-day forecast. The library exposes the modules for testing.

pub mod action;
pub mod api;
pub mod components;
pub mod effect;
pub mod locate;
pub mod reducer;
pub mod state;
pub mod suggest;
