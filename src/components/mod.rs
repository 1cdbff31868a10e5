pub mod city_header;
pub mod search_overlay;
pub mod weather_body;
pub mod weather_card;
pub mod weather_display;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use city_header::{CityHeader, CityHeaderProps};
pub use search_overlay::{SearchOverlay, SearchOverlayProps};
pub use weather_body::{WeatherBody, WeatherBodyProps};
pub use weather_card::{WeatherCard, WeatherCardProps};
pub use weather_display::{ERROR_ICON, WeatherDisplay, WeatherDisplayProps};
