use artbox::{
    Alignment as ArtAlignment, Color as ArtColor, Fill, LinearGradient, Renderer, fonts,
    integrations::ratatui::ArtBox,
};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use super::Component;
use crate::action::Action;
use crate::state::WeatherResult;

/// FIGlet city name over a plain country/coordinates line
pub struct CityHeader;

pub struct CityHeaderProps<'a> {
    pub result: &'a WeatherResult,
}

/// Rows used below the FIGlet name: 1 spacer + 1 subtitle line.
pub const HEADER_OVERHEAD: u16 = 2;

/// Gradient stops picked from the temperature band (°C)
pub fn temperature_colors(celsius: f32) -> (ArtColor, ArtColor) {
    match celsius {
        t if t < 0.0 => (
            ArtColor::rgb(150, 200, 255), // Ice blue
            ArtColor::rgb(200, 230, 255),
        ),
        t if t < 15.0 => (
            ArtColor::rgb(100, 180, 255), // Cool blue
            ArtColor::rgb(150, 220, 200),
        ),
        t if t < 25.0 => (
            ArtColor::rgb(100, 200, 150), // Green
            ArtColor::rgb(255, 220, 100),
        ),
        t if t < 35.0 => (
            ArtColor::rgb(255, 180, 80), // Orange
            ArtColor::rgb(255, 120, 80),
        ),
        _ => (
            ArtColor::rgb(255, 100, 80), // Hot red
            ArtColor::rgb(255, 60, 60),
        ),
    }
}

fn subtitle(result: &WeatherResult) -> String {
    match (result.latitude, result.longitude) {
        (Some(lat), Some(lon)) => format!("{} · {:.2}°N, {:.2}°E", result.country, lat, lon),
        _ => result.country.clone(),
    }
}

impl Component<Action> for CityHeader {
    type Props<'a> = CityHeaderProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let chunks = Layout::vertical([
            Constraint::Fill(1),   // FIGlet city name
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Country + coordinates
        ])
        .split(area);

        let (start, end) = temperature_colors(props.result.temperature);
        let renderer = Renderer::new(fonts::stack(&["terminus", "miniwi"]))
            .with_plain_fallback()
            .with_alignment(ArtAlignment::Center)
            .with_fill(Fill::Linear(LinearGradient::horizontal(start, end)));
        frame.render_widget(ArtBox::new(&renderer, &props.result.city), chunks[0]);

        let line = Line::from(vec![Span::styled(
            subtitle(props.result),
            Style::default().fg(Color::DarkGray),
        )])
        .centered();
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }
}
