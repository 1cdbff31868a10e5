use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, Table},
};

use super::city_header::HEADER_OVERHEAD;
use super::{CityHeader, CityHeaderProps, Component};
use crate::action::Action;
use crate::state::{ForecastDay, TempUnit, WeatherResult};

/// Current conditions plus the forecast table
pub struct WeatherCard;

pub struct WeatherCardProps<'a> {
    pub result: &'a WeatherResult,
    pub unit: TempUnit,
}

/// Tallest FIGlet font in the stack
const HEADER_FONT_HEIGHT: u16 = 6;
const DETAIL_ROWS: u16 = 4;

fn detail_line(label: &str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label}: "), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
    .centered()
}

pub fn detail_lines(result: &WeatherResult, unit: TempUnit) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(
            result.description.clone(),
            Style::default().fg(Color::Yellow),
        ))
        .centered(),
        detail_line("Temperature", unit.format(result.temperature), Color::Red),
        detail_line("Humidity", format!("{}%", result.humidity), Color::Blue),
        detail_line("Wind Speed", format!("{} m/s", result.wind_speed), Color::Gray),
    ]
}

fn forecast_row(day: &ForecastDay, unit: TempUnit) -> Row<'static> {
    Row::new(vec![
        Cell::from(day.date.clone()),
        Cell::from(day.description.clone()),
        Cell::from(unit.format(day.temperature)),
        Cell::from(format!("{}%", day.humidity)),
        Cell::from(format!("{} m/s", day.wind_speed)),
    ])
}

fn forecast_table(forecast: &[ForecastDay], unit: TempUnit) -> Table<'static> {
    let header = Row::new(vec!["Date", "Conditions", "Temp", "Humidity", "Wind"])
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    Table::new(
        forecast.iter().map(|day| forecast_row(day, unit)),
        [
            Constraint::Length(12),
            Constraint::Fill(1),
            Constraint::Length(9),
            Constraint::Length(9),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .column_spacing(1)
}

impl Component<Action> for WeatherCard {
    type Props<'a> = WeatherCardProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let result = props.result;
        let forecast_rows = u16::try_from(result.forecast.len())
            .unwrap_or(u16::MAX)
            .saturating_add(1);
        // Shrink the header before the forecast loses rows
        let header_budget = area
            .height
            .saturating_sub(forecast_rows.saturating_add(DETAIL_ROWS + 3))
            .clamp(1 + HEADER_OVERHEAD, HEADER_FONT_HEIGHT + HEADER_OVERHEAD);

        let chunks = Layout::vertical([
            Constraint::Length(header_budget),
            Constraint::Length(1),
            Constraint::Length(DETAIL_ROWS),
            Constraint::Length(1),
            Constraint::Length(1), // "Forecast"
            Constraint::Min(0),
        ])
        .split(area);

        let mut header = CityHeader;
        header.render(frame, chunks[0], CityHeaderProps { result });

        frame.render_widget(
            Paragraph::new(detail_lines(result, props.unit)),
            chunks[2],
        );

        if result.forecast.is_empty() {
            return;
        }
        frame.render_widget(
            Paragraph::new(Line::from("Forecast".bold()).centered()),
            chunks[4],
        );
        frame.render_widget(forecast_table(&result.forecast, props.unit), chunks[5]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_with_huge_forecast() {
        use tui_dispatch::testing::RenderHarness;

        let day = ForecastDay {
            date: "2024-06-01".into(),
            ..Default::default()
        };
        let result = WeatherResult {
            city: "Oslo".into(),
            forecast: vec![day; usize::from(u16::MAX) + 10],
            ..Default::default()
        };

        let mut render = RenderHarness::new(60, 30);
        let output = render.render_to_string_plain(|frame| {
            WeatherCard.render(
                frame,
                frame.area(),
                WeatherCardProps {
                    result: &result,
                    unit: TempUnit::Celsius,
                },
            );
        });

        assert!(output.contains("2024-06-01"));
    }

    #[test]
    fn test_detail_lines_follow_unit() {
        let result = WeatherResult {
            description: "Sunny".into(),
            temperature: 0.0,
            humidity: 40.0,
            wind_speed: 3.5,
            ..Default::default()
        };

        let text: Vec<String> = detail_lines(&result, TempUnit::Fahrenheit)
            .iter()
            .map(|line| line.to_string())
            .collect();

        assert_eq!(
            text,
            vec![
                "Sunny",
                "Temperature: 32.0°F",
                "Humidity: 40%",
                "Wind Speed: 3.5 m/s",
            ]
        );
    }
}
