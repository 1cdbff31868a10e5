use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
};

use tui_dispatch::DataResource;

use super::{Component, ERROR_ICON, WeatherCard, WeatherCardProps};
use crate::action::Action;
use crate::state::{AppState, WeatherResult};

pub struct WeatherBody;

pub struct WeatherBodyProps<'a> {
    pub state: &'a AppState,
}

impl Component<Action> for WeatherBody {
    type Props<'a> = WeatherBodyProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        match WeatherView::from_state(props.state) {
            WeatherView::Ready(result) => {
                let mut card = WeatherCard;
                card.render(
                    frame,
                    area,
                    WeatherCardProps {
                        result,
                        unit: props.state.unit,
                    },
                );
            }
            WeatherView::Error(error) => render_error(frame, area, error),
            WeatherView::NoData => render_message(frame, area, "No data found..."),
            WeatherView::Loading => render_message(frame, area, "Loading..."),
            WeatherView::Locating => render_message(frame, area, "Detecting your location..."),
            WeatherView::Searching => render_message(frame, area, "Searching..."),
            WeatherView::Idle => render_hint(frame, area),
        }
    }
}

fn centered_row(area: Rect) -> Rect {
    Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(area)[0]
}

fn render_message(frame: &mut Frame, area: Rect, message: &str) {
    let msg = Line::from(vec![Span::styled(
        message,
        Style::default().fg(Color::DarkGray),
    )])
    .centered();
    frame.render_widget(Paragraph::new(msg), centered_row(area));
}

fn render_hint(frame: &mut Frame, area: Rect) {
    let hint = Line::from(vec![
        Span::styled("Press ", Style::default().fg(Color::DarkGray)),
        Span::styled("/", Style::default().fg(Color::Cyan).bold()),
        Span::styled(" to search for a city", Style::default().fg(Color::DarkGray)),
    ])
    .centered();
    frame.render_widget(Paragraph::new(hint), centered_row(area));
}

fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let chunks = Layout::vertical([
        Constraint::Length(1), // icon
        Constraint::Length(1), // message
        Constraint::Length(1), // blank
        Constraint::Length(1), // hint
    ])
    .flex(Flex::Center)
    .split(area);

    frame.render_widget(
        Paragraph::new(Line::from(ERROR_ICON).centered()),
        chunks[0],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Error: ", Style::default().fg(Color::Red).bold()),
                Span::styled(
                    error.to_string(),
                    Style::default().fg(Color::Rgb(200, 100, 100)),
                ),
            ])
            .centered(),
        ),
        chunks[1],
    );
    frame.render_widget(
        Paragraph::new(
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::DarkGray)),
                Span::styled("r", Style::default().fg(Color::Cyan).bold()),
                Span::styled(" to retry", Style::default().fg(Color::DarkGray)),
            ])
            .centered(),
        ),
        chunks[3],
    );
}

enum WeatherView<'a> {
    Ready(&'a WeatherResult),
    Error(&'a str),
    NoData,
    Loading,
    Locating,
    Searching,
    Idle,
}

impl<'a> WeatherView<'a> {
    fn from_state(state: &'a AppState) -> Self {
        match &state.weather {
            DataResource::Failed(error) => WeatherView::Error(error),
            DataResource::Loading => WeatherView::Loading,
            // The card stays hidden while suggestions are open
            DataResource::Loaded(Some(_)) if state.search_mode => WeatherView::Searching,
            DataResource::Loaded(Some(result)) => WeatherView::Ready(result),
            DataResource::Loaded(None) => WeatherView::NoData,
            DataResource::Empty if state.locating => WeatherView::Locating,
            DataResource::Empty => WeatherView::Idle,
        }
    }
}
