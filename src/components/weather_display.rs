use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::Stylize;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    StatusBar, StatusBarHint, StatusBarProps, StatusBarSection, StatusBarStyle,
};

use super::{Component, WeatherBody, WeatherBodyProps};
use crate::action::Action;
use crate::state::AppState;

pub const ERROR_ICON: &str = "\u{26a0}\u{fe0f}";
pub const TITLE: &str = "THE WEATHER FORECASTING";

/// Props for WeatherDisplay - read-only view of state
pub struct WeatherDisplayProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// The main screen: title, body and help bar
#[derive(Default)]
pub struct WeatherDisplay;

impl Component<Action> for WeatherDisplay {
    type Props<'a> = WeatherDisplayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return None;
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('/') => Some(Action::SearchOpen),
                KeyCode::Char('r') | KeyCode::F(5) => Some(Action::WeatherRefresh),
                KeyCode::Char('u') => Some(Action::UiToggleUnits),
                KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
                _ => None,
            },
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: WeatherDisplayProps<'_>) {
        let chunks = Layout::vertical([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Help bar
        ])
        .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(TITLE.white().bold()).centered()),
            chunks[0],
        );

        let mut body = WeatherBody;
        body.render(frame, chunks[2], WeatherBodyProps { state: props.state });

        let mut status_bar = StatusBar::new();
        <StatusBar as Component<Action>>::render(
            &mut status_bar,
            frame,
            chunks[3],
            StatusBarProps {
                left: StatusBarSection::empty(),
                center: StatusBarSection::hints(&[
                    StatusBarHint::new("/", "search"),
                    StatusBarHint::new("r", "refresh"),
                    StatusBarHint::new("u", "units"),
                    StatusBarHint::new("q", "quit"),
                ]),
                right: StatusBarSection::empty(),
                style: StatusBarStyle::default(),
                is_focused: false,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::WeatherResult;
    use tui_dispatch::DataResource;
    use tui_dispatch::testing::*;

    fn render_state(state: &AppState) -> String {
        let mut render = RenderHarness::new(80, 30);
        let mut component = WeatherDisplay;
        render.render_to_string_plain(|frame| {
            let props = WeatherDisplayProps {
                state,
                is_focused: true,
            };
            component.render(frame, frame.area(), props);
        })
    }

    #[test]
    fn test_handle_event_search() {
        let mut component = WeatherDisplay;
        let state = AppState::default();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("/")), props)
            .into_iter()
            .collect();
        actions.assert_count(1);
        actions.assert_first(Action::SearchOpen);
    }

    #[test]
    fn test_handle_event_refresh() {
        let mut component = WeatherDisplay;
        let state = AppState::default();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: true,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("r")), props)
            .into_iter()
            .collect();
        actions.assert_first(Action::WeatherRefresh);
    }

    #[test]
    fn test_handle_event_unfocused_ignores() {
        let mut component = WeatherDisplay;
        let state = AppState::default();
        let props = WeatherDisplayProps {
            state: &state,
            is_focused: false,
        };

        let actions: Vec<_> = component
            .handle_event(&EventKind::Key(key("q")), props)
            .into_iter()
            .collect();
        actions.assert_empty();
    }

    #[test]
    fn test_render_title_and_loading() {
        let state = AppState {
            weather: DataResource::Loading,
            ..Default::default()
        };

        let output = render_state(&state);

        assert!(output.contains(TITLE));
        assert!(output.contains("Loading..."));
    }

    #[test]
    fn test_render_no_data() {
        let state = AppState {
            weather: DataResource::Loaded(None),
            ..Default::default()
        };

        assert!(render_state(&state).contains("No data found"));
    }

    #[test]
    fn test_card_hidden_while_searching() {
        let state = AppState {
            weather: DataResource::Loaded(Some(WeatherResult {
                city: "Oslo".into(),
                description: "Snow".into(),
                ..Default::default()
            })),
            search_mode: true,
            ..Default::default()
        };

        let output = render_state(&state);

        assert!(!output.contains("Snow"));
        assert!(output.contains("Searching..."));
    }
}
