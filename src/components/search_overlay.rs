use crossterm::event::KeyCode;
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Line,
};
use tui_dispatch::EventKind;
use tui_dispatch_components::{
    BaseStyle, Modal, ModalBehavior, ModalProps, ModalStyle, Padding, ScrollbarStyle, SelectList,
    SelectListBehavior, SelectListProps, SelectListStyle, SelectionStyle, TextInput,
    TextInputProps, TextInputStyle, centered_rect, highlight_substring,
};

use super::Component;
use crate::action::Action;
use crate::state::LocationSummary;

pub const PLACEHOLDER: &str = "Search by location or city";

/// Search input with the autocomplete list underneath, shown as a modal
pub struct SearchOverlay {
    input: TextInput,
    list: SelectList,
    modal: Modal,
    was_open: bool,
}

pub struct SearchOverlayProps<'a> {
    pub query: &'a str,
    pub suggestions: &'a [LocationSummary],
    pub selected: usize,
    /// The list was looked up for the query as typed now
    pub suggestions_current: bool,
    pub is_focused: bool,
    // Action constructors
    pub on_query_change: fn(String) -> Action,
    pub on_query_submit: fn(String) -> Action,
    pub on_select: fn(usize) -> Action,
}

impl Default for SearchOverlay {
    fn default() -> Self {
        Self {
            input: TextInput::new(),
            list: SelectList::new(),
            modal: Modal::new(),
            was_open: false,
        }
    }
}

fn plain_style(padding: Padding, bg: Option<Color>) -> BaseStyle {
    BaseStyle {
        border: None,
        padding,
        bg,
        fg: None,
    }
}

fn suggestion_items(suggestions: &[LocationSummary], query: &str) -> Vec<Line<'static>> {
    let base = Style::default().fg(Color::Reset);
    let highlight = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    suggestions
        .iter()
        .map(|loc| highlight_substring(&loc.label(), query.trim(), base, highlight))
        .collect()
}

impl SearchOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track open/close transitions; the list scroll resets on each open.
    /// The input keeps its state since the query survives a blur.
    pub fn set_open(&mut self, is_open: bool) {
        if is_open && !self.was_open {
            self.list = SelectList::new();
        }
        self.was_open = is_open;
    }
}

impl Component<Action> for SearchOverlay {
    type Props<'a> = SearchOverlayProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        let EventKind::Key(key) = event else {
            return Vec::new();
        };

        match key.code {
            KeyCode::Esc => vec![Action::SearchClose],
            KeyCode::Enter if props.suggestions_current && !props.suggestions.is_empty() => {
                vec![Action::SearchConfirm]
            }
            KeyCode::Enter => vec![(props.on_query_submit)(props.query.to_string())],
            KeyCode::Down | KeyCode::Up => {
                if props.suggestions.is_empty() {
                    return Vec::new();
                }
                let items = suggestion_items(props.suggestions, props.query);
                let list_props = SelectListProps {
                    items: &items,
                    count: items.len(),
                    selected: props.selected,
                    is_focused: true,
                    style: SelectListStyle {
                        base: plain_style(Padding::xy(1, 1), None),
                        selection: SelectionStyle::default(),
                        scrollbar: ScrollbarStyle::default(),
                    },
                    behavior: SelectListBehavior::default(),
                    on_select: props.on_select,
                    render_item: &|item| item.clone(),
                };
                self.list.handle_event(event, list_props).into_iter().collect()
            }
            // Everything else edits the query
            _ => {
                let input_props = TextInputProps {
                    value: props.query,
                    placeholder: PLACEHOLDER,
                    is_focused: true,
                    style: TextInputStyle {
                        base: plain_style(Padding::new(1, 0, 1, 0), None),
                        placeholder_style: None,
                        cursor_style: None,
                    },
                    on_change: props.on_query_change,
                    on_submit: props.on_query_submit,
                    on_cursor_move: Some(|_| Action::Render),
                };
                self.input.handle_event(event, input_props).into_iter().collect()
            }
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        if area.width < 20 || area.height < 8 {
            return;
        }

        let SearchOverlay {
            input, list, modal, ..
        } = self;
        let modal_area = centered_rect(60, 12, area);
        let items = suggestion_items(props.suggestions, props.query);
        let mut render_content = |frame: &mut Frame, content_area: Rect| {
            let chunks = Layout::vertical([
                Constraint::Length(3), // Input
                Constraint::Min(1),    // Suggestions
            ])
            .split(content_area);

            // Input with lighter background
            let input_props = TextInputProps {
                value: props.query,
                placeholder: PLACEHOLDER,
                is_focused: props.is_focused,
                style: TextInputStyle {
                    base: plain_style(Padding::all(1), Some(Color::Rgb(50, 50, 60))),
                    placeholder_style: None,
                    cursor_style: None,
                },
                on_change: props.on_query_change,
                on_submit: props.on_query_submit,
                on_cursor_move: Some(|_| Action::Render),
            };
            input.render(frame, chunks[0], input_props);

            let list_props = SelectListProps {
                items: &items,
                count: items.len(),
                selected: props.selected,
                is_focused: props.is_focused,
                style: SelectListStyle {
                    base: plain_style(Padding::all(1), None),
                    selection: SelectionStyle::default(),
                    scrollbar: ScrollbarStyle::default(),
                },
                behavior: SelectListBehavior::default(),
                on_select: props.on_select,
                render_item: &|item| item.clone(),
            };
            list.render(frame, chunks[1], list_props);
        };

        modal.render(
            frame,
            area,
            ModalProps {
                is_open: true,
                is_focused: props.is_focused,
                area: modal_area,
                style: ModalStyle {
                    base: plain_style(Padding::default(), Some(Color::Rgb(35, 35, 45))),
                    ..Default::default()
                },
                behavior: ModalBehavior::default(),
                on_close: || Action::SearchClose,
                render_content: &mut render_content,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn london() -> LocationSummary {
        LocationSummary {
            id: 1,
            city: "London".into(),
            country: "United Kingdom".into(),
        }
    }

    fn props<'a>(query: &'a str, suggestions: &'a [LocationSummary]) -> SearchOverlayProps<'a> {
        SearchOverlayProps {
            query,
            suggestions,
            selected: 0,
            suggestions_current: true,
            is_focused: true,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchQuerySubmit,
            on_select: Action::SearchSelect,
        }
    }

    fn press(overlay: &mut SearchOverlay, k: &str, props: SearchOverlayProps<'_>) -> Vec<Action> {
        overlay
            .handle_event(&EventKind::Key(key(k)), props)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_enter_picks_suggestion_when_listed() {
        let mut overlay = SearchOverlay::new();
        let suggestions = [london()];
        let actions = press(&mut overlay, "enter", props("Lon", &suggestions));
        actions.assert_first(Action::SearchConfirm);
    }

    #[test]
    fn test_enter_submits_query_without_suggestions() {
        let mut overlay = SearchOverlay::new();
        let actions = press(&mut overlay, "enter", props("Lima", &[]));
        actions.assert_first(Action::SearchQuerySubmit("Lima".into()));
    }

    #[test]
    fn test_enter_submits_typed_text_over_earlier_list() {
        let mut overlay = SearchOverlay::new();
        let suggestions = [london()];
        let stale = SearchOverlayProps {
            suggestions_current: false,
            ..props("Tokyo", &suggestions)
        };
        let actions = press(&mut overlay, "enter", stale);
        actions.assert_first(Action::SearchQuerySubmit("Tokyo".into()));
    }

    #[test]
    fn test_esc_blurs() {
        let mut overlay = SearchOverlay::new();
        let actions = press(&mut overlay, "esc", props("", &[]));
        actions.assert_first(Action::SearchClose);
    }

    #[test]
    fn test_arrows_ignored_without_suggestions() {
        let mut overlay = SearchOverlay::new();
        press(&mut overlay, "down", props("x", &[])).assert_empty();
    }

    #[test]
    fn test_render_lists_suggestions() {
        let mut render = RenderHarness::new(80, 24);
        let mut overlay = SearchOverlay::new();
        let suggestions = [london()];

        let output = render.render_to_string_plain(|frame| {
            overlay.render(frame, frame.area(), props("Lon", &suggestions));
        });

        assert!(output.contains("London, United Kingdom"));
    }

    #[test]
    fn test_render_placeholder() {
        let mut render = RenderHarness::new(80, 24);
        let mut overlay = SearchOverlay::new();

        let output = render.render_to_string_plain(|frame| {
            overlay.render(frame, frame.area(), props("", &[]));
        });

        assert!(output.contains(PLACEHOLDER));
    }
}
