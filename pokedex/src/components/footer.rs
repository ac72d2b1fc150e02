use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::Borders;
use tui_dispatch::EventKind;
use tui_dispatch_components::style::BorderStyle;
use tui_dispatch_components::{
    BaseStyle, Padding, StatusBar, StatusBarHint, StatusBarItem, StatusBarProps,
    StatusBarSection, StatusBarStyle,
};

use super::{Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::state::{AppState, FocusArea};

pub struct FooterProps<'a> {
    pub state: &'a AppState,
}

/// Key hints for the focused pane and the current status line.
pub struct Footer {
    status_bar: StatusBar,
}

impl Footer {
    pub fn new() -> Self {
        Self {
            status_bar: StatusBar::new(),
        }
    }
}

impl Component<Action> for Footer {
    type Props<'a> = FooterProps<'a>;

    fn handle_event(
        &mut self,
        _event: &EventKind,
        _props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        None::<Action>
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let status = status_text(props.state);
        let (left_hints, center_hints) = status_hints(props.state);
        let status_span = Span::styled(status.as_str(), Style::default().fg(ACCENT_GOLD));
        let status_items = [StatusBarItem::span(status_span)];

        let style = StatusBarStyle {
            base: BaseStyle {
                border: Some(BorderStyle {
                    borders: Borders::ALL,
                    style: Style::default().fg(TEXT_DIM),
                    focused_style: Some(Style::default().fg(ACCENT_TEAL)),
                }),
                padding: Padding::xy(1, 0),
                bg: Some(BG_PANEL),
                fg: Some(TEXT_MAIN),
            },
            text: Style::default().fg(TEXT_DIM),
            hint_key: Style::default()
                .fg(ACCENT_TEAL)
                .add_modifier(Modifier::BOLD),
            hint_label: Style::default().fg(TEXT_DIM),
            separator: Style::default().fg(TEXT_DIM),
        };

        let status_props = StatusBarProps {
            left: StatusBarSection::hints(&left_hints).with_separator("  "),
            center: StatusBarSection::hints(&center_hints).with_separator("  "),
            right: StatusBarSection::items(&status_items).with_separator("  "),
            style,
            is_focused: false,
        };
        Component::<Action>::render(&mut self.status_bar, frame, area, status_props);
    }
}

fn status_text(state: &AppState) -> String {
    if let Some(message) = &state.message {
        return message.clone();
    }
    if state.pokemon_list.is_loading() {
        "Loading pokedex...".to_string()
    } else if state.detail.is_loading() {
        "Loading pokemon...".to_string()
    } else if state.species.is_loading() {
        "Loading species...".to_string()
    } else if state.evolution.is_loading() {
        "Loading evolution chain...".to_string()
    } else {
        String::new()
    }
}

fn status_hints(state: &AppState) -> (Vec<StatusBarHint<'static>>, Vec<StatusBarHint<'static>>) {
    let left = match state.focus {
        FocusArea::DexList => vec![
            StatusBarHint::new("j/k", "Move"),
            StatusBarHint::new("PgUp/PgDn", "Page"),
            StatusBarHint::new("g/G", "Top/Bottom"),
        ],
        FocusArea::Detail => vec![
            StatusBarHint::new("h/l", "Tabs"),
            StatusBarHint::new("j/k", "Scroll"),
        ],
        FocusArea::Evolution => vec![StatusBarHint::new("j/k", "Select")],
    };
    let center = vec![
        StatusBarHint::new("Tab/1-3", "Focus"),
        StatusBarHint::new("q", "Quit"),
    ];
    (left, center)
}
