use crossterm::event::KeyCode;
use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{SelectList, SelectListBehavior, SelectListProps};

use super::{focus_border, list_style, Component, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::format::format_text;
use crate::state::AppState;

pub struct DexListProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Scrollable list of every creature in the dex.
pub struct DexList {
    list: SelectList,
}

impl DexList {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl Component<Action> for DexList {
    type Props<'a> = DexListProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        if !props.is_focused {
            return Vec::new();
        }

        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::PageDown => vec![Action::SelectionPage(1)],
                KeyCode::PageUp => vec![Action::SelectionPage(-1)],
                KeyCode::Home | KeyCode::Char('g') => vec![Action::SelectionJumpTop],
                KeyCode::End | KeyCode::Char('G') => vec![Action::SelectionJumpBottom],
                _ => {
                    let items = dex_items(props.state);
                    let list_props = SelectListProps {
                        items: &items,
                        count: items.len(),
                        selected: props.state.selected_index.min(items.len().saturating_sub(1)),
                        is_focused: true,
                        style: list_style(),
                        behavior: SelectListBehavior {
                            show_scrollbar: true,
                            wrap_navigation: false,
                        },
                        on_select: Action::DexSelect,
                        render_item: &|item| item.clone(),
                    };
                    self.list.handle_event(event, list_props).into_iter().collect()
                }
            },
            EventKind::Scroll { delta, .. } => vec![Action::SelectionMove((*delta * 3) as i16)],
            _ => Vec::new(),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let title = match state.names().len() {
            0 => "DEX".to_string(),
            total => format!("DEX ({total})"),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(focus_border(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let placeholder = match &state.pokemon_list {
            DataResource::Empty => Some("Waiting for data...".to_string()),
            DataResource::Loading => Some("Loading pokedex...".to_string()),
            DataResource::Failed(error) => Some(format!("Could not load list: {error}")),
            DataResource::Loaded(names) if names.is_empty() => Some("No entries.".to_string()),
            DataResource::Loaded(_) => None,
        };
        if let Some(message) = placeholder {
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(TEXT_DIM))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }

        let items = dex_items(state);
        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state.selected_index.min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::DexSelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, inner, list_props);
    }
}

fn dex_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .names()
        .iter()
        .enumerate()
        .map(|(idx, name)| Line::from(format!("#{:04} {}", idx + 1, format_text(name))))
        .collect()
}
