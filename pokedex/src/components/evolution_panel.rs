use ratatui::prelude::{Frame, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tui_dispatch::{DataResource, EventKind};
use tui_dispatch_components::{SelectList, SelectListBehavior, SelectListProps};

use super::{focus_border, list_style, Component, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::format::format_text;
use crate::state::AppState;

pub struct EvolutionPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Flattened evolution chain. Picking a row loads that species.
pub struct EvolutionPanel {
    list: SelectList,
}

impl EvolutionPanel {
    pub fn new() -> Self {
        Self {
            list: SelectList::new(),
        }
    }
}

impl Component<Action> for EvolutionPanel {
    type Props<'a> = EvolutionPanelProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> impl IntoIterator<Item = Action> {
        let items = evolution_items(props.state);
        if !props.is_focused || items.is_empty() {
            return Vec::new();
        }

        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: props
                .state
                .evolution_selected_index
                .min(items.len().saturating_sub(1)),
            is_focused: true,
            style: list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::EvolutionSelect,
            render_item: &|item| item.clone(),
        };
        self.list.handle_event(event, list_props).into_iter().collect()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let block = Block::default()
            .borders(Borders::ALL)
            .title("EVOLUTION")
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(focus_border(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let items = evolution_items(state);
        if items.is_empty() {
            let message = match &state.evolution {
                DataResource::Loading => "Evolution loading...".to_string(),
                DataResource::Failed(error) => format!("Evolution unavailable: {error}"),
                _ if state.species.is_loading() || state.detail.is_loading() => {
                    "Evolution loading...".to_string()
                }
                _ => "No evolution data.".to_string(),
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(TEXT_DIM))
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }

        let list_props = SelectListProps {
            items: &items,
            count: items.len(),
            selected: state
                .evolution_selected_index
                .min(items.len().saturating_sub(1)),
            is_focused: props.is_focused,
            style: list_style(),
            behavior: SelectListBehavior {
                show_scrollbar: true,
                wrap_navigation: false,
            },
            on_select: Action::EvolutionSelect,
            render_item: &|item| item.clone(),
        };
        self.list.render(frame, inner, list_props);
    }
}

fn evolution_items(state: &AppState) -> Vec<Line<'static>> {
    state
        .evolutions()
        .iter()
        .map(|stage| {
            Line::from(vec![
                Span::raw(format_text(&stage.species)),
                Span::styled(
                    format!("  {}", stage.evolution_details),
                    Style::default().fg(TEXT_DIM),
                ),
            ])
        })
        .collect()
}
