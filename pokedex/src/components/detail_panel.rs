use crossterm::event::KeyCode;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::{Frame, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Tabs, Wrap};
use tui_dispatch::{DataResource, EventKind};

use super::{focus_border, Component, ACCENT_GOLD, ACCENT_TEAL, BG_PANEL, TEXT_DIM, TEXT_MAIN};
use crate::action::Action;
use crate::format::{format_optional, format_text};
use crate::state::{AppState, DetailTab, PokemonDetail, PokemonStat};

pub struct DetailPanelProps<'a> {
    pub state: &'a AppState,
    pub is_focused: bool,
}

/// Header plus tabbed stats, pokedex entries and game list.
#[derive(Default)]
pub struct DetailPanel;

impl Component<Action> for DetailPanel {
    type Props<'a> = DetailPanelProps<'a>;

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
                KeyCode::Left | KeyCode::Char('h') => Some(Action::DetailTabPrev),
                KeyCode::Right | KeyCode::Char('l') => Some(Action::DetailTabNext),
                KeyCode::Down | KeyCode::Char('j') => Some(Action::DetailScroll(1)),
                KeyCode::Up | KeyCode::Char('k') => Some(Action::DetailScroll(-1)),
                KeyCode::PageDown => Some(Action::DetailScroll(10)),
                KeyCode::PageUp => Some(Action::DetailScroll(-10)),
                _ => None,
            },
            EventKind::Scroll { delta, .. } => Some(Action::DetailScroll(*delta as i16)),
            _ => None,
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let state = props.state;
        let title = format!("DATA {}", format_optional(state.detail_name.as_deref()));
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.trim_end().to_string())
            .style(Style::default().bg(BG_PANEL).fg(TEXT_MAIN))
            .border_style(focus_border(props.is_focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(2),
                Constraint::Min(1),
            ])
            .split(inner);

        frame.render_widget(
            Paragraph::new(header_text(state)).wrap(Wrap { trim: true }),
            layout[0],
        );

        let titles = DetailTab::ALL
            .iter()
            .map(|tab| tab.title())
            .collect::<Vec<_>>();
        let tabs = Tabs::new(titles)
            .select(state.detail_tab.index())
            .style(Style::default().fg(TEXT_DIM))
            .highlight_style(
                Style::default()
                    .fg(ACCENT_TEAL)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, layout[1]);

        let content = match state.detail_tab {
            DetailTab::Stats => stats_text(state),
            DetailTab::Pokedex => pokedex_text(state),
            DetailTab::Games => games_text(state),
        };
        frame.render_widget(
            Paragraph::new(content)
                .style(Style::default().fg(TEXT_MAIN))
                .wrap(Wrap { trim: true })
                .scroll((state.detail_scroll, 0)),
            layout[2],
        );
    }
}

fn header_text(state: &AppState) -> Text<'static> {
    match &state.detail {
        DataResource::Empty => Text::from("Select a pokemon."),
        DataResource::Loading => Text::from("Loading pokemon..."),
        DataResource::Failed(error) => Text::from(format!("Could not load pokemon: {error}")),
        DataResource::Loaded(detail) => {
            let mut lines = vec![Line::from(vec![
                Span::styled(
                    format!("#{:04} ", detail.id),
                    Style::default().fg(TEXT_DIM),
                ),
                Span::styled(
                    format_text(&detail.name),
                    Style::default()
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD),
                ),
            ])];
            let types = detail
                .types
                .iter()
                .map(|name| format_text(name))
                .collect::<Vec<_>>()
                .join(" / ");
            lines.push(Line::from(format!("Type: {types}")));
            if let Some(genus) = state.current_species().and_then(|species| species.genus.as_ref()) {
                lines.push(Line::from(Span::styled(
                    genus.clone(),
                    Style::default().fg(TEXT_DIM),
                )));
            }
            Text::from(lines)
        }
    }
}

fn stats_text(state: &AppState) -> Text<'static> {
    let Some(detail) = state.current_detail() else {
        return Text::from("No stats loaded.");
    };
    let mut lines = detail
        .stats
        .iter()
        .map(|stat| Line::from(render_stat(stat)))
        .collect::<Vec<_>>();
    lines.push(Line::default());
    lines.extend(profile_lines(detail));
    Text::from(lines)
}

fn profile_lines(detail: &PokemonDetail) -> Vec<Line<'static>> {
    let abilities = detail
        .abilities
        .iter()
        .map(|name| format_text(name))
        .collect::<Vec<_>>()
        .join(", ");
    vec![
        Line::from(format!(
            "Height: {:.1} m  Weight: {:.1} kg",
            detail.height as f32 / 10.0,
            detail.weight as f32 / 10.0
        )),
        Line::from(format!("Abilities: {abilities}")),
    ]
}

fn pokedex_text(state: &AppState) -> Text<'static> {
    match &state.species {
        DataResource::Empty => Text::from("No pokedex data."),
        DataResource::Loading => Text::from("Loading pokedex entries..."),
        DataResource::Failed(error) => Text::from(format!("Could not load species: {error}")),
        DataResource::Loaded(species) if species.pokedex_entries.is_empty() => {
            Text::from("No English entries.")
        }
        DataResource::Loaded(species) => {
            let mut lines = Vec::new();
            for entry in &species.pokedex_entries {
                lines.push(Line::from(Span::styled(
                    entry.version.clone(),
                    Style::default()
                        .fg(ACCENT_GOLD)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(entry.description.clone()));
                lines.push(Line::default());
            }
            Text::from(lines)
        }
    }
}

fn games_text(state: &AppState) -> Text<'static> {
    let Some(detail) = state.current_detail() else {
        return Text::from("No game data.");
    };
    if detail.games.is_empty() {
        return Text::from("Not listed in any game.");
    }
    let lines = detail
        .games
        .iter()
        .map(|game| Line::from(format!("- {game}")))
        .collect::<Vec<_>>();
    Text::from(lines)
}

fn render_stat(stat: &PokemonStat) -> String {
    let label = shorten_stat(&stat.name);
    let bar_len = (stat.value as usize / 10).clamp(1, 20);
    let bar = "#".repeat(bar_len);
    format!("{label:>4} {value:>3} {bar}", value = stat.value)
}

fn shorten_stat(name: &str) -> String {
    match name {
        "hp" => " HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SAT".to_string(),
        "special-defense" => "SDF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}
