use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::evolution::extract_evolutions;
use crate::state::AppState;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            state.pokemon_list = DataResource::Loading;
            state.message = None;
            DispatchResult::changed_with(Effect::LoadPokemonList {
                offset: 0,
                limit: state.list_limit,
            })
        }

        Action::PokemonListDidLoad(names) => {
            state.pokemon_list = DataResource::Loaded(names);
            state.selected_index = 0;
            state.detail_name = None;
            state.reset_detail();
            let effects = select_current(state);
            changed_with(effects)
        }

        Action::PokemonListDidError(error) => {
            state.message = Some(format!("Pokemon list error: {error}"));
            state.pokemon_list = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::FocusNext => {
            state.focus_next();
            DispatchResult::changed()
        }

        Action::FocusPrev => {
            state.focus_prev();
            DispatchResult::changed()
        }

        Action::FocusSet(area) => {
            if state.focus == area {
                return DispatchResult::unchanged();
            }
            state.focus = area;
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i64 + delta as i64).max(0);
            move_selection(state, index as usize)
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i64;
            let index = (state.selected_index as i64 + delta as i64 * page).max(0);
            move_selection(state, index as usize)
        }

        Action::SelectionJumpTop => move_selection(state, 0),

        Action::SelectionJumpBottom => {
            let last = state.names().len().saturating_sub(1);
            move_selection(state, last)
        }

        Action::DexSelect(index) if index == state.selected_index => {
            // Re-picking the current entry retries a failed load.
            let effects = select_current(state);
            if effects.is_empty() {
                DispatchResult::unchanged()
            } else {
                changed_with(effects)
            }
        }

        Action::DexSelect(index) => move_selection(state, index),

        Action::PokemonDidLoad { name, detail } => {
            if !state.is_current(&name) {
                return DispatchResult::unchanged();
            }
            let species = detail.species_name.clone();
            state.detail = DataResource::Loaded(detail);
            state.species = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadPokemonSpecies { name, species })
        }

        Action::PokemonDidError { name, error } => {
            if !state.is_current(&name) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("{name} load error: {error}"));
            state.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::SpeciesDidLoad { name, species } => {
            if !state.is_current(&name) {
                return DispatchResult::unchanged();
            }
            let chain_url = species.evolution_chain_url.clone();
            state.species = DataResource::Loaded(species);
            let Some(url) = chain_url else {
                state.evolution = DataResource::Empty;
                return DispatchResult::changed();
            };
            state.evolution = DataResource::Loading;
            DispatchResult::changed_with(Effect::LoadEvolutionChain { name, url })
        }

        Action::SpeciesDidError { name, error } => {
            if !state.is_current(&name) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("{name} species error: {error}"));
            state.species = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::EvolutionDidLoad { name, chain } => {
            if !state.is_current(&name) {
                return DispatchResult::unchanged();
            }
            let evolutions = extract_evolutions(&chain);
            let species = state
                .current_detail()
                .map(|detail| detail.species_name.as_str())
                .unwrap_or(name.as_str());
            let index = evolutions
                .iter()
                .position(|stage| stage.species == species)
                .unwrap_or(0);
            state.evolution_selected_index = index;
            state.evolution = DataResource::Loaded(evolutions);
            DispatchResult::changed()
        }

        Action::EvolutionDidError { name, error } => {
            if !state.is_current(&name) {
                return DispatchResult::unchanged();
            }
            state.message = Some(format!("Evolution error: {error}"));
            state.evolution = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::EvolutionSelect(index) => {
            let Some(species) = state
                .evolutions()
                .get(index)
                .map(|stage| stage.species.clone())
            else {
                return DispatchResult::unchanged();
            };
            if index == state.evolution_selected_index {
                return DispatchResult::unchanged();
            }
            state.evolution_selected_index = index;
            // Species like toxtricity are only listed as forms (`toxtricity-amped`).
            let target = match state.dex_position(&species) {
                Some(position) => {
                    state.selected_index = position;
                    state.names()[position].clone()
                }
                None => species,
            };
            let effects = select_detail(state, &target);
            changed_with(effects)
        }

        Action::DetailTabNext => {
            state.detail_tab = state.detail_tab.cycle(1);
            state.detail_scroll = 0;
            DispatchResult::changed()
        }

        Action::DetailTabPrev => {
            state.detail_tab = state.detail_tab.cycle(-1);
            state.detail_scroll = 0;
            DispatchResult::changed()
        }

        Action::DetailScroll(delta) => {
            let max = state.max_detail_scroll() as i32;
            let next = (state.detail_scroll as i32 + delta as i32).clamp(0, max) as u16;
            if next == state.detail_scroll {
                return DispatchResult::unchanged();
            }
            state.detail_scroll = next;
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                state.detail_scroll = state.detail_scroll.min(state.max_detail_scroll());
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

fn changed_with(effects: Vec<Effect>) -> DispatchResult<Effect> {
    if effects.is_empty() {
        DispatchResult::changed()
    } else {
        DispatchResult::changed_with_many(effects)
    }
}

fn move_selection(state: &mut AppState, index: usize) -> DispatchResult<Effect> {
    if !state.set_selected_index(index) {
        return DispatchResult::unchanged();
    }
    changed_with(select_current(state))
}

fn select_current(state: &mut AppState) -> Vec<Effect> {
    let Some(name) = state.selected_name() else {
        state.detail_name = None;
        return Vec::new();
    };
    select_detail(state, &name)
}

fn select_detail(state: &mut AppState, name: &str) -> Vec<Effect> {
    if state.is_current(name) && !state.detail_failed() {
        return Vec::new();
    }
    state.detail_name = Some(name.to_string());
    state.reset_detail();
    state.detail = DataResource::Loading;
    state.message = None;
    vec![Effect::LoadPokemonDetail {
        name: name.to_string(),
    }]
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(8).max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NamedResource;
    use crate::evolution::{ChainLink, EvolutionDetail};
    use crate::state::{DetailTab, PokemonDetail, SpeciesDetail};

    fn loaded_state(names: &[&str]) -> AppState {
        let mut state = AppState::default();
        reducer(
            &mut state,
            Action::PokemonListDidLoad(names.iter().map(|name| name.to_string()).collect()),
        );
        state
    }

    fn detail(name: &str) -> PokemonDetail {
        PokemonDetail {
            id: 1,
            name: name.to_string(),
            species_name: name.to_string(),
            types: vec!["grass".into()],
            stats: Vec::new(),
            abilities: Vec::new(),
            height: 7,
            weight: 69,
            games: Vec::new(),
        }
    }

    #[test]
    fn test_init_requests_list() {
        let mut state = AppState::new(151);
        let result = reducer(&mut state, Action::Init);

        assert!(result.changed);
        assert!(state.pokemon_list.is_loading());
        assert_eq!(
            result.effects,
            vec![Effect::LoadPokemonList {
                offset: 0,
                limit: 151
            }]
        );
    }

    #[test]
    fn test_empty_list_selects_nothing() {
        let mut state = AppState::default();
        let result = reducer(&mut state, Action::PokemonListDidLoad(Vec::new()));

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert_eq!(state.detail_name, None);
    }

    #[test]
    fn test_selection_move_clamps() {
        let mut state = loaded_state(&["bulbasaur", "ivysaur"]);

        let result = reducer(&mut state, Action::SelectionMove(-1));
        assert!(!result.changed);

        let result = reducer(&mut state, Action::SelectionMove(5));
        assert!(result.changed);
        assert_eq!(state.selected_index, 1);
        assert_eq!(state.detail_name.as_deref(), Some("ivysaur"));
        assert!(state.detail.is_loading());
    }

    #[test]
    fn test_stale_responses_are_ignored() {
        let mut state = loaded_state(&["bulbasaur", "ivysaur"]);
        reducer(&mut state, Action::SelectionMove(1));

        let result = reducer(
            &mut state,
            Action::PokemonDidLoad {
                name: "bulbasaur".into(),
                detail: detail("bulbasaur"),
            },
        );
        assert!(!result.changed);
        assert!(state.detail.is_loading());
    }

    #[test]
    fn test_evolution_load_picks_current_stage() {
        let mut state = loaded_state(&["ivysaur"]);
        reducer(
            &mut state,
            Action::PokemonDidLoad {
                name: "ivysaur".into(),
                detail: detail("ivysaur"),
            },
        );
        let chain = ChainLink {
            species: NamedResource::named("bulbasaur"),
            evolution_details: Vec::new(),
            evolves_to: vec![ChainLink {
                species: NamedResource::named("ivysaur"),
                evolution_details: vec![EvolutionDetail {
                    min_level: Some(16),
                    ..Default::default()
                }],
                evolves_to: Vec::new(),
            }],
        };

        let result = reducer(
            &mut state,
            Action::EvolutionDidLoad {
                name: "ivysaur".into(),
                chain,
            },
        );

        assert!(result.changed);
        assert_eq!(state.evolutions().len(), 2);
        assert_eq!(state.evolution_selected_index, 1);
        assert_eq!(state.evolutions()[1].evolution_details, "Level 16");
    }

    #[test]
    fn test_species_without_chain_clears_evolution() {
        let mut state = loaded_state(&["ditto"]);
        let result = reducer(
            &mut state,
            Action::SpeciesDidLoad {
                name: "ditto".into(),
                species: SpeciesDetail {
                    name: "ditto".into(),
                    genus: None,
                    pokedex_entries: Vec::new(),
                    evolution_chain_url: None,
                },
            },
        );

        assert!(result.changed);
        assert!(result.effects.is_empty());
        assert!(state.evolution.is_empty());
    }

    #[test]
    fn test_detail_tabs_wrap() {
        let mut state = AppState::default();
        reducer(&mut state, Action::DetailTabPrev);
        assert_eq!(state.detail_tab, DetailTab::Games);
        reducer(&mut state, Action::DetailTabNext);
        assert_eq!(state.detail_tab, DetailTab::Stats);
    }

    #[test]
    fn test_detail_scroll_saturates() {
        let mut state = AppState {
            detail: DataResource::Loaded(PokemonDetail {
                games: (1..=10).map(|n| format!("Game {n}")).collect(),
                ..detail("bulbasaur")
            }),
            detail_tab: DetailTab::Games,
            ..Default::default()
        };
        assert!(!reducer(&mut state, Action::DetailScroll(-3)).changed);
        assert!(reducer(&mut state, Action::DetailScroll(4)).changed);
        assert_eq!(state.detail_scroll, 4);

        assert!(reducer(&mut state, Action::DetailScroll(100)).changed);
        assert_eq!(state.detail_scroll, 9);
        assert!(!reducer(&mut state, Action::DetailScroll(1)).changed);
    }

    #[test]
    fn test_detail_scroll_stops_on_empty_tab() {
        let mut state = AppState::default();
        assert!(!reducer(&mut state, Action::DetailScroll(5)).changed);
        assert_eq!(state.detail_scroll, 0);
    }

    #[test]
    fn test_reselect_retries_failed_species() {
        let mut state = loaded_state(&["bulbasaur"]);
        reducer(
            &mut state,
            Action::PokemonDidLoad {
                name: "bulbasaur".into(),
                detail: detail("bulbasaur"),
            },
        );
        reducer(
            &mut state,
            Action::SpeciesDidError {
                name: "bulbasaur".into(),
                error: "timeout".into(),
            },
        );

        let result = reducer(&mut state, Action::DexSelect(0));

        assert!(result.changed);
        assert_eq!(
            result.effects,
            vec![Effect::LoadPokemonDetail {
                name: "bulbasaur".into()
            }]
        );
        assert!(state.species.is_empty());
        assert_eq!(state.message, None);
    }

    #[test]
    fn test_reselect_without_failure_is_noop() {
        let mut state = loaded_state(&["bulbasaur"]);

        let result = reducer(&mut state, Action::DexSelect(0));

        assert!(!result.changed);
        assert!(result.effects.is_empty());
    }
}
