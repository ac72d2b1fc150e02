//! Store flows driven through EffectStoreTestHarness.

use tui_dispatch::testing::*;
use tui_dispatch::NumericComponentId;
use pokedex::{
    action::Action,
    api::NamedResource,
    components::{Component, DexList, DexListProps, EvolutionPanel, EvolutionPanelProps},
    effect::Effect,
    evolution::{ChainLink, EvolutionDetail},
    reducer::reducer,
    state::{AppState, FocusArea, PokemonDetail, SpeciesDetail},
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|name| name.to_string()).collect()
}

fn detail(name: &str, species: &str) -> PokemonDetail {
    PokemonDetail {
        id: 1,
        name: name.into(),
        species_name: species.into(),
        types: vec!["grass".into()],
        stats: Vec::new(),
        abilities: Vec::new(),
        height: 7,
        weight: 69,
        games: Vec::new(),
    }
}

fn species(name: &str, chain_url: Option<&str>) -> SpeciesDetail {
    SpeciesDetail {
        name: name.into(),
        genus: None,
        pokedex_entries: Vec::new(),
        evolution_chain_url: chain_url.map(str::to_string),
    }
}

fn bulbasaur_chain() -> ChainLink {
    ChainLink {
        species: NamedResource::named("bulbasaur"),
        evolution_details: Vec::new(),
        evolves_to: vec![ChainLink {
            species: NamedResource::named("ivysaur"),
            evolution_details: vec![EvolutionDetail {
                min_level: Some(16),
                ..Default::default()
            }],
            evolves_to: vec![ChainLink {
                species: NamedResource::named("venusaur"),
                evolution_details: vec![EvolutionDetail {
                    min_level: Some(32),
                    ..Default::default()
                }],
                evolves_to: Vec::new(),
            }],
        }],
    }
}

/// Actions that leave bulbasaur selected with its detail, species and chain loaded.
fn bulbasaur_loaded() -> Vec<Action> {
    vec![
        Action::Init,
        Action::PokemonListDidLoad(names(&["bulbasaur", "ivysaur", "venusaur"])),
        Action::PokemonDidLoad {
            name: "bulbasaur".into(),
            detail: detail("bulbasaur", "bulbasaur"),
        },
        Action::SpeciesDidLoad {
            name: "bulbasaur".into(),
            species: species("bulbasaur", Some("https://pokeapi.co/api/v2/evolution-chain/1/")),
        },
        Action::EvolutionDidLoad {
            name: "bulbasaur".into(),
            chain: bulbasaur_chain(),
        },
    ]
}

#[test]
fn test_init_requests_list() {
    let mut harness = EffectStoreTestHarness::new(AppState::new(151), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.pokemon_list.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| {
        matches!(e, Effect::LoadPokemonList { offset: 0, limit: 151 })
    });
}

#[test]
fn test_list_load_selects_first_entry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.drain_effects();
    harness.complete_action(Action::PokemonListDidLoad(names(&["bulbasaur", "ivysaur"])));
    let (changed, total) = harness.process_emitted();

    assert_eq!(total, 1);
    assert_eq!(changed, 1);
    harness.assert_state(|s| s.detail_name.as_deref() == Some("bulbasaur"));
    harness.assert_state(|s| s.detail.is_loading());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadPokemonDetail { name } if name == "bulbasaur"),
    );
}

#[test]
fn test_list_error_is_reported() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::PokemonListDidError("connection refused".into()));
    harness.process_emitted();

    harness.assert_state(|s| s.pokemon_list.is_failed());
    harness.assert_state(|s| s.pokemon_list.error() == Some("connection refused"));
    harness.assert_state(|s| {
        s.message.as_deref() == Some("Pokemon list error: connection refused")
    });
}

#[test]
fn test_detail_species_chain_sequence() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::PokemonListDidLoad(names(&["deoxys-normal"])));
    harness.drain_effects();

    // Alternate forms look their species up under the species name.
    harness.dispatch_collect(Action::PokemonDidLoad {
        name: "deoxys-normal".into(),
        detail: detail("deoxys-normal", "deoxys"),
    });
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadPokemonSpecies { name, species }
                if name == "deoxys-normal" && species == "deoxys"
        )
    });
    harness.assert_state(|s| s.species.is_loading());

    harness.dispatch_collect(Action::SpeciesDidLoad {
        name: "deoxys-normal".into(),
        species: species("deoxys", Some("https://pokeapi.co/api/v2/evolution-chain/202/")),
    });
    let effects = harness.drain_effects();
    effects.effects_first_matches(|e| {
        matches!(
            e,
            Effect::LoadEvolutionChain { url, .. }
                if url == "https://pokeapi.co/api/v2/evolution-chain/202/"
        )
    });
    harness.assert_state(|s| s.evolution.is_loading());
}

#[test]
fn test_chain_load_highlights_current_species() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::PokemonListDidLoad(names(&["bulbasaur", "ivysaur"])));
    harness.dispatch_collect(Action::SelectionMove(1));
    harness.dispatch_collect(Action::PokemonDidLoad {
        name: "ivysaur".into(),
        detail: detail("ivysaur", "ivysaur"),
    });

    harness.dispatch_collect(Action::EvolutionDidLoad {
        name: "ivysaur".into(),
        chain: bulbasaur_chain(),
    });

    harness.assert_state(|s| s.evolutions().len() == 3);
    harness.assert_state(|s| s.evolution_selected_index == 1);
    harness.assert_state(|s| s.evolutions()[2].evolution_details == "Level 32");
}

#[test]
fn test_stale_results_are_dropped() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::PokemonListDidLoad(names(&["bulbasaur", "ivysaur"])));
    harness.dispatch_collect(Action::SelectionMove(1));
    harness.drain_effects();

    let results = harness.dispatch_all([
        Action::PokemonDidLoad {
            name: "bulbasaur".into(),
            detail: detail("bulbasaur", "bulbasaur"),
        },
        Action::SpeciesDidError {
            name: "bulbasaur".into(),
            error: "timeout".into(),
        },
        Action::EvolutionDidLoad {
            name: "bulbasaur".into(),
            chain: bulbasaur_chain(),
        },
    ]);

    assert_eq!(results, vec![false, false, false]);
    harness.assert_state(|s| s.detail_name.as_deref() == Some("ivysaur"));
    harness.assert_state(|s| s.detail.is_loading());
    harness.assert_state(|s| s.message.is_none());
    harness.drain_effects().effects_count(0);
}

#[test]
fn test_detail_error_keeps_selection() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::PokemonListDidLoad(names(&["missingno"])));

    harness.dispatch_collect(Action::PokemonDidError {
        name: "missingno".into(),
        error: "https://pokeapi.co/api/v2/pokemon/missingno returned 404 Not Found".into(),
    });

    harness.assert_state(|s| s.detail.is_failed());
    harness.assert_state(|s| s.detail_name.as_deref() == Some("missingno"));
    harness.assert_state(|s| {
        s.message
            .as_deref()
            .is_some_and(|message| message.starts_with("missingno load error"))
    });
}

#[test]
fn test_evolution_select_moves_dex_selection() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    for action in bulbasaur_loaded() {
        harness.dispatch_collect(action);
    }
    harness.drain_effects();

    harness.dispatch_collect(Action::EvolutionSelect(2));

    harness.assert_state(|s| s.selected_index == 2);
    harness.assert_state(|s| s.detail_name.as_deref() == Some("venusaur"));
    harness.assert_state(|s| s.detail.is_loading());
    harness.assert_state(|s| s.evolution.is_empty());

    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadPokemonDetail { name } if name == "venusaur"),
    );
}

#[test]
fn test_evolution_select_outside_list_loads_directly() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::PokemonListDidLoad(names(&["bulbasaur"])));
    harness.dispatch_collect(Action::PokemonDidLoad {
        name: "bulbasaur".into(),
        detail: detail("bulbasaur", "bulbasaur"),
    });
    harness.dispatch_collect(Action::EvolutionDidLoad {
        name: "bulbasaur".into(),
        chain: bulbasaur_chain(),
    });
    harness.drain_effects();

    harness.dispatch_collect(Action::EvolutionSelect(1));

    harness.assert_state(|s| s.selected_index == 0);
    harness.assert_state(|s| s.detail_name.as_deref() == Some("ivysaur"));
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::LoadPokemonDetail { name } if name == "ivysaur"));
}

#[test]
fn test_evolution_select_finds_form_entry() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::PokemonListDidLoad(names(&["toxel", "toxtricity-amped"])));
    harness.dispatch_collect(Action::PokemonDidLoad {
        name: "toxel".into(),
        detail: detail("toxel", "toxel"),
    });
    harness.dispatch_collect(Action::EvolutionDidLoad {
        name: "toxel".into(),
        chain: ChainLink {
            species: NamedResource::named("toxel"),
            evolution_details: Vec::new(),
            evolves_to: vec![ChainLink {
                species: NamedResource::named("toxtricity"),
                evolution_details: vec![EvolutionDetail {
                    min_level: Some(30),
                    ..Default::default()
                }],
                evolves_to: Vec::new(),
            }],
        },
    });
    harness.drain_effects();

    harness.dispatch_collect(Action::EvolutionSelect(1));

    harness.assert_state(|s| s.selected_index == 1);
    harness.assert_state(|s| s.detail_name.as_deref() == Some("toxtricity-amped"));
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(
        |e| matches!(e, Effect::LoadPokemonDetail { name } if name == "toxtricity-amped"),
    );

    // The form's species lookup goes back to the plain species name.
    harness.dispatch_collect(Action::PokemonDidLoad {
        name: "toxtricity-amped".into(),
        detail: detail("toxtricity-amped", "toxtricity"),
    });
    harness.drain_effects().effects_first_matches(|e| {
        matches!(e, Effect::LoadPokemonSpecies { species, .. } if species == "toxtricity")
    });
}

#[test]
fn test_reselect_retries_after_chain_error() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    for action in bulbasaur_loaded() {
        harness.dispatch_collect(action);
    }
    harness.dispatch_collect(Action::EvolutionDidError {
        name: "bulbasaur".into(),
        error: "timeout".into(),
    });
    harness.drain_effects();

    harness.dispatch_collect(Action::DexSelect(0));

    harness.assert_state(|s| s.detail.is_loading());
    harness.assert_state(|s| s.message.is_none());
    harness.drain_effects().effects_first_matches(
        |e| matches!(e, Effect::LoadPokemonDetail { name } if name == "bulbasaur"),
    );
}

#[test]
fn test_focus_cycles() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::FocusNext);
    harness.assert_state(|s| s.focus == FocusArea::Detail);
    harness.dispatch_collect(Action::FocusNext);
    harness.assert_state(|s| s.focus == FocusArea::Evolution);
    harness.dispatch_collect(Action::FocusPrev);
    harness.dispatch_collect(Action::FocusPrev);
    harness.dispatch_collect(Action::FocusPrev);
    harness.assert_state(|s| s.focus == FocusArea::Evolution);

    harness.dispatch_collect(Action::FocusSet(FocusArea::Detail));
    harness.assert_state(|s| s.focus == FocusArea::Detail);
    let results = harness.dispatch_all([Action::FocusSet(FocusArea::Detail)]);
    assert_eq!(results, vec![false]);
}

#[test]
fn test_keyboard_moves_dex_selection() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    for action in bulbasaur_loaded() {
        harness.dispatch_collect(action);
    }
    harness.drain_effects();
    let mut component = DexList::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("j", |state, event| {
        let props = DexListProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::DexSelect(1));

    harness.dispatch_collect(Action::DexSelect(1));
    harness.assert_state(|s| s.detail_name.as_deref() == Some("ivysaur"));
}

#[test]
fn test_keyboard_picks_evolution() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    for action in bulbasaur_loaded() {
        harness.dispatch_collect(action);
    }
    harness.drain_effects();
    let mut component = EvolutionPanel::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("j", |state, event| {
        let props = EvolutionPanelProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_first(Action::EvolutionSelect(1));
}
