use serde::{Deserialize, Serialize};

use crate::evolution::ChainLink;
use crate::state::{FocusArea, PokemonDetail, SpeciesDetail};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    PokemonListDidLoad(Vec<String>),
    PokemonListDidError(String),

    FocusNext,
    FocusPrev,
    FocusSet(FocusArea),

    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),

    PokemonDidLoad { name: String, detail: PokemonDetail },
    PokemonDidError { name: String, error: String },
    SpeciesDidLoad { name: String, species: SpeciesDetail },
    SpeciesDidError { name: String, error: String },
    EvolutionDidLoad { name: String, chain: ChainLink },
    EvolutionDidError { name: String, error: String },
    EvolutionSelect(usize),

    DetailTabNext,
    DetailTabPrev,
    DetailScroll(i16),

    UiTerminalResize(u16, u16),
    Quit,
}
