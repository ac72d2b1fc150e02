use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::evolution::EvolutionInfo;

pub const DEFAULT_LIST_LIMIT: u32 = 1000;
/// Share of the terminal width taken by the detail column.
pub const DETAIL_COLUMN_PERCENT: u16 = 68;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u16,
    pub name: String,
    pub species_name: String,
    pub types: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub abilities: Vec<String>,
    pub height: u16,
    pub weight: u16,
    /// Formatted version names, sorted.
    pub games: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDetail {
    pub name: String,
    pub genus: Option<String>,
    pub pokedex_entries: Vec<PokedexEntry>,
    pub evolution_chain_url: Option<String>,
}

/// English flavor text for one game version.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PokedexEntry {
    pub version: String,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusArea {
    DexList,
    Detail,
    Evolution,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetailTab {
    #[default]
    Stats,
    Pokedex,
    Games,
}

impl DetailTab {
    pub const ALL: [DetailTab; 3] = [DetailTab::Stats, DetailTab::Pokedex, DetailTab::Games];

    pub fn index(self) -> usize {
        match self {
            DetailTab::Stats => 0,
            DetailTab::Pokedex => 1,
            DetailTab::Games => 2,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            DetailTab::Stats => "Stats",
            DetailTab::Pokedex => "Pokedex",
            DetailTab::Games => "Games",
        }
    }

    pub fn cycle(self, step: i16) -> Self {
        let len = Self::ALL.len() as i16;
        let next = (self.index() as i16 + step).rem_euclid(len);
        Self::ALL[next as usize]
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub focus: FocusArea,
    /// Page size for the creature list request.
    pub list_limit: u32,

    /// Every creature name, in API order.
    pub pokemon_list: DataResource<Vec<String>>,
    pub selected_index: usize,
    /// Creature whose details are on screen. Responses for other names are dropped.
    pub detail_name: Option<String>,

    pub detail: DataResource<PokemonDetail>,
    pub species: DataResource<SpeciesDetail>,
    /// Flattened chain for the current selection, rebuilt on every selection.
    pub evolution: DataResource<Vec<EvolutionInfo>>,
    pub evolution_selected_index: usize,

    pub detail_tab: DetailTab,
    pub detail_scroll: u16,

    pub message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            terminal_size: (80, 24),
            focus: FocusArea::DexList,
            list_limit: DEFAULT_LIST_LIMIT,
            pokemon_list: DataResource::Empty,
            selected_index: 0,
            detail_name: None,
            detail: DataResource::Empty,
            species: DataResource::Empty,
            evolution: DataResource::Empty,
            evolution_selected_index: 0,
            detail_tab: DetailTab::default(),
            detail_scroll: 0,
            message: None,
        }
    }
}

impl AppState {
    pub fn new(list_limit: u32) -> Self {
        Self {
            list_limit,
            ..Self::default()
        }
    }

    pub fn names(&self) -> &[String] {
        self.pokemon_list.data().map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn selected_name(&self) -> Option<String> {
        self.names().get(self.selected_index).cloned()
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        let len = self.names().len();
        if len == 0 {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(len - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    /// Dex index for a species: the entry named exactly like it, else its
    /// first `{species}-{form}` entry.
    pub fn dex_position(&self, species: &str) -> Option<usize> {
        let names = self.names();
        names.iter().position(|name| name == species).or_else(|| {
            let prefix = format!("{species}-");
            names.iter().position(|name| name.starts_with(&prefix))
        })
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.detail_name.as_deref() == Some(name)
    }

    pub fn current_detail(&self) -> Option<&PokemonDetail> {
        self.detail.data()
    }

    pub fn current_species(&self) -> Option<&SpeciesDetail> {
        self.species.data()
    }

    pub fn evolutions(&self) -> &[EvolutionInfo] {
        self.evolution.data().map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when any request for the current selection failed.
    pub fn detail_failed(&self) -> bool {
        self.detail.is_failed() || self.species.is_failed() || self.evolution.is_failed()
    }

    /// Text width inside the detail panel borders.
    pub fn detail_text_width(&self) -> usize {
        (self.terminal_size.0 as usize * DETAIL_COLUMN_PERCENT as usize / 100)
            .saturating_sub(2)
            .max(1)
    }

    /// Wrapped line count of the active detail tab, placeholders included.
    pub fn detail_line_count(&self) -> usize {
        let width = self.detail_text_width();
        let wrapped = |len: usize| len.div_ceil(width).max(1);
        match self.detail_tab {
            DetailTab::Stats => match self.current_detail() {
                Some(detail) => {
                    let abilities = "Abilities: ".len()
                        + detail.abilities.iter().map(String::len).sum::<usize>()
                        + 2 * detail.abilities.len().saturating_sub(1);
                    detail.stats.len() + 2 + wrapped(abilities)
                }
                None => 1,
            },
            DetailTab::Pokedex => match self.current_species() {
                Some(species) if !species.pokedex_entries.is_empty() => species
                    .pokedex_entries
                    .iter()
                    .map(|entry| {
                        wrapped(entry.version.chars().count())
                            + wrapped(entry.description.chars().count())
                            + 1
                    })
                    .sum(),
                _ => 1,
            },
            DetailTab::Games => self
                .current_detail()
                .map(|detail| detail.games.len().max(1))
                .unwrap_or(1),
        }
    }

    /// Largest useful scroll offset for the active detail tab.
    pub fn max_detail_scroll(&self) -> u16 {
        self.detail_line_count()
            .saturating_sub(1)
            .min(u16::MAX as usize) as u16
    }

    pub fn reset_detail(&mut self) {
        self.detail = DataResource::Empty;
        self.species = DataResource::Empty;
        self.evolution = DataResource::Empty;
        self.evolution_selected_index = 0;
        self.detail_scroll = 0;
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            FocusArea::DexList => FocusArea::Detail,
            FocusArea::Detail => FocusArea::Evolution,
            FocusArea::Evolution => FocusArea::DexList,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            FocusArea::DexList => FocusArea::Evolution,
            FocusArea::Detail => FocusArea::DexList,
            FocusArea::Evolution => FocusArea::Detail,
        };
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Dex")
                .entry("total", ron_string(&self.names().len()))
                .entry("selected", ron_string(&self.selected_index))
                .entry("detail", ron_string(&self.detail_name))
                .entry("focus", ron_string(&self.focus))
                .entry("tab", ron_string(&self.detail_tab)),
            DebugSection::new("Evolution")
                .entry("stages", ron_string(&self.evolutions().len()))
                .entry("selected", ron_string(&self.evolution_selected_index)),
            DebugSection::new("Status")
                .entry("list_loading", ron_string(&self.pokemon_list.is_loading()))
                .entry("detail_loading", ron_string(&self.detail.is_loading()))
                .entry("species_loading", ron_string(&self.species.is_loading()))
                .entry("evolution_loading", ron_string(&self.evolution.is_loading()))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
