//! Evolution chain flattening.
//!
//! PokeAPI returns evolution chains as a tree of [`ChainLink`] nodes. The UI
//! shows them as a flat list, one row per species, each with a short
//! description of what triggers the evolution into it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::NamedResource;
use crate::format::format_text;

/// `GET /evolution-chain/{id}` document.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionChainDocument {
    pub chain: ChainLink,
}

/// One node of an evolution chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainLink {
    #[serde(default)]
    pub species: NamedResource,
    /// Conditions for evolving from the parent into this species. Empty on the root.
    #[serde(default)]
    pub evolution_details: Vec<EvolutionDetail>,
    #[serde(default)]
    pub evolves_to: Vec<ChainLink>,
}

impl ChainLink {
    pub fn node_count(&self) -> usize {
        1 + self
            .evolves_to
            .iter()
            .map(ChainLink::node_count)
            .sum::<usize>()
    }
}

/// Requirements for a single evolution step. Every field is optional upstream.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvolutionDetail {
    #[serde(default)]
    pub min_level: Option<u32>,
    #[serde(default)]
    pub item: Option<NamedResource>,
    #[serde(default)]
    pub trigger: Option<NamedResource>,
    #[serde(default)]
    pub held_item: Option<NamedResource>,
    #[serde(default)]
    pub known_move: Option<NamedResource>,
    #[serde(default)]
    pub min_happiness: Option<u32>,
    #[serde(default)]
    pub time_of_day: Option<String>,
}

/// Flattened chain row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionInfo {
    pub species: String,
    pub evolution_details: String,
}

/// What makes a species evolve, in display precedence order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Trigger {
    Base,
    Level(u32),
    UseItem(String),
    Trade,
    HoldItem(String),
    KnowMove(String),
    Happiness(u32),
    TimeOfDay(String),
    Special,
}

impl Trigger {
    /// Only the first condition is consulted; branches with several
    /// simultaneous conditions collapse to that one.
    pub fn from_details(details: &[EvolutionDetail]) -> Self {
        match details.first() {
            None => Trigger::Base,
            Some(detail) => Trigger::from_detail(detail),
        }
    }

    // Zero levels, zero happiness and empty strings count as absent, which is
    // how PokeAPI encodes "no requirement".
    fn from_detail(detail: &EvolutionDetail) -> Self {
        if let Some(level) = detail.min_level.filter(|level| *level > 0) {
            return Trigger::Level(level);
        }
        if let Some(item) = named(&detail.item) {
            return Trigger::UseItem(item.to_string());
        }
        if named(&detail.trigger) == Some("trade") {
            return Trigger::Trade;
        }
        if let Some(item) = named(&detail.held_item) {
            return Trigger::HoldItem(item.to_string());
        }
        if let Some(known) = named(&detail.known_move) {
            return Trigger::KnowMove(known.to_string());
        }
        if let Some(happiness) = detail.min_happiness.filter(|value| *value > 0) {
            return Trigger::Happiness(happiness);
        }
        if let Some(time) = detail.time_of_day.as_deref().filter(|time| !time.is_empty()) {
            return Trigger::TimeOfDay(time.to_string());
        }
        Trigger::Special
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Trigger::Base => write!(f, "Base form"),
            Trigger::Level(level) => write!(f, "Level {level}"),
            Trigger::UseItem(item) => write!(f, "Use {}", format_text(item)),
            Trigger::Trade => write!(f, "Trade"),
            Trigger::HoldItem(item) => write!(f, "Hold {}", format_text(item)),
            Trigger::KnowMove(name) => write!(f, "Know {}", format_text(name)),
            Trigger::Happiness(value) => write!(f, "Happiness ≥ {value}"),
            // Time of day is shown as the API sends it.
            Trigger::TimeOfDay(time) => write!(f, "During {time}"),
            Trigger::Special => write!(f, "Special condition"),
        }
    }
}

fn named(resource: &Option<NamedResource>) -> Option<&str> {
    resource.as_ref().map(|resource| resource.name.as_str())
}

pub fn describe_trigger(details: &[EvolutionDetail]) -> String {
    Trigger::from_details(details).to_string()
}

/// Flatten a chain into pre-order rows, siblings in API order.
pub fn extract_evolutions(root: &ChainLink) -> Vec<EvolutionInfo> {
    let mut evolutions = Vec::with_capacity(root.node_count());
    collect_stages(root, &mut evolutions);
    evolutions
}

fn collect_stages(node: &ChainLink, evolutions: &mut Vec<EvolutionInfo>) {
    evolutions.push(EvolutionInfo {
        species: node.species.name.clone(),
        evolution_details: describe_trigger(&node.evolution_details),
    });
    for next in &node.evolves_to {
        collect_stages(next, evolutions);
    }
}
