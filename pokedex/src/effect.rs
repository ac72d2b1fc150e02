#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    LoadPokemonList { offset: u32, limit: u32 },
    LoadPokemonDetail { name: String },
    /// `name` is the selected creature; `species` is what gets looked up.
    LoadPokemonSpecies { name: String, species: String },
    LoadEvolutionChain { name: String, url: String },
}
