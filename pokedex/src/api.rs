use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::evolution::{ChainLink, EvolutionChainDocument};
use crate::format::format_text;
use crate::state::{PokedexEntry, PokemonDetail, PokemonStat, SpeciesDetail};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
const CACHE_DIR_NAME: &str = "pokedex-tui";
const ENTRY_LANGUAGE: &str = "en";

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{url} returned {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub base_url: String,
    /// Response cache directory; `None` disables the disk cache.
    pub cache_dir: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            cache_dir: Some(default_cache_dir()),
        }
    }
}

pub fn default_cache_dir() -> PathBuf {
    dirs_next::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join(CACHE_DIR_NAME)
}

static CONFIG: OnceLock<ApiConfig> = OnceLock::new();

/// Install the client configuration. Only the first call has any effect.
pub fn configure(config: ApiConfig) {
    if CONFIG.set(config).is_err() {
        tracing::warn!("api already configured; keeping the first configuration");
    }
}

fn config() -> &'static ApiConfig {
    CONFIG.get_or_init(ApiConfig::default)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedResource {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub url: String,
}

impl NamedResource {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            url: String::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    #[serde(default)]
    species: Option<NamedResource>,
    #[serde(default)]
    height: u16,
    #[serde(default)]
    weight: u16,
    #[serde(default)]
    types: Vec<PokemonTypeSlot>,
    #[serde(default)]
    stats: Vec<PokemonStatSlot>,
    #[serde(default)]
    abilities: Vec<PokemonAbilitySlot>,
    #[serde(default)]
    game_indices: Vec<GameIndex>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GameIndex {
    version: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    name: String,
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    genera: Vec<GenusEntry>,
    #[serde(default)]
    evolution_chain: Option<ApiResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct ApiResource {
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
    #[serde(default)]
    version: Option<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

pub async fn list_pokemon(offset: u32, limit: u32) -> Result<Vec<String>, ApiError> {
    let url = format!(
        "{base}/pokemon?offset={offset}&limit={limit}",
        base = config().base_url
    );
    let response: ListResponse = fetch_json_cached(&url).await?;
    Ok(response
        .results
        .into_iter()
        .map(|entry| entry.name)
        .collect())
}

pub async fn fetch_pokemon_detail(name: &str) -> Result<PokemonDetail, ApiError> {
    let url = format!("{base}/pokemon/{name}", base = config().base_url);
    let response: PokemonResponse = fetch_json_cached(&url).await?;
    Ok(pokemon_detail(response))
}

pub async fn fetch_pokemon_species(name: &str) -> Result<SpeciesDetail, ApiError> {
    let url = format!("{base}/pokemon-species/{name}", base = config().base_url);
    let response: PokemonSpeciesResponse = fetch_json_cached(&url).await?;
    Ok(species_detail(response))
}

pub async fn fetch_evolution_chain(url: &str) -> Result<ChainLink, ApiError> {
    let document: EvolutionChainDocument = fetch_json_cached(url).await?;
    Ok(document.chain)
}

fn pokemon_detail(response: PokemonResponse) -> PokemonDetail {
    let species_name = response
        .species
        .map(|species| species.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| response.name.clone());
    PokemonDetail {
        id: response.id,
        species_name,
        types: response
            .types
            .into_iter()
            .map(|slot| slot.type_info.name)
            .collect(),
        stats: response
            .stats
            .into_iter()
            .map(|slot| PokemonStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        abilities: response
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        height: response.height,
        weight: response.weight,
        games: available_games(&response.game_indices),
        name: response.name,
    }
}

fn species_detail(response: PokemonSpeciesResponse) -> SpeciesDetail {
    let genus = response
        .genera
        .iter()
        .find(|entry| entry.language.name == ENTRY_LANGUAGE)
        .map(|entry| entry.genus.clone());
    SpeciesDetail {
        pokedex_entries: pokedex_entries(&response.flavor_text_entries),
        genus,
        evolution_chain_url: response.evolution_chain.map(|chain| chain.url),
        name: response.name,
    }
}

fn available_games(indices: &[GameIndex]) -> Vec<String> {
    let mut games: Vec<String> = indices
        .iter()
        .map(|index| format_text(&index.version.name))
        .collect();
    games.sort();
    games
}

fn pokedex_entries(entries: &[FlavorTextEntry]) -> Vec<PokedexEntry> {
    entries
        .iter()
        .filter(|entry| entry.language.name == ENTRY_LANGUAGE)
        .map(|entry| {
            let version = entry
                .version
                .as_ref()
                .map(|version| version.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or("Unknown");
            PokedexEntry {
                version: format_text(version),
                description: sanitize_text(&entry.flavor_text),
            }
        })
        .collect()
}

fn sanitize_text(text: &str) -> String {
    text.replace('\n', " ").replace('\u{000C}', " ")
}

async fn fetch_json_cached<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, ApiError> {
    let bytes = fetch_bytes_cached(url).await?;
    match serde_json::from_slice(&bytes) {
        Ok(value) => Ok(value),
        Err(err) => {
            if let Some(path) = cache_path("http", url) {
                tracing::warn!(%url, error = %err, "evicting undecodable cache entry");
                let _ = fs::remove_file(&path).await;
            }
            Err(err.into())
        }
    }
}

async fn fetch_bytes_cached(url: &str) -> Result<Vec<u8>, ApiError> {
    let cache_path = cache_path("http", url);
    if let Some(path) = cache_path.as_deref() {
        if let Some(bytes) = read_cache(path).await {
            tracing::debug!(%url, "cache hit");
            return Ok(bytes);
        }
    }

    tracing::debug!(%url, "fetching");
    let response = http_client().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        tracing::warn!(%url, %status, "request failed");
        return Err(ApiError::Status {
            url: url.to_string(),
            status,
        });
    }
    let bytes = response.bytes().await?.to_vec();
    if let Some(path) = cache_path.as_deref() {
        write_cache(path, &bytes).await;
    }
    Ok(bytes)
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

fn cache_path(kind: &str, url: &str) -> Option<PathBuf> {
    let root = config().cache_dir.as_ref()?;
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let digest = hex::encode(hasher.finalize());
    Some(root.join(kind).join(digest))
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    if let Err(err) = fs::write(path, bytes).await {
        tracing::debug!(path = %path.display(), error = %err, "cache write failed");
    }
}
