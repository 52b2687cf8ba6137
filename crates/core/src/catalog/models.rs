//! # Catalog Models
//!
//! Normalized lookup results plus the raw PokeAPI payload shapes they are
//! built from.

use serde::{Deserialize, Serialize};

/// A named link into the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRef {
    pub name: String,
    /// URL that fetches the full resource
    #[serde(rename = "url")]
    pub fetch_ref: String,
}

/// A base stat such as `hp` or `speed`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stat {
    pub name: String,
    pub value: i64,
}

/// A single lookup result, ready for presentation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    pub name: String,
    pub sprite_url: String,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<Stat>,
    pub height_decimeters: i64,
    /// Upstream reports weight in hectograms
    pub weight_decimeters: i64,
    /// Alternate forms of the item's species
    pub variants: Vec<CatalogRef>,
}

impl CatalogItem {
    pub fn height_meters(&self) -> f64 {
        self.height_decimeters as f64 / 10.0
    }

    pub fn weight_kilograms(&self) -> f64 {
        self.weight_decimeters as f64 / 10.0
    }
}

// =============================================================================
// Wire formats
// =============================================================================

/// `GET /pokemon/{name}`
#[derive(Debug, Deserialize)]
pub(crate) struct PokemonResponse {
    pub name: String,
    #[serde(default)]
    pub height: i64,
    #[serde(default)]
    pub weight: i64,
    #[serde(default)]
    pub sprites: Sprites,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    pub species: Option<CatalogRef>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Sprites {
    pub front_default: Option<String>,
    #[serde(default)]
    pub other: OtherSprites,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct OtherSprites {
    #[serde(rename = "official-artwork", default)]
    pub official_artwork: Artwork,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Artwork {
    pub front_default: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TypeSlot {
    #[serde(rename = "type")]
    pub kind: NamedField,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AbilitySlot {
    pub ability: NamedField,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatSlot {
    pub base_stat: i64,
    pub stat: NamedField,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NamedField {
    pub name: String,
}

/// `GET /pokemon?limit=N`
#[derive(Debug, Deserialize)]
pub(crate) struct ListingResponse {
    #[serde(default)]
    pub results: Vec<CatalogRef>,
}

/// `GET /pokemon-species/{name}`
#[derive(Debug, Deserialize)]
pub(crate) struct SpeciesResponse {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub varieties: Vec<Variety>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Variety {
    #[serde(default)]
    pub is_default: bool,
    pub pokemon: CatalogRef,
}

impl PokemonResponse {
    /// Official artwork, falling back to the default sprite
    pub fn sprite_url(&self) -> String {
        self.sprites
            .other
            .official_artwork
            .front_default
            .clone()
            .or_else(|| self.sprites.front_default.clone())
            .unwrap_or_default()
    }

    pub fn into_item(self, variants: Vec<CatalogRef>) -> CatalogItem {
        let sprite_url = self.sprite_url();
        CatalogItem {
            name: self.name,
            sprite_url,
            types: self.types.into_iter().map(|t| t.kind.name).collect(),
            abilities: self.abilities.into_iter().map(|a| a.ability.name).collect(),
            stats: self
                .stats
                .into_iter()
                .map(|s| Stat {
                    name: s.stat.name,
                    value: s.base_stat,
                })
                .collect(),
            height_decimeters: self.height,
            weight_decimeters: self.weight,
            variants,
        }
    }
}

impl SpeciesResponse {
    /// Non-canonical forms, empty when the species has only one
    pub fn alternate_forms(self) -> Vec<CatalogRef> {
        if self.varieties.len() <= 1 {
            return Vec::new();
        }

        let species = self.name;
        self.varieties
            .into_iter()
            .filter(|v| !v.is_default && v.pokemon.name != species)
            .map(|v| v.pokemon)
            .collect()
    }
}
