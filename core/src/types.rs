//! Domain DTOs for the Rick and Morty API.
//!
//! # Design
//! These types mirror the remote API's schema but are defined independently
//! from the mock-server crate. Integration tests catch any schema drift
//! between the two. Only the fields the API always sends are required; the
//! rest default so that trimmed-down fixtures still decode.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::tag::EntityKind;

/// Name and URL of a location referenced from a character.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationRef {
    pub name: String,
    #[serde(default)]
    pub url: String,
}

/// A single character returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub gender: String,
    #[serde(default)]
    pub origin: LocationRef,
    #[serde(default)]
    pub location: LocationRef,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub episode: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

impl Character {
    /// One-line description: `"name species gender status"`.
    pub fn summary(&self) -> String {
        [
            self.name.as_str(),
            self.species.as_str(),
            self.gender.as_str(),
            self.status.as_str(),
        ]
        .join(" ")
    }
}

/// A single episode returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    /// Season/episode code, e.g. `S01E01`.
    pub episode: String,
    #[serde(default)]
    pub characters: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

/// A single location returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Location {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub dimension: String,
    #[serde(default)]
    pub residents: Vec<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub created: String,
}

/// Any of the three resource types, serialized as the bare object.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Entity {
    Character(Character),
    Episode(Episode),
    Location(Location),
}

impl Entity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Entity::Character(_) => EntityKind::Character,
            Entity::Episode(_) => EntityKind::Episode,
            Entity::Location(_) => EntityKind::Location,
        }
    }

    pub fn id(&self) -> u32 {
        match self {
            Entity::Character(c) => c.id,
            Entity::Episode(e) => e.id,
            Entity::Location(l) => l.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Entity::Character(c) => &c.name,
            Entity::Episode(e) => &e.name,
            Entity::Location(l) => &l.name,
        }
    }

    pub fn as_character(&self) -> Option<&Character> {
        match self {
            Entity::Character(c) => Some(c),
            _ => None,
        }
    }
}

/// Pagination metadata attached to every collection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Info {
    pub count: u32,
    pub pages: u32,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// One page of a collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page<T> {
    pub info: Info,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            info: self.info,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

/// Body of a by-id fetch: a bare object for one id, an array for several.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ItemPayload<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> ItemPayload<T> {
    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> ItemPayload<U> {
        match self {
            ItemPayload::Many(items) => ItemPayload::Many(items.into_iter().map(f).collect()),
            ItemPayload::One(item) => ItemPayload::One(f(item)),
        }
    }
}

impl<T> From<ItemPayload<T>> for Vec<T> {
    fn from(payload: ItemPayload<T>) -> Self {
        match payload {
            ItemPayload::Many(items) => items,
            ItemPayload::One(item) => vec![item],
        }
    }
}

/// Query parameters for the character collection. Omitted fields are not sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CharacterFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub species: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

impl CharacterFilter {
    pub fn by_name(name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..Self::default()
        }
    }
}

/// Query parameters for the episode collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EpisodeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Season/episode code, e.g. `S01`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub episode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Query parameters for the location collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocationFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimension: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
}

/// Filter record for any collection. It is sent verbatim; nothing checks
/// that it matches the collection it is sent to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Filter {
    Character(CharacterFilter),
    Episode(EpisodeFilter),
    Location(LocationFilter),
}

impl Default for Filter {
    fn default() -> Self {
        Filter::Character(CharacterFilter::default())
    }
}

impl From<CharacterFilter> for Filter {
    fn from(filter: CharacterFilter) -> Self {
        Filter::Character(filter)
    }
}

impl From<EpisodeFilter> for Filter {
    fn from(filter: EpisodeFilter) -> Self {
        Filter::Episode(filter)
    }
}

impl From<LocationFilter> for Filter {
    fn from(filter: LocationFilter) -> Self {
        Filter::Location(filter)
    }
}

/// Non-empty ordered list of positive ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSet(Vec<u32>);

impl IdSet {
    pub fn new(ids: impl IntoIterator<Item = u32>) -> Result<Self, ApiError> {
        let ids: Vec<u32> = ids.into_iter().collect();
        if ids.is_empty() {
            return Err(ApiError::EmptyIds);
        }
        if ids.contains(&0) {
            return Err(ApiError::InvalidId(0));
        }
        Ok(Self(ids))
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Comma-joined path segment, e.g. `1,5,11`.
    pub fn to_path_segment(&self) -> String {
        self.0
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl TryFrom<Vec<u32>> for IdSet {
    type Error = ApiError;

    fn try_from(ids: Vec<u32>) -> Result<Self, Self::Error> {
        Self::new(ids)
    }
}
