//! Synchronous client core for the Rick and Morty API.
//!
//! # Overview
//! Maps the six entity-type tags to request builders, normalizes every
//! response into `{results, error}`, and wraps each lookup in a `Deferred`
//! pipeline that only touches the network when run. The caller supplies the
//! `Transport` (host-does-IO pattern), so the core stays deterministic.
//!
//! # Design
//! - `RickMortyClient` is stateless; it holds only `base_url`.
//! - The dispatch tables are the `ItemTag` and `ListTag` enums. An unknown
//!   label fails at parse time with `ApiError::UnknownTag`.
//! - A non-200 status is data, not an error. Invocation faults are folded
//!   into the same result shape by `Deferred::recover` in both pipelines.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod dispatch;
pub mod effect;
pub mod error;
pub mod http;
pub mod normalize;
pub mod tag;
pub mod types;

pub use client::{RickMortyClient, DEFAULT_BASE_URL};
pub use dispatch::{dispatch_item, dispatch_list};
pub use effect::{item_effect, list_effect, tagged_effect, Deferred, Query};
pub use error::ApiError;
pub use http::{HttpRequest, HttpResponse, RawResponse, Transport};
pub use normalize::{normalize_item, normalize_list, NormalizedResult};
pub use tag::{EntityKind, EntityTag, ItemTag, ListTag, Route};
pub use types::{
    Character, CharacterFilter, Entity, Episode, EpisodeFilter, Filter, IdSet, Info, ItemPayload,
    Location, LocationFilter, LocationRef, Page,
};
