//! Error types for the Rick and Morty API client.
//!
//! # Design
//! A non-200 status is NOT an error here: it travels inside `RawResponse`
//! and the normalizers turn it into an error string. `ApiError` covers the
//! invocation-level faults only: a tag routed to the wrong table, an
//! unusable id set, a transport failure or a body that does not decode.

use thiserror::Error;

use crate::tag::EntityTag;

/// Errors returned by tag parsing, dispatch and the transport seam.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The label does not name any of the six entity-type tags.
    #[error("unknown entity type tag: {0}")]
    UnknownTag(String),

    /// The tag exists but belongs to the other dispatch table.
    #[error("tag {tag} has no entry in the {expected} dispatch table")]
    WrongTable { tag: EntityTag, expected: &'static str },

    /// A by-id fetch was requested with no ids.
    #[error("id set is empty")]
    EmptyIds,

    /// Ids are positive; the API has no resource 0.
    #[error("invalid id: {0}")]
    InvalidId(u32),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),

    /// A 200 response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The filter could not be encoded into query parameters.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
