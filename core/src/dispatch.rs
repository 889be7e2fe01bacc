//! List and item dispatchers: tag + parameters in, raw response out.
//!
//! Each dispatcher builds the request selected by its table, runs it through
//! the caller's `Transport` and parses the response. A non-200 status comes
//! back as data; only invocation faults are `Err`.

use tracing::debug;

use crate::client::RickMortyClient;
use crate::error::ApiError;
use crate::http::{RawResponse, Transport};
use crate::tag::{ItemTag, ListTag};
use crate::types::{Entity, Filter, IdSet, Page};

/// Fetch one page of the collection named by `tag`.
pub fn dispatch_list(
    client: &RickMortyClient,
    transport: &dyn Transport,
    tag: ListTag,
    filter: &Filter,
) -> Result<RawResponse<Page<Entity>>, ApiError> {
    let request = client.build_list(tag, filter)?;
    debug!(%tag, url = %request.url, "dispatching list request");
    let response = transport.execute(&request)?;
    debug!(%tag, status = response.status, "list response received");
    client.parse_list(tag, response)
}

/// Fetch the resources named by `tag` with the given ids.
///
/// Always yields a sequence, whether the API answered with one object or an
/// array.
pub fn dispatch_item(
    client: &RickMortyClient,
    transport: &dyn Transport,
    tag: ItemTag,
    ids: &IdSet,
) -> Result<RawResponse<Vec<Entity>>, ApiError> {
    let request = client.build_item(tag, ids);
    debug!(%tag, url = %request.url, ids = ids.len(), "dispatching item request");
    let response = transport.execute(&request)?;
    debug!(%tag, status = response.status, "item response received");
    Ok(client.parse_item(tag, response)?.map(Vec::from))
}
