//! Deferred pipelines: dispatch + normalize, run only on demand.
//!
//! # Design
//! `Deferred<T>` wraps a thunk over a `&dyn Transport`. Building one performs
//! no I/O; `run` executes it, and every `run` issues the request again.
//! Thunks are `Send + Sync` so a deferred value can be moved onto a worker
//! thread and cloned freely.
//!
//! Both pipelines end in `Deferred::recover`, so a transport fault, an
//! undecodable body or a bad id set comes out in the same `{results, error}`
//! shape as a non-200 status.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::client::RickMortyClient;
use crate::dispatch::{dispatch_item, dispatch_list};
use crate::error::ApiError;
use crate::http::Transport;
use crate::normalize::{normalize_item, normalize_list, NormalizedResult};
use crate::tag::{EntityTag, ItemTag, ListTag, Route};
use crate::types::{Entity, Filter, IdSet};

type Thunk<T> = dyn Fn(&dyn Transport) -> T + Send + Sync;

/// A computation that performs no side effect until `run`.
pub struct Deferred<T> {
    thunk: Arc<Thunk<T>>,
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred").finish_non_exhaustive()
    }
}

impl<T: 'static> Deferred<T> {
    pub fn new<F>(thunk: F) -> Self
    where
        F: Fn(&dyn Transport) -> T + Send + Sync + 'static,
    {
        Self {
            thunk: Arc::new(thunk),
        }
    }

    /// Post-process the output; still lazy.
    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let thunk = self.thunk;
        Deferred::new(move |transport| f(thunk(transport)))
    }

    pub fn run(&self, transport: &dyn Transport) -> T {
        (self.thunk)(transport)
    }
}

impl<T: 'static> Deferred<Result<NormalizedResult<T>, ApiError>> {
    /// Fold an invocation fault into `{results: [], error: <message>}`.
    pub fn recover(self) -> Deferred<NormalizedResult<T>> {
        self.map(|outcome| {
            outcome.unwrap_or_else(|err| {
                warn!(error = %err, "lookup failed before a response was normalized");
                NormalizedResult::failed(err.to_string())
            })
        })
    }
}

/// Bind a collection tag; the returned function turns a filter into a
/// deferred lookup.
pub fn list_effect(
    client: &RickMortyClient,
    tag: ListTag,
) -> impl Fn(Filter) -> Deferred<NormalizedResult<Entity>> {
    let client = client.clone();
    move |filter| {
        let client = client.clone();
        Deferred::new(move |transport| {
            dispatch_list(&client, transport, tag, &filter).map(normalize_list)
        })
        .recover()
    }
}

/// Bind a by-id tag; the returned function turns ids into a deferred lookup.
/// The ids are checked when the lookup runs.
pub fn item_effect(
    client: &RickMortyClient,
    tag: ItemTag,
) -> impl Fn(&[u32]) -> Deferred<NormalizedResult<Entity>> {
    let client = client.clone();
    move |ids| {
        let client = client.clone();
        let ids = ids.to_vec();
        Deferred::new(move |transport| {
            IdSet::new(ids.iter().copied())
                .and_then(|ids| dispatch_item(&client, transport, tag, &ids))
                .map(normalize_item::<Entity, _>)
        })
        .recover()
    }
}

/// Parameters for a lookup whose tag is only known at runtime.
#[derive(Debug, Clone)]
pub enum Query {
    List(Filter),
    Ids(Vec<u32>),
}

/// Route a runtime tag to its table. A query of the wrong shape for the tag
/// surfaces as `ApiError::WrongTable` inside the normalized result.
pub fn tagged_effect(
    client: &RickMortyClient,
    tag: EntityTag,
    query: Query,
) -> Deferred<NormalizedResult<Entity>> {
    match (tag.route(), query) {
        (Route::List(list), Query::List(filter)) => list_effect(client, list)(filter),
        (Route::Item(item), Query::Ids(ids)) => item_effect(client, item)(&ids),
        (Route::List(_), Query::Ids(_)) => rejected(ApiError::WrongTable {
            tag,
            expected: "item",
        }),
        (Route::Item(_), Query::List(_)) => rejected(ApiError::WrongTable {
            tag,
            expected: "list",
        }),
    }
}

fn rejected(err: ApiError) -> Deferred<NormalizedResult<Entity>> {
    Deferred::new(move |_| Err::<NormalizedResult<Entity>, _>(err.clone())).recover()
}
