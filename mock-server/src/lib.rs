//! In-process stand-in for the Rick and Morty API.
//!
//! Serves a small fixed dataset under `/api` with the same response shapes
//! as the public API: filtered collections wrapped in `{info, results}`,
//! comma-separated id lookups that return a bare object for one id and an
//! array for several, and `{"error": ...}` bodies on 404.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tracing::debug;

/// Base used when rendering resource URLs, matching the public API.
pub const PUBLIC_BASE: &str = "https://rickandmortyapi.com/api";

pub const PAGE_SIZE: usize = 20;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocationRef {
    pub name: String,
    pub url: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub id: u32,
    pub name: String,
    pub status: String,
    pub species: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub gender: String,
    pub origin: LocationRef,
    pub location: LocationRef,
    pub image: String,
    pub episode: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Episode {
    pub id: u32,
    pub name: String,
    pub air_date: String,
    pub episode: String,
    pub characters: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Location {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub dimension: String,
    pub residents: Vec<String>,
    pub url: String,
    pub created: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Info {
    pub count: usize,
    pub pages: usize,
    pub next: Option<String>,
    pub prev: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub info: Info,
    pub results: Vec<T>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Union of every collection's query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub name: Option<String>,
    pub status: Option<String>,
    pub species: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub gender: Option<String>,
    pub episode: Option<String>,
    pub dimension: Option<String>,
    pub page: Option<usize>,
}

fn contains(haystack: &str, needle: &Option<String>) -> bool {
    needle
        .as_deref()
        .map_or(true, |n| haystack.to_lowercase().contains(&n.to_lowercase()))
}

fn equals(value: &str, wanted: &Option<String>) -> bool {
    wanted.as_deref().map_or(true, |w| value.eq_ignore_ascii_case(w))
}

/// One collection of the dataset.
pub trait Resource: Clone + Serialize + Send + Sync + 'static {
    const PATH: &'static str;
    const NOT_FOUND: &'static str;

    fn id(&self) -> u32;
    fn matches(&self, params: &ListParams) -> bool;
    fn table(data: &Dataset) -> &[Self];
}

impl Resource for Character {
    const PATH: &'static str = "character";
    const NOT_FOUND: &'static str = "Character not found";

    fn id(&self) -> u32 {
        self.id
    }

    fn matches(&self, p: &ListParams) -> bool {
        contains(&self.name, &p.name)
            && equals(&self.status, &p.status)
            && contains(&self.species, &p.species)
            && contains(&self.kind, &p.kind)
            && equals(&self.gender, &p.gender)
    }

    fn table(data: &Dataset) -> &[Self] {
        &data.characters
    }
}

impl Resource for Episode {
    const PATH: &'static str = "episode";
    const NOT_FOUND: &'static str = "Episode not found";

    fn id(&self) -> u32 {
        self.id
    }

    fn matches(&self, p: &ListParams) -> bool {
        contains(&self.name, &p.name) && contains(&self.episode, &p.episode)
    }

    fn table(data: &Dataset) -> &[Self] {
        &data.episodes
    }
}

impl Resource for Location {
    const PATH: &'static str = "location";
    const NOT_FOUND: &'static str = "Location not found";

    fn id(&self) -> u32 {
        self.id
    }

    fn matches(&self, p: &ListParams) -> bool {
        contains(&self.name, &p.name)
            && contains(&self.kind, &p.kind)
            && contains(&self.dimension, &p.dimension)
    }

    fn table(data: &Dataset) -> &[Self] {
        &data.locations
    }
}

/// Everything the mock serves.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    pub characters: Vec<Character>,
    pub episodes: Vec<Episode>,
    pub locations: Vec<Location>,
}

fn resource_url(path: &str, id: u32) -> String {
    format!("{PUBLIC_BASE}/{path}/{id}")
}

fn location_ref(name: &str, id: Option<u32>) -> LocationRef {
    LocationRef {
        name: name.to_string(),
        url: id.map(|id| resource_url("location", id)).unwrap_or_default(),
    }
}

#[allow(clippy::too_many_arguments)]
fn character(
    id: u32,
    name: &str,
    status: &str,
    species: &str,
    kind: &str,
    gender: &str,
    origin: LocationRef,
    location: LocationRef,
    episodes: &[u32],
) -> Character {
    Character {
        id,
        name: name.to_string(),
        status: status.to_string(),
        species: species.to_string(),
        kind: kind.to_string(),
        gender: gender.to_string(),
        origin,
        location,
        image: format!("{PUBLIC_BASE}/character/avatar/{id}.jpeg"),
        episode: episodes.iter().map(|e| resource_url("episode", *e)).collect(),
        url: resource_url("character", id),
        created: "2017-11-04T18:48:46.250Z".to_string(),
    }
}

fn episode(id: u32, name: &str, air_date: &str, code: &str, characters: &[u32]) -> Episode {
    Episode {
        id,
        name: name.to_string(),
        air_date: air_date.to_string(),
        episode: code.to_string(),
        characters: characters.iter().map(|c| resource_url("character", *c)).collect(),
        url: resource_url("episode", id),
        created: "2017-11-10T12:56:33.798Z".to_string(),
    }
}

fn location(id: u32, name: &str, kind: &str, dimension: &str, residents: &[u32]) -> Location {
    Location {
        id,
        name: name.to_string(),
        kind: kind.to_string(),
        dimension: dimension.to_string(),
        residents: residents.iter().map(|c| resource_url("character", *c)).collect(),
        url: resource_url("location", id),
        created: "2017-11-10T12:42:04.162Z".to_string(),
    }
}

impl Dataset {
    /// A slice of the public dataset covering the demo lookups.
    pub fn fixture() -> Self {
        let earth = || location_ref("Earth (C-137)", Some(1));
        let replacement = || location_ref("Earth (Replacement Dimension)", Some(20));
        let citadel = || location_ref("Citadel of Ricks", Some(3));
        let unknown = || location_ref("unknown", None);

        let characters = vec![
            character(1, "Rick Sanchez", "Alive", "Human", "", "Male", earth(), citadel(), &[1, 5, 12, 21]),
            character(2, "Morty Smith", "Alive", "Human", "", "Male", unknown(), citadel(), &[1, 5, 12, 21]),
            character(3, "Summer Smith", "Alive", "Human", "", "Female", replacement(), replacement(), &[12, 21]),
            character(4, "Beth Smith", "Alive", "Human", "", "Female", replacement(), replacement(), &[12, 21]),
            character(5, "Jerry Smith", "Alive", "Human", "", "Male", replacement(), replacement(), &[12, 21]),
            character(8, "Adjudicator Rick", "Dead", "Human", "", "Male", unknown(), citadel(), &[28]),
            character(11, "Albert Einstein", "Dead", "Human", "", "Male", earth(), replacement(), &[12]),
            character(15, "Alien Rick", "unknown", "Alien", "", "Male", unknown(), unknown(), &[10]),
            character(18, "Antenna Morty", "Alive", "Human", "Human with antennae", "Male", unknown(), citadel(), &[10, 28]),
            character(38, "Beth Smith", "Alive", "Human", "", "Female", earth(), earth(), &[1, 5]),
            character(47, "Birdperson", "Dead", "Bird-Person", "", "Male", location_ref("Bird World", None), location_ref("Planet Squanch", Some(35)), &[11, 21]),
            character(183, "Johnny Depp", "Alive", "Human", "", "Male", location_ref("Earth (C-500A)", Some(23)), location_ref("Earth (C-500A)", Some(23)), &[8]),
        ];
        let episodes = vec![
            episode(1, "Pilot", "December 2, 2013", "S01E01", &[1, 2, 38]),
            episode(5, "Meeseeks and Destroy", "January 20, 2014", "S01E05", &[1, 2, 38]),
            episode(12, "A Rickle in Time", "July 26, 2015", "S02E01", &[1, 2, 3, 4, 5, 11]),
            episode(21, "The Wedding Squanchers", "October 4, 2015", "S02E10", &[1, 2, 3, 4, 5, 47]),
        ];
        let locations = vec![
            location(1, "Earth (C-137)", "Planet", "Dimension C-137", &[38]),
            location(2, "Abadango", "Cluster", "unknown", &[]),
            location(3, "Citadel of Ricks", "Space station", "unknown", &[8, 18]),
            location(20, "Earth (Replacement Dimension)", "Planet", "Replacement Dimension", &[3, 4, 5]),
        ];
        Self {
            characters,
            episodes,
            locations,
        }
    }
}

#[derive(Clone)]
struct MockState {
    data: Arc<Dataset>,
    fail_with: Option<StatusCode>,
}

/// Router over the fixture dataset.
pub fn app() -> Router {
    app_with(Dataset::fixture())
}

pub fn app_with(data: Dataset) -> Router {
    router(MockState {
        data: Arc::new(data),
        fail_with: None,
    })
}

/// Router that answers every request with `status` (500 if `status` is
/// not a valid code).
pub fn failing_app(status: u16) -> Router {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    router(MockState {
        data: Arc::new(Dataset::default()),
        fail_with: Some(status),
    })
}

fn router(state: MockState) -> Router {
    Router::new()
        .route("/api/character", get(list::<Character>))
        .route("/api/character/{ids}", get(by_ids::<Character>))
        .route("/api/episode", get(list::<Episode>))
        .route("/api/episode/{ids}", get(by_ids::<Episode>))
        .route("/api/location", get(list::<Location>))
        .route("/api/location/{ids}", get(by_ids::<Location>))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

/// Serve `app` on an ephemeral local port from a background thread with its
/// own runtime. Returns the bound address.
pub fn spawn_background(app: Router) -> Result<SocketAddr, std::io::Error> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::spawn(move || {
        let served = rt.block_on(async move {
            match TcpListener::from_std(std_listener) {
                Ok(listener) => serve(listener, app).await,
                Err(err) => Err(err),
            }
        });
        if let Err(err) = served {
            tracing::error!(%err, "mock server stopped");
        }
    });

    Ok(addr)
}

fn error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

fn injected(state: &MockState) -> Option<Response> {
    state.fail_with.map(|status| {
        error(
            status,
            status.canonical_reason().unwrap_or("injected failure"),
        )
    })
}

async fn list<R: Resource>(
    State(state): State<MockState>,
    Query(params): Query<ListParams>,
) -> Response {
    if let Some(failure) = injected(&state) {
        return failure;
    }
    let matched: Vec<R> = R::table(&state.data)
        .iter()
        .filter(|r| r.matches(&params))
        .cloned()
        .collect();
    let count = matched.len();
    let pages = count.div_ceil(PAGE_SIZE);
    let page = params.page.unwrap_or(1);
    debug!(path = R::PATH, count, page, "list request");
    if count == 0 || page == 0 || page > pages {
        return error(StatusCode::NOT_FOUND, "There is nothing here");
    }
    let link = |n: usize| format!("{PUBLIC_BASE}/{}?page={n}", R::PATH);
    let info = Info {
        count,
        pages,
        next: (page < pages).then(|| link(page + 1)),
        prev: (page > 1).then(|| link(page - 1)),
    };
    let results = matched
        .into_iter()
        .skip((page - 1) * PAGE_SIZE)
        .take(PAGE_SIZE)
        .collect();
    Json(Page { info, results }).into_response()
}

async fn by_ids<R: Resource>(State(state): State<MockState>, Path(ids): Path<String>) -> Response {
    if let Some(failure) = injected(&state) {
        return failure;
    }
    let parsed: Result<Vec<u32>, _> = ids.split(',').map(|s| s.trim().parse::<u32>()).collect();
    let Ok(parsed) = parsed else {
        return error(StatusCode::BAD_REQUEST, "Hey! you must provide an id");
    };
    debug!(path = R::PATH, ids = parsed.len(), "by-id request");
    let table = R::table(&state.data);
    let find = |id: u32| table.iter().find(|r| r.id() == id).cloned();

    if let [single] = parsed.as_slice() {
        if !ids.contains(',') {
            return match find(*single) {
                Some(item) => Json(item).into_response(),
                None => error(StatusCode::NOT_FOUND, R::NOT_FOUND),
            };
        }
    }
    let found: Vec<R> = parsed.into_iter().filter_map(find).collect();
    Json(found).into_response()
}
