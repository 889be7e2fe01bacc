//! The demo run: five name lookups, two id lookups, one output line.
//!
//! All seven lookups are independent, so they are started together on the
//! blocking pool and joined in declaration order. A lookup that fails (or
//! whose task panics) still contributes a `{results: [], error}` entry.

use std::sync::Arc;

use rickmorty_core::{
    item_effect, list_effect, CharacterFilter, Deferred, Entity, ItemTag, ListTag,
    NormalizedResult, RickMortyClient, Transport,
};
use serde_json::{json, Value};
use tokio::task;
use tracing::{debug, info};

pub const CHARACTER_NAMES: [&str; 5] = ["rick", "morty", "beth", "jerry", "birdperson"];
pub const CHARACTER_IDS: [u32; 3] = [1, 5, 11];
pub const EPISODE_IDS: [u32; 4] = [1, 5, 12, 21];

pub type Lookup = Deferred<NormalizedResult<Entity>>;

/// Outcome of every lookup, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub by_name: Vec<(String, NormalizedResult<Entity>)>,
    pub characters: NormalizedResult<Entity>,
    pub episodes: NormalizedResult<Entity>,
}

impl Report {
    /// `[[summary, error|null] x5, [characters json], [episodes json]]`
    pub fn render(&self) -> Value {
        let mut rows: Vec<Value> = self
            .by_name
            .iter()
            .map(|(_, result)| json!([summarize(&result.results), result.error]))
            .collect();
        rows.push(json!([encode(&self.characters.results)]));
        rows.push(json!([encode(&self.episodes.results)]));
        Value::Array(rows)
    }

    /// The single line written to stdout.
    pub fn output_line(&self) -> String {
        format!("output {}", self.render())
    }
}

/// `"name species gender status"` per character, joined with `" | "`.
/// Non-character entities are skipped.
pub fn summarize(results: &[Entity]) -> String {
    results
        .iter()
        .filter_map(Entity::as_character)
        .map(|c| c.summary())
        .collect::<Vec<_>>()
        .join(" | ")
}

fn encode(results: &[Entity]) -> String {
    // Serializing plain DTOs cannot fail.
    serde_json::to_string(results).unwrap_or_else(|_| "[]".to_string())
}

/// The seven deferred lookups; nothing is sent yet.
pub fn lookups(client: &RickMortyClient) -> Vec<Lookup> {
    let by_name = list_effect(client, ListTag::Characters);
    let character = item_effect(client, ItemTag::Character);
    let episode = item_effect(client, ItemTag::Episode);

    let mut all: Vec<Lookup> = CHARACTER_NAMES
        .iter()
        .map(|name| by_name(CharacterFilter::by_name(name).into()))
        .collect();
    all.push(character(&CHARACTER_IDS));
    all.push(episode(&EPISODE_IDS));
    all
}

/// Start every lookup at once and collect results in input order.
pub async fn run_concurrently<T>(lookups: Vec<Lookup>, transport: Arc<T>) -> Vec<NormalizedResult<Entity>>
where
    T: Transport + Send + Sync + 'static,
{
    let handles: Vec<_> = lookups
        .into_iter()
        .map(|lookup| {
            let transport = Arc::clone(&transport);
            task::spawn_blocking(move || lookup.run(transport.as_ref()))
        })
        .collect();

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle
            .await
            .unwrap_or_else(|err| NormalizedResult::failed(format!("lookup task failed: {err}")));
        results.push(result);
    }
    results
}

pub async fn run<T>(client: &RickMortyClient, transport: Arc<T>) -> Report
where
    T: Transport + Send + Sync + 'static,
{
    let lookups = lookups(client);
    info!(count = lookups.len(), base_url = client.base_url(), "running lookups");
    let mut results = run_concurrently(lookups, transport).await.into_iter();

    let by_name = CHARACTER_NAMES
        .iter()
        .map(|name| {
            let result = results.next().unwrap_or_else(missing);
            debug!(name, found = result.results.len(), error = ?result.error, "name lookup done");
            (name.to_string(), result)
        })
        .collect();
    let characters = results.next().unwrap_or_else(missing);
    let episodes = results.next().unwrap_or_else(missing);

    Report {
        by_name,
        characters,
        episodes,
    }
}

fn missing() -> NormalizedResult<Entity> {
    NormalizedResult::failed("lookup produced no result")
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use rickmorty_core::{ApiError, Character, HttpRequest, HttpResponse};

    use super::*;

    fn rick() -> Entity {
        Entity::Character(Character {
            id: 1,
            name: "Rick Sanchez".to_string(),
            status: "Alive".to_string(),
            species: "Human".to_string(),
            kind: String::new(),
            gender: "Male".to_string(),
            origin: Default::default(),
            location: Default::default(),
            image: String::new(),
            episode: Vec::new(),
            url: String::new(),
            created: String::new(),
        })
    }

    #[test]
    fn summarize_joins_with_pipes() {
        let mut morty = rick();
        if let Entity::Character(c) = &mut morty {
            c.name = "Morty Smith".to_string();
        }
        assert_eq!(
            summarize(&[rick(), morty]),
            "Rick Sanchez Human Male Alive | Morty Smith Human Male Alive"
        );
    }

    #[test]
    fn summarize_empty_is_empty_string() {
        assert_eq!(summarize(&[]), "");
    }

    #[test]
    fn render_pairs_summaries_with_errors() {
        let report = Report {
            by_name: vec![
                ("rick".to_string(), NormalizedResult::ok(vec![rick()])),
                (
                    "morty".to_string(),
                    NormalizedResult::failed("Unknown Error: Internal Server Error"),
                ),
            ],
            characters: NormalizedResult::ok(vec![rick()]),
            episodes: NormalizedResult::ok(Vec::new()),
        };
        let rendered = report.render();
        assert_eq!(rendered[0], json!(["Rick Sanchez Human Male Alive", null]));
        assert_eq!(rendered[1], json!(["", "Unknown Error: Internal Server Error"]));
        let encoded: Value = serde_json::from_str(rendered[2][0].as_str().unwrap()).unwrap();
        assert_eq!(encoded[0]["name"], "Rick Sanchez");
        assert_eq!(rendered[3], json!(["[]"]));
        assert!(report.output_line().starts_with("output [["));
    }

    #[test]
    fn lookups_are_lazy_and_ordered() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = {
            let seen = Arc::clone(&seen);
            move |req: &HttpRequest| -> Result<HttpResponse, ApiError> {
                seen.lock().unwrap().push(req.url.clone());
                Err(ApiError::Transport("offline".to_string()))
            }
        };
        let all = lookups(&RickMortyClient::new("http://api"));
        assert_eq!(all.len(), 7);
        assert!(seen.lock().unwrap().is_empty());

        for lookup in &all {
            lookup.run(&recorder);
        }
        let urls = seen.lock().unwrap().clone();
        assert_eq!(urls[0], "http://api/character?name=rick");
        assert_eq!(urls[4], "http://api/character?name=birdperson");
        assert_eq!(urls[5], "http://api/character/1,5,11");
        assert_eq!(urls[6], "http://api/episode/1,5,12,21");
    }

    #[tokio::test]
    async fn failures_are_isolated_per_lookup() {
        let transport = Arc::new(|req: &HttpRequest| -> Result<HttpResponse, ApiError> {
            if req.url.contains("morty") {
                return Err(ApiError::Transport("connection reset".to_string()));
            }
            Ok(HttpResponse {
                status: 500,
                status_message: "Internal Server Error".to_string(),
                headers: Vec::new(),
                body: String::new(),
            })
        });
        let report = run(&RickMortyClient::new("http://api"), transport).await;

        assert_eq!(report.by_name.len(), 5);
        assert_eq!(report.by_name[1].0, "morty");
        assert_eq!(
            report.by_name[1].1.error.as_deref(),
            Some("transport failed: connection reset")
        );
        for (name, result) in report.by_name.iter().filter(|(n, _)| n != "morty") {
            assert_eq!(
                result.error.as_deref(),
                Some("Unknown Error: Internal Server Error"),
                "{name}"
            );
        }
        assert!(report.characters.results.is_empty());
        assert!(report.episodes.error.is_some());
    }
}
