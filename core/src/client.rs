//! Stateless HTTP request builder and response parser for the Rick and Morty API.
//!
//! # Design
//! `RickMortyClient` holds only a `base_url`. Each fetch is split into a
//! `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. Which endpoint is hit and how the body
//! is decoded is decided by the tag alone.

use serde::de::DeserializeOwned;
use serde_json::Value;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, RawResponse};
use crate::tag::{EntityKind, ItemTag, ListTag};
use crate::types::{Character, Entity, Episode, Filter, IdSet, ItemPayload, Location, Page};

/// Public instance of the API.
pub const DEFAULT_BASE_URL: &str = "https://rickandmortyapi.com/api";

/// Synchronous, stateless client for the Rick and Morty API.
#[derive(Debug, Clone)]
pub struct RickMortyClient {
    base_url: String,
}

impl Default for RickMortyClient {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl RickMortyClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/{kind}?{filter}`. The filter is encoded verbatim.
    pub fn build_list(&self, tag: ListTag, filter: &Filter) -> Result<HttpRequest, ApiError> {
        let query = encode_query(filter)?;
        let mut url = format!("{}/{}", self.base_url, tag.kind().path());
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        Ok(get(url))
    }

    /// `GET {base}/{kind}/{id,id,...}`.
    pub fn build_item(&self, tag: ItemTag, ids: &IdSet) -> HttpRequest {
        get(format!(
            "{}/{}/{}",
            self.base_url,
            tag.kind().path(),
            ids.to_path_segment()
        ))
    }

    pub fn parse_list(
        &self,
        tag: ListTag,
        response: HttpResponse,
    ) -> Result<RawResponse<Page<Entity>>, ApiError> {
        parse_with(response, |body| match tag.kind() {
            EntityKind::Character => decode::<Page<Character>>(body).map(|p| p.map(Entity::Character)),
            EntityKind::Episode => decode::<Page<Episode>>(body).map(|p| p.map(Entity::Episode)),
            EntityKind::Location => decode::<Page<Location>>(body).map(|p| p.map(Entity::Location)),
        })
    }

    pub fn parse_item(
        &self,
        tag: ItemTag,
        response: HttpResponse,
    ) -> Result<RawResponse<ItemPayload<Entity>>, ApiError> {
        parse_with(response, |body| match tag.kind() {
            EntityKind::Character => {
                decode::<ItemPayload<Character>>(body).map(|p| p.map(Entity::Character))
            }
            EntityKind::Episode => decode::<ItemPayload<Episode>>(body).map(|p| p.map(Entity::Episode)),
            EntityKind::Location => {
                decode::<ItemPayload<Location>>(body).map(|p| p.map(Entity::Location))
            }
        })
    }
}

fn get(url: String) -> HttpRequest {
    HttpRequest {
        url,
        headers: vec![("accept".to_string(), "application/json".to_string())],
    }
}

/// Decode the body only for a 200; any other status is carried as-is.
fn parse_with<T>(
    response: HttpResponse,
    decode_body: impl FnOnce(&str) -> Result<T, ApiError>,
) -> Result<RawResponse<T>, ApiError> {
    if response.status != 200 {
        return Ok(RawResponse::failed(response.status, response.status_message));
    }
    let data = decode_body(&response.body)?;
    Ok(RawResponse {
        status: response.status,
        status_message: response.status_message,
        data: Some(data),
    })
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Deserialization(e.to_string()))
}

fn encode_query(filter: &Filter) -> Result<String, ApiError> {
    let value = serde_json::to_value(filter).map_err(|e| ApiError::Serialization(e.to_string()))?;
    let Value::Object(fields) = value else {
        return Err(ApiError::Serialization("filter is not a record".to_string()));
    };
    let mut query = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &fields {
        match value {
            Value::String(s) => {
                query.append_pair(key, s);
            }
            Value::Number(n) => {
                query.append_pair(key, &n.to_string());
            }
            Value::Bool(b) => {
                query.append_pair(key, if *b { "true" } else { "false" });
            }
            _ => {}
        }
    }
    Ok(query.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CharacterFilter, EpisodeFilter};

    fn client() -> RickMortyClient {
        RickMortyClient::new("http://localhost:3000/api")
    }

    fn response(status: u16, message: &str, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_message: message.to_string(),
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_encodes_filter_as_query() {
        let req = client()
            .build_list(ListTag::Characters, &CharacterFilter::by_name("rick").into())
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/character?name=rick");
        assert_eq!(
            req.headers,
            vec![("accept".to_string(), "application/json".to_string())]
        );
    }

    #[test]
    fn build_list_without_filter_has_no_query() {
        let req = client()
            .build_list(ListTag::Episodes, &EpisodeFilter::default().into())
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/episode");
    }

    #[test]
    fn build_list_escapes_values() {
        let filter = CharacterFilter {
            name: Some("Rick Sanchez".to_string()),
            page: Some(2),
            ..CharacterFilter::default()
        };
        let req = client().build_list(ListTag::Characters, &filter.into()).unwrap();
        assert!(req.url.contains("name=Rick+Sanchez"), "{}", req.url);
        assert!(req.url.contains("page=2"), "{}", req.url);
    }

    #[test]
    fn build_list_passes_mismatched_filter_verbatim() {
        let req = client()
            .build_list(ListTag::Locations, &CharacterFilter::by_name("earth").into())
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/location?name=earth");
    }

    #[test]
    fn build_item_joins_ids() {
        let ids = IdSet::new([1, 5, 12, 21]).unwrap();
        let req = client().build_item(ItemTag::Episode, &ids);
        assert_eq!(req.url, "http://localhost:3000/api/episode/1,5,12,21");
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = RickMortyClient::new("http://localhost:3000/api/");
        let ids = IdSet::new([2]).unwrap();
        assert_eq!(
            client.build_item(ItemTag::Character, &ids).url,
            "http://localhost:3000/api/character/2"
        );
    }

    #[test]
    fn parse_list_success() {
        let body = r#"{"info":{"count":1,"pages":1,"next":null,"prev":null},
            "results":[{"id":1,"name":"Rick Sanchez","status":"Alive","species":"Human","type":"","gender":"Male"}]}"#;
        let raw = client()
            .parse_list(ListTag::Characters, response(200, "OK", body))
            .unwrap();
        let page = raw.data.unwrap();
        assert_eq!(page.info.count, 1);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.results[0].name(), "Rick Sanchez");
        assert_eq!(page.results[0].kind(), EntityKind::Character);
    }

    #[test]
    fn parse_list_non_200_keeps_status_and_message() {
        let raw = client()
            .parse_list(
                ListTag::Characters,
                response(404, "Not Found", r#"{"error":"There is nothing here"}"#),
            )
            .unwrap();
        assert_eq!(raw, RawResponse::failed(404, "Not Found"));
    }

    #[test]
    fn parse_list_bad_json() {
        let err = client()
            .parse_list(ListTag::Episodes, response(200, "OK", "not json"))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }

    #[test]
    fn parse_item_decodes_by_tag_kind() {
        let body = r#"{"id":3,"name":"Citadel of Ricks","type":"Space station","dimension":"unknown"}"#;
        let raw = client()
            .parse_item(ItemTag::Location, response(200, "OK", body))
            .unwrap();
        match raw.data.unwrap() {
            ItemPayload::One(Entity::Location(l)) => assert_eq!(l.kind, "Space station"),
            other => panic!("unexpected payload: {other:?}"),
        }
    }

    #[test]
    fn parse_item_rejects_body_of_other_kind() {
        let body = r#"{"id":1,"name":"Pilot","air_date":"December 2, 2013","episode":"S01E01"}"#;
        let err = client()
            .parse_item(ItemTag::Character, response(200, "OK", body))
            .unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
