//! Full demo run against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port and runs the driver over real
//! HTTP with the ureq transport, then checks the rendered output line the
//! way a reader of stdout would see it.

use std::sync::Arc;
use std::time::Duration;

use rickmorty_core::RickMortyClient;
use rickmorty_demo::{driver, UreqTransport};
use serde_json::Value;

fn transport() -> Arc<UreqTransport> {
    Arc::new(UreqTransport::new(Duration::from_secs(5)))
}

#[tokio::test(flavor = "multi_thread")]
async fn demo_run_against_mock() {
    let addr = mock_server::spawn_background(mock_server::app()).unwrap();
    let client = RickMortyClient::new(&format!("http://{addr}/api"));

    let report = driver::run(&client, transport()).await;

    let summaries: Vec<_> = report
        .by_name
        .iter()
        .map(|(_, r)| driver::summarize(&r.results))
        .collect();
    assert_eq!(
        summaries[0],
        "Rick Sanchez Human Male Alive | Adjudicator Rick Human Male Dead | Alien Rick Alien Male unknown"
    );
    assert_eq!(summaries[3], "Jerry Smith Human Male Alive");
    assert_eq!(summaries[4], "Birdperson Bird-Person Male Dead");
    assert!(report.by_name.iter().all(|(_, r)| r.error.is_none()));

    assert_eq!(report.characters.results.len(), 3);
    assert_eq!(report.episodes.results.len(), 4);

    let line = report.output_line();
    let rendered: Value = serde_json::from_str(line.strip_prefix("output ").unwrap()).unwrap();
    assert_eq!(rendered.as_array().unwrap().len(), 7);
    assert_eq!(rendered[3][1], Value::Null);
    let episodes: Value = serde_json::from_str(rendered[6][0].as_str().unwrap()).unwrap();
    assert_eq!(episodes[3]["name"], "The Wedding Squanchers");
}

#[tokio::test(flavor = "multi_thread")]
async fn demo_run_against_failing_server() {
    let addr = mock_server::spawn_background(mock_server::failing_app(500)).unwrap();
    let client = RickMortyClient::new(&format!("http://{addr}/api"));

    let report = driver::run(&client, transport()).await;

    for (name, result) in &report.by_name {
        assert!(result.results.is_empty(), "{name}");
        assert_eq!(
            result.error.as_deref(),
            Some("Unknown Error: Internal Server Error"),
            "{name}"
        );
    }
    let rendered = report.render();
    assert_eq!(rendered[0][0], "");
    assert_eq!(rendered[5][0], "[]");
}
