//! The assembled service against a mock Gemini endpoint: a 429 on one key
//! fails over to the next.

mod common;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use riddler::catalog::EntityCatalog;
use riddler::config::{AppConfig, UpstreamConfig};
use riddler::build_state;

const GENERATE_PATH: &str = "/models/test-model:generateContent";

fn state(server: &MockServer) -> riddler::AppState {
    let upstream = UpstreamConfig::default()
        .with_base_url(server.uri())
        .with_model("test-model")
        .with_retry_backoff(std::time::Duration::ZERO)
        .with_api_keys(["limited-key", "healthy-key"]);
    build_state()
        .with_config(AppConfig::default().with_upstream(upstream))
        .with_catalog(EntityCatalog::from_records(vec![common::dracula()]))
        .build()
        .unwrap()
}

#[tokio::test]
async fn rate_limited_key_fails_over_to_healthy_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "limited-key"))
        .respond_with(ResponseTemplate::new(429))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .and(query_param("key", "healthy-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"parts": [{"text": "true"}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let state = state(&server);
    let resp = state
        .game()
        .ask("alice", "Is the character male?", &[])
        .await
        .unwrap();

    assert_eq!(resp.answer, "TRUE");
    let stats = state.game().pool_stats();
    assert!(stats[0].rate_limited);
    assert!(!stats[1].rate_limited);
    assert_eq!(stats[1].load, 1);
    assert_eq!(state.game().evaluator().pool().bound_index("alice"), Some(1));
}

#[tokio::test]
async fn every_key_limited_reports_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .expect(2)
        .mount(&server)
        .await;

    let state = state(&server);
    let resp = state.game().ask("alice", "Is it human?", &[]).await.unwrap();
    assert_eq!(resp.answer, "ERROR: Rate limit exceeded. Please try again later.");

    // Both keys are cooling down now.
    let resp = state.game().ask("alice", "Is it tall?", &[]).await.unwrap();
    assert_eq!(resp.answer, "ERROR: No API keys available.");
}
