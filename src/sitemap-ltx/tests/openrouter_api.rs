//! OpenRouter client against a mock chat completions API.

use std::time::Duration;

use serde_json::json;
use sitemap_ltx::llms::{DescribeError, DescriptionGenerator, OpenRouter};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MODEL: &str = "meta-llama/llama-3.2-3b-instruct:free";

fn client(server: &MockServer) -> OpenRouter {
    OpenRouter::new(reqwest::Client::new(), "test-key", MODEL)
        .unwrap()
        .with_base_url(&format!("{}/api/v1", server.uri()))
}

async fn respond_with(status: u16, body: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(&server)
        .await;
    server
}

fn completion(content: &str) -> serde_json::Value {
    json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
}

#[tokio::test]
async fn test_request_shape_and_cleaning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(header("x-title", "sitemap-ltx"))
        .and(body_partial_json(json!({
            "model": MODEL,
            "max_tokens": 100,
            "messages": [ { "role": "user" } ]
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion("Description: \"Lists every REST endpoint for user accounts.\"")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let description = client(&server)
        .generate("GET /users returns all users. POST /users creates one.", "Users API")
        .await
        .unwrap();
    assert_eq!(description, "Lists every REST endpoint for user accounts.");
}

#[tokio::test]
async fn test_long_descriptions_are_truncated() {
    let server = respond_with(200, completion(&"word ".repeat(80))).await;
    let description = client(&server).generate("content", "t").await.unwrap();
    assert!(description.chars().count() <= 150);
    assert!(description.starts_with("word word"));
}

#[tokio::test]
async fn test_status_mapping() {
    let server = respond_with(401, json!({})).await;
    assert!(matches!(
        client(&server).generate("content", "t").await,
        Err(DescribeError::Unauthorized)
    ));

    let server = respond_with(402, json!({})).await;
    assert!(matches!(
        client(&server).generate("content", "t").await,
        Err(DescribeError::PaymentRequired)
    ));

    let server = respond_with(429, json!({})).await;
    assert!(matches!(
        client(&server).generate("content", "t").await,
        Err(DescribeError::RateLimited)
    ));

    let server = respond_with(500, json!({})).await;
    assert!(matches!(
        client(&server).generate("content", "t").await,
        Err(DescribeError::Server(500))
    ));

    let server = respond_with(418, json!({})).await;
    assert!(matches!(
        client(&server).generate("content", "t").await,
        Err(DescribeError::UnexpectedStatus(418))
    ));

    let server = respond_with(400, json!({ "error": { "message": "model not found" } })).await;
    match client(&server).generate("content", "t").await {
        Err(DescribeError::BadRequest(message)) => assert_eq!(message, "model not found"),
        other => panic!("expected BadRequest, got {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_inputs_and_outputs() {
    let server = respond_with(200, json!({ "choices": [] })).await;
    assert!(matches!(
        client(&server).generate("content", "t").await,
        Err(DescribeError::EmptyResponse)
    ));
    assert!(matches!(
        client(&server).generate("   ", "t").await,
        Err(DescribeError::EmptyContent)
    ));
}

#[tokio::test]
async fn test_timeout_and_connection_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("late")).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;
    let slow = client(&server).with_timeout(Duration::from_millis(100));
    assert!(matches!(slow.generate("content", "t").await, Err(DescribeError::Timeout)));

    let unreachable = OpenRouter::new(reqwest::Client::new(), "k", MODEL)
        .unwrap()
        .with_base_url("http://127.0.0.1:1/api/v1");
    assert!(matches!(
        unreachable.generate("content", "t").await,
        Err(DescribeError::Connection)
    ));
}

#[tokio::test]
async fn test_test_connection() {
    let server = respond_with(200, completion("A test page.")).await;
    let message = client(&server).test_connection().await.unwrap();
    assert!(message.contains(MODEL));

    let server = respond_with(401, json!({})).await;
    assert!(client(&server).test_connection().await.is_err());
}

#[tokio::test]
async fn test_model_listing_and_pricing() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": MODEL, "name": "Llama free", "pricing": { "prompt": "0", "completion": "0" } },
                { "id": "openai/gpt-4o", "pricing": { "prompt": "0.0000025", "completion": "0.00001" } }
            ]
        })))
        .mount(&server)
        .await;

    let openrouter = client(&server);
    let models = openrouter.list_models().await;
    assert_eq!(models.len(), 2);
    assert_eq!(models[0].name.as_deref(), Some("Llama free"));
    assert!(openrouter.is_model_free(MODEL).await);
    assert!(!openrouter.is_model_free("openai/gpt-4o").await);
    assert!(!openrouter.is_model_free("unknown/model").await);
}

#[tokio::test]
async fn test_model_listing_failure_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/models"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    assert!(client(&server).list_models().await.is_empty());
}
