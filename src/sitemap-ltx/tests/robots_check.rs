//! RobotsChecker against a mock HTTP server.

use sitemap_ltx::RobotsChecker;
use sitemap_ltx::config::LLM_CRAWLERS;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn checker_serving(status: u16, body: &str) -> (MockServer, RobotsChecker) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body.to_string()))
        .mount(&server)
        .await;
    let checker = RobotsChecker::new(reqwest::Client::new()).with_base_url(&server.uri());
    (server, checker)
}

#[tokio::test]
async fn test_named_crawler_blocked() {
    let robots = "User-agent: GPTBot\nDisallow: /\n\nUser-agent: *\nAllow: /\n";
    let (server, checker) = checker_serving(200, robots).await;

    let result = checker.check("example.com", &LLM_CRAWLERS).await;

    assert_eq!(result.domain, "example.com");
    assert_eq!(result.robots_url, format!("{}/robots.txt", server.uri()));
    assert!(!result.accessible);
    assert_eq!(result.blocked_crawlers, vec!["GPTBot"]);
    assert_eq!(result.robots_content, robots);
    assert_eq!(result.error, None);
}

#[tokio::test]
async fn test_wildcard_blocks_every_crawler() {
    let (_server, checker) = checker_serving(200, "User-agent: *\nDisallow: /\n").await;

    let result = checker.check("example.com", &LLM_CRAWLERS).await;

    assert!(!result.accessible);
    assert_eq!(result.blocked_crawlers, LLM_CRAWLERS.to_vec());
}

#[tokio::test]
async fn test_missing_robots_is_accessible() {
    let (_server, checker) = checker_serving(404, "").await;

    let result = checker.check("example.com", &LLM_CRAWLERS).await;

    assert!(result.accessible);
    assert!(result.blocked_crawlers.is_empty());
    assert_eq!(result.error.as_deref(), Some("No robots.txt file found"));
}

#[tokio::test]
async fn test_error_status_skips_parsing() {
    let (_server, checker) = checker_serving(503, "User-agent: *\nDisallow: /\n").await;

    let result = checker.check("example.com", &LLM_CRAWLERS).await;

    assert!(result.accessible);
    assert!(result.blocked_crawlers.is_empty());
    assert_eq!(result.robots_content, "");
    assert_eq!(result.error.as_deref(), Some("HTTP 503 error"));
}

#[tokio::test]
async fn test_transport_failure_is_reported() {
    let checker = RobotsChecker::new(reqwest::Client::new()).with_base_url("http://127.0.0.1:1");

    let result = checker.check("example.com", &["GPTBot"]).await;

    assert!(result.accessible);
    assert!(result.error.is_some());
}
