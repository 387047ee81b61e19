//! HTTP fetching: the shared client, the static + rendered page backends, and retry.
//!
//! Every component receives the `reqwest::Client` built here by handle. Cloning it is cheap
//! and shares one connection pool, so tests can point everything at a mock server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, HeaderValue, UPGRADE_INSECURE_REQUESTS};
use serde_json::{Value, json};

use crate::config::GeneratorOptions;
use crate::errors::{Error, Result};

/// Builds the HTTP client shared by every component of a run.
/// Sends a realistic browser User-Agent and the usual browser Accept headers.
pub fn build_http_client(options: &GeneratorOptions) -> Result<Client> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    );
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));

    let client = Client::builder()
        .user_agent(options.user_agent.clone())
        .default_headers(headers)
        .timeout(options.request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .build()?;
    Ok(client)
}

/// GETs a URL and returns its body as text. Non-2xx statuses are errors.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(Error::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }
    Ok(response.text().await?)
}

/// Lightweight existence check: true only for a `200` answer to a `HEAD` request.
pub async fn probe_exists(client: &Client, url: &str, timeout: Duration) -> bool {
    match client.head(url).timeout(timeout).send().await {
        Ok(response) => response.status().as_u16() == 200,
        Err(e) => {
            tracing::trace!("Probe for {} failed: {}", url, e);
            false
        }
    }
}

/// A backend that turns a URL into an HTML document.
///
/// Implementations make a single attempt; see [`fetch_with_retry`].
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;

    /// Short name used in logs and in the generated document's feature list.
    fn kind(&self) -> &'static str;
}

/// Plain HTTP GET.
#[derive(Debug, Clone)]
pub struct StaticFetcher {
    client: Client,
}

impl StaticFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        fetch_text(&self.client, url).await
    }

    fn kind(&self) -> &'static str {
        "static"
    }
}

/// Renders pages in a headless browser driven through a W3C WebDriver server
/// (chromedriver, geckodriver, selenium...).
///
/// Each fetch opens its own session so concurrent workers never share browser state.
#[derive(Debug, Clone)]
pub struct WebDriverFetcher {
    client: Client,
    endpoint: String,
    page_load_timeout: Duration,
}

impl WebDriverFetcher {
    pub fn new(client: Client, endpoint: &str, page_load_timeout: Duration) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            page_load_timeout,
        }
    }

    fn capabilities(&self) -> Value {
        json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "chrome",
                    // "normal" makes navigation return only after the load event fired
                    "pageLoadStrategy": "normal",
                    "timeouts": { "pageLoad": self.page_load_timeout.as_millis() as u64 },
                    "goog:chromeOptions": {
                        "args": ["--headless=new", "--disable-gpu", "--no-sandbox"]
                    }
                }
            }
        })
    }

    async fn command(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        let mut request = self.client.request(method, &url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request
            .send()
            .await
            .map_err(|e| Error::WebDriver(format!("{} request failed: {}", path, e)))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| Error::WebDriver(format!("{} response read failed: {}", path, e)))?;

        let value: Value = serde_json::from_str(&text).unwrap_or_default();
        if let Some(err) = value.pointer("/value/error").and_then(|v| v.as_str()) {
            let message = value
                .pointer("/value/message")
                .and_then(|v| v.as_str())
                .unwrap_or("unknown webdriver error");
            return Err(Error::WebDriver(format!("{}: {}", err, message)));
        }
        if !status.is_success() {
            return Err(Error::WebDriver(format!("{} returned HTTP {}", path, status.as_u16())));
        }
        Ok(value)
    }

    async fn create_session(&self) -> Result<String> {
        let value = self
            .command(reqwest::Method::POST, "/session", Some(self.capabilities()))
            .await?;
        value
            .pointer("/value/sessionId")
            .and_then(|v| v.as_str())
            .or_else(|| value.pointer("/sessionId").and_then(|v| v.as_str()))
            .map(|s| s.to_string())
            .ok_or_else(|| Error::WebDriver("session id missing in response".to_string()))
    }

    async fn render(&self, session_id: &str, url: &str) -> Result<String> {
        self.command(
            reqwest::Method::POST,
            &format!("/session/{}/url", session_id),
            Some(json!({ "url": url })),
        )
        .await?;

        let value = self
            .command(
                reqwest::Method::POST,
                &format!("/session/{}/execute/sync", session_id),
                Some(json!({
                    "script": "return document.documentElement ? document.documentElement.outerHTML : \"\";",
                    "args": []
                })),
            )
            .await?;

        match value.pointer("/value").and_then(|v| v.as_str()) {
            Some(html) if !html.trim().is_empty() => Ok(html.to_string()),
            _ => Err(Error::WebDriver(format!("empty rendered document for {}", url))),
        }
    }
}

#[async_trait]
impl PageFetcher for WebDriverFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let session_id = self.create_session().await?;
        let rendered = self.render(&session_id, url).await;

        // always release the browser session, even when rendering failed
        if let Err(e) = self
            .command(reqwest::Method::DELETE, &format!("/session/{}", session_id), None)
            .await
        {
            tracing::debug!("Failed to delete WebDriver session {}: {}", session_id, e);
        }

        rendered
    }

    fn kind(&self) -> &'static str {
        "rendered"
    }
}

/// Fetches with up to `attempts` tries, sleeping `delay` between them.
/// Returns `None` once every attempt failed; the last failure is logged.
pub async fn fetch_with_retry(
    fetcher: &dyn PageFetcher,
    url: &str,
    attempts: usize,
    delay: Duration,
) -> Option<String> {
    let attempts = attempts.max(1);
    for attempt in 1..=attempts {
        match fetcher.fetch(url).await {
            Ok(html) => return Some(html),
            Err(e) if attempt == attempts => {
                tracing::warn!("Failed to fetch {} ({} fetch, {} attempts): {}", url, fetcher.kind(), attempts, e);
            }
            Err(e) => {
                tracing::debug!("Attempt {}/{} for {} failed: {}", attempt, attempts, url, e);
                tokio::time::sleep(delay).await;
            }
        }
    }
    None
}
