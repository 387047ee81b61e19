//! robots.txt checks: does a site block LLM crawlers outright?

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::config::DEFAULT_PROBE_TIMEOUT;

/// Outcome of a robots.txt check for one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RobotsCheckResult {
    pub domain: String,
    pub robots_url: String,
    /// True exactly when `blocked_crawlers` is empty.
    pub accessible: bool,
    /// Crawlers denied the whole site, first-blocked order, no duplicates.
    pub blocked_crawlers: Vec<String>,
    pub robots_content: String,
    pub error: Option<String>,
}

/// Fetches and interprets `https://{domain}/robots.txt`.
#[derive(Debug, Clone)]
pub struct RobotsChecker {
    client: Client,
    base_url: Option<String>,
    timeout: Duration,
}

impl RobotsChecker {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: None,
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// Fetches robots.txt from `{base_url}/robots.txt` instead of the domain itself.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.trim_end_matches('/').to_string());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn robots_url(&self, domain: &str) -> String {
        match &self.base_url {
            Some(base) => format!("{}/robots.txt", base),
            None => format!("https://{}/robots.txt", domain),
        }
    }

    /// Checks which of `crawlers` the domain's robots.txt blocks from the whole site.
    ///
    /// Never fails: a missing file, an error status, or a transport failure is reported in
    /// `error` and leaves the domain accessible.
    pub async fn check<S: AsRef<str>>(&self, domain: &str, crawlers: &[S]) -> RobotsCheckResult {
        let robots_url = self.robots_url(domain);
        let mut result = RobotsCheckResult {
            domain: domain.to_string(),
            robots_url: robots_url.clone(),
            accessible: true,
            blocked_crawlers: Vec::new(),
            robots_content: String::new(),
            error: None,
        };

        let response = match self.client.get(&robots_url).timeout(self.timeout).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {}", robots_url, e);
                result.error = Some(e.to_string());
                return result;
            }
        };

        match response.status() {
            StatusCode::OK => {}
            StatusCode::NOT_FOUND => {
                result.error = Some("No robots.txt file found".to_string());
                return result;
            }
            status => {
                result.error = Some(format!("HTTP {} error", status.as_u16()));
                return result;
            }
        }

        match response.text().await {
            Ok(content) => {
                result.blocked_crawlers = parse_blocked_crawlers(&content, crawlers);
                result.accessible = result.blocked_crawlers.is_empty();
                result.robots_content = content;
            }
            Err(e) => result.error = Some(e.to_string()),
        }

        tracing::debug!("{}: blocked crawlers {:?}", domain, result.blocked_crawlers);
        result
    }
}

/// Returns the crawlers that robots.txt content denies the whole site (`Disallow: /`).
///
/// A `User-agent: *` group blocks every crawler in `crawlers`; a named group blocks only that
/// agent, and only when it is one of `crawlers`. Agent names match case-insensitively.
pub fn parse_blocked_crawlers<S: AsRef<str>>(content: &str, crawlers: &[S]) -> Vec<String> {
    let mut blocked: Vec<String> = Vec::new();
    let mut block = |name: &str| {
        if !blocked.iter().any(|b| b == name) {
            blocked.push(name.to_string());
        }
    };

    let mut current_agent: Option<String> = None;
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((field, value)) = line.split_once(':') else {
            continue;
        };
        let value = value.trim();

        match field.trim().to_lowercase().as_str() {
            "user-agent" => current_agent = Some(value.to_string()),
            "disallow" if value == "/" => match current_agent.as_deref() {
                Some("*") => crawlers.iter().for_each(|c| block(c.as_ref())),
                Some(agent) => {
                    if let Some(crawler) = crawlers.iter().find(|c| c.as_ref().eq_ignore_ascii_case(agent)) {
                        block(crawler.as_ref());
                    }
                }
                None => {}
            },
            _ => {}
        }
    }

    blocked
}

/// Reduces user input like `https://www.example.com/` to `example.com`.
pub fn normalize_domain(input: &str) -> String {
    let trimmed = input.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    let without_www = without_scheme.strip_prefix("www.").unwrap_or(without_scheme);
    without_www.trim_matches('/').to_string()
}
