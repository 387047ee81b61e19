//! The unit of work for one URL: fetch, extract, describe, and look for companion markdown.

use std::sync::Arc;

use reqwest::Client;
use serde::Serialize;

use crate::config::GeneratorOptions;
use crate::fetch::{PageFetcher, StaticFetcher, WebDriverFetcher, fetch_with_retry, probe_exists};
use crate::html::extract_page_info;
use crate::llms::DescriptionGenerator;
use crate::page_url::PageUrl;
use crate::text_utils::first_sentence;

pub const DEFAULT_TITLE: &str = "Page";
pub const DEFAULT_DESCRIPTION: &str = "Resource information";

/// Last-resort first sentence threshold, looser than the one used during extraction.
const FALLBACK_SENTENCE_CHARS: usize = 10;

/// One line of the generated document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult {
    pub url: String,
    pub title: String,
    pub description: String,
    pub md_link: Option<String>,
}

impl PageResult {
    /// The result for a page that could not be fetched.
    pub fn default_for(url: &PageUrl) -> Self {
        Self {
            url: url.to_string(),
            title: DEFAULT_TITLE.to_string(),
            description: DEFAULT_DESCRIPTION.to_string(),
            md_link: None,
        }
    }
}

/// Turns a URL into a [`PageResult`]. Cheap to clone: every clone shares the fetcher,
/// the HTTP client's connection pool, and the options.
#[derive(Clone)]
pub struct PageProcessor {
    fetcher: Arc<dyn PageFetcher>,
    client: Client,
    options: Arc<GeneratorOptions>,
}

impl PageProcessor {
    pub fn new(client: Client, fetcher: Arc<dyn PageFetcher>, options: GeneratorOptions) -> Self {
        Self {
            fetcher,
            client,
            options: Arc::new(options),
        }
    }

    /// Picks the rendered backend when a WebDriver endpoint is configured, the static one otherwise.
    pub fn from_options(client: Client, options: GeneratorOptions) -> Self {
        let fetcher: Arc<dyn PageFetcher> = match &options.webdriver_endpoint {
            Some(endpoint) => Arc::new(WebDriverFetcher::new(client.clone(), endpoint, options.request_timeout)),
            None => Arc::new(StaticFetcher::new(client.clone())),
        };
        Self::new(client, fetcher, options)
    }

    pub fn fetcher(&self) -> &dyn PageFetcher {
        self.fetcher.as_ref()
    }

    pub fn options(&self) -> &GeneratorOptions {
        &self.options
    }

    /// Processes one page. Never fails: anything that goes wrong degrades to defaults.
    pub async fn process(&self, url: &PageUrl, generator: Option<&dyn DescriptionGenerator>) -> PageResult {
        let Some(html) = fetch_with_retry(
            self.fetcher.as_ref(),
            url.as_str(),
            self.options.max_retries,
            self.options.retry_delay,
        )
        .await
        else {
            return PageResult::default_for(url);
        };

        let info = extract_page_info(&html, url.as_str());

        let ai_description = match generator {
            Some(generator) if !info.main_text.is_empty() => {
                match generator.generate(&info.main_text, &info.title).await {
                    Ok(description) if !description.trim().is_empty() => Some(description),
                    Ok(_) => {
                        tracing::warn!("Empty AI description for {}; using fallback", url);
                        None
                    }
                    Err(e) => {
                        tracing::warn!("AI description failed for {}: {}", url, e);
                        None
                    }
                }
            }
            _ => None,
        };

        let description = ai_description
            .or(info.description)
            .or_else(|| first_sentence(&info.main_text, FALLBACK_SENTENCE_CHARS))
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());

        let md_link = self.find_md_link(url.as_str()).await;

        PageResult {
            url: url.to_string(),
            title: info.title,
            description,
            md_link,
        }
    }

    /// Probes for a companion markdown document when the URL looks like documentation.
    /// The first candidate answering `200` wins.
    pub async fn find_md_link(&self, url: &str) -> Option<String> {
        let url_lower = url.to_lowercase();
        if !self
            .options
            .doc_keywords
            .iter()
            .any(|keyword| url_lower.contains(keyword.as_str()))
        {
            return None;
        }

        let base = url.trim_end_matches('/');
        for suffix in &self.options.md_suffixes {
            let candidate = format!("{}{}", base, suffix);
            if probe_exists(&self.client, &candidate, self.options.probe_timeout).await {
                tracing::debug!("Found markdown companion for {}: {}", url, candidate);
                return Some(candidate);
            }
        }
        None
    }
}
