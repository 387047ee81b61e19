//! Configuration options for discovery, page processing, and llms.txt generation.

use std::env::VarError;
use std::num::ParseIntError;
use std::time::Duration;

/// Workers per category when nothing else is configured.
pub const DEFAULT_WORKERS: usize = 5;
/// Attempts made for each page fetch (first try included).
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Timeout for page, sitemap, and API requests.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Timeout for the lightweight existence checks (markdown probes, robots.txt).
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MAX_SITEMAP_DEPTH: usize = 5;

/// Environment variable that overrides the number of workers per category.
pub const WORKERS_ENV_VAR: &str = "LTX_WORKERS";

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Suffixes appended to a documentation URL when looking for its markdown rendering.
pub const MD_SUFFIXES: [&str; 3] = [".md", "/index.md", "/README.md"];

/// A URL containing any of these gets probed for a companion markdown document.
pub const DOC_KEYWORDS: [&str; 4] = ["guide", "doc", "api", "reference"];

/// Common LLM crawler user agents.
pub const LLM_CRAWLERS: [&str; 10] = [
    "GPTBot",
    "ClaudeBot",
    "Google-Extended",
    "anthropic-ai",
    "PerplexityBot",
    "ChatGPT-User",
    "CCBot",
    "Claude-Web",
    "Bard",
    "AI2Bot",
];

/// Name of the catch-all category for URLs that match no keyword.
pub const OTHER_CATEGORY: &str = "Other";

/// A named output section and the URL substrings that place a page in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// The default category table. Order matters: the first category with a matching keyword wins,
/// and output sections follow this order.
pub fn default_categories() -> Vec<CategoryRule> {
    vec![
        CategoryRule::new(
            "Introduction",
            &[
                "about",
                "intro",
                "introduction",
                "overview",
                "welcome",
                "home",
                "getting-started",
                "start",
                "begin",
                "what-is",
                "why",
            ],
        ),
        CategoryRule::new(
            "Get started",
            &[
                "quickstart",
                "quick-start",
                "setup",
                "install",
                "installation",
                "tutorial",
                "first-steps",
                "onboarding",
                "guide",
                "how-to",
            ],
        ),
        CategoryRule::new(
            "API Reference",
            &[
                "api",
                "reference",
                "docs",
                "documentation",
                "endpoints",
                "methods",
                "functions",
                "sdk",
                "rest",
                "graphql",
            ],
        ),
        CategoryRule::new(
            "Guides",
            &[
                "guide",
                "tutorial",
                "how-to",
                "example",
                "examples",
                "walkthrough",
                "step-by-step",
                "learn",
                "training",
            ],
        ),
        CategoryRule::new(
            "Resources",
            &[
                "resources",
                "tools",
                "utilities",
                "downloads",
                "assets",
                "templates",
                "samples",
                "community",
                "support",
            ],
        ),
    ]
}

/// Configuration options for the generator.
#[derive(Debug, Clone)]
pub struct GeneratorOptions {
    /// Maximum number of pages processed at once within a category (default: 5)
    pub workers_per_category: usize,
    /// Attempts per page fetch, including the first (default: 3)
    pub max_retries: usize,
    /// Pause between page fetch attempts (default: 1s)
    pub retry_delay: Duration,
    /// Timeout for page, sitemap, and description API requests (default: 30s)
    pub request_timeout: Duration,
    /// Timeout for markdown probes and robots.txt fetches (default: 10s)
    pub probe_timeout: Duration,
    /// How many sitemap index levels are followed below the root sitemap (default: 5)
    pub max_sitemap_depth: usize,
    /// Ordered category table
    pub categories: Vec<CategoryRule>,
    /// Candidate suffixes for companion markdown documents, tried in order
    pub md_suffixes: Vec<String>,
    /// URL substrings that trigger the markdown probe
    pub doc_keywords: Vec<String>,
    /// User-Agent sent with every static request
    pub user_agent: String,
    /// WebDriver endpoint (e.g. `http://localhost:4444`). When set, pages are fetched rendered.
    pub webdriver_endpoint: Option<String>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            workers_per_category: DEFAULT_WORKERS,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_sitemap_depth: DEFAULT_MAX_SITEMAP_DEPTH,
            categories: default_categories(),
            md_suffixes: MD_SUFFIXES.iter().map(|s| s.to_string()).collect(),
            doc_keywords: DOC_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            user_agent: BROWSER_USER_AGENT.to_string(),
            webdriver_endpoint: None,
        }
    }
}

impl GeneratorOptions {
    /// Creates a new builder for GeneratorOptions.
    pub fn builder() -> GeneratorOptionsBuilder {
        GeneratorOptionsBuilder::default()
    }

    /// True when pages are fetched through a headless browser.
    pub fn renders_js(&self) -> bool {
        self.webdriver_endpoint.is_some()
    }
}

/// Builder for GeneratorOptions.
#[derive(Debug, Clone, Default)]
pub struct GeneratorOptionsBuilder {
    workers_per_category: Option<usize>,
    max_retries: Option<usize>,
    retry_delay: Option<Duration>,
    request_timeout: Option<Duration>,
    probe_timeout: Option<Duration>,
    max_sitemap_depth: Option<usize>,
    categories: Option<Vec<CategoryRule>>,
    md_suffixes: Option<Vec<String>>,
    doc_keywords: Option<Vec<String>>,
    user_agent: Option<String>,
    webdriver_endpoint: Option<String>,
}

impl GeneratorOptionsBuilder {
    /// Sets the number of concurrent workers per category. Zero is treated as one.
    pub fn workers_per_category(mut self, workers: usize) -> Self {
        self.workers_per_category = Some(workers);
        self
    }

    /// Sets the number of page fetch attempts. Zero is treated as one.
    pub fn max_retries(mut self, attempts: usize) -> Self {
        self.max_retries = Some(attempts);
        self
    }

    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = Some(delay);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = Some(timeout);
        self
    }

    pub fn max_sitemap_depth(mut self, depth: usize) -> Self {
        self.max_sitemap_depth = Some(depth);
        self
    }

    /// Replaces the category table.
    pub fn categories(mut self, categories: Vec<CategoryRule>) -> Self {
        self.categories = Some(categories);
        self
    }

    /// Replaces the markdown probe suffixes.
    pub fn md_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.md_suffixes = Some(suffixes);
        self
    }

    pub fn doc_keywords(mut self, keywords: Vec<String>) -> Self {
        self.doc_keywords = Some(keywords);
        self
    }

    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = Some(user_agent);
        self
    }

    /// Fetch pages through the WebDriver server at this endpoint.
    pub fn webdriver_endpoint(mut self, endpoint: String) -> Self {
        self.webdriver_endpoint = Some(endpoint);
        self
    }

    /// Builds the GeneratorOptions.
    pub fn build(self) -> GeneratorOptions {
        let defaults = GeneratorOptions::default();
        GeneratorOptions {
            workers_per_category: self.workers_per_category.unwrap_or(defaults.workers_per_category).max(1),
            max_retries: self.max_retries.unwrap_or(defaults.max_retries).max(1),
            retry_delay: self.retry_delay.unwrap_or(defaults.retry_delay),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            probe_timeout: self.probe_timeout.unwrap_or(defaults.probe_timeout),
            max_sitemap_depth: self.max_sitemap_depth.unwrap_or(defaults.max_sitemap_depth),
            categories: self.categories.unwrap_or(defaults.categories),
            md_suffixes: self.md_suffixes.unwrap_or(defaults.md_suffixes),
            doc_keywords: self.doc_keywords.unwrap_or(defaults.doc_keywords),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
            webdriver_endpoint: self.webdriver_endpoint,
        }
    }
}

/// Retrieves the per-category worker count from `LTX_WORKERS`.
/// A missing variable falls back to `override_default`, then to `DEFAULT_WORKERS`.
pub fn get_workers(override_default: Option<usize>) -> Result<usize, WorkersError> {
    match std::env::var(WORKERS_ENV_VAR) {
        Ok(raw) => parse_workers(&raw),
        Err(VarError::NotPresent) => Ok(override_default.unwrap_or(DEFAULT_WORKERS)),
        Err(e) => Err(e.into()),
    }
}

/// Parses a worker count. Must be a positive integer.
pub fn parse_workers(raw: &str) -> Result<usize, WorkersError> {
    match raw.trim().parse::<usize>()? {
        0 => Err(WorkersError::NonPositive),
        n => Ok(n),
    }
}

#[derive(Debug)]
pub enum WorkersError {
    ParseIntError(ParseIntError),
    NonPositive,
    InvalidEnvVar(VarError),
}

impl std::error::Error for WorkersError {}

impl From<ParseIntError> for WorkersError {
    fn from(error: ParseIntError) -> Self {
        Self::ParseIntError(error)
    }
}

impl From<VarError> for WorkersError {
    fn from(error: VarError) -> Self {
        Self::InvalidEnvVar(error)
    }
}

impl std::fmt::Display for WorkersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        match self {
            Self::ParseIntError(e) => write!(f, "Failed to parse {} as an integer: {}", WORKERS_ENV_VAR, e),
            Self::NonPositive => write!(f, "{} must be a positive number", WORKERS_ENV_VAR),
            Self::InvalidEnvVar(e) => write!(f, "Environment variable {} is unreadable: {}", WORKERS_ENV_VAR, e),
        }
    }
}

impl From<WorkersError> for crate::errors::Error {
    fn from(error: WorkersError) -> Self {
        crate::errors::Error::InvalidConfig(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GeneratorOptions::default();
        assert_eq!(options.workers_per_category, 5);
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.retry_delay, Duration::from_secs(1));
        assert_eq!(options.request_timeout, Duration::from_secs(30));
        assert_eq!(options.md_suffixes, vec![".md", "/index.md", "/README.md"]);
        assert!(!options.renders_js());
    }

    #[test]
    fn test_category_order_is_declared_order() {
        let names: Vec<String> = default_categories().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec!["Introduction", "Get started", "API Reference", "Guides", "Resources"]
        );
    }

    #[test]
    fn test_builder_overrides_and_clamps() {
        let options = GeneratorOptions::builder()
            .workers_per_category(0)
            .max_retries(0)
            .retry_delay(Duration::from_millis(5))
            .md_suffixes(vec![".markdown".to_string()])
            .webdriver_endpoint("http://localhost:4444".to_string())
            .build();

        assert_eq!(options.workers_per_category, 1);
        assert_eq!(options.max_retries, 1);
        assert_eq!(options.retry_delay, Duration::from_millis(5));
        assert_eq!(options.md_suffixes, vec![".markdown"]);
        assert!(options.renders_js());
        assert_eq!(options.categories, default_categories());
    }

    #[test]
    fn test_parse_workers() {
        assert_eq!(parse_workers("8").unwrap(), 8);
        assert_eq!(parse_workers(" 2 \n").unwrap(), 2);
        assert!(matches!(parse_workers("0"), Err(WorkersError::NonPositive)));
        assert!(matches!(parse_workers("-1"), Err(WorkersError::ParseIntError(_))));
        assert!(matches!(parse_workers("many"), Err(WorkersError::ParseIntError(_))));
    }
}
