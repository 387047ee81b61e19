//! Error types for sitemap discovery, page processing & llms.txt generation.

use thiserror::Error;

/// Main error type for sitemap-ltx operations.
///
/// Most of the pipeline degrades to default values instead of returning these:
/// only configuration problems, "nothing to do" outcomes, and cancellation reach the caller.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Parsed as a URL, but not something we can crawl (e.g. `ftp://`, `mailto:`)
    #[error("Not a crawlable page URL: {0}")]
    InvalidPageUrl(String),

    /// Sitemap parsing failed
    #[error("Sitemap parsing failed: {0}")]
    Sitemap(String),

    /// The WebDriver endpoint refused or failed a command
    #[error("WebDriver error: {0}")]
    WebDriver(String),

    /// Tabular URL input could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Regex error
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// Internal error: prompt substitution failed.
    #[error("Failed to create prompt: {0}")]
    PromptCreationFailure(#[from] subst::Error),

    /// Options or environment variables hold an unusable value
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// URL discovery produced nothing to process.
    #[error("No URLs found. Check the sitemap or CSV file.")]
    NoUrlsFound,

    /// The run was cancelled before every page completed.
    #[error("Processing was cancelled")]
    Cancelled,
}

/// Type alias for Result with the crate's Error
pub type Result<T> = std::result::Result<T, Error>;
