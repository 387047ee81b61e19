pub mod mock;
pub mod openrouter;
pub mod prompts;

use async_trait::async_trait;
use thiserror::Error;

pub use mock::MockDescriber;
pub use openrouter::{OpenRouter, validate_model_format};
pub use prompts::prompt_describe_page;

/// Interface to a service that writes a short natural-language description of a page.
///
/// Every failure is recoverable: callers fall back to heuristics instead of aborting.
#[async_trait]
pub trait DescriptionGenerator: Send + Sync {
    async fn generate(&self, content: &str, title: &str) -> Result<String, DescribeError>;
}

/// Why no description was produced. Each variant carries a distinct diagnostic message.
#[derive(Debug, Error)]
pub enum DescribeError {
    #[error("No content to describe")]
    EmptyContent,

    #[error("Description API bad request: {0}")]
    BadRequest(String),

    #[error("Description API authentication failed: invalid API key")]
    Unauthorized,

    #[error("Description API payment required: insufficient credits")]
    PaymentRequired,

    #[error("Description API rate limit exceeded")]
    RateLimited,

    #[error("Description API server error: {0}")]
    Server(u16),

    #[error("Description API unexpected status: {0}")]
    UnexpectedStatus(u16),

    #[error("Description API request timed out")]
    Timeout,

    #[error("Description API connection error")]
    Connection,

    #[error("Description API returned no usable completion")]
    EmptyResponse,

    #[error("Description API error: {0}")]
    Other(String),
}

impl From<reqwest::Error> for DescribeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DescribeError::Timeout
        } else if err.is_connect() {
            DescribeError::Connection
        } else if err.is_decode() {
            DescribeError::EmptyResponse
        } else {
            DescribeError::Other(err.to_string())
        }
    }
}

impl From<crate::errors::Error> for DescribeError {
    fn from(err: crate::errors::Error) -> Self {
        DescribeError::Other(err.to_string())
    }
}
