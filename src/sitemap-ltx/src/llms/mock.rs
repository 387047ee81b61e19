//! Mock description generator for testing
//!
//! Returns predefined descriptions or failures without making API calls,
//! and counts how often it was asked.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::llms::{DescribeError, DescriptionGenerator};

/// Mock description generator for testing
///
/// Can be configured to:
/// - Return specific descriptions based on the page title
/// - Return a default description for any page
/// - Simulate API failures
#[derive(Debug, Default)]
pub struct MockDescriber {
    /// Page title substrings and their descriptions, checked in insertion order
    responses: Vec<(String, String)>,
    /// Description returned when no title matches
    default_response: Option<String>,
    /// Error produced on every call when set
    failure: Option<fn() -> DescribeError>,
    calls: AtomicUsize,
}

impl MockDescriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `description` for every page.
    pub fn with_default(description: &str) -> Self {
        Self {
            default_response: Some(description.to_string()),
            ..Self::default()
        }
    }

    /// Returns the description of the first entry whose key is contained in the page title.
    pub fn with_responses(responses: Vec<(&str, &str)>) -> Self {
        let mut describer = Self::new();
        for (title_part, description) in responses {
            describer.add_response(title_part, description);
        }
        describer
    }

    /// Fails every call with a rate limit error.
    pub fn with_failure() -> Self {
        Self::with_error(|| DescribeError::RateLimited)
    }

    /// Fails every call with the error built by `make_error`.
    pub fn with_error(make_error: fn() -> DescribeError) -> Self {
        Self {
            failure: Some(make_error),
            ..Self::default()
        }
    }

    pub fn add_response(&mut self, title_contains: &str, description: &str) {
        self.responses
            .push((title_contains.to_string(), description.to_string()));
    }

    /// Number of `generate` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DescriptionGenerator for MockDescriber {
    async fn generate(&self, content: &str, title: &str) -> Result<String, DescribeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(make_error) = self.failure {
            return Err(make_error());
        }
        if content.trim().is_empty() {
            return Err(DescribeError::EmptyContent);
        }

        for (key, description) in &self.responses {
            if title.contains(key.as_str()) {
                return Ok(description.clone());
            }
        }

        self.default_response
            .clone()
            .ok_or_else(|| DescribeError::Other("Mock describer has no response configured".to_string()))
    }
}
