//! OpenRouter (OpenAI-compatible chat completions) client for page descriptions.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::config::DEFAULT_REQUEST_TIMEOUT;
use crate::errors::Error;
use crate::llms::{DescribeError, DescriptionGenerator, prompt_describe_page};
use crate::text_utils::truncate_chars;

pub const OPENROUTER_API_BASE: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat:free";

/// Page content beyond this many characters is not sent to the model.
pub const MAX_CONTENT_CHARS: usize = 2000;
/// Generated descriptions are cut to this many characters.
pub const MAX_DESCRIPTION_CHARS: usize = 150;

const APP_REFERER: &str = "https://github.com/malcolmgreaves/llm-web-index";
const APP_TITLE: &str = "sitemap-ltx";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    top_p: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: Option<String>,
}

/// One entry of the `/models` listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelInfo {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub pricing: Option<ModelPricing>,
}

/// Per-token prices, as decimal strings.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ModelPricing {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub completion: Option<String>,
}

impl ModelInfo {
    /// Free when both prompt and completion prices are zero. Missing prices count as zero.
    pub fn is_free(&self) -> bool {
        let Some(pricing) = &self.pricing else {
            return false;
        };
        let price = |p: &Option<String>| p.as_deref().unwrap_or("0").trim().parse::<f64>().ok();
        matches!((price(&pricing.prompt), price(&pricing.completion)), (Some(p), Some(c)) if p == 0.0 && c == 0.0)
    }
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelInfo>,
}

/// Checks the `provider/model-name` or `provider/model-name:variant` model id format.
///
/// # Examples
///
/// ```
/// # use sitemap_ltx::llms::validate_model_format;
/// assert!(validate_model_format("deepseek/deepseek-r1:free"));
/// assert!(!validate_model_format("invalid-model"));
/// ```
pub fn validate_model_format(model: &str) -> bool {
    if model.is_empty() || !model.contains('/') {
        return false;
    }
    if model.contains("//") || model.starts_with('/') || model.ends_with('/') {
        return false;
    }

    let Some((provider, model_part)) = model.split_once('/') else {
        return false;
    };
    if provider.trim().is_empty() || model_part.trim().is_empty() {
        return false;
    }
    if provider.chars().count() > 50 || model_part.chars().count() > 100 {
        return false;
    }

    if let Some((model_name, variant)) = model_part.split_once(':') {
        if model_name.trim().is_empty() || variant.trim().is_empty() {
            return false;
        }
    }

    true
}

/// Removes the echoed "Description:" label and quotes, then caps the length.
fn clean_description(raw: &str) -> String {
    let cleaned = raw.replace("Description:", "").replace('"', "");
    truncate_chars(cleaned.trim(), MAX_DESCRIPTION_CHARS).trim_end().to_string()
}

/// Client for the OpenRouter chat completions API.
///
/// Requests are never retried: one failure means "no AI description" for that page.
#[derive(Debug, Clone)]
pub struct OpenRouter {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout: Duration,
}

impl OpenRouter {
    /// Creates a client for `model`. Fails when the model id isn't `provider/model[:variant]`.
    pub fn new(client: Client, api_key: &str, model: &str) -> Result<Self, Error> {
        if !validate_model_format(model) {
            return Err(Error::InvalidConfig(format!(
                "Invalid model format '{}': expected provider/model-name or provider/model-name:variant",
                model
            )));
        }
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: OPENROUTER_API_BASE.to_string(),
            timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }

    /// Points the client at another OpenAI-compatible endpoint.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, content: &str) -> Result<String, DescribeError> {
        let prompt = prompt_describe_page(truncate_chars(content, MAX_CONTENT_CHARS))?;
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: 100,
            temperature: 0.3,
            top_p: 0.9,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", APP_REFERER)
            .header("X-Title", APP_TITLE)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        match status {
            StatusCode::OK => {
                let body: ChatResponse = response.json().await?;
                let description = body
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message)
                    .and_then(|message| message.content)
                    .map(|content| clean_description(&content))
                    .unwrap_or_default();
                if description.is_empty() {
                    Err(DescribeError::EmptyResponse)
                } else {
                    Ok(description)
                }
            }
            StatusCode::BAD_REQUEST => {
                let message = response
                    .json::<ApiErrorBody>()
                    .await
                    .ok()
                    .and_then(|body| body.error)
                    .and_then(|detail| detail.message)
                    .unwrap_or_else(|| "Unknown error".to_string());
                Err(DescribeError::BadRequest(message))
            }
            StatusCode::UNAUTHORIZED => Err(DescribeError::Unauthorized),
            StatusCode::PAYMENT_REQUIRED => Err(DescribeError::PaymentRequired),
            StatusCode::TOO_MANY_REQUESTS => Err(DescribeError::RateLimited),
            s if s.is_server_error() => Err(DescribeError::Server(s.as_u16())),
            s => Err(DescribeError::UnexpectedStatus(s.as_u16())),
        }
    }

    /// Sends a tiny canned request to check the key, model, and credits.
    pub async fn test_connection(&self) -> Result<String, DescribeError> {
        self.complete("This is a test page about API documentation.").await?;
        Ok(format!("Connection successful! Model '{}' is working.", self.model))
    }

    /// Lists the models the API offers. Empty on any failure.
    pub async fn list_models(&self) -> Vec<ModelInfo> {
        let response = self
            .client
            .get(format!("{}/models", self.base_url))
            .bearer_auth(&self.api_key)
            .timeout(self.timeout)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => match response.json::<ModelsResponse>().await {
                Ok(models) => models.data,
                Err(e) => {
                    tracing::warn!("Failed to parse model listing: {}", e);
                    Vec::new()
                }
            },
            Ok(response) => {
                tracing::warn!("Failed to fetch models: HTTP {}", response.status().as_u16());
                Vec::new()
            }
            Err(e) => {
                tracing::warn!("Error fetching models: {}", e);
                Vec::new()
            }
        }
    }

    pub async fn model_info(&self, model_id: &str) -> Option<ModelInfo> {
        self.list_models().await.into_iter().find(|m| m.id == model_id)
    }

    pub async fn is_model_free(&self, model_id: &str) -> bool {
        self.model_info(model_id).await.is_some_and(|m| m.is_free())
    }
}

#[async_trait]
impl DescriptionGenerator for OpenRouter {
    async fn generate(&self, content: &str, title: &str) -> Result<String, DescribeError> {
        if content.trim().is_empty() {
            return Err(DescribeError::EmptyContent);
        }
        tracing::debug!("Requesting description for '{}' from {}", title, self.model);
        self.complete(content).await
    }
}
