use crate::cache::ExtractionCache;
use crate::error::{Result, KgragError};
use crate::extraction::NO_EXTRACTION;
use crate::graph::Triple;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// System instruction asking the model for structured triple output.
const SYSTEM_PROMPT: &str = "Extract knowledge graph triples from the user's text. \
    Respond with a JSON object of the form \
    {\"triples\": [{\"s\": subject, \"p\": relation, \"o\": object}, ...]}.";

/// Request structure for the OpenAI chat completions API
#[derive(Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    response_format: ResponseFormat,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: String,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response structure from the OpenAI chat completions API
#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

/// Shape the model is instructed to produce.
#[derive(Deserialize)]
struct ExtractedTriples {
    triples: Vec<Triple>,
}

/// Candidate triple extraction client over the OpenAI chat completions API
///
/// Makes a single request per prompt and returns the final structured
/// result; there is no streaming consumption. Retries on rate limits and
/// server errors with exponential backoff. Optionally caches raw outputs
/// per prompt to avoid re-extracting repeated passages.
pub struct TripleExtractor {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
    max_retries: usize,
    cache: Option<Arc<ExtractionCache>>,
}

impl TripleExtractor {
    /// Create a new triple extractor
    ///
    /// # Arguments
    ///
    /// * `api_key` - OpenAI API key
    /// * `model` - Model name (e.g., "gpt-4o-mini")
    /// * `max_tokens` - Completion token cap per request
    /// * `max_retries` - Maximum retry attempts for retryable API errors
    ///
    /// # Panics
    ///
    /// Panics if HTTP client cannot be created (should not happen in normal operation)
    pub fn new(api_key: String, model: String, max_tokens: u32, max_retries: usize) -> Self {
        Self::new_with_cache(api_key, model, max_tokens, max_retries, None)
    }

    /// Create a new triple extractor with an optional response cache
    ///
    /// # Panics
    ///
    /// Panics if HTTP client cannot be created (should not happen in normal operation)
    pub fn new_with_cache(
        api_key: String,
        model: String,
        max_tokens: u32,
        max_retries: usize,
        cache: Option<Arc<ExtractionCache>>,
    ) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
            max_tokens,
            max_retries,
            cache,
        }
    }

    /// Extract candidate triples from a free-text prompt
    ///
    /// Returns the adapter's contract output: a JSON-serialized list of
    /// `{s,p,o}` objects, or the literal `"None"` when the model produced
    /// no structured triples. Internal failures (network, API, parse) are
    /// logged and degrade to `"None"` instead of surfacing an error.
    pub async fn extract(&self, prompt: &str) -> String {
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(prompt) {
                log::debug!("Extraction cache hit for prompt ({} chars)", prompt.len());
                return cached;
            }
        }

        let output = match self.extract_with_retry(prompt).await {
            Ok(output) => output,
            Err(e) => {
                log::warn!("Triple extraction failed, degrading to \"None\": {}", e);
                NO_EXTRACTION.to_string()
            }
        };

        if let Some(cache) = &self.cache {
            cache.put(prompt.to_string(), output.clone());
        }

        output
    }

    /// Single API request mapped to the adapter's output contract
    async fn request_extraction(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            response_format: ResponseFormat {
                format_type: "json_object".to_string(),
            },
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.to_string(),
                },
            ],
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| KgragError::Extraction(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(KgragError::Extraction(format!(
                "OpenAI API error {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| KgragError::Extraction(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| {
                KgragError::Extraction("Empty response from OpenAI API".to_string())
            })?;

        Ok(content_to_output(&content))
    }

    /// Request with retry on rate limits (429) and server errors (5xx)
    async fn extract_with_retry(&self, prompt: &str) -> Result<String> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.request_extraction(prompt).await {
                Ok(output) => {
                    let duration = start.elapsed();
                    log::debug!(
                        "Extraction API call took {:?} (attempt {})",
                        duration,
                        attempt + 1
                    );
                    return Ok(output);
                }
                Err(e) if attempt < self.max_retries => {
                    let should_retry = e.to_string().contains("429")
                        || e.to_string().contains("500")
                        || e.to_string().contains("502")
                        || e.to_string().contains("503")
                        || e.to_string().contains("504");

                    if should_retry {
                        log::warn!(
                            "Retry {}/{} after error: {}",
                            attempt + 1,
                            self.max_retries,
                            e
                        );
                        tokio::time::sleep(delay).await;
                        delay *= 2; // Exponential backoff
                        attempt += 1;
                    } else {
                        // Non-retryable error, return immediately
                        return Err(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Map raw model content to the adapter's output contract.
///
/// Content carrying a `triples` array is re-serialized as a compact JSON
/// list of `{s,p,o}` objects; anything else (missing key, malformed JSON)
/// becomes `"None"`.
fn content_to_output(content: &str) -> String {
    match serde_json::from_str::<ExtractedTriples>(content) {
        Ok(extracted) => {
            // Re-serialization of plain strings cannot fail
            serde_json::to_string(&extracted.triples)
                .unwrap_or_else(|_| NO_EXTRACTION.to_string())
        }
        Err(e) => {
            log::debug!("Model content had no triples array: {}", e);
            NO_EXTRACTION.to_string()
        }
    }
}
