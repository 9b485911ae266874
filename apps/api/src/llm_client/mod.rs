/// LLM Client: the single point of entry for generative-text calls.
///
/// Callers depend on the `TextGenerator` trait: a prompt goes in, text comes out.
/// `GeminiClient` implements it against the `generateContent` endpoint, with the
/// API key and model supplied per call.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

const MAX_RETRIES: u32 = 3;
const RETRY_BASE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    #[error("LLM returned empty content")]
    EmptyContent,
}

/// Opaque prompt-in, text-out generation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str, api_key: &str, model: &str) -> Result<String, LlmError>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate.
    pub fn text(&self) -> Option<&str> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .and_then(|c| c.parts.first())
            .and_then(|p| p.text.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Gemini `generateContent` client with retry on rate limits and server errors.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    retry_base_delay: Duration,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry_base_delay: RETRY_BASE_DELAY,
        }
    }

    /// Overrides the first backoff delay; later retries double it.
    #[cfg(test)]
    fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }

    /// Makes a raw call, returning the full response object.
    /// Retries on 429 (rate limit) and 5xx errors with exponential backoff.
    pub async fn call(
        &self,
        prompt: &str,
        api_key: &str,
        model: &str,
    ) -> Result<GenerateResponse, LlmError> {
        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };
        let url = self.endpoint(model);

        let mut last_error: Option<LlmError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: base, then 2x base
                let delay = self.retry_base_delay * (1 << (attempt - 1));
                warn!(
                    "LLM call attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .query(&[("key", api_key)])
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(LlmError::Http(e.without_url()));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("LLM API returned {}: {}", status, body);
                last_error = Some(if status.as_u16() == 429 {
                    LlmError::RateLimited {
                        retries: MAX_RETRIES,
                    }
                } else {
                    LlmError::Api {
                        status: status.as_u16(),
                        message: body,
                    }
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<ApiError>(&body)
                    .map(|e| e.error.message)
                    .unwrap_or(body);
                return Err(LlmError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await.map_err(reqwest::Error::without_url)?;
            let parsed: GenerateResponse = serde_json::from_str(&body)?;

            if let Some(usage) = &parsed.usage_metadata {
                debug!(
                    "LLM call succeeded: model={}, prompt_tokens={}, output_tokens={}",
                    model, usage.prompt_token_count, usage.candidates_token_count
                );
            }

            return Ok(parsed);
        }

        Err(last_error.unwrap_or(LlmError::RateLimited {
            retries: MAX_RETRIES,
        }))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str, api_key: &str, model: &str) -> Result<String, LlmError> {
        let response = self.call(prompt, api_key, model).await?;
        response
            .text()
            .filter(|t| !t.trim().is_empty())
            .map(str::to_string)
            .ok_or(LlmError::EmptyContent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::Query, http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Serves a fake `generateContent` endpoint on a random local port.
    async fn spawn_fake_gemini(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1beta")
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: "hi" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"contents": [{"parts": [{"text": "hi"}]}]})
        );
    }

    #[test]
    fn test_response_text_extraction() {
        let response: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "first"}, {"text": "second"}]}}],
            "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 1}
        }))
        .unwrap();
        assert_eq!(response.text(), Some("first"));
        assert_eq!(response.usage_metadata.unwrap().prompt_token_count, 3);
    }

    #[test]
    fn test_response_without_candidates() {
        let response: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(response.text(), None);
    }

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let client = GeminiClient::new("https://example.test/v1beta/");
        assert_eq!(
            client.endpoint("gemini-pro"),
            "https://example.test/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_returns_candidate_text() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(
                |Query(q): Query<HashMap<String, String>>, Json(body): Json<Value>| async move {
                    assert_eq!(q.get("key").map(String::as_str), Some("test-key"));
                    let prompt = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
                    Json(json!({
                        "candidates": [{"content": {"parts": [{"text": format!("echo: {prompt}")}]}}]
                    }))
                },
            ),
        );
        let client = GeminiClient::new(spawn_fake_gemini(router).await);

        let text = client.generate("hello", "test-key", "gemini-test").await.unwrap();
        assert_eq!(text, "echo: hello");
    }

    #[tokio::test]
    async fn test_client_error_surfaces_api_message() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error": {"message": "API key not valid"}})),
                )
            }),
        );
        let client = GeminiClient::new(spawn_fake_gemini(router).await);

        match client.generate("hello", "bad", "gemini-test").await {
            Err(LlmError::Api { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("expected API error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_empty_candidate_is_empty_content() {
        let router = Router::new().route(
            "/v1beta/models/:model",
            post(|| async { Json(json!({"candidates": []})) }),
        );
        let client = GeminiClient::new(spawn_fake_gemini(router).await);

        let err = client.generate("hello", "k", "m").await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyContent));
    }

    /// Answers with `failures` in order, then with a candidate once they run out.
    fn flaky_router(failures: Vec<StatusCode>, hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/v1beta/models/:model",
            post(move || {
                let hit = hits.fetch_add(1, Ordering::SeqCst);
                let failure = failures.get(hit).copied();
                async move {
                    match failure {
                        Some(status) => (status, Json(json!({"error": {"message": "busy"}}))),
                        None => (
                            StatusCode::OK,
                            Json(json!({"candidates": [{"content": {"parts": [{"text": "ok"}]}}]})),
                        ),
                    }
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_rate_limit_is_retried_until_success() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = flaky_router(
            vec![StatusCode::TOO_MANY_REQUESTS, StatusCode::TOO_MANY_REQUESTS],
            hits.clone(),
        );
        let client = GeminiClient::new(spawn_fake_gemini(router).await)
            .with_retry_base_delay(Duration::from_millis(10));

        let text = client.generate("p", "k", "m").await.unwrap();
        assert_eq!(text, "ok");
        assert_eq!(hits.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_server_error_gives_up_after_max_retries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = flaky_router(vec![StatusCode::SERVICE_UNAVAILABLE; 10], hits.clone());
        let client = GeminiClient::new(spawn_fake_gemini(router).await)
            .with_retry_base_delay(Duration::from_millis(10));

        match client.generate("p", "k", "m").await {
            Err(LlmError::Api { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected API error, got {other:?}"),
        }
        assert_eq!(hits.load(Ordering::SeqCst), MAX_RETRIES as usize);
    }

    #[tokio::test]
    async fn test_persistent_rate_limit_is_reported() {
        let hits = Arc::new(AtomicUsize::new(0));
        let router = flaky_router(vec![StatusCode::TOO_MANY_REQUESTS; 10], hits.clone());
        let client = GeminiClient::new(spawn_fake_gemini(router).await)
            .with_retry_base_delay(Duration::from_millis(10));

        let err = client.generate("p", "k", "m").await.unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retries: MAX_RETRIES }));
        assert_eq!(hits.load(Ordering::SeqCst), MAX_RETRIES as usize);
    }
}
