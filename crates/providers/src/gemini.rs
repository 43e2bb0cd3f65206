//! Gemini provider implementation.
//!
//! Talks to the Generative Language API's `streamGenerateContent` endpoint
//! with `alt=sse`, so every server-sent event carries one complete
//! `GenerateContentResponse`. Each event becomes one [`StreamChunk`]: the
//! text of the first candidate plus the web URIs of its grounding metadata.
//!
//! Supports:
//! - Multi-turn contents with a system instruction
//! - Live Google Search grounding (`google_search` tool)
//! - Health checks against the model resource

use std::time::Duration;

use async_trait::async_trait;
use campusbot_core::error::ProviderError;
use campusbot_core::message::Message;
use campusbot_core::provider::*;
use futures::StreamExt;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::sse;

/// Back-off suggested when a 429 carries no `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 5;

/// A Gemini streaming provider.
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider for the given API root.
    ///
    /// Only connection establishment is time-limited; a reply may stream for
    /// as long as the service keeps sending.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ProviderError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            client,
        })
    }

    fn stream_url(&self, model: &str) -> String {
        format!("{}/models/{model}:streamGenerateContent?alt=sse", self.base_url)
    }

    /// Convert a provider request into the API body.
    fn to_api_request(request: &ProviderRequest) -> ApiRequest<'_> {
        ApiRequest {
            contents: Self::to_api_contents(&request.messages),
            system_instruction: request
                .system_instruction
                .as_deref()
                .map(|text| ApiSystemInstruction {
                    parts: vec![ApiPart { text }],
                }),
            generation_config: ApiGenerationConfig {
                temperature: request.temperature,
            },
            tools: if request.live_search {
                vec![ApiTool::default()]
            } else {
                Vec::new()
            },
        }
    }

    /// Convert our messages to API contents.
    ///
    /// Empty history turns are left out. The final turn is always sent, even
    /// when empty, so the service answers the new input and not an older one.
    fn to_api_contents(messages: &[Message]) -> Vec<ApiContent<'_>> {
        let last = messages.len().saturating_sub(1);
        messages
            .iter()
            .enumerate()
            .filter(|(i, m)| *i == last || !m.text.is_empty())
            .map(|(_, m)| ApiContent {
                role: m.role.as_str(),
                parts: vec![ApiPart { text: &m.text }],
            })
            .collect()
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn stream(&self, request: ProviderRequest) -> Result<ChunkStream, ProviderError> {
        let url = self.stream_url(&request.model);
        let body = Self::to_api_request(&request);

        debug!(
            model = %request.model,
            turns = body.contents.len(),
            live_search = request.live_search,
            "Sending streaming request"
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Accept", "text/event-stream")
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let error_body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), body = %error_body, "Provider streaming error");
            return Err(map_http_error(status, &error_body, retry_after, &request.model));
        }

        let chunks = sse::data_events(response.bytes_stream()).map(|event| {
            event.and_then(|data| parse_chunk(&data))
        });

        Ok(chunks.boxed())
    }

    async fn health_check(&self) -> Result<bool, ProviderError> {
        let url = format!("{}/models", self.base_url);
        let response = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

/// Decode one SSE payload into a chunk.
///
/// A payload that is not a `GenerateContentResponse`, or that reports an
/// error object, fails the stream.
fn parse_chunk(data: &str) -> Result<StreamChunk, ProviderError> {
    let response: ApiResponse =
        serde_json::from_str(data).map_err(|e| ProviderError::MalformedChunk(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(ProviderError::ApiError {
            status_code: error.code.unwrap_or(200),
            message: error.message.unwrap_or_else(|| "unknown error".into()),
        });
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Ok(StreamChunk::default());
    };

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    let citations = candidate
        .grounding_metadata
        .and_then(|meta| meta.grounding_chunks)
        .map(|chunks| {
            chunks
                .into_iter()
                .filter_map(|chunk| chunk.web.and_then(|web| web.uri))
                .collect()
        });

    Ok(StreamChunk { text, citations })
}

/// Map a non-success status to a provider error, preferring the service's
/// own `error.message` over the raw body.
fn map_http_error(
    status: StatusCode,
    body: &str,
    retry_after: Option<u64>,
    model: &str,
) -> ProviderError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|err| err.get("message"))
                .and_then(|msg| msg.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    match status {
        StatusCode::TOO_MANY_REQUESTS => ProviderError::RateLimited {
            retry_after_secs: retry_after.unwrap_or(DEFAULT_RETRY_AFTER_SECS),
        },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            ProviderError::AuthenticationFailed(message)
        }
        StatusCode::NOT_FOUND => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError {
            status_code: status.as_u16(),
            message,
        },
    }
}

// --- Gemini API types (internal) ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<ApiSystemInstruction<'a>>,
    generation_config: ApiGenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ApiTool>,
}

#[derive(Debug, Serialize)]
struct ApiContent<'a> {
    role: &'a str,
    parts: Vec<ApiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct ApiSystemInstruction<'a> {
    parts: Vec<ApiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct ApiGenerationConfig {
    temperature: f32,
}

#[derive(Debug, Default, Serialize)]
struct ApiTool {
    google_search: ApiGoogleSearch,
}

#[derive(Debug, Default, Serialize)]
struct ApiGoogleSearch {}

/// One streamed `GenerateContentResponse`.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
    #[serde(default)]
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiResponseContent>,
    #[serde(default)]
    grounding_metadata: Option<ApiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseContent {
    #[serde(default)]
    parts: Vec<ApiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ApiResponsePart {
    #[serde(default)]
    text: Option<String>,
    /// Set on thought-summary parts, which are not answer text.
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Option<Vec<ApiGroundingChunk>>,
}

#[derive(Debug, Deserialize)]
struct ApiGroundingChunk {
    #[serde(default)]
    web: Option<ApiWebSource>,
}

#[derive(Debug, Deserialize)]
struct ApiWebSource {
    #[serde(default)]
    uri: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(messages: Vec<Message>, live_search: bool) -> ProviderRequest {
        ProviderRequest {
            model: "gemini-2.5-flash".into(),
            system_instruction: Some("You are SIT Bot.".into()),
            messages,
            temperature: 0.7,
            live_search,
        }
    }

    #[test]
    fn base_url_is_normalized() {
        let provider = GeminiProvider::new("https://example.test/v1beta/", "k").unwrap();
        assert_eq!(
            provider.stream_url("gemini-2.5-flash"),
            "https://example.test/v1beta/models/gemini-2.5-flash:streamGenerateContent?alt=sse"
        );
        assert_eq!(provider.name(), "gemini");
    }

    #[test]
    fn request_body_shape() {
        let req = request(
            vec![
                Message::user("Hi"),
                Message::model("Hello!"),
                Message::user("Where is the gym?"),
            ],
            true,
        );
        let body = serde_json::to_value(GeminiProvider::to_api_request(&req)).unwrap();

        assert_eq!(body["contents"].as_array().unwrap().len(), 3);
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "Where is the gym?");
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            "You are SIT Bot."
        );
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
        assert_eq!(body["tools"], serde_json::json!([{ "google_search": {} }]));
    }

    #[test]
    fn request_without_search_has_no_tools() {
        let req = request(vec![Message::user("Hi")], false);
        let body = serde_json::to_value(GeminiProvider::to_api_request(&req)).unwrap();
        assert!(body.get("tools").is_none());
    }

    #[test]
    fn empty_turns_are_skipped() {
        let messages = vec![Message::user("Hi"), Message::model(""), Message::user("Again")];
        let contents = GeminiProvider::to_api_contents(&messages);
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[1].parts[0].text, "Again");
    }

    #[test]
    fn empty_final_turn_is_still_sent() {
        let req = request(
            vec![Message::user("hi"), Message::model(""), Message::user("")],
            false,
        );
        let body = serde_json::to_value(GeminiProvider::to_api_request(&req)).unwrap();

        let contents = body["contents"].as_array().unwrap();
        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0]["parts"][0]["text"], "hi");
        assert_eq!(contents[1]["role"], "user");
        assert_eq!(contents[1]["parts"][0]["text"], "");
    }

    #[test]
    fn parse_text_chunk() {
        let data = r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"The "},{"text":"Matrix "}]}}]}"#;
        let chunk = parse_chunk(data).unwrap();
        assert_eq!(chunk.text, "The Matrix ");
        assert_eq!(chunk.citations, None);
    }

    #[test]
    fn parse_grounding_chunk_keeps_duplicates() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":""}]},"groundingMetadata":{"groundingChunks":[{"web":{"uri":"https://a.example/","title":"a"}},{"web":{"uri":"https://a.example/"}},{"retrievedContext":{}}]}}]}"#;
        let chunk = parse_chunk(data).unwrap();
        assert_eq!(chunk.text, "");
        assert_eq!(
            chunk.citations,
            Some(vec!["https://a.example/".into(), "https://a.example/".into()])
        );
    }

    #[test]
    fn grounding_metadata_without_chunks_is_absent() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"x"}]},"groundingMetadata":{"webSearchQueries":["pizza"]}}]}"#;
        let chunk = parse_chunk(data).unwrap();
        assert_eq!(chunk.citations, None);
    }

    #[test]
    fn thought_parts_are_not_answer_text() {
        let data = r#"{"candidates":[{"content":{"parts":[{"text":"thinking","thought":true},{"text":"answer"}]}}]}"#;
        assert_eq!(parse_chunk(data).unwrap().text, "answer");
    }

    #[test]
    fn usage_only_chunk_is_empty() {
        let data = r#"{"usageMetadata":{"promptTokenCount":10,"totalTokenCount":12}}"#;
        assert_eq!(parse_chunk(data).unwrap(), StreamChunk::default());
    }

    #[test]
    fn malformed_chunk_is_an_error() {
        assert!(matches!(
            parse_chunk("{not json"),
            Err(ProviderError::MalformedChunk(_))
        ));
    }

    #[test]
    fn in_stream_error_object() {
        let data = r#"{"error":{"code":503,"message":"The model is overloaded.","status":"UNAVAILABLE"}}"#;
        match parse_chunk(data) {
            Err(ProviderError::ApiError {
                status_code,
                message,
            }) => {
                assert_eq!(status_code, 503);
                assert_eq!(message, "The model is overloaded.");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn http_error_mapping() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_http_error(StatusCode::BAD_REQUEST, body, None, "m"),
            ProviderError::ApiError { status_code: 400, ref message } if message == "API key not valid."
        ));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, "", Some(30), "m"),
            ProviderError::RateLimited { retry_after_secs: 30 }
        ));
        assert!(matches!(
            map_http_error(StatusCode::TOO_MANY_REQUESTS, "", None, "m"),
            ProviderError::RateLimited { retry_after_secs: 5 }
        ));
        assert!(matches!(
            map_http_error(StatusCode::FORBIDDEN, "denied", None, "m"),
            ProviderError::AuthenticationFailed(ref m) if m == "denied"
        ));
        assert!(matches!(
            map_http_error(StatusCode::NOT_FOUND, "", None, "gemini-9"),
            ProviderError::ModelNotFound(ref m) if m == "gemini-9"
        ));
    }
}
