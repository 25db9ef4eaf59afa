use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::{resolve_api_key, LlmConfig, DEFAULT_GEMINI_BASE_URL};
use crate::error::{GiftError, Result};
use crate::model::ImagePayload;
use crate::prompt::Prompt;

/// One call to the generative model.
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    pub prompt: &'a Prompt,
    pub image: Option<&'a ImagePayload>,
}

impl<'a> GenerationRequest<'a> {
    pub fn text(prompt: &'a Prompt) -> Self {
        Self {
            prompt,
            image: None,
        }
    }

    pub fn with_image(prompt: &'a Prompt, image: Option<&'a ImagePayload>) -> Self {
        Self { prompt, image }
    }
}

/// A hosted text/vision model.
///
/// Implementations make exactly one attempt per call. `Ok(None)` means the
/// backend answered but produced no text.
pub trait GenerativeBackend: Send + Sync {
    fn generate(
        &self,
        request: &GenerationRequest<'_>,
    ) -> impl Future<Output = Result<Option<String>>> + Send;
}

/// Google Gemini over the `generateContent` REST endpoint.
pub struct GeminiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl std::fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

impl GeminiBackend {
    pub fn new(api_key: String, model: String, base_url: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url: base_url.unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
        }
    }

    /// Create a backend from configuration. Fails when no API key is found.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = resolve_api_key(config)?;
        Ok(Self::new(
            api_key,
            config.model.clone(),
            config.base_url.clone(),
        ))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model,
        )
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    Text(&'a str),
    InlineData(InlineData),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

fn build_body<'a>(request: &GenerationRequest<'a>) -> GenerateContentRequest<'a> {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = request.image {
        parts.push(Part::InlineData(InlineData {
            mime_type: image.mime_type.clone(),
            data: image.to_base64(),
        }));
    }
    parts.push(Part::Text(&request.prompt.text));

    GenerateContentRequest {
        contents: vec![Content { parts }],
        system_instruction: Content {
            parts: vec![Part::Text(request.prompt.system_instruction)],
        },
        generation_config: request.prompt.schema.as_ref().map(|schema| GenerationConfig {
            response_mime_type: "application/json",
            response_schema: schema.to_json(),
        }),
    }
}

/// Concatenate the text parts of the first candidate. `None` when there is
/// no candidate or every part is empty.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let text: String = response
        .candidates
        .into_iter()
        .next()?
        .content?
        .parts
        .into_iter()
        .filter_map(|p| p.text)
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

impl GenerativeBackend for GeminiBackend {
    /// Gemini: POST {base_url}/v1beta/models/{model}:generateContent
    async fn generate(&self, request: &GenerationRequest<'_>) -> Result<Option<String>> {
        let body = build_body(request);
        tracing::debug!(
            model = %self.model,
            image = request.image.is_some(),
            structured = request.prompt.schema.is_some(),
            "sending Gemini generateContent request"
        );

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(GiftError::Backend(format!("Gemini error {status}: {text}")));
        }

        let raw = resp.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| GiftError::Backend(format!("Gemini response parse error: {e}")))?;

        Ok(extract_text(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::model::{Recommendation, RecommendationRequest};
    use crate::prompt::{build_greeting_prompt, build_recommendation_prompt};
    use mockito::Matcher;
    use serde_json::json;

    fn backend(server: &mockito::Server) -> GeminiBackend {
        GeminiBackend::new("test-key".into(), "test-model".into(), Some(server.url()))
    }

    fn gift_prompt() -> Prompt {
        build_recommendation_prompt(&RecommendationRequest::new(
            "Dad who gardens",
            "Birthday",
            "$10 - $50",
            Locale::En,
        ))
    }

    fn text_response(text: &str) -> String {
        json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
            .to_string()
    }

    #[test]
    fn test_body_with_schema_and_image() {
        let prompt = gift_prompt();
        let image = ImagePayload::new("image/png", vec![1, 2, 3]);
        let body = serde_json::to_value(build_body(&GenerationRequest::with_image(
            &prompt,
            Some(&image),
        )))
        .unwrap();

        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "AQID");
        assert_eq!(parts[1]["text"], prompt.text.as_str());
        assert_eq!(
            body["systemInstruction"]["parts"][0]["text"],
            prompt.system_instruction
        );
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn test_body_without_schema_omits_generation_config() {
        let prompt = build_greeting_prompt(
            &Recommendation::new("Mug", "r", "p"),
            "friend",
            "Birthday",
            Locale::En,
        );
        let body = serde_json::to_value(build_body(&GenerationRequest::text(&prompt))).unwrap();
        assert!(body.get("generationConfig").is_none());
        assert_eq!(body["contents"][0]["parts"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_extract_text_joins_parts() {
        let resp: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[{\"a\""}, {"text": ":1}]"}]}}]
        }))
        .unwrap();
        assert_eq!(extract_text(resp).as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn test_extract_text_none_when_blocked() {
        let resp: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(extract_text(resp).is_none());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let backend = GeminiBackend::new("secret".into(), "m".into(), None);
        let debug = format!("{backend:?}");
        assert!(!debug.contains("secret"));
        assert!(debug.contains("REDACTED"));
        assert!(debug.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn test_from_config_with_key() {
        let config = LlmConfig {
            api_key: Some("k".into()),
            base_url: Some("http://localhost:1/".into()),
            ..Default::default()
        };
        let backend = GeminiBackend::from_config(&config).unwrap();
        assert_eq!(backend.model(), "gemini-2.5-flash");
        assert_eq!(
            backend.endpoint(),
            "http://localhost:1/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[tokio::test]
    async fn test_generate_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .match_header("x-goog-api-key", "test-key")
            .match_body(Matcher::PartialJson(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(text_response("[]"))
            .create_async()
            .await;

        let prompt = gift_prompt();
        let text = backend(&server)
            .generate(&GenerationRequest::text(&prompt))
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("[]"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_non_success_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(503)
            .with_body("overloaded")
            .create_async()
            .await;

        let prompt = gift_prompt();
        let err = backend(&server)
            .generate(&GenerationRequest::text(&prompt))
            .await
            .unwrap_err();
        assert!(matches!(err, GiftError::Backend(_)));
        assert!(err.to_string().contains("503"));
    }

    #[tokio::test]
    async fn test_generate_malformed_envelope() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let prompt = gift_prompt();
        let err = backend(&server)
            .generate(&GenerationRequest::text(&prompt))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("parse error"));
    }

    #[tokio::test]
    async fn test_generate_empty_candidates_is_none() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/test-model:generateContent")
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let prompt = gift_prompt();
        let text = backend(&server)
            .generate(&GenerationRequest::text(&prompt))
            .await
            .unwrap();
        assert!(text.is_none());
    }
}
