//! Recommendation client: one schema-constrained generation, parsed into
//! exactly three gift records or a [`GiftError::GenerationFailed`].

use crate::error::{GiftError, Result};
use crate::llm::{GenerationRequest, GenerativeBackend};
use crate::model::{ImagePayload, Recommendation, RECOMMENDATION_COUNT};
use crate::prompt::Prompt;

pub struct RecommendationClient<'b, B: GenerativeBackend> {
    backend: &'b B,
}

impl<'b, B: GenerativeBackend> RecommendationClient<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Send `prompt` (plus an optional inline image) and return the parsed
    /// gift list in the order the model produced it.
    ///
    /// Makes a single attempt. Every failure, including transport errors,
    /// an empty answer, and malformed JSON, becomes `GenerationFailed`; no
    /// partial result is ever returned.
    pub async fn fetch(
        &self,
        prompt: &Prompt,
        image: Option<&ImagePayload>,
    ) -> Result<Vec<Recommendation>> {
        let request = GenerationRequest::with_image(prompt, image);
        let text = match self.backend.generate(&request).await {
            Ok(Some(text)) => text,
            Ok(None) => {
                return Err(GiftError::GenerationFailed(
                    "no data returned from model".into(),
                ))
            }
            Err(e) => {
                tracing::warn!(error = %e, "recommendation request failed");
                return Err(GiftError::GenerationFailed(e.to_string()));
            }
        };

        let recommendations = parse_recommendations(&text)?;
        tracing::info!(count = recommendations.len(), "received gift recommendations");
        Ok(recommendations)
    }
}

/// Parse the model's JSON text into gift records.
///
/// The payload must be an array of exactly [`RECOMMENDATION_COUNT`] objects
/// with string `name`, `reason` and `price_range`, where `name` and
/// `price_range` are non-empty. Nothing is repaired or reordered.
pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>> {
    if text.trim().is_empty() {
        return Err(GiftError::GenerationFailed(
            "no data returned from model".into(),
        ));
    }

    let recommendations: Vec<Recommendation> = serde_json::from_str(text)
        .map_err(|e| GiftError::GenerationFailed(format!("invalid JSON from model: {e}")))?;

    if recommendations.len() != RECOMMENDATION_COUNT {
        return Err(GiftError::GenerationFailed(format!(
            "expected {RECOMMENDATION_COUNT} recommendations, got {}",
            recommendations.len()
        )));
    }

    for (i, rec) in recommendations.iter().enumerate() {
        rec.validate()
            .map_err(|e| GiftError::GenerationFailed(format!("recommendation {i}: {e}")))?;
    }

    Ok(recommendations)
}
