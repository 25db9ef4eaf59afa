//! Greeting card messages. Unlike recommendations this never fails: any
//! backend problem turns into the locale's apology text.

use crate::i18n::Locale;
use crate::llm::{GenerationRequest, GenerativeBackend};
use crate::model::Recommendation;
use crate::prompt::build_greeting_prompt;

const QUOTE_CHARS: &[char] = &['"', '\'', '“', '”', '‘', '’', '«', '»'];

pub struct GreetingClient<'b, B: GenerativeBackend> {
    backend: &'b B,
}

impl<'b, B: GenerativeBackend> GreetingClient<'b, B> {
    pub fn new(backend: &'b B) -> Self {
        Self { backend }
    }

    /// Ask for a short greeting to go with `gift`. Each call hits the
    /// backend again, so repeated calls can return different messages.
    pub async fn compose(
        &self,
        gift: &Recommendation,
        recipient_description: &str,
        occasion_label: &str,
        locale: Locale,
    ) -> String {
        let prompt = build_greeting_prompt(gift, recipient_description, occasion_label, locale);
        match self.backend.generate(&GenerationRequest::text(&prompt)).await {
            Ok(Some(text)) => match clean_greeting(&text) {
                Some(message) => message,
                None => {
                    tracing::warn!("greeting came back blank, using apology");
                    apology(locale).to_string()
                }
            },
            Ok(None) => {
                tracing::warn!("greeting request returned no text, using apology");
                apology(locale).to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "greeting request failed, using apology");
                apology(locale).to_string()
            }
        }
    }
}

/// Fixed fallback shown when a greeting cannot be generated.
pub fn apology(locale: Locale) -> &'static str {
    locale.translations().greeting_apology
}

/// Trim whitespace and any surrounding quote characters.
fn clean_greeting(raw: &str) -> Option<String> {
    let cleaned = raw.trim().trim_matches(QUOTE_CHARS).trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}
