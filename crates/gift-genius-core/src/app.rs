//! The service a front end talks to: builds prompts, calls the model, keeps
//! [`AppState`] and the stored history in step.

use crate::error::{GiftError, Result};
use crate::greeting::GreetingClient;
use crate::history::{summarize_alchemy, summarize_request, HistoryStore};
use crate::i18n::Locale;
use crate::llm::GenerativeBackend;
use crate::model::{
    AlchemyRequest, HistoryEntry, ImagePayload, Recommendation, RecommendationRequest,
};
use crate::preferences::Preferences;
use crate::prompt::{build_alchemy_prompt, build_recommendation_prompt, Prompt};
use crate::recommend::RecommendationClient;
use crate::saved::SavedItemsStore;
use crate::state::AppState;
use crate::storage::KeyValueStore;

pub struct GiftGenius<B: GenerativeBackend, S: KeyValueStore> {
    backend: B,
    store: S,
}

impl<B: GenerativeBackend, S: KeyValueStore> GiftGenius<B, S> {
    pub fn new(backend: B, store: S) -> Self {
        Self { backend, store }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn history(&self) -> HistoryStore<&S> {
        HistoryStore::new(&self.store)
    }

    pub fn saved(&self) -> SavedItemsStore<&S> {
        SavedItemsStore::new(&self.store)
    }

    pub fn preferences(&self) -> Preferences<&S> {
        Preferences::new(&self.store)
    }

    /// A fresh state seeded from stored preferences.
    pub fn initial_state(&self) -> AppState {
        let prefs = self.preferences();
        AppState::new(prefs.locale(), prefs.theme())
    }

    /// Ask for gift ideas for one person.
    ///
    /// Rejects a request with neither text nor photo before calling the
    /// model. On success the results replace the current ones and are
    /// recorded in history; on failure the current results are untouched.
    pub async fn suggest(
        &self,
        state: &mut AppState,
        request: &RecommendationRequest,
    ) -> Result<Vec<Recommendation>> {
        if !request.has_subject() {
            return Err(GiftError::InvalidInput(
                "describe the person or attach a photo".into(),
            ));
        }
        let prompt = build_recommendation_prompt(request);
        self.run(state, &prompt, request.image.as_ref(), summarize_request(request))
            .await
    }

    /// Ask for real products fusing two elements.
    pub async fn alchemy(
        &self,
        state: &mut AppState,
        request: &AlchemyRequest,
    ) -> Result<Vec<Recommendation>> {
        if request.element_a.trim().is_empty() || request.element_b.trim().is_empty() {
            return Err(GiftError::InvalidInput("both elements are required".into()));
        }
        let prompt = build_alchemy_prompt(request);
        self.run(state, &prompt, None, summarize_alchemy(request))
            .await
    }

    async fn run(
        &self,
        state: &mut AppState,
        prompt: &Prompt,
        image: Option<&ImagePayload>,
        summary: String,
    ) -> Result<Vec<Recommendation>> {
        state.begin_request();
        let recommendations = match RecommendationClient::new(&self.backend)
            .fetch(prompt, image)
            .await
        {
            Ok(recs) => recs,
            Err(e) => {
                state.finish_error();
                return Err(e);
            }
        };

        state.finish_success(recommendations.clone(), summary.clone());
        if let Err(e) = self.history().add(summary, recommendations.clone()) {
            tracing::warn!(error = %e, "failed to record history entry");
        }
        Ok(recommendations)
    }

    /// Greeting card text for one gift. Never fails.
    pub async fn greet(
        &self,
        gift: &Recommendation,
        recipient_description: &str,
        occasion_label: &str,
        locale: Locale,
    ) -> String {
        GreetingClient::new(&self.backend)
            .compose(gift, recipient_description, occasion_label, locale)
            .await
    }

    /// Put a past history entry back on screen.
    pub fn load_history_entry(&self, state: &mut AppState, id: &str) -> Option<HistoryEntry> {
        let entry = self.history().get(id)?;
        state.show_entry(&entry);
        Some(entry)
    }

    pub fn toggle_saved(&self, gift: &Recommendation) -> Result<bool> {
        self.saved().toggle(gift)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{Budget, Occasion};
    use crate::recommend::tests::{ScriptedBackend, THREE_GIFTS};
    use crate::state::LoadingState;
    use crate::storage::MemoryStore;

    fn sister() -> RecommendationRequest {
        RecommendationRequest::new(
            "My sister, 24, loves astrology and iced coffee",
            "Birthday",
            "Under Rp100rb",
            Locale::Id,
        )
    }

    #[tokio::test]
    async fn test_suggest_updates_state_and_history() {
        let app = GiftGenius::new(
            ScriptedBackend::answering(vec![Ok(Some(THREE_GIFTS.into()))]),
            MemoryStore::new(),
        );
        let mut state = app.initial_state();
        let recs = app.suggest(&mut state, &sister()).await.unwrap();

        assert_eq!(recs.len(), 3);
        assert_eq!(state.status(), LoadingState::Success);
        assert_eq!(state.results(), recs.as_slice());

        let history = app.history().load();
        assert_eq!(history.len(), 1);
        assert!(history[0].summary.contains("Birthday"));
        assert!(history[0].summary.contains("My sister, 24"));
        assert_eq!(history[0].recommendations, recs);
    }

    #[tokio::test]
    async fn test_failed_suggest_keeps_results_and_history() {
        let app = GiftGenius::new(
            ScriptedBackend::answering(vec![Ok(Some(THREE_GIFTS.into())), Ok(None)]),
            MemoryStore::new(),
        );
        let mut state = app.initial_state();
        let first = app.suggest(&mut state, &sister()).await.unwrap();

        let err = app.suggest(&mut state, &sister()).await.unwrap_err();
        assert!(err.is_generation_failure());
        assert_eq!(state.status(), LoadingState::Error);
        assert_eq!(state.results(), first.as_slice());
        assert!(state.error_message().is_some());
        assert_eq!(app.history().load().len(), 1);
    }

    #[tokio::test]
    async fn test_suggest_without_subject_makes_no_call() {
        let app = GiftGenius::new(ScriptedBackend::default(), MemoryStore::new());
        let mut state = app.initial_state();
        let request = RecommendationRequest::from_options(
            "  ",
            Occasion::Birthday,
            Budget::Under100,
            Locale::En,
        );
        let err = app.suggest(&mut state, &request).await.unwrap_err();
        assert!(matches!(err, GiftError::InvalidInput(_)));
        assert_eq!(app.backend().calls(), 0);
        assert_eq!(state.status(), LoadingState::Idle);
    }

    #[tokio::test]
    async fn test_photo_only_suggest_is_allowed() {
        let app = GiftGenius::new(
            ScriptedBackend::answering(vec![Ok(Some(THREE_GIFTS.into()))]),
            MemoryStore::new(),
        );
        let mut state = app.initial_state();
        let request = RecommendationRequest::new("", "Birthday", "$10", Locale::En)
            .with_image(ImagePayload::new("image/jpeg", vec![1, 2]));
        app.suggest(&mut state, &request).await.unwrap();
        assert!(app.backend().seen.lock().unwrap()[0].1);
        assert!(app.history().load()[0].summary.contains("(from photo)"));
    }

    #[tokio::test]
    async fn test_alchemy_records_history() {
        let app = GiftGenius::new(
            ScriptedBackend::answering(vec![Ok(Some(THREE_GIFTS.into()))]),
            MemoryStore::new(),
        );
        let mut state = app.initial_state();
        let request = AlchemyRequest::new("matcha", "cats", Locale::En);
        app.alchemy(&mut state, &request).await.unwrap();
        assert_eq!(app.history().load()[0].summary, "matcha + cats");
    }

    #[tokio::test]
    async fn test_alchemy_requires_both_elements() {
        let app = GiftGenius::new(ScriptedBackend::default(), MemoryStore::new());
        let mut state = app.initial_state();
        let request = AlchemyRequest::new("matcha", " ", Locale::En);
        assert!(app.alchemy(&mut state, &request).await.is_err());
        assert_eq!(app.backend().calls(), 0);
    }

    #[tokio::test]
    async fn test_load_history_entry_and_toggle_saved() {
        let app = GiftGenius::new(
            ScriptedBackend::answering(vec![Ok(Some(THREE_GIFTS.into()))]),
            MemoryStore::new(),
        );
        let mut state = app.initial_state();
        let recs = app.suggest(&mut state, &sister()).await.unwrap();
        let id = app.history().load()[0].id.clone();

        let mut fresh = app.initial_state();
        let entry = app.load_history_entry(&mut fresh, &id).unwrap();
        assert_eq!(fresh.results(), entry.recommendations.as_slice());
        assert!(app.load_history_entry(&mut fresh, "nope").is_none());

        assert!(app.toggle_saved(&recs[0]).unwrap());
        assert!(app.saved().is_saved(&recs[0]));
    }

    #[tokio::test]
    async fn test_initial_state_reads_preferences() {
        let app = GiftGenius::new(ScriptedBackend::default(), MemoryStore::new());
        app.preferences().set_locale(Locale::En).unwrap();
        assert_eq!(app.initial_state().locale(), Locale::En);
    }
}
