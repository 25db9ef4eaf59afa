//! Explicit application state, passed to whoever renders or mutates it.

use crate::i18n::Locale;
use crate::model::{HistoryEntry, Recommendation};
use crate::preferences::Theme;

/// Progress of the current request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    locale: Locale,
    theme: Theme,
    status: LoadingState,
    results: Vec<Recommendation>,
    results_summary: Option<String>,
    error_message: Option<String>,
}

impl AppState {
    pub fn new(locale: Locale, theme: Theme) -> Self {
        Self {
            locale,
            theme,
            ..Default::default()
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) {
        self.locale = locale;
        if self.error_message.is_some() {
            self.error_message = Some(locale.translations().error_generic.to_string());
        }
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.theme = self.theme.toggled();
        self.theme
    }

    pub fn status(&self) -> LoadingState {
        self.status
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadingState::Loading
    }

    /// Gift ideas currently on screen.
    pub fn results(&self) -> &[Recommendation] {
        &self.results
    }

    /// History-style summary of what the current results answer.
    pub fn results_summary(&self) -> Option<&str> {
        self.results_summary.as_deref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn begin_request(&mut self) {
        self.status = LoadingState::Loading;
        self.error_message = None;
    }

    pub fn finish_success(&mut self, results: Vec<Recommendation>, summary: String) {
        self.status = LoadingState::Success;
        self.results = results;
        self.results_summary = Some(summary);
        self.error_message = None;
    }

    /// Mark the request failed. Results from earlier requests stay as they are.
    pub fn finish_error(&mut self) {
        self.status = LoadingState::Error;
        self.error_message = Some(self.locale.translations().error_generic.to_string());
    }

    /// Show a past history entry as the current results.
    pub fn show_entry(&mut self, entry: &HistoryEntry) {
        self.finish_success(entry.recommendations.clone(), entry.summary.clone());
    }

    /// Back to an empty idle screen.
    pub fn reset(&mut self) {
        self.status = LoadingState::Idle;
        self.results.clear();
        self.results_summary = None;
        self.error_message = None;
    }
}
