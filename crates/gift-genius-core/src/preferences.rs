use serde::{Deserialize, Serialize};

use crate::error::{GiftError, Result};
use crate::i18n::Locale;
use crate::storage::{KeyValueStore, LOCALE_KEY, THEME_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Dark => Self::Light,
            Self::Light => Self::Dark,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = GiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(GiftError::InvalidInput(format!(
                "unknown theme '{other}' (expected 'dark' or 'light')"
            ))),
        }
    }
}

/// Scalar UI preferences. Missing or unrecognized stored values fall back
/// to the defaults.
pub struct Preferences<S: KeyValueStore> {
    store: S,
}

impl<S: KeyValueStore> Preferences<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn locale(&self) -> Locale {
        self.store
            .get(LOCALE_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_locale(&self, locale: Locale) -> Result<()> {
        self.store.set(LOCALE_KEY, locale.code())
    }

    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<()> {
        self.store.set(THEME_KEY, theme.as_str())
    }
}
