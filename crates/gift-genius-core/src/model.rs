use std::path::Path;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::error::{GiftError, Result};
use crate::i18n::{Budget, Locale, Occasion};

/// Number of gift ideas requested from, and required of, every generation.
pub const RECOMMENDATION_COUNT: usize = 3;

/// One gift idea as returned by the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub name: String,
    pub reason: String,
    pub price_range: String,
}

impl Recommendation {
    pub fn new(
        name: impl Into<String>,
        reason: impl Into<String>,
        price_range: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            price_range: price_range.into(),
        }
    }

    /// Identity used by the saved list: same `name` and same `reason`.
    /// `price_range` is not part of it.
    pub fn same_gift(&self, other: &Recommendation) -> bool {
        self.name == other.name && self.reason == other.reason
    }

    /// A stored gift needs a non-blank `name` and `price_range`.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(GiftError::InvalidInput("gift name is empty".into()));
        }
        if self.price_range.trim().is_empty() {
            return Err(GiftError::InvalidInput(format!(
                "gift {:?} has no price range",
                self.name
            )));
        }
        Ok(())
    }
}

/// An image attached to a request, sent inline to the model.
#[derive(Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl std::fmt::Debug for ImagePayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImagePayload")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl ImagePayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read an image file, inferring the MIME type from its extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        let mime_type = match ext.as_str() {
            "png" => "image/png",
            "jpg" | "jpeg" => "image/jpeg",
            "webp" => "image/webp",
            "gif" => "image/gif",
            "heic" => "image/heic",
            "heif" => "image/heif",
            _ => {
                return Err(GiftError::InvalidInput(format!(
                    "unsupported image type: {}",
                    path.display()
                )));
            }
        };
        let bytes = std::fs::read(path).map_err(|e| {
            GiftError::InvalidInput(format!("failed to read image {}: {e}", path.display()))
        })?;
        Ok(Self::new(mime_type, bytes))
    }

    /// Parse a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let rest = data_url
            .strip_prefix("data:")
            .ok_or_else(|| GiftError::InvalidInput("not a data URL".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| GiftError::InvalidInput("data URL has no payload".into()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| GiftError::InvalidInput("data URL is not base64-encoded".into()))?;
        if mime_type.is_empty() {
            return Err(GiftError::InvalidInput("data URL has no MIME type".into()));
        }
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| GiftError::InvalidInput(format!("invalid base64 image data: {e}")))?;
        Ok(Self::new(mime_type, bytes))
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.bytes)
    }
}

/// A request for gift ideas about one person. Built fresh per submit.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRequest {
    pub description: String,
    pub image: Option<ImagePayload>,
    pub occasion_label: String,
    pub budget_label: String,
    pub locale: Locale,
    pub zodiac_sign: Option<String>,
    pub music_vibe: Option<String>,
}

impl RecommendationRequest {
    pub fn new(
        description: impl Into<String>,
        occasion_label: impl Into<String>,
        budget_label: impl Into<String>,
        locale: Locale,
    ) -> Self {
        Self {
            description: description.into(),
            image: None,
            occasion_label: occasion_label.into(),
            budget_label: budget_label.into(),
            locale,
            zodiac_sign: None,
            music_vibe: None,
        }
    }

    /// Build a request from the option sets, using the labels of `locale`.
    pub fn from_options(
        description: impl Into<String>,
        occasion: Occasion,
        budget: Budget,
        locale: Locale,
    ) -> Self {
        Self::new(
            description,
            occasion.label(locale),
            budget.label(locale),
            locale,
        )
    }

    pub fn with_image(mut self, image: ImagePayload) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_zodiac(mut self, sign: impl Into<String>) -> Self {
        self.zodiac_sign = Some(sign.into());
        self
    }

    pub fn with_music_vibe(mut self, vibe: impl Into<String>) -> Self {
        self.music_vibe = Some(vibe.into());
        self
    }

    /// True when there is something to describe: text or a photo.
    pub fn has_subject(&self) -> bool {
        !self.description.trim().is_empty() || self.image.is_some()
    }
}

/// A request to fuse two free-text elements into real products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlchemyRequest {
    pub element_a: String,
    pub element_b: String,
    pub locale: Locale,
}

impl AlchemyRequest {
    pub fn new(element_a: impl Into<String>, element_b: impl Into<String>, locale: Locale) -> Self {
        Self {
            element_a: element_a.into(),
            element_b: element_b.into(),
            locale,
        }
    }
}

/// One persisted past request and its results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "timestamp")]
    pub created_at_millis: i64,
    #[serde(rename = "description")]
    pub summary: String,
    pub recommendations: Vec<Recommendation>,
}
