//! Shared helpers for gift-genius-core integration tests.

#![allow(dead_code)]

use gift_genius_core::app::GiftGenius;
use gift_genius_core::llm::GeminiBackend;
use gift_genius_core::storage::FileStore;
use serde_json::json;

pub const TEST_MODEL: &str = "gemini-test";
pub const TEST_KEY: &str = "test-key";

pub fn generate_path() -> String {
    format!("/v1beta/models/{TEST_MODEL}:generateContent")
}

/// A Gemini `generateContent` envelope carrying `text` as its only part.
pub fn gemini_envelope(text: &str) -> String {
    json!({
        "candidates": [{
            "content": {"parts": [{"text": text}], "role": "model"},
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

pub fn three_gifts_json() -> String {
    json!([
        {"name": "Kalung Rasi Bintang", "reason": "Dia suka astrologi.", "price_range": "Rp 80rb - 100rb"},
        {"name": "Botol Cold Brew", "reason": "Untuk kebiasaan es kopinya.", "price_range": "Rp 60rb - 90rb"},
        {"name": "Kartu Tarot", "reason": "Ritual santai.", "price_range": "Rp 70rb - 95rb"}
    ])
    .to_string()
}

/// App wired to a mock Gemini server and a file store in `dir`.
pub fn test_app(server: &mockito::Server, dir: &std::path::Path) -> GiftGenius<GeminiBackend, FileStore> {
    let backend = GeminiBackend::new(TEST_KEY.into(), TEST_MODEL.into(), Some(server.url()));
    GiftGenius::new(backend, FileStore::new(dir.to_path_buf()))
}
