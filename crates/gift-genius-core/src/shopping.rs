//! Outbound search links for a gift name.

use url::Url;

use crate::error::{GiftError, Result};
use crate::i18n::Locale;

const GOOGLE_SEARCH: &str = "https://www.google.com/search";
const SHOPEE_SEARCH: &str = "https://shopee.co.id/search";
const AMAZON_SEARCH: &str = "https://www.amazon.com/s";

/// General web search for `name`.
pub fn web_search_url(name: &str) -> Result<Url> {
    with_query(GOOGLE_SEARCH, "q", name)
}

/// Marketplace search for `name`: Shopee for Indonesian, Amazon for English.
pub fn shop_search_url(name: &str, locale: Locale) -> Result<Url> {
    match locale {
        Locale::Id => with_query(SHOPEE_SEARCH, "keyword", name),
        Locale::En => with_query(AMAZON_SEARCH, "k", name),
    }
}

fn with_query(base: &str, param: &str, value: &str) -> Result<Url> {
    Url::parse_with_params(base, &[(param, value)])
        .map_err(|e| GiftError::InvalidInput(format!("cannot build search URL: {e}")))
}
