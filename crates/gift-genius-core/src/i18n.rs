//! Static translation table: UI strings and the occasion/budget option sets
//! for each supported locale.

use serde::{Deserialize, Serialize};

use crate::error::{GiftError, Result};

/// Supported interface and output languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Indonesian.
    #[default]
    Id,
    /// English.
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Id, Locale::En];

    pub fn code(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::En => "en",
        }
    }

    pub fn translations(self) -> &'static Translations {
        match self {
            Self::Id => &ID,
            Self::En => &EN,
        }
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Locale {
    type Err = GiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "id" => Ok(Self::Id),
            "en" => Ok(Self::En),
            other => Err(GiftError::InvalidInput(format!(
                "unknown locale '{other}' (expected 'id' or 'en')"
            ))),
        }
    }
}

/// UI strings for one locale.
#[derive(Debug)]
pub struct Translations {
    pub title: &'static str,
    pub results_title: &'static str,
    pub history_title: &'static str,
    pub history_empty: &'static str,
    pub saved_title: &'static str,
    pub saved_empty: &'static str,
    pub save_for_later: &'static str,
    pub remove_from_saved: &'static str,
    pub delete_history: &'static str,
    pub btn_search_google: &'static str,
    pub btn_search_shop: &'static str,
    pub greeting_title: &'static str,
    pub photo_placeholder: &'static str,
    pub error_generic: &'static str,
    pub greeting_apology: &'static str,
}

static ID: Translations = Translations {
    title: "Gift Genius",
    results_title: "Temuan Ajaib",
    history_title: "Kapsul Waktu",
    history_empty: "Belum ada sihir yang dirapal.",
    saved_title: "Tersimpan",
    saved_empty: "Belum ada kado yang disimpan.",
    save_for_later: "Simpan untuk nanti",
    remove_from_saved: "Hapus dari tersimpan",
    delete_history: "Hapus dari riwayat",
    btn_search_google: "Google",
    btn_search_shop: "Shopee",
    greeting_title: "Pesan Kartu Ucapan",
    photo_placeholder: "(dari foto)",
    error_generic: "Roh-roh sedang mendung. Silakan coba lagi.",
    greeting_apology: "Maaf, pena ajaib sedang macet. Coba lagi sebentar lagi ya.",
};

static EN: Translations = Translations {
    title: "Gift Genius",
    results_title: "Magical Findings",
    history_title: "Time Capsule",
    history_empty: "No magic spells cast yet.",
    saved_title: "Saved",
    saved_empty: "No saved gifts yet.",
    save_for_later: "Save for later",
    remove_from_saved: "Remove from saved",
    delete_history: "Remove from history",
    btn_search_google: "Google",
    btn_search_shop: "Amazon",
    greeting_title: "Greeting Card Message",
    photo_placeholder: "(from photo)",
    error_generic: "The spirits are cloudy. Please try again.",
    greeting_apology: "Sorry, the magic quill is stuck. Please try again in a moment.",
};

/// Occasion option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Occasion {
    #[default]
    Birthday,
    Anniversary,
    Apology,
    CheerUp,
    JustBecause,
    Housewarming,
    Graduation,
    Christmas,
    Eid,
}

impl Occasion {
    pub const ALL: [Occasion; 9] = [
        Occasion::Birthday,
        Occasion::Anniversary,
        Occasion::Apology,
        Occasion::CheerUp,
        Occasion::JustBecause,
        Occasion::Housewarming,
        Occasion::Graduation,
        Occasion::Christmas,
        Occasion::Eid,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Birthday => "birthday",
            Self::Anniversary => "anniversary",
            Self::Apology => "apology",
            Self::CheerUp => "cheerUp",
            Self::JustBecause => "justBecause",
            Self::Housewarming => "housewarming",
            Self::Graduation => "graduation",
            Self::Christmas => "christmas",
            Self::Eid => "eid",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Id, Self::Birthday) => "Ulang Tahun 🎂",
            (Locale::Id, Self::Anniversary) => "Anniversary 💍",
            (Locale::Id, Self::Apology) => "Permintaan Maaf 🥺",
            (Locale::Id, Self::CheerUp) => "Menghibur 🌻",
            (Locale::Id, Self::JustBecause) => "Hanya Karena ✨",
            (Locale::Id, Self::Housewarming) => "Syukuran Rumah 🏡",
            (Locale::Id, Self::Graduation) => "Kelulusan 🎓",
            (Locale::Id, Self::Christmas) => "Natal 🎄",
            (Locale::Id, Self::Eid) => "Idul Fitri 🕌",
            (Locale::En, Self::Birthday) => "Birthday 🎂",
            (Locale::En, Self::Anniversary) => "Anniversary 💍",
            (Locale::En, Self::Apology) => "Apology 🥺",
            (Locale::En, Self::CheerUp) => "Cheer Up 🌻",
            (Locale::En, Self::JustBecause) => "Just Because ✨",
            (Locale::En, Self::Housewarming) => "Housewarming 🏡",
            (Locale::En, Self::Graduation) => "Graduation 🎓",
            (Locale::En, Self::Christmas) => "Christmas 🎄",
            (Locale::En, Self::Eid) => "Eid Mubarak 🕌",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|o| o.key().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| {
                GiftError::InvalidInput(format!(
                    "unknown occasion '{key}', valid: {}",
                    Self::ALL.map(Self::key).join(", ")
                ))
            })
    }
}

/// Budget option set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Budget {
    Under100,
    #[default]
    Range100To500,
    Range500To1m,
    Sultan,
}

impl Budget {
    pub const ALL: [Budget; 4] = [
        Budget::Under100,
        Budget::Range100To500,
        Budget::Range500To1m,
        Budget::Sultan,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Under100 => "under100",
            Self::Range100To500 => "range100_500",
            Self::Range500To1m => "range500_1m",
            Self::Sultan => "sultan",
        }
    }

    pub fn label(self, locale: Locale) -> &'static str {
        match (locale, self) {
            (Locale::Id, Self::Under100) => "Di bawah Rp 100rb",
            (Locale::Id, Self::Range100To500) => "Rp 100rb - 500rb",
            (Locale::Id, Self::Range500To1m) => "Rp 500rb - 1 Juta",
            (Locale::Id, Self::Sultan) => "Mode Sultan 👑",
            (Locale::En, Self::Under100) => "Under $10",
            (Locale::En, Self::Range100To500) => "$10 - $50",
            (Locale::En, Self::Range500To1m) => "$50 - $100",
            (Locale::En, Self::Sultan) => "Sultan Mode 👑",
        }
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|b| b.key().eq_ignore_ascii_case(key.trim()))
            .ok_or_else(|| {
                GiftError::InvalidInput(format!(
                    "unknown budget '{key}', valid: {}",
                    Self::ALL.map(Self::key).join(", ")
                ))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_parse() {
        assert_eq!("id".parse::<Locale>().unwrap(), Locale::Id);
        assert_eq!(" EN ".parse::<Locale>().unwrap(), Locale::En);
        assert!("fr".parse::<Locale>().is_err());
    }

    #[test]
    fn test_locale_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
        let parsed: Locale = serde_json::from_str("\"id\"").unwrap();
        assert_eq!(parsed, Locale::Id);
    }

    #[test]
    fn test_occasion_keys_roundtrip() {
        for occasion in Occasion::ALL {
            assert_eq!(Occasion::from_key(occasion.key()).unwrap(), occasion);
        }
        assert_eq!(Occasion::from_key("CHEERUP").unwrap(), Occasion::CheerUp);
    }

    #[test]
    fn test_unknown_occasion_lists_valid_keys() {
        let err = Occasion::from_key("wedding").unwrap_err().to_string();
        assert!(err.contains("wedding"));
        assert!(err.contains("birthday"));
    }

    #[test]
    fn test_budget_labels_differ_per_locale() {
        for budget in Budget::ALL {
            assert_ne!(budget.label(Locale::Id), budget.label(Locale::En));
        }
        assert_eq!(Budget::from_key("sultan").unwrap(), Budget::Sultan);
    }

    #[test]
    fn test_shop_button_follows_locale() {
        assert_eq!(Locale::Id.translations().btn_search_shop, "Shopee");
        assert_eq!(Locale::En.translations().btn_search_shop, "Amazon");
    }
}
