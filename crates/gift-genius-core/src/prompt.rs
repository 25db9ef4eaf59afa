//! Prompt construction for the generative model.
//!
//! Every prompt is built from exactly one locale's template table, so a
//! prompt never mixes Indonesian and English instructions. Building is pure:
//! the same request always yields byte-identical output.

use serde_json::{json, Map, Value};

use crate::i18n::Locale;
use crate::model::{AlchemyRequest, Recommendation, RecommendationRequest, RECOMMENDATION_COUNT};

/// A built instruction ready to send to the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system_instruction: &'static str,
    pub text: String,
    pub schema: Option<OutputSchema>,
}

/// One required string field of a structured output item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub description: &'static str,
}

/// Output constraint: an array of exactly `item_count` objects, each with
/// the listed required string fields in the listed order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub item_count: usize,
    pub fields: Vec<SchemaField>,
}

impl OutputSchema {
    /// The fixed schema for gift lists: 3 × `{name, reason, price_range}`.
    pub fn gift_list() -> Self {
        Self {
            item_count: RECOMMENDATION_COUNT,
            fields: vec![
                SchemaField {
                    name: "name",
                    description: "The specific name of the product or gift idea.",
                },
                SchemaField {
                    name: "reason",
                    description: "An emotional and logical explanation of why this gift fits.",
                },
                SchemaField {
                    name: "price_range",
                    description: "Estimated price range in the currency of the budget.",
                },
            ],
        }
    }

    pub fn field_names(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// Render as a Gemini `responseSchema` object.
    pub fn to_json(&self) -> Value {
        let mut properties = Map::new();
        for field in &self.fields {
            properties.insert(
                field.name.to_string(),
                json!({"type": "STRING", "description": field.description}),
            );
        }
        let names = self.field_names();
        json!({
            "type": "ARRAY",
            "minItems": self.item_count,
            "maxItems": self.item_count,
            "items": {
                "type": "OBJECT",
                "properties": properties,
                "required": names,
                "propertyOrdering": names,
            }
        })
    }
}

/// All instruction text for one locale.
#[derive(Debug)]
pub(crate) struct PromptTemplates {
    recommend_system: &'static str,
    recommend_intro: &'static str,
    description_label: &'static str,
    occasion_label: &'static str,
    budget_label: &'static str,
    photo_hint: &'static str,
    photo_only_hint: &'static str,
    deep_dive_header: &'static str,
    zodiac_label: &'static str,
    music_label: &'static str,
    deep_dive_rule: &'static str,
    recommend_output_rule: &'static str,
    alchemy_system: &'static str,
    alchemy_intro: &'static str,
    element_a_label: &'static str,
    element_b_label: &'static str,
    alchemy_output_rule: &'static str,
    greeting_system: &'static str,
    greeting_intro: &'static str,
    gift_label: &'static str,
    recipient_label: &'static str,
    greeting_output_rule: &'static str,
}

impl PromptTemplates {
    pub(crate) fn for_locale(locale: Locale) -> &'static PromptTemplates {
        match locale {
            Locale::Id => &ID_TEMPLATES,
            Locale::En => &EN_TEMPLATES,
        }
    }

    #[cfg(test)]
    fn fragments(&self) -> Vec<&'static str> {
        vec![
            self.recommend_system,
            self.recommend_intro,
            self.description_label,
            self.occasion_label,
            self.budget_label,
            self.photo_hint,
            self.photo_only_hint,
            self.deep_dive_header,
            self.zodiac_label,
            self.music_label,
            self.deep_dive_rule,
            self.recommend_output_rule,
            self.alchemy_system,
            self.alchemy_intro,
            self.element_a_label,
            self.element_b_label,
            self.alchemy_output_rule,
            self.greeting_system,
            self.greeting_intro,
            self.gift_label,
            self.recipient_label,
            self.greeting_output_rule,
        ]
    }
}

static EN_TEMPLATES: PromptTemplates = PromptTemplates {
    recommend_system: "You are an empathetic and intelligent shopping assistant. Based on the user's description, provide EXACTLY 3 specific gift recommendations (not general categories). Be creative but practical.",
    recommend_intro: "Based on the following description of a person, provide exactly 3 specific gift recommendations.",
    description_label: "Description:",
    occasion_label: "Occasion:",
    budget_label: "Budget:",
    photo_hint: "A photo of the person is attached. Read their aesthetic and aura from it.",
    photo_only_hint: "No written description was given. Rely on the attached photo.",
    deep_dive_header: "Deep dive:",
    zodiac_label: "- Zodiac sign:",
    music_label: "- Music vibe:",
    deep_dive_rule: "Use these to personalize the style of each gift.",
    recommend_output_rule: "Every gift must fit the budget. Write name, reason, and price_range in English, and give price_range as an estimated range in US dollars (e.g. '$15 - $25').",
    alchemy_system: "You are a visionary product alchemist. You fuse two ideas into real products that can be bought today.",
    alchemy_intro: "Fuse the following two elements into exactly 3 real-world products that exist and can be bought, each one a conceptual fusion of both elements.",
    element_a_label: "First element:",
    element_b_label: "Second element:",
    alchemy_output_rule: "Write name, reason, and price_range in English. The reason must explain how the product fuses both elements.",
    greeting_system: "You are a warm and witty greeting card writer.",
    greeting_intro: "Write a short, heartfelt greeting card message of at most 3 sentences to accompany a gift.",
    gift_label: "Gift:",
    recipient_label: "Recipient:",
    greeting_output_rule: "Write it in English. Return only the message text, without quotation marks.",
};

static ID_TEMPLATES: PromptTemplates = PromptTemplates {
    recommend_system: "Kamu adalah asisten belanja yang empatik dan cerdas. Berdasarkan deskripsi pengguna, berikan TEPAT 3 rekomendasi kado yang spesifik (bukan kategori umum). Jadilah kreatif namun tetap praktis.",
    recommend_intro: "Berdasarkan deskripsi seseorang berikut ini, berikan tepat 3 rekomendasi kado yang spesifik.",
    description_label: "Deskripsi:",
    occasion_label: "Acara:",
    budget_label: "Anggaran:",
    photo_hint: "Foto orang tersebut terlampir. Bacalah estetika dan aura mereka dari foto itu.",
    photo_only_hint: "Tidak ada deskripsi tertulis. Andalkan foto yang terlampir.",
    deep_dive_header: "Pendalaman:",
    zodiac_label: "- Zodiak:",
    music_label: "- Selera musik:",
    deep_dive_rule: "Gunakan informasi ini untuk menyesuaikan gaya setiap kado.",
    recommend_output_rule: "Setiap kado harus sesuai anggaran. Tulis name, reason, dan price_range dalam Bahasa Indonesia, dan berikan price_range sebagai perkiraan kisaran harga dalam Rupiah (misal 'Rp 100rb - 300rb').",
    alchemy_system: "Kamu adalah alkemis produk yang visioner. Kamu meleburkan dua ide menjadi produk nyata yang bisa dibeli hari ini.",
    alchemy_intro: "Leburkan dua elemen berikut menjadi tepat 3 produk dunia nyata yang benar-benar ada dan bisa dibeli, masing-masing merupakan perpaduan konseptual dari kedua elemen.",
    element_a_label: "Elemen pertama:",
    element_b_label: "Elemen kedua:",
    alchemy_output_rule: "Tulis name, reason, dan price_range dalam Bahasa Indonesia. Bagian reason harus menjelaskan bagaimana produk itu memadukan kedua elemen.",
    greeting_system: "Kamu adalah penulis kartu ucapan yang hangat dan jenaka.",
    greeting_intro: "Tulis pesan kartu ucapan yang singkat dan tulus, maksimal 3 kalimat, untuk menyertai sebuah kado.",
    gift_label: "Kado:",
    recipient_label: "Penerima:",
    greeting_output_rule: "Tulis dalam Bahasa Indonesia. Kembalikan hanya teks pesannya, tanpa tanda kutip.",
};

/// Build the person-based gift prompt and its output schema.
pub fn build_recommendation_prompt(request: &RecommendationRequest) -> Prompt {
    let t = PromptTemplates::for_locale(request.locale);
    let mut lines = vec![t.recommend_intro.to_string()];

    let description = request.description.trim();
    if description.is_empty() {
        lines.push(t.photo_only_hint.to_string());
    } else {
        lines.push(format!("{} \"{}\"", t.description_label, description));
    }
    lines.push(format!("{} {}", t.occasion_label, request.occasion_label));
    lines.push(format!("{} {}", t.budget_label, request.budget_label));

    if request.image.is_some() && !description.is_empty() {
        lines.push(t.photo_hint.to_string());
    }

    let zodiac = non_blank(request.zodiac_sign.as_deref());
    let music = non_blank(request.music_vibe.as_deref());
    if zodiac.is_some() || music.is_some() {
        lines.push(String::new());
        lines.push(t.deep_dive_header.to_string());
        if let Some(sign) = zodiac {
            lines.push(format!("{} {}", t.zodiac_label, sign));
        }
        if let Some(vibe) = music {
            lines.push(format!("{} {}", t.music_label, vibe));
        }
        lines.push(t.deep_dive_rule.to_string());
    }

    lines.push(String::new());
    lines.push(t.recommend_output_rule.to_string());

    Prompt {
        system_instruction: t.recommend_system,
        text: lines.join("\n"),
        schema: Some(OutputSchema::gift_list()),
    }
}

/// Build the "alchemy" prompt: 3 real products fusing two elements.
pub fn build_alchemy_prompt(request: &AlchemyRequest) -> Prompt {
    let t = PromptTemplates::for_locale(request.locale);
    let text = [
        t.alchemy_intro.to_string(),
        format!("{} \"{}\"", t.element_a_label, request.element_a.trim()),
        format!("{} \"{}\"", t.element_b_label, request.element_b.trim()),
        String::new(),
        t.alchemy_output_rule.to_string(),
    ]
    .join("\n");

    Prompt {
        system_instruction: t.alchemy_system,
        text,
        schema: Some(OutputSchema::gift_list()),
    }
}

/// Build the free-text greeting card prompt. No output schema.
pub fn build_greeting_prompt(
    gift: &Recommendation,
    recipient_description: &str,
    occasion_label: &str,
    locale: Locale,
) -> Prompt {
    let t = PromptTemplates::for_locale(locale);
    let text = [
        t.greeting_intro.to_string(),
        format!("{} {}", t.gift_label, gift.name),
        format!("{} {}", t.recipient_label, recipient_description.trim()),
        format!("{} {}", t.occasion_label, occasion_label),
        String::new(),
        t.greeting_output_rule.to_string(),
    ]
    .join("\n");

    Prompt {
        system_instruction: t.greeting_system,
        text,
        schema: None,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
