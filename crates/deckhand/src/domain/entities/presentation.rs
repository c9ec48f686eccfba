//! Presentation - Generated pitch deck artifact
//!
//! `Deck` is the structured body returned by the generation service;
//! `Presentation` is the persisted artifact wrapping it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::value_objects::{CollectedData, StartupField};

pub const DEFAULT_DECK_TITLE: &str = "Pitch Deck";
pub const PITCH_DECK_CATEGORY: &str = "pitch-deck";
pub const DEFAULT_THEME: &str = "mystique";

/// Structured deck as produced by the generation service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    /// Ordered slide titles
    #[serde(default)]
    pub outline: Vec<String>,
    #[serde(default)]
    pub slides: Vec<Slide>,
    /// Keys the generation service added beyond the known shape
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default, deserialize_with = "lenient_number")]
    pub slide_number: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_layout")]
    pub layout: String,
    #[serde(default)]
    pub content: SlideContent,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlideContent {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(default)]
    pub bullets: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_layout() -> String {
    "title_content".to_string()
}

/// Accept `3`, `"3"` or anything else as 0
fn lenient_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()).unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

impl Deck {
    /// Parse the JSON body returned by the generation service
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }
}

/// Persisted deck artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presentation {
    pub id: Uuid,
    pub owner_id: String,
    pub title: String,
    pub content: Deck,
    pub outline: Vec<String>,
    pub slide_count: i32,
    pub status: String,
    pub category: String,
    pub theme: String,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
}

impl Presentation {
    /// Wrap a generated deck for `owner_id`.
    ///
    /// Title falls back to the collected company name, then a fixed default.
    pub fn from_deck(owner_id: impl Into<String>, deck: Deck, data: &CollectedData) -> Self {
        let title = deck
            .title
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                data.field(StartupField::CompanyName)
                    .filter(|name| !name.trim().is_empty())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| DEFAULT_DECK_TITLE.to_string());

        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            title,
            outline: deck.outline.clone(),
            slide_count: deck.slide_count() as i32,
            content: deck,
            status: "completed".to_string(),
            category: PITCH_DECK_CATEGORY.to_string(),
            theme: DEFAULT_THEME.to_string(),
            is_public: false,
            created_at: Utc::now(),
        }
    }
}
