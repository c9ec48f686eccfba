//! Deck - generation trigger

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::application::GeneratedDeck;

/// Generate a deck from collected startup data
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateDeckRequest {
    #[serde(default)]
    pub collected_data: BTreeMap<String, String>,
    #[serde(default)]
    pub owner_id: String,
}

/// Reference to the stored deck
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GenerateDeckResponse {
    pub artifact_id: Uuid,
    pub title: String,
    pub slide_count: usize,
}

impl From<GeneratedDeck> for GenerateDeckResponse {
    fn from(deck: GeneratedDeck) -> Self {
        Self {
            artifact_id: deck.artifact_id,
            title: deck.title,
            slide_count: deck.slide_count,
        }
    }
}
