//! Deckhand API Client

use std::collections::BTreeMap;

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// API Client for Deckhand
pub struct DeckhandClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

// ============================================
// API Request/Response Types
// ============================================

#[derive(Debug, Serialize)]
pub struct TurnRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<&'a str>,
    pub message: &'a str,
    pub owner_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TurnResponse {
    pub conversation_id: Uuid,
    pub message: String,
    #[serde(default)]
    pub suggestions: Vec<String>,
    pub completeness: u8,
    pub ready_to_generate: bool,
    #[serde(default)]
    pub collected_data: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub status: String,
    pub completeness: u8,
    pub ready_to_generate: bool,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub collected_data: BTreeMap<String, String>,
    #[serde(default)]
    pub messages: Vec<TranscriptEntry>,
}

#[derive(Debug, Serialize)]
pub struct GenerateDeckRequest<'a> {
    pub collected_data: &'a BTreeMap<String, String>,
    pub owner_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateDeckResponse {
    pub artifact_id: Uuid,
    pub title: String,
    pub slide_count: usize,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    message: String,
}

impl DeckhandClient {
    /// Create a new API client
    pub fn new(base_url: &str, api_key: Option<&str>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Send one message to the assistant
    pub async fn send_message(&self, request: &TurnRequest<'_>) -> Result<TurnResponse> {
        let url = format!("{}/pitch/assistant", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await
            .context("Failed to connect to Deckhand API")?;

        parse(resp).await
    }

    /// Fetch a stored conversation
    pub async fn get_conversation(
        &self,
        conversation_id: &str,
        owner_id: &str,
    ) -> Result<ConversationResponse> {
        let url = format!(
            "{}/pitch/conversations/{}?owner_id={}",
            self.base_url,
            conversation_id,
            urlencoding::encode(owner_id)
        );
        let resp = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .context("Failed to connect to Deckhand API")?;

        parse(resp).await
    }

    /// Generate a deck from collected data
    pub async fn generate_deck(
        &self,
        request: &GenerateDeckRequest<'_>,
    ) -> Result<GenerateDeckResponse> {
        let url = format!("{}/pitch/decks", self.base_url);
        let resp = self
            .authorized(self.client.post(&url))
            .json(request)
            .send()
            .await
            .context("Failed to connect to Deckhand API")?;

        parse(resp).await
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }
}

async fn parse<T: DeserializeOwned>(resp: Response) -> Result<T> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(err) => bail!("API error ({}): {} [{}]", status, err.message, err.error),
            Err(_) => bail!("API error ({}): {}", status, body),
        }
    }

    resp.json().await.context("Failed to parse response")
}
