//! Deck Generation Service (Use Case)
//!
//! Turns collected startup data into a structured slide deck and stores it
//! as the owner's presentation.

use std::sync::Arc;

use tokio::time::Instant;
use uuid::Uuid;

use deckhand::{
    build_deck_prompt, ChatCompletionProvider, ChatRequest, CollectedData, Deck, DomainError,
    Message, Presentation, PresentationRepository, ResponseFormat, RetryPolicy, UpstreamError,
    DECK_SYSTEM_PROMPT,
};

use super::upstream::complete_with_retry;

#[derive(Debug, Clone)]
pub struct DeckPolicy {
    pub retry: RetryPolicy,
    pub max_completion_tokens: u32,
}

impl Default for DeckPolicy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            max_completion_tokens: 4000,
        }
    }
}

/// Reference to a stored deck
#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    pub artifact_id: Uuid,
    pub title: String,
    pub slide_count: usize,
}

pub struct DeckService<P: PresentationRepository> {
    repo: Arc<P>,
    llm: Arc<dyn ChatCompletionProvider>,
    policy: DeckPolicy,
}

impl<P: PresentationRepository> DeckService<P> {
    pub fn new(repo: Arc<P>, llm: Arc<dyn ChatCompletionProvider>, policy: DeckPolicy) -> Self {
        Self { repo, llm, policy }
    }

    /// Generate and store a deck from `data`
    pub async fn generate(
        &self,
        data: &CollectedData,
        owner_id: &str,
        deadline: Option<Instant>,
    ) -> Result<GeneratedDeck, DomainError> {
        if owner_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("owner_id is required".to_string()));
        }

        let request = ChatRequest::new(
            DECK_SYSTEM_PROMPT,
            vec![Message::user(build_deck_prompt(data))],
        )
        .with_response_format(ResponseFormat::JsonObject)
        .with_max_completion_tokens(self.policy.max_completion_tokens);

        let deck = complete_with_retry(
            self.llm.as_ref(),
            &request,
            &self.policy.retry,
            deadline,
            parse_deck,
        )
        .await
        .map_err(|e| {
            tracing::error!("Deck generation failed for owner {}: {}", owner_id, e);
            DomainError::from(e)
        })?;

        let presentation = self
            .repo
            .create(&Presentation::from_deck(owner_id, deck, data))
            .await?;

        tracing::info!(
            "Stored presentation {} ({} slides) for owner {}",
            presentation.id,
            presentation.slide_count,
            owner_id
        );

        Ok(GeneratedDeck {
            artifact_id: presentation.id,
            slide_count: presentation.content.slide_count(),
            title: presentation.title,
        })
    }
}

fn parse_deck(completion: deckhand::ChatCompletion) -> Result<Deck, UpstreamError> {
    let raw = completion
        .content
        .filter(|c| !c.trim().is_empty())
        .ok_or_else(|| UpstreamError::InvalidResponse("empty deck response".to_string()))?;

    Deck::from_json(&raw)
        .map_err(|e| UpstreamError::InvalidResponse(format!("deck is not valid JSON: {}", e)))
}
