//! OpenAPI Documentation
//!
//! Centralized API documentation using utoipa.

use utoipa::OpenApi;

use crate::models::{
    // Conversation models
    ConversationResponse,
    // Error models
    ErrorResponse,
    // Deck models
    GenerateDeckRequest,
    GenerateDeckResponse,
    ToolCallView,
    TranscriptEntry,
    TurnRequestBody,
    TurnResponse,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Assistant endpoints
        super::conversation::assistant_turn,
        super::conversation::get_conversation,
        // Deck endpoints
        super::deck::generate_deck,
    ),
    info(
        title = "Deckhand API",
        version = "0.1.0",
        description = "Pitch deck assistant: collects startup facts through conversation and generates investor decks.",
        license(name = "MIT"),
    ),
    servers(
        (url = "/", description = "Current server"),
    ),
    tags(
        (name = "Health", description = "Health check endpoints"),
        (name = "Assistant", description = "Assistant - Conversational data collection"),
        (name = "Deck", description = "Deck - Pitch deck generation"),
    ),
    components(
        schemas(
            // Conversation
            TurnRequestBody,
            TurnResponse,
            ConversationResponse,
            TranscriptEntry,
            ToolCallView,
            // Deck
            GenerateDeckRequest,
            GenerateDeckResponse,
            // Error
            ErrorResponse,
        )
    ),
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_routes() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/pitch/assistant"));
        assert!(paths.iter().any(|p| p.as_str() == "/pitch/conversations/{id}"));
        assert!(paths.iter().any(|p| p.as_str() == "/pitch/decks"));
    }
}
