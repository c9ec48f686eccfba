//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

mod conversation_service;
mod deck_service;
mod locks;
mod upstream;

#[cfg(test)]
mod test_support;

pub use conversation_service::{
    ConversationPolicy, ConversationService, TurnContext, TurnOutcome, TurnRequest,
};
pub use deck_service::{DeckPolicy, DeckService, GeneratedDeck};
