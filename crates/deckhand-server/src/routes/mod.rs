//! Deckhand API Routes
//!
//! - /pitch/assistant - One assistant turn
//! - /pitch/conversations/:id - Stored conversation and progress
//! - /pitch/decks - Deck generation

pub mod conversation;
pub mod deck;
pub mod swagger;
