//! Deckhand API Data Models
//!
//! - Conversation: assistant turns and transcript retrieval
//! - Deck: generation trigger
//! - Error: uniform error bodies

mod conversation;
mod deck;
mod error;

pub use conversation::*;
pub use deck::*;
pub use error::*;
