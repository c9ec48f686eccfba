//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - Conversation: The data-collection dialogue (aggregate root)
//! - Message: Transcript entry (user, assistant, tool result)
//! - Presentation: Generated deck artifact

mod conversation;
mod message;
mod presentation;

pub use conversation::*;
pub use message::*;
pub use presentation::*;
