//! PostgreSQL Repository Implementations

mod conversation_repository;
mod presentation_repository;

pub use conversation_repository::PgConversationRepository;
pub use presentation_repository::PgPresentationRepository;
