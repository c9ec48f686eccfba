//! Conversation Repository Port
//!
//! Abstract interface for conversation persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{errors::DomainError, CollectedData, Conversation};

/// Repository interface for Conversation records
///
/// Writes are scoped by owner: an implementation must never update a
/// record whose `owner_id` differs from the one given.
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Find a conversation by ID, regardless of owner
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, DomainError>;

    /// Insert a new conversation
    async fn create(&self, conversation: &Conversation) -> Result<Conversation, DomainError>;

    /// Persist only the collected data (mid-turn checkpoint)
    async fn save_collected_data(
        &self,
        id: Uuid,
        owner_id: &str,
        data: &CollectedData,
    ) -> Result<(), DomainError>;

    /// Persist transcript, collected data and status.
    ///
    /// A stored `ready_to_generate` status is never overwritten with `active`.
    async fn save(&self, conversation: &Conversation) -> Result<Conversation, DomainError>;
}
