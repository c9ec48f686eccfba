//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use deckhand::{
    CollectedData, Conversation, ConversationRepository, ConversationStatus, DomainError, Message,
};

pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for sqlx mapping
#[derive(sqlx::FromRow)]
struct ConversationRow {
    id: Uuid,
    owner_id: String,
    messages: Json<Vec<Message>>,
    collected_data: Json<CollectedData>,
    status: String,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TryFrom<ConversationRow> for Conversation {
    type Error = DomainError;

    fn try_from(row: ConversationRow) -> Result<Self, Self::Error> {
        let status: ConversationStatus = row.status.parse().map_err(DomainError::Repository)?;

        Ok(Self {
            id: row.id,
            owner_id: row.owner_id,
            messages: row.messages.0,
            collected_data: row.collected_data.0,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, DomainError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            "SELECT * FROM pitch_conversations WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.map(TryInto::try_into).transpose()
    }

    async fn create(&self, conversation: &Conversation) -> Result<Conversation, DomainError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            INSERT INTO pitch_conversations (id, owner_id, messages, collected_data, status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(&conversation.owner_id)
        .bind(Json(&conversation.messages))
        .bind(Json(&conversation.collected_data))
        .bind(conversation.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        row.try_into()
    }

    async fn save_collected_data(
        &self,
        id: Uuid,
        owner_id: &str,
        data: &CollectedData,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE pitch_conversations
            SET collected_data = $3, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .bind(Json(data))
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::not_found("Conversation", id));
        }
        Ok(())
    }

    async fn save(&self, conversation: &Conversation) -> Result<Conversation, DomainError> {
        let row = sqlx::query_as::<_, ConversationRow>(
            r#"
            UPDATE pitch_conversations
            SET messages = $3,
                collected_data = $4,
                status = CASE
                    WHEN status = 'ready_to_generate' THEN status
                    ELSE $5
                END,
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING *
            "#,
        )
        .bind(conversation.id)
        .bind(&conversation.owner_id)
        .bind(Json(&conversation.messages))
        .bind(Json(&conversation.collected_data))
        .bind(conversation.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?
        .ok_or_else(|| DomainError::not_found("Conversation", conversation.id))?;

        row.try_into()
    }
}
