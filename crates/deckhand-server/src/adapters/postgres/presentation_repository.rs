//! PostgreSQL implementation of PresentationRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use deckhand::{DomainError, Presentation, PresentationRepository};

pub struct PgPresentationRepository {
    pool: PgPool,
}

impl PgPresentationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PresentationRepository for PgPresentationRepository {
    async fn create(&self, presentation: &Presentation) -> Result<Presentation, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO presentations
                (id, owner_id, title, content, outline, slide_count,
                 status, category, theme, is_public, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(presentation.id)
        .bind(&presentation.owner_id)
        .bind(&presentation.title)
        .bind(Json(&presentation.content))
        .bind(Json(&presentation.outline))
        .bind(presentation.slide_count)
        .bind(&presentation.status)
        .bind(&presentation.category)
        .bind(&presentation.theme)
        .bind(presentation.is_public)
        .bind(presentation.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Repository(e.to_string()))?;

        Ok(presentation.clone())
    }
}
