//! Presentation Repository Port

use async_trait::async_trait;

use crate::domain::{errors::DomainError, Presentation};

/// Repository interface for generated deck artifacts
#[async_trait]
pub trait PresentationRepository: Send + Sync {
    /// Insert a new presentation
    async fn create(&self, presentation: &Presentation) -> Result<Presentation, DomainError>;
}
