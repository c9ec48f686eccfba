//! Deck Routes - generation trigger

use axum::{extract::State, routing::post, Json, Router};
use tokio::time::Instant;

use deckhand::{CollectedData, DomainError};

use crate::models::{api_error, ApiError, ErrorResponse, GenerateDeckRequest, GenerateDeckResponse};
use crate::AppState;

/// Generate a pitch deck from collected data
#[utoipa::path(
    post,
    path = "/pitch/decks",
    request_body = GenerateDeckRequest,
    responses(
        (status = 200, description = "Deck generated and stored", body = GenerateDeckResponse),
        (status = 400, description = "Missing owner", body = ErrorResponse),
        (status = 503, description = "Generator temporarily unavailable", body = ErrorResponse)
    ),
    tag = "Deck"
)]
pub async fn generate_deck(
    State(state): State<AppState>,
    Json(payload): Json<GenerateDeckRequest>,
) -> Result<Json<GenerateDeckResponse>, ApiError> {
    let debug = state.config.debug_errors;
    let deadline = Instant::now() + state.config.request_timeout;
    let data = CollectedData::from(payload.collected_data);
    let owner_id = payload.owner_id;

    let service = state.deck_service.clone();
    let deck = tokio::spawn(async move { service.generate(&data, &owner_id, Some(deadline)).await })
        .await
        .map_err(|e| api_error(DomainError::Internal(format!("deck task failed: {e}")), debug))?
        .map_err(|e| api_error(e, debug))?;

    Ok(Json(deck.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/pitch/decks", post(generate_deck))
}
