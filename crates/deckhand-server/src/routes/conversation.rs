//! Assistant Routes - conversational data collection
//!
//! HTTP handlers that delegate to ConversationService.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use deckhand::DomainError;

use crate::application::{TurnContext, TurnRequest};
use crate::models::{
    api_error, ApiError, ConversationQuery, ConversationResponse, ErrorResponse, TurnRequestBody,
    TurnResponse,
};
use crate::AppState;

/// Send one message to the pitch deck assistant
#[utoipa::path(
    post,
    path = "/pitch/assistant",
    request_body = TurnRequestBody,
    responses(
        (status = 200, description = "Assistant reply", body = TurnResponse),
        (status = 400, description = "Empty message or owner", body = ErrorResponse),
        (status = 403, description = "Conversation belongs to another owner", body = ErrorResponse),
        (status = 503, description = "Assistant temporarily unavailable", body = ErrorResponse)
    ),
    tag = "Assistant"
)]
pub async fn assistant_turn(
    State(state): State<AppState>,
    Json(payload): Json<TurnRequestBody>,
) -> Result<Json<TurnResponse>, ApiError> {
    let debug = state.config.debug_errors;

    let conversation_id = payload.conversation_id.as_deref().and_then(|raw| {
        Uuid::parse_str(raw.trim())
            .map_err(|_| tracing::debug!("Ignoring malformed conversation id {:?}", raw))
            .ok()
    });

    let request = TurnRequest {
        conversation_id,
        message: payload.message,
        owner_id: payload.owner_id,
    };

    // Dropping the guard (client gone) stops the turn at the next
    // round-trip boundary; the spawned task still finishes its writes.
    let cancel = CancellationToken::new();
    let ctx = TurnContext::with_timeout(state.config.request_timeout).with_cancel(cancel.clone());
    let _guard = cancel.drop_guard();

    let service = state.conversation_service.clone();
    let outcome = tokio::spawn(async move { service.handle_turn(request, &ctx).await })
        .await
        .map_err(|e| api_error(DomainError::Internal(format!("turn task failed: {e}")), debug))?
        .map_err(|e| api_error(e, debug))?;

    tracing::debug!(
        "Turn on conversation {} finished after {} round-trip(s) at {}%",
        outcome.conversation_id,
        outcome.round_trips,
        outcome.completeness
    );

    Ok(Json(outcome.into()))
}

/// Get a stored conversation with its progress
#[utoipa::path(
    get,
    path = "/pitch/conversations/{id}",
    params(
        ("id" = Uuid, Path, description = "Conversation ID"),
        ConversationQuery
    ),
    responses(
        (status = 200, description = "Conversation found", body = ConversationResponse),
        (status = 403, description = "Conversation belongs to another owner", body = ErrorResponse),
        (status = 404, description = "Conversation not found", body = ErrorResponse)
    ),
    tag = "Assistant"
)]
pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ConversationQuery>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let conversation = state
        .conversation_service
        .get(id, &query.owner_id)
        .await
        .map_err(|e| api_error(e, state.config.debug_errors))?;

    Ok(Json(conversation.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/pitch/assistant", post(assistant_turn))
        .route("/pitch/conversations/:id", get(get_conversation))
}
