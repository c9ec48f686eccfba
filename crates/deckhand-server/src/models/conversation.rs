//! Conversation - assistant turns and stored transcripts

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use deckhand::{missing_fields, Conversation, Message, ToolCall};

use crate::application::TurnOutcome;

// ============================================
// Request/Response DTOs
// ============================================

/// One user message for the assistant
#[derive(Debug, Deserialize, ToSchema)]
pub struct TurnRequestBody {
    /// Existing conversation id; omitted or unknown starts a new one
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Profile or session id, already authorized by the caller
    #[serde(default)]
    pub owner_id: String,
}

/// Assistant reply for one turn
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TurnResponse {
    pub conversation_id: Uuid,
    /// Reply text with the suggestions marker removed
    pub message: String,
    /// Quick replies, empty or exactly three
    pub suggestions: Vec<String>,
    /// 0-100
    pub completeness: u8,
    pub ready_to_generate: bool,
    pub collected_data: BTreeMap<String, String>,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            conversation_id: outcome.conversation_id,
            message: outcome.message,
            suggestions: outcome.suggestions,
            completeness: outcome.completeness,
            ready_to_generate: outcome.ready_to_generate,
            collected_data: outcome.collected_data.into_inner(),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ConversationQuery {
    /// Owner the conversation must belong to
    pub owner_id: String,
}

/// Tool invocation as stored in the transcript
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ToolCallView {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

impl From<&ToolCall> for ToolCallView {
    fn from(call: &ToolCall) -> Self {
        Self {
            id: call.id.clone(),
            name: call.name.clone(),
            arguments: call.arguments.clone(),
        }
    }
}

/// One transcript message
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TranscriptEntry {
    pub role: String,
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl From<&Message> for TranscriptEntry {
    fn from(message: &Message) -> Self {
        let tool_call_id = match message {
            Message::Tool { tool_call_id, .. } => Some(tool_call_id.clone()),
            _ => None,
        };

        Self {
            role: message.role().to_string(),
            content: message.content().map(str::to_string),
            tool_calls: message.tool_calls().iter().map(Into::into).collect(),
            tool_call_id,
        }
    }
}

/// Stored conversation with derived progress
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub owner_id: String,
    pub status: String,
    pub completeness: u8,
    pub ready_to_generate: bool,
    /// Required fields not yet filled, in schema order
    pub missing_fields: Vec<String>,
    pub collected_data: BTreeMap<String, String>,
    pub messages: Vec<TranscriptEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(conversation: Conversation) -> Self {
        Self {
            id: conversation.id,
            completeness: conversation.completeness(),
            ready_to_generate: conversation.status.is_ready(),
            status: conversation.status.to_string(),
            missing_fields: missing_fields(&conversation.collected_data)
                .into_iter()
                .map(|field| field.as_str().to_string())
                .collect(),
            messages: conversation.messages.iter().map(Into::into).collect(),
            collected_data: conversation.collected_data.into_inner(),
            owner_id: conversation.owner_id,
            created_at: conversation.created_at,
            updated_at: conversation.updated_at,
        }
    }
}
