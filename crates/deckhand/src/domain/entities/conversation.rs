//! Conversation - Aggregate root of the data-collection dialogue
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Message;
use crate::domain::services::{completeness, ToolRound};
use crate::domain::value_objects::{CollectedData, ConversationStatus};

/// A pitch deck assistant conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    /// Profile or session the conversation belongs to
    pub owner_id: String,
    /// Full transcript, including tool-call round-trips
    pub messages: Vec<Message>,
    #[serde(default)]
    pub collected_data: CollectedData,
    pub status: ConversationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// Start an empty, active conversation
    pub fn new(owner_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner_id.into(),
            messages: Vec::new(),
            collected_data: CollectedData::new(),
            status: ConversationStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, owner_id: &str) -> bool {
        self.owner_id == owner_id
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
        self.touch();
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
        self.touch();
    }

    /// Append an assistant tool-call message together with its
    /// acknowledgements and adopt the merged data.
    pub fn record_tool_round(&mut self, round: ToolRound) {
        let (request, acknowledgements, data) = round.into_parts();
        self.messages.push(request);
        self.messages.extend(acknowledgements);
        self.collected_data = data;
        self.touch();
    }

    /// Percentage of required fields filled
    pub fn completeness(&self) -> u8 {
        completeness::completeness(&self.collected_data)
    }

    /// Re-evaluate the status against `threshold`.
    ///
    /// Returns `true` when this call moved the conversation to
    /// `ReadyToGenerate`.
    pub fn refresh_status(&mut self, threshold: u8) -> bool {
        let before = self.status;
        self.status = before.advance(self.completeness() >= threshold);
        before != self.status
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ToolCall;
    use crate::domain::services::apply_tool_calls;

    #[test]
    fn test_new_conversation_is_empty_and_active() {
        let conv = Conversation::new("profile-1");
        assert!(conv.messages.is_empty());
        assert!(conv.collected_data.is_empty());
        assert_eq!(conv.status, ConversationStatus::Active);
        assert!(conv.is_owned_by("profile-1"));
        assert!(!conv.is_owned_by("profile-2"));
    }

    #[test]
    fn test_tool_round_appends_request_then_acks() {
        let mut conv = Conversation::new("p");
        conv.push_user("We are Acme");

        let round = apply_tool_calls(
            &conv.collected_data,
            None,
            vec![ToolCall::new(
                "call_1",
                "save_startup_data",
                r#"{"company_name":"Acme"}"#,
            )],
        );
        conv.record_tool_round(round);

        assert_eq!(conv.messages.len(), 3);
        assert_eq!(conv.messages[1].role(), "assistant");
        assert_eq!(conv.messages[2].role(), "tool");
        assert_eq!(conv.collected_data.get("company_name"), Some("Acme"));
    }

    #[test]
    fn test_status_does_not_regress() {
        let mut conv = Conversation::new("p");
        conv.collected_data = [
            ("company_name", "Acme"),
            ("industry", "fintech"),
            ("problem", "fraud"),
            ("solution", "ml"),
            ("target_market", "banks"),
        ]
        .into_iter()
        .collect();

        assert!(conv.refresh_status(80));
        assert_eq!(conv.status, ConversationStatus::ReadyToGenerate);

        conv.collected_data = CollectedData::new();
        assert!(!conv.refresh_status(80));
        assert_eq!(conv.status, ConversationStatus::ReadyToGenerate);
    }
}
