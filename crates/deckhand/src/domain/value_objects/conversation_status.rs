//! ConversationStatus - Lifecycle of a data-collection conversation

use serde::{Deserialize, Serialize};

/// Conversation lifecycle status.
///
/// Only ever moves `Active -> ReadyToGenerate`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ConversationStatus {
    #[default]
    Active,
    ReadyToGenerate,
}

impl ConversationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationStatus::Active => "active",
            ConversationStatus::ReadyToGenerate => "ready_to_generate",
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ConversationStatus::ReadyToGenerate)
    }

    /// Next status given the current readiness. Never regresses.
    pub fn advance(self, ready: bool) -> Self {
        match self {
            ConversationStatus::Active if ready => ConversationStatus::ReadyToGenerate,
            other => other,
        }
    }
}

impl std::fmt::Display for ConversationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ConversationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ConversationStatus::Active),
            "ready_to_generate" => Ok(ConversationStatus::ReadyToGenerate),
            _ => Err(format!("Unknown conversation status: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_only_forward() {
        assert_eq!(
            ConversationStatus::Active.advance(true),
            ConversationStatus::ReadyToGenerate
        );
        assert_eq!(
            ConversationStatus::Active.advance(false),
            ConversationStatus::Active
        );
        assert_eq!(
            ConversationStatus::ReadyToGenerate.advance(false),
            ConversationStatus::ReadyToGenerate
        );
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(
            "ready_to_generate".parse::<ConversationStatus>(),
            Ok(ConversationStatus::ReadyToGenerate)
        );
        assert!("archived".parse::<ConversationStatus>().is_err());
    }
}
