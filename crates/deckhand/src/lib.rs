//! Deckhand Domain Library
//!
//! Core domain types and interfaces for the Deckhand pitch deck assistant:
//! a chat loop that extracts structured startup facts through LLM tool
//! calls, tracks completeness, and gates deck generation.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Conversation, Message, Presentation
//!   - `value_objects/`: StartupField, CollectedData, ConversationStatus
//!   - `services/`: completeness, tool-call adapter, suggestions, prompts
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: Data access interfaces
//!   - `services/`: Chat-completion interface
//!
//! - **Retry** (`retry`): Bounded exponential backoff
//!
//! # Usage
//!
//! ```rust,ignore
//! use deckhand::domain::{Conversation, StartupField};
//! use deckhand::ports::{ChatCompletionProvider, ConversationRepository};
//! ```

pub mod domain;
pub mod ports;
pub mod retry;

// Re-export commonly used types
pub use domain::{
    apply_tool_calls, build_deck_prompt, completeness_of, extract_suggestions, is_ready,
    meets_threshold, missing_fields, save_startup_data_tool, CollectedData, Conversation,
    ConversationStatus, Deck, DomainError, Message, Presentation, Reply, Slide, SlideContent,
    StartupDataPatch, StartupField, ToolCall, ToolCallError, ToolDefinition, ToolRound,
    ASSISTANT_SYSTEM_PROMPT, DECK_SYSTEM_PROMPT, READINESS_THRESHOLD, SAVE_STARTUP_DATA,
};
pub use domain::completeness::completeness;
pub use ports::{
    ChatCompletion, ChatCompletionProvider, ChatRequest, ConversationRepository,
    PresentationRepository, ResponseFormat, TokenUsage, UpstreamError,
};
pub use retry::{with_retry, RetryPolicy, Retryable};
