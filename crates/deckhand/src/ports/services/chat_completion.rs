//! Chat Completion Port
//!
//! Abstract interface for a tool-calling capable LLM. The orchestrator and
//! the deck generator only see this trait; provider wire formats live in
//! the infrastructure layer.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::entities::{Message, ToolCall, ToolDefinition};
use crate::retry::Retryable;

/// Shape the service must answer in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseFormat {
    #[default]
    Text,
    JsonObject,
}

/// One chat-completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    /// System instruction, sent ahead of `messages`
    pub system_prompt: String,
    pub messages: Vec<Message>,
    #[serde(default)]
    pub tools: Vec<ToolDefinition>,
    #[serde(default)]
    pub response_format: ResponseFormat,
    pub max_completion_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(system_prompt: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            messages,
            tools: Vec::new(),
            response_format: ResponseFormat::Text,
            max_completion_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<ToolDefinition>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }

    pub fn with_max_completion_tokens(mut self, max: u32) -> Self {
        self.max_completion_tokens = Some(max);
        self
    }
}

/// Response from a chat completion
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatCompletion {
    /// Free-text content, if any
    pub content: Option<String>,
    /// Tool invocations, in the order returned
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    #[serde(default)]
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
}

impl ChatCompletion {
    /// Plain text response
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Response carrying tool calls and optional text
    pub fn with_tool_calls(content: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content,
            tool_calls,
            ..Default::default()
        }
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// Failure talking to the chat-completion service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    #[error("Upstream returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Malformed upstream response: {0}")]
    InvalidResponse(String),
}

impl UpstreamError {
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }
}

impl Retryable for UpstreamError {
    /// 4xx other than 429 means the request itself is wrong; everything
    /// else may succeed on another attempt.
    fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => !(400..500).contains(status) || *status == 429,
            Self::Timeout | Self::Transport(_) | Self::InvalidResponse(_) => true,
        }
    }
}

/// Chat-completion provider interface
///
/// # Example
///
/// ```rust,ignore
/// use deckhand::ports::ChatCompletionProvider;
///
/// struct OpenAiChatClient { /* ... */ }
///
/// #[async_trait]
/// impl ChatCompletionProvider for OpenAiChatClient {
///     async fn complete(&self, request: &ChatRequest)
///         -> Result<ChatCompletion, UpstreamError> {
///         // POST /chat/completions
///     }
///     // ...
/// }
/// ```
#[async_trait]
pub trait ChatCompletionProvider: Send + Sync {
    /// Run one request/response cycle
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, UpstreamError>;

    /// Get the provider name (e.g., "openai")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
