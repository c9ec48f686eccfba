//! Conversation Application Service (Use Case)
//!
//! Runs one assistant turn: resolve the conversation, append the user
//! message, drive a bounded number of chat round-trips applying tool calls,
//! then finalize status and reply.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use deckhand::{
    apply_tool_calls, extract_suggestions, save_startup_data_tool, ChatCompletion,
    ChatCompletionProvider, ChatRequest, CollectedData, Conversation, ConversationRepository,
    DomainError, Reply, RetryPolicy, ASSISTANT_SYSTEM_PROMPT, READINESS_THRESHOLD,
};

use super::locks::ConversationLocks;
use super::upstream::complete_with_retry;

/// Business rules for the assistant loop
#[derive(Debug, Clone)]
pub struct ConversationPolicy {
    /// Hard cap on chat round-trips per turn
    pub max_round_trips: usize,
    /// Completeness at which the conversation becomes ready to generate
    pub readiness_threshold: u8,
    pub retry: RetryPolicy,
    pub max_completion_tokens: u32,
}

impl Default for ConversationPolicy {
    fn default() -> Self {
        Self {
            max_round_trips: 5,
            readiness_threshold: READINESS_THRESHOLD,
            retry: RetryPolicy::default(),
            max_completion_tokens: 1024,
        }
    }
}

/// One incoming user message
#[derive(Debug, Clone)]
pub struct TurnRequest {
    /// Existing conversation, or `None` to start one
    pub conversation_id: Option<Uuid>,
    pub message: String,
    /// Already-authorized owner (profile or session) id
    pub owner_id: String,
}

/// Caller-imposed limits for a turn
#[derive(Debug, Clone, Default)]
pub struct TurnContext {
    /// No upstream attempt runs past this instant
    pub deadline: Option<Instant>,
    /// Checked only between round-trips
    pub cancel: CancellationToken,
}

impl TurnContext {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            deadline: Some(Instant::now() + timeout),
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Result of a turn
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub conversation_id: Uuid,
    /// Reply with the suggestions marker removed
    pub message: String,
    pub suggestions: Vec<String>,
    pub completeness: u8,
    pub ready_to_generate: bool,
    pub collected_data: CollectedData,
    /// Chat round-trips performed
    pub round_trips: usize,
}

/// Application service for the pitch deck assistant
pub struct ConversationService<R: ConversationRepository> {
    repo: Arc<R>,
    llm: Arc<dyn ChatCompletionProvider>,
    policy: ConversationPolicy,
    locks: ConversationLocks,
}

impl<R: ConversationRepository> ConversationService<R> {
    pub fn new(
        repo: Arc<R>,
        llm: Arc<dyn ChatCompletionProvider>,
        policy: ConversationPolicy,
    ) -> Self {
        Self {
            repo,
            llm,
            policy,
            locks: ConversationLocks::new(),
        }
    }

    /// Handle one user message.
    ///
    /// Turns on the same existing conversation run one at a time.
    pub async fn handle_turn(
        &self,
        request: TurnRequest,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DomainError> {
        if request.message.trim().is_empty() {
            return Err(DomainError::InvalidInput("message is required".to_string()));
        }
        if request.owner_id.trim().is_empty() {
            return Err(DomainError::InvalidInput("owner_id is required".to_string()));
        }

        match request.conversation_id {
            Some(id) => self.locks.serialize(id, self.run_turn(request, ctx)).await,
            None => self.run_turn(request, ctx).await,
        }
    }

    /// Load a conversation the caller owns
    pub async fn get(&self, id: Uuid, owner_id: &str) -> Result<Conversation, DomainError> {
        let conversation = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Conversation", id))?;

        if !conversation.is_owned_by(owner_id) {
            tracing::warn!("Owner {} attempted to read conversation {}", owner_id, id);
            return Err(DomainError::Unauthorized(
                "conversation belongs to another owner".to_string(),
            ));
        }

        Ok(conversation)
    }

    async fn run_turn(
        &self,
        request: TurnRequest,
        ctx: &TurnContext,
    ) -> Result<TurnOutcome, DomainError> {
        let (mut conversation, mut stored) = self
            .resolve(request.conversation_id, &request.owner_id)
            .await?;
        conversation.push_user(request.message);

        let mut reply = String::new();
        let mut round_trips = 0;
        let mut settled = false;

        while round_trips < self.policy.max_round_trips {
            if round_trips > 0 && ctx.cancel.is_cancelled() {
                tracing::info!(
                    "Turn on conversation {} cancelled after {} round-trip(s)",
                    conversation.id,
                    round_trips
                );
                break;
            }

            let completion = self.complete(&conversation, ctx).await?;
            round_trips += 1;

            if let Some(text) = completion.content.as_deref() {
                if !text.trim().is_empty() {
                    reply = text.to_string();
                }
            }

            if completion.tool_calls.is_empty() {
                settled = true;
                break;
            }

            let round = apply_tool_calls(
                &conversation.collected_data,
                completion.content,
                completion.tool_calls,
            );
            conversation.record_tool_round(round);

            // Checkpoint so extracted facts survive a later failure
            if stored {
                self.repo
                    .save_collected_data(
                        conversation.id,
                        &conversation.owner_id,
                        &conversation.collected_data,
                    )
                    .await?;
            } else {
                self.insert(&Conversation {
                    messages: Vec::new(),
                    ..conversation.clone()
                })
                .await?;
                stored = true;
            }
        }

        if !settled && round_trips == self.policy.max_round_trips {
            tracing::warn!(
                "Conversation {} hit the {} round-trip cap",
                conversation.id,
                self.policy.max_round_trips
            );
        }

        conversation.push_assistant(reply.clone());
        if conversation.refresh_status(self.policy.readiness_threshold) {
            tracing::info!(
                "Conversation {} is ready to generate ({}%)",
                conversation.id,
                conversation.completeness()
            );
        }

        let Reply {
            message,
            suggestions,
        } = extract_suggestions(&reply);

        let saved = if stored {
            self.repo.save(&conversation).await?
        } else {
            self.insert(&conversation).await?
        };

        Ok(TurnOutcome {
            conversation_id: saved.id,
            message,
            suggestions,
            completeness: saved.completeness(),
            ready_to_generate: saved.status.is_ready(),
            collected_data: saved.collected_data,
            round_trips,
        })
    }

    /// Load the caller's conversation, or start a new one.
    ///
    /// The flag tells whether the conversation is already stored. New
    /// conversations are written on their first checkpoint or final save.
    async fn resolve(
        &self,
        id: Option<Uuid>,
        owner_id: &str,
    ) -> Result<(Conversation, bool), DomainError> {
        if let Some(id) = id {
            match self.repo.find_by_id(id).await? {
                Some(conversation) if conversation.is_owned_by(owner_id) => {
                    return Ok((conversation, true));
                }
                Some(_) => {
                    tracing::warn!("Owner {} attempted to access conversation {}", owner_id, id);
                    return Err(DomainError::Unauthorized(
                        "conversation belongs to another owner".to_string(),
                    ));
                }
                None => {
                    tracing::info!("Conversation {} not found, starting a new one", id);
                }
            }
        }

        Ok((Conversation::new(owner_id), false))
    }

    async fn insert(&self, conversation: &Conversation) -> Result<Conversation, DomainError> {
        let created = self.repo.create(conversation).await?;
        tracing::info!(
            "Created conversation {} for owner {}",
            created.id,
            created.owner_id
        );
        Ok(created)
    }

    async fn complete(
        &self,
        conversation: &Conversation,
        ctx: &TurnContext,
    ) -> Result<ChatCompletion, DomainError> {
        let request = ChatRequest::new(ASSISTANT_SYSTEM_PROMPT, conversation.messages.clone())
            .with_tools(vec![save_startup_data_tool()])
            .with_max_completion_tokens(self.policy.max_completion_tokens);

        complete_with_retry(
            self.llm.as_ref(),
            &request,
            &self.policy.retry,
            ctx.deadline,
            Ok,
        )
        .await
        .map_err(|e| {
            tracing::error!(
                "Chat completion failed for conversation {}: {}",
                conversation.id,
                e
            );
            DomainError::from(e)
        })
    }
}
