//! In-memory fakes for application service tests

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use deckhand::{
    ChatCompletion, ChatCompletionProvider, ChatRequest, CollectedData, Conversation,
    ConversationRepository, ConversationStatus, DomainError, Presentation,
    PresentationRepository, ToolCall, UpstreamError, SAVE_STARTUP_DATA,
};

#[derive(Default)]
pub struct InMemoryConversationRepository {
    records: Mutex<HashMap<Uuid, Conversation>>,
    checkpoints: Mutex<Vec<CollectedData>>,
}

impl InMemoryConversationRepository {
    pub fn with(conversation: Conversation) -> Self {
        let repo = Self::default();
        repo.records
            .lock()
            .unwrap()
            .insert(conversation.id, conversation);
        repo
    }

    pub fn get(&self, id: Uuid) -> Option<Conversation> {
        self.records.lock().unwrap().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Conversation> {
        self.records.lock().unwrap().values().cloned().collect()
    }

    /// Snapshots written through `save_collected_data`
    pub fn checkpoints(&self) -> Vec<CollectedData> {
        self.checkpoints.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConversationRepository for InMemoryConversationRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Conversation>, DomainError> {
        Ok(self.get(id))
    }

    async fn create(&self, conversation: &Conversation) -> Result<Conversation, DomainError> {
        self.records
            .lock()
            .unwrap()
            .insert(conversation.id, conversation.clone());
        Ok(conversation.clone())
    }

    async fn save_collected_data(
        &self,
        id: Uuid,
        owner_id: &str,
        data: &CollectedData,
    ) -> Result<(), DomainError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&id)
            .filter(|c| c.is_owned_by(owner_id))
            .ok_or_else(|| DomainError::not_found("Conversation", id))?;
        record.collected_data = data.clone();
        self.checkpoints.lock().unwrap().push(data.clone());
        Ok(())
    }

    async fn save(&self, conversation: &Conversation) -> Result<Conversation, DomainError> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(&conversation.id)
            .filter(|c| c.is_owned_by(&conversation.owner_id))
            .ok_or_else(|| DomainError::not_found("Conversation", conversation.id))?;

        let stored_status = record.status;
        *record = conversation.clone();
        if stored_status == ConversationStatus::ReadyToGenerate {
            record.status = stored_status;
        }
        Ok(record.clone())
    }
}

#[derive(Default)]
pub struct InMemoryPresentationRepository {
    records: Mutex<Vec<Presentation>>,
}

impl InMemoryPresentationRepository {
    pub fn all(&self) -> Vec<Presentation> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl PresentationRepository for InMemoryPresentationRepository {
    async fn create(&self, presentation: &Presentation) -> Result<Presentation, DomainError> {
        self.records.lock().unwrap().push(presentation.clone());
        Ok(presentation.clone())
    }
}

/// Chat stub replaying scripted responses, then repeating `fallback`
pub struct ScriptedChat {
    script: Mutex<VecDeque<Result<ChatCompletion, UpstreamError>>>,
    fallback: Result<ChatCompletion, UpstreamError>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedChat {
    pub fn new(script: Vec<Result<ChatCompletion, UpstreamError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Ok(ChatCompletion::text("Anything else?")),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `response`
    pub fn repeating(response: Result<ChatCompletion, UpstreamError>) -> Self {
        Self {
            fallback: response,
            ..Self::new(Vec::new())
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletionProvider for ScriptedChat {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, UpstreamError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone())
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_id(&self) -> &str {
        "scripted-model"
    }
}

/// A `save_startup_data` call with the given arguments
pub fn save_call(id: &str, arguments: serde_json::Value) -> ToolCall {
    ToolCall::new(id, SAVE_STARTUP_DATA, arguments.to_string())
}
