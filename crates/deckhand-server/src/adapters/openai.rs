//! OpenAI-compatible chat-completion client
//!
//! Translates `ChatRequest` into the `/chat/completions` wire format and
//! classifies failures for the retry layer.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use deckhand::{
    ChatCompletion, ChatCompletionProvider, ChatRequest, Message, ResponseFormat, TokenUsage,
    ToolCall, ToolDefinition, UpstreamError,
};

use crate::config::OpenAiConfig;

pub struct OpenAiChatClient {
    client: Client,
    api_key: String,
    endpoint: String,
    model: String,
}

impl OpenAiChatClient {
    pub fn new(config: &OpenAiConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("deckhand/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            model: config.model.clone(),
        })
    }

    fn wire_request<'a>(&'a self, request: &'a ChatRequest) -> WireRequest<'a> {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: Some(request.system_prompt.as_str()),
            tool_calls: None,
            tool_call_id: None,
        });
        messages.extend(request.messages.iter().map(WireMessage::from));

        WireRequest {
            model: &self.model,
            messages,
            tools: (!request.tools.is_empty())
                .then(|| request.tools.iter().map(WireTool::from).collect()),
            response_format: match request.response_format {
                ResponseFormat::Text => None,
                ResponseFormat::JsonObject => Some(WireResponseFormat {
                    kind: "json_object",
                }),
            },
            max_completion_tokens: request.max_completion_tokens,
        }
    }
}

#[async_trait]
impl ChatCompletionProvider for OpenAiChatClient {
    async fn complete(&self, request: &ChatRequest) -> Result<ChatCompletion, UpstreamError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&self.wire_request(request))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Chat completion returned {}: {}", status, body);
            return Err(UpstreamError::status(status.as_u16(), body));
        }

        let body: WireResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::InvalidResponse(e.to_string()))?;

        body.into_completion()
    }

    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

fn classify(err: reqwest::Error) -> UpstreamError {
    if err.is_timeout() {
        UpstreamError::Timeout
    } else if let Some(status) = err.status() {
        UpstreamError::status(status.as_u16(), err.to_string())
    } else {
        UpstreamError::Transport(err.to_string())
    }
}

// ---- wire format ----

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<WireResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

impl<'a> From<&'a Message> for WireMessage<'a> {
    fn from(message: &'a Message) -> Self {
        match message {
            Message::User { content } => Self {
                role: "user",
                content: Some(content.as_str()),
                tool_calls: None,
                tool_call_id: None,
            },
            Message::Assistant {
                content,
                tool_calls,
            } => Self {
                role: "assistant",
                content: content.as_deref(),
                tool_calls: (!tool_calls.is_empty())
                    .then(|| tool_calls.iter().cloned().map(WireToolCall::from).collect()),
                tool_call_id: None,
            },
            Message::Tool {
                tool_call_id,
                content,
            } => Self {
                role: "tool",
                content: Some(content.as_str()),
                tool_calls: None,
                tool_call_id: Some(tool_call_id.as_str()),
            },
        }
    }
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: &'a ToolDefinition,
}

impl<'a> From<&'a ToolDefinition> for WireTool<'a> {
    fn from(function: &'a ToolDefinition) -> Self {
        Self {
            kind: "function",
            function,
        }
    }
}

#[derive(Serialize)]
struct WireResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type", default = "function_kind")]
    kind: String,
    function: WireFunction,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Serialize, Deserialize)]
struct WireFunction {
    name: String,
    #[serde(default)]
    arguments: String,
}

impl From<ToolCall> for WireToolCall {
    fn from(call: ToolCall) -> Self {
        Self {
            id: call.id,
            kind: function_kind(),
            function: WireFunction {
                name: call.name,
                arguments: call.arguments,
            },
        }
    }
}

impl From<WireToolCall> for ToolCall {
    fn from(call: WireToolCall) -> Self {
        ToolCall::new(call.id, call.function.name, call.function.arguments)
    }
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: String,
    #[serde(default)]
    choices: Vec<WireChoice>,
    usage: Option<Value>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct WireResponseMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

impl WireResponse {
    fn into_completion(self) -> Result<ChatCompletion, UpstreamError> {
        let usage = self
            .usage
            .and_then(|u| serde_json::from_value::<TokenUsage>(u).ok())
            .unwrap_or_default();

        let choice = self
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::InvalidResponse("response has no choices".into()))?;

        Ok(ChatCompletion {
            content: choice.message.content,
            tool_calls: choice
                .message
                .tool_calls
                .into_iter()
                .map(ToolCall::from)
                .collect(),
            model: self.model,
            usage,
            finish_reason: choice.finish_reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckhand::{save_startup_data_tool, Retryable};
    use serde_json::json;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(base_url: String) -> OpenAiChatClient {
        OpenAiChatClient::new(&OpenAiConfig {
            api_key: "sk-test".to_string(),
            base_url,
            model: "gpt-5-mini".to_string(),
            http_timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn request() -> ChatRequest {
        ChatRequest::new(
            "be helpful",
            vec![
                Message::user("We are Acme"),
                Message::Assistant {
                    content: None,
                    tool_calls: vec![ToolCall::new(
                        "call_1",
                        "save_startup_data",
                        r#"{"company_name":"Acme"}"#,
                    )],
                },
                Message::Tool {
                    tool_call_id: "call_1".to_string(),
                    content: r#"{"success":true}"#.to_string(),
                },
            ],
        )
        .with_tools(vec![save_startup_data_tool()])
        .with_max_completion_tokens(1024)
    }

    #[tokio::test]
    async fn test_complete_parses_tool_calls() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .and(body_partial_json(json!({
                "model": "gpt-5-mini",
                "max_completion_tokens": 1024,
                "tools": [{"type": "function", "function": {"name": "save_startup_data"}}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "chatcmpl-1",
                "model": "gpt-5-mini",
                "choices": [{
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": null,
                        "tool_calls": [{
                            "id": "call_2",
                            "type": "function",
                            "function": {
                                "name": "save_startup_data",
                                "arguments": "{\"industry\":\"fintech\"}"
                            }
                        }]
                    },
                    "finish_reason": "tool_calls"
                }],
                "usage": {"prompt_tokens": 10, "completion_tokens": 5, "total_tokens": 15}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let completion = client(server.uri()).complete(&request()).await.unwrap();

        assert_eq!(completion.content, None);
        assert_eq!(
            completion.tool_calls,
            vec![ToolCall::new(
                "call_2",
                "save_startup_data",
                r#"{"industry":"fintech"}"#
            )]
        );
        assert_eq!(completion.usage.total_tokens, 15);
        assert_eq!(completion.finish_reason.as_deref(), Some("tool_calls"));
    }

    #[test]
    fn test_wire_messages_keep_roles_and_pairing() {
        let client = client("http://localhost".to_string());
        let request = request();
        let wire = serde_json::to_value(client.wire_request(&request)).unwrap();

        let messages = wire["messages"].as_array().unwrap();
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["role"], "user");
        assert_eq!(messages[2]["role"], "assistant");
        assert_eq!(messages[2]["content"], Value::Null);
        assert_eq!(messages[2]["tool_calls"][0]["id"], "call_1");
        assert_eq!(messages[3]["role"], "tool");
        assert_eq!(messages[3]["tool_call_id"], "call_1");
        assert!(wire.get("response_format").is_none());
    }

    #[test]
    fn test_json_object_format_requested() {
        let client = client("http://localhost".to_string());
        let request = ChatRequest::new("deck", vec![Message::user("go")])
            .with_response_format(ResponseFormat::JsonObject);
        let wire = serde_json::to_value(client.wire_request(&request)).unwrap();

        assert_eq!(wire["response_format"], json!({"type": "json_object"}));
        assert!(wire.get("tools").is_none());
    }

    #[tokio::test]
    async fn test_status_errors_are_classified() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .expect(1)
            .mount(&server)
            .await;

        let err = client(server.uri()).complete(&request()).await.unwrap_err();

        assert_eq!(err, UpstreamError::status(429, "rate limited"));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_empty_choices_is_invalid_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(server.uri()).complete(&request()).await.unwrap_err();

        assert!(matches!(err, UpstreamError::InvalidResponse(_)));
    }
}
