//! Tool-Call Protocol Adapter
//!
//! Turns `save_startup_data` invocations into a merge against the
//! collected data, and produces exactly one acknowledgement per tool call
//! id. The chat-completion service rejects a transcript where any tool call
//! lacks its reply, so malformed calls are acknowledged too.

use std::collections::BTreeMap;

use serde_json::{json, Value};
use thiserror::Error;

use crate::domain::entities::{Message, ToolCall, ToolDefinition};
use crate::domain::value_objects::{CollectedData, StartupField};

/// Name of the data-saving tool advertised to the chat-completion service
pub const SAVE_STARTUP_DATA: &str = "save_startup_data";

/// Why a tool call contributed no data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("No recognized fields in tool arguments")]
    NoRecognizedFields,
}

/// Definition of `save_startup_data`: every schema field, optional, string-typed
pub fn save_startup_data_tool() -> ToolDefinition {
    let properties: serde_json::Map<String, Value> = StartupField::REQUIRED
        .iter()
        .map(|field| {
            (
                field.as_str().to_string(),
                json!({"type": "string", "description": field.description()}),
            )
        })
        .collect();

    ToolDefinition {
        name: SAVE_STARTUP_DATA.to_string(),
        description: "Save extracted startup information to database".to_string(),
        parameters: json!({
            "type": "object",
            "properties": properties,
        }),
    }
}

/// Typed partial record parsed from `save_startup_data` arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartupDataPatch {
    fields: BTreeMap<StartupField, String>,
}

impl StartupDataPatch {
    /// Strict parse: a JSON object whose known keys carry non-blank strings.
    ///
    /// Unknown keys, non-string values and blank strings are discarded.
    pub fn parse(arguments: &str) -> Result<Self, ToolCallError> {
        let value: Value = serde_json::from_str(arguments)
            .map_err(|e| ToolCallError::InvalidArguments(e.to_string()))?;

        let Value::Object(object) = value else {
            return Err(ToolCallError::InvalidArguments(
                "arguments must be a JSON object".to_string(),
            ));
        };

        let mut fields = BTreeMap::new();
        for (key, value) in object {
            let Ok(field) = key.parse::<StartupField>() else {
                tracing::debug!("Discarding unknown tool argument key: {}", key);
                continue;
            };
            match value {
                Value::String(s) if !s.trim().is_empty() => {
                    fields.insert(field, s);
                }
                Value::String(_) => {
                    tracing::debug!("Discarding blank value for {}", field);
                }
                other => {
                    tracing::debug!("Discarding non-string value for {}: {}", field, other);
                }
            }
        }

        if fields.is_empty() {
            return Err(ToolCallError::NoRecognizedFields);
        }

        Ok(Self { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: StartupField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    /// Overwrite `data` with every field in this patch
    pub fn apply_to(&self, data: &mut CollectedData) {
        for (field, value) in &self.fields {
            data.insert(field.as_str(), value.clone());
        }
    }
}

/// One processed assistant tool-call message.
///
/// Holds the assistant message, its acknowledgements (same order, one per
/// call) and the merged data. Only [`apply_tool_calls`] builds it.
#[derive(Debug, Clone)]
pub struct ToolRound {
    request: Message,
    acknowledgements: Vec<Message>,
    data: CollectedData,
    applied: usize,
}

impl ToolRound {
    pub fn request(&self) -> &Message {
        &self.request
    }

    pub fn acknowledgements(&self) -> &[Message] {
        &self.acknowledgements
    }

    /// Collected data after merging every valid call
    pub fn data(&self) -> &CollectedData {
        &self.data
    }

    /// Number of calls whose data was merged
    pub fn applied(&self) -> usize {
        self.applied
    }

    pub(crate) fn into_parts(self) -> (Message, Vec<Message>, CollectedData) {
        (self.request, self.acknowledgements, self.data)
    }
}

/// Merge every tool call into `current`, in order (later calls win), and
/// acknowledge each call by id.
pub fn apply_tool_calls(
    current: &CollectedData,
    content: Option<String>,
    tool_calls: Vec<ToolCall>,
) -> ToolRound {
    let mut data = current.clone();
    let mut acknowledgements = Vec::with_capacity(tool_calls.len());
    let mut applied = 0;

    for call in &tool_calls {
        let outcome = parse_call(call).map(|patch| {
            patch.apply_to(&mut data);
            patch.len()
        });

        let payload = match outcome {
            Ok(count) => {
                applied += 1;
                tracing::info!("Tool {} saved {} field(s)", call.id, count);
                json!({"success": true, "message": "Data saved successfully"})
            }
            Err(e) => {
                tracing::warn!("Tool {} ({}) skipped: {}", call.id, call.name, e);
                json!({"success": false, "message": e.to_string()})
            }
        };

        acknowledgements.push(Message::Tool {
            tool_call_id: call.id.clone(),
            content: payload.to_string(),
        });
    }

    ToolRound {
        request: Message::Assistant {
            content,
            tool_calls,
        },
        acknowledgements,
        data,
        applied,
    }
}

fn parse_call(call: &ToolCall) -> Result<StartupDataPatch, ToolCallError> {
    if call.name != SAVE_STARTUP_DATA {
        return Err(ToolCallError::UnknownTool(call.name.clone()));
    }
    StartupDataPatch::parse(&call.arguments)
}
