//! Agent state models
//!
//! Typed view of the payloads returned by the agent server. Decoding is
//! lenient: JSON-encoded tool arguments and outputs are parsed here once, and
//! anything malformed is kept in a raw form instead of failing the whole
//! state. Rendering code never parses JSON itself.

use crate::constants::{ASK_HUMAN_TOOL, FALLBACK_QUESTION, NO_PROMPT};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value};

/// Unique identifier for an agent run
pub type AgentId = String;

/// Agent status as reported by the server
///
/// Unrecognised strings decode to [`AgentStatus::Unknown`] so a newer server
/// never breaks the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentStatus {
    /// Agent is executing steps
    Running,
    /// Agent asked a question and is blocked until an answer arrives
    WaitingHumanInput,
    /// Agent produced a final answer
    Complete,
    /// Agent stopped with an error
    Failed,
    /// Agent hit its step budget
    MaxStepsReached,
    /// Agent was paused by a client
    Paused,
    /// Any status this client does not know about
    Unknown(String),
}

impl AgentStatus {
    /// Wire representation of the status
    pub fn as_str(&self) -> &str {
        match self {
            AgentStatus::Running => "running",
            AgentStatus::WaitingHumanInput => "waiting_human_input",
            AgentStatus::Complete => "complete",
            AgentStatus::Failed => "failed",
            AgentStatus::MaxStepsReached => "max_steps_reached",
            AgentStatus::Paused => "paused",
            AgentStatus::Unknown(raw) => raw,
        }
    }

    /// Human-readable label used by the status badge
    pub fn label(&self) -> &str {
        match self {
            AgentStatus::Running => "Running",
            AgentStatus::WaitingHumanInput => "Waiting for Input",
            AgentStatus::Complete => "Complete",
            AgentStatus::Failed => "Failed",
            AgentStatus::MaxStepsReached => "Max Steps Reached",
            AgentStatus::Paused => "Paused",
            AgentStatus::Unknown(raw) => raw,
        }
    }

    /// Terminal statuses never make progress again
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AgentStatus::Complete | AgentStatus::Failed | AgentStatus::MaxStepsReached
        )
    }

    /// Whether the agent is blocked on a human answer
    pub fn awaits_input(&self) -> bool {
        matches!(self, AgentStatus::WaitingHumanInput)
    }

    /// Pause is offered only while the agent runs
    pub fn can_pause(&self) -> bool {
        matches!(self, AgentStatus::Running)
    }

    /// Resume is offered for stopped runs that can still make progress
    ///
    /// `max_steps_reached` is terminal for polling but the server accepts a
    /// resume for it, granting another step budget.
    pub fn can_resume(&self) -> bool {
        !matches!(
            self,
            AgentStatus::Running
                | AgentStatus::WaitingHumanInput
                | AgentStatus::Complete
                | AgentStatus::Failed
        )
    }
}

/// A payload without a status decodes as an empty `Unknown`, never as running
impl Default for AgentStatus {
    fn default() -> Self {
        AgentStatus::Unknown(String::new())
    }
}

impl From<String> for AgentStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "running" => AgentStatus::Running,
            "waiting_human_input" => AgentStatus::WaitingHumanInput,
            "complete" => AgentStatus::Complete,
            "failed" => AgentStatus::Failed,
            "max_steps_reached" => AgentStatus::MaxStepsReached,
            "paused" => AgentStatus::Paused,
            _ => AgentStatus::Unknown(raw),
        }
    }
}

impl From<&str> for AgentStatus {
    fn from(raw: &str) -> Self {
        AgentStatus::from(raw.to_string())
    }
}

impl From<AgentStatus> for String {
    fn from(status: AgentStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arguments of a tool call
///
/// The server sends arguments either as a JSON-encoded string or as an
/// object. Strings that do not decode to an object are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ToolArguments {
    /// Decoded argument mapping
    Structured(Map<String, Value>),
    /// Raw text that could not be decoded into a mapping
    Unparsed(String),
}

impl ToolArguments {
    /// Look up a single argument
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            ToolArguments::Structured(map) => map.get(key),
            ToolArguments::Unparsed(_) => None,
        }
    }
}

impl Default for ToolArguments {
    fn default() -> Self {
        ToolArguments::Structured(Map::new())
    }
}

impl From<Value> for ToolArguments {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) => ToolArguments::Structured(map),
            Value::Null => ToolArguments::default(),
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => ToolArguments::Structured(map),
                _ => ToolArguments::Unparsed(raw),
            },
            other => ToolArguments::Unparsed(other.to_string()),
        }
    }
}

impl From<ToolArguments> for Value {
    fn from(args: ToolArguments) -> Self {
        match args {
            ToolArguments::Structured(map) => Value::Object(map),
            ToolArguments::Unparsed(raw) => Value::String(raw),
        }
    }
}

/// Output of a tool call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ToolOutput {
    /// Decoded JSON value
    Structured(Value),
    /// Raw text that is not valid JSON
    Raw(String),
}

impl Default for ToolOutput {
    fn default() -> Self {
        ToolOutput::Structured(Value::Null)
    }
}

impl From<Value> for ToolOutput {
    fn from(value: Value) -> Self {
        match value {
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed) => ToolOutput::Structured(parsed),
                Err(_) => ToolOutput::Raw(raw),
            },
            other => ToolOutput::Structured(other),
        }
    }
}

impl From<ToolOutput> for Value {
    fn from(output: ToolOutput) -> Self {
        match output {
            ToolOutput::Structured(value) => value,
            ToolOutput::Raw(raw) => Value::String(raw),
        }
    }
}

/// A tool invocation recorded by the agent
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionCallEntry {
    /// Tool name
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Identifier pairing the call with its output
    #[serde(default, deserialize_with = "null_as_default")]
    pub call_id: String,
    /// Decoded arguments
    #[serde(default)]
    pub arguments: ToolArguments,
}

/// The result of a tool invocation
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionCallOutputEntry {
    /// Identifier of the call this output answers
    #[serde(default, deserialize_with = "null_as_default")]
    pub call_id: String,
    /// Decoded output
    #[serde(default)]
    pub output: ToolOutput,
}

/// Role of a conversational message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message from the user
    User,
    /// Message from the assistant
    Assistant,
}

impl Role {
    /// Convert the role to its string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One element of an agent's execution transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ContextEntry {
    /// Bare string entry
    Text(String),
    /// User or assistant message
    Message {
        /// Who wrote the message
        role: Role,
        /// Message body; non-string bodies are kept as JSON text
        content: String,
    },
    /// Tool invocation
    FunctionCall(FunctionCallEntry),
    /// Tool result
    FunctionCallOutput(FunctionCallOutputEntry),
    /// Anything else, kept verbatim
    Other(Value),
}

impl ContextEntry {
    /// Build a user message entry
    pub fn user(content: impl Into<String>) -> Self {
        ContextEntry::Message {
            role: Role::User,
            content: content.into(),
        }
    }

    /// Build an assistant message entry
    pub fn assistant(content: impl Into<String>) -> Self {
        ContextEntry::Message {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    /// Textual `content` of the entry, if it carries one
    pub fn content(&self) -> Option<&str> {
        match self {
            ContextEntry::Message { content, .. } => Some(content),
            ContextEntry::Other(value) => value.get("content").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl From<Value> for ContextEntry {
    fn from(value: Value) -> Self {
        if let Value::String(text) = value {
            return ContextEntry::Text(text);
        }

        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        match kind.as_deref() {
            Some("function_call") => {
                return match serde_json::from_value::<FunctionCallEntry>(value.clone()) {
                    Ok(call) => ContextEntry::FunctionCall(call),
                    Err(_) => ContextEntry::Other(value),
                };
            }
            Some("function_call_output") => {
                return match serde_json::from_value::<FunctionCallOutputEntry>(value.clone()) {
                    Ok(output) => ContextEntry::FunctionCallOutput(output),
                    Err(_) => ContextEntry::Other(value),
                };
            }
            _ => {}
        }

        let role = match value.get("role").and_then(Value::as_str) {
            Some("user") => Some(Role::User),
            Some("assistant") => Some(Role::Assistant),
            _ => None,
        };
        match role {
            Some(role) => {
                let content = match value.get("content") {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Null) | None => String::new(),
                    Some(other) => other.to_string(),
                };
                ContextEntry::Message { role, content }
            }
            None => ContextEntry::Other(value),
        }
    }
}

impl From<ContextEntry> for Value {
    fn from(entry: ContextEntry) -> Self {
        match entry {
            ContextEntry::Text(text) => Value::String(text),
            ContextEntry::Message { role, content } => json!({
                "role": role.as_str(),
                "content": content,
            }),
            ContextEntry::FunctionCall(call) => json!({
                "type": "function_call",
                "name": call.name,
                "call_id": call.call_id,
                "arguments": Value::from(call.arguments),
            }),
            ContextEntry::FunctionCallOutput(output) => json!({
                "type": "function_call_output",
                "call_id": output.call_id,
                "output": Value::from(output.output),
            }),
            ContextEntry::Other(value) => value,
        }
    }
}

/// Snapshot of one agent run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Opaque run identifier
    pub id: AgentId,
    /// Current lifecycle status
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: AgentStatus,
    /// Number of steps executed so far
    #[serde(default, deserialize_with = "null_as_default")]
    pub steps: u64,
    /// Execution transcript, oldest first
    #[serde(default, deserialize_with = "null_as_default")]
    pub context: Vec<ContextEntry>,
    /// Tool calls the agent issued but has not resolved yet
    #[serde(default, deserialize_with = "null_as_default")]
    pub pending_tool_calls: Vec<FunctionCallEntry>,
    /// Answer produced by a completed run
    #[serde(default)]
    pub final_answer: Option<String>,
    /// Error text of a failed run
    #[serde(default)]
    pub error: Option<String>,
}

impl AgentState {
    /// Create an empty state with the given id and status
    pub fn new(id: impl Into<AgentId>, status: AgentStatus) -> Self {
        Self {
            id: id.into(),
            status,
            steps: 0,
            context: Vec::new(),
            pending_tool_calls: Vec::new(),
            final_answer: None,
            error: None,
        }
    }

    /// Best guess at the prompt that started this run
    ///
    /// Prefers the first user message (or a bare string mentioning "user"),
    /// then the content of the first entry, then a placeholder.
    pub fn initial_prompt(&self) -> &str {
        let first_user = self.context.iter().find(|entry| match entry {
            ContextEntry::Message { role, .. } => *role == Role::User,
            ContextEntry::Text(text) => text.contains("user"),
            ContextEntry::Other(value) => value.get("role").and_then(Value::as_str) == Some("user"),
            _ => false,
        });

        match first_user {
            Some(ContextEntry::Text(text)) => return text,
            Some(entry) => {
                if let Some(content) = entry.content().filter(|c| !c.is_empty()) {
                    return content;
                }
            }
            None => {}
        }

        self.context
            .first()
            .and_then(ContextEntry::content)
            .filter(|c| !c.is_empty())
            .unwrap_or(NO_PROMPT)
    }

    /// Question of the most recent `ask_human` call, scanning from the end
    ///
    /// Returns `None` when the context holds no such call. A call whose
    /// arguments did not decode, or that has no usable `question`, yields
    /// the fallback prompt.
    pub fn pending_question(&self) -> Option<String> {
        self.context.iter().rev().find_map(|entry| match entry {
            ContextEntry::FunctionCall(call) if call.name == ASK_HUMAN_TOOL => {
                Some(question_from(&call.arguments))
            }
            _ => None,
        })
    }

    /// Question to show for a `waiting_human_input` state
    pub fn human_input_question(&self) -> String {
        self.pending_question()
            .unwrap_or_else(|| FALLBACK_QUESTION.to_string())
    }
}

fn question_from(arguments: &ToolArguments) -> String {
    match arguments.get("question") {
        Some(Value::String(q)) if !q.trim().is_empty() => q.clone(),
        _ => FALLBACK_QUESTION.to_string(),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
