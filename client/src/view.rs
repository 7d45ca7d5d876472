//! View helpers
//!
//! Framework-independent description of what each dashboard component shows.
//! The GUI only maps these structures onto widgets, so every formatting rule
//! lives (and is tested) here.

use crate::constants::{CALL_ID_SNIPPET_LEN, ID_SNIPPET_LEN, PROMPT_SNIPPET_LEN};
use crate::models::{AgentId, AgentState, AgentStatus, ContextEntry, Role, ToolArguments, ToolOutput};
use crate::store::AgentStore;
use serde_json::Value;

/// An sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Color for statuses without a dedicated one
pub const NEUTRAL: Rgb = Rgb(0x6b, 0x72, 0x80);

/// Fixed status to color mapping shared by the history list and the badge
pub fn status_color(status: &AgentStatus) -> Rgb {
    match status {
        AgentStatus::Running => Rgb(0x3b, 0x82, 0xf6),
        AgentStatus::Complete => Rgb(0x10, 0xb9, 0x81),
        AgentStatus::Failed => Rgb(0xef, 0x44, 0x44),
        AgentStatus::WaitingHumanInput => Rgb(0xf5, 0x9e, 0x0b),
        AgentStatus::MaxStepsReached => Rgb(0x8b, 0x5c, 0xf6),
        AgentStatus::Paused | AgentStatus::Unknown(_) => NEUTRAL,
    }
}

/// First `max` characters of `text`, with `...` appended when cut
pub fn truncate(text: &str, max: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// Abbreviated agent id for the history list
pub fn short_id(id: &str) -> String {
    truncate(id, ID_SNIPPET_LEN)
}

/// `#` followed by the first characters of a call id
pub fn short_call_id(call_id: &str) -> String {
    format!("#{}", call_id.chars().take(CALL_ID_SNIPPET_LEN).collect::<String>())
}

/// Initial prompt of a run, cut to the history list width
pub fn prompt_snippet(state: &AgentState) -> String {
    truncate(state.initial_prompt(), PROMPT_SNIPPET_LEN)
}

/// Render a JSON value the way it reads inline: strings bare, the rest as JSON
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Compact `key: value, key: value` rendering of tool arguments
///
/// Nested objects and arrays are JSON-encoded; undecodable arguments are
/// shown as received.
pub fn format_arguments(arguments: &ToolArguments) -> String {
    match arguments {
        ToolArguments::Structured(map) => map
            .iter()
            .map(|(key, value)| format!("{}: {}", key, value_text(value)))
            .collect::<Vec<_>>()
            .join(", "),
        ToolArguments::Unparsed(raw) => raw.clone(),
    }
}

/// Compact rendering of a tool output
///
/// Objects show their `result` field, else their `answer` field, else the
/// whole object as JSON.
pub fn format_output(output: &ToolOutput) -> String {
    match output {
        ToolOutput::Structured(Value::Object(map)) => {
            if let Some(result) = map.get("result") {
                value_text(result)
            } else if let Some(answer) = map.get("answer") {
                value_text(answer)
            } else {
                Value::Object(map.clone()).to_string()
            }
        }
        ToolOutput::Structured(other) => value_text(other),
        ToolOutput::Raw(raw) => raw.clone(),
    }
}

/// One row of the history list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRow {
    /// Full agent id, used for selection
    pub id: AgentId,
    /// Abbreviated id
    pub short_id: String,
    /// Initial prompt snippet
    pub prompt: String,
    /// Step count
    pub steps: u64,
    /// Raw status text
    pub status_text: String,
    /// Status color
    pub color: Rgb,
    /// Whether this row is the selected agent
    pub selected: bool,
}

/// Rows of the history list, in store order
pub fn history_rows(store: &AgentStore) -> Vec<HistoryRow> {
    let selected = store.selected_id();
    store
        .agents()
        .iter()
        .map(|agent| HistoryRow {
            id: agent.id.clone(),
            short_id: short_id(&agent.id),
            prompt: prompt_snippet(agent),
            steps: agent.steps,
            status_text: agent.status.as_str().to_string(),
            color: status_color(&agent.status),
            selected: selected == Some(agent.id.as_str()),
        })
        .collect()
}

/// Content of the status panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusPanel {
    /// Badge label
    pub label: String,
    /// Badge color
    pub color: Rgb,
    /// `Step N`
    pub steps_text: String,
    /// Final answer, when present and non-empty
    pub final_answer: Option<String>,
    /// Error text, when present and non-empty
    pub error: Option<String>,
}

/// Build the status panel for an agent
pub fn status_panel(state: &AgentState) -> StatusPanel {
    StatusPanel {
        label: state.status.label().to_string(),
        color: status_color(&state.status),
        steps_text: format!("Step {}", state.steps),
        final_answer: state.final_answer.clone().filter(|a| !a.is_empty()),
        error: state.error.clone().filter(|e| !e.is_empty()),
    }
}

/// One element of the execution trace
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceItem {
    /// Plain text entry
    Text(String),
    /// Tool invocation
    Call {
        /// Tool name
        name: String,
        /// Abbreviated call id
        call_id: String,
        /// Compact arguments
        arguments: String,
    },
    /// Tool result
    Output {
        /// Abbreviated call id
        call_id: String,
        /// Compact output
        text: String,
    },
    /// User or assistant message
    Message {
        /// `User` or `Assistant`
        speaker: &'static str,
        /// Message body
        content: String,
    },
    /// Anything else, as JSON
    Raw(String),
}

/// Describe one context entry
pub fn trace_item(entry: &ContextEntry) -> TraceItem {
    match entry {
        ContextEntry::Text(text) => TraceItem::Text(text.clone()),
        ContextEntry::FunctionCall(call) => TraceItem::Call {
            name: call.name.clone(),
            call_id: short_call_id(&call.call_id),
            arguments: format_arguments(&call.arguments),
        },
        ContextEntry::FunctionCallOutput(output) => TraceItem::Output {
            call_id: short_call_id(&output.call_id),
            text: format_output(&output.output),
        },
        ContextEntry::Message { role, content } => TraceItem::Message {
            speaker: match role {
                Role::User => "User",
                Role::Assistant => "Assistant",
            },
            content: content.clone(),
        },
        ContextEntry::Other(value) => TraceItem::Raw(value.to_string()),
    }
}

/// Describe the whole execution context
pub fn trace_items(state: &AgentState) -> Vec<TraceItem> {
    state.context.iter().map(trace_item).collect()
}

/// One entry of the pending tool calls section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingCall {
    /// Tool name
    pub name: String,
    /// Compact arguments
    pub arguments: String,
}

/// Describe the pending tool calls
pub fn pending_calls(state: &AgentState) -> Vec<PendingCall> {
    state
        .pending_tool_calls
        .iter()
        .map(|call| PendingCall {
            name: call.name.clone(),
            arguments: format_arguments(&call.arguments),
        })
        .collect()
}

/// Free-text draft behind the launch form and the input dialog
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptDraft {
    /// Current text, edited in place by the widget
    pub text: String,
}

impl PromptDraft {
    /// Whether the draft holds something other than whitespace
    pub fn can_submit(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Take the trimmed text and clear the draft
    ///
    /// Returns `None` and leaves the draft untouched when it is blank.
    pub fn take(&mut self) -> Option<String> {
        if !self.can_submit() {
            return None;
        }
        let submitted = self.text.trim().to_string();
        self.text.clear();
        Some(submitted)
    }

    /// Discard the draft
    pub fn clear(&mut self) {
        self.text.clear();
    }
}
