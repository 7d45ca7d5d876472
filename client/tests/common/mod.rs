//! In-memory agent server shared by the integration tests
//!
//! Mimics the lifecycle rules of the real backend closely enough to drive a
//! [`Dashboard`](agent_dashboard_client::Dashboard) end to end without HTTP.

#![allow(dead_code)]

use agent_dashboard_client::models::{
    ContextEntry, FunctionCallEntry, FunctionCallOutputEntry, ToolArguments, ToolOutput,
};
use agent_dashboard_client::{AgentApi, AgentState, AgentStatus, ClientError};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

#[derive(Default)]
struct Inner {
    next_id: usize,
    agents: HashMap<String, AgentState>,
    upcoming: HashMap<String, VecDeque<AgentState>>,
    failing_gets: HashMap<String, usize>,
    calls: Vec<String>,
    answers: Vec<(String, String)>,
}

/// Fake agent server implementing [`AgentApi`]
#[derive(Default)]
pub struct FakeAgentServer {
    inner: Mutex<Inner>,
}

impl FakeAgentServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an agent as-is
    pub fn insert(&self, state: AgentState) {
        let mut inner = self.inner.lock().unwrap();
        inner.agents.insert(state.id.clone(), state);
    }

    /// Queue states that successive `get_state` calls will move through
    pub fn queue(&self, id: &str, states: Vec<AgentState>) {
        let mut inner = self.inner.lock().unwrap();
        inner
            .upcoming
            .entry(id.to_string())
            .or_default()
            .extend(states);
    }

    /// Make the next `count` fetches of `id` fail with a 500
    pub fn fail_gets(&self, id: &str, count: usize) {
        let mut inner = self.inner.lock().unwrap();
        inner.failing_gets.insert(id.to_string(), count);
    }

    /// Every call received, as `operation:id`
    pub fn calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Number of `get_state` calls for `id`
    pub fn fetches_of(&self, id: &str) -> usize {
        let needle = format!("get_state:{}", id);
        self.calls().iter().filter(|c| **c == needle).count()
    }

    /// Answers received through `provide_input`
    pub fn answers(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().answers.clone()
    }

    /// Current stored state of `id`
    pub fn state(&self, id: &str) -> Option<AgentState> {
        self.inner.lock().unwrap().agents.get(id).cloned()
    }
}

fn not_found() -> ClientError {
    ClientError::Http {
        status: 404,
        detail: "State not found".to_string(),
    }
}

#[async_trait]
impl AgentApi for FakeAgentServer {
    async fn launch(&self, prompt: &str) -> Result<AgentState, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_id += 1;
        let id = format!("agent-{}", inner.next_id);
        inner.calls.push(format!("launch:{}", id));

        let mut state = AgentState::new(id.clone(), AgentStatus::Running);
        state.context.push(ContextEntry::user(prompt));
        inner.agents.insert(id, state.clone());
        Ok(state)
    }

    async fn get_state(&self, id: &str) -> Result<AgentState, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("get_state:{}", id));

        if let Some(remaining) = inner.failing_gets.get_mut(id) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(ClientError::Http {
                    status: 500,
                    detail: "Internal Server Error".to_string(),
                });
            }
        }

        let next = inner.upcoming.get_mut(id).and_then(VecDeque::pop_front);
        if let Some(next) = next {
            inner.agents.insert(id.to_string(), next);
        }
        inner.agents.get(id).cloned().ok_or_else(not_found)
    }

    async fn resume(&self, id: &str) -> Result<AgentState, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("resume:{}", id));
        let state = inner.agents.get_mut(id).ok_or_else(not_found)?;
        match state.status {
            AgentStatus::Running => Err(ClientError::Http {
                status: 409,
                detail: "Agent is already running for this state".to_string(),
            }),
            AgentStatus::WaitingHumanInput => Err(ClientError::Http {
                status: 400,
                detail: "Agent is waiting for human input".to_string(),
            }),
            _ => {
                state.error = None;
                state.status = AgentStatus::Running;
                Ok(state.clone())
            }
        }
    }

    async fn pause(&self, id: &str) -> Result<AgentState, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("pause:{}", id));
        let state = inner.agents.get_mut(id).ok_or_else(not_found)?;
        state.status = AgentStatus::Paused;
        Ok(state.clone())
    }

    async fn provide_input(&self, id: &str, answer: &str) -> Result<AgentState, ClientError> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(format!("provide_input:{}", id));
        let state = inner.agents.get_mut(id).ok_or_else(not_found)?;
        if state.status != AgentStatus::WaitingHumanInput {
            return Err(ClientError::Http {
                status: 400,
                detail: format!(
                    "State is not waiting for human input. Current status: {}",
                    state.status
                ),
            });
        }

        let call_id = state
            .context
            .iter()
            .rev()
            .find_map(|entry| match entry {
                ContextEntry::FunctionCall(call) if call.name == "ask_human" => {
                    Some(call.call_id.clone())
                }
                _ => None,
            })
            .unwrap_or_default();
        state
            .context
            .push(ContextEntry::FunctionCallOutput(FunctionCallOutputEntry {
                call_id,
                output: ToolOutput::from(json!(json!({ "answer": answer }).to_string())),
            }));
        state.status = AgentStatus::Running;
        let returned = state.clone();
        inner.answers.push((id.to_string(), answer.to_string()));
        Ok(returned)
    }
}

/// State with the given status and step count
pub fn step(id: &str, status: AgentStatus, steps: u64) -> AgentState {
    let mut state = AgentState::new(id, status);
    state.steps = steps;
    state
}

/// `waiting_human_input` state whose latest `ask_human` call asks `question`
pub fn asking(id: &str, steps: u64, question: &str) -> AgentState {
    let mut state = step(id, AgentStatus::WaitingHumanInput, steps);
    state.context.push(ContextEntry::user("Convert 100 degrees"));
    state.context.push(ContextEntry::FunctionCall(FunctionCallEntry {
        name: "ask_human".to_string(),
        call_id: format!("call_{}", steps),
        arguments: ToolArguments::from(json!(json!({ "question": question }).to_string())),
    }));
    state
}
