//! Polling controller
//!
//! Tracks at most one agent at a time. Arming the controller spawns a tokio
//! task that fetches the agent's state on a fixed interval and hands every
//! result to a sink; arming again aborts the previous task first
//! (last-writer-wins). Each arm gets a new generation number so updates that
//! were already queued by an aborted task are recognised as stale.
//!
//! The task stops by itself once it observes a status that halts polling
//! (terminal, or waiting for human input). Fetch errors are logged and the
//! next tick simply tries again.

use crate::api_client::AgentApi;
use crate::models::{AgentId, AgentState, AgentStatus};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// Receives every state fetched by the polling task
pub type PollSink = Arc<dyn Fn(PollUpdate) + Send + Sync>;

/// A state fetched by a polling task
#[derive(Debug, Clone, PartialEq)]
pub struct PollUpdate {
    /// Generation of the arm that produced this update
    pub generation: u64,
    /// Fetched state
    pub state: AgentState,
}

/// What a fetched state means for the polling lifecycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Keep polling
    Continue,
    /// Stop polling and ask the user this question
    AwaitInput {
        /// Question extracted from the latest `ask_human` call
        question: String,
    },
    /// Stop polling; the agent reached a terminal status
    Finished(AgentStatus),
}

impl PollDecision {
    /// Classify a fetched state
    pub fn for_state(state: &AgentState) -> Self {
        if state.status.awaits_input() {
            PollDecision::AwaitInput {
                question: state.human_input_question(),
            }
        } else if state.status.is_terminal() {
            PollDecision::Finished(state.status.clone())
        } else {
            PollDecision::Continue
        }
    }

    /// Whether this decision ends the polling lifecycle
    pub fn halts(&self) -> bool {
        !matches!(self, PollDecision::Continue)
    }
}

/// Observable state of the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollPhase {
    /// No timer is armed
    Idle,
    /// A timer is armed for one agent
    Polling {
        /// Agent being polled
        agent_id: AgentId,
        /// Generation of the current arm
        generation: u64,
    },
}

struct ActivePoll {
    agent_id: AgentId,
    generation: u64,
    handle: JoinHandle<()>,
}

/// Single-timer polling state machine
pub struct PollingController {
    api: Arc<dyn AgentApi>,
    runtime: Handle,
    interval: Duration,
    sink: PollSink,
    generation: u64,
    active: Option<ActivePoll>,
}

impl PollingController {
    /// Create an idle controller
    ///
    /// Polling tasks are spawned on `runtime`; every fetched state is passed
    /// to `sink`.
    pub fn new(api: Arc<dyn AgentApi>, runtime: Handle, interval: Duration, sink: PollSink) -> Self {
        Self {
            api,
            runtime,
            interval,
            sink,
            generation: 0,
            active: None,
        }
    }

    /// Start polling `agent_id`, cancelling any previous timer
    ///
    /// The first fetch happens one interval after arming. Returns the
    /// generation of the new arm.
    pub fn arm(&mut self, agent_id: &str) -> u64 {
        self.cancel();
        self.generation += 1;
        let generation = self.generation;

        let handle = self.runtime.spawn(poll_loop(
            Arc::clone(&self.api),
            agent_id.to_string(),
            generation,
            self.interval,
            Arc::clone(&self.sink),
        ));

        tracing::debug!(agent_id = %agent_id, generation, "Polling armed");
        self.active = Some(ActivePoll {
            agent_id: agent_id.to_string(),
            generation,
            handle,
        });
        generation
    }

    /// Stop the active timer, if any
    pub fn cancel(&mut self) {
        if let Some(active) = self.active.take() {
            active.handle.abort();
            tracing::debug!(
                agent_id = %active.agent_id,
                generation = active.generation,
                "Polling cancelled"
            );
        }
    }

    /// Apply a fetched state to the state machine
    ///
    /// Returns `None` for updates from a cancelled or superseded arm. A
    /// halting decision moves the controller back to idle.
    pub fn accept(&mut self, update: &PollUpdate) -> Option<PollDecision> {
        let current = self.active.as_ref().map(|a| a.generation);
        if current != Some(update.generation) {
            tracing::debug!(
                generation = update.generation,
                current = ?current,
                "Discarding stale poll update"
            );
            return None;
        }

        let decision = PollDecision::for_state(&update.state);
        if decision.halts() {
            tracing::debug!(
                agent_id = %update.state.id,
                status = %update.state.status,
                "Polling halted"
            );
            self.active = None;
        }
        Some(decision)
    }

    /// Current phase
    pub fn phase(&self) -> PollPhase {
        match &self.active {
            Some(active) => PollPhase::Polling {
                agent_id: active.agent_id.clone(),
                generation: active.generation,
            },
            None => PollPhase::Idle,
        }
    }

    /// Whether a timer is armed
    pub fn is_polling(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for PollingController {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn poll_loop(
    api: Arc<dyn AgentApi>,
    agent_id: AgentId,
    generation: u64,
    interval: Duration,
    sink: PollSink,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match api.get_state(&agent_id).await {
            Ok(state) => {
                let halts = PollDecision::for_state(&state).halts();
                sink(PollUpdate { generation, state });
                if halts {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!(agent_id = %agent_id, error = %e, "Error polling agent state");
            }
        }
    }
}
