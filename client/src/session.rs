//! Dashboard session state
//!
//! [`Dashboard`] is the single owner of everything the dashboard shows: the
//! agent history, the selected agent, the polling controller, the pending
//! human-input question, the launch-in-flight flag and queued alerts.
//!
//! User actions never block. Each one spawns its API call on the tokio
//! runtime; the result comes back as a [`DashboardEvent`] over a channel and
//! is applied by [`Dashboard::pump`] or [`Dashboard::process_next`] on the
//! owning thread. Poll results travel through the same channel, so updates
//! are reconciled strictly in arrival order.

use crate::api_client::AgentApi;
use crate::constants::POLL_INTERVAL;
use crate::error::ClientError;
use crate::models::{AgentId, AgentState};
use crate::polling::{PollDecision, PollPhase, PollSink, PollUpdate, PollingController};
use crate::store::AgentStore;
use std::collections::VecDeque;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;

/// Result of an asynchronous dashboard operation
#[derive(Debug)]
pub enum DashboardEvent {
    /// `launch` finished
    Launched(Result<AgentState, ClientError>),
    /// `select` finished fetching the agent
    Loaded {
        /// Agent that was requested
        id: AgentId,
        /// Fetch result
        result: Result<AgentState, ClientError>,
    },
    /// `resume` finished
    Resumed(Result<AgentState, ClientError>),
    /// `pause` finished
    Paused(Result<AgentState, ClientError>),
    /// `provide_input` finished
    InputSubmitted {
        /// Agent the answer was sent to
        agent_id: AgentId,
        /// Submission result
        result: Result<AgentState, ClientError>,
    },
    /// The polling task fetched a state
    Polled(PollUpdate),
}

/// A question the agent is waiting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRequest {
    /// Agent that asked
    pub agent_id: AgentId,
    /// Question text
    pub question: String,
}

/// Application state owner for the dashboard
pub struct Dashboard {
    api: Arc<dyn AgentApi>,
    runtime: Handle,
    store: AgentStore,
    poller: PollingController,
    pending_input: Option<InputRequest>,
    launching: bool,
    submitting_input: bool,
    in_flight: usize,
    alerts: VecDeque<String>,
    events_tx: mpsc::UnboundedSender<DashboardEvent>,
    events_rx: mpsc::UnboundedReceiver<DashboardEvent>,
}

impl Dashboard {
    /// Create a dashboard polling at the standard cadence
    pub fn new(api: Arc<dyn AgentApi>, runtime: Handle) -> Self {
        Self::with_interval(api, runtime, POLL_INTERVAL)
    }

    /// Create a dashboard with a custom poll interval
    pub fn with_interval(api: Arc<dyn AgentApi>, runtime: Handle, interval: Duration) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let poll_tx = events_tx.clone();
        let sink: PollSink = Arc::new(move |update| {
            // Receiver only disappears when the dashboard is dropped
            let _ = poll_tx.send(DashboardEvent::Polled(update));
        });
        let poller = PollingController::new(Arc::clone(&api), runtime.clone(), interval, sink);

        Self {
            api,
            runtime,
            store: AgentStore::new(),
            poller,
            pending_input: None,
            launching: false,
            submitting_input: false,
            in_flight: 0,
            alerts: VecDeque::new(),
            events_tx,
            events_rx,
        }
    }

    // ---------------------------------------------------------------------
    // User actions
    // ---------------------------------------------------------------------

    /// Launch a new agent for `prompt`
    ///
    /// Returns `false` without doing anything when the prompt is blank or a
    /// launch is already in flight.
    pub fn launch(&mut self, prompt: &str) -> bool {
        let prompt = prompt.trim();
        if prompt.is_empty() || self.launching {
            return false;
        }
        self.launching = true;

        tracing::info!(prompt_len = prompt.len(), "Launching agent");
        let api = Arc::clone(&self.api);
        let prompt = prompt.to_string();
        self.spawn(async move { DashboardEvent::Launched(api.launch(&prompt).await) });
        true
    }

    /// Select an agent from the history
    ///
    /// The active timer is cancelled right away; polling restarts once the
    /// fresh state arrives, unless that state is terminal.
    pub fn select(&mut self, id: &str) {
        self.poller.cancel();

        let api = Arc::clone(&self.api);
        let id = id.to_string();
        self.spawn(async move {
            let result = api.get_state(&id).await;
            DashboardEvent::Loaded { id, result }
        });
    }

    /// Resume the selected agent
    ///
    /// Returns `false` when nothing is selected.
    pub fn resume(&mut self) -> bool {
        let Some(id) = self.store.selected_id().map(str::to_owned) else {
            return false;
        };

        tracing::info!(agent_id = %id, "Resuming agent");
        let api = Arc::clone(&self.api);
        self.spawn(async move { DashboardEvent::Resumed(api.resume(&id).await) });
        true
    }

    /// Pause the selected agent
    ///
    /// Returns `false` when nothing is selected. Polling keeps running so
    /// the view stays current.
    pub fn pause(&mut self) -> bool {
        let Some(id) = self.store.selected_id().map(str::to_owned) else {
            return false;
        };

        tracing::info!(agent_id = %id, "Pausing agent");
        let api = Arc::clone(&self.api);
        self.spawn(async move { DashboardEvent::Paused(api.pause(&id).await) });
        true
    }

    /// Answer the pending question
    ///
    /// Returns `false` without doing anything when no question is pending,
    /// the answer is blank or a previous answer is still in flight. The
    /// answer is sent trimmed.
    pub fn provide_input(&mut self, answer: &str) -> bool {
        let answer = answer.trim();
        if answer.is_empty() || self.submitting_input {
            return false;
        }
        let Some(request) = self.pending_input.as_ref() else {
            return false;
        };

        let agent_id = request.agent_id.clone();
        self.submitting_input = true;
        tracing::info!(agent_id = %agent_id, "Submitting human input");
        let api = Arc::clone(&self.api);
        let answer = answer.to_string();
        self.spawn(async move {
            let result = api.provide_input(&agent_id, &answer).await;
            DashboardEvent::InputSubmitted { agent_id, result }
        });
        true
    }

    /// Close the input dialog without answering
    pub fn dismiss_input(&mut self) {
        self.pending_input = None;
    }

    /// Stop polling; in-flight requests still complete
    pub fn shutdown(&mut self) {
        self.poller.cancel();
    }

    // ---------------------------------------------------------------------
    // Event processing
    // ---------------------------------------------------------------------

    /// Apply every queued event without blocking
    ///
    /// Returns the number of events applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event and apply it
    pub async fn process_next(&mut self) {
        // The dashboard holds a sender, so the channel never closes here
        if let Some(event) = self.events_rx.recv().await {
            self.apply(event);
        }
    }

    /// Reconcile one event into the dashboard state
    pub fn apply(&mut self, event: DashboardEvent) {
        if !matches!(event, DashboardEvent::Polled(_)) {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        match event {
            DashboardEvent::Launched(result) => {
                self.launching = false;
                match result {
                    Ok(state) => {
                        tracing::info!(agent_id = %state.id, status = %state.status, "Agent launched");
                        let id = state.id.clone();
                        self.store.record_launch(state.clone());
                        self.store.select(state);
                        self.poller.arm(&id);
                    }
                    Err(e) => self.alert("Failed to launch agent", &e),
                }
            }
            DashboardEvent::Loaded { id, result } => match result {
                Ok(state) => {
                    let terminal = state.status.is_terminal();
                    self.store.select(state);
                    if !terminal {
                        self.poller.arm(&id);
                    }
                }
                Err(e) => self.alert("Failed to load agent", &e),
            },
            DashboardEvent::Resumed(result) => match result {
                Ok(state) => {
                    let id = state.id.clone();
                    self.store.reconcile(state);
                    self.poller.arm(&id);
                }
                Err(e) => self.alert("Failed to resume agent", &e),
            },
            DashboardEvent::Paused(result) => match result {
                Ok(state) => {
                    self.store.reconcile(state);
                }
                Err(e) => self.alert("Failed to pause agent", &e),
            },
            DashboardEvent::InputSubmitted { agent_id, result } => {
                self.submitting_input = false;
                match result {
                    Ok(state) => {
                        self.store.reconcile(state);
                        if self.pending_input.as_ref().map(|r| &r.agent_id) == Some(&agent_id) {
                            self.pending_input = None;
                        }
                        self.poller.arm(&agent_id);
                    }
                    Err(e) => self.alert("Failed to provide input", &e),
                }
            }
            DashboardEvent::Polled(update) => {
                let Some(decision) = self.poller.accept(&update) else {
                    return;
                };
                let agent_id = update.state.id.clone();
                self.store.reconcile(update.state);
                if let PollDecision::AwaitInput { question } = decision {
                    tracing::info!(agent_id = %agent_id, "Agent is waiting for human input");
                    self.pending_input = Some(InputRequest { agent_id, question });
                }
            }
        }
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    /// Agent history and selection
    pub fn store(&self) -> &AgentStore {
        &self.store
    }

    /// Currently selected agent
    pub fn selected(&self) -> Option<&AgentState> {
        self.store.selected()
    }

    /// Question awaiting an answer, if any
    pub fn pending_input(&self) -> Option<&InputRequest> {
        self.pending_input.as_ref()
    }

    /// Whether a launch request is in flight
    pub fn is_launching(&self) -> bool {
        self.launching
    }

    /// Whether an answer to the pending question is in flight
    pub fn is_submitting_input(&self) -> bool {
        self.submitting_input
    }

    /// Whether any request is in flight or a timer is armed
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0 || self.poller.is_polling()
    }

    /// Current polling phase
    pub fn poll_phase(&self) -> PollPhase {
        self.poller.phase()
    }

    /// Pop the oldest queued alert
    pub fn take_alert(&mut self) -> Option<String> {
        self.alerts.pop_front()
    }

    fn alert(&mut self, action: &str, error: &ClientError) {
        let message = format!("{}: {}", action, error.detail());
        tracing::error!(error = %error, "{}", action);
        self.alerts.push_back(message);
    }

    fn spawn<F>(&mut self, request: F)
    where
        F: Future<Output = DashboardEvent> + Send + 'static,
    {
        self.in_flight += 1;
        let tx = self.events_tx.clone();
        self.runtime.spawn(async move {
            let _ = tx.send(request.await);
        });
    }
}
