// Application state management
// Dashboard session plus the state that only exists on screen: form drafts,
// the alert being shown and panel visibility

use agent_dashboard_client::models::AgentStatus;
use agent_dashboard_client::view::PromptDraft;
use agent_dashboard_client::{Dashboard, InputRequest};

/// Lifecycle buttons offered for the selected agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DetailActions {
    /// Show the Pause button
    pub pause: bool,
    /// Show the Resume button
    pub resume: bool,
}

impl DetailActions {
    /// Buttons for an agent in `status`
    pub fn for_status(status: &AgentStatus) -> Self {
        Self {
            pause: status.can_pause(),
            resume: status.can_resume(),
        }
    }
}

/// UI-specific state
#[derive(Debug, Clone)]
pub struct UiState {
    /// Whether the history sidebar is visible
    pub sidebar_visible: bool,
    /// Whether the execution trace is expanded
    pub trace_visible: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_visible: true,
            trace_visible: true,
        }
    }
}

/// Main application state
pub struct AppState {
    /// Session owning agents, selection and polling
    pub dashboard: Dashboard,
    /// Launch form text
    pub launch_draft: PromptDraft,
    /// Input dialog text
    pub answer_draft: PromptDraft,
    /// UI state preferences
    pub ui_state: UiState,
    alert: Option<String>,
    open_question: Option<InputRequest>,
}

impl AppState {
    /// Create the application state around a session
    pub fn new(dashboard: Dashboard) -> Self {
        Self {
            dashboard,
            launch_draft: PromptDraft::default(),
            answer_draft: PromptDraft::default(),
            ui_state: UiState::default(),
            alert: None,
            open_question: None,
        }
    }

    /// Apply everything the session received since the last frame
    ///
    /// Returns the number of events applied.
    pub fn tick(&mut self) -> usize {
        let applied = self.dashboard.pump();

        if self.alert.is_none() {
            self.alert = self.dashboard.take_alert();
        }

        let question = self.dashboard.pending_input().cloned();
        if question != self.open_question {
            // A new question starts with an empty answer
            if question.is_some() {
                self.answer_draft.clear();
            }
            self.open_question = question;
        }

        applied
    }

    /// Alert currently shown, if any
    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Close the alert; the next queued one shows on the following frame
    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Question the input dialog is showing
    pub fn question(&self) -> Option<&InputRequest> {
        self.open_question.as_ref()
    }

    /// Whether a dialog blocks the rest of the window
    pub fn modal_open(&self) -> bool {
        self.alert.is_some() || self.open_question.is_some()
    }

    /// Whether the launch button is enabled
    pub fn can_launch(&self) -> bool {
        !self.dashboard.is_launching() && self.launch_draft.can_submit()
    }

    /// Launch an agent from the launch form, clearing it
    pub fn submit_launch(&mut self) -> bool {
        if self.dashboard.is_launching() {
            return false;
        }
        match self.launch_draft.take() {
            Some(prompt) => self.dashboard.launch(&prompt),
            None => false,
        }
    }

    /// Whether the input dialog's submit button is enabled
    pub fn can_answer(&self) -> bool {
        !self.dashboard.is_submitting_input() && self.answer_draft.can_submit()
    }

    /// Send the input dialog's answer
    ///
    /// The draft is kept until the dialog closes so a failed submission can
    /// be retried.
    pub fn submit_answer(&mut self) -> bool {
        if !self.can_answer() {
            return false;
        }
        self.dashboard.provide_input(&self.answer_draft.text)
    }

    /// Close the input dialog without answering
    pub fn cancel_answer(&mut self) {
        self.answer_draft.clear();
        self.dashboard.dismiss_input();
        self.open_question = None;
    }

    /// Select an agent from the history list
    pub fn select_agent(&mut self, id: &str) {
        self.dashboard.select(id);
    }

    /// Buttons offered for the selected agent
    pub fn detail_actions(&self) -> DetailActions {
        self.dashboard
            .selected()
            .map(|agent| DetailActions::for_status(&agent.status))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_dashboard_client::models::{AgentState, ContextEntry, FunctionCallEntry, ToolArguments};
    use agent_dashboard_client::polling::{PollPhase, PollUpdate};
    use agent_dashboard_client::{AgentApi, ClientError, DashboardEvent};
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::runtime::Runtime;

    /// Rejects everything; tests feed results through `Dashboard::apply`
    struct Unreachable;

    #[async_trait]
    impl AgentApi for Unreachable {
        async fn launch(&self, _prompt: &str) -> Result<AgentState, ClientError> {
            Err(ClientError::InvalidBaseUrl("unreachable".into()))
        }
        async fn get_state(&self, _id: &str) -> Result<AgentState, ClientError> {
            Err(ClientError::InvalidBaseUrl("unreachable".into()))
        }
        async fn resume(&self, _id: &str) -> Result<AgentState, ClientError> {
            Err(ClientError::InvalidBaseUrl("unreachable".into()))
        }
        async fn pause(&self, _id: &str) -> Result<AgentState, ClientError> {
            Err(ClientError::InvalidBaseUrl("unreachable".into()))
        }
        async fn provide_input(&self, _id: &str, _answer: &str) -> Result<AgentState, ClientError> {
            Err(ClientError::InvalidBaseUrl("unreachable".into()))
        }
    }

    fn app_state(runtime: &Runtime) -> AppState {
        AppState::new(Dashboard::new(Arc::new(Unreachable), runtime.handle().clone()))
    }

    /// Bring `state` to an open `ask_human` question whose arguments carry no text
    fn ask(state: &mut AppState) {
        state.dashboard.apply(DashboardEvent::Loaded {
            id: "a".into(),
            result: Ok(AgentState::new("a", AgentStatus::Running)),
        });
        let PollPhase::Polling { generation, .. } = state.dashboard.poll_phase() else {
            panic!("selecting a running agent arms polling");
        };

        let mut waiting = AgentState::new("a", AgentStatus::WaitingHumanInput);
        waiting.context.push(ContextEntry::FunctionCall(FunctionCallEntry {
            name: "ask_human".into(),
            call_id: "call_1".into(),
            arguments: ToolArguments::default(),
        }));
        state.dashboard.apply(DashboardEvent::Polled(PollUpdate {
            generation,
            state: waiting,
        }));
        state.tick();
    }

    #[test]
    fn test_detail_actions_per_status() {
        assert_eq!(
            DetailActions::for_status(&AgentStatus::Running),
            DetailActions { pause: true, resume: false }
        );
        assert_eq!(
            DetailActions::for_status(&AgentStatus::Paused),
            DetailActions { pause: false, resume: true }
        );
        assert_eq!(
            DetailActions::for_status(&AgentStatus::MaxStepsReached),
            DetailActions { pause: false, resume: true }
        );
        for status in [AgentStatus::WaitingHumanInput, AgentStatus::Complete, AgentStatus::Failed] {
            assert_eq!(DetailActions::for_status(&status), DetailActions::default());
        }
    }

    #[test]
    fn test_no_actions_without_selection() {
        let runtime = Runtime::new().unwrap();
        let state = app_state(&runtime);
        assert_eq!(state.detail_actions(), DetailActions::default());
        assert!(!state.modal_open());
    }

    #[test]
    fn test_launch_requires_prompt() {
        let runtime = Runtime::new().unwrap();
        let mut state = app_state(&runtime);

        state.launch_draft.text = "   ".into();
        assert!(!state.can_launch());
        assert!(!state.submit_launch());
        assert_eq!(state.launch_draft.text, "   ");

        state.launch_draft.text = "  Solve x^2-5x+6=0 ".into();
        assert!(state.can_launch());
        assert!(state.submit_launch());
        assert!(state.launch_draft.text.is_empty());
        assert!(state.dashboard.is_launching());

        // Form stays disabled until the launch settles
        state.launch_draft.text = "another".into();
        assert!(!state.can_launch());
        assert!(!state.submit_launch());
    }

    #[test]
    fn test_alert_shown_until_dismissed() {
        let runtime = Runtime::new().unwrap();
        let mut state = app_state(&runtime);

        state.dashboard.apply(DashboardEvent::Launched(Err(ClientError::Http {
            status: 500,
            detail: "boom".into(),
        })));
        state.dashboard.apply(DashboardEvent::Paused(Err(ClientError::Http {
            status: 404,
            detail: "State not found".into(),
        })));

        state.tick();
        assert_eq!(state.alert(), Some("Failed to launch agent: boom"));
        assert!(state.modal_open());

        state.tick();
        assert_eq!(state.alert(), Some("Failed to launch agent: boom"));

        state.dismiss_alert();
        state.tick();
        assert_eq!(state.alert(), Some("Failed to pause agent: State not found"));
    }

    #[test]
    fn test_new_question_clears_answer_draft() {
        let runtime = Runtime::new().unwrap();
        let mut state = app_state(&runtime);

        state.answer_draft.text = "left over".into();
        ask(&mut state);

        assert_eq!(state.question().map(|q| q.question.as_str()), Some("Please provide input"));
        assert!(state.answer_draft.text.is_empty());
        assert!(!state.can_answer());
        assert!(!state.submit_answer());

        state.answer_draft.text = "Celsius".into();
        assert!(state.can_answer());
    }

    #[test]
    fn test_cancel_closes_dialog() {
        let runtime = Runtime::new().unwrap();
        let mut state = app_state(&runtime);

        ask(&mut state);
        state.answer_draft.text = "half typed".into();
        state.cancel_answer();

        assert!(state.question().is_none());
        assert!(state.answer_draft.text.is_empty());
        assert!(state.dashboard.pending_input().is_none());

        state.tick();
        assert!(state.question().is_none());
    }
}
