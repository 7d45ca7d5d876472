//! Agent list store
//!
//! Ordered, in-memory history of every agent seen during the session plus the
//! currently selected agent. All updates go through [`AgentStore::reconcile`]
//! (or its launch/select variants) so the list and the selection can never
//! disagree about an agent's latest state.

use crate::models::{AgentId, AgentState};

/// Where a reconciled state ended up in the list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// An entry with the same id was replaced at this index
    Replaced(usize),
    /// No entry matched; the state was inserted at this index
    Inserted(usize),
}

/// Ordered agent history with a selected entry
#[derive(Debug, Clone, Default)]
pub struct AgentStore {
    agents: Vec<AgentState>,
    selected: Option<AgentState>,
}

impl AgentStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge a state update into the list
    ///
    /// A matching id is replaced in place; an unknown id is appended at the
    /// end. The selected agent is refreshed when its id matches.
    pub fn reconcile(&mut self, state: AgentState) -> Placement {
        self.refresh_selected(&state);
        match self.position(&state.id) {
            Some(index) => {
                self.agents[index] = state;
                Placement::Replaced(index)
            }
            None => {
                self.agents.push(state);
                Placement::Inserted(self.agents.len() - 1)
            }
        }
    }

    /// Record a freshly launched agent at the head of the list
    ///
    /// Falls back to an in-place replacement if the id is already known.
    pub fn record_launch(&mut self, state: AgentState) -> Placement {
        if self.position(&state.id).is_some() {
            return self.reconcile(state);
        }
        self.refresh_selected(&state);
        self.agents.insert(0, state);
        Placement::Inserted(0)
    }

    /// Make `state` the selected agent, merging it into the list first
    pub fn select(&mut self, state: AgentState) -> Placement {
        self.selected = Some(state.clone());
        self.reconcile(state)
    }

    /// Currently selected agent, if any
    pub fn selected(&self) -> Option<&AgentState> {
        self.selected.as_ref()
    }

    /// Id of the currently selected agent, if any
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|s| s.id.as_str())
    }

    /// Look up an agent by id
    pub fn get(&self, id: &str) -> Option<&AgentState> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// All agents in display order
    pub fn agents(&self) -> &[AgentState] {
        &self.agents
    }

    /// Number of agents in the history
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether the history is empty
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    fn position(&self, id: &AgentId) -> Option<usize> {
        self.agents.iter().position(|a| &a.id == id)
    }

    fn refresh_selected(&mut self, state: &AgentState) {
        if let Some(selected) = self.selected.as_mut() {
            if selected.id == state.id {
                *selected = state.clone();
            }
        }
    }
}
