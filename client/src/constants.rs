//! Client constants
//!
//! Endpoint paths, the polling cadence and the fallback strings shared by the
//! session and the view helpers.

use std::time::Duration;

/// Launch a new agent run
pub const LAUNCH_PATH: &str = "/agent/launch";

/// Fetch an agent's state; the id is appended as the last path segment
pub const STATE_PATH: &str = "/agent/state";

/// Resume a stopped run
pub const RESUME_PATH: &str = "/agent/resume";

/// Pause a running agent
pub const PAUSE_PATH: &str = "/agent/pause";

/// Answer an `ask_human` request
pub const PROVIDE_INPUT_PATH: &str = "/agent/provide_input";

/// Base URL used when `AGENT_API_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Fixed polling cadence for the tracked agent
pub const POLL_INTERVAL: Duration = Duration::from_millis(2000);

/// Tool name the agent uses to ask a human for input
pub const ASK_HUMAN_TOOL: &str = "ask_human";

/// Question shown when the `ask_human` call carries no readable question
///
/// Only a string `question` with non-blank text is shown; any other value
/// (missing, null, a number, a boolean, blank text) falls back to this.
pub const FALLBACK_QUESTION: &str = "Please provide input";

/// History list placeholder when no prompt can be found in the context
pub const NO_PROMPT: &str = "No prompt available";

/// Characters of the agent id shown in the history list
pub const ID_SNIPPET_LEN: usize = 8;

/// Characters of the call id shown in the execution trace
pub const CALL_ID_SNIPPET_LEN: usize = 8;

/// Characters of the initial prompt shown in the history list
pub const PROMPT_SNIPPET_LEN: usize = 60;
