//! Agent Dashboard Client Library
//!
//! Typed access to the agent server plus the state that drives the dashboard:
//! the agent history, the single-agent polling loop and the view helpers the
//! GUI renders from. The headless command-line client lives in `src/main.rs`.

pub mod api_client;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod polling;
pub mod session;
pub mod store;
pub mod view;

pub use api_client::{AgentApi, HttpAgentClient};
pub use config::Config;
pub use error::ClientError;
pub use models::{AgentId, AgentState, AgentStatus, ContextEntry};
pub use session::{Dashboard, DashboardEvent, InputRequest};
pub use store::AgentStore;
