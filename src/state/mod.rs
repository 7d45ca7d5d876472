// State management module
// Wraps the dashboard session with UI-only state

pub mod app_state;

pub use app_state::{AppState, DetailActions};
