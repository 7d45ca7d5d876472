// Agent Dashboard GUI - Main Entry Point
// Native dashboard for launching, following and steering agents on an agent server

mod state;
mod ui;

use agent_dashboard_client::{Config, Dashboard, HttpAgentClient};
use anyhow::anyhow;
use eframe::egui;
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use ui::render_app_layout;

/// Repaint cadence while requests or polling are outstanding
const BUSY_REPAINT_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env();
    tracing::info!(base_url = %config.api.base_url, "Starting agent dashboard");

    // API calls and the poll timer run here; the UI thread only pumps results
    let runtime = tokio::runtime::Runtime::new()?;
    let api = Arc::new(HttpAgentClient::new(&config.api)?);
    let dashboard = Dashboard::new(api, runtime.handle().clone());

    // Configure window options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Agent Dashboard")
            .with_inner_size([1100.0, 760.0])
            .with_min_inner_size([800.0, 600.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Agent Dashboard",
        options,
        Box::new(move |_cc| Box::new(AgentDashboardApp::new(dashboard))),
    )
    .map_err(|e| anyhow!("GUI terminated with error: {}", e))?;

    tracing::info!("Agent dashboard closed");
    Ok(())
}

/// Main application struct
/// Pumps session events once per frame and renders the layout
struct AgentDashboardApp {
    state: AppState,
}

impl AgentDashboardApp {
    fn new(dashboard: Dashboard) -> Self {
        Self {
            state: AppState::new(dashboard),
        }
    }
}

impl eframe::App for AgentDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.tick();

        render_app_layout(ctx, &mut self.state);

        // Results arrive from the runtime without input events, so keep
        // repainting while anything is outstanding
        if self.state.dashboard.is_busy() {
            ctx.request_repaint_after(BUSY_REPAINT_INTERVAL);
        }
    }
}

impl Drop for AgentDashboardApp {
    fn drop(&mut self) {
        self.state.dashboard.shutdown();
    }
}
