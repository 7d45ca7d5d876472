//! Agent Dashboard CLI
//!
//! Headless client: launches an agent (or attaches to an existing one),
//! follows it until it reaches a terminal status and answers `ask_human`
//! questions from stdin.

use agent_dashboard_client::{Config, Dashboard, HttpAgentClient};
use anyhow::bail;
use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::runtime::Handle;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "agent-dashboard",
    version,
    about = "Launch an agent and follow it until it finishes"
)]
struct Cli {
    /// Base URL of the agent server (overrides AGENT_API_BASE_URL)
    #[arg(long)]
    base_url: Option<String>,

    /// Follow an existing agent instead of launching a new one
    #[arg(long, value_name = "ID", conflicts_with = "prompt")]
    attach: Option<String>,

    /// Task for the new agent
    #[arg(required_unless_present = "attach")]
    prompt: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url);
    }
    info!("Configuration loaded: {:?}", config);

    let api = Arc::new(HttpAgentClient::new(&config.api)?);
    let mut dashboard = Dashboard::new(api, Handle::current());

    match (cli.attach, cli.prompt) {
        (Some(id), _) => dashboard.select(&id),
        (None, Some(prompt)) => {
            if !dashboard.launch(&prompt) {
                bail!("Prompt must not be empty");
            }
        }
        (None, None) => bail!("Either a prompt or --attach is required"),
    }

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut last_seen = None;

    loop {
        dashboard.process_next().await;

        while let Some(alert) = dashboard.take_alert() {
            if dashboard.selected().is_none() {
                bail!(alert);
            }
            eprintln!("{}", alert);
        }

        if let Some(state) = dashboard.selected() {
            let snapshot = (state.status.clone(), state.steps);
            if last_seen.as_ref() != Some(&snapshot) {
                println!("Status: {}, Steps: {}", state.status, state.steps);
                last_seen = Some(snapshot);
            }
        }

        if let Some(request) = dashboard.pending_input().cloned() {
            loop {
                println!("\nAgent is asking: {}", request.question);
                print!("> ");
                std::io::stdout().flush()?;

                let Some(line) = stdin.next_line().await? else {
                    bail!("Cannot request input: stdin is closed");
                };
                if dashboard.provide_input(&line) {
                    break;
                }
                println!("Answer must not be empty");
            }
        }

        if let Some(state) = dashboard.selected() {
            if state.status.is_terminal() && !dashboard.is_busy() {
                if let Some(error) = &state.error {
                    println!("Agent failed: {}", error);
                }
                println!("\nFinal state:");
                println!("{}", serde_json::to_string_pretty(state)?);
                break;
            }
        }
    }

    Ok(())
}
