//! End-to-end dashboard flows against an in-memory agent server
//!
//! Time is paused, so each 2s poll tick elapses instantly once the runtime
//! has nothing else to do.

mod common;

use agent_dashboard_client::polling::PollPhase;
use agent_dashboard_client::{AgentStatus, Dashboard};
use common::{asking, step, FakeAgentServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;

fn dashboard_for(server: &Arc<FakeAgentServer>) -> Dashboard {
    Dashboard::new(server.clone(), Handle::current())
}

/// Process events until polling goes idle
async fn run_until_idle(dashboard: &mut Dashboard) {
    while dashboard.is_busy() {
        dashboard.process_next().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_launch_polls_until_complete() {
    let server = Arc::new(FakeAgentServer::new());
    let mut dashboard = dashboard_for(&server);

    assert!(dashboard.launch("Solve x^2-5x+6=0"));
    assert!(dashboard.is_launching());
    dashboard.process_next().await;
    assert!(!dashboard.is_launching());

    let launched = dashboard.selected().cloned().unwrap();
    assert_eq!(launched.id, "agent-1");
    assert!(!launched.status.is_terminal());
    assert_eq!(launched.initial_prompt(), "Solve x^2-5x+6=0");
    assert!(dashboard.is_busy());

    let mut done = step("agent-1", AgentStatus::Complete, 3);
    done.final_answer = Some("x = 2 or x = 3".to_string());
    server.queue(
        "agent-1",
        vec![step("agent-1", AgentStatus::Running, 1), step("agent-1", AgentStatus::Running, 2), done],
    );

    run_until_idle(&mut dashboard).await;

    let selected = dashboard.selected().unwrap();
    assert_eq!(selected.status, AgentStatus::Complete);
    assert_eq!(selected.final_answer.as_deref(), Some("x = 2 or x = 3"));
    assert_eq!(dashboard.store().get("agent-1").unwrap().steps, 3);
    assert_eq!(dashboard.poll_phase(), PollPhase::Idle);
    assert!(dashboard.pending_input().is_none());

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(dashboard.pump(), 0);
    assert_eq!(server.fetches_of("agent-1"), 3);
}

#[tokio::test(start_paused = true)]
async fn test_launched_state_can_be_fetched_by_id() {
    let server = Arc::new(FakeAgentServer::new());
    let mut dashboard = dashboard_for(&server);

    dashboard.launch("Solve x^2-5x+6=0");
    dashboard.process_next().await;
    let id = dashboard.selected().unwrap().id.clone();

    dashboard.select(&id);
    dashboard.process_next().await;

    assert_eq!(dashboard.selected().unwrap().id, id);
    assert_eq!(dashboard.store().len(), 1);
    dashboard.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_launches_are_listed_newest_first() {
    let server = Arc::new(FakeAgentServer::new());
    let mut dashboard = dashboard_for(&server);

    dashboard.launch("first task");
    dashboard.process_next().await;
    dashboard.launch("second task");
    dashboard.process_next().await;

    let ids: Vec<_> = dashboard.store().agents().iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["agent-2", "agent-1"]);
    assert_eq!(dashboard.selected().unwrap().id, "agent-2");

    // Only the newest launch is tracked
    assert!(matches!(
        dashboard.poll_phase(),
        PollPhase::Polling { ref agent_id, .. } if agent_id == "agent-2"
    ));
    dashboard.shutdown();
}

#[tokio::test(start_paused = true)]
async fn test_waiting_for_input_round_trip() {
    let server = Arc::new(FakeAgentServer::new());
    let mut dashboard = dashboard_for(&server);

    dashboard.launch("Convert 100 degrees");
    dashboard.process_next().await;
    server.queue("agent-1", vec![asking("agent-1", 1, "Celsius or Fahrenheit?")]);

    run_until_idle(&mut dashboard).await;

    let request = dashboard.pending_input().cloned().unwrap();
    assert_eq!(request.agent_id, "agent-1");
    assert_eq!(request.question, "Celsius or Fahrenheit?");
    assert_eq!(dashboard.poll_phase(), PollPhase::Idle);

    // Polling stays halted while the question is open
    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(dashboard.pump(), 0);
    assert_eq!(server.fetches_of("agent-1"), 1);

    assert!(!dashboard.provide_input("  \n "));
    assert!(server.answers().is_empty());

    assert!(dashboard.provide_input("  Celsius "));
    dashboard.process_next().await;
    assert!(dashboard.pending_input().is_none());
    assert!(dashboard.is_busy());
    assert_eq!(
        server.answers(),
        vec![("agent-1".to_string(), "Celsius".to_string())]
    );

    server.queue("agent-1", vec![step("agent-1", AgentStatus::Complete, 2)]);
    run_until_idle(&mut dashboard).await;
    assert_eq!(dashboard.selected().unwrap().status, AgentStatus::Complete);
}

#[tokio::test(start_paused = true)]
async fn test_dismissed_question_is_not_submitted() {
    let server = Arc::new(FakeAgentServer::new());
    let mut dashboard = dashboard_for(&server);

    dashboard.launch("Convert 100 degrees");
    dashboard.process_next().await;
    server.queue("agent-1", vec![asking("agent-1", 1, "Which unit?")]);
    run_until_idle(&mut dashboard).await;

    dashboard.dismiss_input();

    assert!(dashboard.pending_input().is_none());
    assert!(!dashboard.provide_input("Kelvin"));
    assert!(server.answers().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_selecting_terminal_agent_never_polls() {
    let server = Arc::new(FakeAgentServer::new());
    server.insert(step("done", AgentStatus::Complete, 5));
    server.insert(step("broken", AgentStatus::Failed, 2));
    server.insert(step("budget", AgentStatus::MaxStepsReached, 10));
    let mut dashboard = dashboard_for(&server);

    for id in ["done", "broken", "budget"] {
        dashboard.select(id);
        dashboard.process_next().await;
        assert_eq!(dashboard.selected().unwrap().id, id);
        assert_eq!(dashboard.poll_phase(), PollPhase::Idle);
    }

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(dashboard.pump(), 0);
    assert_eq!(server.fetches_of("done"), 1);
    assert_eq!(server.fetches_of("broken"), 1);
    assert_eq!(server.fetches_of("budget"), 1);
}

#[tokio::test(start_paused = true)]
async fn test_switching_selection_replaces_timer() {
    let server = Arc::new(FakeAgentServer::new());
    server.insert(step("a", AgentStatus::Running, 1));
    server.insert(step("b", AgentStatus::Running, 1));
    let mut dashboard = dashboard_for(&server);

    dashboard.select("a");
    dashboard.process_next().await;
    assert!(matches!(dashboard.poll_phase(), PollPhase::Polling { ref agent_id, .. } if agent_id == "a"));

    dashboard.select("b");
    assert_eq!(dashboard.poll_phase(), PollPhase::Idle);
    dashboard.process_next().await;
    assert!(matches!(dashboard.poll_phase(), PollPhase::Polling { ref agent_id, .. } if agent_id == "b"));

    server.queue("b", vec![step("b", AgentStatus::Running, 2), step("b", AgentStatus::Complete, 3)]);
    run_until_idle(&mut dashboard).await;

    assert_eq!(server.fetches_of("a"), 1);
    assert_eq!(dashboard.store().get("b").unwrap().status, AgentStatus::Complete);
    assert_eq!(dashboard.store().get("a").unwrap().steps, 1);
}

#[tokio::test(start_paused = true)]
async fn test_poll_errors_are_retried_silently() {
    let server = Arc::new(FakeAgentServer::new());
    server.insert(step("flaky", AgentStatus::Running, 1));
    let mut dashboard = dashboard_for(&server);

    dashboard.select("flaky");
    dashboard.process_next().await;

    server.fail_gets("flaky", 3);
    server.queue("flaky", vec![step("flaky", AgentStatus::Complete, 4)]);
    run_until_idle(&mut dashboard).await;

    assert_eq!(dashboard.selected().unwrap().status, AgentStatus::Complete);
    assert!(dashboard.take_alert().is_none());
    // one fetch for the selection, three failures, one success
    assert_eq!(server.fetches_of("flaky"), 5);
}

#[tokio::test(start_paused = true)]
async fn test_pause_keeps_polling() {
    let server = Arc::new(FakeAgentServer::new());
    server.insert(step("worker", AgentStatus::Running, 2));
    let mut dashboard = dashboard_for(&server);

    dashboard.select("worker");
    dashboard.process_next().await;

    assert!(dashboard.pause());
    dashboard.process_next().await;

    assert_eq!(dashboard.selected().unwrap().status, AgentStatus::Paused);
    assert!(dashboard.selected().unwrap().status.can_resume());
    assert!(matches!(dashboard.poll_phase(), PollPhase::Polling { .. }));

    assert!(dashboard.resume());
    dashboard.process_next().await;
    assert_eq!(server.state("worker").unwrap().status, AgentStatus::Running);
    assert!(dashboard.take_alert().is_none());

    server.queue("worker", vec![step("worker", AgentStatus::Complete, 3)]);
    run_until_idle(&mut dashboard).await;
    assert_eq!(dashboard.selected().unwrap().status, AgentStatus::Complete);
}

#[tokio::test(start_paused = true)]
async fn test_failed_actions_raise_alerts() {
    let server = Arc::new(FakeAgentServer::new());
    server.insert(step("busy", AgentStatus::Running, 1));
    let mut dashboard = dashboard_for(&server);

    dashboard.select("missing");
    dashboard.process_next().await;
    assert_eq!(
        dashboard.take_alert().as_deref(),
        Some("Failed to load agent: State not found")
    );
    assert!(dashboard.selected().is_none());

    dashboard.select("busy");
    dashboard.process_next().await;
    assert!(dashboard.resume());
    dashboard.process_next().await;
    assert_eq!(
        dashboard.take_alert().as_deref(),
        Some("Failed to resume agent: Agent is already running for this state")
    );

    // the timer armed by the selection keeps running
    assert!(dashboard.is_busy());
    dashboard.shutdown();
    assert!(!dashboard.is_busy());
}
