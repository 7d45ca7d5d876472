// Main application layout
// Handles window layout, panels, menu bar, dialogs and overall UI structure

use agent_dashboard_client::view::{history_rows, pending_calls, status_panel, trace_items};
use agent_dashboard_client::AgentState;
use eframe::egui;
use crate::state::AppState;
use crate::ui::components::{self, primary_button};

/// Render the main application layout
/// Includes menu bar, history sidebar, launch form, agent details and dialogs
pub fn render_app_layout(ctx: &egui::Context, state: &mut AppState) {
    // Menu bar at the top
    render_menu_bar(ctx, state);

    // Dialogs block the panels underneath
    let enabled = !state.modal_open();

    if state.ui_state.sidebar_visible {
        egui::SidePanel::left("agent_sidebar")
            .resizable(true)
            .default_width(280.0)
            .min_width(180.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(enabled, |ui| render_sidebar(ui, state));
            });
    }

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.add_enabled_ui(enabled, |ui| {
            egui::ScrollArea::vertical()
                .id_source("main_content_scroll")
                .auto_shrink([false; 2])
                .show(ui, |ui| {
                    ui.add_space(8.0);
                    render_launch_form(ui, state);
                    ui.add_space(12.0);
                    ui.separator();
                    ui.add_space(12.0);
                    render_main_content(ui, state);
                });
        });
    });

    render_input_dialog(ctx, state);
    render_alert(ctx, state);
}

/// Render the top menu bar
fn render_menu_bar(ctx: &egui::Context, state: &mut AppState) {
    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            // File menu
            ui.menu_button("File", |ui| {
                if ui.button("Quit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            // View menu
            ui.menu_button("View", |ui| {
                let mut dark_mode = ctx.style().visuals.dark_mode;
                if ui.checkbox(&mut dark_mode, "Dark Mode").changed() {
                    let visuals = if dark_mode {
                        egui::Visuals::dark()
                    } else {
                        egui::Visuals::light()
                    };
                    ctx.set_visuals(visuals);
                }
                ui.separator();
                ui.checkbox(&mut state.ui_state.sidebar_visible, "History");
                ui.checkbox(&mut state.ui_state.trace_visible, "Execution Trace");
            });
        });
    });
}

/// Render the left sidebar with the agent history
fn render_sidebar(ui: &mut egui::Ui, state: &mut AppState) {
    ui.vertical(|ui| {
        // Header section - fixed height
        ui.add_space(8.0);
        ui.heading("History");
        ui.add_space(4.0);
        ui.separator();
        ui.add_space(4.0);

        egui::ScrollArea::vertical()
            .id_source("agent_list_scroll")
            .auto_shrink([false; 2])
            .show(ui, |ui| {
                // Rows are owned, so clicking can mutate the state
                let rows = history_rows(state.dashboard.store());

                if rows.is_empty() {
                    ui.vertical_centered(|ui| {
                        ui.add_space(40.0);
                        ui.label(
                            egui::RichText::new("No agents launched yet")
                                .italics()
                                .weak()
                                .size(14.0),
                        );
                    });
                    return;
                }

                for row in &rows {
                    if components::history_row(ui, row) {
                        state.select_agent(&row.id);
                    }
                    ui.add_space(4.0);
                }
            });
    });
}

/// Render the launch form
fn render_launch_form(ui: &mut egui::Ui, state: &mut AppState) {
    let launching = state.dashboard.is_launching();

    ui.heading("Launch Agent");
    ui.add_space(8.0);
    ui.add_enabled(
        !launching,
        egui::TextEdit::multiline(&mut state.launch_draft.text)
            .hint_text("Describe the task for the agent")
            .desired_rows(3)
            .desired_width(f32::INFINITY),
    );
    ui.add_space(8.0);

    let label = if launching { "Launching..." } else { "Launch" };
    if primary_button(ui, label, state.can_launch()).clicked() {
        state.submit_launch();
    }
}

/// Render the selected agent, or a hint when nothing is selected
fn render_main_content(ui: &mut egui::Ui, state: &mut AppState) {
    ui.heading("Agent Details");
    ui.add_space(8.0);

    // Clone agent data to avoid borrowing issues
    match state.dashboard.selected().cloned() {
        Some(agent) => render_agent_details(ui, state, &agent),
        None => render_welcome_view(ui),
    }
}

/// Render welcome view when no agent is selected
fn render_welcome_view(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(60.0);
        ui.label(
            egui::RichText::new("Launch an agent or select one from the history")
                .size(14.0)
                .weak(),
        );
    });
}

/// Render agent details view
fn render_agent_details(ui: &mut egui::Ui, state: &mut AppState, agent: &AgentState) {
    ui.group(|ui| {
        ui.set_width(ui.available_width());
        ui.add_space(8.0);

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new("ID:").strong());
            ui.add_space(12.0);
            ui.label(egui::RichText::new(&agent.id).monospace().weak().size(13.0));
        });
        ui.add_space(8.0);

        components::status_panel(ui, &status_panel(agent));
        ui.add_space(12.0);

        // Action buttons section
        let actions = state.detail_actions();
        if actions.pause || actions.resume {
            ui.horizontal(|ui| {
                ui.spacing_mut().button_padding = egui::vec2(12.0, 8.0);
                if actions.pause && components::pause_button(ui).clicked() {
                    state.dashboard.pause();
                }
                if actions.resume && components::resume_button(ui).clicked() {
                    state.dashboard.resume();
                }
            });
            ui.add_space(8.0);
        }
    });

    if state.ui_state.trace_visible {
        ui.add_space(16.0);
        ui.label(egui::RichText::new("Execution Trace").heading().size(16.0));
        ui.add_space(8.0);

        let items = trace_items(agent);
        if items.is_empty() {
            ui.label(egui::RichText::new("No context yet").weak());
        }
        for item in &items {
            components::trace_entry(ui, item);
            ui.add_space(4.0);
        }
    }

    let calls = pending_calls(agent);
    if !calls.is_empty() {
        ui.add_space(16.0);
        ui.label(egui::RichText::new("Pending Tool Calls").heading().size(16.0));
        ui.add_space(8.0);
        for call in &calls {
            components::pending_call(ui, call);
        }
    }
}

/// Render the modal asking the user to answer the agent's question
fn render_input_dialog(ctx: &egui::Context, state: &mut AppState) {
    let Some(request) = state.question().cloned() else {
        return;
    };
    // An alert takes precedence; the question reappears once it is dismissed
    if state.alert().is_some() {
        return;
    }

    let submitting = state.dashboard.is_submitting_input();
    let mut submit = false;
    let mut cancel = false;

    egui::Window::new("Agent needs your input")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(egui::RichText::new(&request.question).size(14.0));
            ui.add_space(8.0);
            ui.add_enabled(
                !submitting,
                egui::TextEdit::multiline(&mut state.answer_draft.text)
                    .hint_text("Your answer")
                    .desired_rows(3)
                    .desired_width(360.0),
            );
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                let label = if submitting { "Submitting..." } else { "Submit" };
                submit = primary_button(ui, label, state.can_answer()).clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });

    if submit {
        state.submit_answer();
    } else if cancel {
        state.cancel_answer();
    }
}

/// Render the blocking error alert
fn render_alert(ctx: &egui::Context, state: &mut AppState) {
    let Some(message) = state.alert().map(str::to_owned) else {
        return;
    };

    let mut dismissed = false;
    egui::Window::new("Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            dismissed = ui.button("OK").clicked();
        });

    if dismissed {
        state.dismiss_alert();
    }
}
