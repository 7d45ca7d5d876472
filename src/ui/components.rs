// Reusable UI components
// Maps the client's view descriptions onto egui widgets

use agent_dashboard_client::view::{HistoryRow, PendingCall, Rgb, StatusPanel, TraceItem};
use eframe::egui;

/// Convert a view color into an egui color
pub fn color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Render a status badge with colored text (no background bar)
pub fn status_badge(ui: &mut egui::Ui, label: &str, color: Rgb) {
    ui.colored_label(color32(color), egui::RichText::new(label).strong());
}

/// Render a primary action button, greyed out when `enabled` is false
pub fn primary_button(ui: &mut egui::Ui, text: &str, enabled: bool) -> egui::Response {
    ui.add_enabled(enabled, egui::Button::new(egui::RichText::new(text).strong()))
}

/// Render a resume button (typically green)
pub fn resume_button(ui: &mut egui::Ui) -> egui::Response {
    ui.button(egui::RichText::new("▶ Resume").color(egui::Color32::from_rgb(0, 180, 0)))
}

/// Render a pause button (typically amber)
pub fn pause_button(ui: &mut egui::Ui) -> egui::Response {
    ui.button(egui::RichText::new("⏸ Pause").color(egui::Color32::from_rgb(220, 160, 0)))
}

/// Render one history list row; returns true when it was clicked
pub fn history_row(ui: &mut egui::Ui, row: &HistoryRow) -> bool {
    let row_id = ui.id().with(("agent_row", &row.id));

    // Frame draws the selection background behind the content
    let mut frame = egui::Frame::none().inner_margin(egui::Margin::symmetric(8.0, 6.0));
    frame.rounding = egui::Rounding::same(4.0);
    if row.selected {
        frame.fill = ui.visuals().selection.bg_fill;
    }

    let row_response = frame.show(ui, |ui| {
        ui.vertical(|ui| {
            ui.horizontal(|ui| {
                ui.label(egui::RichText::new(&row.short_id).monospace().weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.colored_label(color32(row.color), &row.status_text);
                });
            });
            ui.label(&row.prompt);
            ui.label(egui::RichText::new(format!("Steps: {}", row.steps)).small().weak());
        });
    });

    let row_rect = row_response.response.rect;
    let interact = ui.interact(row_rect, row_id, egui::Sense::click());

    // Hover outline only, so the text stays readable
    if interact.hovered() && !row.selected {
        let stroke_color = ui.visuals().widgets.hovered.bg_fill;
        let stroke_color_alpha = egui::Color32::from_rgba_unmultiplied(
            stroke_color.r(),
            stroke_color.g(),
            stroke_color.b(),
            100,
        );
        ui.painter().rect_stroke(
            row_rect,
            egui::Rounding::same(4.0),
            egui::Stroke::new(2.0, stroke_color_alpha),
        );
    }

    interact.clicked()
}

/// Render the status panel: badge, step counter, answer and error
pub fn status_panel(ui: &mut egui::Ui, panel: &StatusPanel) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Status:").strong());
        ui.add_space(8.0);
        status_badge(ui, &panel.label, panel.color);
        ui.add_space(16.0);
        ui.label(egui::RichText::new(&panel.steps_text).weak());
    });

    if let Some(answer) = &panel.final_answer {
        ui.add_space(8.0);
        ui.label(egui::RichText::new("Final Answer").strong());
        ui.label(answer);
    }

    if let Some(error) = &panel.error {
        ui.add_space(8.0);
        ui.colored_label(egui::Color32::from_rgb(220, 0, 0), format!("Error: {}", error));
    }
}

/// Render one execution trace entry
pub fn trace_entry(ui: &mut egui::Ui, item: &TraceItem) {
    match item {
        TraceItem::Text(text) => {
            ui.label(text);
        }
        TraceItem::Call {
            name,
            call_id,
            arguments,
        } => {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("→").strong());
                ui.label(egui::RichText::new(name).strong().monospace());
                ui.label(egui::RichText::new(call_id).weak().monospace());
            });
            if !arguments.is_empty() {
                ui.label(egui::RichText::new(arguments).monospace().size(12.0));
            }
        }
        TraceItem::Output { call_id, text } => {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new("←").strong());
                ui.label(egui::RichText::new(call_id).weak().monospace());
                ui.label(text);
            });
        }
        TraceItem::Message { speaker, content } => {
            ui.horizontal_wrapped(|ui| {
                ui.label(egui::RichText::new(format!("{}:", speaker)).strong());
                ui.label(content);
            });
        }
        TraceItem::Raw(json) => {
            ui.label(egui::RichText::new(json).monospace().weak().size(12.0));
        }
    }
}

/// Render one pending tool call
pub fn pending_call(ui: &mut egui::Ui, call: &PendingCall) {
    ui.horizontal_wrapped(|ui| {
        ui.label(egui::RichText::new(&call.name).strong().monospace());
        ui.label(egui::RichText::new(&call.arguments).monospace().size(12.0));
    });
}
