use eframe::egui::{self, Color32, RichText, Ui};

use crate::state::ViewerState;

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut ViewerState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Save as…").clicked() {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        let figure = &state.figure;
        let points = figure.series().next().map_or(0, |s| s.points.len());
        ui.label(format!(
            "{} series, {points} points each",
            figure.series().count()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                Color32::GRAY
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn save_file_dialog(state: &mut ViewerState) {
    let file = rfd::FileDialog::new()
        .set_title("Save plot")
        .set_file_name(format!("{}.pdf", state.figure.kind))
        .add_filter("PDF", &["pdf"])
        .add_filter("SVG", &["svg"])
        .add_filter("PNG", &["png"])
        .add_filter("PostScript", &["ps", "eps"])
        .save_file();

    if let Some(path) = file {
        state.save_as(&path);
    }
}
