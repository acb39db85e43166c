use eframe::egui;

use crate::error::{Error, Result};
use crate::figure::Figure;
use crate::state::ViewerState;
use crate::ui::{panels, plot};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SbfViewerApp {
    pub state: ViewerState,
}

impl SbfViewerApp {
    pub fn new(figure: Figure, export_size: (u32, u32)) -> Self {
        Self {
            state: ViewerState::new(figure, export_size),
        }
    }
}

impl eframe::App for SbfViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Central panel: plot ----
        egui::CentralPanel::default().show(ctx, |ui| {
            plot::figure_plot(ui, &self.state.figure);
        });
    }
}

/// Open a window showing `figure` and block until it is closed.
pub fn show(figure: Figure, size: (u32, u32)) -> Result<()> {
    let title = figure.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([size.0 as f32, size.1 as f32])
            .with_min_inner_size([400.0, 300.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(move |_cc| Ok(Box::new(SbfViewerApp::new(figure, size)))),
    )
    .map_err(Error::render)
}
