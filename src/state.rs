use std::path::Path;

use crate::figure::Figure;
use crate::render::export::save_figure;
use crate::validate::OutputFormat;

// ---------------------------------------------------------------------------
// Viewer state
// ---------------------------------------------------------------------------

/// The viewer window state, independent of rendering.
pub struct ViewerState {
    /// Figure on display.
    pub figure: Figure,

    /// Pixel size used when exporting from the window.
    pub export_size: (u32, u32),

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl ViewerState {
    pub fn new(figure: Figure, export_size: (u32, u32)) -> Self {
        Self {
            figure,
            export_size,
            status_message: None,
        }
    }

    /// Export the figure, picking the format from the file extension.
    pub fn save_as(&mut self, path: &Path) {
        let format = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let result = format
            .parse::<OutputFormat>()
            .and_then(|format| save_figure(&self.figure, path, format, self.export_size));

        match result {
            Ok(()) => {
                log::info!("Plot saved as {}", path.display());
                self.status_message = Some(format!("Saved {}", path.display()));
            }
            Err(e) => {
                log::error!("Failed to save plot: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
