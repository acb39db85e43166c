/// Rendering surface: where finished figures go.
///
/// ```text
///   Figure ──► RenderSurface::save ──► export (plotters: png / svg / pdf / ps / eps)
///          └─► RenderSurface::show ──► viewer window (eframe + egui_plot)
/// ```
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::error::Result;
use crate::figure::{Figure, PlotKind};
use crate::validate::OutputFormat;

pub mod export;
pub mod print;

/// Something that can persist and display a figure. Both calls block until done.
pub trait RenderSurface {
    fn save(&mut self, figure: &Figure, path: &Path, format: OutputFormat) -> Result<()>;

    fn show(&mut self, figure: &Figure) -> Result<()>;
}

/// Output path for a plot: `<dir>/<name>.<format>`, where the name defaults
/// to `<kind>-YYYYMMDD-HHMMSS`.
pub fn output_path(dir: &Path, filename: Option<&str>, kind: PlotKind, format: OutputFormat) -> PathBuf {
    let stem = match filename {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("{}-{}", kind.name(), Local::now().format("%Y%m%d-%H%M%S")),
    };
    dir.join(format!("{stem}.{}", format.extension()))
}

// ---------------------------------------------------------------------------
// DefaultSurface
// ---------------------------------------------------------------------------

/// Saves with plotters and shows figures in a native viewer window.
#[derive(Debug, Clone)]
pub struct DefaultSurface {
    pub width: u32,
    pub height: u32,
}

impl Default for DefaultSurface {
    fn default() -> Self {
        Self {
            width: 1024,
            height: 768,
        }
    }
}

impl RenderSurface for DefaultSurface {
    fn save(&mut self, figure: &Figure, path: &Path, format: OutputFormat) -> Result<()> {
        export::save_figure(figure, path, format, (self.width, self.height))
    }

    fn show(&mut self, figure: &Figure) -> Result<()> {
        crate::app::show(figure.clone(), (self.width, self.height))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filename_gets_the_extension() {
        let path = output_path(Path::new("out"), Some("run1"), PlotKind::Isep, OutputFormat::Svg);
        assert_eq!(path, Path::new("out").join("run1.svg"));
    }

    #[test]
    fn default_filename_is_timestamped() {
        let path = output_path(Path::new("."), None, PlotKind::Cells, OutputFormat::Png);
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("cells-"), "{name}");
        assert!(name.ends_with(".png"));
        // cells- + YYYYMMDD-HHMMSS + .png
        assert_eq!(name.len(), "cells-".len() + 15 + 4);
    }
}
