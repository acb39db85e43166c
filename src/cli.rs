use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sbfplot::{
    LegendPosition, PlotConfig, PlotKind, PlotOptions, PlotOutput, PlotSession, RenderSurface,
    SpatialFilter,
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Filter snapshot (.json)
    #[arg(value_name = "SNAPSHOT")]
    pub snapshot: PathBuf,

    /// Plot to draw: elements, cells, emersion, fpp, isep or safep
    #[arg(value_name = "PLOT")]
    pub kind: PlotKind,

    /// Path to config JSON
    #[arg(long, default_value = "sbfplot.json")]
    pub config: PathBuf,

    /// Output format: png, pdf, ps, eps or svg (overrides config)
    #[arg(long)]
    pub format: Option<String>,

    /// Output file name without extension
    #[arg(long)]
    pub output: Option<String>,

    /// Output directory (overrides config)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Plot title
    #[arg(long)]
    pub title: Option<String>,

    /// Legend position, e.g. "upper left"
    #[arg(long)]
    pub legend: Option<LegendPosition>,

    /// Do not open the viewer window
    #[arg(long, default_value_t = false)]
    pub no_show: bool,

    /// Do not write the plot to a file
    #[arg(long, default_value_t = false)]
    pub no_save: bool,

    /// Leave out the a priori curve (fpp, isep)
    #[arg(long, default_value_t = false)]
    pub no_apriori: bool,

    /// Leave out the expected curve (cells, emersion)
    #[arg(long, default_value_t = false)]
    pub no_expected: bool,

    /// Leave out the measured inter-set error rate (isep)
    #[arg(long, default_value_t = false)]
    pub no_iser: bool,

    /// Add the expected number of inter-set errors (isep)
    #[arg(long, default_value_t = false)]
    pub expected_ise: bool,

    /// File of non-elements to measure the false positive rate on (fpp)
    #[arg(long, value_name = "PATH")]
    pub non_elements: Option<String>,
}

impl Args {
    /// Config values overridden by the command line.
    pub fn plot_options(&self, config: &PlotConfig) -> PlotOptions {
        let mut opts = PlotOptions::from_config(config);
        if let Some(format) = &self.format {
            opts.format = format.clone();
        }
        if let Some(dir) = &self.output_dir {
            opts.output_dir = dir.clone();
        }
        opts.filename = self.output.clone();
        opts.title = self.title.clone();
        opts.legend = self.legend;
        opts.show &= !self.no_show;
        opts.save &= !self.no_save;
        opts.apriori = !self.no_apriori;
        opts.expected = !self.no_expected;
        opts.iser = !self.no_iser;
        opts.expected_ise = self.expected_ise;
        opts.non_elements = self.non_elements.clone();
        opts
    }
}

/// Draw one plot: save it, report where it went, then open the viewer.
///
/// The viewer blocks until its window is closed, so the saved path is
/// written to `out` before it opens.
pub fn run<F, S>(
    session: &mut PlotSession<F>,
    kind: PlotKind,
    opts: &PlotOptions,
    surface: &mut S,
    out: &mut impl Write,
) -> Result<PlotOutput>
where
    F: SpatialFilter,
    S: RenderSurface + ?Sized,
{
    let save_only = PlotOptions {
        show: false,
        ..opts.clone()
    };
    let output = session
        .plot(kind, &save_only, surface)
        .with_context(|| format!("plotting {kind}"))?;

    if let Some(path) = &output.saved_to {
        writeln!(out, "Plot saved as {}", path.display())?;
        out.flush()?;
    }
    if opts.show {
        surface.show(&output.figure).context("showing the plot")?;
    }
    Ok(output)
}
