use std::path::PathBuf;

use crate::color::SeriesColor;
use crate::config::PlotConfig;
use crate::error::Result;
use crate::figure::{Figure, LegendPosition, PlotKind, Series};
use crate::filter::{AreaValues, SpatialFilter};
use crate::metrics::{Metric, MetricCache};
use crate::render::{output_path, RenderSurface};
use crate::sampling::SampledAxis;
use crate::validate::{validate, OutputFormat};

/// Line width of the expected-cells curve drawn over the cell bars.
const OVERLAY_LINE_WIDTH: f32 = 0.8;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Arguments shared by every plot operation. Toggles that do not apply to
/// a plot kind are ignored by it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotOptions {
    /// Overrides the plot's default title.
    pub title: Option<String>,
    /// Overrides the plot's default legend corner.
    pub legend: Option<LegendPosition>,
    pub show: bool,
    pub save: bool,
    /// One of png, pdf, ps, eps, svg.
    pub format: String,
    /// File name without extension; defaults to `<kind>-<timestamp>`.
    pub filename: Option<String>,
    pub output_dir: PathBuf,
    /// fpp, isep: draw the a priori curve.
    pub apriori: bool,
    /// cells, emersion: draw the expected curve.
    pub expected: bool,
    /// isep: draw the inter-set error rate measured on the insert file.
    pub iser: bool,
    /// isep: draw the expected number of inter-set errors.
    pub expected_ise: bool,
    /// fpp: file of non-elements to measure the false positive rate on.
    pub non_elements: Option<String>,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self::from_config(&PlotConfig::default())
    }
}

impl PlotOptions {
    pub fn from_config(config: &PlotConfig) -> Self {
        Self {
            title: None,
            legend: None,
            show: config.show,
            save: config.save,
            format: config.format.clone(),
            filename: None,
            output_dir: config.output_dir.clone(),
            apriori: true,
            expected: true,
            iser: true,
            expected_ise: false,
            non_elements: None,
        }
    }
}

/// A finished plot.
#[derive(Debug, Clone)]
pub struct PlotOutput {
    pub figure: Figure,
    /// Where the figure was written, when saving was requested.
    pub saved_to: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// PlotSession
// ---------------------------------------------------------------------------

/// A filter together with the metrics derived from it so far.
///
/// The session owns the filter, so the cached metrics always describe the
/// filter as it is: [`PlotSession::filter_mut`] drops the cache.
pub struct PlotSession<F> {
    filter: F,
    cache: MetricCache,
}

impl<F: SpatialFilter> PlotSession<F> {
    pub fn new(filter: F) -> Self {
        Self {
            filter,
            cache: MetricCache::new(),
        }
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }

    /// Mutable access to the filter. Invalidates every cached metric.
    pub fn filter_mut(&mut self) -> &mut F {
        self.cache.invalidate();
        &mut self.filter
    }

    pub fn into_filter(self) -> F {
        self.filter
    }

    pub fn cache(&self) -> &MetricCache {
        &self.cache
    }

    /// Cached values of one metric family, derived on first use.
    pub fn metric(&mut self, metric: &Metric) -> Result<&AreaValues> {
        self.cache.get_or_compute(&mut self.filter, metric)
    }

    /// Bar chart of the number of members of every area.
    pub fn areas_barchart<S: RenderSurface + ?Sized>(
        &mut self,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        self.plot(PlotKind::Elements, opts, surface)
    }

    /// Cells per area, with the expected number of cells.
    pub fn cells<S: RenderSurface + ?Sized>(
        &mut self,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        self.plot(PlotKind::Cells, opts, surface)
    }

    /// Emersion per area, with the expected emersion.
    pub fn emersion<S: RenderSurface + ?Sized>(
        &mut self,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        self.plot(PlotKind::Emersion, opts, surface)
    }

    /// False positive probability per area, with the a priori FPP and,
    /// given a file of non-elements, the measured false positive rate.
    pub fn fpp<S: RenderSurface + ?Sized>(
        &mut self,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        self.plot(PlotKind::Fpp, opts, surface)
    }

    /// Inter-set error probability per area, with the a priori ISEP, the
    /// measured error rate and the expected number of errors.
    pub fn isep<S: RenderSurface + ?Sized>(
        &mut self,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        self.plot(PlotKind::Isep, opts, surface)
    }

    /// A priori safeness probability per area.
    pub fn safep<S: RenderSurface + ?Sized>(
        &mut self,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        self.plot(PlotKind::Safep, opts, surface)
    }

    /// Validate, derive, then save and/or show. Nothing reaches the surface
    /// unless the whole figure could be built.
    pub fn plot<S: RenderSurface + ?Sized>(
        &mut self,
        kind: PlotKind,
        opts: &PlotOptions,
        surface: &mut S,
    ) -> Result<PlotOutput> {
        let format = validate(&self.filter, &opts.format)?;
        let figure = self.build(kind, opts)?;
        present(figure, opts, format, surface)
    }

    /// Validate and build a figure without rendering it.
    pub fn figure(&mut self, kind: PlotKind, opts: &PlotOptions) -> Result<Figure> {
        validate(&self.filter, &opts.format)?;
        self.build(kind, opts)
    }

    fn build(&mut self, kind: PlotKind, opts: &PlotOptions) -> Result<Figure> {
        let mut figure = Figure::new(kind, self.title(kind, opts));
        if opts.legend.is_some() && figure.legend.is_some() {
            figure.legend = opts.legend;
        }

        let n = self.filter.num_areas();
        match kind {
            PlotKind::Elements => {
                let axis = SampledAxis::bars(n);
                let points = axis.project_with(|a| self.filter.area_members(a) as f64);
                figure.bars = Some(Series::new("Members", SeriesColor::BLUE, points));
            }
            PlotKind::Cells => {
                let axis = SampledAxis::bars(n);
                let points = axis.project_with(|a| self.filter.area_cells(a) as f64);
                figure.bars = Some(Series::new("Cells", SeriesColor::BLUE, points));
                if opts.expected {
                    let points = self.sampled(&Metric::ExpectedCells, &axis)?;
                    figure.lines.push(
                        Series::new("Expected cells", SeriesColor::Red, points)
                            .with_line_width(OVERLAY_LINE_WIDTH),
                    );
                }
            }
            PlotKind::Emersion => {
                let axis = SampledAxis::curve(n);
                if opts.expected {
                    let points = self.sampled(&Metric::ExpectedEmersion, &axis)?;
                    figure.lines.push(Series::new("Expected emersion", SeriesColor::Red, points));
                }
                let points = self.sampled(&Metric::Emersion, &axis)?;
                figure.lines.push(Series::new("Emersion", SeriesColor::BLUE, points));
            }
            PlotKind::Fpp => {
                let axis = SampledAxis::curve(n);
                if opts.apriori {
                    let points = self.sampled(&Metric::AprioriFpp, &axis)?;
                    figure.lines.push(Series::new("A priori FPP", SeriesColor::Red, points));
                }
                let points = self.sampled(&Metric::Fpp, &axis)?;
                figure.lines.push(Series::new("FPP", SeriesColor::BLUE, points));
                if let Some(source) = opts.non_elements.as_deref().filter(|s| !s.is_empty()) {
                    let metric = Metric::Fpr {
                        source: source.to_string(),
                    };
                    let points = self.sampled(&metric, &axis)?;
                    figure.lines.push(Series::new("FPR", SeriesColor::GREEN, points));
                }
            }
            PlotKind::Isep => {
                let axis = SampledAxis::curve(n);
                if opts.apriori {
                    let points = self.sampled(&Metric::AprioriIsep, &axis)?;
                    figure.lines.push(Series::new("A priori ISEP", SeriesColor::Red, points));
                }
                let points = self.sampled(&Metric::Isep, &axis)?;
                figure.lines.push(Series::new("ISEP", SeriesColor::BLUE, points));
                if opts.iser {
                    let points = self.sampled(&Metric::Iser, &axis)?;
                    figure.lines.push(Series::new("ISER", SeriesColor::GREEN, points));
                }
                if opts.expected_ise {
                    let isep = self.cache.get_or_compute(&mut self.filter, &Metric::AprioriIsep)?;
                    let filter = &self.filter;
                    let points = axis.project_with(|a| {
                        isep.get(a).unwrap_or(0.0) * filter.area_members(a) as f64
                    });
                    figure.lines.push(Series::new("Expected ISE", SeriesColor::ORANGE, points));
                }
            }
            PlotKind::Safep => {
                let axis = SampledAxis::curve(n);
                let points = self.sampled(&Metric::AprioriSafep, &axis)?;
                figure.lines.push(Series::new("SAFEP", SeriesColor::BLUE, points));
            }
        }
        Ok(figure)
    }

    /// The metric projected onto the sampled axis.
    fn sampled(&mut self, metric: &Metric, axis: &SampledAxis) -> Result<Vec<(f64, f64)>> {
        let values = self.cache.get_or_compute(&mut self.filter, metric)?;
        Ok(axis.project(values))
    }

    /// Requested or default title, followed by the first insert source.
    fn title(&self, kind: PlotKind, opts: &PlotOptions) -> String {
        let title = opts
            .title
            .clone()
            .unwrap_or_else(|| kind.default_title().to_string());
        match self.filter.insert_file_list().first() {
            Some(source) if !source.is_empty() => format!("{title} ({source})"),
            _ => title,
        }
    }
}

fn present<S: RenderSurface + ?Sized>(
    figure: Figure,
    opts: &PlotOptions,
    format: OutputFormat,
    surface: &mut S,
) -> Result<PlotOutput> {
    let mut saved_to = None;
    if opts.save {
        let path = output_path(&opts.output_dir, opts.filename.as_deref(), figure.kind, format);
        surface.save(&figure, &path, format)?;
        log::info!("Plot saved as {}", path.display());
        saved_to = Some(path);
    }
    if opts.show {
        surface.show(&figure)?;
    }
    Ok(PlotOutput { figure, saved_to })
}
