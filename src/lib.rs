//! Plots of Spatial Bloom Filter statistics.
//!
//! A [`PlotSession`] wraps a [`SpatialFilter`], derives per-area metrics
//! once and caches them, samples the area axis down to a bounded number of
//! points, and hands finished [`Figure`]s to a [`RenderSurface`].
//!
//! ```no_run
//! use std::path::Path;
//! use sbfplot::{DefaultSurface, PlotOptions, PlotSession};
//!
//! let filter = sbfplot::filter::loader::load_filter(Path::new("filter.json"))?;
//! let mut session = PlotSession::new(filter);
//! let mut surface = DefaultSurface::default();
//! session.isep(&PlotOptions::default(), &mut surface)?;
//! # Ok::<(), sbfplot::Error>(())
//! ```

pub mod app;
pub mod color;
pub mod config;
pub mod error;
pub mod figure;
pub mod filter;
pub mod metrics;
pub mod plots;
pub mod render;
pub mod sampling;
pub mod state;
pub mod ui;
pub mod validate;

pub use color::SeriesColor;
pub use config::PlotConfig;
pub use error::{Error, Result};
pub use figure::{Figure, LegendPosition, PlotKind, Series};
pub use filter::{AreaValues, CheckOutcome, FilterSnapshot, SpatialFilter};
pub use metrics::{Metric, MetricCache};
pub use plots::{PlotOptions, PlotOutput, PlotSession};
pub use render::{DefaultSurface, RenderSurface};
pub use sampling::{SampledAxis, TARGET_RESOLUTION};
pub use validate::{validate, OutputFormat};
