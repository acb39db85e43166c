use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;

use super::print::{PrintBackend, PrintFormat};
use crate::error::{Error, Result};
use crate::figure::{Figure, LegendPosition};
use crate::validate::OutputFormat;

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

/// Bar width as a fraction of the distance between two areas.
pub const BAR_WIDTH: f64 = 0.8;

/// Write `figure` to `path`. `size` is in pixels; print formats map one
/// pixel to 0.75 pt.
pub fn save_figure(figure: &Figure, path: &Path, format: OutputFormat, size: (u32, u32)) -> Result<()> {
    match format {
        OutputFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw(figure, &root).map_err(Error::render)?;
        }
        OutputFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw(figure, &root).map_err(Error::render)?;
        }
        OutputFormat::Pdf => print(figure, path, PrintFormat::Pdf, size)?,
        OutputFormat::Ps => print(figure, path, PrintFormat::Ps, size)?,
        OutputFormat::Eps => print(figure, path, PrintFormat::Eps, size)?,
    }
    Ok(())
}

fn print(figure: &Figure, path: &Path, format: PrintFormat, size: (u32, u32)) -> Result<()> {
    let root = PrintBackend::new(path, format, size).into_drawing_area();
    draw(figure, &root).map_err(Error::render)
}

fn draw<DB>(figure: &Figure, root: &DrawingArea<DB, Shift>) -> DrawResult
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let (x_min, x_max, y_min, y_max) = figure.bounds();
    let y_min = y_min.min(0.0);
    let y_max = if y_max > y_min {
        y_max + (y_max - y_min) * 0.05
    } else {
        y_min + 1.0
    };

    let mut chart = ChartBuilder::on(root)
        .caption(&figure.title, ("sans-serif", 24))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d((x_min - 0.5)..(x_max + 0.5), y_min..y_max)?;

    let mut mesh = chart.configure_mesh();
    mesh.x_desc(&figure.x_label).y_desc(&figure.y_label);
    if !figure.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    if let Some(bars) = &figure.bars {
        let color = bars.color.to_rgb_color();
        let half = BAR_WIDTH / 2.0;
        chart
            .draw_series(
                bars.points
                    .iter()
                    .map(|&(x, y)| Rectangle::new([(x - half, 0.0), (x + half, y)], color.filled())),
            )?
            .label(&bars.label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }

    for series in &figure.lines {
        let style = series
            .color
            .to_rgb_color()
            .stroke_width(series.line_width.round().max(1.0) as u32);
        chart
            .draw_series(LineSeries::new(
                series.points.iter().copied().filter(|p| p.1.is_finite()),
                style,
            ))?
            .label(&series.label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
    }

    if let Some(position) = figure.legend {
        chart
            .configure_series_labels()
            .position(label_position(position))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

fn label_position(position: LegendPosition) -> SeriesLabelPosition {
    match position {
        LegendPosition::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendPosition::UpperRight => SeriesLabelPosition::UpperRight,
        LegendPosition::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendPosition::LowerRight => SeriesLabelPosition::LowerRight,
    }
}
