use eframe::egui::Ui;
use egui_plot::{Bar, BarChart, Corner, Legend, Line, Plot, PlotPoints};

use crate::figure::{Figure, LegendPosition};
use crate::render::export::BAR_WIDTH;

// ---------------------------------------------------------------------------
// Figure plot (central panel)
// ---------------------------------------------------------------------------

/// Render the figure in the central panel.
pub fn figure_plot(ui: &mut Ui, figure: &Figure) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(figure.title.as_str());
    });

    let mut plot = Plot::new("sbf_plot")
        .x_axis_label(figure.x_label.as_str())
        .y_axis_label(figure.y_label.as_str())
        .show_grid(figure.grid)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true);

    if let Some(position) = figure.legend {
        plot = plot.legend(Legend::default().position(corner(position)));
    }

    plot.show(ui, |plot_ui| {
        if let Some(series) = &figure.bars {
            let bars: Vec<Bar> = series
                .points
                .iter()
                .map(|&(x, y)| Bar::new(x, y).width(BAR_WIDTH))
                .collect();
            let chart = BarChart::new(bars)
                .name(&series.label)
                .color(series.color.to_color32());
            plot_ui.bar_chart(chart);
        }

        for series in &figure.lines {
            let points: PlotPoints = series
                .points
                .iter()
                .filter(|p| p.1.is_finite())
                .map(|&(x, y)| [x, y])
                .collect();

            let line = Line::new(points)
                .name(&series.label)
                .color(series.color.to_color32())
                .width(series.line_width);

            plot_ui.line(line);
        }
    });
}

fn corner(position: LegendPosition) -> Corner {
    match position {
        LegendPosition::UpperLeft => Corner::LeftTop,
        LegendPosition::UpperRight => Corner::RightTop,
        LegendPosition::LowerLeft => Corner::LeftBottom,
        LegendPosition::LowerRight => Corner::RightBottom,
    }
}
