use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::SeriesColor;

// ---------------------------------------------------------------------------
// PlotKind
// ---------------------------------------------------------------------------

/// The six plots that can be drawn for a filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    /// Bar chart of members per area.
    Elements,
    Cells,
    Emersion,
    Fpp,
    Isep,
    Safep,
}

impl PlotKind {
    pub const ALL: [PlotKind; 6] = [
        PlotKind::Elements,
        PlotKind::Cells,
        PlotKind::Emersion,
        PlotKind::Fpp,
        PlotKind::Isep,
        PlotKind::Safep,
    ];

    /// Name used in output file names and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            PlotKind::Elements => "elements",
            PlotKind::Cells => "cells",
            PlotKind::Emersion => "emersion",
            PlotKind::Fpp => "fpp",
            PlotKind::Isep => "isep",
            PlotKind::Safep => "safep",
        }
    }

    pub fn default_title(self) -> &'static str {
        match self {
            PlotKind::Elements => "Elements per set",
            PlotKind::Cells => "Cells",
            PlotKind::Emersion => "Emersion",
            PlotKind::Fpp => "False positive probability",
            PlotKind::Isep => "Inter-set errors",
            PlotKind::Safep => "A priori safeness probability",
        }
    }

    /// `None` for plots drawn without a legend.
    pub fn default_legend(self) -> Option<LegendPosition> {
        match self {
            PlotKind::Elements => None,
            PlotKind::Cells | PlotKind::Emersion | PlotKind::Safep => {
                Some(LegendPosition::UpperLeft)
            }
            PlotKind::Fpp | PlotKind::Isep => Some(LegendPosition::UpperRight),
        }
    }

    pub fn y_label(self) -> &'static str {
        match self {
            PlotKind::Elements => "Members",
            PlotKind::Cells => "Cells",
            PlotKind::Emersion => "Emersion",
            PlotKind::Fpp => "FPP",
            PlotKind::Isep => "ISEP",
            PlotKind::Safep => "SAFEP",
        }
    }

    /// Bar charts hide the grid, curve plots show it.
    pub fn grid(self) -> bool {
        !matches!(self, PlotKind::Elements | PlotKind::Cells)
    }
}

impl fmt::Display for PlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PlotKind::ALL
            .into_iter()
            .find(|k| k.name() == s)
            .ok_or_else(|| format!("unknown plot '{s}' (expected one of elements, cells, emersion, fpp, isep, safep)"))
    }
}

// ---------------------------------------------------------------------------
// LegendPosition
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendPosition {
    UpperLeft,
    UpperRight,
    LowerLeft,
    LowerRight,
}

impl FromStr for LegendPosition {
    type Err = String;

    /// Accepts `upper left`, `upper-left` and `upper_left` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "upper left" => Ok(LegendPosition::UpperLeft),
            "upper right" | "best" => Ok(LegendPosition::UpperRight),
            "lower left" => Ok(LegendPosition::LowerLeft),
            "lower right" => Ok(LegendPosition::LowerRight),
            _ => Err(format!("unknown legend position '{s}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Series / Figure
// ---------------------------------------------------------------------------

/// One labelled series of `(x, y)` points, x increasing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub color: SeriesColor,
    pub line_width: f32,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    pub const DEFAULT_LINE_WIDTH: f32 = 1.5;

    pub fn new(label: impl Into<String>, color: SeriesColor, points: Vec<(f64, f64)>) -> Self {
        Series {
            label: label.into(),
            color,
            line_width: Self::DEFAULT_LINE_WIDTH,
            points,
        }
    }

    pub fn with_line_width(mut self, width: f32) -> Self {
        self.line_width = width;
        self
    }

    pub fn xs(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.0)
    }

    pub fn ys(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.1)
    }
}

/// Everything a rendering surface needs to draw one plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Figure {
    pub kind: PlotKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Drawn first, as bars.
    pub bars: Option<Series>,
    /// Drawn over the bars, in order.
    pub lines: Vec<Series>,
    pub legend: Option<LegendPosition>,
    pub grid: bool,
}

impl Figure {
    pub fn new(kind: PlotKind, title: impl Into<String>) -> Self {
        Figure {
            kind,
            title: title.into(),
            x_label: "Set".to_string(),
            y_label: kind.y_label().to_string(),
            bars: None,
            lines: Vec::new(),
            legend: kind.default_legend(),
            grid: kind.grid(),
        }
    }

    /// Bars first, then lines.
    pub fn series(&self) -> impl Iterator<Item = &Series> {
        self.bars.iter().chain(self.lines.iter())
    }

    pub fn series_named(&self, label: &str) -> Option<&Series> {
        self.series().find(|s| s.label == label)
    }

    /// Bounding box `(x_min, x_max, y_min, y_max)` over every finite point.
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        let mut b = (f64::INFINITY, f64::NEG_INFINITY, f64::INFINITY, f64::NEG_INFINITY);
        for &(x, y) in self.series().flat_map(|s| s.points.iter()) {
            if !(x.is_finite() && y.is_finite()) {
                continue;
            }
            b.0 = b.0.min(x);
            b.1 = b.1.max(x);
            b.2 = b.2.min(y);
            b.3 = b.3.max(y);
        }
        if b.0 > b.1 {
            return (0.0, 1.0, 0.0, 1.0);
        }
        b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legend_spellings() {
        assert_eq!("upper left".parse::<LegendPosition>().unwrap(), LegendPosition::UpperLeft);
        assert_eq!("Lower-Right".parse::<LegendPosition>().unwrap(), LegendPosition::LowerRight);
        assert!("center".parse::<LegendPosition>().is_err());
    }

    #[test]
    fn plot_kind_names_round_trip() {
        for kind in PlotKind::ALL {
            assert_eq!(kind.name().parse::<PlotKind>().unwrap(), kind);
        }
        assert!("histogram".parse::<PlotKind>().is_err());
    }

    #[test]
    fn bounds_skip_non_finite_points() {
        let mut fig = Figure::new(PlotKind::Fpp, "t");
        fig.lines.push(Series::new(
            "FPP",
            SeriesColor::BLUE,
            vec![(1.0, 0.5), (2.0, f64::NAN), (3.0, -1.0)],
        ));
        assert_eq!(fig.bounds(), (1.0, 3.0, -1.0, 0.5));
        assert_eq!(Figure::new(PlotKind::Fpp, "t").bounds(), (0.0, 1.0, 0.0, 1.0));
    }
}
