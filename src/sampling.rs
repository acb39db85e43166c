use crate::filter::AreaValues;

/// Maximum number of points a sampled curve is drawn with.
pub const TARGET_RESOLUTION: usize = 255;

/// Stride between sampled areas for curve plots.
///
/// `ceil(num_areas / TARGET_RESOLUTION)`, never below 1, so that a curve
/// never holds more than [`TARGET_RESOLUTION`] points.
pub fn curve_step(num_areas: usize) -> usize {
    num_areas.div_ceil(TARGET_RESOLUTION).max(1)
}

// ---------------------------------------------------------------------------
// SampledAxis – x positions shared by every series of a figure
// ---------------------------------------------------------------------------

/// Strictly increasing area numbers `1, 1 + step, 1 + 2·step, ...` up to
/// `num_areas`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampledAxis {
    step: usize,
    indices: Vec<usize>,
}

impl SampledAxis {
    pub fn with_step(num_areas: usize, step: usize) -> Self {
        let step = step.max(1);
        SampledAxis {
            step,
            indices: (1..=num_areas).step_by(step).collect(),
        }
    }

    /// Subsampled axis for probability curves.
    pub fn curve(num_areas: usize) -> Self {
        let axis = Self::with_step(num_areas, curve_step(num_areas));
        if axis.step > 1 {
            log::debug!(
                "sampling {num_areas} areas every {} ({} points)",
                axis.step,
                axis.len()
            );
        }
        axis
    }

    /// Every area; bar charts show exact per-area counts.
    pub fn bars(num_areas: usize) -> Self {
        Self::with_step(num_areas, 1)
    }

    pub fn step(&self) -> usize {
        self.step
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// `(area, value)` points for every sampled area.
    pub fn project(&self, values: &AreaValues) -> Vec<(f64, f64)> {
        self.project_with(|area| values.get(area).unwrap_or(0.0))
    }

    /// Like [`SampledAxis::project`], with the y value computed per area.
    pub fn project_with(&self, mut y: impl FnMut(usize) -> f64) -> Vec<(f64, f64)> {
        self.indices
            .iter()
            .map(|&area| (area as f64, y(area)))
            .collect()
    }
}
