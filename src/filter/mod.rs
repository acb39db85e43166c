/// Filter layer: the capability set the plots need and a snapshot provider.
///
/// Architecture:
/// ```text
///  snapshot.json + check logs (.csv)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → FilterSnapshot
///   └──────────┘
///        │
///        ▼
///   ┌────────────────┐
///   │ SpatialFilter  │  raw per-area counters, analytic metrics, checks
///   └────────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ metrics   │  compute-once cache of per-area series
///   └──────────┘
/// ```
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod loader;
pub mod snapshot;

pub use snapshot::FilterSnapshot;

// ---------------------------------------------------------------------------
// AreaValues – one number per area, 1-indexed
// ---------------------------------------------------------------------------

/// Per-area values indexed by area number (`1..=num_areas`).
/// Slot 0 is a sentinel and always holds `0.0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaValues(Vec<f64>);

impl AreaValues {
    /// All-zero values for `num_areas` areas.
    pub fn zeroed(num_areas: usize) -> Self {
        AreaValues(vec![0.0; num_areas + 1])
    }

    /// Build from values for areas 1, 2, 3, ... in order.
    pub fn from_areas(values: impl IntoIterator<Item = f64>) -> Self {
        let mut v = vec![0.0];
        v.extend(values);
        AreaValues(v)
    }

    /// Value for `area`, or `None` outside `1..=num_areas`.
    pub fn get(&self, area: usize) -> Option<f64> {
        if area == 0 {
            return None;
        }
        self.0.get(area).copied()
    }

    pub fn set(&mut self, area: usize, value: f64) {
        if area > 0 && area < self.0.len() {
            self.0[area] = value;
        }
    }

    pub fn num_areas(&self) -> usize {
        self.0.len().saturating_sub(1)
    }

    /// `(area, value)` pairs in area order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.0.iter().copied().enumerate().skip(1)
    }
}

// ---------------------------------------------------------------------------
// CheckOutcome – result of one membership check
// ---------------------------------------------------------------------------

/// Outcome of checking a single element against the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckOutcome {
    /// No area reported. `expected` is the element's own area, `None` for
    /// elements that were never inserted.
    Miss { expected: Option<usize> },
    /// The reported area is the element's own area.
    TrueHit { area: usize },
    /// An area was reported that is not the element's own. `expected` is
    /// `None` for elements that were never inserted.
    CrossAreaHit {
        expected: Option<usize>,
        reported: usize,
    },
}

impl CheckOutcome {
    /// Classify a raw `(expected, reported)` pair; `reported == 0` is a miss.
    pub fn classify(expected: Option<usize>, reported: usize) -> Self {
        match (expected, reported) {
            (expected, 0) => CheckOutcome::Miss { expected },
            (Some(e), r) if e == r => CheckOutcome::TrueHit { area: r },
            (expected, reported) => CheckOutcome::CrossAreaHit { expected, reported },
        }
    }

    /// Area the filter answered with, if any.
    pub fn reported_area(&self) -> Option<usize> {
        match *self {
            CheckOutcome::Miss { .. } => None,
            CheckOutcome::TrueHit { area } => Some(area),
            CheckOutcome::CrossAreaHit { reported, .. } => Some(reported),
        }
    }

    /// The inserted element's own area when the filter answered anything
    /// else, a miss included.
    pub fn mismatched_area(&self) -> Option<usize> {
        match *self {
            CheckOutcome::Miss { expected } => expected,
            CheckOutcome::CrossAreaHit { expected, .. } => expected,
            CheckOutcome::TrueHit { .. } => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SpatialFilter – what the plots consume
// ---------------------------------------------------------------------------

/// Read access to an already-built Spatial Bloom Filter.
///
/// Areas are numbered from 1. The `compute_*` operations return fresh
/// values on every call; caching is done by [`crate::metrics::MetricCache`].
pub trait SpatialFilter {
    fn num_areas(&self) -> usize;

    /// Total number of inserted elements.
    fn members(&self) -> u64;

    fn area_members(&self, area: usize) -> u64;

    fn area_cells(&self, area: usize) -> u64;

    /// Sources the filter was built from, in insertion order.
    fn insert_file_list(&self) -> &[String];

    /// Fail with [`crate::Error::InvalidFilter`] when a per-area lookup is
    /// not defined for every area in `1..=num_areas`.
    fn check_consistency(&self) -> Result<()> {
        Ok(())
    }

    fn expected_area_cells(&self) -> AreaValues;

    /// A-priori inter-set error probability and safeness probability,
    /// produced by the same routine.
    fn compute_apriori_area_isep(&self) -> (AreaValues, AreaValues);

    fn compute_apriori_area_fpp(&self) -> AreaValues;

    fn compute_area_fpp(&self) -> AreaValues;

    fn compute_area_isep(&self) -> AreaValues;

    fn area_emersion(&self, area: usize) -> f64;

    fn expected_area_emersion(&self, area: usize) -> f64;

    /// Check every element of `path` against the filter, replacing
    /// [`SpatialFilter::check_results`].
    fn check_from_file(&mut self, path: &str) -> Result<()>;

    fn check_results(&self) -> &[CheckOutcome];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn area_values_are_one_indexed() {
        let v = AreaValues::from_areas([0.5, 0.25]);
        assert_eq!(v.num_areas(), 2);
        assert_eq!(v.get(0), None);
        assert_eq!(v.get(1), Some(0.5));
        assert_eq!(v.get(2), Some(0.25));
        assert_eq!(v.get(3), None);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![(1, 0.5), (2, 0.25)]);
    }

    #[test]
    fn classify_outcomes() {
        assert_eq!(
            CheckOutcome::classify(Some(3), 0),
            CheckOutcome::Miss { expected: Some(3) }
        );
        assert_eq!(
            CheckOutcome::classify(None, 0),
            CheckOutcome::Miss { expected: None }
        );
        assert_eq!(
            CheckOutcome::classify(Some(3), 3),
            CheckOutcome::TrueHit { area: 3 }
        );
        assert_eq!(
            CheckOutcome::classify(Some(3), 5),
            CheckOutcome::CrossAreaHit {
                expected: Some(3),
                reported: 5
            }
        );
        assert_eq!(
            CheckOutcome::classify(None, 2).reported_area(),
            Some(2)
        );
    }

    #[test]
    fn missed_members_count_as_mismatches() {
        assert_eq!(CheckOutcome::classify(Some(4), 0).mismatched_area(), Some(4));
        assert_eq!(CheckOutcome::classify(Some(4), 6).mismatched_area(), Some(4));
        assert_eq!(CheckOutcome::classify(Some(4), 4).mismatched_area(), None);
        assert_eq!(CheckOutcome::classify(None, 0).mismatched_area(), None);
        assert_eq!(CheckOutcome::classify(None, 2).mismatched_area(), None);
    }
}
