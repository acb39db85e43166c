use std::collections::HashMap;
use std::fmt;

use crate::error::{Error, Result};
use crate::filter::{AreaValues, CheckOutcome, SpatialFilter};

// ---------------------------------------------------------------------------
// Metric – cache key
// ---------------------------------------------------------------------------

/// A family of derived per-area statistics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Metric {
    ExpectedCells,
    AprioriIsep,
    /// Derived together with [`Metric::AprioriIsep`].
    AprioriSafep,
    AprioriFpp,
    Fpp,
    Isep,
    Emersion,
    ExpectedEmersion,
    /// Inter-set error rate observed by re-checking the insert file.
    Iser,
    /// False positive rate observed on a file of non-elements.
    Fpr { source: String },
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metric::ExpectedCells => write!(f, "expected cells"),
            Metric::AprioriIsep => write!(f, "a priori ISEP"),
            Metric::AprioriSafep => write!(f, "a priori SAFEP"),
            Metric::AprioriFpp => write!(f, "a priori FPP"),
            Metric::Fpp => write!(f, "FPP"),
            Metric::Isep => write!(f, "ISEP"),
            Metric::Emersion => write!(f, "emersion"),
            Metric::ExpectedEmersion => write!(f, "expected emersion"),
            Metric::Iser => write!(f, "ISER"),
            Metric::Fpr { source } => write!(f, "FPR ({source})"),
        }
    }
}

// ---------------------------------------------------------------------------
// MetricCache
// ---------------------------------------------------------------------------

/// Compute-once store of derived metrics for one filter.
///
/// Every [`Metric`] is derived at most once until [`MetricCache::invalidate`]
/// is called. Check results are tagged with the file they came from, so an
/// FPR and an ISER never share one check run.
#[derive(Debug, Default)]
pub struct MetricCache {
    values: HashMap<Metric, AreaValues>,
    checked_source: Option<String>,
}

impl MetricCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, metric: &Metric) -> bool {
        self.values.contains_key(metric)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drop every cached metric and forget the last check run.
    pub fn invalidate(&mut self) {
        if !self.values.is_empty() {
            log::debug!("invalidating {} cached metrics", self.values.len());
        }
        self.values.clear();
        self.checked_source = None;
    }

    /// Return the cached values for `metric`, deriving them on first use.
    pub fn get_or_compute<F: SpatialFilter + ?Sized>(
        &mut self,
        filter: &mut F,
        metric: &Metric,
    ) -> Result<&AreaValues> {
        if !self.values.contains_key(metric) {
            log::debug!("deriving {metric}");
            self.derive(filter, metric)?;
        }
        Ok(&self.values[metric])
    }

    fn derive<F: SpatialFilter + ?Sized>(&mut self, filter: &mut F, metric: &Metric) -> Result<()> {
        let values = match metric {
            Metric::ExpectedCells => filter.expected_area_cells(),
            Metric::AprioriIsep | Metric::AprioriSafep => {
                let (isep, safep) = filter.compute_apriori_area_isep();
                self.values.insert(Metric::AprioriSafep, safep);
                self.values.insert(Metric::AprioriIsep, isep);
                return Ok(());
            }
            Metric::AprioriFpp => filter.compute_apriori_area_fpp(),
            Metric::Fpp => filter.compute_area_fpp(),
            Metric::Isep => filter.compute_area_isep(),
            Metric::Emersion => {
                AreaValues::from_areas((1..=filter.num_areas()).map(|a| filter.area_emersion(a)))
            }
            Metric::ExpectedEmersion => AreaValues::from_areas(
                (1..=filter.num_areas()).map(|a| filter.expected_area_emersion(a)),
            ),
            Metric::Iser => {
                let source = match filter.insert_file_list() {
                    [single] => single.clone(),
                    sources => return Err(Error::UnsupportedMultiSource(sources.len())),
                };
                self.ensure_checked(filter, &source)?;
                inter_set_error_rate(filter, &source)?
            }
            Metric::Fpr { source } => {
                self.ensure_checked(filter, source)?;
                false_positive_rate(filter, source)?
            }
        };
        self.values.insert(metric.clone(), values);
        Ok(())
    }

    /// Run a check against `source` unless the filter already holds its results.
    fn ensure_checked<F: SpatialFilter + ?Sized>(&mut self, filter: &mut F, source: &str) -> Result<()> {
        if self.checked_source.as_deref() == Some(source) {
            return Ok(());
        }
        if let Some(previous) = &self.checked_source {
            log::warn!("check results for '{previous}' replaced by a check against '{source}'");
        }
        self.checked_source = None;
        filter.check_from_file(source)?;
        self.checked_source = Some(source.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Empirical rates
// ---------------------------------------------------------------------------

/// Fraction of each area's members that the filter did not report in their
/// own area, either answering another area or none.
///
/// Areas without members get a rate of 0.
fn inter_set_error_rate<F: SpatialFilter + ?Sized>(filter: &F, source: &str) -> Result<AreaValues> {
    let results = filter.check_results();
    if results.is_empty() {
        return Err(Error::EmptyCheckResults(source.to_string()));
    }

    let num_areas = filter.num_areas();
    let mut mismatches = vec![0u64; num_areas + 1];
    for area in results.iter().filter_map(CheckOutcome::mismatched_area) {
        if (1..=num_areas).contains(&area) {
            mismatches[area] += 1;
        }
    }

    Ok(AreaValues::from_areas((1..=num_areas).map(|area| {
        match filter.area_members(area) {
            0 => 0.0,
            members => mismatches[area] as f64 / members as f64,
        }
    })))
}

/// Share of the checked non-elements the filter reported in each area.
fn false_positive_rate<F: SpatialFilter + ?Sized>(filter: &F, source: &str) -> Result<AreaValues> {
    let results = filter.check_results();
    if results.is_empty() {
        return Err(Error::EmptyCheckResults(source.to_string()));
    }

    let num_areas = filter.num_areas();
    let mut positives = vec![0u64; num_areas + 1];
    for area in results.iter().filter_map(CheckOutcome::reported_area) {
        if (1..=num_areas).contains(&area) {
            positives[area] += 1;
        }
    }

    let total = results.len() as f64;
    Ok(AreaValues::from_areas(
        (1..=num_areas).map(|area| positives[area] as f64 / total),
    ))
}
