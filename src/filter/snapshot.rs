use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{AreaValues, CheckOutcome, SpatialFilter};
use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// FilterSnapshot – exported state of a built filter
// ---------------------------------------------------------------------------

/// The state of an already-built SBF as exported by the filter tool.
///
/// Per-area arrays are stored densely: position 0 holds area 1.
/// The snapshot cannot hash elements itself, so checks replay the logs the
/// filter tool recorded for each element file (see [`Self::check_logs`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSnapshot {
    /// Number of cells in the filter (m).
    pub num_cells: u64,
    /// Number of hash functions (k).
    pub num_hashes: u32,
    pub num_areas: usize,
    pub members: u64,
    pub area_members: Vec<u64>,
    pub area_cells: Vec<u64>,
    /// Cells an area overwrote with its own value.
    #[serde(default)]
    pub area_self_collisions: Vec<u64>,
    pub insert_file_list: Vec<String>,
    /// Element-file identifier → recorded check log (CSV).
    #[serde(default)]
    pub check_logs: BTreeMap<String, PathBuf>,
    #[serde(skip)]
    check_results: Vec<CheckOutcome>,
}

impl FilterSnapshot {
    /// An empty snapshot with `num_areas` zeroed areas.
    pub fn new(num_cells: u64, num_hashes: u32, num_areas: usize) -> Self {
        FilterSnapshot {
            num_cells,
            num_hashes,
            num_areas,
            members: 0,
            area_members: vec![0; num_areas],
            area_cells: vec![0; num_areas],
            area_self_collisions: vec![0; num_areas],
            insert_file_list: vec![String::new()],
            check_logs: BTreeMap::new(),
            check_results: Vec::new(),
        }
    }

    /// Probability that a single hash misses a given cell.
    fn cell_miss(&self) -> f64 {
        1.0 - 1.0 / self.num_cells as f64
    }

    fn k(&self) -> f64 {
        self.num_hashes as f64
    }

    fn per_area(values: &[u64], area: usize) -> u64 {
        area.checked_sub(1)
            .and_then(|i| values.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Members inserted in areas strictly above `area`.
    fn members_above(&self, area: usize) -> u64 {
        self.area_members.iter().skip(area).sum()
    }

    /// Cells taken by areas strictly above `area`.
    fn cells_above(&self, area: usize) -> u64 {
        self.area_cells.iter().skip(area).sum()
    }

    /// Turn cumulative "area i or higher" probabilities into per-area ones,
    /// from the top area down, clamping at zero.
    fn peel_cumulative(&self, cumulative: impl Fn(usize) -> f64) -> AreaValues {
        let mut out = AreaValues::zeroed(self.num_areas);
        let mut higher = 0.0;
        for area in (1..=self.num_areas).rev() {
            let p = (cumulative(area) - higher).max(0.0);
            out.set(area, p);
            higher += p;
        }
        out
    }
}

impl SpatialFilter for FilterSnapshot {
    fn num_areas(&self) -> usize {
        self.num_areas
    }

    fn members(&self) -> u64 {
        self.members
    }

    fn area_members(&self, area: usize) -> u64 {
        Self::per_area(&self.area_members, area)
    }

    fn area_cells(&self, area: usize) -> u64 {
        Self::per_area(&self.area_cells, area)
    }

    fn insert_file_list(&self) -> &[String] {
        &self.insert_file_list
    }

    /// The per-area arrays must cover every area, and the cell and hash
    /// counts must be non-zero.
    fn check_consistency(&self) -> Result<()> {
        if self.num_cells == 0 {
            return Err(Error::InvalidFilter("num_cells is 0".into()));
        }
        if self.num_hashes == 0 {
            return Err(Error::InvalidFilter("num_hashes is 0".into()));
        }
        for (name, len) in [
            ("area_members", self.area_members.len()),
            ("area_cells", self.area_cells.len()),
        ] {
            if len != self.num_areas {
                return Err(Error::InvalidFilter(format!(
                    "{name} has {len} entries for {} areas",
                    self.num_areas
                )));
            }
        }
        if !self.area_self_collisions.is_empty() && self.area_self_collisions.len() != self.num_areas
        {
            return Err(Error::InvalidFilter(format!(
                "area_self_collisions has {} entries for {} areas",
                self.area_self_collisions.len(),
                self.num_areas
            )));
        }
        Ok(())
    }

    fn expected_area_cells(&self) -> AreaValues {
        let p = self.cell_miss();
        let k = self.k();
        let m = self.num_cells as f64;
        AreaValues::from_areas((1..=self.num_areas).map(|area| {
            let nfill = self.members_above(area) as f64;
            let own = self.area_members(area) as f64;
            (m * p.powf(k * nfill) * (1.0 - p.powf(k * own))).round()
        }))
    }

    fn compute_apriori_area_isep(&self) -> (AreaValues, AreaValues) {
        let p = self.cell_miss();
        let k = self.k();
        let mut isep = AreaValues::zeroed(self.num_areas);
        let mut safep = AreaValues::zeroed(self.num_areas);
        for area in 1..=self.num_areas {
            let nfill = self.members_above(area) as f64;
            let overwritten = 1.0 - p.powf(k * nfill);
            let e = overwritten.powf(k);
            isep.set(area, e);
            safep.set(area, (1.0 - e).powf(self.area_members(area) as f64));
        }
        (isep, safep)
    }

    fn compute_apriori_area_fpp(&self) -> AreaValues {
        let p = self.cell_miss();
        let k = self.k();
        self.peel_cumulative(|area| {
            let n = (self.area_members(area) + self.members_above(area)) as f64;
            (1.0 - p.powf(k * n)).powf(k)
        })
    }

    fn compute_area_fpp(&self) -> AreaValues {
        let m = self.num_cells as f64;
        let k = self.k();
        self.peel_cumulative(|area| {
            let c = (self.area_cells(area) + self.cells_above(area)) as f64;
            (c / m).powf(k)
        })
    }

    fn compute_area_isep(&self) -> AreaValues {
        let m = self.num_cells as f64;
        let k = self.k();
        AreaValues::from_areas(
            (1..=self.num_areas).map(|area| (self.cells_above(area) as f64 / m).powf(k)),
        )
    }

    fn area_emersion(&self, area: usize) -> f64 {
        let members = self.area_members(area);
        if members == 0 || self.num_hashes == 0 {
            return -1.0;
        }
        let written = members * self.num_hashes as u64;
        let lost = Self::per_area(&self.area_self_collisions, area);
        let denom = written.saturating_sub(lost);
        if denom == 0 {
            return -1.0;
        }
        self.area_cells(area) as f64 / denom as f64
    }

    fn expected_area_emersion(&self, area: usize) -> f64 {
        let nfill = self.members_above(area) as f64;
        self.cell_miss().powf(self.k() * nfill)
    }

    fn check_from_file(&mut self, path: &str) -> Result<()> {
        let log = self
            .check_logs
            .get(path)
            .cloned()
            .unwrap_or_else(|| PathBuf::from(path));
        log::debug!("replaying check log {} for '{path}'", log.display());
        self.check_results = super::loader::load_check_log(&log)?;
        Ok(())
    }

    fn check_results(&self) -> &[CheckOutcome] {
        &self.check_results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> FilterSnapshot {
        let mut f = FilterSnapshot::new(1024, 3, 3);
        f.area_members = vec![40, 30, 20];
        f.area_cells = vec![90, 80, 60];
        f.area_self_collisions = vec![2, 1, 0];
        f.members = 90;
        f
    }

    #[test]
    fn top_area_never_collides() {
        let f = snapshot();
        let (isep, safep) = f.compute_apriori_area_isep();
        assert_eq!(isep.get(3), Some(0.0));
        assert_eq!(safep.get(3), Some(1.0));
        assert_eq!(f.compute_area_isep().get(3), Some(0.0));
        assert_eq!(f.expected_area_emersion(3), 1.0);
    }

    #[test]
    fn isep_decreases_towards_top_area() {
        let f = snapshot();
        let (isep, _) = f.compute_apriori_area_isep();
        let a = isep.get(1).unwrap();
        let b = isep.get(2).unwrap();
        assert!(a > b && b > 0.0, "{a} {b}");
    }

    #[test]
    fn actual_fpp_sums_to_cumulative_probability() {
        let f = snapshot();
        let fpp = f.compute_area_fpp();
        let total: f64 = fpp.iter().map(|(_, v)| v).sum();
        let expected = (230.0_f64 / 1024.0).powi(3);
        assert!((total - expected).abs() < 1e-12);
        assert!(fpp.iter().all(|(_, v)| v >= 0.0));
    }

    #[test]
    fn emersion_uses_self_collisions() {
        let f = snapshot();
        assert!((f.area_emersion(1) - 90.0 / 118.0).abs() < 1e-12);
        assert!((f.area_emersion(3) - 1.0).abs() < 1e-12);

        let mut empty = snapshot();
        empty.area_members[1] = 0;
        assert_eq!(empty.area_emersion(2), -1.0);
    }

    #[test]
    fn inconsistent_arrays_are_rejected() {
        let mut f = snapshot();
        f.area_cells.pop();
        assert!(matches!(f.check_consistency(), Err(Error::InvalidFilter(_))));
    }
}
