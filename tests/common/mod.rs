#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use sbfplot::{
    AreaValues, CheckOutcome, Error, Figure, OutputFormat, RenderSurface, Result, SpatialFilter,
};

/// Filter double that counts every derivation and every raw access.
pub struct CountingFilter {
    pub num_areas: usize,
    pub members: u64,
    pub area_members: Vec<u64>,
    pub area_cells: Vec<u64>,
    pub insert_file_list: Vec<String>,
    /// Element file → outcomes a check against it produces.
    pub check_files: BTreeMap<String, Vec<CheckOutcome>>,
    check_results: Vec<CheckOutcome>,
    calls: RefCell<BTreeMap<&'static str, usize>>,
    touched: Cell<usize>,
}

impl CountingFilter {
    /// `num_areas` areas holding `per_area` members and twice as many cells.
    pub fn uniform(num_areas: usize, per_area: u64) -> Self {
        CountingFilter {
            num_areas,
            members: num_areas as u64 * per_area,
            area_members: vec![per_area; num_areas],
            area_cells: vec![per_area * 2; num_areas],
            insert_file_list: vec!["insert.csv".to_string()],
            check_files: BTreeMap::new(),
            check_results: Vec::new(),
            calls: RefCell::new(BTreeMap::new()),
            touched: Cell::new(0),
        }
    }

    pub fn with_check_file(mut self, name: &str, outcomes: Vec<CheckOutcome>) -> Self {
        self.check_files.insert(name.to_string(), outcomes);
        self
    }

    /// How often `name` was called.
    pub fn calls(&self, name: &str) -> usize {
        self.calls.borrow().get(name).copied().unwrap_or(0)
    }

    /// Number of raw attribute reads.
    pub fn touched(&self) -> usize {
        self.touched.get()
    }

    fn count(&self, name: &'static str) {
        *self.calls.borrow_mut().entry(name).or_insert(0) += 1;
    }

    fn touch(&self) {
        self.touched.set(self.touched.get() + 1);
    }

    fn per_area(&self, f: impl Fn(usize) -> f64) -> AreaValues {
        AreaValues::from_areas((1..=self.num_areas).map(f))
    }
}

impl SpatialFilter for CountingFilter {
    fn num_areas(&self) -> usize {
        self.touch();
        self.num_areas
    }

    fn members(&self) -> u64 {
        self.touch();
        self.members
    }

    fn area_members(&self, area: usize) -> u64 {
        self.touch();
        self.area_members[area - 1]
    }

    fn area_cells(&self, area: usize) -> u64 {
        self.touch();
        self.area_cells[area - 1]
    }

    fn insert_file_list(&self) -> &[String] {
        self.touch();
        &self.insert_file_list
    }

    fn expected_area_cells(&self) -> AreaValues {
        self.count("expected_area_cells");
        self.per_area(|a| a as f64 * 2.0)
    }

    fn compute_apriori_area_isep(&self) -> (AreaValues, AreaValues) {
        self.count("compute_apriori_area_isep");
        (
            self.per_area(|a| 0.01 * a as f64),
            self.per_area(|a| 1.0 - 0.01 * a as f64),
        )
    }

    fn compute_apriori_area_fpp(&self) -> AreaValues {
        self.count("compute_apriori_area_fpp");
        self.per_area(|a| 0.001 * a as f64)
    }

    fn compute_area_fpp(&self) -> AreaValues {
        self.count("compute_area_fpp");
        self.per_area(|a| 0.002 * a as f64)
    }

    fn compute_area_isep(&self) -> AreaValues {
        self.count("compute_area_isep");
        self.per_area(|a| 0.02 * a as f64)
    }

    fn area_emersion(&self, _area: usize) -> f64 {
        self.count("area_emersion");
        0.5
    }

    fn expected_area_emersion(&self, _area: usize) -> f64 {
        self.count("expected_area_emersion");
        1.0
    }

    fn check_from_file(&mut self, path: &str) -> Result<()> {
        self.count("check_from_file");
        self.check_results = self
            .check_files
            .get(path)
            .cloned()
            .ok_or_else(|| Error::CheckLog {
                path: PathBuf::from(path),
                message: "no such element file".into(),
            })?;
        Ok(())
    }

    fn check_results(&self) -> &[CheckOutcome] {
        &self.check_results
    }
}

/// Surface that records what it was asked to do instead of drawing.
#[derive(Default)]
pub struct RecordingSurface {
    pub saved: Vec<(PathBuf, OutputFormat, Figure)>,
    pub shown: Vec<Figure>,
}

impl RenderSurface for RecordingSurface {
    fn save(&mut self, figure: &Figure, path: &Path, format: OutputFormat) -> Result<()> {
        self.saved.push((path.to_path_buf(), format, figure.clone()));
        Ok(())
    }

    fn show(&mut self, figure: &Figure) -> Result<()> {
        self.shown.push(figure.clone());
        Ok(())
    }
}

/// A scratch directory unique to this test process and `name`.
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("sbfplot-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).expect("creating scratch dir");
    dir
}
