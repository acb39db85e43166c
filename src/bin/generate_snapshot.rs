//! Write a synthetic filter snapshot plus check logs, for trying out the plots.
//!
//! Outputs `sample_snapshot.json`, `sample_insert.check.csv` (the insert
//! set checked again) and `sample_non_elements.check.csv`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use sbfplot::filter::loader::save_filter;
use sbfplot::{FilterSnapshot, SpatialFilter};

const NUM_CELLS: u64 = 1 << 16;
const NUM_HASHES: u32 = 3;
const NUM_AREAS: usize = 600;
const NON_ELEMENTS: usize = 200_000;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: usize, hi: usize) -> usize {
        lo + (self.next_u64() % (hi - lo + 1) as u64) as usize
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let mut rng = SimpleRng::new(42);

    let insert_log = "sample_insert.check.csv";
    let non_elements_log = "sample_non_elements.check.csv";

    // Area sizes between 2 and 30.
    let mut snapshot = FilterSnapshot::new(NUM_CELLS, NUM_HASHES, NUM_AREAS);
    snapshot.area_members = (0..NUM_AREAS).map(|_| rng.range(2, 30) as u64).collect();
    snapshot.members = snapshot.area_members.iter().sum();
    snapshot.insert_file_list = vec!["sample_insert.csv".to_string()];
    snapshot
        .check_logs
        .insert("sample_insert.csv".to_string(), insert_log.into());
    snapshot
        .check_logs
        .insert("sample_non_elements.csv".to_string(), non_elements_log.into());

    // Cell counts: expected value with a little noise.
    let expected = snapshot.expected_area_cells();
    snapshot.area_cells = expected
        .iter()
        .map(|(_, cells)| {
            let jitter = 1.0 + (rng.next_f64() - 0.5) * 0.1;
            (cells * jitter).round().max(0.0) as u64
        })
        .collect();
    snapshot.area_self_collisions = snapshot
        .area_members
        .iter()
        .map(|&m| (m * NUM_HASHES as u64) / 200)
        .collect();

    // Insert set checked again: errors follow the a priori ISEP.
    let (isep, _) = snapshot.compute_apriori_area_isep();
    let mut out = BufWriter::new(File::create(insert_log).context("creating insert check log")?);
    writeln!(out, "expected,reported")?;
    for (area, &members) in (1..=NUM_AREAS).zip(&snapshot.area_members) {
        let p = isep.get(area).unwrap_or(0.0);
        for _ in 0..members {
            let reported = if area < NUM_AREAS && rng.next_f64() < p {
                rng.range(area + 1, NUM_AREAS)
            } else {
                area
            };
            writeln!(out, "{area},{reported}")?;
        }
    }
    out.flush()?;

    // Non-elements: false positives follow the a priori FPP.
    let fpp = snapshot.compute_apriori_area_fpp();
    let mut out =
        BufWriter::new(File::create(non_elements_log).context("creating non-element check log")?);
    writeln!(out, "expected,reported")?;
    for _ in 0..NON_ELEMENTS {
        let u = rng.next_f64();
        let mut acc = 0.0;
        let reported = fpp
            .iter()
            .find(|&(_, p)| {
                acc += p;
                u < acc
            })
            .map_or(0, |(area, _)| area);
        writeln!(out, ",{reported}")?;
    }
    out.flush()?;

    let output_path = "sample_snapshot.json";
    save_filter(&snapshot, Path::new(output_path)).context("writing snapshot")?;

    println!(
        "Wrote a {NUM_AREAS}-area filter ({} members) to {output_path}",
        snapshot.members
    );
    Ok(())
}
