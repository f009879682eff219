use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::iproduct;

use crate::config::Definitions;
use crate::data::loader::{self, ResultDir};
use crate::data::tables::SnapshotTable;
use crate::jobs::families::{progress_bar, MetricFamily};
use crate::plot::{lines, raincloud};
use crate::stats::{self, Bounds};

/// Time-series charts for one metric family's snapshot files: the mean
/// curve (PNG + SVG), the quartile-band curve, and one raincloud per
/// snapshot index on a fixed [0, 1] axis.
pub fn run(family: &MetricFamily, defs: &Definitions, base: &Path) -> Result<()> {
    let key = family.snapshots_key();
    let dir = ResultDir::new(base);

    println!("[INFO] {}: loading checkpoint files ...", key);
    let snap = load_table(family, defs, &dir)?;
    let bounds = stats::padded_bounds(snap.all_values(), family.ratio)
        .with_context(|| format!("no {} results found under {}", key, base.display()))?;

    let out_dir = dir.family_dir(&key);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("[INFO] {}: mean and quartile curves ...", key);
    lines::mean_over_time(
        &out_dir.join(format!("{}_mean_snapshots.png", family.key)),
        Some(&out_dir.join(format!("{}_mean_snapshots.svg", family.key))),
        &defs.suite_label,
        family.label,
        defs,
        &snap,
        bounds,
    )?;
    lines::quartiles_over_time(
        &out_dir.join(format!("{}_quartiles_snapshots.png", family.key)),
        &defs.suite_label,
        family.label,
        defs,
        &snap,
        bounds,
    )?;

    println!("[INFO] {}: per-snapshot rainclouds ...", key);
    let pb = progress_bar(snap.slots());
    for slot in 0..snap.slots() {
        let table = snap.table_at(slot);
        if !table.is_empty() {
            raincloud::raincloud_figure(
                &out_dir.join(format!("snapshot_{}.png", slot)),
                (1100, 1100),
                &defs.suite_label,
                family.label,
                defs,
                &table,
                Bounds::UNIT,
                true,
            )?;
        }
        pb.inc(1);
    }
    pb.finish();
    Ok(())
}

/// Pool every run's checkpoint rows into per-solver per-slot samples.
pub fn load_table(
    family: &MetricFamily,
    defs: &Definitions,
    dir: &ResultDir,
) -> Result<SnapshotTable> {
    let key = family.snapshots_key();
    let mut snap = SnapshotTable::new(&defs.solvers, defs.num_snapshots);
    for (idx, solver) in defs.solvers.iter().enumerate() {
        for (problem, seed) in iproduct!(&defs.problems, &defs.seeds) {
            if let Some(rows) = loader::read_snapshot_rows(&dir.run(&key, problem, solver, *seed))? {
                snap.absorb(idx, &rows);
            }
        }
    }
    Ok(snap)
}
