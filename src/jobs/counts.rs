use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::iproduct;

use crate::config::Definitions;
use crate::data::loader::{self, ResultDir, SnapshotRow};
use crate::plot::lines;

/// Elite-set size over time, one figure per (problem, version). Only the
/// solvers matching the configured prefix maintain an elite set.
pub fn run_elites(defs: &Definitions, base: &Path) -> Result<()> {
    run_counts(
        defs,
        base,
        "num_elites_snapshots",
        "Number of elites",
        Some(defs.elites_solver_prefix.as_str()),
    )
}

/// Non-dominated front count over time for every solver.
pub fn run_fronts(defs: &Definitions, base: &Path) -> Result<()> {
    run_counts(defs, base, "num_fronts_snapshots", "Non-dominated Fronts", None)
}

fn run_counts(
    defs: &Definitions,
    base: &Path,
    family: &str,
    ylabel: &str,
    prefix: Option<&str>,
) -> Result<()> {
    let dir = ResultDir::new(base);
    println!("[INFO] {}: count-over-time charts ...", family);
    for (problem, version) in iproduct!(&defs.problems, &defs.versions) {
        let series = load_series(defs, &dir, family, problem, version, prefix)?;
        if series.is_empty() {
            continue;
        }
        let out_dir = dir.family_dir(family);
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;
        lines::counts_over_time(
            &out_dir.join(format!("{}_{}.png", problem, version)),
            problem,
            ylabel,
            defs,
            &series,
        )?;
    }
    Ok(())
}

pub fn load_series(
    defs: &Definitions,
    dir: &ResultDir,
    family: &str,
    problem: &str,
    version: &str,
    prefix: Option<&str>,
) -> Result<Vec<(usize, Vec<SnapshotRow>)>> {
    let mut series = Vec::new();
    for (idx, solver) in defs.solvers.iter().enumerate() {
        if let Some(prefix) = prefix {
            if !solver.starts_with(prefix) {
                continue;
            }
        }
        if let Some(rows) =
            loader::read_time_series(&dir.versioned(family, problem, solver, version))?
        {
            if !rows.is_empty() {
                series.push((idx, rows));
            }
        }
    }
    Ok(series)
}
