use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::iproduct;

use crate::config::Definitions;
use crate::data::loader::{self, ResultDir};
use crate::jobs::families::progress_bar;
use crate::plot::scatter_matrix::{self, MatrixDim, MatrixSeries};
use crate::stats::{self, Bounds};

const BEST_SOLUTIONS: &str = "best_solutions_snapshots";
const POPULATIONS: &str = "populations_snapshots";
const CELL_SIZE: (u32, u32) = (500, 500);

/// Objective-space matrices of the best solutions found so far, one
/// figure per (problem, version, snapshot) with every solver overlaid.
pub fn run_best_solutions(defs: &Definitions, base: &Path) -> Result<()> {
    run_geometry(defs, base, BEST_SOLUTIONS, false)
}

/// Per-solver population matrices with the best solutions overlaid in the
/// secondary palette.
pub fn run_populations(defs: &Definitions, base: &Path) -> Result<()> {
    run_geometry(defs, base, POPULATIONS, true)
}

fn run_geometry(defs: &Definitions, base: &Path, family: &str, populations: bool) -> Result<()> {
    let dir = ResultDir::new(base);
    let out_dir = dir.family_dir(family);
    for (problem, version) in iproduct!(&defs.problems, &defs.versions) {
        let (num_snapshots, bounds) = scan_extent(defs, &dir, family, problem, version, populations)
            .with_context(|| format!("{}: {} {}", family, problem, version))?;
        if num_snapshots == 0 {
            continue;
        }
        fs::create_dir_all(&out_dir)
            .with_context(|| format!("failed to create {}", out_dir.display()))?;

        println!("[INFO] {}: {} {} ({} snapshots) ...", family, problem, version, num_snapshots);
        let pb = progress_bar(num_snapshots);
        for snapshot in 0..num_snapshots {
            let path = out_dir.join(format!("{}_{}_{}.png", problem, version, snapshot));
            if populations {
                population_grid(defs, &dir, &path, problem, version, snapshot, &bounds)?;
            } else {
                best_solutions_matrix(defs, &dir, &path, problem, version, snapshot, &bounds)?;
            }
            pb.inc(1);
        }
        pb.finish();
    }
    Ok(())
}

/// One probe pass over every solver's snapshot files: discovers the
/// snapshot count (stopping at the first missing index per solver, taking
/// the largest count seen) and the per-objective padded bounds shared by
/// all of this combination's figures.
fn scan_extent(
    defs: &Definitions,
    dir: &ResultDir,
    family: &str,
    problem: &str,
    version: &str,
    populations: bool,
) -> Result<(usize, [Bounds; 2])> {
    let mut num_snapshots = 0;
    let mut columns: [Vec<f64>; 2] = [Vec::new(), Vec::new()];
    for solver in &defs.solvers {
        let n = dir.count_snapshots(family, problem, solver, version);
        for snapshot in 0..n {
            if let Some(points) = loader::read_objective_points(
                &dir.snapshot(family, problem, solver, version, snapshot),
                populations,
            )? {
                for p in points {
                    columns[0].push(p[0]);
                    columns[1].push(p[1]);
                }
            }
        }
        num_snapshots = num_snapshots.max(n);
    }
    if num_snapshots == 0 {
        return Ok((0, [Bounds::UNIT; 2]));
    }
    let bounds = [
        stats::padded_bounds(columns[0].iter().copied(), false)?,
        stats::padded_bounds(columns[1].iter().copied(), false)?,
    ];
    Ok((num_snapshots, bounds))
}

fn objective_dims(bounds: &[Bounds; 2]) -> Vec<MatrixDim> {
    vec![
        MatrixDim { label: "f1".to_string(), bounds: bounds[0] },
        MatrixDim { label: "f2".to_string(), bounds: bounds[1] },
    ]
}

fn best_solutions_matrix(
    defs: &Definitions,
    dir: &ResultDir,
    path: &Path,
    problem: &str,
    version: &str,
    snapshot: usize,
    bounds: &[Bounds; 2],
) -> Result<()> {
    let mut series = Vec::new();
    for (idx, solver) in defs.solvers.iter().enumerate() {
        let file = dir.snapshot(BEST_SOLUTIONS, problem, solver, version, snapshot);
        if let Some(points) = loader::read_objective_points(&file, false)? {
            if !points.is_empty() {
                series.push(MatrixSeries::from_points(
                    idx,
                    false,
                    0.8,
                    Some(defs.label(solver).to_string()),
                    &points,
                ));
            }
        }
    }
    if series.is_empty() {
        return Ok(());
    }
    scatter_matrix::scatter_matrix_figure(
        path,
        CELL_SIZE,
        problem,
        &objective_dims(bounds),
        &series,
        defs,
        false,
        true,
    )
}

/// Grid of per-solver subfigures, each a 2x2 objective matrix of the
/// population with the solver's best solutions overlaid.
fn population_grid(
    defs: &Definitions,
    dir: &ResultDir,
    path: &Path,
    problem: &str,
    version: &str,
    snapshot: usize,
    bounds: &[Bounds; 2],
) -> Result<()> {
    use plotters::prelude::*;

    let n = defs.solvers.len();
    let num_rows = ((n as f64).sqrt().floor() as usize).max(1);
    let num_cols = (n + num_rows - 1) / num_rows;
    let dims = objective_dims(bounds);

    let size = (
        CELL_SIZE.0 * 2 * num_cols as u32,
        CELL_SIZE.1 * 2 * num_rows as u32,
    );
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(problem, ("sans-serif", 40))?;
    let subs = inner.split_evenly((num_rows, num_cols));

    for (idx, solver) in defs.solvers.iter().enumerate() {
        let area = subs[idx].titled(defs.label(solver), ("sans-serif", 24))?;
        let mut series = Vec::new();
        let population = dir.snapshot(POPULATIONS, problem, solver, version, snapshot);
        if let Some(points) = loader::read_objective_points(&population, true)? {
            if !points.is_empty() {
                series.push(MatrixSeries::from_points(idx, false, 0.5, None, &points));
            }
        }
        let best = dir.snapshot(BEST_SOLUTIONS, problem, solver, version, snapshot);
        if let Some(points) = loader::read_objective_points(&best, false)? {
            if !points.is_empty() {
                series.push(MatrixSeries::from_points(idx, true, 0.75, None, &points));
            }
        }
        if series.is_empty() {
            continue;
        }
        scatter_matrix::scatter_matrix_on_area(&area, &dims, &series, defs, false, false)?;
    }
    root.present()?;
    Ok(())
}
