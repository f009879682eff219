use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::iproduct;

use crate::config::Definitions;
use crate::data::loader::{self, ResultDir};
use crate::data::tables::MetricTable;
use crate::jobs::families::{progress_bar, MetricFamily};
use crate::plot::raincloud;
use crate::stats;

/// Raincloud charts for one scalar metric family: one figure per problem
/// instance from the per-problem aggregate files, plus one suite-wide
/// figure pooling every problem and seed. All figures of the family share
/// one padded axis interval.
pub fn run(family: &MetricFamily, defs: &Definitions, base: &Path) -> Result<()> {
    let dir = ResultDir::new(base);

    println!("[INFO] {}: loading result files ...", family.key);
    let mut problem_tables = Vec::new();
    for problem in &defs.problems {
        problem_tables.push((problem.as_str(), problem_table(family, defs, &dir, problem)?));
    }
    let suite = suite_table(family, defs, &dir)?;

    let all_values = problem_tables
        .iter()
        .flat_map(|(_, table)| table.all_values())
        .chain(suite.all_values());
    let bounds = stats::padded_bounds(all_values, family.ratio)
        .with_context(|| format!("no {} results found under {}", family.key, base.display()))?;

    let out_dir = dir.family_dir(family.key);
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("[INFO] {}: per-problem rainclouds ...", family.key);
    let pb = progress_bar(problem_tables.len());
    for (problem, table) in &problem_tables {
        if !table.is_empty() {
            raincloud::raincloud_figure(
                &out_dir.join(format!("{}.png", problem)),
                (1100, 1100),
                problem,
                family.label,
                defs,
                table,
                bounds,
                false,
            )?;
        }
        pb.inc(1);
    }
    pb.finish();

    if !suite.is_empty() {
        println!("[INFO] {}: suite-wide raincloud ...", family.key);
        raincloud::raincloud_figure(
            &out_dir.join(format!("{}.png", family.key)),
            (1100, 1100),
            &defs.suite_label,
            family.label,
            defs,
            &suite,
            bounds,
            false,
        )?;
    }
    Ok(())
}

/// Per-solver samples of one problem instance, from the seed-aggregated
/// `{problem}_{solver}.txt` files. Missing files are valid "no data".
pub fn problem_table(
    family: &MetricFamily,
    defs: &Definitions,
    dir: &ResultDir,
    problem: &str,
) -> Result<MetricTable> {
    let mut table = MetricTable::with_solvers(&defs.solvers);
    for solver in &defs.solvers {
        if let Some(values) =
            loader::read_scalar_column(&dir.aggregate(family.key, problem, solver))?
        {
            table.push(solver, values);
        }
    }
    Ok(table)
}

/// Per-solver samples pooled over every problem instance and seed, from
/// the per-run `{problem}_{solver}_{seed}.txt` files.
pub fn suite_table(
    family: &MetricFamily,
    defs: &Definitions,
    dir: &ResultDir,
) -> Result<MetricTable> {
    let mut table = MetricTable::with_solvers(&defs.solvers);
    for (solver, problem, seed) in iproduct!(&defs.solvers, &defs.problems, &defs.seeds) {
        if let Some(values) = loader::read_scalar_column(&dir.run(family.key, problem, solver, *seed))?
        {
            table.push(solver, values);
        }
    }
    Ok(table)
}
