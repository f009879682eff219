use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use itertools::iproduct;

use crate::config::Definitions;
use crate::data::loader::{self, ResultDir};
use crate::data::tables::MetricTable;
use crate::jobs::families::{progress_bar, MetricFamily, SCALAR_FAMILIES};
use crate::jobs::snapshots;
use crate::plot::raincloud;
use crate::plot::scatter_matrix::{self, MatrixDim, MatrixSeries};
use crate::stats::{self, Bounds};

const RAINCLOUD_PANEL: (u32, u32) = (1200, 1200);
const SCATTER_CELL: (u32, u32) = (800, 800);

/// Combined figures across all scalar metric families: a raincloud panel
/// row and a metric-by-metric scatter matrix, suite-wide and per problem
/// instance.
pub fn run(defs: &Definitions, base: &Path) -> Result<()> {
    let dir = ResultDir::new(base);
    let out_dir = dir.family_dir("metrics");
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("[INFO] metrics: suite-wide figures ...");
    render_set(defs, &dir, &out_dir, None)?;

    println!("[INFO] metrics: per-problem figures ...");
    let pb = progress_bar(defs.problems.len());
    for problem in &defs.problems {
        render_set(defs, &dir, &out_dir, Some(problem))?;
        pb.inc(1);
    }
    pb.finish();
    Ok(())
}

fn render_set(
    defs: &Definitions,
    dir: &ResultDir,
    out_dir: &Path,
    problem: Option<&String>,
) -> Result<()> {
    let mut tables: Vec<(&MetricFamily, MetricTable, Bounds)> = Vec::new();
    for family in SCALAR_FAMILIES {
        let table = pooled_table(family, defs, dir, problem)?;
        let bounds = stats::padded_bounds(table.all_values(), family.ratio).with_context(|| {
            format!("no {} results for the combined metrics figures", family.key)
        })?;
        tables.push((family, table, bounds));
    }

    let suffix = problem.map(|p| format!("_{}", p)).unwrap_or_default();
    let title = problem.map(String::as_str).unwrap_or(&defs.suite_label);

    let panels: Vec<(&str, &MetricTable, Bounds)> = tables
        .iter()
        .map(|(family, table, bounds)| (family.label, table, *bounds))
        .collect();
    raincloud::raincloud_row_figure(
        &out_dir.join(format!("raincloud{}.png", suffix)),
        RAINCLOUD_PANEL,
        title,
        &panels,
        defs,
        false,
    )?;

    let dims: Vec<MatrixDim> = tables
        .iter()
        .map(|(family, _, bounds)| MatrixDim {
            label: family.label.to_string(),
            bounds: *bounds,
        })
        .collect();
    let series = solver_series(defs, |solver| {
        tables
            .iter()
            .map(|(_, table, _)| table.samples_of(solver).unwrap_or(&[]).to_vec())
            .collect()
    });
    scatter_matrix::scatter_matrix_figure(
        &out_dir.join(format!("scatter{}.png", suffix)),
        SCATTER_CELL,
        title,
        &dims,
        &series,
        defs,
        true,
        true,
    )?;
    Ok(())
}

/// Per-snapshot combined figures from the three snapshot families, all
/// axes fixed to [0, 1].
pub fn run_snapshots(defs: &Definitions, base: &Path) -> Result<()> {
    let dir = ResultDir::new(base);
    let out_dir = dir.family_dir("metrics_snapshots");
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("[INFO] metrics_snapshots: loading checkpoint files ...");
    let mut snaps = Vec::new();
    for family in SCALAR_FAMILIES {
        snaps.push((family, snapshots::load_table(family, defs, &dir)?));
    }

    println!("[INFO] metrics_snapshots: per-snapshot figures ...");
    let slots = defs.num_snapshots + 1;
    let pb = progress_bar(slots);
    for slot in 0..slots {
        let tables: Vec<(&MetricFamily, MetricTable)> = snaps
            .iter()
            .map(|(family, snap)| (*family, snap.table_at(slot)))
            .collect();
        if tables.iter().all(|(_, table)| table.is_empty()) {
            pb.inc(1);
            continue;
        }

        let panels: Vec<(&str, &MetricTable, Bounds)> = tables
            .iter()
            .map(|(family, table)| (family.label, table, Bounds::UNIT))
            .collect();
        raincloud::raincloud_row_figure(
            &out_dir.join(format!("raincloud_{}.png", slot)),
            RAINCLOUD_PANEL,
            &defs.suite_label,
            &panels,
            defs,
            true,
        )?;

        let dims: Vec<MatrixDim> = tables
            .iter()
            .map(|(family, _)| MatrixDim {
                label: family.label.to_string(),
                bounds: Bounds::UNIT,
            })
            .collect();
        let series = solver_series(defs, |solver| {
            tables
                .iter()
                .map(|(_, table)| table.samples_of(solver).unwrap_or(&[]).to_vec())
                .collect()
        });
        scatter_matrix::scatter_matrix_figure(
            &out_dir.join(format!("scatter_{}.png", slot)),
            SCATTER_CELL,
            &defs.suite_label,
            &dims,
            &series,
            defs,
            true,
            true,
        )?;
        pb.inc(1);
    }
    pb.finish();
    Ok(())
}

/// Per-solver samples of one family pooled over the seeded run files,
/// optionally restricted to one problem instance.
pub fn pooled_table(
    family: &MetricFamily,
    defs: &Definitions,
    dir: &ResultDir,
    problem: Option<&String>,
) -> Result<MetricTable> {
    let selected: Vec<&str> = match problem {
        Some(p) => vec![p.as_str()],
        None => defs.problems.iter().map(String::as_str).collect(),
    };
    let mut table = MetricTable::with_solvers(&defs.solvers);
    for solver in &defs.solvers {
        for (problem, seed) in iproduct!(&selected, &defs.seeds) {
            if let Some(values) =
                loader::read_scalar_column(&dir.run(family.key, problem, solver, *seed))?
            {
                table.push(solver, values);
            }
        }
    }
    Ok(table)
}

/// One labeled matrix series per solver that contributed data to at least
/// one metric column.
fn solver_series<F>(defs: &Definitions, columns_of: F) -> Vec<MatrixSeries>
where
    F: Fn(&str) -> Vec<Vec<f64>>,
{
    defs.solvers
        .iter()
        .enumerate()
        .filter_map(|(idx, solver)| {
            let columns = columns_of(solver);
            if columns.iter().all(Vec::is_empty) {
                return None;
            }
            Some(MatrixSeries {
                palette_idx: idx,
                secondary: false,
                alpha: 0.6,
                label: Some(defs.label(solver).to_string()),
                columns,
            })
        })
        .collect()
}
