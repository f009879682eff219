use std::path::Path;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::Definitions;
use crate::data::loader::SnapshotRow;
use crate::data::tables::SnapshotTable;
use crate::plot::style::{self, MarkerShape};
use crate::stats::{self, Bounds};

const FIGURE_SIZE: (u32, u32) = (900, 650);

/// Mean metric value against mean elapsed time per snapshot slot, one
/// line per solver on a log time axis. Written as PNG and, when a vector
/// path is given, as SVG from the same draw routine.
pub fn mean_over_time(
    png: &Path,
    svg: Option<&Path>,
    title: &str,
    ylabel: &str,
    defs: &Definitions,
    snap: &SnapshotTable,
    bounds: Bounds,
) -> Result<()> {
    let series = mean_series(defs, snap)?;
    let max_time = snap.max_time().unwrap_or(10.0);
    {
        let root = BitMapBackend::new(png, FIGURE_SIZE).into_drawing_area();
        draw_mean(&root, title, ylabel, defs, &series, max_time, bounds)?;
    }
    if let Some(svg_path) = svg {
        let root = SVGBackend::new(svg_path, FIGURE_SIZE).into_drawing_area();
        draw_mean(&root, title, ylabel, defs, &series, max_time, bounds)?;
    }
    Ok(())
}

fn mean_series(
    defs: &Definitions,
    snap: &SnapshotTable,
) -> Result<Vec<(usize, Vec<(f64, f64)>)>> {
    let mut out = Vec::new();
    for (idx, solver) in defs.solvers.iter().enumerate() {
        if !snap.solver_has_data(idx) {
            continue;
        }
        let mut points = Vec::with_capacity(snap.slots());
        for slot in 0..snap.slots() {
            let x = stats::mean(snap.times_at(idx, slot))
                .with_context(|| format!("{}: no data at snapshot {}", solver, slot))?;
            let y = stats::mean(snap.values_at(idx, slot))
                .with_context(|| format!("{}: no data at snapshot {}", solver, slot))?;
            points.push((x, y));
        }
        out.push((idx, points));
    }
    Ok(out)
}

fn draw_mean<DB>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    ylabel: &str,
    defs: &Definitions,
    series: &[(usize, Vec<(f64, f64)>)],
    max_time: f64,
    bounds: Bounds,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 30))?;
    let mut chart = ChartBuilder::on(&inner)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (1.0..max_time.max(10.0)).log_scale(),
            style::axis_range(bounds),
        )?;
    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(ylabel)
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    for (idx, points) in series {
        let color = style::solver_color(defs, *idx)?;
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.mix(0.8).stroke_width(2),
            ))?
            .label(defs.label(&defs.solvers[*idx]))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
        style::draw_points(
            &mut chart,
            points,
            MarkerShape::of(*idx),
            color.filled(),
            4,
            None,
        )?;
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Median line per solver with the first-to-third-quartile band shaded
/// underneath, against mean elapsed time per snapshot slot.
pub fn quartiles_over_time(
    path: &Path,
    title: &str,
    ylabel: &str,
    defs: &Definitions,
    snap: &SnapshotTable,
    bounds: Bounds,
) -> Result<()> {
    struct QuartileSeries {
        palette_idx: usize,
        xs: Vec<f64>,
        q1: Vec<f64>,
        q2: Vec<f64>,
        q3: Vec<f64>,
    }

    let mut series = Vec::new();
    for (idx, solver) in defs.solvers.iter().enumerate() {
        if !snap.solver_has_data(idx) {
            continue;
        }
        let mut s = QuartileSeries {
            palette_idx: idx,
            xs: Vec::with_capacity(snap.slots()),
            q1: Vec::with_capacity(snap.slots()),
            q2: Vec::with_capacity(snap.slots()),
            q3: Vec::with_capacity(snap.slots()),
        };
        for slot in 0..snap.slots() {
            let x = stats::mean(snap.times_at(idx, slot))
                .with_context(|| format!("{}: no data at snapshot {}", solver, slot))?;
            let [q1, q2, q3] = stats::quartiles(snap.values_at(idx, slot))
                .with_context(|| format!("{}: no data at snapshot {}", solver, slot))?;
            s.xs.push(x);
            s.q1.push(q1);
            s.q2.push(q2);
            s.q3.push(q3);
        }
        series.push(s);
    }

    let max_time = snap.max_time().unwrap_or(10.0);
    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 30))?;
    let mut chart = ChartBuilder::on(&inner)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_time * 1.05, style::axis_range(bounds))?;
    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(ylabel)
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    // shaded bands first, so every median line stays visible
    for s in &series {
        let color = style::solver_color(defs, s.palette_idx)?;
        let mut band: Vec<(f64, f64)> = s.xs.iter().zip(s.q3.iter()).map(|(&x, &q)| (x, q)).collect();
        band.extend(s.xs.iter().zip(s.q1.iter()).rev().map(|(&x, &q)| (x, q)));
        chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.25).filled())))?;
    }
    for s in &series {
        let color = style::solver_color(defs, s.palette_idx)?;
        let median: Vec<(f64, f64)> =
            s.xs.iter().zip(s.q2.iter()).map(|(&x, &q)| (x, q)).collect();
        chart
            .draw_series(LineSeries::new(
                median.iter().copied(),
                color.mix(0.75).stroke_width(2),
            ))?
            .label(defs.label(&defs.solvers[s.palette_idx]))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
        style::draw_points(
            &mut chart,
            &median,
            MarkerShape::of(s.palette_idx),
            color.filled(),
            4,
            None,
        )?;
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

/// Count-over-time line chart (elite-set sizes, non-dominated front
/// counts), axes anchored at zero.
pub fn counts_over_time(
    path: &Path,
    title: &str,
    ylabel: &str,
    defs: &Definitions,
    series: &[(usize, Vec<SnapshotRow>)],
) -> Result<()> {
    let max_x = series
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|r| r.time))
        .fold(0.0_f64, f64::max)
        .max(1.0);
    let max_y = series
        .iter()
        .flat_map(|(_, rows)| rows.iter().map(|r| r.value))
        .fold(0.0_f64, f64::max)
        .max(1.0);

    let root = BitMapBackend::new(path, FIGURE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 30))?;
    let mut chart = ChartBuilder::on(&inner)
        .margin(10)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(0.0..max_x * 1.05, 0.0..max_y * 1.05)?;
    chart
        .configure_mesh()
        .x_desc("Time (s)")
        .y_desc(ylabel)
        .axis_desc_style(("sans-serif", 20))
        .draw()?;

    for (idx, rows) in series {
        let color = style::solver_color(defs, *idx)?;
        let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.time, r.value)).collect();
        chart
            .draw_series(LineSeries::new(
                points.iter().copied(),
                color.mix(0.8).stroke_width(2),
            ))?
            .label(defs.label(&defs.solvers[*idx]))
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.filled()));
        style::draw_points(
            &mut chart,
            &points,
            MarkerShape::of(*idx),
            color.filled(),
            3,
            None,
        )?;
    }
    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}
