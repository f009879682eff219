use std::path::Path;

use anyhow::Result;
use plotters::chart::ChartContext;
use plotters::coord::CoordTranslate;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::Definitions;
use crate::data::tables::MetricTable;
use crate::plot::kde::Kde;
use crate::plot::style::{self, MarkerShape};
use crate::stats::{self, Bounds};

const VIOLIN_HEIGHT: f64 = 0.5;
const BOX_HALF_HEIGHT: f64 = 0.10;
const CAP_HALF_HEIGHT: f64 = 0.05;
const STRIP_OFFSET: f64 = 0.08;
const STRIP_SPREAD: f64 = 0.25;

/// One figure with a single raincloud panel: half-violin above each
/// solver's row, the raw samples as a jittered strip below it, and a box
/// plot overlay on the baseline.
pub fn raincloud_figure(
    path: &Path,
    size: (u32, u32),
    title: &str,
    axis_label: &str,
    defs: &Definitions,
    table: &MetricTable,
    bounds: Bounds,
    unit_ticks: bool,
) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 40))?;
    raincloud_panel(&inner, axis_label, defs, table, bounds, unit_ticks)?;
    root.present()?;
    Ok(())
}

/// One figure with several raincloud panels side by side, one per metric.
pub fn raincloud_row_figure(
    path: &Path,
    panel_size: (u32, u32),
    title: &str,
    panels: &[(&str, &MetricTable, Bounds)],
    defs: &Definitions,
    unit_ticks: bool,
) -> Result<()> {
    let size = (panel_size.0 * panels.len() as u32, panel_size.1);
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 40))?;
    let areas = inner.split_evenly((1, panels.len()));
    for ((axis_label, table, bounds), area) in panels.iter().zip(areas.iter()) {
        raincloud_panel(area, axis_label, defs, table, *bounds, unit_ticks)?;
    }
    root.present()?;
    Ok(())
}

pub fn raincloud_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    axis_label: &str,
    defs: &Definitions,
    table: &MetricTable,
    bounds: Bounds,
    unit_ticks: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let groups: Vec<(usize, &str, &[f64])> = table.groups().collect();
    let n = groups.len();

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(150)
        .build_cartesian_2d(style::axis_range(bounds), -1.0..n as f64)?;

    let labels: Vec<String> = groups
        .iter()
        .map(|(_, solver, _)| defs.label(solver).to_string())
        .collect();
    let row_label = move |y: &f64| -> String {
        let k = y.round();
        if (y - k).abs() < 0.01 && k >= 0.0 && (k as usize) < labels.len() {
            labels[labels.len() - 1 - k as usize].clone()
        } else {
            String::new()
        }
    };
    {
        let mut mesh = chart.configure_mesh();
        mesh.disable_y_mesh()
            .y_labels(n + 2)
            .y_label_formatter(&row_label)
            .x_desc(axis_label)
            .axis_desc_style(("sans-serif", 22))
            .label_style(("sans-serif", 16));
        if unit_ticks {
            mesh.x_labels(11);
        }
        mesh.draw()?;
    }

    for (row, (palette_idx, _, samples)) in groups.iter().enumerate() {
        let base = (n - 1 - row) as f64;
        let color = style::solver_color(defs, *palette_idx)?;

        // cloud: half violin cut at the sample extremes
        let kde = Kde::fit(samples)?;
        let (lo, hi) = kde.data_range();
        let curve = kde.curve(lo, hi, 128);
        let peak = curve.iter().map(|&(_, d)| d).fold(0.0_f64, f64::max);
        if peak > 0.0 {
            let mut outline = Vec::with_capacity(curve.len() + 2);
            outline.push((lo, base));
            outline.extend(
                curve
                    .iter()
                    .map(|&(x, d)| (x, base + VIOLIN_HEIGHT * d / peak)),
            );
            outline.push((hi, base));
            chart.draw_series(std::iter::once(Polygon::new(outline, color.mix(0.6).filled())))?;
        }

        // rain: the raw samples, deterministically jittered
        let strip: Vec<(f64, f64)> = samples
            .iter()
            .enumerate()
            .map(|(k, &v)| (v, base - STRIP_OFFSET - STRIP_SPREAD * style::jitter(k)))
            .collect();
        style::draw_points(
            &mut chart,
            &strip,
            MarkerShape::Circle,
            color.mix(0.8).filled(),
            2,
            None,
        )?;

        draw_box(&mut chart, samples, base)?;
    }
    Ok(())
}

fn draw_box<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    samples: &[f64],
    base: f64,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let [q1, q2, q3] = stats::quartiles(samples)?;
    let iqr = q3 - q1;
    let lo_fence = samples
        .iter()
        .copied()
        .filter(|v| *v >= q1 - 1.5 * iqr)
        .fold(f64::INFINITY, f64::min);
    let hi_fence = samples
        .iter()
        .copied()
        .filter(|v| *v <= q3 + 1.5 * iqr)
        .fold(f64::NEG_INFINITY, f64::max);
    let stroke = BLACK.stroke_width(2);

    chart.draw_series(std::iter::once(Rectangle::new(
        [(q1, base - BOX_HALF_HEIGHT), (q3, base + BOX_HALF_HEIGHT)],
        stroke,
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(q2, base - BOX_HALF_HEIGHT), (q2, base + BOX_HALF_HEIGHT)],
        stroke,
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(lo_fence, base), (q1, base)],
        stroke,
    )))?;
    chart.draw_series(std::iter::once(PathElement::new(
        vec![(q3, base), (hi_fence, base)],
        stroke,
    )))?;
    for cap in [lo_fence, hi_fence] {
        chart.draw_series(std::iter::once(PathElement::new(
            vec![(cap, base - CAP_HALF_HEIGHT), (cap, base + CAP_HALF_HEIGHT)],
            stroke,
        )))?;
    }
    let fliers: Vec<(f64, f64)> = samples
        .iter()
        .copied()
        .filter(|v| *v < lo_fence || *v > hi_fence)
        .map(|v| (v, base))
        .collect();
    if !fliers.is_empty() {
        chart.draw_series(
            fliers
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 2, BLACK.filled())),
        )?;
    }
    Ok(())
}
