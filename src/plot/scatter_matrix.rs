use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::Definitions;
use crate::plot::kde::Kde;
use crate::plot::style::{self, MarkerShape};
use crate::stats::Bounds;

/// One axis of the matrix: its label and the shared bounds every cell
/// using this dimension reuses.
#[derive(Debug, Clone)]
pub struct MatrixDim {
    pub label: String,
    pub bounds: Bounds,
}

/// One overlaid data set: a column of samples per dimension. Scatter cells
/// pair columns by position, so rows present in one dimension but not the
/// other do not contribute.
#[derive(Debug, Clone)]
pub struct MatrixSeries {
    pub palette_idx: usize,
    /// Use the secondary palette (best-solution overlays).
    pub secondary: bool,
    pub alpha: f64,
    pub label: Option<String>,
    pub columns: Vec<Vec<f64>>,
}

impl MatrixSeries {
    pub fn from_points(
        palette_idx: usize,
        secondary: bool,
        alpha: f64,
        label: Option<String>,
        points: &[[f64; 2]],
    ) -> Self {
        Self {
            palette_idx,
            secondary,
            alpha,
            label,
            columns: vec![
                points.iter().map(|p| p[0]).collect(),
                points.iter().map(|p| p[1]).collect(),
            ],
        }
    }

    fn color(&self, defs: &Definitions) -> Result<RGBColor> {
        if self.secondary {
            style::overlay_color(defs, self.palette_idx)
        } else {
            style::solver_color(defs, self.palette_idx)
        }
    }
}

/// Square matrix figure: density on the diagonal, pairwise scatter off it,
/// with row = y dimension and column = x dimension.
pub fn scatter_matrix_figure(
    path: &Path,
    cell_size: (u32, u32),
    title: &str,
    dims: &[MatrixDim],
    series: &[MatrixSeries],
    defs: &Definitions,
    cut_to_data: bool,
    legend: bool,
) -> Result<()> {
    let n = dims.len() as u32;
    let root = BitMapBackend::new(path, (cell_size.0 * n, cell_size.1 * n)).into_drawing_area();
    root.fill(&WHITE)?;
    let inner = root.titled(title, ("sans-serif", 36))?;
    scatter_matrix_on_area(&inner, dims, series, defs, cut_to_data, legend)?;
    root.present()?;
    Ok(())
}

pub fn scatter_matrix_on_area<DB>(
    area: &DrawingArea<DB, Shift>,
    dims: &[MatrixDim],
    series: &[MatrixSeries],
    defs: &Definitions,
    cut_to_data: bool,
    legend: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let n = dims.len();
    let cells = area.split_evenly((n, n));
    for j in 0..n {
        for k in 0..n {
            let cell = &cells[j * n + k];
            if j == k {
                density_cell(cell, j, &dims[j], series, defs, cut_to_data, legend)?;
            } else {
                scatter_cell(cell, (k, j), &dims[k], &dims[j], series, defs, legend)?;
            }
        }
    }
    Ok(())
}

fn density_cell<DB>(
    area: &DrawingArea<DB, Shift>,
    dim_idx: usize,
    dim: &MatrixDim,
    series: &[MatrixSeries],
    defs: &Definitions,
    cut_to_data: bool,
    legend: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut curves = Vec::new();
    for s in series {
        let samples = &s.columns[dim_idx];
        if samples.is_empty() {
            continue;
        }
        let kde = Kde::fit(samples)?;
        let (lo, hi) = if cut_to_data {
            kde.data_range()
        } else {
            (dim.bounds.min, dim.bounds.max)
        };
        curves.push((s, kde.curve(lo, hi, 128)));
    }
    let peak = curves
        .iter()
        .flat_map(|(_, curve)| curve.iter().map(|&(_, d)| d))
        .fold(0.0_f64, f64::max)
        .max(1e-9);

    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(45)
        .y_label_area_size(45)
        .build_cartesian_2d(style::axis_range(dim.bounds), 0.0..peak * 1.1)?;
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(0)
        .x_desc(dim.label.as_str())
        .y_desc("Density")
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    let mut labeled = false;
    for (s, curve) in curves {
        let color = s.color(defs)?;
        let anno = chart.draw_series(LineSeries::new(
            curve,
            color.mix(s.alpha).stroke_width(2),
        ))?;
        if legend {
            if let Some(text) = &s.label {
                labeled = true;
                anno.label(text.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 16, y)], color.filled())
                });
            }
        }
    }
    if labeled {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}

fn scatter_cell<DB>(
    area: &DrawingArea<DB, Shift>,
    (x_idx, y_idx): (usize, usize),
    x_dim: &MatrixDim,
    y_dim: &MatrixDim,
    series: &[MatrixSeries],
    defs: &Definitions,
    legend: bool,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .margin(8)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(style::axis_range(x_dim.bounds), style::axis_range(y_dim.bounds))?;
    chart
        .configure_mesh()
        .x_desc(x_dim.label.as_str())
        .y_desc(y_dim.label.as_str())
        .axis_desc_style(("sans-serif", 18))
        .draw()?;

    let mut labeled = false;
    for s in series {
        let points: Vec<(f64, f64)> = s.columns[x_idx]
            .iter()
            .zip(s.columns[y_idx].iter())
            .map(|(&x, &y)| (x, y))
            .collect();
        if points.is_empty() {
            continue;
        }
        let color = s.color(defs)?;
        let label = if legend {
            labeled = labeled || s.label.is_some();
            s.label.as_deref().map(|text| (text, color))
        } else {
            None
        };
        style::draw_points(
            &mut chart,
            &points,
            MarkerShape::of(s.palette_idx),
            color.mix(s.alpha).filled(),
            3,
            label,
        )?;
    }
    if labeled {
        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .position(SeriesLabelPosition::UpperRight)
            .draw()?;
    }
    Ok(())
}
