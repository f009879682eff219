use std::ops::Range;

use anyhow::{anyhow, Result};
use plotters::chart::ChartContext;
use plotters::coord::CoordTranslate;
use plotters::prelude::*;

use crate::config::Definitions;
use crate::stats::Bounds;

/// Marker shape assigned to a solver by its palette index, stable across
/// every chart kind of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerShape {
    Circle,
    Cross,
    Triangle,
}

impl MarkerShape {
    pub fn of(palette_idx: usize) -> Self {
        match palette_idx % 3 {
            0 => MarkerShape::Circle,
            1 => MarkerShape::Cross,
            _ => MarkerShape::Triangle,
        }
    }
}

pub fn color_from_hex(hex: &str) -> Result<RGBColor> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if digits.len() != 6 {
        return Err(anyhow!("invalid palette color `{}`", hex));
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map_err(|_| anyhow!("invalid palette color `{}`", hex))
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

pub fn solver_color(defs: &Definitions, palette_idx: usize) -> Result<RGBColor> {
    color_from_hex(&defs.colors[palette_idx % defs.colors.len()])
}

pub fn overlay_color(defs: &Definitions, palette_idx: usize) -> Result<RGBColor> {
    color_from_hex(&defs.colors2[palette_idx % defs.colors2.len()])
}

/// Axis range for a bounds pair; a degenerate span (all samples equal) is
/// widened at render time only so the coordinate system stays valid.
pub fn axis_range(bounds: Bounds) -> Range<f64> {
    if bounds.range() < 1e-9 {
        (bounds.min - 0.5)..(bounds.max + 0.5)
    } else {
        bounds.min..bounds.max
    }
}

/// Deterministic strip-plot jitter in [0, 1); low-discrepancy by sample
/// index so reruns produce identical images.
pub fn jitter(k: usize) -> f64 {
    (k as f64 * 0.618033988749895).fract()
}

/// Draw one scatter series with the solver's marker shape, optionally
/// registering a legend entry.
pub fn draw_points<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    points: &[(f64, f64)],
    shape: MarkerShape,
    style: ShapeStyle,
    size: i32,
    label: Option<(&str, RGBColor)>,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
    CT: CoordTranslate<From = (f64, f64)>,
{
    let anno = match shape {
        MarkerShape::Circle => {
            chart.draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), size, style)))?
        }
        MarkerShape::Cross => {
            chart.draw_series(points.iter().map(|&(x, y)| Cross::new((x, y), size, style)))?
        }
        MarkerShape::Triangle => chart
            .draw_series(points.iter().map(|&(x, y)| TriangleMarker::new((x, y), size, style)))?,
    };
    if let Some((text, color)) = label {
        let glyph = color.filled();
        match shape {
            MarkerShape::Circle => {
                anno.label(text).legend(move |(x, y)| Circle::new((x, y), 4, glyph));
            }
            MarkerShape::Cross => {
                anno.label(text).legend(move |(x, y)| Cross::new((x, y), 4, glyph));
            }
            MarkerShape::Triangle => {
                anno.label(text).legend(move |(x, y)| TriangleMarker::new((x, y), 4, glyph));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_palette_entries_parse() {
        assert_eq!(color_from_hex("#1f77b4").unwrap(), RGBColor(0x1f, 0x77, 0xb4));
        assert_eq!(color_from_hex("ff7f0e").unwrap(), RGBColor(0xff, 0x7f, 0x0e));
        assert!(color_from_hex("#xyzxyz").is_err());
        assert!(color_from_hex("#fff").is_err());
    }

    #[test]
    fn marker_assignment_is_stable() {
        assert_eq!(MarkerShape::of(0), MarkerShape::Circle);
        assert_eq!(MarkerShape::of(1), MarkerShape::Cross);
        assert_eq!(MarkerShape::of(2), MarkerShape::Triangle);
        assert_eq!(MarkerShape::of(3), MarkerShape::Circle);
    }

    #[test]
    fn degenerate_bounds_widen_only_at_render_time() {
        let r = axis_range(crate::stats::Bounds { min: 0.4, max: 0.4 });
        assert!(r.start < 0.4 && r.end > 0.4);
        let r = axis_range(crate::stats::Bounds { min: 0.1, max: 0.6 });
        assert_eq!((r.start, r.end), (0.1, 0.6));
    }

    #[test]
    fn jitter_stays_in_unit_interval() {
        for k in 0..100 {
            let j = jitter(k);
            assert!((0.0..1.0).contains(&j));
        }
    }
}
