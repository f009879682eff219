use ordered_float::OrderedFloat;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("cannot aggregate an empty sample")]
    EmptyInput,
}

/// Inclusive axis interval shared by every chart of one metric family.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const UNIT: Bounds = Bounds { min: 0.0, max: 1.0 };

    pub fn range(&self) -> f64 {
        self.max - self.min
    }
}

/// Global extent of `values` padded by `round(0.025 * range)` on each side.
/// The padding rounds to the nearest whole unit, so metric families whose
/// natural range is below ~20 units end up with zero padding; ratio-typed
/// families additionally clamp to [0, 1].
pub fn padded_bounds(
    values: impl IntoIterator<Item = f64>,
    clamp_unit: bool,
) -> Result<Bounds, StatsError> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = false;
    for v in values {
        seen = true;
        if v < min {
            min = v;
        }
        if v > max {
            max = v;
        }
    }
    if !seen {
        return Err(StatsError::EmptyInput);
    }
    let pad = (0.025 * (max - min)).round();
    let mut lo = min - pad;
    let mut hi = max + pad;
    if clamp_unit {
        lo = lo.max(0.0);
        hi = hi.min(1.0);
    }
    Ok(Bounds { min: lo, max: hi })
}

pub fn mean(xs: &[f64]) -> Result<f64, StatsError> {
    if xs.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

/// First, second and third quartile, estimated by linear interpolation
/// between order statistics. A singleton sample yields that value for all
/// three.
pub fn quartiles(xs: &[f64]) -> Result<[f64; 3], StatsError> {
    if xs.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    let mut sorted = xs.to_vec();
    sorted.sort_by_key(|v| OrderedFloat(*v));
    Ok([
        quantile_sorted(&sorted, 0.25),
        quantile_sorted(&sorted, 0.50),
        quantile_sorted(&sorted, 0.75),
    ])
}

fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let h = (n - 1) as f64 * p;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    let frac = h - lo as f64;
    (1.0 - frac) * sorted[lo] + frac * sorted[hi]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_cover_all_samples() {
        let samples = [0.10, 0.20, 0.30, 0.50, 0.60];
        let b = padded_bounds(samples.iter().copied(), true).unwrap();
        // range 0.5 -> padding round(0.0125) = 0
        assert_eq!(b, Bounds { min: 0.10, max: 0.60 });
        assert!(samples.iter().all(|&v| b.min <= v && v <= b.max));
    }

    #[test]
    fn bounds_padding_rounds_to_whole_units() {
        // range 120 -> padding round(3.0) = 3
        let b = padded_bounds([0.0, 120.0].into_iter(), false).unwrap();
        assert_eq!(b, Bounds { min: -3.0, max: 123.0 });
    }

    #[test]
    fn ratio_bounds_stay_inside_unit_interval() {
        // range 40 would pad by 1 on each side without the clamp
        let b = padded_bounds([0.2, 40.2].into_iter(), true).unwrap();
        assert!(b.min >= 0.0);
        assert!(b.max <= 1.0);
    }

    #[test]
    fn bounds_of_empty_input_fail() {
        assert_eq!(
            padded_bounds(std::iter::empty(), true),
            Err(StatsError::EmptyInput)
        );
    }

    #[test]
    fn mean_matches_arithmetic_mean() {
        assert_eq!(mean(&[0.5, 1.5, 2.5]).unwrap(), 1.5);
        assert_eq!(mean(&[]), Err(StatsError::EmptyInput));
    }

    #[test]
    fn quartiles_interpolate_between_order_statistics() {
        let q = quartiles(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(q, [1.75, 2.5, 3.25]);
    }

    #[test]
    fn quartiles_of_singleton_collapse() {
        assert_eq!(quartiles(&[0.42]).unwrap(), [0.42, 0.42, 0.42]);
    }

    #[test]
    fn quartiles_of_empty_input_fail() {
        assert_eq!(quartiles(&[]), Err(StatsError::EmptyInput));
    }
}
