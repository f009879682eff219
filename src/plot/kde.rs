use crate::stats::{self, StatsError};

/// Gaussian kernel density estimate with Silverman's rule-of-thumb
/// bandwidth, used for the violin half of rainclouds and the diagonal
/// density cells of scatter matrices.
#[derive(Debug, Clone)]
pub struct Kde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl Kde {
    pub fn fit(samples: &[f64]) -> Result<Self, StatsError> {
        if samples.is_empty() {
            return Err(StatsError::EmptyInput);
        }
        let n = samples.len() as f64;
        let mean = stats::mean(samples)?;
        let std = (samples.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        let [q1, _, q3] = stats::quartiles(samples)?;
        let iqr = q3 - q1;
        let mut spread = std.min(iqr / 1.34);
        if spread <= 0.0 {
            spread = std.max(iqr / 1.34);
        }
        let mut bandwidth = 0.9 * spread * n.powf(-0.2);
        if bandwidth <= 0.0 {
            // all samples identical; keep the estimator well-defined
            bandwidth = 1e-6;
        }
        Ok(Self {
            samples: samples.to_vec(),
            bandwidth,
        })
    }

    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * self.bandwidth);
        let sum: f64 = self
            .samples
            .iter()
            .map(|&s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum();
        norm * sum / self.samples.len() as f64
    }

    /// Evaluate the density on `steps + 1` evenly spaced points of
    /// `[lo, hi]`.
    pub fn curve(&self, lo: f64, hi: f64, steps: usize) -> Vec<(f64, f64)> {
        let steps = steps.max(1);
        let width = hi - lo;
        (0..=steps)
            .map(|i| {
                let x = lo + width * i as f64 / steps as f64;
                (x, self.evaluate(x))
            })
            .collect()
    }

    /// Sample extent, used to cut the violin at the observed data instead
    /// of letting the tails extend past it.
    pub fn data_range(&self) -> (f64, f64) {
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &s in &self.samples {
            lo = lo.min(s);
            hi = hi.max(s);
        }
        (lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sample_is_rejected() {
        assert!(Kde::fit(&[]).is_err());
    }

    #[test]
    fn density_peaks_near_the_data() {
        let kde = Kde::fit(&[0.4, 0.5, 0.6]).unwrap();
        assert!(kde.evaluate(0.5) > kde.evaluate(5.0));
    }

    #[test]
    fn curve_spans_the_requested_interval() {
        let kde = Kde::fit(&[0.1, 0.2, 0.9]).unwrap();
        let curve = kde.curve(0.0, 1.0, 64);
        assert_eq!(curve.len(), 65);
        assert_eq!(curve[0].0, 0.0);
        assert_eq!(curve[64].0, 1.0);
        assert!(curve.iter().all(|&(_, d)| d >= 0.0));
    }

    #[test]
    fn identical_samples_stay_finite() {
        let kde = Kde::fit(&[0.3, 0.3, 0.3]).unwrap();
        assert!(kde.evaluate(0.3).is_finite());
    }

    #[test]
    fn density_integrates_to_roughly_one() {
        let kde = Kde::fit(&[0.2, 0.4, 0.5, 0.6, 0.8]).unwrap();
        let steps = 2000;
        let (lo, hi) = (-2.0, 3.0);
        let dx = (hi - lo) / steps as f64;
        let mass: f64 = (0..steps)
            .map(|i| kde.evaluate(lo + (i as f64 + 0.5) * dx) * dx)
            .sum();
        assert!((mass - 1.0).abs() < 0.05, "mass = {}", mass);
    }
}
