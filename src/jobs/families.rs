use indicatif::{ProgressBar, ProgressStyle};

/// One scalar metric family: the directory it lives in, its axis label
/// and whether its values are ratio-typed (axis clamped to [0, 1]).
#[derive(Debug, Clone, Copy)]
pub struct MetricFamily {
    pub key: &'static str,
    pub label: &'static str,
    pub ratio: bool,
}

impl MetricFamily {
    pub fn snapshots_key(&self) -> String {
        format!("{}_snapshots", self.key)
    }
}

pub const HYPERVOLUME: MetricFamily = MetricFamily {
    key: "hypervolume",
    label: "Hypervolume Ratio",
    ratio: true,
};

pub const IGD_PLUS: MetricFamily = MetricFamily {
    key: "igd_plus",
    label: "Modified Inverted Generational Distance",
    ratio: true,
};

pub const MULTIPLICATIVE_EPSILON: MetricFamily = MetricFamily {
    key: "multiplicative_epsilon",
    label: "Multiplicative Epsilon Indicator",
    ratio: true,
};

pub const SCALAR_FAMILIES: [&MetricFamily; 3] =
    [&HYPERVOLUME, &IGD_PLUS, &MULTIPLICATIVE_EPSILON];

pub fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .unwrap()
            .progress_chars("##-"),
    );
    pb
}
