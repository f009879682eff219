use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Experiment definitions shared by every chart job: problem instances,
/// solver identifiers, seeds, snapshot-run versions and the palettes /
/// display labels tied to the solver ordering. Built once in `main` and
/// passed by reference into the jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Definitions {
    /// Title used for suite-wide figures that pool every problem instance.
    pub suite_label: String,
    pub problems: Vec<String>,
    pub solvers: Vec<String>,
    /// Human-readable name per solver; solvers without an entry fall back
    /// to their identifier.
    pub solver_labels: HashMap<String, String>,
    pub seeds: Vec<u64>,
    /// Run qualifiers used by the snapshot file families.
    pub versions: Vec<String>,
    /// Number of intermediate snapshots per run; files carry
    /// `num_snapshots + 1` rows (the final state included).
    pub num_snapshots: usize,
    /// Primary palette, one hex color per solver position.
    pub colors: Vec<String>,
    /// Secondary palette, used for best-solution overlays.
    pub colors2: Vec<String>,
    /// Only solvers whose identifier starts with this prefix maintain an
    /// elite set, so only they appear in the num_elites chart.
    pub elites_solver_prefix: String,
}

impl Default for Definitions {
    fn default() -> Self {
        let solvers = vec![
            "nsga2".to_string(),
            "nspso".to_string(),
            "moead".to_string(),
            "mhaco".to_string(),
            "ihs".to_string(),
            "nsbrkga".to_string(),
        ];
        let labels = [
            ("nsga2", "NSGA-II"),
            ("nspso", "NSPSO"),
            ("moead", "MOEA/D"),
            ("mhaco", "MHACO"),
            ("ihs", "IHS"),
            ("nsbrkga", "NSBRKGA"),
        ];
        Self {
            suite_label: "ZDT".to_string(),
            problems: vec![
                "zdt1".to_string(),
                "zdt2".to_string(),
                "zdt3".to_string(),
                "zdt4".to_string(),
                "zdt6".to_string(),
            ],
            solvers,
            solver_labels: labels
                .iter()
                .map(|(s, l)| (s.to_string(), l.to_string()))
                .collect(),
            seeds: (0..30).collect(),
            versions: vec!["best".to_string(), "median".to_string()],
            num_snapshots: 10,
            colors: vec![
                "#1f77b4".to_string(),
                "#ff7f0e".to_string(),
                "#2ca02c".to_string(),
                "#d62728".to_string(),
                "#9467bd".to_string(),
                "#8c564b".to_string(),
                "#e377c2".to_string(),
                "#7f7f7f".to_string(),
                "#bcbd22".to_string(),
                "#17becf".to_string(),
            ],
            colors2: vec![
                "#aec7e8".to_string(),
                "#ffbb78".to_string(),
                "#98df8a".to_string(),
                "#ff9896".to_string(),
                "#c5b0d5".to_string(),
                "#c49c94".to_string(),
                "#f7b6d2".to_string(),
                "#c7c7c7".to_string(),
                "#dbdb8d".to_string(),
                "#9edae5".to_string(),
            ],
            elites_solver_prefix: "nsbrkga".to_string(),
        }
    }
}

impl Definitions {
    pub fn from_json(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("failed to open definitions file {}", path.display()))?;
        let defs = serde_json::from_reader(file)
            .with_context(|| format!("failed to parse definitions file {}", path.display()))?;
        Ok(defs)
    }

    pub fn label<'a>(&'a self, solver: &'a str) -> &'a str {
        self.solver_labels
            .get(solver)
            .map(String::as_str)
            .unwrap_or(solver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_palettes_cover_solvers() {
        let defs = Definitions::default();
        assert!(defs.colors.len() >= defs.solvers.len());
        assert!(defs.colors2.len() >= defs.solvers.len());
    }

    #[test]
    fn label_falls_back_to_identifier() {
        let defs = Definitions::default();
        assert_eq!(defs.label("nsga2"), "NSGA-II");
        assert_eq!(defs.label("unknown_solver"), "unknown_solver");
    }

    #[test]
    fn partial_json_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"suite_label": "DTLZ", "problems": ["dtlz1"], "num_snapshots": 4}}"#
        )
        .unwrap();
        let defs = Definitions::from_json(file.path()).unwrap();
        assert_eq!(defs.suite_label, "DTLZ");
        assert_eq!(defs.problems, vec!["dtlz1".to_string()]);
        assert_eq!(defs.num_snapshots, 4);
        // untouched fields keep their defaults
        assert_eq!(defs.solvers, Definitions::default().solvers);
    }
}
