use std::collections::HashMap;
use std::fs;
use std::path::Path;

use pareto_plots::config::Definitions;
use pareto_plots::data::loader::ResultDir;
use pareto_plots::jobs::{counts, families, metrics, scalar, snapshots};
use pareto_plots::stats;

fn test_defs() -> Definitions {
    Definitions {
        suite_label: "ZDT".to_string(),
        problems: vec!["zdtA".to_string()],
        solvers: vec!["solverX".to_string(), "solverY".to_string()],
        solver_labels: HashMap::from([
            ("solverX".to_string(), "Solver X".to_string()),
            ("solverY".to_string(), "Solver Y".to_string()),
        ]),
        seeds: vec![1, 2],
        versions: vec!["best".to_string()],
        num_snapshots: 2,
        elites_solver_prefix: "solverX".to_string(),
        ..Definitions::default()
    }
}

fn write(base: &Path, family: &str, name: &str, content: &str) {
    let dir = base.join(family);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), content).unwrap();
}

#[test]
fn raincloud_table_has_one_row_per_contributing_solver() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "hypervolume", "zdtA_solverX.txt", "0.10\n0.20\n0.30\n");
    write(tmp.path(), "hypervolume", "zdtA_solverY.txt", "0.50\n0.60\n");

    let defs = test_defs();
    let dir = ResultDir::new(tmp.path());
    let table = scalar::problem_table(&families::HYPERVOLUME, &defs, &dir, "zdtA").unwrap();

    let groups: Vec<_> = table.groups().collect();
    assert_eq!(groups.len(), 2);
    let labels: Vec<&str> = groups.iter().map(|(_, s, _)| defs.label(s)).collect();
    assert_eq!(labels, vec!["Solver X", "Solver Y"]);
    assert_eq!(groups[0].2.len(), 3);
    assert_eq!(groups[1].2.len(), 2);

    // global bounds: range 0.5, padding round(0.0125) = 0, already in [0, 1]
    let bounds = stats::padded_bounds(table.all_values(), true).unwrap();
    assert_eq!((bounds.min, bounds.max), (0.10, 0.60));
}

#[test]
fn suite_table_skips_missing_seed_files() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "hypervolume", "zdtA_solverX_1.txt", "0.70\n");
    write(tmp.path(), "hypervolume", "zdtA_solverY_2.txt", "0.80\n0.90\n");

    let defs = test_defs();
    let dir = ResultDir::new(tmp.path());
    let table = scalar::suite_table(&families::HYPERVOLUME, &defs, &dir).unwrap();

    assert_eq!(table.samples_of("solverX").unwrap(), &[0.70]);
    assert_eq!(table.samples_of("solverY").unwrap(), &[0.80, 0.90]);
}

#[test]
fn snapshot_table_pools_by_row_index() {
    let tmp = tempfile::tempdir().unwrap();
    // three slots (num_snapshots = 2); seed 2's run stops one checkpoint early
    write(
        tmp.path(),
        "hypervolume_snapshots",
        "zdtA_solverX_1.txt",
        "5,1.0,0.40\n9,2.0,0.60\n12,4.0,0.80\n",
    );
    write(
        tmp.path(),
        "hypervolume_snapshots",
        "zdtA_solverX_2.txt",
        "4,1.0,0.20\n8,2.0,0.40\n",
    );

    let defs = test_defs();
    let dir = ResultDir::new(tmp.path());
    let snap = snapshots::load_table(&families::HYPERVOLUME, &defs, &dir).unwrap();

    assert_eq!(snap.slots(), 3);
    // slot 0 pools both seeds
    assert!((stats::mean(snap.values_at(0, 0)).unwrap() - 0.30).abs() < 1e-12);
    assert_eq!(snap.values_at(0, 1), &[0.60, 0.40]);
    // only the longer run reaches slot 2
    assert_eq!(snap.values_at(0, 2), &[0.80]);
    assert!(!snap.solver_has_data(1));
    assert_eq!(snap.max_time(), Some(4.0));
}

#[test]
fn pooled_metrics_table_respects_problem_filter() {
    let tmp = tempfile::tempdir().unwrap();
    write(tmp.path(), "igd_plus", "zdtA_solverX_1.txt", "0.10\n");
    write(tmp.path(), "igd_plus", "zdtB_solverX_1.txt", "0.90\n");

    let mut defs = test_defs();
    defs.problems = vec!["zdtA".to_string(), "zdtB".to_string()];
    let dir = ResultDir::new(tmp.path());

    let all = metrics::pooled_table(&families::IGD_PLUS, &defs, &dir, None).unwrap();
    assert_eq!(all.samples_of("solverX").unwrap(), &[0.10, 0.90]);

    let only_a = "zdtA".to_string();
    let filtered = metrics::pooled_table(&families::IGD_PLUS, &defs, &dir, Some(&only_a)).unwrap();
    assert_eq!(filtered.samples_of("solverX").unwrap(), &[0.10]);
}

#[test]
fn count_series_honor_the_solver_prefix() {
    let tmp = tempfile::tempdir().unwrap();
    write(
        tmp.path(),
        "num_elites_snapshots",
        "zdtA_solverX_best.txt",
        "1 0.5 10\n2 1.5 14\n",
    );
    write(
        tmp.path(),
        "num_elites_snapshots",
        "zdtA_solverY_best.txt",
        "1 0.5 9\n",
    );

    let defs = test_defs();
    let dir = ResultDir::new(tmp.path());
    let series = counts::load_series(
        &defs,
        &dir,
        "num_elites_snapshots",
        "zdtA",
        "best",
        Some(defs.elites_solver_prefix.as_str()),
    )
    .unwrap();

    // only solverX matches the configured prefix
    assert_eq!(series.len(), 1);
    let (idx, rows) = &series[0];
    assert_eq!(*idx, 0);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].time, 1.5);
    assert_eq!(rows[1].value, 14.0);

    let unfiltered =
        counts::load_series(&defs, &dir, "num_elites_snapshots", "zdtA", "best", None).unwrap();
    assert_eq!(unfiltered.len(), 2);
}
