use std::env;
use std::path::{Path, PathBuf};

use pareto_plots::config::Definitions;
use pareto_plots::jobs::{counts, families, geometry, metrics, scalar, snapshots};

const JOBS: [&str; 12] = [
    "hypervolume",
    "igd_plus",
    "multiplicative_epsilon",
    "metrics",
    "hypervolume_snapshots",
    "igd_plus_snapshots",
    "multiplicative_epsilon_snapshots",
    "metrics_snapshots",
    "best_solutions_snapshots",
    "populations_snapshots",
    "num_elites_snapshots",
    "num_fronts_snapshots",
];

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        println!("Usage: pareto_plots <job|all> [results_dir] [definitions.json]");
        println!("Jobs: {}", JOBS.join(", "));
        return Ok(());
    }
    let base = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let defs = match args.get(3) {
        Some(path) => Definitions::from_json(Path::new(path))?,
        None => Definitions::default(),
    };

    if args[1] == "all" {
        // chart families are independent batch jobs; one failing family
        // does not stop the others
        let mut failed = 0;
        for job in JOBS {
            if let Err(err) = run_job(job, &defs, &base) {
                eprintln!("[WARN] {}: {:#}", job, err);
                failed += 1;
            }
        }
        if failed > 0 {
            anyhow::bail!("{} of {} chart jobs failed", failed, JOBS.len());
        }
        return Ok(());
    }
    run_job(&args[1], &defs, &base)
}

fn run_job(job: &str, defs: &Definitions, base: &Path) -> anyhow::Result<()> {
    match job {
        "hypervolume" => scalar::run(&families::HYPERVOLUME, defs, base),
        "igd_plus" => scalar::run(&families::IGD_PLUS, defs, base),
        "multiplicative_epsilon" => scalar::run(&families::MULTIPLICATIVE_EPSILON, defs, base),
        "metrics" => metrics::run(defs, base),
        "hypervolume_snapshots" => snapshots::run(&families::HYPERVOLUME, defs, base),
        "igd_plus_snapshots" => snapshots::run(&families::IGD_PLUS, defs, base),
        "multiplicative_epsilon_snapshots" => {
            snapshots::run(&families::MULTIPLICATIVE_EPSILON, defs, base)
        }
        "metrics_snapshots" => metrics::run_snapshots(defs, base),
        "best_solutions_snapshots" => geometry::run_best_solutions(defs, base),
        "populations_snapshots" => geometry::run_populations(defs, base),
        "num_elites_snapshots" => counts::run_elites(defs, base),
        "num_fronts_snapshots" => counts::run_fronts(defs, base),
        other => anyhow::bail!("unknown job `{}`", other),
    }
}
