use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, StringRecord};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{}: line {line}: invalid numeric field `{field}`", path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        field: String,
    },
    #[error("{}: line {line}: expected at least {expected} fields, found {found}", path.display())]
    Arity {
        path: PathBuf,
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("{}: {source}", path.display())]
    Csv {
        path: PathBuf,
        source: csv::Error,
    },
}

/// One checkpoint row of a metric-snapshot or count-snapshot file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapshotRow {
    pub time: f64,
    pub value: f64,
}

/// Path builder for the fixed result-file naming convention
/// `{family}/{problem}_{solver}[_{seed|version}][_{snapshot}].txt` under a
/// base results directory.
#[derive(Debug, Clone, Copy)]
pub struct ResultDir<'a> {
    base: &'a Path,
}

impl<'a> ResultDir<'a> {
    pub fn new(base: &'a Path) -> Self {
        Self { base }
    }

    pub fn family_dir(&self, family: &str) -> PathBuf {
        self.base.join(family)
    }

    /// `{family}/{problem}_{solver}.txt`
    pub fn aggregate(&self, family: &str, problem: &str, solver: &str) -> PathBuf {
        self.family_dir(family)
            .join(format!("{}_{}.txt", problem, solver))
    }

    /// `{family}/{problem}_{solver}_{seed}.txt`
    pub fn run(&self, family: &str, problem: &str, solver: &str, seed: u64) -> PathBuf {
        self.family_dir(family)
            .join(format!("{}_{}_{}.txt", problem, solver, seed))
    }

    /// `{family}/{problem}_{solver}_{version}.txt`
    pub fn versioned(&self, family: &str, problem: &str, solver: &str, version: &str) -> PathBuf {
        self.family_dir(family)
            .join(format!("{}_{}_{}.txt", problem, solver, version))
    }

    /// `{family}/{problem}_{solver}_{version}_{snapshot}.txt`
    pub fn snapshot(
        &self,
        family: &str,
        problem: &str,
        solver: &str,
        version: &str,
        snapshot: usize,
    ) -> PathBuf {
        self.family_dir(family)
            .join(format!("{}_{}_{}_{}.txt", problem, solver, version, snapshot))
    }

    /// Number of consecutive snapshot files present for one run, probing
    /// indices 0, 1, ... and stopping at the first missing one.
    pub fn count_snapshots(
        &self,
        family: &str,
        problem: &str,
        solver: &str,
        version: &str,
    ) -> usize {
        let mut n = 0;
        while self.snapshot(family, problem, solver, version, n).exists() {
            n += 1;
        }
        n
    }
}

/// Scalar metric file: comma-delimited, no header, one value in column 0
/// per row. A missing file is a valid "no data" state, not an error.
pub fn read_scalar_column(path: &Path) -> Result<Option<Vec<f64>>, LoadError> {
    let Some(mut reader) = open_reader(path, b',', false)? else {
        return Ok(None);
    };
    let mut values = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        values.push(parse_field(&record, 0, path)?);
    }
    Ok(Some(values))
}

/// Metric snapshot file: comma-delimited, no header, elapsed time in
/// column 1 and metric value in column 2 (column 0 is unused here).
pub fn read_snapshot_rows(path: &Path) -> Result<Option<Vec<SnapshotRow>>, LoadError> {
    read_time_value(path, b',', false)
}

/// Count snapshot file (elite or front counts): space-delimited, no
/// header, same column layout as the metric snapshot files.
pub fn read_time_series(path: &Path) -> Result<Option<Vec<SnapshotRow>>, LoadError> {
    read_time_value(path, b' ', false)
}

/// Objective-space file (best solutions or populations): space-delimited
/// with one header row, two objective values per point. When `drop_short`
/// is set, rows with fewer than two fields are silently dropped instead of
/// failing; population dumps contain such rows.
pub fn read_objective_points(
    path: &Path,
    drop_short: bool,
) -> Result<Option<Vec<[f64; 2]>>, LoadError> {
    let Some(mut reader) = open_reader(path, b' ', true)? else {
        return Ok(None);
    };
    let mut points = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if drop_short && record.len() < 2 {
            continue;
        }
        points.push([
            parse_field(&record, 0, path)?,
            parse_field(&record, 1, path)?,
        ]);
    }
    Ok(Some(points))
}

fn read_time_value(
    path: &Path,
    delimiter: u8,
    has_headers: bool,
) -> Result<Option<Vec<SnapshotRow>>, LoadError> {
    let Some(mut reader) = open_reader(path, delimiter, has_headers)? else {
        return Ok(None);
    };
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(SnapshotRow {
            time: parse_field(&record, 1, path)?,
            value: parse_field(&record, 2, path)?,
        });
    }
    Ok(Some(rows))
}

fn open_reader(
    path: &Path,
    delimiter: u8,
    has_headers: bool,
) -> Result<Option<csv::Reader<std::fs::File>>, LoadError> {
    if !path.exists() {
        return Ok(None);
    }
    ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)
        .map(Some)
        .map_err(|source| LoadError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn parse_field(record: &StringRecord, index: usize, path: &Path) -> Result<f64, LoadError> {
    let line = record.position().map(|p| p.line()).unwrap_or(0);
    let field = record.get(index).ok_or_else(|| LoadError::Arity {
        path: path.to_path_buf(),
        line,
        expected: index + 1,
        found: record.len(),
    })?;
    field.trim().parse().map_err(|_| LoadError::Parse {
        path: path.to_path_buf(),
        line,
        field: field.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn absent_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2.txt");
        assert!(read_scalar_column(&path).unwrap().is_none());
        assert!(read_snapshot_rows(&path).unwrap().is_none());
        assert!(read_objective_points(&path, false).unwrap().is_none());
    }

    #[test]
    fn scalar_column_reads_every_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2.txt");
        fs::write(&path, "0.91\n0.87\n0.95\n").unwrap();
        let values = read_scalar_column(&path).unwrap().unwrap();
        assert_eq!(values, vec![0.91, 0.87, 0.95]);
    }

    #[test]
    fn malformed_field_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2.txt");
        fs::write(&path, "0.91\nnot-a-number\n").unwrap();
        let err = read_scalar_column(&path).unwrap_err();
        assert!(matches!(err, LoadError::Parse { line: 2, .. }));
    }

    #[test]
    fn snapshot_rows_pick_time_and_value_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2_7.txt");
        fs::write(&path, "12,0.5,0.80\n25,1.5,0.85\n").unwrap();
        let rows = read_snapshot_rows(&path).unwrap().unwrap();
        assert_eq!(
            rows,
            vec![
                SnapshotRow { time: 0.5, value: 0.80 },
                SnapshotRow { time: 1.5, value: 0.85 },
            ]
        );
    }

    #[test]
    fn snapshot_row_with_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2_7.txt");
        fs::write(&path, "12,0.5\n").unwrap();
        let err = read_snapshot_rows(&path).unwrap_err();
        assert!(matches!(err, LoadError::Arity { expected: 3, found: 2, .. }));
    }

    #[test]
    fn objective_points_skip_the_header_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2_best_0.txt");
        fs::write(&path, "f1 f2\n0.1 0.9\n0.4 0.6\n0.8 0.2\n").unwrap();
        let points = read_objective_points(&path, false).unwrap().unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0], [0.1, 0.9]);
    }

    #[test]
    fn population_reader_drops_short_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2_best_0.txt");
        fs::write(&path, "f1 f2\n0.1 0.9\n3\n0.8 0.2\n").unwrap();
        let points = read_objective_points(&path, true).unwrap().unwrap();
        assert_eq!(points, vec![[0.1, 0.9], [0.8, 0.2]]);
    }

    #[test]
    fn short_row_without_tolerance_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zdt1_nsga2_best_0.txt");
        fs::write(&path, "f1 f2\n0.1 0.9\n3\n").unwrap();
        let err = read_objective_points(&path, false).unwrap_err();
        assert!(matches!(err, LoadError::Arity { .. }));
    }

    #[test]
    fn snapshot_probe_stops_at_first_gap() {
        let dir = tempfile::tempdir().unwrap();
        let family = dir.path().join("best_solutions_snapshots");
        fs::create_dir_all(&family).unwrap();
        for i in [0usize, 1, 3] {
            fs::write(family.join(format!("zdt1_nsga2_best_{}.txt", i)), "f1 f2\n").unwrap();
        }
        let rd = ResultDir::new(dir.path());
        assert_eq!(
            rd.count_snapshots("best_solutions_snapshots", "zdt1", "nsga2", "best"),
            2
        );
    }
}
