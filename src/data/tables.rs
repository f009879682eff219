use crate::data::loader::SnapshotRow;

/// Per-solver pooled samples for one chart, in configured solver order.
/// The insertion index doubles as the palette / marker index, so a solver
/// keeps its color even when earlier solvers contributed no data.
#[derive(Debug, Clone, Default)]
pub struct MetricTable {
    entries: Vec<(String, Vec<f64>)>,
}

impl MetricTable {
    pub fn with_solvers(solvers: &[String]) -> Self {
        Self {
            entries: solvers.iter().map(|s| (s.clone(), Vec::new())).collect(),
        }
    }

    pub fn push(&mut self, solver: &str, values: impl IntoIterator<Item = f64>) {
        match self.entries.iter_mut().find(|(s, _)| s == solver) {
            Some((_, samples)) => samples.extend(values),
            None => self
                .entries
                .push((solver.to_string(), values.into_iter().collect())),
        }
    }

    /// Solvers that contributed at least one sample, with their palette
    /// index. Empty groups are filtered here so the statistics layer never
    /// sees them.
    pub fn groups(&self) -> impl Iterator<Item = (usize, &str, &[f64])> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, (_, samples))| !samples.is_empty())
            .map(|(i, (solver, samples))| (i, solver.as_str(), samples.as_slice()))
    }

    pub fn samples_of(&self, solver: &str) -> Option<&[f64]> {
        self.entries
            .iter()
            .find(|(s, _)| s == solver)
            .map(|(_, samples)| samples.as_slice())
    }

    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().flat_map(|(_, v)| v.iter().copied())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.iter().all(|(_, v)| v.is_empty())
    }
}

/// Time-indexed pooled samples: for each solver and each snapshot slot,
/// the elapsed times and metric values of every run that reached that
/// slot. Runs shorter than the slot count simply stop contributing, so
/// slot `j` mirrors independent per-file iteration.
#[derive(Debug, Clone)]
pub struct SnapshotTable {
    solvers: Vec<String>,
    times: Vec<Vec<Vec<f64>>>,
    values: Vec<Vec<Vec<f64>>>,
}

impl SnapshotTable {
    pub fn new(solvers: &[String], num_snapshots: usize) -> Self {
        let slots = num_snapshots + 1;
        Self {
            solvers: solvers.to_vec(),
            times: vec![vec![Vec::new(); slots]; solvers.len()],
            values: vec![vec![Vec::new(); slots]; solvers.len()],
        }
    }

    pub fn slots(&self) -> usize {
        self.times.first().map(Vec::len).unwrap_or(0)
    }

    /// Fold one run's checkpoint rows into the per-slot pools; rows past
    /// the last slot are ignored.
    pub fn absorb(&mut self, solver_idx: usize, rows: &[SnapshotRow]) {
        let slots = self.slots();
        for (slot, row) in rows.iter().enumerate().take(slots) {
            self.times[solver_idx][slot].push(row.time);
            self.values[solver_idx][slot].push(row.value);
        }
    }

    pub fn times_at(&self, solver_idx: usize, slot: usize) -> &[f64] {
        &self.times[solver_idx][slot]
    }

    pub fn values_at(&self, solver_idx: usize, slot: usize) -> &[f64] {
        &self.values[solver_idx][slot]
    }

    pub fn solver_has_data(&self, solver_idx: usize) -> bool {
        self.values[solver_idx].iter().any(|pool| !pool.is_empty())
    }

    /// The pooled distribution of every solver at one snapshot slot.
    pub fn table_at(&self, slot: usize) -> MetricTable {
        let mut table = MetricTable::with_solvers(&self.solvers);
        for (idx, solver) in self.solvers.iter().enumerate() {
            table.push(solver, self.values[idx][slot].iter().copied());
        }
        table
    }

    pub fn all_values(&self) -> impl Iterator<Item = f64> + '_ {
        self.values
            .iter()
            .flat_map(|per_slot| per_slot.iter().flat_map(|pool| pool.iter().copied()))
    }

    pub fn max_time(&self) -> Option<f64> {
        self.times
            .iter()
            .flat_map(|per_slot| per_slot.iter().flat_map(|pool| pool.iter().copied()))
            .fold(None, |acc, t| Some(acc.map_or(t, |m: f64| m.max(t))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::SnapshotRow;

    fn solvers() -> Vec<String> {
        vec!["a".to_string(), "b".to_string()]
    }

    #[test]
    fn groups_keep_palette_index_of_skipped_solvers() {
        let mut table = MetricTable::with_solvers(&solvers());
        table.push("b", [0.5, 0.6]);
        let groups: Vec<_> = table.groups().collect();
        assert_eq!(groups.len(), 1);
        let (idx, solver, samples) = groups[0];
        assert_eq!((idx, solver), (1, "b"));
        assert_eq!(samples, &[0.5, 0.6]);
    }

    #[test]
    fn push_accumulates_across_files() {
        let mut table = MetricTable::with_solvers(&solvers());
        table.push("a", [0.1]);
        table.push("a", [0.2, 0.3]);
        assert_eq!(table.samples_of("a").unwrap(), &[0.1, 0.2, 0.3]);
    }

    #[test]
    fn snapshot_slots_mirror_per_file_iteration() {
        let mut snap = SnapshotTable::new(&solvers(), 2);
        let long = [
            SnapshotRow { time: 1.0, value: 0.1 },
            SnapshotRow { time: 2.0, value: 0.2 },
            SnapshotRow { time: 3.0, value: 0.3 },
        ];
        let short = [
            SnapshotRow { time: 1.5, value: 0.5 },
            SnapshotRow { time: 2.5, value: 0.6 },
        ];
        snap.absorb(0, &long);
        snap.absorb(0, &short);
        // both runs reach slot 1 ...
        assert_eq!(snap.values_at(0, 1), &[0.2, 0.6]);
        // ... but only the longer one reaches slot 2
        assert_eq!(snap.values_at(0, 2), &[0.3]);
        assert!(snap.solver_has_data(0));
        assert!(!snap.solver_has_data(1));
    }

    #[test]
    fn rows_past_the_last_slot_are_ignored() {
        let mut snap = SnapshotTable::new(&solvers(), 0);
        snap.absorb(
            0,
            &[
                SnapshotRow { time: 1.0, value: 0.1 },
                SnapshotRow { time: 2.0, value: 0.2 },
            ],
        );
        assert_eq!(snap.slots(), 1);
        assert_eq!(snap.values_at(0, 0), &[0.1]);
    }

    #[test]
    fn table_at_pools_one_slot_across_solvers() {
        let mut snap = SnapshotTable::new(&solvers(), 1);
        snap.absorb(0, &[SnapshotRow { time: 1.0, value: 0.1 }]);
        snap.absorb(1, &[SnapshotRow { time: 1.0, value: 0.9 }]);
        let table = snap.table_at(0);
        assert_eq!(table.samples_of("a").unwrap(), &[0.1]);
        assert_eq!(table.samples_of("b").unwrap(), &[0.9]);
        assert!(snap.table_at(1).is_empty());
    }

    #[test]
    fn max_time_spans_all_solvers() {
        let mut snap = SnapshotTable::new(&solvers(), 1);
        snap.absorb(0, &[SnapshotRow { time: 4.0, value: 0.1 }]);
        snap.absorb(1, &[SnapshotRow { time: 9.0, value: 0.2 }]);
        assert_eq!(snap.max_time(), Some(9.0));
    }
}
