use serde::Serialize;

/// The outcome of one check, for every cycle.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CheckColumn {
    pub name: String,
    pub passed: Vec<bool>,
}

/// The pass/fail table produced by [check_cycles](crate::check_cycles).
///
/// There is one row per cycle, in cycle order, and one column per check in the order of the
/// [CheckSet](crate::CheckSet). The `all` column is the conjunction of every other column,
/// so no check may be named [QualityReport::ALL].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct QualityReport {
    n_cycles: usize,
    checks: Vec<CheckColumn>,
    all: Vec<bool>,
}

impl QualityReport {
    /// Name of the column which passes only the cycles passing every check.
    pub const ALL: &str = "all";

    pub(crate) fn new(n_cycles: usize, checks: Vec<CheckColumn>) -> Self {
        let all = (0..n_cycles)
            .map(|cycle| checks.iter().all(|column| column.passed.get(cycle) == Some(&true)))
            .collect();
        Self {
            n_cycles,
            checks,
            all,
        }
    }

    pub fn n_cycles(&self) -> usize {
        self.n_cycles
    }

    /// The names of the check columns, excluding `all`.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|column| column.name.as_str())
    }

    pub fn checks(&self) -> &[CheckColumn] {
        &self.checks
    }

    /// The column of the named check, or the `all` column if `name` is [Self::ALL].
    pub fn column(&self, name: &str) -> Option<&[bool]> {
        if name == Self::ALL {
            return Some(&self.all);
        }
        self.checks
            .iter()
            .find(|column| column.name == name)
            .map(|column| column.passed.as_slice())
    }

    pub fn all(&self) -> &[bool] {
        &self.all
    }

    /// Indices of the cycles which failed at least one check.
    pub fn failed_cycles(&self) -> Vec<usize> {
        self.all
            .iter()
            .enumerate()
            .filter_map(|(cycle, &passed)| (!passed).then_some(cycle))
            .collect()
    }
}
