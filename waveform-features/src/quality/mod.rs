//! Evaluates named plausibility checks against the cycles of a signal.
//!
//! A [CycleCheck] bounds a cycle-level feature, while a [DiffCheck] bounds how much a feature
//! may change from one cycle to the next. Any features the checks need are extracted on demand.
mod checks;
mod report;

use crate::{
    Real, WaveformTable,
    cycles::count_cycles,
    diffs::ensure_absolute_diff,
    error::{ConfigurationError, QualityError},
    extractors::ensure_cycle_feature,
};
use tracing::{debug, info, instrument};

pub use checks::{Check, CheckSet, CycleCheck, DiffCheck};
pub use report::{CheckColumn, QualityReport};

/// Runs every check in `checks` against each cycle of the signal column `name`.
///
/// Troughs must already have been found for the column. An empty set of checks passes every cycle.
///
/// # Errors
/// Fails with [ConfigurationError::ReservedCheckName] if a check is named [QualityReport::ALL],
/// and with [ConfigurationError::CycleCountMismatch] if a feature stored after the troughs
/// does not have one value per cycle.
#[instrument(skip_all, fields(column = name, checks = checks.len()), err(level = "warn"))]
pub fn check_cycles(
    table: &mut WaveformTable,
    name: &str,
    checks: &CheckSet,
) -> Result<QualityReport, QualityError> {
    if let Some(reserved) = checks.names().find(|&check_name| check_name == QualityReport::ALL) {
        return Err(ConfigurationError::ReservedCheckName(reserved.to_owned()).into());
    }
    let n_cycles = count_cycles(table, name)?;
    let mut columns = Vec::with_capacity(checks.len());
    for (check_name, check) in checks.iter() {
        let feature = check.feature().as_ref();
        let values = match check {
            Check::Cycle(_) => ensure_cycle_feature(table, name, feature)?,
            Check::Diff(_) => ensure_absolute_diff(table, name, feature)?,
        };
        if values.len() != n_cycles {
            return Err(ConfigurationError::CycleCountMismatch {
                check: check_name.to_owned(),
                feature: feature.name().to_owned(),
                column: name.to_owned(),
                expected: n_cycles,
                found: values.len(),
            }
            .into());
        }
        let passed = values
            .iter()
            .map(|&value| passes(check, value))
            .collect::<Vec<_>>();
        debug!(
            "Check {check_name} failed {} cycles",
            passed.iter().filter(|passed| !**passed).count()
        );
        columns.push(CheckColumn {
            name: check_name.to_owned(),
            passed,
        });
    }
    let report = QualityReport::new(n_cycles, columns);
    info!(
        "{} of {n_cycles} cycles passed every check",
        n_cycles - report.failed_cycles().len()
    );
    Ok(report)
}

fn passes(check: &Check, value: Real) -> bool {
    match check {
        Check::Cycle(check) => check.passes(value),
        Check::Diff(check) => check.passes(value),
    }
}
