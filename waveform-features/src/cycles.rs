//! Divides a signal into cycles using its troughs.
use crate::{Real, WaveformTable, error::PreconditionError};

/// One cycle of a signal, e.g. a heartbeat.
///
/// The cycle includes the troughs at both its start and end,
/// so consecutive cycles share a sample.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cycle<'a> {
    /// Position of the cycle within the signal.
    pub index: usize,
    /// Index of the first sample of the cycle.
    pub start: usize,
    /// Timestamps of the samples in the cycle.
    pub times: &'a [Real],
    /// Signal values of the samples in the cycle.
    pub values: &'a [Real],
}

impl Cycle<'_> {
    /// The time between the cycle's first and last samples, in seconds.
    pub fn duration(&self) -> Real {
        match (self.times.first(), self.times.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

/// Iterator over the cycles of a signal, see [get_cycles].
#[derive(Clone, Debug)]
pub struct Cycles<'a> {
    times: &'a [Real],
    values: &'a [Real],
    troughs: std::iter::Enumerate<std::slice::Windows<'a, usize>>,
}

impl<'a> Iterator for Cycles<'a> {
    type Item = Cycle<'a>;

    fn next(&mut self) -> Option<Cycle<'a>> {
        let (index, bounds) = self.troughs.next()?;
        let (&start, &end) = (bounds.first()?, bounds.last()?);
        Some(Cycle {
            index,
            start,
            times: self.times.get(start..=end)?,
            values: self.values.get(start..=end)?,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.troughs.size_hint()
    }
}

impl ExactSizeIterator for Cycles<'_> {}

/// Makes an iterator over the individual cycles of the signal column `name`.
///
/// Cycle `i` runs from `troughs[i]` to `troughs[i + 1]` inclusive, so there is one fewer cycle than troughs.
/// Nothing is stored, the cycles are derived afresh from the current troughs on each call.
///
/// # Errors
/// Fails if `name` is not a signal column, or if fewer than two troughs have been found for it.
pub fn get_cycles<'a>(table: &'a WaveformTable, name: &str) -> Result<Cycles<'a>, PreconditionError> {
    let values = table.signal(name)?;
    let troughs = table
        .troughs(name)?
        .ok_or_else(|| PreconditionError::TroughsNotFound(name.to_owned()))?;
    if troughs.len() < 2 {
        return Err(PreconditionError::TooFewTroughs {
            column: name.to_owned(),
            found: troughs.len(),
        });
    }
    Ok(Cycles {
        times: table.timestamps(),
        values,
        troughs: troughs.windows(2).enumerate(),
    })
}

/// The number of cycles in the signal column `name`.
pub fn count_cycles(table: &WaveformTable, name: &str) -> Result<usize, PreconditionError> {
    get_cycles(table, name).map(|cycles| cycles.len())
}
