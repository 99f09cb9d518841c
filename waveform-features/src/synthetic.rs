//! Synthetic arterial pressure waveforms for tests.
use crate::{Real, WaveformTable};
use std::f64::consts::FRAC_PI_2;

/// Fraction of the beat at which systolic pressure is reached.
const SYSTOLE: Real = 0.2;

pub(crate) struct SyntheticPressure {
    pub(crate) systolic_pressure: Real,
    pub(crate) diastolic_pressure: Real,
    /// Beats per minute, adjusted so that each beat is a whole number of samples.
    pub(crate) heart_rate: Real,
    pub(crate) n_beats: Real,
    pub(crate) hertz: Real,
}

impl Default for SyntheticPressure {
    fn default() -> Self {
        Self {
            systolic_pressure: 120.0,
            diastolic_pressure: 80.0,
            heart_rate: 60.0,
            n_beats: 2.5,
            hertz: 10.0,
        }
    }
}

/// Normalised pressure at `phase` in `[0, 1)` of a beat.
///
/// Zero at the onset of the beat, rising to exactly one at systole,
/// then decaying towards zero with a small dicrotic bump.
fn beat_shape(phase: Real) -> Real {
    if phase < SYSTOLE {
        Real::sin(FRAC_PI_2 * phase / SYSTOLE)
    } else {
        let decay = (phase - SYSTOLE) / (1.0 - SYSTOLE);
        (1.0 - decay).powf(1.5) + 0.1 * Real::exp(-((decay - 0.3) / 0.05).powi(2))
    }
}

impl SyntheticPressure {
    pub(crate) fn steps_per_beat(&self) -> usize {
        (self.hertz * 60.0 / self.heart_rate).round() as usize
    }

    /// Returns the timestamps and pressures.
    pub(crate) fn generate(&self) -> (Vec<Real>, Vec<Real>) {
        let steps = self.steps_per_beat();
        let len = (self.n_beats * steps as Real).ceil() as usize;
        let time = (0..len).map(|i| i as Real / self.hertz).collect();
        let pressure = (0..len)
            .map(|i| {
                let phase = (i % steps) as Real / steps as Real;
                self.diastolic_pressure
                    + (self.systolic_pressure - self.diastolic_pressure) * beat_shape(phase)
            })
            .collect();
        (time, pressure)
    }
}

/// A table with a `"time"` column and a `"pressure"` column.
pub(crate) fn arterial_pressure_table(parameters: &SyntheticPressure) -> WaveformTable {
    let (time, pressure) = parameters.generate();
    table_from(time, pressure)
}

/// A table with a `"time"` column and the given values in a `"pressure"` column.
pub(crate) fn table_from(time: Vec<Real>, pressure: Vec<Real>) -> WaveformTable {
    WaveformTable::new(
        WaveformTable::DEFAULT_TIME_COLUMN,
        vec![("time".to_owned(), time), ("pressure".to_owned(), pressure)],
    )
    .expect("Synthetic data should be valid")
}

/// Adds `offset` to the pressure at every sample in `range`, e.g. to simulate a flush artifact.
pub(crate) fn with_offset(
    parameters: &SyntheticPressure,
    range: std::ops::RangeInclusive<usize>,
    offset: Real,
) -> WaveformTable {
    let (time, mut pressure) = parameters.generate();
    for value in pressure.iter_mut().take(range.end() + 1).skip(*range.start()) {
        *value += offset;
    }
    table_from(time, pressure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extremes_are_exact() {
        let (time, pressure) = SyntheticPressure::default().generate();
        assert_eq!(time.len(), 25);
        assert_eq!(pressure[0], 80.0);
        assert_eq!(pressure[2], 120.0);
        assert_eq!(pressure[10], 80.0);
        assert_eq!(time[10], 1.0);
    }
}
