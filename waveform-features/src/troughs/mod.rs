//! Locates the troughs which divide a signal into cycles, and the peaks within them.
//!
//! Detection uses [AMPD](ampd), whose cost is `O(n * scale)` in both time and memory for an
//! `n` sample signal. The default scale of `n / 2` finds slowly varying troughs reliably but
//! needs `n * n / 2` bytes, i.e. 450MB for an hour of data at 500Hz. Recordings containing many
//! cycles rarely need a scale greater than about a quarter of the cycle length, so long signals
//! should be given an explicit scale.
pub(crate) mod ampd;

use crate::{Real, WaveformTable, error::PreconditionError};
use tracing::{debug, instrument, warn};

/// Determines which extrema are detected.
#[derive(Clone, Copy, Debug)]
enum Polarity {
    /// Local maxima are detected directly.
    Peaks,
    /// Local minima are detected as the maxima of the negated signal.
    Troughs,
}

impl Polarity {
    fn feature(self) -> &'static str {
        match self {
            Polarity::Peaks => WaveformTable::PEAKS,
            Polarity::Troughs => WaveformTable::TROUGHS,
        }
    }

    fn sign(self) -> Real {
        match self {
            Polarity::Peaks => 1.0,
            Polarity::Troughs => -1.0,
        }
    }
}

/// The result of a detection which did not fail outright.
#[must_use]
#[derive(Clone, Debug, PartialEq)]
pub enum DetectionOutcome {
    /// The detection completed and the given number of extrema were stored.
    Found(usize),
    /// There was not enough memory for the detection at this scale.
    /// Nothing was stored, and the detection should be retried with a lower scale.
    ResourceExhausted {
        /// The scale which was attempted.
        scale: usize,
        /// The number of bytes which could not be allocated, if this is representable.
        bytes: Option<usize>,
    },
}

impl DetectionOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Encapsulates the parameters of trough and peak detection.
#[derive(Default, Debug, Clone)]
pub struct TroughDetector {
    /// The widest window considered is `2 * scale + 1` samples. If `None` or zero, half the signal length is used.
    scale: Option<usize>,
    /// If set, detection is abandoned rather than allocating a scalogram of more than this many bytes.
    memory_budget: Option<usize>,
}

impl TroughDetector {
    pub fn new(scale: Option<usize>) -> Self {
        Self {
            scale,
            ..Default::default()
        }
    }

    pub fn with_memory_budget(self, bytes: usize) -> Self {
        Self {
            memory_budget: Some(bytes),
            ..self
        }
    }

    /// Finds the troughs of a signal column and stores them at `waveform_features[name]["troughs"]`.
    ///
    /// The signal itself is never modified, a negated copy is searched for maxima instead.
    /// If the detection runs out of memory, a warning is logged and any previously stored troughs are left untouched.
    pub fn find_troughs(
        &self,
        table: &mut WaveformTable,
        name: &str,
    ) -> Result<DetectionOutcome, PreconditionError> {
        self.detect(table, name, Polarity::Troughs)
    }

    /// As [Self::find_troughs], but finds peaks and stores them at `waveform_features[name]["peaks"]`.
    pub fn find_peaks(
        &self,
        table: &mut WaveformTable,
        name: &str,
    ) -> Result<DetectionOutcome, PreconditionError> {
        self.detect(table, name, Polarity::Peaks)
    }

    #[instrument(skip_all, fields(column = name, polarity = ?polarity, scale = self.scale), err(level = "warn"))]
    fn detect(
        &self,
        table: &mut WaveformTable,
        name: &str,
        polarity: Polarity,
    ) -> Result<DetectionOutcome, PreconditionError> {
        let sign = polarity.sign();
        let oriented = table
            .signal(name)?
            .iter()
            .map(|value| sign * value)
            .collect::<Vec<_>>();

        match ampd::find_maxima(&oriented, self.scale, self.memory_budget) {
            Ok(indices) => {
                debug!("Found {} {}", indices.len(), polarity.feature());
                let found = indices.len();
                table.set_waveform_feature(name, polarity.feature(), indices)?;
                Ok(DetectionOutcome::Found(found))
            }
            Err(error) => {
                warn!("{error}. Ran out of memory, try setting `scale` to a lower value.");
                Ok(DetectionOutcome::ResourceExhausted {
                    scale: error.rows,
                    bytes: error.bytes,
                })
            }
        }
    }
}

/// Finds the troughs of the signal column `name` using the given scale, see [TroughDetector::find_troughs].
pub fn find_troughs(
    table: &mut WaveformTable,
    name: &str,
    scale: Option<usize>,
) -> Result<DetectionOutcome, PreconditionError> {
    TroughDetector::new(scale).find_troughs(table, name)
}

/// Finds the peaks of the signal column `name` using the given scale, see [TroughDetector::find_peaks].
pub fn find_peaks(
    table: &mut WaveformTable,
    name: &str,
    scale: Option<usize>,
) -> Result<DetectionOutcome, PreconditionError> {
    TroughDetector::new(scale).find_peaks(table, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{SyntheticPressure, arterial_pressure_table};

    #[test]
    fn troughs_of_synthetic_pressure() {
        let mut table = arterial_pressure_table(&SyntheticPressure {
            n_beats: 2.5,
            hertz: 10.0,
            ..Default::default()
        });
        let original = table.signal("pressure").unwrap().to_vec();

        let outcome = find_troughs(&mut table, "pressure", None).unwrap();
        assert_eq!(outcome, DetectionOutcome::Found(3));
        assert_eq!(table.troughs("pressure").unwrap(), Some([0, 10, 20].as_slice()));
        assert_eq!(table.signal("pressure").unwrap(), original);
    }

    #[test]
    fn peaks_of_synthetic_pressure() {
        let mut table = arterial_pressure_table(&SyntheticPressure {
            n_beats: 2.5,
            hertz: 10.0,
            ..Default::default()
        });
        assert!(find_peaks(&mut table, "pressure", None).unwrap().is_found());
        assert_eq!(
            table.waveform_features("pressure").unwrap().get(WaveformTable::PEAKS),
            Some(&vec![2, 12, 22])
        );
        assert_eq!(table.troughs("pressure").unwrap(), None);
    }

    #[test]
    fn explicit_scale() {
        let mut table = arterial_pressure_table(&SyntheticPressure {
            n_beats: 5.3,
            hertz: 100.0,
            ..Default::default()
        });
        let outcome = find_troughs(&mut table, "pressure", Some(50)).unwrap();
        assert_eq!(outcome, DetectionOutcome::Found(6));
        assert_eq!(
            table.troughs("pressure").unwrap(),
            Some([0, 100, 200, 300, 400, 500].as_slice())
        );
    }

    #[test]
    fn exhausted_memory_leaves_troughs_untouched() {
        let mut table = arterial_pressure_table(&SyntheticPressure {
            n_beats: 2.5,
            hertz: 10.0,
            ..Default::default()
        });
        table.set_troughs("pressure", vec![0, 24]).unwrap();
        let original = table.signal("pressure").unwrap().to_vec();

        let outcome = TroughDetector::new(None)
            .with_memory_budget(150)
            .find_troughs(&mut table, "pressure")
            .unwrap();
        assert_eq!(
            outcome,
            DetectionOutcome::ResourceExhausted {
                scale: 12,
                bytes: Some(300)
            }
        );
        assert_eq!(table.troughs("pressure").unwrap(), Some([0, 24].as_slice()));
        assert_eq!(table.signal("pressure").unwrap(), original);

        let outcome = TroughDetector::new(Some(6))
            .with_memory_budget(150)
            .find_troughs(&mut table, "pressure")
            .unwrap();
        assert!(outcome.is_found());
        assert_eq!(table.troughs("pressure").unwrap(), Some([0, 10, 20].as_slice()));
    }

    #[test]
    fn unknown_column() {
        let mut table = arterial_pressure_table(&Default::default());
        assert_eq!(
            find_troughs(&mut table, "flow", None),
            Err(PreconditionError::UnknownColumn("flow".to_owned()))
        );
    }
}
