//! # Waveform Features
//!
//! Per-cycle feature extraction and quality checking for periodic biomedical waveforms,
//! such as arterial blood pressure.
//!
//! The pipeline runs in the following stages, each of which reads from and writes to a [WaveformTable]:
//! * [find_troughs] locates the local minima which mark the boundaries between cycles.
//! * [get_cycles] slices the signal into one [Cycle] per pair of consecutive troughs.
//! * A [CycleFeatureExtractor] computes one value per cycle (e.g. [MaximumValue]).
//! * [calculate_diff] computes the cycle-to-cycle change of a feature.
//! * [check_cycles] evaluates a [CheckSet] and produces a [QualityReport] with one row per cycle.
//!
//! Later stages compute whatever earlier stages they need if it has not already been stored,
//! so only trough detection must be run explicitly.
//!
//! ```rust
//! use waveform_features::{CheckSet, WaveformTable, check_cycles, find_troughs};
//!
//! # fn run(time: Vec<f64>, pressure: Vec<f64>) -> Result<(), Box<dyn std::error::Error>> {
//! let mut table = WaveformTable::new(
//!     WaveformTable::DEFAULT_TIME_COLUMN,
//!     vec![("time".to_owned(), time), ("pressure".to_owned(), pressure)],
//! )?;
//! if find_troughs(&mut table, "pressure", None)?.is_found() {
//!     let report = check_cycles(&mut table, "pressure", &CheckSet::arterial_pressure())?;
//!     println!("{} of {} cycles passed", report.n_cycles() - report.failed_cycles().len(), report.n_cycles());
//! }
//! # Ok(())
//! # }
//! ```
pub mod config;
pub mod cycles;
pub mod diffs;
pub mod error;
pub mod extractors;
pub mod quality;
pub mod table;
pub mod troughs;

#[cfg(test)]
pub(crate) mod synthetic;

pub use config::CheckSetConfig;
pub use cycles::{Cycle, Cycles, count_cycles, get_cycles};
pub use diffs::{calculate_absolute_diff, calculate_diff, ensure_absolute_diff};
pub use error::{
    ConfigurationError, DivideByZeroError, FeatureError, PreconditionError, QualityError,
    ValidationError,
};
pub use extractors::{
    BuiltinFeature, CycleFeatureExtractor, CyclesPerMinute, Duration, MaximumMinusMinimumValue,
    MIN_CYCLE_DURATION, MaximumValue, MeanNegativeFirstDifference, MeanValue, MinimumValue,
    SharedExtractor, ensure_cycle_feature,
};
pub use quality::{
    Check, CheckColumn, CheckSet, CycleCheck, DiffCheck, QualityReport, check_cycles,
};
pub use table::{DiffFeature, WaveformTable};
pub use troughs::{DetectionOutcome, TroughDetector, find_peaks, find_troughs};

/// The type of all signal and time values.
pub type Real = f64;
