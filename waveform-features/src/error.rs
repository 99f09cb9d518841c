//! Error types raised by the pipeline stages.
//!
//! Running out of memory during trough detection is not an error here,
//! it is reported through [DetectionOutcome](crate::DetectionOutcome) instead.
use crate::Real;
use thiserror::Error;

/// Raised when a [WaveformTable](crate::WaveformTable) cannot be built from the given columns.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Time column \"{0}\" not found")]
    MissingTimeColumn(String),
    #[error("Column \"{name}\" has {found} values, expected {expected}")]
    NotTabular {
        name: String,
        expected: usize,
        found: usize,
    },
    #[error("Column \"{0}\" appears more than once")]
    DuplicateColumn(String),
    #[error("No signal columns besides the time column")]
    NoSignalColumns,
    #[error("Timestamp at index {0} is not finite")]
    NonFiniteTime(usize),
    #[error("Timestamps are not strictly increasing at index {0}")]
    NonIncreasingTime(usize),
}

/// Raised when a stage is run before its inputs exist.
#[derive(Debug, Error, PartialEq)]
pub enum PreconditionError {
    #[error("\"{0}\" is not a signal column")]
    UnknownColumn(String),
    #[error("Troughs have not been found for \"{0}\"")]
    TroughsNotFound(String),
    #[error("Found {found} troughs in \"{column}\", at least 2 are needed to form a cycle")]
    TooFewTroughs { column: String, found: usize },
    #[error("Feature {feature} of \"{column}\" is missing and cannot be derived")]
    MissingFeature { column: String, feature: String },
    #[error("Index {index} is beyond the {len} samples of \"{column}\"")]
    IndexOutOfRange {
        column: String,
        index: usize,
        len: usize,
    },
}

/// Raised when a rate is requested for a cycle whose duration is zero or close to it.
#[derive(Debug, Error, PartialEq)]
#[error("Cycle {cycle} has duration {duration}s, too short to compute a rate")]
pub struct DivideByZeroError {
    pub cycle: usize,
    pub duration: Real,
}

/// Raised when a check cannot be evaluated against the cycles of a column.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigurationError {
    #[error("Check \"{check}\": feature {feature} has {found} values, but \"{column}\" has {expected} cycles")]
    CycleCountMismatch {
        check: String,
        feature: String,
        column: String,
        expected: usize,
        found: usize,
    },
    #[error("Unknown feature \"{0}\"")]
    UnknownFeature(String),
    #[error("Check name \"{0}\" is reserved for the column of cycles passing every check")]
    ReservedCheckName(String),
}

/// Errors which can occur while extracting cycle-level or diff-level features.
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Precondition failed: {0}")]
    Precondition(#[from] PreconditionError),
    #[error("Division by zero: {0}")]
    DivideByZero(#[from] DivideByZeroError),
    /// Raised by user-defined extractors, passed through unmodified.
    #[error("Extractor {name} failed: {source}")]
    Extractor {
        name: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Errors which can occur while running quality checks.
#[derive(Debug, Error)]
pub enum QualityError {
    #[error("Feature error: {0}")]
    Feature(#[from] FeatureError),
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl From<PreconditionError> for QualityError {
    fn from(error: PreconditionError) -> Self {
        Self::Feature(error.into())
    }
}
