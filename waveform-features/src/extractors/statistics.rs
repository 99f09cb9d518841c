//! Extractors for descriptive statistics of each cycle.
use super::{BuiltinFeature, CycleFeatureExtractor};
use crate::{Real, cycles::Cycle, error::FeatureError};
use itertools::Itertools;

/// Duration of each cycle, in seconds.
#[derive(Default, Clone, Copy, Debug)]
pub struct Duration;

impl CycleFeatureExtractor for Duration {
    fn name(&self) -> &str {
        BuiltinFeature::Duration.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        Ok(cycle.duration())
    }
}

fn maximum(values: &[Real]) -> Real {
    values.iter().copied().fold(Real::NEG_INFINITY, Real::max)
}

fn minimum(values: &[Real]) -> Real {
    values.iter().copied().fold(Real::INFINITY, Real::min)
}

/// Maximum value of each cycle, e.g. systolic pressure.
#[derive(Default, Clone, Copy, Debug)]
pub struct MaximumValue;

impl CycleFeatureExtractor for MaximumValue {
    fn name(&self) -> &str {
        BuiltinFeature::MaximumValue.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        Ok(maximum(cycle.values))
    }
}

/// Minimum value of each cycle, e.g. diastolic pressure.
#[derive(Default, Clone, Copy, Debug)]
pub struct MinimumValue;

impl CycleFeatureExtractor for MinimumValue {
    fn name(&self) -> &str {
        BuiltinFeature::MinimumValue.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        Ok(minimum(cycle.values))
    }
}

/// Maximum minus minimum value of each cycle, e.g. pulse pressure.
#[derive(Default, Clone, Copy, Debug)]
pub struct MaximumMinusMinimumValue;

impl CycleFeatureExtractor for MaximumMinusMinimumValue {
    fn name(&self) -> &str {
        BuiltinFeature::MaximumMinusMinimumValue.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        Ok(maximum(cycle.values) - minimum(cycle.values))
    }
}

/// Arithmetic mean of the samples in each cycle.
///
/// As an estimate of mean arterial pressure this is biased towards whichever phase of the
/// beat lasts longest, as the samples are not weighted.
#[derive(Default, Clone, Copy, Debug)]
pub struct MeanValue;

impl CycleFeatureExtractor for MeanValue {
    fn name(&self) -> &str {
        BuiltinFeature::MeanValue.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        Ok(cycle.values.iter().sum::<Real>() / cycle.values.len() as Real)
    }
}

/// Mean of the negative differences between successive samples in each cycle.
///
/// A cycle with no negative differences never falls, which suggests a poor quality signal.
/// Its value is negative infinity, so that any range check on this feature fails.
#[derive(Default, Clone, Copy, Debug)]
pub struct MeanNegativeFirstDifference;

impl CycleFeatureExtractor for MeanNegativeFirstDifference {
    fn name(&self) -> &str {
        BuiltinFeature::MeanNegativeFirstDifference.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        let (sum, count) = cycle
            .values
            .iter()
            .tuple_windows()
            .map(|(previous, next)| next - previous)
            .filter(|difference| *difference < 0.0)
            .fold((0.0, 0usize), |(sum, count), difference| {
                (sum + difference, count + 1)
            });
        Ok(if count == 0 {
            Real::NEG_INFINITY
        } else {
            sum / count as Real
        })
    }
}
