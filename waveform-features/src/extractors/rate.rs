use super::{BuiltinFeature, CycleFeatureExtractor};
use crate::{
    Real,
    cycles::Cycle,
    error::{DivideByZeroError, FeatureError},
};

/// Cycles shorter than this, in seconds, have no meaningful rate.
pub const MIN_CYCLE_DURATION: Real = 1e-9;

/// Rate of each cycle, in cycles per minute, e.g. heart rate.
///
/// A cycle of (near) zero duration indicates faulty troughs and is an error,
/// rather than being given an infinite rate.
#[derive(Default, Clone, Copy, Debug)]
pub struct CyclesPerMinute;

impl CycleFeatureExtractor for CyclesPerMinute {
    fn name(&self) -> &str {
        BuiltinFeature::CyclesPerMinute.name()
    }

    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError> {
        let duration = cycle.duration();
        if duration < MIN_CYCLE_DURATION {
            return Err(DivideByZeroError {
                cycle: cycle.index,
                duration,
            }
            .into());
        }
        Ok(60.0 / duration)
    }
}
