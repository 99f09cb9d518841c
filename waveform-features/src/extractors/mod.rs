//! Extractors compute one value for each cycle of a signal, e.g. the systolic pressure of each heartbeat.
//!
//! Every extractor implements [CycleFeatureExtractor]. The built-in extractors are unit structs,
//! which can also be referred to by their [BuiltinFeature] tag, e.g. in configuration files.
//! Further extractors can be defined by implementing the trait.
mod rate;
mod statistics;

use crate::{
    Real, WaveformTable,
    cycles::{Cycle, get_cycles},
    error::{FeatureError, PreconditionError},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Debug, sync::Arc};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use tracing::{debug, instrument, trace};

pub use rate::{CyclesPerMinute, MIN_CYCLE_DURATION};
pub use statistics::{
    Duration, MaximumMinusMinimumValue, MaximumValue, MeanNegativeFirstDifference, MeanValue,
    MinimumValue,
};

/// Implement for types which compute a feature of each cycle in a signal.
pub trait CycleFeatureExtractor: Debug + Send + Sync {
    /// The key under which the feature is stored in `cycle_features[name]`.
    ///
    /// This must be the same on every call, and unique among extractors.
    fn name(&self) -> &str;

    /// Computes the feature for a single cycle.
    fn cycle_value(&self, cycle: &Cycle<'_>) -> Result<Real, FeatureError>;

    /// Computes the feature for each cycle of the signal column `name`,
    /// and stores the values at `cycle_features[name][self.name()]`, overwriting any previous values.
    #[instrument(skip_all, fields(column = name, feature = self.name()), err(level = "warn"))]
    fn extract_feature(&self, table: &mut WaveformTable, name: &str) -> Result<(), FeatureError> {
        let values = get_cycles(table, name)?
            .map(|cycle| self.cycle_value(&cycle))
            .collect::<Result<Vec<_>, _>>()?;
        trace!("Extracted {} values", values.len());
        table.set_cycle_feature(name, self.name(), values)?;
        Ok(())
    }
}

/// An extractor which can be held by checks and shared between them.
pub type SharedExtractor = Arc<dyn CycleFeatureExtractor>;

/// Tags for the built-in extractors.
///
/// The tag of each extractor is also the name of the feature it stores.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
    Serialize,
    Deserialize,
)]
pub enum BuiltinFeature {
    Duration,
    MaximumValue,
    MinimumValue,
    MaximumMinusMinimumValue,
    MeanValue,
    CyclesPerMinute,
    MeanNegativeFirstDifference,
}

impl BuiltinFeature {
    pub fn name(self) -> &'static str {
        self.into()
    }

    pub fn extractor(self) -> SharedExtractor {
        match self {
            Self::Duration => Arc::new(Duration),
            Self::MaximumValue => Arc::new(MaximumValue),
            Self::MinimumValue => Arc::new(MinimumValue),
            Self::MaximumMinusMinimumValue => Arc::new(MaximumMinusMinimumValue),
            Self::MeanValue => Arc::new(MeanValue),
            Self::CyclesPerMinute => Arc::new(CyclesPerMinute),
            Self::MeanNegativeFirstDifference => Arc::new(MeanNegativeFirstDifference),
        }
    }
}

impl From<BuiltinFeature> for SharedExtractor {
    fn from(feature: BuiltinFeature) -> Self {
        feature.extractor()
    }
}

/// Returns the feature stored by `extractor` for the signal column `name`,
/// running the extractor first if the feature is not stored, or was stored before the troughs
/// of `name` last changed.
pub fn ensure_cycle_feature<'a>(
    table: &'a mut WaveformTable,
    name: &str,
    extractor: &dyn CycleFeatureExtractor,
) -> Result<&'a [Real], FeatureError> {
    table.signal(name)?;
    if table.cycle_feature_is_current(name, extractor.name()) {
        debug!("Reusing stored feature {}", extractor.name());
    } else {
        extractor.extract_feature(table, name)?;
    }
    Ok(table
        .cycle_feature(name, extractor.name())?
        .ok_or_else(|| PreconditionError::MissingFeature {
            column: name.to_owned(),
            feature: extractor.name().to_owned(),
        })?)
}
