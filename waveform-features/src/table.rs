//! Provides [WaveformTable], which holds the raw signals and every feature derived from them.
use crate::{
    Real,
    error::{PreconditionError, ValidationError},
};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Waveform-level features: sample indices keyed by feature name.
pub type WaveformFeatures = BTreeMap<String, Vec<usize>>;

/// Cycle-level features: one value per cycle, keyed by feature name.
pub type CycleFeatures = BTreeMap<String, Vec<Real>>;

/// Diff-level features, keyed by the name of the cycle-level feature they were derived from.
pub type DiffFeatures = BTreeMap<String, DiffFeature>;

/// The first differences of a cycle-level feature.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffFeature {
    /// Whether the differences are absolute values.
    pub absolute: bool,
    /// One value per cycle, the first of which is always zero.
    pub values: Vec<Real>,
    /// Revision of the cycle-level feature the differences were computed from.
    pub source_revision: u64,
}

/// Identifies a revisioned entry of a feature store.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum StoreKey {
    Waveform { column: String, feature: String },
    Cycle { column: String, feature: String },
}

impl StoreKey {
    fn waveform(column: &str, feature: &str) -> Self {
        Self::Waveform {
            column: column.to_owned(),
            feature: feature.to_owned(),
        }
    }

    fn cycle(column: &str, feature: &str) -> Self {
        Self::Cycle {
            column: column.to_owned(),
            feature: feature.to_owned(),
        }
    }
}

/// Holds the signals of a recording, their shared timestamps, and three feature stores.
///
/// Each store has exactly one entry per signal column, created empty when the table is built.
/// Features are only ever added or overwritten, never removed.
///
/// Every time a waveform-level or cycle-level feature is stored it is given a revision number
/// greater than any before it, so derived features can tell whether they are out of date.
#[derive(Clone, Debug)]
pub struct WaveformTable {
    time_column_name: String,
    timestamps: Vec<Real>,
    names: Vec<String>,
    signals: HashMap<String, Vec<Real>>,
    waveform_features: HashMap<String, WaveformFeatures>,
    cycle_features: HashMap<String, CycleFeatures>,
    diff_features: HashMap<String, DiffFeatures>,
    revisions: HashMap<StoreKey, u64>,
    latest_revision: u64,
}

impl WaveformTable {
    /// The name of the time column if none is specified.
    pub const DEFAULT_TIME_COLUMN: &str = "time";
    /// Key of the trough indices in the waveform-level store.
    pub const TROUGHS: &str = "troughs";
    /// Key of the peak indices in the waveform-level store.
    pub const PEAKS: &str = "peaks";

    /// Builds a table from named columns of equal length.
    ///
    /// # Parameters
    /// - time_column_name: name of the column holding timestamps in seconds, these must be strictly increasing.
    /// - columns: every column of the dataset, including the time column. All other columns are signals.
    pub fn new(
        time_column_name: &str,
        columns: Vec<(String, Vec<Real>)>,
    ) -> Result<Self, ValidationError> {
        let expected = columns
            .iter()
            .find(|(name, _)| name == time_column_name)
            .map(|(_, values)| values.len())
            .ok_or_else(|| ValidationError::MissingTimeColumn(time_column_name.to_owned()))?;

        let mut timestamps = None;
        let mut names = Vec::<String>::new();
        let mut signals = HashMap::new();
        for (name, values) in columns {
            if values.len() != expected {
                return Err(ValidationError::NotTabular {
                    name,
                    expected,
                    found: values.len(),
                });
            }
            if name == time_column_name {
                if timestamps.is_some() {
                    return Err(ValidationError::DuplicateColumn(name));
                }
                timestamps = Some(values);
            } else if signals.contains_key(&name) {
                return Err(ValidationError::DuplicateColumn(name));
            } else {
                names.push(name.clone());
                signals.insert(name, values);
            }
        }
        if names.is_empty() {
            return Err(ValidationError::NoSignalColumns);
        }
        let timestamps = timestamps.unwrap_or_default();
        validate_timestamps(&timestamps)?;

        trace!("Built table with {} samples and signals {names:?}", expected);
        Ok(Self {
            time_column_name: time_column_name.to_owned(),
            timestamps,
            waveform_features: empty_stores(&names),
            cycle_features: empty_stores(&names),
            diff_features: empty_stores(&names),
            names,
            signals,
            revisions: HashMap::new(),
            latest_revision: 0,
        })
    }

    pub fn time_column_name(&self) -> &str {
        &self.time_column_name
    }

    /// The names of the signal columns, in the order they were given.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn timestamps(&self) -> &[Real] {
        &self.timestamps
    }

    /// Number of samples in every column.
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn signal(&self, name: &str) -> Result<&[Real], PreconditionError> {
        self.signals
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| PreconditionError::UnknownColumn(name.to_owned()))
    }

    pub fn waveform_features(&self, name: &str) -> Result<&WaveformFeatures, PreconditionError> {
        lookup(&self.waveform_features, name)
    }

    pub fn cycle_features(&self, name: &str) -> Result<&CycleFeatures, PreconditionError> {
        lookup(&self.cycle_features, name)
    }

    pub fn diff_features(&self, name: &str) -> Result<&DiffFeatures, PreconditionError> {
        lookup(&self.diff_features, name)
    }

    /// The trough indices of a signal, if they have been found.
    pub fn troughs(&self, name: &str) -> Result<Option<&[usize]>, PreconditionError> {
        Ok(self
            .waveform_features(name)?
            .get(Self::TROUGHS)
            .map(Vec::as_slice))
    }

    /// Stores sample indices under `feature` in the waveform-level store, overwriting any previous value.
    ///
    /// The indices are sorted and deduplicated before being stored.
    pub fn set_waveform_feature(
        &mut self,
        name: &str,
        feature: &str,
        mut indices: Vec<usize>,
    ) -> Result<(), PreconditionError> {
        let len = self.len();
        let store = lookup_mut(&mut self.waveform_features, name)?;
        indices.sort_unstable();
        indices.dedup();
        if let Some(&index) = indices.last().filter(|&&index| index >= len) {
            return Err(PreconditionError::IndexOutOfRange {
                column: name.to_owned(),
                index,
                len,
            });
        }
        store.insert(feature.to_owned(), indices);
        self.record_revision(StoreKey::waveform(name, feature));
        Ok(())
    }

    /// Stores trough indices, see [Self::set_waveform_feature].
    pub fn set_troughs(&mut self, name: &str, troughs: Vec<usize>) -> Result<(), PreconditionError> {
        self.set_waveform_feature(name, Self::TROUGHS, troughs)
    }

    pub fn cycle_feature(&self, name: &str, feature: &str) -> Result<Option<&[Real]>, PreconditionError> {
        Ok(self.cycle_features(name)?.get(feature).map(Vec::as_slice))
    }

    /// Stores one value per cycle under `feature`, overwriting any previous value.
    pub fn set_cycle_feature(
        &mut self,
        name: &str,
        feature: &str,
        values: Vec<Real>,
    ) -> Result<(), PreconditionError> {
        lookup_mut(&mut self.cycle_features, name)?.insert(feature.to_owned(), values);
        self.record_revision(StoreKey::cycle(name, feature));
        Ok(())
    }

    /// The revision at which a waveform-level feature was last stored, e.g. [Self::TROUGHS].
    pub fn waveform_feature_revision(&self, name: &str, feature: &str) -> Option<u64> {
        self.revisions.get(&StoreKey::waveform(name, feature)).copied()
    }

    /// The revision at which a cycle-level feature was last stored.
    pub fn cycle_feature_revision(&self, name: &str, feature: &str) -> Option<u64> {
        self.revisions.get(&StoreKey::cycle(name, feature)).copied()
    }

    /// Whether a cycle-level feature is stored and was stored after the troughs it was derived from.
    ///
    /// A feature stored for a signal whose troughs were never found is taken to be current.
    pub fn cycle_feature_is_current(&self, name: &str, feature: &str) -> bool {
        match (
            self.cycle_feature_revision(name, feature),
            self.waveform_feature_revision(name, Self::TROUGHS),
        ) {
            (Some(cycle), Some(troughs)) => cycle > troughs,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    fn record_revision(&mut self, key: StoreKey) {
        self.latest_revision += 1;
        self.revisions.insert(key, self.latest_revision);
    }

    pub fn diff_feature(&self, name: &str, feature: &str) -> Result<Option<&DiffFeature>, PreconditionError> {
        Ok(self.diff_features(name)?.get(feature))
    }

    pub(crate) fn set_diff_feature(
        &mut self,
        name: &str,
        feature: &str,
        diff: DiffFeature,
    ) -> Result<(), PreconditionError> {
        lookup_mut(&mut self.diff_features, name)?.insert(feature.to_owned(), diff);
        Ok(())
    }
}

fn validate_timestamps(timestamps: &[Real]) -> Result<(), ValidationError> {
    if let Some(index) = timestamps.iter().position(|t| !t.is_finite()) {
        return Err(ValidationError::NonFiniteTime(index));
    }
    match timestamps
        .windows(2)
        .position(|pair| matches!(pair, [previous, next] if next <= previous))
    {
        Some(index) => Err(ValidationError::NonIncreasingTime(index + 1)),
        None => Ok(()),
    }
}

fn empty_stores<T: Default>(names: &[String]) -> HashMap<String, T> {
    names
        .iter()
        .map(|name| (name.clone(), T::default()))
        .collect()
}

fn lookup<'a, T>(stores: &'a HashMap<String, T>, name: &str) -> Result<&'a T, PreconditionError> {
    stores
        .get(name)
        .ok_or_else(|| PreconditionError::UnknownColumn(name.to_owned()))
}

fn lookup_mut<'a, T>(
    stores: &'a mut HashMap<String, T>,
    name: &str,
) -> Result<&'a mut T, PreconditionError> {
    stores
        .get_mut(name)
        .ok_or_else(|| PreconditionError::UnknownColumn(name.to_owned()))
}
