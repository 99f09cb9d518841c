//! Computes the change in cycle-level features from one cycle to the next.
use crate::{
    Real, WaveformTable,
    error::{FeatureError, PreconditionError},
    extractors::{CycleFeatureExtractor, ensure_cycle_feature},
    table::DiffFeature,
};
use itertools::Itertools;
use std::iter::once;
use tracing::{debug, instrument};

/// Computes the first differences of the feature stored by `extractor`, and stores them at
/// `diff_features[name][extractor.name()]`, overwriting any previous value.
///
/// The extractor is run first if its feature has not yet been stored.
/// The differences are the same length as the feature: the first is always zero, as the
/// first cycle has no predecessor, and the `k`th is `feature[k] - feature[k - 1]`.
///
/// # Parameters
/// - table: the table holding the signal.
/// - name: name of the signal column.
/// - extractor: extractor of the feature to difference.
/// - absolute: if true, the magnitudes of the differences are stored.
#[instrument(skip_all, fields(column = name, feature = extractor.name(), absolute = absolute), err(level = "warn"))]
pub fn calculate_diff(
    table: &mut WaveformTable,
    name: &str,
    extractor: &dyn CycleFeatureExtractor,
    absolute: bool,
) -> Result<(), FeatureError> {
    let feature = ensure_cycle_feature(table, name, extractor)?;
    let values = once(0.0)
        .chain(
            feature
                .iter()
                .tuple_windows()
                .map(|(previous, next)| next - previous)
                .map(|difference| if absolute { difference.abs() } else { difference }),
        )
        .take(feature.len())
        .collect::<Vec<Real>>();
    let source_revision = table
        .cycle_feature_revision(name, extractor.name())
        .unwrap_or_default();
    table.set_diff_feature(
        name,
        extractor.name(),
        DiffFeature {
            absolute,
            values,
            source_revision,
        },
    )?;
    Ok(())
}

/// Computes the absolute first differences, see [calculate_diff].
pub fn calculate_absolute_diff(
    table: &mut WaveformTable,
    name: &str,
    extractor: &dyn CycleFeatureExtractor,
) -> Result<(), FeatureError> {
    calculate_diff(table, name, extractor, true)
}

/// Returns the absolute first differences of the feature stored by `extractor`,
/// computing them only if they are not already stored.
///
/// Signed differences stored for the same feature are replaced by absolute ones.
/// Stored differences are also recomputed if the feature has been stored again since they
/// were computed, or if the troughs have changed since the feature was stored.
pub fn ensure_absolute_diff<'a>(
    table: &'a mut WaveformTable,
    name: &str,
    extractor: &dyn CycleFeatureExtractor,
) -> Result<&'a [Real], FeatureError> {
    let source_revision = table
        .cycle_feature_is_current(name, extractor.name())
        .then(|| table.cycle_feature_revision(name, extractor.name()))
        .flatten();
    if table
        .diff_feature(name, extractor.name())?
        .is_some_and(|diff| diff.absolute && Some(diff.source_revision) == source_revision)
    {
        debug!("Reusing stored absolute diff of {}", extractor.name());
    } else {
        calculate_absolute_diff(table, name, extractor)?;
    }
    Ok(table
        .diff_feature(name, extractor.name())?
        .map(|diff| diff.values.as_slice())
        .ok_or_else(|| PreconditionError::MissingFeature {
            column: name.to_owned(),
            feature: extractor.name().to_owned(),
        })?)
}
