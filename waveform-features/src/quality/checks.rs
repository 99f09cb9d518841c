use crate::{BuiltinFeature, Real, SharedExtractor};

/// Passes each cycle whose feature value lies strictly between `min` and `max`.
#[derive(Clone, Debug)]
pub struct CycleCheck {
    pub feature: SharedExtractor,
    pub min: Real,
    pub max: Real,
    pub units: Option<String>,
    pub description: Option<String>,
}

impl CycleCheck {
    pub fn new(feature: impl Into<SharedExtractor>, min: Real, max: Real) -> Self {
        Self {
            feature: feature.into(),
            min,
            max,
            units: None,
            description: None,
        }
    }

    /// A check with only a lower bound.
    pub fn above(feature: impl Into<SharedExtractor>, min: Real) -> Self {
        Self::new(feature, min, Real::INFINITY)
    }

    /// A check with only an upper bound.
    pub fn below(feature: impl Into<SharedExtractor>, max: Real) -> Self {
        Self::new(feature, Real::NEG_INFINITY, max)
    }

    pub fn with_units(self, units: &str) -> Self {
        Self {
            units: Some(units.to_owned()),
            ..self
        }
    }

    pub fn with_description(self, description: &str) -> Self {
        Self {
            description: Some(description.to_owned()),
            ..self
        }
    }

    /// Values equal to either bound fail, as does NaN.
    pub fn passes(&self, value: Real) -> bool {
        self.min < value && value < self.max
    }
}

/// Passes each cycle whose feature changes from the previous cycle by strictly less than `threshold`.
///
/// The first cycle has no predecessor, so its change is zero and it passes any positive threshold.
#[derive(Clone, Debug)]
pub struct DiffCheck {
    pub feature: SharedExtractor,
    pub threshold: Real,
    pub units: Option<String>,
    pub description: Option<String>,
}

impl DiffCheck {
    pub fn new(feature: impl Into<SharedExtractor>, threshold: Real) -> Self {
        Self {
            feature: feature.into(),
            threshold,
            units: None,
            description: None,
        }
    }

    pub fn with_units(self, units: &str) -> Self {
        Self {
            units: Some(units.to_owned()),
            ..self
        }
    }

    pub fn with_description(self, description: &str) -> Self {
        Self {
            description: Some(description.to_owned()),
            ..self
        }
    }

    /// `absolute_diff` is expected to be non-negative.
    pub fn passes(&self, absolute_diff: Real) -> bool {
        absolute_diff < self.threshold
    }
}

#[derive(Clone, Debug)]
pub enum Check {
    Cycle(CycleCheck),
    Diff(DiffCheck),
}

impl Check {
    /// The extractor of the feature this check examines.
    pub fn feature(&self) -> &SharedExtractor {
        match self {
            Check::Cycle(check) => &check.feature,
            Check::Diff(check) => &check.feature,
        }
    }

    pub fn units(&self) -> Option<&str> {
        match self {
            Check::Cycle(check) => check.units.as_deref(),
            Check::Diff(check) => check.units.as_deref(),
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Check::Cycle(check) => check.description.as_deref(),
            Check::Diff(check) => check.description.as_deref(),
        }
    }
}

impl From<CycleCheck> for Check {
    fn from(check: CycleCheck) -> Self {
        Self::Cycle(check)
    }
}

impl From<DiffCheck> for Check {
    fn from(check: DiffCheck) -> Self {
        Self::Diff(check)
    }
}

/// An ordered collection of named checks.
///
/// Names are unique, and the columns of a [QualityReport](crate::QualityReport)
/// appear in the order their checks were first inserted.
#[derive(Clone, Debug, Default)]
pub struct CheckSet {
    checks: Vec<(String, Check)>,
}

impl CheckSet {
    pub fn new() -> Self {
        Default::default()
    }

    /// Plausibility checks for invasive arterial blood pressure.
    pub fn arterial_pressure() -> Self {
        const MMHG: &str = "mmHg";
        Self::new()
            .with(
                "diastolic_pressure",
                CycleCheck::new(BuiltinFeature::MinimumValue, 20.0, 200.0).with_units(MMHG),
            )
            .with(
                "systolic_pressure",
                CycleCheck::new(BuiltinFeature::MaximumValue, 30.0, 300.0).with_units(MMHG),
            )
            .with(
                "mean_pressure",
                CycleCheck::new(BuiltinFeature::MeanValue, 30.0, 200.0).with_units(MMHG),
            )
            .with(
                "heart_rate",
                CycleCheck::new(BuiltinFeature::CyclesPerMinute, 20.0, 200.0)
                    .with_units("beats per minute"),
            )
            .with(
                "pulse_pressure",
                CycleCheck::new(BuiltinFeature::MaximumMinusMinimumValue, 20.0, 250.0)
                    .with_units(MMHG),
            )
            .with(
                "mean_dyneg",
                CycleCheck::new(BuiltinFeature::MeanNegativeFirstDifference, -3.0, 0.0)
                    .with_units(MMHG)
                    .with_description("Mean of the falls in pressure between successive samples"),
            )
            .with(
                "diastolic_pressure_diff",
                DiffCheck::new(BuiltinFeature::MinimumValue, 20.0).with_units(MMHG),
            )
            .with(
                "systolic_pressure_diff",
                DiffCheck::new(BuiltinFeature::MaximumValue, 20.0).with_units(MMHG),
            )
            .with(
                "beat_time_diff",
                DiffCheck::new(BuiltinFeature::Duration, 0.5).with_units("seconds"),
            )
    }

    /// Adds a check, see [Self::insert].
    pub fn with(mut self, name: &str, check: impl Into<Check>) -> Self {
        self.insert(name, check);
        self
    }

    /// Adds a check under `name`.
    ///
    /// If a check of that name already exists it is replaced, keeping its position,
    /// and the old check is returned.
    pub fn insert(&mut self, name: &str, check: impl Into<Check>) -> Option<Check> {
        let check = check.into();
        match self.checks.iter_mut().find(|(existing, _)| existing == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, check)),
            None => {
                self.checks.push((name.to_owned(), check));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Check> {
        let position = self.checks.iter().position(|(existing, _)| existing == name)?;
        Some(self.checks.remove(position).1)
    }

    pub fn get(&self, name: &str) -> Option<&Check> {
        self.checks
            .iter()
            .find_map(|(existing, check)| (existing == name).then_some(check))
    }

    /// Iterates over the names and checks in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Check)> {
        self.checks.iter().map(|(name, check)| (name.as_str(), check))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }
}
