//! Check sets which can be read from a JSON configuration file.
use crate::{
    BuiltinFeature, CheckSet, CycleCheck, DiffCheck, QualityReport, Real,
    error::ConfigurationError,
    quality::Check,
};
use serde::Deserialize;
use std::str::FromStr;

///
/// This struct is created from the check configuration JSON file.
///
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckSetConfig {
    /// Checks to start from, if any.
    #[serde(default)]
    pub preset: Option<Preset>,
    /// Added after the preset, in order. A check with the same name as a preset check replaces it.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    ArterialPressure,
}

impl Preset {
    pub fn check_set(self) -> CheckSet {
        match self {
            Preset::ArterialPressure => CheckSet::arterial_pressure(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CheckConfig {
    pub name: String,
    /// Tag of a [BuiltinFeature], e.g. `"MaximumValue"`.
    pub feature: String,
    #[serde(default)]
    pub units: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(flatten)]
    pub bounds: Bounds,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "check-type")]
pub enum Bounds {
    Cycle {
        #[serde(default = "negative_infinity")]
        min: Real,
        #[serde(default = "infinity")]
        max: Real,
    },
    Diff {
        threshold: Real,
    },
}

fn negative_infinity() -> Real {
    Real::NEG_INFINITY
}

fn infinity() -> Real {
    Real::INFINITY
}

impl CheckConfig {
    pub fn to_check(&self) -> Result<Check, ConfigurationError> {
        let feature = BuiltinFeature::from_str(&self.feature)
            .map_err(|_| ConfigurationError::UnknownFeature(self.feature.clone()))?;
        Ok(match self.bounds {
            Bounds::Cycle { min, max } => Check::Cycle(CycleCheck {
                units: self.units.clone(),
                description: self.description.clone(),
                ..CycleCheck::new(feature, min, max)
            }),
            Bounds::Diff { threshold } => Check::Diff(DiffCheck {
                units: self.units.clone(),
                description: self.description.clone(),
                ..DiffCheck::new(feature, threshold)
            }),
        })
    }
}

impl CheckSetConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn into_check_set(self) -> Result<CheckSet, ConfigurationError> {
        let mut check_set = self.preset.map(Preset::check_set).unwrap_or_default();
        for check in &self.checks {
            if check.name == QualityReport::ALL {
                return Err(ConfigurationError::ReservedCheckName(check.name.clone()));
            }
            check_set.insert(&check.name, check.to_check()?);
        }
        Ok(check_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JSON_INPUT_1: &str = r#"
    {
        "preset": "arterial-pressure",
        "checks": [
            { "name": "map_diff", "check-type": "diff", "feature": "MeanValue", "threshold": 15.0, "units": "mmHg" },
            { "name": "systolic_pressure", "check-type": "cycle", "feature": "MaximumValue", "min": 50.0, "max": 250.0 },
            { "name": "slow_beat", "check-type": "cycle", "feature": "Duration", "max": 2.0, "description": "At least 30 bpm" }
        ]
    }
    "#;

    #[test]
    fn preset_with_extra_checks() {
        let check_set = CheckSetConfig::from_json(JSON_INPUT_1)
            .unwrap()
            .into_check_set()
            .unwrap();
        assert_eq!(check_set.len(), 11);
        assert_eq!(check_set.names().nth(1), Some("systolic_pressure"));
        assert_eq!(check_set.names().nth(9), Some("map_diff"));
        assert_eq!(check_set.names().nth(10), Some("slow_beat"));

        assert!(matches!(
            check_set.get("systolic_pressure"),
            Some(Check::Cycle(CycleCheck {
                min: 50.0,
                max: 250.0,
                units: None,
                ..
            }))
        ));
        let map_diff = check_set.get("map_diff").unwrap();
        assert!(matches!(map_diff, Check::Diff(DiffCheck { threshold: 15.0, .. })));
        assert_eq!(map_diff.feature().name(), "MeanValue");
        assert_eq!(map_diff.units(), Some("mmHg"));

        let Some(Check::Cycle(slow_beat)) = check_set.get("slow_beat") else {
            unreachable!()
        };
        assert_eq!(slow_beat.min, Real::NEG_INFINITY);
        assert_eq!(slow_beat.max, 2.0);
        assert_eq!(slow_beat.description.as_deref(), Some("At least 30 bpm"));
    }

    #[test]
    fn without_preset() {
        let check_set = CheckSetConfig::from_json(
            r#"{ "checks": [ { "name": "rate", "check-type": "cycle", "feature": "CyclesPerMinute", "min": 40 } ] }"#,
        )
        .unwrap()
        .into_check_set()
        .unwrap();
        assert_eq!(check_set.names().collect::<Vec<_>>(), ["rate"]);
        assert!(CheckSetConfig::from_json("{}").unwrap().into_check_set().unwrap().is_empty());
    }

    #[test]
    fn unknown_feature() {
        let config = CheckSetConfig::from_json(
            r#"{ "checks": [ { "name": "area", "check-type": "cycle", "feature": "AreaUnderCurve" } ] }"#,
        )
        .unwrap();
        assert_eq!(
            config.into_check_set().unwrap_err(),
            ConfigurationError::UnknownFeature("AreaUnderCurve".to_owned())
        );
    }

    #[test]
    fn all_is_reserved() {
        let config = CheckSetConfig::from_json(
            r#"{ "checks": [ { "name": "all", "check-type": "cycle", "feature": "MaximumValue", "max": 100 } ] }"#,
        )
        .unwrap();
        assert_eq!(
            config.into_check_set().unwrap_err(),
            ConfigurationError::ReservedCheckName("all".to_owned())
        );
    }

    #[test]
    fn malformed_checks() {
        // Diff checks have no default threshold.
        assert!(CheckSetConfig::from_json(
            r#"{ "checks": [ { "name": "jump", "check-type": "diff", "feature": "MeanValue" } ] }"#
        )
        .is_err());
        assert!(CheckSetConfig::from_json(
            r#"{ "checks": [ { "name": "jump", "check-type": "range", "feature": "MeanValue" } ] }"#
        )
        .is_err());
        assert!(CheckSetConfig::from_json(r#"{ "preset": "venous-pressure" }"#).is_err());
    }
}
