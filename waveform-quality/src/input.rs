//! Reads waveform recordings from JSON files.
use serde::Deserialize;
use waveform_features::{Real, ValidationError, WaveformTable};

/// A signal or time column.
#[derive(Debug, Deserialize)]
pub(crate) struct ColumnFile {
    pub(crate) name: String,
    pub(crate) values: Vec<Real>,
}

///
/// This struct is created from the waveform JSON file.
///
#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct WaveformFile {
    /// Name of the column holding timestamps in seconds.
    #[serde(default = "default_time_column")]
    pub(crate) time_column: String,
    pub(crate) columns: Vec<ColumnFile>,
}

fn default_time_column() -> String {
    WaveformTable::DEFAULT_TIME_COLUMN.to_owned()
}

impl WaveformFile {
    pub(crate) fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub(crate) fn into_table(self) -> Result<WaveformTable, ValidationError> {
        WaveformTable::new(
            &self.time_column,
            self.columns
                .into_iter()
                .map(|column| (column.name, column.values))
                .collect(),
        )
    }
}
