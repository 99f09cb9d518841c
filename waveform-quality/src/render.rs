//! Formats quality reports for printing.
use clap::ValueEnum;
use std::iter::once;
use waveform_features::QualityReport;

/// Determines how the report is printed.
#[derive(Default, Debug, Clone, Copy, ValueEnum)]
pub(crate) enum OutputFormat {
    /// A table with one row per cycle.
    #[default]
    Text,
    /// The report serialised as JSON.
    Json,
}

impl OutputFormat {
    pub(crate) fn render(self, report: &QualityReport) -> Result<String, serde_json::Error> {
        match self {
            OutputFormat::Text => Ok(render_text(report)),
            OutputFormat::Json => serde_json::to_string_pretty(report),
        }
    }
}

fn verdict(passed: Option<&bool>) -> String {
    match passed {
        Some(true) => "pass".to_owned(),
        _ => "FAIL".to_owned(),
    }
}

fn row(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_owned()
}

/// One column per check, followed by `all`.
fn render_text(report: &QualityReport) -> String {
    let header = once("cycle")
        .chain(report.names())
        .chain(once(QualityReport::ALL))
        .collect::<Vec<_>>();
    let widths = header
        .iter()
        .map(|name| name.len().max(4))
        .collect::<Vec<_>>();

    let rows = (0..report.n_cycles()).map(|cycle| {
        let cells = once(cycle.to_string())
            .chain(
                report
                    .checks()
                    .iter()
                    .map(|column| verdict(column.passed.get(cycle))),
            )
            .chain(once(verdict(report.all().get(cycle))));
        row(cells, &widths)
    });
    once(row(header.iter().map(|name| name.to_string()), &widths))
        .chain(rows)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use waveform_features::{
        BuiltinFeature, CheckSet, CycleCheck, DiffCheck, Real, WaveformTable, check_cycles,
    };

    fn four_cycle_report() -> QualityReport {
        // Cycle maxima of 5, 9, 4, 4.
        let pressure = vec![0.0, 5.0, 1.0, 9.0, 1.0, 4.0, 0.0, 4.0, 2.0];
        let time = (0..pressure.len()).map(|i| i as Real).collect();
        let mut table = WaveformTable::new(
            "time",
            vec![("time".to_owned(), time), ("pressure".to_owned(), pressure)],
        )
        .unwrap();
        table.set_troughs("pressure", vec![0, 2, 4, 6, 8]).unwrap();
        let checks = CheckSet::new()
            .with("high", CycleCheck::below(BuiltinFeature::MaximumValue, 8.0))
            .with("jump", DiffCheck::new(BuiltinFeature::MaximumValue, 4.5));
        check_cycles(&mut table, "pressure", &checks).unwrap()
    }

    #[test]
    fn text_table() {
        let text = OutputFormat::Text.render(&four_cycle_report()).unwrap();
        assert_eq!(
            text,
            [
                "cycle  high  jump  all",
                "0      pass  pass  pass",
                "1      FAIL  pass  FAIL",
                "2      pass  FAIL  FAIL",
                "3      pass  pass  pass",
            ]
            .join("\n")
        );
    }

    #[test]
    fn json() {
        let json = OutputFormat::Json.render(&four_cycle_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["n-cycles"], 4);
        assert_eq!(value["checks"][0]["name"], "high");
        assert_eq!(
            value["checks"][1]["passed"],
            serde_json::json!([true, true, false, true])
        );
        assert_eq!(value["all"], serde_json::json!([true, false, false, true]));
    }
}
