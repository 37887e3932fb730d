//! Output formatting for training reports

mod json;
mod terminal;

use std::io::Write;

use anyhow::Result;

use crate::config::OutputFormat;
use crate::pipeline::TrainReport;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

/// Trait for report formatters
pub trait OutputFormatter {
    /// Render a report to a writer
    fn render(&self, report: &TrainReport, writer: &mut dyn Write) -> Result<()>;
}

/// Factory for creating output formatters
pub struct OutputFactory;

impl OutputFactory {
    /// Create an output formatter based on format type
    pub fn create(format: OutputFormat) -> Box<dyn OutputFormatter> {
        match format {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Render a report to stdout
pub fn render_to_stdout(report: &TrainReport, format: OutputFormat) -> Result<()> {
    let formatter = OutputFactory::create(format);
    let mut stdout = std::io::stdout();
    formatter.render(report, &mut stdout)
}

#[cfg(test)]
mod tests {
    use indexmap::IndexMap;

    use super::*;
    use crate::metrics::Evaluation;
    use crate::model::SplitSizes;
    use crate::pipeline::ModelSummary;

    fn report() -> TrainReport {
        let mut coefficients = IndexMap::new();
        coefficients.insert("Age".to_string(), 0.05);
        let mut params = IndexMap::new();
        params.insert("C", "100".to_string());
        TrainReport {
            run_id: "0123456789abcdef0123456789abcdef".to_string(),
            experiment_name: "Default".to_string(),
            training_data: "experimentation/data/".to_string(),
            target: "Diabetic".to_string(),
            rows: 10,
            split: SplitSizes { train: 8, test: 2 },
            params,
            model: ModelSummary {
                classes: [0.0, 1.0],
                intercept: -1.5,
                coefficients,
                n_iter: 6,
                converged: true,
            },
            training_metrics: IndexMap::new(),
            metrics: Evaluation { acc: 0.5, auc: 0.75 },
        }
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        JsonOutput::compact().render(&report(), &mut out).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["metrics"]["acc"], 0.5);
        assert_eq!(value["metrics"]["auc"], 0.75);
        assert_eq!(value["split"]["train"], 8);
        assert_eq!(value["model"]["coefficients"]["Age"], 0.05);
    }

    #[test]
    fn test_terminal_output() {
        let mut out = Vec::new();
        TerminalOutput::new().render(&report(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("0123456789abcdef0123456789abcdef"));
        assert!(text.contains("8 train / 2 test"));
        assert!(text.contains("0.7500"));
        assert!(text.contains("Age"));
    }
}
