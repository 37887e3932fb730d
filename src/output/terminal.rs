//! Plain terminal output

use std::io::Write;

use anyhow::Result;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::pipeline::TrainReport;

use super::OutputFormatter;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Human-readable run summary
pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn write_header(&self, report: &TrainReport, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer)?;
        writeln!(writer, "{}", RULE)?;
        writeln!(
            writer,
            " diabetes-train: run {} ({})",
            report.run_id, report.experiment_name
        )?;
        writeln!(writer, "{}", RULE)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_data_summary(&self, report: &TrainReport, writer: &mut dyn Write) -> Result<()> {
        writeln!(writer, "Data:    {}", report.training_data)?;
        writeln!(
            writer,
            "Rows:    {} ({} train / {} test)",
            report.rows, report.split.train, report.split.test
        )?;
        writeln!(writer, "Target:  {}", report.target)?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_model(&self, report: &TrainReport, writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(["Feature", "Coefficient"]);
        for (name, coef) in &report.model.coefficients {
            builder.push_record([name.clone(), format!("{:.6}", coef)]);
        }
        builder.push_record(["(intercept)".to_string(), format!("{:.6}", report.model.intercept)]);

        writeln!(
            writer,
            "Model:   logistic regression, C={}, {} iteration(s){}",
            report.params.get("C").map(String::as_str).unwrap_or("?"),
            report.model.n_iter,
            if report.model.converged { "" } else { " (not converged)" }
        )?;
        writeln!(writer, "{}", builder.build().with(Style::sharp()))?;
        writeln!(writer)?;
        Ok(())
    }

    fn write_metrics(&self, report: &TrainReport, writer: &mut dyn Write) -> Result<()> {
        let mut builder = Builder::default();
        builder.push_record(["Metric", "Value"]);
        builder.push_record(["acc".to_string(), format!("{:.4}", report.metrics.acc)]);
        builder.push_record(["auc".to_string(), format!("{:.4}", report.metrics.auc)]);
        for (name, value) in &report.training_metrics {
            builder.push_record([name.clone(), format!("{:.4}", value)]);
        }

        writeln!(writer, "Metrics:")?;
        writeln!(writer, "{}", builder.build().with(Style::sharp()))?;
        writeln!(writer)?;
        writeln!(writer, "{}", RULE)?;
        Ok(())
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TerminalOutput {
    fn render(&self, report: &TrainReport, writer: &mut dyn Write) -> Result<()> {
        self.write_header(report, writer)?;
        self.write_data_summary(report, writer)?;
        self.write_model(report, writer)?;
        self.write_metrics(report, writer)?;
        Ok(())
    }
}
