//! diabetes-train - train a logistic regression classifier and log its metrics

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use diabetes_train::config::{OutputFormat, TrainConfig, DEFAULT_TARGET, DEFAULT_TRAINING_DATA};
use diabetes_train::output::render_to_stdout;
use diabetes_train::pipeline;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliOutputFormat {
    Terminal,
    Json,
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(f: CliOutputFormat) -> Self {
        match f {
            CliOutputFormat::Terminal => OutputFormat::Terminal,
            CliOutputFormat::Json => OutputFormat::Json,
        }
    }
}

/// Train a logistic regression classifier on CSV data and log accuracy/AUC
#[derive(Parser, Debug)]
#[command(name = "diabetes-train")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory containing the training CSV files
    #[arg(long = "training_data", default_value = DEFAULT_TRAINING_DATA)]
    training_data: PathBuf,

    /// Regularization rate for the logistic regression model
    #[arg(long = "reg_rate", default_value_t = 0.01)]
    reg_rate: f64,

    /// Label column to predict
    #[arg(long, default_value = DEFAULT_TARGET)]
    target: String,

    /// Fraction of rows held out for evaluation
    #[arg(long = "test_size", default_value_t = 0.2)]
    test_size: f64,

    /// Seed for the train/test shuffle
    #[arg(long = "random_state", default_value_t = 0)]
    random_state: u64,

    /// Maximum solver iterations
    #[arg(long = "max_iter", default_value_t = 100)]
    max_iter: usize,

    /// Root directory of the run store
    #[arg(long = "tracking_dir", env = "TRAIN_TRACKING_DIR", default_value = "mlruns")]
    tracking_dir: PathBuf,

    /// Experiment the run is filed under
    #[arg(long = "experiment_name", default_value = "Default")]
    experiment_name: String,

    /// Do not log estimator params, training metrics or the model
    #[arg(long = "no_autolog")]
    no_autolog: bool,

    /// Report format
    #[arg(short, long, value_enum, default_value = "terminal")]
    format: CliOutputFormat,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = TrainConfig::new(cli.training_data)
        .with_reg_rate(cli.reg_rate)
        .with_target(cli.target)
        .with_test_size(cli.test_size)
        .with_random_state(cli.random_state)
        .with_max_iter(cli.max_iter)
        .with_tracking_dir(cli.tracking_dir)
        .with_experiment_name(cli.experiment_name)
        .with_autolog(!cli.no_autolog)
        .with_output_format(cli.format.into());

    let report = pipeline::run(&config).context("Training run failed")?;

    render_to_stdout(&report, config.output_format)?;
    Ok(())
}
