//! The training pipeline: load CSVs, split, fit, evaluate, log

use indexmap::IndexMap;
use serde::Serialize;

use crate::classifier::{LogisticModel, LogisticRegression};
use crate::config::TrainConfig;
use crate::error::Result;
use crate::loader::get_csvs_df;
use crate::metrics::{self, Evaluation};
use crate::model::{Dataset, Frame, Split, SplitSizes};
use crate::split::train_test_split;
use crate::tracking::{Autolog, FileStore, RunStatus, Tracker};

/// Fitted weights keyed by feature name
#[derive(Debug, Clone, Serialize)]
pub struct ModelSummary {
    pub classes: [f64; 2],
    pub intercept: f64,
    pub coefficients: IndexMap<String, f64>,
    pub n_iter: usize,
    pub converged: bool,
}

impl From<&LogisticModel> for ModelSummary {
    fn from(model: &LogisticModel) -> Self {
        Self {
            classes: model.classes,
            intercept: model.intercept,
            coefficients: model
                .feature_names
                .iter()
                .cloned()
                .zip(model.coef.iter().copied())
                .collect(),
            n_iter: model.n_iter,
            converged: model.converged,
        }
    }
}

/// Everything a finished run reports back
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub run_id: String,
    pub experiment_name: String,
    pub training_data: String,
    pub target: String,
    pub rows: usize,
    pub split: SplitSizes,
    pub params: IndexMap<&'static str, String>,
    pub model: ModelSummary,
    /// Empty when autolog is disabled
    pub training_metrics: IndexMap<String, f64>,
    pub metrics: Evaluation,
}

/// Separate the label column and hold out a test partition
pub fn split_data(df: &Frame, target: &str, test_size: f64, seed: u64) -> Result<Split> {
    let data = Dataset::from_frame(df, target)?;
    train_test_split(&data, test_size, seed)
}

/// Fit the classifier on the training partition
pub fn train_model(estimator: &LogisticRegression, train: &Dataset) -> Result<LogisticModel> {
    log::info!(
        "Fitting logistic regression (C={}) on {} rows x {} features",
        estimator.c,
        train.len(),
        train.features.column_count()
    );
    estimator.fit(train)
}

/// Score the model on held-out data and log `acc`/`auc` plus the ROC curve
pub fn evaluate_model(
    model: &LogisticModel,
    test: &Dataset,
    tracker: &mut dyn Tracker,
) -> Result<Evaluation> {
    let y_pred = model.predict(&test.features)?;
    let acc = metrics::accuracy(&test.target, &y_pred)?;

    let y_scores: Vec<f64> = model
        .predict_proba(&test.features)?
        .into_iter()
        .map(|[_, p]| p)
        .collect();
    let auc = metrics::roc_auc_score(&test.target, &y_scores)?;

    let mut logged = IndexMap::new();
    logged.insert("acc".to_string(), acc);
    logged.insert("auc".to_string(), auc);
    tracker.log_metrics(&logged)?;

    let curve = metrics::roc_curve(&test.target, &y_scores)?;
    tracker.log_artifact("roc_curve.csv", curve.to_csv()?.as_bytes())?;

    log::info!("Accuracy: {:.4}, AUC: {:.4}", acc, auc);
    Ok(Evaluation { acc, auc })
}

/// Run the whole pipeline for `config`, recording into the run store
pub fn run(config: &TrainConfig) -> Result<TrainReport> {
    config.validate()?;
    let autolog = Autolog::new(config.autolog);

    let df = get_csvs_df(&config.training_data)?;
    let split = split_data(&df, &config.target, config.test_size, config.random_state)?;

    let estimator = LogisticRegression::from_reg_rate(config.reg_rate)?
        .with_max_iter(config.max_iter)
        .with_tol(config.tol);

    let store = FileStore::new(&config.tracking_dir);
    let mut active = store.start_run(&config.experiment_name)?;

    match execute(&estimator, &split, autolog, &mut active) {
        Ok((model, training_metrics, metrics)) => {
            let meta = active.end(RunStatus::Finished)?;
            Ok(TrainReport {
                run_id: meta.run_id,
                experiment_name: meta.experiment_name,
                training_data: config.training_data.display().to_string(),
                target: config.target.clone(),
                rows: df.row_count(),
                split: split.sizes(),
                params: estimator.params(),
                model: ModelSummary::from(&model),
                training_metrics,
                metrics,
            })
        }
        Err(e) => {
            if let Err(end_err) = active.end(RunStatus::Failed) {
                log::error!("Failed to mark run as failed: {}", end_err);
            }
            Err(e)
        }
    }
}

fn execute(
    estimator: &LogisticRegression,
    split: &Split,
    autolog: Autolog,
    tracker: &mut dyn Tracker,
) -> Result<(LogisticModel, IndexMap<String, f64>, Evaluation)> {
    let model = train_model(estimator, &split.train)?;

    let training_metrics = autolog.log_fit(tracker, estimator, &model, &split.train)?;

    let evaluation = evaluate_model(&model, &split.test, tracker)?;
    Ok((model, training_metrics, evaluation))
}
