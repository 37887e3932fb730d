//! Automatic logging of estimator details when a model is fitted

use indexmap::IndexMap;

use crate::classifier::{LogisticModel, LogisticRegression};
use crate::error::Result;
use crate::metrics;
use crate::model::Dataset;

use super::Tracker;

/// Records params, training metrics, tags and the model artifact on fit
#[derive(Debug, Clone, Copy)]
pub struct Autolog {
    enabled: bool,
}

impl Default for Autolog {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Autolog {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Log everything known about a freshly fitted model and return the
    /// training metrics. No-op returning an empty map when disabled.
    pub fn log_fit(
        &self,
        tracker: &mut dyn Tracker,
        estimator: &LogisticRegression,
        model: &LogisticModel,
        train: &Dataset,
    ) -> Result<IndexMap<String, f64>> {
        if !self.enabled {
            return Ok(IndexMap::new());
        }

        tracker.log_params(&estimator.params())?;
        tracker.set_tag("estimator_name", "LogisticRegression")?;
        tracker.set_tag("estimator_class", "diabetes_train::classifier::LogisticRegression")?;

        let training = training_metrics(model, train)?;
        tracker.log_metrics(&training)?;

        let json = serde_json::to_vec_pretty(model)?;
        tracker.log_artifact("model/model.json", &json)?;

        log::debug!(
            "Autologged {} params and {} training metrics",
            estimator.params().len(),
            training.len()
        );
        Ok(training)
    }
}

/// Metrics of a model scored on its own training data
pub fn training_metrics(model: &LogisticModel, train: &Dataset) -> Result<IndexMap<String, f64>> {
    let predicted = model.predict(&train.features)?;
    let p_pos: Vec<f64> = model
        .predict_proba(&train.features)?
        .into_iter()
        .map(|[_, p]| p)
        .collect();

    let accuracy = metrics::accuracy(&train.target, &predicted)?;
    let (precision, recall, f1) =
        metrics::precision_recall_f1(&train.target, &predicted, model.classes[1])?;

    let mut out = IndexMap::new();
    out.insert("training_accuracy_score".to_string(), accuracy);
    out.insert("training_precision_score".to_string(), precision);
    out.insert("training_recall_score".to_string(), recall);
    out.insert("training_f1_score".to_string(), f1);
    out.insert(
        "training_log_loss".to_string(),
        metrics::log_loss(&train.target, &p_pos)?,
    );
    out.insert(
        "training_roc_auc".to_string(),
        metrics::roc_auc_score(&train.target, &p_pos)?,
    );
    out.insert("training_score".to_string(), accuracy);
    Ok(out)
}
