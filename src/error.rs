use crate::model::regressor::PredictError;
use crate::notify::Severity;

/// Failure of a single user action. Every variant leaves the session as it
/// was before the action started.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Could not read models directory: {0}")]
    Catalog(#[from] std::io::Error),

    #[error("Update failed: {model}: {cause:#}")]
    Load { model: String, cause: anyhow::Error },

    #[error("No model loaded")]
    NoModel,

    #[error("Input error: {0}")]
    InvalidInput(String),

    #[error("Need {expected} numeric columns.")]
    InsufficientColumns { expected: usize, found: usize },

    #[error("Batch error: the uploaded file has no rows")]
    EmptyTable,

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictError),

    #[error("No data to download")]
    NothingToExport,

    #[error("Export failed: {0:#}")]
    Export(anyhow::Error),
}

impl ActionError {
    pub fn severity(&self) -> Severity {
        match self {
            ActionError::NothingToExport => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
