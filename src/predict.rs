//! Prediction engine: single-row and batch predictions with unit-specific
//! post-processing, plus batch summaries.

use std::fmt;

use crate::data::table::{Cell, Table, format_number};
use crate::error::ActionError;
use crate::model::binder::FeatureVector;
use crate::model::metadata::Unit;
use crate::model::regressor::Regressor;

pub const INDEX_COLUMN: &str = "Index";
pub const PREDICTION_COLUMN: &str = "Prediction";

// ---------------------------------------------------------------------------
// Post-processing
// ---------------------------------------------------------------------------

/// Round half away from zero to two decimals.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Percent outputs are fractions: scale to 0–100 and cap at 100 (there is
/// no lower bound). Every unit is rounded to two decimals.
pub fn postprocess(raw: f64, unit: Unit) -> f64 {
    let value = if unit.is_percent() {
        (raw * 100.0).min(100.0)
    } else {
        raw
    };
    round2(value)
}

// ---------------------------------------------------------------------------
// Single-row prediction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionResult {
    pub value: f64,
    pub unit: Unit,
}

impl fmt::Display for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_number(self.value), self.unit)
    }
}

pub fn predict_one(
    model: &dyn Regressor,
    features: &FeatureVector,
    unit: Unit,
) -> Result<PredictionResult, ActionError> {
    if let Some(entry) = features.entries().iter().find(|e| !e.value.is_finite()) {
        return Err(ActionError::InvalidInput(format!(
            "'{}' is not a number",
            entry.name
        )));
    }
    let outputs = model.predict(&[features.values()])?;
    let raw = outputs
        .first()
        .copied()
        .ok_or_else(|| ActionError::InvalidInput("model returned no output".into()))?;
    Ok(PredictionResult {
        value: postprocess(raw, unit),
        unit,
    })
}

// ---------------------------------------------------------------------------
// Batch prediction
// ---------------------------------------------------------------------------

/// The uploaded table together with one processed prediction per row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BatchResult {
    pub table: Table,
    pub predictions: Vec<f64>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// `(index, prediction)` points with a 1-based index.
    pub fn points(&self) -> Vec<[f64; 2]> {
        self.predictions
            .iter()
            .enumerate()
            .map(|(i, p)| [(i + 1) as f64, *p])
            .collect()
    }

    /// Copy of the uploaded table with `Index` and `Prediction` columns
    /// appended (or overwritten when the upload already had them).
    pub fn to_table(&self) -> Table {
        let mut table = self.table.clone();
        table.set_column(
            INDEX_COLUMN,
            (1..=self.len()).map(|i| Cell::Integer(i as i64)).collect(),
        );
        table.set_column(
            PREDICTION_COLUMN,
            self.predictions.iter().map(|p| Cell::Float(*p)).collect(),
        );
        table
    }
}

/// Aggregates over processed (rounded and clamped) predictions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchSummary {
    Percent { average: f64, min: f64, max: f64 },
    Totals { total: f64, average: f64 },
}

impl BatchSummary {
    /// `None` for an empty batch.
    pub fn compute(values: &[f64], unit: Unit) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let total: f64 = values.iter().sum();
        let average = round2(total / values.len() as f64);
        Some(if unit.is_percent() {
            BatchSummary::Percent {
                average,
                min: values.iter().copied().fold(f64::INFINITY, f64::min),
                max: values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
            }
        } else {
            BatchSummary::Totals {
                total: round2(total),
                average,
            }
        })
    }

    /// One-line summary for the results header.
    pub fn describe(&self, label: &str, unit: Unit) -> String {
        match *self {
            BatchSummary::Percent { average, min, max } => format!(
                "Average Recovery: {}% | Min: {}% | Max: {}%",
                format_number(average),
                format_number(min),
                format_number(max)
            ),
            BatchSummary::Totals { total, average } => format!(
                "Total {label}: {} {unit} | Average per Shift: {} {unit}",
                format_number(total),
                format_number(average)
            ),
        }
    }
}

/// Predict every row of `table` using its first `n_expected` numeric
/// columns in file order. Extra numeric columns are ignored.
pub fn predict_batch(
    model: &dyn Regressor,
    table: &Table,
    unit: Unit,
    n_expected: usize,
) -> Result<(BatchResult, BatchSummary), ActionError> {
    let numeric = table.numeric_columns();
    if numeric.len() < n_expected {
        return Err(ActionError::InsufficientColumns {
            expected: n_expected,
            found: numeric.len(),
        });
    }
    if table.is_empty() {
        return Err(ActionError::EmptyTable);
    }

    let inputs = table.matrix(&numeric[..n_expected]);
    let predictions: Vec<f64> = model
        .predict(&inputs)?
        .into_iter()
        .map(|raw| postprocess(raw, unit))
        .collect();

    let summary = BatchSummary::compute(&predictions, unit).ok_or(ActionError::EmptyTable)?;
    log::info!(
        "Batch of {} rows predicted from columns {:?}",
        predictions.len(),
        &numeric[..n_expected]
    );
    Ok((
        BatchResult {
            table: table.clone(),
            predictions,
        },
        summary,
    ))
}
