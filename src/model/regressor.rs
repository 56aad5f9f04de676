use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Capability interface
// ---------------------------------------------------------------------------

/// Per-feature importance weights, when the model type provides them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Importances<'a> {
    /// Aligned to input order, one weight per feature.
    Available(&'a [f64]),
    Unavailable,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PredictError {
    #[error("row {}: got {found} features, but the model expects {expected}", .row + 1)]
    Arity {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("row {}: input contains NaN or infinity at feature {}", .row + 1, .feature + 1)]
    NonFinite { row: usize, feature: usize },
}

/// A trained regressor that can be queried for its input schema.
pub trait Regressor {
    /// Number of input features every row must carry.
    fn n_features_in(&self) -> usize;

    /// Evaluate one already validated row.
    fn predict_row(&self, row: &[f64]) -> f64;

    fn importances(&self) -> Importances<'_> {
        Importances::Unavailable
    }

    /// Predict a batch of rows, one output per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, PredictError> {
        let expected = self.n_features_in();
        rows.iter()
            .enumerate()
            .map(|(row, values)| {
                if values.len() != expected {
                    return Err(PredictError::Arity {
                        row,
                        found: values.len(),
                        expected,
                    });
                }
                if let Some(feature) = values.iter().position(|v| !v.is_finite()) {
                    return Err(PredictError::NonFinite { row, feature });
                }
                Ok(self.predict_row(values))
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Artifact format
// ---------------------------------------------------------------------------

/// On-disk model artifact, tagged by `"kind"`.
///
/// ```json
/// { "kind": "linear", "n_features_in": 3, "coefficients": [0.1, 0.2, 0.0], "intercept": 0.5 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    Forest(ForestModel),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    pub n_features_in: usize,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

/// How per-tree outputs are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Combine {
    /// Random-forest style averaging.
    #[default]
    Mean,
    /// Boosting style accumulation.
    Sum,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForestModel {
    pub n_features_in: usize,
    pub trees: Vec<Tree>,
    #[serde(default)]
    pub combine: Combine,
    #[serde(default)]
    pub base_score: f64,
    #[serde(default)]
    pub feature_importances: Option<Vec<f64>>,
}

/// Flat node list; node 0 is the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tree {
    pub nodes: Vec<Node>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Leaf {
        leaf: f64,
    },
    /// `x[feature] <= threshold` goes left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Regressor for LinearModel {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.intercept
            + self
                .coefficients
                .iter()
                .zip(row)
                .map(|(c, x)| c * x)
                .sum::<f64>()
    }
}

impl Tree {
    fn evaluate(&self, row: &[f64]) -> f64 {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { leaf } => return *leaf,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }
}

impl Regressor for ForestModel {
    fn n_features_in(&self) -> usize {
        self.n_features_in
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let total: f64 = self.trees.iter().map(|t| t.evaluate(row)).sum();
        let combined = match self.combine {
            Combine::Mean => total / self.trees.len() as f64,
            Combine::Sum => total,
        };
        self.base_score + combined
    }

    fn importances(&self) -> Importances<'_> {
        match &self.feature_importances {
            Some(weights) => Importances::Available(weights),
            None => Importances::Unavailable,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl LinearModel {
    fn validate(&self) -> Result<()> {
        ensure!(self.n_features_in > 0, "n_features_in must be positive");
        ensure!(
            self.coefficients.len() == self.n_features_in,
            "expected {} coefficients, found {}",
            self.n_features_in,
            self.coefficients.len()
        );
        Ok(())
    }
}

impl ForestModel {
    fn validate(&self) -> Result<()> {
        ensure!(self.n_features_in > 0, "n_features_in must be positive");
        ensure!(!self.trees.is_empty(), "forest has no trees");
        if let Some(weights) = &self.feature_importances {
            ensure!(
                weights.len() == self.n_features_in,
                "expected {} feature importances, found {}",
                self.n_features_in,
                weights.len()
            );
        }
        for (t, tree) in self.trees.iter().enumerate() {
            tree.validate(self.n_features_in)
                .with_context(|| format!("tree {t}"))?;
        }
        Ok(())
    }
}

impl Tree {
    /// Children must point strictly forward so traversal always terminates.
    fn validate(&self, n_features: usize) -> Result<()> {
        ensure!(!self.nodes.is_empty(), "tree has no nodes");
        let n = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                left,
                right,
                ..
            } = node
            {
                if *feature >= n_features {
                    bail!("node {i} splits on feature {feature}, model has {n_features}");
                }
                for child in [left, right] {
                    if *child <= i || *child >= n {
                        bail!("node {i} has invalid child index {child}");
                    }
                }
            }
        }
        Ok(())
    }
}

impl ModelArtifact {
    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::Forest(m) => m.validate(),
        }
    }

    pub fn into_regressor(self) -> Box<dyn Regressor> {
        match self {
            ModelArtifact::Linear(m) => Box::new(m),
            ModelArtifact::Forest(m) => Box::new(m),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read, decode and validate a model artifact.
pub fn load_model(path: &Path) -> Result<Box<dyn Regressor>> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading model file {}", path.display()))?;
    let artifact: ModelArtifact =
        serde_json::from_slice(&bytes).context("decoding model artifact")?;
    artifact.validate().context("invalid model artifact")?;
    Ok(artifact.into_regressor())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Box<dyn Regressor>> {
        let artifact: ModelArtifact = serde_json::from_str(json)?;
        artifact.validate()?;
        Ok(artifact.into_regressor())
    }

    const STUMP_FOREST: &str = r#"{
        "kind": "forest",
        "n_features_in": 2,
        "feature_importances": [0.25, 0.75],
        "trees": [
            { "nodes": [
                { "feature": 1, "threshold": 10.0, "left": 1, "right": 2 },
                { "leaf": 1.0 },
                { "leaf": 3.0 }
            ] },
            { "nodes": [ { "leaf": 5.0 } ] }
        ]
    }"#;

    #[test]
    fn linear_model_is_dot_product_plus_intercept() {
        let model = parse(
            r#"{"kind": "linear", "n_features_in": 3, "coefficients": [1.0, 2.0, -1.0], "intercept": 0.5}"#,
        )
        .unwrap();
        assert_eq!(model.n_features_in(), 3);
        assert_eq!(
            model.predict(&[vec![1.0, 1.0, 1.0], vec![0.0, 0.0, 2.0]]).unwrap(),
            vec![2.5, -1.5]
        );
        assert_eq!(model.importances(), Importances::Unavailable);
    }

    #[test]
    fn forest_averages_trees_and_exposes_importances() {
        let model = parse(STUMP_FOREST).unwrap();
        // tree 1: 1.0 or 3.0, tree 2: 5.0
        assert_eq!(
            model.predict(&[vec![0.0, 10.0], vec![0.0, 11.0]]).unwrap(),
            vec![3.0, 4.0]
        );
        assert_eq!(model.importances(), Importances::Available(&[0.25, 0.75]));
    }

    #[test]
    fn summed_forest_adds_base_score() {
        let json = r#"{"kind": "forest", "n_features_in": 1, "combine": "sum", "base_score": 0.5,
            "trees": [{"nodes": [{"leaf": 1.0}]}, {"nodes": [{"leaf": 2.0}]}]}"#;
        assert_eq!(parse(json).unwrap().predict(&[vec![0.0]]).unwrap(), vec![3.5]);
    }

    #[test]
    fn rejects_wrong_row_width_and_non_finite_values() {
        let model = parse(STUMP_FOREST).unwrap();
        assert_eq!(
            model.predict(&[vec![1.0, 2.0], vec![1.0]]),
            Err(PredictError::Arity {
                row: 1,
                found: 1,
                expected: 2
            })
        );
        let err = model.predict(&[vec![f64::NAN, 1.0]]).unwrap_err();
        assert_eq!(err, PredictError::NonFinite { row: 0, feature: 0 });
        assert_eq!(
            err.to_string(),
            "row 1: input contains NaN or infinity at feature 1"
        );
    }

    #[test]
    fn validation_catches_malformed_artifacts() {
        let cases = [
            r#"{"kind": "linear", "n_features_in": 2, "coefficients": [1.0]}"#,
            r#"{"kind": "linear", "n_features_in": 0, "coefficients": []}"#,
            r#"{"kind": "forest", "n_features_in": 1, "trees": []}"#,
            r#"{"kind": "forest", "n_features_in": 1, "feature_importances": [1.0, 2.0],
                "trees": [{"nodes": [{"leaf": 1.0}]}]}"#,
            r#"{"kind": "forest", "n_features_in": 1,
                "trees": [{"nodes": [{"feature": 3, "threshold": 0.0, "left": 1, "right": 2},
                                     {"leaf": 1.0}, {"leaf": 2.0}]}]}"#,
            r#"{"kind": "forest", "n_features_in": 1,
                "trees": [{"nodes": [{"feature": 0, "threshold": 0.0, "left": 0, "right": 1},
                                     {"leaf": 1.0}]}]}"#,
            r#"{"kind": "svm", "n_features_in": 1}"#,
        ];
        for json in cases {
            assert!(parse(json).is_err(), "{json}");
        }
    }

    #[test]
    fn load_model_reports_missing_file() {
        let tmp = tempfile::tempdir().unwrap();
        let err = match load_model(&tmp.path().join("absent.json")) {
            Ok(_) => panic!("expected an error"),
            Err(e) => e,
        };
        assert!(format!("{err:#}").contains("reading model file"));
    }
}
