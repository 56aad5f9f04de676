use anyhow::Result;

use super::catalog::{ModelCatalog, ModelFile};
use super::metadata::{DomainMetadata, Unit};
use super::regressor::{Importances, Regressor, load_model};

// ---------------------------------------------------------------------------
// FeatureVector – the editable input row
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct FeatureEntry {
    pub name: String,
    pub value: f64,
}

/// Ordered (name, value) pairs. The length is fixed by the bound model;
/// only values change until another model is bound.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureVector {
    entries: Vec<FeatureEntry>,
}

impl FeatureVector {
    /// `n` zero-valued features named from `metadata`.
    pub fn from_metadata(metadata: &DomainMetadata, n: usize) -> Self {
        let entries = (0..n)
            .map(|i| FeatureEntry {
                name: metadata.feature_name(i),
                value: 0.0,
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FeatureEntry] {
        &self.entries
    }

    /// Values can be edited, names and length cannot.
    pub fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut f64)> {
        self.entries
            .iter_mut()
            .map(|e| (e.name.as_str(), &mut e.value))
    }

    pub fn set(&mut self, index: usize, value: f64) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.value = value;
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.entries.iter().map(|e| e.value).collect()
    }

    pub fn reset(&mut self) {
        for entry in &mut self.entries {
            entry.value = 0.0;
        }
    }
}

// ---------------------------------------------------------------------------
// Importance table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ImportanceRow {
    pub feature: String,
    pub importance: f64,
}

/// Pair names with weights, most important first. Unavailable weights give
/// an empty table.
pub fn importance_table(names: &[String], importances: Importances<'_>) -> Vec<ImportanceRow> {
    let Importances::Available(weights) = importances else {
        return Vec::new();
    };
    let mut rows: Vec<ImportanceRow> = names
        .iter()
        .zip(weights)
        .map(|(feature, importance)| ImportanceRow {
            feature: feature.clone(),
            importance: *importance,
        })
        .collect();
    rows.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    rows
}

// ---------------------------------------------------------------------------
// BoundModel – a loaded model together with its derived schema
// ---------------------------------------------------------------------------

pub struct BoundModel {
    pub file: ModelFile,
    pub model: Box<dyn Regressor>,
    pub features: FeatureVector,
    pub importances: Vec<ImportanceRow>,
    pub metadata: &'static DomainMetadata,
}

impl BoundModel {
    pub fn arity(&self) -> usize {
        self.model.n_features_in()
    }

    pub fn unit(&self) -> Unit {
        self.metadata.unit
    }

    pub fn label(&self) -> &'static str {
        self.file.domain.label()
    }
}

impl std::fmt::Debug for BoundModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundModel")
            .field("file", &self.file)
            .field("arity", &self.arity())
            .field("features", &self.features)
            .finish_non_exhaustive()
    }
}

/// Attach an already loaded regressor to the schema implied by its file name.
pub fn bind_regressor(file: ModelFile, model: Box<dyn Regressor>) -> BoundModel {
    let metadata = file.domain.metadata();
    let features = FeatureVector::from_metadata(metadata, model.n_features_in());
    let importances = importance_table(&features.names(), model.importances());
    BoundModel {
        file,
        model,
        features,
        importances,
        metadata,
    }
}

/// Load `file_name` from the catalog and bind it.
pub fn bind(catalog: &ModelCatalog, file_name: &str) -> Result<BoundModel> {
    let model = load_model(&catalog.path_for(file_name))?;
    let bound = bind_regressor(ModelFile::new(file_name), model);
    log::info!(
        "Bound {} ({} domain, {} features, unit '{}')",
        file_name,
        bound.label(),
        bound.arity(),
        bound.unit()
    );
    Ok(bound)
}
