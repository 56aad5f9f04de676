use std::path::{Path, PathBuf};

use crate::config::Settings;
use crate::data::export::save_csv;
use crate::data::loader::load_table;
use crate::data::table::Table;
use crate::error::ActionError;
use crate::model::binder::{BoundModel, bind};
use crate::model::catalog::{Category, ModelCatalog};
use crate::notify::{ActionResult, Notice, Notifications};
use crate::predict::{BatchResult, PredictionResult, predict_batch, predict_one};

pub const DEFAULT_CHART_TITLE: &str = "Trend: Select Model and Upload Data";

// ---------------------------------------------------------------------------
// Batch outcome
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct BatchOutcome {
    pub result: BatchResult,
    /// Rendered summary line.
    pub summary_text: String,
    /// Upload plus `Index` and `Prediction` columns, as shown and exported.
    pub output: Table,
}

// ---------------------------------------------------------------------------
// Session – the full UI state, independent of rendering
// ---------------------------------------------------------------------------

/// Everything a user session owns. Every action either completes or
/// leaves the previous state in place.
pub struct Session {
    pub settings: Settings,
    pub catalog: ModelCatalog,

    pub category: Category,
    /// Model files for the current category.
    pub models: Vec<String>,
    /// File name of the bound model (None in the NoModel state).
    pub selected_model: Option<String>,
    pub bound: Option<BoundModel>,

    /// Last single-row prediction.
    pub prediction: Option<PredictionResult>,
    /// Last successful batch run.
    pub batch: Option<BatchOutcome>,
    pub chart_title: String,
    /// Current page of the batch result table.
    pub batch_page: usize,

    pub notifications: Notifications,
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        let catalog = ModelCatalog::new(&settings.models_dir, &settings.model_extension);
        let notifications = Notifications::new(settings.notice_lifetime());
        Self {
            category: settings.initial_category,
            catalog,
            models: Vec::new(),
            selected_model: None,
            bound: None,
            prediction: None,
            batch: None,
            chart_title: DEFAULT_CHART_TITLE.to_string(),
            batch_page: 0,
            notifications,
            settings,
        }
    }

    /// Populate the model list for the initial category and bind the first
    /// model. Failures are reported, the session still starts.
    pub fn init(&mut self) {
        let category = self.category;
        if let Err(err) = self.change_category(category) {
            self.notifications.report(Err(err));
        }
    }

    // -- Model selection --

    /// Relist models for `category` and bind the first one. An empty list
    /// leaves the session without a model. If listing or binding fails the
    /// session stays on its previous category, list and model.
    pub fn change_category(&mut self, category: Category) -> Result<(), ActionError> {
        let models = self.catalog.list_models(category)?;
        let bound = match models.first() {
            Some(first) => Some((first.clone(), self.load(first)?)),
            None => {
                log::info!("No {category} models in {}", self.catalog.dir().display());
                None
            }
        };

        self.category = category;
        self.models = models;
        match bound {
            Some((file_name, bound)) => self.install(file_name, bound),
            None => self.unbind(),
        }
        Ok(())
    }

    /// Bind `file_name`, clearing results that belonged to the previous
    /// model. On failure the previous selection is kept intact.
    pub fn change_model(&mut self, file_name: &str) -> Result<(), ActionError> {
        let bound = self.load(file_name)?;
        self.install(file_name.to_string(), bound);
        Ok(())
    }

    fn load(&self, file_name: &str) -> Result<BoundModel, ActionError> {
        bind(&self.catalog, file_name).map_err(|cause| ActionError::Load {
            model: file_name.to_string(),
            cause,
        })
    }

    fn install(&mut self, file_name: String, bound: BoundModel) {
        self.selected_model = Some(file_name);
        self.bound = Some(bound);
        self.clear_results();
    }

    fn unbind(&mut self) {
        self.selected_model = None;
        self.bound = None;
        self.clear_results();
    }

    fn clear_results(&mut self) {
        self.prediction = None;
        self.batch = None;
        self.batch_page = 0;
        self.chart_title = DEFAULT_CHART_TITLE.to_string();
    }

    // -- Predictions --

    pub fn predict(&mut self) -> ActionResult {
        let bound = self.bound.as_ref().ok_or(ActionError::NoModel)?;
        let result = predict_one(bound.model.as_ref(), &bound.features, bound.unit())?;
        log::info!("{} -> {result}", bound.file.file_name);
        self.prediction = Some(result);
        Ok(Notice::success("Calculation Successful"))
    }

    pub fn batch_upload(&mut self, path: &Path) -> ActionResult {
        let bound = self.bound.as_ref().ok_or(ActionError::NoModel)?;
        let table = load_table(path).map_err(|e| {
            ActionError::InvalidInput(format!("{}: {e:#}", path.display()))
        })?;
        let (result, summary) =
            predict_batch(bound.model.as_ref(), &table, bound.unit(), bound.arity())?;

        let label = bound.label();
        let unit = bound.unit();
        self.chart_title = format!(
            "Shift Prediction Trend - {} Model - {label} ({unit})",
            self.category
        );
        self.batch = Some(BatchOutcome {
            summary_text: summary.describe(label, unit),
            output: result.to_table(),
            result,
        });
        self.batch_page = 0;
        Ok(Notice::success("Batch processed successfully."))
    }

    // -- Export / reset --

    /// Write the batch results to the destination picked by `choose`, which
    /// receives the suggested file name and may cancel by returning `None`.
    pub fn download<F>(&mut self, choose: F) -> ActionResult
    where
        F: FnOnce(&str) -> Option<PathBuf>,
    {
        let batch = match &self.batch {
            Some(batch) if !batch.result.is_empty() => batch,
            _ => return Err(ActionError::NothingToExport),
        };
        let Some(path) = choose(&self.settings.export_file_name) else {
            return Ok(Notice::info("Download cancelled"));
        };
        save_csv(&batch.output, &path).map_err(ActionError::Export)?;
        log::info!("Exported {} rows to {}", batch.result.len(), path.display());
        Ok(Notice::info(format!("Saved CSV to {}", path.display())))
    }

    /// Zero the inputs and clear every result. The bound model is kept.
    pub fn reset(&mut self) {
        if let Some(bound) = &mut self.bound {
            bound.features.reset();
        }
        self.prediction = None;
        self.batch = None;
        self.batch_page = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::Severity;

    const RECOVERY_MODEL: &str =
        r#"{"kind": "linear", "n_features_in": 2, "coefficients": [0.5, 0.25], "intercept": 0.0}"#;
    const TONNAGE_MODEL: &str = r#"{"kind": "forest", "n_features_in": 3,
        "feature_importances": [0.1, 0.6, 0.3],
        "trees": [{"nodes": [{"leaf": 12.345}]}]}"#;

    fn session_with_models(dir: &Path) -> Session {
        std::fs::write(dir.join("recovery_tuned.json"), RECOVERY_MODEL).unwrap();
        std::fs::write(dir.join("tonnage_tuned.json"), TONNAGE_MODEL).unwrap();
        std::fs::write(dir.join("gold_baseline.json"), RECOVERY_MODEL).unwrap();
        std::fs::write(dir.join("silver_tuned_broken.json"), "{").unwrap();
        let settings = Settings {
            models_dir: dir.to_path_buf(),
            ..Settings::default()
        };
        let mut session = Session::new(settings);
        session.init();
        session
    }

    fn write_csv(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("shifts.csv");
        std::fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn init_binds_first_model_of_initial_category() {
        let tmp = tempfile::tempdir().unwrap();
        let session = session_with_models(tmp.path());

        assert_eq!(
            session.models,
            vec!["recovery_tuned.json", "silver_tuned_broken.json", "tonnage_tuned.json"]
        );
        assert_eq!(session.selected_model.as_deref(), Some("recovery_tuned.json"));
        let bound = session.bound.as_ref().unwrap();
        assert_eq!(bound.features.len(), 2);
        assert_eq!(session.chart_title, DEFAULT_CHART_TITLE);
    }

    #[test]
    fn predict_applies_percent_rule() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        let bound = session.bound.as_mut().unwrap();
        bound.features.set(0, 1.0);
        bound.features.set(1, 0.5);

        let notice = session.predict().unwrap();
        assert_eq!(notice.severity, Severity::Success);
        // 0.5 + 0.125 = 0.625 → 62.5 %
        assert_eq!(session.prediction.unwrap().to_string(), "62.5 %");
    }

    #[test]
    fn failed_model_switch_keeps_working_panel() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        session.predict().unwrap();

        let err = session.change_model("silver_tuned_broken.json").unwrap_err();
        assert!(matches!(err, ActionError::Load { .. }));
        assert_eq!(session.selected_model.as_deref(), Some("recovery_tuned.json"));
        assert!(session.bound.is_some());
        assert!(session.prediction.is_some());
    }

    #[test]
    fn failed_category_switch_keeps_previous_category_and_model() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        std::fs::write(tmp.path().join("gold_baseline.json"), "not json").unwrap();
        session.predict().unwrap();

        let err = session.change_category(Category::Baseline).unwrap_err();
        assert!(matches!(err, ActionError::Load { .. }));
        assert_eq!(session.category, Category::Tuned);
        assert_eq!(
            session.models,
            vec!["recovery_tuned.json", "silver_tuned_broken.json", "tonnage_tuned.json"]
        );
        assert_eq!(session.selected_model.as_deref(), Some("recovery_tuned.json"));
        assert!(session.prediction.is_some());

        let upload = write_csv(tmp.path(), "Au,Ag\n1,0\n");
        session.batch_upload(&upload).unwrap();
        assert_eq!(
            session.chart_title,
            "Shift Prediction Trend - Tuned Model - Recovery (%)"
        );
    }

    #[test]
    fn unreadable_models_dir_keeps_previous_state() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        let not_a_dir = tmp.path().join("plain_file");
        std::fs::write(&not_a_dir, "x").unwrap();
        session.catalog = ModelCatalog::new(&not_a_dir, "json");

        let err = session.change_category(Category::Baseline).unwrap_err();
        assert!(matches!(err, ActionError::Catalog(_)));
        assert_eq!(session.category, Category::Tuned);
        assert_eq!(session.models.len(), 3);
        assert_eq!(session.selected_model.as_deref(), Some("recovery_tuned.json"));
        assert!(session.bound.is_some());
    }

    #[test]
    fn failed_prediction_keeps_previous_result() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        session.bound.as_mut().unwrap().features.set(0, 1.0);
        session.predict().unwrap();

        session.bound.as_mut().unwrap().features.set(1, f64::NAN);
        assert!(session.predict().is_err());
        assert_eq!(session.prediction.unwrap().to_string(), "50.0 %");
    }

    #[test]
    fn switching_model_rebinds_schema_and_clears_results() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        session.predict().unwrap();

        session.change_model("tonnage_tuned.json").unwrap();
        let bound = session.bound.as_ref().unwrap();
        assert_eq!(bound.features.names()[0], "Off-Vein Meterage");
        assert_eq!(bound.importances[0].feature, "On-Vein Meterage");
        assert!(session.prediction.is_none());

        session.predict().unwrap();
        assert_eq!(session.prediction.unwrap().to_string(), "12.35 tons");
    }

    #[test]
    fn empty_category_leaves_no_model() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        std::fs::remove_file(tmp.path().join("gold_baseline.json")).unwrap();

        session.change_category(Category::Baseline).unwrap();
        assert!(session.models.is_empty());
        assert!(session.bound.is_none());
        assert!(matches!(session.predict(), Err(ActionError::NoModel)));
    }

    #[test]
    fn batch_upload_then_failed_upload_keeps_results() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());

        let good = write_csv(tmp.path(), "\u{feff}Shift,Au,Ag\nA,1,0\nB,4,0\nC,0,4\n");
        session.batch_upload(&good).unwrap();
        let batch = session.batch.as_ref().unwrap();
        assert_eq!(batch.result.predictions, vec![50.0, 100.0, 100.0]);
        assert_eq!(
            batch.summary_text,
            "Average Recovery: 83.33% | Min: 50.0% | Max: 100.0%"
        );
        assert_eq!(
            session.chart_title,
            "Shift Prediction Trend - Tuned Model - Recovery (%)"
        );

        let bad = write_csv(tmp.path(), "Shift,Au\nA,1\n");
        let err = session.batch_upload(&bad).unwrap_err();
        assert_eq!(err.to_string(), "Need 2 numeric columns.");
        assert_eq!(session.batch.as_ref().unwrap().result.len(), 3);
    }

    #[test]
    fn download_writes_index_and_prediction_columns() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        let upload = write_csv(tmp.path(), "Au,Ag\n1,0\n");
        session.batch_upload(&upload).unwrap();

        let dest = tmp.path().join("out.csv");
        let mut suggested = String::new();
        session
            .download(|name| {
                suggested = name.to_string();
                Some(dest.clone())
            })
            .unwrap();
        assert_eq!(suggested, "Mining_Predictions.csv");
        assert_eq!(
            std::fs::read_to_string(&dest).unwrap(),
            "Au,Ag,Index,Prediction\n1,0,1,50.0\n"
        );
    }

    #[test]
    fn download_without_results_warns_and_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        let mut asked = false;

        let err = session
            .download(|_| {
                asked = true;
                None
            })
            .unwrap_err();
        assert_eq!(err.severity(), Severity::Warning);
        assert!(!asked);
    }

    #[test]
    fn reset_zeroes_inputs_and_clears_results() {
        let tmp = tempfile::tempdir().unwrap();
        let mut session = session_with_models(tmp.path());
        session.bound.as_mut().unwrap().features.set(0, 3.0);
        session.predict().unwrap();
        let upload = write_csv(tmp.path(), "Au,Ag\n1,0\n");
        session.batch_upload(&upload).unwrap();

        session.reset();
        let bound = session.bound.as_ref().unwrap();
        assert_eq!(bound.features.values(), vec![0.0, 0.0]);
        assert_eq!(bound.features.len(), 2);
        assert_eq!(session.selected_model.as_deref(), Some("recovery_tuned.json"));
        assert!(session.prediction.is_none());
        assert!(session.batch.is_none());
    }
}
