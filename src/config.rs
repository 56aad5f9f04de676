use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, ensure};
use serde::Deserialize;

use crate::model::catalog::Category;

/// Environment variable naming an explicit settings file.
pub const CONFIG_ENV: &str = "MINING_PREDICTOR_CONFIG";
/// Environment variable overriding `models_dir`.
pub const MODELS_DIR_ENV: &str = "MINING_MODELS_DIR";
/// Settings file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "mining-predictor.json";
/// Upper bound on `notice_seconds` (one day).
pub const MAX_NOTICE_SECONDS: f32 = 86_400.0;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory scanned for model artifacts.
    pub models_dir: PathBuf,
    /// Artifact extension, without the dot.
    pub model_extension: String,
    /// Suggested name for exported batch results.
    pub export_file_name: String,
    pub initial_category: Category,
    /// How long a notification stays on screen.
    pub notice_seconds: f32,
    /// Rows per page in the batch result table.
    pub batch_page_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("models"),
            model_extension: "json".to_string(),
            export_file_name: "Mining_Predictions.csv".to_string(),
            initial_category: Category::Tuned,
            notice_seconds: 4.0,
            batch_page_size: 5,
        }
    }
}

impl Settings {
    /// Resolve settings from the environment and working directory.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut settings = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        if let Some(dir) = std::env::var_os(MODELS_DIR_ENV) {
            settings.models_dir = PathBuf::from(dir);
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading settings file {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&text)
            .with_context(|| format!("parsing settings file {}", path.display()))?;
        settings
            .validate()
            .with_context(|| format!("invalid settings file {}", path.display()))?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        ensure!(
            self.notice_seconds.is_finite()
                && (0.0..=MAX_NOTICE_SECONDS).contains(&self.notice_seconds),
            "notice_seconds must be between 0 and {MAX_NOTICE_SECONDS}, got {}",
            self.notice_seconds
        );
        Ok(())
    }

    pub fn notice_lifetime(&self) -> Duration {
        Duration::try_from_secs_f32(self.notice_seconds.clamp(0.0, MAX_NOTICE_SECONDS))
            .unwrap_or(Duration::ZERO)
    }
}
