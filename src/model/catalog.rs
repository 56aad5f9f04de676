use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use super::metadata::{Domain, domain_of};

// ---------------------------------------------------------------------------
// Category – Baseline vs Tuned grouping, inferred from the file name
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize)]
pub enum Category {
    Baseline,
    #[default]
    Tuned,
}

const BASELINE_MARKER: &str = "baseline";

impl Category {
    pub const ALL: [Category; 2] = [Category::Baseline, Category::Tuned];

    pub fn of(file_name: &str) -> Self {
        if file_name.to_lowercase().contains(BASELINE_MARKER) {
            Category::Baseline
        } else {
            Category::Tuned
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Baseline => f.write_str("Baseline"),
            Category::Tuned => f.write_str("Tuned"),
        }
    }
}

// ---------------------------------------------------------------------------
// ModelFile – a persisted regressor discovered on disk
// ---------------------------------------------------------------------------

/// Identity of a model artifact. Everything except the name is derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    pub file_name: String,
    pub category: Category,
    pub domain: Domain,
}

impl ModelFile {
    pub fn new(file_name: &str) -> Self {
        Self {
            file_name: file_name.to_string(),
            category: Category::of(file_name),
            domain: domain_of(file_name),
        }
    }
}

// ---------------------------------------------------------------------------
// ModelCatalog – directory scan
// ---------------------------------------------------------------------------

/// Enumerates model artifacts in a directory.
#[derive(Debug, Clone)]
pub struct ModelCatalog {
    dir: PathBuf,
    suffix: String,
}

impl ModelCatalog {
    /// `extension` is given without the leading dot.
    pub fn new(dir: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            suffix: format!(".{}", extension.trim_start_matches('.')),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Sorted artifact names belonging to `category`.
    ///
    /// The directory is created when missing. An empty result is not an
    /// error; callers decide how to present "no models available".
    pub fn list_models(&self, category: Category) -> io::Result<Vec<String>> {
        std::fs::create_dir_all(&self.dir)?;

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            // Non UTF-8 names cannot be matched against the naming rules.
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(&self.suffix) {
                names.push(name);
            }
        }
        names.sort();
        names.retain(|name| Category::of(name) == category);

        log::debug!(
            "{} {category} models in {}",
            names.len(),
            self.dir.display()
        );
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "{}").unwrap();
    }

    #[test]
    fn partitions_by_baseline_marker_and_sorts() {
        let tmp = tempfile::tempdir().unwrap();
        for name in [
            "silver_tuned.json",
            "Recovery_BASELINE.json",
            "gold_tuned.json",
            "gold_baseline.json",
            "notes.txt",
        ] {
            touch(tmp.path(), name);
        }
        let catalog = ModelCatalog::new(tmp.path(), "json");

        assert_eq!(
            catalog.list_models(Category::Baseline).unwrap(),
            vec!["Recovery_BASELINE.json", "gold_baseline.json"]
        );
        assert_eq!(
            catalog.list_models(Category::Tuned).unwrap(),
            vec!["gold_tuned.json", "silver_tuned.json"]
        );
    }

    #[test]
    fn creates_missing_directory_and_returns_empty() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("models");
        let catalog = ModelCatalog::new(&dir, ".json");

        assert!(catalog.list_models(Category::Tuned).unwrap().is_empty());
        assert!(dir.is_dir());
        // Second scan over the now-existing directory must not fail.
        assert!(catalog.list_models(Category::Baseline).unwrap().is_empty());
    }

    #[test]
    fn ignores_subdirectories_with_matching_suffix() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("archive.json")).unwrap();
        touch(tmp.path(), "tonnage.json");
        let catalog = ModelCatalog::new(tmp.path(), "json");
        assert_eq!(catalog.list_models(Category::Tuned).unwrap(), vec!["tonnage.json"]);
    }

    #[test]
    fn model_file_derives_category_and_domain() {
        let file = ModelFile::new("Gold_Baseline_v1.json");
        assert_eq!(file.category, Category::Baseline);
        assert_eq!(file.domain, Domain::Gold);
        assert_eq!(ModelFile::new("xgb.json").domain, Domain::Unknown);
    }
}
