/// Model layer: discovering, describing and binding regression models.
///
/// ```text
///   models/*.json
///        │
///        ▼
///   ┌──────────┐
///   │ catalog   │  scan + Baseline/Tuned partition → file names
///   └──────────┘
///        │            ┌──────────┐
///        ├──────────▶│ metadata  │  file name → domain, unit, feature names
///        ▼            └──────────┘
///   ┌──────────┐
///   │ regressor │  decode artifact → Box<dyn Regressor>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  binder   │  FeatureVector + importance table
///   └──────────┘
/// ```

pub mod binder;
pub mod catalog;
pub mod metadata;
pub mod regressor;
