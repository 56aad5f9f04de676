/// Data layer: uploaded tables, loading and export.
///
/// Architecture:
/// ```text
///  .csv / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (typed cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  table    │  numeric column selection → feature matrix
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  export   │  Table + Index/Prediction → .csv
///   └──────────┘
/// ```

pub mod export;
pub mod loader;
pub mod table;
