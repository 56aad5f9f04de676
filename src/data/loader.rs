use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, BooleanArray, Float64Array, Int64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::table::{Cell, Table};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load an uploaded table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – UTF-8 with or without byte-order mark, header row required
/// * `.parquet` – any flat schema; integer and float columns are numeric
pub fn load_table(path: &Path) -> Result<Table> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Tokens read as missing values.
const NA_TOKENS: &[&str] = &[
    "", "#N/A", "#NA", "N/A", "n/a", "NA", "<NA>", "NULL", "null", "NaN", "nan", "-NaN",
    "-nan", "None",
];

fn load_csv(path: &Path) -> Result<Table> {
    let bytes = std::fs::read(path).context("reading CSV file")?;
    parse_csv(&bytes)
}

/// Parse CSV bytes. Column types are inferred per column, so a column that
/// mixes numbers and text is text throughout.
pub fn parse_csv(bytes: &[u8]) -> Result<Table> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::Reader::from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    if headers.is_empty() {
        bail!("CSV has no columns");
    }

    let mut raw: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        raw.push(record.iter().map(|s| s.trim().to_string()).collect());
    }

    let kinds: Vec<ColumnKind> = (0..headers.len())
        .map(|c| ColumnKind::infer(raw.iter().map(|row| row[c].as_str())))
        .collect();

    let rows = raw
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&kinds)
                .map(|(s, kind)| kind.cell(s))
                .collect()
        })
        .collect();

    Ok(Table::new(headers, rows))
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Integer,
    Float,
    Bool,
    Text,
}

fn is_na(s: &str) -> bool {
    NA_TOKENS.contains(&s)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

impl ColumnKind {
    /// Narrowest kind that accepts every non-missing value. A column with
    /// only missing values is a float column.
    fn infer<'a>(values: impl Iterator<Item = &'a str>) -> Self {
        let mut kind: Option<ColumnKind> = None;
        for s in values.filter(|s| !is_na(s)) {
            let this = if parse_bool(s).is_some() {
                ColumnKind::Bool
            } else if s.parse::<i64>().is_ok() {
                ColumnKind::Integer
            } else if s.parse::<f64>().is_ok() {
                ColumnKind::Float
            } else {
                return ColumnKind::Text;
            };
            kind = Some(match (kind, this) {
                (None, k) => k,
                (Some(a), b) if a == b => a,
                (Some(ColumnKind::Integer), ColumnKind::Float)
                | (Some(ColumnKind::Float), ColumnKind::Integer) => ColumnKind::Float,
                // Booleans mixed with numbers.
                _ => return ColumnKind::Text,
            });
        }
        kind.unwrap_or(ColumnKind::Float)
    }

    fn cell(&self, s: String) -> Cell {
        if is_na(&s) {
            return Cell::Null;
        }
        match self {
            ColumnKind::Integer => s.parse().map(Cell::Integer).unwrap_or(Cell::Text(s)),
            ColumnKind::Float => s.parse().map(Cell::Float).unwrap_or(Cell::Text(s)),
            ColumnKind::Bool => parse_bool(&s).map(Cell::Bool).unwrap_or(Cell::Text(s)),
            ColumnKind::Text => Cell::Text(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows: Vec<Vec<Cell>> = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let columns: Vec<Vec<Cell>> = batch
            .columns()
            .iter()
            .zip(&headers)
            .map(|(col, name)| column_cells(col).with_context(|| format!("column '{name}'")))
            .collect::<Result<_>>()?;

        for row in 0..batch.num_rows() {
            rows.push(columns.iter().map(|col| col[row].clone()).collect());
        }
    }

    Ok(Table::new(headers, rows))
}

// -- Arrow helpers --

/// Convert an Arrow column into cells, widening integers to i64 and other
/// numeric types to f64.
fn column_cells(col: &Arc<dyn Array>) -> Result<Vec<Cell>> {
    let dtype = col.data_type();
    if dtype.is_nested() {
        bail!("nested type {dtype} is not supported");
    }

    if dtype.is_integer() {
        let widened = cast(col, &DataType::Int64).context("casting integer column")?;
        let arr = widened
            .as_any()
            .downcast_ref::<Int64Array>()
            .context("expected Int64Array")?;
        return Ok(arr
            .iter()
            .map(|v| v.map(Cell::Integer).unwrap_or(Cell::Null))
            .collect());
    }
    if dtype.is_numeric() {
        let widened = cast(col, &DataType::Float64).context("casting numeric column")?;
        let arr = widened
            .as_any()
            .downcast_ref::<Float64Array>()
            .context("expected Float64Array")?;
        return Ok(arr
            .iter()
            .map(|v| v.map(Cell::Float).unwrap_or(Cell::Null))
            .collect());
    }
    if let Some(arr) = col.as_any().downcast_ref::<BooleanArray>() {
        return Ok(arr
            .iter()
            .map(|v| v.map(Cell::Bool).unwrap_or(Cell::Null))
            .collect());
    }

    // Everything else is carried through as text.
    let text = cast(col, &DataType::Utf8)
        .with_context(|| format!("type {dtype} cannot be read as text"))?;
    let arr = text
        .as_any()
        .downcast_ref::<StringArray>()
        .context("expected StringArray")?;
    Ok(arr
        .iter()
        .map(|v| v.map(|s| Cell::Text(s.to_string())).unwrap_or(Cell::Null))
        .collect())
}
