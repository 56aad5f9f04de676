use std::fmt;

// ---------------------------------------------------------------------------
// Cell – a single value in an uploaded table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring the dtypes a DataFrame would infer.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Cell {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Float(v) => Some(*v),
            Cell::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    fn is_numeric_or_null(&self) -> bool {
        matches!(self, Cell::Integer(_) | Cell::Float(_) | Cell::Null)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{}", format_number(*v)),
            Cell::Bool(true) => write!(f, "True"),
            Cell::Bool(false) => write!(f, "False"),
            Cell::Null => Ok(()),
        }
    }
}

/// Shortest round-trip decimal, keeping a trailing `.0` on integral values
/// (`100.0`, `73.4`, `12.35`).
pub fn format_number(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

// ---------------------------------------------------------------------------
// Table – generic row/column data
// ---------------------------------------------------------------------------

/// Row-major table. Every row has exactly `headers.len()` cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == headers.len()));
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// A column is numeric when every cell is an integer, a float or missing.
    pub fn is_numeric_column(&self, col: usize) -> bool {
        self.rows.iter().all(|row| row[col].is_numeric_or_null())
    }

    /// Indices of numeric columns, in file order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.headers.len())
            .filter(|&c| self.is_numeric_column(c))
            .collect()
    }

    /// Row-major `f64` matrix over `columns`; missing values become NaN.
    pub fn matrix(&self, columns: &[usize]) -> Vec<Vec<f64>> {
        self.rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|&c| row[c].as_f64().unwrap_or(f64::NAN))
                    .collect()
            })
            .collect()
    }

    /// Overwrite the named column, or append it when absent.
    /// `values` must have one entry per row.
    pub fn set_column(&mut self, name: &str, values: Vec<Cell>) {
        debug_assert_eq!(values.len(), self.rows.len());
        match self.column_index(name) {
            Some(col) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[col] = value;
                }
            }
            None => {
                self.headers.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(
            vec!["Shift".into(), "Au".into(), "Ag".into(), "Ok".into()],
            vec![
                vec![Cell::Text("A".into()), Cell::Integer(2), Cell::Float(1.5), Cell::Bool(true)],
                vec![Cell::Text("B".into()), Cell::Null, Cell::Float(2.5), Cell::Bool(false)],
            ],
        )
    }

    #[test]
    fn numeric_columns_skip_text_and_bool() {
        let table = sample();
        assert_eq!(table.numeric_columns(), vec![1, 2]);
        assert!(!table.is_numeric_column(0));
    }

    #[test]
    fn matrix_maps_missing_to_nan() {
        let m = sample().matrix(&[1, 2]);
        assert_eq!(m[0], vec![2.0, 1.5]);
        assert!(m[1][0].is_nan());
        assert_eq!(m[1][1], 2.5);
    }

    #[test]
    fn set_column_appends_or_replaces() {
        let mut table = sample();
        table.set_column("Prediction", vec![Cell::Float(1.0), Cell::Float(2.0)]);
        assert_eq!(table.headers.last().map(String::as_str), Some("Prediction"));
        table.set_column("Au", vec![Cell::Integer(7), Cell::Integer(8)]);
        assert_eq!(table.headers.len(), 5);
        assert_eq!(table.rows[1][1], Cell::Integer(8));
    }

    #[test]
    fn numbers_format_like_their_shortest_decimal() {
        assert_eq!(format_number(100.0), "100.0");
        assert_eq!(format_number(73.4), "73.4");
        assert_eq!(format_number(12.35), "12.35");
        assert_eq!(format_number(-3.0), "-3.0");
        assert_eq!(Cell::Null.to_string(), "");
        assert_eq!(Cell::Bool(true).to_string(), "True");
    }
}
