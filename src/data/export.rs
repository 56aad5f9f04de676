use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::table::Table;

/// Serialise a table as CSV: header row, then one record per row.
/// Missing values are written as empty fields.
pub fn write_csv<W: Write>(table: &Table, out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer
        .write_record(&table.headers)
        .context("writing CSV header")?;
    for (i, row) in table.rows.iter().enumerate() {
        writer
            .write_record(row.iter().map(|cell| cell.to_string()))
            .with_context(|| format!("writing CSV row {}", i + 1))?;
    }
    writer.flush().context("flushing CSV output")?;
    Ok(())
}

pub fn save_csv(table: &Table, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(table, std::io::BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::table::Cell;

    #[test]
    fn writes_header_and_formatted_cells() {
        let table = Table::new(
            vec!["Shift".into(), "Au".into(), "Prediction".into()],
            vec![
                vec![Cell::Text("night, late".into()), Cell::Null, Cell::Float(100.0)],
                vec![Cell::Text("day".into()), Cell::Integer(4), Cell::Float(73.4)],
            ],
        );
        let mut buf = Vec::new();
        write_csv(&table, &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "Shift,Au,Prediction\n\"night, late\",,100.0\nday,4,73.4\n"
        );
    }

    #[test]
    fn saved_file_reads_back() {
        let table = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Cell::Integer(1), Cell::Float(2.5)]],
        );
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        save_csv(&table, &path).unwrap();
        assert_eq!(parse_csv(&std::fs::read(&path).unwrap()).unwrap(), table);
    }
}
