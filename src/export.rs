use std::path::Path;

use anyhow::{Context, Result};
use simple_excel_writer::{Row, Workbook};

use crate::data::model::{Dataset, Value};

// ---------------------------------------------------------------------------
// Spreadsheet export
// ---------------------------------------------------------------------------

/// Default sheet name, matching what spreadsheet tools create.
pub const SHEET_NAME: &str = "Sheet1";

/// Render `dataset` as an in-memory `.xlsx` workbook.
///
/// The first row holds the column names; numbers and booleans keep their
/// cell type and nulls become empty cells.
pub fn to_xlsx(dataset: &Dataset, sheet_name: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::create_in_memory();
    let mut sheet = workbook.create_sheet(sheet_name);

    workbook
        .write_sheet(&mut sheet, |writer| {
            writer.append_row(Row::from_iter(
                dataset.column_names.iter().map(|c| c.as_str()),
            ))?;
            for record in &dataset.rows {
                let mut row = Row::new();
                for value in record {
                    match value {
                        Value::String(s) => row.add_cell(s.as_str()),
                        Value::Integer(i) => row.add_cell(*i as f64),
                        Value::Float(f) => row.add_cell(*f),
                        Value::Bool(b) => row.add_cell(*b),
                        Value::Null => row.add_empty_cells(1),
                    }
                }
                writer.append_row(row)?;
            }
            Ok(())
        })
        .context("writing worksheet")?;

    workbook
        .close()
        .context("finalizing workbook")?
        .context("workbook produced no bytes")
}

/// Write `dataset` to `path` as `.xlsx`.
pub fn save_xlsx(dataset: &Dataset, sheet_name: &str, path: &Path) -> Result<()> {
    let bytes = to_xlsx(dataset, sheet_name)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))?;
    log::info!("Exported {} rows to {}", dataset.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    use calamine::{Data, Reader, Xlsx, open_workbook_from_rs};

    fn sample() -> Dataset {
        Dataset::from_rows(
            vec!["age".into(), "job".into(), "score".into(), "loan".into(), "y".into()],
            vec![
                vec![
                    Value::Integer(41),
                    "admin.".into(),
                    Value::Float(0.25),
                    Value::Bool(false),
                    "yes".into(),
                ],
                vec![
                    Value::Integer(29),
                    Value::Null,
                    Value::Float(1.5),
                    Value::Bool(true),
                    "no".into(),
                ],
            ],
        )
        .unwrap()
    }

    fn read_back(bytes: Vec<u8>) -> Vec<Vec<Data>> {
        let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(bytes)).unwrap();
        let range = workbook.worksheet_range(SHEET_NAME).unwrap();
        range.rows().map(|r| r.to_vec()).collect()
    }

    #[test]
    fn test_xlsx_is_zip_container() {
        let bytes = to_xlsx(&sample(), SHEET_NAME).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_xlsx_round_trip() {
        let rows = read_back(to_xlsx(&sample(), SHEET_NAME).unwrap());
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("age".into()));
        assert_eq!(rows[0][4], Data::String("y".into()));
        assert_eq!(rows[1][0], Data::Float(41.0));
        assert_eq!(rows[1][1], Data::String("admin.".into()));
        assert_eq!(rows[1][2], Data::Float(0.25));
        assert_eq!(rows[1][3], Data::Bool(false));
        assert_eq!(rows[2][3], Data::Bool(true));
        assert_eq!(rows[2][1], Data::Empty);
        assert_eq!(rows[2][4], Data::String("no".into()));
    }

    #[test]
    fn test_save_xlsx_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bank_raw_y.xlsx");
        save_xlsx(&sample(), SHEET_NAME, &path).unwrap();
        assert!(std::fs::metadata(&path).unwrap().len() > 0);
    }

    #[test]
    fn test_empty_dataset_keeps_header() {
        let empty = sample().select(&[]);
        let rows = read_back(to_xlsx(&empty, SHEET_NAME).unwrap());
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].len(), 5);
    }
}
