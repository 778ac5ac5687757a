//! Reads the BLS "All Data" workbook (first worksheet) or a CSV export of it.

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use tracing::{debug, info};

use crate::bls::error::ImportError;
use crate::bls::normalize::Cell;
use crate::bls::row::{AreaType, BlsRow};

/// Column index lookup keyed by upper-cased header name.
struct ColumnMap {
    index: HashMap<String, usize>,
}

impl ColumnMap {
    fn from_headers(headers: &[String]) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_ascii_uppercase(), i))
            .collect();
        Self { index }
    }

    fn require(&self, name: &'static str) -> Result<(), ImportError> {
        if self.index.contains_key(name) {
            Ok(())
        } else {
            Err(ImportError::MissingColumn(name))
        }
    }

    fn has(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn cell(&self, row: &[Cell], name: &str) -> Cell {
        self.index
            .get(name)
            .and_then(|&i| row.get(i))
            .cloned()
            .unwrap_or_default()
    }

    fn text(&self, row: &[Cell], name: &str) -> String {
        self.cell(row, name).as_text()
    }
}

const REQUIRED_COLUMNS: &[&str] = &["AREA_TITLE", "AREA_TYPE", "O_GROUP", "OCC_TITLE"];

/// Converts a header row plus data rows into `BlsRow`s.
pub fn rows_from_grid<I>(headers: &[String], rows: I) -> Result<Vec<BlsRow>, ImportError>
where
    I: IntoIterator<Item = Vec<Cell>>,
{
    let columns = ColumnMap::from_headers(headers);
    for &name in REQUIRED_COLUMNS {
        columns.require(name)?;
    }
    let has_naics = columns.has("NAICS");

    Ok(rows
        .into_iter()
        .map(|row| BlsRow {
            area_title: columns.text(&row, "AREA_TITLE"),
            area_type: AreaType::from_code(&columns.text(&row, "AREA_TYPE")),
            prim_state: columns.text(&row, "PRIM_STATE"),
            naics: has_naics.then(|| columns.text(&row, "NAICS")),
            occ_code: columns.text(&row, "OCC_CODE"),
            occ_title: columns.text(&row, "OCC_TITLE"),
            o_group: columns.text(&row, "O_GROUP"),
            tot_emp: columns.cell(&row, "TOT_EMP"),
            jobs_1000: columns.cell(&row, "JOBS_1000"),
            loc_quotient: columns.cell(&row, "LOC_QUOTIENT"),
            h_mean: columns.cell(&row, "H_MEAN"),
            h_pct10: columns.cell(&row, "H_PCT10"),
            h_pct25: columns.cell(&row, "H_PCT25"),
            h_median: columns.cell(&row, "H_MEDIAN"),
            h_pct75: columns.cell(&row, "H_PCT75"),
            h_pct90: columns.cell(&row, "H_PCT90"),
            a_mean: columns.cell(&row, "A_MEAN"),
            a_pct10: columns.cell(&row, "A_PCT10"),
            a_pct25: columns.cell(&row, "A_PCT25"),
            a_median: columns.cell(&row, "A_MEDIAN"),
            a_pct75: columns.cell(&row, "A_PCT75"),
            a_pct90: columns.cell(&row, "A_PCT90"),
        })
        .collect())
}

/// Reads all rows from `path`. `.csv` files go through the CSV reader,
/// everything else is opened as a spreadsheet workbook.
pub fn read_rows(path: &Path) -> Result<Vec<BlsRow>, ImportError> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    let rows = if is_csv {
        read_csv(path)?
    } else {
        read_workbook(path)?
    };
    info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn read_csv(path: &Path) -> Result<Vec<BlsRow>, ImportError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record?;
        grid.push(record.iter().map(Cell::from_text).collect());
    }
    rows_from_grid(&headers, grid)
}

fn read_workbook(path: &Path) -> Result<Vec<BlsRow>, ImportError> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| ImportError::Workbook(e.to_string()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Workbook("workbook has no worksheets".to_string()))?;
    debug!("Reading worksheet '{sheet}'");

    let range = workbook
        .worksheet_range(&sheet)
        .map_err(|e| ImportError::Workbook(e.to_string()))?;

    rows_from_range(&sheet, &range)
}

/// First row of the range is the header row.
fn rows_from_range(sheet: &str, range: &Range<Data>) -> Result<Vec<BlsRow>, ImportError> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| ImportError::Workbook(format!("worksheet '{sheet}' is empty")))?
        .iter()
        .map(|d| cell_from_data(d).as_text())
        .collect();

    rows_from_grid(&headers, rows.map(|r| r.iter().map(cell_from_data).collect()))
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        other => Cell::from_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "AREA,AREA_TITLE,AREA_TYPE,PRIM_STATE,NAICS,OCC_CODE,OCC_TITLE,O_GROUP,TOT_EMP,H_MEDIAN,A_MEDIAN,A_PCT90";

    #[test]
    fn test_reads_csv_export() {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        writeln!(
            file,
            "41860,\"San Francisco-Oakland-Fremont, CA\",4,CA,000000,29-1141,Registered Nurses,detailed,41230,78.90,164100,#"
        )
        .unwrap();
        writeln!(file, "99,U.S.,1,US,000000,29-1141,Registered Nurses,detailed,3282010,**,93600,").unwrap();

        let rows = read_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].area_title, "San Francisco-Oakland-Fremont, CA");
        assert_eq!(rows[0].area_type, AreaType::Metro);
        assert_eq!(rows[0].naics.as_deref(), Some("000000"));
        assert_eq!(rows[0].a_pct90, Cell::Text("#".into()));
        assert_eq!(rows[1].area_type, AreaType::National);
        assert_eq!(rows[1].a_pct90, Cell::Empty);
        // Columns absent from the file read as empty.
        assert_eq!(rows[1].loc_quotient, Cell::Empty);
    }

    #[test]
    fn test_headers_match_case_insensitively() {
        let headers: Vec<String> = ["area_title", "area_type", "o_group", "occ_title"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let grid = vec![vec![
            Cell::from_text("Abilene, TX"),
            Cell::Number(4.0),
            Cell::from_text("detailed"),
            Cell::from_text("Phlebotomists"),
        ]];
        let rows = rows_from_grid(&headers, grid).unwrap();
        assert_eq!(rows[0].area_type, AreaType::Metro);
        assert!(rows[0].naics.is_none());
    }

    fn sheet(grid: &[&[Data]]) -> Range<Data> {
        let width = grid.iter().map(|r| r.len()).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (grid.len() as u32 - 1, width - 1));
        for (r, row) in grid.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                range.set_value((r as u32, c as u32), value.clone());
            }
        }
        range
    }

    fn s(v: &str) -> Data {
        Data::String(v.to_string())
    }

    #[test]
    fn test_cell_from_workbook_data() {
        assert_eq!(cell_from_data(&Data::Empty), Cell::Empty);
        assert_eq!(cell_from_data(&s("  ")), Cell::Empty);
        assert_eq!(cell_from_data(&s(" ** ")), Cell::Text("**".into()));
        assert_eq!(cell_from_data(&Data::Float(78.9)), Cell::Number(78.9));
        assert_eq!(cell_from_data(&Data::Int(41230)), Cell::Number(41230.0));
        assert_eq!(cell_from_data(&Data::Float(4.0)).as_text(), "4");

        let error = cell_from_data(&Data::Error(calamine::CellErrorType::NA));
        assert!(matches!(error, Cell::Text(_)));
        assert_eq!(crate::bls::normalize::to_number(&error), None);
    }

    #[test]
    fn test_worksheet_rows_with_numeric_codes() {
        let range = sheet(&[
            &[s("AREA_TITLE"), s("AREA_TYPE"), s("PRIM_STATE"), s("NAICS"), s("OCC_CODE"), s("OCC_TITLE"), s("O_GROUP"), s("TOT_EMP"), s("A_MEDIAN")],
            &[s("Abilene, TX"), Data::Float(4.0), s("TX"), s("000000"), s("29-2061"), s("Licensed Practical Nurses"), s("detailed"), Data::Int(410), Data::Float(52340.0)],
            &[s("Texas"), Data::Int(2), s("TX"), s("000000"), s("29-2061"), s("Licensed Practical Nurses"), s("detailed"), Data::Float(78120.0), s("#")],
        ]);

        let rows = rows_from_range("All May 2024 data", &range).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].area_type, AreaType::Metro);
        assert_eq!(rows[0].tot_emp, Cell::Number(410.0));
        assert_eq!(rows[0].a_median, Cell::Number(52340.0));
        assert_eq!(rows[1].area_type, AreaType::State);
        assert_eq!(rows[1].a_median, Cell::Text("#".into()));
        assert_eq!(rows[1].naics.as_deref(), Some("000000"));
    }

    #[test]
    fn test_empty_worksheet_is_rejected() {
        let err = rows_from_range("Sheet1", &Range::empty()).unwrap_err();
        assert!(matches!(err, ImportError::Workbook(msg) if msg.contains("Sheet1")));
    }

    #[test]
    fn test_missing_required_column() {
        let headers = vec!["AREA_TITLE".to_string(), "AREA_TYPE".to_string()];
        let err = rows_from_grid(&headers, Vec::<Vec<Cell>>::new()).unwrap_err();
        assert!(matches!(err, ImportError::MissingColumn("O_GROUP")));
    }
}
