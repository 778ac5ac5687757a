//! Spreadsheet cell normalization. BLS marks suppressed or non-disclosed
//! values with sentinel strings; those become `None`, never zero.

/// A raw spreadsheet cell of unknown type.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
}

/// `#` = wage above the top-coded ceiling, `*`/`**` = not released.
const SUPPRESSED: &[&str] = &["#", "*", "**"];

impl Cell {
    /// Builds a cell from text, treating blank text as empty.
    pub fn from_text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    /// Text form of the cell. Integral numbers print without a fraction so
    /// numeric codes such as AREA_TYPE read back as `"4"`.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.clone(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
        }
    }
}

/// Converts a cell to a number. Empty cells, sentinels and anything that is
/// not a finite decimal yield `None`.
pub fn to_number(cell: &Cell) -> Option<f64> {
    let value = match cell {
        Cell::Empty => return None,
        Cell::Number(n) => *n,
        Cell::Text(s) => {
            let s = s.trim();
            if s.is_empty() || SUPPRESSED.contains(&s) {
                return None;
            }
            s.parse::<f64>().ok()?
        }
    };
    value.is_finite().then_some(value)
}

/// `to_number` rounded to the nearest integer, for head counts.
pub fn to_int(cell: &Cell) -> Option<i32> {
    let n = to_number(cell)?.round();
    (n >= i32::MIN as f64 && n <= i32::MAX as f64).then_some(n as i32)
}
