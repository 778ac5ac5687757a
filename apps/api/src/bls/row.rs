use clap::ValueEnum;

use crate::bls::normalize::{to_int, to_number, Cell};

/// O_GROUP value for the finest occupation classification.
pub const DETAILED_GROUP: &str = "detailed";

/// NAICS code of the cross-industry aggregate.
pub const CROSS_INDUSTRY_NAICS: &str = "000000";

/// BLS AREA_TYPE codes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AreaType {
    National,
    State,
    Territory,
    Metro,
    Nonmetro,
    Other(String),
}

impl AreaType {
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            "1" => AreaType::National,
            "2" => AreaType::State,
            "3" => AreaType::Territory,
            "4" => AreaType::Metro,
            "6" => AreaType::Nonmetro,
            other => AreaType::Other(other.to_string()),
        }
    }
}

/// Granularity an import run covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum ImportScope {
    National,
    State,
    City,
}

impl ImportScope {
    pub fn for_area(area_type: &AreaType) -> Option<Self> {
        match area_type {
            AreaType::National => Some(ImportScope::National),
            AreaType::State => Some(ImportScope::State),
            AreaType::Metro => Some(ImportScope::City),
            _ => None,
        }
    }
}

/// One worksheet row, with wage columns left as raw cells until normalized.
#[derive(Debug, Clone)]
pub struct BlsRow {
    pub area_title: String,
    pub area_type: AreaType,
    pub prim_state: String,
    /// Absent when the workbook has no NAICS column.
    pub naics: Option<String>,
    pub occ_code: String,
    pub occ_title: String,
    pub o_group: String,
    pub tot_emp: Cell,
    pub jobs_1000: Cell,
    pub loc_quotient: Cell,
    pub h_mean: Cell,
    pub h_pct10: Cell,
    pub h_pct25: Cell,
    pub h_median: Cell,
    pub h_pct75: Cell,
    pub h_pct90: Cell,
    pub a_mean: Cell,
    pub a_pct10: Cell,
    pub a_pct25: Cell,
    pub a_median: Cell,
    pub a_pct75: Cell,
    pub a_pct90: Cell,
}

impl BlsRow {
    pub fn is_detailed(&self) -> bool {
        self.o_group.eq_ignore_ascii_case(DETAILED_GROUP)
    }

    /// Workbooks store NAICS as text (`000000`) or as a number (`0`). Files
    /// without a NAICS column are cross-industry; a blank cell is not.
    pub fn is_cross_industry(&self) -> bool {
        self.naics.as_deref().map_or(true, |n| {
            let n = n.trim();
            !n.is_empty() && n.chars().all(|c| c == '0')
        })
    }
}

/// Normalized wage and employment figures for one salary record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Wages {
    pub hourly_mean: Option<f64>,
    pub hourly_10th: Option<f64>,
    pub hourly_25th: Option<f64>,
    pub hourly_median: Option<f64>,
    pub hourly_75th: Option<f64>,
    pub hourly_90th: Option<f64>,
    pub annual_mean: Option<f64>,
    pub annual_10th: Option<f64>,
    pub annual_25th: Option<f64>,
    pub annual_median: Option<f64>,
    pub annual_75th: Option<f64>,
    pub annual_90th: Option<f64>,
    pub employment_count: Option<i32>,
    pub jobs_per_1000: Option<f64>,
    pub location_quotient: Option<f64>,
}

impl Wages {
    pub fn from_row(row: &BlsRow) -> Self {
        Wages {
            hourly_mean: to_number(&row.h_mean),
            hourly_10th: to_number(&row.h_pct10),
            hourly_25th: to_number(&row.h_pct25),
            hourly_median: to_number(&row.h_median),
            hourly_75th: to_number(&row.h_pct75),
            hourly_90th: to_number(&row.h_pct90),
            annual_mean: to_number(&row.a_mean),
            annual_10th: to_number(&row.a_pct10),
            annual_25th: to_number(&row.a_pct25),
            annual_median: to_number(&row.a_median),
            annual_75th: to_number(&row.a_pct75),
            annual_90th: to_number(&row.a_pct90),
            employment_count: to_int(&row.tot_emp),
            jobs_per_1000: to_number(&row.jobs_1000),
            location_quotient: to_number(&row.loc_quotient),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::metro_row;
    use super::*;

    #[test]
    fn test_area_type_codes() {
        assert_eq!(AreaType::from_code("1"), AreaType::National);
        assert_eq!(AreaType::from_code(" 4 "), AreaType::Metro);
        assert_eq!(AreaType::from_code("9"), AreaType::Other("9".into()));
        assert_eq!(ImportScope::for_area(&AreaType::Nonmetro), None);
    }

    #[test]
    fn test_wages_keep_suppressed_values_null() {
        let wages = Wages::from_row(&metro_row("San Francisco, CA"));
        assert_eq!(wages.annual_median, Some(164_100.0));
        assert_eq!(wages.annual_90th, None);
        assert_eq!(wages.hourly_90th, None);
        assert_eq!(wages.employment_count, Some(41_230));
    }

    #[test]
    fn test_industry_rows_are_not_cross_industry() {
        let mut row = metro_row("San Francisco, CA");
        assert!(row.is_cross_industry());
        row.naics = Some("622000".into());
        assert!(!row.is_cross_industry());
        row.naics = Some("0".into());
        assert!(row.is_cross_industry());
        row.naics = None;
        assert!(row.is_cross_industry());
    }

    #[test]
    fn test_blank_naics_cell_is_not_cross_industry() {
        let mut row = metro_row("San Francisco, CA");
        row.naics = Some(String::new());
        assert!(!row.is_cross_industry());
        row.naics = Some("  ".into());
        assert!(!row.is_cross_industry());
    }
}
