use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A canonical place keyed by (city, state). An empty city marks a
/// state-level record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub city: String,
    pub state: String,
    pub state_name: String,
    pub slug: String,
}

impl LocationRow {
    pub fn is_state_level(&self) -> bool {
        self.city.is_empty()
    }

    pub fn display_name(&self) -> String {
        if self.is_state_level() {
            self.state_name.clone()
        } else {
            format!("{}, {}", self.city, self.state)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SalaryRow {
    pub id: Uuid,
    pub career_keyword: String,
    pub location_id: Option<Uuid>,
    pub year: i32,
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
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// Salary row joined with its location, used for comparison tables.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocatedSalaryRow {
    pub city: String,
    pub state: String,
    pub state_name: String,
    pub slug: String,
    pub annual_median: Option<f64>,
    pub hourly_median: Option<f64>,
    pub employment_count: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct IndustryEmploymentRow {
    pub id: Uuid,
    pub career_keyword: String,
    pub industry: String,
    pub employment: Option<i32>,
    pub percent_of_total: Option<f64>,
    pub annual_mean: Option<f64>,
    pub year: i32,
}
