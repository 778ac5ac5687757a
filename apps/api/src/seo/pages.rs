//! Data behind the salary, jobs and career-guide pages.

use serde::Serialize;
use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::content::CareerGuideRow;
use crate::models::job::JobRow;
use crate::models::salary::{IndustryEmploymentRow, LocatedSalaryRow, LocationRow, SalaryRow};
use crate::seo::slugs::{display_name, profession_urls, to_db_slug, to_url_slug, ProfessionUrls};

pub const MAX_PAGE_JOBS: i64 = 200;
const NATIONAL_LABEL: &str = "United States";

/// Which salary record a page asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageLocation {
    National,
    State { state: String },
    City { state: String, city_slug: String },
}

impl PageLocation {
    /// Builds from the `location` (state abbreviation) and `city` (slug) query
    /// parameters. A city without a state is treated as national.
    pub fn from_params(location: Option<&str>, city: Option<&str>) -> Self {
        let state = location
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_uppercase);
        let city = city.map(str::trim).filter(|c| !c.is_empty());
        match (state, city) {
            (Some(state), Some(city)) => PageLocation::City {
                state,
                city_slug: city.to_lowercase(),
            },
            (Some(state), None) => PageLocation::State { state },
            (None, _) => PageLocation::National,
        }
    }
}

/// Resolves a profession from either slug form to the stored keyword.
pub fn career_keyword(profession: &str) -> String {
    to_db_slug(profession.trim()).to_string()
}

/// `$164,100`, rounded to whole dollars.
pub fn format_currency(amount: f64) -> String {
    let whole = amount.round() as i64;
    let digits = whole.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if whole < 0 {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}

/// Sentence comparing a local median with the national median. Empty when
/// there is no national figure.
pub fn comparison_text(local_median: Option<f64>, national_median: Option<f64>) -> String {
    let Some(national) = national_median else {
        return String::new();
    };
    match local_median {
        Some(local) if local > national => {
            format!("Above the national average of {}.", format_currency(national))
        }
        _ => format!("Compared to the national average of {}.", format_currency(national)),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryPage {
    pub profession: String,
    pub career_keyword: String,
    pub title: String,
    pub location_name: String,
    pub location: Option<LocationRow>,
    pub salary: SalaryRow,
    pub comparison: String,
    /// State-level medians on the national page, city medians on a state page.
    pub breakdown: Vec<LocatedSalaryRow>,
    pub industries: Vec<IndustryEmploymentRow>,
    pub urls: ProfessionUrls,
}

async fn find_location(db: &PgPool, at: &PageLocation) -> Result<Option<LocationRow>, AppError> {
    let location: Option<LocationRow> = match at {
        PageLocation::National => None,
        PageLocation::State { state } => {
            sqlx::query_as("SELECT * FROM locations WHERE state = $1 AND city = ''")
                .bind(state)
                .fetch_optional(db)
                .await?
        }
        PageLocation::City { state, city_slug } => {
            sqlx::query_as("SELECT * FROM locations WHERE state = $1 AND slug = $2 AND city <> ''")
                .bind(state)
                .bind(city_slug)
                .fetch_optional(db)
                .await?
        }
    };
    Ok(location)
}

/// Most recent salary record for a keyword at a location (`None` = national).
pub async fn latest_salary(
    db: &PgPool,
    keyword: &str,
    location_id: Option<uuid::Uuid>,
) -> Result<Option<SalaryRow>, AppError> {
    let row = sqlx::query_as(
        r#"
        SELECT * FROM salary_data
        WHERE career_keyword = $1 AND location_id IS NOT DISTINCT FROM $2
        ORDER BY year DESC
        LIMIT 1
        "#,
    )
    .bind(keyword)
    .bind(location_id)
    .fetch_optional(db)
    .await?;
    Ok(row)
}

async fn breakdown(
    db: &PgPool,
    keyword: &str,
    year: i32,
    at: &PageLocation,
) -> Result<Vec<LocatedSalaryRow>, AppError> {
    let base = r#"
        SELECT l.city, l.state, l.state_name, l.slug,
               s.annual_median, s.hourly_median, s.employment_count
        FROM salary_data s
        JOIN locations l ON l.id = s.location_id
        WHERE s.career_keyword = $1 AND s.year = $2
    "#;
    let rows: Vec<LocatedSalaryRow> = match at {
        PageLocation::National => {
            sqlx::query_as(&format!(
                "{base} AND l.city = '' ORDER BY s.annual_median DESC NULLS LAST"
            ))
            .bind(keyword)
            .bind(year)
            .fetch_all(db)
            .await?
        }
        PageLocation::State { state } => {
            sqlx::query_as(&format!(
                "{base} AND l.state = $3 AND l.city <> '' ORDER BY s.annual_median DESC NULLS LAST"
            ))
            .bind(keyword)
            .bind(year)
            .bind(state)
            .fetch_all(db)
            .await?
        }
        PageLocation::City { .. } => Vec::new(),
    };
    Ok(rows)
}

pub async fn salary_page(
    db: &PgPool,
    profession: &str,
    at: &PageLocation,
) -> Result<SalaryPage, AppError> {
    let keyword = career_keyword(profession);
    let not_found = || AppError::NotFound(format!("No salary data for {profession}"));

    let location = find_location(db, at).await?;
    if at != &PageLocation::National && location.is_none() {
        return Err(not_found());
    }
    let location_id = location.as_ref().map(|l| l.id);

    let salary = latest_salary(db, &keyword, location_id)
        .await?
        .ok_or_else(not_found)?;

    let comparison = if location_id.is_some() {
        let national = latest_salary(db, &keyword, None).await?;
        comparison_text(salary.annual_median, national.and_then(|n| n.annual_median))
    } else {
        String::new()
    };

    let breakdown = breakdown(db, &keyword, salary.year, at).await?;
    let industries: Vec<IndustryEmploymentRow> = sqlx::query_as(
        r#"
        SELECT * FROM industry_employment
        WHERE career_keyword = $1 AND year = $2
        ORDER BY employment DESC NULLS LAST
        "#,
    )
    .bind(&keyword)
    .bind(salary.year)
    .fetch_all(db)
    .await?;

    let url_slug = to_url_slug(&keyword).to_string();
    Ok(SalaryPage {
        title: display_name(&keyword),
        location_name: location
            .as_ref()
            .map(LocationRow::display_name)
            .unwrap_or_else(|| NATIONAL_LABEL.to_string()),
        urls: profession_urls(&url_slug),
        profession: url_slug,
        career_keyword: keyword,
        location,
        salary,
        comparison,
        breakdown,
        industries,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobsPage {
    pub profession: String,
    pub career_keyword: String,
    pub title: String,
    pub total: usize,
    pub jobs: Vec<JobRow>,
}

pub async fn jobs_page(
    db: &PgPool,
    profession: &str,
    at: &PageLocation,
) -> Result<JobsPage, AppError> {
    let keyword = career_keyword(profession);
    let (state, city_slug) = match at {
        PageLocation::National => (None, None),
        PageLocation::State { state } => (Some(state.as_str()), None),
        PageLocation::City { state, city_slug } => (Some(state.as_str()), Some(city_slug.as_str())),
    };

    let jobs: Vec<JobRow> = sqlx::query_as(
        r#"
        SELECT * FROM jobs
        WHERE career_keyword = $1
          AND ($2::TEXT IS NULL OR UPPER(state) = $2)
          AND ($3::TEXT IS NULL OR city_slug = $3)
        ORDER BY (source = 'internal') DESC, created_at DESC
        LIMIT $4
        "#,
    )
    .bind(&keyword)
    .bind(state)
    .bind(city_slug)
    .bind(MAX_PAGE_JOBS)
    .fetch_all(db)
    .await?;

    Ok(JobsPage {
        profession: to_url_slug(&keyword).to_string(),
        title: display_name(&keyword),
        total: jobs.len(),
        career_keyword: keyword,
        jobs,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerGuidePage {
    pub guide: CareerGuideRow,
    pub national_salary: Option<SalaryRow>,
    pub job_count: i64,
    pub recent_jobs: Vec<JobRow>,
    pub urls: ProfessionUrls,
}

pub async fn career_guide_page(db: &PgPool, profession: &str) -> Result<CareerGuidePage, AppError> {
    let keyword = career_keyword(profession);

    let guide: CareerGuideRow =
        sqlx::query_as("SELECT * FROM career_guides WHERE profession_slug = $1 OR profession_slug = $2")
            .bind(&keyword)
            .bind(to_url_slug(&keyword))
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("No career guide for {profession}")))?;

    let national_salary = latest_salary(db, &keyword, None).await?;

    let (job_count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM jobs WHERE career_keyword = $1")
        .bind(&keyword)
        .fetch_one(db)
        .await?;

    let recent_jobs: Vec<JobRow> = sqlx::query_as(
        "SELECT * FROM jobs WHERE career_keyword = $1 ORDER BY created_at DESC LIMIT 3",
    )
    .bind(&keyword)
    .fetch_all(db)
    .await?;

    Ok(CareerGuidePage {
        guide,
        national_salary,
        job_count,
        recent_jobs,
        urls: profession_urls(to_url_slug(&keyword)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_location_from_params() {
        assert_eq!(PageLocation::from_params(None, None), PageLocation::National);
        assert_eq!(
            PageLocation::from_params(Some("ca"), None),
            PageLocation::State { state: "CA".into() }
        );
        assert_eq!(
            PageLocation::from_params(Some("ca"), Some("los-angeles")),
            PageLocation::City {
                state: "CA".into(),
                city_slug: "los-angeles".into()
            }
        );
        assert_eq!(
            PageLocation::from_params(Some(""), Some("los-angeles")),
            PageLocation::National
        );
    }

    #[test]
    fn test_either_slug_form_resolves_keyword() {
        assert_eq!(career_keyword("registered-nurse"), "registered-nurses");
        assert_eq!(career_keyword("registered-nurses"), "registered-nurses");
        assert_eq!(career_keyword("astronauts"), "astronauts");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(164_100.0), "$164,100");
        assert_eq!(format_currency(999.6), "$1,000");
        assert_eq!(format_currency(0.0), "$0");
        assert_eq!(format_currency(1_234_567.0), "$1,234,567");
    }

    #[test]
    fn test_comparison_text() {
        assert_eq!(
            comparison_text(Some(120_000.0), Some(86_070.0)),
            "Above the national average of $86,070."
        );
        assert_eq!(
            comparison_text(Some(70_000.0), Some(86_070.0)),
            "Compared to the national average of $86,070."
        );
        assert_eq!(
            comparison_text(None, Some(86_070.0)),
            "Compared to the national average of $86,070."
        );
        assert_eq!(comparison_text(Some(70_000.0), None), "");
    }
}
