use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::content::{CategoryRow, ProfessionRow};
use crate::seo::pages::{
    career_guide_page, jobs_page, salary_page, CareerGuidePage, JobsPage, PageLocation, SalaryPage,
};
use crate::state::AppState;

/// Query shape produced by the SEO rewrite.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub profession: Option<String>,
    pub location: Option<String>,
    pub city: Option<String>,
}

impl PageQuery {
    pub(crate) fn split(&self) -> Result<(&str, PageLocation), AppError> {
        let profession = self
            .profession
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("Profession required".into()))?;
        Ok((
            profession,
            PageLocation::from_params(self.location.as_deref(), self.city.as_deref()),
        ))
    }
}

/// GET /salary-page
pub async fn handle_salary_page(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<SalaryPage>, AppError> {
    let (profession, location) = params.split()?;
    Ok(Json(salary_page(&state.db, profession, &location).await?))
}

/// GET /jobs-page
pub async fn handle_jobs_page(
    State(state): State<AppState>,
    Query(params): Query<PageQuery>,
) -> Result<Json<JobsPage>, AppError> {
    let (profession, location) = params.split()?;
    Ok(Json(jobs_page(&state.db, profession, &location).await?))
}

/// GET /career-guide/:profession
pub async fn handle_career_guide(
    State(state): State<AppState>,
    Path(profession): Path<String>,
) -> Result<Json<CareerGuidePage>, AppError> {
    Ok(Json(career_guide_page(&state.db, &profession).await?))
}

/// GET /api/professions
pub async fn handle_list_professions(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProfessionRow>>, AppError> {
    let professions = sqlx::query_as("SELECT * FROM professions ORDER BY rank ASC, display_name ASC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(professions))
}

/// GET /api/categories
pub async fn handle_list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<CategoryRow>>, AppError> {
    let categories = sqlx::query_as("SELECT * FROM categories ORDER BY name ASC")
        .fetch_all(&state.db)
        .await?;
    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_profession_is_rejected() {
        let query = PageQuery {
            profession: Some("  ".into()),
            location: Some("ca".into()),
            city: None,
        };
        assert!(matches!(query.split(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_query_split() {
        let query = PageQuery {
            profession: Some("registered-nurses".into()),
            location: Some("ca".into()),
            city: Some("los-angeles".into()),
        };
        let (profession, location) = query.split().unwrap();
        assert_eq!(profession, "registered-nurses");
        assert_eq!(
            location,
            PageLocation::City {
                state: "CA".into(),
                city_slug: "los-angeles".into()
            }
        );
    }
}
