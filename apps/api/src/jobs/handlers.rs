use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::{clamp_limit, job_slug, like_pattern, validate_job_type};
use crate::models::job::{JobRow, SavedJobRow};
use crate::seo::pages::career_keyword;
use crate::seo::slugs::slugify;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct JobListQuery {
    pub profession: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub q: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/jobs
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<JobListQuery>,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let keyword = params
        .profession
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(career_keyword);
    let state_filter = params
        .state
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());
    let city_slug = params.city.as_deref().map(slugify).filter(|c| !c.is_empty());
    let pattern = params.q.as_deref().and_then(like_pattern);

    let jobs = sqlx::query_as(
        r#"
        SELECT * FROM jobs
        WHERE ($1::TEXT IS NULL OR career_keyword = $1)
          AND ($2::TEXT IS NULL OR UPPER(state) = $2)
          AND ($3::TEXT IS NULL OR city_slug = $3)
          AND ($4::TEXT IS NULL OR title ILIKE $4 OR description ILIKE $4)
        ORDER BY (source = 'internal') DESC, created_at DESC
        LIMIT $5
        "#,
    )
    .bind(keyword)
    .bind(state_filter)
    .bind(city_slug)
    .bind(pattern)
    .bind(clamp_limit(params.limit))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(jobs))
}

/// GET /api/jobs/:slug
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<JobRow>, AppError> {
    let job: Option<JobRow> = sqlx::query_as("SELECT * FROM jobs WHERE slug = $1")
        .bind(&slug)
        .fetch_optional(&state.db)
        .await?;
    job.map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job {slug} not found")))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateJobRequest {
    pub title: String,
    pub description: String,
    pub profession: Option<String>,
    pub category_id: Option<Uuid>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    #[serde(default)]
    pub is_remote: bool,
}

impl CreateJobRequest {
    fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("Title is required".into()));
        }
        if self.description.trim().is_empty() {
            return Err(AppError::Validation("Description is required".into()));
        }
        if let (Some(min), Some(max)) = (self.salary_min, self.salary_max) {
            if min > max {
                return Err(AppError::Validation(
                    "salaryMin must not exceed salaryMax".into(),
                ));
            }
        }
        Ok(())
    }
}

/// POST /api/employer/jobs
pub async fn handle_create_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateJobRequest>,
) -> Result<(StatusCode, Json<JobRow>), AppError> {
    let company_id = auth.require_employer()?;
    req.validate()?;

    let job_type = match req.job_type.as_deref() {
        Some(t) => validate_job_type(t)?,
        None => "FULL_TIME".to_string(),
    };
    let city = req.city.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let job_state = req
        .state
        .as_deref()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty());

    let job: JobRow = sqlx::query_as(
        r#"
        INSERT INTO jobs
            (slug, title, description, company_id, category_id, career_keyword,
             state, city, city_slug, salary_min, salary_max, job_type,
             experience_level, is_remote, source)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, 'internal')
        RETURNING *
        "#,
    )
    .bind(job_slug(&req.title))
    .bind(req.title.trim())
    .bind(req.description.trim())
    .bind(company_id)
    .bind(req.category_id)
    .bind(req.profession.as_deref().map(career_keyword))
    .bind(job_state)
    .bind(city)
    .bind(city.map(slugify))
    .bind(req.salary_min)
    .bind(req.salary_max)
    .bind(job_type)
    .bind(req.experience_level.as_deref())
    .bind(req.is_remote)
    .fetch_one(&state.db)
    .await?;

    info!("Company {company_id} posted job {}", job.slug);
    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/employer/jobs
pub async fn handle_list_employer_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<JobRow>>, AppError> {
    let company_id = auth.require_employer()?;
    let jobs = sqlx::query_as("SELECT * FROM jobs WHERE company_id = $1 ORDER BY created_at DESC")
        .bind(company_id)
        .fetch_all(&state.db)
        .await?;
    Ok(Json(jobs))
}

/// GET /api/saved-jobs
pub async fn handle_list_saved_jobs(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<SavedJobRow>>, AppError> {
    let saved = sqlx::query_as(
        r#"
        SELECT j.*, s.saved_at
        FROM saved_jobs s
        JOIN jobs j ON j.id = s.job_id
        WHERE s.user_id = $1
        ORDER BY s.saved_at DESC
        "#,
    )
    .bind(auth.id())
    .fetch_all(&state.db)
    .await?;
    Ok(Json(saved))
}

/// POST /api/saved-jobs/:job_id
/// Saving an already saved job is a no-op.
pub async fn handle_save_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
        .bind(job_id)
        .fetch_one(&state.db)
        .await?;
    if !exists {
        return Err(AppError::NotFound(format!("Job {job_id} not found")));
    }

    let result = sqlx::query(
        "INSERT INTO saved_jobs (user_id, job_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
    )
    .bind(auth.id())
    .bind(job_id)
    .execute(&state.db)
    .await?;

    Ok(if result.rows_affected() > 0 {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    })
}

/// DELETE /api/saved-jobs/:job_id
pub async fn handle_unsave_job(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(job_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    sqlx::query("DELETE FROM saved_jobs WHERE user_id = $1 AND job_id = $2")
        .bind(auth.id())
        .bind(job_id)
        .execute(&state.db)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
