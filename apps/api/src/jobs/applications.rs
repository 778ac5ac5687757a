use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::jobs::{like_pattern, validate_status};
use crate::models::job::{ApplicationRow, EmployerApplicationRow};
use crate::state::AppState;
use crate::storage::{get_object, put_object, resume_key};

const ALREADY_APPLIED: &str = "Already applied to this job";

/// Resume file attached to an application.
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Parsed multipart application form.
#[derive(Debug, Default)]
pub struct ApplicationForm {
    pub job_id: Option<String>,
    pub phone: Option<String>,
    pub cover_letter: Option<String>,
    pub resume_id: Option<String>,
    pub resume: Option<UploadedFile>,
}

/// Validated application ready to persist.
#[derive(Debug)]
pub struct NewApplication {
    pub job_id: Uuid,
    pub phone: String,
    pub cover_letter: Option<String>,
    pub resume_id: Option<Uuid>,
    pub resume: Option<UploadedFile>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

impl ApplicationForm {
    pub fn validate(self) -> Result<NewApplication, AppError> {
        let (Some(job_id), Some(phone)) = (non_blank(self.job_id), non_blank(self.phone)) else {
            return Err(AppError::Validation("Missing required fields".into()));
        };
        let job_id = Uuid::parse_str(&job_id)
            .map_err(|_| AppError::Validation(format!("Invalid jobId '{job_id}'")))?;
        let resume_id = non_blank(self.resume_id)
            .map(|id| {
                Uuid::parse_str(&id)
                    .map_err(|_| AppError::Validation(format!("Invalid resumeId '{id}'")))
            })
            .transpose()?;

        Ok(NewApplication {
            job_id,
            phone,
            cover_letter: non_blank(self.cover_letter),
            resume_id,
            resume: self.resume.filter(|f| !f.data.is_empty()),
        })
    }
}

/// Request body cap for application submissions (form fields plus resume).
pub const MAX_APPLICATION_BYTES: usize = 10 * 1024 * 1024;

pub fn application_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(MAX_APPLICATION_BYTES)
}

fn insert_error(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Validation(ALREADY_APPLIED.into())
        }
        _ => AppError::Database(e),
    }
}

async fn read_form(mut multipart: Multipart) -> Result<ApplicationForm, AppError> {
    let bad_form = |e: axum::extract::multipart::MultipartError| {
        AppError::Validation(format!("Invalid form data: {e}"))
    };

    let mut form = ApplicationForm::default();
    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let filename = field.file_name().unwrap_or("resume").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field.bytes().await.map_err(bad_form)?;
                form.resume = Some(UploadedFile {
                    filename,
                    content_type,
                    data,
                });
            }
            "jobId" => form.job_id = Some(field.text().await.map_err(bad_form)?),
            "phone" => form.phone = Some(field.text().await.map_err(bad_form)?),
            "coverLetter" => form.cover_letter = Some(field.text().await.map_err(bad_form)?),
            "resumeId" => form.resume_id = Some(field.text().await.map_err(bad_form)?),
            _ => {}
        }
    }
    Ok(form)
}

/// POST /api/applications
pub async fn handle_submit_application(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApplicationRow>), AppError> {
    let app = read_form(multipart).await?.validate()?;
    let user_id = auth.id();

    let (job_exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM jobs WHERE id = $1)")
        .bind(app.job_id)
        .fetch_one(&state.db)
        .await?;
    if !job_exists {
        return Err(AppError::NotFound(format!("Job {} not found", app.job_id)));
    }

    let (applied,): (bool,) = sqlx::query_as(
        "SELECT EXISTS (SELECT 1 FROM applications WHERE job_id = $1 AND user_id = $2)",
    )
    .bind(app.job_id)
    .bind(user_id)
    .fetch_one(&state.db)
    .await?;
    if applied {
        return Err(AppError::Validation(ALREADY_APPLIED.into()));
    }

    if let Some(resume_id) = app.resume_id {
        let (owned,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM resumes WHERE id = $1 AND user_id = $2)",
        )
        .bind(resume_id)
        .bind(user_id)
        .fetch_one(&state.db)
        .await?;
        if !owned {
            return Err(AppError::NotFound(format!("Resume {resume_id} not found")));
        }
    }

    let key = app
        .resume
        .as_ref()
        .map(|file| resume_key(user_id, Utc::now().timestamp_millis(), &file.filename));

    // The row is written first so a duplicate never leaves an orphaned upload;
    // a failed upload drops the transaction.
    let mut tx = state.db.begin().await?;
    let application: ApplicationRow = sqlx::query_as(
        r#"
        INSERT INTO applications (job_id, user_id, resume_id, phone, cover_letter, resume_key)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(app.job_id)
    .bind(user_id)
    .bind(app.resume_id)
    .bind(&app.phone)
    .bind(&app.cover_letter)
    .bind(&key)
    .fetch_one(&mut *tx)
    .await
    .map_err(insert_error)?;

    if let (Some(file), Some(key)) = (&app.resume, &key) {
        put_object(
            &state.s3,
            &state.config.s3_bucket,
            key,
            file.data.clone(),
            &file.content_type,
        )
        .await?;
    }
    tx.commit().await?;

    info!("User {user_id} applied to job {}", app.job_id);
    Ok((StatusCode::CREATED, Json(application)))
}

#[derive(Debug, Default, Deserialize)]
pub struct EmployerApplicationQuery {
    pub status: Option<String>,
    pub job_id: Option<Uuid>,
    pub search: Option<String>,
}

/// GET /api/employer/applications
pub async fn handle_list_employer_applications(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<EmployerApplicationQuery>,
) -> Result<Json<Vec<EmployerApplicationRow>>, AppError> {
    let company_id = auth.require_employer()?;
    let status = params
        .status
        .as_deref()
        .filter(|s| !s.trim().is_empty() && !s.eq_ignore_ascii_case("all"))
        .map(validate_status)
        .transpose()?;
    let pattern = params.search.as_deref().and_then(like_pattern);

    let applications = sqlx::query_as(
        r#"
        SELECT a.id, a.job_id, j.title AS job_title, a.user_id,
               u.name AS candidate_name, u.email AS candidate_email,
               a.phone, a.cover_letter, (a.resume_key IS NOT NULL) AS has_resume_file,
               a.status, a.notes, a.applied_at
        FROM applications a
        JOIN jobs j ON j.id = a.job_id
        JOIN users u ON u.id = a.user_id
        WHERE j.company_id = $1
          AND ($2::TEXT IS NULL OR a.status = $2)
          AND ($3::UUID IS NULL OR a.job_id = $3)
          AND ($4::TEXT IS NULL OR u.name ILIKE $4 OR u.email ILIKE $4 OR j.title ILIKE $4)
        ORDER BY a.applied_at DESC
        "#,
    )
    .bind(company_id)
    .bind(status)
    .bind(params.job_id)
    .bind(pattern)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(applications))
}

/// Loads an application only if it belongs to one of the company's jobs.
async fn owned_application(
    state: &AppState,
    company_id: Uuid,
    id: Uuid,
) -> Result<ApplicationRow, AppError> {
    let application: Option<ApplicationRow> = sqlx::query_as(
        r#"
        SELECT a.* FROM applications a
        JOIN jobs j ON j.id = a.job_id
        WHERE a.id = $1 AND j.company_id = $2
        "#,
    )
    .bind(id)
    .bind(company_id)
    .fetch_optional(&state.db)
    .await?;
    application.ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))
}

#[derive(Debug, Deserialize)]
pub struct UpdateApplicationRequest {
    pub status: Option<String>,
    pub notes: Option<String>,
}

/// PATCH /api/employer/applications/:id
pub async fn handle_update_application(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateApplicationRequest>,
) -> Result<Json<ApplicationRow>, AppError> {
    let company_id = auth.require_employer()?;
    let current = owned_application(&state, company_id, id).await?;

    let status = match req.status.as_deref() {
        Some(s) => validate_status(s)?.to_string(),
        None => current.status,
    };
    let notes = req.notes.or(current.notes);

    let updated: ApplicationRow =
        sqlx::query_as("UPDATE applications SET status = $1, notes = $2 WHERE id = $3 RETURNING *")
            .bind(&status)
            .bind(&notes)
            .bind(id)
            .fetch_one(&state.db)
            .await?;

    info!("Application {id} moved to {status}");
    Ok(Json(updated))
}

/// GET /api/employer/applications/:id/resume
pub async fn handle_download_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let company_id = auth.require_employer()?;
    let application = owned_application(&state, company_id, id).await?;
    let key = application
        .resume_key
        .ok_or_else(|| AppError::NotFound(format!("Application {id} has no resume file")))?;

    let object = get_object(&state.s3, &state.config.s3_bucket, &key).await?;
    let filename = key.rsplit('/').next().unwrap_or("resume");
    let content_type = object
        .content_type
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        object.body,
    ))
}
