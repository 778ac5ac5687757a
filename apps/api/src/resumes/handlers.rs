use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::models::resume::ResumeRow;
use crate::resumes::DEFAULT_TEMPLATE;
use crate::state::AppState;

const RESUME_WITH_COUNT: &str = r#"
    SELECT r.*,
           (SELECT COUNT(*) FROM applications a WHERE a.resume_id = r.id) AS application_count
    FROM resumes r
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateResumeRequest {
    pub name: String,
    pub profession_slug: Option<String>,
    pub template_id: Option<String>,
    pub custom_summary: Option<String>,
    pub custom_skills: Option<Value>,
    pub selected_exp: Option<Value>,
    pub selected_edu: Option<Value>,
    pub selected_certs: Option<Value>,
    #[serde(default)]
    pub is_primary: bool,
    #[serde(default)]
    pub is_public: bool,
}

/// Absent fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResumeRequest {
    pub name: Option<String>,
    pub profession_slug: Option<String>,
    pub template_id: Option<String>,
    pub custom_summary: Option<String>,
    pub custom_skills: Option<Value>,
    pub selected_exp: Option<Value>,
    pub selected_edu: Option<Value>,
    pub selected_certs: Option<Value>,
    pub is_primary: Option<bool>,
    pub is_public: Option<bool>,
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Resume name is required".into()));
    }
    Ok(())
}

/// Clears the primary flag on the user's other resumes.
async fn clear_primary(
    tx: &mut Transaction<'_, Postgres>,
    user_id: Uuid,
    except: Option<Uuid>,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE resumes SET is_primary = FALSE
        WHERE user_id = $1 AND is_primary AND ($2::UUID IS NULL OR id <> $2)
        "#,
    )
    .bind(user_id)
    .bind(except)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn fetch_owned(state: &AppState, user_id: Uuid, id: Uuid) -> Result<ResumeRow, AppError> {
    let resume: Option<ResumeRow> =
        sqlx::query_as(&format!("{RESUME_WITH_COUNT} WHERE r.id = $1 AND r.user_id = $2"))
            .bind(id)
            .bind(user_id)
            .fetch_optional(&state.db)
            .await?;
    resume.ok_or_else(|| AppError::NotFound("Resume not found".into()))
}

/// GET /api/resumes
/// Primary resume first, then most recently updated.
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<Vec<ResumeRow>>, AppError> {
    let resumes = sqlx::query_as(&format!(
        "{RESUME_WITH_COUNT} WHERE r.user_id = $1 ORDER BY r.is_primary DESC, r.updated_at DESC"
    ))
    .bind(auth.id())
    .fetch_all(&state.db)
    .await?;
    Ok(Json(resumes))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateResumeRequest>,
) -> Result<(StatusCode, Json<ResumeRow>), AppError> {
    validate_name(&req.name)?;
    let user_id = auth.id();

    let mut tx = state.db.begin().await?;
    if req.is_primary {
        clear_primary(&mut tx, user_id, None).await?;
    }

    let resume: ResumeRow = sqlx::query_as(
        r#"
        INSERT INTO resumes
            (user_id, name, profession_slug, template_id, custom_summary, custom_skills,
             selected_exp, selected_edu, selected_certs, is_primary, is_public)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(req.name.trim())
    .bind(&req.profession_slug)
    .bind(req.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE))
    .bind(&req.custom_summary)
    .bind(&req.custom_skills)
    .bind(&req.selected_exp)
    .bind(&req.selected_edu)
    .bind(&req.selected_certs)
    .bind(req.is_primary)
    .bind(req.is_public)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok((StatusCode::CREATED, Json(resume)))
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ResumeRow>, AppError> {
    Ok(Json(fetch_owned(&state, auth.id(), id).await?))
}

/// PATCH /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateResumeRequest>,
) -> Result<Json<ResumeRow>, AppError> {
    if let Some(name) = &req.name {
        validate_name(name)?;
    }
    let user_id = auth.id();
    fetch_owned(&state, user_id, id).await?;

    let mut tx = state.db.begin().await?;
    if req.is_primary == Some(true) {
        clear_primary(&mut tx, user_id, Some(id)).await?;
    }

    sqlx::query(
        r#"
        UPDATE resumes SET
            name            = COALESCE($1, name),
            profession_slug = COALESCE($2, profession_slug),
            template_id     = COALESCE($3, template_id),
            custom_summary  = COALESCE($4, custom_summary),
            custom_skills   = COALESCE($5, custom_skills),
            selected_exp    = COALESCE($6, selected_exp),
            selected_edu    = COALESCE($7, selected_edu),
            selected_certs  = COALESCE($8, selected_certs),
            is_primary      = COALESCE($9, is_primary),
            is_public       = COALESCE($10, is_public),
            updated_at      = NOW()
        WHERE id = $11 AND user_id = $12
        "#,
    )
    .bind(req.name.as_deref().map(str::trim))
    .bind(&req.profession_slug)
    .bind(&req.template_id)
    .bind(&req.custom_summary)
    .bind(&req.custom_skills)
    .bind(&req.selected_exp)
    .bind(&req.selected_edu)
    .bind(&req.selected_certs)
    .bind(req.is_primary)
    .bind(req.is_public)
    .bind(id)
    .bind(user_id)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(Json(fetch_owned(&state, user_id, id).await?))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let result = sqlx::query("DELETE FROM resumes WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(auth.id())
        .execute(&state.db)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Resume not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_request_defaults() {
        let req: CreateResumeRequest = serde_json::from_value(json!({
            "name": "ICU resume",
            "selectedExp": ["exp-1", "exp-2"]
        }))
        .unwrap();
        assert!(!req.is_primary);
        assert!(!req.is_public);
        assert!(req.template_id.is_none());
        assert_eq!(req.selected_exp, Some(json!(["exp-1", "exp-2"])));
    }

    #[test]
    fn test_update_request_is_partial() {
        let req: UpdateResumeRequest =
            serde_json::from_value(json!({ "isPrimary": true })).unwrap();
        assert_eq!(req.is_primary, Some(true));
        assert!(req.name.is_none());
        assert!(req.custom_skills.is_none());
    }

    #[test]
    fn test_blank_name_is_rejected() {
        assert!(validate_name("  ").is_err());
        assert!(validate_name("Travel nurse").is_ok());
    }
}
