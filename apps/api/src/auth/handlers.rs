use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::{
    create_session, delete_session, hash_password, normalize_email, validate_credentials,
    verify_password, AuthUser,
};
use crate::errors::AppError;
use crate::models::user::{User, ROLE_CANDIDATE, ROLE_EMPLOYER};
use crate::seo::slugs::company_slug;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEmployerRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub company_name: String,
    pub company_website: Option<String>,
    pub company_description: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<Uuid>,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub user: User,
}

const DUPLICATE_EMAIL: &str = "User with this email already exists";

async fn ensure_email_free(state: &AppState, email: &str) -> Result<(), AppError> {
    let (taken,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM users WHERE email = $1)")
        .bind(email)
        .fetch_one(&state.db)
        .await?;
    if taken {
        return Err(AppError::Conflict(DUPLICATE_EMAIL.into()));
    }
    Ok(())
}

/// A unique violation on insert means another request registered the same
/// email between the check and the insert.
fn map_duplicate(e: sqlx::Error) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            AppError::Conflict(DUPLICATE_EMAIL.into())
        }
        _ => AppError::Database(e),
    }
}

/// POST /api/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let email = normalize_email(&req.email);
    validate_credentials(&email, &req.password, &req.name)?;
    ensure_email_free(&state, &email).await?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO users (email, name, password_hash, role) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&email)
    .bind(req.name.trim())
    .bind(hash_password(&req.password))
    .bind(ROLE_CANDIDATE)
    .fetch_one(&state.db)
    .await
    .map_err(map_duplicate)?;

    info!("Registered candidate {user_id}");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Account created successfully",
            user_id,
            company_id: None,
        }),
    ))
}

/// POST /api/register/employer
pub async fn handle_register_employer(
    State(state): State<AppState>,
    Json(req): Json<RegisterEmployerRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    let email = normalize_email(&req.email);
    validate_credentials(&email, &req.password, &req.name)?;
    let company_name = req.company_name.trim();
    if company_name.is_empty() {
        return Err(AppError::Validation("Company name is required".into()));
    }
    ensure_email_free(&state, &email).await?;

    let mut slug = company_slug(company_name);
    let (slug_taken,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM companies WHERE slug = $1)")
            .bind(&slug)
            .fetch_one(&state.db)
            .await?;
    if slug_taken || slug.is_empty() {
        let suffix = Uuid::new_v4().simple().to_string();
        slug = if slug.is_empty() {
            suffix[..8].to_string()
        } else {
            format!("{slug}-{}", &suffix[..6])
        };
    }

    let mut tx = state.db.begin().await?;

    let (company_id,): (Uuid,) = sqlx::query_as(
        "INSERT INTO companies (name, slug, website, description) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(company_name)
    .bind(&slug)
    .bind(req.company_website.as_deref().filter(|s| !s.trim().is_empty()))
    .bind(req.company_description.as_deref().filter(|s| !s.trim().is_empty()))
    .fetch_one(&mut *tx)
    .await?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (email, name, password_hash, role, company_id)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id
        "#,
    )
    .bind(&email)
    .bind(req.name.trim())
    .bind(hash_password(&req.password))
    .bind(ROLE_EMPLOYER)
    .bind(company_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(map_duplicate)?;

    tx.commit().await?;

    info!("Registered employer {user_id} for company {slug}");
    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "Employer account created successfully",
            user_id,
            company_id: Some(company_id),
        }),
    ))
}

/// POST /api/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = normalize_email(&req.email);
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&email)
        .fetch_optional(&state.db)
        .await?;

    let user = user
        .filter(|u| verify_password(&req.password, &u.password_hash))
        .ok_or(AppError::Unauthorized)?;

    let token = create_session(&state.db, user.id, state.config.session_ttl_days).await?;
    Ok(Json(LoginResponse { token, user }))
}

/// POST /api/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<StatusCode, AppError> {
    delete_session(&state.db, auth.token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/auth/me
pub async fn handle_me(auth: AuthUser) -> Json<User> {
    Json(auth.user)
}
