//! Accounts, password hashing and bearer sessions.
//!
//! Handlers that need the caller take an [`AuthUser`] argument; nothing reads
//! the session from ambient state.

pub mod handlers;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{Duration, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::user::{User, ROLE_EMPLOYER};
use crate::state::AppState;

pub const MIN_PASSWORD_LEN: usize = 6;

/// Hashes a password as `salt$sha256(salt || password)`.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Checks the registration rules shared by candidates and employers.
pub fn validate_credentials(email: &str, password: &str, name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("Name is required".into()));
    }
    if !email.contains('@') {
        return Err(AppError::Validation("A valid email is required".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub async fn create_session(db: &PgPool, user_id: Uuid, ttl_days: i64) -> Result<Uuid, AppError> {
    let token = Uuid::new_v4();
    sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(user_id)
        .bind(Utc::now() + Duration::days(ttl_days))
        .execute(db)
        .await?;
    Ok(token)
}

pub async fn delete_session(db: &PgPool, token: Uuid) -> Result<(), AppError> {
    sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(db)
        .await?;
    Ok(())
}

/// Extracts the token from an `Authorization: Bearer <uuid>` header value.
pub fn bearer_token(header: &str) -> Option<Uuid> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Uuid::parse_str(token.trim()).ok()
}

/// The authenticated caller, resolved from a live session.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
    pub token: Uuid,
}

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.user.id
    }

    /// Company id of an employer account, 403 for anyone else.
    pub fn require_employer(&self) -> Result<Uuid, AppError> {
        match (self.user.role.as_str(), self.user.company_id) {
            (ROLE_EMPLOYER, Some(company_id)) => Ok(company_id),
            _ => Err(AppError::Forbidden),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or(AppError::Unauthorized)?;

        let user: Option<User> = sqlx::query_as(
            r#"
            SELECT u.* FROM users u
            JOIN sessions s ON s.user_id = u.id
            WHERE s.token = $1 AND s.expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&state.db)
        .await?;

        let user = user.ok_or(AppError::Unauthorized)?;
        Ok(AuthUser { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::ROLE_CANDIDATE;

    fn user(role: &str, company_id: Option<Uuid>) -> AuthUser {
        AuthUser {
            user: User {
                id: Uuid::new_v4(),
                email: "a@b.com".into(),
                name: "A".into(),
                password_hash: String::new(),
                role: role.into(),
                company_id,
                created_at: Utc::now(),
            },
            token: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_password_round_trip() {
        let stored = hash_password("hunter22");
        assert!(verify_password("hunter22", &stored));
        assert!(!verify_password("hunter23", &stored));
        assert!(!verify_password("hunter22", "not-a-hash"));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("secret1"), hash_password("secret1"));
    }

    #[test]
    fn test_credential_rules() {
        assert!(validate_credentials("nurse@example.com", "123456", "Pat").is_ok());
        assert!(validate_credentials("nurse.example.com", "123456", "Pat").is_err());
        assert!(validate_credentials("nurse@example.com", "12345", "Pat").is_err());
        assert!(validate_credentials("nurse@example.com", "123456", "  ").is_err());
    }

    #[test]
    fn test_bearer_token_parsing() {
        let token = Uuid::new_v4();
        assert_eq!(bearer_token(&format!("Bearer {token}")), Some(token));
        assert_eq!(bearer_token(&format!("bearer  {token}")), Some(token));
        assert_eq!(bearer_token(&format!("Basic {token}")), None);
        assert_eq!(bearer_token("Bearer nope"), None);
    }

    #[test]
    fn test_require_employer() {
        let company = Uuid::new_v4();
        assert_eq!(user(ROLE_EMPLOYER, Some(company)).require_employer().unwrap(), company);
        assert!(matches!(
            user(ROLE_CANDIDATE, None).require_employer(),
            Err(AppError::Forbidden)
        ));
        assert!(user(ROLE_EMPLOYER, None).require_employer().is_err());
    }
}
