use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct JobRow {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub company_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub career_keyword: Option<String>,
    pub state: Option<String>,
    pub city: Option<String>,
    pub city_slug: Option<String>,
    pub salary_min: Option<f64>,
    pub salary_max: Option<f64>,
    pub job_type: String,
    pub experience_level: Option<String>,
    pub is_remote: bool,
    pub source: String,
    pub external_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub user_id: Uuid,
    pub resume_id: Option<Uuid>,
    pub phone: String,
    pub cover_letter: Option<String>,
    pub resume_key: Option<String>,
    pub status: String,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Application as listed on the employer dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EmployerApplicationRow {
    pub id: Uuid,
    pub job_id: Uuid,
    pub job_title: String,
    pub user_id: Uuid,
    pub candidate_name: String,
    pub candidate_email: String,
    pub phone: String,
    pub cover_letter: Option<String>,
    pub has_resume_file: bool,
    pub status: String,
    pub notes: Option<String>,
    pub applied_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SavedJobRow {
    #[sqlx(flatten)]
    pub job: JobRow,
    pub saved_at: DateTime<Utc>,
}
