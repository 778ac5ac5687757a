use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub profession_slug: Option<String>,
    pub template_id: String,
    pub custom_summary: Option<String>,
    pub custom_skills: Option<Value>,
    pub selected_exp: Option<Value>,
    pub selected_edu: Option<Value>,
    pub selected_certs: Option<Value>,
    pub is_primary: bool,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Only populated by queries that join the applications count.
    #[sqlx(default)]
    pub application_count: i64,
}
