use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfessionRow {
    pub id: Uuid,
    pub slug: String,
    pub display_name: String,
    pub bls_keywords: Vec<String>,
    pub tier: i32,
    pub rank: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CareerGuideRow {
    pub id: Uuid,
    pub profession_slug: String,
    pub profession_name: String,
    pub overview: String,
    pub key_stats: Value,
    pub steps: Value,
    pub licensing_overview: Option<String>,
    pub certifications: Value,
    pub technical_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CategoryRow {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}
