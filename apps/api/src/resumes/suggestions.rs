use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::llm_client::prompts::{RESUME_ENHANCER_SYSTEM, RESUME_WRITER_SYSTEM};
use crate::llm_client::LlmClient;
use crate::resumes::prompts::{
    certification_prompt, education_prompt, skills_prompt, summary_prompt, work_experience_prompt,
};
use crate::state::AppState;

const SUGGESTION_MAX_TOKENS: u32 = 200;
const EXPERIENCE_MAX_TOKENS: u32 = 250;
const EDUCATION_MAX_TOKENS: u32 = 150;
const CERTIFICATION_MAX_TOKENS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionType {
    Summary,
    Skills,
}

#[derive(Debug, Deserialize)]
pub struct SuggestionRequest {
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Serialize)]
pub struct SuggestionResponse {
    pub suggestion: String,
}

/// POST /api/resumes/ai-suggestions
pub async fn handle_ai_suggestions(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<SuggestionRequest>,
) -> Result<Json<SuggestionResponse>, AppError> {
    let prompt = match req.kind {
        SuggestionType::Summary => summary_prompt(&req.data),
        SuggestionType::Skills => skills_prompt(&req.data),
    };
    info!("AI {:?} suggestion for user {}", req.kind, auth.id());

    let suggestion = state
        .llm
        .complete(RESUME_WRITER_SYSTEM, &prompt, SUGGESTION_MAX_TOKENS)
        .await
        .map_err(|e| {
            warn!("AI suggestion failed: {e}");
            AppError::Llm(e.to_string())
        })?;

    Ok(Json(SuggestionResponse { suggestion }))
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeContent {
    #[serde(default)]
    pub work_experience: Vec<Value>,
    #[serde(default)]
    pub education: Vec<Value>,
    #[serde(default)]
    pub certifications: Vec<Value>,
}

/// Returns a copy of `item` with `aiDescription` set. Non-object items are
/// wrapped as `{"value": item}` first.
fn with_description(item: Value, description: String) -> Value {
    let mut object = match item {
        Value::Object(map) => map,
        other => {
            let mut map = serde_json::Map::new();
            map.insert("value".into(), other);
            map
        }
    };
    object.insert("aiDescription".into(), Value::String(description));
    Value::Object(object)
}

async fn enhance_all(
    llm: &LlmClient,
    items: Vec<Value>,
    prompt: fn(&Value) -> String,
    max_tokens: u32,
) -> Result<Vec<Value>, AppError> {
    let mut enhanced = Vec::with_capacity(items.len());
    for item in items {
        let description = llm
            .complete(RESUME_ENHANCER_SYSTEM, &prompt(&item), max_tokens)
            .await
            .map_err(|e| {
                warn!("AI enhancement failed: {e}");
                AppError::Llm(e.to_string())
            })?;
        enhanced.push(with_description(item, description));
    }
    Ok(enhanced)
}

/// POST /api/resumes/enhance-content
/// Items are enhanced one at a time; the first failure fails the request.
pub async fn handle_enhance_content(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(content): Json<ResumeContent>,
) -> Result<Json<ResumeContent>, AppError> {
    info!(
        "AI enhance for user {}: {} experience, {} education, {} certifications",
        auth.id(),
        content.work_experience.len(),
        content.education.len(),
        content.certifications.len()
    );

    Ok(Json(ResumeContent {
        work_experience: enhance_all(
            &state.llm,
            content.work_experience,
            work_experience_prompt,
            EXPERIENCE_MAX_TOKENS,
        )
        .await?,
        education: enhance_all(
            &state.llm,
            content.education,
            education_prompt,
            EDUCATION_MAX_TOKENS,
        )
        .await?,
        certifications: enhance_all(
            &state.llm,
            content.certifications,
            certification_prompt,
            CERTIFICATION_MAX_TOKENS,
        )
        .await?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_suggestion_type_parsing() {
        let req: SuggestionRequest =
            serde_json::from_value(json!({"type": "skills", "data": {"skills": []}})).unwrap();
        assert_eq!(req.kind, SuggestionType::Skills);
        assert!(serde_json::from_value::<SuggestionRequest>(json!({"type": "cover"})).is_err());
    }

    #[test]
    fn test_description_keeps_original_fields() {
        let item = json!({"title": "Staff RN", "company": "Mercy"});
        let out = with_description(item, "• Led triage".into());
        assert_eq!(out["title"], "Staff RN");
        assert_eq!(out["aiDescription"], "• Led triage");
    }

    #[test]
    fn test_content_sections_default_to_empty() {
        let content: ResumeContent =
            serde_json::from_value(json!({"education": [{"degree": "BSN"}]})).unwrap();
        assert!(content.work_experience.is_empty());
        assert_eq!(content.education.len(), 1);
        let out = serde_json::to_value(&content).unwrap();
        assert!(out.get("workExperience").is_some());
    }
}
