pub mod health;

use axum::{
    extract::Request,
    routing::{get, patch, post},
    Router,
};
use tower::util::{MapRequest, MapRequestLayer};
use tower::Layer;

use crate::auth::handlers as auth;
use crate::jobs::{applications, handlers as jobs};
use crate::resumes::{handlers as resumes, suggestions};
use crate::seo::handlers as seo;
use crate::seo::rewrite::rewrite_request_uri;
use crate::state::AppState;

pub type RewriteFn = fn(Request) -> Request;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Page data (targets of the SEO rewrite)
        .route("/salary-page", get(seo::handle_salary_page))
        .route("/jobs-page", get(seo::handle_jobs_page))
        .route("/career-guide/:profession", get(seo::handle_career_guide))
        .route("/api/professions", get(seo::handle_list_professions))
        .route("/api/categories", get(seo::handle_list_categories))
        // Accounts
        .route("/api/register", post(auth::handle_register))
        .route("/api/register/employer", post(auth::handle_register_employer))
        .route("/api/auth/login", post(auth::handle_login))
        .route("/api/auth/logout", post(auth::handle_logout))
        .route("/api/auth/me", get(auth::handle_me))
        // Job board
        .route("/api/jobs", get(jobs::handle_list_jobs))
        .route("/api/jobs/:slug", get(jobs::handle_get_job))
        .route(
            "/api/employer/jobs",
            get(jobs::handle_list_employer_jobs).post(jobs::handle_create_job),
        )
        .route("/api/saved-jobs", get(jobs::handle_list_saved_jobs))
        .route(
            "/api/saved-jobs/:job_id",
            post(jobs::handle_save_job).delete(jobs::handle_unsave_job),
        )
        .route(
            "/api/applications",
            post(applications::handle_submit_application)
                .layer(applications::application_body_limit()),
        )
        .route(
            "/api/employer/applications",
            get(applications::handle_list_employer_applications),
        )
        .route(
            "/api/employer/applications/:id",
            patch(applications::handle_update_application),
        )
        .route(
            "/api/employer/applications/:id/resume",
            get(applications::handle_download_resume),
        )
        // Resume builder
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/ai-suggestions",
            post(suggestions::handle_ai_suggestions),
        )
        .route(
            "/api/resumes/enhance-content",
            post(suggestions::handle_enhance_content),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .patch(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .with_state(state)
}

/// Wraps a router so SEO paths are rewritten before routing.
pub fn with_seo_rewrite(router: Router) -> MapRequest<Router, RewriteFn> {
    MapRequestLayer::new(rewrite_request_uri as RewriteFn).layer(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Region};
    use axum::body::Body;
    use axum::http::StatusCode;
    use sqlx::postgres::PgPoolOptions;
    use std::time::Duration;
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm_client::LlmClient;

    /// State whose pool never connects; only routes that fail before
    /// touching the database are exercised.
    fn offline_state() -> AppState {
        let config = Config {
            database_url: "postgres://careers@localhost/careers".into(),
            s3_bucket: "resumes".into(),
            s3_endpoint: "http://localhost:9000".into(),
            s3_region: "us-east-1".into(),
            aws_access_key_id: "test".into(),
            aws_secret_access_key: "test".into(),
            openai_api_key: "test".into(),
            port: 8080,
            rust_log: "info".into(),
            session_ttl_days: 30,
        };
        let db = PgPoolOptions::new()
            .acquire_timeout(Duration::from_millis(200))
            .connect_lazy(&config.database_url)
            .unwrap();
        let s3 = aws_sdk_s3::Client::from_conf(
            aws_sdk_s3::Config::builder()
                .behavior_version(BehaviorVersion::latest())
                .region(Region::new("us-east-1"))
                .build(),
        );
        AppState {
            db,
            s3,
            llm: LlmClient::new(config.openai_api_key.clone()),
            config,
        }
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let app = with_seo_rewrite(build_router(offline_state()));
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        app.oneshot(req).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(status_of("GET", "/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_protected_routes_require_session() {
        assert_eq!(status_of("GET", "/api/resumes").await, StatusCode::UNAUTHORIZED);
        assert_eq!(status_of("GET", "/api/auth/me").await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of("GET", "/api/employer/applications").await,
            StatusCode::UNAUTHORIZED
        );
    }

    #[tokio::test]
    async fn test_page_routes_require_profession() {
        assert_eq!(status_of("GET", "/salary-page").await, StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of("GET", "/jobs-page?location=ca").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_unrewritten_paths_fall_through() {
        assert_eq!(status_of("GET", "/about").await, StatusCode::NOT_FOUND);
        assert_eq!(
            status_of("GET", "/Registered-Nurses-salary").await,
            StatusCode::NOT_FOUND
        );
    }
}
