//! Job board: listings, employer postings, saved jobs and applications.

pub mod applications;
pub mod handlers;

use uuid::Uuid;

use crate::errors::AppError;
use crate::seo::slugs::slugify;

pub const DEFAULT_LIST_LIMIT: i64 = 50;
pub const MAX_LIST_LIMIT: i64 = 200;

pub const JOB_TYPES: &[&str] = &["FULL_TIME", "PART_TIME", "CONTRACT", "PER_DIEM", "TEMPORARY"];

pub const APPLICATION_STATUSES: &[&str] = &["PENDING", "REVIEWED", "SHORTLISTED", "REJECTED", "HIRED"];

/// Unique job slug: slugified title plus a short random suffix.
pub fn job_slug(title: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    let base = slugify(title);
    if base.is_empty() {
        format!("job-{}", &suffix[..8])
    } else {
        format!("{base}-{}", &suffix[..8])
    }
}

pub fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

pub fn validate_job_type(job_type: &str) -> Result<String, AppError> {
    let normalized = job_type.trim().to_uppercase().replace(['-', ' '], "_");
    if JOB_TYPES.contains(&normalized.as_str()) {
        Ok(normalized)
    } else {
        Err(AppError::Validation(format!("Unknown job type '{job_type}'")))
    }
}

pub fn validate_status(status: &str) -> Result<&'static str, AppError> {
    APPLICATION_STATUSES
        .iter()
        .find(|s| s.eq_ignore_ascii_case(status.trim()))
        .copied()
        .ok_or_else(|| AppError::Validation(format!("Invalid status '{status}'")))
}

/// Wraps a free-text search term for `ILIKE`, escaping wildcards.
pub fn like_pattern(term: &str) -> Option<String> {
    let term = term.trim();
    if term.is_empty() {
        return None;
    }
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    Some(format!("%{escaped}%"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_slug_has_suffix() {
        let slug = job_slug("Travel RN - ICU (Nights)");
        assert!(slug.starts_with("travel-rn-icu-nights-"));
        assert_eq!(slug.len(), "travel-rn-icu-nights-".len() + 8);
        assert_ne!(job_slug("Same"), job_slug("Same"));
        assert!(job_slug("!!!").starts_with("job-"));
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_LIST_LIMIT);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(10_000)), MAX_LIST_LIMIT);
    }

    #[test]
    fn test_job_type_normalization() {
        assert_eq!(validate_job_type("full-time").unwrap(), "FULL_TIME");
        assert_eq!(validate_job_type("Per Diem").unwrap(), "PER_DIEM");
        assert!(validate_job_type("gig").is_err());
    }

    #[test]
    fn test_status_validation() {
        assert_eq!(validate_status("shortlisted").unwrap(), "SHORTLISTED");
        assert_eq!(validate_status(" HIRED ").unwrap(), "HIRED");
        assert!(matches!(validate_status("ARCHIVED"), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("icu").as_deref(), Some("%icu%"));
        assert_eq!(like_pattern("100%").as_deref(), Some("%100\\%%"));
        assert_eq!(like_pattern("  "), None);
    }
}
