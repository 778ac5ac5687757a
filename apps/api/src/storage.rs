use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;

/// A stored object body with its content type.
pub struct StoredObject {
    pub body: Bytes,
    pub content_type: Option<String>,
}

/// Object key for an uploaded resume: `resumes/{user_id}/{millis}-{filename}`.
pub fn resume_key(user_id: Uuid, uploaded_at_millis: i64, filename: &str) -> String {
    format!(
        "resumes/{user_id}/{uploaded_at_millis}-{}",
        sanitize_filename(filename)
    )
}

/// Keeps the final path component and replaces characters outside
/// `[A-Za-z0-9._-]` with `_`.
fn sanitize_filename(filename: &str) -> String {
    let base = filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "resume".to_string()
    } else {
        cleaned
    }
}

pub async fn put_object(
    s3: &S3Client,
    bucket: &str,
    key: &str,
    body: Bytes,
    content_type: &str,
) -> Result<(), AppError> {
    s3.put_object()
        .bucket(bucket)
        .key(key)
        .body(ByteStream::from(body))
        .content_type(content_type)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 upload failed: {e}")))?;

    info!("Uploaded s3://{bucket}/{key}");
    Ok(())
}

pub async fn get_object(s3: &S3Client, bucket: &str, key: &str) -> Result<StoredObject, AppError> {
    let output = s3
        .get_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| AppError::Storage(format!("S3 download failed: {e}")))?;

    let content_type = output.content_type().map(String::from);
    let body = output
        .body
        .collect()
        .await
        .map_err(|e| AppError::Storage(format!("S3 body read failed: {e}")))?
        .into_bytes();

    Ok(StoredObject { body, content_type })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resume_key_layout() {
        let user = Uuid::nil();
        assert_eq!(
            resume_key(user, 1_700_000_000_000, "cv.pdf"),
            "resumes/00000000-0000-0000-0000-000000000000/1700000000000-cv.pdf"
        );
    }

    #[test]
    fn test_filename_is_sanitized() {
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("C:\\docs\\My Resume.pdf"), "My_Resume.pdf");
        assert_eq!(sanitize_filename(""), "resume");
    }
}
