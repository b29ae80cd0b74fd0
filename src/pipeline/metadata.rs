//! Stage 2: read the metadata of the file the integration was invoked on.

use crate::api::{ApiError, Representation, StorageClient, FILE_FIELDS};
use crate::error::ConvertError;
use tracing::info;

/// The subset of file metadata later stages depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub id: String,
    pub name: String,
    pub parent_id: String,
    pub representations: Vec<Representation>,
}

/// Fetch `file_id` with its representation list.
pub async fn fetch_metadata(
    client: &dyn StorageClient,
    file_id: &str,
) -> Result<SourceFile, ConvertError> {
    let meta = client
        .get_file(file_id, FILE_FIELDS)
        .await
        .map_err(|e| metadata_error(file_id, e))?;

    let parent_id = meta
        .parent
        .as_ref()
        .map(|p| p.id.clone())
        .ok_or_else(|| ConvertError::MalformedUpstreamResponse {
            detail: format!("file '{}' has no parent folder", meta.id),
        })?;

    info!(
        "File '{}' ({}) has {} representation(s)",
        meta.name,
        meta.id,
        meta.representations().len()
    );

    Ok(SourceFile {
        representations: meta.representations().to_vec(),
        id: meta.id,
        name: meta.name,
        parent_id,
    })
}

/// 400/403/404 mean the id is bad or invisible to this user; anything else
/// is a platform failure.
fn metadata_error(file_id: &str, e: ApiError) -> ConvertError {
    if e.malformed {
        return ConvertError::MalformedUpstreamResponse { detail: e.message };
    }
    match e.status {
        Some(400 | 403 | 404) => ConvertError::NotFound {
            file_id: file_id.to_string(),
            detail: e.readable_message().to_string(),
        },
        _ => ConvertError::Platform {
            operation: "fetch file metadata".to_string(),
            message: e.readable_message().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorBody;

    #[test]
    fn not_found_statuses() {
        for status in [400, 403, 404] {
            let err = metadata_error("111", ApiError::http(status, "HTTP", None));
            assert!(matches!(err, ConvertError::NotFound { .. }), "{status}: {err:?}");
        }
    }

    #[test]
    fn other_failures_are_platform_errors() {
        let body = ApiErrorBody {
            message: Some("Internal Server Error".into()),
            ..Default::default()
        };
        let err = metadata_error("111", ApiError::http(500, "HTTP 500", Some(body)));
        assert_eq!(
            err.to_string(),
            "Failed to fetch file metadata: Internal Server Error"
        );

        let err = metadata_error("111", ApiError::transport("connection refused"));
        assert!(matches!(err, ConvertError::Platform { .. }));
    }

    #[test]
    fn undecodable_body_is_malformed() {
        let err = metadata_error("111", ApiError::malformed(200, "Invalid file metadata: EOF"));
        assert!(
            matches!(err, ConvertError::MalformedUpstreamResponse { ref detail } if detail == "Invalid file metadata: EOF"),
            "{err:?}"
        );
    }
}
