//! Stage 4: create the converted file next to the original.
//!
//! The platform's default create semantics apply unmodified: a name clash
//! is reported back as an error, never resolved by overwriting or
//! versioning.

use crate::api::{ApiError, StorageClient, UploadResponse};
use crate::error::ConvertError;
use crate::pipeline::representation::ConvertedPayload;
use tracing::info;

/// Upload response plus what the report stage needs from the payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Uploaded {
    pub response: UploadResponse,
    pub parent_id: String,
    pub size: usize,
}

/// Upload `payload` as a new file.
pub async fn upload(
    client: &dyn StorageClient,
    payload: ConvertedPayload,
) -> Result<Uploaded, ConvertError> {
    let ConvertedPayload {
        file_name,
        parent_id,
        content,
    } = payload;
    let size = content.len();

    let response = client
        .upload_file(&parent_id, &file_name, content)
        .await
        .map_err(upload_error)?;

    info!(
        "Uploaded '{}' ({} bytes) into folder {}",
        file_name, size, parent_id
    );

    Ok(Uploaded {
        response,
        parent_id,
        size,
    })
}

/// The body's `message`, period-terminated, when the platform sent one;
/// the generic failure text otherwise.
///
/// A success status with an undecodable body means the file may exist, so
/// that case is [`ConvertError::MalformedUpstreamResponse`] and not a
/// rejected upload.
pub fn upload_error(e: ApiError) -> ConvertError {
    if e.malformed {
        return ConvertError::MalformedUpstreamResponse { detail: e.message };
    }
    let message = match e.body_message().map(str::to_owned) {
        Some(m) if m.ends_with('.') => m,
        Some(m) => format!("{m}."),
        None => e.message,
    };
    ConvertError::Upload { message }
}
