//! Stage 5: turn the upload response into the caller's result.

use crate::error::ConvertError;
use crate::outcome::ConvertedFile;
use crate::pipeline::upload::Uploaded;

/// First created entry of the upload, or
/// [`ConvertError::MalformedUpstreamResponse`] when there is none.
pub fn report(uploaded: Uploaded) -> Result<ConvertedFile, ConvertError> {
    let entry = uploaded
        .response
        .entries
        .into_iter()
        .next()
        .ok_or_else(|| ConvertError::MalformedUpstreamResponse {
            detail: "upload response contained no file entries".to_string(),
        })?;

    Ok(ConvertedFile {
        id: entry.id,
        name: entry.name,
        parent_id: uploaded.parent_id,
        size: uploaded.size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{UploadResponse, UploadedEntry};

    #[test]
    fn first_entry_wins() {
        let uploaded = Uploaded {
            response: UploadResponse {
                total_count: Some(1),
                entries: vec![UploadedEntry {
                    id: "999".into(),
                    name: "doc.pdf".into(),
                }],
            },
            parent_id: "P".into(),
            size: 42,
        };
        let file = report(uploaded).unwrap();
        assert_eq!(file.success_message(), "doc.pdf successfully converted");
        assert_eq!(file.size, 42);
    }

    #[test]
    fn empty_entries_is_malformed() {
        let uploaded = Uploaded {
            response: UploadResponse::default(),
            parent_id: "P".into(),
            size: 0,
        };
        let err = report(uploaded).unwrap_err();
        assert!(matches!(err, ConvertError::MalformedUpstreamResponse { .. }));
    }
}
