//! Stage 3: pick the requested representation and download its bytes.
//!
//! ## Selection
//!
//! Tags are compared exactly. If the platform ever lists the same tag twice
//! the **first** entry is used and the rest are logged and ignored, so the
//! choice never depends on how many duplicates follow.
//!
//! ## Readiness
//!
//! The platform renders representations lazily. A representation whose
//! `status.state` is not `success` is still downloaded (there is no polling
//! here); the state is logged so a short or empty file can be explained.

use crate::api::{Representation, StorageClient};
use crate::error::ConvertError;
use crate::event::ConversionType;
use crate::pipeline::metadata::SourceFile;
use tracing::{debug, info, warn};

/// Bytes of the chosen representation, ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct ConvertedPayload {
    /// Name for the new file, see [`derive_file_name`].
    pub file_name: String,
    /// Folder of the original file.
    pub parent_id: String,
    pub content: Vec<u8>,
}

impl std::fmt::Debug for ConvertedPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConvertedPayload")
            .field("file_name", &self.file_name)
            .field("parent_id", &self.parent_id)
            .field("content", &format_args!("<{} bytes>", self.content.len()))
            .finish()
    }
}

/// Replace the last extension of `original` with the one mapped from
/// `conversion`.
///
/// * `report.docx` → `report.pdf`
/// * `archive.tar.gz` → `archive.tar.pdf` (only the last segment goes)
/// * `README` → `README.pdf` (no extension: append)
/// * `.env` → `.env.pdf` (a leading dot alone is not an extension)
pub fn derive_file_name(original: &str, conversion: ConversionType) -> String {
    let stem = match original.rfind('.') {
        Some(idx) if idx > 0 => &original[..idx],
        _ => original,
    };
    format!("{stem}{}", conversion.extension())
}

/// First representation tagged `conversion`.
pub fn select_representation(
    representations: &[Representation],
    conversion: ConversionType,
) -> Result<&Representation, ConvertError> {
    let mut matches = representations
        .iter()
        .filter(|r| r.representation == conversion.tag());

    let chosen = matches
        .next()
        .ok_or_else(|| ConvertError::RepresentationUnavailable {
            requested: conversion.tag().to_string(),
        })?;

    let ignored = matches.count();
    if ignored > 0 {
        warn!(
            "{} duplicate '{}' representation(s) listed; using the first",
            ignored, conversion
        );
    }

    Ok(chosen)
}

/// Resolve the representation for `source` and download it.
pub async fn fetch_representation(
    client: &dyn StorageClient,
    source: &SourceFile,
    conversion: ConversionType,
) -> Result<ConvertedPayload, ConvertError> {
    let rep = select_representation(&source.representations, conversion)?;
    let url = rep.download_url();

    if let Some(status) = rep.status.as_ref().filter(|s| s.state != "success") {
        warn!(
            "'{}' representation of '{}' is in state '{}'; downloading anyway",
            conversion, source.name, status.state
        );
    }

    let content = client
        .download(&url)
        .await
        .map_err(|e| ConvertError::DownloadFailed {
            url: url.clone(),
            reason: e.readable_message().to_string(),
        })?;

    let file_name = derive_file_name(&source.name, conversion);
    info!(
        "Downloaded '{}' representation ({} bytes) as '{}'",
        conversion,
        content.len(),
        file_name
    );
    debug!("Representation content URL: {}", url);

    Ok(ConvertedPayload {
        file_name,
        parent_id: source.parent_id.clone(),
        content,
    })
}
