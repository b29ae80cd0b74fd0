//! Wire types for the storage platform's JSON bodies.
//!
//! Only the fields the pipeline reads are modelled; everything else the
//! platform sends is ignored by serde.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of exchanging an authorization code.
#[derive(Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of `access_token` in seconds.
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl AccessToken {
    /// A bare bearer token, for callers that obtained it elsewhere.
    pub fn bearer(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_in: None,
            token_type: Some("bearer".to_string()),
        }
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// File metadata as requested with
/// `fields=id,name,parent,representations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub parent: Option<FolderRef>,
    #[serde(default)]
    pub representations: Option<RepresentationList>,
}

impl FileMetadata {
    /// Representation entries, empty when the platform listed none.
    pub fn representations(&self) -> &[Representation] {
        self.representations
            .as_ref()
            .map(|list| list.entries.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderRef {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationList {
    #[serde(default)]
    pub entries: Vec<Representation>,
}

/// One pre-rendered form of a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    /// Format tag, e.g. `pdf` or `extracted_text`.
    pub representation: String,
    pub links: RepresentationLinks,
    #[serde(default)]
    pub status: Option<RepresentationStatus>,
}

/// Placeholder the platform leaves at the end of content URL templates.
pub const ASSET_PATH_PLACEHOLDER: &str = "{+asset_path}";

impl Representation {
    /// The content URL as listed, possibly still a template.
    pub fn content_url(&self) -> &str {
        &self.links.content.url
    }

    /// The content URL with `{+asset_path}` expanded to the empty path,
    /// which addresses the single asset of a one-file representation.
    pub fn download_url(&self) -> String {
        self.content_url().replace(ASSET_PATH_PLACEHOLDER, "")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationLinks {
    pub content: ContentLink,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentLink {
    pub url: String,
}

/// Generation state: `success`, `viewable`, `pending` or `none`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepresentationStatus {
    pub state: String,
}

/// Body of a successful upload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub entries: Vec<UploadedEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedEntry {
    pub id: String,
    pub name: String,
}

/// The platform's JSON error body.
///
/// API calls answer with `type`/`status`/`code`/`message`; the OAuth token
/// endpoint answers with `error`/`error_description`. Both shapes decode
/// into this one struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

impl ApiErrorBody {
    /// The most human-readable message the body carries, if any.
    pub fn readable_message(&self) -> Option<&str> {
        self.error_description
            .as_deref()
            .or(self.message.as_deref())
            .or(self.error.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn file_metadata_decodes_representations() {
        let meta: FileMetadata = serde_json::from_value(json!({
            "type": "file",
            "id": "111",
            "name": "doc.docx",
            "parent": { "type": "folder", "id": "0", "name": "All Files" },
            "representations": {
                "entries": [
                    {
                        "representation": "pdf",
                        "properties": {},
                        "links": { "content": { "url": "https://dl.example/pdf" } },
                        "status": { "state": "success" }
                    }
                ]
            }
        }))
        .unwrap();
        assert_eq!(meta.parent.as_ref().unwrap().id, "0");
        assert_eq!(meta.representations().len(), 1);
        assert_eq!(meta.representations()[0].content_url(), "https://dl.example/pdf");
    }

    #[test]
    fn file_metadata_without_representations() {
        let meta: FileMetadata =
            serde_json::from_value(json!({ "id": "1", "name": "a.txt" })).unwrap();
        assert!(meta.representations().is_empty());
        assert!(meta.parent.is_none());
    }

    #[test]
    fn error_body_prefers_description() {
        let body: ApiErrorBody = serde_json::from_value(json!({
            "error": "invalid_grant",
            "error_description": "Auth code doesn't exist or is invalid for the client"
        }))
        .unwrap();
        assert_eq!(
            body.readable_message(),
            Some("Auth code doesn't exist or is invalid for the client")
        );

        let body: ApiErrorBody = serde_json::from_value(json!({
            "type": "error",
            "status": 409,
            "code": "item_name_in_use",
            "message": "Item with the same name already exists"
        }))
        .unwrap();
        assert_eq!(body.kind.as_deref(), Some("error"));
        assert_eq!(
            body.readable_message(),
            Some("Item with the same name already exists")
        );
    }

    #[test]
    fn download_url_expands_asset_path() {
        let rep: Representation = serde_json::from_value(json!({
            "representation": "pdf",
            "links": { "content": { "url": "https://dl.example/reps/pdf/content/{+asset_path}" } }
        }))
        .unwrap();
        assert_eq!(rep.download_url(), "https://dl.example/reps/pdf/content/");

        let plain: Representation = serde_json::from_value(json!({
            "representation": "pdf",
            "links": { "content": { "url": "https://dl.example/pdf" } }
        }))
        .unwrap();
        assert_eq!(plain.download_url(), "https://dl.example/pdf");
    }

    #[test]
    fn token_debug_redacts() {
        let token = AccessToken::bearer("tok-123");
        assert!(!format!("{token:?}").contains("tok-123"));
    }
}
