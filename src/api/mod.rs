//! The storage platform, seen from the pipeline.
//!
//! The pipeline never talks HTTP directly. It depends on two traits:
//!
//! * [`StoragePlatform`] is the unauthenticated side. It exchanges an
//!   authorization code, then binds a [`StorageClient`] to the token.
//! * [`StorageClient`] is the transport handle. Built once per invocation and
//!   only borrowed afterwards; it carries every capability later stages need
//!   (metadata, raw download, upload) so nothing is bolted on mid-pipeline.
//!
//! [`BoxPlatform`] is the reqwest-backed implementation. Tests substitute an
//! in-memory platform behind the same traits.

pub mod box_client;
pub mod types;

pub use box_client::{BoxClient, BoxPlatform};
pub use types::{
    AccessToken, ApiErrorBody, FileMetadata, FolderRef, Representation, UploadResponse,
    UploadedEntry,
};

use async_trait::async_trait;
use thiserror::Error;

/// Fields requested by the metadata stage.
pub const FILE_FIELDS: &str = "id,name,parent,representations";

/// A failed platform call.
///
/// `message` is always set (transport error text or HTTP status line);
/// `body` is present when the platform answered with a JSON error body.
/// `malformed` marks a success response whose body did not decode.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ApiError {
    pub status: Option<u16>,
    pub message: String,
    pub body: Option<ApiErrorBody>,
    pub malformed: bool,
}

impl ApiError {
    /// A failure with no HTTP response (connect error, timeout).
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
            body: None,
            malformed: false,
        }
    }

    /// A success response whose body is not the expected JSON.
    pub fn malformed(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            body: None,
            malformed: true,
        }
    }

    /// A non-success HTTP response.
    pub fn http(status: u16, message: impl Into<String>, body: Option<ApiErrorBody>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
            body,
            malformed: false,
        }
    }

    /// The platform's own message when it sent one, else [`Self::message`].
    pub fn readable_message(&self) -> &str {
        self.body
            .as_ref()
            .and_then(ApiErrorBody::readable_message)
            .unwrap_or(&self.message)
    }

    /// The `message` field of the JSON error body, and only that field.
    pub fn body_message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.message.as_deref())
            .filter(|m| !m.trim().is_empty())
    }
}

/// Unauthenticated entry point to the platform.
#[async_trait]
pub trait StoragePlatform: Send + Sync {
    /// Exchange a one-time authorization code for tokens.
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ApiError>;

    /// Build a transport handle bound to `token`.
    fn connect(&self, token: &AccessToken) -> Box<dyn StorageClient>;
}

/// Authenticated transport handle.
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Read file metadata restricted to `fields`.
    async fn get_file(&self, file_id: &str, fields: &str) -> Result<FileMetadata, ApiError>;

    /// Fetch an arbitrary authenticated URL and return the raw body.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError>;

    /// Upload `content` as a new file named `name` under `parent_id`.
    async fn upload_file(
        &self,
        parent_id: &str,
        name: &str,
        content: Vec<u8>,
    ) -> Result<UploadResponse, ApiError>;
}
