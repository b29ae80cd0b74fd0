//! reqwest-backed implementation of the platform traits.
//!
//! One `reqwest::Client` is built per [`BoxPlatform`] and cloned into every
//! [`BoxClient`] it hands out; clones share the connection pool, so binding
//! a token is cheap.

use super::types::{AccessToken, ApiErrorBody, FileMetadata, UploadResponse};
use super::{ApiError, StorageClient, StoragePlatform};
use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::event::ConversionType;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Unauthenticated handle on the platform.
#[derive(Debug, Clone)]
pub struct BoxPlatform {
    http: reqwest::Client,
    config: ConverterConfig,
}

impl BoxPlatform {
    pub fn new(config: ConverterConfig) -> Result<Self, ConvertError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder
            .build()
            .map_err(|e| ConvertError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }
}

#[async_trait]
impl StoragePlatform for BoxPlatform {
    async fn exchange_code(&self, code: &str) -> Result<AccessToken, ApiError> {
        debug!("POST {}", self.config.token_url);
        let response = self
            .http
            .post(&self.config.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(transport_error)?;

        let response = error_for_status(response).await?;
        decode_json(response, "token response").await
    }

    fn connect(&self, token: &AccessToken) -> Box<dyn StorageClient> {
        Box::new(BoxClient {
            http: self.http.clone(),
            access_token: token.access_token.clone(),
            api_base_url: self.config.api_base_url.clone(),
            upload_base_url: self.config.upload_base_url.clone(),
        })
    }
}

/// Transport handle bound to one access token.
pub struct BoxClient {
    http: reqwest::Client,
    access_token: String,
    api_base_url: String,
    upload_base_url: String,
}

impl BoxClient {
    fn file_url(&self, file_id: &str) -> Result<Url, ApiError> {
        join_segments(&self.api_base_url, &["files", file_id])
    }
}

#[async_trait]
impl StorageClient for BoxClient {
    async fn get_file(&self, file_id: &str, fields: &str) -> Result<FileMetadata, ApiError> {
        let url = self.file_url(file_id)?;
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header("X-Rep-Hints", ConversionType::rep_hints())
            .query(&[("fields", fields)])
            .send()
            .await
            .map_err(transport_error)?;

        let response = error_for_status(response).await?;
        decode_json(response, "file metadata").await
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ApiError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(transport_error)?;

        let response = error_for_status(response).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        Ok(bytes.to_vec())
    }

    async fn upload_file(
        &self,
        parent_id: &str,
        name: &str,
        content: Vec<u8>,
    ) -> Result<UploadResponse, ApiError> {
        let url = join_segments(&self.upload_base_url, &["files", "content"])?;
        debug!("POST {} ({} bytes)", url, content.len());

        let attributes = serde_json::json!({
            "name": name,
            "parent": { "id": parent_id },
        })
        .to_string();
        let form = Form::new()
            .text("attributes", attributes)
            .part("file", Part::bytes(content).file_name(name.to_string()));

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        let response = error_for_status(response).await?;
        decode_json(response, "upload response").await
    }
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn transport_error(e: reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::transport(format!("Request timed out: {e}"))
    } else {
        ApiError::transport(e.to_string())
    }
}

/// Pass a success response through; turn anything else into an
/// [`ApiError`] carrying the decoded JSON error body when there is one.
async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            debug!("Could not read {} error body: {}", status, e);
            String::new()
        }
    };
    let body = serde_json::from_str::<ApiErrorBody>(&text).ok();
    Err(ApiError::http(status.as_u16(), format!("HTTP {status}"), body))
}

/// Read a success body and decode it as `T`.
///
/// A read failure is a transport error; a body that arrives but does not
/// decode is [`ApiError::malformed()`].
async fn decode_json<T: DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::malformed(status, format!("Invalid {what}: {e}")))
}

/// Append percent-encoded path segments to `base`.
fn join_segments(base: &str, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url =
        Url::parse(base).map_err(|e| ApiError::transport(format!("Bad base URL '{base}': {e}")))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::transport(format!("Base URL '{base}' cannot take a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_segments_keeps_base_path() {
        let url = join_segments("https://api.box.com/2.0", &["files", "111"]).unwrap();
        assert_eq!(url.as_str(), "https://api.box.com/2.0/files/111");
    }

    #[test]
    fn join_segments_encodes_ids() {
        let url = join_segments("http://localhost:9", &["files", "a/b c"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:9/files/a%2Fb%20c");
    }

    #[test]
    fn join_segments_rejects_non_base_url() {
        assert!(join_segments("mailto:someone@example.com", &["files"]).is_err());
    }

    fn platform_for(server: &mockito::ServerGuard) -> BoxPlatform {
        let config = ConverterConfig::builder()
            .client_id("id")
            .client_secret("secret")
            .api_base_url(server.url())
            .upload_base_url(server.url())
            .build()
            .unwrap();
        BoxPlatform::new(config).unwrap()
    }

    #[tokio::test]
    async fn connect_binds_token_and_base_url() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files/111")
            .match_query(mockito::Matcher::Any)
            .match_header("authorization", "Bearer tok")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"111","name":"a.docx","parent":{"id":"0"}}"#)
            .create_async()
            .await;

        let client = platform_for(&server).connect(&AccessToken::bearer("tok"));
        let meta = client.get_file("111", "id,name,parent").await.unwrap();

        assert_eq!(meta.name, "a.docx");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn undecodable_success_body_is_malformed() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/files/111")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = platform_for(&server).connect(&AccessToken::bearer("tok"));
        let err = client.get_file("111", "id").await.unwrap_err();

        assert!(err.malformed);
        assert_eq!(err.status, Some(200));
        assert!(err.message.starts_with("Invalid file metadata"), "got: {err}");
    }
}
