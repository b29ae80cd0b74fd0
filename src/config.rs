//! Configuration for the conversion pipeline.
//!
//! Everything the pipeline needs from its hosting environment lives in
//! [`ConverterConfig`]: the OAuth application credentials and the platform
//! endpoints. The struct is read once when the pipeline is built and never
//! mutated afterwards, so one config can back any number of concurrent
//! invocations.
//!
//! Credentials normally come from `BOX_CLIENT_ID` / `BOX_CLIENT_SECRET`
//! (see [`ConverterConfig::from_env`]); endpoint overrides exist so tests
//! and staging setups can point the pipeline at a different host.

use crate::error::ConvertError;
use std::fmt;

/// Environment variable holding the OAuth client id.
pub const ENV_CLIENT_ID: &str = "BOX_CLIENT_ID";
/// Environment variable holding the OAuth client secret.
pub const ENV_CLIENT_SECRET: &str = "BOX_CLIENT_SECRET";
/// Optional override for [`ConverterConfig::api_base_url`].
pub const ENV_API_BASE_URL: &str = "BOX_API_BASE_URL";
/// Optional override for [`ConverterConfig::upload_base_url`].
pub const ENV_UPLOAD_BASE_URL: &str = "BOX_UPLOAD_BASE_URL";
/// Optional override for [`ConverterConfig::token_url`].
pub const ENV_TOKEN_URL: &str = "BOX_TOKEN_URL";

pub const DEFAULT_API_BASE_URL: &str = "https://api.box.com/2.0";
pub const DEFAULT_UPLOAD_BASE_URL: &str = "https://upload.box.com/api/2.0";
pub const DEFAULT_TOKEN_URL: &str = "https://api.box.com/oauth2/token";

/// Configuration for a [`crate::ConversionPipeline`].
///
/// Built via [`ConverterConfig::builder()`] or [`ConverterConfig::from_env()`].
///
/// # Example
/// ```rust
/// use repconvert::ConverterConfig;
///
/// let config = ConverterConfig::builder()
///     .client_id("my-client-id")
///     .client_secret("my-client-secret")
///     .build()
///     .unwrap();
/// assert_eq!(config.api_base_url, "https://api.box.com/2.0");
/// ```
#[derive(Clone)]
pub struct ConverterConfig {
    /// OAuth client id of the platform application.
    pub client_id: String,

    /// OAuth client secret of the platform application.
    pub client_secret: String,

    /// Base URL for the metadata API, without trailing slash.
    pub api_base_url: String,

    /// Base URL for the upload API, without trailing slash.
    pub upload_base_url: String,

    /// Full URL of the OAuth token endpoint.
    pub token_url: String,

    /// Per-request timeout in seconds. Default: none. Zero is rejected.
    ///
    /// The pipeline configures no timeout of its own unless asked to; the
    /// hosting environment's invocation deadline normally bounds it.
    pub request_timeout_secs: Option<u64>,

    /// `User-Agent` header sent on every platform call.
    pub user_agent: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            upload_base_url: DEFAULT_UPLOAD_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            request_timeout_secs: None,
            user_agent: concat!("repconvert/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for ConverterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConverterConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("upload_base_url", &self.upload_base_url)
            .field("token_url", &self.token_url)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl ConverterConfig {
    /// Create a new builder for `ConverterConfig`.
    pub fn builder() -> ConverterConfigBuilder {
        ConverterConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read credentials (and optional endpoint overrides) from the process
    /// environment.
    pub fn from_env() -> Result<Self, ConvertError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) but with an injectable lookup,
    /// so callers (and tests) are not tied to the real process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConvertError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = Self::builder();

        if let Some(id) = lookup(ENV_CLIENT_ID) {
            builder = builder.client_id(id);
        }
        if let Some(secret) = lookup(ENV_CLIENT_SECRET) {
            builder = builder.client_secret(secret);
        }
        if let Some(url) = lookup(ENV_API_BASE_URL).filter(|s| !s.is_empty()) {
            builder = builder.api_base_url(url);
        }
        if let Some(url) = lookup(ENV_UPLOAD_BASE_URL).filter(|s| !s.is_empty()) {
            builder = builder.upload_base_url(url);
        }
        if let Some(url) = lookup(ENV_TOKEN_URL).filter(|s| !s.is_empty()) {
            builder = builder.token_url(url);
        }

        builder.build()
    }
}

/// Builder for [`ConverterConfig`].
#[derive(Debug)]
pub struct ConverterConfigBuilder {
    config: ConverterConfig,
}

impl ConverterConfigBuilder {
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = id.into();
        self
    }

    pub fn client_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.client_secret = secret.into();
        self
    }

    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_base_url = trim_slash(url.into());
        self
    }

    pub fn upload_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.upload_base_url = trim_slash(url.into());
        self
    }

    pub fn token_url(mut self, url: impl Into<String>) -> Self {
        self.config.token_url = url.into();
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = Some(secs);
        self
    }

    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ConverterConfig, ConvertError> {
        let c = &self.config;
        if c.client_id.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(format!(
                "client id is empty (set {ENV_CLIENT_ID})"
            )));
        }
        if c.client_secret.trim().is_empty() {
            return Err(ConvertError::InvalidConfig(format!(
                "client secret is empty (set {ENV_CLIENT_SECRET})"
            )));
        }
        if c.request_timeout_secs == Some(0) {
            return Err(ConvertError::InvalidConfig(
                "request timeout must be at least 1 second".to_string(),
            ));
        }
        for (name, url) in [
            ("api base URL", &c.api_base_url),
            ("upload base URL", &c.upload_base_url),
            ("token URL", &c.token_url),
        ] {
            reqwest::Url::parse(url).map_err(|e| {
                ConvertError::InvalidConfig(format!("{name} '{url}' is not a valid URL: {e}"))
            })?;
        }
        Ok(self.config)
    }
}

fn trim_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn build_requires_credentials() {
        let err = ConverterConfig::builder().build().unwrap_err();
        assert!(err.to_string().contains(ENV_CLIENT_ID), "got: {err}");

        let err = ConverterConfig::builder()
            .client_id("id")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains(ENV_CLIENT_SECRET), "got: {err}");
    }

    #[test]
    fn build_rejects_bad_url() {
        let err = ConverterConfig::builder()
            .client_id("id")
            .client_secret("secret")
            .api_base_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)));
    }

    #[test]
    fn build_rejects_zero_timeout() {
        let err = ConverterConfig::builder()
            .client_id("id")
            .client_secret("secret")
            .request_timeout_secs(0)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConvertError::InvalidConfig(_)), "{err:?}");

        let config = ConverterConfig::builder()
            .client_id("id")
            .client_secret("secret")
            .request_timeout_secs(30)
            .build()
            .unwrap();
        assert_eq!(config.request_timeout_secs, Some(30));
    }

    #[test]
    fn base_urls_lose_trailing_slash() {
        let config = ConverterConfig::builder()
            .client_id("id")
            .client_secret("secret")
            .api_base_url("http://localhost:1234/")
            .upload_base_url("http://localhost:1234//")
            .build()
            .unwrap();
        assert_eq!(config.api_base_url, "http://localhost:1234");
        assert_eq!(config.upload_base_url, "http://localhost:1234");
    }

    #[test]
    fn from_lookup_reads_credentials_and_overrides() {
        let config = ConverterConfig::from_lookup(lookup_from(&[
            (ENV_CLIENT_ID, "id"),
            (ENV_CLIENT_SECRET, "secret"),
            (ENV_TOKEN_URL, "http://127.0.0.1:9/oauth2/token"),
            (ENV_API_BASE_URL, ""),
        ]))
        .unwrap();
        assert_eq!(config.client_id, "id");
        assert_eq!(config.token_url, "http://127.0.0.1:9/oauth2/token");
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.request_timeout_secs, None);
    }

    #[test]
    fn debug_redacts_secret() {
        let config = ConverterConfig::builder()
            .client_id("id")
            .client_secret("hunter2")
            .build()
            .unwrap();
        let dbg = format!("{config:?}");
        assert!(!dbg.contains("hunter2"));
        assert!(dbg.contains("<redacted>"));
    }
}
