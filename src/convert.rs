//! The conversion entry points.
//!
//! [`ConversionPipeline`] runs the five stages in [`crate::pipeline`] one
//! after another for a single [`InvocationRequest`]. It keeps no state
//! between invocations: the only things it owns are the platform handle and
//! its configuration, both immutable, so one pipeline can be shared by any
//! number of concurrent invocations.
//!
//! Failures are never recovered locally. The first error from any stage
//! ends the invocation, is logged once here, and is formatted into the
//! caller's message by [`InvocationResult::from_error`].

use crate::api::{BoxPlatform, StoragePlatform};
use crate::config::ConverterConfig;
use crate::error::ConvertError;
use crate::event::{ConversionType, InvocationRequest};
use crate::outcome::{ConvertedFile, InvocationResult};
use crate::pipeline::{authenticate, metadata, report, representation, upload};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Runs one conversion per call against a storage platform.
#[derive(Clone)]
pub struct ConversionPipeline {
    platform: Arc<dyn StoragePlatform>,
}

impl std::fmt::Debug for ConversionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversionPipeline")
            .field("platform", &"<dyn StoragePlatform>")
            .finish()
    }
}

impl ConversionPipeline {
    /// Pipeline against the real platform.
    pub fn new(config: ConverterConfig) -> Result<Self, ConvertError> {
        Ok(Self::with_platform(Arc::new(BoxPlatform::new(config)?)))
    }

    /// Pipeline configured from `BOX_CLIENT_ID` / `BOX_CLIENT_SECRET`.
    pub fn from_env() -> Result<Self, ConvertError> {
        Self::new(ConverterConfig::from_env()?)
    }

    /// Pipeline against any platform implementation.
    pub fn with_platform(platform: Arc<dyn StoragePlatform>) -> Self {
        Self { platform }
    }

    /// Run one invocation and format its outcome for the caller.
    ///
    /// Never fails: every error becomes an [`InvocationResult::Failure`].
    pub async fn convert(&self, request: &InvocationRequest) -> InvocationResult {
        let result = self.try_convert(request).await;
        if let Err(ref e) = result {
            error!("Conversion of file {} failed: {}", request.file_id, e);
        }
        let outcome = InvocationResult::from(result);
        info!("{}", outcome.message());
        outcome
    }

    /// Decode a raw event and run it.
    ///
    /// A malformed event is reported the same way as a failed conversion.
    pub async fn handle_event(&self, event: serde_json::Value) -> InvocationResult {
        match InvocationRequest::from_event(event) {
            Ok(request) => self.convert(&request).await,
            Err(e) => {
                error!("Rejected event: {}", e);
                InvocationResult::from_error(&e)
            }
        }
    }

    /// The typed pipeline behind [`convert`](Self::convert).
    ///
    /// Calls are strictly sequential; each stage consumes the previous
    /// stage's output and no two platform calls are ever in flight together.
    ///
    /// # Errors
    /// - [`ConvertError::UnsupportedConversion`] before any network call
    /// - [`ConvertError::Auth`] when the code exchange fails
    /// - [`ConvertError::NotFound`] / [`ConvertError::Platform`] from the
    ///   metadata read
    /// - [`ConvertError::RepresentationUnavailable`] /
    ///   [`ConvertError::DownloadFailed`] from the representation stage
    /// - [`ConvertError::Upload`] from the upload
    /// - [`ConvertError::MalformedUpstreamResponse`] when a response lacks a
    ///   required field
    pub async fn try_convert(
        &self,
        request: &InvocationRequest,
    ) -> Result<ConvertedFile, ConvertError> {
        let start = Instant::now();
        info!(
            "Converting file {} to {}",
            request.file_id, request.conversion_type
        );

        // ── Step 0: Validate conversion type ────────────────────────────────
        let conversion = ConversionType::parse(&request.conversion_type)?;

        // ── Step 1: Authenticate ────────────────────────────────────────────
        let client = authenticate::authenticate(self.platform.as_ref(), &request.code).await?;

        // ── Step 2: Fetch metadata ──────────────────────────────────────────
        let source = metadata::fetch_metadata(client.as_ref(), &request.file_id).await?;

        // ── Step 3: Resolve & download representation ──────────────────────
        let payload =
            representation::fetch_representation(client.as_ref(), &source, conversion).await?;

        // ── Step 4: Upload ──────────────────────────────────────────────────
        let uploaded = upload::upload(client.as_ref(), payload).await?;

        // ── Step 5: Report ──────────────────────────────────────────────────
        let file = report::report(uploaded)?;

        info!(
            "Converted '{}' → '{}' in {}ms",
            source.name,
            file.name,
            start.elapsed().as_millis()
        );
        Ok(file)
    }

    /// Synchronous wrapper around [`convert`](Self::convert).
    ///
    /// Creates a temporary current-thread tokio runtime. Must not be called
    /// from inside an async context.
    pub fn convert_blocking(&self, request: &InvocationRequest) -> InvocationResult {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(self.convert(request)),
            Err(e) => {
                let e = ConvertError::Internal(format!("Failed to create tokio runtime: {e}"));
                error!("{}", e);
                InvocationResult::from_error(&e)
            }
        }
    }
}
