//! Error types for the repconvert library.
//!
//! Two layers of error reflect two layers of the system:
//!
//! * [`crate::api::ApiError`] (**transport**): a single remote call against the
//!   storage platform failed. It carries the HTTP status and, when the
//!   platform sent one, its JSON error body. It knows nothing about which
//!   pipeline stage issued the call.
//!
//! * [`ConvertError`] (**domain**): the conversion cannot proceed. Each
//!   pipeline stage maps the transport failures it sees into one of these
//!   variants, so the caller-facing message depends on *where* the pipeline
//!   stopped and not just on the HTTP status.
//!
//! The `Display` text of every [`ConvertError`] is what the calling web
//! frontend ends up showing, after the
//! [`crate::outcome::FAILURE_PREFIX`] is prepended.

use thiserror::Error;

/// All fatal errors returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum ConvertError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The inbound event could not be decoded into an invocation request.
    #[error("Invalid event: {reason}")]
    InvalidEvent { reason: String },

    /// The requested conversion type has no extension mapping.
    #[error("No handler for {requested} conversions")]
    UnsupportedConversion { requested: String },

    // ── Platform errors ───────────────────────────────────────────────────
    /// The authorization code was rejected (invalid, expired, already used).
    ///
    /// The platform's own message is surfaced verbatim.
    #[error("{message}")]
    Auth { message: String },

    /// The file does not exist or the user cannot see it.
    #[error("File '{file_id}' was not found or is not accessible: {detail}")]
    NotFound { file_id: String, detail: String },

    /// A platform call failed for a reason other than the ones above.
    #[error("Failed to {operation}: {message}")]
    Platform { operation: String, message: String },

    // ── Representation errors ─────────────────────────────────────────────
    /// The file has no representation of the requested type.
    #[error("No {requested} representation available for this file")]
    RepresentationUnavailable { requested: String },

    /// The representation exists but its content could not be fetched.
    #[error("Failed to download representation content from '{url}': {reason}")]
    DownloadFailed { url: String, reason: String },

    // ── Upload errors ─────────────────────────────────────────────────────
    /// The upload of the converted file was rejected.
    ///
    /// Holds the platform's message (period-terminated) when one was sent,
    /// otherwise the generic transport message.
    #[error("{message}")]
    Upload { message: String },

    /// The platform answered successfully but the body lacked a field the
    /// pipeline depends on.
    #[error("Malformed response from storage platform: {detail}")]
    MalformedUpstreamResponse { detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}
