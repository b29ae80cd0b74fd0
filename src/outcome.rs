//! What an invocation hands back to its caller.
//!
//! The calling frontend only ever sees a plain string: a success line naming
//! the new file, or a failure line with a fixed prefix. [`ConvertedFile`] is
//! the typed form of a success for library callers that want more than the
//! message.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};

/// Prefix of every failure message. The spelling is part of the frontend
/// contract and must not be corrected.
pub const FAILURE_PREFIX: &str = "An error occured while converting the file.";

/// The file created by a successful conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertedFile {
    /// Id the platform assigned to the uploaded file.
    pub id: String,
    /// Name of the uploaded file as the platform reports it.
    pub name: String,
    /// Folder the file was uploaded into.
    pub parent_id: String,
    /// Size of the uploaded payload in bytes.
    pub size: usize,
}

impl ConvertedFile {
    /// `"<name> successfully converted"`.
    pub fn success_message(&self) -> String {
        format!("{} successfully converted", self.name)
    }
}

/// Result of one invocation, in callback form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationResult {
    Success(String),
    Failure(String),
}

impl InvocationResult {
    /// Format a pipeline error for the caller.
    pub fn from_error(err: &ConvertError) -> Self {
        InvocationResult::Failure(format!("{FAILURE_PREFIX} {err}"))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, InvocationResult::Success(_))
    }

    /// The message regardless of outcome.
    pub fn message(&self) -> &str {
        match self {
            InvocationResult::Success(m) | InvocationResult::Failure(m) => m,
        }
    }

    /// Node-style `(error, result)` pair: exactly one side is `Some`.
    pub fn into_callback(self) -> (Option<String>, Option<String>) {
        match self {
            InvocationResult::Success(m) => (None, Some(m)),
            InvocationResult::Failure(m) => (Some(m), None),
        }
    }
}

impl From<Result<ConvertedFile, ConvertError>> for InvocationResult {
    fn from(result: Result<ConvertedFile, ConvertError>) -> Self {
        match result {
            Ok(file) => InvocationResult::Success(file.success_message()),
            Err(e) => InvocationResult::from_error(&e),
        }
    }
}

#[derive(Serialize)]
struct CallbackBody<'a> {
    error: Option<&'a str>,
    result: Option<&'a str>,
}

impl Serialize for InvocationResult {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            InvocationResult::Success(m) => CallbackBody {
                error: None,
                result: Some(m.as_str()),
            },
            InvocationResult::Failure(m) => CallbackBody {
                error: Some(m.as_str()),
                result: None,
            },
        };
        body.serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_message_format() {
        let file = ConvertedFile {
            id: "999".into(),
            name: "doc.pdf".into(),
            parent_id: "0".into(),
            size: 3,
        };
        assert_eq!(
            InvocationResult::from(Ok::<_, ConvertError>(file)),
            InvocationResult::Success("doc.pdf successfully converted".into())
        );
    }

    #[test]
    fn failure_message_keeps_prefix_spelling() {
        let err = ConvertError::RepresentationUnavailable {
            requested: "pdf".into(),
        };
        let result = InvocationResult::from_error(&err);
        assert_eq!(
            result.message(),
            "An error occured while converting the file. No pdf representation available for this file"
        );
        assert!(!result.is_success());
    }

    #[test]
    fn callback_pairs() {
        assert_eq!(
            InvocationResult::Success("ok".into()).into_callback(),
            (None, Some("ok".to_string()))
        );
        assert_eq!(
            InvocationResult::Failure("bad".into()).into_callback(),
            (Some("bad".to_string()), None)
        );
    }

    #[test]
    fn serialises_as_error_result_object() {
        let json = serde_json::to_value(InvocationResult::Failure("bad".into())).unwrap();
        assert_eq!(json, serde_json::json!({ "error": "bad", "result": null }));
    }
}
