//! Inbound event and the conversion types it may request.
//!
//! The platform's integration popup calls back with three query parameters
//! that the gateway forwards unchanged as a JSON object:
//!
//! ```json
//! { "code": "<oauth code>", "fileId": "111", "conversionType": "pdf" }
//! ```
//!
//! `conversionType` is kept as the raw string in [`InvocationRequest`] so an
//! unknown tag still decodes and can be reported with the caller's own
//! spelling; [`ConversionType::parse`] is where it becomes typed.

use crate::error::ConvertError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One inbound invocation.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationRequest {
    /// OAuth authorization code for the user who invoked the integration.
    pub code: String,
    /// Id of the file the integration was invoked on.
    pub file_id: String,
    /// Requested representation tag, e.g. `pdf`.
    pub conversion_type: String,
}

impl InvocationRequest {
    pub fn new(
        code: impl Into<String>,
        file_id: impl Into<String>,
        conversion_type: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            file_id: file_id.into(),
            conversion_type: conversion_type.into(),
        }
    }

    /// Decode a raw event payload.
    pub fn from_event(event: serde_json::Value) -> Result<Self, ConvertError> {
        serde_json::from_value(event).map_err(|e| ConvertError::InvalidEvent {
            reason: e.to_string(),
        })
    }
}

// The authorization code is a bearer credential until it is exchanged.
impl fmt::Debug for InvocationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InvocationRequest")
            .field("code", &"<redacted>")
            .field("file_id", &self.file_id)
            .field("conversion_type", &self.conversion_type)
            .finish()
    }
}

/// Representation formats the pipeline knows how to name.
///
/// Adding a variant means adding its tag and extension below; nothing else
/// in the pipeline branches on the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionType {
    /// Rendered PDF of the document.
    Pdf,
    /// Plain text extracted from the document.
    ExtractedText,
}

impl ConversionType {
    /// Every supported type, in tag order.
    pub const ALL: [ConversionType; 2] = [ConversionType::Pdf, ConversionType::ExtractedText];

    /// Parse a requested tag. Matching is exact: `"PDF"` is not `"pdf"`.
    pub fn parse(tag: &str) -> Result<Self, ConvertError> {
        Self::ALL
            .into_iter()
            .find(|t| t.tag() == tag)
            .ok_or_else(|| ConvertError::UnsupportedConversion {
                requested: tag.to_string(),
            })
    }

    /// The platform's representation tag.
    pub fn tag(self) -> &'static str {
        match self {
            ConversionType::Pdf => "pdf",
            ConversionType::ExtractedText => "extracted_text",
        }
    }

    /// File extension (with leading dot) for the converted file.
    pub fn extension(self) -> &'static str {
        match self {
            ConversionType::Pdf => ".pdf",
            ConversionType::ExtractedText => ".txt",
        }
    }

    /// Value for the `X-Rep-Hints` header asking the platform to list
    /// every supported representation.
    pub fn rep_hints() -> String {
        Self::ALL.iter().map(|t| format!("[{}]", t.tag())).collect()
    }
}

impl fmt::Display for ConversionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_known_tags() {
        assert_eq!(ConversionType::parse("pdf").unwrap(), ConversionType::Pdf);
        assert_eq!(
            ConversionType::parse("extracted_text").unwrap(),
            ConversionType::ExtractedText
        );
    }

    #[test]
    fn parse_unknown_tag_keeps_spelling() {
        match ConversionType::parse("csv") {
            Err(ConvertError::UnsupportedConversion { requested }) => assert_eq!(requested, "csv"),
            other => panic!("expected UnsupportedConversion, got {other:?}"),
        }
        assert!(ConversionType::parse("PDF").is_err());
    }

    #[test]
    fn extension_table() {
        assert_eq!(ConversionType::Pdf.extension(), ".pdf");
        assert_eq!(ConversionType::ExtractedText.extension(), ".txt");
    }

    #[test]
    fn rep_hints_lists_all_types() {
        assert_eq!(ConversionType::rep_hints(), "[pdf][extracted_text]");
    }

    #[test]
    fn request_from_camel_case_event() {
        let req = InvocationRequest::from_event(json!({
            "code": "abc",
            "fileId": "111",
            "conversionType": "pdf"
        }))
        .unwrap();
        assert_eq!(req, InvocationRequest::new("abc", "111", "pdf"));
    }

    #[test]
    fn request_missing_field_is_invalid_event() {
        let err = InvocationRequest::from_event(json!({ "code": "abc" })).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidEvent { .. }), "got: {err:?}");
    }

    #[test]
    fn request_debug_hides_code() {
        let req = InvocationRequest::new("very-secret-code", "111", "pdf");
        assert!(!format!("{req:?}").contains("very-secret-code"));
    }
}
