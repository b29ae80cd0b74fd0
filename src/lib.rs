//! # repconvert
//!
//! Turn a file's pre-rendered representation into a new file next to it.
//!
//! The storage platform already renders most documents into alternate forms
//! (a PDF, the extracted plain text). This crate is the handler behind an
//! integration button: given the OAuth authorization code, the file id and
//! the wanted format, it fetches that representation and saves it as a
//! sibling file, e.g. `report.docx` → `report.pdf`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! event { code, fileId, conversionType }
//!  │
//!  ├─ 0. Validate   conversion type → extension (.pdf / .txt)
//!  ├─ 1. Auth       authorization code → token → transport handle
//!  ├─ 2. Metadata   id, name, parent folder, representation list
//!  ├─ 3. Fetch      pick representation, download its bytes
//!  ├─ 4. Upload     new file in the same folder
//!  └─ 5. Report     "<name> successfully converted"
//! ```
//!
//! Every failure becomes
//! `"An error occured while converting the file. <message>"`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use repconvert::{ConversionPipeline, InvocationRequest};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials from BOX_CLIENT_ID / BOX_CLIENT_SECRET
//!     let pipeline = ConversionPipeline::from_env()?;
//!     let request = InvocationRequest::new("auth-code", "111", "pdf");
//!     let (error, result) = pipeline.convert(&request).await.into_callback();
//!     println!("{error:?} {result:?}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `repconvert` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod api;
pub mod config;
pub mod convert;
pub mod error;
pub mod event;
pub mod outcome;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use api::{ApiError, BoxPlatform, StorageClient, StoragePlatform};
pub use config::{ConverterConfig, ConverterConfigBuilder};
pub use convert::ConversionPipeline;
pub use error::ConvertError;
pub use event::{ConversionType, InvocationRequest};
pub use outcome::{ConvertedFile, InvocationResult, FAILURE_PREFIX};
