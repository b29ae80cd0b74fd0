//! Pipeline stages for converting a file via its platform representation.
//!
//! Each submodule implements exactly one step and takes the typed output of
//! the previous one, so every stage can be exercised on its own against an
//! in-memory [`crate::api::StorageClient`].
//!
//! ## Data Flow
//!
//! ```text
//! code ──▶ authenticate ──▶ metadata ──▶ representation ──▶ upload ──▶ report
//!          (token, client)  (SourceFile)  (ConvertedPayload)  (Uploaded)  (ConvertedFile)
//! ```
//!
//! 1. [`authenticate`]  : exchange the authorization code and bind the
//!    transport handle every later stage borrows
//! 2. [`metadata`]      : read name, parent folder and representation list
//! 3. [`representation`]: pick the requested representation, derive the new
//!    file name, download the bytes
//! 4. [`upload`]        : create the new file next to the original
//! 5. [`report`]        : turn the upload response into a [`crate::ConvertedFile`]
//!
//! None of the stages retries. The first failure ends the invocation.

pub mod authenticate;
pub mod metadata;
pub mod report;
pub mod representation;
pub mod upload;
