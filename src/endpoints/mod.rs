//! Request handlers.
//!
//! # Data Flow
//! ```text
//! GET  /testfile.bin → download.rs (shared zero payload, attachment headers)
//! HEAD /ping         → ping.rs (200, empty body)
//! POST /upload       → upload.rs (drain body, "Upload complete")
//! ```
//!
//! # Design Decisions
//! - Handlers are stateless apart from the read-only payload in `AppState`
//! - Uploads are counted, never buffered

pub mod download;
pub mod ping;
pub mod upload;

pub use download::{download, DOWNLOAD_PATH};
pub use ping::{ping, PING_PATH};
pub use upload::{upload, UploadError, UPLOAD_COMPLETE, UPLOAD_PATH};
