//! Secure download-and-extract installer for the Infer static analyzer.
//!
//! # Architecture
//!
//! - `request.rs` - Immutable install request (URI, install root, layout)
//! - `download.rs` - Streaming HTTP download to a temp file
//! - `sanitize.rs` - Path sanitization (zip-slip prevention)
//! - `entry.rs` - Archive entry model
//! - `extract.rs` - Sequential tar.xz extraction
//! - `installer.rs` - Orchestration with guaranteed temp-dir cleanup

pub use entry::{Entry, EntryKind};
pub use error::{InstallError, Result};
pub use extract::{ExtractionReport, extract_tar_xz};
pub use installer::Installer;
pub use request::InstallRequest;
pub use sanitize::{SanitizedPath, sanitize_entry_path, sanitize_link_target};

mod download;
pub mod entry;
mod error;
pub mod extract;
mod installer;
mod request;
mod sanitize;
