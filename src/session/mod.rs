//! # Session Log
//!
//! Human-readable status lines collected while the assistant runs.
//!
//! ## Persistence
//!
//! The log lives in memory until the user picks "Save Logs", which appends
//! every line to a fixed file under the system temp directory:
//!
//! ```text
//! /tmp/nirisetup.log
//! ```
//!
//! The file is opened in append+create mode, so saving twice duplicates the
//! content rather than replacing it.

mod store;

pub use store::{append_lines, SaveError, SessionLog, DEFAULT_LOG_FILE_NAME};
