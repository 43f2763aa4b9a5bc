//! Foundation types for vtdd.
//!
//! - [`Position`], [`LineIndex`] - Line/column conversion for byte offsets
//! - Domain constants (file extensions, keyword denylist, failure markers)
//!
//! This module has NO dependencies on other vtdd modules.

pub mod constants;
mod position;

pub use position::{LineIndex, Position};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
