//! Domain model for flamescope
//!
//! This module contains core domain types and errors that provide:
//! - Compile-time safety via small value types instead of bare integers/strings
//! - Self-documenting function signatures
//! - Structured error handling

pub mod errors;
pub mod types;

// Re-export common types for convenience
pub use types::{FrameRef, SortBy, SortDirection, SpyName, ViewMode};

pub use errors::{DataError, ExportError, TuiError};
