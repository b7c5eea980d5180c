//! Unified error types for the c2m codec.
//!
//! This module provides a single error type shared by the pack, tile and
//! container codecs, presenting a consistent API to users.

// Submodule declarations
pub mod types;

// Re-exports
pub use types::{Error, ErrorKind, Result};
