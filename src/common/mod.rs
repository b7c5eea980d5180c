//! Common types and utilities shared across the codec layers.
//!
//! This module provides the unified error type, the bounds-checked byte
//! cursor, the Windows-1252 text codec used by level text chunks, and the
//! base64 serde adapters used by the structured form.

// Submodule declarations
pub mod binary;
pub mod blob;
pub mod codepage;
pub mod error;

// Re-exports for convenience
pub use binary::{ByteWriter, Cursor};
pub use error::{Error, ErrorKind, Result};
