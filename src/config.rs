/// Configuration types for level decoding and encoding.
///
/// Every entry point has a plain form that uses [`CodecOptions::default()`]
/// and a `_with` form that takes explicit options.
///
/// # Examples
///
/// ```rust
/// use c2m::config::CodecOptions;
///
/// // Create with defaults
/// let options = CodecOptions::default();
///
/// // Or customize
/// let options = CodecOptions::new()
///     .with_max_tile_depth(16)
///     .with_reject_trailing_bytes(false);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// Maximum number of stacked layers in one map cell
    pub max_tile_depth: usize,
    /// Whether bytes after the `END ` chunk are an error
    pub reject_trailing_bytes: bool,
}

/// Default layer limit. Real levels stack at most a handful of layers.
pub const DEFAULT_MAX_TILE_DEPTH: usize = 64;

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            max_tile_depth: DEFAULT_MAX_TILE_DEPTH,
            reject_trailing_bytes: true,
        }
    }
}

impl CodecOptions {
    /// Create a new `CodecOptions` with default values.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the maximum number of layers a single cell may stack.
    ///
    /// Deeper cells are rejected with an invalid-format error during
    /// decoding, encoding and structured-form parsing.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use c2m::config::CodecOptions;
    ///
    /// let options = CodecOptions::new().with_max_tile_depth(8);
    /// assert_eq!(options.max_tile_depth, 8);
    /// ```
    #[inline]
    pub fn with_max_tile_depth(mut self, depth: usize) -> Self {
        self.max_tile_depth = depth;
        self
    }

    /// Set whether trailing bytes after the terminating chunk are rejected.
    ///
    /// When disabled they are ignored and a warning is logged.
    #[inline]
    pub fn with_reject_trailing_bytes(mut self, reject: bool) -> Self {
        self.reject_trailing_bytes = reject;
        self
    }
}

/// Structured text flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextFormat {
    /// Pretty-printed JSON with a trailing newline
    #[default]
    Json,
    /// YAML
    Yaml,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = CodecOptions::new();
        assert_eq!(options.max_tile_depth, DEFAULT_MAX_TILE_DEPTH);
        assert!(options.reject_trailing_bytes);
        assert_eq!(TextFormat::default(), TextFormat::Json);
    }

    #[test]
    fn test_builder() {
        let options = CodecOptions::new()
            .with_max_tile_depth(3)
            .with_reject_trailing_bytes(false);
        assert_eq!(
            options,
            CodecOptions {
                max_tile_depth: 3,
                reject_trailing_bytes: false,
            }
        );
    }
}
