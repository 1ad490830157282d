//! DOT output errors.

/// Failure to write a DOT file.
#[derive(Debug, thiserror::Error)]
pub enum DotError {
    /// The output file could not be written.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// Target path.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },
}
