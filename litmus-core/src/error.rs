//! Error types for litmus-core.

use thiserror::Error;

/// Result type alias for scanning operations.
pub type Result<T> = std::result::Result<T, ScanError>;

/// A block comment that was opened but never closed.
///
/// Produced by the comment extractor, which does not know which file it is
/// reading; [`ScanError::MalformedComment`] attaches the path.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("`{opener}` opened at line {line} is never closed")]
pub struct UnterminatedComment {
    /// The block opener that was left dangling, e.g. `/*`.
    pub opener: String,
    /// Line (1-indexed) where the opener sits.
    pub line: u32,
}

/// File-level errors. Each one aborts the scan of a single file only.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Unterminated block comment.
    #[error("Malformed comment in {path}: {source}")]
    MalformedComment {
        /// File being scanned.
        path: String,
        #[source]
        source: UnterminatedComment,
    },

    /// File content is not valid UTF-8.
    #[error("Encoding error in {path}: invalid UTF-8 at byte {offset}")]
    Encoding {
        /// File being scanned.
        path: String,
        /// Byte offset of the first invalid sequence.
        offset: usize,
    },

    /// The file could not be read.
    #[error("IO error reading {path}: {source}")]
    Io {
        /// File being read.
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Scan root does not exist.
    #[error("Path does not exist: {path}")]
    PathNotFound {
        /// The missing path.
        path: String,
    },
}

impl ScanError {
    /// Short machine-friendly name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            ScanError::MalformedComment { .. } => "malformed-comment",
            ScanError::Encoding { .. } => "encoding",
            ScanError::Io { .. } => "io",
            ScanError::PathNotFound { .. } => "not-found",
        }
    }

    /// Path of the file the error refers to.
    pub fn path(&self) -> &str {
        match self {
            ScanError::MalformedComment { path, .. }
            | ScanError::Encoding { path, .. }
            | ScanError::Io { path, .. }
            | ScanError::PathNotFound { path } => path,
        }
    }
}

/// Errors raised while assembling a [`DialectRegistry`](crate::DialectRegistry).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// A prompt was the empty string.
    #[error("Dialect '{name}' has an empty {which} prompt")]
    EmptyPrompt {
        /// Dialect name.
        name: String,
        /// "start" or "continuation".
        which: &'static str,
    },

    /// A prompt contains whitespace, so it could never be matched as a token.
    #[error("Dialect '{name}' has whitespace in its {which} prompt: {prompt:?}")]
    PromptWhitespace {
        /// Dialect name.
        name: String,
        /// "start" or "continuation".
        which: &'static str,
        /// The offending prompt.
        prompt: String,
    },

    /// Two dialects with the same name.
    #[error("Dialect '{name}' is registered twice")]
    DuplicateName {
        /// Dialect name.
        name: String,
    },

    /// Two dialects with the same start prompt would be indistinguishable.
    #[error("Dialects '{first}' and '{second}' share the start prompt {prompt:?}")]
    DuplicatePrompt {
        /// Dialect registered first.
        first: String,
        /// Dialect registered second.
        second: String,
        /// The shared prompt.
        prompt: String,
    },

    /// A dialect was requested by name but is not registered.
    #[error("Unknown dialect: {name}")]
    UnknownDialect {
        /// Requested name.
        name: String,
    },
}
