//! Data models for comment spans and parsed examples.
//!
//! Every line number stored here is 1-indexed and relative to the original
//! file, never to the comment region it was found in.

use serde::{Deserialize, Serialize};
use std::ops::Range;
use std::sync::Arc;

use crate::dialect::Dialect;

/// How a comment span was delimited in the host file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpanKind {
    /// One or more consecutive line comments (`// ...`, `# ...`).
    Line,
    /// A block comment (`/* ... */`, `"""..."""`).
    Block,
    /// The whole file, for hosts without comment syntax (Markdown, text).
    Document,
}

/// A contiguous region of comment text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CommentSpan {
    /// Comment text without delimiters or decoration. Line `i` of the text
    /// sits on file line `start_line + i`.
    pub text: String,
    pub start_line: u32,
    pub end_line: u32,
    pub kind: SpanKind,
    /// Byte range in the original file, delimiters included.
    pub byte_range: Range<usize>,
}

impl CommentSpan {
    /// Iterate over `(file_line, text)` pairs.
    pub fn lines(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.text
            .split('\n')
            .enumerate()
            .map(move |(i, line)| (self.start_line + i as u32, line))
    }

    /// Number of file lines the span covers.
    pub fn line_count(&self) -> u32 {
        self.end_line - self.start_line + 1
    }
}

/// One example found inside a comment: the code to run and the transcript
/// it is expected to print.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ExampleBlock {
    /// Dialect whose prompt introduced the example.
    pub dialect: Arc<Dialect>,
    /// Statements to feed the interpreter, prompts removed. Never empty.
    pub source_lines: Vec<String>,
    /// Expected output, block indentation removed. May be empty.
    pub expected_output_lines: Vec<String>,
    /// File line of the first source line.
    pub start_line: u32,
    /// File line of the last source or output line.
    pub end_line: u32,
    /// Whitespace in front of the start prompt.
    pub indent: String,
    /// Inline `litmus:` flags found in the source, in order.
    pub options: Vec<String>,
}

impl ExampleBlock {
    /// Name of the target language.
    pub fn language(&self) -> &str {
        &self.dialect.language
    }

    /// Source lines joined by newlines, ready to hand to an interpreter.
    pub fn source(&self) -> String {
        self.source_lines.join("\n")
    }

    /// Expected output joined by newlines.
    pub fn expected_output(&self) -> String {
        self.expected_output_lines.join("\n")
    }

    /// Whether the example is expected to print nothing.
    pub fn expects_silence(&self) -> bool {
        self.expected_output_lines.is_empty()
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Examples found in a single file.
#[derive(Clone, Debug, Default, Serialize)]
pub struct FileExamples {
    /// Path as given to the scanner (relative to the scan root for walks).
    pub path: String,

    /// Host language whose comment rules were applied.
    pub host: String,

    /// Examples in file order.
    pub examples: Vec<ExampleBlock>,
}

impl FileExamples {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

/// A file the scanner could not process.
#[derive(Clone, Debug, Serialize)]
pub struct ScanFailure {
    pub path: String,
    /// Error class, see [`ScanError::kind`](crate::ScanError::kind).
    pub kind: String,
    pub message: String,
}

/// Result of scanning a directory tree.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ScanSummary {
    /// Files that were scanned successfully, sorted by path. Files without
    /// examples are included.
    pub files: Vec<FileExamples>,

    /// Files that could not be scanned.
    pub failures: Vec<ScanFailure>,

    /// Number of files skipped by extension or size filters.
    pub skipped_count: usize,

    /// Time taken for the scan in milliseconds.
    pub duration_ms: f64,
}

impl ScanSummary {
    /// Total number of examples across all files.
    pub fn example_count(&self) -> usize {
        self.files.iter().map(FileExamples::len).sum()
    }

    /// Get the number of files scanned successfully.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Whether any file failed to scan.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
