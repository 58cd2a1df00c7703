//! litmus core - find runnable examples inside source code comments.
//!
//! Source files in many languages carry usage examples in their comments:
//!
//! ```text
//! /*
//!  * > fmt.Println("hello!")
//!  * hello!
//!  */
//! ```
//!
//! This crate locates those examples and splits each one into the code to
//! run and the transcript it is expected to print. It never executes
//! anything; interpreters and output comparison live downstream.
//!
//! # Pipeline
//!
//! - [`comments`]: a lazy, restartable iterator over the comment regions of
//!   a file, driven by per-language [`HostLanguage`] rules
//! - [`parser`]: splits one comment region into [`ExampleBlock`]s using the
//!   prompts of a [`DialectRegistry`]
//! - [`scanner`]: file decoding, parallel multi-file scans and directory
//!   walks
//!
//! # Example
//!
//! ```
//! use litmus_core::{scan_source, DialectRegistry, HostTable};
//!
//! let hosts = HostTable::builtin();
//! let python = hosts.get("python").unwrap();
//! let source = "def three():\n    \"\"\"\n    >>> three()\n    3\n    \"\"\"\n    return 3\n";
//!
//! let examples = scan_source(source, python, &DialectRegistry::builtin()).unwrap();
//! assert_eq!(examples.len(), 1);
//! assert_eq!(examples[0].source_lines, vec!["three()"]);
//! assert_eq!(examples[0].expected_output_lines, vec!["3"]);
//! assert_eq!(examples[0].start_line, 3);
//! ```

pub mod comments;
pub mod dialect;
pub mod error;
pub mod parser;
pub mod scanner;
pub mod types;

pub use comments::{extract, CommentSpans, HostLanguage, HostTable};
pub use dialect::{builtin_dialects, Dialect, DialectRegistry, OutputBoundary};
pub use error::{RegistryError, Result, ScanError, UnterminatedComment};
pub use parser::parse_blocks;
pub use scanner::{
    scan_directory, scan_file, scan_files_parallel, scan_path, scan_source, ScanOptions,
};
pub use types::{CommentSpan, ExampleBlock, FileExamples, ScanFailure, ScanSummary, SpanKind};

/// Get the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
