//! File and directory scanning.
//!
//! Ties the comment extractor and the block parser to the filesystem:
//! decode a file, pull its comment spans, parse each one. Files are
//! independent, so multi-file scans fan out over rayon with no shared
//! state beyond the read-only host table and dialect registry.
//!
//! Directory walks use the `ignore` crate, so `.gitignore` files are
//! honored along with a project-level `.litmusignore`.

use ignore::WalkBuilder;
use rayon::prelude::*;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, warn};

use crate::comments::{self, HostLanguage, HostTable};
use crate::dialect::DialectRegistry;
use crate::error::{Result, ScanError, UnterminatedComment};
use crate::parser::parse_blocks;
use crate::types::{ExampleBlock, FileExamples, ScanFailure, ScanSummary};

/// Name of the project-specific ignore file.
pub const IGNORE_FILENAME: &str = ".litmusignore";

/// Find every example in already-decoded text.
///
/// Stops at the first unterminated block comment.
pub fn scan_source(
    text: &str,
    host: &HostLanguage,
    registry: &DialectRegistry,
) -> std::result::Result<Vec<ExampleBlock>, UnterminatedComment> {
    let mut examples = Vec::new();
    for span in comments::extract(text, host) {
        examples.extend(parse_blocks(&span?, registry));
    }
    Ok(examples)
}

/// Decode file content as UTF-8, dropping a leading byte order mark.
fn decode(path: &str, bytes: Vec<u8>) -> Result<String> {
    let text = String::from_utf8(bytes).map_err(|e| ScanError::Encoding {
        path: path.to_string(),
        offset: e.utf8_error().valid_up_to(),
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(stripped) => stripped.to_string(),
        None => text,
    })
}

/// Scan one file with the given host rules.
pub fn scan_file(
    path: &Path,
    host: &HostLanguage,
    registry: &DialectRegistry,
) -> Result<FileExamples> {
    scan_file_as(path, &path.to_string_lossy(), host, registry)
}

/// Scan one file, reporting it under `shown` (usually a root-relative path).
fn scan_file_as(
    path: &Path,
    shown: &str,
    host: &HostLanguage,
    registry: &DialectRegistry,
) -> Result<FileExamples> {
    let bytes = fs::read(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            ScanError::PathNotFound {
                path: shown.to_string(),
            }
        } else {
            ScanError::Io {
                path: shown.to_string(),
                source,
            }
        }
    })?;
    let text = decode(shown, bytes)?;

    let examples =
        scan_source(&text, host, registry).map_err(|source| ScanError::MalformedComment {
            path: shown.to_string(),
            source,
        })?;

    debug!(
        "Scanned {} as {}: {} examples",
        shown,
        host.name,
        examples.len()
    );

    Ok(FileExamples {
        path: shown.to_string(),
        host: host.name.clone(),
        examples,
    })
}

/// Scan one file, picking its host language from the extension.
///
/// Unknown extensions are scanned as plain documents.
pub fn scan_path(path: &Path, hosts: &HostTable, registry: &DialectRegistry) -> Result<FileExamples> {
    scan_file(path, hosts.for_path(path), registry)
}

/// Scan multiple files in parallel.
///
/// # Arguments
///
/// * `paths` - Files to scan
/// * `hosts` - Host language table used for detection
/// * `registry` - Dialects to look for
/// * `num_threads` - Optional number of threads (defaults to number of CPUs)
///
/// # Returns
///
/// One result per input path, in input order. A failing file never stops
/// the others.
pub fn scan_files_parallel(
    paths: &[PathBuf],
    hosts: &HostTable,
    registry: &DialectRegistry,
    num_threads: Option<usize>,
) -> Vec<Result<FileExamples>> {
    let scan_fn = |path: &PathBuf| scan_path(path, hosts, registry);
    with_pool(num_threads, || paths.par_iter().map(scan_fn).collect())
}

/// Run `op` on a dedicated pool when a thread count is given, otherwise on
/// the global rayon pool.
fn with_pool<T: Send>(num_threads: Option<usize>, op: impl FnOnce() -> T + Send) -> T {
    let pool = match num_threads {
        Some(n) if n > 0 => rayon::ThreadPoolBuilder::new().num_threads(n).build().ok(),
        _ => None,
    };
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Options for a directory walk.
#[derive(Clone, Debug, Default)]
pub struct ScanOptions {
    /// Only scan these extensions (without dot). `None` scans every file
    /// with a known host language.
    pub extensions: Option<Vec<String>>,
    /// Extra glob patterns to ignore, on top of `.gitignore` and
    /// `.litmusignore`.
    pub ignore_patterns: Vec<String>,
    pub follow_symlinks: bool,
    pub include_hidden: bool,
    /// Skip files larger than this many bytes.
    pub max_file_size: Option<u64>,
    /// Worker threads; `None` uses every CPU.
    pub num_threads: Option<usize>,
}

/// Walk a directory and scan every file with a known host language.
///
/// Files whose extension maps to no host, or that fail the extension and
/// size filters, are counted as skipped. Files that cannot be read or
/// parsed are reported in [`ScanSummary::failures`]; the walk continues.
/// A file path as `root` scans that single file.
pub fn scan_directory(
    root: &Path,
    options: &ScanOptions,
    hosts: &HostTable,
    registry: &DialectRegistry,
) -> Result<ScanSummary> {
    let start = Instant::now();

    if !root.exists() {
        return Err(ScanError::PathNotFound {
            path: root.to_string_lossy().to_string(),
        });
    }

    let ext_filter: Option<HashSet<String>> = options.extensions.as_ref().map(|exts| {
        exts.iter()
            .map(|e| e.trim_start_matches('.').to_lowercase())
            .collect()
    });

    let mut builder = WalkBuilder::new(root);
    builder
        .hidden(!options.include_hidden)
        .git_ignore(true)
        .require_git(false)
        .git_global(true)
        .git_exclude(true)
        .follow_links(options.follow_symlinks)
        .add_custom_ignore_filename(IGNORE_FILENAME);

    if !options.ignore_patterns.is_empty() {
        let mut override_builder = ignore::overrides::OverrideBuilder::new(root);
        for pattern in &options.ignore_patterns {
            // `!` turns an override glob into an exclusion
            if let Err(e) = override_builder.add(&format!("!{}", pattern)) {
                warn!("Invalid ignore pattern '{}': {}", pattern, e);
            }
        }
        match override_builder.build() {
            Ok(overrides) => {
                builder.overrides(overrides);
            }
            Err(e) => warn!("Ignoring custom ignore patterns: {}", e),
        }
    }

    let mut skipped = 0usize;
    let mut candidates: Vec<(PathBuf, String, &HostLanguage)> = Vec::new();

    for entry in builder.build() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Walk error under {}: {}", root.display(), e);
                continue;
            }
        };
        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }
        let path = entry.into_path();

        if let Some(filter) = &ext_filter {
            let ext = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase);
            if !ext.is_some_and(|e| filter.contains(&e)) {
                skipped += 1;
                continue;
            }
        }

        let Some(host) = hosts.detect(&path) else {
            skipped += 1;
            continue;
        };

        if let Some(limit) = options.max_file_size {
            if fs::metadata(&path).is_ok_and(|m| m.len() > limit) {
                debug!("Skipping {}: larger than {} bytes", path.display(), limit);
                skipped += 1;
                continue;
            }
        }

        let shown = match path.strip_prefix(root) {
            Ok(rel) if !rel.as_os_str().is_empty() => rel.to_string_lossy().to_string(),
            _ => path.to_string_lossy().to_string(),
        };
        candidates.push((path, shown, host));
    }

    let results: Vec<Result<FileExamples>> = with_pool(options.num_threads, || {
        candidates
            .par_iter()
            .map(|(path, shown, host)| scan_file_as(path, shown, host, registry))
            .collect()
    });

    let mut files = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(file) => files.push(file),
            Err(e) => {
                warn!("{}", e);
                failures.push(ScanFailure {
                    path: e.path().to_string(),
                    kind: e.kind().to_string(),
                    message: e.to_string(),
                });
            }
        }
    }
    files.sort_by(|a, b| a.path.cmp(&b.path));
    failures.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(ScanSummary {
        files,
        failures,
        skipped_count: skipped,
        duration_ms: start.elapsed().as_secs_f64() * 1000.0,
    })
}
