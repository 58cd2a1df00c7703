//! Scan command - list the examples found in files and directories
//!
//! Directories are walked with the configured ignore rules; files named on
//! the command line are always scanned, even with an unknown extension.
//! Nothing is executed.

use crate::config::LitmusConfig;
use crate::output::{Alignment, Column, Output, OutputConfig, Outputter, TableOutput};
use anyhow::{Context, Result};
use colored::Colorize;
use litmus_core::{
    scan_directory, scan_files_parallel, DialectRegistry, ExampleBlock, HostTable, ScanFailure,
    ScanOptions, ScanSummary,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

/// Run the scan command.
///
/// Exits with failure when any file could not be scanned.
pub fn run(
    paths: &[String],
    dialects: &[String],
    jobs: Option<usize>,
    config: &LitmusConfig,
    output: OutputConfig,
) -> Result<ExitCode> {
    let registry = config
        .build_registry(dialects)
        .context("Invalid dialect selection")?;
    let hosts = HostTable::builtin();
    let options = config.scan_options(jobs);

    let summary = scan_paths(paths, &hosts, &registry, &options)?;
    tracing::debug!(
        "Found {} examples in {} files ({} failed)",
        summary.example_count(),
        summary.len(),
        summary.failures.len()
    );

    let failed = summary.has_failures();
    Output::new(summary, output).render()?;

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Scan every path and merge the results into one summary.
fn scan_paths(
    paths: &[String],
    hosts: &HostTable,
    registry: &DialectRegistry,
    options: &ScanOptions,
) -> Result<ScanSummary> {
    let start = Instant::now();
    let mut merged = ScanSummary::default();
    let mut files: Vec<PathBuf> = Vec::new();

    for root in paths {
        let root_path = Path::new(root);
        if !root_path.is_dir() {
            files.push(root_path.to_path_buf());
            continue;
        }

        let summary = scan_directory(root_path, options, hosts, registry)
            .with_context(|| format!("Failed to scan {}", root))?;
        merged.skipped_count += summary.skipped_count;
        merged.files.extend(summary.files.into_iter().map(|mut f| {
            f.path = under(root, &f.path);
            f
        }));
        merged.failures.extend(summary.failures.into_iter().map(|mut f| {
            f.path = under(root, &f.path);
            f
        }));
    }

    for result in scan_files_parallel(&files, hosts, registry, options.num_threads) {
        match result {
            Ok(file) => merged.files.push(file),
            Err(e) => merged.failures.push(ScanFailure {
                path: e.path().to_string(),
                kind: e.kind().to_string(),
                message: e.to_string(),
            }),
        }
    }

    merged.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
    Ok(merged)
}

/// Display path of `rel` found while walking `root`.
fn under(root: &str, rel: &str) -> String {
    if root == "." {
        rel.to_string()
    } else {
        Path::new(root).join(rel).to_string_lossy().to_string()
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

/// One table row per example.
#[derive(Serialize)]
struct ExampleRow<'a> {
    file: &'a str,
    lines: String,
    dialect: &'a str,
    source: &'a str,
    output_lines: usize,
}

impl<'a> ExampleRow<'a> {
    fn new(file: &'a str, example: &'a ExampleBlock) -> Self {
        let lines = if example.start_line == example.end_line {
            example.start_line.to_string()
        } else {
            format!("{}-{}", example.start_line, example.end_line)
        };
        Self {
            file,
            lines,
            dialect: &example.dialect.name,
            source: example.source_lines.first().map_or("", String::as_str),
            output_lines: example.expected_output_lines.len(),
        }
    }
}

impl Outputter for ScanSummary {
    fn to_table(&self, config: &OutputConfig) -> String {
        let rows: Vec<ExampleRow> = self
            .files
            .iter()
            .flat_map(|f| f.examples.iter().map(|e| ExampleRow::new(&f.path, e)))
            .collect();

        let columns = vec![
            Column::new("File", "file"),
            Column::new("Lines", "lines").with_alignment(Alignment::Right),
            Column::new("Dialect", "dialect"),
            Column::new("Source", "source").with_max_width(48),
            Column::new("Output", "output_lines").with_alignment(Alignment::Right),
        ];

        let mut out = TableOutput::format_with_columns(&rows, &columns, config);

        for failure in &self.failures {
            out.push_str(&format!(
                "\n{} {}",
                "ERROR:".red().bold(),
                failure.message
            ));
        }

        let mut totals = format!(
            "{} in {}",
            plural(self.example_count(), "example").green().bold(),
            plural(self.len(), "file")
        );
        if self.has_failures() {
            totals.push_str(&format!(", {} failed", self.failures.len().to_string().red()));
        }
        if self.skipped_count > 0 {
            totals.push_str(&format!(", {} skipped", self.skipped_count));
        }
        out.push_str(&format!(
            "\n\n{} {}",
            totals,
            format!("({:.1}ms)", self.duration_ms).dimmed()
        ));
        out
    }
}
