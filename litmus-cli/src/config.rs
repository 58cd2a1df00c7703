//! Configuration loading from `.litmusrc.toml`.
//!
//! Configuration is optional: litmus uses the built-in dialects and scans
//! every known host language when no config file exists.
//!
//! # Example Configuration
//!
//! ```toml
//! [scanner]
//! ignore = ["vendor/", "third_party/"]
//! include_hidden = false
//! max_file_size_kb = 1024
//! follow_symlinks = false
//!
//! [dialects]
//! enabled = ["python", "go", "shell"]
//!
//! [[dialects.custom]]
//! name = "lua"
//! language = "lua"
//! start_prompt = "lua>"
//! continuation_prompt = ">>"
//! output_boundary = "next-prompt"
//! option_comment = "--"
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use litmus_core::{Dialect, DialectRegistry, RegistryError, ScanOptions};
use serde::Deserialize;
use std::path::Path;

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILENAME: &str = ".litmusrc.toml";

/// Root configuration structure loaded from `.litmusrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct LitmusConfig {
    /// File discovery settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Which dialects to look for.
    #[serde(default)]
    pub dialects: DialectsConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Scanner configuration controlling file discovery.
#[derive(Debug, Deserialize, Default)]
pub struct ScannerConfig {
    /// Additional glob patterns to ignore, combined with the built-in
    /// defaults and any `.gitignore` / `.litmusignore` rules.
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Whether to include hidden files (starting with `.`).
    #[serde(default)]
    pub include_hidden: bool,

    /// Files larger than this many kilobytes are skipped.
    #[serde(default)]
    pub max_file_size_kb: Option<u64>,

    #[serde(default)]
    pub follow_symlinks: bool,
}

/// Dialect selection.
#[derive(Debug, Deserialize, Default)]
pub struct DialectsConfig {
    /// Built-in dialects to keep. `None` keeps all of them.
    #[serde(default)]
    pub enabled: Option<Vec<String>>,

    /// Extra dialects, appended after the built-in ones.
    #[serde(default)]
    pub custom: Vec<Dialect>,
}

/// Output formatting preferences. Command-line flags override these.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Default output format: `table` or `json`.
    #[serde(default)]
    pub format: Option<String>,

    /// Whether to use colored output. Unset means auto-detect.
    #[serde(default)]
    pub color: Option<bool>,
}

/// Default ignore patterns that are always included.
const DEFAULT_IGNORE_PATTERNS: &[&str] = &[
    ".git/",
    "node_modules/",
    "__pycache__/",
    ".venv/",
    "venv/",
    "target/",
];

impl LitmusConfig {
    /// Load configuration from `.litmusrc.toml` in the given directory.
    ///
    /// A missing file yields defaults. A file that cannot be read or parsed
    /// is reported as a warning and also yields defaults.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILENAME);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILENAME, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILENAME, e);
                }
            }
        }
        Self::default()
    }

    /// Ignore patterns for the scanner. User patterns come first, followed
    /// by the defaults that are not already listed.
    pub fn ignore_patterns(&self) -> Vec<String> {
        let mut patterns = self.scanner.ignore.clone();
        for default in DEFAULT_IGNORE_PATTERNS {
            if !patterns.iter().any(|p| p == *default) {
                patterns.push(default.to_string());
            }
        }
        patterns
    }

    /// Maximum file size in bytes, if configured.
    pub fn max_file_size_bytes(&self) -> Option<u64> {
        self.scanner.max_file_size_kb.map(|kb| kb.saturating_mul(1024))
    }

    /// Walk options derived from the `[scanner]` section.
    pub fn scan_options(&self, num_threads: Option<usize>) -> ScanOptions {
        ScanOptions {
            extensions: None,
            ignore_patterns: self.ignore_patterns(),
            follow_symlinks: self.scanner.follow_symlinks,
            include_hidden: self.scanner.include_hidden,
            max_file_size: self.max_file_size_bytes(),
            num_threads,
        }
    }

    /// Build the dialect registry.
    ///
    /// `only` (from `--dialect`) wins over `[dialects].enabled`. Custom
    /// dialects are always added and may be selected by name too.
    pub fn build_registry(&self, only: &[String]) -> Result<DialectRegistry, RegistryError> {
        let all = DialectRegistry::builtin().extended(self.dialects.custom.iter().cloned())?;

        if !only.is_empty() {
            return all.only(only);
        }
        match &self.dialects.enabled {
            Some(enabled) => {
                let mut keep: Vec<String> = enabled.clone();
                keep.extend(self.dialects.custom.iter().map(|d| d.name.clone()));
                all.only(&keep)
            }
            None => Ok(all),
        }
    }

    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
