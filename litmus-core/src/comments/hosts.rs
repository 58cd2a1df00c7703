//! Built-in host languages and detection by file extension.

use std::path::Path;

use super::HostLanguage;

/// C-style comments. Only `/* */` blocks are searched; `//` lines are skipped.
fn c_family(name: &str, extensions: &[&str]) -> HostLanguage {
    HostLanguage::new(name)
        .with_extensions(extensions)
        .with_ignored_line_comment("//")
        .with_block_comment("/*", "*/")
        .with_string('"', false, true)
        .with_string('\'', false, true)
        .with_decoration('*')
}

/// `#` line comments with shell-like quoting.
fn hash_family(name: &str, extensions: &[&str]) -> HostLanguage {
    HostLanguage::new(name)
        .with_extensions(extensions)
        .with_line_comment("#")
        .with_string('"', true, true)
        .with_string('\'', true, false)
}

/// Host languages shipped with litmus.
pub fn builtin_hosts() -> Vec<HostLanguage> {
    vec![
        c_family("c", &["c", "h"]),
        c_family("cpp", &["cpp", "hpp", "cc", "cxx", "hh"]),
        c_family("java", &["java"]),
        c_family("csharp", &["cs"]),
        c_family("kotlin", &["kt", "kts"]),
        c_family("javascript", &["js", "mjs", "cjs", "jsx"]).with_string('`', true, true),
        c_family("typescript", &["ts", "tsx"]).with_string('`', true, true),
        c_family("php", &["php"]).with_ignored_line_comment("#"),
        c_family("go", &["go"]).with_string('`', true, false),
        HostLanguage::new("swift")
            .with_extensions(&["swift"])
            .with_ignored_line_comment("//")
            .with_block_comment("/*", "*/")
            .nested()
            .with_string('"', false, true)
            .with_decoration('*'),
        // Rust char literals clash with lifetimes, so only `"` is a string here.
        // Doc comments are searched, plain `//` comments are not.
        HostLanguage::new("rust")
            .with_extensions(&["rs"])
            .with_line_comment("///")
            .with_line_comment("//!")
            .with_ignored_line_comment("//")
            .with_block_comment("/*", "*/")
            .nested()
            .with_string('"', true, true)
            .with_decoration('*'),
        HostLanguage::new("python")
            .with_extensions(&["py", "pyw", "pyi"])
            .with_ignored_line_comment("#")
            .with_block_comment("\"\"\"", "\"\"\"")
            .with_block_comment("'''", "'''")
            .with_string('"', false, true)
            .with_string('\'', false, true),
        hash_family("ruby", &["rb"]),
        hash_family("shell", &["sh", "bash", "zsh"]),
        hash_family("powershell", &["ps1", "psm1"]).with_block_comment("<#", "#>"),
        HostLanguage::new("markdown")
            .with_extensions(&["md", "markdown"])
            .with_block_comment("<!--", "-->")
            .with_fence("```")
            .with_fence("~~~"),
        HostLanguage::document("text").with_extensions(&["rst", "txt"]),
    ]
}

/// Lookup table from file extension to host language.
#[derive(Clone, Debug)]
pub struct HostTable {
    hosts: Vec<HostLanguage>,
    /// Used for files whose extension matches no host.
    fallback: HostLanguage,
}

impl Default for HostTable {
    fn default() -> Self {
        Self::builtin()
    }
}

impl HostTable {
    pub fn new(hosts: Vec<HostLanguage>) -> Self {
        Self {
            hosts,
            fallback: HostLanguage::document("text"),
        }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_hosts())
    }

    /// Host registered for the path's extension, if any.
    pub fn detect(&self, path: &Path) -> Option<&HostLanguage> {
        let ext = path.extension()?.to_str()?;
        self.hosts.iter().find(|h| h.matches_extension(ext))
    }

    /// Like [`detect`](Self::detect), falling back to whole-file scanning.
    pub fn for_path(&self, path: &Path) -> &HostLanguage {
        self.detect(path).unwrap_or(&self.fallback)
    }

    pub fn get(&self, name: &str) -> Option<&HostLanguage> {
        self.hosts.iter().find(|h| h.name.eq_ignore_ascii_case(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &HostLanguage> {
        self.hosts.iter()
    }

    /// Every extension the table knows about.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.hosts
            .iter()
            .flat_map(|h| h.extensions.iter().map(String::as_str))
    }
}
