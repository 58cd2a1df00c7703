//! Example dialects and the registry that holds them.
//!
//! A dialect is the prompt convention one target language uses to write
//! examples in comments: a start prompt (`>>>`), a continuation prompt
//! (`...`) and a rule for where the expected output stops. The registry is
//! built once, never mutated, and passed by reference into every scan.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::RegistryError;

/// Marker that introduces inline options, e.g. `# litmus: +norm-ws`.
pub const OPTIONS_MARKER: &str = "litmus:";

/// Accepted option tokens: `+flag`, `-flag`, `+flag=value` or `key=value`.
static OPTION_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[+-][A-Za-z][\w-]*(?:=\S+)?|[A-Za-z][\w-]*=\S+)$").unwrap());

/// Where an example's expected output ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputBoundary {
    /// Output stops at the first blank line, the next start prompt, or the
    /// end of the comment.
    #[default]
    BlankLine,
    /// Blank lines belong to the output; only the next start prompt or the
    /// end of the comment stops it. Leading and trailing blank lines are
    /// dropped.
    NextPrompt,
}

/// A prompt convention bound to a target language.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dialect {
    /// Unique registry name.
    pub name: String,
    /// Language of the interpreter that runs the examples.
    pub language: String,
    pub start_prompt: String,
    /// Absent for dialects whose examples are a single prompt line.
    #[serde(default)]
    pub continuation_prompt: Option<String>,
    #[serde(default)]
    pub output_boundary: OutputBoundary,
    /// Line-comment marker of the target language, used to find inline
    /// `litmus:` options in the example source.
    #[serde(default)]
    pub option_comment: Option<String>,
}

impl Dialect {
    pub fn new(
        name: impl Into<String>,
        language: impl Into<String>,
        start_prompt: impl Into<String>,
        continuation_prompt: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
            start_prompt: start_prompt.into(),
            continuation_prompt: Some(continuation_prompt.into()),
            output_boundary: OutputBoundary::default(),
            option_comment: None,
        }
    }

    /// A dialect without continuation lines: every example is one prompt line.
    pub fn single_line(
        name: impl Into<String>,
        language: impl Into<String>,
        start_prompt: impl Into<String>,
    ) -> Self {
        Self {
            continuation_prompt: None,
            ..Self::new(name, language, start_prompt, String::new())
        }
    }

    /// Builder: set the output boundary rule
    pub fn with_boundary(mut self, boundary: OutputBoundary) -> Self {
        self.output_boundary = boundary;
        self
    }

    /// Builder: set the option comment marker
    pub fn with_option_comment(mut self, marker: impl Into<String>) -> Self {
        self.option_comment = Some(marker.into());
        self
    }

    /// Match a continuation line. Returns the source text after the prompt,
    /// minus one separating space if there is one.
    ///
    /// Leading whitespace before the prompt is ignored.
    pub fn match_continuation<'l>(&self, line: &'l str) -> Option<&'l str> {
        let prompt = self.continuation_prompt.as_deref()?;
        let rest = trim_indent(line).strip_prefix(prompt)?;
        Some(rest.strip_prefix(' ').unwrap_or(rest))
    }

    /// Collect inline option tokens from one source line.
    ///
    /// `x = f()  # litmus: +norm-ws -tags` yields `["+norm-ws", "-tags"]`.
    /// Tokens that do not look like options are ignored.
    pub fn parse_options(&self, line: &str) -> Vec<String> {
        let Some(marker) = self.option_comment.as_deref() else {
            return Vec::new();
        };

        for (idx, _) in line.match_indices(marker) {
            let after = line[idx + marker.len()..].trim_start();
            if let Some(flags) = after.strip_prefix(OPTIONS_MARKER) {
                return flags
                    .split_whitespace()
                    .filter(|token| {
                        let ok = OPTION_TOKEN.is_match(token);
                        if !ok {
                            tracing::debug!("Ignoring malformed option '{}' ({})", token, self.name);
                        }
                        ok
                    })
                    .map(str::to_string)
                    .collect();
            }
        }
        Vec::new()
    }

    fn validate(&self) -> Result<(), RegistryError> {
        let prompts = [
            ("start", Some(&self.start_prompt)),
            ("continuation", self.continuation_prompt.as_ref()),
        ];
        for (which, prompt) in prompts {
            let Some(prompt) = prompt else { continue };
            if prompt.is_empty() {
                return Err(RegistryError::EmptyPrompt {
                    name: self.name.clone(),
                    which,
                });
            }
            if prompt.chars().any(char::is_whitespace) {
                return Err(RegistryError::PromptWhitespace {
                    name: self.name.clone(),
                    which,
                    prompt: prompt.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Dialects shipped with litmus.
pub fn builtin_dialects() -> Vec<Dialect> {
    vec![
        Dialect::new("python", "python", ">>>", "...").with_option_comment("#"),
        Dialect::new("ruby", "ruby", ">>", ">>").with_option_comment("#"),
        Dialect::new("go", "go", ">", ".").with_option_comment("//"),
        Dialect::new("shell", "shell", "$", ">").with_option_comment("#"),
        Dialect::new("cpp", "cpp", "?:", "::").with_option_comment("//"),
        Dialect::new("php", "php", "php>", "...>").with_option_comment("//"),
        Dialect::new("java", "java", "j>", "..").with_option_comment("//"),
        Dialect::new("elixir", "elixir", "iex>", "...>").with_option_comment("#"),
        Dialect::new("pwsh", "powershell", "PS>", ">>>").with_option_comment("#"),
        Dialect::single_line("gdb", "gdb", "(gdb)").with_option_comment("#"),
        Dialect::new("iasm", "iasm", ":>", "->").with_option_comment(";"),
    ]
}

/// A start-prompt match on one line.
#[derive(Debug, Clone, Copy)]
pub struct StartMatch<'r, 'l> {
    pub dialect: &'r Arc<Dialect>,
    /// Whitespace in front of the prompt.
    pub indent: &'l str,
    /// Text after the prompt and its single separating whitespace character.
    pub remainder: &'l str,
}

/// Immutable set of dialects.
///
/// Cheap to share between threads: scans only ever read it.
#[derive(Clone, Debug, Default)]
pub struct DialectRegistry {
    /// Registration order.
    dialects: Vec<Arc<Dialect>>,
    /// Indices into `dialects`, longest start prompt first.
    by_prompt_len: Vec<usize>,
}

impl DialectRegistry {
    /// Build a registry, rejecting empty or whitespace prompts, duplicate
    /// names and duplicate start prompts.
    pub fn new(dialects: impl IntoIterator<Item = Dialect>) -> Result<Self, RegistryError> {
        let dialects: Vec<Dialect> = dialects.into_iter().collect();

        let mut names: HashSet<&str> = HashSet::new();
        let mut prompts: HashMap<&str, &str> = HashMap::new();
        for dialect in &dialects {
            dialect.validate()?;
            if !names.insert(&dialect.name) {
                return Err(RegistryError::DuplicateName {
                    name: dialect.name.clone(),
                });
            }
            if let Some(first) = prompts.insert(&dialect.start_prompt, &dialect.name) {
                return Err(RegistryError::DuplicatePrompt {
                    first: first.to_string(),
                    second: dialect.name.clone(),
                    prompt: dialect.start_prompt.clone(),
                });
            }
        }

        Ok(Self::assemble(dialects))
    }

    /// The built-in dialects.
    pub fn builtin() -> Self {
        Self::assemble(builtin_dialects())
    }

    fn assemble(dialects: Vec<Dialect>) -> Self {
        let dialects: Vec<Arc<Dialect>> = dialects.into_iter().map(Arc::new).collect();
        let mut by_prompt_len: Vec<usize> = (0..dialects.len()).collect();
        // Stable sort keeps registration order among equal lengths.
        by_prompt_len.sort_by(|&a, &b| {
            dialects[b]
                .start_prompt
                .len()
                .cmp(&dialects[a].start_prompt.len())
        });
        Self {
            dialects,
            by_prompt_len,
        }
    }

    /// Keep only the named dialects, in registration order.
    pub fn only<S: AsRef<str>>(&self, names: &[S]) -> Result<Self, RegistryError> {
        for name in names {
            if self.get(name.as_ref()).is_none() {
                return Err(RegistryError::UnknownDialect {
                    name: name.as_ref().to_string(),
                });
            }
        }
        let kept = self
            .dialects
            .iter()
            .filter(|d| names.iter().any(|n| n.as_ref() == d.name))
            .map(|d| d.as_ref().clone());
        Ok(Self::assemble(kept.collect()))
    }

    /// Return a new registry with `extra` appended, validated as a whole.
    pub fn extended(&self, extra: impl IntoIterator<Item = Dialect>) -> Result<Self, RegistryError> {
        let all = self
            .dialects
            .iter()
            .map(|d| d.as_ref().clone())
            .chain(extra);
        Self::new(all)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<Dialect>> {
        self.dialects.iter().find(|d| d.name == name)
    }

    /// Dialects in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Dialect>> {
        self.dialects.iter()
    }

    pub fn len(&self) -> usize {
        self.dialects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dialects.is_empty()
    }

    /// Find the dialect whose start prompt opens `line`.
    ///
    /// The prompt must come right after the line's leading whitespace and be
    /// followed by a whitespace character. When several prompts match, the
    /// longest one wins.
    pub fn match_start<'l>(&self, line: &'l str) -> Option<StartMatch<'_, 'l>> {
        let body = trim_indent(line);
        let indent = &line[..line.len() - body.len()];

        self.by_prompt_len.iter().find_map(|&idx| {
            let dialect = &self.dialects[idx];
            let rest = body.strip_prefix(dialect.start_prompt.as_str())?;
            let sep = rest.chars().next().filter(|c| c.is_whitespace())?;
            Some(StartMatch {
                dialect,
                indent,
                remainder: &rest[sep.len_utf8()..],
            })
        })
    }
}

/// Strip the leading spaces and tabs of a line.
pub(crate) fn trim_indent(line: &str) -> &str {
    line.trim_start_matches([' ', '\t'])
}
