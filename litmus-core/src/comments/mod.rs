//! Comment extraction.
//!
//! Walks a file with a single forward cursor and yields the text of every
//! comment region, one [`CommentSpan`] at a time. Nothing is materialized
//! up front, so a caller that stops early never pays for the rest of the
//! file, and cloning the iterator restarts from the clone point.
//!
//! The lexical pass is deliberately shallow: it knows comment markers and
//! string literal quotes for the host language and nothing else. A comment
//! opener inside a string literal is ordinary text.

use serde::{Deserialize, Serialize};

use crate::error::UnterminatedComment;
use crate::types::{CommentSpan, SpanKind};

pub mod hosts;

pub use hosts::HostTable;

/// Open/close markers of a block comment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockDelimiter {
    pub open: String,
    pub close: String,
}

/// A string literal form of the host language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringRule {
    pub quote: char,
    /// The literal may run over several lines.
    pub multiline: bool,
    /// Backslash escapes the next character.
    pub escapes: bool,
}

/// Comment syntax of a host language.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostLanguage {
    pub name: String,
    /// File extensions (without dot, lowercase) this language is detected by.
    pub extensions: Vec<String>,
    /// Line comment markers, longest first (`///` before `//`).
    pub line_comments: Vec<String>,
    /// Line comment markers whose text is skipped and never searched.
    #[serde(default)]
    pub ignored_line_comments: Vec<String>,
    pub block_comments: Vec<BlockDelimiter>,
    /// Whether block comments nest (`/* /* */ */`).
    pub nested_blocks: bool,
    pub strings: Vec<StringRule>,
    /// Per-line decoration character of block comments, usually `*`.
    pub decoration: Option<char>,
    /// Fenced code markers such as Markdown backticks. A fence opened at the
    /// start of a line runs until a line starting with the same marker run.
    pub fences: Vec<String>,
    /// No comment syntax: the whole file is one span.
    pub whole_file: bool,
}

impl HostLanguage {
    /// Create a language with no comment syntax at all.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extensions: Vec::new(),
            line_comments: Vec::new(),
            ignored_line_comments: Vec::new(),
            block_comments: Vec::new(),
            nested_blocks: false,
            strings: Vec::new(),
            decoration: None,
            fences: Vec::new(),
            whole_file: false,
        }
    }

    /// A host whose entire text is searched for examples.
    pub fn document(name: impl Into<String>) -> Self {
        Self {
            whole_file: true,
            ..Self::new(name)
        }
    }

    /// Builder: add file extensions
    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions
            .extend(extensions.iter().map(|e| e.to_ascii_lowercase()));
        self
    }

    /// Builder: add a line comment marker
    pub fn with_line_comment(mut self, marker: impl Into<String>) -> Self {
        self.line_comments.push(marker.into());
        self.line_comments.sort_by_key(|m| std::cmp::Reverse(m.len()));
        self
    }

    /// Builder: recognize a line comment marker without searching its text
    pub fn with_ignored_line_comment(mut self, marker: impl Into<String>) -> Self {
        self.ignored_line_comments.push(marker.into());
        self
    }

    /// Builder: add a block comment delimiter pair
    pub fn with_block_comment(mut self, open: impl Into<String>, close: impl Into<String>) -> Self {
        self.block_comments.push(BlockDelimiter {
            open: open.into(),
            close: close.into(),
        });
        self
    }

    /// Builder: block comments nest
    pub fn nested(mut self) -> Self {
        self.nested_blocks = true;
        self
    }

    /// Builder: add a string literal rule
    pub fn with_string(mut self, quote: char, multiline: bool, escapes: bool) -> Self {
        self.strings.push(StringRule {
            quote,
            multiline,
            escapes,
        });
        self
    }

    /// Builder: strip this decoration character from block comment lines
    pub fn with_decoration(mut self, decoration: char) -> Self {
        self.decoration = Some(decoration);
        self
    }

    /// Builder: treat fenced code blocks as comment regions
    pub fn with_fence(mut self, marker: impl Into<String>) -> Self {
        self.fences.push(marker.into());
        self
    }

    pub fn matches_extension(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Extract the comment spans of `text` according to `host`.
///
/// The returned iterator yields spans in file order. After an
/// [`UnterminatedComment`] error it yields nothing more.
pub fn extract<'a>(text: &'a str, host: &'a HostLanguage) -> CommentSpans<'a> {
    CommentSpans::new(text, host)
}

/// Pull-based iterator over the comment spans of a file.
#[derive(Clone, Debug)]
pub struct CommentSpans<'a> {
    text: &'a str,
    host: &'a HostLanguage,
    /// Byte offset of the cursor.
    pos: usize,
    /// Line (1-indexed) the cursor is on.
    line: u32,
    /// Byte offset where the current line starts.
    line_start: usize,
    done: bool,
}

impl<'a> CommentSpans<'a> {
    pub fn new(text: &'a str, host: &'a HostLanguage) -> Self {
        Self {
            text,
            host,
            pos: 0,
            line: 1,
            line_start: 0,
            done: false,
        }
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Move the cursor over one character, keeping line bookkeeping.
    fn bump(&mut self) -> Option<char> {
        let ch = self.rest().chars().next()?;
        self.pos += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.line_start = self.pos;
        }
        Some(ch)
    }

    fn whole_file(&mut self) -> Option<CommentSpan> {
        self.done = true;
        if self.text.is_empty() {
            return None;
        }
        let body = self.text.strip_suffix('\n').unwrap_or(self.text);
        let body = body.strip_suffix('\r').unwrap_or(body);
        Some(CommentSpan {
            text: body.to_string(),
            start_line: 1,
            end_line: 1 + body.matches('\n').count() as u32,
            kind: SpanKind::Document,
            byte_range: 0..self.text.len(),
        })
    }

    /// Skip a string literal starting at the cursor (on its opening quote).
    fn skip_string(&mut self, rule: StringRule) {
        self.bump();
        while let Some(ch) = self.rest().chars().next() {
            if ch == '\n' && !rule.multiline {
                // Unterminated single-line literal: resume scanning on the next line
                return;
            }
            self.bump();
            if rule.escapes && ch == '\\' {
                self.bump();
            } else if ch == rule.quote {
                return;
            }
        }
    }

    /// Consume a block comment whose opener is at the cursor.
    fn block_comment(
        &mut self,
        delimiter: &'a BlockDelimiter,
    ) -> Result<CommentSpan, UnterminatedComment> {
        let start = self.pos;
        let start_line = self.line;
        self.pos += delimiter.open.len();
        let body_start = self.pos;
        let mut depth = 1usize;

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(UnterminatedComment {
                    opener: delimiter.open.clone(),
                    line: start_line,
                });
            }
            if rest.starts_with(delimiter.close.as_str()) {
                depth -= 1;
                if depth == 0 {
                    let body = &self.text[body_start..self.pos];
                    self.pos += delimiter.close.len();
                    return Ok(CommentSpan {
                        text: self.strip_decoration(body),
                        start_line,
                        end_line: self.line,
                        kind: SpanKind::Block,
                        byte_range: start..self.pos,
                    });
                }
                self.pos += delimiter.close.len();
                continue;
            }
            if self.host.nested_blocks && rest.starts_with(delimiter.open.as_str()) {
                depth += 1;
                self.pos += delimiter.open.len();
                continue;
            }
            self.bump();
        }
    }

    /// Consume a fenced code block whose opening marker run is at the cursor.
    ///
    /// The info string after the opener is dropped; the span text starts on
    /// the line below it.
    fn fenced_block(&mut self, run: &'a str) -> Result<CommentSpan, UnterminatedComment> {
        let start = self.pos;
        let open_line = self.line;
        let unterminated = UnterminatedComment {
            opener: run.to_string(),
            line: open_line,
        };

        let Some(eol) = self.rest().find('\n') else {
            self.pos = self.text.len();
            return Err(unterminated);
        };
        self.pos += eol;
        self.bump();
        let body_start = self.pos;

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                return Err(unterminated);
            }
            let line_len = rest.find('\n').unwrap_or(rest.len());
            if rest[..line_len].trim_start_matches([' ', '\t']).starts_with(run) {
                let body = &self.text[body_start..self.pos];
                let body = body.strip_suffix('\n').unwrap_or(body);
                let close_line = self.line;
                self.pos += line_len;
                return Ok(CommentSpan {
                    text: body.to_string(),
                    start_line: open_line + 1,
                    end_line: (close_line - 1).max(open_line + 1),
                    kind: SpanKind::Block,
                    byte_range: start..self.pos,
                });
            }
            self.pos += line_len;
            self.bump();
        }
    }

    /// Full marker run of a fence opening at the cursor. Fences only open at
    /// the start of a line.
    fn fence_at(&self) -> Option<&'a str> {
        if self.host.fences.is_empty() || !self.text[self.line_start..self.pos].trim().is_empty() {
            return None;
        }
        let rest = self.rest();
        let marker = self.host.fences.iter().find(|f| rest.starts_with(f.as_str()))?;
        let ch = marker.chars().next()?;
        let run_len = rest.len() - rest.trim_start_matches(ch).len();
        Some(&rest[..run_len])
    }

    fn strip_decoration(&self, body: &str) -> String {
        let Some(deco) = self.host.decoration else {
            return body.to_string();
        };
        body.split('\n')
            .map(|line| strip_decoration_line(line, deco))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Consume a run of line comments starting with `marker` at the cursor.
    ///
    /// A comment that owns its whole line absorbs the full-line comments on
    /// the lines right below it. A trailing comment after code stands alone.
    fn line_comments(&mut self, marker: &str) -> CommentSpan {
        let start = self.pos;
        let start_line = self.line;
        let owns_line = self.text[self.line_start..self.pos].trim().is_empty();

        let mut lines = vec![self.take_line_comment(marker)];

        while owns_line && self.rest().starts_with('\n') {
            let next_line = &self.rest()[1..];
            let body = next_line.trim_start_matches([' ', '\t']);
            let Some(marker) = self.line_marker_at(body) else {
                break;
            };
            self.bump();
            self.pos += next_line.len() - body.len();
            lines.push(self.take_line_comment(marker));
        }

        CommentSpan {
            text: lines.join("\n"),
            start_line,
            end_line: self.line,
            kind: SpanKind::Line,
            byte_range: start..self.pos,
        }
    }

    /// Take the text of one line comment and leave the cursor at its newline.
    fn take_line_comment(&mut self, marker: &str) -> String {
        let rest = &self.rest()[marker.len()..];
        let len = rest.find('\n').unwrap_or(rest.len());
        let body = &rest[..len];
        self.pos += marker.len() + len;
        body.strip_suffix('\r').unwrap_or(body).to_string()
    }

    fn line_marker_at(&self, s: &str) -> Option<&'a str> {
        self.host
            .line_comments
            .iter()
            .find(|m| s.starts_with(m.as_str()))
            .map(String::as_str)
    }

    fn ignored_marker_at(&self, s: &str) -> bool {
        self.host
            .ignored_line_comments
            .iter()
            .any(|m| s.starts_with(m.as_str()))
    }

    fn block_at(&self, s: &str) -> Option<&'a BlockDelimiter> {
        self.host
            .block_comments
            .iter()
            .filter(|b| s.starts_with(b.open.as_str()))
            .max_by_key(|b| b.open.len())
    }
}

impl Iterator for CommentSpans<'_> {
    type Item = Result<CommentSpan, UnterminatedComment>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.host.whole_file {
            return self.whole_file().map(Ok);
        }

        loop {
            let rest = self.rest();
            if rest.is_empty() {
                self.done = true;
                return None;
            }

            if let Some(run) = self.fence_at() {
                let span = self.fenced_block(run);
                if span.is_err() {
                    self.done = true;
                }
                return Some(span);
            }

            if let Some(delimiter) = self.block_at(rest) {
                match self.block_comment(delimiter) {
                    Ok(span) if span.text.trim().is_empty() => continue,
                    Ok(span) => return Some(Ok(span)),
                    Err(e) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                }
            }

            if let Some(marker) = self.line_marker_at(rest) {
                let span = self.line_comments(marker);
                if span.text.trim().is_empty() {
                    continue;
                }
                return Some(Ok(span));
            }

            if self.ignored_marker_at(rest) {
                self.pos += rest.find('\n').unwrap_or(rest.len());
                continue;
            }

            let quote = rest.chars().next();
            if let Some(rule) = self.host.strings.iter().find(|s| Some(s.quote) == quote) {
                self.skip_string(*rule);
                continue;
            }

            self.bump();
        }
    }
}

impl std::iter::FusedIterator for CommentSpans<'_> {}

/// Replace a leading `*` decoration run (and the whitespace before it) with
/// a single space. Only runs followed by whitespace or the end of the line
/// count as decoration, so `*ptr` survives.
fn strip_decoration_line(line: &str, deco: char) -> String {
    let body = line.trim_start();
    let after = body.trim_start_matches(deco);
    if after.len() == body.len() {
        return line.to_string();
    }
    if after.is_empty() || after.starts_with(char::is_whitespace) {
        format!(" {}", after)
    } else {
        line.to_string()
    }
}
