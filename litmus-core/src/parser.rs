//! Example block parser.
//!
//! Turns one [`CommentSpan`] into the [`ExampleBlock`]s written inside it.
//! Each line of the span is classified as a start prompt, a continuation,
//! expected output or ordinary text. The parser never looks at more than
//! the current line and the block being built, and no state survives past
//! the end of the span.

use std::sync::Arc;

use crate::dialect::{Dialect, DialectRegistry, OutputBoundary};
use crate::types::{CommentSpan, ExampleBlock};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Phase {
    /// Collecting prompt and continuation lines.
    Source,
    /// Collecting the expected transcript.
    Output,
}

/// A block that has been opened but not yet closed.
#[derive(Debug)]
struct OpenBlock<'r> {
    dialect: &'r Arc<Dialect>,
    indent: String,
    phase: Phase,
    source_lines: Vec<String>,
    output_lines: Vec<String>,
    options: Vec<String>,
    start_line: u32,
    end_line: u32,
}

impl<'r> OpenBlock<'r> {
    fn new(dialect: &'r Arc<Dialect>, indent: &str, first: &str, line_no: u32) -> Self {
        let mut block = Self {
            dialect,
            indent: indent.to_string(),
            phase: Phase::Source,
            source_lines: Vec::new(),
            output_lines: Vec::new(),
            options: Vec::new(),
            start_line: line_no,
            end_line: line_no,
        };
        block.push_source(first, line_no);
        block
    }

    fn push_source(&mut self, text: &str, line_no: u32) {
        self.options.extend(self.dialect.parse_options(text));
        self.source_lines.push(text.to_string());
        self.end_line = line_no;
    }

    fn push_output(&mut self, text: &str, line_no: u32) {
        self.phase = Phase::Output;
        if !text.is_empty() {
            self.end_line = line_no;
        }
        self.output_lines.push(text.to_string());
    }

    fn boundary(&self) -> OutputBoundary {
        self.dialect.output_boundary
    }

    fn finish(self) -> ExampleBlock {
        let mut output = self.output_lines;
        if self.dialect.output_boundary == OutputBoundary::NextPrompt {
            while output.last().is_some_and(|l| l.is_empty()) {
                output.pop();
            }
            let leading = output.iter().take_while(|l| l.is_empty()).count();
            output.drain(..leading);
        }

        ExampleBlock {
            dialect: Arc::clone(self.dialect),
            source_lines: self.source_lines,
            expected_output_lines: output,
            start_line: self.start_line,
            end_line: self.end_line,
            indent: self.indent,
            options: self.options,
        }
    }
}

/// Parse every example block inside a comment span, in order.
///
/// Line numbers of the returned blocks refer to the file the span was
/// extracted from. A span without examples yields an empty vector.
pub fn parse_blocks(span: &CommentSpan, registry: &DialectRegistry) -> Vec<ExampleBlock> {
    let mut blocks = Vec::new();
    let mut current: Option<OpenBlock<'_>> = None;

    for (line_no, raw) in span.lines() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        let start = registry.match_start(line);

        if let Some(open) = current.as_mut() {
            if open.phase == Phase::Source {
                if let Some(rest) = open.dialect.match_continuation(line) {
                    let cont_len = open.dialect.continuation_prompt.as_deref().map_or(0, str::len);
                    let outranked = start
                        .as_ref()
                        .is_some_and(|m| m.dialect.start_prompt.len() > cont_len);
                    if !outranked {
                        open.push_source(rest, line_no);
                        continue;
                    }
                }
            }
        }

        if let Some(m) = start {
            if let Some(done) = current.take() {
                blocks.push(done.finish());
            }
            current = Some(OpenBlock::new(m.dialect, m.indent, m.remainder, line_no));
            continue;
        }

        let Some(open) = current.as_mut() else {
            continue;
        };

        if line.trim().is_empty() {
            match open.boundary() {
                OutputBoundary::BlankLine => {
                    if let Some(done) = current.take() {
                        blocks.push(done.finish());
                    }
                }
                OutputBoundary::NextPrompt => open.push_output("", line_no),
            }
            continue;
        }

        match line.strip_prefix(open.indent.as_str()) {
            Some(text) => open.push_output(text, line_no),
            None => {
                // Under-indented text ends the block and is not part of it
                if let Some(done) = current.take() {
                    blocks.push(done.finish());
                }
            }
        }
    }

    if let Some(done) = current {
        blocks.push(done.finish());
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SpanKind;

    fn span(text: &str, start_line: u32) -> CommentSpan {
        CommentSpan {
            text: text.to_string(),
            start_line,
            end_line: start_line + text.matches('\n').count() as u32,
            kind: SpanKind::Block,
            byte_range: 0..text.len(),
        }
    }

    fn parse(text: &str) -> Vec<ExampleBlock> {
        parse_blocks(&span(text, 1), &DialectRegistry::builtin())
    }

    #[test]
    fn test_python_block_with_output() {
        let blocks = parse(" >>> 1 + 2\n 3\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].dialect.name, "python");
        assert_eq!(blocks[0].source_lines, vec!["1 + 2"]);
        assert_eq!(blocks[0].expected_output_lines, vec!["3"]);
        assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 2));
    }

    #[test]
    fn test_go_continuations_and_blank_line_boundary() {
        let text = concat!(
            " > func foo() {\n",
            " .   fmt.Println(\"hello!\")\n",
            " . }\n",
            "\n",
            " > foo()\n",
            " hello!",
        );
        let blocks = parse(text);
        assert_eq!(blocks.len(), 2);

        assert_eq!(blocks[0].dialect.name, "go");
        assert_eq!(
            blocks[0].source_lines,
            vec!["func foo() {", "  fmt.Println(\"hello!\")", "}"]
        );
        assert!(blocks[0].expects_silence());
        assert_eq!((blocks[0].start_line, blocks[0].end_line), (1, 3));

        assert_eq!(blocks[1].source_lines, vec!["foo()"]);
        assert_eq!(blocks[1].expected_output_lines, vec!["hello!"]);
        assert_eq!(blocks[1].start_line, 5);
    }

    #[test]
    fn test_longest_prefix_selects_dialect() {
        let registry = DialectRegistry::new(vec![
            Dialect::new("go", "go", ">", "."),
            Dialect::new("python", "python", ">>>", "..."),
        ])
        .unwrap();
        let blocks = parse_blocks(&span(">>> 1+2\n3", 1), &registry);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].dialect.name, "python");
        assert_eq!(blocks[0].source_lines, vec!["1+2"]);
    }

    #[test]
    fn test_leading_continuation_is_ordinary_text() {
        assert!(parse(" . }\n ... x = 1\n some prose").is_empty());
    }

    #[test]
    fn test_start_line_is_file_relative() {
        let blocks = parse_blocks(
            &span(" Intro text.\n\n >>> x = 1\n", 40),
            &DialectRegistry::builtin(),
        );
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].start_line, 42);
    }

    #[test]
    fn test_reparsing_is_idempotent() {
        let text = " >>> a = 1\n >>> a\n 1\n";
        let registry = DialectRegistry::builtin();
        let s = span(text, 7);
        assert_eq!(parse_blocks(&s, &registry), parse_blocks(&s, &registry));
    }

    #[test]
    fn test_independent_blocks_in_order() {
        let text = ">>> 1\n1\n\n$ echo two\ntwo\n\n> three()\n3";
        let blocks = parse(text);
        let names: Vec<&str> = blocks.iter().map(|b| b.dialect.name.as_str()).collect();
        assert_eq!(names, vec!["python", "shell", "go"]);
    }

    #[test]
    fn test_new_prompt_closes_output() {
        let blocks = parse(">>> 1\n1\n>>> 2\n2");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].expected_output_lines, vec!["1"]);
        assert_eq!(blocks[1].expected_output_lines, vec!["2"]);
    }

    #[test]
    fn test_prompt_like_text_is_not_an_example() {
        assert!(parse(" return 1 \\\n     >2;\n x >>> y\n >>>x").is_empty());
    }

    #[test]
    fn test_empty_first_source_line() {
        let blocks = parse(" >>> \n ... x");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].source_lines, vec!["", "x"]);
    }

    #[test]
    fn test_output_keeps_relative_indentation() {
        let blocks = parse("    >>> print(tree)\n    root\n      leaf\n  after");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].indent, "    ");
        assert_eq!(blocks[0].expected_output_lines, vec!["root", "  leaf"]);
        assert_eq!(blocks[0].end_line, 3);
    }

    #[test]
    fn test_output_is_verbatim() {
        // `.` is a continuation for go, not for an open python block
        let blocks = parse(">>> print('. done')\n. done\n>>> 1");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].expected_output_lines, vec![". done"]);
    }

    #[test]
    fn test_continuation_equal_to_start_prompt_accumulates() {
        let blocks = parse(">> a = 1\n>> a + 1\n=> 2");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].dialect.name, "ruby");
        assert_eq!(blocks[0].source_lines, vec!["a = 1", "a + 1"]);
        assert_eq!(blocks[0].expected_output_lines, vec!["=> 2"]);
    }

    #[test]
    fn test_longer_start_prompt_beats_continuation() {
        let blocks = parse(">> 1\n>>> 2");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].dialect.name, "python");
    }

    #[test]
    fn test_inline_options_collected() {
        let blocks = parse(">>> x = f()  # litmus: +norm-ws\n... g()  # litmus: -tags timeout=3\n");
        assert_eq!(blocks[0].options, vec!["+norm-ws", "-tags", "timeout=3"]);
        assert!(blocks[0].source_lines[0].ends_with("# litmus: +norm-ws"));
    }

    #[test]
    fn test_next_prompt_boundary_keeps_blank_lines() {
        let registry = DialectRegistry::new(vec![Dialect::new("sql", "sql", "sql>", "...>")
            .with_boundary(OutputBoundary::NextPrompt)])
        .unwrap();
        let text = "sql> select 1;\n\n+---+\n\n| 1 |\n\n\nsql> select 2;";
        let blocks = parse_blocks(&span(text, 1), &registry);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].expected_output_lines, vec!["+---+", "", "| 1 |"]);
        assert_eq!(blocks[0].end_line, 5);
        assert!(blocks[1].expects_silence());
    }

    #[test]
    fn test_gdb_examples_are_single_lines() {
        let blocks = parse("(gdb) print 1 + 2\n$1 = 3\n(gdb) print 4\n$2 = 4\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].source_lines, vec!["print 1 + 2"]);
        assert_eq!(blocks[0].expected_output_lines, vec!["$1 = 3"]);
        assert_eq!(blocks[1].start_line, 3);
    }

    #[test]
    fn test_crlf_lines() {
        let blocks = parse(">>> 1 + 1\r\n2\r\n");
        assert_eq!(blocks[0].source_lines, vec!["1 + 1"]);
        assert_eq!(blocks[0].expected_output_lines, vec!["2"]);
    }
}
