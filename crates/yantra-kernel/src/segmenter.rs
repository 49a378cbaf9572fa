//! Statement segmenter.
//!
//! Groups physical source lines into logical statements. A statement ends
//! when the accumulated buffer ends with `;` or `[`, or is exactly `]`. Loop
//! headers are the exception: once a buffer contains `MALLI-MALLI (`, lines
//! are absorbed until the buffer ends with `) [`, so the three `;`-separated
//! header clauses never terminate the statement early.
//!
//! A statement is attributed to the physical line on which its buffer started.
//! Physical lines are trimmed and joined with `\n`, so later stages can still
//! tell where the original line breaks were.

use std::sync::LazyLock;

use regex::Regex;

/// One semantically complete statement, possibly spanning several lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalStatement {
    pub text: String,
    /// 1-based physical line where the statement starts.
    pub line_num: usize,
}

impl LogicalStatement {
    pub fn new(text: impl Into<String>, line_num: usize) -> Self {
        Self {
            text: text.into(),
            line_num,
        }
    }

    /// Whether the statement was joined from more than one physical line.
    pub fn is_multiline(&self) -> bool {
        self.text.contains('\n')
    }
}

#[allow(clippy::expect_used)]
fn pattern(src: &str) -> Regex {
    Regex::new(src).expect("built-in pattern compiles")
}

static LOOP_OPENER: LazyLock<Regex> = LazyLock::new(|| pattern(r"MALLI-MALLI\s*\("));
static LOOP_HEADER_END: LazyLock<Regex> = LazyLock::new(|| pattern(r"\)\s*\[$"));
static TERMINATOR: LazyLock<Regex> = LazyLock::new(|| pattern(r";\s*$|\[$|^\]$"));

/// Split source text into logical statements.
pub fn segment(source: &str) -> Vec<LogicalStatement> {
    let mut statements = Vec::new();
    let mut buffer = String::new();
    let mut start_line = 0;
    let mut in_loop_header = false;

    for (idx, raw) in source.split('\n').enumerate() {
        let raw = raw.strip_suffix('\r').unwrap_or(raw);
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let line = strip_comment(trimmed).trim_end();
        if line.is_empty() {
            continue;
        }

        if buffer.is_empty() {
            start_line = idx + 1;
        } else {
            buffer.push('\n');
        }
        buffer.push_str(line);

        if !in_loop_header && LOOP_OPENER.is_match(&buffer) {
            in_loop_header = true;
        }

        if in_loop_header {
            if LOOP_HEADER_END.is_match(&buffer) {
                in_loop_header = false;
                flush(&mut statements, &mut buffer, start_line);
            }
            continue;
        }

        if TERMINATOR.is_match(&buffer) {
            flush(&mut statements, &mut buffer, start_line);
        }
    }

    if !buffer.is_empty() {
        tracing::debug!(line = start_line, "flushing unterminated statement at end of input");
        flush(&mut statements, &mut buffer, start_line);
    }

    statements
}

fn flush(statements: &mut Vec<LogicalStatement>, buffer: &mut String, line_num: usize) {
    let text = std::mem::take(buffer);
    tracing::debug!(line = line_num, text = %text, "logical statement");
    statements.push(LogicalStatement::new(text, line_num));
}

/// Remove a trailing `# ...` comment, ignoring `#` inside double quotes.
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..idx],
            _ => {}
        }
    }
    line
}
