//! Validation test file parser and runner.
//!
//! Parses the `tests/validate/*.test` format:
//!
//! ```text
//! # test: undeclared_operands
//! # mode: strict
//! ---
//! PADAM sum:ANKHE;
//! sum = a + b;
//! ---
//! 2: Undeclared variable 'a'.
//! 2: Undeclared variable 'b'.
//! ===
//! ```
//!
//! `# mode:` is optional and defaults to `strict`. An empty expectation
//! section means the program must be valid.

use yantra_kernel::{Diagnostic, Strictness, Validator, ValidatorConfig};

use crate::{TestResult, TestSummary};

/// A single validation test case.
#[derive(Debug, Clone)]
pub struct ValidateTestCase {
    /// Test name from the `# test: name` line.
    pub name: String,
    /// Line number where the test starts (1-indexed).
    pub line_number: usize,
    pub strictness: Strictness,
    /// The program under test.
    pub source: String,
    /// Expected diagnostics, in order.
    pub expected: Vec<Diagnostic>,
    /// Problems found while reading the case itself.
    pub malformed: Option<String>,
}

/// Parse the `*.test` file format into test cases.
pub fn parse_validate_tests(content: &str) -> Vec<ValidateTestCase> {
    let mut cases = Vec::new();
    let lines: Vec<&str> = content.lines().collect();
    let mut i = 0;

    while i < lines.len() {
        let Some(name) = lines[i].trim().strip_prefix("# test:") else {
            i += 1;
            continue;
        };
        let name = name.trim().to_string();
        let start_line = i + 1;
        let mut malformed = None;
        i += 1;

        let mut strictness = Strictness::Strict;
        if let Some(mode) = lines.get(i).and_then(|l| l.trim().strip_prefix("# mode:")) {
            match mode.parse() {
                Ok(parsed) => strictness = parsed,
                Err(err) => malformed = Some(format!("{err}")),
            }
            i += 1;
        }

        // Skip to first ---
        while i < lines.len() && lines[i].trim() != "---" {
            i += 1;
        }
        i += 1;

        // Source runs until the next --- and is kept verbatim.
        let mut source_lines = Vec::new();
        while i < lines.len() && lines[i].trim() != "---" {
            source_lines.push(lines[i]);
            i += 1;
        }
        i += 1;

        let mut expected = Vec::new();
        while i < lines.len() && lines[i].trim() != "===" {
            let line = lines[i].trim();
            if !line.is_empty() {
                match parse_expectation(line) {
                    Some(diagnostic) => expected.push(diagnostic),
                    None => {
                        malformed.get_or_insert_with(|| format!("bad expectation line: {line}"));
                    }
                }
            }
            i += 1;
        }
        i += 1;

        cases.push(ValidateTestCase {
            name,
            line_number: start_line,
            strictness,
            source: source_lines.join("\n"),
            expected,
            malformed,
        });
    }

    cases
}

/// `LINE: message`
fn parse_expectation(line: &str) -> Option<Diagnostic> {
    let (number, message) = line.split_once(':')?;
    let number = number.trim().parse().ok()?;
    Some(Diagnostic::new(number, message.trim()))
}

fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    if diagnostics.is_empty() {
        return "(no diagnostics)".to_string();
    }
    diagnostics
        .iter()
        .map(|d| format!("{}: {}", d.line, d.message))
        .collect::<Vec<_>>()
        .join("\n")
}

impl ValidateTestCase {
    /// Run this test case and return the result.
    pub fn run(&self) -> TestResult {
        if let Some(message) = &self.malformed {
            return TestResult::Error {
                message: message.clone(),
            };
        }

        let validator =
            Validator::with_config(ValidatorConfig::default().with_strictness(self.strictness));
        let actual = validator.validate(&self.source);
        if actual == self.expected {
            TestResult::Pass
        } else {
            TestResult::Fail {
                expected: format_diagnostics(&self.expected),
                actual: format_diagnostics(&actual),
            }
        }
    }
}

/// Run all validation test cases and return a summary.
///
/// Cases named in `skip` are recorded as skipped instead of run.
pub fn run_validate_tests(cases: &[ValidateTestCase], skip: &[&str]) -> TestSummary {
    let mut summary = TestSummary::new();

    for case in cases {
        let result = if skip.contains(&case.name.as_str()) {
            TestResult::Skip {
                reason: "listed as known failing".to_string(),
            }
        } else {
            case.run()
        };
        summary.record(&case.name, case.line_number, result);
    }

    summary
}
