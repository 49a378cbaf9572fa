//! Test utilities for yantra.
//!
//! Provides the parser and runner for `tests/validate/*.test`: markdown-like
//! files pairing a Yantrabhashi program with the diagnostics it must produce.

pub mod validate;

use std::fmt;

/// The result of running a single test case.
#[derive(Debug, Clone)]
pub enum TestResult {
    /// Test passed.
    Pass,
    /// Diagnostics differed from the expectation.
    Fail { expected: String, actual: String },
    /// Test was skipped.
    Skip { reason: String },
    /// The case itself is malformed.
    Error { message: String },
}

impl TestResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, TestResult::Pass)
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, TestResult::Fail { .. })
    }
}

/// Summary of running multiple test cases.
#[derive(Debug, Default)]
pub struct TestSummary {
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
    pub failures: Vec<TestFailure>,
}

/// A single test failure with context.
#[derive(Debug, Clone)]
pub struct TestFailure {
    pub name: String,
    /// Line in the `.test` file where the case header sits.
    pub line: usize,
    pub result: TestResult,
}

impl TestSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, name: impl Into<String>, line: usize, result: TestResult) {
        match &result {
            TestResult::Pass => self.passed += 1,
            TestResult::Skip { .. } => self.skipped += 1,
            TestResult::Fail { .. } | TestResult::Error { .. } => {
                if result.is_fail() {
                    self.failed += 1;
                } else {
                    self.errors += 1;
                }
                self.failures.push(TestFailure {
                    name: name.into(),
                    line,
                    result,
                });
            }
        }
    }

    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.errors
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0 && self.errors == 0
    }
}

impl fmt::Display for TestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "\n{}", "═".repeat(60))?;
        writeln!(f, "Validation cases: {} total", self.total())?;
        writeln!(
            f,
            "  ✓ {} passed  ✗ {} failed  ⊘ {} skipped  ⚠ {} errors",
            self.passed, self.failed, self.skipped, self.errors
        )?;

        if !self.failures.is_empty() {
            writeln!(f, "\nFailures:")?;
            for failure in &self.failures {
                writeln!(f, "\n  {} (line {})", failure.name, failure.line)?;
                match &failure.result {
                    TestResult::Fail { expected, actual } => {
                        writeln!(f, "    expected:")?;
                        for line in expected.lines() {
                            writeln!(f, "      {line}")?;
                        }
                        writeln!(f, "    actual:")?;
                        for line in actual.lines() {
                            writeln!(f, "      {line}")?;
                        }
                    }
                    TestResult::Error { message } => {
                        writeln!(f, "    error: {message}")?;
                    }
                    _ => {}
                }
            }
        }
        writeln!(f, "{}", "═".repeat(60))?;
        Ok(())
    }
}
