//! Diagnostics produced by validation.
//!
//! A diagnostic is a 1-based line number and a message. There are no severity
//! levels or error codes: the message text is the category, and downstream
//! consumers match on it. Every template lives here so the wording stays in
//! one place.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::validator::VarType;

/// A single defect found in a program.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// 1-based line on which the offending logical statement starts.
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }

    pub fn unmatched_closer(line: usize) -> Self {
        Self::new(line, "Unmatched closing bracket ']'")
    }

    pub fn unclosed_block(line: usize) -> Self {
        Self::new(line, "Missing closing ']' for block opened here.")
    }

    pub fn reserved_name(line: usize, name: &str) -> Self {
        Self::new(line, format!("Variable name '{name}' is reserved."))
    }

    pub fn already_declared(line: usize, name: &str) -> Self {
        Self::new(line, format!("Variable '{name}' already declared."))
    }

    pub fn invalid_initializer(line: usize, name: &str, ty: VarType) -> Self {
        let expected = match ty {
            VarType::Number => "integer",
            VarType::Text => "string in quotes",
        };
        Self::new(
            line,
            format!(
                "Invalid {} value for '{name}'. Expected {expected}.",
                ty.describe()
            ),
        )
    }

    pub fn declaration_missing_semicolon(line: usize) -> Self {
        Self::new(line, "Missing semicolon in variable declaration.")
    }

    pub fn undeclared(line: usize, name: &str) -> Self {
        Self::new(line, format!("Undeclared variable '{name}'."))
    }

    pub fn type_mismatch(line: usize, description: &str, ty: VarType, name: &str) -> Self {
        Self::new(
            line,
            format!(
                "Type mismatch: Cannot assign {description} to {} variable '{name}'.",
                ty.describe()
            ),
        )
    }

    /// `context` is `print` or `scan`.
    pub fn undeclared_in(line: usize, name: &str, context: &str) -> Self {
        Self::new(line, format!("Undeclared variable '{name}' in {context}."))
    }

    pub fn invalid_condition(line: usize) -> Self {
        Self::new(line, "Invalid condition in ELAITHE.")
    }

    pub fn else_semicolon_before_bracket(line: usize) -> Self {
        Self::new(line, "Invalid ALAITHE syntax. Remove semicolon before '['.")
    }

    pub fn closer_else_semicolon(line: usize) -> Self {
        Self::new(
            line,
            "Invalid syntax: Remove semicolon between '] ALAITHE' and '['.",
        )
    }

    pub fn closer_semicolon_else(line: usize) -> Self {
        Self::new(
            line,
            "Invalid syntax: Remove semicolon between ']' and 'ALAITHE'.",
        )
    }

    pub fn invalid_loop(line: usize) -> Self {
        Self::new(line, "Invalid MALLI-MALLI syntax.")
    }

    pub fn missing_semicolon(line: usize) -> Self {
        Self::new(line, "Missing semicolon.")
    }

    pub fn unknown_statement(line: usize) -> Self {
        Self::new(line, "Unknown or invalid statement.")
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

/// The outcome of validating one submitted program.
///
/// This is the record a submission service stores: the code as submitted,
/// whether it passed, and every diagnostic found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub code: String,
    pub is_valid: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(code: impl Into<String>, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            code: code.into(),
            is_valid: diagnostics.is_empty(),
            diagnostics,
        }
    }
}

/// Render diagnostics with the offending source line beneath each one.
///
/// ```text
/// line 2: Undeclared variable 'a'.
///    2 | sum = a + b;
/// ```
pub fn render_diagnostics(source: &str, diagnostics: &[Diagnostic]) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let width = diagnostics
        .iter()
        .map(|d| d.line.to_string().len())
        .max()
        .unwrap_or(1)
        .max(4);

    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&diagnostic.to_string());
        out.push('\n');
        if let Some(text) = diagnostic
            .line
            .checked_sub(1)
            .and_then(|idx| lines.get(idx))
        {
            out.push_str(&format!(
                "{:>width$} | {}\n",
                diagnostic.line,
                text.trim_end(),
                width = width
            ));
        }
    }
    out
}
