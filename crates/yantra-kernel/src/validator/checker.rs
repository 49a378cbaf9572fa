//! Per-statement semantic checks.
//!
//! [`ValidationState`] owns everything that changes during one run: the
//! symbol table, the block stack and the diagnostics collected so far. A fresh
//! state is built for every call to `validate`, so nothing leaks between runs.

use crate::config::ValidatorConfig;
use crate::diagnostic::Diagnostic;
use crate::expr::{is_identifier, is_integer_literal, is_string_literal, Arithmetic};
use crate::segmenter::LogicalStatement;

use super::blocks::{BlockKind, BlockStack};
use super::statement::{
    after_closer, classify, normalize_whitespace, parse_comparison, parse_loop_header,
    AfterCloser, Classified, IoKind, Statement,
};
use super::symbols::{Declared, SymbolTable, VarType};

/// Result of checking an `ELAITHE` condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConditionVerdict {
    Valid,
    Invalid,
    /// The subject or the compared identifier was never declared.
    Unresolved,
}

/// Result of checking an assignment's right-hand side.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ExprVerdict {
    Valid,
    /// Identifiers in the expression that were never declared.
    Undeclared(Vec<String>),
    Mismatch,
}

pub(crate) struct ValidationState {
    config: ValidatorConfig,
    symbols: SymbolTable,
    blocks: BlockStack,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationState {
    pub(crate) fn new(config: ValidatorConfig) -> Self {
        Self {
            config,
            symbols: SymbolTable::new(),
            blocks: BlockStack::new(),
            diagnostics: Vec::new(),
        }
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Report a diagnostic caused by a failed name lookup.
    ///
    /// Inside the body of a rejected loop header the loop variable was never
    /// bound, so these are withheld. Type and syntax defects are not.
    fn report_lookup(&mut self, diagnostic: Diagnostic) {
        if self.blocks.in_unbound_body() {
            tracing::trace!(%diagnostic, "withheld inside rejected loop body");
            return;
        }
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn check_statement(&mut self, statement: &LogicalStatement) {
        let line = statement.line_num;
        let mut fragment = statement.text.trim();
        while !fragment.is_empty() {
            fragment = self.check_fragment(fragment, line);
        }
    }

    /// Check one fragment and return the text left to classify.
    fn check_fragment<'a>(&mut self, text: &'a str, line: usize) -> &'a str {
        let Classified { statement, rest } = classify(text);
        tracing::debug!(line, form = statement.form_name(), "classified");

        match statement {
            Statement::Closer { rest } => return self.check_closer(rest, line),
            Statement::Declaration { name, ty, value } => {
                self.check_declaration(name, ty, value, line)
            }
            Statement::UnterminatedDeclaration => {
                self.report(Diagnostic::declaration_missing_semicolon(line));
                self.open_if_bracketed(text, line);
            }
            Statement::Assignment { target, expr } => self.check_assignment(target, expr, line),
            Statement::Io { kind, arg } => self.check_io(kind, arg, line),
            Statement::IfHeader { condition } => {
                if self.config.strictness.checks_conditions() {
                    match self.condition_verdict(condition) {
                        ConditionVerdict::Valid => {}
                        ConditionVerdict::Invalid => {
                            self.report(Diagnostic::invalid_condition(line))
                        }
                        ConditionVerdict::Unresolved => {
                            self.report_lookup(Diagnostic::invalid_condition(line))
                        }
                    }
                }
                self.blocks.push(line, BlockKind::If);
            }
            Statement::ElseHeader => self.blocks.push(line, BlockKind::Else),
            Statement::ElseSemicolon => {
                self.report(Diagnostic::else_semicolon_before_bracket(line));
                self.blocks.push(line, BlockKind::Else);
            }
            Statement::LoopHeader { header } => self.check_loop(header, line),
            Statement::Unknown => {
                if !text.ends_with(';') && !text.ends_with('[') {
                    self.report(Diagnostic::missing_semicolon(line));
                } else {
                    self.report(Diagnostic::unknown_statement(line));
                }
                self.open_if_bracketed(text, line);
            }
        }

        rest
    }

    fn open_if_bracketed(&mut self, text: &str, line: usize) {
        if text.ends_with('[') {
            self.blocks.push(line, BlockKind::Other);
        }
    }

    fn check_closer<'a>(&mut self, rest: &'a str, line: usize) -> &'a str {
        if self.blocks.pop().is_none() {
            self.report(Diagnostic::unmatched_closer(line));
        }

        match after_closer(rest) {
            AfterCloser::Nothing => "",
            AfterCloser::Else => {
                self.blocks.push(line, BlockKind::Else);
                ""
            }
            AfterCloser::ElseSemicolon => {
                self.report(Diagnostic::closer_else_semicolon(line));
                self.blocks.push(line, BlockKind::Else);
                ""
            }
            AfterCloser::SemicolonElse => {
                self.report(Diagnostic::closer_semicolon_else(line));
                self.blocks.push(line, BlockKind::Else);
                ""
            }
            AfterCloser::Fragment(fragment) => fragment,
        }
    }

    fn check_declaration(&mut self, name: &str, ty: VarType, value: Option<&str>, line: usize) {
        match self.symbols.declare(name, ty) {
            Declared::Reserved => self.report(Diagnostic::reserved_name(line, name)),
            Declared::Duplicate => self.report(Diagnostic::already_declared(line, name)),
            Declared::Inserted => {
                if let Some(value) = value {
                    if !ty.accepts_literal(value.trim()) {
                        self.report(Diagnostic::invalid_initializer(line, name, ty));
                    }
                }
            }
        }
    }

    fn check_assignment(&mut self, target: &str, expr: &str, line: usize) {
        let Some(ty) = self.symbols.get(target) else {
            self.report_lookup(Diagnostic::undeclared(line, target));
            return;
        };

        let expr = expr.trim();
        let verdict = match ty {
            VarType::Number => self.check_number_expr(expr),
            VarType::Text => self.check_text_expr(expr),
        };

        match verdict {
            ExprVerdict::Valid => {}
            ExprVerdict::Undeclared(names) => {
                for name in names {
                    self.report_lookup(Diagnostic::undeclared(line, &name));
                }
            }
            ExprVerdict::Mismatch => {
                let description = describe_expression(expr, &self.symbols);
                let diagnostic = Diagnostic::type_mismatch(line, description, ty, target);
                if description == UNDECLARED {
                    self.report_lookup(diagnostic);
                } else {
                    self.report(diagnostic);
                }
            }
        }
    }

    fn check_number_expr(&self, expr: &str) -> ExprVerdict {
        if is_integer_literal(expr) {
            return ExprVerdict::Valid;
        }
        if is_identifier(expr) {
            return if self.symbols.is_type(expr, VarType::Number) {
                ExprVerdict::Valid
            } else {
                ExprVerdict::Mismatch
            };
        }
        if expr.contains('"') {
            return ExprVerdict::Mismatch;
        }

        let arith = match Arithmetic::lex(expr) {
            Ok(arith) => arith,
            Err(err) => {
                tracing::debug!(%err, expr, "not an arithmetic expression");
                return ExprVerdict::Mismatch;
            }
        };

        let identifiers = arith.identifiers();
        let undeclared: Vec<String> = identifiers
            .iter()
            .filter(|name| !self.symbols.contains(name))
            .map(|name| name.to_string())
            .collect();
        if !undeclared.is_empty() {
            return ExprVerdict::Undeclared(undeclared);
        }
        if identifiers
            .iter()
            .any(|name| !self.symbols.is_type(name, VarType::Number))
        {
            return ExprVerdict::Mismatch;
        }

        match arith.check_grammar() {
            Ok(()) => ExprVerdict::Valid,
            Err(err) => {
                tracing::debug!(%err, expr, "malformed arithmetic");
                ExprVerdict::Mismatch
            }
        }
    }

    fn check_text_expr(&self, expr: &str) -> ExprVerdict {
        if is_string_literal(expr) || self.symbols.is_type(expr, VarType::Text) {
            ExprVerdict::Valid
        } else {
            ExprVerdict::Mismatch
        }
    }

    fn check_io(&mut self, kind: IoKind, arg: &str, line: usize) {
        let arg = arg.trim();
        if is_string_literal(arg) {
            return;
        }
        if !self.symbols.contains(arg) {
            self.report_lookup(Diagnostic::undeclared_in(line, arg, kind.context()));
        }
    }

    fn condition_verdict(&self, condition: &str) -> ConditionVerdict {
        let condition = normalize_whitespace(condition);
        let Some(cmp) = parse_comparison(&condition) else {
            return ConditionVerdict::Invalid;
        };

        let Some(ty) = self.symbols.get(cmp.name) else {
            return ConditionVerdict::Unresolved;
        };
        if is_identifier(cmp.value) && !self.symbols.contains(cmp.value) {
            return ConditionVerdict::Unresolved;
        }

        let valid = match ty {
            VarType::Text => {
                !cmp.op.is_ordering()
                    && (is_string_literal(cmp.value)
                        || self.symbols.is_type(cmp.value, VarType::Text))
            }
            VarType::Number => {
                is_integer_literal(cmp.value) || self.symbols.is_type(cmp.value, VarType::Number)
            }
        };
        if valid {
            ConditionVerdict::Valid
        } else {
            ConditionVerdict::Invalid
        }
    }

    fn check_loop(&mut self, header: &str, line: usize) {
        match parse_loop_header(header) {
            Some(var) => {
                tracing::debug!(line, var = %var, "loop variable bound");
                self.symbols.affirm(&var, VarType::Number);
                self.blocks.push(line, BlockKind::Loop);
            }
            None => {
                self.report(Diagnostic::invalid_loop(line));
                self.blocks.push_unbound(line, BlockKind::Loop);
            }
        }
    }

    /// Close out the run: report every block still open, in opening order.
    pub(crate) fn finish(mut self) -> (Vec<Diagnostic>, SymbolTable) {
        let open = std::mem::take(&mut self.blocks).into_open();
        for block in open {
            self.diagnostics
                .push(Diagnostic::unclosed_block(block.open_line));
        }
        (self.diagnostics, self.symbols)
    }
}

const UNDECLARED: &str = "undeclared variable";

/// Describe an expression's shape for a type-mismatch message.
fn describe_expression(expr: &str, symbols: &SymbolTable) -> &'static str {
    let expr = expr.trim();
    if is_integer_literal(expr) {
        return "integer literal";
    }
    if is_string_literal(expr) {
        return "string literal";
    }
    if !expr.is_empty() && expr.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return match symbols.get(expr) {
            Some(VarType::Number) => "integer variable",
            Some(VarType::Text) => "string variable",
            None => UNDECLARED,
        };
    }
    if expr.contains('"') {
        return "mixed string and arithmetic expression";
    }
    if expr.contains(['+', '-', '*', '/']) {
        return "arithmetic expression";
    }
    "invalid expression"
}
