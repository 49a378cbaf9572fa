//! Static validation for Yantrabhashi programs.
//!
//! The validator never executes anything. Source text is segmented into
//! logical statements, each statement is classified into one form, and each
//! form's checks run against a symbol table and a block stack. It validates:
//!
//! - **Declarations**: reserved names, redeclaration, initializer shape
//! - **Assignments**: undeclared targets and operands, type agreement
//! - **Print / scan**: arguments name declared variables
//! - **Conditions**: operand types agree (strict mode only)
//! - **Loops**: the fixed `PADAM v:ANKHE = n; v OP x; v = v + 1` header
//! - **Blocks**: every `[` has a matching `]`
//!
//! Scanning never stops at the first defect; one call reports all of them.
//!
//! # Example
//!
//! ```
//! use yantra_kernel::validator::Validator;
//!
//! let validator = Validator::new();
//! let diagnostics = validator.validate("PADAM sum:ANKHE;\nsum = a + b;");
//!
//! for diagnostic in &diagnostics {
//!     println!("{diagnostic}");
//! }
//! assert_eq!(diagnostics.len(), 2);
//! ```

mod blocks;
mod checker;
mod statement;
mod symbols;

pub use blocks::{Block, BlockKind, BlockStack};
pub use statement::{
    after_closer, classify, normalize_whitespace, parse_comparison, parse_loop_header,
    AfterCloser, Classified, Comparison, IoKind, RelOp, Statement,
};
pub use symbols::{Declared, SymbolTable, VarType, RESERVED_WORDS};

use crate::config::ValidatorConfig;
use crate::diagnostic::{Diagnostic, ValidationReport};
use crate::segmenter::segment;

use checker::ValidationState;

/// Validates Yantrabhashi source.
///
/// Holds only configuration; all per-run state is created inside each call,
/// so one `Validator` can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Validator {
    config: ValidatorConfig,
}

impl Validator {
    /// A validator with the default (strict) configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ValidatorConfig {
        self.config
    }

    /// Validate `source` and return every diagnostic, in discovery order.
    pub fn validate(&self, source: &str) -> Vec<Diagnostic> {
        self.validate_with_symbols(source).0
    }

    /// Validate `source`, also returning the symbol table as it stood at the end.
    #[tracing::instrument(level = "debug", skip_all, fields(bytes = source.len(), strictness = %self.config.strictness))]
    pub fn validate_with_symbols(&self, source: &str) -> (Vec<Diagnostic>, SymbolTable) {
        let mut state = ValidationState::new(self.config);
        for statement in segment(source) {
            state.check_statement(&statement);
        }
        let (diagnostics, symbols) = state.finish();
        tracing::debug!(count = diagnostics.len(), "validation complete");
        (diagnostics, symbols)
    }

    /// Validate `source` and package the result as a [`ValidationReport`].
    pub fn report(&self, source: &str) -> ValidationReport {
        ValidationReport::new(source, self.validate(source))
    }
}

/// Validate with the default configuration.
pub fn validate(source: &str) -> Vec<Diagnostic> {
    Validator::new().validate(source)
}
