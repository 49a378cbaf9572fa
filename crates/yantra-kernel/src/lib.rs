//! yantra-kernel: static validation for Yantrabhashi programs.
//!
//! This crate provides:
//!
//! - **Segmenter**: groups physical lines into logical statements
//! - **Lexer**: tokenizes arithmetic expressions using logos
//! - **Expr**: chumsky well-formedness check for arithmetic
//! - **Validator**: statement classifier, block tracker, symbol table and type checker
//! - **Diagnostics**: the `{line, message}` output and its renderings
//!
//! ```
//! use yantra_kernel::validate;
//!
//! let diagnostics = validate("PADAM a:ANKHE = 5;\nCHATIMPU(a);");
//! assert!(diagnostics.is_empty());
//! ```

pub mod config;
pub mod diagnostic;
pub mod expr;
pub mod lexer;
pub mod segmenter;
pub mod validator;

pub use config::{ConfigError, Strictness, ValidatorConfig};
pub use diagnostic::{render_diagnostics, Diagnostic, ValidationReport};
pub use segmenter::{segment, LogicalStatement};
pub use validator::{validate, Validator};
