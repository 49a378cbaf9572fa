//! Arithmetic expression checking.
//!
//! Integer assignments accept arithmetic over `+ - * /`, parentheses, integer
//! literals and identifiers. Well-formedness is decided by a chumsky grammar
//! over the logos [`Token`]s; nothing is ever evaluated.
//!
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := ('+' | '-')* atom
//! atom   := INT | IDENT | '(' expr ')'
//! ```

use chumsky::{input::ValueInput, prelude::*};
use thiserror::Error;

use crate::lexer::{tokenize, Spanned, Token};

/// Span type handed to the parser.
type Span = SimpleSpan;

/// Nesting limit for parentheses and unary operators.
const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    #[error("unrecognised input '{text}' at offset {offset}")]
    UnexpectedInput { offset: usize, text: String },

    #[error("string literal {0} in arithmetic expression")]
    StringLiteral(String),

    #[error("unexpected '{0}'")]
    UnexpectedToken(Token),

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("expression nested deeper than {} levels", MAX_DEPTH)]
    TooDeep,
}

/// A tokenized arithmetic expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Arithmetic {
    tokens: Vec<Spanned>,
    /// Byte length of the source, for the end-of-input span.
    len: usize,
}

impl Arithmetic {
    /// Tokenize `source`. String literals are rejected here, before any grammar
    /// check, since text never participates in arithmetic.
    pub fn lex(source: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        if let Some(Token::Str(s)) = tokens
            .iter()
            .map(|spanned| &spanned.token)
            .find(|t| matches!(t, Token::Str(_)))
        {
            return Err(ExprError::StringLiteral(s.clone()));
        }
        Ok(Self {
            tokens,
            len: source.len(),
        })
    }

    /// Identifiers in order of first appearance, without repeats.
    pub fn identifiers(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for spanned in &self.tokens {
            if let Token::Ident(name) = &spanned.token {
                if !seen.contains(&name.as_str()) {
                    seen.push(name);
                }
            }
        }
        seen
    }

    /// Check the token stream against the arithmetic grammar.
    ///
    /// Nesting is bounded before the grammar runs, so the recursive parser
    /// never descends more than [`MAX_DEPTH`] levels.
    pub fn check_grammar(&self) -> Result<(), ExprError> {
        if nesting_depth(&self.tokens) > MAX_DEPTH {
            return Err(ExprError::TooDeep);
        }

        let tokens: Vec<(Token, Span)> = self
            .tokens
            .iter()
            .map(|spanned| (spanned.token.clone(), spanned.span.clone().into()))
            .collect();
        let end_span: Span = (self.len..self.len).into();

        let parser = arithmetic_parser().then_ignore(end());
        let result = parser.parse(tokens.as_slice().map(end_span, |(t, s)| (t, s)));

        result.into_result().map_err(|errs| {
            let found = errs.first().and_then(|e| e.found()).cloned();
            match found {
                Some(token) => ExprError::UnexpectedToken(token),
                None => ExprError::UnexpectedEnd,
            }
        })
    }
}

/// Deepest stack of open parentheses and pending unary operators.
fn nesting_depth(tokens: &[Spanned]) -> usize {
    let mut deepest = 0;
    let mut base = 0;
    let mut signs = 0;
    let mut groups: Vec<usize> = Vec::new();
    let mut operand_expected = true;

    for spanned in tokens {
        match spanned.token {
            Token::Plus | Token::Minus if operand_expected => {
                signs += 1;
                deepest = deepest.max(base + signs);
            }
            Token::LParen if operand_expected => {
                let opened = signs + 1;
                groups.push(opened);
                base += opened;
                signs = 0;
                deepest = deepest.max(base);
            }
            Token::RParen => {
                base -= groups.pop().unwrap_or(0);
                signs = 0;
                operand_expected = false;
            }
            Token::Int(_) | Token::Ident(_) | Token::Str(_) => {
                signs = 0;
                operand_expected = false;
            }
            _ => {
                signs = 0;
                operand_expected = true;
            }
        }
    }
    deepest
}

fn arithmetic_parser<'tokens, I>(
) -> impl Parser<'tokens, I, (), extra::Err<Rich<'tokens, Token, Span>>> + Clone
where
    I: ValueInput<'tokens, Token = Token, Span = Span>,
{
    recursive(|expr| {
        let atom = select! {
            Token::Int(_) => (),
            Token::Ident(_) => (),
        }
        .or(expr.delimited_by(just(Token::LParen), just(Token::RParen)));

        let sign = choice((just(Token::Plus), just(Token::Minus)));
        let unary = sign.clone().repeated().ignore_then(atom);

        let term = unary.clone().then_ignore(
            choice((just(Token::Star), just(Token::Slash)))
                .then(unary)
                .repeated(),
        );

        term.clone().then_ignore(sign.then(term).repeated())
    })
}

/// `-?\d+`
pub fn is_integer_literal(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// A double-quoted literal. Escapes are not interpreted.
pub fn is_string_literal(text: &str) -> bool {
    text.len() >= 2 && text.starts_with('"') && text.ends_with('"') && !text[1..].contains('\n')
}

/// `[A-Za-z_][A-Za-z0-9_]*`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
