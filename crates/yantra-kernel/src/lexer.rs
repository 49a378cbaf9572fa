//! Lexer for the right-hand side of assignments.
//!
//! Only arithmetic is tokenized: integers, identifiers, the four operators,
//! parentheses, and string literals (so a quoted operand can be recognised
//! and rejected rather than failing as an unknown character).

use std::fmt;
use std::ops::Range;

use logos::Logos;

use crate::expr::ExprError;

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// Digits run straight into letters (`1abc`) are one malformed word, not
    /// an integer followed by an identifier.
    #[regex(r"[0-9]+[A-Za-z0-9_]*", integer)]
    Int(String),

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""[^"]*""#, |lex| lex.slice().to_string())]
    Str(String),

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Int(s) | Token::Ident(s) | Token::Str(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
        }
    }
}

fn integer(lex: &mut logos::Lexer<'_, Token>) -> Option<String> {
    let slice = lex.slice();
    slice
        .bytes()
        .all(|b| b.is_ascii_digit())
        .then(|| slice.to_string())
}

/// A token with its byte range in the source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub token: Token,
    pub span: Range<usize>,
}

/// Tokenize an expression, failing on the first unrecognised input.
pub fn tokenize(source: &str) -> Result<Vec<Spanned>, ExprError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push(Spanned {
                token,
                span: lexer.span(),
            }),
            Err(()) => {
                return Err(ExprError::UnexpectedInput {
                    offset: lexer.span().start,
                    text: lexer.slice().to_string(),
                })
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("lexes")
            .into_iter()
            .map(|spanned| spanned.token)
            .collect()
    }

    #[test]
    fn arithmetic_tokens() {
        assert_eq!(
            kinds("(a + 12) * b_2 / -c"),
            vec![
                Token::LParen,
                Token::Ident("a".into()),
                Token::Plus,
                Token::Int("12".into()),
                Token::RParen,
                Token::Star,
                Token::Ident("b_2".into()),
                Token::Slash,
                Token::Minus,
                Token::Ident("c".into()),
            ]
        );
    }

    #[test]
    fn string_literal_is_one_token() {
        let tokens = tokenize(r#""hi there" + 1"#).expect("lexes");
        assert_eq!(tokens[0].token, Token::Str(r#""hi there""#.into()));
        assert_eq!(tokens[0].span, 0..10);
        assert_eq!(tokens.len(), 3);
    }

    #[test]
    fn unknown_character_reports_offset() {
        let err = tokenize("a % b").expect_err("percent is not a token");
        assert_eq!(
            err,
            ExprError::UnexpectedInput {
                offset: 2,
                text: "%".into()
            }
        );
    }

    #[test]
    fn digits_then_letters_rejected() {
        let err = tokenize("n + 1abc").expect_err("not a word");
        assert_eq!(
            err,
            ExprError::UnexpectedInput {
                offset: 4,
                text: "1abc".into()
            }
        );
        assert_eq!(
            kinds("12 + ab1"),
            vec![Token::Int("12".into()), Token::Plus, Token::Ident("ab1".into())]
        );
    }
}
