//! Token types

use crate::util::span::Span;
use serde::Serialize;

/// Lexer error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unrecognized character `{lexeme}` at {span}")]
    UnknownCharacter { lexeme: String, span: Span },
    #[error("integer literal `{lexeme}` at {span} does not fit in 64 bits")]
    IntegerOverflow { lexeme: String, span: Span },
    #[error("source is not valid UTF-8 (invalid byte at offset {offset})")]
    InvalidUtf8 { offset: usize },
}

/// Binary operator, with its binding precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operator {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
}

impl Operator {
    /// Map a single source character to an operator
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '=' => Some(Operator::Assign),
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Sub),
            '*' => Some(Operator::Mul),
            '/' => Some(Operator::Div),
            _ => None,
        }
    }

    /// Binding precedence: `=` 0, `+ -` 1, `* /` 2
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Assign => 0,
            Operator::Add | Operator::Sub => 1,
            Operator::Mul | Operator::Div => 2,
        }
    }

    /// Source spelling
    pub fn symbol(self) -> &'static str {
        match self {
            Operator::Assign => "=",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Div => "/",
        }
    }
}

/// Token kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    /// `name:` segment marker; the text excludes the colon
    Segment,
    /// `i1 i2 i4 i8 u1 u2 u4 u8 ptr`
    Type,
    Identifier,
    /// `( ) ,`
    Punct,
    Operator(Operator),
    /// `ret end`
    Keyword,
    Integer(u64),
    Unknown,
}

impl TokenKind {
    /// Identifiers and integer literals
    #[inline]
    pub fn is_operand(&self) -> bool {
        matches!(self, TokenKind::Identifier | TokenKind::Integer(_))
    }
}

/// Token borrowing its text from the source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    /// Operator precedence, if this token is an operator
    #[inline]
    pub fn precedence(&self) -> Option<u8> {
        match self.kind {
            TokenKind::Operator(op) => Some(op.precedence()),
            _ => None,
        }
    }
}

impl std::fmt::Display for Token<'_> {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let kind = match self.kind {
            TokenKind::Segment => "SEGMENT",
            TokenKind::Type => "TYPE",
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::Punct => "PUNCT",
            TokenKind::Operator(_) => "OPERATOR",
            TokenKind::Keyword => "KEYWORD",
            TokenKind::Integer(_) => "INTEGER",
            TokenKind::Unknown => "UNKNOWN",
        };
        write!(f, "{}\t{}", kind, self.text)
    }
}

/// Type keywords
pub const TYPE_KEYWORDS: &[&str] = &["i1", "i2", "i4", "i8", "u1", "u2", "u4", "u8", "ptr"];

/// Control keywords
pub const CONTROL_KEYWORDS: &[&str] = &["ret", "end"];
