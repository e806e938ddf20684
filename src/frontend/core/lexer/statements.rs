//! Statement segmentation
//!
//! Groups the token stream into statements. A statement ends at `;`, at end of
//! input, or around a segment marker, which always stands alone.

use super::tokenizer::{Lexer, Scan};
use super::tokens::{LexError, Token, TokenKind};
use crate::util::span::Span;

/// Tokens collected between two statement boundaries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement<'src> {
    pub tokens: Vec<Token<'src>>,
}

impl<'src> Statement<'src> {
    fn new(tokens: Vec<Token<'src>>) -> Self {
        Self { tokens }
    }

    /// The segment marker, if this statement is one
    pub fn segment_marker(&self) -> Option<&Token<'src>> {
        match self.tokens.as_slice() {
            [token] if token.kind == TokenKind::Segment => Some(token),
            _ => None,
        }
    }

    /// Span from the first to the last token
    pub fn span(&self) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
            _ => Span::dummy(),
        }
    }
}

/// Split the source into statements
pub fn split_statements(source: &str) -> Result<Vec<Statement<'_>>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut statements = Vec::new();
    let mut current = Vec::new();

    loop {
        match lexer.next_token()? {
            Scan::Token(token) if token.kind == TokenKind::Segment => {
                if !current.is_empty() {
                    statements.push(Statement::new(std::mem::take(&mut current)));
                }
                statements.push(Statement::new(vec![token]));
            }
            Scan::Token(token) => current.push(token),
            // `;;` yields nothing
            Scan::Terminator => {
                if !current.is_empty() {
                    statements.push(Statement::new(std::mem::take(&mut current)));
                }
            }
            Scan::Eof => {
                if !current.is_empty() {
                    statements.push(Statement::new(current));
                }
                break;
            }
        }
    }

    tracing::debug!("Segmented source into {} statements", statements.len());
    Ok(statements)
}
