//! Parser state and error handling

use crate::frontend::core::lexer::{LexError, Token, TokenKind};
use crate::frontend::core::parser::ast::Ast;
use crate::frontend::state::CompilationState;
use crate::frontend::CompileError;
use crate::util::span::Span;

/// Parse error types; each names the offending lexeme
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("expected {expected}, found `{found}` at {span}")]
    UnexpectedToken {
        expected: &'static str,
        found: String,
        span: Span,
    },
    #[error("operator `{operator}` at {span} is missing its right operand")]
    MissingOperand { operator: String, span: Span },
    #[error("invalid left-hand side `{found}` at {span}")]
    InvalidLeftHandSide { found: String, span: Span },
    #[error("incomplete declaration: type `{found}` at {span} is not followed by a name")]
    IncompleteDeclaration { found: String, span: Span },
    #[error("malformed declaration: expected a type, found `{found}` at {span}")]
    MalformedDeclaration { found: String, span: Span },
    #[error("expected terminator, found `{found}` at {span}")]
    ExpectedTerminator { found: String, span: Span },
    #[error("`{name}` at {span} is not a segment")]
    NotASegment { name: String, span: Span },
    #[error("segment `{name}` at {span} is not implemented")]
    UnimplementedSegment { name: String, span: Span },
}

/// Parser state shared by the statement parsers
pub struct ParserState<'src, 'st> {
    pub(crate) ast: Ast<'src>,
    pub(crate) state: &'st mut CompilationState,
}

impl<'src, 'st> ParserState<'src, 'st> {
    pub fn new(state: &'st mut CompilationState) -> Self {
        Self {
            ast: Ast::new(),
            state,
        }
    }

    /// Finish parsing and hand back the tree
    pub fn into_ast(self) -> Ast<'src> {
        self.ast
    }

    /// Reject a token the grammar has no place for.
    ///
    /// Unknown characters surface here as lexical errors, the first point where a
    /// consumer looks at them.
    pub(crate) fn unexpected(
        &self,
        token: &Token<'src>,
        expected: &'static str,
    ) -> CompileError {
        if token.kind == TokenKind::Unknown {
            return LexError::UnknownCharacter {
                lexeme: token.text.to_string(),
                span: token.span,
            }
            .into();
        }
        ParseError::UnexpectedToken {
            expected,
            found: token.text.to_string(),
            span: token.span,
        }
        .into()
    }
}
