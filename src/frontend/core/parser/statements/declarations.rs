//! Declaration parsing
//!
//! A data-segment statement is exactly `<type> <identifier>`.

use crate::frontend::core::lexer::{Token, TokenKind};
use crate::frontend::core::parser::ast::NodeKind;
use crate::frontend::core::parser::{ParseError, ParserState};
use crate::util::diagnostic::Result;

/// Parse `<type> <identifier>` into a `VarDef` under the program root
pub fn parse_var_def<'src>(
    state: &mut ParserState<'src, '_>,
    tokens: &[Token<'src>],
) -> Result<()> {
    let (ty, name) = match tokens {
        [] => return Ok(()),
        [first, ..] if first.kind != TokenKind::Type => {
            if first.kind == TokenKind::Unknown {
                return Err(state.unexpected(first, "a type"));
            }
            return Err(ParseError::MalformedDeclaration {
                found: first.text.to_string(),
                span: first.span,
            }
            .into());
        }
        [ty] => {
            return Err(ParseError::IncompleteDeclaration {
                found: ty.text.to_string(),
                span: ty.span,
            }
            .into());
        }
        [ty, name, rest @ ..] => {
            if name.kind != TokenKind::Identifier {
                return Err(state.unexpected(name, "an identifier"));
            }
            if let Some(extra) = rest.first() {
                return Err(ParseError::ExpectedTerminator {
                    found: extra.text.to_string(),
                    span: extra.span,
                }
                .into());
            }
            (*ty, *name)
        }
    };

    let root = state.ast.root();
    let def = state.ast.push(NodeKind::VarDef, Some(name), Some(root));
    state.ast.push(NodeKind::Type, Some(ty), Some(def));
    state.ast.push(NodeKind::Identifier, Some(name), Some(def));
    Ok(())
}
