//! Parser module
//!
//! Builds the arena AST from segmented statements. The segment mode in
//! [`CompilationState`] selects the grammar for each statement; expressions are
//! restructured in place as operators of different precedence appear.

pub mod ast;
pub mod parser_state;
pub mod rotation;
pub mod statements;
#[cfg(test)]
mod tests;

// Re-export commonly used items
pub use ast::*;
pub use parser_state::{ParseError, ParserState};
pub use statements::StatementParser;

use crate::frontend::core::lexer::Statement;
use crate::frontend::state::CompilationState;
use crate::util::diagnostic::Result;

/// Parse statements into an AST
///
/// # Arguments
/// * `statements` - Statements from the segmenter
/// * `state` - Compilation state; its segment mode is read and updated
///
/// # Returns
/// Parsed tree or the first error
pub fn parse<'src>(
    statements: &[Statement<'src>],
    state: &mut CompilationState,
) -> Result<Ast<'src>> {
    tracing::debug!("Parsing {} statements", statements.len());
    let mut parser = ParserState::new(state);
    for statement in statements {
        parser.parse_statement(statement)?;
    }
    let ast = parser.into_ast();
    tracing::debug!(
        "Parsed {} top-level statements ({} nodes)",
        ast.statements().len(),
        ast.len()
    );
    Ok(ast)
}
