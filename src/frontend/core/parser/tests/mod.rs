//! Parser tests
//!
//! - expressions: precedence, associativity, rotation invariants
//! - declarations: data-segment grammar
//! - segments: segment markers and mode switching


use crate::frontend::core::lexer::split_statements;
use crate::frontend::core::parser::parse;
use crate::frontend::state::CompilationState;
use crate::frontend::CompileError;

/// Parse `source` and render it as s-expressions, one statement per line
pub(crate) fn render(source: &str) -> Result<String, CompileError> {
    let mut state = CompilationState::new();
    let statements = split_statements(source)?;
    let ast = parse(&statements, &mut state)?;
    Ok(ast.to_string())
}
