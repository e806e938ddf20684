//! Optimizer tests

mod peephole;

use crate::frontend::core::lexer::split_statements;
use crate::frontend::core::parser::parse;
use crate::frontend::state::CompilationState;
use crate::middle::core::ir::Instruction;
use crate::middle::core::ir_gen::lower;
use crate::util::diagnostic::Result;

/// Lex, parse and lower `source` into a fresh state
fn lowered(source: &str) -> Result<(Vec<Instruction>, CompilationState)> {
    let mut state = CompilationState::new();
    let statements = split_statements(source)?;
    let ast = parse(&statements, &mut state)?;
    let code = lower(&ast, &mut state)?;
    Ok((code, state))
}
