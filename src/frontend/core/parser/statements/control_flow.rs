//! Control statements: `ret` / `end`

use crate::frontend::core::lexer::Token;
use crate::frontend::core::parser::ast::NodeKind;
use crate::frontend::core::parser::ParserState;
use crate::util::diagnostic::Result;

/// Parse `ret [expr]`. A trailing expression goes into a `Section` below the
/// `Return` node.
pub fn parse_return<'src>(
    state: &mut ParserState<'src, '_>,
    tokens: &[Token<'src>],
) -> Result<()> {
    let Some((keyword, rest)) = tokens.split_first() else {
        return Ok(());
    };
    let root = state.ast.root();
    let ret = state.ast.push(NodeKind::Return, Some(*keyword), Some(root));
    if !rest.is_empty() {
        let section = state.ast.push(NodeKind::Section, None, Some(ret));
        state.parse_expression(section, rest)?;
    }
    Ok(())
}
