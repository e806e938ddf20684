//! Statement parsing modules
//! Contains specialized modules for different statement types

pub mod control_flow;
pub mod declarations;
pub mod segments;

use crate::frontend::core::lexer::{Statement, TokenKind};
use crate::frontend::core::parser::ParserState;
use crate::frontend::state::Segment;
use crate::util::diagnostic::Result;

/// Statement parsing trait
pub trait StatementParser<'src> {
    /// Parse one statement into the tree under the current segment's grammar
    fn parse_statement(
        &mut self,
        statement: &Statement<'src>,
    ) -> Result<()>;
}

impl<'src> StatementParser<'src> for ParserState<'src, '_> {
    fn parse_statement(
        &mut self,
        statement: &Statement<'src>,
    ) -> Result<()> {
        if let Some(marker) = statement.segment_marker() {
            return segments::parse_segment_marker(self, marker);
        }

        let Some(first) = statement.tokens.first() else {
            return Ok(());
        };

        match self.state.segment {
            Segment::Data => declarations::parse_var_def(self, &statement.tokens),
            // `system:`/`layout:` abort when selected, so only logic remains
            Segment::Logic | Segment::System | Segment::Layout => match first.kind {
                TokenKind::Keyword => control_flow::parse_return(self, &statement.tokens),
                TokenKind::Identifier | TokenKind::Integer(_) | TokenKind::Operator(_) => {
                    let root = self.ast.root();
                    self.parse_expression(root, &statement.tokens)?;
                    Ok(())
                }
                _ => Err(self.unexpected(first, "a statement")),
            },
        }
    }
}
