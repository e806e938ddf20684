//! Expression parsing by tree rotation
//!
//! Operands are attached as leaves while operators are discovered left to right.
//! For each operator the parser climbs from the latest operand through parent
//! links while the parent binds at least as tightly, then rotates a new operator
//! node into that position. The climb gives left associativity for equal
//! precedence and lets tighter operators nest inside the right subtree, so no
//! operator stack is needed.

use crate::frontend::core::lexer::{Token, TokenKind};
use crate::frontend::core::parser::ast::{NodeId, NodeKind};
use crate::frontend::core::parser::{ParseError, ParserState};
use crate::util::diagnostic::Result;

impl<'src> ParserState<'src, '_> {
    /// Parse `operand (operator operand)*` below `insertion`, returning the
    /// expression's top node.
    pub(crate) fn parse_expression(
        &mut self,
        insertion: NodeId,
        tokens: &[Token<'src>],
    ) -> Result<NodeId> {
        let Some((first, rest)) = tokens.split_first() else {
            return Ok(insertion);
        };
        if !first.kind.is_operand() {
            if first.kind == TokenKind::Unknown {
                return Err(self.unexpected(first, "an operand"));
            }
            return Err(ParseError::InvalidLeftHandSide {
                found: first.text.to_string(),
                span: first.span,
            }
            .into());
        }

        let mut operand = self.push_operand(*first, insertion);

        for pair in rest.chunks(2) {
            let op_token = pair[0];
            let TokenKind::Operator(operator) = op_token.kind else {
                return Err(self.unexpected(&op_token, "an operator or terminator"));
            };
            let rhs = match pair.get(1) {
                Some(rhs) if rhs.kind.is_operand() => *rhs,
                Some(rhs) if rhs.kind == TokenKind::Unknown => {
                    return Err(self.unexpected(rhs, "an operand"));
                }
                _ => {
                    return Err(ParseError::MissingOperand {
                        operator: op_token.text.to_string(),
                        span: op_token.span,
                    }
                    .into());
                }
            };

            let lhs = self.climb(operand, operator.precedence());
            let op_node = self.ast.rotate(lhs, NodeKind::from(operator), Some(op_token));
            operand = self.push_operand(rhs, op_node);
        }

        Ok(self.climb_to(operand, insertion))
    }

    fn push_operand(
        &mut self,
        token: Token<'src>,
        parent: NodeId,
    ) -> NodeId {
        let kind = match token.kind {
            TokenKind::Integer(_) => NodeKind::Integer,
            _ => NodeKind::Identifier,
        };
        self.ast.push(kind, Some(token), Some(parent))
    }

    /// Walk up while the parent is an operator binding at least as tightly as
    /// `precedence`.
    fn climb(
        &self,
        from: NodeId,
        precedence: u8,
    ) -> NodeId {
        let mut node = from;
        while let Some(parent) = self.ast.parent(node) {
            match self.ast.kind(parent).precedence() {
                Some(p) if p >= precedence => node = parent,
                _ => break,
            }
        }
        node
    }

    /// The ancestor of `from` that sits directly below `insertion`
    fn climb_to(
        &self,
        from: NodeId,
        insertion: NodeId,
    ) -> NodeId {
        let mut node = from;
        while let Some(parent) = self.ast.parent(node) {
            if parent == insertion {
                break;
            }
            node = parent;
        }
        node
    }
}
