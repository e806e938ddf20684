//! AST to DOIL lowering
//!
//! Walks the top-level statements in source order and serializes each tree
//! into instructions. Integer literals stay constant operands where an operand
//! slot allows it; everything else is computed into a register taken from the
//! pool in [`CompilationState`]. Every register is released by the code that
//! consumes its value, so the pool must be empty when lowering finishes.

use crate::frontend::core::lexer::TokenKind;
use crate::frontend::core::parser::ast::{Ast, NodeId, NodeKind};
use crate::frontend::state::CompilationState;
use crate::frontend::CompileError;
use crate::middle::core::ir::{ArithOp, Instruction, Operand, Place, SizeClass};
use crate::middle::core::registers::Reg;
use crate::middle::core::symbols::SymbolKind;
use crate::util::diagnostic::{codes, Diagnostic, Result};
use crate::util::span::Span;

/// Semantic errors found while lowering
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SemanticError {
    #[error("use of undeclared variable `{name}` at {span}")]
    Undeclared { name: String, span: Span },
    #[error("variable `{name}` at {span} is already declared")]
    Redeclared { name: String, span: Span },
    #[error("cannot assign to `{found}` at {span}")]
    InvalidAssignTarget { found: String, span: Span },
    #[error("unsupported construct `{found}` at {span}")]
    Unsupported { found: String, span: Span },
}

/// Result of lowering an expression
#[must_use]
enum Value {
    Reg(Reg),
    Const(u64),
}

/// Left-spine work deferred until the leftmost operand is in a register
enum Pending {
    Arith(ArithOp, NodeId),
    Store(Value),
}

impl Value {
    fn operand(&self) -> Operand {
        match self {
            Value::Reg(reg) => Operand::Reg(reg.id()),
            Value::Const(value) => Operand::Const(*value),
        }
    }
}

/// Lower a parsed program to DOIL
pub fn lower(
    ast: &Ast<'_>,
    state: &mut CompilationState,
) -> Result<Vec<Instruction>> {
    let mut generator = IrGenerator {
        ast,
        state,
        code: Vec::new(),
    };
    for &stmt in ast.statements() {
        generator.lower_statement(stmt)?;
    }

    let leaked = generator.state.registers.live_count();
    if leaked != 0 {
        return Err(CompileError::Internal(format!(
            "{} register(s) still live after lowering",
            leaked
        )));
    }
    tracing::debug!("Lowered to {} instructions", generator.code.len());
    Ok(generator.code)
}

struct IrGenerator<'a, 'src> {
    ast: &'a Ast<'src>,
    state: &'a mut CompilationState,
    code: Vec<Instruction>,
}

impl<'src> IrGenerator<'_, 'src> {
    fn lexeme(
        &self,
        id: NodeId,
    ) -> (&'src str, Span) {
        self.ast
            .token(id)
            .map(|t| (t.text, t.span))
            .unwrap_or(("", Span::dummy()))
    }

    fn release(
        &mut self,
        value: Value,
    ) -> Result<()> {
        if let Value::Reg(reg) = value {
            self.state.registers.release(reg)?;
        }
        Ok(())
    }

    fn lower_statement(
        &mut self,
        id: NodeId,
    ) -> Result<()> {
        match self.ast.kind(id) {
            NodeKind::VarDef => self.lower_var_def(id),
            NodeKind::Assign => {
                let value = self.lower_assign(id)?;
                self.release(value)
            }
            NodeKind::Return => self.lower_return(id),
            _ => {
                let (text, span) = self.lexeme(id);
                self.state.warn(Diagnostic::warning(
                    codes::NO_EFFECT,
                    format!("statement `{}` has no effect", text),
                    Some(span),
                ));
                let value = self.lower_value(id)?;
                self.release(value)
            }
        }
    }

    fn lower_var_def(
        &mut self,
        id: NodeId,
    ) -> Result<()> {
        let &[ty, name_node] = self.ast.children(id) else {
            let (text, span) = self.lexeme(id);
            return Err(CompileError::Internal(format!(
                "declaration `{}` at {} lacks type or name",
                text, span
            )));
        };
        let (keyword, _) = self.lexeme(ty);
        let (name, span) = self.lexeme(name_node);
        let size = SizeClass::from_keyword(keyword).ok_or_else(|| SemanticError::Unsupported {
            found: keyword.to_string(),
            span,
        })?;

        if self.state.symbols.get(Some(SymbolKind::Variable), name).is_some() {
            return Err(SemanticError::Redeclared {
                name: name.to_string(),
                span,
            }
            .into());
        }
        self.state.symbols.add(SymbolKind::Variable, name).size = Some(size);
        self.code.push(Instruction::Def {
            name: name.to_string(),
            size,
        });
        Ok(())
    }

    /// Lower `lhs = rhs`; the stored value is the expression's result
    fn lower_assign(
        &mut self,
        id: NodeId,
    ) -> Result<Value> {
        let &[lhs, rhs] = self.ast.children(id) else {
            return Err(self.malformed(id));
        };
        let value = self.lower_value(rhs)?;
        let src = value.operand();

        match self.ast.kind(lhs) {
            NodeKind::Identifier => {
                let (name, span) = self.lexeme(lhs);
                let symbol = self
                    .state
                    .symbols
                    .get_mut(Some(SymbolKind::Variable), name)
                    .ok_or_else(|| SemanticError::Undeclared {
                        name: name.to_string(),
                        span,
                    })?;
                symbol.set_amount += 1;
                if symbol.set_amount == 1 {
                    if let Operand::Const(v) = src {
                        symbol.first_value = Some(v);
                    }
                }
                self.code.push(Instruction::Store {
                    dst: Place::Var(name.to_string()),
                    src,
                });
            }
            NodeKind::Integer => {
                let (found, span) = self.lexeme(lhs);
                return Err(SemanticError::InvalidAssignTarget {
                    found: found.to_string(),
                    span,
                }
                .into());
            }
            _ => {
                let target = self.lower_register(lhs)?;
                self.code.push(Instruction::Store {
                    dst: Place::Reg(target.id()),
                    src,
                });
                self.state.registers.release(target)?;
            }
        }
        Ok(value)
    }

    fn lower_return(
        &mut self,
        id: NodeId,
    ) -> Result<()> {
        let operand = match self.ast.children(id).first() {
            Some(&section) => match self.ast.children(section).first() {
                Some(&expr) => Some(self.lower_value(expr)?),
                None => None,
            },
            None => None,
        };
        self.code
            .push(Instruction::Ret(operand.as_ref().map(Value::operand)));
        if let Some(value) = operand {
            self.release(value)?;
        }
        Ok(())
    }

    /// Lower to an operand: integer literals stay constants
    fn lower_value(
        &mut self,
        id: NodeId,
    ) -> Result<Value> {
        if let Some(value) = self.literal(id) {
            return Ok(Value::Const(value));
        }
        if self.ast.kind(id) == NodeKind::Assign {
            return self.lower_assign(id);
        }
        self.lower_register(id).map(Value::Reg)
    }

    /// Lower into a register owned by the caller.
    ///
    /// Operators associate left, so long expressions grow down the left spine.
    /// The spine is walked with an explicit stack; only right operands recurse,
    /// and their depth is bounded by the number of precedence levels.
    fn lower_register(
        &mut self,
        id: NodeId,
    ) -> Result<Reg> {
        let mut pending = Vec::new();
        let mut current = id;
        let mut dst = loop {
            match self.ast.kind(current) {
                NodeKind::Integer => {
                    let value = self.literal(current).ok_or_else(|| self.malformed(current))?;
                    break self.materialize(Value::Const(value));
                }
                NodeKind::Identifier => {
                    let (name, span) = self.lexeme(current);
                    let symbol = self
                        .state
                        .symbols
                        .get_mut(Some(SymbolKind::Variable), name)
                        .ok_or_else(|| SemanticError::Undeclared {
                            name: name.to_string(),
                            span,
                        })?;
                    symbol.use_amount += 1;
                    let unassigned = symbol.set_amount == 0;
                    if unassigned {
                        self.state.warn_uninitialized(name, Some(span));
                    }
                    let reg = self.state.registers.acquire();
                    self.code.push(Instruction::Load {
                        name: name.to_string(),
                        dst: reg.id(),
                    });
                    break reg;
                }
                NodeKind::Assign => {
                    let &[lhs, rhs] = self.ast.children(current) else {
                        return Err(self.malformed(current));
                    };
                    if matches!(self.ast.kind(lhs), NodeKind::Identifier | NodeKind::Integer) {
                        let value = self.lower_assign(current)?;
                        break self.materialize(value);
                    }
                    // the stored value is computed before the target
                    let value = self.lower_value(rhs)?;
                    pending.push(Pending::Store(value));
                    current = lhs;
                }
                kind => {
                    let op = match kind {
                        NodeKind::Add => ArithOp::Add,
                        NodeKind::Sub => ArithOp::Sub,
                        NodeKind::Mul => ArithOp::Mul,
                        NodeKind::Div => ArithOp::Div,
                        _ => {
                            let (found, span) = self.lexeme(current);
                            return Err(SemanticError::Unsupported {
                                found: found.to_string(),
                                span,
                            }
                            .into());
                        }
                    };
                    let &[lhs, rhs] = self.ast.children(current) else {
                        return Err(self.malformed(current));
                    };
                    pending.push(Pending::Arith(op, rhs));
                    current = lhs;
                }
            }
        };

        while let Some(step) = pending.pop() {
            match step {
                Pending::Arith(op, rhs) => {
                    let rhs = self.lower_value(rhs)?;
                    self.code.push(Instruction::Arith {
                        op,
                        lhs: Operand::Reg(dst.id()),
                        rhs: rhs.operand(),
                        dst: dst.id(),
                    });
                    self.release(rhs)?;
                }
                Pending::Store(value) => {
                    self.code.push(Instruction::Store {
                        dst: Place::Reg(dst.id()),
                        src: value.operand(),
                    });
                    self.state.registers.release(dst)?;
                    dst = self.materialize(value);
                }
            }
        }
        Ok(dst)
    }

    /// Move a constant into a fresh register; registers pass through
    fn materialize(
        &mut self,
        value: Value,
    ) -> Reg {
        match value {
            Value::Reg(reg) => reg,
            Value::Const(value) => {
                let reg = self.state.registers.acquire();
                self.code.push(Instruction::Move {
                    dst: reg.id(),
                    value,
                });
                reg
            }
        }
    }

    fn literal(
        &self,
        id: NodeId,
    ) -> Option<u64> {
        match self.ast.token(id).map(|t| t.kind) {
            Some(TokenKind::Integer(value)) if self.ast.kind(id) == NodeKind::Integer => Some(value),
            _ => None,
        }
    }

    fn malformed(
        &self,
        id: NodeId,
    ) -> CompileError {
        let (text, span) = self.lexeme(id);
        CompileError::Internal(format!("malformed `{}` node at {}", text, span))
    }
}
