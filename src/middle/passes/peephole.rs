//! Forward peephole pass
//!
//! One linear walk over the program with the symbolic value of every register
//! (unknown, a literal, or an alias of a variable) and the last value stored to
//! each variable. Use/def counts are recomputed from the instructions before
//! the walk so no count from an earlier round leaks into this one.

use crate::frontend::state::CompilationState;
use crate::middle::core::ir::{ArithOp, Instruction, Operand, Place};
use crate::middle::core::registers::{RegValue, RegisterPool};
use crate::middle::core::symbols::{SymbolKind, SymbolTable};
use crate::middle::passes::{OptimizeError, Pass};
use crate::util::diagnostic::Result;
use std::collections::HashMap;

pub struct Peephole;

/// Recompute `use_amount`, `set_amount` and `first_value` from `code`
pub fn recount(
    code: &[Instruction],
    symbols: &mut SymbolTable,
) {
    for id in symbols.iter_mut() {
        id.use_amount = 0;
        id.set_amount = 0;
        id.first_value = None;
    }
    for inst in code {
        match inst {
            Instruction::Def { name, size } => {
                symbols.add(SymbolKind::Variable, name).size = Some(*size);
            }
            Instruction::Load { name, .. } => {
                symbols.add(SymbolKind::Variable, name).use_amount += 1;
            }
            Instruction::Store {
                dst: Place::Var(name),
                src,
            } => {
                let id = symbols.add(SymbolKind::Variable, name);
                id.set_amount += 1;
                id.first_value = match (id.set_amount, src) {
                    (1, Operand::Const(value)) => Some(*value),
                    _ => None,
                };
            }
            _ => {}
        }
    }
}

fn resolve(
    registers: &RegisterPool,
    operand: Operand,
) -> Operand {
    match operand {
        Operand::Reg(id) => match registers.value(id) {
            RegValue::Literal(value) => Operand::Const(*value),
            _ => operand,
        },
        Operand::Const(_) => operand,
    }
}

fn uses(
    symbols: &SymbolTable,
    name: &str,
) -> usize {
    symbols
        .get(Some(SymbolKind::Variable), name)
        .map_or(0, |id| id.use_amount)
}

fn consume_use(
    symbols: &mut SymbolTable,
    name: &str,
) {
    if let Some(id) = symbols.get_mut(Some(SymbolKind::Variable), name) {
        id.use_amount = id.use_amount.saturating_sub(1);
    }
}

impl Pass for Peephole {
    fn run(
        &self,
        code: &mut Vec<Instruction>,
        state: &mut CompilationState,
    ) -> Result<usize> {
        recount(code, &mut state.symbols);
        state.registers.reset_values();

        // last value stored to each variable; present once a store was passed
        let mut stored: HashMap<String, Option<u64>> = HashMap::new();
        let mut changes = 0;
        let mut out = Vec::with_capacity(code.len());

        for inst in code.drain(..) {
            match inst {
                Instruction::Def { ref name, .. } => {
                    if uses(&state.symbols, name) == 0 {
                        changes += 1;
                        continue;
                    }
                    out.push(inst);
                }
                Instruction::Arith { op, lhs, rhs, dst } => {
                    let lhs_now = resolve(&state.registers, lhs);
                    let rhs_now = resolve(&state.registers, rhs);
                    if op == ArithOp::Div && rhs_now == Operand::Const(0) {
                        return Err(OptimizeError::DivisionByZero {
                            instruction: Instruction::Arith { op, lhs, rhs, dst }.to_string(),
                        }
                        .into());
                    }
                    if let (Operand::Const(a), Operand::Const(b)) = (lhs_now, rhs_now) {
                        let value = op.apply(a, b).ok_or_else(|| OptimizeError::DivisionByZero {
                            instruction: Instruction::Arith { op, lhs, rhs, dst }.to_string(),
                        })?;
                        state.registers.set_value(dst, RegValue::Literal(value));
                        out.push(Instruction::Move { dst, value });
                        changes += 1;
                        continue;
                    }
                    if (lhs_now, rhs_now) != (lhs, rhs) {
                        changes += 1;
                    }
                    state.registers.set_value(dst, RegValue::Unknown);
                    out.push(Instruction::Arith {
                        op,
                        lhs: lhs_now,
                        rhs: rhs_now,
                        dst,
                    });
                }
                Instruction::Move { dst, value } => {
                    state.registers.set_value(dst, RegValue::Literal(value));
                    out.push(inst);
                }
                Instruction::Load { name, dst } => {
                    let current = stored.get(&name);
                    let redundant = match state.registers.value(dst) {
                        RegValue::Variable(alias) => *alias == name,
                        RegValue::Literal(value) => current == Some(&Some(*value)),
                        RegValue::Unknown => false,
                    };
                    if redundant {
                        consume_use(&mut state.symbols, &name);
                        changes += 1;
                        continue;
                    }

                    let propagated = state
                        .symbols
                        .get(Some(SymbolKind::Variable), &name)
                        .filter(|id| id.set_amount == 1 && current.is_some())
                        .and_then(|id| id.first_value);
                    if let Some(value) = propagated {
                        consume_use(&mut state.symbols, &name);
                        state.registers.set_value(dst, RegValue::Literal(value));
                        out.push(Instruction::Move { dst, value });
                        changes += 1;
                        continue;
                    }

                    if current.is_none() {
                        state.warn_uninitialized(&name, None);
                    }
                    state.registers.set_value(dst, RegValue::Variable(name.clone()));
                    out.push(Instruction::Load { name, dst });
                }
                Instruction::Store { dst, src } => {
                    let src_now = resolve(&state.registers, src);
                    if src_now != src {
                        changes += 1;
                    }
                    match dst {
                        Place::Var(name) => {
                            if uses(&state.symbols, &name) == 0 {
                                changes += 1;
                                continue;
                            }
                            state.registers.invalidate_variable(&name);
                            let value = match src_now {
                                Operand::Const(value) => Some(value),
                                Operand::Reg(id) => {
                                    if *state.registers.value(id) == RegValue::Unknown {
                                        state.registers.set_value(id, RegValue::Variable(name.clone()));
                                    }
                                    None
                                }
                            };
                            stored.insert(name.clone(), value);
                            out.push(Instruction::Store {
                                dst: Place::Var(name),
                                src: src_now,
                            });
                        }
                        Place::Reg(id) => {
                            let value = match src_now {
                                Operand::Const(value) => RegValue::Literal(value),
                                Operand::Reg(src_id) => state.registers.value(src_id).clone(),
                            };
                            state.registers.set_value(id, value);
                            out.push(Instruction::Store {
                                dst: Place::Reg(id),
                                src: src_now,
                            });
                        }
                    }
                }
                Instruction::Ret(operand) => {
                    let operand_now = operand.map(|op| resolve(&state.registers, op));
                    if operand_now != operand {
                        changes += 1;
                    }
                    out.push(Instruction::Ret(operand_now));
                }
            }
        }

        *code = out;
        Ok(changes)
    }

    fn name(&self) -> &'static str {
        "peephole"
    }
}
