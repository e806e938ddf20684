//! Dead register write elimination
//!
//! Walks the program backwards with the set of registers that are read later.
//! A `mov`, `get`, arithmetic result or register store whose destination is
//! not in that set is never observed and is removed.

use crate::frontend::state::CompilationState;
use crate::middle::core::ir::Instruction;
use crate::middle::core::registers::RegId;
use crate::middle::passes::Pass;
use crate::util::diagnostic::Result;
use std::collections::HashSet;

pub struct DeadWrites;

impl Pass for DeadWrites {
    fn run(
        &self,
        code: &mut Vec<Instruction>,
        _state: &mut CompilationState,
    ) -> Result<usize> {
        let mut live: HashSet<RegId> = HashSet::new();
        let mut keep = vec![true; code.len()];

        for (index, inst) in code.iter().enumerate().rev() {
            if let Some(dst) = inst.writes() {
                if !live.remove(&dst) {
                    keep[index] = false;
                    continue;
                }
            }
            live.extend(inst.reads());
        }

        let removed = keep.iter().filter(|k| !**k).count();
        if removed > 0 {
            let mut flags = keep.into_iter();
            code.retain(|_| flags.next().unwrap_or(true));
        }
        Ok(removed)
    }

    fn name(&self) -> &'static str {
        "dead-writes"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middle::core::ir::{render, ArithOp, Operand, Place};

    #[test]
    fn test_unread_writes_removed() {
        let mut code = vec![
            Instruction::Move {
                dst: RegId(0),
                value: 1,
            },
            Instruction::Move {
                dst: RegId(1),
                value: 2,
            },
            Instruction::Arith {
                op: ArithOp::Add,
                lhs: Operand::Reg(RegId(1)),
                rhs: Operand::Const(3),
                dst: RegId(1),
            },
            Instruction::Store {
                dst: Place::Var("x".into()),
                src: Operand::Reg(RegId(1)),
            },
        ];
        let mut state = CompilationState::new();
        assert_eq!(DeadWrites.run(&mut code, &mut state).unwrap(), 1);
        assert_eq!(render(&code), "mov r1 2\nadd r1 3 r1\nset x r1\n");
    }

    #[test]
    fn test_overwritten_before_read() {
        let mut code = vec![
            Instruction::Load {
                name: "x".into(),
                dst: RegId(0),
            },
            Instruction::Move {
                dst: RegId(0),
                value: 9,
            },
            Instruction::Ret(Some(Operand::Reg(RegId(0)))),
        ];
        let mut state = CompilationState::new();
        assert_eq!(DeadWrites.run(&mut code, &mut state).unwrap(), 1);
        assert_eq!(render(&code), "mov r0 9\nret r0\n");
    }
}
