//! DOIL executor
//!
//! Runs straight-line DOIL on 64-bit unsigned values. Variables come into
//! existence at their `def` with value 0; registers must be written before
//! they are read.

use crate::middle::core::ir::{Instruction, Operand, Place};
use crate::middle::core::registers::RegId;
use crate::vm::errors::{VmError, VmResult};
use std::collections::HashMap;
use tracing::debug;

/// VM configuration
#[derive(Debug, Clone, Default)]
pub struct VmConfig {
    /// Log every executed instruction at DEBUG
    pub trace_execution: bool,
}

/// Register file
#[derive(Debug, Clone, Default)]
struct RegisterFile {
    regs: Vec<Option<u64>>,
}

impl RegisterFile {
    fn read(
        &self,
        id: RegId,
    ) -> VmResult<u64> {
        self.regs
            .get(id.0)
            .copied()
            .flatten()
            .ok_or(VmError::UnsetRegister(id.0))
    }

    fn write(
        &mut self,
        id: RegId,
        value: u64,
    ) {
        if id.0 >= self.regs.len() {
            self.regs.resize(id.0 + 1, None);
        }
        self.regs[id.0] = Some(value);
    }
}

/// DOIL virtual machine
#[derive(Debug, Default)]
pub struct Vm {
    config: VmConfig,
    registers: RegisterFile,
    variables: HashMap<String, u64>,
}

impl Vm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: VmConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Current value of a declared variable
    pub fn variable(
        &self,
        name: &str,
    ) -> Option<u64> {
        self.variables.get(name).copied()
    }

    fn operand(
        &self,
        operand: Operand,
    ) -> VmResult<u64> {
        match operand {
            Operand::Reg(id) => self.registers.read(id),
            Operand::Const(value) => Ok(value),
        }
    }

    /// Execute until the first `ret`, returning its value.
    /// Running off the end returns `None`.
    pub fn execute(
        &mut self,
        code: &[Instruction],
    ) -> VmResult<Option<u64>> {
        self.registers = RegisterFile::default();
        self.variables.clear();

        for inst in code {
            if self.config.trace_execution {
                debug!("exec {}", inst);
            }
            match inst {
                Instruction::Def { name, .. } => {
                    self.variables.insert(name.clone(), 0);
                }
                Instruction::Arith { op, lhs, rhs, dst } => {
                    let a = self.operand(*lhs)?;
                    let b = self.operand(*rhs)?;
                    let value = op
                        .apply(a, b)
                        .ok_or_else(|| VmError::DivisionByZero(inst.to_string()))?;
                    self.registers.write(*dst, value);
                }
                Instruction::Move { dst, value } => self.registers.write(*dst, *value),
                Instruction::Store { dst, src } => {
                    let value = self.operand(*src)?;
                    match dst {
                        Place::Reg(id) => self.registers.write(*id, value),
                        Place::Var(name) => match self.variables.get_mut(name) {
                            Some(slot) => *slot = value,
                            None => return Err(VmError::UndeclaredVariable(name.clone())),
                        },
                    }
                }
                Instruction::Load { name, dst } => {
                    let value = self
                        .variable(name)
                        .ok_or_else(|| VmError::UndeclaredVariable(name.clone()))?;
                    self.registers.write(*dst, value);
                }
                Instruction::Ret(operand) => {
                    return operand.map(|op| self.operand(op)).transpose();
                }
            }
        }
        Ok(None)
    }
}
