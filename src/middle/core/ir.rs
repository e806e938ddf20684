//! DOIL intermediate representation
//!
//! A flat, branch-free list of three-address instructions over virtual
//! registers and named variables. The text rendering is one instruction per
//! line and is what tests compare against.

use crate::middle::core::registers::RegId;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;

/// Storage width of a declared variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum SizeClass {
    Byte,
    Word,
    Dword,
    Qword,
}

impl SizeClass {
    /// Size class of a type keyword; signed and unsigned share a class
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "i1" | "u1" => Some(SizeClass::Byte),
            "i2" | "u2" => Some(SizeClass::Word),
            "i4" | "u4" => Some(SizeClass::Dword),
            "i8" | "u8" | "ptr" => Some(SizeClass::Qword),
            _ => None,
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            SizeClass::Byte => 1,
            SizeClass::Word => 2,
            SizeClass::Dword => 4,
            SizeClass::Qword => 8,
        }
    }
}

impl fmt::Display for SizeClass {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let name = match self {
            SizeClass::Byte => "byte",
            SizeClass::Word => "word",
            SizeClass::Dword => "dword",
            SizeClass::Qword => "qword",
        };
        f.write_str(name)
    }
}

/// Register or constant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Operand {
    Reg(RegId),
    Const(u64),
}

impl Operand {
    #[inline]
    pub fn reg(self) -> Option<RegId> {
        match self {
            Operand::Reg(id) => Some(id),
            Operand::Const(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Operand::Reg(id) => write!(f, "{}", id),
            Operand::Const(value) => write!(f, "{}", value),
        }
    }
}

/// Store destination
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Place {
    Reg(RegId),
    Var(String),
}

impl fmt::Display for Place {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Place::Reg(id) => write!(f, "{}", id),
            Place::Var(name) => f.write_str(name),
        }
    }
}

/// Arithmetic operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl ArithOp {
    pub fn mnemonic(self) -> &'static str {
        match self {
            ArithOp::Add => "add",
            ArithOp::Sub => "sub",
            ArithOp::Mul => "mul",
            ArithOp::Div => "div",
        }
    }

    /// Evaluate on unsigned 64-bit values with wrapping; `None` on division by zero
    pub fn apply(
        self,
        lhs: u64,
        rhs: u64,
    ) -> Option<u64> {
        match self {
            ArithOp::Add => Some(lhs.wrapping_add(rhs)),
            ArithOp::Sub => Some(lhs.wrapping_sub(rhs)),
            ArithOp::Mul => Some(lhs.wrapping_mul(rhs)),
            ArithOp::Div => lhs.checked_div(rhs),
        }
    }
}

/// DOIL instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Instruction {
    /// Declare a variable
    Def { name: String, size: SizeClass },
    /// `dst = lhs op rhs`
    Arith {
        op: ArithOp,
        lhs: Operand,
        rhs: Operand,
        dst: RegId,
    },
    /// Load a literal
    Move { dst: RegId, value: u64 },
    Store { dst: Place, src: Operand },
    /// Read a variable into a register
    Load { name: String, dst: RegId },
    Ret(Option<Operand>),
}

impl Instruction {
    /// Registers this instruction reads
    pub fn reads(&self) -> SmallVec<[RegId; 2]> {
        let mut regs = SmallVec::new();
        match self {
            Instruction::Arith { lhs, rhs, .. } => {
                regs.extend(lhs.reg());
                regs.extend(rhs.reg());
            }
            Instruction::Store { src, .. } => regs.extend(src.reg()),
            Instruction::Ret(Some(operand)) => regs.extend(operand.reg()),
            _ => {}
        }
        regs
    }

    /// Register this instruction writes, if any
    pub fn writes(&self) -> Option<RegId> {
        match self {
            Instruction::Arith { dst, .. } | Instruction::Move { dst, .. } | Instruction::Load { dst, .. } => {
                Some(*dst)
            }
            Instruction::Store { dst: Place::Reg(dst), .. } => Some(*dst),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            Instruction::Def { name, size } => write!(f, "def {} {}", name, size),
            Instruction::Arith { op, lhs, rhs, dst } => {
                write!(f, "{} {} {} {}", op.mnemonic(), lhs, rhs, dst)
            }
            Instruction::Move { dst, value } => write!(f, "mov {} {}", dst, value),
            Instruction::Store { dst, src } => write!(f, "set {} {}", dst, src),
            Instruction::Load { name, dst } => write!(f, "get {} {}", name, dst),
            Instruction::Ret(Some(operand)) => write!(f, "ret {}", operand),
            Instruction::Ret(None) => f.write_str("ret"),
        }
    }
}

/// Render instructions as DOIL text, one per line
pub fn render(code: &[Instruction]) -> String {
    let mut out = String::new();
    for instruction in code {
        out.push_str(&instruction.to_string());
        out.push('\n');
    }
    out
}
