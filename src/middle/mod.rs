//! Intermediate representation and optimization
//!
//! - [`core`] - DOIL instructions, registers, symbol table, AST lowering
//! - [`passes`] - fixed-point peephole optimizer

pub mod core;
pub mod passes;

pub use self::core::ir::{render, Instruction};
pub use self::core::ir_gen::lower;
pub use passes::{optimize, OptimizeError, OptimizeStats, PassManager};
