//! Core intermediate representation
//!
//! DOIL instructions, the virtual register pool, the symbol table, and the
//! lowering from the AST. The optimizer in [`crate::middle::passes`] builds on
//! these.

pub mod ir;
pub mod ir_gen;
pub mod registers;
pub mod symbols;

pub use ir::*;
pub use ir_gen::{lower, SemanticError};
pub use registers::{Reg, RegId, RegValue, RegisterError, RegisterPool};
pub use symbols::{Identifier, SymbolError, SymbolKind, SymbolTable};
