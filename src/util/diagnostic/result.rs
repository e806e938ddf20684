//! Crate-wide Result type
//!
//! Every compilation stage reports through `CompileError`.

use crate::frontend::CompileError;

/// Unified result type
pub type Result<T, E = CompileError> = std::result::Result<T, E>;
