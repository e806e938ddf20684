//! dato: a compiler front end for a small segmented low-level language
//!
//! Source text is tokenized, split into statements, parsed into an arena AST,
//! lowered to the DOIL register IR and optimized to a fixed point.
//!
//! # Example
//!
//! ```dato
//! data:
//!     i4 x;
//! logic:
//!     x = 2 + 3 * 4;
//!     ret x;
//! ```
//!
//! compiles to the single DOIL instruction `ret 14`.

#![warn(rust_2018_idioms)]

// Public modules
pub mod backends;
pub mod frontend;
pub mod middle;
pub mod vm;

// Utility modules
pub mod util;

// Re-exports
pub use anyhow::Context;
pub use frontend::{Compilation, CompileError, Compiler};
pub use thiserror::Error;

use tracing::debug;

/// Compiler version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compiler name
pub const NAME: &str = "dato";

/// Compile a source buffer to optimized DOIL text
///
/// # Example
///
/// ```
/// let doil = dato::compile(b"data: i4 x; logic: x = 2 + 3 * 4; ret x;").unwrap();
/// assert_eq!(doil, "ret 14\n");
/// ```
pub fn compile(source: &[u8]) -> util::diagnostic::Result<String> {
    Ok(Compiler::new().compile(source)?.doil())
}

/// Compile and evaluate a source buffer, returning the program's `ret` value
///
/// # Example
///
/// ```
/// # fn main() -> anyhow::Result<()> {
/// assert_eq!(dato::run(b"ret 6 / 4 + 1;")?, Some(2));
/// # Ok(())
/// # }
/// ```
pub fn run(source: &[u8]) -> anyhow::Result<Option<u64>> {
    let compilation = Compiler::new().compile(source)?;
    debug!("Executing {} instructions", compilation.code.len());
    let value = vm::Vm::new().execute(&compilation.code)?;
    debug!("Program returned {:?}", value);
    Ok(value)
}
