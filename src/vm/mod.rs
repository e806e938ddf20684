//! DOIL virtual machine
//!
//! Evaluates compiled programs so optimized and unoptimized output can be
//! compared by result.

pub use errors::{VmError, VmResult};
pub use executor::{Vm, VmConfig};

mod errors;
mod executor;
