//! Output backends
//!
//! A backend turns optimized DOIL into the compiler's final output:
//!
//! ```text
//!   Vec<Instruction>
//!         |
//!   +-----+------+--------+
//!   |            |        |
//!  DOIL text   JSON    native (not implemented)
//! ```

use crate::frontend::CompileError;
use crate::middle::core::ir::{render, Instruction};
use crate::util::diagnostic::Result;

/// Emits compiled code in some output format
pub trait Backend {
    /// Backend name as accepted on the command line
    fn name(&self) -> &'static str;

    fn emit(
        &self,
        code: &[Instruction],
    ) -> Result<String>;
}

/// Line-based DOIL text
#[derive(Debug, Default, Clone, Copy)]
pub struct DoilBackend;

impl Backend for DoilBackend {
    fn name(&self) -> &'static str {
        "doil"
    }

    fn emit(
        &self,
        code: &[Instruction],
    ) -> Result<String> {
        Ok(render(code))
    }
}

/// Instructions as a JSON array
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonBackend {
    pub pretty: bool,
}

impl Backend for JsonBackend {
    fn name(&self) -> &'static str {
        "json"
    }

    fn emit(
        &self,
        code: &[Instruction],
    ) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(code)
        } else {
            serde_json::to_string(code)
        };
        json.map_err(|e| CompileError::Internal(format!("JSON serialization failed: {}", e)))
    }
}

/// Machine code generation; the project does not implement it
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeBackend;

impl Backend for NativeBackend {
    fn name(&self) -> &'static str {
        "native"
    }

    fn emit(
        &self,
        _code: &[Instruction],
    ) -> Result<String> {
        Err(CompileError::Unsupported(
            "native code generation is not implemented".to_string(),
        ))
    }
}

/// Look up a backend by name
pub fn by_name(name: &str) -> Option<Box<dyn Backend>> {
    match name {
        "doil" => Some(Box::new(DoilBackend)),
        "json" => Some(Box::new(JsonBackend { pretty: true })),
        "native" => Some(Box::new(NativeBackend)),
        _ => None,
    }
}
