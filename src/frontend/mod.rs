//! Frontend compilation pipeline
//!
//! This module contains the lexer, parser, configuration and the compiler
//! facade that drives source text through lowering and optimization.

use crate::frontend::config::CompileConfig;
use crate::frontend::core::lexer::{source_text, split_statements, tokenize, LexError, Token};
use crate::frontend::core::parser::{Ast, ParseError};
use crate::frontend::pipeline::Pipeline;
use crate::frontend::state::CompilationState;
use crate::middle::core::ir::{render, Instruction};
use crate::middle::core::ir_gen::SemanticError;
use crate::middle::core::registers::RegisterError;
use crate::middle::core::symbols::{SymbolError, SymbolTable};
use crate::middle::passes::{OptimizeError, OptimizeStats};
use crate::util::diagnostic::{Diagnostic, Result};
use thiserror::Error;
use tracing::debug;

pub mod config;
pub mod core;
pub mod pipeline;
pub mod state;

/// Compilation errors; the first one aborts the compilation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("semantic error: {0}")]
    Semantic(#[from] SemanticError),

    #[error("optimizer error: {0}")]
    Optimize(#[from] OptimizeError),

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("internal compiler error: {0}")]
    Internal(String),
}

impl From<RegisterError> for CompileError {
    fn from(e: RegisterError) -> Self {
        CompileError::Internal(e.to_string())
    }
}

impl From<SymbolError> for CompileError {
    fn from(e: SymbolError) -> Self {
        CompileError::Internal(e.to_string())
    }
}

/// Output of a successful compilation
#[derive(Debug)]
pub struct Compilation {
    pub code: Vec<Instruction>,
    pub warnings: Vec<Diagnostic>,
    pub symbols: SymbolTable,
    pub stats: OptimizeStats,
}

impl Compilation {
    /// DOIL text of the compiled code
    pub fn doil(&self) -> String {
        render(&self.code)
    }
}

/// Compiler context
#[derive(Debug, Default)]
pub struct Compiler {
    config: CompileConfig,
}

impl Compiler {
    /// Create a new compiler
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CompileConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Compile a source buffer to DOIL
    pub fn compile(
        &self,
        source: &[u8],
    ) -> Result<Compilation> {
        debug!("Compiling source code ({} bytes)", source.len());
        let mut state = CompilationState::new();
        let mut pipeline = Pipeline::new(self.config.clone());
        let (code, stats) = pipeline.run(source, &mut state)?;
        debug!(
            "Compilation finished: {} instructions, {} warnings",
            code.len(),
            state.diagnostics.len()
        );
        Ok(Compilation {
            code,
            warnings: state.diagnostics,
            symbols: state.symbols,
            stats,
        })
    }

    /// Token stream only
    pub fn lex<'src>(
        &self,
        source: &'src [u8],
    ) -> Result<Vec<Token<'src>>> {
        Ok(tokenize(source_text(source)?)?)
    }

    /// Parse only
    pub fn parse<'src>(
        &self,
        source: &'src [u8],
    ) -> Result<Ast<'src>> {
        let statements = split_statements(source_text(source)?)?;
        let mut state = CompilationState::new();
        crate::frontend::core::parser::parse(&statements, &mut state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::config::OptLevel;

    #[test]
    fn test_compile_to_doil() {
        let compilation = Compiler::new()
            .compile(b"data: i4 x; logic: x = 2 + 3 * 4; ret x;")
            .unwrap();
        assert_eq!(compilation.doil(), "ret 14\n");
        assert!(compilation.warnings.is_empty());
        assert!(compilation.symbols.is_empty());
    }

    #[test]
    fn test_unoptimized_keeps_declarations() {
        let compiler = Compiler::with_config(CompileConfig::new().with_opt_level(OptLevel::O0));
        let compilation = compiler.compile(b"data: i4 x; logic: ret 1;").unwrap();
        assert_eq!(compilation.doil(), "def x dword\nret 1\n");
        assert_eq!(compilation.symbols.len(), 1);
    }

    #[test]
    fn test_error_categories() {
        let compiler = Compiler::new();
        assert!(matches!(compiler.compile(b"x = 1 # 2;"), Err(CompileError::Lex(_))));
        assert!(matches!(compiler.compile(b"data: x;"), Err(CompileError::Parse(_))));
        assert!(matches!(compiler.compile(b"ret y;"), Err(CompileError::Semantic(_))));
        assert!(matches!(
            compiler.compile(b"data: i4 x; logic: x = 1 / 0; ret x;"),
            Err(CompileError::Optimize(OptimizeError::DivisionByZero { .. }))
        ));
        assert!(matches!(compiler.compile(&[0x66, 0xff]), Err(CompileError::Lex(_))));
    }

    #[test]
    fn test_error_messages_name_lexeme() {
        let err = Compiler::new().compile(b"data: i4 x;\nlogic: x = z;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "semantic error: use of undeclared variable `z` at 2:12"
        );
    }

    #[test]
    fn test_lex_and_parse_helpers() {
        let compiler = Compiler::new();
        let tokens = compiler.lex(b"data: i4 x;").unwrap();
        assert_eq!(tokens.len(), 3);
        let ast = compiler.parse(b"ret 1 + 2;").unwrap();
        assert_eq!(ast.to_string(), "(ret (+ 1 2))\n");
    }
}
