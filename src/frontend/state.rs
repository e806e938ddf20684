//! Compilation state
//!
//! Everything that one compilation mutates across stages: the segment mode
//! (parser), the symbol table and register pool (lowering, optimizer), and the
//! warnings collected along the way.

use crate::middle::core::registers::RegisterPool;
use crate::middle::core::symbols::SymbolTable;
use crate::util::diagnostic::{codes, Diagnostic};
use crate::util::span::Span;

/// Segment mode selecting the grammar of the following statements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Segment {
    #[default]
    Logic,
    Data,
    System,
    Layout,
}

/// Per-compilation mutable state, threaded through parser, lowering and optimizer
#[derive(Debug, Default)]
pub struct CompilationState {
    pub segment: Segment,
    pub symbols: SymbolTable,
    pub registers: RegisterPool,
    pub diagnostics: Vec<Diagnostic>,
}

impl CompilationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a warning and log it
    pub fn warn(
        &mut self,
        diagnostic: Diagnostic,
    ) {
        tracing::warn!("{}", diagnostic);
        self.diagnostics.push(diagnostic);
    }

    /// Warn that `name` is read before any store reaches it, once per variable
    pub fn warn_uninitialized(
        &mut self,
        name: &str,
        span: Option<Span>,
    ) {
        let message = format!("variable `{}` is read before it is assigned", name);
        let seen = self
            .diagnostics
            .iter()
            .any(|d| d.code == codes::UNINITIALIZED_READ && d.message == message);
        if !seen {
            self.warn(Diagnostic::warning(codes::UNINITIALIZED_READ, message, span));
        }
    }
}
