//! Optimization passes
//!
//! The [`PassManager`] reruns its passes over the instruction list until a
//! full round changes nothing. Two passes make up the default pipeline:
//!
//! 1. [`Peephole`] - forward walk doing constant folding, load forwarding,
//!    single-assignment constant propagation and dead declaration/store removal.
//! 2. [`DeadWrites`] - backward liveness sweep removing register writes
//!    nothing reads.

pub mod dead_writes;
pub mod peephole;
#[cfg(test)]
mod tests;

pub use dead_writes::DeadWrites;
pub use peephole::Peephole;

use crate::frontend::state::CompilationState;
use crate::middle::core::ir::Instruction;
use crate::middle::core::symbols::SymbolKind;
use crate::util::diagnostic::Result;
use std::collections::HashSet;

/// Default bound on optimization rounds
pub const DEFAULT_MAX_PASSES: usize = 64;

/// Fatal optimizer errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptimizeError {
    #[error("division by zero in `{instruction}`")]
    DivisionByZero { instruction: String },
    #[error("no fixed point reached after {limit} passes")]
    PassLimit { limit: usize },
}

/// An optimization pass over the whole program
pub trait Pass {
    /// Rewrite `code` in place, returning the number of changes made
    fn run(
        &self,
        code: &mut Vec<Instruction>,
        state: &mut CompilationState,
    ) -> Result<usize>;

    fn name(&self) -> &'static str;
}

/// What an optimization run did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OptimizeStats {
    /// Rounds run, including the final round that changed nothing
    pub passes: usize,
    /// Total rewrites
    pub changes: usize,
}

/// Runs passes to a fixed point
pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
    max_passes: usize,
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PassManager {
    /// Manager with no passes
    pub fn empty() -> Self {
        Self {
            passes: Vec::new(),
            max_passes: DEFAULT_MAX_PASSES,
        }
    }

    /// Manager with the default peephole pipeline
    pub fn new() -> Self {
        let mut manager = Self::empty();
        manager.add_pass(Box::new(Peephole));
        manager.add_pass(Box::new(DeadWrites));
        manager
    }

    pub fn with_max_passes(
        mut self,
        max_passes: usize,
    ) -> Self {
        self.max_passes = max_passes;
        self
    }

    pub fn add_pass(
        &mut self,
        pass: Box<dyn Pass>,
    ) {
        self.passes.push(pass);
    }

    /// Run every pass repeatedly until a round makes no change
    pub fn run(
        &self,
        code: &mut Vec<Instruction>,
        state: &mut CompilationState,
    ) -> Result<OptimizeStats> {
        let mut stats = OptimizeStats::default();
        while stats.passes < self.max_passes {
            stats.passes += 1;
            let mut round = 0;
            for pass in &self.passes {
                let changes = pass.run(code, state)?;
                tracing::debug!(
                    "Pass {} round {}: {} change(s)",
                    pass.name(),
                    stats.passes,
                    changes
                );
                round += changes;
            }
            stats.changes += round;
            if round == 0 {
                prune_symbols(code, state)?;
                tracing::debug!(
                    "Fixed point after {} round(s), {} change(s), {} instruction(s) left",
                    stats.passes,
                    stats.changes,
                    code.len()
                );
                return Ok(stats);
            }
        }
        Err(OptimizeError::PassLimit {
            limit: self.max_passes,
        }
        .into())
    }
}

/// Optimize with the default pipeline
pub fn optimize(
    code: &mut Vec<Instruction>,
    state: &mut CompilationState,
    max_passes: usize,
) -> Result<OptimizeStats> {
    PassManager::new().with_max_passes(max_passes).run(code, state)
}

/// Drop variables whose declaration was optimized away
fn prune_symbols(
    code: &[Instruction],
    state: &mut CompilationState,
) -> Result<()> {
    let declared: HashSet<&str> = code
        .iter()
        .filter_map(|inst| match inst {
            Instruction::Def { name, .. } => Some(name.as_str()),
            _ => None,
        })
        .collect();
    let dead: Vec<String> = state
        .symbols
        .iter()
        .filter(|id| id.kind == SymbolKind::Variable && !declared.contains(id.name.as_str()))
        .map(|id| id.name.clone())
        .collect();
    for name in dead {
        state.symbols.remove(SymbolKind::Variable, &name)?;
    }
    Ok(())
}
