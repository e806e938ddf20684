//! 编译流水线
//!
//! Runs the stages in order (lex, parse, lower, optimize) over one source
//! buffer and tracks which stage is active. The first error moves the
//! pipeline to `Failed` and is returned unchanged.

use crate::frontend::config::{CompileConfig, OptLevel};
use crate::frontend::core::lexer::{source_text, split_statements};
use crate::frontend::core::parser::parse;
use crate::frontend::state::CompilationState;
use crate::middle::core::ir::Instruction;
use crate::middle::core::ir_gen::lower;
use crate::middle::passes::{optimize, OptimizeStats};
use crate::util::diagnostic::Result;
use tracing::debug;

/// 流水线状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PipelineState {
    /// 空闲状态
    #[default]
    Idle,
    /// 词法分析中
    Lexing,
    /// 语法分析中
    Parsing,
    /// IR 生成中
    Lowering,
    /// 优化中
    Optimizing,
    /// 编译完成
    Completed,
    /// 编译失败
    Failed,
}

impl std::fmt::Display for PipelineState {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            PipelineState::Idle => write!(f, "idle"),
            PipelineState::Lexing => write!(f, "lexing"),
            PipelineState::Parsing => write!(f, "parsing"),
            PipelineState::Lowering => write!(f, "lowering"),
            PipelineState::Optimizing => write!(f, "optimizing"),
            PipelineState::Completed => write!(f, "completed"),
            PipelineState::Failed => write!(f, "failed"),
        }
    }
}

/// 编译流水线
#[derive(Debug, Default)]
pub struct Pipeline {
    config: CompileConfig,
    state: PipelineState,
}

impl Pipeline {
    pub fn new(config: CompileConfig) -> Self {
        Self {
            config,
            state: PipelineState::Idle,
        }
    }

    /// 获取当前状态
    #[inline]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[inline]
    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    fn enter(
        &mut self,
        next: PipelineState,
    ) {
        debug!("pipeline: {} -> {}", self.state, next);
        self.state = next;
    }

    /// Compile `source` into `state`, returning the code and optimizer statistics
    pub fn run(
        &mut self,
        source: &[u8],
        state: &mut CompilationState,
    ) -> Result<(Vec<Instruction>, OptimizeStats)> {
        self.enter(PipelineState::Idle);
        let result = self.run_stages(source, state);
        match &result {
            Ok(_) => self.enter(PipelineState::Completed),
            Err(e) => {
                debug!("pipeline failed while {}: {}", self.state, e);
                self.enter(PipelineState::Failed);
            }
        }
        result
    }

    fn run_stages(
        &mut self,
        source: &[u8],
        state: &mut CompilationState,
    ) -> Result<(Vec<Instruction>, OptimizeStats)> {
        self.enter(PipelineState::Lexing);
        let text = source_text(source)?;
        let statements = split_statements(text)?;
        debug!("{} bytes, {} statements", source.len(), statements.len());

        self.enter(PipelineState::Parsing);
        let ast = parse(&statements, state)?;

        self.enter(PipelineState::Lowering);
        let mut code = lower(&ast, state)?;

        let stats = match self.config.opt_level {
            OptLevel::O0 => OptimizeStats::default(),
            OptLevel::O1 => {
                self.enter(PipelineState::Optimizing);
                optimize(&mut code, state, self.config.max_passes)?
            }
        };
        Ok((code, stats))
    }
}
