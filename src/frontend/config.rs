//! 编译配置
//!
//! Compiler options: optimization level, pass bound and which diagnostics to
//! show. Stored as RON; fields missing from a file take their defaults.
//!
//! ```ron
//! (
//!     opt_level: O0,
//!     max_passes: 16,
//! )
//! ```

use crate::middle::passes::DEFAULT_MAX_PASSES;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// 优化级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OptLevel {
    /// 不优化
    O0,
    /// Fixed-point peephole optimization
    #[default]
    O1,
}

impl std::fmt::Display for OptLevel {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            OptLevel::O0 => write!(f, "O0"),
            OptLevel::O1 => write!(f, "O1"),
        }
    }
}

/// 诊断级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum DiagLevel {
    /// 不显示诊断
    None,
    /// 只显示错误
    Errors,
    /// 显示错误和警告
    #[default]
    Warnings,
}

impl std::fmt::Display for DiagLevel {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            DiagLevel::None => write!(f, "none"),
            DiagLevel::Errors => write!(f, "errors"),
            DiagLevel::Warnings => write!(f, "warnings"),
        }
    }
}

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("cannot write config: {0}")]
    Serialize(#[from] ron::Error),
}

/// 编译配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileConfig {
    /// 优化级别
    pub opt_level: OptLevel,
    /// Upper bound on optimizer rounds
    pub max_passes: usize,
    /// 诊断级别
    pub diag_level: DiagLevel,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            opt_level: OptLevel::default(),
            max_passes: DEFAULT_MAX_PASSES,
            diag_level: DiagLevel::default(),
        }
    }
}

impl CompileConfig {
    /// 创建默认配置
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_ron_str(&text)?;
        tracing::debug!("Loaded config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    pub fn to_ron_string(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(
            self,
            ron::ser::PrettyConfig::default(),
        )?)
    }

    /// 设置优化级别
    pub fn with_opt_level(
        mut self,
        level: OptLevel,
    ) -> Self {
        self.opt_level = level;
        self
    }

    pub fn with_max_passes(
        mut self,
        max_passes: usize,
    ) -> Self {
        self.max_passes = max_passes;
        self
    }

    /// 设置诊断级别
    pub fn with_diag_level(
        mut self,
        level: DiagLevel,
    ) -> Self {
        self.diag_level = level;
        self
    }

    /// 是否显示错误
    pub fn should_show_errors(&self) -> bool {
        self.diag_level >= DiagLevel::Errors
    }

    /// 是否显示警告
    pub fn should_show_warnings(&self) -> bool {
        self.diag_level >= DiagLevel::Warnings
    }
}
