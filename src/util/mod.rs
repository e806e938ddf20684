//! Utility types and functions

pub mod diagnostic;
pub mod logger;
pub mod span;
