//! Diagnostics
//!
//! - [`error`] - diagnostic data structures (Diagnostic, Severity)
//! - [`result`] - crate-wide Result alias

pub mod error;
pub mod result;

pub use error::{codes, Diagnostic, Severity};
pub use result::Result;
