//! Core front-end algorithms: tokenizing, statement segmentation and parsing

pub mod lexer;
pub mod parser;

pub use lexer::{split_statements, tokenize};
pub use parser::parse;
