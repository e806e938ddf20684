//! Lexer tests module
//!
//! - basic: identifiers, integers, whitespace
//! - keywords: type, control and segment keywords
//! - operators: operators and punctuation
//! - errors: lexical error reporting

mod keywords;
