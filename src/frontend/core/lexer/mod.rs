//! Lexer module
//! Tokenizer, token types and statement segmentation

pub mod statements;
pub mod tokenizer;
pub mod tokens;

#[cfg(test)]
mod tests;

// Re-export types
pub use statements::{split_statements, Statement};
pub use tokenizer::{Lexer, Scan};
pub use tokens::{LexError, Operator, Token, TokenKind};

/// Validate that the source buffer is UTF-8 and view it as text
pub fn source_text(source: &[u8]) -> Result<&str, LexError> {
    std::str::from_utf8(source).map_err(|e| LexError::InvalidUtf8 {
        offset: e.valid_up_to(),
    })
}

/// Tokenize source code into a flat token list (terminators dropped)
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, LexError> {
    tracing::debug!("Tokenizing source ({} bytes)", source.len());

    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        match lexer.next_token()? {
            Scan::Token(token) => {
                log_token(&token);
                tokens.push(token);
            }
            Scan::Terminator => {}
            Scan::Eof => break,
        }
    }

    tracing::debug!("Tokenized into {} tokens", tokens.len());
    Ok(tokens)
}

/// Log a token for debugging
fn log_token(token: &Token<'_>) {
    match token.kind {
        TokenKind::Operator(op) => tracing::debug!(
            "token {} (precedence {}) at {}",
            token.text,
            op.precedence(),
            token.span
        ),
        _ => tracing::debug!("token {:?} `{}` at {}", token.kind, token.text, token.span),
    }
}
