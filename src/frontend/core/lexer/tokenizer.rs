//! Tokenizer implementation
//! Cursor over the source buffer producing one token at a time

use crate::frontend::core::lexer::tokens::*;
use crate::util::span::{Position, Span};

/// Result of a single scan step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scan<'src> {
    Token(Token<'src>),
    /// A `;` was consumed
    Terminator,
    Eof,
}

/// Main lexer structure
pub struct Lexer<'src> {
    source: &'src str,
    offset: usize,
    line: usize,
    column: usize,
}

#[inline]
fn is_letter(b: u8) -> bool {
    b.is_ascii_alphabetic()
}

#[inline]
fn is_digit(b: u8) -> bool {
    b.is_ascii_digit()
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get current position
    pub fn position(&self) -> Position {
        Position::with_offset(self.line, self.column, self.offset)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.offset).copied()
    }

    /// Advance over `len` bytes that contain no line breaks
    fn bump(
        &mut self,
        len: usize,
    ) {
        self.offset += len;
        self.column += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            match b {
                b'\n' => {
                    self.offset += 1;
                    self.line += 1;
                    self.column = 1;
                }
                b' ' | b'\t' | b'\r' => self.bump(1),
                _ => break,
            }
        }
    }

    /// Consume bytes while `pred` holds, returning the end offset
    fn eat_while(
        &mut self,
        pred: impl Fn(u8) -> bool,
    ) -> usize {
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.bump(1);
        }
        self.offset
    }

    fn make_token(
        &self,
        kind: TokenKind,
        start: Position,
        end_offset: usize,
    ) -> Token<'src> {
        Token {
            kind,
            text: &self.source[start.offset..end_offset],
            span: Span::new(start, self.position()),
        }
    }

    /// Generate next token
    pub fn next_token(&mut self) -> Result<Scan<'src>, LexError> {
        self.skip_whitespace();

        let start = self.position();
        let Some(b) = self.peek() else {
            return Ok(Scan::Eof);
        };

        if is_letter(b) {
            let end = self.eat_while(|b| is_letter(b) || is_digit(b));
            let text = &self.source[start.offset..end];
            if self.peek() == Some(b':') {
                let token = self.make_token(TokenKind::Segment, start, end);
                self.bump(1);
                return Ok(Scan::Token(token));
            }
            let kind = if TYPE_KEYWORDS.contains(&text) {
                TokenKind::Type
            } else if CONTROL_KEYWORDS.contains(&text) {
                TokenKind::Keyword
            } else {
                TokenKind::Identifier
            };
            return Ok(Scan::Token(self.make_token(kind, start, end)));
        }

        if is_digit(b) {
            let end = self.eat_while(is_digit);
            let token = self.make_token(TokenKind::Integer(0), start, end);
            let value = token
                .text
                .parse::<u64>()
                .map_err(|_| LexError::IntegerOverflow {
                    lexeme: token.text.to_string(),
                    span: token.span,
                })?;
            return Ok(Scan::Token(Token {
                kind: TokenKind::Integer(value),
                ..token
            }));
        }

        if b == b';' {
            self.bump(1);
            return Ok(Scan::Terminator);
        }

        // Single character: punctuation, operator or unknown. Unknown characters may be
        // multi-byte, so step over a whole char.
        let c = self.source[self.offset..].chars().next().unwrap_or('\0');
        let kind = match c {
            '(' | ')' | ',' => TokenKind::Punct,
            c => match Operator::from_char(c) {
                Some(op) => TokenKind::Operator(op),
                None => TokenKind::Unknown,
            },
        };
        self.bump(c.len_utf8());
        Ok(Scan::Token(self.make_token(kind, start, self.offset)))
    }
}
