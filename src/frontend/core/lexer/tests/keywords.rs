//! Keyword tests

use crate::frontend::core::lexer::{tokenize, TokenKind};

#[cfg(test)]
mod lexer_keywords_tests {
    use super::*;

    #[test]
    fn test_all_type_keywords() {
        for kw in ["i1", "i2", "i4", "i8", "u1", "u2", "u4", "u8", "ptr"] {
            let tokens = tokenize(kw).unwrap();
            assert_eq!(tokens[0].kind, TokenKind::Type, "{kw} should be a type keyword");
        }
    }

    #[test]
    fn test_control_keywords() {
        let tokens = tokenize("ret end").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Keyword);
        assert_eq!(tokens[1].kind, TokenKind::Keyword);
    }

    #[test]
    fn test_keywords_are_case_sensitive_and_exact() {
        let tokens = tokenize("I4 i16 ret2 Ret ptrs").unwrap();
        assert!(tokens.iter().all(|t| t.kind == TokenKind::Identifier));
    }

    #[test]
    fn test_keyword_followed_by_colon_is_segment() {
        // the segment rule outranks keyword classification
        let tokens = tokenize("ret: i4:").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Segment);
        assert_eq!(tokens[0].text, "ret");
        assert_eq!(tokens[1].kind, TokenKind::Segment);
    }

    #[test]
    fn test_segment_requires_adjacent_colon() {
        let tokens = tokenize("data :").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
    }
}
