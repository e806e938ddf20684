//! Fatal error tests
//!
//! Every error aborts the whole compilation and names the offending lexeme.

use dato::frontend::core::parser::ParseError;
use dato::middle::core::ir_gen::SemanticError;
use dato::middle::passes::OptimizeError;
use dato::{compile, CompileError};

#[test]
fn test_division_by_zero() {
    let err = compile(b"data: i4 x; logic: x = 1 / 0; ret x;").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Optimize(OptimizeError::DivisionByZero { .. })
    ));
}

#[test]
fn test_division_by_zero_undeclared_target() {
    let err = compile(b"logic: x = 1 / 0; ret x;").unwrap_err();
    assert!(matches!(
        err,
        CompileError::Semantic(SemanticError::Undeclared { ref name, .. }) if name == "x"
    ));
}

#[test]
fn test_unknown_segment() {
    let err = compile(b"foo: ret 1;").unwrap_err();
    assert!(matches!(err, CompileError::Parse(ParseError::NotASegment { .. })));
    assert!(err.to_string().contains("not a segment"), "{err}");
    assert!(err.to_string().contains("`foo`"), "{err}");
}

#[test]
fn test_unimplemented_segments() {
    for source in [&b"system: ret;"[..], &b"layout: ret;"[..]] {
        let err = compile(source).unwrap_err();
        assert!(
            matches!(err, CompileError::Parse(ParseError::UnimplementedSegment { .. })),
            "{err}"
        );
    }
}

#[test]
fn test_declaration_shapes() {
    assert!(matches!(
        compile(b"data: i4;").unwrap_err(),
        CompileError::Parse(ParseError::IncompleteDeclaration { .. })
    ));
    assert!(matches!(
        compile(b"data: i4 x = 1;").unwrap_err(),
        CompileError::Parse(ParseError::ExpectedTerminator { .. })
    ));
    assert!(matches!(
        compile(b"data: x i4;").unwrap_err(),
        CompileError::Parse(ParseError::MalformedDeclaration { .. })
    ));
}

#[test]
fn test_error_position() {
    let err = compile(b"data: i4 x;\nlogic:\n  x = 1 +;").unwrap_err();
    assert!(err.to_string().contains("`+` at 3:9"), "{err}");
}

#[test]
fn test_no_partial_output_on_late_error() {
    // the error is in the last statement; nothing is returned
    let result = compile(b"data: i4 x; logic: x = 1; ret x; ret $;");
    assert!(matches!(result, Err(CompileError::Lex(_))));
}
