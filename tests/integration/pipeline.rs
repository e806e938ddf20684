//! End-to-end compilation tests

use dato::frontend::config::{CompileConfig, OptLevel};
use dato::{compile, run, Compiler};

#[test]
fn test_precedence_folds_to_fourteen() {
    let doil = compile(b"data: i4 x; logic: x = 2 + 3 * 4; ret x;").unwrap();
    assert_eq!(doil, "ret 14\n");
}

#[test]
fn test_left_associative_subtraction() {
    let ast = Compiler::new().parse(b"a - b - c;").unwrap();
    assert_eq!(ast.to_string(), "(- (- a b) c)\n");
    assert_eq!(run(b"ret 10 - 4 - 3;").unwrap(), Some(3));
}

#[test]
fn test_dead_declaration_has_no_def_line() {
    let source = b"data:\n  i4 used;\n  u2 unused;\nlogic:\n  used = 7;\n  ret used;\n";
    let doil = compile(source).unwrap();
    assert!(!doil.contains("def"), "{doil}");
    assert_eq!(doil, "ret 7\n");

    let unoptimized = Compiler::with_config(CompileConfig::new().with_opt_level(OptLevel::O0))
        .compile(source)
        .unwrap();
    assert!(unoptimized.doil().contains("def unused word"));
}

#[test]
fn test_constant_propagation_removes_loads() {
    let source = b"data: i4 a; i4 b; logic: a = 3; b = a * a; ret b - a;";
    let compilation = Compiler::new().compile(source).unwrap();
    let doil = compilation.doil();
    assert!(!doil.contains("get"), "{doil}");
    assert_eq!(doil, "ret 6\n");
    assert_eq!(run(source).unwrap(), Some(6));
}

#[test]
fn test_unknown_values_stay_symbolic() {
    // `a` is never assigned: its load survives and is reported
    let compilation = Compiler::new()
        .compile(b"data: i4 a; i4 b; logic: b = a + 2; ret b * 3;")
        .unwrap();
    assert_eq!(
        compilation.doil(),
        "def a dword\nget a r0\nadd r0 2 r0\nmul r0 3 r0\nret r0\n"
    );
    assert_eq!(compilation.warnings.len(), 1);
    assert!(compilation.warnings[0].message.contains("`a`"));
}

#[test]
fn test_segments_may_alternate() {
    let source = b"data: i1 a; logic: a = 4; data: i1 b; logic: b = a / 2; ret b;";
    assert_eq!(run(source).unwrap(), Some(2));
    assert_eq!(compile(source).unwrap(), "ret 2\n");
}

#[test]
fn test_empty_program() {
    assert_eq!(compile(b"").unwrap(), "");
    assert_eq!(compile(b"  ;; \n").unwrap(), "");
    assert_eq!(run(b"").unwrap(), None);
}

#[test]
fn test_bare_return() {
    assert_eq!(compile(b"end;").unwrap(), "ret\n");
    assert_eq!(run(b"ret;").unwrap(), None);
}

#[test]
fn test_very_long_expression_compiles() {
    let source = format!("ret 1{};", " + 1".repeat(10_000));
    assert_eq!(compile(source.as_bytes()).unwrap(), "ret 10001\n");

    let unoptimized = Compiler::with_config(CompileConfig::new().with_opt_level(OptLevel::O0))
        .compile(source.as_bytes())
        .unwrap();
    assert_eq!(dato::vm::Vm::new().execute(&unoptimized.code).unwrap(), Some(10_001));

    let ast = Compiler::new().parse(source.as_bytes()).unwrap();
    assert_eq!(ast.to_string().matches("(+").count(), 10_000);
}

#[test]
fn test_assignment_as_return_value() {
    let source = b"data: i4 a; logic: ret a = 2 * 3;";
    assert_eq!(compile(source).unwrap(), "ret 6\n");
    assert_eq!(run(source).unwrap(), Some(6));
}
