//! Property tests using proptest
//!
//! Programs are generated so that every variable is assigned before it is
//! read and every divisor is a nonzero literal. Such programs compile without
//! warnings and never trap.

use dato::frontend::config::{CompileConfig, OptLevel};
use dato::frontend::state::CompilationState;
use dato::middle::passes::{optimize, DEFAULT_MAX_PASSES};
use dato::vm::Vm;
use dato::{run, Compiler};
use proptest::prelude::*;

const OPERATORS: [&str; 4] = ["+", "-", "*", "/"];

/// One `operator operand` step: operator index, literal, variable pick, use variable
type Step = (usize, u64, usize, bool);

fn step_strategy() -> impl Strategy<Value = Step> {
    (0usize..4, 0u64..1000, 0usize..8, any::<bool>())
}

fn raw_expr_strategy() -> impl Strategy<Value = Vec<Step>> {
    prop::collection::vec(step_strategy(), 1..6)
}

/// Render an expression over the first `available` variables
fn render_expr(
    steps: &[Step],
    available: usize,
) -> String {
    let mut out = String::new();
    for (i, &(op, literal, pick, use_var)) in steps.iter().enumerate() {
        if i > 0 {
            let symbol = OPERATORS[op];
            out.push_str(&format!(" {} ", symbol));
            if symbol == "/" {
                out.push_str(&(literal % 9 + 1).to_string());
                continue;
            }
        }
        if use_var && available > 0 {
            out.push_str(&format!("v{}", pick % available));
        } else {
            out.push_str(&literal.to_string());
        }
    }
    out
}

/// Strategy for whole programs
///
/// Updates are either `vA = expr;` or the chained `vA = vB = expr;`, which
/// copies `vB` into `vA` and stores `expr` through a register. The return is
/// either `ret expr;` or `ret vA = expr;`.
fn program_strategy() -> impl Strategy<Value = String> {
    (
        1usize..=4,
        prop::collection::vec(raw_expr_strategy(), 4),
        prop::collection::vec((0usize..4, 0usize..4, any::<bool>(), raw_expr_strategy()), 0..6),
        (0usize..4, any::<bool>(), raw_expr_strategy()),
    )
        .prop_map(|(count, inits, updates, (ret_target, ret_assigns, ret))| {
            let types = ["i1", "u2", "i4", "u8"];
            let mut source = String::from("data:\n");
            for i in 0..count {
                source.push_str(&format!("    {} v{};\n", types[i % types.len()], i));
            }
            source.push_str("logic:\n");
            for (i, init) in inits.iter().take(count).enumerate() {
                source.push_str(&format!("    v{} = {};\n", i, render_expr(init, i)));
            }
            for (target, source_var, chained, expr) in &updates {
                let expr = render_expr(expr, count);
                if *chained {
                    source.push_str(&format!(
                        "    v{} = v{} = {};\n",
                        target % count,
                        source_var % count,
                        expr
                    ));
                } else {
                    source.push_str(&format!("    v{} = {};\n", target % count, expr));
                }
            }
            let ret = render_expr(&ret, count);
            if ret_assigns {
                source.push_str(&format!("    ret v{} = {};\n", ret_target % count, ret));
            } else {
                source.push_str(&format!("    ret {};\n", ret));
            }
            source
        })
}

/// Reference evaluation of a literal-only expression: `* /` before `+ -`,
/// left to right within a level, wrapping on overflow
fn reference_eval(steps: &[Step]) -> u64 {
    let value_of = |i: usize, literal: u64| -> u64 {
        if i > 0 && OPERATORS[steps[i].0] == "/" {
            literal % 9 + 1
        } else {
            literal
        }
    };

    let mut total: u64 = 0;
    let mut sign_add = true;
    let mut term = value_of(0, steps[0].1);
    for (i, &(op, literal, _, _)) in steps.iter().enumerate().skip(1) {
        let operand = value_of(i, literal);
        match OPERATORS[op] {
            "*" => term = term.wrapping_mul(operand),
            "/" => term /= operand,
            additive => {
                total = if sign_add {
                    total.wrapping_add(term)
                } else {
                    total.wrapping_sub(term)
                };
                sign_add = additive == "+";
                term = operand;
            }
        }
    }
    if sign_add {
        total.wrapping_add(term)
    } else {
        total.wrapping_sub(term)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    /// Optimization does not change the returned value
    #[test]
    fn test_optimization_preserves_result(source in program_strategy()) {
        let unoptimized = Compiler::with_config(CompileConfig::new().with_opt_level(OptLevel::O0))
            .compile(source.as_bytes())
            .unwrap();
        let optimized = Compiler::new().compile(source.as_bytes()).unwrap();
        prop_assert!(unoptimized.warnings.is_empty(), "{:?}", unoptimized.warnings);
        prop_assert!(optimized.warnings.is_empty(), "{:?}", optimized.warnings);

        let expected = Vm::new().execute(&unoptimized.code);
        let actual = Vm::new().execute(&optimized.code);
        prop_assert!(expected.is_ok());
        prop_assert_eq!(expected, actual, "source:\n{}\noptimized:\n{}", source, optimized.doil());
        prop_assert!(optimized.code.len() <= unoptimized.code.len());
    }

    /// Optimizing already optimized code is a no-op
    #[test]
    fn test_optimization_is_idempotent(source in program_strategy()) {
        let compilation = Compiler::new().compile(source.as_bytes()).unwrap();
        let mut code = compilation.code.clone();
        let mut state = CompilationState::new();
        let stats = optimize(&mut code, &mut state, DEFAULT_MAX_PASSES).unwrap();
        prop_assert_eq!(stats.changes, 0);
        prop_assert_eq!(code, compilation.code);
    }

    /// Literal expressions evaluate with conventional precedence
    #[test]
    fn test_precedence_matches_reference(steps in raw_expr_strategy()) {
        let source = format!("ret {};", render_expr(&steps, 0));
        prop_assert_eq!(run(source.as_bytes()).unwrap(), Some(reference_eval(&steps)));
    }
}
