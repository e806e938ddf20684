//! Single-round peephole tests

use super::lowered;
use crate::frontend::CompileError;
use crate::frontend::state::CompilationState;
use crate::middle::core::ir::{render, Instruction, Operand, Place};
use crate::middle::core::registers::{RegId, RegValue};
use crate::middle::core::symbols::SymbolKind;
use crate::middle::passes::{DeadWrites, OptimizeError, Pass, Peephole};
use crate::util::diagnostic::codes;

#[cfg(test)]
mod peephole_tests {
    use super::*;

    #[test]
    fn test_folds_constant_arithmetic() {
        let (mut code, mut state) = lowered("data: i4 x; logic: x = 2 + 3 * 4; ret x;").unwrap();
        let changes = Peephole.run(&mut code, &mut state).unwrap();
        assert!(changes > 0);
        assert_eq!(
            render(&code),
            "def x dword\nmov r0 2\nmov r1 3\nmov r1 12\nmov r0 14\nset x 14\nret 14\n"
        );
    }

    #[test]
    fn test_single_assignment_propagates_into_loads() {
        let (mut code, mut state) = lowered("data: i4 x; i4 y; logic: x = 5; y = 1; ret x;").unwrap();
        Peephole.run(&mut code, &mut state).unwrap();
        let text = render(&code);
        assert!(!text.contains("get x"), "{text}");
        assert!(text.contains("ret 5"), "{text}");
        let x = state.symbols.get(Some(SymbolKind::Variable), "x").unwrap();
        assert_eq!(x.use_amount, 0);
    }

    #[test]
    fn test_load_replaced_by_move_of_first_value() {
        let (mut code, mut state) = lowered("data: i4 x; i4 y; logic: x = 5; y = x + x;").unwrap();
        // def x, def y, set x 5, get x r0, get x r1, add r0 r1 r0, set y r0
        assert_eq!(state.symbols.get(None, "x").unwrap().use_amount, 2);
        Peephole.run(&mut code, &mut state).unwrap();
        let text = render(&code);
        assert!(text.contains("mov r0 5\nmov r1 5\nmov r0 10\n"), "{text}");
        assert_eq!(state.symbols.get(None, "x").unwrap().use_amount, 0);
        // y is never read
        assert!(!text.contains("def y"), "{text}");
        assert!(!text.contains("set y"), "{text}");
    }

    #[test]
    fn test_reassigned_variable_is_not_propagated() {
        let (mut code, mut state) = lowered("data: i4 x; i4 y; logic: y = 1; x = y; x = 2; ret x;").unwrap();
        Peephole.run(&mut code, &mut state).unwrap();
        let text = render(&code);
        assert!(text.contains("get x"), "{text}");
        assert_eq!(state.symbols.get(None, "x").unwrap().set_amount, 2);
    }

    #[test]
    fn test_redundant_load_through_alias() {
        let (mut code, mut state) = lowered("data: i4 a; i4 b; logic: b = a; ret a;").unwrap();
        // get a r0, set b r0, get a r0, ret r0
        Peephole.run(&mut code, &mut state).unwrap();
        let text = render(&code);
        assert_eq!(text.matches("get a r0").count(), 1, "{text}");
        assert!(!text.contains("set b"), "{text}");
    }

    #[test]
    fn test_uninitialized_read_warns_once() {
        let (mut code, mut state) = lowered("data: i4 a; logic: ret a + a;").unwrap();
        Peephole.run(&mut code, &mut state).unwrap();
        Peephole.run(&mut code, &mut state).unwrap();
        let warnings: Vec<_> = state
            .diagnostics
            .iter()
            .filter(|d| d.code == codes::UNINITIALIZED_READ)
            .collect();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("`a`"));
    }

    #[test]
    fn test_division_by_zero_is_fatal() {
        let (mut code, mut state) = lowered("data: i4 x; logic: x = 1 / 0; ret x;").unwrap();
        let err = Peephole.run(&mut code, &mut state).unwrap_err();
        assert!(matches!(
            err,
            CompileError::Optimize(OptimizeError::DivisionByZero { ref instruction }) if instruction == "div r0 0 r0"
        ));
    }

    #[test]
    fn test_division_by_zero_with_unknown_dividend() {
        let (mut code, mut state) = lowered("data: i4 x; i4 y; logic: y = 0; x = x / y; ret x;").unwrap();
        assert!(Peephole.run(&mut code, &mut state).is_err());
    }

    #[test]
    fn test_no_change_reported_at_fixed_point() {
        let (mut code, mut state) = lowered("data: i4 a; logic: ret a;").unwrap();
        assert_eq!(Peephole.run(&mut code, &mut state).unwrap(), 0);
        assert_eq!(render(&code), "def a dword\nget a r0\nret r0\n");
    }

    #[test]
    fn test_register_store_copies_symbolic_value() {
        let mut code = vec![
            Instruction::Move {
                dst: RegId(1),
                value: 5,
            },
            Instruction::Store {
                dst: Place::Reg(RegId(0)),
                src: Operand::Reg(RegId(1)),
            },
            Instruction::Ret(Some(Operand::Reg(RegId(0)))),
        ];
        let mut state = CompilationState::new();
        assert_eq!(Peephole.run(&mut code, &mut state).unwrap(), 2);
        assert_eq!(render(&code), "mov r1 5\nset r0 5\nret 5\n");
        assert_eq!(*state.registers.value(RegId(0)), RegValue::Literal(5));

        assert_eq!(DeadWrites.run(&mut code, &mut state).unwrap(), 2);
        assert_eq!(render(&code), "ret 5\n");
    }

    #[test]
    fn test_chained_assignment_register_store_is_dead() {
        let (mut code, mut state) = lowered("data: i2 a; i2 b; logic: b = 3; a = b = 1; ret a;").unwrap();
        assert!(render(&code).contains("set r0 1\n"));
        Peephole.run(&mut code, &mut state).unwrap();
        assert!(render(&code).contains("set r0 1\n"));
        DeadWrites.run(&mut code, &mut state).unwrap();
        let text = render(&code);
        assert!(!text.contains("set r0"), "{text}");
    }
}
