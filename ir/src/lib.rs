// Intermediate representation: a uniform expression tree with type slots,
// produced from the CST and annotated in place by semantic analysis.

mod expressions;
mod lowerer;
mod statements;
mod type_utils;
mod types;

pub use expressions::{is_boolean_name, unescape};
pub use lowerer::{Lowerer, WRITELN};
pub use types::*;

/// Lower a parsed program into IR.
pub fn lower(program: &model::Program) -> Program {
    Lowerer::new().lower_program(program)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lower_src(src: &str) -> Program {
        let parsed = parser::parse(src);
        assert!(parsed.is_success(), "parse failed: {:?}", parsed.diagnostics);
        lower(&parsed.program)
    }

    fn first_assigned(src: &str) -> Expr {
        let program = lower_src(&format!("program t; begin {} end.", src));
        match program.scope.statements.into_iter().next().map(|s| s.kind) {
            Some(StmtKind::Assign { expr, .. }) => expr,
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    fn int(digits: &str) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Integer(digits.to_string())))
    }

    fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
        Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) })
    }

    #[test]
    fn single_operand_is_not_wrapped() {
        assert_eq!(first_assigned("x := 7"), int("7"));
        assert_eq!(first_assigned("x := ((7))"), int("7"));
    }

    #[test]
    fn precedence_survives_lowering() {
        let expected = bin(BinaryOp::Add, int("1"), bin(BinaryOp::Mul, int("2"), int("3")));
        assert_eq!(first_assigned("x := 1 + 2 * 3"), expected);
    }

    #[test]
    fn chains_fold_left() {
        let expected = bin(BinaryOp::Sub, bin(BinaryOp::Sub, int("10"), int("4")), int("3"));
        assert_eq!(first_assigned("x := 10 - 4 - 3"), expected);
    }

    #[test]
    fn sign_applies_to_first_term() {
        let negated = Expr::new(ExprKind::Unary { op: UnaryOp::Negate, operand: Box::new(int("2")) });
        assert_eq!(first_assigned("x := -2 + 1"), bin(BinaryOp::Add, negated, int("1")));
        assert_eq!(first_assigned("x := +5"), int("5"));
    }

    #[test]
    fn relation_wraps_both_sides() {
        let expr = first_assigned("b := a + 1 <= 3");
        match expr.kind {
            ExprKind::Binary { op, left, .. } => {
                assert_eq!(op, BinaryOp::Lte);
                assert!(matches!(left.kind, ExprKind::Binary { op: BinaryOp::Add, .. }));
            }
            other => panic!("expected comparison, got {:?}", other),
        }
    }

    #[test]
    fn boolean_names_become_literals() {
        let expr = first_assigned("b := true and not false");
        let ExprKind::Binary { left, right, .. } = expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(left.kind, ExprKind::Literal(Literal::Boolean(true)));
        assert!(matches!(right.kind, ExprKind::Unary { op: UnaryOp::Not, .. }));
    }

    #[test]
    fn string_literal_is_decoded() {
        let expr = first_assigned(r#"s := "a\tb""#);
        assert_eq!(expr.kind, ExprKind::Literal(Literal::String("a\tb".into())));
    }

    #[test]
    fn writeln_becomes_intrinsic_call() {
        let program = lower_src("program t; begin writeln(1, \"x\") end.");
        match &program.scope.statements[0].kind {
            StmtKind::Call(call) => {
                assert_eq!(call.name, WRITELN);
                assert_eq!(call.args.len(), 2);
                assert!(call.signature.0.is_empty());
            }
            other => panic!("expected call, got {:?}", other),
        }
    }

    #[test]
    fn declarations_resolve_types() {
        let program = lower_src("program t; begin var a: array [3] of int; var s: string end.");
        let StmtKind::Declare { r#type, size, .. } = &program.scope.statements[0].kind else {
            panic!("expected declaration");
        };
        assert_eq!(*r#type, Type::Array(Box::new(Type::Integer)));
        assert_eq!(size.as_ref(), Some(&int("3")));
        let StmtKind::Declare { r#type, size, .. } = &program.scope.statements[1].kind else {
            panic!("expected declaration");
        };
        assert_eq!(*r#type, Type::String);
        assert!(size.is_none());
    }

    #[test]
    fn branches_become_scopes() {
        let program = lower_src("program t; begin if a then x := 1 else begin x := 2; x := 3 end end.");
        let StmtKind::If { then_scope, else_scope, .. } = &program.scope.statements[0].kind else {
            panic!("expected if");
        };
        assert_eq!(then_scope.statements.len(), 1);
        assert_eq!(else_scope.as_ref().map(|s| s.statements.len()), Some(2));
    }

    #[test]
    fn functions_carry_parameters() {
        let program = lower_src(
            "program t;\nfunction sq(n: integer): integer;\nbegin return n * n end;\nprocedure p();\nbegin end;\nbegin end.",
        );
        let sq = &program.functions[0];
        assert_eq!(sq.params[0].name, "n");
        assert_eq!(sq.params[0].ty, Type::Integer);
        assert_eq!(sq.return_type, Type::Integer);
        assert_eq!(sq.line, 2);
        assert_eq!(program.functions[1].return_type, Type::Void);
    }

    #[test]
    fn lowering_is_idempotent() {
        let parsed = parser::parse(
            "program t;\nfunction f(a: real): real;\nbegin return -a * 2.0 end;\n\
             begin var v: array [n] of real; v[0] := f(1.5); while v[0] > 0.0 do v[0] := v[0] - 1.0 end.",
        );
        assert!(parsed.is_success());
        assert_eq!(lower(&parsed.program), lower(&parsed.program));
    }

    #[test]
    fn signature_display() {
        assert_eq!(Signature(vec![]).to_string(), "void");
        assert_eq!(Signature(vec![Type::Integer]).to_string(), "integer");
        assert_eq!(
            Signature(vec![Type::String, Type::Array(Box::new(Type::Real))]).to_string(),
            "string_real_arr"
        );
    }
}
