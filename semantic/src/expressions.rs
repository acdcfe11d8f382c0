use crate::{SemanticAnalyzer, is_known};
use ir::{BinaryOp, Expr, ExprKind, Literal, Type, UnaryOp, Variable};

impl SemanticAnalyzer {
    /// Infer and record the type of `expr`. `Void` means the type could not
    /// be determined and an error has already been reported.
    pub(crate) fn analyze_expr(&mut self, expr: &mut Expr) -> Type {
        let ty = match &mut expr.kind {
            ExprKind::Literal(literal) => {
                match literal {
                    Literal::Integer(digits) if digits.parse::<i32>().is_err() => {
                        self.error(format!("Integer literal {} out of range.", digits));
                    }
                    Literal::Real(text) if !text.parse::<f64>().is_ok_and(f64::is_finite) => {
                        self.error(format!("Real literal {} out of range.", text));
                    }
                    _ => {}
                }
                literal.ty()
            }
            ExprKind::Variable(variable) => self.analyze_variable(variable),
            ExprKind::Binary { op, left, right } => {
                let op = *op;
                let left = self.analyze_expr(left);
                let right = self.analyze_expr(right);
                self.check_binary(op, left, right)
            }
            ExprKind::Unary { op, operand } => {
                let op = *op;
                let operand = self.analyze_expr(operand);
                self.check_unary(op, operand)
            }
            ExprKind::Call(call) => self.analyze_call(call, true),
        };
        expr.ty = ty.clone();
        ty
    }

    pub(crate) fn analyze_variable(&mut self, variable: &mut Variable) -> Type {
        let declared = self.scopes.lookup(&variable.name).cloned();
        let Some(declared) = declared else {
            self.error(format!("{} not in scope.", variable.name));
            if let Some(index) = variable.index.as_deref_mut() {
                self.analyze_expr(index);
            }
            return Type::Void;
        };

        let Some(index) = variable.index.as_deref_mut() else {
            return declared;
        };
        self.expect_index(index);
        match declared.element() {
            Some(element) => element.clone(),
            None => {
                self.error(format!("{} is not an array.", variable.name));
                Type::Void
            }
        }
    }

    pub(crate) fn expect_condition(&mut self, cond: &mut Expr) {
        let ty = self.analyze_expr(cond);
        if is_known(&ty) && ty != Type::Boolean {
            self.error(format!("Condition must be boolean, found {}.", ty));
        }
    }

    pub(crate) fn expect_index(&mut self, index: &mut Expr) {
        let ty = self.analyze_expr(index);
        if is_known(&ty) && ty != Type::Integer {
            self.error(format!("Array index must be integer, found {}.", ty));
        }
    }

    /// Operands must agree; the node then takes the left operand's type,
    /// except comparisons which are boolean.
    fn check_binary(&mut self, op: BinaryOp, left: Type, right: Type) -> Type {
        if is_known(&left) && is_known(&right) {
            if left != right {
                self.error(format!("Type mismatch: {} {} {}.", left, op.symbol(), right));
            } else if !binary_applies(op, &left) {
                self.error(format!("Operator {} cannot be applied to {}.", op.symbol(), left));
            }
        }
        if op.is_relational() { Type::Boolean } else { left }
    }

    fn check_unary(&mut self, op: UnaryOp, operand: Type) -> Type {
        let applies = match op {
            UnaryOp::Negate => operand.is_numeric(),
            UnaryOp::Not => operand == Type::Boolean,
            UnaryOp::Size => operand.is_array(),
        };
        if is_known(&operand) && !applies {
            self.error(format!("Operator {} cannot be applied to {}.", op.symbol(), operand));
        }
        match op {
            UnaryOp::Negate => operand,
            UnaryOp::Not => Type::Boolean,
            UnaryOp::Size => Type::Integer,
        }
    }
}

fn binary_applies(op: BinaryOp, ty: &Type) -> bool {
    match op {
        BinaryOp::Add => matches!(ty, Type::Integer | Type::Real | Type::String),
        BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div => ty.is_numeric(),
        BinaryOp::Mod => *ty == Type::Integer,
        BinaryOp::And | BinaryOp::Or => *ty == Type::Boolean,
        _ => ty.is_scalar(),
    }
}
