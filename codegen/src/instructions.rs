// Expression code generation: every expression leaves exactly one value on
// the operand stack (none for a call to a procedure)

use crate::function::{FunctionGenerator, address_operand};
use crate::types::value_type;
use crate::wasm::{ArithOp, CompareOp, WasmInstr, WasmType};
use ir::{BinaryOp, Expr, ExprKind, Literal, Type, UnaryOp};

impl<'a> FunctionGenerator<'a> {
    pub(crate) fn gen_expr(&mut self, expr: &Expr) {
        match &expr.kind {
            ExprKind::Literal(literal) => self.gen_literal(literal),
            ExprKind::Variable(variable) => self.gen_variable_load(variable),
            ExprKind::Binary { op, left, right } => {
                self.gen_expr(left);
                self.gen_expr(right);
                self.gen_binary_op(*op, &left.ty);
            }
            ExprKind::Unary { op, operand } => {
                self.gen_unary(*op, operand);
            }
            ExprKind::Call(call) => self.gen_call(call),
        }
    }

    fn gen_literal(&mut self, literal: &Literal) {
        let instr = match literal {
            // Range was checked during analysis.
            Literal::Integer(digits) => WasmInstr::I32Const(digits.parse().unwrap_or_default()),
            Literal::Real(text) => WasmInstr::F64Const(text.clone()),
            Literal::Boolean(value) => WasmInstr::I32Const(i32::from(*value)),
            Literal::String(text) => {
                let address = self.data.intern(self.allocator, text);
                WasmInstr::I32Const(address_operand(address))
            }
        };
        self.instrs.push(instr);
    }

    /// Both operands are on the stack; `operand` is their common type.
    fn gen_binary_op(&mut self, op: BinaryOp, operand: &Type) {
        if *operand == Type::String {
            if op == BinaryOp::Add {
                self.instrs.push(WasmInstr::Call("$string_concat".to_string()));
                return;
            }
            // Three-way result compared against zero.
            self.instrs.push(WasmInstr::Call("$string_compare".to_string()));
            self.instrs.push(WasmInstr::I32Const(0));
            if let Some(cmp) = compare_op(op) {
                self.instrs.push(WasmInstr::Compare(WasmType::I32, cmp));
            }
            return;
        }

        let ty = value_type(operand);
        let instr = match op {
            BinaryOp::Add => WasmInstr::Arith(ty, ArithOp::Add),
            BinaryOp::Sub => WasmInstr::Arith(ty, ArithOp::Sub),
            BinaryOp::Mul => WasmInstr::Arith(ty, ArithOp::Mul),
            BinaryOp::Div => WasmInstr::Arith(ty, ArithOp::Div),
            BinaryOp::Mod => WasmInstr::Arith(WasmType::I32, ArithOp::Rem),
            BinaryOp::And => WasmInstr::Arith(WasmType::I32, ArithOp::And),
            BinaryOp::Or => WasmInstr::Arith(WasmType::I32, ArithOp::Or),
            BinaryOp::Eq => WasmInstr::Compare(ty, CompareOp::Eq),
            BinaryOp::Neq => WasmInstr::Compare(ty, CompareOp::Ne),
            BinaryOp::Lt => WasmInstr::Compare(ty, CompareOp::Lt),
            BinaryOp::Lte => WasmInstr::Compare(ty, CompareOp::Le),
            BinaryOp::Gt => WasmInstr::Compare(ty, CompareOp::Gt),
            BinaryOp::Gte => WasmInstr::Compare(ty, CompareOp::Ge),
        };
        self.instrs.push(instr);
    }

    fn gen_unary(&mut self, op: UnaryOp, operand: &Expr) {
        match op {
            UnaryOp::Negate if operand.ty == Type::Real => {
                self.gen_expr(operand);
                self.instrs.push(WasmInstr::F64Neg);
            }
            UnaryOp::Negate => {
                self.instrs.push(WasmInstr::I32Const(0));
                self.gen_expr(operand);
                self.instrs.push(WasmInstr::Arith(WasmType::I32, ArithOp::Sub));
            }
            UnaryOp::Not => {
                self.gen_expr(operand);
                self.instrs.push(WasmInstr::I32Eqz);
            }
            UnaryOp::Size => {
                self.gen_expr(operand);
                self.instrs.push(WasmInstr::Load(WasmType::I32, 0));
            }
        }
    }
}

fn compare_op(op: BinaryOp) -> Option<CompareOp> {
    match op {
        BinaryOp::Eq => Some(CompareOp::Eq),
        BinaryOp::Neq => Some(CompareOp::Ne),
        BinaryOp::Lt => Some(CompareOp::Lt),
        BinaryOp::Lte => Some(CompareOp::Le),
        BinaryOp::Gt => Some(CompareOp::Gt),
        BinaryOp::Gte => Some(CompareOp::Ge),
        _ => None,
    }
}
