// Statement dispatch and structured control flow: if/else, while loops,
// assert and return

use crate::function::FunctionGenerator;
use crate::wasm::WasmInstr;
use ir::{Expr, Scope, Statement, StmtKind};

impl<'a> FunctionGenerator<'a> {
    pub(crate) fn gen_statement(&mut self, statement: &Statement) {
        match &statement.kind {
            StmtKind::Declare { names, r#type, size } => {
                for name in names {
                    self.gen_declare(name, r#type, size.as_ref());
                }
            }
            StmtKind::Assign { name, index, expr } => self.gen_assign(name, index.as_ref(), expr),
            StmtKind::Call(call) => self.gen_call_statement(call),
            StmtKind::Return(value) => {
                if let Some(value) = value {
                    self.gen_expr(value);
                }
                self.instrs.push(WasmInstr::Return);
            }
            StmtKind::Read(targets) => {
                for target in targets {
                    self.gen_read(target);
                }
            }
            StmtKind::Assert(cond) => self.gen_assert(cond, statement.line),
            StmtKind::If { cond, then_scope, else_scope } => self.gen_if(cond, then_scope, else_scope.as_ref()),
            StmtKind::While { cond, body } => self.gen_while(cond, body),
            StmtKind::Scope(scope) => self.gen_scope(scope),
        }
    }

    fn gen_if(&mut self, cond: &Expr, then_scope: &Scope, else_scope: Option<&Scope>) {
        self.gen_expr(cond);
        self.instrs.push(WasmInstr::If);
        self.gen_scope(then_scope);
        if let Some(else_scope) = else_scope {
            self.instrs.push(WasmInstr::Else);
            self.gen_scope(else_scope);
        }
        self.instrs.push(WasmInstr::End);
    }

    /// block $while_exit_n
    ///   loop $while_head_n
    ///     <cond> i32.eqz br_if $while_exit_n
    ///     <body>
    ///     br $while_head_n
    fn gen_while(&mut self, cond: &Expr, body: &Scope) {
        let n = self.fresh_label();
        let exit = format!("$while_exit_{}", n);
        let head = format!("$while_head_{}", n);

        self.instrs.push(WasmInstr::Block(exit.clone()));
        self.instrs.push(WasmInstr::Loop(head.clone()));
        self.gen_expr(cond);
        self.instrs.push(WasmInstr::I32Eqz);
        self.instrs.push(WasmInstr::BrIf(exit));
        self.gen_scope(body);
        self.instrs.push(WasmInstr::Br(head));
        self.instrs.push(WasmInstr::End);
        self.instrs.push(WasmInstr::End);
    }

    fn gen_assert(&mut self, cond: &Expr, line: usize) {
        self.gen_expr(cond);
        self.instrs.push(WasmInstr::I32Eqz);
        self.instrs.push(WasmInstr::If);
        self.instrs.push(WasmInstr::I32Const(i32::try_from(line).unwrap_or(i32::MAX)));
        self.instrs.push(WasmInstr::Call("$assert_failed".to_string()));
        self.instrs.push(WasmInstr::End);
    }
}
