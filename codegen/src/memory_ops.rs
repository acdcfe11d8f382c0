// Variable storage: declarations, loads and stores of locals and array
// elements, and `read` into them

use crate::function::{FunctionGenerator, LocalVar, address_operand};
use crate::types::{ARRAY_HEADER, runtime_suffix, value_type};
use crate::wasm::{ArithOp, WasmInstr, WasmType};
use ir::{Expr, ExprKind, Literal, Type, Variable};

impl<'a> FunctionGenerator<'a> {
    /// Scalars are plain locals and start at zero, strings start as the
    /// shared empty literal. Arrays with a literal length that fits the
    /// static area are placed there, others come from the run-time heap.
    pub(crate) fn gen_declare(&mut self, name: &str, ty: &Type, size: Option<&Expr>) {
        let wasm_name = self.declare_local(name, ty);

        match ty {
            Type::String => {
                let address = self.data.intern(self.allocator, "");
                self.instrs.push(WasmInstr::I32Const(address_operand(address)));
                self.instrs.push(WasmInstr::LocalSet(wasm_name.clone()));
            }
            Type::Array(element) => {
                let width = element.byte_width();
                let placed = size.and_then(constant_length).and_then(|count| {
                    let bytes = count.checked_mul(width)?.checked_add(ARRAY_HEADER)?;
                    let address = self.allocator.try_claim(format!("{} array", name), bytes)?;
                    Some((count, address))
                });
                match placed {
                    Some((count, address)) => {
                        self.data.array_header(address, count);
                        self.instrs.push(WasmInstr::I32Const(address_operand(address)));
                    }
                    None => {
                        if let Some(size) = size {
                            self.gen_expr(size);
                        } else {
                            self.instrs.push(WasmInstr::I32Const(0));
                        }
                        self.instrs.push(WasmInstr::I32Const(address_operand(width)));
                        self.instrs.push(WasmInstr::Call("$alloc_array".to_string()));
                    }
                }
                self.instrs.push(WasmInstr::LocalSet(wasm_name.clone()));
            }
            _ => {}
        }

        self.bind(name, LocalVar { wasm_name, ty: ty.clone() });
    }

    pub(crate) fn gen_assign(&mut self, name: &str, index: Option<&Expr>, expr: &Expr) {
        let Some(var) = self.lookup(name).cloned() else {
            tracing::warn!(%name, "assignment to unbound variable skipped");
            return;
        };

        match index {
            None => {
                self.gen_expr(expr);
                self.instrs.push(WasmInstr::LocalSet(var.wasm_name));
            }
            Some(index) => {
                let element = var.ty.element().cloned().unwrap_or(Type::Integer);
                self.gen_element_address(&var, index);
                self.gen_expr(expr);
                self.instrs.push(WasmInstr::Store(value_type(&element), ARRAY_HEADER));
            }
        }
    }

    /// Push the value of a variable reference.
    pub(crate) fn gen_variable_load(&mut self, variable: &Variable) {
        let Some(var) = self.lookup(&variable.name).cloned() else {
            tracing::warn!(name = %variable.name, "load of unbound variable");
            self.instrs.push(WasmInstr::I32Const(0));
            return;
        };

        match variable.index.as_deref() {
            None => self.instrs.push(WasmInstr::LocalGet(var.wasm_name)),
            Some(index) => {
                let element = var.ty.element().cloned().unwrap_or(Type::Integer);
                self.gen_element_address(&var, index);
                self.instrs.push(WasmInstr::Load(value_type(&element), ARRAY_HEADER));
            }
        }
    }

    /// base + index * width; the header is skipped through the memory
    /// offset of the following load or store.
    fn gen_element_address(&mut self, var: &LocalVar, index: &Expr) {
        let width = var.ty.element().map_or(4, Type::byte_width);
        self.instrs.push(WasmInstr::LocalGet(var.wasm_name.clone()));
        self.gen_expr(index);
        self.instrs.push(WasmInstr::I32Const(address_operand(width)));
        self.instrs.push(WasmInstr::Arith(WasmType::I32, ArithOp::Mul));
        self.instrs.push(WasmInstr::Arith(WasmType::I32, ArithOp::Add));
    }

    /// One runtime read per target. A string read returns a fresh heap
    /// string, so earlier copies of the target keep their value.
    pub(crate) fn gen_read(&mut self, target: &Variable) {
        let Some(var) = self.lookup(&target.name).cloned() else {
            tracing::warn!(name = %target.name, "read into unbound variable skipped");
            return;
        };
        let ty = match target.index {
            Some(_) => var.ty.element().cloned().unwrap_or(Type::Integer),
            None => var.ty.clone(),
        };

        if let Some(index) = target.index.as_deref() {
            self.gen_element_address(&var, index);
        }

        if ty == Type::String {
            self.instrs.push(WasmInstr::I32Const(address_operand(self.config.string_capacity())));
        }
        self.instrs.push(WasmInstr::Call(format!("$read_{}", runtime_suffix(&ty))));

        match target.index {
            Some(_) => self.instrs.push(WasmInstr::Store(value_type(&ty), ARRAY_HEADER)),
            None => self.instrs.push(WasmInstr::LocalSet(var.wasm_name)),
        }
    }
}

/// Element count of an array whose length is an integer literal.
fn constant_length(size: &Expr) -> Option<u32> {
    match &size.kind {
        ExprKind::Literal(Literal::Integer(digits)) => digits.parse::<u32>().ok(),
        _ => None,
    }
}
