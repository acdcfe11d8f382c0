// Calls: user subroutines and the `writeln` intrinsic

use crate::function::FunctionGenerator;
use crate::types::runtime_suffix;
use crate::wasm::WasmInstr;
use ir::{Call, Type, WRITELN};

impl<'a> FunctionGenerator<'a> {
    /// A call used as a statement. A function's result is dropped.
    pub(crate) fn gen_call_statement(&mut self, call: &Call) {
        if call.name == WRITELN {
            self.gen_writeln(call);
            return;
        }
        self.gen_call(call);
        let returns_value = self.return_types.get(&call.name).is_some_and(|ty| *ty != Type::Void);
        if returns_value {
            self.instrs.push(WasmInstr::Drop);
        }
    }

    /// Arguments left to right, then the call; leaves the result, if any.
    pub(crate) fn gen_call(&mut self, call: &Call) {
        for arg in &call.args {
            self.gen_expr(arg);
        }
        self.instrs.push(WasmInstr::Call(format!("$fn.{}", call.name)));
    }

    /// One typed write per argument, picked from the call's signature, then
    /// a newline.
    fn gen_writeln(&mut self, call: &Call) {
        for (arg, ty) in call.args.iter().zip(&call.signature.0) {
            self.gen_expr(arg);
            self.instrs.push(WasmInstr::Call(format!("$write_{}", runtime_suffix(ty))));
        }
        self.instrs.push(WasmInstr::Call("$write_newline".to_string()));
    }
}
