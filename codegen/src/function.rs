use crate::allocator::AddressAllocator;
use crate::data::DataSection;
use crate::types::{value_type, wasm_type};
use crate::wasm::{WasmInstr, WasmType, emit_wat};
use ir::{Function as IrFunction, Scope, Type};
use model::TargetConfig;
use std::collections::HashMap;

/// A source variable bound to a WASM local.
#[derive(Debug, Clone)]
pub(crate) struct LocalVar {
    pub(crate) wasm_name: String,
    pub(crate) ty: Type,
}

/// Handles generation of code for a single function
pub struct FunctionGenerator<'a> {
    pub instrs: Vec<WasmInstr>,

    // Context from parent Codegen
    pub(crate) allocator: &'a mut AddressAllocator,
    pub(crate) data: &'a mut DataSection,
    pub(crate) return_types: &'a HashMap<String, Type>,
    pub(crate) config: &'a TargetConfig,

    // Per-function state
    pub(crate) params: Vec<(String, WasmType)>,
    pub(crate) locals: Vec<(String, WasmType)>,
    pub(crate) scopes: Vec<HashMap<String, LocalVar>>,
    pub(crate) name_uses: HashMap<String, usize>,
    pub(crate) next_label: usize,
}

impl<'a> FunctionGenerator<'a> {
    pub fn new(
        allocator: &'a mut AddressAllocator,
        data: &'a mut DataSection,
        return_types: &'a HashMap<String, Type>,
        config: &'a TargetConfig,
    ) -> Self {
        Self {
            instrs: Vec::new(),
            allocator,
            data,
            return_types,
            config,
            params: Vec::new(),
            locals: Vec::new(),
            scopes: vec![HashMap::new()],
            name_uses: HashMap::new(),
            next_label: 0,
        }
    }

    /// `(func $fn.<name> ...)` for a user subroutine.
    pub fn gen_function(mut self, func: &IrFunction) -> String {
        tracing::debug!(function = %func.name, "generating function");

        for param in &func.params {
            let wasm_name = self.fresh_local_name(&param.name);
            self.params.push((wasm_name.clone(), value_type(&param.ty)));
            self.bind(&param.name, LocalVar { wasm_name, ty: param.ty.clone() });
        }

        self.gen_statements(&func.scope);

        let result = wasm_type(&func.return_type);
        if result.is_some() {
            // Falling off the end of a function without `return` traps.
            self.instrs.push(WasmInstr::Unreachable);
        }

        let mut header = format!("  (func $fn.{}", func.name);
        for (name, ty) in &self.params {
            header.push_str(&format!(" (param {} {})", name, ty));
        }
        if let Some(result) = result {
            header.push_str(&format!(" (result {})", result));
        }
        self.render(header)
    }

    /// The program body as the exported entry function. It first moves the
    /// run-time heap past everything placed statically, which is only known
    /// once the body has been generated.
    pub fn gen_entry(mut self, body: &Scope) -> String {
        tracing::debug!(export = %self.config.entry_export, "generating entry function");

        self.gen_statements(body);

        let mut instrs = vec![
            WasmInstr::I32Const(address_operand(self.allocator.end())),
            WasmInstr::GlobalSet("$heap_ptr".to_string()),
        ];
        instrs.append(&mut self.instrs);
        self.instrs = instrs;

        let header = format!("  (func $main (export \"{}\")", self.config.entry_export);
        self.render(header)
    }

    fn render(&self, header: String) -> String {
        let mut out = header;
        out.push('\n');
        for (name, ty) in &self.locals {
            out.push_str(&format!("    (local {} {})\n", name, ty));
        }
        out.push_str(&emit_wat(&self.instrs, 2));
        out.push_str("  )\n");
        out
    }

    /// Statements of a scope without opening a new frame; parameters and the
    /// top level of a body share one.
    pub(crate) fn gen_statements(&mut self, scope: &Scope) {
        for statement in &scope.statements {
            self.gen_statement(statement);
        }
    }

    pub(crate) fn gen_scope(&mut self, scope: &Scope) {
        self.scopes.push(HashMap::new());
        self.gen_statements(scope);
        self.scopes.pop();
    }

    /// `$x` for the first variable called `x` in this function, then `$x.1`,
    /// `$x.2` for later declarations of the same name.
    pub(crate) fn fresh_local_name(&mut self, name: &str) -> String {
        let uses = self.name_uses.entry(name.to_string()).or_insert(0);
        let wasm_name = if *uses == 0 { format!("${}", name) } else { format!("${}.{}", name, uses) };
        *uses += 1;
        wasm_name
    }

    pub(crate) fn declare_local(&mut self, name: &str, ty: &Type) -> String {
        let wasm_name = self.fresh_local_name(name);
        self.locals.push((wasm_name.clone(), value_type(ty)));
        wasm_name
    }

    pub(crate) fn bind(&mut self, name: &str, var: LocalVar) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), var);
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<&LocalVar> {
        self.scopes.iter().rev().find_map(|scope| scope.get(name))
    }

    pub(crate) fn fresh_label(&mut self) -> usize {
        let n = self.next_label;
        self.next_label += 1;
        n
    }
}

/// Memory addresses are emitted as `i32.const`; WASM reinterprets the bits
/// as unsigned.
pub(crate) fn address_operand(address: u32) -> i32 {
    i32::from_ne_bytes(address.to_ne_bytes())
}
