mod allocator;
mod call_ops;
mod control_flow;
mod data;
mod function;
mod instructions;
mod memory_ops;
mod types;
mod wasm;

use ir::{Program, Type};
use model::TargetConfig;
use std::collections::HashMap;

pub use allocator::{AddressAllocator, Allocation};
pub use data::{DataSection, Segment};
pub use types::wasm_type;
pub use wasm::{ArithOp, CompareOp, WasmInstr, WasmType, emit_wat};
use function::FunctionGenerator;

const PAGE_SIZE: u32 = 65536;

/// WebAssembly text generator for an analyzed program. Must only be run on
/// a program with no semantic diagnostics.
pub struct Codegen {
    config: TargetConfig,
    allocator: AddressAllocator,
    data: DataSection,
    return_types: HashMap<String, Type>,
}

impl Codegen {
    pub fn new(config: TargetConfig) -> Self {
        let allocator = AddressAllocator::new(config.data_base);
        Self { config, allocator, data: DataSection::new(), return_types: HashMap::new() }
    }

    /// `(module` + runtime + memory and data + functions + `)`. The runtime
    /// text is embedded verbatim.
    pub fn gen_program(&mut self, prog: &Program, runtime: &str) -> String {
        let span = tracing::info_span!("codegen", program = %prog.name);
        let _guard = span.enter();

        self.return_types = prog.functions.iter().map(|f| (f.name.clone(), f.return_type.clone())).collect();

        let mut functions = String::new();
        for func in &prog.functions {
            let func_gen = FunctionGenerator::new(&mut self.allocator, &mut self.data, &self.return_types, &self.config);
            functions.push_str(&func_gen.gen_function(func));
        }
        let entry = FunctionGenerator::new(&mut self.allocator, &mut self.data, &self.return_types, &self.config);
        functions.push_str(&entry.gen_entry(&prog.scope));

        tracing::debug!(
            static_bytes = self.allocator.end() - self.allocator.base(),
            claims = self.allocator.allocations().len(),
            "static data placed"
        );

        let mut output = String::from("(module\n");
        output.push_str(runtime);
        if !runtime.ends_with('\n') {
            output.push('\n');
        }
        output.push_str(&format!("  (memory (export \"memory\") {})\n", self.memory_pages()));
        output.push_str(&self.data.render());
        output.push_str(&functions);
        output.push_str(")\n");
        output
    }

    /// Initial pages needed to hold all static data.
    fn memory_pages(&self) -> u32 {
        self.allocator.end().div_ceil(PAGE_SIZE).max(1)
    }

    pub fn allocator(&self) -> &AddressAllocator {
        &self.allocator
    }
}

/// Generate the module text for an analyzed program.
pub fn generate(program: &Program, runtime: &str, config: &TargetConfig) -> String {
    Codegen::new(config.clone()).gen_program(program, runtime)
}
