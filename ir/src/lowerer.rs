use model::{Function as CstFunction, Program as CstProgram};
use crate::types::{Function, Param, Program, Type};

/// Name every `writeln` statement is lowered to.
pub const WRITELN: &str = "writeln";

/// CST to IR lowering engine. Lowering is a pure tree rewrite: it keeps no
/// counters, so lowering the same tree twice yields equal output.
#[derive(Debug, Default)]
pub struct Lowerer;

impl Lowerer {
    pub fn new() -> Self {
        Self
    }

    pub fn lower_program(&self, program: &CstProgram) -> Program {
        Program {
            name: program.name.clone(),
            functions: program.functions.iter().map(|f| self.lower_function(f)).collect(),
            scope: self.lower_block(&program.body),
        }
    }

    fn lower_function(&self, function: &CstFunction) -> Function {
        let params = function
            .params
            .iter()
            .map(|p| Param { name: p.name.clone(), ty: Type::from_cst(&p.r#type), line: p.line })
            .collect();

        Function {
            name: function.name.clone(),
            params,
            return_type: Type::from_cst(&function.return_type),
            scope: self.lower_block(&function.body),
            line: function.line,
        }
    }
}
