// Parser module: turns source text into a concrete syntax tree
//
// Module organization:
// - parser.rs: Core Parser struct, token cursor, panic-mode recovery, program header
// - declarations.rs: functions, procedures, parameters and `var` declarations
// - types.rs: scalar and array type parsing
// - statements.rs: block and statement parsing
// - expressions.rs: Expression parsing with precedence climbing

mod declarations;
mod expressions;
mod parser;
mod statements;
mod types;

use model::{Diagnostic, Program};
use parser::Parser;

/// Result of a parse: the (possibly partial) tree plus every syntax and
/// lexical diagnostic met on the way.
#[derive(Debug)]
pub struct Parsed {
    pub program: Program,
    pub diagnostics: Vec<Diagnostic>,
}

impl Parsed {
    pub fn is_success(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Parse a whole program. Parsing always runs to end of input; success
/// means no diagnostic was emitted.
pub fn parse(source: &str) -> Parsed {
    let mut parser = Parser::new(source);
    let program = parser.parse_program();
    Parsed { program, diagnostics: parser.diagnostics }
}
