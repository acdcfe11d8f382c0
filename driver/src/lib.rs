// Library facade over the pipeline: scan -> parse -> lower -> analyze -> generate.
// The `minipl` binary is a thin CLI around these entry points.

use std::fmt::Write;

use model::{Diagnostic, TargetConfig};
use tracing::{debug, info_span};

/// Runtime library embedded in every module unless the caller supplies one.
pub const DEFAULT_RUNTIME: &str = include_str!("../runtime/runtime.wat");

/// Why a compilation produced no module.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("PARSE ERROR, NO OUTPUT")]
    Parse(Vec<Diagnostic>),
    #[error("{} semantic error(s), no output", .0.len())]
    Semantic(Vec<Diagnostic>),
}

impl CompileError {
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            CompileError::Parse(diagnostics) | CompileError::Semantic(diagnostics) => diagnostics,
        }
    }
}

/// Compile a program to WebAssembly text. Code generation only runs once
/// parsing and analysis came back clean.
pub fn compile(source: &str, runtime: &str, config: &TargetConfig) -> Result<String, CompileError> {
    let span = info_span!("compile", bytes = source.len());
    let _enter = span.enter();

    let parsed = parser::parse(source);
    if !parsed.is_success() {
        debug!(count = parsed.diagnostics.len(), "parse failed");
        return Err(CompileError::Parse(parsed.diagnostics));
    }

    let mut program = ir::lower(&parsed.program);
    let diagnostics = semantic::analyze(&mut program);
    if !diagnostics.is_empty() {
        debug!(count = diagnostics.len(), "analysis failed");
        return Err(CompileError::Semantic(diagnostics));
    }

    Ok(codegen::generate(&program, runtime, config))
}

/// Token trace, one token per line. The line number is printed only when it
/// changes; repeats show `   |` instead.
pub fn scan_only(source: &str) -> String {
    let mut out = String::new();
    let mut line = None;
    for token in lexer::Scanner::new(source) {
        if line == Some(token.line) {
            out.push_str("   | ");
        } else {
            let _ = write!(out, "{:4} ", token.line);
            line = Some(token.line);
        }
        let _ = writeln!(out, "{}", token);
    }
    out
}

/// Pretty-printed concrete syntax tree followed by any diagnostics.
pub fn parse_only(source: &str) -> String {
    let parsed = parser::parse(source);
    let mut out = format!("{:#?}\n", parsed.program);
    for diagnostic in &parsed.diagnostics {
        let _ = writeln!(out, "{}", diagnostic);
    }
    out
}
