// WebAssembly text instruction definitions
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WasmType {
    I32,
    F64,
}

impl WasmType {
    pub fn to_str(self) -> &'static str {
        match self {
            Self::I32 => "i32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for WasmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl ArithOp {
    /// Integer division and remainder are signed.
    fn mnemonic(self, ty: WasmType) -> &'static str {
        match (self, ty) {
            (Self::Add, _) => "add",
            (Self::Sub, _) => "sub",
            (Self::Mul, _) => "mul",
            (Self::Div, WasmType::I32) => "div_s",
            (Self::Div, WasmType::F64) => "div",
            (Self::Rem, _) => "rem_s",
            (Self::And, _) => "and",
            (Self::Or, _) => "or",
        }
    }
}

impl CompareOp {
    fn mnemonic(self, ty: WasmType) -> &'static str {
        match (self, ty) {
            (Self::Eq, _) => "eq",
            (Self::Ne, _) => "ne",
            (Self::Lt, WasmType::I32) => "lt_s",
            (Self::Le, WasmType::I32) => "le_s",
            (Self::Gt, WasmType::I32) => "gt_s",
            (Self::Ge, WasmType::I32) => "ge_s",
            (Self::Lt, WasmType::F64) => "lt",
            (Self::Le, WasmType::F64) => "le",
            (Self::Gt, WasmType::F64) => "gt",
            (Self::Ge, WasmType::F64) => "ge",
        }
    }
}

/// One instruction of a function body. Names (`$x`, `$fn.f`, labels) are
/// stored with their leading `$`.
#[derive(Debug, Clone, PartialEq)]
pub enum WasmInstr {
    I32Const(i32),
    /// Source spelling of a real literal, valid WAT float syntax.
    F64Const(String),
    LocalGet(String),
    LocalSet(String),
    GlobalSet(String),
    Load(WasmType, u32),
    Store(WasmType, u32),
    Arith(WasmType, ArithOp),
    Compare(WasmType, CompareOp),
    I32Eqz,
    F64Neg,
    Call(String),
    Drop,
    Return,
    Unreachable,
    Block(String),
    Loop(String),
    If,
    Else,
    End,
    Br(String),
    BrIf(String),
}

fn memory_arg(offset: u32) -> String {
    if offset == 0 { String::new() } else { format!(" offset={}", offset) }
}

/// emit_wat renders instructions one per line, indenting nested blocks.
/// `depth` is the indentation level of the enclosing function body.
pub fn emit_wat(instructions: &[WasmInstr], depth: usize) -> String {
    use fmt::Write;
    let mut s = String::new();
    let mut depth = depth;
    for instr in instructions {
        if matches!(instr, WasmInstr::End | WasmInstr::Else) {
            depth = depth.saturating_sub(1);
        }
        s.push_str(&"  ".repeat(depth));
        let _ = match instr {
            WasmInstr::I32Const(v) => writeln!(s, "i32.const {}", v),
            WasmInstr::F64Const(v) => writeln!(s, "f64.const {}", v),
            WasmInstr::LocalGet(n) => writeln!(s, "local.get {}", n),
            WasmInstr::LocalSet(n) => writeln!(s, "local.set {}", n),
            WasmInstr::GlobalSet(n) => writeln!(s, "global.set {}", n),
            WasmInstr::Load(t, off) => writeln!(s, "{}.load{}", t, memory_arg(*off)),
            WasmInstr::Store(t, off) => writeln!(s, "{}.store{}", t, memory_arg(*off)),
            WasmInstr::Arith(t, op) => writeln!(s, "{}.{}", t, op.mnemonic(*t)),
            WasmInstr::Compare(t, op) => writeln!(s, "{}.{}", t, op.mnemonic(*t)),
            WasmInstr::I32Eqz => writeln!(s, "i32.eqz"),
            WasmInstr::F64Neg => writeln!(s, "f64.neg"),
            WasmInstr::Call(n) => writeln!(s, "call {}", n),
            WasmInstr::Drop => writeln!(s, "drop"),
            WasmInstr::Return => writeln!(s, "return"),
            WasmInstr::Unreachable => writeln!(s, "unreachable"),
            WasmInstr::Block(l) => writeln!(s, "block {}", l),
            WasmInstr::Loop(l) => writeln!(s, "loop {}", l),
            WasmInstr::If => writeln!(s, "if"),
            WasmInstr::Else => writeln!(s, "else"),
            WasmInstr::End => writeln!(s, "end"),
            WasmInstr::Br(l) => writeln!(s, "br {}", l),
            WasmInstr::BrIf(l) => writeln!(s, "br_if {}", l),
        };
        if matches!(instr, WasmInstr::Block(_) | WasmInstr::Loop(_) | WasmInstr::If | WasmInstr::Else) {
            depth += 1;
        }
    }
    s
}
