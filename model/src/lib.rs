// Shared data model: tokens, the concrete syntax tree, diagnostics and target config
mod diagnostic;
mod target;
mod token;

pub use diagnostic::{Diagnostic, Location, Stage};
pub use target::{TargetConfig, DEFAULT_DATA_BASE, DEFAULT_ENTRY_EXPORT, DEFAULT_STRING_SLOT_SIZE};
pub use token::{Token, TokenKind};

#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub name: String,
    pub functions: Vec<Function>,
    pub body: Block,
}

/// A function or procedure declaration. Procedures carry a `void` return type.
#[derive(Debug, PartialEq, Clone)]
pub struct Function {
    pub name: String,
    pub params: Vec<Parameter>,
    pub return_type: Type,
    pub body: Block,
    pub line: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Parameter {
    pub name: String,
    pub r#type: Type,
    pub line: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Type {
    pub base_name: String,
    pub is_array: bool,
    pub size_expr: Option<Box<Expr>>,
}

impl Type {
    pub fn void() -> Self {
        Self { base_name: "void".to_string(), is_array: false, size_expr: None }
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self { base_name: name.into(), is_array: false, size_expr: None }
    }

    pub fn is_void(&self) -> bool {
        !self.is_array && self.base_name == "void"
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct Block {
    pub statements: Vec<Statement>,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Statement {
    pub kind: StmtKind,
    pub line: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum StmtKind {
    VarDecl {
        names: Vec<String>,
        r#type: Type,
    },
    Assign {
        name: String,
        index: Option<Expr>,
        expr: Expr,
    },
    Call {
        name: String,
        args: Vec<Expr>,
    },
    Return(Option<Expr>),
    Read {
        targets: Vec<Variable>,
    },
    Write {
        args: Vec<Expr>,
    },
    Assert(Expr),
    If {
        condition: Expr,
        then_branch: Box<Statement>,
        else_branch: Option<Box<Statement>>,
    },
    While {
        condition: Expr,
        body: Box<Statement>,
    },
    Block(Block),
}

/// Relational level: at most one comparison per expression.
#[derive(Debug, PartialEq, Clone)]
pub struct Expr {
    pub left: SimpleExpr,
    pub relation: Option<(RelOp, SimpleExpr)>,
}

/// Additive level: optional sign, then a left-associative chain of terms.
#[derive(Debug, PartialEq, Clone)]
pub struct SimpleExpr {
    pub sign: Option<Sign>,
    pub first: Term,
    pub rest: Vec<(AddOp, Term)>,
}

/// Multiplicative level: a left-associative chain of factors.
#[derive(Debug, PartialEq, Clone)]
pub struct Term {
    pub first: Factor,
    pub rest: Vec<(MulOp, Factor)>,
}

#[derive(Debug, PartialEq, Clone)]
pub enum Factor {
    Not(Box<Factor>),
    Size(Box<Factor>),
    Variable(Variable),
    IntegerLiteral(String),
    RealLiteral(String),
    /// Raw lexeme, quotes and escapes included.
    StringLiteral(String),
    Paren(Box<Expr>),
    Call { name: String, args: Vec<Expr> },
}

#[derive(Debug, PartialEq, Clone)]
pub struct Variable {
    pub name: String,
    pub index: Option<Box<Expr>>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Sign {
    Plus,
    Minus,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum RelOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gte,
    Gt,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum AddOp {
    Add,
    Sub,
    Or,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum MulOp {
    Mul,
    Div,
    Mod,
    And,
}

impl Expr {
    /// Wrap a lone factor as a full expression
    pub fn from_factor(factor: Factor) -> Self {
        Expr {
            left: SimpleExpr {
                sign: None,
                first: Term { first: factor, rest: Vec::new() },
                rest: Vec::new(),
            },
            relation: None,
        }
    }
}
