use std::fmt;

/// Value type of a declaration or expression. Arrays are distinct from
/// their element type, so `integer` and `integer_arr` never compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Type {
    #[default]
    Void,
    Integer,
    Real,
    String,
    Boolean,
    Array(Box<Type>),
    /// A type name the language does not know. Kept so the analyzer can
    /// report it against the declaration's line.
    Unknown(String),
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Void => f.write_str("void"),
            Type::Integer => f.write_str("integer"),
            Type::Real => f.write_str("real"),
            Type::String => f.write_str("string"),
            Type::Boolean => f.write_str("boolean"),
            Type::Array(element) => write!(f, "{}_arr", element),
            Type::Unknown(name) => f.write_str(name),
        }
    }
}

/// Argument-type signature of a call, e.g. `string_integer`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Signature(pub Vec<Type>);

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("void");
        }
        for (i, ty) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("_")?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub functions: Vec<Function>,
    pub scope: Scope,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub name: String,
    pub params: Vec<Param>,
    pub return_type: Type,
    pub scope: Scope,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub ty: Type,
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Scope {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub line: usize,
    pub kind: StmtKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    /// `size` is only present for arrays declared with an explicit length.
    Declare {
        names: Vec<String>,
        r#type: Type,
        size: Option<Expr>,
    },
    Assign {
        name: String,
        index: Option<Expr>,
        expr: Expr,
    },
    Call(Call),
    Return(Option<Expr>),
    Read(Vec<Variable>),
    Assert(Expr),
    If {
        cond: Expr,
        then_scope: Scope,
        else_scope: Option<Scope>,
    },
    While {
        cond: Expr,
        body: Scope,
    },
    Scope(Scope),
}

/// A call to a user subroutine or an intrinsic. `signature` is filled in
/// by the analyzer from the argument types.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: String,
    pub args: Vec<Expr>,
    pub signature: Signature,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    /// Inferred by the analyzer; `Void` until then.
    pub ty: Type,
}

impl Expr {
    pub fn new(kind: ExprKind) -> Self {
        Self { kind, ty: Type::Void }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Variable(Variable),
    Literal(Literal),
    Call(Call),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub index: Option<Box<Expr>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Source digits; range is checked by the analyzer.
    Integer(String),
    Real(String),
    /// Decoded contents, quotes and escapes removed.
    String(String),
    Boolean(bool),
}

impl Literal {
    pub fn ty(&self) -> Type {
        match self {
            Literal::Integer(_) => Type::Integer,
            Literal::Real(_) => Type::Real,
            Literal::String(_) => Type::String,
            Literal::Boolean(_) => Type::Boolean,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Eq,
    Neq,
    Lt,
    Lte,
    Gte,
    Gt,
    Add,
    Sub,
    Or,
    Mul,
    Div,
    Mod,
    And,
}

impl BinaryOp {
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            BinaryOp::Eq | BinaryOp::Neq | BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gte | BinaryOp::Gt
        )
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Eq => "=",
            BinaryOp::Neq => "<>",
            BinaryOp::Lt => "<",
            BinaryOp::Lte => "<=",
            BinaryOp::Gte => ">=",
            BinaryOp::Gt => ">",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Or => "or",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::And => "and",
        }
    }
}

impl From<model::RelOp> for BinaryOp {
    fn from(op: model::RelOp) -> Self {
        match op {
            model::RelOp::Eq => BinaryOp::Eq,
            model::RelOp::Neq => BinaryOp::Neq,
            model::RelOp::Lt => BinaryOp::Lt,
            model::RelOp::Lte => BinaryOp::Lte,
            model::RelOp::Gte => BinaryOp::Gte,
            model::RelOp::Gt => BinaryOp::Gt,
        }
    }
}

impl From<model::AddOp> for BinaryOp {
    fn from(op: model::AddOp) -> Self {
        match op {
            model::AddOp::Add => BinaryOp::Add,
            model::AddOp::Sub => BinaryOp::Sub,
            model::AddOp::Or => BinaryOp::Or,
        }
    }
}

impl From<model::MulOp> for BinaryOp {
    fn from(op: model::MulOp) -> Self {
        match op {
            model::MulOp::Mul => BinaryOp::Mul,
            model::MulOp::Div => BinaryOp::Div,
            model::MulOp::Mod => BinaryOp::Mod,
            model::MulOp::And => BinaryOp::And,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Negate,
    Not,
    /// Postfix `.size` on an array.
    Size,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Negate => "-",
            UnaryOp::Not => "not",
            UnaryOp::Size => ".size",
        }
    }
}
