use model::{Expr as CstExpr, Factor, Sign, SimpleExpr, Term};
use crate::lowerer::Lowerer;
use crate::types::{BinaryOp, Expr, ExprKind, Literal, UnaryOp};

/// Expression lowering: operator chains fold left-to-right into nested
/// binary nodes, and a chain with nothing after its first operand is just
/// that operand.
impl Lowerer {
    pub(crate) fn lower_expr(&self, expr: &CstExpr) -> Expr {
        let left = self.lower_simple_expr(&expr.left);
        match &expr.relation {
            Some((op, right)) => binary((*op).into(), left, self.lower_simple_expr(right)),
            None => left,
        }
    }

    fn lower_simple_expr(&self, simple: &SimpleExpr) -> Expr {
        let mut first = self.lower_term(&simple.first);
        if simple.sign == Some(Sign::Minus) {
            first = unary(UnaryOp::Negate, first);
        }
        simple
            .rest
            .iter()
            .fold(first, |acc, (op, term)| binary((*op).into(), acc, self.lower_term(term)))
    }

    fn lower_term(&self, term: &Term) -> Expr {
        let first = self.lower_factor(&term.first);
        term.rest
            .iter()
            .fold(first, |acc, (op, factor)| binary((*op).into(), acc, self.lower_factor(factor)))
    }

    fn lower_factor(&self, factor: &Factor) -> Expr {
        match factor {
            Factor::Not(inner) => unary(UnaryOp::Not, self.lower_factor(inner)),
            Factor::Size(inner) => unary(UnaryOp::Size, self.lower_factor(inner)),
            Factor::Variable(variable) if variable.index.is_none() && is_boolean_name(&variable.name) => {
                literal(Literal::Boolean(variable.name == "true"))
            }
            Factor::Variable(variable) => Expr::new(ExprKind::Variable(self.lower_variable(variable))),
            Factor::IntegerLiteral(digits) => literal(Literal::Integer(digits.clone())),
            Factor::RealLiteral(text) => literal(Literal::Real(text.clone())),
            Factor::StringLiteral(lexeme) => literal(Literal::String(unescape(lexeme))),
            Factor::Paren(inner) => self.lower_expr(inner),
            Factor::Call { name, args } => Expr::new(ExprKind::Call(self.lower_call(name, args))),
        }
    }
}

fn binary(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::new(ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) })
}

fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::new(ExprKind::Unary { op, operand: Box::new(operand) })
}

fn literal(value: Literal) -> Expr {
    Expr::new(ExprKind::Literal(value))
}

/// Names that always read as boolean literals.
pub fn is_boolean_name(name: &str) -> bool {
    name == "true" || name == "false"
}

/// Strip the surrounding quotes of a string lexeme and decode `\"`, `\\`,
/// `\n` and `\t`. Any other escaped character is kept with its backslash.
pub fn unescape(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
