use model::{Block as CstBlock, Statement as CstStatement, StmtKind as CstStmtKind};
use crate::lowerer::{Lowerer, WRITELN};
use crate::types::{Call, Scope, Signature, Statement, StmtKind, Type, Variable};

/// Statement lowering implementation
impl Lowerer {
    pub(crate) fn lower_block(&self, block: &CstBlock) -> Scope {
        Scope { statements: block.statements.iter().map(|s| self.lower_statement(s)).collect() }
    }

    /// Branch and loop bodies always become a scope, even a lone statement.
    fn lower_body(&self, statement: &CstStatement) -> Scope {
        match &statement.kind {
            CstStmtKind::Block(block) => self.lower_block(block),
            _ => Scope { statements: vec![self.lower_statement(statement)] },
        }
    }

    pub(crate) fn lower_statement(&self, statement: &CstStatement) -> Statement {
        let kind = match &statement.kind {
            CstStmtKind::VarDecl { names, r#type } => StmtKind::Declare {
                names: names.clone(),
                r#type: Type::from_cst(r#type),
                size: r#type.size_expr.as_deref().map(|e| self.lower_expr(e)),
            },
            CstStmtKind::Assign { name, index, expr } => StmtKind::Assign {
                name: name.clone(),
                index: index.as_ref().map(|e| self.lower_expr(e)),
                expr: self.lower_expr(expr),
            },
            CstStmtKind::Call { name, args } => StmtKind::Call(self.lower_call(name, args)),
            CstStmtKind::Write { args } => StmtKind::Call(self.lower_call(WRITELN, args)),
            CstStmtKind::Return(value) => StmtKind::Return(value.as_ref().map(|e| self.lower_expr(e))),
            CstStmtKind::Read { targets } => {
                StmtKind::Read(targets.iter().map(|v| self.lower_variable(v)).collect())
            }
            CstStmtKind::Assert(condition) => StmtKind::Assert(self.lower_expr(condition)),
            CstStmtKind::If { condition, then_branch, else_branch } => StmtKind::If {
                cond: self.lower_expr(condition),
                then_scope: self.lower_body(then_branch),
                else_scope: else_branch.as_deref().map(|s| self.lower_body(s)),
            },
            CstStmtKind::While { condition, body } => StmtKind::While {
                cond: self.lower_expr(condition),
                body: self.lower_body(body),
            },
            CstStmtKind::Block(block) => StmtKind::Scope(self.lower_block(block)),
        };
        Statement { line: statement.line, kind }
    }

    pub(crate) fn lower_call(&self, name: &str, args: &[model::Expr]) -> Call {
        Call {
            name: name.to_string(),
            args: args.iter().map(|a| self.lower_expr(a)).collect(),
            signature: Signature::default(),
        }
    }

    pub(crate) fn lower_variable(&self, variable: &model::Variable) -> Variable {
        Variable {
            name: variable.name.clone(),
            index: variable.index.as_deref().map(|e| Box::new(self.lower_expr(e))),
        }
    }
}
